//! Generative-text client used to translate code
//!
//! [`TextGenerator`] is the seam the pipeline depends on; [`GeminiClient`]
//! is the production implementation talking to the Gemini REST API.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::config::AuraConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::TranslationResult;

/// A service that turns one prompt into one block of generated text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send `prompt` to `model`, authenticated with `api_key`.
    ///
    /// Exactly one request is made; errors are returned as-is without retry.
    async fn generate(&self, api_key: &str, model: &str, prompt: &str)
        -> Result<TranslationResult>;
}

/// Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_endpoint: String,
}

impl GeminiClient {
    /// Create a new client from configuration
    pub fn new(config: &AuraConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(2);

        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        Ok(Self {
            client: builder.build()?,
            api_endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the `generateContent` method for a model
    pub fn endpoint_for(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_endpoint, model)
    }

    /// Send actual HTTP request
    async fn send_request(&self, api_key: &str, model: &str, prompt: &str) -> Result<Value> {
        let url = self.endpoint_for(model);
        debug!("POST {} ({} prompt bytes)", url, prompt.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&build_request_body(prompt))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        if status.is_success() {
            response
                .json::<Value>()
                .await
                .map_err(|e| TranslationError::InvalidResponseError {
                    message: e.to_string(),
                })
        } else {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();
            warn!("Gemini returned {}", status_code);

            Err(TranslationError::ApiError {
                status: status_code,
                message: service_error_message(&error_text),
            })
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<TranslationResult> {
        let json = self.send_request(api_key, model, prompt).await?;
        parse_response(&json, model)
    }
}

/// Request body for a single-turn text prompt
pub fn build_request_body(prompt: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }]
    })
}

/// Extract the generated text and usage details from a response body
pub fn parse_response(json: &Value, model: &str) -> Result<TranslationResult> {
    let candidate = match json["candidates"].get(0) {
        Some(candidate) => candidate,
        None => {
            let message = match json["promptFeedback"]["blockReason"].as_str() {
                Some(reason) => format!("Prompt blocked: {}", reason),
                None => "No candidates in response".to_string(),
            };
            return Err(TranslationError::InvalidResponseError { message });
        }
    };

    let parts = candidate["content"]["parts"].as_array().ok_or_else(|| {
        TranslationError::InvalidResponseError {
            message: "No content parts in response".to_string(),
        }
    })?;

    let texts: Vec<&str> = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if texts.is_empty() {
        return Err(TranslationError::InvalidResponseError {
            message: "No text in response".to_string(),
        });
    }

    let tokens_used = json["usageMetadata"]["totalTokenCount"]
        .as_u64()
        .unwrap_or(0) as usize;

    let model_used = json["modelVersion"]
        .as_str()
        .unwrap_or(model)
        .to_string();

    Ok(TranslationResult {
        text: texts.concat(),
        model_used,
        tokens_used,
        finish_reason: candidate["finishReason"].as_str().map(|s| s.to_string()),
    })
}

/// Prefer the service's own `error.message` over the raw body
fn service_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| body.trim().to_string())
}

fn map_transport_error(err: reqwest::Error) -> TranslationError {
    if err.is_timeout() {
        TranslationError::TimeoutError
    } else {
        TranslationError::NetworkError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;

    #[test]
    fn test_request_body_shape() {
        assert_json_eq!(
            build_request_body("Translate this"),
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": "Translate this" }]
                }]
            })
        );
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let json = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "print(" }, { "text": "1)" }]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "totalTokenCount": 42 },
            "modelVersion": "gemini-1.5-flash-002"
        });

        let result = parse_response(&json, "gemini-1.5-flash").unwrap();
        assert_eq!(result.text, "print(1)");
        assert_eq!(result.tokens_used, 42);
        assert_eq!(result.model_used, "gemini-1.5-flash-002");
        assert_eq!(result.finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_parse_response_without_text() {
        let json = json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "SAFETY" }]
        });

        let err = parse_response(&json, "m").unwrap_err();
        assert!(matches!(err, TranslationError::InvalidResponseError { .. }));
    }

    #[test]
    fn test_parse_blocked_prompt() {
        let json = json!({ "promptFeedback": { "blockReason": "SAFETY" } });

        let err = parse_response(&json, "m").unwrap_err();
        assert!(err.to_string().contains("Prompt blocked: SAFETY"));
    }

    #[test]
    fn test_service_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            service_error_message(body),
            "API key not valid. Please pass a valid API key."
        );
        assert_eq!(service_error_message(" upstream down \n"), "upstream down");
    }

    #[test]
    fn test_endpoint_for_model() {
        let config = AuraConfig {
            api_endpoint: "http://localhost:8080/v1beta/".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint_for("gemini-1.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
