//! Core data models for code translation

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::errors::{InputField, Result, TranslationError};

/// Stage of a single translate-command invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Nothing started yet
    Idle,
    /// Gathering key, languages and selection
    Collecting,
    /// Building the prompt
    Prompting,
    /// Waiting on the generative service
    Calling,
    /// Writing the output file
    Writing,
    /// Finished successfully
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Idle => write!(f, "idle"),
            PipelineStage::Collecting => write!(f, "collecting"),
            PipelineStage::Prompting => write!(f, "prompting"),
            PipelineStage::Calling => write!(f, "calling"),
            PipelineStage::Writing => write!(f, "writing"),
            PipelineStage::Done => write!(f, "done"),
        }
    }
}

/// Translation request
#[derive(Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Gemini API key; never serialized
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Language of `source_code`, as entered
    pub source_lang: String,
    /// Language to translate into, as entered
    pub target_lang: String,
    /// Selected code
    pub source_code: String,
}

impl TranslationRequest {
    /// Build a request, rejecting any blank field
    pub fn new(
        api_key: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        source_code: impl Into<String>,
    ) -> Result<Self> {
        let request = Self {
            api_key: api_key.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            source_code: source_code.into(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Check every field is populated
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(TranslationError::missing(InputField::ApiKey));
        }
        if self.source_lang.trim().is_empty() {
            return Err(TranslationError::missing(InputField::SourceLanguage));
        }
        if self.target_lang.trim().is_empty() {
            return Err(TranslationError::missing(InputField::TargetLanguage));
        }
        if self.source_code.is_empty() {
            return Err(TranslationError::missing(InputField::Selection));
        }
        Ok(())
    }
}

// The key stays out of logs.
impl fmt::Debug for TranslationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationRequest")
            .field("api_key", &"<redacted>")
            .field("source_lang", &self.source_lang)
            .field("target_lang", &self.target_lang)
            .field("source_code_len", &self.source_code.len())
            .finish()
    }
}

/// Translation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Generated text
    pub text: String,
    /// Model that produced it
    pub model_used: String,
    /// Total tokens reported by the service, 0 if unreported
    pub tokens_used: usize,
    /// Finish reason of the first candidate
    pub finish_reason: Option<String>,
}

impl TranslationResult {
    /// Result carrying `text` with no usage metadata
    pub fn new(text: impl Into<String>, model_used: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model_used: model_used.into(),
            tokens_used: 0,
            finish_reason: None,
        }
    }
}
