//! The translate command: collect inputs, prompt the model, write the result

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::client::{GeminiClient, TextGenerator};
use crate::core::config::AuraConfig;
use crate::core::errors::{InputField, Result, TranslationError};
use crate::core::interaction::{InputPrompt, Interaction, SettingsSource};
use crate::core::models::{PipelineStage, TranslationRequest, TranslationResult};
use crate::core::prompt::{build_translation_prompt, strip_code_fences};
use crate::core::writer::OutputWriter;

/// Identifier the host binds the command to
pub const TRANSLATE_COMMAND_ID: &str = "extension.translateCodeAura";

/// Notification shown after a successful run
pub const SUCCESS_MESSAGE: &str = "Code translated and saved to new file successfully!";

/// Result of one command invocation
#[derive(Debug)]
pub enum CommandOutcome {
    /// No editor was active; nothing happened
    NoActiveDocument,
    /// Translation written to `output`
    Completed {
        /// Path of the written file
        output: PathBuf,
        /// What the model returned
        result: TranslationResult,
        /// Stages passed through, in order
        stages: Vec<PipelineStage>,
    },
    /// Aborted at `stage`
    Failed {
        /// Stage that was running when the error occurred
        stage: PipelineStage,
        /// Why the command stopped
        error: TranslationError,
    },
}

impl CommandOutcome {
    /// Whether the translation was written
    pub fn is_completed(&self) -> bool {
        matches!(self, CommandOutcome::Completed { .. })
    }
}

/// Orchestrates a single translation per invocation
#[derive(Clone)]
pub struct CodeTranslator {
    generator: Arc<dyn TextGenerator>,
    writer: OutputWriter,
    model: String,
    strip_code_fences: bool,
}

impl CodeTranslator {
    /// Create a translator around any text generator
    pub fn new(generator: Arc<dyn TextGenerator>, config: &AuraConfig) -> Self {
        Self {
            generator,
            writer: OutputWriter::new(),
            model: config.model.clone(),
            strip_code_fences: config.strip_code_fences,
        }
    }

    /// Create a translator backed by Gemini
    pub fn from_config(config: &AuraConfig) -> Result<Self> {
        let client = GeminiClient::new(config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run the command against a host.
    ///
    /// Errors are reported through `interaction` and also returned in the
    /// outcome; nothing is retried.
    pub async fn run(
        &self,
        interaction: &dyn Interaction,
        settings: &dyn SettingsSource,
    ) -> CommandOutcome {
        let Some(document) = interaction.active_document() else {
            debug!("{} invoked without an active document", TRANSLATE_COMMAND_ID);
            return CommandOutcome::NoActiveDocument;
        };

        info!("Running {} on {}", TRANSLATE_COMMAND_ID, document.display());

        let mut stages = Vec::new();
        let executed = self.execute(interaction, settings, &document, &mut stages).await;
        match executed {
            Ok((output, result)) => {
                interaction.notify_info(SUCCESS_MESSAGE);
                CommandOutcome::Completed {
                    output,
                    result,
                    stages,
                }
            }
            Err(error) => {
                let stage = stages.last().copied().unwrap_or(PipelineStage::Idle);
                warn!("Translation failed while {}: {}", stage, error);
                interaction.notify_error(&error.user_message());
                CommandOutcome::Failed { stage, error }
            }
        }
    }

    async fn execute(
        &self,
        interaction: &dyn Interaction,
        settings: &dyn SettingsSource,
        document: &Path,
        stages: &mut Vec<PipelineStage>,
    ) -> Result<(PathBuf, TranslationResult)> {
        stages.push(PipelineStage::Collecting);
        let request = collect_request(interaction, settings).await?;

        stages.push(PipelineStage::Prompting);
        let prompt = self.prompt_for(&request)?;

        stages.push(PipelineStage::Calling);
        let result = self.send(&request, &prompt).await?;

        stages.push(PipelineStage::Writing);
        let output = self
            .writer
            .write(document, &request.target_lang, &result.text)
            .await?;
        interaction.open_file(&output).await?;

        stages.push(PipelineStage::Done);
        Ok((output, result))
    }

    /// Send one request to the model and return its text
    pub async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        let prompt = self.prompt_for(request)?;
        self.send(request, &prompt).await
    }

    /// Validate the request and build its prompt
    fn prompt_for(&self, request: &TranslationRequest) -> Result<String> {
        request.validate()?;

        let prompt = build_translation_prompt(
            &request.source_code,
            &request.source_lang,
            &request.target_lang,
        );
        debug!(
            "Prompt built: {} -> {}, {} bytes, model {}",
            request.source_lang,
            request.target_lang,
            prompt.len(),
            self.model
        );
        Ok(prompt)
    }

    async fn send(&self, request: &TranslationRequest, prompt: &str) -> Result<TranslationResult> {
        let mut result = self
            .generator
            .generate(&request.api_key, &self.model, prompt)
            .await?;

        if self.strip_code_fences {
            result.text = strip_code_fences(&result.text);
        }

        info!(
            "Received {} bytes from {} ({} tokens)",
            result.text.len(),
            result.model_used,
            result.tokens_used
        );
        Ok(result)
    }

    /// Translate and write the output next to `original`, without any UI
    pub async fn translate_to_file(
        &self,
        request: &TranslationRequest,
        original: &Path,
    ) -> Result<(PathBuf, TranslationResult)> {
        let result = self.translate(request).await?;
        let output = self
            .writer
            .write(original, &request.target_lang, &result.text)
            .await?;
        Ok((output, result))
    }
}

/// Prompt shown when asking for the source language
pub fn source_language_prompt() -> InputPrompt {
    InputPrompt::new(
        "Enter source language (e.g., python, java, javascript)",
        "From which language would you like to translate?",
    )
}

/// Prompt shown when asking for the target language
pub fn target_language_prompt() -> InputPrompt {
    InputPrompt::new(
        "Enter target language (e.g., python, java, javascript)",
        "To which language would you like to translate?",
    )
}

/// Gather key, languages and selection in order, stopping at the first gap
pub async fn collect_request(
    interaction: &dyn Interaction,
    settings: &dyn SettingsSource,
) -> Result<TranslationRequest> {
    let api_key = non_blank(settings.api_key()?)
        .ok_or_else(|| TranslationError::missing(InputField::ApiKey))?;

    let source_lang = non_blank(interaction.prompt_text(&source_language_prompt()).await)
        .ok_or_else(|| TranslationError::missing(InputField::SourceLanguage))?;

    let target_lang = non_blank(interaction.prompt_text(&target_language_prompt()).await)
        .ok_or_else(|| TranslationError::missing(InputField::TargetLanguage))?;

    let source_code = interaction
        .active_selection()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| TranslationError::missing(InputField::Selection))?;

    TranslationRequest::new(api_key, source_lang, target_lang, source_code)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
