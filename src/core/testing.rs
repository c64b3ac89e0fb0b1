//! Test doubles for the translate command
//!
//! These stand in for the host editor, its settings store and the remote
//! model, so the pipeline can be exercised without UI, keys or network.
//!
//! # Example
//!
//! ```ignore
//! use code_aura::core::testing::{MockGenerator, ScriptedInteraction, StaticSettings};
//!
//! let generator = MockGenerator::text("console.log(1);");
//! let ui = ScriptedInteraction::new("/tmp/Foo.py", "print(1)")
//!     .with_answers(["python", "javascript"]);
//! let settings = StaticSettings::new("key");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::core::client::TextGenerator;
use crate::core::errors::{Result, TranslationError};
use crate::core::interaction::{InputPrompt, Interaction, SettingsSource};
use crate::core::models::TranslationResult;

/// What the mock generator answers with
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Return this text
    Text(String),
    /// Fail as if the service rejected the call
    ApiError {
        /// HTTP status to report
        status: u16,
        /// Service message to report
        message: String,
    },
    /// Fail as if the connection dropped
    Network(String),
    /// Succeed at transport level but carry no text
    InvalidResponse,
}

/// Generator that never leaves the process
#[derive(Debug)]
pub struct MockGenerator {
    mode: MockMode,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockGenerator {
    /// Generator answering according to `mode`
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Always answer with `text`
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MockMode::Text(text.into()))
    }

    /// Number of `generate` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt passed to the most recent call
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(
        &self,
        _api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<TranslationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap_or_else(|e| e.into_inner()) = Some(prompt.to_string());

        match &self.mode {
            MockMode::Text(text) => Ok(TranslationResult::new(text.clone(), model)),
            MockMode::ApiError { status, message } => Err(TranslationError::ApiError {
                status: *status,
                message: message.clone(),
            }),
            MockMode::Network(message) => Err(TranslationError::NetworkError {
                message: message.clone(),
            }),
            MockMode::InvalidResponse => Err(TranslationError::InvalidResponseError {
                message: "No text in response".to_string(),
            }),
        }
    }
}

/// Host double with scripted prompt answers and a notification log
#[derive(Debug, Default)]
pub struct ScriptedInteraction {
    document: Option<PathBuf>,
    selection: Option<String>,
    answers: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<InputPrompt>>,
    errors: Mutex<Vec<String>>,
    infos: Mutex<Vec<String>>,
    opened: Mutex<Vec<PathBuf>>,
}

impl ScriptedInteraction {
    /// Active document at `document` with `selection` highlighted
    pub fn new(document: impl Into<PathBuf>, selection: impl Into<String>) -> Self {
        Self {
            document: Some(document.into()),
            selection: Some(selection.into()),
            ..Default::default()
        }
    }

    /// No editor open at all
    pub fn without_document() -> Self {
        Self::default()
    }

    /// Answers for successive prompts
    pub fn with_answers<I, S>(self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_optional_answers(answers.into_iter().map(|a| Some(a.into())))
    }

    /// Answers for successive prompts; `None` means the prompt was dismissed
    pub fn with_optional_answers<I>(self, answers: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        *self.answers.lock().unwrap_or_else(|e| e.into_inner()) = answers.into_iter().collect();
        self
    }

    /// Replace the selection
    pub fn with_selection(mut self, selection: Option<String>) -> Self {
        self.selection = selection;
        self
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> Vec<InputPrompt> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Error notifications shown so far
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Info notifications shown so far
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Files opened so far
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Interaction for ScriptedInteraction {
    async fn prompt_text(&self, prompt: &InputPrompt) -> Option<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.clone());
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .flatten()
    }

    fn active_document(&self) -> Option<PathBuf> {
        self.document.clone()
    }

    fn active_selection(&self) -> Option<String> {
        self.selection.clone()
    }

    fn notify_error(&self, message: &str) {
        self.errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }

    fn notify_info(&self, message: &str) {
        self.infos
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }

    async fn open_file(&self, path: &Path) -> Result<()> {
        self.opened
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(path.to_path_buf());
        Ok(())
    }
}

/// Settings with a fixed key, or a fixed configuration failure
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    api_key: Option<String>,
    error: Option<String>,
}

impl StaticSettings {
    /// Settings holding `api_key`
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            error: None,
        }
    }

    /// No key configured
    pub fn empty() -> Self {
        Self::default()
    }

    /// Settings that cannot be read
    pub fn broken(message: impl Into<String>) -> Self {
        Self {
            api_key: None,
            error: Some(message.into()),
        }
    }
}

impl SettingsSource for StaticSettings {
    fn api_key(&self) -> Result<Option<String>> {
        match &self.error {
            Some(message) => Err(TranslationError::ConfigError {
                message: message.clone(),
            }),
            None => Ok(self.api_key.clone()),
        }
    }
}
