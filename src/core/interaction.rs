//! Host capabilities the translate command depends on
//!
//! An editor integration (or the bundled terminal host) supplies these so the
//! pipeline never touches a concrete UI or settings store.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::core::errors::Result;

/// A free-text question put to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPrompt {
    /// Greyed-out example shown inside the input box
    pub placeholder: String,
    /// The question itself
    pub help: String,
}

impl InputPrompt {
    /// Create a prompt from its placeholder and question
    pub fn new(placeholder: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            help: help.into(),
        }
    }
}

/// UI primitives provided by the host editor
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Ask the user for text. `None` when the prompt was dismissed.
    async fn prompt_text(&self, prompt: &InputPrompt) -> Option<String>;

    /// Path of the document in the active editor, if any
    fn active_document(&self) -> Option<PathBuf>;

    /// Text currently selected in the active editor
    fn active_selection(&self) -> Option<String>;

    /// Show an error notification
    fn notify_error(&self, message: &str);

    /// Show an informational notification
    fn notify_info(&self, message: &str);

    /// Display a file to the user
    async fn open_file(&self, path: &Path) -> Result<()>;
}

/// Persisted configuration the command reads on every invocation
pub trait SettingsSource: Send + Sync {
    /// Configured API key, `Ok(None)` when unset.
    ///
    /// An unreadable or invalid configuration is an error, not a missing key.
    fn api_key(&self) -> Result<Option<String>>;
}
