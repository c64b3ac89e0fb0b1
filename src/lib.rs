//! code-aura - translate selected source code into another language
//!
//! This library sends a code selection to a Gemini model with a translation
//! prompt and writes the answer next to the original file, with an extension
//! matching the target language. Editor integrations plug in through the
//! [`core::interaction`] traits; a terminal host lives in [`cli`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;

// Re-export key types for convenience
pub use crate::core::{
    client::{GeminiClient, TextGenerator},
    config::{AuraConfig, ConfigLoader},
    errors::{InputField, TranslationError},
    interaction::{InputPrompt, Interaction, SettingsSource},
    models::{PipelineStage, TranslationRequest, TranslationResult},
    pipeline::{CodeTranslator, CommandOutcome, TRANSLATE_COMMAND_ID},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
