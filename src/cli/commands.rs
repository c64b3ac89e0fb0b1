//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::cli::terminal::{parse_line_range, ProgressGenerator, TerminalInteraction};
use crate::core::client::GeminiClient;
use crate::core::config::ConfigLoader;
use crate::core::languages::LANGUAGE_EXTENSIONS;
use crate::core::pipeline::{CodeTranslator, CommandOutcome, TRANSLATE_COMMAND_ID};

/// Commands for code-aura
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a source file (or part of it) into another language
    Translate {
        /// Document to translate (required)
        #[arg(short, long)]
        file: PathBuf,

        /// Only translate lines START:END (1-based, inclusive)
        #[arg(short, long)]
        lines: Option<String>,

        /// Source language (prompted if not specified)
        #[arg(long)]
        source_lang: Option<String>,

        /// Target language (prompted if not specified)
        #[arg(short, long)]
        target_lang: Option<String>,

        /// Print the translated file after writing it
        #[arg(long)]
        show: bool,
    },

    /// List supported target languages and their file extensions
    Languages,
}

/// Handle translate command
pub async fn handle_translate(
    loader: ConfigLoader,
    file: PathBuf,
    lines: Option<String>,
    source_lang: Option<String>,
    target_lang: Option<String>,
    show: bool,
) -> anyhow::Result<()> {
    let config = loader.load()?;
    let lines = lines.as_deref().map(parse_line_range).transpose()?;

    info!("Starting {}", TRANSLATE_COMMAND_ID);
    info!("Input: {}", file.display());
    info!("Model: {}", config.model);

    let client = GeminiClient::new(&config)?;
    let translator = CodeTranslator::new(Arc::new(ProgressGenerator::new(client)), &config);

    let ui = TerminalInteraction::open(file, lines, vec![source_lang, target_lang], show).await?;

    match translator.run(&ui, &loader).await {
        CommandOutcome::Completed { output, result, .. } => {
            info!(
                "Completed: {} ({} tokens, model {})",
                output.display(),
                result.tokens_used,
                result.model_used
            );
            Ok(())
        }
        CommandOutcome::Failed { stage, error } => {
            Err(anyhow::Error::new(error).context(format!("Translation failed while {}", stage)))
        }
        CommandOutcome::NoActiveDocument => Ok(()),
    }
}

/// Handle languages command
pub fn handle_languages() {
    println!("Supported target languages:");
    for (language, extension) in LANGUAGE_EXTENSIONS {
        println!("   {:<12} .{}", language, extension);
    }
}
