//! Main entry point for the code-aura CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use code_aura::cli::commands::{self, Commands};
use code_aura::core::config::ConfigLoader;

/// code-aura - translate source code between programming languages
#[derive(Parser, Debug)]
#[command(name = "code-aura", version, about, long_about = None)]
struct Args {
    /// Config file (defaults to ./aura.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gemini API key (overrides AURA_API_KEY / GEMINI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("code_aura={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let loader = ConfigLoader::new(args.config).with_api_key(args.api_key);

    // Execute command
    match args.command {
        Some(Commands::Translate {
            file,
            lines,
            source_lang,
            target_lang,
            show,
        }) => {
            commands::handle_translate(loader, file, lines, source_lang, target_lang, show).await?;
        }
        Some(Commands::Languages) => {
            commands::handle_languages();
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
