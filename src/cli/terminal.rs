//! Terminal host for the translate command

use anyhow::Context;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::core::client::TextGenerator;
use crate::core::errors::Result;
use crate::core::interaction::{InputPrompt, Interaction};
use crate::core::models::TranslationResult;

/// Interaction provider backed by stdin/stdout.
///
/// The "active document" is the file named on the command line and the
/// selection is either the whole file or a line range of it. Answers given
/// as flags are consumed in prompt order (source language, then target);
/// anything left unanswered is asked for interactively.
#[derive(Debug)]
pub struct TerminalInteraction {
    document: PathBuf,
    selection: String,
    answers: Mutex<VecDeque<Option<String>>>,
    stdin: tokio::sync::Mutex<BufReader<tokio::io::Stdin>>,
    show: bool,
}

impl TerminalInteraction {
    /// Open `file` as the active document
    pub async fn open(
        file: PathBuf,
        lines: Option<(usize, usize)>,
        answers: Vec<Option<String>>,
        show: bool,
    ) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;

        let selection = match lines {
            Some((start, end)) => select_lines(&content, start, end),
            None => content,
        };

        Ok(Self {
            document: file,
            selection,
            answers: Mutex::new(answers.into_iter().collect()),
            stdin: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin())),
            show,
        })
    }
}

#[async_trait]
impl Interaction for TerminalInteraction {
    async fn prompt_text(&self, prompt: &InputPrompt) -> Option<String> {
        let preset = self
            .answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .flatten();
        if preset.is_some() {
            return preset;
        }

        eprint!("{} [{}]: ", prompt.help, prompt.placeholder);
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        let mut stdin = self.stdin.lock().await;
        match stdin.read_line(&mut line).await {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn active_document(&self) -> Option<PathBuf> {
        Some(self.document.clone())
    }

    fn active_selection(&self) -> Option<String> {
        Some(self.selection.clone())
    }

    fn notify_error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }

    fn notify_info(&self, message: &str) {
        println!("✅ {}", message);
    }

    async fn open_file(&self, path: &Path) -> Result<()> {
        println!("📄 {}", path.display());
        if self.show {
            let content = tokio::fs::read_to_string(path).await?;
            println!("{}", content);
        }
        Ok(())
    }
}

/// Shows a spinner while the wrapped generator is waiting on the network
pub struct ProgressGenerator<G> {
    inner: G,
}

impl<G: TextGenerator> ProgressGenerator<G> {
    /// Wrap `inner` so each call shows a spinner
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<G: TextGenerator> TextGenerator for ProgressGenerator<G> {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<TranslationResult> {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Translating with {}...", model));
        pb.enable_steady_tick(Duration::from_millis(100));

        let result = self.inner.generate(api_key, model, prompt).await;
        pb.finish_and_clear();
        result
    }
}

/// Parse a 1-based inclusive `START:END` line range
pub fn parse_line_range(value: &str) -> anyhow::Result<(usize, usize)> {
    let (start, end) = value
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("Line range must look like START:END"))?;

    let start: usize = start.trim().parse().context("Invalid start line")?;
    let end: usize = end.trim().parse().context("Invalid end line")?;

    if start == 0 || end < start {
        anyhow::bail!("Line range {} is empty or starts before line 1", value);
    }

    Ok((start, end))
}

/// Lines `start..=end` (1-based) of `content`, keeping line endings
pub fn select_lines(content: &str, start: usize, end: usize) -> String {
    content
        .split_inclusive('\n')
        .skip(start.saturating_sub(1))
        .take(end.saturating_sub(start.max(1)).saturating_add(1))
        .collect()
}
