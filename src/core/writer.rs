//! Writes translated code next to the original document

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::core::errors::{Result, TranslationError};
use crate::core::languages::output_path_for;

/// Output writer with per-path serialisation.
///
/// Files are written through a temp file in the same directory and renamed
/// into place, so readers never observe a half-written translation.
#[derive(Debug, Clone, Default)]
pub struct OutputWriter {
    locks: Arc<Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `text` to the sibling of `original` for `target_lang`.
    ///
    /// The path is resolved before touching disk, so an unsupported language
    /// leaves the filesystem untouched. Existing files are replaced.
    pub async fn write(&self, original: &Path, target_lang: &str, text: &str) -> Result<PathBuf> {
        let output = output_path_for(original, target_lang)?;

        let lock = self.lock_for(&output);
        let written = {
            let _guard = lock.lock().await;
            self.write_locked(&output, text).await
        };
        self.release(&output, lock);

        written?;
        info!("Saved translation to {}", output.display());
        Ok(output)
    }

    async fn write_locked(&self, output: &Path, text: &str) -> Result<()> {
        debug!("Writing {} bytes to {}", text.len(), output.display());

        let target = output.to_path_buf();
        let contents = text.to_owned();
        tokio::task::spawn_blocking(move || write_atomic(&target, contents.as_bytes()))
            .await
            .map_err(|e| TranslationError::FileError {
                path: output.display().to_string(),
                message: e.to_string(),
            })?
    }

    fn lock_for(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(path.to_path_buf()).or_default().clone()
    }

    /// Drop the map entry once no other writer holds the path's lock
    fn release(&self, path: &Path, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        drop(lock);
        if locks.get(path).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(path);
        }
    }

    /// Number of paths with a live lock entry
    pub fn tracked_paths(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let file_error = |message: String| TranslationError::FileError {
        path: path.display().to_string(),
        message,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = temp_builder()
        .tempfile_in(dir)
        .map_err(|e| file_error(e.to_string()))?;
    tmp.write_all(contents).map_err(|e| file_error(e.to_string()))?;
    tmp.flush().map_err(|e| file_error(e.to_string()))?;

    // An overwritten file keeps its mode.
    if let Ok(existing) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| file_error(e.to_string()))?;
    }
    tmp.persist(path).map_err(|e| file_error(e.error.to_string()))?;

    Ok(())
}

/// Temp files are created like a plain `File::create` would be: 0666
/// filtered through the process umask, rather than tempfile's 0600.
#[cfg(unix)]
fn temp_builder() -> tempfile::Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = tempfile::Builder::new();
    builder.permissions(std::fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn temp_builder() -> tempfile::Builder<'static, 'static> {
    tempfile::Builder::new()
}
