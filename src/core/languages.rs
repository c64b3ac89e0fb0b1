//! Target language to file extension mapping

use std::path::{Path, PathBuf};

use crate::core::errors::{Result, TranslationError};

/// Supported target languages and their file extensions
pub const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("python", "py"),
    ("javascript", "js"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("ruby", "rb"),
    ("c", "c"),
];

/// Look up the extension for a language name, ignoring case
pub fn extension_for(language: &str) -> Result<&'static str> {
    let key = language.trim().to_lowercase();
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| TranslationError::UnsupportedLanguage {
            language: language.to_string(),
        })
}

/// Whether a target language can be written to disk
pub fn is_supported(language: &str) -> bool {
    extension_for(language).is_ok()
}

/// Sibling path of `original` carrying the target language's extension
pub fn output_path_for(original: &Path, target_lang: &str) -> Result<PathBuf> {
    let extension = extension_for(target_lang)?;

    let stem = original
        .file_stem()
        .ok_or_else(|| TranslationError::FileError {
            path: original.display().to_string(),
            message: "Document has no file name".to_string(),
        })?;

    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(extension);

    Ok(match original.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    })
}
