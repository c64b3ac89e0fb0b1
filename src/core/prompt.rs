//! Prompt construction and response cleanup for code translation

use regex::Regex;
use std::sync::OnceLock;

/// Build the instruction sent to the model.
///
/// The source is embedded verbatim; the model is told to answer with bare
/// code so the response can be written straight to disk.
pub fn build_translation_prompt(source_code: &str, source_lang: &str, target_lang: &str) -> String {
    format!(
        "Translate this {source} code to {target}:\n\n{code}\n\n\
         Give the {target} code without any explanation. \
         Return only the code as plain text, without markdown code fences \
         or any additional formatting or commentary.",
        source = source_lang.trim(),
        target = target_lang.trim(),
        code = source_code,
    )
}

/// Remove a markdown fence wrapping the whole response.
///
/// Text that is not entirely enclosed in one fence is returned unchanged.
pub fn strip_code_fences(text: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)\A\s*```[\w+#.-]*[ \t]*\r?\n(.*?)\r?\n?```\s*\z").expect("valid fence pattern")
    });

    match fence.captures(text).and_then(|c| c.get(1)) {
        Some(body) => format!("{}\n", body.as_str()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_format() {
        let code = "def add(a, b):\n    return a + b\n";
        let prompt = build_translation_prompt(code, "python", "javascript");

        assert!(prompt.contains("python"));
        assert!(prompt.contains("javascript"));
        assert!(prompt.contains(code));
        assert!(prompt.contains("without any explanation"));
        assert!(prompt.contains("plain text"));
        assert!(prompt.contains("markdown"));
    }

    #[test]
    fn test_prompt_keeps_source_whitespace() {
        let code = "  indented\n\ttabbed  \n";
        let prompt = build_translation_prompt(code, " ruby ", "c");

        assert!(prompt.contains(code));
        assert!(prompt.starts_with("Translate this ruby code to c:"));
    }

    #[test]
    fn test_strip_wrapping_fence() {
        let text = "```python\nprint(1)\nprint(2)\n```\n";
        assert_eq!(strip_code_fences(text), "print(1)\nprint(2)\n");

        let text = "```\nint main() {}\n```";
        assert_eq!(strip_code_fences(text), "int main() {}\n");
    }

    #[test]
    fn test_strip_leaves_plain_text() {
        let text = "x = 1\n```inner```\ny = 2\n";
        assert_eq!(strip_code_fences(text), text);
        assert_eq!(strip_code_fences("puts 1"), "puts 1");
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_translation_prompt("x", "java", "cpp");
        let b = build_translation_prompt("x", "java", "cpp");
        assert_eq!(a, b);
    }
}
