#![warn(missing_docs)]
//! `pyedit-lang` - data-driven language configuration for `pyedit-core`.
//!
//! This crate stays dependency-free. It describes *what* a language looks like to the editing
//! engine (comment tokens, keywords, snippet expansions) without any scanning logic of its own.

use std::ops::Range;

/// Comment tokens/config for a given language.
///
/// The engine uses the line token to implement comment toggling.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `#`).
    pub line: Option<String>,
    /// Block comment start token (e.g. `"""`).
    pub block_start: Option<String>,
    /// Block comment end token.
    pub block_end: Option<String>,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
            block_start: None,
            block_end: None,
        }
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// The line comment token, falling back to `#`.
    pub fn line_token(&self) -> &str {
        self.line.as_deref().filter(|s| !s.is_empty()).unwrap_or("#")
    }
}

/// A keyword-triggered expansion typed after a bare statement keyword.
///
/// `body` is inserted right after the trigger word when the user types a space on a line that
/// contains nothing but the trigger. The `placeholder` range (char offsets into `body`) is
/// selected afterwards so the user can overtype it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// Statement keyword that triggers the expansion (e.g. `def`).
    pub trigger: String,
    /// Text inserted after the trigger, including the leading space.
    pub body: String,
    /// Placeholder token inside `body`, in chars.
    pub placeholder: Range<usize>,
    /// How far Tab moves the caret once the placeholder has been typed over.
    ///
    /// `None` disables the Tab jump for this snippet.
    pub tab_advance: Option<usize>,
}

impl Snippet {
    /// Create a snippet without a Tab jump.
    pub fn new(trigger: impl Into<String>, body: impl Into<String>, placeholder: Range<usize>) -> Self {
        Self {
            trigger: trigger.into(),
            body: body.into(),
            placeholder,
            tab_advance: None,
        }
    }

    /// Enable the Tab jump, advancing the caret by `advance` chars.
    pub fn with_tab_advance(mut self, advance: usize) -> Self {
        self.tab_advance = Some(advance);
        self
    }

    /// The placeholder text (e.g. `methodName`).
    pub fn placeholder_text(&self) -> String {
        self.body
            .chars()
            .skip(self.placeholder.start)
            .take(self.placeholder.end.saturating_sub(self.placeholder.start))
            .collect()
    }

    /// Text the line starts with once the snippet has been expanded (`def `).
    pub fn line_prefix(&self) -> String {
        format!("{} ", self.trigger)
    }

    /// Text that follows the placeholder up to the end of the line (`():`).
    pub fn line_suffix(&self) -> String {
        self.body.chars().skip(self.placeholder.end).collect()
    }
}

/// Everything the engine needs to know about the edited language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Comment tokens.
    pub comment: CommentConfig,
    /// Default keyword set used to populate the highlight context.
    pub keywords: Vec<String>,
    /// Keyword-triggered expansions.
    pub snippets: Vec<Snippet>,
    /// Character that expands into `template` when typed into an empty buffer.
    pub template_trigger: char,
    /// Bootstrap program inserted by `template_trigger`.
    pub template: String,
}

/// Python keyword list (the 2.x set, which includes `print` and `exec`).
pub const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else", "except",
    "exec", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "not", "or",
    "pass", "print", "raise", "return", "try", "while", "with", "yield",
];

impl LanguageConfig {
    /// The Python configuration: `#` comments, Python keywords and the statement snippets.
    pub fn python() -> Self {
        Self {
            comment: CommentConfig::line("#"),
            keywords: PYTHON_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            snippets: vec![
                Snippet::new("def", " methodName():", 1..11).with_tab_advance(1),
                Snippet::new("if", " condition:", 1..10),
                Snippet::new("elif", " condition:", 1..10),
                Snippet::new("for", " i in range():", 1..2).with_tab_advance(10),
                Snippet::new("while", " condition:", 1..10),
            ],
            template_trigger: '~',
            template: concat!(
                "def greet(name):\n",
                "  print(\"Hello, \" + name + \"!\")\n",
                "  print(\"Welcome!\")"
            )
            .to_string(),
        }
    }

    /// Find the snippet triggered by a line whose trimmed content is `word`.
    pub fn snippet_for(&self, word: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.trigger == word)
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self::python()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_parts() {
        let lang = LanguageConfig::python();
        let def = lang.snippet_for("def").unwrap();
        assert_eq!(def.placeholder_text(), "methodName");
        assert_eq!(def.line_prefix(), "def ");
        assert_eq!(def.line_suffix(), "():");

        let for_loop = lang.snippet_for("for").unwrap();
        assert_eq!(for_loop.placeholder_text(), "i");
        assert_eq!(for_loop.line_suffix(), " in range():");
        assert_eq!(for_loop.tab_advance, Some(10));
    }

    #[test]
    fn test_every_placeholder_is_inside_body() {
        for snippet in LanguageConfig::python().snippets {
            assert!(snippet.placeholder.end <= snippet.body.chars().count());
            assert!(!snippet.placeholder_text().trim().is_empty());
        }
    }

    #[test]
    fn test_comment_token_fallback() {
        assert_eq!(CommentConfig::default().line_token(), "#");
        assert_eq!(CommentConfig::line("//").line_token(), "//");
        assert!(!CommentConfig::default().has_line());
    }
}
