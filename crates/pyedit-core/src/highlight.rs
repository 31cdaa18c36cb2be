//! Lexical highlighting.
//!
//! The highlighter stores one [`StyleCategory`] per character. Edits splice that vector and
//! re-tokenize only the touched lines, so the derived [`StyleSpan`] list is always an exact
//! partition of the document. Line overlays (error line, highlighted line, matching brackets)
//! are kept separately and layered on top when spans are produced.
//!
//! Tokenization is line-local: comments run to the end of the line and strings never span
//! lines, which is what makes per-line restyling exact.

use crate::buffer::TextBuffer;
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

/// Classification of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleCategory {
    /// Plain text.
    #[default]
    Default,
    /// Language keyword.
    Keyword,
    /// Identifier known to the host environment.
    EnvironmentWord,
    /// Quoted string, quotes included.
    String,
    /// `#` comment up to the end of the line.
    Comment,
    /// Run of decimal digits.
    Number,
    /// `(`, `[` or `{`.
    OpenParen,
    /// `)`, `]` or `}`.
    CloseParen,
    /// Line reported as the location of an error.
    ErrorLine,
    /// Line highlighted by the host (e.g. while stepping).
    HighlightedLine,
    /// Bracket paired with the one next to the caret.
    MatchingBracket,
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StyleCategory::Default => "default",
            StyleCategory::Keyword => "keyword",
            StyleCategory::EnvironmentWord => "environment-word",
            StyleCategory::String => "string",
            StyleCategory::Comment => "comment",
            StyleCategory::Number => "number",
            StyleCategory::OpenParen => "open-paren",
            StyleCategory::CloseParen => "close-paren",
            StyleCategory::ErrorLine => "error-line",
            StyleCategory::HighlightedLine => "highlighted-line",
            StyleCategory::MatchingBracket => "matching-bracket",
        };
        f.write_str(name)
    }
}

/// A styled half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSpan {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
    /// Category of every character in the range.
    pub category: StyleCategory,
}

impl StyleSpan {
    /// Span length in chars.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the span covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Word sets driving keyword and environment-word classification.
///
/// A context starts unpopulated; the editor fills it lazily on the first mutation or when the
/// host calls `set_highlight_context`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightContext {
    keywords: HashSet<String>,
    environment_words: HashSet<String>,
    populated: bool,
}

impl HighlightContext {
    /// An unpopulated context.
    pub fn new() -> Self {
        Self::default()
    }

    /// A populated context built from the given word lists.
    pub fn with_words<K, E>(keywords: K, environment_words: E) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        let mut ctx = Self::new();
        ctx.set(keywords, environment_words);
        ctx
    }

    /// Replace both word sets and mark the context populated.
    pub fn set<K, E>(&mut self, keywords: K, environment_words: E)
    where
        K: IntoIterator,
        K::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self.environment_words = environment_words.into_iter().map(Into::into).collect();
        self.populated = true;
    }

    /// Whether the context has been filled.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Whether `word` is a keyword.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }

    /// Whether `word` is an environment word.
    pub fn is_environment_word(&self, word: &str) -> bool {
        self.environment_words.contains(word)
    }

    /// Number of keywords.
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    /// Number of environment words.
    pub fn environment_word_count(&self) -> usize {
        self.environment_words.len()
    }
}

fn is_word_break(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t'
            | '\r'
            | '\n'
            | '['
            | ']'
            | '{'
            | '}'
            | '('
            | ')'
            | ','
            | '\''
            | '"'
            | '-'
            | '+'
            | '='
            | '<'
            | '>'
            | ':'
            | ';'
            | '.'
            | '#'
            | '%'
            | '*'
            | '/'
            | '&'
            | '|'
            | '!'
            | '^'
            | '~'
            | '@'
    )
}

/// Classify every character of a single line (no `'\n'`).
pub fn tokenize_line(line: &str, ctx: &HighlightContext) -> Vec<StyleCategory> {
    let chars: Vec<char> = line.chars().collect();
    let n = chars.len();
    let mut out = vec![StyleCategory::Default; n];
    let mut i = 0;

    while i < n {
        let c = chars[i];
        match c {
            '#' => {
                out[i..].fill(StyleCategory::Comment);
                break;
            }
            '"' | '\'' => {
                let mut j = i + 1;
                let mut close = None;
                while j < n {
                    if chars[j] == '\\' {
                        j += 2;
                        continue;
                    }
                    if chars[j] == c {
                        close = Some(j);
                        break;
                    }
                    j += 1;
                }
                match close {
                    Some(end) => {
                        out[i..=end].fill(StyleCategory::String);
                        i = end + 1;
                    }
                    // An unterminated quote is plain text.
                    None => i += 1,
                }
            }
            '(' | '[' | '{' => {
                out[i] = StyleCategory::OpenParen;
                i += 1;
            }
            ')' | ']' | '}' => {
                out[i] = StyleCategory::CloseParen;
                i += 1;
            }
            c if is_word_break(c) => i += 1,
            _ => {
                let start = i;
                while i < n && !is_word_break(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let category = if word.chars().all(|c| c.is_ascii_digit()) {
                    StyleCategory::Number
                } else if ctx.is_keyword(&word) {
                    StyleCategory::Keyword
                } else if ctx.is_environment_word(&word) {
                    StyleCategory::EnvironmentWord
                } else {
                    StyleCategory::Default
                };
                out[start..i].fill(category);
            }
        }
    }
    out
}

/// Per-character style storage plus line overlays.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    base: Vec<StyleCategory>,
    error_line: Option<Range<usize>>,
    highlighted_line: Option<Range<usize>>,
    matching: Vec<usize>,
}

impl StyleMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of styled characters.
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Returns `true` if nothing is styled.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Re-tokenize the whole buffer.
    pub fn restyle_all(&mut self, buffer: &TextBuffer, ctx: &HighlightContext) {
        self.base = vec![StyleCategory::Default; buffer.len_chars()];
        let last = buffer.line_count().saturating_sub(1);
        self.restyle_lines(buffer, 0, last, ctx);
    }

    /// Re-tokenize every line intersecting `range`.
    pub fn restyle(&mut self, buffer: &TextBuffer, range: Range<usize>, ctx: &HighlightContext) {
        if self.base.len() != buffer.len_chars() {
            self.restyle_all(buffer, ctx);
            return;
        }
        let first = buffer.line_of_offset(range.start);
        let last = buffer.line_of_offset(range.end.max(range.start));
        self.restyle_lines(buffer, first, last, ctx);
    }

    /// Account for an edit already applied to `buffer`, then restyle the touched lines.
    pub fn apply_edit(
        &mut self,
        buffer: &TextBuffer,
        offset: usize,
        removed_len: usize,
        inserted_len: usize,
        ctx: &HighlightContext,
    ) {
        let end = (offset + removed_len).min(self.base.len());
        if offset <= end && end <= self.base.len() {
            self.base.splice(
                offset..end,
                std::iter::repeat_n(StyleCategory::Default, inserted_len),
            );
        }
        self.restyle(buffer, offset..offset + inserted_len, ctx);
    }

    fn restyle_lines(
        &mut self,
        buffer: &TextBuffer,
        first: usize,
        last: usize,
        ctx: &HighlightContext,
    ) {
        for line in first..=last.min(buffer.line_count().saturating_sub(1)) {
            let start = buffer.line_start(line);
            let end = buffer.line_end(line);
            let text = buffer.slice_clamped(start, end);
            let categories = tokenize_line(&text, ctx);
            self.base[start..end].copy_from_slice(&categories);
            // The newline itself is plain text.
            if end < self.base.len() {
                self.base[end] = StyleCategory::Default;
            }
        }
        tracing::trace!(first, last, "restyled lines");
    }

    /// Mark `range` as the error line, replacing any previous error overlay.
    pub fn set_error_line(&mut self, range: Option<Range<usize>>) {
        self.error_line = range;
    }

    /// Mark `range` as the highlighted line.
    pub fn set_highlighted_line(&mut self, range: Option<Range<usize>>) {
        self.highlighted_line = range;
    }

    /// Mark the given bracket offsets as matching.
    pub fn set_matching(&mut self, offsets: Vec<usize>) {
        self.matching = offsets;
    }

    /// Current error overlay.
    pub fn error_line(&self) -> Option<Range<usize>> {
        self.error_line.clone()
    }

    /// Current highlighted-line overlay.
    pub fn highlighted_line(&self) -> Option<Range<usize>> {
        self.highlighted_line.clone()
    }

    /// Offsets currently styled as matching brackets.
    pub fn matching(&self) -> &[usize] {
        &self.matching
    }

    /// Lexical category at `offset`, ignoring overlays.
    pub fn base_category_at(&self, offset: usize) -> Option<StyleCategory> {
        self.base.get(offset).copied()
    }

    /// Effective category at `offset`, overlays included.
    pub fn category_at(&self, offset: usize) -> Option<StyleCategory> {
        let base = self.base.get(offset).copied()?;
        if self.matching.contains(&offset) {
            return Some(StyleCategory::MatchingBracket);
        }
        if self.error_line.as_ref().is_some_and(|r| r.contains(&offset)) {
            return Some(StyleCategory::ErrorLine);
        }
        if self
            .highlighted_line
            .as_ref()
            .is_some_and(|r| r.contains(&offset))
        {
            return Some(StyleCategory::HighlightedLine);
        }
        Some(base)
    }

    /// The span partition of `[0, len)`, sorted and non-overlapping.
    pub fn spans(&self) -> Vec<StyleSpan> {
        let mut spans: Vec<StyleSpan> = Vec::new();
        for offset in 0..self.base.len() {
            let category = self.category_at(offset).unwrap_or_default();
            match spans.last_mut() {
                Some(last) if last.category == category => last.end = offset + 1,
                _ => spans.push(StyleSpan {
                    start: offset,
                    end: offset + 1,
                    category,
                }),
            }
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StyleCategory::*;

    fn ctx() -> HighlightContext {
        HighlightContext::with_words(["def", "if", "print"], ["makePicture"])
    }

    #[test]
    fn test_keywords_numbers_and_parens() {
        let cats = tokenize_line("if x1 (42)", &ctx());
        assert_eq!(
            cats,
            vec![
                Keyword, Keyword, Default, Default, Default, Default, OpenParen, Number, Number,
                CloseParen
            ]
        );
    }

    #[test]
    fn test_arithmetic_operators_break_runs() {
        assert_eq!(tokenize_line("2*3", &ctx()), vec![Number, Default, Number]);
        assert_eq!(
            tokenize_line("10/2", &ctx()),
            vec![Number, Number, Default, Number]
        );
        let cats = tokenize_line("x*print", &ctx());
        assert_eq!(cats[..2], [Default, Default]);
        assert!(cats[2..].iter().all(|c| *c == Keyword));
    }

    #[test]
    fn test_bitwise_and_decorator_operators_break_runs() {
        let cats = tokenize_line("@print|a&b^~1!", &ctx());
        assert_eq!(cats[0], Default);
        assert!(cats[1..6].iter().all(|c| *c == Keyword));
        assert_eq!(cats[12], Number);
    }

    #[test]
    fn test_underscore_keeps_identifier_whole() {
        let cats = tokenize_line("print_it", &ctx());
        assert!(cats.iter().all(|c| *c == Default));
    }

    #[test]
    fn test_environment_word_after_keyword_check() {
        let cats = tokenize_line("makePicture(f)", &ctx());
        assert_eq!(cats[0], EnvironmentWord);
        assert_eq!(cats[10], EnvironmentWord);
        assert_eq!(cats[11], OpenParen);
    }

    #[test]
    fn test_comment_runs_to_end_of_line() {
        let cats = tokenize_line("x = 1 # if (", &ctx());
        assert_eq!(cats[4], Number);
        assert!(cats[6..].iter().all(|c| *c == Comment));
    }

    #[test]
    fn test_strings_with_escapes() {
        let line = r#"s = "a\"b" + 'c'"#;
        let cats = tokenize_line(line, &ctx());
        assert!(cats[4..10].iter().all(|c| *c == String));
        assert_eq!(cats[10], Default);
        assert!(cats[13..16].iter().all(|c| *c == String));
    }

    #[test]
    fn test_unterminated_quote_is_default() {
        let cats = tokenize_line("'if", &ctx());
        assert_eq!(cats, vec![Default, Keyword, Keyword]);
    }

    #[test]
    fn test_hash_inside_string_is_not_comment() {
        let cats = tokenize_line("'#' 1", &ctx());
        assert_eq!(cats, vec![String, String, String, Default, Number]);
    }

    #[test]
    fn test_spans_partition_with_overlays() {
        let buffer = TextBuffer::from_text("if x:\n  print(1)\n");
        let mut map = StyleMap::new();
        map.restyle_all(&buffer, &ctx());
        map.set_error_line(Some(6..16));
        map.set_matching(vec![13, 15]);

        let spans = map.spans();
        assert_eq!(spans.first().map(|s| s.start), Some(0));
        assert_eq!(spans.last().map(|s| s.end), Some(buffer.len_chars()));
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_ne!(pair[0].category, pair[1].category);
        }
        assert_eq!(map.category_at(13), Some(MatchingBracket));
        assert_eq!(map.category_at(7), Some(ErrorLine));
        assert_eq!(map.base_category_at(8), Some(Keyword));
    }

    #[test]
    fn test_apply_edit_restyles_touched_line() {
        let mut buffer = TextBuffer::from_text("x\npri\n");
        let mut map = StyleMap::new();
        map.restyle_all(&buffer, &ctx());
        assert_eq!(map.base_category_at(2), Some(Default));

        buffer.insert(5, "nt").unwrap();
        map.apply_edit(&buffer, 5, 0, 2, &ctx());
        assert_eq!(map.len(), buffer.len_chars());
        assert_eq!(map.base_category_at(2), Some(Keyword));

        let removed = buffer.remove(2, 5).unwrap();
        map.apply_edit(&buffer, 2, removed.chars().count(), 0, &ctx());
        assert_eq!(map.len(), buffer.len_chars());
        assert_eq!(buffer.text(), "x\n\n");
    }

    #[test]
    fn test_empty_document_has_no_spans() {
        let map = StyleMap::new();
        assert!(map.spans().is_empty());
    }
}
