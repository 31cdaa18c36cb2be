//! Structural auto-editing.
//!
//! Every function here is pure: it inspects the buffer and describes how a typed character
//! should be rewritten, and the editor applies the result. Caret placements are expressed
//! relative to the insertion offset so no signed arithmetic leaks into callers.

use crate::buffer::TextBuffer;
use crate::config::EngineConfig;
use crate::indent::leading_spaces;
use pyedit_lang::{LanguageConfig, Snippet};

/// How a typed string should actually be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Text to insert (possibly empty).
    pub text: String,
    /// Caret position after insertion, relative to the insertion offset.
    pub caret: usize,
    /// Length of the selection starting at `caret`; 0 for a plain caret.
    pub select: usize,
}

impl Rewrite {
    /// Insert `text` unchanged, caret after it.
    pub fn verbatim(text: &str) -> Self {
        Self {
            text: text.to_string(),
            caret: text.chars().count(),
            select: 0,
        }
    }

    fn swallow(advance: usize) -> Self {
        Self {
            text: String::new(),
            caret: advance,
            select: 0,
        }
    }

    fn pair(open: char, close: char) -> Self {
        Self {
            text: format!("{open}{close}"),
            caret: 1,
            select: 0,
        }
    }

    /// Returns `true` if the input was changed.
    pub fn is_rewritten(&self, input: &str) -> bool {
        self.text != input || self.caret != input.chars().count() || self.select != 0
    }
}

/// A closing character may be auto-inserted at `offset`.
///
/// True at the end of the buffer or before a non-alphanumeric character.
pub fn can_place_closing(buffer: &TextBuffer, offset: usize) -> bool {
    buffer.char_at(offset).is_none_or(|c| !c.is_alphanumeric())
}

struct RowInfo {
    start: usize,
    end: usize,
    text: String,
}

fn row_of(buffer: &TextBuffer, offset: usize) -> RowInfo {
    let line = buffer.line_of_offset(offset);
    let start = buffer.line_start(line);
    let end = buffer.line_end(line);
    RowInfo {
        start,
        end,
        text: buffer.slice_clamped(start, end),
    }
}

/// Rewrite a single typed string at `offset` (no active selection).
///
/// Multi-character input passes through unchanged.
pub fn rewrite_insertion(
    buffer: &TextBuffer,
    offset: usize,
    input: &str,
    lang: &LanguageConfig,
    config: &EngineConfig,
) -> Rewrite {
    let mut chars = input.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Rewrite::verbatim(input);
    };
    let next = buffer.char_at(offset);

    match c {
        ':' | ')' | ']' if next == Some(c) => Rewrite::swallow(1),
        '"' | '\'' if next == Some(c) => Rewrite::swallow(1),
        '(' | '[' | '"' | '\'' if can_place_closing(buffer, offset) => {
            let close = match c {
                '(' => ')',
                '[' => ']',
                quote => quote,
            };
            Rewrite::pair(c, close)
        }
        '\t' => rewrite_tab(buffer, offset, lang, config),
        '\n' => rewrite_newline(buffer, offset, config),
        ' ' if config.auto_complete => expand_snippet(buffer, offset, lang)
            .unwrap_or_else(|| Rewrite::verbatim(input)),
        _ => Rewrite::verbatim(input),
    }
}

/// Caret advance when Tab is pressed right before a snippet's suffix.
///
/// For `def name():` the caret lands inside the parentheses; for `for i in range():` it
/// lands inside `range(`.
pub fn tab_jump(buffer: &TextBuffer, offset: usize, lang: &LanguageConfig) -> Option<usize> {
    let row = row_of(buffer, offset);
    let trimmed_right = row.text.trim_end();
    let trailing = row.text.chars().count() - trimmed_right.chars().count();
    let stripped = trimmed_right.trim_start();

    lang.snippets.iter().find_map(|snippet| {
        let advance = snippet.tab_advance?;
        let suffix = snippet.line_suffix();
        let at = row
            .end
            .checked_sub(trailing + suffix.chars().count())?;
        (stripped.starts_with(&snippet.line_prefix()) && stripped.ends_with(&suffix) && offset == at)
            .then_some(advance)
    })
}

fn rewrite_tab(
    buffer: &TextBuffer,
    offset: usize,
    lang: &LanguageConfig,
    config: &EngineConfig,
) -> Rewrite {
    if let Some(advance) = tab_jump(buffer, offset, lang) {
        tracing::debug!(offset, advance, "tab jumps over snippet placeholder");
        return Rewrite::swallow(advance);
    }
    let unit = config.indent_unit();
    let column = offset - row_of(buffer, offset).start;
    Rewrite::verbatim(&" ".repeat(unit - column % unit))
}

fn rewrite_newline(buffer: &TextBuffer, offset: usize, config: &EngineConfig) -> Rewrite {
    let row = row_of(buffer, offset);
    if offset <= row.start {
        return Rewrite::verbatim("\n");
    }
    let mut text = String::from("\n");
    text.push_str(&" ".repeat(leading_spaces(&row.text)));
    if row.text.trim().ends_with(':') {
        text.push_str(&" ".repeat(config.indent_unit()));
    }
    Rewrite::verbatim(&text)
}

/// The snippet triggered by a Space typed at `offset`, if the row holds only its trigger.
pub fn snippet_at<'a>(
    buffer: &TextBuffer,
    offset: usize,
    lang: &'a LanguageConfig,
) -> Option<&'a Snippet> {
    let row = row_of(buffer, offset);
    lang.snippet_for(row.text.trim_start())
}

fn expand_snippet(buffer: &TextBuffer, offset: usize, lang: &LanguageConfig) -> Option<Rewrite> {
    let snippet = snippet_at(buffer, offset, lang)?;
    tracing::debug!(trigger = %snippet.trigger, "expand snippet");
    Some(Rewrite {
        text: snippet.body.clone(),
        caret: snippet.placeholder.start,
        select: snippet.placeholder.end - snippet.placeholder.start,
    })
}

/// Caret target when Tab is pressed while a snippet placeholder is still selected.
pub fn selection_tab_jump(
    buffer: &TextBuffer,
    start: usize,
    end: usize,
    lang: &LanguageConfig,
) -> Option<usize> {
    let row = row_of(buffer, start);
    let before = buffer.slice_clamped(row.start, start);
    let selected = buffer.slice_clamped(start, end);
    lang.snippets.iter().find_map(|snippet| {
        let advance = snippet.tab_advance?;
        (before.trim_start() == snippet.line_prefix() && selected == snippet.placeholder_text())
            .then_some(end + advance)
    })
}

/// Wrapping text for a quote or bracket typed over a selection.
pub fn wrap_pair(input: &str) -> Option<(char, char)> {
    match input {
        "'" => Some(('\'', '\'')),
        "\"" => Some(('"', '"')),
        "(" => Some(('(', ')')),
        "[" => Some(('[', ']')),
        _ => None,
    }
}

/// Range actually deleted when Backspace removes the character at `offset`.
///
/// An empty auto-pair is deleted as a whole. Inside leading indentation the deletion reaches
/// back to the previous even column.
pub fn backspace_range(buffer: &TextBuffer, offset: usize) -> (usize, usize) {
    let next_two = buffer.slice_clamped(offset, offset + 2);
    if matches!(next_two.as_str(), "()" | "[]" | "\"\"" | "''") {
        return (offset, 2);
    }
    if buffer.char_at(offset) != Some(' ') {
        return (offset, 1);
    }
    let row = row_of(buffer, offset);
    let through = buffer.slice_clamped(row.start, offset + 1);
    if !through.chars().all(|c| c == ' ') {
        return (offset, 1);
    }
    let spaces = offset - row.start + 1;
    if spaces % 2 == 0 {
        (offset - 1, 2)
    } else {
        (offset, 1)
    }
}
