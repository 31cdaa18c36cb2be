//! Help lookups for the caret position.
//!
//! Hosts show documentation for the identifier under the caret or, when the caret sits inside
//! a call's parentheses, for the called function together with the argument being typed.

use crate::brackets::{Direction, find_match};
use crate::buffer::TextBuffer;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// What the host should describe for the caret position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpContext {
    /// Identifier to look up.
    pub word: String,
    /// Zero-based argument index when the caret is inside a call to `word`.
    pub argument: Option<usize>,
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Column range of the identifier touching `column` in `line`.
///
/// An identifier containing the column wins over one ending at it.
pub fn identifier_at(line: &str, column: usize) -> Option<Range<usize>> {
    let mut touching = None;
    let mut start = 0;
    for segment in line.split_word_bounds() {
        let end = start + segment.chars().count();
        if is_identifier(segment) {
            if start <= column && column < end {
                return Some(start..end);
            }
            if end == column {
                touching = Some(start..end);
            }
        }
        if start > column {
            break;
        }
        start = end;
    }
    touching
}

fn word_at(buffer: &TextBuffer, offset: usize) -> Option<String> {
    let line = buffer.line_of_offset(offset);
    let line_start = buffer.line_start(line);
    let text = buffer.line_text(line)?;
    let range = identifier_at(&text, offset - line_start)?;
    Some(text.chars().skip(range.start).take(range.len()).collect())
}

/// Offset of the `(` of the innermost call enclosing `offset` and the argument index.
///
/// The call must be closed somewhere at or after `offset`.
pub fn enclosing_call(buffer: &TextBuffer, offset: usize) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut commas = 0usize;
    let mut pos = offset.min(buffer.len_chars());
    let open = loop {
        pos = pos.checked_sub(1)?;
        match buffer.char_at(pos)? {
            ')' => depth += 1,
            '(' if depth == 0 => break pos,
            '(' => depth -= 1,
            ',' if depth == 0 => commas += 1,
            _ => {}
        }
    };
    let close = find_match(buffer, open, '(', Direction::Forward)?;
    (close >= offset).then_some((open, commas))
}

/// Help context for `offset`.
pub fn help_context(buffer: &TextBuffer, offset: usize) -> Option<HelpContext> {
    if let Some(word) = word_at(buffer, offset) {
        return Some(HelpContext {
            word,
            argument: None,
        });
    }
    let (open, argument) = enclosing_call(buffer, offset)?;
    let line = buffer.line_of_offset(open);
    let line_start = buffer.line_start(line);
    let text = buffer.line_text(line)?;
    let column = open - line_start;
    let range = identifier_at(&text, column).filter(|r| r.end == column)?;
    Some(HelpContext {
        word: text.chars().skip(range.start).take(range.len()).collect(),
        argument: Some(argument),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_at() {
        assert_eq!(identifier_at("x = my_pic + 1", 6), Some(4..10));
        assert_eq!(identifier_at("x = my_pic + 1", 10), Some(4..10));
        assert_eq!(identifier_at("x = my_pic + 1", 12), None);
        assert_eq!(identifier_at("42", 1), None);
    }

    #[test]
    fn test_word_under_caret() {
        let buffer = TextBuffer::from_text("show(pic)");
        assert_eq!(
            help_context(&buffer, 2),
            Some(HelpContext {
                word: "show".into(),
                argument: None
            })
        );
    }

    #[test]
    fn test_argument_index_inside_call() {
        let buffer = TextBuffer::from_text("setColor(px, makeColor(1, 2), 3 )");
        let ctx = help_context(&buffer, 32).unwrap();
        assert_eq!(ctx.word, "setColor");
        assert_eq!(ctx.argument, Some(2));

        let ctx = help_context(&buffer, 26).unwrap();
        assert_eq!(ctx.word, "makeColor");
        assert_eq!(ctx.argument, Some(1));
    }

    #[test]
    fn test_unclosed_call_has_no_context() {
        let buffer = TextBuffer::from_text("f(1, ");
        assert_eq!(help_context(&buffer, 5), None);
        assert_eq!(enclosing_call(&buffer, 5), None);
    }
}
