//! Text buffer with a line index.
//!
//! [`TextBuffer`] is the only component that mutates document text. It is backed by a
//! [`ropey::Rope`], which keeps the line index consistent with every edit, and it validates every
//! range before touching the rope. All offsets are character offsets (Unicode scalar values).
//!
//! Only `'\n'` starts a new line.

use crate::error::{EditError, EditResult};
use ropey::Rope;

/// The document text plus its derived line index.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a buffer from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total character count.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` if the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Complete text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Character at `offset`, or `None` at/after the end of the buffer.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        if offset < self.rope.len_chars() {
            Some(self.rope.char(offset))
        } else {
            None
        }
    }

    /// Validate that `offset..offset + len` lies inside the buffer.
    pub fn check_range(&self, offset: usize, len: usize) -> EditResult<()> {
        let total = self.rope.len_chars();
        if offset > total {
            return Err(EditError::InvalidOffset(offset));
        }
        let end = offset.checked_add(len).ok_or(EditError::InvalidRange {
            start: offset,
            end: usize::MAX,
            len: total,
        })?;
        if end > total {
            return Err(EditError::InvalidRange {
                start: offset,
                end,
                len: total,
            });
        }
        Ok(())
    }

    /// Read `len` characters starting at `offset`.
    pub fn read(&self, offset: usize, len: usize) -> EditResult<String> {
        self.check_range(offset, len)?;
        Ok(self.rope.slice(offset..offset + len).to_string())
    }

    /// Read the half-open range `start..end`, clamped to the buffer.
    pub fn slice_clamped(&self, start: usize, end: usize) -> String {
        let total = self.rope.len_chars();
        let end = end.min(total);
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Insert `text` at `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) -> EditResult<()> {
        self.check_range(offset, 0)?;
        if !text.is_empty() {
            self.rope.insert(offset, text);
        }
        Ok(())
    }

    /// Remove `len` characters at `offset`, returning the removed text.
    pub fn remove(&mut self, offset: usize, len: usize) -> EditResult<String> {
        let removed = self.read(offset, len)?;
        if len > 0 {
            self.rope.remove(offset..offset + len);
        }
        Ok(removed)
    }

    /// Replace `len` characters at `offset` with `text`, returning the replaced text.
    pub fn replace(&mut self, offset: usize, len: usize, text: &str) -> EditResult<String> {
        let removed = self.remove(offset, len)?;
        if !text.is_empty() {
            self.rope.insert(offset, text);
        }
        Ok(removed)
    }

    /// Total line count (an empty buffer has one line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line containing `offset` (clamped to the buffer).
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    /// Offset of the first character of `line`; the buffer length for lines past the end.
    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Offset just past the last character of `line`, excluding its `'\n'`.
    pub fn line_end(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        if line + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line + 1) - 1
        } else {
            self.rope.len_chars()
        }
    }

    /// Text of `line` without its trailing newline.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        Some(self.slice_clamped(self.line_start(line), self.line_end(line)))
    }

    /// Convert a character offset into a zero-based `(line, column)` pair.
    pub fn offset_to_position(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        (line, offset - self.rope.line_to_char(line))
    }

    /// Convert a zero-based `(line, column)` pair into a character offset.
    pub fn position_to_offset(&self, line: usize, column: usize) -> EditResult<usize> {
        if line >= self.rope.len_lines() {
            return Err(EditError::InvalidPosition { line, column });
        }
        let start = self.line_start(line);
        let end = self.line_end(line);
        if start + column > end {
            return Err(EditError::InvalidPosition { line, column });
        }
        Ok(start + column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.len_chars(), 0);
        assert_eq!(buffer.line_text(0).as_deref(), Some(""));
    }

    #[test]
    fn test_insert_remove_replace() {
        let mut buffer = TextBuffer::from_text("Hello World");
        buffer.insert(6, "Beautiful ").unwrap();
        assert_eq!(buffer.text(), "Hello Beautiful World");

        let removed = buffer.remove(6, 10).unwrap();
        assert_eq!(removed, "Beautiful ");
        assert_eq!(buffer.text(), "Hello World");

        let replaced = buffer.replace(0, 5, "Howdy").unwrap();
        assert_eq!(replaced, "Hello");
        assert_eq!(buffer.text(), "Howdy World");
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut buffer = TextBuffer::from_text("abc");
        assert_eq!(buffer.insert(4, "x"), Err(EditError::InvalidOffset(4)));
        assert_eq!(
            buffer.remove(2, 2),
            Err(EditError::InvalidRange {
                start: 2,
                end: 4,
                len: 3
            })
        );
        assert!(buffer.read(0, 3).is_ok());
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn test_line_bounds() {
        let buffer = TextBuffer::from_text("ABC\nDEF\nGHI");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line_start(1), 4);
        assert_eq!(buffer.line_end(1), 7);
        assert_eq!(buffer.line_end(2), 11);
        assert_eq!(buffer.line_of_offset(3), 0);
        assert_eq!(buffer.line_of_offset(4), 1);
        assert_eq!(buffer.offset_to_position(8), (2, 0));
        assert_eq!(buffer.position_to_offset(1, 2).unwrap(), 6);
        assert!(buffer.position_to_offset(1, 4).is_err());
    }

    #[test]
    fn test_carriage_return_is_not_a_line_break() {
        let buffer = TextBuffer::from_text("a\rb\nc");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line_text(0).as_deref(), Some("a\rb"));
    }

    #[test]
    fn test_utf8_cjk() {
        let buffer = TextBuffer::from_text("你好\n世界");
        assert_eq!(buffer.len_chars(), 5);
        assert_eq!(buffer.offset_to_position(3), (1, 0));
        assert_eq!(buffer.char_at(1), Some('好'));
    }
}
