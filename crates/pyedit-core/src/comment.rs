//! Line comment toggling.

use crate::buffer::TextBuffer;
use crate::indent::{is_blank_line, leading_spaces, shift_offset};
use pyedit_lang::CommentConfig;

/// A planned comment toggle over whole lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEdit {
    /// Start offset of the first affected line.
    pub start: usize,
    /// Text currently covering the affected lines.
    pub old_text: String,
    /// Replacement text.
    pub new_text: String,
    /// Selection after the toggle.
    pub selection: (usize, usize),
    /// `true` if lines were commented, `false` if uncommented.
    pub commented: bool,
}

/// Adds or removes line-comment prefixes.
#[derive(Debug, Clone)]
pub struct CommentToggler {
    token: String,
}

impl CommentToggler {
    /// Create a toggler for the given comment configuration.
    pub fn new(config: &CommentConfig) -> Self {
        Self {
            token: config.line_token().to_string(),
        }
    }

    /// Plan a toggle for the lines touched by `start..end`.
    ///
    /// A selection ending at column 0 of a later line does not include that line. Returns
    /// `None` when every touched line is blank.
    pub fn plan(&self, buffer: &TextBuffer, start: usize, end: usize) -> Option<CommentEdit> {
        let (start, end) = (start.min(end), start.max(end));
        let first = buffer.line_of_offset(start);
        let mut last = buffer.line_of_offset(end);
        if last > first && end == buffer.line_start(last) {
            last -= 1;
        }

        let block_start = buffer.line_start(first);
        let block_end = buffer.line_end(last);
        let old_text = buffer.slice_clamped(block_start, block_end);
        let lines: Vec<&str> = old_text.split('\n').collect();

        let anchor = lines
            .iter()
            .filter(|line| !is_blank_line(line))
            .map(|line| leading_spaces(line))
            .min()?;
        let uncomment = lines
            .iter()
            .filter(|line| !is_blank_line(line))
            .all(|line| line[anchor..].starts_with(self.token.as_str()));

        let prefix = format!("{} ", self.token);
        // (offset in old text, chars removed, chars inserted)
        let mut edits: Vec<(usize, usize, usize)> = Vec::new();
        let mut new_lines = Vec::with_capacity(lines.len());
        let mut line_offset = block_start;
        for line in &lines {
            let width = line.chars().count();
            if is_blank_line(line) {
                new_lines.push(line.to_string());
            } else if uncomment {
                let rest = &line[anchor..];
                let cut = if rest.starts_with(prefix.as_str()) {
                    prefix.len()
                } else {
                    self.token.len()
                };
                edits.push((line_offset + anchor, rest[..cut].chars().count(), 0));
                new_lines.push(format!("{}{}", &line[..anchor], &rest[cut..]));
            } else {
                edits.push((line_offset + anchor, 0, prefix.chars().count()));
                new_lines.push(format!("{}{}{}", &line[..anchor], prefix, &line[anchor..]));
            }
            line_offset += width + 1;
        }

        Some(CommentEdit {
            start: block_start,
            old_text: old_text.clone(),
            new_text: new_lines.join("\n"),
            selection: (shift_offset(&edits, start), shift_offset(&edits, end)),
            commented: !uncomment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn toggler() -> CommentToggler {
        CommentToggler::new(&CommentConfig::line("#"))
    }

    #[test]
    fn test_comment_two_lines() {
        let buffer = TextBuffer::from_text("  foo()\n  bar()\n");
        let edit = toggler().plan(&buffer, 0, 16).unwrap();
        assert!(edit.commented);
        assert_eq!(edit.start, 0);
        assert_eq!(edit.old_text, "  foo()\n  bar()");
        assert_eq!(edit.new_text, "  # foo()\n  # bar()");
        assert_eq!(edit.selection, (0, 20));
    }

    #[test]
    fn test_uncomment_removes_hash_with_or_without_space() {
        let buffer = TextBuffer::from_text("  # foo()\n  #bar()");
        let edit = toggler().plan(&buffer, 3, 12).unwrap();
        assert!(!edit.commented);
        assert_eq!(edit.new_text, "  foo()\n  bar()");
        assert_eq!(edit.selection, (2, 10));
    }

    #[test]
    fn test_anchor_is_shallowest_line() {
        let buffer = TextBuffer::from_text("if x:\n  y\n\nz");
        let edit = toggler().plan(&buffer, 0, 12).unwrap();
        assert_eq!(edit.new_text, "# if x:\n#   y\n\n# z");
    }

    #[test]
    fn test_mixed_lines_are_commented() {
        let buffer = TextBuffer::from_text("# a\nb");
        let edit = toggler().plan(&buffer, 0, 5).unwrap();
        assert!(edit.commented);
        assert_eq!(edit.new_text, "# # a\n# b");
    }

    #[test]
    fn test_single_line_uses_own_indent() {
        let buffer = TextBuffer::from_text("x\n    y = 1\nz");
        let edit = toggler().plan(&buffer, 8, 8).unwrap();
        assert_eq!(edit.start, 2);
        assert_eq!(edit.new_text, "    # y = 1");
        assert_eq!(edit.selection, (10, 10));
    }

    #[test]
    fn test_blank_lines_only_is_none() {
        let buffer = TextBuffer::from_text("a\n   \nb");
        assert_eq!(toggler().plan(&buffer, 3, 3), None);
    }
}
