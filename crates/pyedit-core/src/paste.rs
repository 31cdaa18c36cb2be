//! Paste re-indentation and copy memory.

use crate::buffer::TextBuffer;
use crate::indent::{is_blank_line, leading_spaces};

/// The last text copied from this buffer and the indentation captured with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyMemory {
    text: Option<String>,
    indent: usize,
}

impl CopyMemory {
    /// Empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a copy of `start..end`, returning the text and captured indentation width.
    ///
    /// The width is the leading space count of the copied line up to the selection end.
    pub fn capture(&mut self, buffer: &TextBuffer, start: usize, end: usize) -> (String, usize) {
        let text = buffer.slice_clamped(start, end);
        let line_start = buffer.line_start(buffer.line_of_offset(start));
        let indent = leading_spaces(&buffer.slice_clamped(line_start, end));
        self.text = Some(text.clone());
        self.indent = indent;
        (text, indent)
    }

    /// Captured indentation width when `text` is the remembered copy.
    pub fn self_paste_indent(&self, text: &str) -> Option<usize> {
        (self.indent > 0 && self.text.as_deref() == Some(text)).then_some(self.indent)
    }

    /// The remembered text.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The remembered indentation width.
    pub fn indent(&self) -> usize {
        self.indent
    }
}

/// Rewrites pasted text to the indentation of its destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasteReindenter {
    /// Indentation unit added after a colon and removed for pasted `if`/`elif` lines.
    pub unit: usize,
}

impl PasteReindenter {
    /// Create a reindenter using `unit`-space indentation.
    pub fn new(unit: usize) -> Self {
        Self { unit }
    }

    /// Text to insert when pasting `text` at `offset` with no selection.
    pub fn reindent(
        &self,
        buffer: &TextBuffer,
        offset: usize,
        text: &str,
        memory: &CopyMemory,
    ) -> String {
        if text.is_empty() {
            return String::new();
        }
        let self_indent = memory.self_paste_indent(text);
        let text = match self_indent {
            Some(n) => format!("{}{text}", " ".repeat(n)),
            None => text.to_string(),
        };

        let row_start = buffer.line_start(buffer.line_of_offset(offset));
        let at_line_start = offset == row_start;
        let mut base = leading_spaces(&buffer.slice_clamped(row_start, offset));
        let leading_newline = text.starts_with('\n');
        if offset > 0 && buffer.char_at(offset - 1) == Some(':') && leading_newline {
            base += self.unit;
        }

        let mut lines: Vec<&str> = text.split('\n').collect();
        if lines.len() > 1 {
            let include_first = at_line_start || self_indent.is_some();
            let home = lines
                .iter()
                .enumerate()
                .filter(|(i, line)| (*i > 0 || include_first) && !is_blank_line(line))
                .map(|(_, line)| leading_spaces(line))
                .min()
                .unwrap_or(0);
            for (i, line) in lines.iter_mut().enumerate() {
                if i > 0 || at_line_start {
                    let current = *line;
                    let n = leading_spaces(current).min(home);
                    *line = &current[n..];
                }
            }
            if leading_newline {
                let first = lines[1].trim_start();
                if first.starts_with("if ") || first.starts_with("elif ") {
                    base = base.saturating_sub(self.unit);
                }
            }
            tracing::debug!(home, base, self_paste = self_indent.is_some(), "reindent paste");
        }

        let separator = format!("\n{}", " ".repeat(base));
        let mut out = lines.join(&separator);
        if let Some(n) = self_indent {
            let strip = leading_spaces(&out).min(n);
            out.drain(..strip);
        }
        out
    }
}
