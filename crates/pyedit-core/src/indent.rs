//! Indentation analysis.
//!
//! Rows are zero-based buffer lines. Indentation is measured in leading space characters only;
//! the engine never inserts tabs.

use crate::buffer::TextBuffer;
use unicode_width::UnicodeWidthStr;

/// Leading space count of a single line.
pub fn leading_spaces(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count()
}

/// Returns `true` if `line` holds nothing but spaces.
pub fn is_blank_line(line: &str) -> bool {
    line.chars().all(|c| c == ' ')
}

/// Leading space count of `row`; 0 for rows past the end.
pub fn indent_width(buffer: &TextBuffer, row: usize) -> usize {
    buffer.line_text(row).map_or(0, |line| leading_spaces(&line))
}

/// Returns `true` if `row` contains only spaces.
pub fn is_blank(buffer: &TextBuffer, row: usize) -> bool {
    buffer.line_text(row).is_some_and(|line| is_blank_line(&line))
}

/// Inclusive row range of the indentation block containing `row`.
///
/// The block grows upward and downward over rows indented at least as deep as `row`, passing
/// through blank rows. Blank rows at either edge are trimmed, except `row` itself. Returns
/// `None` for rows past the end of the buffer.
pub fn block_extent(buffer: &TextBuffer, row: usize) -> Option<(usize, usize)> {
    if row >= buffer.line_count() {
        return None;
    }
    let indent = indent_width(buffer, row);
    let belongs = |r: usize| is_blank(buffer, r) || indent_width(buffer, r) >= indent;

    let mut top = row;
    while top > 0 && belongs(top - 1) {
        top -= 1;
    }
    let mut bottom = row;
    while bottom + 1 < buffer.line_count() && belongs(bottom + 1) {
        bottom += 1;
    }

    while top < row && is_blank(buffer, top) {
        top += 1;
    }
    while bottom > row && is_blank(buffer, bottom) {
        bottom -= 1;
    }
    Some((top, bottom))
}

/// Outline of the block surrounding a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOutline {
    /// First row of the block.
    pub first_row: usize,
    /// Last row of the block (inclusive).
    pub last_row: usize,
    /// Indentation of the row the outline was computed for.
    pub indent: usize,
    /// Widest display width among the block's rows, in terminal cells.
    pub width: usize,
}

/// Block outline for `row`.
///
/// Unavailable for unindented rows and rows past the end.
pub fn block_outline(buffer: &TextBuffer, row: usize) -> Option<BlockOutline> {
    let indent = indent_width(buffer, row);
    if indent == 0 {
        return None;
    }
    let (first_row, last_row) = block_extent(buffer, row)?;
    let width = (first_row..=last_row)
        .filter_map(|r| buffer.line_text(r))
        .map(|line| UnicodeWidthStr::width(line.as_str()))
        .max()
        .unwrap_or(0);
    Some(BlockOutline {
        first_row,
        last_row,
        indent,
        width,
    })
}

/// A vertical guide drawn at `column` across rows `first_row..=last_row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentGuide {
    /// Row that opens the block.
    pub owner_row: usize,
    /// Indentation column of the owner row.
    pub column: usize,
    /// First guided row.
    pub first_row: usize,
    /// Last guided row (inclusive).
    pub last_row: usize,
}

/// Guides for every row followed by deeper-indented rows.
///
/// Empty rows never own a guide but do not end one; trailing empty rows are trimmed.
pub fn indent_guides(buffer: &TextBuffer) -> Vec<IndentGuide> {
    // None marks a zero-length row.
    let indents: Vec<Option<usize>> = (0..buffer.line_count())
        .map(|r| {
            buffer
                .line_text(r)
                .filter(|line| !line.is_empty())
                .map(|line| leading_spaces(&line))
        })
        .collect();

    let mut guides = Vec::new();
    for (i, indent) in indents.iter().enumerate() {
        let Some(column) = *indent else {
            continue;
        };
        if indents.get(i + 1).is_none_or(|next| next.is_none()) {
            continue;
        }
        let mut end = i;
        for (y, deeper) in indents.iter().enumerate().skip(i + 1) {
            if deeper.is_some_and(|d| d <= column) {
                break;
            }
            end = y;
        }
        while end > i && indents[end].is_none() {
            end -= 1;
        }
        if end > i {
            guides.push(IndentGuide {
                owner_row: i,
                column,
                first_row: i + 1,
                last_row: end,
            });
        }
    }
    guides
}

/// Prefix every line of `text` with `unit` spaces.
pub fn indent_text(text: &str, unit: usize) -> String {
    let pad = " ".repeat(unit);
    text.split('\n')
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove up to `unit` leading spaces from every line of `text`.
///
/// Returns the new text and the number of spaces removed from each line.
pub fn dedent_text(text: &str, unit: usize) -> (String, Vec<usize>) {
    let mut removed = Vec::new();
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| {
            let n = leading_spaces(line).min(unit);
            removed.push(n);
            &line[n..]
        })
        .collect();
    (lines.join("\n"), removed)
}

/// Map `offset` through line-prefix edits given as `(at, removed, inserted)`.
///
/// Edits are listed in ascending order with `at` in pre-edit coordinates. An offset inside a
/// removed range collapses to the start of that range.
pub fn shift_offset(edits: &[(usize, usize, usize)], offset: usize) -> usize {
    let mut mapped = offset;
    for &(at, removed, inserted) in edits {
        if offset >= at + removed {
            mapped = mapped + inserted - removed;
        } else if offset > at {
            mapped -= offset - at;
        }
    }
    mapped
}
