//! Bracket matching.

use crate::buffer::TextBuffer;

/// Scan direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Rightward, starting from an opening bracket.
    Forward,
    /// Leftward, starting from a closing bracket.
    Backward,
}

/// Result of resolving the bracket next to the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchState {
    /// No highlighted pair.
    #[default]
    NoMatch,
    /// Offsets of the opening and closing bracket.
    Matched(usize, usize),
    /// The document changed; resolved on the next caret update.
    Pending,
}

impl MatchState {
    /// The matched pair, if any.
    pub fn pair(&self) -> Option<(usize, usize)> {
        match self {
            MatchState::Matched(open, close) => Some((*open, *close)),
            _ => None,
        }
    }
}

/// The `(open, close)` pair a bracket belongs to.
pub fn bracket_pair(c: char) -> Option<(char, char)> {
    match c {
        '(' | ')' => Some(('(', ')')),
        '[' | ']' => Some(('[', ']')),
        '{' | '}' => Some(('{', '}')),
        _ => None,
    }
}

/// Find the bracket paired with `bracket` at `offset`.
///
/// Nested brackets of the same kind are skipped by depth counting. Returns `None` when the scan
/// runs off the buffer.
pub fn find_match(
    buffer: &TextBuffer,
    offset: usize,
    bracket: char,
    direction: Direction,
) -> Option<usize> {
    let (open, close) = bracket_pair(bracket)?;
    let (same, target) = match direction {
        Direction::Forward => (open, close),
        Direction::Backward => (close, open),
    };
    let mut depth = 0usize;
    let mut pos = offset;
    loop {
        pos = match direction {
            Direction::Forward => pos + 1,
            Direction::Backward => pos.checked_sub(1)?,
        };
        let c = buffer.char_at(pos)?;
        if c == same {
            depth += 1;
        } else if c == target {
            if depth == 0 {
                return Some(pos);
            }
            depth -= 1;
        }
    }
}

/// Returns `true` if a `#` precedes `offset` on its line.
pub fn caret_in_comment(buffer: &TextBuffer, offset: usize) -> bool {
    let line = buffer.line_of_offset(offset);
    let start = buffer.line_start(line);
    buffer.slice_clamped(start, offset).contains('#')
}

/// Resolve the bracket pair touching `offset`.
///
/// The character after the caret wins over the one before it, except that a closing bracket
/// right before the caret is preferred when the next character differs. Pairs enclosing nothing
/// are not reported.
pub fn match_at_caret(buffer: &TextBuffer, offset: usize) -> MatchState {
    if caret_in_comment(buffer, offset) {
        return MatchState::NoMatch;
    }
    let next = buffer.char_at(offset);
    let prev = offset.checked_sub(1).and_then(|p| buffer.char_at(p));

    for (open, close) in [('(', ')'), ('[', ']')] {
        if next == Some(open) || prev == Some(open) {
            let at = if next == Some(open) && next != prev {
                offset
            } else {
                offset - 1
            };
            return match find_match(buffer, at, open, Direction::Forward) {
                Some(end) if end - at > 1 => MatchState::Matched(at, end),
                _ => MatchState::NoMatch,
            };
        }
        if next == Some(close) || prev == Some(close) {
            let at = if prev == Some(close) && next != prev {
                offset - 1
            } else {
                offset
            };
            return match find_match(buffer, at, close, Direction::Backward) {
                Some(start) if at - start > 1 => MatchState::Matched(start, at),
                _ => MatchState::NoMatch,
            };
        }
    }
    MatchState::NoMatch
}
