//! Text search.
//!
//! Queries are matched over a UTF-8 `&str` but every input and output is a **character offset**.
//! Plain queries are escaped and compiled into a regex so that case folding and whole-word
//! filtering share one code path with regex queries.
//!
//! [`search_wrapping`] implements the editor's "search from the caret, wrap once" behavior as a
//! loop with an explicit wrapped flag.

use crate::error::{EditError, EditResult};
use regex::{Regex, RegexBuilder};

/// Options that control how a query is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Match case exactly.
    pub case_sensitive: bool,
    /// Only accept matches not surrounded by word characters.
    pub whole_word: bool,
    /// Treat the query as a regex pattern.
    pub regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
            regex: false,
        }
    }
}

/// A half-open character range found by a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl SearchMatch {
    /// Match length in chars.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for an empty match.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Direction of an editor search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    /// Toward the end of the buffer.
    Forward,
    /// Toward the start of the buffer.
    Backward,
}

#[derive(Debug)]
pub(crate) struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .copied()
            .unwrap_or(self.text_len)
    }

    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) | Err(idx) => idx,
        }
    }

    fn char_at(&self, text: &str, char_offset: usize) -> Option<char> {
        if char_offset >= self.char_count() {
            return None;
        }
        let start = self.char_to_byte[char_offset];
        let end = self.char_to_byte[char_offset + 1];
        text.get(start..end)?.chars().next()
    }
}

fn compile(query: &str, options: SearchOptions) -> EditResult<Regex> {
    let pattern = if options.regex {
        query.to_string()
    } else {
        regex::escape(query)
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .multi_line(true)
        .build()
        .map_err(|err| EditError::InvalidSearch(err.to_string()))
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_whole_word(text: &str, index: &CharIndex, m: SearchMatch) -> bool {
    let before = m
        .start
        .checked_sub(1)
        .and_then(|p| index.char_at(text, p));
    let after = index.char_at(text, m.end);
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn to_match(index: &CharIndex, m: regex::Match<'_>) -> SearchMatch {
    SearchMatch {
        start: index.byte_to_char(m.start()),
        end: index.byte_to_char(m.end()),
    }
}

/// First match of `query` starting at or after `from`.
pub fn find_next(
    text: &str,
    query: &str,
    options: SearchOptions,
    from: usize,
) -> EditResult<Option<SearchMatch>> {
    if query.is_empty() {
        return Ok(None);
    }
    let re = compile(query, options)?;
    let index = CharIndex::new(text);

    let mut start_char = from.min(index.char_count());
    loop {
        let Some(m) = re.find_at(text, index.char_to_byte(start_char)) else {
            return Ok(None);
        };
        let candidate = to_match(&index, m);
        if candidate.is_empty() {
            if candidate.end >= index.char_count() {
                return Ok(None);
            }
            start_char = candidate.end + 1;
            continue;
        }
        if options.whole_word && !is_whole_word(text, &index, candidate) {
            start_char = candidate.start + 1;
            continue;
        }
        return Ok(Some(candidate));
    }
}

/// Last match of `query` lying entirely before `until`.
pub fn find_prev(
    text: &str,
    query: &str,
    options: SearchOptions,
    until: usize,
) -> EditResult<Option<SearchMatch>> {
    if query.is_empty() {
        return Ok(None);
    }
    let re = compile(query, options)?;
    let index = CharIndex::new(text);
    let limit = index.char_to_byte(until);

    let mut last = None;
    for m in re.find_iter(&text[..limit]) {
        let candidate = to_match(&index, m);
        if candidate.is_empty() {
            continue;
        }
        if options.whole_word && !is_whole_word(text, &index, candidate) {
            continue;
        }
        last = Some(candidate);
    }
    Ok(last)
}

/// Search from `caret`, wrapping around the buffer at most once.
///
/// A forward search that misses restarts at the buffer start; a backward search that misses
/// restarts at the buffer end. No wrap happens when the first pass already covered the whole
/// buffer.
pub fn search_wrapping(
    text: &str,
    query: &str,
    options: SearchOptions,
    caret: usize,
    direction: SearchDirection,
) -> EditResult<Option<SearchMatch>> {
    let len = text.chars().count();
    let mut from = caret.min(len);
    let mut wrapped = false;
    loop {
        let found = match direction {
            SearchDirection::Forward => find_next(text, query, options, from)?,
            SearchDirection::Backward => find_prev(text, query, options, from)?,
        };
        if found.is_some() || wrapped {
            return Ok(found);
        }
        let restart = match direction {
            SearchDirection::Forward => 0,
            SearchDirection::Backward => len,
        };
        if from == restart {
            return Ok(None);
        }
        tracing::debug!(query, ?direction, "search wrapped");
        from = restart;
        wrapped = true;
    }
}
