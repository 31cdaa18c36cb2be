//! Structured text change deltas.
//!
//! Every document change notification carries a [`TextDelta`] so listeners (gutters, outline
//! views, external indexers) can follow the buffer without diffing old and new text. Offsets are
//! character offsets.

/// One edit expressed in character offsets.
///
/// `start` is an offset in the document as it was when this edit was applied; edits inside a
/// [`TextDelta`] apply in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDeltaEdit {
    /// Start offset.
    pub start: usize,
    /// Exact removed text.
    pub deleted_text: String,
    /// Exact inserted text.
    pub inserted_text: String,
}

impl TextDeltaEdit {
    /// Removed length in chars.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Inserted length in chars.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end of the removed range in the pre-edit document.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted_len())
    }
}

/// Where a change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
    /// Typed or programmatic edit that entered the undo history.
    Edit,
    /// Replay of an undo group.
    Undo,
    /// Replay of a redo group.
    Redo,
    /// Whole-buffer load through `set_text`.
    Load,
}

/// A structured description of one document change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDelta {
    /// Char count before the edits.
    pub before_char_count: usize,
    /// Char count after the edits.
    pub after_char_count: usize,
    /// Ordered edits.
    pub edits: Vec<TextDeltaEdit>,
    /// Source of the change.
    pub origin: EditOrigin,
}

impl TextDelta {
    /// A delta made of a single edit.
    pub fn single(
        before_char_count: usize,
        start: usize,
        deleted_text: impl Into<String>,
        inserted_text: impl Into<String>,
        origin: EditOrigin,
    ) -> Self {
        let edit = TextDeltaEdit {
            start,
            deleted_text: deleted_text.into(),
            inserted_text: inserted_text.into(),
        };
        let after_char_count = before_char_count - edit.deleted_len() + edit.inserted_len();
        Self {
            before_char_count,
            after_char_count,
            edits: vec![edit],
            origin,
        }
    }

    /// Returns `true` if this delta contains no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply the edits to `text`, which must be the pre-change document.
    pub fn apply(&self, text: &str) -> String {
        let mut chars: Vec<char> = text.chars().collect();
        for edit in &self.edits {
            let end = edit.end().min(chars.len());
            let start = edit.start.min(end);
            chars.splice(start..end, edit.inserted_text.chars());
        }
        chars.into_iter().collect()
    }
}
