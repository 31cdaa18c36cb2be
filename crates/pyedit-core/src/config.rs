//! Engine configuration.
//!
//! [`EngineConfig`] is a plain serde struct so hosts can load it from whatever settings store
//! they own. Every field has a default, so a partial document deserializes cleanly.

use serde::{Deserialize, Serialize};

/// Default number of edits kept in the undo history.
pub const DEFAULT_UNDO_CAPACITY: usize = 500;

/// Default coalescing window for undo grouping, in milliseconds.
pub const DEFAULT_COALESCE_WINDOW_MS: u64 = 300;

/// Default indentation unit, in spaces.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Runtime switches for the editing engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Expand statement snippets when Space follows a bare `def`/`if`/`elif`/`for`/`while`.
    pub auto_complete: bool,
    /// Maximum number of edit records retained by the undo history.
    pub undo_capacity: usize,
    /// Edits recorded closer together than this are undone as one step.
    pub coalesce_window_ms: u64,
    /// Indentation unit used by Tab, auto-indent and block indent/dedent.
    pub indent_width: usize,
    /// Compute block outlines and indent guides on caret movement.
    pub block_outline: bool,
    /// Highlight the bracket matching the one next to the caret.
    pub matching_brackets: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_complete: true,
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            coalesce_window_ms: DEFAULT_COALESCE_WINDOW_MS,
            indent_width: DEFAULT_INDENT_WIDTH,
            block_outline: true,
            matching_brackets: true,
        }
    }
}

impl EngineConfig {
    /// Indent width clamped to at least one column.
    pub fn indent_unit(&self) -> usize {
        self.indent_width.max(1)
    }
}
