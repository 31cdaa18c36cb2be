//! Editor state queries and change notifications.
//!
//! Hosts either poll the snapshot structs ([`DocumentState`], [`CaretState`]) or subscribe to
//! [`StateChange`] events. Each event bumps a monotonically increasing version so a host can
//! cheaply ask whether anything happened since it last rendered.
//!
//! # Example
//!
//! ```rust
//! use pyedit_core::{Editor, StateChangeType};
//! use std::sync::{Arc, Mutex};
//!
//! let mut editor = Editor::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! editor.subscribe(move |change| sink.lock().unwrap().push(change.change_type));
//!
//! editor.insert_raw(0, "x").unwrap();
//! assert!(seen.lock().unwrap().contains(&StateChangeType::DocumentModified));
//! ```

use crate::brackets::MatchState;
use crate::delta::TextDelta;
use crate::help::HelpContext;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Kind of state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateChangeType {
    /// Buffer text changed.
    DocumentModified,
    /// Caret or selection moved.
    CaretMoved,
    /// Style spans changed without a text change (context refresh, bracket overlay).
    StyleChanged,
    /// Error line or highlighted line set or cleared.
    LineMarkChanged,
}

/// A single change notification.
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Change type.
    pub change_type: StateChangeType,
    /// Version before the change.
    pub old_version: u64,
    /// Version after the change.
    pub new_version: u64,
    /// Affected character range, if known.
    pub affected_region: Option<Range<usize>>,
    /// Structured text delta for document changes.
    pub text_delta: Option<Arc<TextDelta>>,
}

impl StateChange {
    /// Create a change record without a region.
    pub fn new(change_type: StateChangeType, old_version: u64, new_version: u64) -> Self {
        Self {
            change_type,
            old_version,
            new_version,
            affected_region: None,
            text_delta: None,
        }
    }

    /// Attach the affected range.
    pub fn with_region(mut self, region: Range<usize>) -> Self {
        self.affected_region = Some(region);
        self
    }

    /// Attach a text delta.
    pub fn with_text_delta(mut self, delta: Arc<TextDelta>) -> Self {
        self.text_delta = Some(delta);
        self
    }
}

/// State change callback type.
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// Version counter plus subscriber list.
#[derive(Default)]
pub struct StateNotifier {
    version: u64,
    callbacks: Vec<StateChangeCallback>,
}

impl fmt::Debug for StateNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNotifier")
            .field("version", &self.version)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl StateNotifier {
    /// Register a callback.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Current version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether anything changed after `version`.
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.version > version
    }

    /// Bump the version and notify every subscriber.
    pub fn emit(
        &mut self,
        change_type: StateChangeType,
        region: Option<Range<usize>>,
        delta: Option<Arc<TextDelta>>,
    ) {
        let old_version = self.version;
        self.version += 1;
        let mut change = StateChange::new(change_type, old_version, self.version);
        if let Some(region) = region {
            change = change.with_region(region);
        }
        if let Some(delta) = delta {
            change = change.with_text_delta(delta);
        }
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}

/// Document summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    /// Line count.
    pub line_count: usize,
    /// Character count.
    pub char_count: usize,
    /// Text differs from the saved baseline.
    pub is_modified: bool,
    /// State version.
    pub version: u64,
    /// Something can be undone.
    pub can_undo: bool,
    /// Something can be redone.
    pub can_redo: bool,
}

/// Caret summary, reported after every caret movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretState {
    /// Caret offset.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
    /// Selection as `(start, end)`, if non-empty.
    pub selection: Option<(usize, usize)>,
    /// Bracket pair highlighted around the caret.
    pub bracket: MatchState,
    /// Help lookup for the caret position.
    pub help: Option<HelpContext>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_emit_bumps_version_and_notifies() {
        let mut notifier = StateNotifier::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        notifier.subscribe(move |change| {
            sink.lock()
                .unwrap()
                .push((change.change_type, change.old_version, change.new_version));
        });

        notifier.emit(StateChangeType::CaretMoved, None, None);
        notifier.emit(StateChangeType::DocumentModified, Some(0..3), None);

        assert_eq!(notifier.version(), 2);
        assert!(notifier.has_changed_since(1));
        assert!(!notifier.has_changed_since(2));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (StateChangeType::CaretMoved, 0, 1),
                (StateChangeType::DocumentModified, 1, 2)
            ]
        );
    }
}
