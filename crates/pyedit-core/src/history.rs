//! Undo history with time-based coalescing.
//!
//! Every mutation is recorded as an [`EditRecord`] carrying the text it inserted and the text it
//! removed, which is enough to build the exact inverse. Records arriving within the coalescing
//! window of their predecessor are marked insignificant; undo walks back through insignificant
//! records and stops after the first significant one, so a burst of typing reverts as one step.

use crate::config::{DEFAULT_COALESCE_WINDOW_MS, DEFAULT_UNDO_CAPACITY};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Time source used to timestamp edit records.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give another to the editor.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    elapsed_ms: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            elapsed_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.elapsed_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Move time forward by `ms` milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.elapsed_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst))
    }
}

/// Kind of a recorded edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Text was inserted.
    Insert,
    /// Text was removed.
    Remove,
    /// Text was removed and new text inserted at the same offset.
    Replace,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditKind::Insert => "insert",
            EditKind::Remove => "remove",
            EditKind::Replace => "replace",
        };
        f.write_str(name)
    }
}

/// One recorded mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    /// Kind of edit.
    pub kind: EditKind,
    /// Character offset where the edit was applied.
    pub offset: usize,
    /// Text present after the edit (empty for removals).
    pub inserted: String,
    /// Text present before the edit (empty for insertions).
    pub removed: String,
    /// Whether this record ends an undo group.
    pub significant: bool,
    /// When the edit was recorded.
    pub timestamp: Instant,
}

impl EditRecord {
    /// Inserted text length in chars.
    pub fn inserted_len(&self) -> usize {
        self.inserted.chars().count()
    }

    /// Removed text length in chars.
    pub fn removed_len(&self) -> usize {
        self.removed.chars().count()
    }
}

/// Bounded undo/redo history.
pub struct UndoHistory {
    past: VecDeque<EditRecord>,
    future: Vec<EditRecord>,
    capacity: usize,
    window: Duration,
    last_recorded: Option<Instant>,
    clock: Box<dyn Clock>,
}

impl fmt::Debug for UndoHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoHistory")
            .field("past", &self.past.len())
            .field("future", &self.future.len())
            .field("capacity", &self.capacity)
            .field("window", &self.window)
            .finish()
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(
            DEFAULT_UNDO_CAPACITY,
            Duration::from_millis(DEFAULT_COALESCE_WINDOW_MS),
        )
    }
}

impl UndoHistory {
    /// Create a history using the system clock.
    pub fn new(capacity: usize, window: Duration) -> Self {
        Self::with_clock(capacity, window, Box::new(SystemClock))
    }

    /// Create a history reading time from `clock`.
    pub fn with_clock(capacity: usize, window: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            capacity: capacity.max(1),
            window,
            last_recorded: None,
            clock,
        }
    }

    /// Swap the time source.
    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
    }

    /// Record an edit the caller considers significant.
    ///
    /// Returns the significance actually stored.
    pub fn record(
        &mut self,
        kind: EditKind,
        offset: usize,
        inserted: impl Into<String>,
        removed: impl Into<String>,
    ) -> bool {
        self.record_with(kind, offset, inserted.into(), removed.into(), true)
    }

    /// Record an edit with caller-supplied significance.
    ///
    /// The first edit is always significant. An edit within the coalescing window of its
    /// predecessor is always insignificant.
    pub fn record_with(
        &mut self,
        kind: EditKind,
        offset: usize,
        inserted: String,
        removed: String,
        significant: bool,
    ) -> bool {
        let now = self.clock.now();
        let significant = match self.last_recorded {
            None => true,
            Some(previous) if now.saturating_duration_since(previous) < self.window => false,
            Some(_) => significant,
        };
        self.last_recorded = Some(now);
        self.future.clear();

        tracing::trace!(%kind, offset, significant, "record edit");
        self.past.push_back(EditRecord {
            kind,
            offset,
            inserted,
            removed,
            significant,
            timestamp: now,
        });

        if self.past.len() > self.capacity {
            self.past.pop_front();
            tracing::debug!(capacity = self.capacity, "evicted oldest undo record");
        }
        significant
    }

    /// Pop the most recent undo group, newest record first.
    ///
    /// Popped records move onto the redo stack and the next record starts a new group. Returns an empty vector when there is nothing
    /// to undo.
    pub fn pop_undo_group(&mut self) -> Vec<EditRecord> {
        let mut group = Vec::new();
        while let Some(record) = self.past.pop_back() {
            let significant = record.significant;
            self.future.push(record.clone());
            group.push(record);
            if significant {
                break;
            }
        }
        if !group.is_empty() {
            self.last_recorded = None;
            tracing::debug!(records = group.len(), "undo group");
        }
        group
    }

    /// Pop the next redo group, oldest record first.
    ///
    /// The first replayed record is forced significant so the replayed group undoes as one unit.
    pub fn pop_redo_group(&mut self) -> Vec<EditRecord> {
        let mut group = Vec::new();
        let Some(mut first) = self.future.pop() else {
            return group;
        };
        first.significant = true;
        self.past.push_back(first.clone());
        group.push(first);

        while self.future.last().is_some_and(|r| !r.significant) {
            if let Some(record) = self.future.pop() {
                self.past.push_back(record.clone());
                group.push(record);
            }
        }
        while self.past.len() > self.capacity {
            self.past.pop_front();
        }
        self.last_recorded = None;
        tracing::debug!(records = group.len(), "redo group");
        group
    }

    /// Drop every record and forget the last edit time.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.last_recorded = None;
    }

    /// Returns `true` if there is something to undo.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Returns `true` if there is something to redo.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undoable records.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Number of redoable records.
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Maximum number of undoable records.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records the next undo would revert, newest first.
    pub fn undo_group(&self) -> impl Iterator<Item = &EditRecord> {
        let start = self.past.iter().rposition(|r| r.significant).unwrap_or(0);
        self.past.range(start..).rev()
    }
}
