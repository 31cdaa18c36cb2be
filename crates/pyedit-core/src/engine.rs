//! The editing engine.
//!
//! [`Editor`] owns the buffer, the undo history, the style map and the caret, and exposes every
//! editing operation. All mutations funnel through one private `apply` step which edits the
//! buffer, restyles the touched lines and notifies subscribers, so the line index and the span
//! partition are consistent before any caller can observe the document again.
//!
//! # Example
//!
//! ```rust
//! use pyedit_core::Editor;
//!
//! let mut editor = Editor::new();
//! editor.insert_raw(0, "if x:").unwrap();
//! let out = editor.insert_raw(5, "\n").unwrap();
//! assert_eq!(editor.text(), "if x:\n  ");
//! assert_eq!(out.caret, 8);
//!
//! editor.undo().unwrap();
//! assert_eq!(editor.text(), "");
//! ```

use crate::auto_edit::{self, Rewrite};
use crate::brackets::{self, MatchState};
use crate::buffer::TextBuffer;
use crate::comment::CommentToggler;
use crate::config::EngineConfig;
use crate::delta::{EditOrigin, TextDelta};
use crate::error::EditResult;
use crate::help;
use crate::highlight::{HighlightContext, StyleCategory, StyleMap, StyleSpan};
use crate::history::{Clock, EditKind, EditRecord, UndoHistory};
use crate::indent::{self, BlockOutline, IndentGuide, shift_offset};
use crate::paste::{CopyMemory, PasteReindenter};
use crate::search::{self, SearchDirection, SearchMatch, SearchOptions};
use crate::state::{CaretState, DocumentState, StateChange, StateChangeType, StateNotifier};
use pyedit_lang::LanguageConfig;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Supplies the identifiers the host program currently defines.
///
/// Read when the highlight context is populated lazily and on
/// [`Editor::refresh_highlight_context`].
pub trait EnvironmentSource: Send {
    /// Current environment words.
    fn environment_words(&self) -> Vec<String>;
}

impl<F> EnvironmentSource for F
where
    F: Fn() -> Vec<String> + Send,
{
    fn environment_words(&self) -> Vec<String> {
        self()
    }
}

/// Result of an insertion-like operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Text that actually entered the buffer.
    pub applied: String,
    /// Caret offset afterwards (the selection end when something is selected).
    pub caret: usize,
    /// Caret movement relative to the requested offset.
    pub caret_delta: usize,
    /// Selection afterwards, if any.
    pub selection: Option<(usize, usize)>,
}

/// The code-aware editing engine.
pub struct Editor {
    buffer: TextBuffer,
    history: UndoHistory,
    styles: StyleMap,
    context: HighlightContext,
    environment: Option<Box<dyn EnvironmentSource>>,
    config: EngineConfig,
    language: LanguageConfig,
    anchor: usize,
    caret: usize,
    copy_memory: CopyMemory,
    bracket: MatchState,
    error_line: Option<usize>,
    highlighted_line: Option<usize>,
    saved_text: String,
    notifier: StateNotifier,
    replaying: bool,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("len", &self.buffer.len_chars())
            .field("caret", &self.caret)
            .field("anchor", &self.anchor)
            .field("history", &self.history)
            .field("bracket", &self.bracket)
            .field("version", &self.notifier.version())
            .finish()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// An empty Python editor with default settings.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default(), LanguageConfig::python())
    }

    /// An empty editor with explicit configuration.
    pub fn with_config(config: EngineConfig, language: LanguageConfig) -> Self {
        let history = UndoHistory::new(
            config.undo_capacity,
            Duration::from_millis(config.coalesce_window_ms),
        );
        Self {
            buffer: TextBuffer::new(),
            history,
            styles: StyleMap::new(),
            context: HighlightContext::new(),
            environment: None,
            config,
            language,
            anchor: 0,
            caret: 0,
            copy_memory: CopyMemory::new(),
            bracket: MatchState::NoMatch,
            error_line: None,
            highlighted_line: None,
            saved_text: String::new(),
            notifier: StateNotifier::default(),
            replaying: false,
        }
    }

    /// A Python editor preloaded with `text`.
    pub fn from_text(text: &str) -> Self {
        let mut editor = Self::new();
        editor.set_text(text);
        editor
    }

    /// Read undo timestamps from `clock`.
    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.history.set_clock(clock);
    }

    /// Install the host's environment word source.
    pub fn set_environment_source(&mut self, source: impl EnvironmentSource + 'static) {
        self.environment = Some(Box::new(source));
    }

    /// Turn snippet expansion on or off.
    pub fn set_auto_complete(&mut self, enabled: bool) {
        self.config.auto_complete = enabled;
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Active language.
    pub fn language(&self) -> &LanguageConfig {
        &self.language
    }

    // ----- queries -----

    /// Complete text.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Character count.
    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Caret offset.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Selection as `(start, end)` when non-empty.
    pub fn selection(&self) -> Option<(usize, usize)> {
        (self.anchor != self.caret)
            .then(|| (self.anchor.min(self.caret), self.anchor.max(self.caret)))
    }

    /// Span partition of the whole document, overlays included.
    pub fn spans(&self) -> Vec<StyleSpan> {
        self.styles.spans()
    }

    /// Effective style category at `offset`.
    pub fn category_at(&self, offset: usize) -> Option<StyleCategory> {
        self.styles.category_at(offset)
    }

    /// Current bracket match state.
    pub fn bracket_state(&self) -> MatchState {
        self.bracket
    }

    /// Current highlight context.
    pub fn highlight_context(&self) -> &HighlightContext {
        &self.context
    }

    /// Last copy captured from this editor.
    pub fn copy_memory(&self) -> &CopyMemory {
        &self.copy_memory
    }

    /// Something can be undone.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Something can be redone.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo history.
    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    /// Text differs from the last saved baseline.
    pub fn is_modified(&self) -> bool {
        self.buffer.text() != self.saved_text
    }

    /// Record the current text as saved.
    pub fn mark_saved(&mut self) {
        self.saved_text = self.buffer.text();
    }

    /// State version, bumped by every notification.
    pub fn version(&self) -> u64 {
        self.notifier.version()
    }

    /// Register a state change listener.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.notifier.subscribe(callback);
    }

    /// Document summary.
    pub fn document_state(&self) -> DocumentState {
        DocumentState {
            line_count: self.buffer.line_count(),
            char_count: self.buffer.len_chars(),
            is_modified: self.is_modified(),
            version: self.notifier.version(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }

    /// Caret summary with 1-based line/column, bracket state and help lookup.
    pub fn caret_state(&self) -> CaretState {
        let (line, column) = self.buffer.offset_to_position(self.caret);
        CaretState {
            offset: self.caret,
            line: line + 1,
            column: column + 1,
            selection: self.selection(),
            bracket: self.bracket,
            help: help::help_context(&self.buffer, self.caret),
        }
    }

    /// Outline of the block around the caret row.
    ///
    /// Unavailable when outlines are disabled or the row is not indented.
    pub fn block_outline(&self) -> Option<BlockOutline> {
        if !self.config.block_outline {
            return None;
        }
        indent::block_outline(&self.buffer, self.buffer.line_of_offset(self.caret))
    }

    /// Indent guides for the whole document; empty when outlines are disabled.
    pub fn indent_guides(&self) -> Vec<IndentGuide> {
        if !self.config.block_outline {
            return Vec::new();
        }
        indent::indent_guides(&self.buffer)
    }

    /// 1-based error line, if one is shown.
    pub fn error_line(&self) -> Option<usize> {
        self.error_line.map(|row| row + 1)
    }

    /// 1-based highlighted line, if any.
    pub fn highlighted_line(&self) -> Option<usize> {
        self.highlighted_line.map(|row| row + 1)
    }

    // ----- document lifecycle -----

    /// Replace the whole document.
    ///
    /// Windows line endings become `'\n'`. The undo history is discarded and the new text
    /// becomes the saved baseline.
    pub fn set_text(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n");
        self.ensure_context();
        let before = self.buffer.len_chars();
        let old = self.buffer.text();

        self.buffer = TextBuffer::from_text(&text);
        self.history.clear();
        self.clear_line_marks();
        self.styles.set_matching(Vec::new());
        self.styles.restyle_all(&self.buffer, &self.context);
        self.saved_text = text.clone();

        let after = self.buffer.len_chars();
        tracing::debug!(chars = after, "loaded document");
        let delta = TextDelta::single(before, 0, old, text, EditOrigin::Load);
        self.notifier.emit(
            StateChangeType::DocumentModified,
            Some(0..after),
            Some(Arc::new(delta)),
        );
        self.move_caret(0, 0);
    }

    /// Replace both highlight word sets and restyle the document.
    pub fn set_highlight_context<K, E>(&mut self, keywords: K, environment_words: E)
    where
        K: IntoIterator,
        K::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        self.context.set(keywords, environment_words);
        self.restyle_everything();
    }

    /// Re-read the language keywords and the environment source, then restyle.
    pub fn refresh_highlight_context(&mut self) {
        self.populate_context();
        self.restyle_everything();
    }

    // ----- caret -----

    /// Move the caret, clearing the selection.
    pub fn set_caret(&mut self, offset: usize) -> EditResult<()> {
        self.buffer.check_range(offset, 0)?;
        self.move_caret(offset, offset);
        Ok(())
    }

    /// Select `start..end`; the caret ends at `end`.
    pub fn select(&mut self, start: usize, end: usize) -> EditResult<()> {
        self.buffer.check_range(start, 0)?;
        self.buffer.check_range(end, 0)?;
        self.move_caret(start, end);
        Ok(())
    }

    /// Move the caret to the start of a 1-based line (clamped) and return its offset.
    pub fn goto_line(&mut self, line_number: usize) -> usize {
        let offset = self.buffer.line_start(self.clamp_line(line_number));
        self.move_caret(offset, offset);
        offset
    }

    // ----- editing -----

    /// Insert typed text at `offset`, applying the auto-edit rules.
    pub fn insert_raw(&mut self, offset: usize, text: &str) -> EditResult<InsertOutcome> {
        self.buffer.check_range(offset, 0)?;
        self.begin_mutation();
        let rewrite =
            auto_edit::rewrite_insertion(&self.buffer, offset, text, &self.language, &self.config);
        if rewrite.is_rewritten(text) {
            tracing::debug!(input = ?text, applied = ?rewrite.text, "auto-edit rewrite");
        }
        self.insert_recorded(offset, &rewrite.text)?;
        Ok(self.place_caret(offset, &rewrite))
    }

    /// Remove `len` characters at `offset` exactly as requested.
    pub fn remove_raw(&mut self, offset: usize, len: usize) -> EditResult<String> {
        self.buffer.check_range(offset, len)?;
        if len == 0 {
            return Ok(String::new());
        }
        self.begin_mutation();
        let removed = self.apply(offset, len, "", EditOrigin::Edit)?;
        self.history
            .record(EditKind::Remove, offset, String::new(), removed.clone());
        self.move_caret(offset, offset);
        Ok(removed)
    }

    /// Delete the character at `offset` the way Backspace does.
    ///
    /// Empty auto-pairs go as a unit and indentation is removed back to an even column.
    pub fn backspace(&mut self, offset: usize) -> EditResult<String> {
        self.buffer.check_range(offset, 1)?;
        let (start, len) = auto_edit::backspace_range(&self.buffer, offset);
        self.remove_raw(start, len)
    }

    /// Backspace at the caret, or delete the selection.
    pub fn delete_backward(&mut self) -> EditResult<String> {
        match self.selection() {
            Some((start, end)) => self.remove_raw(start, end - start),
            None if self.caret > 0 => self.backspace(self.caret - 1),
            None => Ok(String::new()),
        }
    }

    /// Replace `start..end` with typed `content`.
    ///
    /// An empty range behaves like [`insert_raw`](Self::insert_raw), except that the template
    /// trigger typed into an empty buffer inserts the bootstrap template. Over a selection a
    /// quote or bracket wraps the selection, Tab indents it (or jumps out of a snippet
    /// placeholder) and anything else replaces it.
    pub fn replace_selection(
        &mut self,
        start: usize,
        end: usize,
        content: &str,
    ) -> EditResult<InsertOutcome> {
        let (start, end) = (start.min(end), start.max(end));
        self.buffer.check_range(start, end - start)?;

        if start == end {
            let is_trigger = content
                .chars()
                .eq(std::iter::once(self.language.template_trigger));
            if is_trigger && self.buffer.is_empty() {
                self.begin_mutation();
                let template = self.language.template.clone();
                self.insert_recorded(start, &template)?;
                tracing::debug!("inserted bootstrap template");
                return Ok(self.place_caret(start, &Rewrite::verbatim(&template)));
            }
            if content.is_empty() {
                self.move_caret(start, start);
                return Ok(self.outcome(start, String::new()));
            }
            return self.insert_raw(start, content);
        }

        let len = end - start;
        if content == "\t" {
            if let Some(target) =
                auto_edit::selection_tab_jump(&self.buffer, start, end, &self.language)
            {
                self.move_caret(target, target);
                return Ok(self.outcome(start, String::new()));
            }
            self.increase_indent(start, end)?;
            return Ok(self.outcome(start, String::new()));
        }

        self.begin_mutation();
        let selected = self.buffer.read(start, len)?;
        if let Some((open, close)) = auto_edit::wrap_pair(content) {
            let wrapped = format!("{open}{selected}{close}");
            self.apply(start, len, &wrapped, EditOrigin::Edit)?;
            self.history
                .record(EditKind::Replace, start, wrapped.clone(), selected);
            self.move_caret(start + 1, start + len + 1);
            return Ok(self.outcome(start, wrapped));
        }

        self.apply(start, len, "", EditOrigin::Edit)?;
        let rewrite =
            auto_edit::rewrite_insertion(&self.buffer, start, content, &self.language, &self.config);
        if !rewrite.text.is_empty() {
            self.apply(start, 0, &rewrite.text, EditOrigin::Edit)?;
        }
        self.history
            .record(EditKind::Replace, start, rewrite.text.clone(), selected);
        Ok(self.place_caret(start, &rewrite))
    }

    /// Toggle line comments over the lines touched by `start..end`.
    ///
    /// Returns `false` when every touched line is blank.
    pub fn toggle_comment(&mut self, start: usize, end: usize) -> EditResult<bool> {
        let (start, end) = (start.min(end), start.max(end));
        self.buffer.check_range(start, end - start)?;
        let toggler = CommentToggler::new(&self.language.comment);
        let Some(edit) = toggler.plan(&self.buffer, start, end) else {
            return Ok(false);
        };
        self.begin_mutation();
        self.replace_block(edit.start, &edit.old_text, &edit.new_text)?;
        tracing::debug!(commented = edit.commented, "toggled comments");
        let (sel_start, sel_end) = edit.selection;
        self.move_caret(sel_start, sel_end);
        Ok(true)
    }

    /// Indent every line touched by `start..end` by one unit.
    pub fn increase_indent(&mut self, start: usize, end: usize) -> EditResult<bool> {
        let (start, end) = (start.min(end), start.max(end));
        self.buffer.check_range(start, end - start)?;
        let (first, last) = self.touched_rows(start, end);
        let unit = self.config.indent_unit();

        let block_start = self.buffer.line_start(first);
        let old = self
            .buffer
            .slice_clamped(block_start, self.buffer.line_end(last));
        let new = indent::indent_text(&old, unit);
        let edits: Vec<(usize, usize, usize)> = (first..=last)
            .map(|row| (self.buffer.line_start(row), 0, unit))
            .collect();

        self.begin_mutation();
        self.replace_block(block_start, &old, &new)?;
        self.move_mapped(&edits, start, end);
        Ok(true)
    }

    /// Remove up to one unit of indentation from every line touched by `start..end`.
    ///
    /// Returns `false`, changing nothing, when no touched line is indented.
    pub fn decrease_indent(&mut self, start: usize, end: usize) -> EditResult<bool> {
        let (start, end) = (start.min(end), start.max(end));
        self.buffer.check_range(start, end - start)?;
        let (first, last) = self.touched_rows(start, end);

        let block_start = self.buffer.line_start(first);
        let old = self
            .buffer
            .slice_clamped(block_start, self.buffer.line_end(last));
        let (new, removed) = indent::dedent_text(&old, self.config.indent_unit());
        if removed.iter().all(|n| *n == 0) {
            return Ok(false);
        }
        let edits: Vec<(usize, usize, usize)> = (first..=last)
            .zip(&removed)
            .map(|(row, n)| (self.buffer.line_start(row), *n, 0))
            .collect();

        self.begin_mutation();
        self.replace_block(block_start, &old, &new)?;
        self.move_mapped(&edits, start, end);
        Ok(true)
    }

    /// Capture `start..end` for a later paste, returning the text and its line indentation.
    pub fn copy(&mut self, start: usize, end: usize) -> EditResult<(String, usize)> {
        let (start, end) = (start.min(end), start.max(end));
        self.buffer.check_range(start, end - start)?;
        Ok(self.copy_memory.capture(&self.buffer, start, end))
    }

    /// Paste `text` at the caret, re-indented for its destination.
    ///
    /// With a selection the selection is replaced instead.
    pub fn paste(&mut self, text: &str) -> EditResult<InsertOutcome> {
        let text = text.replace("\r\n", "\n");
        if text.is_empty() {
            return Ok(self.outcome(self.caret, String::new()));
        }
        if let Some((start, end)) = self.selection() {
            return self.replace_selection(start, end, &text);
        }
        let reindented = PasteReindenter::new(self.config.indent_unit()).reindent(
            &self.buffer,
            self.caret,
            &text,
            &self.copy_memory,
        );
        self.insert_raw(self.caret, &reindented)
    }

    // ----- history -----

    /// Revert the most recent undo group. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> EditResult<bool> {
        let group = self.history.pop_undo_group();
        if group.is_empty() {
            return Ok(false);
        }
        self.begin_mutation();
        self.replaying = true;
        let result = self.replay_undo(&group);
        self.replaying = false;
        self.clear_bracket_match();
        result.map(|()| true)
    }

    /// Replay the next redo group. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> EditResult<bool> {
        let group = self.history.pop_redo_group();
        if group.is_empty() {
            return Ok(false);
        }
        self.begin_mutation();
        self.replaying = true;
        let result = self.replay_redo(&group);
        self.replaying = false;
        self.clear_bracket_match();
        result.map(|()| true)
    }

    fn replay_undo(&mut self, group: &[EditRecord]) -> EditResult<()> {
        for record in group {
            let offset = record.offset;
            let (anchor, caret) = match record.kind {
                EditKind::Insert => {
                    self.apply(offset, record.inserted_len(), "", EditOrigin::Undo)?;
                    (offset, offset)
                }
                EditKind::Remove => {
                    self.apply(offset, 0, &record.removed, EditOrigin::Undo)?;
                    let n = record.removed_len();
                    if n > 1 {
                        (offset, offset + n)
                    } else {
                        (offset + n, offset + n)
                    }
                }
                EditKind::Replace => {
                    self.apply(
                        offset,
                        record.inserted_len(),
                        &record.removed,
                        EditOrigin::Undo,
                    )?;
                    (offset, offset + record.removed_len())
                }
            };
            self.move_caret(anchor, caret);
        }
        Ok(())
    }

    fn replay_redo(&mut self, group: &[EditRecord]) -> EditResult<()> {
        for record in group {
            let offset = record.offset;
            let (anchor, caret) = match record.kind {
                EditKind::Insert => {
                    self.apply(offset, 0, &record.inserted, EditOrigin::Redo)?;
                    let n = record.inserted_len();
                    if n > 1 {
                        (offset, offset + n)
                    } else {
                        (offset + n, offset + n)
                    }
                }
                EditKind::Remove => {
                    self.apply(offset, record.removed_len(), "", EditOrigin::Redo)?;
                    (offset, offset)
                }
                EditKind::Replace => {
                    self.apply(
                        offset,
                        record.removed_len(),
                        &record.inserted,
                        EditOrigin::Redo,
                    )?;
                    (offset, offset + record.inserted_len())
                }
            };
            self.move_caret(anchor, caret);
        }
        Ok(())
    }

    // ----- line marks -----

    /// Mark a 1-based line (clamped) as the error line and move the caret to its start.
    ///
    /// Any previous error mark is replaced. Returns the line start offset.
    pub fn show_error_line(&mut self, line_number: usize) -> usize {
        let row = self.clamp_line(line_number);
        let (start, end) = (self.buffer.line_start(row), self.buffer.line_end(row));
        self.error_line = Some(row);
        self.styles.set_error_line(Some(start..end));
        self.notifier
            .emit(StateChangeType::LineMarkChanged, Some(start..end), None);
        self.move_caret(start, start);
        start
    }

    /// Highlight a 1-based line (clamped) and move the caret to its start.
    pub fn highlight_line(&mut self, line_number: usize) -> usize {
        let row = self.clamp_line(line_number);
        let (start, end) = (self.buffer.line_start(row), self.buffer.line_end(row));
        self.highlighted_line = Some(row);
        self.styles.set_highlighted_line(Some(start..end));
        self.notifier
            .emit(StateChangeType::LineMarkChanged, Some(start..end), None);
        self.move_caret(start, start);
        start
    }

    /// Remove the highlighted-line mark.
    pub fn clear_line_highlighting(&mut self) {
        if self.highlighted_line.take().is_some() {
            self.styles.set_highlighted_line(None);
            self.notifier
                .emit(StateChangeType::LineMarkChanged, None, None);
        }
    }

    // ----- search -----

    /// Find `query` after the caret, wrapping once; the match is selected.
    pub fn search_forward(&mut self, query: &str) -> EditResult<Option<SearchMatch>> {
        self.search(query, SearchOptions::default(), SearchDirection::Forward)
    }

    /// Find `query` before the caret, wrapping once; the caret lands on the match start.
    pub fn search_backward(&mut self, query: &str) -> EditResult<Option<SearchMatch>> {
        self.search(query, SearchOptions::default(), SearchDirection::Backward)
    }

    /// Search with explicit options.
    pub fn search(
        &mut self,
        query: &str,
        options: SearchOptions,
        direction: SearchDirection,
    ) -> EditResult<Option<SearchMatch>> {
        let text = self.buffer.text();
        let found = search::search_wrapping(&text, query, options, self.caret, direction)?;
        if let Some(m) = found {
            match direction {
                SearchDirection::Forward => self.move_caret(m.start, m.end),
                SearchDirection::Backward => self.move_caret(m.end, m.start),
            }
        }
        Ok(found)
    }

    // ----- internals -----

    fn clamp_line(&self, line_number: usize) -> usize {
        line_number.clamp(1, self.buffer.line_count()) - 1
    }

    fn touched_rows(&self, start: usize, end: usize) -> (usize, usize) {
        let first = self.buffer.line_of_offset(start);
        let mut last = self.buffer.line_of_offset(end);
        if last > first && end == self.buffer.line_start(last) {
            last -= 1;
        }
        (first, last)
    }

    fn populate_context(&mut self) {
        let environment = self
            .environment
            .as_ref()
            .map(|source| source.environment_words())
            .unwrap_or_default();
        self.context
            .set(self.language.keywords.iter().cloned(), environment);
        tracing::debug!(
            keywords = self.context.keyword_count(),
            environment_words = self.context.environment_word_count(),
            "populated highlight context"
        );
    }

    fn ensure_context(&mut self) {
        if !self.context.is_populated() {
            self.populate_context();
            self.styles.restyle_all(&self.buffer, &self.context);
        }
    }

    fn restyle_everything(&mut self) {
        self.styles.restyle_all(&self.buffer, &self.context);
        let len = self.buffer.len_chars();
        self.notifier
            .emit(StateChangeType::StyleChanged, Some(0..len), None);
    }

    fn clear_line_marks(&mut self) {
        if self.error_line.is_none() && self.highlighted_line.is_none() {
            return;
        }
        self.error_line = None;
        self.highlighted_line = None;
        self.styles.set_error_line(None);
        self.styles.set_highlighted_line(None);
        self.notifier
            .emit(StateChangeType::LineMarkChanged, None, None);
    }

    fn begin_mutation(&mut self) {
        self.ensure_context();
        self.clear_line_marks();
        self.styles.set_matching(Vec::new());
        self.bracket = MatchState::Pending;
    }

    fn clear_bracket_match(&mut self) {
        self.styles.set_matching(Vec::new());
        self.bracket = MatchState::NoMatch;
    }

    fn apply(
        &mut self,
        offset: usize,
        remove_len: usize,
        insert: &str,
        origin: EditOrigin,
    ) -> EditResult<String> {
        let before = self.buffer.len_chars();
        let removed = self.buffer.replace(offset, remove_len, insert)?;
        let inserted_len = insert.chars().count();
        self.styles
            .apply_edit(&self.buffer, offset, remove_len, inserted_len, &self.context);
        tracing::trace!(offset, remove_len, inserted_len, ?origin, "applied edit");

        let delta = TextDelta::single(before, offset, removed.clone(), insert, origin);
        self.notifier.emit(
            StateChangeType::DocumentModified,
            Some(offset..offset + inserted_len),
            Some(Arc::new(delta)),
        );
        Ok(removed)
    }

    fn insert_recorded(&mut self, offset: usize, text: &str) -> EditResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.apply(offset, 0, text, EditOrigin::Edit)?;
        self.history
            .record(EditKind::Insert, offset, text.to_string(), String::new());
        Ok(())
    }

    fn replace_block(&mut self, start: usize, old: &str, new: &str) -> EditResult<()> {
        self.apply(start, old.chars().count(), new, EditOrigin::Edit)?;
        self.history
            .record(EditKind::Replace, start, new.to_string(), old.to_string());
        Ok(())
    }

    fn move_mapped(&mut self, edits: &[(usize, usize, usize)], start: usize, end: usize) {
        let (new_start, new_end) = (shift_offset(edits, start), shift_offset(edits, end));
        self.move_caret(new_start, new_end);
    }

    fn place_caret(&mut self, offset: usize, rewrite: &Rewrite) -> InsertOutcome {
        let caret = offset + rewrite.caret;
        self.move_caret(caret, caret + rewrite.select);
        self.outcome(offset, rewrite.text.clone())
    }

    fn outcome(&self, offset: usize, applied: String) -> InsertOutcome {
        InsertOutcome {
            applied,
            caret: self.caret,
            caret_delta: self.caret.saturating_sub(offset),
            selection: self.selection(),
        }
    }

    fn move_caret(&mut self, anchor: usize, caret: usize) {
        let len = self.buffer.len_chars();
        self.anchor = anchor.min(len);
        self.caret = caret.min(len);
        if self.replaying {
            self.clear_bracket_match();
        } else {
            self.refresh_bracket_match();
        }
        let region = self.anchor.min(self.caret)..self.anchor.max(self.caret);
        self.notifier
            .emit(StateChangeType::CaretMoved, Some(region), None);
    }

    fn refresh_bracket_match(&mut self) {
        let state = if !self.config.matching_brackets || self.caret.abs_diff(self.anchor) > 1 {
            MatchState::NoMatch
        } else {
            brackets::match_at_caret(&self.buffer, self.caret)
        };
        let matching: Vec<usize> = state
            .pair()
            .map(|(open, close)| vec![open, close])
            .unwrap_or_default();
        let changed = self.styles.matching() != matching.as_slice();
        self.styles.set_matching(matching);
        self.bracket = state;
        if changed {
            self.notifier.emit(StateChangeType::StyleChanged, None, None);
        }
    }
}
