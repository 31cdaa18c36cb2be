//! Command interface layer
//!
//! Wraps the [`Editor`] operations in a command enum so hosts can drive the engine from a
//! single entry point, record or replay input, and hand requests over from other threads.
//!
//! # Overview
//!
//! - **Edit**: raw inserts and removals, typed replacement of a selection, undo/redo, comment and
//!   indentation toggles, whole-document loads
//! - **Caret**: caret placement, selection, line jumps and searches
//! - **Line marks**: error line and highlighted line
//! - **Clipboard**: copy with indent capture, re-indenting paste
//! - **Context**: highlight word sets
//!
//! Requests issued outside the engine's owner go through a [`CommandQueue`]: any number of
//! [`CommandSender`] handles may enqueue commands, and the owner drains them in FIFO order
//! between its own mutations.
//!
//! # Example
//!
//! ```rust
//! use pyedit_core::{Command, CommandQueue, EditCommand, Editor};
//!
//! let mut editor = Editor::new();
//! let mut queue = CommandQueue::new();
//! let sender = queue.sender();
//!
//! std::thread::spawn(move || {
//!     sender.send(Command::Edit(EditCommand::InsertRaw {
//!         offset: 0,
//!         text: "(".to_string(),
//!     }));
//! })
//! .join()
//! .unwrap();
//!
//! queue.drain(&mut editor);
//! assert_eq!(editor.text(), "()");
//! ```

use crate::engine::{Editor, InsertOutcome};
use crate::error::EditResult;
use crate::search::{SearchDirection, SearchOptions};
use std::sync::mpsc;

/// Text editing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Insert typed text, applying the auto-edit rules
    InsertRaw {
        /// Character offset to insert at.
        offset: usize,
        /// Typed text.
        text: String,
    },
    /// Remove text exactly as requested
    RemoveRaw {
        /// Character offset of the removal start.
        offset: usize,
        /// Number of characters to remove.
        len: usize,
    },
    /// Backspace over the character at `offset`
    Backspace {
        /// Offset of the deleted character.
        offset: usize,
    },
    /// Backspace at the caret, or delete the selection
    DeleteBackward,
    /// Replace a selection with typed content
    ReplaceSelection {
        /// Selection start.
        start: usize,
        /// Selection end.
        end: usize,
        /// Typed content.
        content: String,
    },
    /// Undo the latest group
    Undo,
    /// Redo the next group
    Redo,
    /// Toggle line comments over a selection
    ToggleComment {
        /// Selection start.
        start: usize,
        /// Selection end.
        end: usize,
    },
    /// Indent the selected lines
    IncreaseIndent {
        /// Selection start.
        start: usize,
        /// Selection end.
        end: usize,
    },
    /// Dedent the selected lines
    DecreaseIndent {
        /// Selection start.
        start: usize,
        /// Selection end.
        end: usize,
    },
    /// Replace the whole document and reset history
    SetText {
        /// New document text.
        text: String,
    },
}

/// Caret & selection commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaretCommand {
    /// Move the caret
    SetCaret {
        /// Target offset.
        offset: usize,
    },
    /// Select a range, caret at `end`
    Select {
        /// Anchor offset.
        start: usize,
        /// Caret offset.
        end: usize,
    },
    /// Jump to the start of a 1-based line
    GotoLine {
        /// 1-based line number (clamped).
        line: usize,
    },
    /// Find `query` after the caret and select it
    SearchForward {
        /// Search query.
        query: String,
    },
    /// Find `query` before the caret
    SearchBackward {
        /// Search query.
        query: String,
    },
    /// Search with explicit options
    Find {
        /// Search query.
        query: String,
        /// Search options (case sensitivity, whole-word, regex).
        options: SearchOptions,
        /// Search direction.
        direction: SearchDirection,
    },
}

/// Line mark commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMarkCommand {
    /// Mark the error line
    ShowErrorLine {
        /// 1-based line number (clamped).
        line: usize,
    },
    /// Highlight a line
    HighlightLine {
        /// 1-based line number (clamped).
        line: usize,
    },
    /// Remove the highlighted-line mark
    ClearLineHighlighting,
}

/// Clipboard-side commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardCommand {
    /// Capture a range for a later paste
    Copy {
        /// Selection start.
        start: usize,
        /// Selection end.
        end: usize,
    },
    /// Paste text at the caret
    Paste {
        /// Clipboard text.
        text: String,
    },
}

/// Highlight context commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextCommand {
    /// Replace both word sets
    SetHighlightContext {
        /// Language keywords.
        keywords: Vec<String>,
        /// Identifiers defined by the host environment.
        environment_words: Vec<String>,
    },
    /// Re-read the language keywords and environment source
    Refresh,
}

/// Unified command enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text editing commands
    Edit(EditCommand),
    /// Caret commands
    Caret(CaretCommand),
    /// Line mark commands
    LineMark(LineMarkCommand),
    /// Clipboard commands
    Clipboard(ClipboardCommand),
    /// Highlight context commands
    Context(ContextCommand),
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Success, no return value
    Success,
    /// Insertion result
    Inserted(InsertOutcome),
    /// Removed text
    Removed(String),
    /// Copied text and its captured indentation
    Copied {
        /// Copied text.
        text: String,
        /// Leading space count of the first copied line.
        indent: usize,
    },
    /// Whether the operation changed anything
    Changed(bool),
    /// Resulting caret offset
    Offset(usize),
    /// Search hit in char offsets (half-open)
    SearchMatch {
        /// Inclusive start offset.
        start: usize,
        /// Exclusive end offset.
        end: usize,
    },
    /// Search miss
    SearchNotFound,
}

impl Editor {
    /// Execute a command
    pub fn execute(&mut self, command: Command) -> EditResult<CommandResult> {
        tracing::trace!(?command, "execute");
        match command {
            Command::Edit(cmd) => self.execute_edit(cmd),
            Command::Caret(cmd) => self.execute_caret(cmd),
            Command::LineMark(cmd) => Ok(self.execute_line_mark(cmd)),
            Command::Clipboard(cmd) => self.execute_clipboard(cmd),
            Command::Context(cmd) => {
                match cmd {
                    ContextCommand::SetHighlightContext {
                        keywords,
                        environment_words,
                    } => self.set_highlight_context(keywords, environment_words),
                    ContextCommand::Refresh => self.refresh_highlight_context(),
                }
                Ok(CommandResult::Success)
            }
        }
    }

    /// Execute commands in order, stopping at the first error
    pub fn execute_batch(&mut self, commands: Vec<Command>) -> EditResult<Vec<CommandResult>> {
        commands.into_iter().map(|c| self.execute(c)).collect()
    }

    fn execute_edit(&mut self, command: EditCommand) -> EditResult<CommandResult> {
        Ok(match command {
            EditCommand::InsertRaw { offset, text } => {
                CommandResult::Inserted(self.insert_raw(offset, &text)?)
            }
            EditCommand::RemoveRaw { offset, len } => {
                CommandResult::Removed(self.remove_raw(offset, len)?)
            }
            EditCommand::Backspace { offset } => CommandResult::Removed(self.backspace(offset)?),
            EditCommand::DeleteBackward => CommandResult::Removed(self.delete_backward()?),
            EditCommand::ReplaceSelection {
                start,
                end,
                content,
            } => CommandResult::Inserted(self.replace_selection(start, end, &content)?),
            EditCommand::Undo => CommandResult::Changed(self.undo()?),
            EditCommand::Redo => CommandResult::Changed(self.redo()?),
            EditCommand::ToggleComment { start, end } => {
                CommandResult::Changed(self.toggle_comment(start, end)?)
            }
            EditCommand::IncreaseIndent { start, end } => {
                CommandResult::Changed(self.increase_indent(start, end)?)
            }
            EditCommand::DecreaseIndent { start, end } => {
                CommandResult::Changed(self.decrease_indent(start, end)?)
            }
            EditCommand::SetText { text } => {
                self.set_text(&text);
                CommandResult::Success
            }
        })
    }

    fn execute_caret(&mut self, command: CaretCommand) -> EditResult<CommandResult> {
        let found = match command {
            CaretCommand::SetCaret { offset } => {
                self.set_caret(offset)?;
                return Ok(CommandResult::Offset(self.caret()));
            }
            CaretCommand::Select { start, end } => {
                self.select(start, end)?;
                return Ok(CommandResult::Offset(self.caret()));
            }
            CaretCommand::GotoLine { line } => {
                return Ok(CommandResult::Offset(self.goto_line(line)));
            }
            CaretCommand::SearchForward { query } => self.search_forward(&query)?,
            CaretCommand::SearchBackward { query } => self.search_backward(&query)?,
            CaretCommand::Find {
                query,
                options,
                direction,
            } => self.search(&query, options, direction)?,
        };
        Ok(match found {
            Some(m) => CommandResult::SearchMatch {
                start: m.start,
                end: m.end,
            },
            None => CommandResult::SearchNotFound,
        })
    }

    fn execute_line_mark(&mut self, command: LineMarkCommand) -> CommandResult {
        match command {
            LineMarkCommand::ShowErrorLine { line } => {
                CommandResult::Offset(self.show_error_line(line))
            }
            LineMarkCommand::HighlightLine { line } => {
                CommandResult::Offset(self.highlight_line(line))
            }
            LineMarkCommand::ClearLineHighlighting => {
                self.clear_line_highlighting();
                CommandResult::Success
            }
        }
    }

    fn execute_clipboard(&mut self, command: ClipboardCommand) -> EditResult<CommandResult> {
        Ok(match command {
            ClipboardCommand::Copy { start, end } => {
                let (text, indent) = self.copy(start, end)?;
                CommandResult::Copied { text, indent }
            }
            ClipboardCommand::Paste { text } => CommandResult::Inserted(self.paste(&text)?),
        })
    }
}

/// Cloneable handle for enqueuing commands from any thread.
#[derive(Debug, Clone)]
pub struct CommandSender {
    inner: mpsc::Sender<Command>,
}

impl CommandSender {
    /// Enqueue a command. Returns `false` once the queue has been dropped.
    pub fn send(&self, command: Command) -> bool {
        self.inner.send(command).is_ok()
    }
}

/// FIFO of commands waiting for the editor's owner.
///
/// Commands never run on the sending thread; they run when the owner calls
/// [`drain`](Self::drain), one after another, so they cannot interleave with other mutations.
#[derive(Debug)]
pub struct CommandQueue {
    sender: mpsc::Sender<Command>,
    receiver: mpsc::Receiver<Command>,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// A new sending handle.
    pub fn sender(&self) -> CommandSender {
        CommandSender {
            inner: self.sender.clone(),
        }
    }

    /// Enqueue from the owning thread.
    pub fn push(&self, command: Command) {
        // The queue owns a receiver, so the channel cannot be disconnected here.
        let _ = self.sender.send(command);
    }

    /// Run every queued command against `editor` in arrival order.
    ///
    /// A failing command does not stop the remaining ones; each result is reported in order.
    pub fn drain(&mut self, editor: &mut Editor) -> Vec<EditResult<CommandResult>> {
        let results: Vec<_> = self
            .receiver
            .try_iter()
            .map(|command| editor.execute(command))
            .collect();
        if !results.is_empty() {
            tracing::debug!(count = results.len(), "drained command queue");
        }
        results
    }
}
