#![warn(missing_docs)]
//! PyEdit Core - headless code-aware editing engine
//!
//! # Overview
//!
//! `pyedit-core` is the editing kernel behind a beginner-oriented Python editor. It owns the
//! document and everything derived from it: per-character styling, structural auto-edits,
//! bracket matching, indentation geometry, paste re-indentation, comment toggling and
//! time-coalesced undo. Painting, fonts and the clipboard itself stay with the host, which
//! reads spans and geometry and feeds input through [`Editor`] or [`Command`]s.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Commands, Command Queue, Notifications     │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Editor (caret, line marks, orchestration)  │  ← Engine
//! ├─────────────────────────────────────────────┤
//! │  Auto-edit, Paste, Comments, Brackets       │  ← Editing policy
//! ├─────────────────────────────────────────────┤
//! │  Highlighter (StyleMap) + Indentation       │  ← Derived views
//! ├─────────────────────────────────────────────┤
//! │  Undo History (Clock-driven coalescing)     │  ← History
//! ├─────────────────────────────────────────────┤
//! │  TextBuffer (Rope)                          │  ← Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use pyedit_core::{Editor, StyleCategory};
//!
//! let mut editor = Editor::new();
//! editor.insert_raw(0, "print").unwrap();
//! editor.insert_raw(5, "(").unwrap();
//! assert_eq!(editor.text(), "print()");
//! assert_eq!(editor.caret(), 6);
//! assert_eq!(editor.category_at(0), Some(StyleCategory::Keyword));
//!
//! // Spans always partition the whole document.
//! let total: usize = editor.spans().iter().map(|s| s.len()).sum();
//! assert_eq!(total, editor.len_chars());
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - Rope-backed text buffer with line index
//! - [`history`] - Undo/redo with time-window coalescing
//! - [`highlight`] - Tokenizer and style spans
//! - [`auto_edit`] - Typed-character rewrites (pairs, indentation, snippets)
//! - [`brackets`] - Bracket matching
//! - [`indent`] - Block extents, outlines and indent guides
//! - [`paste`] - Paste re-indentation
//! - [`comment`] - Line comment toggling
//! - [`search`] - Wrapping text search
//! - [`help`] - Help lookups for the caret position
//! - [`engine`] - The [`Editor`] façade
//! - [`commands`] - Command interface and queue
//! - [`state`] - State queries and change notifications

pub mod auto_edit;
pub mod brackets;
pub mod buffer;
pub mod commands;
pub mod comment;
pub mod config;
pub mod delta;
pub mod engine;
pub mod error;
pub mod help;
pub mod highlight;
pub mod history;
pub mod indent;
pub mod paste;
pub mod search;
pub mod state;

pub use brackets::MatchState;
pub use buffer::TextBuffer;
pub use commands::{
    CaretCommand, ClipboardCommand, Command, CommandQueue, CommandResult, CommandSender,
    ContextCommand, EditCommand, LineMarkCommand,
};
pub use config::EngineConfig;
pub use delta::{EditOrigin, TextDelta, TextDeltaEdit};
pub use engine::{Editor, EnvironmentSource, InsertOutcome};
pub use error::{EditError, EditResult};
pub use help::HelpContext;
pub use highlight::{HighlightContext, StyleCategory, StyleSpan};
pub use history::{Clock, EditKind, EditRecord, ManualClock, SystemClock, UndoHistory};
pub use indent::{BlockOutline, IndentGuide};
pub use paste::CopyMemory;
pub use search::{SearchDirection, SearchMatch, SearchOptions};
pub use state::{
    CaretState, DocumentState, StateChange, StateChangeCallback, StateChangeType,
};

pub use pyedit_lang::{CommentConfig, LanguageConfig, Snippet};
