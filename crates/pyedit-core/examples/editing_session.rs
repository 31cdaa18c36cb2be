//! Walks through a short editing session and prints the engine's view of it.
//!
//! Run with `RUST_LOG=pyedit_core=debug` to see the auto-edit and undo decisions.

use pyedit_core::{Command, CommandQueue, EditCommand, Editor, StateChangeType};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut editor = Editor::new();
    editor.set_environment_source(|| vec!["show".to_string(), "makePicture".to_string()]);
    editor.subscribe(|change| {
        if change.change_type == StateChangeType::DocumentModified {
            println!("v{} -> v{}", change.old_version, change.new_version);
        }
    });

    // Type a function header through the snippet and placeholder jump.
    editor.insert_raw(0, "def").unwrap();
    let out = editor.insert_raw(3, " ").unwrap();
    if let Some((start, end)) = out.selection {
        editor.replace_selection(start, end, "draw").unwrap();
    }
    let caret = editor.caret();
    editor.insert_raw(caret, "\t").unwrap();
    let caret = editor.caret();
    editor.insert_raw(caret, "pic").unwrap();

    // Requests from elsewhere wait in the queue until the owner drains it.
    let mut queue = CommandQueue::new();
    let end = editor.len_chars();
    queue.push(Command::Edit(EditCommand::InsertRaw {
        offset: end,
        text: "\n".to_string(),
    }));
    queue.drain(&mut editor);
    let caret = editor.caret();
    editor.insert_raw(caret, "show(pic)").unwrap();

    println!("{}", editor.text());
    for span in editor.spans() {
        println!("{:>4}..{:<4} {}", span.start, span.end, span.category);
    }
    let state = editor.caret_state();
    println!("caret at {}:{} help={:?}", state.line, state.column, state.help);
}
