use pyedit_core::{
    CaretCommand, ClipboardCommand, Command, CommandQueue, CommandResult, ContextCommand,
    EditCommand, Editor, LineMarkCommand, StyleCategory,
};
use std::thread;

#[test]
fn test_commands_from_many_threads_run_on_drain() {
    let mut editor = Editor::new();
    let mut queue = CommandQueue::new();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sender = queue.sender();
            thread::spawn(move || {
                for _ in 0..25 {
                    sender.send(Command::Edit(EditCommand::InsertRaw {
                        offset: 0,
                        text: "x".to_string(),
                    }));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Nothing runs until the owner drains.
    assert_eq!(editor.text(), "");
    let results = queue.drain(&mut editor);
    assert_eq!(results.len(), 100);
    assert_eq!(editor.len_chars(), 100);
}

#[test]
fn test_batch_drives_full_surface() {
    let mut editor = Editor::new();
    let results = editor
        .execute_batch(vec![
            Command::Edit(EditCommand::SetText {
                text: "def f():\n  x = 1\n".to_string(),
            }),
            Command::Context(ContextCommand::SetHighlightContext {
                keywords: vec!["def".into()],
                environment_words: vec!["f".into()],
            }),
            Command::Edit(EditCommand::ToggleComment { start: 9, end: 9 }),
            Command::LineMark(LineMarkCommand::HighlightLine { line: 1 }),
            Command::Caret(CaretCommand::GotoLine { line: 2 }),
            Command::Clipboard(ClipboardCommand::Copy { start: 11, end: 18 }),
        ])
        .unwrap();

    assert_eq!(editor.text(), "def f():\n  # x = 1\n");
    assert_eq!(editor.highlighted_line(), Some(1));
    assert_eq!(editor.category_at(4), Some(StyleCategory::EnvironmentWord));
    assert_eq!(results[4], CommandResult::Offset(9));
    assert_eq!(
        results[5],
        CommandResult::Copied {
            text: "# x = 1".into(),
            indent: 2,
        }
    );
}

#[test]
fn test_dropped_queue_rejects_sends() {
    let queue = CommandQueue::new();
    let sender = queue.sender();
    drop(queue);
    assert!(!sender.send(Command::Edit(EditCommand::Undo)));
}
