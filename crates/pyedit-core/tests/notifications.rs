use pyedit_core::{EditOrigin, Editor, MatchState, StateChange, StateChangeType};
use std::sync::{Arc, Mutex};

fn record(editor: &mut Editor) -> Arc<Mutex<Vec<StateChange>>> {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    editor.subscribe(move |change| sink.lock().expect("lock").push(change.clone()));
    changes
}

#[test]
fn test_insert_produces_text_delta() {
    let mut editor = Editor::from_text("abc");
    let changes = record(&mut editor);

    editor.insert_raw(1, "(").unwrap();

    let changes = changes.lock().expect("lock");
    let modified: Vec<_> = changes
        .iter()
        .filter(|c| c.change_type == StateChangeType::DocumentModified)
        .collect();
    assert_eq!(modified.len(), 1);

    let delta = modified[0].text_delta.as_ref().expect("missing delta");
    assert_eq!(delta.before_char_count, 3);
    assert_eq!(delta.after_char_count, 4);
    assert_eq!(delta.origin, EditOrigin::Edit);
    assert_eq!(delta.edits[0].start, 1);
    assert_eq!(delta.edits[0].inserted_text, "(");
    assert_eq!(delta.apply("abc"), editor.text());
}

#[test]
fn test_deltas_replay_the_whole_session() {
    let mut editor = Editor::from_text("if x:");
    let changes = record(&mut editor);
    let mut shadow = editor.text();

    editor.insert_raw(5, "\n").unwrap();
    editor.insert_raw(8, "y").unwrap();
    editor.toggle_comment(0, 9).unwrap();
    editor.undo().unwrap();
    editor.redo().unwrap();

    for change in changes.lock().expect("lock").iter() {
        if let Some(delta) = &change.text_delta {
            shadow = delta.apply(&shadow);
        }
    }
    assert_eq!(shadow, editor.text());
}

#[test]
fn test_versions_increase_monotonically() {
    let mut editor = Editor::new();
    let changes = record(&mut editor);
    let start = editor.version();

    editor.insert_raw(0, "x").unwrap();
    editor.set_caret(0).unwrap();
    editor.show_error_line(1);

    let changes = changes.lock().expect("lock");
    assert!(!changes.is_empty());
    let mut expected = start;
    for change in changes.iter() {
        assert_eq!(change.old_version, expected);
        assert_eq!(change.new_version, expected + 1);
        expected = change.new_version;
    }
    assert_eq!(editor.version(), expected);
    assert!(
        changes
            .iter()
            .any(|c| c.change_type == StateChangeType::LineMarkChanged)
    );
}

#[test]
fn test_caret_state_reports_position_and_help() {
    let mut editor = Editor::from_text("x = 1\nsetColor(px, red)");
    editor.set_caret(18).unwrap();
    let state = editor.caret_state();
    assert_eq!((state.line, state.column), (2, 13));
    let help = state.help.expect("help context");
    assert_eq!(help.word, "setColor");
    assert_eq!(help.argument, Some(1));

    editor.set_caret(8).unwrap();
    let help = editor.caret_state().help.expect("help context");
    assert_eq!(help.word, "setColor");
    assert_eq!(help.argument, None);
}

#[test]
fn test_bracket_state_lifecycle() {
    let mut editor = Editor::from_text("f(a)");
    editor.set_caret(2).unwrap();
    assert_eq!(editor.caret_state().bracket, MatchState::Matched(1, 3));

    // Selections wider than one character never match.
    editor.select(0, 4).unwrap();
    assert_eq!(editor.bracket_state(), MatchState::NoMatch);
}

#[test]
fn test_document_state() {
    let mut editor = Editor::from_text("a\nb");
    let state = editor.document_state();
    assert_eq!(state.line_count, 2);
    assert_eq!(state.char_count, 3);
    assert!(!state.is_modified);
    assert!(!state.can_undo);

    editor.insert_raw(0, "z").unwrap();
    let state = editor.document_state();
    assert!(state.is_modified);
    assert!(state.can_undo);
}
