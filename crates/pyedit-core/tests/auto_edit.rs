mod common;

use common::init_tracing;
use pretty_assertions::assert_eq;
use pyedit_core::Editor;

#[test]
fn test_open_paren_pairs_in_empty_buffer() {
    init_tracing();
    let mut editor = Editor::new();
    let out = editor.insert_raw(0, "(").unwrap();
    assert_eq!(editor.text(), "()");
    assert_eq!(out.caret, 1);
}

#[test]
fn test_open_paren_before_word_is_not_paired() {
    let mut editor = Editor::from_text("abc");
    let out = editor.insert_raw(0, "(").unwrap();
    assert_eq!(editor.text(), "(abc");
    assert_eq!(out.applied, "(");
    assert_eq!(out.caret, 1);
}

#[test]
fn test_quotes_pair_and_skip() {
    let mut editor = Editor::new();
    editor.insert_raw(0, "\"").unwrap();
    editor.insert_raw(1, "hi").unwrap();
    let out = editor.insert_raw(3, "\"").unwrap();
    assert_eq!(editor.text(), "\"hi\"");
    assert_eq!(out.applied, "");
    assert_eq!(out.caret, 4);
}

#[test]
fn test_colon_before_colon_only_moves_caret() {
    let mut editor = Editor::from_text("x:");
    let out = editor.insert_raw(1, ":").unwrap();
    assert_eq!(editor.text(), "x:");
    assert_eq!(out.caret_delta, 1);
    assert_eq!(editor.caret(), 2);
    assert!(!editor.can_undo());
}

#[test]
fn test_closing_bracket_skips_existing() {
    let mut editor = Editor::new();
    editor.insert_raw(0, "[").unwrap();
    editor.insert_raw(1, "1").unwrap();
    editor.insert_raw(2, "]").unwrap();
    assert_eq!(editor.text(), "[1]");
    assert_eq!(editor.caret(), 3);
}

#[test]
fn test_newline_after_colon_indents_one_unit() {
    let mut editor = Editor::from_text("if x:");
    let out = editor.insert_raw(5, "\n").unwrap();
    assert_eq!(editor.text(), "if x:\n  ");
    assert_eq!(out.caret, 8);
}

#[test]
fn test_newline_keeps_current_indent() {
    let mut editor = Editor::from_text("def f():\n  a = 1");
    editor.insert_raw(16, "\n").unwrap();
    assert_eq!(editor.text(), "def f():\n  a = 1\n  ");
}

#[test]
fn test_tab_inserts_spaces_to_next_unit() {
    let mut editor = Editor::from_text("x");
    editor.insert_raw(1, "\t").unwrap();
    assert_eq!(editor.text(), "x ");
    editor.insert_raw(2, "\t").unwrap();
    assert_eq!(editor.text(), "x   ");
}

#[test]
fn test_statement_snippets() {
    for (trigger, expanded, selected) in [
        ("def", "def methodName():", "methodName"),
        ("if", "if condition:", "condition"),
        ("elif", "elif condition:", "condition"),
        ("while", "while condition:", "condition"),
        ("for", "for i in range():", "i"),
    ] {
        let mut editor = Editor::new();
        editor.insert_raw(0, trigger).unwrap();
        let out = editor.insert_raw(trigger.len(), " ").unwrap();
        assert_eq!(editor.text(), expanded);
        let (start, end) = out.selection.unwrap();
        assert_eq!(&editor.text()[start..end], selected);
    }
}

#[test]
fn test_snippets_respect_auto_complete_switch() {
    let mut editor = Editor::new();
    editor.set_auto_complete(false);
    editor.insert_raw(0, "def").unwrap();
    editor.insert_raw(3, " ").unwrap();
    assert_eq!(editor.text(), "def ");
}

#[test]
fn test_indented_snippet() {
    let mut editor = Editor::from_text("def f():\n  if");
    editor.insert_raw(13, " ").unwrap();
    assert_eq!(editor.text(), "def f():\n  if condition:");
    assert_eq!(editor.selection(), Some((14, 23)));
}

#[test]
fn test_for_snippet_tab_lands_in_range_call() {
    let mut editor = Editor::new();
    editor.insert_raw(0, "for").unwrap();
    editor.insert_raw(3, " ").unwrap();
    editor.replace_selection(4, 5, "n").unwrap();
    let out = editor.insert_raw(5, "\t").unwrap();
    assert_eq!(out.applied, "");
    assert_eq!(editor.caret(), 15);
    editor.insert_raw(15, "10").unwrap();
    assert_eq!(editor.text(), "for n in range(10):");
}

#[test]
fn test_template_trigger_only_in_empty_buffer() {
    let mut editor = Editor::new();
    editor.replace_selection(0, 0, "~").unwrap();
    assert!(editor.text().starts_with("def greet(name):"));
    assert!(editor.undo().unwrap());
    assert_eq!(editor.text(), "");
}

#[test]
fn test_wrapping_selection_in_brackets() {
    let mut editor = Editor::from_text("x = a + b");
    editor.replace_selection(4, 9, "(").unwrap();
    assert_eq!(editor.text(), "x = (a + b)");
    assert_eq!(editor.selection(), Some((5, 10)));
}

#[test]
fn test_tab_over_multiline_selection_indents() {
    let mut editor = Editor::from_text("a\nb\nc");
    editor.replace_selection(0, 3, "\t").unwrap();
    assert_eq!(editor.text(), "  a\n  b\nc");
}

#[test]
fn test_smart_backspace() {
    let mut editor = Editor::from_text("if x:\n    y");
    // Caret after the fourth indent space: removes back to column 2.
    assert_eq!(editor.backspace(9).unwrap(), "  ");
    assert_eq!(editor.text(), "if x:\n  y");

    let mut editor = Editor::new();
    editor.insert_raw(0, "'").unwrap();
    assert_eq!(editor.backspace(0).unwrap(), "''");
    assert_eq!(editor.text(), "");

    let mut editor = Editor::from_text("a  b");
    editor.backspace(2).unwrap();
    assert_eq!(editor.text(), "a b");
}
