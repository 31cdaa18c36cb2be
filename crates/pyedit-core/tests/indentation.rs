mod common;

use common::editor_with_clock;
use pretty_assertions::assert_eq;
use pyedit_core::{Editor, EngineConfig, IndentGuide, LanguageConfig};

#[test]
fn test_decrease_indent_removes_at_most_one_unit() {
    let (mut editor, _clock) = editor_with_clock("     a\n b\nc");
    assert!(editor.decrease_indent(0, 11).unwrap());
    assert_eq!(editor.text(), "   a\nb\nc");
    assert!(editor.decrease_indent(0, 8).unwrap());
    assert_eq!(editor.text(), " a\nb\nc");
    assert!(editor.decrease_indent(0, 6).unwrap());
    assert_eq!(editor.text(), "a\nb\nc");
}

#[test]
fn test_decrease_indent_at_column_zero_is_no_op() {
    let (mut editor, _clock) = editor_with_clock("a\nb");
    assert!(!editor.decrease_indent(0, 3).unwrap());
    assert_eq!(editor.text(), "a\nb");
    assert!(!editor.can_undo());
}

#[test]
fn test_increase_indent_keeps_selection_on_text() {
    let (mut editor, _clock) = editor_with_clock("x\ny\nz");
    editor.increase_indent(2, 3).unwrap();
    assert_eq!(editor.text(), "x\n  y\nz");
    assert_eq!(editor.selection(), Some((4, 5)));
}

#[test]
fn test_selection_ending_at_line_start_excludes_that_line() {
    let (mut editor, _clock) = editor_with_clock("a\nb\nc");
    editor.increase_indent(0, 4).unwrap();
    assert_eq!(editor.text(), "  a\n  b\nc");
}

#[test]
fn test_indent_width_follows_config() {
    let config = EngineConfig {
        indent_width: 4,
        ..EngineConfig::default()
    };
    let mut editor = Editor::with_config(config, LanguageConfig::python());
    editor.set_text("if x:");
    editor.insert_raw(5, "\n").unwrap();
    assert_eq!(editor.text(), "if x:\n    ");
    editor.increase_indent(0, 0).unwrap();
    assert_eq!(editor.text(), "    if x:\n    ");
}

#[test]
fn test_block_outline_for_caret_row() {
    let mut editor = Editor::from_text("def f():\n  a\n\n  b\nc");
    editor.set_caret(0).unwrap();
    assert_eq!(editor.block_outline(), None);

    editor.goto_line(2);
    let outline = editor.block_outline().unwrap();
    assert_eq!((outline.first_row, outline.last_row), (1, 3));
    assert_eq!(outline.indent, 2);
    assert_eq!(outline.width, 3);
}

#[test]
fn test_outlines_can_be_disabled() {
    let config = EngineConfig {
        block_outline: false,
        ..EngineConfig::default()
    };
    let mut editor = Editor::with_config(config, LanguageConfig::python());
    editor.set_text("if x:\n  y");
    editor.goto_line(2);
    assert_eq!(editor.block_outline(), None);
    assert!(editor.indent_guides().is_empty());
}

#[test]
fn test_indent_guides_follow_nesting() {
    let editor = Editor::from_text("for i in x:\n  if i:\n    y\n  z\n");
    assert_eq!(
        editor.indent_guides(),
        vec![
            IndentGuide {
                owner_row: 0,
                column: 0,
                first_row: 1,
                last_row: 3,
            },
            IndentGuide {
                owner_row: 1,
                column: 2,
                first_row: 2,
                last_row: 2,
            },
        ]
    );
}
