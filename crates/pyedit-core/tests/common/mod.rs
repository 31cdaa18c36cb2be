#![allow(dead_code)]

use pyedit_core::{Editor, ManualClock};
use tracing_subscriber::EnvFilter;

/// Route engine logs to the test writer; `RUST_LOG=pyedit_core=debug` shows them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An editor whose undo clock only moves when the test says so.
pub fn editor_with_clock(text: &str) -> (Editor, ManualClock) {
    init_tracing();
    let clock = ManualClock::new();
    let mut editor = Editor::from_text(text);
    editor.set_clock(Box::new(clock.clone()));
    (editor, clock)
}

/// Assert that spans cover `0..len` in order without gaps or overlaps.
pub fn assert_partition(editor: &Editor) {
    let spans = editor.spans();
    let mut expected_start = 0;
    for span in &spans {
        assert_eq!(span.start, expected_start, "gap or overlap in {spans:?}");
        assert!(span.end > span.start, "empty span in {spans:?}");
        expected_start = span.end;
    }
    assert_eq!(expected_start, editor.len_chars());
}
