use pyedit_core::{Editor, SearchDirection, SearchMatch, SearchOptions};

#[test]
fn test_search_forward_selects_and_advances() {
    let mut editor = Editor::from_text("cat dog cat dog");
    let first = editor.search_forward("dog").unwrap().unwrap();
    assert_eq!(first, SearchMatch { start: 4, end: 7 });
    assert_eq!(editor.selection(), Some((4, 7)));
    assert_eq!(editor.caret(), 7);

    let second = editor.search_forward("dog").unwrap().unwrap();
    assert_eq!(second.start, 12);
}

#[test]
fn test_search_forward_wraps_once() {
    let mut editor = Editor::from_text("needle hay hay");
    editor.set_caret(10).unwrap();
    let found = editor.search_forward("needle").unwrap();
    assert_eq!(found, Some(SearchMatch { start: 0, end: 6 }));
}

#[test]
fn test_search_backward_wraps_to_end() {
    let mut editor = Editor::from_text("hay hay needle");
    editor.set_caret(3).unwrap();
    let found = editor.search_backward("needle").unwrap().unwrap();
    assert_eq!(found.start, 8);
    assert_eq!(editor.caret(), 8);

    let again = editor.search_backward("hay").unwrap().unwrap();
    assert_eq!(again.start, 4);
}

#[test]
fn test_search_miss_is_not_an_error() {
    let mut editor = Editor::from_text("abc");
    editor.set_caret(2).unwrap();
    assert_eq!(editor.search_forward("zzz").unwrap(), None);
    assert_eq!(editor.search_backward("zzz").unwrap(), None);
    assert_eq!(editor.caret(), 2);
}

#[test]
fn test_search_with_options() {
    let mut editor = Editor::from_text("Print print printer");
    let options = SearchOptions {
        case_sensitive: true,
        whole_word: true,
        regex: false,
    };
    let found = editor
        .search("print", options, SearchDirection::Forward)
        .unwrap();
    assert_eq!(found, Some(SearchMatch { start: 6, end: 11 }));

    let bad = editor.search(
        "(",
        SearchOptions {
            regex: true,
            ..SearchOptions::default()
        },
        SearchDirection::Forward,
    );
    assert!(bad.is_err());
}
