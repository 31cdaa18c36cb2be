use pyedit_core::{Editor, EngineConfig, LanguageConfig};

#[test]
fn test_config_from_json_with_defaults() {
    let config: EngineConfig =
        serde_json::from_str(r#"{ "auto_complete": false, "indent_width": 4 }"#).unwrap();
    assert!(!config.auto_complete);
    assert_eq!(config.indent_width, 4);
    assert_eq!(config.undo_capacity, 500);
    assert_eq!(config.coalesce_window_ms, 300);
    assert!(config.matching_brackets);

    let mut editor = Editor::with_config(config, LanguageConfig::python());
    editor.insert_raw(0, "if").unwrap();
    editor.insert_raw(2, " ").unwrap();
    assert_eq!(editor.text(), "if ");
}

#[test]
fn test_config_round_trips_through_json() {
    let config = EngineConfig {
        block_outline: false,
        ..EngineConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: EngineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_bracket_matching_can_be_disabled() {
    let config: EngineConfig = serde_json::from_str(r#"{ "matching_brackets": false }"#).unwrap();
    let mut editor = Editor::with_config(config, LanguageConfig::python());
    editor.set_text("(a)");
    editor.set_caret(1).unwrap();
    assert_eq!(editor.bracket_state(), pyedit_core::MatchState::NoMatch);
}
