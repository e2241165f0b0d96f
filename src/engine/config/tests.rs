use super::*;

fn temp_configs_dir(test_name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("iso_editor_configs_{test_name}_{}", std::process::id()))
}

#[test]
fn test_editor_config_defaults() {
    let configs = EditorConfigs::default();

    assert_eq!(configs.tile_size, 70.0);
    assert_eq!(configs.rotation_y_degrees, 45.0);
    assert_eq!(configs.rotation_down_degrees, 30.0);
    assert_eq!(configs.camera_controls.zoom_step, 1.1);
    assert_eq!(configs.brush_size, 2);
    assert_eq!(configs.selection_mode, SelectionMode::ClickDrag);
    assert_eq!(configs.tool_settings.elevate_amount, 1);
    assert_eq!(configs.tool_settings.smooth_strength, 1.0);
    assert_eq!(configs.selection_color, Color::from_rgba8(150, 150, 150, 150));
    assert_eq!(configs.drag_selection_color, Color::from_rgba8(150, 250, 150, 150));
}

#[test]
fn test_partial_config_fills_defaults() {
    let json = r#"{
        "tile_size": 32.0,
        "selection_mode": "SquareSelect",
        "tool_settings": { "smooth_strength": 0.5 }
    }"#;

    let configs: EditorConfigs = serde_json::from_str(json).unwrap();
    let defaults = EditorConfigs::default();

    assert_eq!(configs.tile_size, 32.0);
    assert_eq!(configs.selection_mode, SelectionMode::SquareSelect);
    assert_eq!(configs.tool_settings.smooth_strength, 0.5);
    assert_eq!(configs.tool_settings.elevate_amount, 1);

    assert_eq!(configs.window_size, defaults.window_size);
    assert_eq!(configs.brush_size, defaults.brush_size);
    assert_eq!(configs.levels_dir, defaults.levels_dir);
}

#[test]
fn test_missing_or_broken_file_returns_defaults() {
    let dir = temp_configs_dir("broken");
    let _ = std::fs::create_dir_all(&dir);

    let configs: EditorConfigs = EditorConfigs::load_file_from_dir(&dir, "does_not_exist");
    assert_eq!(configs.tile_size, EditorConfigs::default().tile_size);

    std::fs::write(dir.join("broken.json"), "{ not json").unwrap();
    let configs: EditorConfigs = EditorConfigs::load_file_from_dir(&dir, "broken");
    assert_eq!(configs.brush_size, EditorConfigs::default().brush_size);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_save_and_reload() {
    let dir = temp_configs_dir("save");

    let mut configs = EditorConfigs::default();
    configs.window_title = "Test Editor".into();
    configs.default_grid_rows = 7;
    configs.log.level = log::Level::Warn;

    assert!(configs.save_file_to_dir(&dir, "editor"));

    let reloaded: EditorConfigs = EditorConfigs::load_file_from_dir(&dir, "editor");
    assert_eq!(reloaded.window_title, "Test Editor");
    assert_eq!(reloaded.default_grid_rows, 7);
    assert_eq!(reloaded.log.level, log::Level::Warn);
    assert!(reloaded.log.tty_colors);

    let _ = std::fs::remove_dir_all(&dir);
}
