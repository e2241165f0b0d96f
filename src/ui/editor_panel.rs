use std::{path::Path, sync::{Arc, Mutex}};
use strum::IntoEnumIterator;

use crate::{
    editor::Editor,
    engine::config::EditorConfigs,
    log,
    tile::{
        camera,
        catalog::{ReferenceCode, TileCatalog},
        projection,
        rendering::TileGridRenderer,
        selection::{self, SelectionMode},
        tools::{EditMode, TerrainTool},
    },
};

// ----------------------------------------------
// StatusLine
// ----------------------------------------------

#[derive(Clone)]
struct StatusMessage {
    level: log::Level,
    text: String,
}

// Latest log record, shared with the global log listener.
type StatusLine = Arc<Mutex<Option<StatusMessage>>>;

// ----------------------------------------------
// EditorPanel
// ----------------------------------------------

pub struct EditorPanel {
    level_path: String,
    new_level_rows: i32,
    new_level_cols: i32,
    default_code: ReferenceCode,
    status: StatusLine,
}

impl EditorPanel {
    pub fn new(configs: &EditorConfigs) -> Self {
        let status = StatusLine::default();

        let listener_status = Arc::clone(&status);
        let installed = log::set_listener(log::Level::Info, move |record| {
            if let Ok(mut status) = listener_status.lock() {
                *status = Some(StatusMessage { level: record.level, text: record.message.clone() });
            }
        });

        if !installed {
            log::warn!("editor", "Log listener already installed; status line disabled.");
        }

        Self {
            level_path: configs.levels_dir.join("untitled.json").to_string_lossy().into_owned(),
            new_level_rows: configs.default_grid_rows,
            new_level_cols: configs.default_grid_cols,
            default_code: configs.default_reference_code,
            status,
        }
    }

    pub fn draw(&mut self,
                ui: &imgui::Ui,
                editor: &mut Editor,
                catalog: &TileCatalog,
                grid_renderer: &mut TileGridRenderer) {

        ui.window("Editor")
            .position([10.0, 10.0], imgui::Condition::FirstUseEver)
            .size([320.0, 640.0], imgui::Condition::FirstUseEver)
            .build(|| {
                self.draw_tools(ui, editor);
                self.draw_view(ui, editor);
                self.draw_content_browser(ui, editor, catalog);
                self.draw_level_controls(ui, editor, catalog, grid_renderer);
                self.draw_status(ui, editor);
            });
    }

    fn draw_tools(&self, ui: &imgui::Ui, editor: &mut Editor) {
        if !ui.collapsing_header("Tools", imgui::TreeNodeFlags::DEFAULT_OPEN) {
            return;
        }

        ui.text("Edit mode:");
        for mode in EditMode::iter() {
            ui.same_line();
            if ui.radio_button_bool(mode.to_string(), editor.edit_mode() == mode) {
                editor.set_edit_mode(mode);
            }
        }

        for tool in TerrainTool::iter() {
            let active = editor.edit_mode() == EditMode::Terrain && editor.terrain_tool() == tool;
            if ui.radio_button_bool(tool.to_string(), active) {
                editor.set_terrain_tool(tool);
            }
        }

        let settings = editor.tool_settings_mut();
        ui.slider("Elevate amount", 1, 64, &mut settings.elevate_amount);
        ui.slider("Smooth strength", 0.0, 1.0, &mut settings.smooth_strength);

        ui.separator();

        for mode in SelectionMode::iter() {
            if ui.radio_button_bool(mode.to_string(), editor.selection().mode() == mode) {
                editor.selection_mut().set_mode(mode);
            }
        }

        let mut brush_size = editor.selection().brush_size();
        if ui.slider("Brush size", selection::MIN_BRUSH_SIZE, selection::MAX_BRUSH_SIZE, &mut brush_size) {
            editor.selection_mut().set_brush_size(brush_size);
        }
    }

    fn draw_view(&self, ui: &imgui::Ui, editor: &mut Editor) {
        if !ui.collapsing_header("View", imgui::TreeNodeFlags::DEFAULT_OPEN) {
            return;
        }

        let mut yaw = editor.projection().rotation_y_degrees();
        if ui.slider("Yaw", 0.0, 359.0, &mut yaw) {
            editor.projection_mut().set_rotation_y(yaw);
        }

        let mut tilt = editor.projection().rotation_down_degrees();
        if ui.slider("Tilt", projection::MIN_ROTATION_DOWN_DEGREES, projection::MAX_ROTATION_DOWN_DEGREES, &mut tilt) {
            editor.projection_mut().set_rotation_down(tilt);
        }

        let mut zoom = editor.level().camera().current_zoom();
        if ui.slider("Zoom", camera::MIN_ZOOM, camera::MAX_ZOOM, &mut zoom) {
            editor.level_mut().camera_mut().set_zoom(zoom);
        }
    }

    fn draw_content_browser(&self, ui: &imgui::Ui, editor: &mut Editor, catalog: &TileCatalog) {
        if !ui.collapsing_header("Tile Types", imgui::TreeNodeFlags::DEFAULT_OPEN) {
            return;
        }

        for tile_type in catalog.iter() {
            let flags = format!("{}{}",
                                if tile_type.is_walkable()  { "W" } else { "-" },
                                if tile_type.is_buildable() { "B" } else { "-" });

            let label = format!("{:>5}  {flags}  {}", tile_type.reference_code, tile_type.texture_name);
            let active = editor.edit_mode() == EditMode::Tile && editor.paint_code() == Some(tile_type.reference_code);

            if ui.selectable_config(&label).selected(active).build() {
                editor.set_paint_code(tile_type.reference_code);
            }
        }
    }

    fn draw_level_controls(&mut self,
                           ui: &imgui::Ui,
                           editor: &mut Editor,
                           catalog: &TileCatalog,
                           grid_renderer: &mut TileGridRenderer) {

        if !ui.collapsing_header("Level", imgui::TreeNodeFlags::DEFAULT_OPEN) {
            return;
        }

        ui.input_text("Path", &mut self.level_path).build();

        if ui.button("Load") && editor.load_level(Path::new(&self.level_path), catalog).is_ok() {
            grid_renderer.reset();
        }
        ui.same_line();
        if ui.button("Save") {
            // Errors are logged and shown in the status line.
            let _ = editor.save_level(Some(Path::new(&self.level_path)));
        }

        ui.input_int("Rows", &mut self.new_level_rows).build();
        ui.input_int("Cols", &mut self.new_level_cols).build();

        if ui.button("New") {
            let code = catalog.first_code().unwrap_or(self.default_code);
            if editor.new_level(self.new_level_rows, self.new_level_cols, code).is_ok() {
                grid_renderer.reset();
            }
        }
    }

    fn draw_status(&self, ui: &imgui::Ui, editor: &Editor) {
        ui.separator();

        let grid = editor.level().grid();
        let hovered = editor.selection().hovered();

        if hovered.is_valid() {
            if let Ok(cell) = grid.get(hovered) {
                ui.text(format!("{} grid | cell {hovered} | type {} | elevation {}",
                                grid.size(), cell.reference_code, cell.elevation));
            }
        } else {
            ui.text(format!("{} grid", grid.size()));
        }

        ui.text(format!("Selected: {}", editor.selection().current_selection().len()));

        let status = self.status.lock().ok().and_then(|status| status.clone());
        if let Some(message) = status {
            ui.text_colored(message.level.color().to_array(), &message.text);
        }
    }
}
