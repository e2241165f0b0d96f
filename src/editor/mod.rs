use std::{path::{Path, PathBuf}, time};

use crate::{
    app::input::{InputProvider, Key, MouseButton},
    engine::config::EditorConfigs,
    level::{Level, LevelResult},
    log,
    render::{Renderer, TextureHandle},
    tile::{
        camera::CameraControls,
        catalog::{ReferenceCode, TileCatalog},
        projection::ProjectionTransform,
        rendering::{SelectionOverlay, TileGridRenderStats, TileGridRenderer, TileLayerView},
        selection::{self, SelectionEngine},
        tools::{self, EditMode, EditTool, TerrainTool, Tool, ToolSettings},
    },
    utils::{coords::GridIndex, Color, Size},
};


// ----------------------------------------------
// Constants
// ----------------------------------------------

pub const YAW_STEP_DEGREES: f32 = 15.0;
pub const TILT_STEP_DEGREES: f32 = 5.0;

pub const UNTITLED_LEVEL_FILE_NAME: &str = "untitled.json";

// ----------------------------------------------
// Editor
// ----------------------------------------------

// Owns the document and all editing state. Input is polled once per
// frame through `update()`; drawing goes through `draw()`.
pub struct Editor {
    level: Level,
    projection: ProjectionTransform,
    selection: SelectionEngine,

    edit_mode: EditMode,
    terrain_tool: TerrainTool,
    tool_settings: ToolSettings,
    paint_code: Option<ReferenceCode>,

    // Cleared while the UI has captured mouse/keyboard.
    controls_enabled: bool,

    tile_size: f32,
    elevation_step: f32,
    camera_controls: CameraControls,
    selection_color: Color,
    drag_selection_color: Color,
    levels_dir: PathBuf,
}

impl Editor {
    pub fn new(configs: &EditorConfigs, mut level: Level) -> Self {
        level.camera_mut().set_zoom(configs.initial_zoom);

        Self {
            level,
            projection: ProjectionTransform::new(configs.rotation_y_degrees, configs.rotation_down_degrees),
            selection: SelectionEngine::new(configs.selection_mode, configs.brush_size),
            edit_mode: EditMode::default(),
            terrain_tool: TerrainTool::default(),
            tool_settings: configs.tool_settings,
            paint_code: None,
            controls_enabled: true,
            tile_size: configs.tile_size,
            elevation_step: configs.elevation_step,
            camera_controls: configs.camera_controls,
            selection_color: configs.selection_color,
            drag_selection_color: configs.drag_selection_color,
            levels_dir: configs.levels_dir.clone(),
        }
    }

    // ----------------------
    // Accessors:
    // ----------------------

    #[inline]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[inline]
    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    #[inline]
    pub fn projection(&self) -> &ProjectionTransform {
        &self.projection
    }

    #[inline]
    pub fn projection_mut(&mut self) -> &mut ProjectionTransform {
        &mut self.projection
    }

    #[inline]
    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    #[inline]
    pub fn selection_mut(&mut self) -> &mut SelectionEngine {
        &mut self.selection
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    #[inline]
    pub fn elevation_step(&self) -> f32 {
        self.elevation_step
    }

    #[inline]
    pub fn tool_settings(&self) -> &ToolSettings {
        &self.tool_settings
    }

    #[inline]
    pub fn tool_settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.tool_settings
    }

    #[inline]
    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    pub fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.level.camera_mut().set_viewport_size(size);
    }

    // ----------------------
    // Edit mode / tools:
    // ----------------------

    #[inline]
    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        if self.edit_mode != mode {
            self.edit_mode = mode;
            self.selection.clear();
        }
    }

    #[inline]
    pub fn terrain_tool(&self) -> TerrainTool {
        self.terrain_tool
    }

    // Picking a terrain tool also switches to terrain editing.
    pub fn set_terrain_tool(&mut self, tool: TerrainTool) {
        self.terrain_tool = tool;
        self.set_edit_mode(EditMode::Terrain);
    }

    #[inline]
    pub fn paint_code(&self) -> Option<ReferenceCode> {
        self.paint_code
    }

    // Picking a tile type also switches to tile painting.
    pub fn set_paint_code(&mut self, code: ReferenceCode) {
        self.paint_code = Some(code);
        self.set_edit_mode(EditMode::Tile);
    }

    // Tool a commit would run right now, if any.
    pub fn active_tool(&self) -> Option<Tool> {
        tools::tool_for_commit(self.edit_mode, self.terrain_tool, &self.tool_settings, self.paint_code)
    }

    // ----------------------
    // Update:
    // ----------------------

    pub fn update(&mut self, input: &impl InputProvider, delta_time: time::Duration) {
        if !self.controls_enabled {
            return;
        }

        self.level.camera_mut().update(input, &self.camera_controls, delta_time);
        self.handle_key_shortcuts(input);

        let grid_size = self.level.grid().size();
        let view = self.level.camera_mut().view_transform();
        let hovered = selection::cursor_to_cell(input.cursor_pos(), &view, &self.projection, self.tile_size, grid_size);

        if self.edit_mode != EditMode::None {
            self.selection.update(hovered, grid_size, input);
        }

        if input.button_pressed(MouseButton::Right) {
            self.commit();
        }
    }

    fn handle_key_shortcuts(&mut self, input: &impl InputProvider) {
        if input.is_control_down() {
            if input.key_pressed(Key::S) {
                // Already logged on failure.
                let _ = self.save_level(None);
            }
            return;
        }

        if input.key_pressed(Key::Q) { self.projection.rotate_y_by(-YAW_STEP_DEGREES); }
        if input.key_pressed(Key::E) { self.projection.rotate_y_by(YAW_STEP_DEGREES); }

        if input.key_pressed(Key::PageUp)   { self.projection.tilt_by(TILT_STEP_DEGREES); }
        if input.key_pressed(Key::PageDown) { self.projection.tilt_by(-TILT_STEP_DEGREES); }

        if input.key_pressed(Key::Tab) {
            self.selection.toggle_mode();
        }

        if input.key_pressed(Key::RightBracket) { self.selection.grow_brush(); }
        if input.key_pressed(Key::LeftBracket)  { self.selection.shrink_brush(); }

        const TOOL_KEYS: [(Key, TerrainTool); 4] = [
            (Key::Num1, TerrainTool::Elevate),
            (Key::Num2, TerrainTool::Lower),
            (Key::Num3, TerrainTool::Smooth),
            (Key::Num4, TerrainTool::ZeroElevation),
        ];

        for (key, tool) in TOOL_KEYS {
            if input.key_pressed(key) {
                self.set_terrain_tool(tool);
            }
        }

        if input.key_pressed(Key::Escape) {
            self.selection.clear();
        }
    }

    // Applies the active tool to the current selection. Returns the tool
    // that ran, or None if nothing was selected or no tool is active.
    pub fn commit(&mut self) -> Option<Tool> {
        let tool = self.active_tool()?;

        let selected = self.selection.current_selection();
        if selected.is_empty() {
            return None;
        }

        tool.apply(selected, self.level.grid_mut());
        log::verbose!("editor", "Applied {tool} to {} cells.", selected.len());

        self.selection.on_commit();
        Some(tool)
    }

    // ----------------------
    // Document:
    // ----------------------

    pub fn new_level(&mut self, num_rows: i32, num_cols: i32, default_code: ReferenceCode) -> LevelResult<()> {
        let viewport_size = self.level.camera().viewport_size();

        let level = Level::new(num_rows, num_cols, default_code, viewport_size).inspect_err(|err| {
            log::error!("editor", "Failed to create {num_rows}x{num_cols} level: {err}");
        })?;

        self.replace_level(level);
        log::info!("editor", "New {num_rows}x{num_cols} level.");
        Ok(())
    }

    // The current document is left untouched if loading fails.
    pub fn load_level(&mut self, path: &Path, catalog: &TileCatalog) -> LevelResult<()> {
        let viewport_size = self.level.camera().viewport_size();

        let level = Level::load(path, catalog, viewport_size).inspect_err(|err| {
            log::error!("editor", "Failed to load level {path:?}: {err}");
        })?;

        self.replace_level(level);
        Ok(())
    }

    // Saves to `path`, or to the current document path, or to
    // <levels_dir>/untitled.json. Returns the path written.
    pub fn save_level(&mut self, path: Option<&Path>) -> LevelResult<PathBuf> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self.level.path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.levels_dir.join(UNTITLED_LEVEL_FILE_NAME)),
        };

        if let Some(parent) = path.parent() {
            // Ignore errors here; the write below reports them.
            let _ = std::fs::create_dir_all(parent);
        }

        self.level.save(&path).inspect_err(|err| {
            log::error!("editor", "Failed to save level {path:?}: {err}");
        })?;

        Ok(path)
    }

    fn replace_level(&mut self, level: Level) {
        self.level = level;
        self.selection.clear();
    }

    // ----------------------
    // Drawing:
    // ----------------------

    pub fn draw(&mut self,
                renderer: &mut impl Renderer,
                catalog: &TileCatalog,
                grid_renderer: &mut TileGridRenderer) -> TileGridRenderStats {

        let view = self.level.camera_mut().view_transform();

        let layer = TileLayerView {
            projection: &self.projection,
            view,
            tile_size: self.tile_size,
            elevation_step: self.elevation_step,
        };

        let overlay = SelectionOverlay {
            cells: self.selection.current_selection(),
            hovered: if self.edit_mode != EditMode::None { self.selection.hovered() } else { GridIndex::invalid() },
            texture: self.overlay_texture(catalog),
            color: if self.selection.is_dragging() { self.drag_selection_color } else { self.selection_color },
        };

        grid_renderer.draw_grid(renderer, self.level.grid(), catalog, &layer, &overlay)
    }

    // Tile mode previews the active tile type; everything else uses a flat highlight.
    fn overlay_texture(&self, catalog: &TileCatalog) -> TextureHandle {
        match (self.edit_mode, self.paint_code) {
            (EditMode::Tile, Some(code)) => catalog
                .lookup(code)
                .map(|tile_type| tile_type.texture)
                .unwrap_or_else(|_| TextureHandle::invalid()),
            _ => TextureHandle::white(),
        }
    }
}
