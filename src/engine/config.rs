use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize, de::DeserializeOwned};

use crate::{
    log,
    save::{JsonSaveState, SaveState},
    tile::{
        self,
        camera::{self, CameraControls},
        catalog::ReferenceCode,
        projection,
        rendering,
        selection::{self, SelectionMode},
        tools::ToolSettings,
    },
    utils::{Color, Size},
};

#[cfg(test)]
mod tests;

// ----------------------------------------------
// Configs
// ----------------------------------------------

pub const CONFIGS_DIR_PATH: &str = "assets/configs";

pub trait Configs {
    // Saves current configs to <CONFIGS_DIR_PATH>/<config_file_name>.json.
    fn save_file(&self, config_file_name: &str) -> bool
        where Self: Configs + Sized + Serialize
    {
        self.save_file_to_dir(Path::new(CONFIGS_DIR_PATH), config_file_name)
    }

    fn save_file_to_dir(&self, dir_path: &Path, config_file_name: &str) -> bool
        where Self: Configs + Sized + Serialize
    {
        debug_assert!(!config_file_name.is_empty());

        let config_json_path = config_file_path(dir_path, config_file_name);

        // First make sure the save directory exists. Ignore any errors since
        // this function might fail if any element of the path already exists.
        let _ = std::fs::create_dir_all(dir_path);

        match JsonSaveState::pretty().write_file(&config_json_path, self) {
            Ok(()) => true,
            Err(err) => {
                log::error!("config", "Failed to save config file {config_json_path:?}: {err}");
                false
            }
        }
    }

    // Either succeeds loading the config file or returns a default config.
    fn load_file<T>(config_file_name: &str) -> T
        where T: Configs + Sized + Default + DeserializeOwned
    {
        Self::load_file_from_dir(Path::new(CONFIGS_DIR_PATH), config_file_name)
    }

    fn load_file_from_dir<T>(dir_path: &Path, config_file_name: &str) -> T
        where T: Configs + Sized + Default + DeserializeOwned
    {
        debug_assert!(!config_file_name.is_empty());

        let config_json_path = config_file_path(dir_path, config_file_name);

        match JsonSaveState::compact().read_file::<T>(&config_json_path) {
            Ok(configs) => configs,
            Err(err) => {
                log::error!("config", "Failed to load config file {config_json_path:?}: {err}");
                T::default()
            }
        }
    }
}

fn config_file_path(dir_path: &Path, config_file_name: &str) -> PathBuf {
    dir_path.join(config_file_name).with_extension("json")
}

// ----------------------------------------------
// EditorConfigs
// ----------------------------------------------

pub const EDITOR_CONFIGS_FILE_NAME: &str = "editor";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)] // Missing fields in the config file get defaults from EditorConfigs::default().
pub struct EditorConfigs {
    // Window/Rendering:
    pub window_title: String,
    pub window_size: Size,
    pub window_background_color: Color,
    pub confine_cursor_to_window: bool,

    // Log:
    pub log: log::LogConfig,

    // Tile grid:
    pub tile_size: f32,
    pub elevation_step: f32,
    pub default_grid_rows: i32,
    pub default_grid_cols: i32,
    pub default_reference_code: ReferenceCode,

    // Projection/Camera:
    pub rotation_y_degrees: f32,
    pub rotation_down_degrees: f32,
    pub initial_zoom: f32,
    pub camera_controls: CameraControls,

    // Selection/Tools:
    pub brush_size: i32,
    pub selection_mode: SelectionMode,
    pub tool_settings: ToolSettings,
    pub selection_color: Color,
    pub drag_selection_color: Color,

    // Assets:
    pub tile_types_path: PathBuf,
    pub textures_dir: PathBuf,
    pub levels_dir: PathBuf,
}

impl Configs for EditorConfigs {}

impl EditorConfigs {
    pub fn load() -> Self {
        <Self as Configs>::load_file(EDITOR_CONFIGS_FILE_NAME)
    }
}

impl Default for EditorConfigs {
    fn default() -> Self {
        Self {
            // Window/Rendering:
            window_title: "IsoEditor".into(),
            window_size: Size::new(1280, 800),
            window_background_color: rendering::BACKGROUND_COLOR,
            confine_cursor_to_window: false,

            // Log:
            log: log::LogConfig::default(),

            // Tile grid:
            tile_size: tile::DEFAULT_TILE_SIZE,
            elevation_step: tile::DEFAULT_ELEVATION_STEP,
            default_grid_rows: 32,
            default_grid_cols: 32,
            default_reference_code: 1,

            // Projection/Camera:
            rotation_y_degrees: projection::DEFAULT_ROTATION_Y_DEGREES,
            rotation_down_degrees: projection::DEFAULT_ROTATION_DOWN_DEGREES,
            initial_zoom: camera::DEFAULT_ZOOM,
            camera_controls: CameraControls::default(),

            // Selection/Tools:
            brush_size: selection::DEFAULT_BRUSH_SIZE,
            selection_mode: SelectionMode::default(),
            tool_settings: ToolSettings::default(),
            selection_color: rendering::SELECTION_COLOR,
            drag_selection_color: rendering::DRAG_SELECTION_COLOR,

            // Assets:
            tile_types_path: PathBuf::from("assets/tiles/tile_types.json"),
            textures_dir: PathBuf::from("assets/tiles"),
            levels_dir: PathBuf::from("assets/levels"),
        }
    }
}
