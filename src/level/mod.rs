use std::{fmt, fs, io, path::{Path, PathBuf}};
use serde::{Deserialize, Serialize};

use crate::{
    log,
    save::{grid_format, JsonSaveState, SaveError, SaveState},
    tile::{
        camera::{self, Camera},
        catalog::{ReferenceCode, TileCatalog},
        grid::{TileCell, TileGrid, TileGridError},
    },
    utils::{Size, Vec2},
};

#[cfg(test)]
mod tests;

// ----------------------------------------------
// LevelError
// ----------------------------------------------

#[derive(Debug)]
pub enum LevelError {
    Io(io::Error),
    Format(String),
    Grid(TileGridError),
    UnsupportedExtension(PathBuf),
}

pub type LevelResult<T> = Result<T, LevelError>;

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Format(msg) => write!(f, "invalid level data: {msg}"),
            Self::Grid(err) => write!(f, "{err}"),
            Self::UnsupportedExtension(path) => {
                write!(f, "unsupported level file {path:?}, expected .json or .{}", grid_format::FILE_EXTENSION)
            }
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Grid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for LevelError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<SaveError> for LevelError {
    fn from(err: SaveError) -> Self {
        match err {
            SaveError::Io(err) => Self::Io(err),
            SaveError::Format(msg) => Self::Format(msg),
        }
    }
}

impl From<TileGridError> for LevelError {
    fn from(err: TileGridError) -> Self {
        Self::Grid(err)
    }
}

// ----------------------------------------------
// LevelFormat
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LevelFormat {
    Json,   // LevelData, grid + camera.
    Binary, // Raw grid only, see `save::grid_format`.
}

impl LevelFormat {
    pub fn from_path(path: &Path) -> LevelResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some(ext) if ext == grid_format::FILE_EXTENSION => Ok(Self::Binary),
            _ => Err(LevelError::UnsupportedExtension(path.to_path_buf())),
        }
    }
}

// ----------------------------------------------
// LevelData
// ----------------------------------------------

// Serialized form of a level in the JSON format.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelData {
    pub rows: i32,
    pub cols: i32,
    pub tiles: Vec<TileCell>, // Row-major.
    #[serde(default)]
    pub camera_displacement: Vec2,
    #[serde(default = "default_camera_zoom")]
    pub camera_zoom: f32,
}

fn default_camera_zoom() -> f32 {
    camera::DEFAULT_ZOOM
}

// ----------------------------------------------
// Level
// ----------------------------------------------

// The edited document: tile grid plus the camera looking at it.
// Replaced wholesale on new/load; never patched in place by IO.
pub struct Level {
    grid: TileGrid,
    camera: Camera,
    path: Option<PathBuf>,
}

impl Level {
    pub fn new(num_rows: i32,
               num_cols: i32,
               default_code: ReferenceCode,
               viewport_size: Size) -> LevelResult<Self> {
        Ok(Self {
            grid: TileGrid::new(num_rows, num_cols, default_code)?,
            camera: Camera::new(viewport_size),
            path: None,
        })
    }

    // Every reference code must resolve in `catalog`, otherwise the load fails.
    pub fn load(path: &Path, catalog: &TileCatalog, viewport_size: Size) -> LevelResult<Self> {
        let format = LevelFormat::from_path(path)?;
        let mut camera = Camera::new(viewport_size);

        let grid = match format {
            LevelFormat::Json => {
                let data: LevelData = JsonSaveState::compact().read_file(path)?;
                camera.set_displacement(data.camera_displacement);
                camera.set_zoom(data.camera_zoom);

                TileGrid::load(data.tiles, data.rows, data.cols)?
            }
            LevelFormat::Binary => {
                let bytes = fs::read(path)?;
                grid_format::decode_grid(&bytes)?
            }
        };

        grid.validate_references(catalog)?;

        log::info!("level", "Loaded {} level from {path:?}.", grid.size());

        Ok(Self { grid, camera, path: Some(path.to_path_buf()) })
    }

    // On success the level remembers `path` for later saves.
    pub fn save(&mut self, path: &Path) -> LevelResult<()> {
        match LevelFormat::from_path(path)? {
            LevelFormat::Json => {
                let data = LevelData {
                    rows: self.grid.num_rows(),
                    cols: self.grid.num_cols(),
                    tiles: self.grid.pack(),
                    camera_displacement: self.camera.displacement(),
                    camera_zoom: self.camera.current_zoom(),
                };

                JsonSaveState::pretty().write_file(path, &data)?;
            }
            LevelFormat::Binary => {
                fs::write(path, grid_format::encode_grid(&self.grid))?;
            }
        }

        log::info!("level", "Saved level to {path:?}.");

        self.path = Some(path.to_path_buf());
        Ok(())
    }

    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    #[inline]
    pub fn grid_mut(&mut self) -> &mut TileGrid {
        &mut self.grid
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
