// Isometric tile world: projection, camera, tile types, the grid
// document itself, selection and the edit tools that mutate it.

pub mod camera;
pub mod catalog;
pub mod grid;
pub mod projection;
pub mod rendering;
pub mod selection;
pub mod tools;

// ----------------------------------------------
// Constants
// ----------------------------------------------

// Side length of a square cell in cartesian world units.
pub const DEFAULT_TILE_SIZE: f32 = 70.0;

// World units each elevation level raises a tile by.
pub const DEFAULT_ELEVATION_STEP: f32 = 4.0;
