use serde::{Deserialize, Serialize};
use super::Vec2;

// +----------------------------------------------------+
// |        COORDINATE SPACE TRANSFORMS REFERENCE       |
// +----------------------------------------------------+
// | Operation                | Function                |
// | ------------------------ | ----------------------- |
// | Cell -> World (cartesian)| cell_to_world()         |
// | World -> Cell            | world_to_cell()         |
// | World -> Iso             | ProjectionTransform     |
// | Iso -> World             | ProjectionTransform     |
// | Iso -> Screen            | ViewTransform           |
// | Screen -> Iso            | ViewTransform           |
// +----------------------------------------------------+
//
// World space is the flat cartesian plane of the grid: row N starts
// at x = N * tile_size and column M at y = M * tile_size.

// ----------------------------------------------
// GridIndex
// ----------------------------------------------

// (row, col) position in the tile grid. The (-1, -1) sentinel marks a
// cursor that resolved outside of the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridIndex {
    pub row: i32,
    pub col: i32,
}

impl GridIndex {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[inline]
    pub const fn invalid() -> Self {
        Self { row: -1, col: -1 }
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.row >= 0 && self.col >= 0
    }
}

impl Default for GridIndex {
    fn default() -> Self {
        Self::invalid()
    }
}

impl std::fmt::Display for GridIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{},{}]", self.row, self.col)
    }
}

// ----------------------------------------------
// GridSize
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: i32,
    pub cols: i32,
}

impl GridSize {
    #[inline]
    pub const fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.rows >= 1 && self.cols >= 1
    }

    #[inline]
    pub const fn contains(&self, index: GridIndex) -> bool {
        index.row >= 0 && index.row < self.rows &&
        index.col >= 0 && index.col < self.cols
    }

    // Number of cells. Both dimensions must be valid.
    #[inline]
    pub const fn cell_count(&self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

// ----------------------------------------------
// Cell <-> World
// ----------------------------------------------

#[inline]
pub fn cell_to_world(index: GridIndex, tile_size: f32) -> Vec2 {
    Vec2::new(index.row as f32 * tile_size, index.col as f32 * tile_size)
}

// Floors rather than truncates so points just above/left of the
// origin do not land on row/col 0. Returns the sentinel when outside.
pub fn world_to_cell(point: Vec2, tile_size: f32, grid_size: GridSize) -> GridIndex {
    if !point.is_finite() || tile_size <= 0.0 {
        return GridIndex::invalid();
    }

    let row = (point.x / tile_size).floor();
    let col = (point.y / tile_size).floor();

    if row < 0.0 || col < 0.0 || row >= grid_size.rows as f32 || col >= grid_size.cols as f32 {
        return GridIndex::invalid();
    }

    GridIndex::new(row as i32, col as i32)
}
