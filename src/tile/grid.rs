use std::fmt;
use serde::{Deserialize, Serialize};

use crate::{
    log,
    utils::coords::{GridIndex, GridSize},
};

use super::catalog::{ReferenceCode, TileCatalog};


// ----------------------------------------------
// Constants
// ----------------------------------------------

// Upper bound for either dimension. Guards against absurd allocations
// from corrupt headers or configs.
pub const MAX_GRID_DIMENSION: i32 = 4096;

// ----------------------------------------------
// TileCell
// ----------------------------------------------

pub type Elevation = u8;

// Plain value record. Has no identity beyond its position in the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCell {
    pub reference_code: ReferenceCode,
    pub elevation: Elevation,
}

impl TileCell {
    #[inline]
    pub const fn new(reference_code: ReferenceCode, elevation: Elevation) -> Self {
        Self { reference_code, elevation }
    }

    #[inline]
    pub const fn with_code(reference_code: ReferenceCode) -> Self {
        Self { reference_code, elevation: 0 }
    }
}

// Adds a signed delta to an elevation, clamping to [0, 255] instead of wrapping.
#[inline]
#[must_use]
pub fn offset_elevation(elevation: Elevation, delta: i32) -> Elevation {
    if delta >= 0 {
        elevation.saturating_add(delta.min(Elevation::MAX as i32) as Elevation)
    } else {
        elevation.saturating_sub(delta.unsigned_abs().min(Elevation::MAX as u32) as Elevation)
    }
}

// ----------------------------------------------
// TileGridError
// ----------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TileGridError {
    InvalidDimensions { rows: i32, cols: i32 },
    IndexOutOfRange { index: GridIndex, size: GridSize },
    MalformedData { expected: usize, actual: usize },
    DanglingReference { index: GridIndex, code: ReferenceCode },
}

impl fmt::Display for TileGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { rows, cols } => {
                write!(f, "invalid grid dimensions {rows}x{cols}, each must be in [1, {MAX_GRID_DIMENSION}]")
            }
            Self::IndexOutOfRange { index, size } => {
                write!(f, "cell {index} is outside of the {size} grid")
            }
            Self::MalformedData { expected, actual } => {
                write!(f, "malformed grid data: expected {expected} cells, found {actual}")
            }
            Self::DanglingReference { index, code } => {
                write!(f, "cell {index} references unknown tile type {code}")
            }
        }
    }
}

impl std::error::Error for TileGridError {}

pub type TileGridResult<T> = Result<T, TileGridError>;

// ----------------------------------------------
// TileGrid
// ----------------------------------------------

// Dense row-major array of cells: linear index = col + row * num_cols.
// Dimensions are fixed for the lifetime of the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    size: GridSize,
    cells: Vec<TileCell>,
}

impl TileGrid {
    // New document: every cell gets `default_code` at elevation 0.
    pub fn new(num_rows: i32, num_cols: i32, default_code: ReferenceCode) -> TileGridResult<Self> {
        let size = Self::validate_dimensions(num_rows, num_cols)?;
        Ok(Self {
            size,
            cells: vec![TileCell::with_code(default_code); size.cell_count()],
        })
    }

    // Rebuilds a grid from a flat row-major array, as produced by `pack()`.
    pub fn load(cells: Vec<TileCell>, num_rows: i32, num_cols: i32) -> TileGridResult<Self> {
        let size = Self::validate_dimensions(num_rows, num_cols)?;

        if cells.len() != size.cell_count() {
            return Err(TileGridError::MalformedData { expected: size.cell_count(), actual: cells.len() });
        }

        Ok(Self { size, cells })
    }

    // Same as `load()` with reference codes and elevations in separate arrays.
    pub fn load_split(reference_codes: &[ReferenceCode],
                      elevations: &[Elevation],
                      num_rows: i32,
                      num_cols: i32) -> TileGridResult<Self> {

        let size = Self::validate_dimensions(num_rows, num_cols)?;
        let expected = size.cell_count();

        for actual in [reference_codes.len(), elevations.len()] {
            if actual != expected {
                return Err(TileGridError::MalformedData { expected, actual });
            }
        }

        let cells = reference_codes.iter()
            .zip(elevations)
            .map(|(&code, &elevation)| TileCell::new(code, elevation))
            .collect();

        Ok(Self { size, cells })
    }

    // Flat row-major copy of the cells. `load(pack())` reproduces the grid exactly.
    #[must_use]
    pub fn pack(&self) -> Vec<TileCell> {
        self.cells.clone()
    }

    #[must_use]
    pub fn pack_split(&self) -> (Vec<ReferenceCode>, Vec<Elevation>) {
        self.cells.iter()
            .map(|cell| (cell.reference_code, cell.elevation))
            .unzip()
    }

    // ----------------------
    // Dimensions:
    // ----------------------

    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[inline]
    pub fn num_rows(&self) -> i32 {
        self.size.rows
    }

    #[inline]
    pub fn num_cols(&self) -> i32 {
        self.size.cols
    }

    #[inline]
    pub fn cells(&self) -> &[TileCell] {
        &self.cells
    }

    #[inline]
    pub fn is_cell_within_bounds(&self, index: GridIndex) -> bool {
        self.size.contains(index)
    }

    // Cells in row-major order with their grid index.
    pub fn iter(&self) -> impl Iterator<Item = (GridIndex, &TileCell)> {
        let num_cols = self.size.cols;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let i = i as i32;
            (GridIndex::new(i / num_cols, i % num_cols), cell)
        })
    }

    // ----------------------
    // Cell access:
    // ----------------------

    pub fn get(&self, index: GridIndex) -> TileGridResult<TileCell> {
        let i = self.linear_index(index)?;
        Ok(self.cells[i])
    }

    pub fn set(&mut self, index: GridIndex, cell: TileCell) -> TileGridResult<()> {
        let i = self.linear_index(index)?;
        self.cells[i] = cell;
        Ok(())
    }

    pub fn try_cell_mut(&mut self, index: GridIndex) -> TileGridResult<&mut TileCell> {
        let i = self.linear_index(index)?;
        Ok(&mut self.cells[i])
    }

    // ----------------------
    // Elevation:
    // ----------------------

    // Saturates at 255. Returns the new elevation.
    pub fn raise_elevation(&mut self, index: GridIndex, amount: Elevation) -> TileGridResult<Elevation> {
        let cell = self.try_cell_mut(index)?;
        cell.elevation = cell.elevation.saturating_add(amount);
        Ok(cell.elevation)
    }

    // Clamps at 0, never wraps. Returns the new elevation.
    pub fn lower_elevation(&mut self, index: GridIndex, amount: Elevation) -> TileGridResult<Elevation> {
        let cell = self.try_cell_mut(index)?;
        cell.elevation = cell.elevation.saturating_sub(amount);
        Ok(cell.elevation)
    }

    pub fn offset_elevation(&mut self, index: GridIndex, delta: i32) -> TileGridResult<Elevation> {
        let cell = self.try_cell_mut(index)?;
        cell.elevation = offset_elevation(cell.elevation, delta);
        Ok(cell.elevation)
    }

    // ----------------------
    // Validation:
    // ----------------------

    // Fails on the first cell whose reference code is not in the catalog.
    pub fn validate_references(&self, catalog: &TileCatalog) -> TileGridResult<()> {
        for (index, cell) in self.iter() {
            if !catalog.contains(cell.reference_code) {
                log::error!("grid", "Cell {index} has unknown tile type {}.", cell.reference_code);
                return Err(TileGridError::DanglingReference { index, code: cell.reference_code });
            }
        }
        Ok(())
    }

    // Both dimensions must be in [1, MAX_GRID_DIMENSION].
    pub fn validate_dimensions(num_rows: i32, num_cols: i32) -> TileGridResult<GridSize> {
        let size = GridSize::new(num_rows, num_cols);
        if !size.is_valid() || num_rows > MAX_GRID_DIMENSION || num_cols > MAX_GRID_DIMENSION {
            return Err(TileGridError::InvalidDimensions { rows: num_rows, cols: num_cols });
        }
        Ok(size)
    }

    #[inline]
    fn linear_index(&self, index: GridIndex) -> TileGridResult<usize> {
        if !self.is_cell_within_bounds(index) {
            return Err(TileGridError::IndexOutOfRange { index, size: self.size });
        }
        Ok((index.col + (index.row * self.size.cols)) as usize)
    }
}
