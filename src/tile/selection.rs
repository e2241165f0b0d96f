use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::{Display, EnumIter};

use crate::{
    app::input::{InputProvider, MouseButton},
    utils::{
        coords::{self, GridIndex, GridSize},
        Vec2,
    },
};

use super::{
    camera::ViewTransform,
    projection::ProjectionTransform,
};


// ----------------------------------------------
// Constants / Enums
// ----------------------------------------------

pub const DEFAULT_BRUSH_SIZE: i32 = 2;
pub const MIN_BRUSH_SIZE: i32 = 1;
pub const MAX_BRUSH_SIZE: i32 = 32;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
pub enum SelectionMode {
    #[default]
    ClickDrag,
    SquareSelect,
}

// Ordered list of selected cells. Never contains the sentinel.
pub type SelectionCells = SmallVec<[GridIndex; 36]>;

// ----------------------------------------------
// Cursor -> Cell
// ----------------------------------------------

// Screen -> iso (camera) -> cartesian (projection, ground plane) -> cell.
// Returns `GridIndex::invalid()` when the cursor is off the grid.
pub fn cursor_to_cell(cursor_screen_pos: Vec2,
                      view: &ViewTransform,
                      projection: &ProjectionTransform,
                      tile_size: f32,
                      grid_size: GridSize) -> GridIndex {

    let iso = view.apply_to_screen_point(cursor_screen_pos);
    let world = projection.inverse(iso);
    coords::world_to_cell(world, tile_size, grid_size)
}

// `size x size` block growing toward increasing row/col, clipped to the grid.
pub fn square_block(origin: GridIndex, size: i32, grid_size: GridSize) -> SelectionCells {
    let mut cells = SelectionCells::new();

    if !grid_size.contains(origin) {
        return cells;
    }

    let size = size.max(MIN_BRUSH_SIZE);
    let end_row = origin.row.saturating_add(size).min(grid_size.rows);
    let end_col = origin.col.saturating_add(size).min(grid_size.cols);

    for row in origin.row..end_row {
        for col in origin.col..end_col {
            cells.push(GridIndex::new(row, col));
        }
    }

    cells
}

// Every cell of the inclusive rectangle spanned by `anchor` and `current`,
// walking from the anchor in signed unit steps. A zero span on an axis
// uses a step of 0 so that axis contributes just the anchor's row/col.
pub fn drag_rectangle(anchor: GridIndex, current: GridIndex, grid_size: GridSize) -> SelectionCells {
    let mut cells = SelectionCells::new();

    let row_span = current.row - anchor.row;
    let col_span = current.col - anchor.col;
    let row_step = row_span.signum();
    let col_step = col_span.signum();

    for i in 0..=row_span.abs() {
        let row = anchor.row + (i * row_step);
        for j in 0..=col_span.abs() {
            let cell = GridIndex::new(row, anchor.col + (j * col_step));
            if grid_size.contains(cell) {
                cells.push(cell);
            }
        }
    }

    cells
}

// ----------------------------------------------
// SelectionEngine
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct DragState {
    anchor: GridIndex,
    current: GridIndex, // Last valid cell under the cursor.
}

// Rebuilds the selection from scratch every update; nothing is patched
// incrementally between frames.
#[derive(Clone, Debug)]
pub struct SelectionEngine {
    mode: SelectionMode,
    brush_size: i32,
    hovered: GridIndex,
    drag: Option<DragState>,
    cells: SelectionCells,
}

impl SelectionEngine {
    pub fn new(mode: SelectionMode, brush_size: i32) -> Self {
        Self {
            mode,
            brush_size: brush_size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE),
            hovered: GridIndex::invalid(),
            drag: None,
            cells: SelectionCells::new(),
        }
    }

    #[inline]
    pub fn current_selection(&self) -> &[GridIndex] {
        &self.cells
    }

    #[inline]
    pub fn hovered(&self) -> GridIndex {
        self.hovered
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    #[inline]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        if self.mode != mode {
            self.mode = mode;
            self.clear();
        }
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(match self.mode {
            SelectionMode::ClickDrag    => SelectionMode::SquareSelect,
            SelectionMode::SquareSelect => SelectionMode::ClickDrag,
        });
    }

    // ----------------------
    // Brush size:
    // ----------------------

    #[inline]
    pub fn brush_size(&self) -> i32 {
        self.brush_size
    }

    pub fn set_brush_size(&mut self, size: i32) {
        self.brush_size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    #[inline]
    pub fn grow_brush(&mut self) {
        self.set_brush_size(self.brush_size + 1);
    }

    #[inline]
    pub fn shrink_brush(&mut self) {
        self.set_brush_size(self.brush_size - 1);
    }

    // ----------------------
    // Update:
    // ----------------------

    // `hovered` is the cell under the cursor this frame, possibly the sentinel.
    pub fn update(&mut self, hovered: GridIndex, grid_size: GridSize, input: &impl InputProvider) {
        self.hovered = if grid_size.contains(hovered) { hovered } else { GridIndex::invalid() };

        match self.mode {
            SelectionMode::SquareSelect => {
                self.drag = None;
                self.cells = square_block(self.hovered, self.brush_size, grid_size);
            }
            SelectionMode::ClickDrag => {
                self.update_click_drag(grid_size, input);
            }
        }
    }

    fn update_click_drag(&mut self, grid_size: GridSize, input: &impl InputProvider) {
        if input.button_pressed(MouseButton::Left) {
            // A new press always drops the previous selection. Pressing
            // off the grid starts no drag at all.
            self.cells.clear();
            self.drag = self.hovered.is_valid().then_some(DragState {
                anchor: self.hovered,
                current: self.hovered,
            });
        }

        if !input.is_button_down(MouseButton::Left) {
            // Released: whatever was selected stays until a commit or a new press.
            self.drag = None;
            return;
        }

        if let Some(drag) = &mut self.drag {
            // Leaving the grid keeps the last valid rectangle.
            if self.hovered.is_valid() {
                drag.current = self.hovered;
            }
            self.cells = drag_rectangle(drag.anchor, drag.current, grid_size);
        }
    }

    // Called after a tool was applied. Click-drag selections are consumed
    // by the commit; square selections follow the cursor and rebuild next frame.
    pub fn on_commit(&mut self) {
        if self.mode == SelectionMode::ClickDrag {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.drag = None;
        self.cells.clear();
    }
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new(SelectionMode::default(), DEFAULT_BRUSH_SIZE)
    }
}
