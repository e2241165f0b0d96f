use std::collections::HashSet;
use bitflags::bitflags;

use crate::{
    log,
    render::{Renderer, TextureHandle},
    utils::{coords::{self, GridIndex}, Color, Vec2},
};

use super::{
    camera::ViewTransform,
    catalog::{ReferenceCode, TileCatalog},
    grid::{Elevation, TileGrid},
    projection::ProjectionTransform,
};

#[cfg(test)]
mod tests;

// ----------------------------------------------
// Constants
// ----------------------------------------------

pub const TILE_COLOR: Color = Color::white();
pub const SELECTION_COLOR: Color = Color::from_rgba8(150, 150, 150, 150);
pub const DRAG_SELECTION_COLOR: Color = Color::from_rgba8(150, 250, 150, 150);
pub const BACKGROUND_COLOR: Color = Color::from_rgba8(100, 149, 237, 255);

// ----------------------------------------------
// TileGridRenderFlags
// ----------------------------------------------

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct TileGridRenderFlags: u32 {
        const DrawTiles     = 1 << 0;
        const DrawSelection = 1 << 1;
        const DrawHover     = 1 << 2; // Hovered cell when nothing is selected.
    }
}

impl Default for TileGridRenderFlags {
    fn default() -> Self {
        Self::all()
    }
}

// ----------------------------------------------
// TileLayerView
// ----------------------------------------------

// Everything needed to place a cell on screen this frame.
#[derive(Copy, Clone, Debug)]
pub struct TileLayerView<'a> {
    pub projection: &'a ProjectionTransform,
    pub view: ViewTransform,
    pub tile_size: f32,
    pub elevation_step: f32, // world units per elevation level
}

impl TileLayerView<'_> {
    // Projected cell origin (top vertex of the tile diamond), raised by its elevation.
    #[inline]
    pub fn cell_screen_position(&self, index: GridIndex, elevation: Elevation) -> Vec2 {
        let world = coords::cell_to_world(index, self.tile_size);
        let height = elevation as f32 * self.elevation_step;
        self.view.apply_to_iso_point(self.projection.project(world, height))
    }
}

// ----------------------------------------------
// SelectionOverlay
// ----------------------------------------------

pub struct SelectionOverlay<'a> {
    pub cells: &'a [GridIndex],
    pub hovered: GridIndex,
    pub texture: TextureHandle,
    pub color: Color,
}

// ----------------------------------------------
// TileGridRenderer
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TileGridRenderStats {
    pub tiles_drawn: u32,
    pub placeholders_drawn: u32,
    pub overlays_drawn: u32,
}

#[derive(Default)]
pub struct TileGridRenderer {
    pub flags: TileGridRenderFlags,
    reported_dangling: HashSet<ReferenceCode>,
}

impl TileGridRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    // Forget which dangling codes were already logged, e.g. after loading a new document.
    pub fn reset(&mut self) {
        self.reported_dangling.clear();
    }

    // Row-major over the whole grid. Unknown reference codes draw the
    // placeholder texture and are logged once per code.
    pub fn draw_grid(&mut self,
                     renderer: &mut impl Renderer,
                     grid: &TileGrid,
                     catalog: &TileCatalog,
                     layer: &TileLayerView,
                     overlay: &SelectionOverlay) -> TileGridRenderStats {

        let mut stats = TileGridRenderStats::default();
        renderer.set_sprite_scale(layer.view.scaling);

        if self.flags.intersects(TileGridRenderFlags::DrawTiles) {
            for (index, cell) in grid.iter() {
                let texture = match catalog.lookup(cell.reference_code) {
                    Ok(tile_type) => tile_type.texture,
                    Err(err) => {
                        if self.reported_dangling.insert(cell.reference_code) {
                            log::error!("render", "Cell {index}: {err}. Drawing placeholder.");
                        }
                        stats.placeholders_drawn += 1;
                        TextureHandle::invalid()
                    }
                };

                renderer.draw_at(texture, layer.cell_screen_position(index, cell.elevation), TILE_COLOR);
                stats.tiles_drawn += 1;
            }
        }

        stats.overlays_drawn = self.draw_overlay(renderer, grid, layer, overlay);
        stats
    }

    fn draw_overlay(&self,
                    renderer: &mut impl Renderer,
                    grid: &TileGrid,
                    layer: &TileLayerView,
                    overlay: &SelectionOverlay) -> u32 {

        let mut draw_cell = |index: GridIndex| -> bool {
            match grid.get(index) {
                Ok(cell) => {
                    let pos = layer.cell_screen_position(index, cell.elevation);
                    renderer.draw_at(overlay.texture, pos, overlay.color);
                    true
                }
                Err(_) => false,
            }
        };

        if !overlay.cells.is_empty() {
            if !self.flags.intersects(TileGridRenderFlags::DrawSelection) {
                return 0;
            }
            return overlay.cells.iter().filter(|&&index| draw_cell(index)).count() as u32;
        }

        if self.flags.intersects(TileGridRenderFlags::DrawHover) && draw_cell(overlay.hovered) {
            return 1;
        }

        0
    }
}
