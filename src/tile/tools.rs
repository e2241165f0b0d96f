use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::utils::coords::GridIndex;

use super::{
    catalog::ReferenceCode,
    grid::{offset_elevation, TileGrid},
};

#[cfg(test)]
mod tests;

// ----------------------------------------------
// EditTool
// ----------------------------------------------

// Tools are plain values: one parameter, no hidden state. Cells outside
// the grid are skipped, so a stale selection can never write out of bounds.
#[enum_dispatch]
pub trait EditTool {
    fn apply(&self, selection: &[GridIndex], grid: &mut TileGrid);
}

// ----------------------------------------------
// Elevate
// ----------------------------------------------

// Adds `amount` to every selected elevation, clamping to [0, 255].
// Negative amounts lower the terrain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Elevate {
    pub amount: i32,
}

impl EditTool for Elevate {
    fn apply(&self, selection: &[GridIndex], grid: &mut TileGrid) {
        for &index in selection {
            if let Ok(cell) = grid.try_cell_mut(index) {
                cell.elevation = offset_elevation(cell.elevation, self.amount);
            }
        }
    }
}

// ----------------------------------------------
// Smooth
// ----------------------------------------------

// Moves each selected elevation toward the integer average of the
// selection by `round((average - current) * strength)`.
// Strength 1 flattens the selection to its average.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Smooth {
    pub strength: f32,
}

impl EditTool for Smooth {
    fn apply(&self, selection: &[GridIndex], grid: &mut TileGrid) {
        if selection.is_empty() || !self.strength.is_finite() {
            return;
        }

        let strength = self.strength.clamp(0.0, 1.0);

        let mut sum: u64 = 0;
        let mut count: u64 = 0;
        for &index in selection {
            if let Ok(cell) = grid.get(index) {
                sum += cell.elevation as u64;
                count += 1;
            }
        }

        if count == 0 {
            return;
        }

        let average = (sum / count) as i32;

        for &index in selection {
            if let Ok(cell) = grid.try_cell_mut(index) {
                let delta = ((average - cell.elevation as i32) as f32 * strength).round() as i32;
                cell.elevation = offset_elevation(cell.elevation, delta);
            }
        }
    }
}

// ----------------------------------------------
// ZeroElevation
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ZeroElevation;

impl EditTool for ZeroElevation {
    fn apply(&self, selection: &[GridIndex], grid: &mut TileGrid) {
        for &index in selection {
            if let Ok(cell) = grid.try_cell_mut(index) {
                cell.elevation = 0;
            }
        }
    }
}

// ----------------------------------------------
// PaintReference
// ----------------------------------------------

// Writes `code` into every selected cell. Codes are not checked against
// the catalog here; unknown codes draw as the placeholder texture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PaintReference {
    pub code: ReferenceCode,
}

impl EditTool for PaintReference {
    fn apply(&self, selection: &[GridIndex], grid: &mut TileGrid) {
        for &index in selection {
            if let Ok(cell) = grid.try_cell_mut(index) {
                cell.reference_code = self.code;
            }
        }
    }
}

// ----------------------------------------------
// Tool
// ----------------------------------------------

// Closed set of tools behind a single `apply()`.
#[enum_dispatch(EditTool)]
#[derive(Copy, Clone, Debug, PartialEq, Display)]
pub enum Tool {
    Elevate,
    Smooth,
    ZeroElevation,
    PaintReference,
}

// ----------------------------------------------
// EditMode / TerrainTool
// ----------------------------------------------

// Decides what a commit gesture does.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
pub enum EditMode {
    None, // Not editing. Selection is frozen and commits do nothing.
    #[default]
    Terrain,
    Tile,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
pub enum TerrainTool {
    #[default]
    Elevate,
    Lower,
    Smooth,
    ZeroElevation,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub elevate_amount: i32,
    pub smooth_strength: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self { elevate_amount: 1, smooth_strength: 1.0 }
    }
}

impl TerrainTool {
    pub fn to_tool(self, settings: &ToolSettings) -> Tool {
        match self {
            Self::Elevate       => Elevate { amount: settings.elevate_amount }.into(),
            Self::Lower         => Elevate { amount: settings.elevate_amount.saturating_neg() }.into(),
            Self::Smooth        => Smooth { strength: settings.smooth_strength }.into(),
            Self::ZeroElevation => ZeroElevation.into(),
        }
    }
}

// Tool a commit should run in the given mode, if any.
pub fn tool_for_commit(mode: EditMode,
                       terrain_tool: TerrainTool,
                       settings: &ToolSettings,
                       paint_code: Option<ReferenceCode>) -> Option<Tool> {
    match mode {
        EditMode::None    => None,
        EditMode::Terrain => Some(terrain_tool.to_tool(settings)),
        EditMode::Tile    => paint_code.map(|code| PaintReference { code }.into()),
    }
}
