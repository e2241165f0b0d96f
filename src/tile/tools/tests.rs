use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use super::*;
use crate::tile::grid::TileCell;

fn all_cells(grid: &TileGrid) -> Vec<GridIndex> {
    grid.iter().map(|(index, _)| index).collect()
}

fn elevations(grid: &TileGrid) -> Vec<u8> {
    grid.cells().iter().map(|cell| cell.elevation).collect()
}

#[test]
fn test_uniform_grid_scenario() {
    let mut grid = TileGrid::new(3, 3, 1).unwrap();
    let selection = all_cells(&grid);
    assert_eq!(selection.len(), 9);

    Tool::from(Elevate { amount: 10 }).apply(&selection, &mut grid);
    assert!(grid.cells().iter().all(|cell| *cell == TileCell::new(1, 10)));

    // Already uniform:
    Tool::from(Smooth { strength: 1.0 }).apply(&selection, &mut grid);
    assert!(grid.cells().iter().all(|cell| *cell == TileCell::new(1, 10)));

    Tool::from(ZeroElevation).apply(&selection, &mut grid);
    assert!(grid.cells().iter().all(|cell| *cell == TileCell::new(1, 0)));
}

#[test]
fn test_elevate_saturates() {
    let mut grid = TileGrid::new(1, 3, 1).unwrap();
    grid.set(GridIndex::new(0, 0), TileCell::new(1, 250)).unwrap();
    grid.set(GridIndex::new(0, 1), TileCell::new(1, 3)).unwrap();
    let selection = all_cells(&grid);

    Elevate { amount: 10 }.apply(&selection, &mut grid);
    assert_eq!(elevations(&grid), vec![255, 13, 10]);

    Elevate { amount: -11 }.apply(&selection, &mut grid);
    assert_eq!(elevations(&grid), vec![244, 2, 0]);

    Elevate { amount: -1000 }.apply(&selection, &mut grid);
    assert_eq!(elevations(&grid), vec![0, 0, 0]);
}

#[test]
fn test_elevate_then_lower_never_wraps() {
    let mut rng = Pcg64::seed_from_u64(0xe1e);

    for _ in 0..200 {
        let start: u8 = rng.random();
        let amount: i32 = rng.random_range(0..=255);

        let mut grid = TileGrid::new(1, 1, 0).unwrap();
        grid.set(GridIndex::new(0, 0), TileCell::new(0, start)).unwrap();
        let selection = [GridIndex::new(0, 0)];

        Elevate { amount }.apply(&selection, &mut grid);
        Elevate { amount: -amount - 1 }.apply(&selection, &mut grid);

        let end = grid.get(GridIndex::new(0, 0)).unwrap().elevation;
        assert!(end <= start, "start={start} amount={amount} end={end}");
    }
}

#[test]
fn test_smooth_converges_to_average() {
    let mut rng = Pcg64::seed_from_u64(0x5300);

    for _ in 0..100 {
        let rows = rng.random_range(1..=6);
        let cols = rng.random_range(1..=6);
        let cells = (0..rows * cols).map(|_| TileCell::new(1, rng.random())).collect();
        let mut grid = TileGrid::load(cells, rows, cols).unwrap();

        // Random subset of the grid, possibly empty.
        let selection: Vec<GridIndex> = all_cells(&grid).into_iter().filter(|_| rng.random_bool(0.6)).collect();
        let before = grid.clone();

        let sum: u32 = selection.iter().map(|&index| before.get(index).unwrap().elevation as u32).sum();
        Smooth { strength: 1.0 }.apply(&selection, &mut grid);

        if selection.is_empty() {
            assert_eq!(grid, before);
            continue;
        }

        let average = (sum / selection.len() as u32) as u8;
        for (index, cell) in grid.iter() {
            if selection.contains(&index) {
                assert_eq!(cell.elevation, average);
            } else {
                assert_eq!(*cell, before.get(index).unwrap());
            }
        }
    }
}

#[test]
fn test_smooth_partial_strength() {
    let mut grid = TileGrid::new(1, 2, 1).unwrap();
    grid.set(GridIndex::new(0, 0), TileCell::new(1, 0)).unwrap();
    grid.set(GridIndex::new(0, 1), TileCell::new(1, 101)).unwrap();
    let selection = all_cells(&grid);

    // Average is 50 (integer division). Half strength moves halfway, rounding:
    // 0 -> 0 + round(25.0) = 25, 101 -> 101 + round(-25.5) = 75
    Smooth { strength: 0.5 }.apply(&selection, &mut grid);
    assert_eq!(elevations(&grid), vec![25, 75]);

    // Zero strength is a no-op, out of range strength is clamped:
    Smooth { strength: 0.0 }.apply(&selection, &mut grid);
    assert_eq!(elevations(&grid), vec![25, 75]);
    Smooth { strength: 7.0 }.apply(&selection, &mut grid);
    assert_eq!(elevations(&grid), vec![50, 50]);

    // NaN does nothing:
    grid.set(GridIndex::new(0, 0), TileCell::new(1, 0)).unwrap();
    Smooth { strength: f32::NAN }.apply(&selection, &mut grid);
    assert_eq!(elevations(&grid), vec![0, 50]);
}

#[test]
fn test_empty_selection_is_noop() {
    let mut grid = TileGrid::new(2, 2, 3).unwrap();
    grid.set(GridIndex::new(1, 0), TileCell::new(3, 17)).unwrap();
    let before = grid.clone();

    let tools: [Tool; 5] = [
        Elevate { amount: 5 }.into(),
        Elevate { amount: -5 }.into(),
        Smooth { strength: 1.0 }.into(),
        ZeroElevation.into(),
        PaintReference { code: 9 }.into(),
    ];

    for tool in tools {
        tool.apply(&[], &mut grid);
        assert_eq!(grid, before, "{tool} changed the grid");
    }
}

#[test]
fn test_out_of_range_cells_are_skipped() {
    let mut grid = TileGrid::new(2, 2, 3).unwrap();
    let selection = [GridIndex::invalid(), GridIndex::new(5, 5), GridIndex::new(1, 1)];

    Elevate { amount: 4 }.apply(&selection, &mut grid);
    Smooth { strength: 1.0 }.apply(&[GridIndex::invalid()], &mut grid);
    PaintReference { code: 8 }.apply(&selection, &mut grid);

    assert_eq!(grid.get(GridIndex::new(1, 1)), Ok(TileCell::new(8, 4)));
    assert_eq!(grid.get(GridIndex::new(0, 0)), Ok(TileCell::new(3, 0)));
}

#[test]
fn test_paint_reference() {
    let mut grid = TileGrid::new(2, 3, 1).unwrap();
    grid.set(GridIndex::new(0, 1), TileCell::new(1, 40)).unwrap();
    let selection = [GridIndex::new(0, 1), GridIndex::new(1, 2)];

    // Unknown codes are written as-is; elevation is untouched.
    PaintReference { code: -7 }.apply(&selection, &mut grid);
    assert_eq!(grid.get(GridIndex::new(0, 1)), Ok(TileCell::new(-7, 40)));
    assert_eq!(grid.get(GridIndex::new(1, 2)), Ok(TileCell::new(-7, 0)));
    assert_eq!(grid.get(GridIndex::new(0, 0)), Ok(TileCell::new(1, 0)));
}

#[test]
fn test_tool_for_commit() {
    let settings = ToolSettings { elevate_amount: 3, smooth_strength: 0.25 };

    assert_eq!(tool_for_commit(EditMode::None, TerrainTool::Elevate, &settings, Some(1)), None);

    assert_eq!(tool_for_commit(EditMode::Terrain, TerrainTool::Elevate, &settings, Some(1)),
               Some(Tool::from(Elevate { amount: 3 })));
    assert_eq!(tool_for_commit(EditMode::Terrain, TerrainTool::Lower, &settings, None),
               Some(Tool::from(Elevate { amount: -3 })));
    assert_eq!(tool_for_commit(EditMode::Terrain, TerrainTool::Smooth, &settings, None),
               Some(Tool::from(Smooth { strength: 0.25 })));
    assert_eq!(tool_for_commit(EditMode::Terrain, TerrainTool::ZeroElevation, &settings, None),
               Some(Tool::from(ZeroElevation)));

    assert_eq!(tool_for_commit(EditMode::Tile, TerrainTool::Elevate, &settings, Some(4)),
               Some(Tool::from(PaintReference { code: 4 })));
    assert_eq!(tool_for_commit(EditMode::Tile, TerrainTool::Elevate, &settings, None), None);
}

#[test]
fn test_lower_with_extreme_amount() {
    let settings = ToolSettings { elevate_amount: i32::MIN, smooth_strength: 1.0 };

    let tool = TerrainTool::Lower.to_tool(&settings);
    assert_eq!(tool, Tool::from(Elevate { amount: i32::MAX }));

    let mut grid = TileGrid::new(1, 2, 1).unwrap();
    grid.set(GridIndex::new(0, 0), TileCell::new(1, 40)).unwrap();

    tool.apply(&all_cells(&grid), &mut grid);
    assert_eq!(elevations(&grid), vec![255, 255]);

    TerrainTool::Elevate.to_tool(&settings).apply(&all_cells(&grid), &mut grid);
    assert_eq!(elevations(&grid), vec![0, 0]);
}
