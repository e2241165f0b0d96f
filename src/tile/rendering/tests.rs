use super::*;
use crate::{
    render::TextureCache,
    tile::{camera::Camera, catalog::{TileTypeDef, TileTypeFlags}, grid::TileCell},
    utils::{Size, DEFAULT_EPSILON},
};

#[derive(Default)]
struct RecordingRenderer {
    sprite_scale: f32,
    draws: Vec<(TextureHandle, Vec2, Color)>,
}

impl Renderer for RecordingRenderer {
    fn set_sprite_scale(&mut self, scale: f32) {
        self.sprite_scale = scale;
    }

    fn draw_at(&mut self, texture: TextureHandle, screen_pos: Vec2, color: Color) {
        self.draws.push((texture, screen_pos, color));
    }
}

// Texture index = reference code.
struct CodeTextures;

impl TextureCache for CodeTextures {
    fn load_texture(&mut self, name: &str) -> TextureHandle {
        name.parse().map(TextureHandle::Index).unwrap_or_default()
    }
}

fn test_catalog() -> TileCatalog {
    let defs = vec![
        TileTypeDef { reference_code: 1, texture_name: "1".into(), flags: TileTypeFlags::WALKABLE },
        TileTypeDef { reference_code: 2, texture_name: "2".into(), flags: TileTypeFlags::empty() },
    ];
    TileCatalog::build(defs, &mut CodeTextures).unwrap()
}

fn no_overlay() -> SelectionOverlay<'static> {
    SelectionOverlay {
        cells: &[],
        hovered: GridIndex::invalid(),
        texture: TextureHandle::white(),
        color: SELECTION_COLOR,
    }
}

#[test]
fn test_draws_row_major_with_catalog_textures() {
    let mut grid = TileGrid::new(2, 2, 1).unwrap();
    grid.set(GridIndex::new(1, 0), TileCell::with_code(2)).unwrap();

    let projection = ProjectionTransform::default();
    let mut camera = Camera::new(Size::new(640, 480));
    camera.set_zoom(0.5);
    let layer = TileLayerView { projection: &projection, view: camera.view_transform(), tile_size: 70.0, elevation_step: 1.0 };

    let mut renderer = RecordingRenderer::default();
    let stats = TileGridRenderer::new().draw_grid(&mut renderer, &grid, &test_catalog(), &layer, &no_overlay());

    assert_eq!(stats, TileGridRenderStats { tiles_drawn: 4, placeholders_drawn: 0, overlays_drawn: 0 });
    assert_eq!(renderer.sprite_scale, 0.5);

    let textures: Vec<TextureHandle> = renderer.draws.iter().map(|draw| draw.0).collect();
    assert_eq!(textures, vec![
        TextureHandle::Index(1), TextureHandle::Index(1),
        TextureHandle::Index(2), TextureHandle::Index(1),
    ]);

    let order = [(0, 0), (0, 1), (1, 0), (1, 1)];
    for (draw, (row, col)) in renderer.draws.iter().zip(order) {
        let expected = layer.cell_screen_position(GridIndex::new(row, col), 0);
        assert!(draw.1.approx_equal(expected, DEFAULT_EPSILON));
        assert_eq!(draw.2, TILE_COLOR);
    }

    // Cell (0,0) sits at the world origin, so it lands on the viewport center.
    assert!(renderer.draws[0].1.approx_equal(Vec2::new(320.0, 240.0), DEFAULT_EPSILON));
}

#[test]
fn test_elevation_raises_tiles() {
    let mut grid = TileGrid::new(1, 1, 1).unwrap();
    grid.set(GridIndex::new(0, 0), TileCell::new(1, 20)).unwrap();

    let projection = ProjectionTransform::default(); // vertical scale 0.5
    let layer = TileLayerView { projection: &projection, view: ViewTransform::default(), tile_size: 70.0, elevation_step: 2.0 };

    let flat = layer.cell_screen_position(GridIndex::new(0, 0), 0);
    let raised = layer.cell_screen_position(GridIndex::new(0, 0), 20);
    assert_eq!(raised.x, flat.x);
    assert!((flat.y - raised.y - 20.0).abs() <= DEFAULT_EPSILON);

    let mut renderer = RecordingRenderer::default();
    TileGridRenderer::new().draw_grid(&mut renderer, &grid, &test_catalog(), &layer, &no_overlay());
    assert!(renderer.draws[0].1.approx_equal(raised, DEFAULT_EPSILON));
}

#[test]
fn test_dangling_reference_draws_placeholder() {
    let mut grid = TileGrid::new(1, 3, 1).unwrap();
    grid.set(GridIndex::new(0, 1), TileCell::with_code(42)).unwrap();
    grid.set(GridIndex::new(0, 2), TileCell::with_code(42)).unwrap();

    let projection = ProjectionTransform::default();
    let layer = TileLayerView { projection: &projection, view: ViewTransform::default(), tile_size: 70.0, elevation_step: 1.0 };

    let mut tile_renderer = TileGridRenderer::new();
    let mut renderer = RecordingRenderer::default();
    let stats = tile_renderer.draw_grid(&mut renderer, &grid, &test_catalog(), &layer, &no_overlay());

    assert_eq!(stats.tiles_drawn, 3);
    assert_eq!(stats.placeholders_drawn, 2);
    assert_eq!(renderer.draws[1].0, TextureHandle::invalid());
    assert_eq!(renderer.draws[2].0, TextureHandle::invalid());

    // Still drawn on later frames without failing:
    let stats = tile_renderer.draw_grid(&mut renderer, &grid, &test_catalog(), &layer, &no_overlay());
    assert_eq!(stats.placeholders_drawn, 2);
}

#[test]
fn test_selection_overlay() {
    let grid = TileGrid::new(3, 3, 1).unwrap();
    let projection = ProjectionTransform::default();
    let layer = TileLayerView { projection: &projection, view: ViewTransform::default(), tile_size: 70.0, elevation_step: 1.0 };
    let catalog = test_catalog();
    let mut tile_renderer = TileGridRenderer::new();

    // Selected cells win over the hovered cell:
    {
        let selected = [GridIndex::new(0, 0), GridIndex::new(2, 2)];
        let overlay = SelectionOverlay {
            cells: &selected,
            hovered: GridIndex::new(1, 1),
            texture: TextureHandle::white(),
            color: DRAG_SELECTION_COLOR,
        };

        let mut renderer = RecordingRenderer::default();
        let stats = tile_renderer.draw_grid(&mut renderer, &grid, &catalog, &layer, &overlay);
        assert_eq!(stats.overlays_drawn, 2);

        let overlay_draws = &renderer.draws[9..];
        assert_eq!(overlay_draws.len(), 2);
        assert!(overlay_draws.iter().all(|draw| draw.0 == TextureHandle::white() && draw.2 == DRAG_SELECTION_COLOR));
    }

    // Only the hovered cell when nothing is selected:
    {
        let overlay = SelectionOverlay { hovered: GridIndex::new(1, 1), ..no_overlay() };
        let mut renderer = RecordingRenderer::default();
        let stats = tile_renderer.draw_grid(&mut renderer, &grid, &catalog, &layer, &overlay);
        assert_eq!(stats.overlays_drawn, 1);
        assert!(renderer.draws[9].1.approx_equal(layer.cell_screen_position(GridIndex::new(1, 1), 0), DEFAULT_EPSILON));
    }

    // Sentinel hover draws nothing:
    {
        let mut renderer = RecordingRenderer::default();
        let stats = tile_renderer.draw_grid(&mut renderer, &grid, &catalog, &layer, &no_overlay());
        assert_eq!(stats.overlays_drawn, 0);
        assert_eq!(renderer.draws.len(), 9);
    }

    // Flags can turn layers off:
    {
        tile_renderer.flags = TileGridRenderFlags::DrawHover;
        let overlay = SelectionOverlay { hovered: GridIndex::new(0, 2), ..no_overlay() };
        let mut renderer = RecordingRenderer::default();
        let stats = tile_renderer.draw_grid(&mut renderer, &grid, &catalog, &layer, &overlay);
        assert_eq!(stats.tiles_drawn, 0);
        assert_eq!(renderer.draws.len(), 1);
    }
}
