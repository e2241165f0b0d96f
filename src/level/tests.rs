use super::*;
use crate::{
    render::{TextureCache, TextureHandle},
    tile::catalog::{TileTypeDef, TileTypeFlags},
    utils::coords::GridIndex,
};

struct WhiteTextures;

impl TextureCache for WhiteTextures {
    fn load_texture(&mut self, _name: &str) -> TextureHandle {
        TextureHandle::white()
    }
}

fn test_catalog() -> TileCatalog {
    let defs = (1..=3)
        .map(|code| TileTypeDef {
            reference_code: code,
            texture_name: format!("tile_{code}"),
            flags: TileTypeFlags::WALKABLE,
        })
        .collect();
    TileCatalog::build(defs, &mut WhiteTextures).unwrap()
}

fn temp_level_path(test_name: &str, extension: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("iso_editor_level_{test_name}_{}", std::process::id()))
        .with_extension(extension)
}

fn test_level() -> Level {
    let mut level = Level::new(3, 4, 1, Size::new(800, 600)).unwrap();
    let grid = level.grid_mut();
    grid.set(GridIndex::new(0, 0), TileCell::new(2, 10)).unwrap();
    grid.set(GridIndex::new(2, 3), TileCell::new(3, 255)).unwrap();
    grid.set(GridIndex::new(1, 2), TileCell::new(1, 7)).unwrap();
    level
}

#[test]
fn test_format_from_extension() {
    assert_eq!(LevelFormat::from_path(Path::new("a/b.json")).unwrap(), LevelFormat::Json);
    assert_eq!(LevelFormat::from_path(Path::new("a/b.grid")).unwrap(), LevelFormat::Binary);
    assert!(matches!(LevelFormat::from_path(Path::new("a/b.txt")), Err(LevelError::UnsupportedExtension(_))));
    assert!(matches!(LevelFormat::from_path(Path::new("a/b")), Err(LevelError::UnsupportedExtension(_))));
}

#[test]
fn test_json_save_and_load() {
    let path = temp_level_path("json", "json");
    let catalog = test_catalog();

    let mut level = test_level();
    level.camera_mut().set_displacement(Vec2::new(12.0, -4.0));
    level.camera_mut().set_zoom(0.5);

    level.save(&path).unwrap();
    assert_eq!(level.path(), Some(path.as_path()));

    let loaded = Level::load(&path, &catalog, Size::new(800, 600)).unwrap();
    assert_eq!(loaded.grid().cells(), level.grid().cells());
    assert_eq!(loaded.grid().size(), level.grid().size());
    assert_eq!(loaded.camera().displacement(), Vec2::new(12.0, -4.0));
    assert_eq!(loaded.camera().current_zoom(), 0.5);
    assert_eq!(loaded.path(), Some(path.as_path()));

    let _ = fs::remove_file(&path);
}

#[test]
fn test_binary_save_and_load() {
    let path = temp_level_path("binary", "grid");
    let catalog = test_catalog();

    let mut level = test_level();
    level.save(&path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), grid_format::HEADER_SIZE + 12 * grid_format::RECORD_SIZE);

    let loaded = Level::load(&path, &catalog, Size::new(800, 600)).unwrap();
    assert_eq!(loaded.grid().cells(), level.grid().cells());
    assert_eq!(loaded.grid().get(GridIndex::new(2, 3)).unwrap(), TileCell::new(3, 255));

    let _ = fs::remove_file(&path);
}

#[test]
fn test_load_failures() {
    let catalog = test_catalog();
    let viewport = Size::new(800, 600);

    // Missing file:
    let missing = temp_level_path("missing", "json");
    assert!(matches!(Level::load(&missing, &catalog, viewport), Err(LevelError::Io(_))));

    // Unknown extension:
    assert!(matches!(Level::load(Path::new("level.bmp"), &catalog, viewport),
                     Err(LevelError::UnsupportedExtension(_))));

    // Truncated binary:
    let truncated = temp_level_path("truncated", "grid");
    fs::write(&truncated, [2, 0, 0, 0, 2, 0, 0, 0, 1, 0]).unwrap();
    assert!(matches!(Level::load(&truncated, &catalog, viewport),
                     Err(LevelError::Grid(TileGridError::MalformedData { .. }))));
    let _ = fs::remove_file(&truncated);

    // Bad JSON:
    let bad_json = temp_level_path("bad_json", "json");
    fs::write(&bad_json, "{ \"rows\": 2 }").unwrap();
    assert!(matches!(Level::load(&bad_json, &catalog, viewport), Err(LevelError::Format(_))));
    let _ = fs::remove_file(&bad_json);

    // Tile count does not match the dimensions:
    let mismatch = temp_level_path("mismatch", "json");
    fs::write(&mismatch, r#"{ "rows": 2, "cols": 2, "tiles": [ { "reference_code": 1, "elevation": 0 } ] }"#).unwrap();
    assert!(matches!(Level::load(&mismatch, &catalog, viewport),
                     Err(LevelError::Grid(TileGridError::MalformedData { .. }))));
    let _ = fs::remove_file(&mismatch);
}

#[test]
fn test_load_rejects_dangling_reference() {
    let path = temp_level_path("dangling", "grid");

    let mut level = test_level();
    level.grid_mut().set(GridIndex::new(1, 1), TileCell::with_code(99)).unwrap();
    level.save(&path).unwrap();

    let result = Level::load(&path, &test_catalog(), Size::new(800, 600));
    assert!(matches!(result,
                     Err(LevelError::Grid(TileGridError::DanglingReference { index, code: 99 }))
                     if index == GridIndex::new(1, 1)));

    let _ = fs::remove_file(&path);
}
