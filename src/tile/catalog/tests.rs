use std::collections::HashMap;

use super::*;

// Knows a fixed set of texture names.
struct FakeTextureCache {
    textures: HashMap<String, u32>,
    requests: Vec<String>,
}

impl FakeTextureCache {
    fn new(names: &[&str]) -> Self {
        Self {
            textures: names.iter().enumerate().map(|(i, name)| (name.to_string(), i as u32)).collect(),
            requests: Vec::new(),
        }
    }
}

impl TextureCache for FakeTextureCache {
    fn load_texture(&mut self, name: &str) -> TextureHandle {
        self.requests.push(name.to_string());
        match self.textures.get(name) {
            Some(&index) => TextureHandle::Index(index),
            None => TextureHandle::invalid(),
        }
    }
}

fn def(code: ReferenceCode, texture_name: &str, flags: TileTypeFlags) -> TileTypeDef {
    TileTypeDef { reference_code: code, texture_name: texture_name.into(), flags }
}

#[test]
fn test_build_and_lookup() {
    let mut tex_cache = FakeTextureCache::new(&["grass", "water"]);
    let catalog = TileCatalog::build(vec![
        def(5, "water", TileTypeFlags::empty()),
        def(1, "grass", TileTypeFlags::WALKABLE | TileTypeFlags::BUILDABLE),
        def(3, "lava", TileTypeFlags::WALKABLE),
    ], &mut tex_cache).unwrap();

    assert_eq!(catalog.len(), 3);
    assert_eq!(tex_cache.requests, vec!["water", "grass", "lava"]);

    let grass = catalog.lookup(1).unwrap();
    assert_eq!(grass.texture, TextureHandle::Index(0));
    assert!(grass.is_walkable());
    assert!(grass.is_buildable());

    let water = catalog.lookup(5).unwrap();
    assert!(!water.is_walkable());
    assert!(!water.is_buildable());

    // Missing texture falls back to the placeholder handle:
    assert_eq!(catalog.lookup(3).unwrap().texture, TextureHandle::invalid());

    // Content browser order is ascending by code:
    let codes: Vec<ReferenceCode> = catalog.iter().map(|tile_type| tile_type.reference_code).collect();
    assert_eq!(codes, vec![1, 3, 5]);
    assert_eq!(catalog.first_code(), Some(1));
}

#[test]
fn test_dangling_reference() {
    let mut tex_cache = FakeTextureCache::new(&["grass"]);
    let catalog = TileCatalog::build(vec![def(1, "grass", TileTypeFlags::WALKABLE)], &mut tex_cache).unwrap();

    assert!(catalog.contains(1));
    assert!(!catalog.contains(2));
    assert_eq!(catalog.lookup(2), Err(CatalogError::DanglingReference(2)));
    assert_eq!(catalog.lookup(-1), Err(CatalogError::DanglingReference(-1)));

    let empty = TileCatalog::default();
    assert!(empty.is_empty());
    assert_eq!(empty.first_code(), None);
}

#[test]
fn test_duplicate_reference() {
    let mut tex_cache = FakeTextureCache::new(&["a", "b"]);
    let result = TileCatalog::build(vec![
        def(1, "a", TileTypeFlags::empty()),
        def(1, "b", TileTypeFlags::empty()),
    ], &mut tex_cache);
    assert_eq!(result.err(), Some(CatalogError::DuplicateReference(1)));
}

#[test]
fn test_json_type_table() {
    let dir = std::env::temp_dir().join(format!("iso_editor_catalog_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    // Well formed table, flags optional:
    {
        let path = dir.join("tile_types.json");
        std::fs::write(&path, r#"[
            { "reference_code": 1, "texture_name": "grass", "flags": "WALKABLE | BUILDABLE" },
            { "reference_code": 2, "texture_name": "water" }
        ]"#).unwrap();

        let mut tex_cache = FakeTextureCache::new(&["grass", "water"]);
        let catalog = TileCatalog::load(&JsonContentLoader, &path, &mut tex_cache).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup(1).unwrap().flags, TileTypeFlags::WALKABLE | TileTypeFlags::BUILDABLE);
        assert_eq!(catalog.lookup(2).unwrap().flags, TileTypeFlags::empty());
    }

    // Broken json:
    {
        let path = dir.join("broken.json");
        std::fs::write(&path, "[ { \"reference_code\": 1 ").unwrap();
        let result = JsonContentLoader.load_type_table(&path);
        assert!(matches!(result, Err(CatalogError::Content { .. })));
    }

    // Missing file:
    {
        let result = JsonContentLoader.load_type_table(&dir.join("missing.json"));
        assert!(matches!(result, Err(CatalogError::Content { .. })));
    }

    let _ = std::fs::remove_dir_all(&dir);
}
