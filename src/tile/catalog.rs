use std::{collections::BTreeMap, fmt, path::{Path, PathBuf}};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::{
    log,
    render::{TextureCache, TextureHandle},
    save::{JsonSaveState, SaveState},
};

#[cfg(test)]
mod tests;

// ----------------------------------------------
// ReferenceCode / TileTypeFlags
// ----------------------------------------------

// Small integer key stored in every grid cell.
pub type ReferenceCode = i16;

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TileTypeFlags: u8 {
        const WALKABLE  = 1 << 0;
        const BUILDABLE = 1 << 1;
    }
}

// ----------------------------------------------
// TileTypeDef / TileType
// ----------------------------------------------

// Persisted type table entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileTypeDef {
    pub reference_code: ReferenceCode,
    pub texture_name: String,
    #[serde(default)]
    pub flags: TileTypeFlags,
}

// Loaded, immutable tile type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileType {
    pub reference_code: ReferenceCode,
    pub texture: TextureHandle,
    pub texture_name: String,
    pub flags: TileTypeFlags,
}

impl TileType {
    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.flags.intersects(TileTypeFlags::WALKABLE)
    }

    #[inline]
    pub fn is_buildable(&self) -> bool {
        self.flags.intersects(TileTypeFlags::BUILDABLE)
    }
}

// ----------------------------------------------
// CatalogError
// ----------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogError {
    DanglingReference(ReferenceCode),
    DuplicateReference(ReferenceCode),
    Content { path: PathBuf, message: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingReference(code) => write!(f, "no tile type with reference code {code}"),
            Self::DuplicateReference(code) => write!(f, "reference code {code} is defined more than once"),
            Self::Content { path, message } => write!(f, "failed to load tile types from {path:?}: {message}"),
        }
    }
}

impl std::error::Error for CatalogError {}

// ----------------------------------------------
// ContentLoader
// ----------------------------------------------

pub trait ContentLoader {
    fn load_type_table(&self, path: &Path) -> Result<Vec<TileTypeDef>, CatalogError>;
}

// Reads a JSON array of `TileTypeDef`, e.g.:
//  [ { "reference_code": 1, "texture_name": "grass", "flags": "WALKABLE | BUILDABLE" } ]
pub struct JsonContentLoader;

impl ContentLoader for JsonContentLoader {
    fn load_type_table(&self, path: &Path) -> Result<Vec<TileTypeDef>, CatalogError> {
        JsonSaveState::compact().read_file(path).map_err(|err| CatalogError::Content {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}

// ----------------------------------------------
// TileCatalog
// ----------------------------------------------

// Reference code -> tile type. Built once at startup and shared
// read-only by the grid, the renderer and the UI content browser.
#[derive(Clone, Debug, Default)]
pub struct TileCatalog {
    types: BTreeMap<ReferenceCode, TileType>,
}

impl TileCatalog {
    pub fn build(defs: Vec<TileTypeDef>, tex_cache: &mut dyn TextureCache) -> Result<Self, CatalogError> {
        let mut types = BTreeMap::new();

        for def in defs {
            if types.contains_key(&def.reference_code) {
                return Err(CatalogError::DuplicateReference(def.reference_code));
            }

            let texture = tex_cache.load_texture(&def.texture_name);
            if !texture.is_valid() {
                log::error!("catalog",
                            "Texture '{}' for tile type {} not found. Using placeholder.",
                            def.texture_name, def.reference_code);
            }

            types.insert(def.reference_code, TileType {
                reference_code: def.reference_code,
                texture,
                texture_name: def.texture_name,
                flags: def.flags,
            });
        }

        Ok(Self { types })
    }

    pub fn load(loader: &dyn ContentLoader,
                path: &Path,
                tex_cache: &mut dyn TextureCache) -> Result<Self, CatalogError> {

        let defs = loader.load_type_table(path)?;
        let catalog = Self::build(defs, tex_cache)?;

        log::info!("catalog", "Loaded {} tile types from {path:?}.", catalog.len());
        Ok(catalog)
    }

    pub fn lookup(&self, code: ReferenceCode) -> Result<&TileType, CatalogError> {
        self.types.get(&code).ok_or(CatalogError::DanglingReference(code))
    }

    #[inline]
    pub fn contains(&self, code: ReferenceCode) -> bool {
        self.types.contains_key(&code)
    }

    // Ascending reference code order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &TileType> {
        self.types.values()
    }

    #[inline]
    pub fn first_code(&self) -> Option<ReferenceCode> {
        self.types.keys().next().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
