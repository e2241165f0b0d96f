use std::{collections::HashMap, path::{Path, PathBuf}};

use crate::{
    log,
    render::TextureHandle,
    utils::Size,
};

// ----------------------------------------------
// Constants
// ----------------------------------------------

pub const NULL_TEXTURE_HANDLE: gl::types::GLuint = 0;

// Extension tried when a texture name has none.
pub const DEFAULT_TEXTURE_EXTENSION: &str = "png";

const BUILTIN_TEXTURE_SIZE: i32 = 8;

// ----------------------------------------------
// Texture2D
// ----------------------------------------------

pub struct Texture2D {
    handle: gl::types::GLuint,
    size: Size,
    name: String,
}

impl Texture2D {
    pub fn from_file(file_path: &Path) -> Result<Self, String> {
        let image = image::open(file_path)
            .map_err(|err| format!("Failed to load image file {file_path:?}: {err}"))?;

        let pixels = image.to_rgba8();
        let size = Size::new(pixels.width() as i32, pixels.height() as i32);

        Self::with_rgba_pixels(pixels.as_raw(), size, &file_path.to_string_lossy())
    }

    pub fn with_rgba_pixels(pixels: &[u8], size: Size, debug_name: &str) -> Result<Self, String> {
        if !size.is_valid() || pixels.len() != (size.width * size.height * 4) as usize {
            return Err(format!("Invalid pixel data for texture '{debug_name}'"));
        }

        let handle = unsafe {
            let mut handle = NULL_TEXTURE_HANDLE;
            gl::GenTextures(1, &mut handle);
            if handle == NULL_TEXTURE_HANDLE {
                return Err(format!("Failed to create texture handle for '{debug_name}'"));
            }

            gl::BindTexture(gl::TEXTURE_2D, handle);

            gl::TexImage2D(gl::TEXTURE_2D,
                           0,
                           gl::RGBA as _, // Only RGBA images supported.
                           size.width,
                           size.height,
                           0,
                           gl::RGBA,
                           gl::UNSIGNED_BYTE,
                           pixels.as_ptr() as _);

            // Pixel art tiles: no filtering, no mipmaps.
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::NEAREST as _);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::NEAREST as _);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as _);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as _);

            gl::BindTexture(gl::TEXTURE_2D, NULL_TEXTURE_HANDLE);
            handle
        };

        Ok(Self { handle, size, name: debug_name.to_string() })
    }

    #[inline]
    pub fn handle(&self) -> gl::types::GLuint {
        self.handle
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        if self.handle != NULL_TEXTURE_HANDLE {
            unsafe {
                gl::DeleteTextures(1, &self.handle);
            }
            self.handle = NULL_TEXTURE_HANDLE;
        }
    }
}

// ----------------------------------------------
// GlTextureCache
// ----------------------------------------------

// Loaded textures by name. Every name is loaded at most once; failures
// are remembered too so a missing file is only reported once.
pub struct GlTextureCache {
    textures_dir: PathBuf,
    textures: Vec<Texture2D>,
    lookup: HashMap<String, TextureHandle>,

    // These are 8x8 pixels.
    placeholder_texture: Texture2D, // TextureHandle::Invalid
    white_texture: Texture2D,       // TextureHandle::White
}

impl GlTextureCache {
    pub fn new(textures_dir: PathBuf) -> Result<Self, String> {
        Ok(Self {
            textures_dir,
            textures: Vec::new(),
            lookup: HashMap::new(),
            placeholder_texture: create_checker_texture("placeholder_texture", [255, 0, 255, 255], [0, 0, 0, 255])?,
            white_texture: create_checker_texture("white_texture", [255; 4], [255; 4])?,
        })
    }

    #[inline]
    pub fn handle_to_texture(&self, handle: TextureHandle) -> &Texture2D {
        match handle {
            TextureHandle::Invalid => &self.placeholder_texture,
            TextureHandle::White => &self.white_texture,
            TextureHandle::Index(index) => {
                self.textures.get(index as usize).unwrap_or(&self.placeholder_texture)
            }
        }
    }

    #[inline]
    pub fn is_builtin(&self, handle: TextureHandle) -> bool {
        match handle {
            TextureHandle::Index(index) => (index as usize) >= self.textures.len(),
            _ => true,
        }
    }

    fn resolve_path(&self, name: &str) -> PathBuf {
        let path = self.textures_dir.join(name);
        if path.extension().is_none() {
            path.with_extension(DEFAULT_TEXTURE_EXTENSION)
        } else {
            path
        }
    }

    pub fn load(&mut self, name: &str) -> TextureHandle {
        if let Some(&handle) = self.lookup.get(name) {
            return handle;
        }

        let path = self.resolve_path(name);

        let handle = match Texture2D::from_file(&path) {
            Ok(texture) => {
                self.textures.push(texture);
                TextureHandle::Index((self.textures.len() - 1) as u32)
            }
            Err(err) => {
                log::error!("render", "{err}");
                TextureHandle::invalid()
            }
        };

        self.lookup.insert(name.to_string(), handle);
        handle
    }
}

fn create_checker_texture(debug_name: &str, color_a: [u8; 4], color_b: [u8; 4]) -> Result<Texture2D, String> {
    let mut pixels = Vec::with_capacity((BUILTIN_TEXTURE_SIZE * BUILTIN_TEXTURE_SIZE * 4) as usize);

    for y in 0..BUILTIN_TEXTURE_SIZE {
        for x in 0..BUILTIN_TEXTURE_SIZE {
            let color = if ((x / 2) + (y / 2)) % 2 == 0 { color_a } else { color_b };
            pixels.extend_from_slice(&color);
        }
    }

    Texture2D::with_rgba_pixels(&pixels, Size::new(BUILTIN_TEXTURE_SIZE, BUILTIN_TEXTURE_SIZE), debug_name)
}
