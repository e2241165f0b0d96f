use std::{mem, path::PathBuf};

use crate::{
    log,
    render::{Renderer, TextureCache, TextureHandle},
    utils::{Color, Size, Vec2},
};

use shader::{ShaderProgram, ShaderVariable};
use texture::GlTextureCache;

pub mod shader;
pub mod texture;

// ----------------------------------------------
// Shaders
// ----------------------------------------------

const SPRITE_VS_CODE: &str = r#"
#version 330 core
layout(location = 0) in vec2 in_position;
layout(location = 1) in vec2 in_uv;
layout(location = 2) in vec4 in_color;
uniform vec2 u_viewport_size;
out vec2 v_uv;
out vec4 v_color;
void main() {
    vec2 ndc = (in_position / u_viewport_size) * 2.0 - 1.0;
    gl_Position = vec4(ndc.x, -ndc.y, 0.0, 1.0);
    v_uv = in_uv;
    v_color = in_color;
}
"#;

const SPRITE_FS_CODE: &str = r#"
#version 330 core
in vec2 v_uv;
in vec4 v_color;
uniform sampler2D u_texture;
out vec4 out_color;
void main() {
    out_color = texture(u_texture, v_uv) * v_color;
}
"#;

// ----------------------------------------------
// SpriteVertex
// ----------------------------------------------

#[repr(C)]
#[derive(Copy, Clone)]
struct SpriteVertex {
    position: [f32; 2],
    uv: [f32; 2],
    color: [f32; 4],
}

const VERTICES_PER_SPRITE: usize = 6;

// Consecutive sprites sharing a texture become one draw call.
struct DrawEntry {
    texture: gl::types::GLuint,
    first_vertex: usize,
    vertex_count: usize,
}

// ----------------------------------------------
// SpriteRenderer
// ----------------------------------------------

// OpenGL 3.3 sprite batch. Sprites are anchored at their top-center,
// matching the projected top vertex of a tile diamond.
pub struct SpriteRenderer {
    tex_cache: GlTextureCache,
    shader: ShaderProgram,
    viewport_size_var: ShaderVariable,
    texture_var: ShaderVariable,

    vertex_array: gl::types::GLuint,
    vertex_buffer: gl::types::GLuint,
    vertex_buffer_capacity: usize, // In vertices.

    vertices: Vec<SpriteVertex>,
    entries: Vec<DrawEntry>,

    viewport_size: Size,
    framebuffer_size: Size,
    clear_color: Color,
    sprite_scale: f32,
    builtin_sprite_size: Vec2, // Size of built-in textures at scale 1.
}

impl SpriteRenderer {
    pub fn new(viewport_size: Size,
               framebuffer_size: Size,
               clear_color: Color,
               textures_dir: PathBuf) -> Result<Self, String> {

        let shader = ShaderProgram::with_vs_fs_code(SPRITE_VS_CODE, SPRITE_FS_CODE)?;
        let viewport_size_var = shader.find_variable("u_viewport_size");
        let texture_var = shader.find_variable("u_texture");

        let (vertex_array, vertex_buffer) = unsafe {
            let mut vertex_array = 0;
            let mut vertex_buffer = 0;
            gl::GenVertexArrays(1, &mut vertex_array);
            gl::GenBuffers(1, &mut vertex_buffer);

            if vertex_array == 0 || vertex_buffer == 0 {
                return Err("Failed to create sprite vertex buffers!".into());
            }

            gl::BindVertexArray(vertex_array);
            gl::BindBuffer(gl::ARRAY_BUFFER, vertex_buffer);

            let stride = mem::size_of::<SpriteVertex>() as gl::types::GLsizei;
            let attributes: [(gl::types::GLuint, gl::types::GLint, usize); 3] = [
                (0, 2, mem::offset_of!(SpriteVertex, position)),
                (1, 2, mem::offset_of!(SpriteVertex, uv)),
                (2, 4, mem::offset_of!(SpriteVertex, color)),
            ];

            for (index, components, offset) in attributes {
                gl::EnableVertexAttribArray(index);
                gl::VertexAttribPointer(index, components, gl::FLOAT, gl::FALSE, stride, offset as *const _);
            }

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);

            (vertex_array, vertex_buffer)
        };

        log::info!("render", "Sprite renderer initialized.");

        Ok(Self {
            tex_cache: GlTextureCache::new(textures_dir)?,
            shader,
            viewport_size_var,
            texture_var,
            vertex_array,
            vertex_buffer,
            vertex_buffer_capacity: 0,
            vertices: Vec::new(),
            entries: Vec::new(),
            viewport_size,
            framebuffer_size,
            clear_color,
            sprite_scale: 1.0,
            builtin_sprite_size: Vec2::new(64.0, 32.0),
        })
    }

    pub fn set_viewport_size(&mut self, viewport_size: Size, framebuffer_size: Size) {
        self.viewport_size = viewport_size;
        self.framebuffer_size = framebuffer_size;
    }

    pub fn set_builtin_sprite_size(&mut self, size: Vec2) {
        self.builtin_sprite_size = size;
    }

    pub fn begin_frame(&mut self) {
        self.vertices.clear();
        self.entries.clear();

        unsafe {
            gl::Viewport(0, 0, self.framebuffer_size.width, self.framebuffer_size.height);
            gl::ClearColor(self.clear_color.r, self.clear_color.g, self.clear_color.b, self.clear_color.a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    pub fn end_frame(&mut self) {
        if self.vertices.is_empty() {
            return;
        }

        self.upload_vertices();

        unsafe {
            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
            gl::Disable(gl::DEPTH_TEST);

            self.shader.bind();
            self.viewport_size_var.set_vec2(self.viewport_size.to_vec2());
            self.texture_var.set_i32(0);

            gl::ActiveTexture(gl::TEXTURE0);
            gl::BindVertexArray(self.vertex_array);

            for entry in &self.entries {
                gl::BindTexture(gl::TEXTURE_2D, entry.texture);
                gl::DrawArrays(gl::TRIANGLES, entry.first_vertex as _, entry.vertex_count as _);
            }

            gl::BindVertexArray(0);
            gl::BindTexture(gl::TEXTURE_2D, 0);
            gl::UseProgram(0);
        }
    }

    fn upload_vertices(&mut self) {
        let byte_size = self.vertices.len() * mem::size_of::<SpriteVertex>();

        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vertex_buffer);

            if self.vertices.len() > self.vertex_buffer_capacity {
                gl::BufferData(gl::ARRAY_BUFFER, byte_size as _, self.vertices.as_ptr() as _, gl::DYNAMIC_DRAW);
                self.vertex_buffer_capacity = self.vertices.len();
            } else {
                gl::BufferSubData(gl::ARRAY_BUFFER, 0, byte_size as _, self.vertices.as_ptr() as _);
            }

            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }
    }

    fn sprite_size(&self, texture: TextureHandle) -> Vec2 {
        if self.tex_cache.is_builtin(texture) {
            self.builtin_sprite_size
        } else {
            self.tex_cache.handle_to_texture(texture).size().to_vec2()
        }
    }
}

impl Renderer for SpriteRenderer {
    fn set_sprite_scale(&mut self, scale: f32) {
        self.sprite_scale = scale;
    }

    fn draw_at(&mut self, texture: TextureHandle, screen_pos: Vec2, color: Color) {
        let size = self.sprite_size(texture) * self.sprite_scale;
        let gl_texture = self.tex_cache.handle_to_texture(texture).handle();

        let left = screen_pos.x - (size.x * 0.5);
        let right = screen_pos.x + (size.x * 0.5);
        let top = screen_pos.y;
        let bottom = screen_pos.y + size.y;

        let color = color.to_array();
        let vertex = |x: f32, y: f32, u: f32, v: f32| SpriteVertex { position: [x, y], uv: [u, v], color };

        let first_vertex = self.vertices.len();
        self.vertices.extend_from_slice(&[
            vertex(left,  top,    0.0, 0.0),
            vertex(right, top,    1.0, 0.0),
            vertex(right, bottom, 1.0, 1.0),
            vertex(left,  top,    0.0, 0.0),
            vertex(right, bottom, 1.0, 1.0),
            vertex(left,  bottom, 0.0, 1.0),
        ]);

        match self.entries.last_mut() {
            Some(entry) if entry.texture == gl_texture => {
                entry.vertex_count += VERTICES_PER_SPRITE;
            }
            _ => {
                self.entries.push(DrawEntry {
                    texture: gl_texture,
                    first_vertex,
                    vertex_count: VERTICES_PER_SPRITE,
                });
            }
        }
    }
}

impl TextureCache for SpriteRenderer {
    fn load_texture(&mut self, name: &str) -> TextureHandle {
        self.tex_cache.load(name)
    }
}

impl Drop for SpriteRenderer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.vertex_buffer);
            gl::DeleteVertexArrays(1, &self.vertex_array);
        }
    }
}
