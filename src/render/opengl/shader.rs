use std::{ffi::CString, ptr};

use crate::utils::Vec2;

// ----------------------------------------------
// Constants
// ----------------------------------------------

pub const NULL_SHADER_HANDLE: gl::types::GLuint = 0;

// ----------------------------------------------
// ShaderVariable
// ----------------------------------------------

pub struct ShaderVariable {
    pub location: gl::types::GLint,
    pub program_handle: gl::types::GLuint, // ShaderProgram it belongs to.
}

impl ShaderVariable {
    pub fn is_valid(&self) -> bool {
        // Uniform locations can be zero. Only negative values are invalid.
        self.location >= 0 && self.program_handle != NULL_SHADER_HANDLE
    }

    pub fn set_vec2(&self, value: Vec2) {
        if self.is_valid() {
            unsafe {
                gl::Uniform2f(self.location, value.x, value.y);
            }
        }
    }

    pub fn set_i32(&self, value: i32) {
        if self.is_valid() {
            unsafe {
                gl::Uniform1i(self.location, value);
            }
        }
    }
}

// ----------------------------------------------
// ShaderProgram
// ----------------------------------------------

pub struct ShaderProgram {
    program_handle: gl::types::GLuint,
}

impl ShaderProgram {
    pub fn with_vs_fs_code(vertex_shader_code: &str, fragment_shader_code: &str) -> Result<Self, String> {
        let vertex_shader_handle = create_shader(gl::VERTEX_SHADER, vertex_shader_code)?;

        let fragment_shader_handle = match create_shader(gl::FRAGMENT_SHADER, fragment_shader_code) {
            Ok(handle) => handle,
            Err(err) => {
                unsafe { gl::DeleteShader(vertex_shader_handle); }
                return Err(err);
            }
        };

        let program_handle = create_program(vertex_shader_handle, fragment_shader_handle);

        // Shaders are no longer needed once linked (or failed to).
        unsafe {
            gl::DeleteShader(vertex_shader_handle);
            gl::DeleteShader(fragment_shader_handle);
        }

        Ok(Self { program_handle: program_handle? })
    }

    pub fn bind(&self) {
        unsafe {
            gl::UseProgram(self.program_handle);
        }
    }

    pub fn find_variable(&self, name: &str) -> ShaderVariable {
        let location = match CString::new(name) {
            Ok(c_name) => unsafe { gl::GetUniformLocation(self.program_handle, c_name.as_ptr()) },
            Err(_) => -1,
        };

        ShaderVariable { location, program_handle: self.program_handle }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if self.program_handle != NULL_SHADER_HANDLE {
            unsafe {
                gl::DeleteProgram(self.program_handle);
            }
            self.program_handle = NULL_SHADER_HANDLE;
        }
    }
}

// ----------------------------------------------
// Internal helpers
// ----------------------------------------------

fn create_shader(shader_type: gl::types::GLenum, source_code: &str) -> Result<gl::types::GLuint, String> {
    let c_source = CString::new(source_code).map_err(|err| format!("Invalid shader source: {err}"))?;

    unsafe {
        let handle = gl::CreateShader(shader_type);
        if handle == NULL_SHADER_HANDLE {
            return Err("Failed to create shader handle!".into());
        }

        gl::ShaderSource(handle, 1, &c_source.as_ptr(), ptr::null());
        gl::CompileShader(handle);

        let mut status = gl::FALSE as gl::types::GLint;
        gl::GetShaderiv(handle, gl::COMPILE_STATUS, &mut status);

        if status != gl::TRUE as gl::types::GLint {
            let info_log = shader_info_log(handle);
            gl::DeleteShader(handle);
            return Err(format!("Shader compilation failed: {info_log}"));
        }

        Ok(handle)
    }
}

fn create_program(vertex_shader_handle: gl::types::GLuint,
                  fragment_shader_handle: gl::types::GLuint) -> Result<gl::types::GLuint, String> {
    unsafe {
        let handle = gl::CreateProgram();
        if handle == NULL_SHADER_HANDLE {
            return Err("Failed to create shader program handle!".into());
        }

        gl::AttachShader(handle, vertex_shader_handle);
        gl::AttachShader(handle, fragment_shader_handle);
        gl::LinkProgram(handle);

        let mut status = gl::FALSE as gl::types::GLint;
        gl::GetProgramiv(handle, gl::LINK_STATUS, &mut status);

        if status != gl::TRUE as gl::types::GLint {
            let info_log = program_info_log(handle);
            gl::DeleteProgram(handle);
            return Err(format!("Shader program link failed: {info_log}"));
        }

        Ok(handle)
    }
}

unsafe fn shader_info_log(handle: gl::types::GLuint) -> String {
    unsafe {
        let mut log_len: gl::types::GLint = 0;
        gl::GetShaderiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

        let mut buffer = vec![0u8; log_len.max(1) as usize];
        gl::GetShaderInfoLog(handle, log_len, ptr::null_mut(), buffer.as_mut_ptr() as *mut gl::types::GLchar);
        String::from_utf8_lossy(&buffer).trim_end_matches('\0').to_string()
    }
}

unsafe fn program_info_log(handle: gl::types::GLuint) -> String {
    unsafe {
        let mut log_len: gl::types::GLint = 0;
        gl::GetProgramiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

        let mut buffer = vec![0u8; log_len.max(1) as usize];
        gl::GetProgramInfoLog(handle, log_len, ptr::null_mut(), buffer.as_mut_ptr() as *mut gl::types::GLchar);
        String::from_utf8_lossy(&buffer).trim_end_matches('\0').to_string()
    }
}
