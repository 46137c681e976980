use gl::types::*;
use log::debug;
use std::ffi::CString;
use std::ptr::{null, null_mut};

use crate::gl33::GL33;
use umbra::backend::shader::{ProgramHandle, ShaderBackend};
use umbra::shader::{ProgramError, StageSources, StageType, UniformValue, UniformWarning};

// A compiled stage, deleted once linked (or once linking failed).
struct Stage {
  handle: GLuint,
}

impl Drop for Stage {
  fn drop(&mut self) {
    unsafe {
      gl::DeleteShader(self.handle);
    }
  }
}

impl Stage {
  unsafe fn new(ty: StageType, src: &str) -> Result<Self, ProgramError> {
    let c_src = CString::new(src.as_bytes())
      .map_err(|_| ProgramError::CompilationFailed(ty, "source contains a NUL byte".to_owned()))?;

    let handle = gl::CreateShader(opengl_shader_type(ty));

    if handle == 0 {
      return Err(ProgramError::CompilationFailed(
        ty,
        "unable to create shader stage".to_owned(),
      ));
    }

    gl::ShaderSource(handle, 1, [c_src.as_ptr()].as_ptr(), null());
    gl::CompileShader(handle);

    let stage = Stage { handle };

    let mut compiled: GLint = gl::FALSE.into();
    gl::GetShaderiv(handle, gl::COMPILE_STATUS, &mut compiled);

    if compiled == gl::TRUE.into() {
      Ok(stage)
    } else {
      let mut log_len: GLint = 0;
      gl::GetShaderiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

      let mut log: Vec<u8> = vec![0; log_len.max(0) as usize];
      gl::GetShaderInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);

      Err(ProgramError::CompilationFailed(ty, info_log(log)))
    }
  }
}

unsafe fn link_program(vertex: &Stage, fragment: &Stage) -> Result<GLuint, ProgramError> {
  let handle = gl::CreateProgram();

  gl::AttachShader(handle, vertex.handle);
  gl::AttachShader(handle, fragment.handle);
  gl::LinkProgram(handle);
  gl::DetachShader(handle, vertex.handle);
  gl::DetachShader(handle, fragment.handle);

  let mut linked: GLint = gl::FALSE.into();
  gl::GetProgramiv(handle, gl::LINK_STATUS, &mut linked);

  if linked == gl::TRUE.into() {
    Ok(handle)
  } else {
    let mut log_len: GLint = 0;
    gl::GetProgramiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

    let mut log: Vec<u8> = vec![0; log_len.max(0) as usize];
    gl::GetProgramInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);

    gl::DeleteProgram(handle);

    Err(ProgramError::LinkFailed(info_log(log)))
  }
}

// info logs are NUL-terminated
fn info_log(mut log: Vec<u8>) -> String {
  if let Some(nul) = log.iter().position(|&b| b == 0) {
    log.truncate(nul);
  }

  String::from_utf8_lossy(&log).trim_end().to_owned()
}

impl GL33 {
  fn uniform_location(&mut self, program: GLuint, name: &str) -> Result<GLint, UniformWarning> {
    if let Some(&location) = self.uniform_locations.get(&(program, name.to_owned())) {
      return if location < 0 {
        Err(UniformWarning::inactive(name))
      } else {
        Ok(location)
      };
    }

    let location = match CString::new(name.as_bytes()) {
      Ok(c_name) => unsafe { gl::GetUniformLocation(program, c_name.as_ptr() as *const GLchar) },
      Err(_) => -1,
    };

    self
      .uniform_locations
      .insert((program, name.to_owned()), location);

    // ensure the location smells good
    if location < 0 {
      Err(UniformWarning::inactive(name))
    } else {
      Ok(location)
    }
  }
}

impl ShaderBackend for GL33 {
  fn new_program(&mut self, sources: &StageSources) -> Result<ProgramHandle, ProgramError> {
    unsafe {
      let vertex = Stage::new(StageType::VertexShader, &sources.vertex)?;
      let fragment = Stage::new(StageType::FragmentShader, &sources.fragment)?;
      let handle = link_program(&vertex, &fragment)?;

      debug!("linked program {}", handle);

      Ok(ProgramHandle(handle))
    }
  }

  fn set_uniform(
    &mut self,
    program: ProgramHandle,
    name: &str,
    value: UniformValue,
  ) -> Result<(), UniformWarning> {
    debug_assert_eq!(self.state.current_program(), program.0);

    let location = self.uniform_location(program.0, name)?;

    unsafe {
      match value {
        UniformValue::Int(x) => gl::Uniform1i(location, x),
        UniformValue::Vec3(v) => gl::Uniform3fv(location, 1, v.as_ptr()),
        UniformValue::Mat4(m) => {
          gl::UniformMatrix4fv(location, 1, gl::FALSE, m.as_ptr() as *const GLfloat)
        }
      }
    }

    Ok(())
  }
}

fn opengl_shader_type(t: StageType) -> GLenum {
  match t {
    StageType::VertexShader => gl::VERTEX_SHADER,
    StageType::FragmentShader => gl::FRAGMENT_SHADER,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn info_log_stops_at_nul() {
    let log = b"0:12(3): error: `shadowMap' undeclared\n\0garbage".to_vec();
    assert_eq!(info_log(log), "0:12(3): error: `shadowMap' undeclared");
  }

  #[test]
  fn empty_info_log() {
    assert_eq!(info_log(Vec::new()), "");
  }
}
