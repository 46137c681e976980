//! Shader programs and uniforms.
//!
//! A [`Program`] is built from a vertex and a fragment stage ([`StageSources`]). Uniforms are set by
//! name through a [`ProgramBinding`](crate::binding::ProgramBinding), which only exists while the
//! program is in use.
//!
//! Uploading to a uniform the program doesn’t have (because it doesn’t exist or the GLSL compiler
//! optimized it out) is not an error: a [`UniformWarning`] is logged the first time it happens for
//! a given name and the upload is ignored.

use cgmath::{Matrix4, Point3, Vector3};
use log::warn;
use std::collections::HashSet;
use std::error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::backend::shader::{ProgramHandle, ShaderBackend};

/// Shader stage type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StageType {
  /// Vertex shader.
  VertexShader,
  /// Fragment shader.
  FragmentShader,
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      StageType::VertexShader => f.write_str("vertex shader"),
      StageType::FragmentShader => f.write_str("fragment shader"),
    }
  }
}

/// Sources of the stages of a program.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StageSources {
  /// Vertex shader source.
  pub vertex: String,
  /// Fragment shader source.
  pub fragment: String,
}

impl StageSources {
  /// Sources from in-memory strings.
  pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
    StageSources {
      vertex: vertex.into(),
      fragment: fragment.into(),
    }
  }

  /// Read both stages from disk.
  pub fn from_files(
    vertex: impl AsRef<Path>,
    fragment: impl AsRef<Path>,
  ) -> Result<Self, ProgramError> {
    let vertex = read_stage(vertex.as_ref(), StageType::VertexShader)?;
    let fragment = read_stage(fragment.as_ref(), StageType::FragmentShader)?;

    Ok(StageSources { vertex, fragment })
  }
}

fn read_stage(path: &Path, ty: StageType) -> Result<String, ProgramError> {
  fs::read_to_string(path).map_err(|source| ProgramError::CannotReadSource {
    ty,
    path: path.to_owned(),
    source,
  })
}

/// Errors that might happen while building a program.
#[non_exhaustive]
#[derive(Debug)]
pub enum ProgramError {
  /// A stage source file couldn’t be read.
  CannotReadSource {
    /// Stage the file is the source of.
    ty: StageType,
    /// Path to the file.
    path: PathBuf,
    /// Underlying I/O error.
    source: io::Error,
  },

  /// A stage failed to compile. Contains the compiler log.
  CompilationFailed(StageType, String),

  /// Linking the stages failed. Contains the linker log.
  LinkFailed(String),
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      ProgramError::CannotReadSource {
        ty, ref path, ref source,
      } => write!(f, "cannot read {} source {}: {}", ty, path.display(), source),

      ProgramError::CompilationFailed(ty, ref log) => {
        write!(f, "{} compilation failed: {}", ty, log)
      }

      ProgramError::LinkFailed(ref log) => write!(f, "program link failed: {}", log),
    }
  }
}

impl error::Error for ProgramError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ProgramError::CannotReadSource { source, .. } => Some(source),
      _ => None,
    }
  }
}

/// Value that can be uploaded to a uniform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
  /// `int` or `sampler*` uniform.
  Int(i32),
  /// `vec3` uniform.
  Vec3([f32; 3]),
  /// `mat4` uniform, column-major.
  Mat4([[f32; 4]; 4]),
}

impl From<i32> for UniformValue {
  fn from(v: i32) -> Self {
    UniformValue::Int(v)
  }
}

impl From<[f32; 3]> for UniformValue {
  fn from(v: [f32; 3]) -> Self {
    UniformValue::Vec3(v)
  }
}

impl From<Vector3<f32>> for UniformValue {
  fn from(v: Vector3<f32>) -> Self {
    UniformValue::Vec3(v.into())
  }
}

impl From<Point3<f32>> for UniformValue {
  fn from(p: Point3<f32>) -> Self {
    UniformValue::Vec3(p.into())
  }
}

impl From<Matrix4<f32>> for UniformValue {
  fn from(m: Matrix4<f32>) -> Self {
    UniformValue::Mat4(m.into())
  }
}

/// Non-fatal uniform problem.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UniformWarning {
  /// The program has no active uniform with that name.
  Inactive(String),
}

impl UniformWarning {
  /// Create an inactive uniform warning.
  pub fn inactive(name: impl Into<String>) -> Self {
    UniformWarning::Inactive(name.into())
  }
}

impl fmt::Display for UniformWarning {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      UniformWarning::Inactive(ref name) => write!(f, "inactive uniform: {}", name),
    }
  }
}

impl error::Error for UniformWarning {}

/// A linked shader program.
#[derive(Debug)]
pub struct Program {
  handle: ProgramHandle,
  label: String,
  // uniforms we already warned about
  warned: HashSet<String>,
}

impl Program {
  /// Build a new program.
  pub fn new<B>(
    backend: &mut B,
    label: impl Into<String>,
    sources: &StageSources,
  ) -> Result<Self, ProgramError>
  where
    B: ?Sized + ShaderBackend,
  {
    let handle = backend.new_program(sources)?;
    Ok(Program::from_handle(handle, label))
  }

  /// Wrap an already linked program.
  pub fn from_handle(handle: ProgramHandle, label: impl Into<String>) -> Self {
    Program {
      handle,
      label: label.into(),
      warned: HashSet::new(),
    }
  }

  /// Backend handle.
  pub fn handle(&self) -> ProgramHandle {
    self.handle
  }

  /// Human-readable label, used in logs.
  pub fn label(&self) -> &str {
    &self.label
  }

  /// Log a uniform warning, unless one was already logged for the same uniform.
  pub(crate) fn report(&mut self, name: &str, warning: &UniformWarning) {
    if !self.warned.contains(name) {
      warn!("{} program: {}", self.label, warning);
      self.warned.insert(name.to_owned());
    }
  }

  /// Whether a warning has been reported for that uniform.
  pub fn has_warned(&self, name: &str) -> bool {
    self.warned.contains(name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::{Matrix4, Vector3};

  #[test]
  fn mat4_uniform_is_column_major() {
    let m = Matrix4::from_translation(Vector3::new(1., 2., 3.));

    match UniformValue::from(m) {
      UniformValue::Mat4(cols) => assert_eq!(cols[3], [1., 2., 3., 1.]),
      v => panic!("unexpected uniform value: {:?}", v),
    }
  }

  #[test]
  fn missing_source_file() {
    let err = StageSources::from_files("does/not/exist.vert", "does/not/exist.frag").unwrap_err();

    match err {
      ProgramError::CannotReadSource { ty, ref path, .. } => {
        assert_eq!(ty, StageType::VertexShader);
        assert_eq!(path, Path::new("does/not/exist.vert"));
      }
      e => panic!("unexpected error: {}", e),
    }
  }

  #[test]
  fn warnings_are_reported_once() {
    let mut program = Program::from_handle(ProgramHandle(3), "test");
    let warning = UniformWarning::inactive("model");

    assert!(!program.has_warned("model"));
    program.report("model", &warning);
    program.report("model", &warning);
    assert!(program.has_warned("model"));
    assert_eq!(program.warned.len(), 1);
  }
}
