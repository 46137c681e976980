//! Shader backend interface.

use crate::shader::{ProgramError, StageSources, UniformValue, UniformWarning};

/// Handle to a linked shader program.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ProgramHandle(pub u32);

impl ProgramHandle {
  /// No program.
  pub const NONE: Self = ProgramHandle(0);
}

/// Shader programs.
pub trait ShaderBackend {
  /// Compile both stages and link them into a program.
  fn new_program(&mut self, sources: &StageSources) -> Result<ProgramHandle, ProgramError>;

  /// Upload a uniform value by name.
  ///
  /// `program` must be the program currently in use.
  fn set_uniform(
    &mut self,
    program: ProgramHandle,
    name: &str,
    value: UniformValue,
  ) -> Result<(), UniformWarning>;
}
