//! OpenGL 3.3 backend.
//!
//! This module implements an OpenGL 3.3 backend for umbra. The backend type is [`GL33`].

mod framebuffer;
mod pixel;
mod shader;
mod state;
mod texture;

use self::state::GLState;
pub use self::state::StateQueryError;
use gl::types::*;
use std::collections::HashMap;

/// An OpenGL 3.3 backend.
///
/// This type is to be used as an umbra backend type. It implements every backend trait.
#[derive(Debug)]
pub struct GL33 {
  pub(crate) state: GLState,

  // uniform locations, per program
  pub(crate) uniform_locations: HashMap<(GLuint, String), GLint>,
}

impl GL33 {
  /// Create a new OpenGL 3.3 backend.
  ///
  /// Only one backend can be created per thread.
  pub fn new() -> Result<Self, StateQueryError> {
    GLState::new().map(|state| GL33 {
      state,
      uniform_locations: HashMap::new(),
    })
  }
}
