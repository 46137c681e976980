//! Only one OpenGL backend can be created per thread: the surface already owns one, so creating
//! another on the same thread is refused.

use umbra_gl::gl33::StateQueryError;
use umbra_gl::GL33;
use umbra_glfw::{GlfwSurface, WindowOpt};

pub fn fixture() {
  let _surface = GlfwSurface::new_gl33("single-backend-per-thread", WindowOpt::default())
    .expect("GLFW surface");

  match GL33::new() {
    Err(StateQueryError::UnavailableGLState) => println!("second backend refused"),
    Err(e) => panic!("unexpected error: {}", e),
    Ok(_) => panic!("a second backend was created on the same thread"),
  }
}
