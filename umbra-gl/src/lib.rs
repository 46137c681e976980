//! OpenGL backends.
//!
//! This crate exports [OpenGL](https://www.khronos.org/opengl/) backends for umbra. The only one
//! available so far is [`GL33`], targetting OpenGL 3.3 core.
//!
//! A backend doesn’t create any OpenGL context: it expects one to be current on the thread it is
//! created on, with its function pointers loaded (see the `gl` crate). `umbra-glfw` does both.

pub mod gl33;

pub use gl33::GL33;
