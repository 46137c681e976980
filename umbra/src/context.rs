//! Graphics context.
//!
//! A graphics context ties a [`Backend`] to the surface it presents to (typically a window). This
//! crate doesn’t provide you with creating such contexts. Instead, you must do it yourself or rely
//! on crates doing it for you, such as `umbra-glfw`.
//!
//! # On context and threads
//!
//! A context wraps graphics state that belongs to the thread that created it. Implementors are
//! expected to be `!Send` and `!Sync`, and a backend should refuse to be created twice on the same
//! thread.

use crate::backend::Backend;

/// Class of graphics context.
pub trait GraphicsContext {
  /// Backend used to render.
  type Backend: ?Sized + Backend;

  /// Access the backend.
  fn backend(&mut self) -> &mut Self::Backend;

  /// Size of the surface’s framebuffer, in pixels.
  fn framebuffer_size(&self) -> [u32; 2];

  /// Present the back buffer.
  fn swap_buffers(&mut self);
}
