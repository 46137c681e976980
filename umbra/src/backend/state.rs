//! Graphics state backend interface.

use crate::backend::framebuffer::FramebufferHandle;
use crate::backend::shader::ProgramHandle;
use crate::backend::texture::TextureHandle;

/// Rectangular region of the output surface rendering commands map onto.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Viewport {
  /// Lower-left corner, X.
  pub x: i32,
  /// Lower-left corner, Y.
  pub y: i32,
  /// Width of the region.
  pub width: u32,
  /// Height of the region.
  pub height: u32,
}

impl Viewport {
  /// Viewport covering a whole surface of the given size.
  pub fn whole([width, height]: [u32; 2]) -> Self {
    Viewport {
      x: 0,
      y: 0,
      width,
      height,
    }
  }

  /// Size of the viewport.
  pub fn size(&self) -> [u32; 2] {
    [self.width, self.height]
  }
}

/// Buffers to clear.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ClearBuffers {
  /// Clear the color buffer(s).
  pub color: bool,
  /// Clear the depth buffer.
  pub depth: bool,
}

impl ClearBuffers {
  /// Clear only the depth buffer.
  pub const DEPTH: Self = ClearBuffers {
    color: false,
    depth: true,
  };

  /// Clear both the color and depth buffers.
  pub const COLOR_DEPTH: Self = ClearBuffers {
    color: true,
    depth: true,
  };
}

/// Global graphics state.
///
/// Getters return what the backend believes is currently bound; setters might be skipped by the
/// backend if the value is already set.
pub trait StateBackend {
  /// Currently set viewport.
  fn viewport(&self) -> Viewport;

  /// Set the viewport.
  fn set_viewport(&mut self, viewport: Viewport);

  /// Framebuffer currently bound for drawing.
  fn bound_framebuffer(&self) -> FramebufferHandle;

  /// Bind a framebuffer for drawing.
  fn bind_framebuffer(&mut self, framebuffer: FramebufferHandle);

  /// Program currently in use.
  fn current_program(&self) -> ProgramHandle;

  /// Use a program.
  fn use_program(&mut self, program: ProgramHandle);

  /// 2D texture currently bound to a texture unit.
  fn bound_texture(&self, unit: u32) -> TextureHandle;

  /// Bind a 2D texture to a texture unit.
  fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

  /// Enable or disable depth testing.
  fn set_depth_test(&mut self, enabled: bool);

  /// Clear buffers of the currently bound framebuffer.
  fn clear(&mut self, buffers: ClearBuffers);
}
