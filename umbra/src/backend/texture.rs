//! Texture backend interface.

use crate::texture::{PixelFormat, Sampler, TextureError};

/// Handle to a 2D texture.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
  /// No texture.
  pub const NONE: Self = TextureHandle(0);
}

/// 2D texture creation and queries.
///
/// Creating a texture must not change what is bound to any texture unit.
pub trait TextureBackend {
  /// Allocate a depth texture with uninitialized content.
  fn new_depth_texture(
    &mut self,
    size: [u32; 2],
    sampler: &Sampler,
  ) -> Result<TextureHandle, TextureError>;

  /// Allocate a color texture and upload `texels` to it.
  ///
  /// `texels` are tightly packed, one byte per channel. Mipmaps are generated if the minification
  /// filter of `sampler` uses them.
  fn new_texture(
    &mut self,
    size: [u32; 2],
    format: PixelFormat,
    sampler: &Sampler,
    texels: &[u8],
  ) -> Result<TextureHandle, TextureError>;

  /// Size of the base level of a texture, as reported by the backend.
  fn texture_size(&mut self, texture: TextureHandle) -> [u32; 2];
}
