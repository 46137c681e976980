use gl::types::*;
use umbra::texture::PixelFormat;

// OpenGL format, internal format and type of a pixel format.
pub(crate) fn opengl_pixel_format(pf: PixelFormat) -> (GLenum, GLenum, GLenum) {
  match pf {
    PixelFormat::R8 => (gl::RED, gl::R8, gl::UNSIGNED_BYTE),
    PixelFormat::RGB8 => (gl::RGB, gl::RGB8, gl::UNSIGNED_BYTE),
    PixelFormat::RGBA8 => (gl::RGBA, gl::RGBA8, gl::UNSIGNED_BYTE),
    PixelFormat::Depth32F => (gl::DEPTH_COMPONENT, gl::DEPTH_COMPONENT32F, gl::FLOAT),
  }
}

// Size of a single pixel, in bytes.
pub(crate) fn pixel_bytes_len(pf: PixelFormat) -> usize {
  match pf {
    PixelFormat::Depth32F => 4,
    _ => pf.channels_len(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn color_formats_are_normalized_bytes() {
    for &pf in &[PixelFormat::R8, PixelFormat::RGB8, PixelFormat::RGBA8] {
      let (_, _, encoding) = opengl_pixel_format(pf);
      assert_eq!(encoding, gl::UNSIGNED_BYTE);
      assert_eq!(pixel_bytes_len(pf), pf.channels_len());
    }
  }

  #[test]
  fn depth_is_float() {
    assert_eq!(
      opengl_pixel_format(PixelFormat::Depth32F),
      (gl::DEPTH_COMPONENT, gl::DEPTH_COMPONENT32F, gl::FLOAT)
    );
    assert_eq!(pixel_bytes_len(PixelFormat::Depth32F), 4);
  }
}
