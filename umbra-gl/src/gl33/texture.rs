use gl::types::*;
use std::os::raw::c_void;
use std::ptr;

use crate::gl33::pixel::{opengl_pixel_format, pixel_bytes_len};
use crate::gl33::GL33;
use umbra::backend::texture::{TextureBackend, TextureHandle};
use umbra::texture::{MagFilter, MinFilter, PixelFormat, Sampler, TextureError, Wrap};

impl GL33 {
  // Allocate a 2D texture, optionally uploading its base level. The binding of the current
  // texture unit is restored afterwards.
  unsafe fn new_texture_2d(
    &mut self,
    [w, h]: [u32; 2],
    pf: PixelFormat,
    sampler: &Sampler,
    texels: Option<&[u8]>,
  ) -> Result<TextureHandle, TextureError> {
    let (format, iformat, encoding) = opengl_pixel_format(pf);
    let mut handle: GLuint = 0;

    gl::GenTextures(1, &mut handle);

    let unit = self.state.texture_unit();
    let previous = self.state.bound_texture(unit);
    self.state.bind_texture(handle);

    apply_sampler_to_texture(gl::TEXTURE_2D, sampler);

    // set the pixel row alignment to the required value for uploading data according to the width
    // of the texture and the size of a single pixel
    let skip_bytes = (w as usize * pixel_bytes_len(pf)) % 8;
    set_unpack_alignment(skip_bytes);

    let data = texels.map_or(ptr::null(), |texels| texels.as_ptr() as *const c_void);
    gl::TexImage2D(
      gl::TEXTURE_2D,
      0,
      iformat as GLint,
      w as GLsizei,
      h as GLsizei,
      0,
      format,
      encoding,
      data,
    );

    if texels.is_some() && sampler.min_filter.uses_mipmaps() {
      gl::GenerateMipmap(gl::TEXTURE_2D);
    }

    let error = get_error();
    self.state.bind_texture(previous);

    match error {
      None => Ok(TextureHandle(handle)),

      Some(e) => {
        gl::DeleteTextures(1, &handle);
        Err(TextureError::Allocation(format!(
          "{}×{} {:?} texture: OpenGL error 0x{:x}",
          w, h, pf, e
        )))
      }
    }
  }
}

impl TextureBackend for GL33 {
  fn new_depth_texture(
    &mut self,
    size: [u32; 2],
    sampler: &Sampler,
  ) -> Result<TextureHandle, TextureError> {
    unsafe { self.new_texture_2d(size, PixelFormat::Depth32F, sampler, None) }
  }

  fn new_texture(
    &mut self,
    size: [u32; 2],
    format: PixelFormat,
    sampler: &Sampler,
    texels: &[u8],
  ) -> Result<TextureHandle, TextureError> {
    let expected = size[0] as usize * size[1] as usize * format.channels_len();

    if texels.len() != expected {
      // potential segfault / overflow; abort
      return Err(TextureError::TexelCount {
        expected,
        found: texels.len(),
      });
    }

    unsafe { self.new_texture_2d(size, format, sampler, Some(texels)) }
  }

  fn texture_size(&mut self, texture: TextureHandle) -> [u32; 2] {
    let mut w = 0;
    let mut h = 0;

    unsafe {
      let unit = self.state.texture_unit();
      let previous = self.state.bound_texture(unit);
      self.state.bind_texture(texture.0);

      gl::GetTexLevelParameteriv(gl::TEXTURE_2D, 0, gl::TEXTURE_WIDTH, &mut w);
      gl::GetTexLevelParameteriv(gl::TEXTURE_2D, 0, gl::TEXTURE_HEIGHT, &mut h);

      self.state.bind_texture(previous);
    }

    [w.max(0) as u32, h.max(0) as u32]
  }
}

fn apply_sampler_to_texture(target: GLenum, sampler: &Sampler) {
  unsafe {
    gl::TexParameteri(
      target,
      gl::TEXTURE_WRAP_S,
      opengl_wrap(sampler.wrap_s) as GLint,
    );
    gl::TexParameteri(
      target,
      gl::TEXTURE_WRAP_T,
      opengl_wrap(sampler.wrap_t) as GLint,
    );
    gl::TexParameteri(
      target,
      gl::TEXTURE_MIN_FILTER,
      opengl_min_filter(sampler.min_filter) as GLint,
    );
    gl::TexParameteri(
      target,
      gl::TEXTURE_MAG_FILTER,
      opengl_mag_filter(sampler.mag_filter) as GLint,
    );
    gl::TexParameterfv(
      target,
      gl::TEXTURE_BORDER_COLOR,
      sampler.border_color.as_ptr(),
    );
  }
}

fn opengl_wrap(wrap: Wrap) -> GLenum {
  match wrap {
    Wrap::ClampToEdge => gl::CLAMP_TO_EDGE,
    Wrap::ClampToBorder => gl::CLAMP_TO_BORDER,
    Wrap::Repeat => gl::REPEAT,
    Wrap::MirroredRepeat => gl::MIRRORED_REPEAT,
  }
}

fn opengl_min_filter(filter: MinFilter) -> GLenum {
  match filter {
    MinFilter::Nearest => gl::NEAREST,
    MinFilter::Linear => gl::LINEAR,
    MinFilter::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
    MinFilter::NearestMipmapLinear => gl::NEAREST_MIPMAP_LINEAR,
    MinFilter::LinearMipmapNearest => gl::LINEAR_MIPMAP_NEAREST,
    MinFilter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
  }
}

fn opengl_mag_filter(filter: MagFilter) -> GLenum {
  match filter {
    MagFilter::Nearest => gl::NEAREST,
    MagFilter::Linear => gl::LINEAR,
  }
}

// set the unpack alignment for uploading aligned texels
fn set_unpack_alignment(skip_bytes: usize) {
  let unpack_alignment = match skip_bytes {
    0 => 8,
    2 => 2,
    4 => 4,
    _ => 1,
  };

  unsafe { gl::PixelStorei(gl::UNPACK_ALIGNMENT, unpack_alignment) };
}

// first pending OpenGL error, draining the others; a lost context reports errors forever
unsafe fn get_error() -> Option<GLenum> {
  let mut first = None;

  for _ in 0..16 {
    match gl::GetError() {
      gl::NO_ERROR => break,
      e => {
        first.get_or_insert(e);
      }
    }
  }

  first
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn shadow_map_sampler_clamps_to_border() {
    assert_eq!(opengl_wrap(Wrap::ClampToBorder), gl::CLAMP_TO_BORDER);
    assert_eq!(opengl_min_filter(MinFilter::Nearest), gl::NEAREST);
    assert_eq!(opengl_mag_filter(MagFilter::Nearest), gl::NEAREST);
  }

  #[test]
  fn default_sampler_is_trilinear() {
    let sampler = Sampler::default();

    assert_eq!(opengl_wrap(sampler.wrap_s), gl::REPEAT);
    assert_eq!(
      opengl_min_filter(sampler.min_filter),
      gl::LINEAR_MIPMAP_LINEAR
    );
    assert_eq!(opengl_mag_filter(sampler.mag_filter), gl::LINEAR);
  }
}
