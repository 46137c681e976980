//! 2D textures and texture loading.
//!
//! Textures are created through a [`TextureBackend`] and described by a [`Texture`]. Loading an
//! image from disk is done with [`TextureLoader`], which decodes the image on the CPU, picks a
//! [`PixelFormat`] from its channel count and uploads it with a [`Sampler`].

use image::{DynamicImage, ImageError};
use log::{info, warn};
use std::error;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::backend::texture::{TextureBackend, TextureHandle};

/// How to wrap texture coordinates while sampling textures?
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Wrap {
  /// Coordinates outside of *[0;1]* are clamped to the edge texels.
  ClampToEdge,
  /// Coordinates outside of *[0;1]* sample the border color of the [`Sampler`].
  ClampToBorder,
  /// Coordinates are repeated if they lay outside of *[0;1]*.
  Repeat,
  /// Same as `Repeat` but it will alternatively repeat between *[0;1]* and *[1;0]*.
  MirroredRepeat,
}

/// Minification filter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MinFilter {
  /// Nearest interpolation.
  Nearest,
  /// Linear interpolation between surrounding pixels.
  Linear,
  /// Nearest mipmap, nearest interpolation.
  NearestMipmapNearest,
  /// Linear interpolation between the two nearest mipmaps, nearest interpolation in each.
  NearestMipmapLinear,
  /// Nearest mipmap, linear interpolation.
  LinearMipmapNearest,
  /// Linear interpolation between the two nearest mipmaps, linear interpolation in each
  /// (trilinear filtering).
  LinearMipmapLinear,
}

impl MinFilter {
  /// Whether this filter samples mipmaps.
  pub fn uses_mipmaps(self) -> bool {
    !matches!(self, MinFilter::Nearest | MinFilter::Linear)
  }
}

/// Magnification filter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MagFilter {
  /// Nearest interpolation.
  Nearest,
  /// Linear interpolation between surrounding pixels.
  Linear,
}

/// A sampler describes how a texture is read from shaders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sampler {
  /// How to wrap the *s* coordinate.
  pub wrap_s: Wrap,
  /// How to wrap the *t* coordinate.
  pub wrap_t: Wrap,
  /// Minification filter.
  pub min_filter: MinFilter,
  /// Magnification filter.
  pub mag_filter: MagFilter,
  /// Color read when sampling outside of a [`Wrap::ClampToBorder`] texture.
  pub border_color: [f32; 4],
}

impl Default for Sampler {
  /// Repeat wrapping, trilinear minification and linear magnification.
  fn default() -> Self {
    Sampler {
      wrap_s: Wrap::Repeat,
      wrap_t: Wrap::Repeat,
      min_filter: MinFilter::LinearMipmapLinear,
      mag_filter: MagFilter::Linear,
      border_color: [0., 0., 0., 0.],
    }
  }
}

/// Format of the texels of a texture.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PixelFormat {
  /// Single red channel, 8 bits.
  R8,
  /// RGB, 8 bits per channel.
  RGB8,
  /// RGBA, 8 bits per channel.
  RGBA8,
  /// Floating-point depth.
  Depth32F,
}

impl PixelFormat {
  /// Number of channels.
  pub fn channels_len(self) -> usize {
    match self {
      PixelFormat::R8 | PixelFormat::Depth32F => 1,
      PixelFormat::RGB8 => 3,
      PixelFormat::RGBA8 => 4,
    }
  }
}

/// A 2D texture living on the GPU.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Texture {
  handle: TextureHandle,
  size: [u32; 2],
  format: PixelFormat,
}

impl Texture {
  /// Describe an already allocated texture.
  pub fn new(handle: TextureHandle, size: [u32; 2], format: PixelFormat) -> Self {
    Texture {
      handle,
      size,
      format,
    }
  }

  /// Backend handle.
  pub fn handle(&self) -> TextureHandle {
    self.handle
  }

  /// Size of the texture, in texels.
  pub fn size(&self) -> [u32; 2] {
    self.size
  }

  /// Texel format.
  pub fn format(&self) -> PixelFormat {
    self.format
  }
}

/// Errors that might happen when creating textures.
#[non_exhaustive]
#[derive(Debug)]
pub enum TextureError {
  /// The image couldn’t be decoded.
  Decode {
    /// Path to the image.
    path: PathBuf,
    /// Decoder error.
    source: ImageError,
  },

  /// The number of texels doesn’t match the size and format of the texture.
  TexelCount {
    /// Expected number of bytes.
    expected: usize,
    /// Provided number of bytes.
    found: usize,
  },

  /// The backend refused to allocate the texture. Contains the backend’s reason.
  Allocation(String),
}

impl fmt::Display for TextureError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      TextureError::Decode {
        ref path,
        ref source,
      } => write!(f, "cannot decode {}: {}", path.display(), source),

      TextureError::TexelCount { expected, found } => write!(
        f,
        "wrong texel count: expected {} bytes, found {}",
        expected, found
      ),

      TextureError::Allocation(ref reason) => write!(f, "cannot allocate texture: {}", reason),
    }
  }
}

impl error::Error for TextureError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      TextureError::Decode { source, .. } => Some(source),
      _ => None,
    }
  }
}

/// An image decoded on the CPU, ready to be uploaded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedImage {
  /// Width and height, in texels.
  pub size: [u32; 2],
  /// Texel format.
  pub format: PixelFormat,
  /// Tightly packed texels, row by row, starting with the first row of the file.
  pub texels: Vec<u8>,
}

impl DecodedImage {
  /// Convert a decoded image.
  ///
  /// One channel images stay single-channel, three channels images are RGB and four channels
  /// images are RGBA. Anything else (luma + alpha, 16-bit images, …) is converted to RGBA.
  pub fn from_dynamic(img: DynamicImage) -> Self {
    match img.color().channel_count() {
      1 => {
        let img = img.to_luma8();
        DecodedImage {
          size: [img.width(), img.height()],
          format: PixelFormat::R8,
          texels: img.into_raw(),
        }
      }

      3 => {
        let img = img.to_rgb8();
        DecodedImage {
          size: [img.width(), img.height()],
          format: PixelFormat::RGB8,
          texels: img.into_raw(),
        }
      }

      _ => {
        let img = img.to_rgba8();
        DecodedImage {
          size: [img.width(), img.height()],
          format: PixelFormat::RGBA8,
          texels: img.into_raw(),
        }
      }
    }
  }
}

/// Loads images from disk into textures.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextureLoader {
  sampler: Sampler,
}

impl TextureLoader {
  /// Texel of the placeholder texture: opaque white.
  pub const PLACEHOLDER_TEXEL: [u8; 4] = [255, 255, 255, 255];

  /// Loader using the given sampler.
  pub fn new(sampler: Sampler) -> Self {
    TextureLoader { sampler }
  }

  /// Sampler applied to loaded textures.
  pub fn sampler(&self) -> &Sampler {
    &self.sampler
  }

  /// Decode an image file without touching the GPU.
  pub fn decode(path: impl AsRef<Path>) -> Result<DecodedImage, TextureError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| TextureError::Decode {
      path: path.to_owned(),
      source,
    })?;

    Ok(DecodedImage::from_dynamic(img))
  }

  /// Create a texture from an already decoded image.
  pub fn upload<B>(&self, backend: &mut B, img: &DecodedImage) -> Result<Texture, TextureError>
  where
    B: ?Sized + TextureBackend,
  {
    let handle = backend.new_texture(img.size, img.format, &self.sampler, &img.texels)?;
    Ok(Texture::new(handle, img.size, img.format))
  }

  /// Decode an image file and upload it.
  pub fn load<B>(&self, backend: &mut B, path: impl AsRef<Path>) -> Result<Texture, TextureError>
  where
    B: ?Sized + TextureBackend,
  {
    let path = path.as_ref();
    let img = Self::decode(path)?;
    let texture = self.upload(backend, &img)?;

    info!(
      "loaded {} ({}×{}, {:?})",
      path.display(),
      img.size[0],
      img.size[1],
      img.format
    );

    Ok(texture)
  }

  /// Decode an image file and upload it, falling back to a 1×1 opaque white RGBA texture if the
  /// image cannot be decoded.
  ///
  /// Backend errors are still reported.
  pub fn load_or_placeholder<B>(
    &self,
    backend: &mut B,
    path: impl AsRef<Path>,
  ) -> Result<Texture, TextureError>
  where
    B: ?Sized + TextureBackend,
  {
    match self.load(backend, path) {
      Err(e @ TextureError::Decode { .. }) => {
        warn!("{}; using a placeholder texture", e);
        self.placeholder(backend)
      }

      r => r,
    }
  }

  /// Create the placeholder texture.
  pub fn placeholder<B>(&self, backend: &mut B) -> Result<Texture, TextureError>
  where
    B: ?Sized + TextureBackend,
  {
    let img = DecodedImage {
      size: [1, 1],
      format: PixelFormat::RGBA8,
      texels: Self::PLACEHOLDER_TEXEL.to_vec(),
    };

    self.upload(backend, &img)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::recording::{Event, RecordingBackend};
  use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
  use std::env;
  use std::fs;

  fn temp_path(name: &str) -> PathBuf {
    env::temp_dir().join(format!("umbra-{}-{}", std::process::id(), name))
  }

  #[test]
  fn rgba_png_keeps_dimensions_and_format() {
    let path = temp_path("rgba.png");
    RgbaImage::from_pixel(7, 3, Rgba([10, 20, 30, 40]))
      .save(&path)
      .unwrap();

    let mut backend = RecordingBackend::default();
    let texture = TextureLoader::default().load(&mut backend, &path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(texture.size(), [7, 3]);
    assert_eq!(texture.format(), PixelFormat::RGBA8);
    assert_eq!(backend.texture_size(texture.handle()), [7, 3]);

    let uploads: Vec<_> = backend
      .events()
      .iter()
      .filter_map(|e| match e {
        Event::NewTexture {
          size,
          format,
          sampler,
          len,
          ..
        } => Some((*size, *format, *sampler, *len)),
        _ => None,
      })
      .collect();
    assert_eq!(
      uploads,
      vec![([7, 3], PixelFormat::RGBA8, Sampler::default(), 7 * 3 * 4)]
    );
  }

  #[test]
  fn single_channel_png_is_red() {
    let path = temp_path("luma.png");
    GrayImage::from_pixel(4, 4, Luma([128])).save(&path).unwrap();

    let img = TextureLoader::decode(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(img.format, PixelFormat::R8);
    assert_eq!(img.texels.len(), 16);
  }

  #[test]
  fn single_rgb_png_is_rgb8() {
    let path = temp_path("rgb.png");
    RgbImage::from_pixel(5, 3, Rgb([200, 100, 50]))
      .save(&path)
      .unwrap();

    let img = TextureLoader::decode(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(img.size, [5, 3]);
    assert_eq!(img.format, PixelFormat::RGB8);
    assert_eq!(img.texels.len(), 5 * 3 * 3);
    assert_eq!(&img.texels[..3], &[200, 100, 50]);

    let mut backend = RecordingBackend::default();
    let texture = TextureLoader::default().upload(&mut backend, &img).unwrap();
    assert_eq!(texture.format(), PixelFormat::RGB8);
    assert_eq!(backend.texture_size(texture.handle()), [5, 3]);
  }

  #[test]
  fn luma_alpha_is_converted_to_rgba() {
    let img = DynamicImage::new_luma_a8(2, 2);
    let decoded = DecodedImage::from_dynamic(img);

    assert_eq!(decoded.format, PixelFormat::RGBA8);
    assert_eq!(decoded.texels.len(), 2 * 2 * 4);
  }

  #[test]
  fn missing_file_fails_to_load() {
    let mut backend = RecordingBackend::default();
    let err = TextureLoader::default()
      .load(&mut backend, "resources/textures/missing.png")
      .unwrap_err();

    assert!(matches!(err, TextureError::Decode { .. }));
    assert!(backend.events().is_empty());
  }

  #[test]
  fn missing_file_falls_back_to_placeholder() {
    let mut backend = RecordingBackend::default();
    let texture = TextureLoader::default()
      .load_or_placeholder(&mut backend, "resources/textures/missing.png")
      .unwrap();

    assert_eq!(texture.size(), [1, 1]);
    assert_eq!(texture.format(), PixelFormat::RGBA8);
    assert_ne!(texture.handle(), TextureHandle::NONE);
  }

  #[test]
  fn trilinear_filtering_uses_mipmaps() {
    assert!(Sampler::default().min_filter.uses_mipmaps());
    assert!(!MinFilter::Nearest.uses_mipmaps());
  }
}
