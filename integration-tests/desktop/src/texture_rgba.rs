//! Upload textures of odd widths in every color format and read their base level back, checking
//! that rows are not skewed by the unpack alignment. The shipped diffuse texture is then decoded
//! and uploaded through the loader.

use std::os::raw::c_void;
use std::path::PathBuf;
use umbra::backend::state::StateBackend as _;
use umbra::backend::texture::{TextureBackend as _, TextureHandle};
use umbra::context::GraphicsContext as _;
use umbra::texture::{DecodedImage, PixelFormat, Sampler, TextureLoader};
use umbra_gl::GL33;
use umbra_glfw::{GlfwSurface, WindowOpt};

// read the base level of a texture, tightly packed
fn read_texels(backend: &mut GL33, texture: TextureHandle, format: PixelFormat) -> Vec<u8> {
  let (gl_format, len) = match format {
    PixelFormat::R8 => (gl::RED, 1),
    PixelFormat::RGB8 => (gl::RGB, 3),
    PixelFormat::RGBA8 => (gl::RGBA, 4),
    PixelFormat::Depth32F => panic!("depth textures are not read back"),
  };

  let [w, h] = backend.texture_size(texture);
  let mut texels = vec![0u8; w as usize * h as usize * len];

  backend.bind_texture(0, texture);

  unsafe {
    gl::PixelStorei(gl::PACK_ALIGNMENT, 1);
    gl::GetTexImage(
      gl::TEXTURE_2D,
      0,
      gl_format,
      gl::UNSIGNED_BYTE,
      texels.as_mut_ptr() as *mut c_void,
    );
  }

  backend.bind_texture(0, TextureHandle::NONE);
  texels
}

pub fn fixture() {
  let surface =
    GlfwSurface::new_gl33("texture-rgba", WindowOpt::default()).expect("GLFW surface");
  let mut context = surface.context;
  let backend = context.backend();
  let loader = TextureLoader::new(Sampler::default());

  for &format in &[PixelFormat::R8, PixelFormat::RGB8, PixelFormat::RGBA8] {
    let size = [7, 3];
    let len = 7 * 3 * format.channels_len();
    let img = DecodedImage {
      size,
      format,
      // every texel differs, so a skewed row shows up
      texels: (0..len).map(|i| i as u8).collect(),
    };

    let texture = loader.upload(backend, &img).expect("texture upload");

    assert_ne!(texture.handle(), TextureHandle::NONE);
    assert_eq!(texture.format(), format);
    assert_eq!(backend.texture_size(texture.handle()), size);
    assert_eq!(read_texels(backend, texture.handle(), format), img.texels);

    println!("{:?} texture uploaded", format);
  }

  let placeholder = loader.placeholder(backend).expect("placeholder texture");
  assert_eq!(backend.texture_size(placeholder.handle()), [1, 1]);
  assert_eq!(
    read_texels(backend, placeholder.handle(), PixelFormat::RGBA8),
    TextureLoader::PLACEHOLDER_TEXEL.to_vec()
  );

  // wrong texel count never reaches the driver
  assert!(backend
    .new_texture([4, 4], PixelFormat::RGBA8, &Sampler::default(), &[0; 4])
    .is_err());

  let wood = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("../../demos/desktop/assets/resources/textures/wood.png");
  let texture = loader.load(backend, &wood).expect("wood texture");

  assert_eq!(texture.size(), [64, 64]);
  assert_eq!(texture.format(), PixelFormat::RGB8);
  assert_eq!(backend.texture_size(texture.handle()), [64, 64]);
}
