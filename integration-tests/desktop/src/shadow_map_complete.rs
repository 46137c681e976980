//! Allocate a shadow map target on a real OpenGL 3.3 context and check that the driver considers
//! it complete, with a depth attachment and no color attachment.
//!
//! The framebuffer bound before the allocation must still be bound afterwards.

use umbra::backend::framebuffer::{FramebufferBackend as _, FramebufferHandle};
use umbra::backend::state::StateBackend as _;
use umbra::backend::texture::TextureBackend as _;
use umbra::context::GraphicsContext as _;
use umbra::framebuffer::{FramebufferAttachments, ShadowMapTarget};
use umbra_glfw::{GlfwSurface, WindowOpt};

pub fn fixture() {
  let surface = GlfwSurface::new_gl33("shadow-map-complete", WindowOpt::default())
    .expect("GLFW surface");
  let mut context = surface.context;
  let backend = context.backend();

  let target = ShadowMapTarget::new(backend, [1024, 1024]).expect("shadow map target");

  assert_eq!(backend.bound_framebuffer(), FramebufferHandle::BACK_BUFFER);
  assert_eq!(backend.framebuffer_status(target.framebuffer()), Ok(()));
  assert_eq!(
    backend.framebuffer_attachments(target.framebuffer()),
    FramebufferAttachments {
      color: 0,
      depth: true
    }
  );
  assert_eq!(backend.texture_size(target.depth_texture()), [1024, 1024]);

  // a second target must not disturb the first one
  let other = ShadowMapTarget::new(backend, [256, 512]).expect("second shadow map target");

  assert_ne!(other.framebuffer(), target.framebuffer());
  assert_eq!(backend.texture_size(other.depth_texture()), [256, 512]);
  assert_eq!(backend.framebuffer_status(target.framebuffer()), Ok(()));

  println!("shadow map targets are complete");
}
