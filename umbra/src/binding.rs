//! Scoped bindings.
//!
//! Graphics APIs are full of global state: the bound framebuffer, the viewport, the program in use,
//! the texture bound to each texture unit. Rather than pairing bind and unbind calls by hand, umbra
//! sets such state through guards. A guard applies a binding when it is created and restores what
//! was bound before when it is dropped, whatever the way the scope is left.
//!
//! Every guard dereferences to the backend it wraps, so guards nest:
//!
//! ```ignore
//! let mut fb = FramebufferBinding::new(backend, target.framebuffer());
//! let mut vp = ViewportScope::new(&mut *fb, target.viewport());
//! vp.clear(ClearBuffers::DEPTH);
//! // vp is dropped first, then fb
//! ```

use std::ops::{Deref, DerefMut};

use crate::backend::framebuffer::FramebufferHandle;
use crate::backend::shader::{ProgramHandle, ShaderBackend};
use crate::backend::state::{StateBackend, Viewport};
use crate::backend::texture::TextureHandle;
use crate::shader::{Program, UniformValue};

/// Framebuffer bound for drawing for the lifetime of the guard.
#[derive(Debug)]
pub struct FramebufferBinding<'a, B>
where
  B: ?Sized + StateBackend,
{
  backend: &'a mut B,
  previous: FramebufferHandle,
}

impl<'a, B> FramebufferBinding<'a, B>
where
  B: ?Sized + StateBackend,
{
  /// Bind `framebuffer`.
  pub fn new(backend: &'a mut B, framebuffer: FramebufferHandle) -> Self {
    let previous = backend.bound_framebuffer();
    backend.bind_framebuffer(framebuffer);

    FramebufferBinding { backend, previous }
  }
}

impl<'a, B> Drop for FramebufferBinding<'a, B>
where
  B: ?Sized + StateBackend,
{
  fn drop(&mut self) {
    self.backend.bind_framebuffer(self.previous);
  }
}

/// Viewport set for the lifetime of the guard.
#[derive(Debug)]
pub struct ViewportScope<'a, B>
where
  B: ?Sized + StateBackend,
{
  backend: &'a mut B,
  previous: Viewport,
}

impl<'a, B> ViewportScope<'a, B>
where
  B: ?Sized + StateBackend,
{
  /// Set `viewport`.
  pub fn new(backend: &'a mut B, viewport: Viewport) -> Self {
    let previous = backend.viewport();
    backend.set_viewport(viewport);

    ViewportScope { backend, previous }
  }
}

impl<'a, B> Drop for ViewportScope<'a, B>
where
  B: ?Sized + StateBackend,
{
  fn drop(&mut self) {
    self.backend.set_viewport(self.previous);
  }
}

/// Texture bound to a texture unit for the lifetime of the guard.
#[derive(Debug)]
pub struct TextureUnitBinding<'a, B>
where
  B: ?Sized + StateBackend,
{
  backend: &'a mut B,
  unit: u32,
  previous: TextureHandle,
}

impl<'a, B> TextureUnitBinding<'a, B>
where
  B: ?Sized + StateBackend,
{
  /// Bind `texture` to `unit`.
  pub fn new(backend: &'a mut B, unit: u32, texture: TextureHandle) -> Self {
    let previous = backend.bound_texture(unit);
    backend.bind_texture(unit, texture);

    TextureUnitBinding {
      backend,
      unit,
      previous,
    }
  }

  /// Texture unit the texture is bound to.
  ///
  /// This is the value to upload to the sampler uniform reading from that texture.
  pub fn unit(&self) -> u32 {
    self.unit
  }
}

impl<'a, B> Drop for TextureUnitBinding<'a, B>
where
  B: ?Sized + StateBackend,
{
  fn drop(&mut self) {
    self.backend.bind_texture(self.unit, self.previous);
  }
}

/// Program in use for the lifetime of the guard.
///
/// This is the only way to upload uniforms, since a backend can only upload to the program in use.
#[derive(Debug)]
pub struct ProgramBinding<'a, B>
where
  B: ?Sized + StateBackend + ShaderBackend,
{
  backend: &'a mut B,
  program: &'a mut Program,
  previous: ProgramHandle,
}

impl<'a, B> ProgramBinding<'a, B>
where
  B: ?Sized + StateBackend + ShaderBackend,
{
  /// Use `program`.
  pub fn new(backend: &'a mut B, program: &'a mut Program) -> Self {
    let previous = backend.current_program();
    backend.use_program(program.handle());

    ProgramBinding {
      backend,
      program,
      previous,
    }
  }

  /// Program in use.
  pub fn program(&self) -> &Program {
    &*self.program
  }

  /// Upload a uniform.
  ///
  /// Uploading to a uniform the program doesn’t have is ignored; it is logged once per uniform.
  pub fn set(&mut self, name: &str, value: impl Into<UniformValue>) {
    let handle = self.program.handle();

    if let Err(warning) = self.backend.set_uniform(handle, name, value.into()) {
      self.program.report(name, &warning);
    }
  }
}

impl<'a, B> Drop for ProgramBinding<'a, B>
where
  B: ?Sized + StateBackend + ShaderBackend,
{
  fn drop(&mut self) {
    self.backend.use_program(self.previous);
  }
}

macro_rules! impl_deref_backend {
  ($guard:ident, $($bounds:tt)+) => {
    impl<'a, B> Deref for $guard<'a, B>
    where
      B: ?Sized + $($bounds)+,
    {
      type Target = B;

      fn deref(&self) -> &Self::Target {
        &*self.backend
      }
    }

    impl<'a, B> DerefMut for $guard<'a, B>
    where
      B: ?Sized + $($bounds)+,
    {
      fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.backend
      }
    }
  };
}

impl_deref_backend!(FramebufferBinding, StateBackend);
impl_deref_backend!(ViewportScope, StateBackend);
impl_deref_backend!(TextureUnitBinding, StateBackend);
impl_deref_backend!(ProgramBinding, StateBackend + ShaderBackend);

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::state::ClearBuffers;
  use crate::recording::{Event, RecordingBackend};
  use crate::shader::StageSources;

  #[test]
  fn framebuffer_binding_restores_previous() {
    let mut backend = RecordingBackend::default();

    {
      let mut fb = FramebufferBinding::new(&mut backend, FramebufferHandle(7));
      assert_eq!(fb.bound_framebuffer(), FramebufferHandle(7));
      fb.clear(ClearBuffers::DEPTH);
    }

    assert_eq!(backend.bound_framebuffer(), FramebufferHandle::BACK_BUFFER);
  }

  #[test]
  fn nested_guards_restore_in_reverse_order() {
    let mut backend = RecordingBackend::default();
    backend.set_viewport(Viewport::whole([800, 600]));
    backend.take_events();

    {
      let mut fb = FramebufferBinding::new(&mut backend, FramebufferHandle(7));
      let mut vp = ViewportScope::new(&mut *fb, Viewport::whole([1024, 1024]));
      vp.clear(ClearBuffers::DEPTH);
    }

    assert_eq!(
      backend.take_events(),
      vec![
        Event::BindFramebuffer(FramebufferHandle(7)),
        Event::Viewport(Viewport::whole([1024, 1024])),
        Event::Clear(ClearBuffers::DEPTH),
        Event::Viewport(Viewport::whole([800, 600])),
        Event::BindFramebuffer(FramebufferHandle::BACK_BUFFER),
      ]
    );
  }

  #[test]
  fn guards_restore_on_early_return() {
    fn bail(backend: &mut RecordingBackend) -> Result<(), ()> {
      let _fb = FramebufferBinding::new(backend, FramebufferHandle(3));
      Err(())
    }

    let mut backend = RecordingBackend::default();
    assert!(bail(&mut backend).is_err());
    assert_eq!(backend.bound_framebuffer(), FramebufferHandle::BACK_BUFFER);
  }

  #[test]
  fn texture_unit_binding_restores_previous() {
    let mut backend = RecordingBackend::default();
    backend.bind_texture(1, TextureHandle(4));

    {
      let tex = TextureUnitBinding::new(&mut backend, 1, TextureHandle(9));
      assert_eq!(tex.unit(), 1);
      assert_eq!(tex.bound_texture(1), TextureHandle(9));
    }

    assert_eq!(backend.bound_texture(1), TextureHandle(4));
  }

  #[test]
  fn program_binding_uploads_and_restores() {
    let mut backend = RecordingBackend::default();
    let sources = StageSources::new("vs", "fs");
    let mut program = Program::new(&mut backend, "scene", &sources).unwrap();
    let handle = program.handle();

    {
      let mut shading = ProgramBinding::new(&mut backend, &mut program);
      shading.set("shadowMap", 1);
      assert_eq!(shading.current_program(), handle);
    }

    assert_eq!(backend.current_program(), ProgramHandle::NONE);
    assert_eq!(
      backend.uniform(handle, "shadowMap"),
      Some(UniformValue::Int(1))
    );
  }

  #[test]
  fn inactive_uniforms_are_ignored() {
    let mut backend = RecordingBackend::default();
    let sources = StageSources::new("vs", "fs");
    let mut program = Program::new(&mut backend, "depth", &sources).unwrap();
    backend.deactivate_uniform(program.handle(), "viewPos");

    {
      let mut shading = ProgramBinding::new(&mut backend, &mut program);
      shading.set("viewPos", [0., 1.5, 5.]);
      shading.set("viewPos", [0., 1.5, 5.]);
    }

    assert!(program.has_warned("viewPos"));
    assert_eq!(backend.uniform(program.handle(), "viewPos"), None);
  }
}
