//! Graphics state.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::marker::PhantomData;

use crate::gl33::GL33;
use umbra::backend::framebuffer::FramebufferHandle;
use umbra::backend::shader::ProgramHandle;
use umbra::backend::state::{ClearBuffers, StateBackend, Viewport};
use umbra::backend::texture::TextureHandle;

// TLS synchronization barrier for `GLState`; one backend per thread.
thread_local!(static TLS_ACQUIRE_GFX_STATE: RefCell<Option<()>> = RefCell::new(Some(())));

/// Value last sent to OpenGL.
///
/// Binding the shadow map framebuffer twice in a row only reaches the driver once.
#[derive(Debug)]
struct Cached<T>(T)
where
  T: PartialEq;

impl<T> Cached<T>
where
  T: PartialEq,
{
  fn new(initial: T) -> Self {
    Cached(initial)
  }

  fn set(&mut self, value: T) {
    self.0 = value;
  }

  fn get(&self) -> &T {
    &self.0
  }

  /// Whether `new_val` must be sent to the driver.
  fn is_invalid(&self, new_val: &T) -> bool {
    self.0 != *new_val
  }
}

/// 2D textures bound to each texture unit.
///
/// Units are added on demand; a unit never seen before has no texture bound.
#[derive(Debug)]
struct TextureBindings {
  units: Vec<GLuint>,
}

impl TextureBindings {
  fn new() -> Self {
    // 48 is the platform minimal requirement
    TextureBindings { units: vec![0; 48] }
  }

  fn get(&self, unit: u32) -> GLuint {
    self.units.get(unit as usize).copied().unwrap_or(0)
  }

  /// Record `handle` as bound to `unit`; returns whether the driver must be told.
  fn update(&mut self, unit: u32, handle: GLuint) -> bool {
    let unit = unit as usize;

    if unit >= self.units.len() {
      self.units.resize(unit + 1, 0);
    }

    if self.units[unit] == handle {
      false
    } else {
      self.units[unit] = handle;
      true
    }
  }
}

/// The graphics state.
///
/// This type represents the current state of a given graphics context. It acts as a forward-gate
/// to the low-level API but adds a small cache layer over it to prevent from issuing the same API
/// call (with the same parameters).
#[derive(Debug)]
pub(crate) struct GLState {
  _a: PhantomData<*const ()>, // !Send and !Sync

  // viewport
  viewport: Cached<[GLint; 4]>,

  // depth test
  depth_test: Cached<DepthTest>,

  // texture
  current_texture_unit: Cached<u32>,
  bound_textures: TextureBindings,

  // framebuffer, bound to both the draw and read targets
  bound_framebuffer: Cached<GLuint>,

  // shader program
  current_program: Cached<GLuint>,
}

impl GLState {
  /// Create a new `GLState`.
  ///
  /// > Note: keep in mind you can create only one per thread.
  pub(crate) fn new() -> Result<Self, StateQueryError> {
    TLS_ACQUIRE_GFX_STATE.with(|rc| {
      let mut inner = rc.borrow_mut();

      match *inner {
        Some(_) => {
          inner.take();
          Self::get_from_context()
        }

        None => Err(StateQueryError::UnavailableGLState),
      }
    })
  }

  /// Get a `GLState` from the current OpenGL context.
  fn get_from_context() -> Result<Self, StateQueryError> {
    unsafe {
      let viewport = Cached::new(get_ctx_viewport());
      let depth_test = Cached::new(get_ctx_depth_test()?);
      let current_texture_unit = Cached::new(get_ctx_current_texture_unit());
      let bound_textures = TextureBindings::new();
      let bound_framebuffer = Cached::new(get_ctx_bound_framebuffer());
      let current_program = Cached::new(get_ctx_current_program());

      Ok(GLState {
        _a: PhantomData,
        viewport,
        depth_test,
        current_texture_unit,
        bound_textures,
        bound_framebuffer,
        current_program,
      })
    }
  }

  pub(crate) fn viewport(&self) -> [GLint; 4] {
    *self.viewport.get()
  }

  pub(crate) unsafe fn set_viewport(&mut self, viewport: [GLint; 4]) {
    if self.viewport.is_invalid(&viewport) {
      gl::Viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
      self.viewport.set(viewport);
    }
  }

  pub(crate) unsafe fn set_depth_test(&mut self, depth_test: DepthTest) {
    if self.depth_test.is_invalid(&depth_test) {
      match depth_test {
        DepthTest::On => gl::Enable(gl::DEPTH_TEST),
        DepthTest::Off => gl::Disable(gl::DEPTH_TEST),
      }

      self.depth_test.set(depth_test);
    }
  }

  pub(crate) fn texture_unit(&self) -> u32 {
    *self.current_texture_unit.get()
  }

  pub(crate) unsafe fn set_texture_unit(&mut self, unit: u32) {
    if self.current_texture_unit.is_invalid(&unit) {
      gl::ActiveTexture(gl::TEXTURE0 + unit as GLenum);
      self.current_texture_unit.set(unit);
    }
  }

  /// Texture bound to a unit, as far as the cache knows.
  pub(crate) fn bound_texture(&self, unit: u32) -> GLuint {
    self.bound_textures.get(unit)
  }

  /// Bind a 2D texture to the current texture unit.
  pub(crate) unsafe fn bind_texture(&mut self, handle: GLuint) {
    let unit = self.texture_unit();

    if self.bound_textures.update(unit, handle) {
      gl::BindTexture(gl::TEXTURE_2D, handle);
    }
  }

  pub(crate) fn bound_framebuffer(&self) -> GLuint {
    *self.bound_framebuffer.get()
  }

  pub(crate) unsafe fn bind_framebuffer(&mut self, handle: GLuint) {
    if self.bound_framebuffer.is_invalid(&handle) {
      gl::BindFramebuffer(gl::FRAMEBUFFER, handle);
      self.bound_framebuffer.set(handle);
    }
  }

  pub(crate) fn current_program(&self) -> GLuint {
    *self.current_program.get()
  }

  pub(crate) unsafe fn use_program(&mut self, handle: GLuint) {
    if self.current_program.is_invalid(&handle) {
      gl::UseProgram(handle);
      self.current_program.set(handle);
    }
  }
}

/// An error that might happen when the context is queried.
#[non_exhaustive]
#[derive(Debug)]
pub enum StateQueryError {
  /// The graphics state is unavailable.
  ///
  /// A backend was already created on the current thread.
  UnavailableGLState,
  /// Corrupted depth test state.
  UnknownDepthTestState(GLboolean),
}

impl fmt::Display for StateQueryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StateQueryError::UnavailableGLState => write!(f, "unavailable graphics state"),
      StateQueryError::UnknownDepthTestState(ref s) => write!(f, "unknown depth test state: {}", s),
    }
  }
}

impl error::Error for StateQueryError {}

unsafe fn get_ctx_viewport() -> [GLint; 4] {
  let mut data = [0; 4];
  gl::GetIntegerv(gl::VIEWPORT, data.as_mut_ptr());
  data
}

unsafe fn get_ctx_depth_test() -> Result<DepthTest, StateQueryError> {
  let state = gl::IsEnabled(gl::DEPTH_TEST);

  match state {
    gl::TRUE => Ok(DepthTest::On),
    gl::FALSE => Ok(DepthTest::Off),
    _ => Err(StateQueryError::UnknownDepthTestState(state)),
  }
}

unsafe fn get_ctx_current_texture_unit() -> u32 {
  let mut active_texture = gl::TEXTURE0 as GLint;
  gl::GetIntegerv(gl::ACTIVE_TEXTURE, &mut active_texture);
  (active_texture as GLenum).saturating_sub(gl::TEXTURE0)
}

unsafe fn get_ctx_bound_framebuffer() -> GLuint {
  let mut bound = 0 as GLint;
  gl::GetIntegerv(gl::DRAW_FRAMEBUFFER_BINDING, &mut bound);
  bound as GLuint
}

unsafe fn get_ctx_current_program() -> GLuint {
  let mut used = 0 as GLint;
  gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut used);
  used as GLuint
}

/// Whether or not depth test should be enabled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum DepthTest {
  /// The depth test is enabled.
  On,
  /// The depth test is disabled.
  Off,
}

impl StateBackend for GL33 {
  fn viewport(&self) -> Viewport {
    let [x, y, w, h] = self.state.viewport();

    Viewport {
      x,
      y,
      width: w.max(0) as u32,
      height: h.max(0) as u32,
    }
  }

  fn set_viewport(&mut self, viewport: Viewport) {
    unsafe {
      self.state.set_viewport([
        viewport.x,
        viewport.y,
        viewport.width as GLint,
        viewport.height as GLint,
      ])
    }
  }

  fn bound_framebuffer(&self) -> FramebufferHandle {
    FramebufferHandle(self.state.bound_framebuffer())
  }

  fn bind_framebuffer(&mut self, framebuffer: FramebufferHandle) {
    unsafe { self.state.bind_framebuffer(framebuffer.0) }
  }

  fn current_program(&self) -> ProgramHandle {
    ProgramHandle(self.state.current_program())
  }

  fn use_program(&mut self, program: ProgramHandle) {
    unsafe { self.state.use_program(program.0) }
  }

  fn bound_texture(&self, unit: u32) -> TextureHandle {
    TextureHandle(self.state.bound_texture(unit))
  }

  fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
    unsafe {
      self.state.set_texture_unit(unit);
      self.state.bind_texture(texture.0);
    }
  }

  fn set_depth_test(&mut self, enabled: bool) {
    let depth_test = if enabled {
      DepthTest::On
    } else {
      DepthTest::Off
    };

    unsafe { self.state.set_depth_test(depth_test) }
  }

  fn clear(&mut self, buffers: ClearBuffers) {
    let mut bits = 0;

    if buffers.color {
      bits |= gl::COLOR_BUFFER_BIT;
    }

    if buffers.depth {
      bits |= gl::DEPTH_BUFFER_BIT;
    }

    if bits != 0 {
      unsafe { gl::Clear(bits) };
    }
  }
}
