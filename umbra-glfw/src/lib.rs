//! [GLFW](https://crates.io/crates/glfw) backend for umbra.
//!
//! [`GlfwSurface::new_gl33`] opens a window with an OpenGL 3.3 core, forward-compatible context,
//! makes it current, loads the OpenGL function pointers and creates the [`GL33`] backend on top of
//! it.

#![deny(missing_docs)]

use glfw::{self, Context as _, Glfw, InitError, Window, WindowEvent, WindowMode};
use std::{error, fmt, os::raw::c_void, sync::mpsc::Receiver};
use umbra::context::GraphicsContext;
pub use umbra_gl::gl33::StateQueryError;
use umbra_gl::GL33;

/// Different window options.
///
/// Feel free to look at the different methods available to tweak the options. You may want to start
/// with `default()` though.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WindowOpt {
  size: [u32; 2],
  num_samples: Option<u32>,
}

impl Default for WindowOpt {
  /// Defaults:
  ///
  /// - `size` set to 800×600.
  /// - `num_samples` set to `None`.
  fn default() -> Self {
    WindowOpt {
      size: [800, 600],
      num_samples: None,
    }
  }
}

impl WindowOpt {
  /// Set the size of the window, in screen coordinates.
  #[inline]
  pub fn set_size(self, size: [u32; 2]) -> Self {
    WindowOpt { size, ..self }
  }

  /// Get the size of the window.
  #[inline]
  pub fn size(&self) -> [u32; 2] {
    self.size
  }

  /// Set the number of samples to use for multisampling.
  ///
  /// Pass `None` to disable multisampling.
  #[inline]
  pub fn set_num_samples<S>(self, samples: S) -> Self
  where
    S: Into<Option<u32>>,
  {
    WindowOpt {
      num_samples: samples.into(),
      ..self
    }
  }

  /// Get the number of samples to use in multisampling, if any.
  #[inline]
  pub fn num_samples(&self) -> Option<u32> {
    self.num_samples
  }
}

/// Error that can be risen while creating a surface.
#[non_exhaustive]
#[derive(Debug)]
pub enum GlfwSurfaceError {
  /// Initialization of the surface went wrong.
  ///
  /// This variant exposes a **glfw** error for further information about what went wrong.
  InitError(InitError),

  /// Window creation failed.
  WindowCreationFailed,

  /// The graphics state is not available.
  ///
  /// This error is generated when the initialization code is called on a thread on which the
  /// graphics state has already been acquired.
  GraphicsStateError(StateQueryError),
}

impl fmt::Display for GlfwSurfaceError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      GlfwSurfaceError::InitError(ref e) => write!(f, "initialization error: {}", e),
      GlfwSurfaceError::WindowCreationFailed => f.write_str("failed to create window"),
      GlfwSurfaceError::GraphicsStateError(ref e) => {
        write!(f, "failed to get graphics state: {}", e)
      }
    }
  }
}

impl From<InitError> for GlfwSurfaceError {
  fn from(e: InitError) -> Self {
    GlfwSurfaceError::InitError(e)
  }
}

impl error::Error for GlfwSurfaceError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      GlfwSurfaceError::InitError(e) => Some(e),
      GlfwSurfaceError::WindowCreationFailed => None,
      GlfwSurfaceError::GraphicsStateError(e) => Some(e),
    }
  }
}

/// GLFW surface.
///
/// This type is a helper that exposes two important concepts: the GLFW event receiver that you can
/// use it with to poll events and the [`GL33Context`], which allows you to perform the rendering
/// part.
#[derive(Debug)]
pub struct GlfwSurface {
  /// Wrapped GLFW events queue.
  pub events_rx: Receiver<(f64, WindowEvent)>,

  /// Wrapped umbra context.
  pub context: GL33Context,
}

impl GlfwSurface {
  /// Initialize GLFW to provide an umbra environment.
  ///
  /// `create_window` is handed the initialized GLFW instance, with the OpenGL hints already set.
  /// It must create the window and make its context current.
  pub fn new(
    create_window: impl FnOnce(
      &mut Glfw,
    ) -> Result<(Window, Receiver<(f64, WindowEvent)>), GlfwSurfaceError>,
  ) -> Result<Self, GlfwSurfaceError> {
    #[cfg(feature = "log-errors")]
    let error_cbk = glfw::LOG_ERRORS;
    #[cfg(not(feature = "log-errors"))]
    let error_cbk = glfw::FAIL_ON_ERRORS;

    let mut glfw = glfw::init(error_cbk)?;

    // OpenGL hints
    glfw.window_hint(glfw::WindowHint::OpenGlProfile(
      glfw::OpenGlProfileHint::Core,
    ));
    glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
    glfw.window_hint(glfw::WindowHint::ContextVersionMajor(3));
    glfw.window_hint(glfw::WindowHint::ContextVersionMinor(3));

    let (mut window, events_rx) = create_window(&mut glfw)?;

    // init OpenGL
    gl::load_with(|s| window.get_proc_address(s) as *const c_void);

    let gl = GL33::new().map_err(GlfwSurfaceError::GraphicsStateError)?;
    let context = GL33Context { window, gl };
    let surface = GlfwSurface { events_rx, context };

    Ok(surface)
  }

  /// Create a windowed surface with an OpenGL 3.3 context.
  ///
  /// Framebuffer size, key and close events are polled.
  pub fn new_gl33(title: &str, win_opt: WindowOpt) -> Result<Self, GlfwSurfaceError> {
    GlfwSurface::new(|glfw| {
      glfw.window_hint(glfw::WindowHint::Samples(win_opt.num_samples()));

      let [width, height] = win_opt.size();
      let (mut window, events_rx) = glfw
        .create_window(width, height, title, WindowMode::Windowed)
        .ok_or(GlfwSurfaceError::WindowCreationFailed)?;

      window.make_current();
      window.set_framebuffer_size_polling(true);
      window.set_key_polling(true);
      window.set_close_polling(true);
      glfw.set_swap_interval(glfw::SwapInterval::Sync(1));

      Ok((window, events_rx))
    })
  }
}

/// umbra OpenGL 3.3 context.
///
/// This type also re-exports the GLFW window, if you need access to it.
#[derive(Debug)]
pub struct GL33Context {
  /// Wrapped GLFW window.
  pub window: Window,

  /// OpenGL 3.3 state.
  gl: GL33,
}

impl GraphicsContext for GL33Context {
  type Backend = GL33;

  fn backend(&mut self) -> &mut Self::Backend {
    &mut self.gl
  }

  fn framebuffer_size(&self) -> [u32; 2] {
    let (w, h) = self.window.get_framebuffer_size();
    [w.max(0) as u32, h.max(0) as u32]
  }

  fn swap_buffers(&mut self) {
    self.window.swap_buffers();
  }
}
