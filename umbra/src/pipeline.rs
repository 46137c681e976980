//! The two-pass shadow mapping pipeline.
//!
//! A frame goes through the following stages, in order:
//!
//! 1. [`FrameStage::ComputeLightTransform`]: the light-space matrix is computed from the light
//!    configuration.
//! 2. [`FrameStage::DepthPass`]: the scene is rendered with the depth program into the shadow map.
//! 3. [`FrameStage::MainPass`]: the scene is rendered from the camera into the back buffer, with
//!    the shadow map bound to [`SHADOW_MAP_UNIT`] and the diffuse texture to [`DIFFUSE_UNIT`].
//! 4. [`FrameStage::Present`]: the back buffer is swapped.
//!
//! Every binding made by the depth pass is a guard dropped before the main pass starts, so the main
//! pass always starts with the default framebuffer bound.

use log::{debug, info, trace};
use std::error;
use std::fmt;

use crate::backend::state::{ClearBuffers, StateBackend, Viewport};
use crate::backend::Backend;
use crate::binding::{FramebufferBinding, ProgramBinding, TextureUnitBinding, ViewportScope};
use crate::config::RenderConfig;
use crate::context::GraphicsContext;
use crate::framebuffer::{FramebufferError, ShadowMapTarget};
use crate::scene::{PlaceholderScene, SceneRenderer};
use crate::shader::{Program, ProgramError, StageSources};
use crate::texture::{Texture, TextureError, TextureLoader};
use crate::transform::{CameraTransform, LightTransform};

/// Texture unit the diffuse texture is bound to during the main pass.
pub const DIFFUSE_UNIT: u32 = 0;

/// Texture unit the shadow map is bound to during the main pass.
pub const SHADOW_MAP_UNIT: u32 = 1;

/// Stage of a frame.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FrameStage {
  /// Compute the light-space matrix.
  ComputeLightTransform,
  /// Render depth from the light.
  DepthPass,
  /// Render the scene from the camera.
  MainPass,
  /// Swap buffers.
  Present,
}

impl fmt::Display for FrameStage {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      FrameStage::ComputeLightTransform => f.write_str("light transform"),
      FrameStage::DepthPass => f.write_str("depth pass"),
      FrameStage::MainPass => f.write_str("main pass"),
      FrameStage::Present => f.write_str("present"),
    }
  }
}

/// Input the render loop reacts to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InputAction {
  /// Leave the render loop.
  Quit,
  /// The framebuffer of the window was resized.
  Resized {
    /// New width.
    width: u32,
    /// New height.
    height: u32,
  },
}

/// Whether the render loop should go on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LoopFeedback {
  /// Render another frame.
  Continue,
  /// Leave the loop.
  Exit,
}

/// Errors that might happen while setting up the pipeline.
///
/// Once set up, rendering a frame cannot fail.
#[non_exhaustive]
#[derive(Debug)]
pub enum RenderError {
  /// A program couldn’t be built.
  Program(ProgramError),
  /// The shadow map target couldn’t be created.
  Framebuffer(FramebufferError),
  /// The diffuse texture couldn’t be uploaded.
  Texture(TextureError),
}

impl fmt::Display for RenderError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      RenderError::Program(ref e) => write!(f, "program error: {}", e),
      RenderError::Framebuffer(ref e) => write!(f, "framebuffer error: {}", e),
      RenderError::Texture(ref e) => write!(f, "texture error: {}", e),
    }
  }
}

impl error::Error for RenderError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      RenderError::Program(e) => Some(e),
      RenderError::Framebuffer(e) => Some(e),
      RenderError::Texture(e) => Some(e),
    }
  }
}

impl From<ProgramError> for RenderError {
  fn from(e: ProgramError) -> Self {
    RenderError::Program(e)
  }
}

impl From<FramebufferError> for RenderError {
  fn from(e: FramebufferError) -> Self {
    RenderError::Framebuffer(e)
  }
}

impl From<TextureError> for RenderError {
  fn from(e: TextureError) -> Self {
    RenderError::Texture(e)
  }
}

/// Two-pass shadow mapping renderer.
///
/// Owns every GPU resource needed to render a frame. Resources live as long as the renderer’s
/// backend; they are never released.
#[derive(Debug)]
pub struct ShadowPass<S = PlaceholderScene> {
  config: RenderConfig,
  depth_program: Program,
  scene_program: Program,
  shadow_map: ShadowMapTarget,
  diffuse: Texture,
  scene: S,
  window_size: [u32; 2],
  frames: u64,
}

impl ShadowPass<PlaceholderScene> {
  /// Read the assets designated by `config`, build the programs and resources and render the
  /// placeholder scene.
  ///
  /// A diffuse texture that cannot be decoded is replaced by a placeholder; any other failure is
  /// fatal.
  pub fn bootstrap<B>(backend: &mut B, config: RenderConfig) -> Result<Self, RenderError>
  where
    B: ?Sized + Backend,
  {
    let assets = config.assets();
    info!("reading assets from {}", assets.root().display());

    let depth_sources = StageSources::from_files(
      assets.resolve(&assets.depth_vs),
      assets.resolve(&assets.depth_fs),
    )?;
    let scene_sources = StageSources::from_files(
      assets.resolve(&assets.scene_vs),
      assets.resolve(&assets.scene_fs),
    )?;

    let depth_program = Program::new(backend, "depth", &depth_sources)?;
    let scene_program = Program::new(backend, "scene", &scene_sources)?;

    let diffuse = TextureLoader::default()
      .load_or_placeholder(backend, assets.resolve(&assets.diffuse_texture))?;

    Self::new(
      backend,
      config,
      depth_program,
      scene_program,
      diffuse,
      PlaceholderScene::default(),
    )
  }
}

impl<S> ShadowPass<S>
where
  S: SceneRenderer,
{
  /// Create a renderer out of already built programs and texture.
  ///
  /// The shadow map target is allocated and depth testing is enabled.
  pub fn new<B>(
    backend: &mut B,
    config: RenderConfig,
    depth_program: Program,
    scene_program: Program,
    diffuse: Texture,
    scene: S,
  ) -> Result<Self, RenderError>
  where
    B: ?Sized + Backend,
  {
    let shadow_map = ShadowMapTarget::new(backend, config.shadow_map_size())?;
    backend.set_depth_test(true);

    let window_size = config.window_size();

    Ok(ShadowPass {
      config,
      depth_program,
      scene_program,
      shadow_map,
      diffuse,
      scene,
      window_size,
      frames: 0,
    })
  }

  /// Configuration the renderer was created with.
  pub fn config(&self) -> &RenderConfig {
    &self.config
  }

  /// The shadow map target.
  pub fn shadow_map(&self) -> &ShadowMapTarget {
    &self.shadow_map
  }

  /// The diffuse texture.
  pub fn diffuse(&self) -> &Texture {
    &self.diffuse
  }

  /// Current size of the window.
  pub fn window_size(&self) -> [u32; 2] {
    self.window_size
  }

  /// Number of frames presented so far.
  pub fn frames(&self) -> u64 {
    self.frames
  }

  /// Record a new window size and make the viewport cover it.
  pub fn resize<B>(&mut self, backend: &mut B, size: [u32; 2])
  where
    B: ?Sized + StateBackend,
  {
    debug!("resized to {}×{}", size[0], size[1]);
    self.window_size = size;
    backend.set_viewport(Viewport::whole(size));
  }

  /// Handle pending input and render a frame.
  ///
  /// If any of `actions` is [`InputAction::Quit`], nothing is rendered and
  /// [`LoopFeedback::Exit`] is returned.
  pub fn render_frame<C>(
    &mut self,
    context: &mut C,
    actions: impl IntoIterator<Item = InputAction>,
  ) -> LoopFeedback
  where
    C: GraphicsContext,
  {
    for action in actions {
      match action {
        InputAction::Quit => {
          info!("leaving after {} frame(s)", self.frames);
          return LoopFeedback::Exit;
        }

        InputAction::Resized { width, height } => self.resize(context.backend(), [width, height]),
      }
    }

    trace!("{}", FrameStage::ComputeLightTransform);
    let light = LightTransform::new(self.config.light());

    trace!("{}", FrameStage::DepthPass);
    self.depth_pass(context.backend(), &light);

    trace!("{}", FrameStage::MainPass);
    self.main_pass(context.backend(), &light);

    trace!("{}", FrameStage::Present);
    context.swap_buffers();
    self.frames += 1;

    LoopFeedback::Continue
  }

  fn depth_pass<B>(&mut self, backend: &mut B, light: &LightTransform)
  where
    B: ?Sized + Backend,
  {
    let mut viewport = ViewportScope::new(backend, self.shadow_map.viewport());
    let mut framebuffer = FramebufferBinding::new(&mut *viewport, self.shadow_map.framebuffer());
    framebuffer.clear(ClearBuffers::DEPTH);

    let mut shading = ProgramBinding::new(&mut *framebuffer, &mut self.depth_program);
    shading.set("lightSpaceMatrix", light.combined);

    self.scene.render(&mut shading);
  }

  fn main_pass<B>(&mut self, backend: &mut B, light: &LightTransform)
  where
    B: ?Sized + Backend,
  {
    backend.set_viewport(Viewport::whole(self.window_size));
    backend.clear(ClearBuffers::COLOR_DEPTH);

    let camera = CameraTransform::new(self.config.camera(), self.window_size);

    let mut shadow_map = TextureUnitBinding::new(
      backend,
      SHADOW_MAP_UNIT,
      self.shadow_map.depth_texture(),
    );
    let shadow_map_unit = shadow_map.unit();
    let mut diffuse = TextureUnitBinding::new(&mut *shadow_map, DIFFUSE_UNIT, self.diffuse.handle());
    let diffuse_unit = diffuse.unit();

    let mut shading = ProgramBinding::new(&mut *diffuse, &mut self.scene_program);
    shading.set("projection", camera.projection);
    shading.set("view", camera.view);
    shading.set("viewPos", camera.position);
    shading.set("lightPos", self.config.light().position);
    shading.set("lightSpaceMatrix", light.combined);
    shading.set("shadowMap", shadow_map_unit as i32);
    shading.set("diffuseTexture", diffuse_unit as i32);

    self.scene.render(&mut shading);
  }
}
