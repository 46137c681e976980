//! Render a handful of frames of the shadow mapping demo with its shipped assets, then leave.
//!
//! Nothing is checked on the pixels; run it in a tool such as apitrace or renderdoc to inspect the
//! depth pass and the main pass.

use std::path::PathBuf;
use umbra::config::{AssetPaths, RenderConfig};
use umbra::context::GraphicsContext as _;
use umbra::pipeline::{InputAction, LoopFeedback, ShadowPass};
use umbra_glfw::{GlfwSurface, WindowOpt};

const FRAMES: u64 = 10;

pub fn fixture() {
  let assets = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/desktop/assets");
  let config = RenderConfig::default().set_assets(AssetPaths::with_root(assets));

  let surface = GlfwSurface::new_gl33(
    "shadow-pass-frames",
    WindowOpt::default().set_size(config.window_size()),
  )
  .expect("GLFW surface");
  let mut context = surface.context;

  let mut pass = ShadowPass::bootstrap(context.backend(), config).expect("shadow pass");

  let [width, height] = context.framebuffer_size();
  let feedback = pass.render_frame(&mut context, vec![InputAction::Resized { width, height }]);
  assert_eq!(feedback, LoopFeedback::Continue);

  while pass.frames() < FRAMES {
    context.window.glfw.poll_events();
    assert_eq!(pass.render_frame(&mut context, None::<InputAction>), LoopFeedback::Continue);
  }

  assert_eq!(
    pass.render_frame(&mut context, Some(InputAction::Quit)),
    LoopFeedback::Exit
  );
  assert_eq!(pass.frames(), FRAMES);
}
