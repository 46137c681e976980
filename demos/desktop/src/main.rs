use glfw::{Action, Key, WindowEvent};
use log::{debug, error, info};
use std::{error::Error, path::PathBuf, process};
use structopt::StructOpt;
use umbra::config::{AssetPaths, RenderConfig};
use umbra::context::GraphicsContext as _;
use umbra::pipeline::{InputAction, LoopFeedback, ShadowPass};
use umbra_glfw::{GlfwSurface, WindowOpt};

const TITLE: &str = "Shadow Mapping + Ray Tracing";

#[derive(Debug, StructOpt)]
pub struct CLIOpts {
  #[structopt(short, long)]
  /// Directory where to pick shaders and textures from.
  ///
  /// Defaults to the assets shipped with the demo.
  assets: Option<PathBuf>,

  #[structopt(long, default_value = "800")]
  /// Initial width of the window.
  width: u32,

  #[structopt(long, default_value = "600")]
  /// Initial height of the window.
  height: u32,

  #[structopt(long, default_value = "1024")]
  /// Width and height of the shadow map.
  shadow_size: u32,

  #[structopt(long)]
  /// Leave after rendering that many frames.
  frames: Option<u64>,
}

impl CLIOpts {
  fn render_config(&self) -> RenderConfig {
    let root = self
      .assets
      .clone()
      .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"));

    RenderConfig::default()
      .set_window_size([self.width, self.height])
      .set_shadow_map_size([self.shadow_size, self.shadow_size])
      .set_assets(AssetPaths::with_root(root))
  }
}

fn run(cli_opts: CLIOpts) -> Result<(), Box<dyn Error>> {
  let config = cli_opts.render_config();

  let surface = GlfwSurface::new_gl33(TITLE, WindowOpt::default().set_size(config.window_size()))?;
  let mut context = surface.context;
  let events = surface.events_rx;

  let mut pass = ShadowPass::bootstrap(context.backend(), config)?;

  // the framebuffer might not have the size of the window (high DPI); the first frame gets the
  // actual size
  let [width, height] = context.framebuffer_size();
  let mut actions = vec![InputAction::Resized { width, height }];

  loop {
    if frame_limit_reached(cli_opts.frames, pass.frames()) {
      info!("rendered {} frame(s), leaving", pass.frames());
      break;
    }

    if context.window.get_key(Key::Escape) == Action::Press {
      debug!("escape pressed");
      actions.push(InputAction::Quit);
    }

    if pass.render_frame(&mut context, actions.drain(..)) == LoopFeedback::Exit {
      break;
    }

    context.window.glfw.poll_events();
    actions.extend(glfw::flush_messages(&events).filter_map(|(_, event)| adapt_events(event)));
  }

  Ok(())
}

fn frame_limit_reached(limit: Option<u64>, frames: u64) -> bool {
  limit.map_or(false, |n| frames >= n)
}

fn adapt_events(event: WindowEvent) -> Option<InputAction> {
  match event {
    WindowEvent::Close => Some(InputAction::Quit),

    WindowEvent::FramebufferSize(width, height) => Some(InputAction::Resized {
      width: width.max(0) as _,
      height: height.max(0) as _,
    }),

    _ => None,
  }
}

fn main() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .init();
  let cli_opts = CLIOpts::from_args();

  if let Err(e) = run(cli_opts) {
    error!("{}", e);
    process::exit(1);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_flags_is_the_default_demo() {
    let config = CLIOpts::from_iter(&["umbra-desktop"]).render_config();

    assert_eq!(config.window_size(), [800, 600]);
    assert_eq!(config.shadow_map_size(), [1024, 1024]);
    assert!(config.assets().root().ends_with("assets"));
  }

  #[test]
  fn flags_override_defaults() {
    let opts = CLIOpts::from_iter(&[
      "umbra-desktop",
      "--assets",
      "/tmp/assets",
      "--width",
      "1280",
      "--height",
      "720",
      "--shadow-size",
      "2048",
      "--frames",
      "3",
    ]);
    let config = opts.render_config();

    assert_eq!(opts.frames, Some(3));
    assert_eq!(config.window_size(), [1280, 720]);
    assert_eq!(config.shadow_map_size(), [2048, 2048]);
    assert_eq!(config.assets().root(), PathBuf::from("/tmp/assets"));
  }

  #[test]
  fn frame_limit_is_checked_before_rendering() {
    assert!(!frame_limit_reached(None, 1_000));
    assert!(frame_limit_reached(Some(0), 0));
    assert!(!frame_limit_reached(Some(3), 2));
    assert!(frame_limit_reached(Some(3), 3));
  }

  #[test]
  fn close_and_resize_events() {
    assert_eq!(adapt_events(WindowEvent::Close), Some(InputAction::Quit));
    assert_eq!(
      adapt_events(WindowEvent::FramebufferSize(1600, 1200)),
      Some(InputAction::Resized {
        width: 1600,
        height: 1200
      })
    );
    assert_eq!(adapt_events(WindowEvent::Focus(true)), None);
  }
}
