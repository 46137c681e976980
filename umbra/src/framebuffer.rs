//! Framebuffers and the shadow map render target.

use log::info;
use std::error;
use std::fmt;

use crate::backend::framebuffer::{FramebufferBackend, FramebufferHandle};
use crate::backend::state::Viewport;
use crate::backend::texture::{TextureBackend, TextureHandle};
use crate::texture::{MagFilter, MinFilter, Sampler, TextureError, Wrap};

/// Attachments found on a framebuffer.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct FramebufferAttachments {
  /// Number of color attachments.
  pub color: usize,
  /// Whether a depth attachment is present.
  pub depth: bool,
}

/// Off-screen, depth-only render target the depth pass renders into.
///
/// The depth texture is sampled with nearest filtering; coordinates outside of the texture read an
/// opaque white border, so that anything outside of the light frustum is considered lit.
///
/// A shadow map target lives as long as the program: there is no way to resize or destroy it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ShadowMapTarget {
  framebuffer: FramebufferHandle,
  depth_texture: TextureHandle,
  size: [u32; 2],
}

impl ShadowMapTarget {
  /// Sampler used for the depth texture.
  pub fn sampler() -> Sampler {
    Sampler {
      wrap_s: Wrap::ClampToBorder,
      wrap_t: Wrap::ClampToBorder,
      min_filter: MinFilter::Nearest,
      mag_filter: MagFilter::Nearest,
      border_color: [1., 1., 1., 1.],
    }
  }

  /// Allocate the depth texture and the framebuffer around it.
  pub fn new<B>(backend: &mut B, size: [u32; 2]) -> Result<Self, FramebufferError>
  where
    B: ?Sized + FramebufferBackend + TextureBackend,
  {
    let depth_texture = backend.new_depth_texture(size, &Self::sampler())?;
    let framebuffer = backend.new_depth_framebuffer(depth_texture)?;

    backend.framebuffer_status(framebuffer)?;

    let attachments = backend.framebuffer_attachments(framebuffer);
    if attachments.color != 0 {
      return Err(FramebufferError::UnexpectedColorAttachments(attachments.color));
    }

    if !attachments.depth {
      return Err(FramebufferError::Incomplete(
        IncompleteReason::MissingAttachment,
      ));
    }

    info!("shadow map target: {}×{}", size[0], size[1]);

    Ok(ShadowMapTarget {
      framebuffer,
      depth_texture,
      size,
    })
  }

  /// Framebuffer to render depth into.
  pub fn framebuffer(&self) -> FramebufferHandle {
    self.framebuffer
  }

  /// Depth texture to sample the shadow map from.
  pub fn depth_texture(&self) -> TextureHandle {
    self.depth_texture
  }

  /// Size of the shadow map.
  pub fn size(&self) -> [u32; 2] {
    self.size
  }

  /// Viewport covering the whole shadow map.
  pub fn viewport(&self) -> Viewport {
    Viewport::whole(self.size)
  }
}

/// Framebuffer error.
#[non_exhaustive]
#[derive(Debug)]
pub enum FramebufferError {
  /// Texture error.
  ///
  /// This happens while creating the depth texture.
  TextureError(TextureError),

  /// Incomplete error.
  ///
  /// This happens when finalizing the construction of the framebuffer.
  Incomplete(IncompleteReason),

  /// A depth-only framebuffer ended up with color attachments.
  UnexpectedColorAttachments(usize),
}

impl fmt::Display for FramebufferError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      FramebufferError::TextureError(ref e) => write!(f, "framebuffer texture error: {}", e),

      FramebufferError::Incomplete(ref e) => write!(f, "incomplete framebuffer: {}", e),

      FramebufferError::UnexpectedColorAttachments(n) => {
        write!(f, "depth-only framebuffer has {} color attachment(s)", n)
      }
    }
  }
}

impl error::Error for FramebufferError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      FramebufferError::TextureError(e) => Some(e),
      FramebufferError::Incomplete(e) => Some(e),
      FramebufferError::UnexpectedColorAttachments(_) => None,
    }
  }
}

impl From<TextureError> for FramebufferError {
  fn from(e: TextureError) -> Self {
    FramebufferError::TextureError(e)
  }
}

impl From<IncompleteReason> for FramebufferError {
  fn from(e: IncompleteReason) -> Self {
    FramebufferError::Incomplete(e)
  }
}

/// Reason a framebuffer is incomplete.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IncompleteReason {
  /// Incomplete framebuffer.
  Undefined,
  /// Incomplete attachment (color / depth).
  IncompleteAttachment,
  /// An attachment was missing.
  MissingAttachment,
  /// Incomplete draw buffer.
  IncompleteDrawBuffer,
  /// Incomplete read buffer.
  IncompleteReadBuffer,
  /// Unsupported.
  Unsupported,
  /// Incomplete multisample configuration.
  IncompleteMultisample,
  /// Incomplete layer targets.
  IncompleteLayerTargets,
  /// Status the backend doesn’t know about.
  Unknown(u32),
}

impl fmt::Display for IncompleteReason {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      IncompleteReason::Undefined => write!(f, "incomplete reason"),
      IncompleteReason::IncompleteAttachment => write!(f, "incomplete attachment"),
      IncompleteReason::MissingAttachment => write!(f, "missing attachment"),
      IncompleteReason::IncompleteDrawBuffer => write!(f, "incomplete draw buffer"),
      IncompleteReason::IncompleteReadBuffer => write!(f, "incomplete read buffer"),
      IncompleteReason::Unsupported => write!(f, "unsupported"),
      IncompleteReason::IncompleteMultisample => write!(f, "incomplete multisample"),
      IncompleteReason::IncompleteLayerTargets => write!(f, "incomplete layer targets"),
      IncompleteReason::Unknown(status) => write!(f, "unknown status 0x{:x}", status),
    }
  }
}

impl error::Error for IncompleteReason {}
