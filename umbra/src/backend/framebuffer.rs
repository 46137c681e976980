//! Framebuffer backend interface.

use crate::backend::texture::TextureHandle;
use crate::framebuffer::{FramebufferAttachments, FramebufferError, IncompleteReason};

/// Handle to a framebuffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FramebufferHandle(pub u32);

impl FramebufferHandle {
  /// The default framebuffer, the one presented to the window.
  pub const BACK_BUFFER: Self = FramebufferHandle(0);
}

/// Framebuffer creation and queries.
pub trait FramebufferBackend {
  /// Create a framebuffer which only attachment is `depth`, as depth attachment.
  ///
  /// Color drawing and reading must be disabled on the returned framebuffer, and its completeness
  /// must have been checked. The currently bound framebuffer is left untouched.
  fn new_depth_framebuffer(
    &mut self,
    depth: TextureHandle,
  ) -> Result<FramebufferHandle, FramebufferError>;

  /// Completeness status of a framebuffer.
  fn framebuffer_status(&mut self, framebuffer: FramebufferHandle) -> Result<(), IncompleteReason>;

  /// Attachments of a framebuffer.
  fn framebuffer_attachments(&mut self, framebuffer: FramebufferHandle) -> FramebufferAttachments;
}
