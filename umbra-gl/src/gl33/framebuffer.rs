use gl::types::*;

use crate::gl33::GL33;
use umbra::backend::framebuffer::{FramebufferBackend, FramebufferHandle};
use umbra::backend::texture::TextureHandle;
use umbra::framebuffer::{FramebufferAttachments, FramebufferError, IncompleteReason};

impl GL33 {
  // Run `f` with `framebuffer` bound, then bind back whatever was bound before.
  unsafe fn with_framebuffer<F, R>(&mut self, framebuffer: GLuint, f: F) -> R
  where
    F: FnOnce() -> R,
  {
    let previous = self.state.bound_framebuffer();
    self.state.bind_framebuffer(framebuffer);

    let r = f();

    self.state.bind_framebuffer(previous);
    r
  }
}

impl FramebufferBackend for GL33 {
  fn new_depth_framebuffer(
    &mut self,
    depth: TextureHandle,
  ) -> Result<FramebufferHandle, FramebufferError> {
    let mut handle: GLuint = 0;

    unsafe {
      gl::GenFramebuffers(1, &mut handle);

      let status = self.with_framebuffer(handle, || {
        gl::FramebufferTexture2D(
          gl::FRAMEBUFFER,
          gl::DEPTH_ATTACHMENT,
          gl::TEXTURE_2D,
          depth.0,
          0,
        );

        // no color buffer is drawn to nor read from
        gl::DrawBuffer(gl::NONE);
        gl::ReadBuffer(gl::NONE);

        get_framebuffer_status()
      });

      if let Err(reason) = status {
        gl::DeleteFramebuffers(1, &handle);
        return Err(reason.into());
      }
    }

    Ok(FramebufferHandle(handle))
  }

  fn framebuffer_status(&mut self, framebuffer: FramebufferHandle) -> Result<(), IncompleteReason> {
    unsafe { self.with_framebuffer(framebuffer.0, get_framebuffer_status) }
  }

  fn framebuffer_attachments(&mut self, framebuffer: FramebufferHandle) -> FramebufferAttachments {
    unsafe {
      self.with_framebuffer(framebuffer.0, || {
        let mut max_color_attachments: GLint = 0;
        gl::GetIntegerv(gl::MAX_COLOR_ATTACHMENTS, &mut max_color_attachments);

        let color = (0..max_color_attachments.max(0) as GLenum)
          .filter(|&i| has_attachment(gl::COLOR_ATTACHMENT0 + i))
          .count();

        FramebufferAttachments {
          color,
          depth: has_attachment(gl::DEPTH_ATTACHMENT),
        }
      })
    }
  }
}

fn has_attachment(attachment: GLenum) -> bool {
  let mut ty = gl::NONE as GLint;

  unsafe {
    gl::GetFramebufferAttachmentParameteriv(
      gl::FRAMEBUFFER,
      attachment,
      gl::FRAMEBUFFER_ATTACHMENT_OBJECT_TYPE,
      &mut ty,
    )
  };

  ty as GLenum != gl::NONE
}

fn get_framebuffer_status() -> Result<(), IncompleteReason> {
  let status = unsafe { gl::CheckFramebufferStatus(gl::FRAMEBUFFER) };
  incomplete_reason(status)
}

fn incomplete_reason(status: GLenum) -> Result<(), IncompleteReason> {
  match status {
    gl::FRAMEBUFFER_COMPLETE => Ok(()),
    gl::FRAMEBUFFER_UNDEFINED => Err(IncompleteReason::Undefined),
    gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => Err(IncompleteReason::IncompleteAttachment),
    gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => Err(IncompleteReason::MissingAttachment),
    gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => Err(IncompleteReason::IncompleteDrawBuffer),
    gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => Err(IncompleteReason::IncompleteReadBuffer),
    gl::FRAMEBUFFER_UNSUPPORTED => Err(IncompleteReason::Unsupported),
    gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => Err(IncompleteReason::IncompleteMultisample),
    gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => Err(IncompleteReason::IncompleteLayerTargets),
    _ => Err(IncompleteReason::Unknown(status)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_mapping() {
    assert_eq!(incomplete_reason(gl::FRAMEBUFFER_COMPLETE), Ok(()));
    assert_eq!(
      incomplete_reason(gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT),
      Err(IncompleteReason::MissingAttachment)
    );
    assert_eq!(
      incomplete_reason(gl::FRAMEBUFFER_UNSUPPORTED),
      Err(IncompleteReason::Unsupported)
    );
  }

  #[test]
  fn unknown_status_is_kept() {
    assert_eq!(incomplete_reason(0x1234), Err(IncompleteReason::Unknown(0x1234)));
  }
}
