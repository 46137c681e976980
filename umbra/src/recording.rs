//! Backend recording every command it receives, for tests.

use std::collections::{HashMap, HashSet};

use crate::backend::framebuffer::{FramebufferBackend, FramebufferHandle};
use crate::backend::shader::{ProgramHandle, ShaderBackend};
use crate::backend::state::{ClearBuffers, StateBackend, Viewport};
use crate::backend::texture::{TextureBackend, TextureHandle};
use crate::context::GraphicsContext;
use crate::framebuffer::{FramebufferAttachments, FramebufferError, IncompleteReason};
use crate::shader::{ProgramError, StageSources, UniformValue, UniformWarning};
use crate::texture::{PixelFormat, Sampler, TextureError};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Event {
  Viewport(Viewport),
  BindFramebuffer(FramebufferHandle),
  UseProgram(ProgramHandle),
  BindTexture {
    unit: u32,
    texture: TextureHandle,
  },
  DepthTest(bool),
  Clear(ClearBuffers),
  NewDepthTexture {
    handle: TextureHandle,
    size: [u32; 2],
    sampler: Sampler,
  },
  NewTexture {
    handle: TextureHandle,
    size: [u32; 2],
    format: PixelFormat,
    sampler: Sampler,
    len: usize,
  },
  NewFramebuffer {
    handle: FramebufferHandle,
    depth: TextureHandle,
  },
  NewProgram(ProgramHandle),
  Uniform {
    program: ProgramHandle,
    name: String,
    value: UniformValue,
  },
  Present,
}

#[derive(Debug)]
pub(crate) struct RecordingBackend {
  events: Vec<Event>,
  last_name: u32,
  viewport: Viewport,
  framebuffer: FramebufferHandle,
  program: ProgramHandle,
  textures: HashMap<u32, TextureHandle>,
  texture_sizes: HashMap<TextureHandle, [u32; 2]>,
  framebuffers: HashMap<FramebufferHandle, FramebufferAttachments>,
  uniforms: HashMap<(ProgramHandle, String), UniformValue>,
  inactive_uniforms: HashSet<(ProgramHandle, String)>,
  incomplete: Option<IncompleteReason>,
  rejecting_textures: bool,
}

impl Default for RecordingBackend {
  fn default() -> Self {
    RecordingBackend {
      events: Vec::new(),
      last_name: 0,
      viewport: Viewport::whole([0, 0]),
      framebuffer: FramebufferHandle::BACK_BUFFER,
      program: ProgramHandle::NONE,
      textures: HashMap::new(),
      texture_sizes: HashMap::new(),
      framebuffers: HashMap::new(),
      uniforms: HashMap::new(),
      inactive_uniforms: HashSet::new(),
      incomplete: None,
      rejecting_textures: false,
    }
  }
}

impl RecordingBackend {
  pub(crate) fn events(&self) -> &[Event] {
    &self.events
  }

  pub(crate) fn take_events(&mut self) -> Vec<Event> {
    std::mem::take(&mut self.events)
  }

  /// Last value uploaded to a uniform.
  pub(crate) fn uniform(&self, program: ProgramHandle, name: &str) -> Option<UniformValue> {
    self.uniforms.get(&(program, name.to_owned())).copied()
  }

  /// Make a uniform of a program inactive, as if the GLSL compiler had removed it.
  pub(crate) fn deactivate_uniform(&mut self, program: ProgramHandle, name: &str) {
    self.inactive_uniforms.insert((program, name.to_owned()));
  }

  /// Make every framebuffer created from now on incomplete.
  pub(crate) fn fail_framebuffers_with(&mut self, reason: IncompleteReason) {
    self.incomplete = Some(reason);
  }

  /// Refuse every texture allocation from now on.
  pub(crate) fn reject_textures(&mut self) {
    self.rejecting_textures = true;
  }

  fn gen_name(&mut self) -> u32 {
    self.last_name += 1;
    self.last_name
  }
}

impl StateBackend for RecordingBackend {
  fn viewport(&self) -> Viewport {
    self.viewport
  }

  fn set_viewport(&mut self, viewport: Viewport) {
    self.viewport = viewport;
    self.events.push(Event::Viewport(viewport));
  }

  fn bound_framebuffer(&self) -> FramebufferHandle {
    self.framebuffer
  }

  fn bind_framebuffer(&mut self, framebuffer: FramebufferHandle) {
    self.framebuffer = framebuffer;
    self.events.push(Event::BindFramebuffer(framebuffer));
  }

  fn current_program(&self) -> ProgramHandle {
    self.program
  }

  fn use_program(&mut self, program: ProgramHandle) {
    self.program = program;
    self.events.push(Event::UseProgram(program));
  }

  fn bound_texture(&self, unit: u32) -> TextureHandle {
    self
      .textures
      .get(&unit)
      .copied()
      .unwrap_or(TextureHandle::NONE)
  }

  fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
    self.textures.insert(unit, texture);
    self.events.push(Event::BindTexture { unit, texture });
  }

  fn set_depth_test(&mut self, enabled: bool) {
    self.events.push(Event::DepthTest(enabled));
  }

  fn clear(&mut self, buffers: ClearBuffers) {
    self.events.push(Event::Clear(buffers));
  }
}

impl FramebufferBackend for RecordingBackend {
  fn new_depth_framebuffer(
    &mut self,
    depth: TextureHandle,
  ) -> Result<FramebufferHandle, FramebufferError> {
    if let Some(ref reason) = self.incomplete {
      return Err(FramebufferError::Incomplete(reason.clone()));
    }

    let handle = FramebufferHandle(self.gen_name());
    self.framebuffers.insert(
      handle,
      FramebufferAttachments {
        color: 0,
        depth: true,
      },
    );
    self.events.push(Event::NewFramebuffer { handle, depth });

    Ok(handle)
  }

  fn framebuffer_status(&mut self, framebuffer: FramebufferHandle) -> Result<(), IncompleteReason> {
    match self.incomplete {
      Some(ref reason) => Err(reason.clone()),
      None if self.framebuffers.contains_key(&framebuffer) => Ok(()),
      None => Err(IncompleteReason::Undefined),
    }
  }

  fn framebuffer_attachments(&mut self, framebuffer: FramebufferHandle) -> FramebufferAttachments {
    self
      .framebuffers
      .get(&framebuffer)
      .copied()
      .unwrap_or_default()
  }
}

impl TextureBackend for RecordingBackend {
  fn new_depth_texture(
    &mut self,
    size: [u32; 2],
    sampler: &Sampler,
  ) -> Result<TextureHandle, TextureError> {
    if self.rejecting_textures {
      return Err(TextureError::Allocation("rejected".to_owned()));
    }

    let handle = TextureHandle(self.gen_name());
    self.texture_sizes.insert(handle, size);
    self.events.push(Event::NewDepthTexture {
      handle,
      size,
      sampler: *sampler,
    });

    Ok(handle)
  }

  fn new_texture(
    &mut self,
    size: [u32; 2],
    format: PixelFormat,
    sampler: &Sampler,
    texels: &[u8],
  ) -> Result<TextureHandle, TextureError> {
    if self.rejecting_textures {
      return Err(TextureError::Allocation("rejected".to_owned()));
    }

    let expected = size[0] as usize * size[1] as usize * format.channels_len();
    if texels.len() != expected {
      return Err(TextureError::TexelCount {
        expected,
        found: texels.len(),
      });
    }

    let handle = TextureHandle(self.gen_name());
    self.texture_sizes.insert(handle, size);
    self.events.push(Event::NewTexture {
      handle,
      size,
      format,
      sampler: *sampler,
      len: texels.len(),
    });

    Ok(handle)
  }

  fn texture_size(&mut self, texture: TextureHandle) -> [u32; 2] {
    self.texture_sizes.get(&texture).copied().unwrap_or([0, 0])
  }
}

impl ShaderBackend for RecordingBackend {
  fn new_program(&mut self, _: &StageSources) -> Result<ProgramHandle, ProgramError> {
    let handle = ProgramHandle(self.gen_name());
    self.events.push(Event::NewProgram(handle));
    Ok(handle)
  }

  fn set_uniform(
    &mut self,
    program: ProgramHandle,
    name: &str,
    value: UniformValue,
  ) -> Result<(), UniformWarning> {
    assert_eq!(
      program, self.program,
      "uniform {} uploaded to a program not in use",
      name
    );

    let key = (program, name.to_owned());
    if self.inactive_uniforms.contains(&key) {
      return Err(UniformWarning::inactive(name));
    }

    self.uniforms.insert(key, value);
    self.events.push(Event::Uniform {
      program,
      name: name.to_owned(),
      value,
    });

    Ok(())
  }
}

/// Context presenting to nothing.
#[derive(Debug, Default)]
pub(crate) struct RecordingContext {
  pub(crate) backend: RecordingBackend,
  pub(crate) size: [u32; 2],
}

impl GraphicsContext for RecordingContext {
  type Backend = RecordingBackend;

  fn backend(&mut self) -> &mut Self::Backend {
    &mut self.backend
  }

  fn framebuffer_size(&self) -> [u32; 2] {
    self.size
  }

  fn swap_buffers(&mut self) {
    self.backend.events.push(Event::Present);
  }
}
