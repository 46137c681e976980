//! Backend interfaces.
//!
//! This module exposes the traits a backend must implement to be usable by umbra. They are split by
//! concern so that a backend implementor can focus on one area at a time:
//!
//! - [`state::StateBackend`]: viewport, bound framebuffer, program in use, texture units, clearing.
//! - [`framebuffer::FramebufferBackend`]: depth-only framebuffers and their completeness.
//! - [`texture::TextureBackend`]: depth and color 2D textures.
//! - [`shader::ShaderBackend`]: shader programs and uniforms.
//!
//! Resources are referred to by handles ([`FramebufferHandle`](framebuffer::FramebufferHandle),
//! [`TextureHandle`](texture::TextureHandle), [`ProgramHandle`](shader::ProgramHandle)), which are
//! thin wrappers around the names the backend gives them.

pub mod framebuffer;
pub mod shader;
pub mod state;
pub mod texture;

use self::framebuffer::FramebufferBackend;
use self::shader::ShaderBackend;
use self::state::StateBackend;
use self::texture::TextureBackend;

/// A complete backend.
///
/// This trait is automatically implemented for any type implementing all the backend traits.
pub trait Backend: StateBackend + FramebufferBackend + TextureBackend + ShaderBackend {}

impl<B> Backend for B where B: ?Sized + StateBackend + FramebufferBackend + TextureBackend + ShaderBackend
{}
