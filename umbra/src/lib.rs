//! # umbra
//!
//! A small two-pass shadow mapping renderer.
//!
//! Every frame, the scene is first rendered from the point of view of a light into an off-screen,
//! depth-only framebuffer (the _shadow map_). The scene is then rendered a second time, from the
//! camera, into the back buffer, with the shadow map bound to a texture unit so that shaders can
//! tell whether a fragment is occluded from the light.
//!
//! # Architecture
//!
//! This crate doesn’t talk to any graphics API directly. Instead, it uses the traits defined in
//! [`backend`], which a backend crate implements (for instance, `umbra-gl` for OpenGL 3.3). The
//! presentation surface (window, buffer swapping) is abstracted by [`context::GraphicsContext`].
//!
//! Graphics state changes (bound framebuffer, viewport, program, texture units) are never paired
//! by hand: they go through the guards in [`binding`], which restore the previous state when they
//! go out of scope.
//!
//! The entry point is [`pipeline::ShadowPass`], which owns every GPU resource it needs and renders
//! one frame per call to [`pipeline::ShadowPass::render_frame`].
//!
//! # Scene
//!
//! The only scene available is [`scene::PlaceholderScene`], which uploads the model matrices of a
//! floor and a cube but doesn’t submit any geometry. Implement [`scene::SceneRenderer`] to render
//! something else.

#![deny(missing_docs)]

pub mod backend;
pub mod binding;
pub mod config;
pub mod context;
pub mod framebuffer;
pub mod pipeline;
pub mod scene;
pub mod shader;
pub mod texture;
pub mod transform;

#[cfg(test)]
mod recording;
