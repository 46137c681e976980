//! Renderer configuration.
//!
//! Everything the renderer would otherwise read from global constants lives in a [`RenderConfig`],
//! handed to the renderer when it is created. Defaults match the demo scene.

use cgmath::{Deg, Point3, Vector3};
use std::path::{Path, PathBuf};

/// Light casting shadows.
///
/// The shadow map is rendered with an orthographic projection looking from `position` toward the
/// origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightConfig {
  /// Position of the light.
  pub position: Point3<f32>,
  /// Up direction of the light view.
  pub up: Vector3<f32>,
  /// Half width and half height of the orthographic frustum.
  pub half_extent: f32,
  /// Near plane distance.
  pub near: f32,
  /// Far plane distance.
  pub far: f32,
}

impl Default for LightConfig {
  fn default() -> Self {
    LightConfig {
      position: Point3::new(-2., 4., -1.),
      up: Vector3::unit_y(),
      half_extent: 10.,
      near: 1.,
      far: 7.5,
    }
  }
}

/// Camera the scene is viewed from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
  /// Position of the camera.
  pub eye: Point3<f32>,
  /// Point the camera looks at.
  pub target: Point3<f32>,
  /// Up direction.
  pub up: Vector3<f32>,
  /// Vertical field of view.
  pub fovy: Deg<f32>,
  /// Near plane distance.
  pub near: f32,
  /// Far plane distance.
  pub far: f32,
}

impl Default for CameraConfig {
  fn default() -> Self {
    CameraConfig {
      eye: Point3::new(0., 1.5, 5.),
      target: Point3::new(0., 0., 0.),
      up: Vector3::unit_y(),
      fovy: Deg(45.),
      near: 0.1,
      far: 100.,
    }
  }
}

/// Location of the files the renderer reads at startup.
///
/// Relative paths are resolved against [`AssetPaths::root`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetPaths {
  root: PathBuf,
  /// Depth pass vertex shader.
  pub depth_vs: PathBuf,
  /// Depth pass fragment shader.
  pub depth_fs: PathBuf,
  /// Main pass vertex shader.
  pub scene_vs: PathBuf,
  /// Main pass fragment shader.
  pub scene_fs: PathBuf,
  /// Diffuse texture of the scene.
  pub diffuse_texture: PathBuf,
}

impl Default for AssetPaths {
  /// Assets relative to the current working directory.
  fn default() -> Self {
    AssetPaths {
      root: PathBuf::from("."),
      depth_vs: PathBuf::from("depth.vert"),
      depth_fs: PathBuf::from("depth.frag"),
      scene_vs: PathBuf::from("scene.vert"),
      scene_fs: PathBuf::from("scene.frag"),
      diffuse_texture: PathBuf::from("resources/textures/wood.png"),
    }
  }
}

impl AssetPaths {
  /// Default asset layout under `root`.
  pub fn with_root(root: impl Into<PathBuf>) -> Self {
    AssetPaths {
      root: root.into(),
      ..AssetPaths::default()
    }
  }

  /// Root directory.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Resolve a path against the root.
  pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
    self.root.join(path)
  }
}

/// Renderer configuration.
///
/// Feel free to look at the different methods available to tweak the configuration. You may want
/// to start with `default()` though.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
  window_size: [u32; 2],
  shadow_map_size: [u32; 2],
  light: LightConfig,
  camera: CameraConfig,
  assets: AssetPaths,
}

impl Default for RenderConfig {
  /// Defaults:
  ///
  /// - `window_size` set to 800×600.
  /// - `shadow_map_size` set to 1024×1024.
  /// - `light` and `camera` set to their defaults.
  /// - `assets` relative to the current working directory.
  fn default() -> Self {
    RenderConfig {
      window_size: [800, 600],
      shadow_map_size: [1024, 1024],
      light: LightConfig::default(),
      camera: CameraConfig::default(),
      assets: AssetPaths::default(),
    }
  }
}

impl RenderConfig {
  /// Initial size of the window.
  #[inline]
  pub fn set_window_size(self, window_size: [u32; 2]) -> Self {
    RenderConfig {
      window_size,
      ..self
    }
  }

  /// Initial size of the window.
  #[inline]
  pub fn window_size(&self) -> [u32; 2] {
    self.window_size
  }

  /// Resolution of the shadow map.
  #[inline]
  pub fn set_shadow_map_size(self, shadow_map_size: [u32; 2]) -> Self {
    RenderConfig {
      shadow_map_size,
      ..self
    }
  }

  /// Resolution of the shadow map.
  #[inline]
  pub fn shadow_map_size(&self) -> [u32; 2] {
    self.shadow_map_size
  }

  /// Light casting shadows.
  #[inline]
  pub fn set_light(self, light: LightConfig) -> Self {
    RenderConfig { light, ..self }
  }

  /// Light casting shadows.
  #[inline]
  pub fn light(&self) -> &LightConfig {
    &self.light
  }

  /// Camera.
  #[inline]
  pub fn set_camera(self, camera: CameraConfig) -> Self {
    RenderConfig { camera, ..self }
  }

  /// Camera.
  #[inline]
  pub fn camera(&self) -> &CameraConfig {
    &self.camera
  }

  /// Where to read shaders and textures from.
  #[inline]
  pub fn set_assets(self, assets: AssetPaths) -> Self {
    RenderConfig { assets, ..self }
  }

  /// Where to read shaders and textures from.
  #[inline]
  pub fn assets(&self) -> &AssetPaths {
    &self.assets
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let config = RenderConfig::default();

    assert_eq!(config.window_size(), [800, 600]);
    assert_eq!(config.shadow_map_size(), [1024, 1024]);
    assert_eq!(config.light().position, Point3::new(-2., 4., -1.));
    assert_eq!(config.camera().eye, Point3::new(0., 1.5, 5.));
  }

  #[test]
  fn configurations_are_independent() {
    let a = RenderConfig::default();
    let b = a.clone().set_shadow_map_size([2048, 2048]);

    assert_eq!(a.shadow_map_size(), [1024, 1024]);
    assert_eq!(b.shadow_map_size(), [2048, 2048]);
  }

  #[test]
  fn asset_paths_resolve_against_root() {
    let assets = AssetPaths::with_root("demo/assets");

    assert_eq!(
      assets.resolve(&assets.depth_vs),
      Path::new("demo/assets/depth.vert")
    );
    assert_eq!(
      assets.resolve(&assets.diffuse_texture),
      Path::new("demo/assets/resources/textures/wood.png")
    );
  }
}
