//! Light and camera transforms.

use cgmath::{ortho, perspective, Matrix4, Point3};

use crate::config::{CameraConfig, LightConfig};

/// Transform from world space to the light’s clip space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightTransform {
  /// Orthographic projection of the light.
  pub projection: Matrix4<f32>,
  /// View from the light toward the origin.
  pub view: Matrix4<f32>,
  /// `projection * view`, uploaded as `lightSpaceMatrix`.
  pub combined: Matrix4<f32>,
}

impl LightTransform {
  /// Compute the transform of a light.
  ///
  /// This is a pure function of its input.
  pub fn new(light: &LightConfig) -> Self {
    let e = light.half_extent;
    let projection = ortho(-e, e, -e, e, light.near, light.far);
    let view = Matrix4::look_at_rh(light.position, Point3::new(0., 0., 0.), light.up);

    LightTransform {
      projection,
      view,
      combined: projection * view,
    }
  }
}

/// Transform from world space to the camera’s clip space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
  /// Perspective projection.
  pub projection: Matrix4<f32>,
  /// View matrix.
  pub view: Matrix4<f32>,
  /// Position of the camera, in world space.
  pub position: Point3<f32>,
}

impl CameraTransform {
  /// Compute the camera transform for a surface of the given size.
  ///
  /// A zero dimension (minimized window) is treated as one.
  pub fn new(camera: &CameraConfig, [width, height]: [u32; 2]) -> Self {
    let aspect = width.max(1) as f32 / height.max(1) as f32;

    CameraTransform {
      projection: perspective(camera.fovy, aspect, camera.near, camera.far),
      view: Matrix4::look_at_rh(camera.eye, camera.target, camera.up),
      position: camera.eye,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::{Deg, Vector4};

  fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
  }

  #[test]
  fn light_space_matrix() {
    let light = LightTransform::new(&LightConfig::default());
    let m = light.combined;

    // columns
    assert_close(m[0][0], -0.044_721_36);
    assert_close(m[0][1], 0.078_072_01);
    assert_close(m[0][2], 0.134_287_94);
    assert_close(m[0][3], 0.);
    assert_close(m[1][0], 0.);
    assert_close(m[1][1], 0.048_795_00);
    assert_close(m[1][2], -0.268_575_87);
    assert_close(m[1][3], 0.);
    assert_close(m[2][0], 0.089_442_72);
    assert_close(m[2][1], 0.039_036_00);
    assert_close(m[2][2], 0.067_143_97);
    assert_close(m[2][3], 0.);
    assert_close(m[3][0], 0.);
    assert_close(m[3][1], 0.);
    assert_close(m[3][2], 0.102_331_01);
    assert_close(m[3][3], 1.);
  }

  #[test]
  fn light_transform_is_reproducible() {
    let a = LightTransform::new(&LightConfig::default());
    let b = LightTransform::new(&LightConfig::default());

    let bits = |m: Matrix4<f32>| {
      let cols: [[f32; 4]; 4] = m.into();
      cols.iter().flatten().map(|x| x.to_bits()).collect::<Vec<_>>()
    };

    assert_eq!(bits(a.combined), bits(b.combined));
    assert_eq!(a.combined, a.projection * a.view);
  }

  #[test]
  fn light_looks_at_origin() {
    let light = LightTransform::new(&LightConfig::default());
    let origin = light.view * Vector4::new(0., 0., 0., 1.);
    let distance = (4.0f32 + 16. + 1.).sqrt();

    assert_close(origin.x, 0.);
    assert_close(origin.y, 0.);
    assert!((origin.z + distance).abs() < 1e-5);
  }

  #[test]
  fn camera_aspect_follows_surface() {
    let camera = CameraConfig::default();
    let narrow = CameraTransform::new(&camera, [800, 600]);
    let wide = CameraTransform::new(&camera, [1600, 600]);

    assert_eq!(narrow.projection, perspective(Deg(45.0f32), 800. / 600., 0.1, 100.));
    assert_eq!(wide.projection, perspective(Deg(45.0f32), 1600. / 600., 0.1, 100.));
    assert_eq!(narrow.view, wide.view);
    assert_eq!(narrow.position, Point3::new(0., 1.5, 5.));
  }

  #[test]
  fn minimized_surface_does_not_divide_by_zero() {
    let t = CameraTransform::new(&CameraConfig::default(), [800, 0]);
    assert!(t.projection[0][0].is_finite());
  }

  #[test]
  fn zero_width_surface_keeps_a_valid_aspect() {
    let camera = CameraConfig::default();

    for &size in &[[0, 0], [0, 600]] {
      let t = CameraTransform::new(&camera, size);
      assert!(t.projection[0][0].is_finite() && t.projection[0][0] > 0.);
    }

    assert_eq!(
      CameraTransform::new(&camera, [0, 0]).projection,
      perspective(Deg(45.0f32), 1., 0.1, 100.)
    );
  }
}
