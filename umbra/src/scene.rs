//! Scenes.
//!
//! A scene is rendered twice per frame, once per pass, with a different program bound each time.
//! [`SceneRenderer`] is the interface a scene exposes to the passes; [`PlaceholderScene`] is the
//! only implementation shipped.

use cgmath::{Matrix4, Vector3};

use crate::backend::shader::ShaderBackend;
use crate::backend::state::StateBackend;
use crate::binding::ProgramBinding;

/// An object of the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneInstance {
  /// Name, used in logs.
  pub name: &'static str,
  /// Model matrix.
  pub model: Matrix4<f32>,
  /// Name of the uniform the model matrix is uploaded to.
  pub uniform: &'static str,
}

/// Something that can be rendered with whatever program is bound.
pub trait SceneRenderer {
  /// Render the scene with the program currently bound by `shading`.
  fn render<B>(&self, shading: &mut ProgramBinding<'_, B>)
  where
    B: ?Sized + StateBackend + ShaderBackend;
}

/// Scene made of a floor and a cube, without any geometry.
///
/// Rendering it uploads the model matrix of every instance but submits no draw call: the uniforms
/// are set exactly as a real scene would set them, nothing gets rasterized.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceholderScene {
  instances: Vec<SceneInstance>,
}

impl Default for PlaceholderScene {
  fn default() -> Self {
    let floor = SceneInstance {
      name: "floor",
      model: Matrix4::from_nonuniform_scale(10., 0.1, 10.),
      uniform: "model",
    };

    let cube = SceneInstance {
      name: "cube",
      model: Matrix4::from_translation(Vector3::new(0., 1., 0.)),
      uniform: "model",
    };

    PlaceholderScene {
      instances: vec![floor, cube],
    }
  }
}

impl PlaceholderScene {
  /// Instances of the scene, in rendering order.
  pub fn instances(&self) -> &[SceneInstance] {
    &self.instances
  }
}

impl SceneRenderer for PlaceholderScene {
  fn render<B>(&self, shading: &mut ProgramBinding<'_, B>)
  where
    B: ?Sized + StateBackend + ShaderBackend,
  {
    for instance in &self.instances {
      shading.set(instance.uniform, instance.model);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::recording::{Event, RecordingBackend};
  use crate::shader::{Program, StageSources, UniformValue};

  #[test]
  fn placeholder_uploads_models_in_order() {
    let mut backend = RecordingBackend::default();
    let mut program = Program::new(&mut backend, "scene", &StageSources::new("", "")).unwrap();
    backend.take_events();

    {
      let mut shading = ProgramBinding::new(&mut backend, &mut program);
      PlaceholderScene::default().render(&mut shading);
    }

    let models: Vec<_> = backend
      .events()
      .iter()
      .filter_map(|e| match e {
        Event::Uniform { name, value, .. } if name == "model" => Some(*value),
        _ => None,
      })
      .collect();

    assert_eq!(
      models,
      vec![
        UniformValue::from(Matrix4::from_nonuniform_scale(10., 0.1, 10.)),
        UniformValue::from(Matrix4::from_translation(Vector3::new(0., 1., 0.))),
      ]
    );
  }

  #[test]
  fn placeholder_submits_no_geometry() {
    let mut backend = RecordingBackend::default();
    let mut program = Program::new(&mut backend, "depth", &StageSources::new("", "")).unwrap();
    backend.take_events();

    {
      let mut shading = ProgramBinding::new(&mut backend, &mut program);
      PlaceholderScene::default().render(&mut shading);
    }

    assert!(backend.events().iter().all(|e| matches!(
      e,
      Event::UseProgram(_) | Event::Uniform { .. }
    )));
  }
}
