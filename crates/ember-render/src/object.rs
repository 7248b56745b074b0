//! Scene objects: identity, transform, and an optional mesh.

use std::sync::Arc;

use glam::{EulerRot, Mat4, Vec3};

use ember_core::ObjectId;

use crate::model::Model;

/// Translation, scale, and Tait-Bryan rotation (Y, then X, then Z).
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub translation: Vec3,
    pub scale: Vec3,
    pub rotation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
        }
    }
}

impl Transform {
    /// Compose the model matrix: translate * rotate(YXZ) * scale.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_euler(
                EulerRot::YXZ,
                self.rotation.y,
                self.rotation.x,
                self.rotation.z,
            )
            * Mat4::from_scale(self.scale)
    }
}

/// A renderable object in the scene.
pub struct SceneObject {
    id: ObjectId,
    pub model: Option<Arc<Model>>,
    pub color: Vec3,
    pub transform: Transform,
}

impl SceneObject {
    /// Create an empty object with a fresh id.
    pub fn new() -> Self {
        Self {
            id: ObjectId::next(),
            model: None,
            color: Vec3::ONE,
            transform: Transform::default(),
        }
    }

    /// Create an object rendering the given model.
    pub fn with_model(model: Arc<Model>) -> Self {
        let mut object = Self::new();
        object.model = Some(model);
        object
    }

    /// The object's unique id.
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl Default for SceneObject {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec4;

    #[test]
    fn default_transform_is_identity() {
        let matrix = Transform::default().matrix();
        assert_relative_eq!(matrix.determinant(), 1.0, epsilon = 1e-6);
        assert_eq!(matrix, Mat4::IDENTITY);
    }

    #[test]
    fn translation_lands_in_last_column() {
        let transform = Transform {
            translation: Vec3::new(1.0, 2.0, 3.0),
            ..Default::default()
        };
        let matrix = transform.matrix();
        assert_eq!(matrix.col(3), Vec4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn rotation_applies_y_before_x_before_z() {
        let transform = Transform {
            rotation: Vec3::new(0.3, 0.7, 0.1),
            ..Default::default()
        };
        let expected = Mat4::from_rotation_y(0.7)
            * Mat4::from_rotation_x(0.3)
            * Mat4::from_rotation_z(0.1);
        let matrix = transform.matrix();
        for col in 0..4 {
            for row in 0..4 {
                assert_relative_eq!(
                    matrix.col(col)[row],
                    expected.col(col)[row],
                    epsilon = 1e-6
                );
            }
        }
    }

    #[test]
    fn scale_is_applied_before_rotation() {
        let transform = Transform {
            scale: Vec3::new(2.0, 1.0, 1.0),
            rotation: Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
            ..Default::default()
        };
        // Local +X scaled by 2, then rotated 90 degrees about Y onto -Z.
        let result = transform.matrix() * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(result.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(result.z, -2.0, epsilon = 1e-6);
    }

    #[test]
    fn objects_get_distinct_ids() {
        let a = SceneObject::new();
        let b = SceneObject::new();
        assert_ne!(a.id(), b.id());
    }
}
