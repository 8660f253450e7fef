//! Math utilities and types
//!
//! Provides fundamental math types for 3D rendering, plus the
//! position/rotation/scale transform every scene entity carries.

pub use nalgebra::{Matrix3, Matrix4, Point3, Vector2, Vector3, Vector4};

use nalgebra::Rotation3;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Spatial transform for a renderable entity
///
/// Rotation is stored as per-axis Euler angles in radians. The rendering
/// protocol integrates angular velocity per axis, which keeps the
/// Euler representation as the source of truth rather than a quaternion.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// World space position
    pub position: Vec3,

    /// Euler rotation angles in radians (about x, y, z)
    pub rotation: Vec3,

    /// Per-axis scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create an identity transform
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create from full transform specification
    #[must_use]
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Compose the world matrix as translation * rotation * scale
    ///
    /// Column-vector convention: scale is applied first, then the Euler
    /// rotation (x, then y, then z), then translation.
    #[must_use]
    pub fn world_matrix(&self) -> Mat4 {
        let rotation = Rotation3::from_axis_angle(&Vec3::z_axis(), self.rotation.z)
            * Rotation3::from_axis_angle(&Vec3::y_axis(), self.rotation.y)
            * Rotation3::from_axis_angle(&Vec3::x_axis(), self.rotation.x);

        Mat4::new_translation(&self.position)
            * rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_world_matrix() {
        let transform = Transform::identity();
        assert_relative_eq!(transform.world_matrix(), Mat4::identity());
    }

    #[test]
    fn test_translation_lands_in_last_column() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let world = transform.world_matrix();

        assert_relative_eq!(world[(0, 3)], 1.0);
        assert_relative_eq!(world[(1, 3)], 2.0);
        assert_relative_eq!(world[(2, 3)], 3.0);
    }

    #[test]
    fn test_scale_applies_before_translation() {
        let transform = Transform::new(
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::zeros(),
            Vec3::new(2.0, 2.0, 2.0),
        );
        let point = transform.world_matrix().transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));

        // (1,0,0) scaled by 2 then moved by 5
        assert_relative_eq!(point.x, 7.0);
    }
}
