//! SE3: 6-DOF rigid transformation (rotation + translation).
//!
//! Every pose in the tree stores its transform relative to its parent as an
//! `SE3`. Composition follows the `T_parent_child` convention:
//!
//! ```text
//! T_root_child = T_root_parent ∘ T_parent_child
//! ```

use nalgebra::{Matrix3, Matrix4, Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::rotation::Rotation;

/// Rigid transformation: rotation + translation.
///
/// Transforms points as: p' = R * p + t
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SE3 {
    pub rotation: UnitQuaternion<f64>,
    pub translation: Vector3<f64>,
}

impl SE3 {
    /// Identity transformation (no rotation, no translation).
    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Construct from a rotation matrix and translation.
    ///
    /// Small float drift in the matrix is tolerated; malformed matrices are
    /// checked as in `Rotation::from`.
    pub fn from_rt(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation: Rotation::from(rotation).quaternion(),
            translation,
        }
    }

    /// Construct from quaternion (w, x, y, z) and translation.
    pub fn from_quaternion(qw: f64, qx: f64, qy: f64, qz: f64, translation: Vector3<f64>) -> Self {
        Self {
            rotation: UnitQuaternion::from_quaternion(Quaternion::new(qw, qx, qy, qz)),
            translation,
        }
    }

    /// Construct from homogeneous 4x4 matrix of form [R | t; 0 | 1].
    pub fn from_matrix(mat: Matrix4<f64>) -> Self {
        let r = mat.fixed_view::<3, 3>(0, 0).into_owned();
        let t = Vector3::new(mat[(0, 3)], mat[(1, 3)], mat[(2, 3)]);
        Self::from_rt(r, t)
    }

    /// Convert to homogeneous 4x4 matrix.
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let mut mat = Matrix4::identity();
        mat.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&self.rotation_matrix());
        mat.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        mat
    }

    /// Inverse transformation.
    ///
    /// T^{-1} = [R^T | -R^T*t; 0 | 1]
    pub fn inverse(&self) -> Self {
        let rot_inv = self.rotation.inverse();
        Self {
            rotation: rot_inv,
            translation: -(rot_inv * self.translation),
        }
    }

    /// Compose two transforms: self ∘ other.
    ///
    /// For T1 = [R1 | t1] and T2 = [R2 | t2]:
    /// T1 ∘ T2 = [R1*R2 | R1*t2 + t1]
    pub fn compose(&self, other: &SE3) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    /// Transform a single point: p' = R * p + t.
    pub fn transform_point(&self, p: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * p + self.translation
    }

    /// Get the rotation matrix.
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.rotation.to_rotation_matrix().into_inner()
    }

    /// Rotation angle in radians, in [0, π].
    pub fn rotation_angle(&self) -> f64 {
        self.rotation.angle()
    }

    /// True if `other` is within `dist_threshold` (translation) and
    /// `angle_threshold` radians (rotation) of this transform.
    pub fn is_near(&self, other: &SE3, dist_threshold: f64, angle_threshold: f64) -> bool {
        let dist = (self.translation - other.translation).norm();
        let angle = self.rotation.angle_to(&other.rotation);
        dist <= dist_threshold && angle <= angle_threshold
    }
}

impl Default for SE3 {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity() {
        let t = SE3::identity();
        let p = Vector3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(t.transform_point(&p), p, epsilon = 1e-12);
        assert_relative_eq!(t.rotation_angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse() {
        let t = SE3 {
            rotation: UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.7),
            translation: Vector3::new(1.0, -2.0, 0.5),
        };

        let identity = t.compose(&t.inverse());
        assert_relative_eq!(identity.translation, Vector3::zeros(), epsilon = 1e-12);
        assert_relative_eq!(identity.rotation_angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compose() {
        // Parent rotated 90° about Z and shifted along X; child 1m along X in parent.
        let parent = SE3 {
            rotation: UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
            translation: Vector3::new(10.0, 0.0, 0.0),
        };
        let child = SE3 {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::new(1.0, 0.0, 0.0),
        };

        let composed = parent.compose(&child);
        assert_relative_eq!(composed.translation, Vector3::new(10.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_to_from_matrix() {
        let t = SE3::from_quaternion(0.9, 0.1, 0.3, -0.2, Vector3::new(4.0, 5.0, 6.0));
        let back = SE3::from_matrix(t.to_matrix());

        assert_relative_eq!(back.translation, t.translation, epsilon = 1e-12);
        assert_relative_eq!(back.rotation_matrix(), t.rotation_matrix(), epsilon = 1e-9);
    }

    #[test]
    fn test_is_near() {
        let a = SE3::identity();
        let b = SE3 {
            rotation: UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.05),
            translation: Vector3::new(0.0, 3.0, 4.0),
        };

        assert!(a.is_near(&b, 5.0, 0.1));
        assert!(!a.is_near(&b, 4.9, 0.1));
        assert!(!a.is_near(&b, 5.0, 0.01));
    }

    #[test]
    #[cfg_attr(
        all(debug_assertions, not(feature = "shipping")),
        should_panic(expected = "Rotation.FromMatrix.NonFinite")
    )]
    fn test_from_matrix_with_nan_terminates() {
        let mut mat = Matrix4::identity();
        mat[(0, 0)] = f64::NAN;
        mat[(0, 3)] = 2.0;

        let t = SE3::from_matrix(mat);
        assert_relative_eq!(t.rotation_angle(), 0.0, epsilon = 1e-12);
        assert_eq!(t.translation, Vector3::new(2.0, 0.0, 0.0));
    }
}
