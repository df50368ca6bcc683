//! 3D rotation input forms.
//!
//! Callers hand rotations to the pose tree as a 3x3 matrix, an axis-angle
//! rotation vector, or a unit quaternion. All of them convert into
//! [`Rotation`], a unit quaternion underneath, so composition has a single
//! implementation.

use nalgebra::{Matrix3, Rotation3, Unit, UnitQuaternion, Vector3};

use crate::dev_assert;

/// Maximum deviation of `R^T R` from identity (Frobenius norm) before a
/// matrix counts as malformed.
pub const ORTHONORMALITY_TOLERANCE: f64 = 1e-3;

/// Axis-angle rotation stored as `axis * angle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationVector(pub Vector3<f64>);

impl RotationVector {
    /// Construct from a raw rotation vector (direction = axis, norm = angle).
    pub fn new(rvec: Vector3<f64>) -> Self {
        Self(rvec)
    }

    /// Construct from an angle (radians) about `axis`.
    ///
    /// The axis is normalized. A zero-length axis with a zero angle is the
    /// identity; a zero-length axis with a non-zero angle is rejected.
    pub fn from_angle_axis(angle: f64, axis: &Vector3<f64>) -> Self {
        let norm = axis.norm();
        if norm < f64::EPSILON {
            dev_assert!(
                angle == 0.0,
                "RotationVector.FromAngleAxis.ZeroAxis",
                "angle {} with zero-length axis",
                angle
            );
            return Self(Vector3::zeros());
        }
        Self(axis * (angle / norm))
    }

    /// Rotation angle in radians.
    pub fn angle(&self) -> f64 {
        self.0.norm()
    }

    /// Unit rotation axis; X for the zero rotation.
    pub fn axis(&self) -> Unit<Vector3<f64>> {
        Unit::try_new(self.0, f64::EPSILON).unwrap_or_else(Vector3::x_axis)
    }
}

/// Canonical rotation used throughout the pose tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation(pub UnitQuaternion<f64>);

impl Rotation {
    pub fn identity() -> Self {
        Self(UnitQuaternion::identity())
    }

    /// Rotation of `angle` radians about `axis`.
    pub fn from_angle_axis(angle: f64, axis: &Vector3<f64>) -> Self {
        RotationVector::from_angle_axis(angle, axis).into()
    }

    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        self.0
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        self.0.to_rotation_matrix().into_inner()
    }

    pub fn rotation_vector(&self) -> RotationVector {
        RotationVector(self.0.scaled_axis())
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<UnitQuaternion<f64>> for Rotation {
    fn from(q: UnitQuaternion<f64>) -> Self {
        Self(q)
    }
}

impl From<RotationVector> for Rotation {
    fn from(rvec: RotationVector) -> Self {
        Self(UnitQuaternion::from_scaled_axis(rvec.0))
    }
}

impl From<Rotation3<f64>> for Rotation {
    fn from(r: Rotation3<f64>) -> Self {
        Self(UnitQuaternion::from_rotation_matrix(&r))
    }
}

impl From<Matrix3<f64>> for Rotation {
    /// Malformed (non-finite, non-orthonormal or reflecting) matrices are a
    /// programmer error. When checks are non-fatal, non-finite input becomes
    /// the identity and the rest is projected onto the nearest rotation.
    fn from(m: Matrix3<f64>) -> Self {
        if !dev_assert!(
            m.iter().all(|v| v.is_finite()),
            "Rotation.FromMatrix.NonFinite",
            "{:?}",
            m
        ) {
            return Self::identity();
        }

        let orthogonality_error = (m.transpose() * m - Matrix3::identity()).norm();
        let det = m.determinant();
        let valid = orthogonality_error <= ORTHONORMALITY_TOLERANCE && det > 0.0;
        if !dev_assert!(
            valid,
            "Rotation.FromMatrix.NotOrthonormal",
            "|R^T R - I| = {:.3e}, det = {:.6}",
            orthogonality_error,
            det
        ) {
            tracing::warn!("Renormalizing malformed rotation matrix");
            return Self(UnitQuaternion::from_rotation_matrix(&project_to_rotation(&m)));
        }
        Self(normalized(UnitQuaternion::from_rotation_matrix(
            &Rotation3::from_matrix_unchecked(m),
        )))
    }
}

/// Nearest rotation to a finite matrix, with a bounded number of iterations.
/// (`max_iter == 0` means unbounded in nalgebra.)
pub(crate) fn project_to_rotation(m: &Matrix3<f64>) -> Rotation3<f64> {
    Rotation3::from_matrix_eps(m, PROJECTION_EPS, PROJECTION_MAX_ITER, Rotation3::identity())
}

const PROJECTION_EPS: f64 = 1e-9;
const PROJECTION_MAX_ITER: usize = 100;

/// Re-normalize a quaternion built from a nearly orthonormal matrix.
fn normalized(q: UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::from_quaternion(q.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_3;

    #[test]
    fn test_three_forms_agree() {
        let axis = Vector3::new(1.0, -2.0, 0.5);
        let angle = FRAC_PI_3;

        let from_rvec: Rotation = RotationVector::from_angle_axis(angle, &axis).into();
        let from_quat: Rotation =
            UnitQuaternion::from_axis_angle(&Unit::new_normalize(axis), angle).into();
        let from_matrix: Rotation = from_quat.matrix().into();

        assert_relative_eq!(from_rvec.matrix(), from_quat.matrix(), epsilon = 1e-9);
        assert_relative_eq!(from_matrix.matrix(), from_quat.matrix(), epsilon = 1e-9);
    }

    #[test]
    fn test_zero_rotation_vector() {
        let rvec = RotationVector::new(Vector3::zeros());
        assert_eq!(rvec.angle(), 0.0);
        assert_eq!(rvec.axis(), Vector3::x_axis());

        let r: Rotation = rvec.into();
        assert_relative_eq!(r.matrix(), Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_angle_axis_normalizes_axis() {
        let rvec = RotationVector::from_angle_axis(0.5, &Vector3::new(0.0, 0.0, 10.0));
        assert_relative_eq!(rvec.0, Vector3::new(0.0, 0.0, 0.5), epsilon = 1e-12);
    }

    #[test]
    #[cfg_attr(
        all(debug_assertions, not(feature = "shipping")),
        should_panic(expected = "Rotation.FromMatrix.NotOrthonormal")
    )]
    fn test_malformed_matrix() {
        let scaled = Matrix3::identity() * 2.0;
        let r: Rotation = scaled.into();
        assert_relative_eq!(r.matrix(), Matrix3::identity(), epsilon = 1e-9);
    }

    #[test]
    #[cfg_attr(
        all(debug_assertions, not(feature = "shipping")),
        should_panic(expected = "Rotation.FromMatrix.NonFinite")
    )]
    fn test_nan_matrix_degrades_to_identity() {
        let r: Rotation = Matrix3::from_element(f64::NAN).into();
        assert_relative_eq!(r.matrix(), Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    #[cfg_attr(
        all(debug_assertions, not(feature = "shipping")),
        should_panic(expected = "Rotation.FromMatrix.NotOrthonormal")
    )]
    fn test_zero_matrix_degrades_to_rotation() {
        let r: Rotation = Matrix3::zeros().into();
        assert!(r.matrix().iter().all(|v| v.is_finite()));
        assert_relative_eq!(r.matrix(), Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_projection_is_bounded_on_reflection() {
        let reflection = Matrix3::from_diagonal(&Vector3::new(1.0, 1.0, -1.0));
        let projected = project_to_rotation(&reflection);
        assert!(projected.matrix().iter().all(|v| v.is_finite()));
    }
}
