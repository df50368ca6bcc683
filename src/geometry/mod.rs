//! Geometry utilities: SE3 transforms and rotation input forms.

pub mod rotation;
pub mod se3;

pub use rotation::{Rotation, RotationVector};
pub use se3::SE3;
