//! Pose tree: rigid transforms linked child → parent.
//!
//! This module contains:
//! - [`Pose`] - handle onto a shared node (transform, name, ID, parent)
//! - [`PoseId`] / [`PoseOriginId`] - identity types
//! - [`PoseStruct`] - serializable snapshot w.r.t. a registered origin
//! - [`PoseView`] - read-only handle returned by ancestry queries
//!
//! # Example
//!
//! ```
//! use nalgebra::Vector3;
//! use rust_posetree::geometry::RotationVector;
//! use rust_posetree::origins::PoseOriginList;
//! use rust_posetree::pose::Pose;
//!
//! let mut origins = PoseOriginList::new();
//! let world = origins.add_new_origin();
//!
//! let robot = Pose::with_parent(
//!     RotationVector::from_angle_axis(0.5, &Vector3::z()),
//!     Vector3::new(100.0, 0.0, 0.0),
//!     origins.current_origin(),
//! );
//! let cube = Pose::with_parent(
//!     RotationVector::new(Vector3::zeros()),
//!     Vector3::new(50.0, 0.0, 0.0),
//!     &robot,
//! );
//!
//! assert!(cube.has_same_root_as(&robot));
//! assert_eq!(cube.root_id(), world);
//! ```

pub mod pose;
pub mod pose_struct;
mod tree;
pub mod types;
pub mod view;

pub use pose::{COPY_SUFFIX, Pose};
pub use pose_struct::PoseStruct;
pub use types::{PoseId, PoseOriginId};
pub use view::PoseView;
