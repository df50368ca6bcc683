//! PoseView - read-only handle onto a pose somebody else owns.
//!
//! Ancestry queries ([`Pose::parent`], [`Pose::find_root`]) hand out views
//! rather than [`Pose`] handles. The nodes they point at belong to other
//! poses, often origins held by a `PoseOriginList`, so the view carries
//! getters only and no mutator can reach them through it.
//!
//! ```compile_fail
//! use nalgebra::Vector3;
//! use rust_posetree::geometry::Rotation;
//! use rust_posetree::{Pose, PoseId};
//!
//! let root = Pose::identity();
//! let child = Pose::with_parent(Rotation::identity(), Vector3::x(), &root);
//! child.find_root().set_id(PoseId::new(42));
//! ```

use std::fmt;

use nalgebra::{Matrix3, UnitQuaternion, Vector3};

use crate::geometry::SE3;

use super::pose::{NodeRef, Pose};
use super::tree::same_node;
use super::types::PoseId;

/// Read-only handle onto a node in the pose tree.
#[derive(Clone)]
pub struct PoseView {
    node: NodeRef,
}

impl PoseView {
    pub(crate) fn new(node: NodeRef) -> Self {
        Self { node }
    }

    pub fn id(&self) -> PoseId {
        self.node.read().id
    }

    pub fn name(&self) -> String {
        self.node.read().name.clone()
    }

    /// Transform relative to this node's own parent.
    pub fn transform(&self) -> SE3 {
        self.node.read().transform
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.node.read().transform.translation
    }

    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.node.read().transform.rotation
    }

    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.node.read().transform.rotation_matrix()
    }

    pub fn has_parent(&self) -> bool {
        self.node.read().parent.is_some()
    }

    pub fn is_root(&self) -> bool {
        !self.has_parent()
    }

    pub fn parent(&self) -> Option<PoseView> {
        self.node.read().parent.clone().map(PoseView::new)
    }

    /// True iff this view points at `pose`'s node (or one with the same set ID).
    pub fn refers_to(&self, pose: &Pose) -> bool {
        same_node(&self.node, &pose.node)
    }
}

impl fmt::Debug for PoseView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.read();
        f.debug_struct("PoseView")
            .field("id", &node.id)
            .field("name", &node.name)
            .finish()
    }
}
