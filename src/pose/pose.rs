//! Pose - a node in a forest of rigid 3D transforms.
//!
//! A [`Pose`] is a lightweight handle onto a shared node holding:
//! - the transform relative to the parent (`SE3`)
//! - a name and a [`PoseId`]
//! - a shared handle onto the parent node
//!
//! Children own their parent nodes through `Arc`, so a child keeps resolving
//! its ancestry after the variable that held the parent is dropped or
//! overwritten. Changes made through any handle onto a node (re-parenting,
//! new transform) are seen by every descendant of that node.
//!
//! # Copy vs move
//!
//! Copying (`Clone`) makes a new individual in the same place: a fresh node
//! with the same transform and parent, an unset ID and a `_COPY` name suffix.
//! Moving (plain Rust move, or [`Pose::take`]) relocates the same individual
//! and keeps the ID and name.

use std::fmt;
use std::sync::Arc;

use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use parking_lot::RwLock;

use crate::dev_assert;
use crate::geometry::{Rotation, SE3};

use super::types::PoseId;
use super::view::PoseView;

/// Suffix appended to the name of a copied pose.
pub const COPY_SUFFIX: &str = "_COPY";

pub(crate) type NodeRef = Arc<RwLock<PoseNode>>;

/// Shared storage behind one or more [`Pose`] handles.
#[derive(Debug)]
pub(crate) struct PoseNode {
    /// Transform from this frame to the parent frame (T_parent_this).
    pub(crate) transform: SE3,
    pub(crate) name: String,
    pub(crate) id: PoseId,
    /// None for roots.
    pub(crate) parent: Option<NodeRef>,
}

/// A rigid transform relative to an optional parent pose.
pub struct Pose {
    pub(crate) node: NodeRef,
}

impl Pose {
    /// Create a root pose with the given local rotation and translation.
    ///
    /// `rotation` may be a `Matrix3<f64>`, a `RotationVector` or a
    /// `UnitQuaternion<f64>`.
    pub fn new(rotation: impl Into<Rotation>, translation: Vector3<f64>) -> Self {
        Self::from_se3(se3_from(rotation, translation), None)
    }

    /// Create a pose expressed relative to `parent`.
    pub fn with_parent(rotation: impl Into<Rotation>, translation: Vector3<f64>, parent: &Pose) -> Self {
        Self::from_se3(se3_from(rotation, translation), Some(parent))
    }

    /// Create a named pose, optionally relative to `parent`.
    pub fn with_name(
        rotation: impl Into<Rotation>,
        translation: Vector3<f64>,
        parent: Option<&Pose>,
        name: impl Into<String>,
    ) -> Self {
        let pose = Self::from_se3(se3_from(rotation, translation), parent);
        pose.node.write().name = name.into();
        pose
    }

    /// Create a pose from a full transform, optionally relative to `parent`.
    pub fn from_se3(transform: SE3, parent: Option<&Pose>) -> Self {
        Self::from_node(PoseNode {
            transform,
            name: String::new(),
            id: PoseId::UNSET,
            parent: parent.map(|p| Arc::clone(&p.node)),
        })
    }

    /// Identity root pose with no name and an unset ID.
    pub fn identity() -> Self {
        Self::from_se3(SE3::identity(), None)
    }

    pub(crate) fn from_node(node: PoseNode) -> Self {
        Self {
            node: Arc::new(RwLock::new(node)),
        }
    }

    /// Another handle onto the same node. Unlike `clone`, this keeps the ID
    /// and any change through one handle shows through the other.
    pub(crate) fn share(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }

    /// Move-assign out of `self`: returns the pose (ID and name included)
    /// and leaves a default identity pose behind.
    pub fn take(&mut self) -> Pose {
        std::mem::take(self)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> PoseId {
        self.node.read().id
    }

    pub fn set_id(&mut self, id: PoseId) {
        self.node.write().id = id;
    }

    pub fn name(&self) -> String {
        self.node.read().name.clone()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.node.write().name = name.into();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Local transform (relative to the immediate parent)
    // ─────────────────────────────────────────────────────────────────────────

    pub fn transform(&self) -> SE3 {
        self.node.read().transform
    }

    pub fn set_transform(&mut self, transform: SE3) {
        self.node.write().transform = transform;
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.node.read().transform.translation
    }

    pub fn set_translation(&mut self, translation: Vector3<f64>) {
        self.node.write().transform.translation = translation;
    }

    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.node.read().transform.rotation
    }

    pub fn set_rotation(&mut self, rotation: impl Into<Rotation>) {
        let rotation = rotation.into().quaternion();
        self.node.write().transform.rotation = rotation;
    }

    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.node.read().transform.rotation_matrix()
    }

    /// Compose an additional rotation on the left of the local transform.
    ///
    /// R' = ΔR * R and t' = ΔR * t, i.e. the whole local transform is
    /// rotated about the parent frame's origin.
    pub fn rotate_by(&mut self, rotation: impl Into<Rotation>) {
        let delta = rotation.into().quaternion();
        let mut node = self.node.write();
        node.transform.rotation = delta * node.transform.rotation;
        node.transform.translation = delta * node.transform.translation;
    }

    /// Pre-compose the local transform with `transform`: T' = ΔT ∘ T.
    pub fn pre_compose_with(&mut self, transform: &SE3) {
        let mut node = self.node.write();
        node.transform = transform.compose(&node.transform);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Parent
    // ─────────────────────────────────────────────────────────────────────────

    /// Re-parent this pose under `parent`, keeping the local transform.
    ///
    /// Parenting a pose to itself or to one of its descendants would close a
    /// cycle; that is a programmer error and leaves the pose unchanged.
    pub fn set_parent(&mut self, parent: &Pose) -> bool {
        let creates_cycle = chain(&parent.node).any(|n| Arc::ptr_eq(&n, &self.node));
        if !dev_assert!(
            !creates_cycle,
            "Pose.SetParent.Cycle",
            "{} cannot be parented to its own descendant {}",
            self.label(),
            parent.label()
        ) {
            return false;
        }
        self.node.write().parent = Some(Arc::clone(&parent.node));
        true
    }

    /// Detach from the parent, making this pose a root.
    pub fn clear_parent(&mut self) {
        self.node.write().parent = None;
    }

    pub fn has_parent(&self) -> bool {
        self.node.read().parent.is_some()
    }

    pub fn is_root(&self) -> bool {
        !self.has_parent()
    }

    /// Read-only view of the immediate parent, `None` for roots.
    pub fn parent(&self) -> Option<PoseView> {
        self.parent_node().map(PoseView::new)
    }

    pub(crate) fn parent_node(&self) -> Option<NodeRef> {
        self.node.read().parent.clone()
    }

    /// "name(id)" for log messages.
    pub(crate) fn label(&self) -> String {
        let node = self.node.read();
        format!("{}({})", node.name, node.id)
    }
}

/// Iterate from `start` up to its root, `start` included.
pub(crate) fn chain(start: &NodeRef) -> impl Iterator<Item = NodeRef> {
    std::iter::successors(Some(Arc::clone(start)), |node| node.read().parent.clone())
}

fn se3_from(rotation: impl Into<Rotation>, translation: Vector3<f64>) -> SE3 {
    SE3 {
        rotation: rotation.into().quaternion(),
        translation,
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Clone for Pose {
    /// Copy: same transform and parent, fresh (unset) ID, suffixed name.
    fn clone(&self) -> Self {
        let node = self.node.read();
        let copy = PoseNode {
            transform: node.transform,
            name: format!("{}{}", node.name, COPY_SUFFIX),
            id: PoseId::UNSET,
            parent: node.parent.clone(),
        };
        drop(node);
        Self::from_node(copy)
    }
}

impl fmt::Debug for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent_id = self.parent_node().map(|p| p.read().id);
        let node = self.node.read();
        f.debug_struct("Pose")
            .field("id", &node.id)
            .field("name", &node.name)
            .field("transform", &node.transform)
            .field("parent", &parent_id)
            .finish()
    }
}
