//! Structural queries over the pose tree.
//!
//! Two nodes count as the same pose when they are literally the same shared
//! node, or when both carry a set [`PoseId`] and the IDs match. The second
//! rule lets separately constructed handles that stand for the same origin
//! compare equal.

use std::sync::Arc;

use tracing::debug;

use crate::geometry::SE3;

use super::pose::{NodeRef, Pose, PoseNode, chain};
use super::types::PoseId;
use super::view::PoseView;

pub(super) fn same_node(a: &NodeRef, b: &NodeRef) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }
    let id_a = a.read().id;
    let id_b = b.read().id;
    id_a.is_set() && id_a == id_b
}

impl Pose {
    /// True iff `parent` is this pose's immediate parent.
    ///
    /// Strict: a pose is never its own child, and grandparents don't count.
    pub fn is_child_of(&self, parent: &Pose) -> bool {
        self.parent_node()
            .is_some_and(|p| same_node(&p, &parent.node))
    }

    /// True iff `child`'s immediate parent is this pose.
    pub fn is_parent_of(&self, child: &Pose) -> bool {
        child.is_child_of(self)
    }

    /// True iff `ancestor` appears anywhere above this pose.
    pub fn is_descendant_of(&self, ancestor: &Pose) -> bool {
        self.parent_node()
            .is_some_and(|p| chain(&p).any(|n| same_node(&n, &ancestor.node)))
    }

    /// True iff both poses have the same immediate parent, or both are roots.
    pub fn has_same_parent_as(&self, other: &Pose) -> bool {
        match (self.parent_node(), other.parent_node()) {
            (None, None) => true,
            (Some(a), Some(b)) => same_node(&a, &b),
            _ => false,
        }
    }

    /// True iff both poses end in the same root.
    pub fn has_same_root_as(&self, other: &Pose) -> bool {
        same_node(&self.root_node(), &other.root_node())
    }

    pub(crate) fn root_node(&self) -> NodeRef {
        chain(&self.node)
            .last()
            .unwrap_or_else(|| Arc::clone(&self.node))
    }

    /// Read-only view of the root of this pose's tree (this pose itself if
    /// it is a root).
    pub fn find_root(&self) -> PoseView {
        PoseView::new(self.root_node())
    }

    /// ID of the root of this pose's tree.
    pub fn root_id(&self) -> PoseId {
        self.root_node().read().id
    }

    /// Number of ancestors above this pose (0 for roots).
    pub fn tree_depth(&self) -> usize {
        chain(&self.node).count() - 1
    }

    /// This pose's transform expressed in its root frame (T_root_this).
    pub fn transform_wrt_root(&self) -> SE3 {
        chain(&self.node)
            .take_while(|n| n.read().parent.is_some())
            .fold(SE3::identity(), |acc, n| {
                let t_parent_n = n.read().transform;
                t_parent_n.compose(&acc)
            })
    }

    /// A new pose equal to this one but expressed directly w.r.t. its root.
    pub fn with_respect_to_root(&self) -> Pose {
        let root = Pose {
            node: self.root_node(),
        };
        if Arc::ptr_eq(&root.node, &self.node) {
            return Pose::from_node(PoseNode {
                transform: SE3::identity(),
                name: self.name(),
                id: PoseId::UNSET,
                parent: Some(Arc::clone(&self.node)),
            });
        }
        self.expressed_in(&root)
    }

    /// This pose expressed w.r.t. `other`, or `None` when the two poses
    /// live in different trees.
    pub fn with_respect_to(&self, other: &Pose) -> Option<Pose> {
        if !self.has_same_root_as(other) {
            debug!(
                "{} and {} do not share a root ({} vs {})",
                self.label(),
                other.label(),
                self.root_id(),
                other.root_id()
            );
            return None;
        }
        Some(self.expressed_in(other))
    }

    fn expressed_in(&self, other: &Pose) -> Pose {
        let t_root_this = self.transform_wrt_root();
        let t_root_other = other.transform_wrt_root();
        let other_name = other.node.read().name.clone();
        Pose::from_node(PoseNode {
            transform: t_root_other.inverse().compose(&t_root_this),
            name: format!("{}_WRT_{}", self.name(), other_name),
            id: PoseId::UNSET,
            parent: Some(Arc::clone(&other.node)),
        })
    }

    /// True iff both poses share a root and lie within `dist_threshold` and
    /// `angle_threshold` radians of each other in that root's frame.
    pub fn is_same_as(&self, other: &Pose, dist_threshold: f64, angle_threshold: f64) -> bool {
        if !self.has_same_root_as(other) {
            return false;
        }
        self.transform_wrt_root().is_near(
            &other.transform_wrt_root(),
            dist_threshold,
            angle_threshold,
        )
    }
}
