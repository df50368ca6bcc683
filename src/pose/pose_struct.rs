//! PoseStruct - flat, serializable snapshot of a pose.
//!
//! Poses cross process boundaries (robot state messages, saved sessions) as
//! a transform w.r.t. a registered origin plus that origin's ID. The tree
//! structure in between is not preserved.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::dev_assert;
use crate::error::{PoseGraphError, Result};
use crate::geometry::SE3;
use crate::origins::PoseOriginList;

use super::pose::Pose;
use super::types::PoseOriginId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseStruct {
    /// Translation w.r.t. the origin.
    pub translation: [f64; 3],
    /// Rotation w.r.t. the origin as a unit quaternion (w, x, y, z).
    pub rotation: [f64; 4],
    pub origin_id: PoseOriginId,
}

/// Quaternions shorter than this can't be normalized into a rotation.
const MIN_QUATERNION_NORM: f64 = 1e-6;

impl PoseStruct {
    /// Transform w.r.t. the origin. Snapshots arrive from outside the
    /// process, so non-finite values and degenerate quaternions are rejected.
    pub fn transform(&self) -> Result<SE3> {
        if !self.translation.iter().all(|v| v.is_finite()) {
            return Err(PoseGraphError::InvalidSnapshot(format!(
                "non-finite translation {:?}",
                self.translation
            )));
        }
        if !self.rotation.iter().all(|v| v.is_finite()) {
            return Err(PoseGraphError::InvalidSnapshot(format!(
                "non-finite rotation {:?}",
                self.rotation
            )));
        }

        let [qw, qx, qy, qz] = self.rotation;
        let norm = (qw * qw + qx * qx + qy * qy + qz * qz).sqrt();
        if norm < MIN_QUATERNION_NORM {
            return Err(PoseGraphError::InvalidSnapshot(format!(
                "quaternion norm {:.3e} too small",
                norm
            )));
        }
        Ok(SE3::from_quaternion(qw, qx, qy, qz, Vector3::from(self.translation)))
    }
}

impl Pose {
    /// Snapshot this pose w.r.t. its root origin.
    ///
    /// The root is expected to be registered in `origins`; if it isn't, the
    /// snapshot carries the unknown origin ID.
    pub fn to_pose_struct(&self, origins: &PoseOriginList) -> PoseStruct {
        let origin_id = origins.origin_id_of(self);
        dev_assert!(
            origin_id != PoseOriginList::UNKNOWN_ORIGIN_ID,
            "Pose.ToPoseStruct.UnregisteredOrigin",
            "{} has root {} which is not a registered origin",
            self.label(),
            self.root_id()
        );

        let t = self.transform_wrt_root();
        let q = t.rotation.quaternion();
        PoseStruct {
            translation: t.translation.into(),
            rotation: [q.w, q.i, q.j, q.k],
            origin_id,
        }
    }

    /// Rebuild a pose from a snapshot, parented to its registered origin.
    pub fn from_pose_struct(pose_struct: &PoseStruct, origins: &PoseOriginList) -> Result<Pose> {
        let origin = origins
            .try_get_origin_by_id(pose_struct.origin_id)
            .ok_or(PoseGraphError::UnknownOrigin(pose_struct.origin_id))?;
        Ok(Pose::from_se3(pose_struct.transform()?, Some(origin)))
    }
}
