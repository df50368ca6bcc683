//! Configuration for the pose origin registry.

use serde::{Deserialize, Serialize};

/// Settings for [`crate::origins::PoseOriginList`].
///
/// Deserializable so it can sit inside a larger robot configuration; every
/// field falls back to its default when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseOriginListConfig {
    /// Name given to new origins; the origin ID is appended.
    pub origin_name_prefix: String,

    /// First ID handed out by `add_new_origin`. Must not be the unknown
    /// origin ID (0).
    pub first_origin_id: u32,
}

impl Default for PoseOriginListConfig {
    fn default() -> Self {
        Self {
            origin_name_prefix: "PoseOrigin".to_string(),
            first_origin_id: 1,
        }
    }
}
