//! Identity types for poses and pose origins.

use serde::{Deserialize, Serialize};

/// Identity of a pose, independent of where it sits in the tree.
///
/// IDs correlate poses across logs, serialization and lookups; they play no
/// part in transform math. `0` means "unset": default-constructed and copied
/// poses carry it until someone assigns a real ID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoseId(pub u32);

impl PoseId {
    /// The unset sentinel.
    pub const UNSET: PoseId = PoseId(0);

    /// Create a new PoseId with the given value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn is_set(&self) -> bool {
        *self != Self::UNSET
    }
}

impl std::fmt::Display for PoseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Identity of a pose origin. An origin's ID is the ID of its root pose, so
/// a pose's root ID is directly comparable with origin IDs.
pub type PoseOriginId = PoseId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unset() {
        assert_eq!(PoseId::default(), PoseId::UNSET);
        assert!(!PoseId::default().is_set());
        assert!(PoseId::new(1).is_set());
    }

    #[test]
    fn test_pose_id_display() {
        assert_eq!(format!("{}", PoseId::new(17)), "P17");
    }

    #[test]
    fn test_id_as_hashmap_key() {
        use std::collections::HashMap;

        let mut map: HashMap<PoseOriginId, &str> = HashMap::new();
        map.insert(PoseId::new(1), "first");
        map.insert(PoseId::new(2), "second");

        assert_eq!(map.get(&PoseId::new(1)), Some(&"first"));
        assert_eq!(map.get(&PoseId::new(3)), None);
    }
}
