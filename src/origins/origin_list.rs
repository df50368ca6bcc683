//! PoseOriginList - registry of the robot's coordinate frames.
//!
//! Every time the robot loses localization (picked up, kidnapped,
//! delocalized) a new origin is added and becomes current; anything seen
//! afterwards is parented to it. When the robot later recognizes something it
//! saw in an older frame, [`PoseOriginList::rejigger`] hangs the current frame
//! under the older one and [`PoseOriginList::flatten`] removes the
//! intermediate hops, so every registered origin is at most one step from its
//! root.
//!
//! Origins are never removed.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::PoseOriginListConfig;
use crate::dev_assert;
use crate::error::{PoseGraphError, Result};
use crate::geometry::SE3;
use crate::pose::{Pose, PoseId, PoseOriginId};

/// Registry mapping origin IDs to root poses, with one current origin.
pub struct PoseOriginList {
    origins: BTreeMap<PoseOriginId, Pose>,
    current_id: PoseOriginId,
    next_id: u32,
    config: PoseOriginListConfig,
    /// Returned by lookups that miss when checks are non-fatal.
    unknown_origin: Pose,
}

impl PoseOriginList {
    /// Never issued for a registered origin.
    pub const UNKNOWN_ORIGIN_ID: PoseOriginId = PoseId::UNSET;

    /// Create an empty list.
    pub fn new() -> Self {
        Self::with_config(PoseOriginListConfig::default())
    }

    pub fn with_config(config: PoseOriginListConfig) -> Self {
        let next_id = if dev_assert!(
            config.first_origin_id != Self::UNKNOWN_ORIGIN_ID.0,
            "PoseOriginList.Config.FirstIdIsUnknown"
        ) {
            config.first_origin_id
        } else {
            1
        };

        let mut unknown_origin = Pose::identity();
        unknown_origin.set_name("UnknownOrigin");

        Self {
            origins: BTreeMap::new(),
            current_id: Self::UNKNOWN_ORIGIN_ID,
            next_id,
            config,
            unknown_origin,
        }
    }

    /// Number of registered origins.
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Registered origins in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (PoseOriginId, &Pose)> {
        self.origins.iter().map(|(id, pose)| (*id, pose))
    }

    /// Register a new root with a fresh ID and make it the current origin.
    pub fn add_new_origin(&mut self) -> PoseOriginId {
        let id = self.allocate_id();
        self.insert_origin(id);
        self.current_id = id;

        info!(
            "Added new pose origin {} ({} origins total)",
            id,
            self.origins.len()
        );
        id
    }

    /// Register a root under a caller-chosen ID, e.g. when restoring a saved
    /// session.
    ///
    /// The current origin is left alone unless the list was empty. Adding an
    /// ID that is already registered (or the unknown ID) is a programmer
    /// error and leaves the list untouched.
    pub fn add_origin_with_id(&mut self, id: PoseOriginId) -> bool {
        if !dev_assert!(
            id != Self::UNKNOWN_ORIGIN_ID,
            "PoseOriginList.AddOriginWithID.UnknownID"
        ) {
            return false;
        }
        if !dev_assert!(
            !self.origins.contains_key(&id),
            "PoseOriginList.AddOriginWithID.IDAlreadyExists",
            "origin {} already registered",
            id
        ) {
            return false;
        }

        self.insert_origin(id);
        if self.current_id == Self::UNKNOWN_ORIGIN_ID {
            self.current_id = id;
        }

        debug!("Added pose origin {} with explicit ID", id);
        true
    }

    pub fn contains_origin_id(&self, id: PoseOriginId) -> bool {
        self.origins.contains_key(&id)
    }

    /// Root pose registered under `id`.
    ///
    /// Check [`Self::contains_origin_id`] first; a miss is a programmer
    /// error and yields an unregistered identity root when checks are
    /// non-fatal.
    pub fn get_origin_by_id(&self, id: PoseOriginId) -> &Pose {
        match self.origins.get(&id) {
            Some(origin) => origin,
            None => {
                dev_assert!(
                    false,
                    "PoseOriginList.GetOriginByID.InvalidID",
                    "origin {} not registered",
                    id
                );
                &self.unknown_origin
            }
        }
    }

    pub fn try_get_origin_by_id(&self, id: PoseOriginId) -> Option<&Pose> {
        self.origins.get(&id)
    }

    /// ID of the current origin; `UNKNOWN_ORIGIN_ID` while the list is empty.
    pub fn current_origin_id(&self) -> PoseOriginId {
        self.current_id
    }

    pub fn current_origin(&self) -> &Pose {
        self.get_origin_by_id(self.current_id)
    }

    /// ID of the registered origin at the root of `pose`'s tree, or
    /// `UNKNOWN_ORIGIN_ID` if that root isn't registered here.
    pub fn origin_id_of(&self, pose: &Pose) -> PoseOriginId {
        let root_id = pose.root_id();
        if self.origins.contains_key(&root_id) {
            root_id
        } else {
            Self::UNKNOWN_ORIGIN_ID
        }
    }

    /// Hang the current origin under `new_origin_id` and make that the
    /// current origin.
    ///
    /// `current_wrt_new` is the current origin's pose expressed in the new
    /// origin's frame. Everything parented (directly or not) to the old
    /// current origin now resolves to the new origin as its root.
    pub fn rejigger(&mut self, new_origin_id: PoseOriginId, current_wrt_new: &SE3) -> Result<()> {
        let old_id = self.current_id;
        if new_origin_id == old_id {
            return Err(PoseGraphError::AlreadyCurrent(new_origin_id));
        }
        let new_origin = self
            .origins
            .get(&new_origin_id)
            .ok_or(PoseGraphError::UnknownOrigin(new_origin_id))?
            .share();
        if !new_origin.is_root() {
            return Err(PoseGraphError::OriginNotRoot(new_origin_id));
        }

        let current = self
            .origins
            .get_mut(&old_id)
            .ok_or(PoseGraphError::UnknownOrigin(old_id))?;
        if !current.is_root() {
            return Err(PoseGraphError::OriginNotRoot(old_id));
        }

        let previous = current.transform();
        current.set_transform(*current_wrt_new);
        if !current.set_parent(&new_origin) {
            current.set_transform(previous);
            return Err(PoseGraphError::OriginNotRoot(new_origin_id));
        }
        self.current_id = new_origin_id;

        info!("Rejiggered pose origin {} under {}", old_id, new_origin_id);
        Ok(())
    }

    /// Re-parent every registered origin that lives under `origin_id`
    /// directly to it, keeping each one's transform w.r.t. the root.
    ///
    /// Returns how many origins were moved.
    pub fn flatten(&mut self, origin_id: PoseOriginId) -> Result<usize> {
        let root = self
            .origins
            .get(&origin_id)
            .ok_or(PoseGraphError::UnknownOrigin(origin_id))?
            .share();
        if !root.is_root() {
            return Err(PoseGraphError::OriginNotRoot(origin_id));
        }

        let mut num_flattened = 0;
        for (id, origin) in self.origins.iter_mut() {
            if *id == origin_id || origin.is_root() || origin.is_child_of(&root) {
                continue;
            }
            if !origin.has_same_root_as(&root) {
                continue;
            }

            let previous = origin.transform();
            origin.set_transform(origin.transform_wrt_root());
            if !origin.set_parent(&root) {
                origin.set_transform(previous);
                continue;
            }
            num_flattened += 1;
        }

        debug!("Flattened {} pose origins onto {}", num_flattened, origin_id);
        Ok(num_flattened)
    }

    /// Check the registry's structural invariants:
    /// - every origin is stored under its own ID
    /// - every origin is a root or the direct child of another registered
    ///   origin
    /// - the current origin (if any) is registered
    pub fn sanity_check_ownership(&self) -> bool {
        let mut ok = true;

        for (id, origin) in &self.origins {
            if origin.id() != *id {
                warn!("Origin stored under {} has ID {}", id, origin.id());
                ok = false;
            }
            if let Some(parent) = origin.parent() {
                let registered = self
                    .origins
                    .get(&parent.id())
                    .is_some_and(|p| p.is_parent_of(origin));
                if !registered {
                    warn!("Origin {} has unregistered parent {}", id, parent.id());
                    ok = false;
                }
            }
        }

        if self.current_id != Self::UNKNOWN_ORIGIN_ID && !self.origins.contains_key(&self.current_id) {
            warn!("Current origin {} is not registered", self.current_id);
            ok = false;
        }

        ok
    }

    fn allocate_id(&mut self) -> PoseOriginId {
        loop {
            let id = PoseId::new(self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            if id != Self::UNKNOWN_ORIGIN_ID && !self.origins.contains_key(&id) {
                return id;
            }
        }
    }

    fn insert_origin(&mut self, id: PoseOriginId) {
        let mut origin = Pose::identity();
        origin.set_id(id);
        origin.set_name(format!("{}{}", self.config.origin_name_prefix, id.0));
        self.origins.insert(id, origin);
    }
}

impl Default for PoseOriginList {
    fn default() -> Self {
        Self::new()
    }
}
