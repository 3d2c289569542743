//! Collider table
//!
//! Source of truth for collision geometry: maps stable identifiers to
//! bounding volumes plus a static/dynamic flag.

use std::collections::BTreeMap;
use std::fmt;

use crate::foundation::math::Vec3;
use crate::physics::bounds::BoundingVolume;
use crate::physics::registry::RegistryError;

/// Opaque collider handle
///
/// Allocated from a monotonically increasing counter and never reused, so
/// ordering by id is ordering by registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColliderId(u32);

impl ColliderId {
    /// Get the raw id
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collision state of one registered object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderEntry {
    /// Current world-space box
    pub volume: BoundingVolume,
    /// Expected to move every step (the player); terrain is static
    pub is_dynamic: bool,
}

impl ColliderEntry {
    /// World-space center
    pub fn center(&self) -> Vec3 {
        self.volume.center
    }

    /// Half-extents
    pub fn half_extents(&self) -> Vec3 {
        self.volume.half_extents
    }
}

/// Id-keyed storage of collider entries, iterated in registration order
#[derive(Debug, Default)]
pub struct ColliderTable {
    entries: BTreeMap<ColliderId, ColliderEntry>,
    next_id: u32,
}

impl ColliderTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new box of full size `size` at `center`
    ///
    /// Rejects sizes with a zero, negative or non-finite component instead
    /// of clamping them.
    pub fn register(&mut self, center: Vec3, size: Vec3, is_dynamic: bool) -> Result<ColliderId, RegistryError> {
        if !BoundingVolume::is_valid_size(&size) {
            return Err(RegistryError::InvalidGeometry { size });
        }

        let id = ColliderId(self.next_id);
        self.next_id = self.next_id.checked_add(1).ok_or(RegistryError::IdSpaceExhausted)?;
        self.entries.insert(id, ColliderEntry {
            volume: BoundingVolume::from_size(center, size),
            is_dynamic,
        });

        log::debug!(
            "Registered {} collider {} at {:?} size {:?}",
            if is_dynamic { "dynamic" } else { "static" },
            id,
            center,
            size
        );
        Ok(id)
    }

    /// Replace center and size of a live entry
    ///
    /// A dead id is reported before any problem with the new size.
    pub fn update(&mut self, id: ColliderId, center: Vec3, size: Vec3) -> Result<(), RegistryError> {
        let entry = self.entries.get_mut(&id).ok_or(RegistryError::UnknownCollider(id))?;
        if !BoundingVolume::is_valid_size(&size) {
            return Err(RegistryError::InvalidGeometry { size });
        }
        entry.volume = BoundingVolume::from_size(center, size);
        Ok(())
    }

    /// Read a live entry
    pub fn get(&self, id: ColliderId) -> Result<ColliderEntry, RegistryError> {
        self.entries.get(&id).copied().ok_or(RegistryError::UnknownCollider(id))
    }

    /// Remove a live entry, returning its last state
    pub fn release(&mut self, id: ColliderId) -> Result<ColliderEntry, RegistryError> {
        let entry = self.entries.remove(&id).ok_or(RegistryError::UnknownCollider(id))?;
        log::debug!("Released collider {}", id);
        Ok(entry)
    }

    /// Whether `id` is live
    pub fn contains(&self, id: ColliderId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no live entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = (ColliderId, &ColliderEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }
}
