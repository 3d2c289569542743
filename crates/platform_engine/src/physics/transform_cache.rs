//! Render transform cache
//!
//! Last-known render transform per collider id. Kept apart from the
//! collider table because render transforms carry rotation and the
//! zero-scale hidden state, neither of which the collision model uses.

use std::collections::BTreeMap;

use crate::foundation::math::Transform;
use crate::physics::collider_table::ColliderId;

/// Id-keyed render transforms, iterated in registration order
///
/// Existence checks against the collider table are the registry's job; the
/// cache itself stores whatever it is given.
#[derive(Debug, Default)]
pub struct TransformCache {
    records: BTreeMap<ColliderId, Transform>,
}

impl TransformCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace the transform for `id`
    pub fn set(&mut self, id: ColliderId, transform: Transform) {
        self.records.insert(id, transform);
    }

    /// Transform for `id`, if any
    pub fn get(&self, id: ColliderId) -> Option<&Transform> {
        self.records.get(&id)
    }

    /// Drop the transform for `id`
    pub fn remove(&mut self, id: ColliderId) -> Option<Transform> {
        self.records.remove(&id)
    }

    /// Number of stored transforms
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All transforms in registration order
    pub fn iter(&self) -> impl Iterator<Item = (ColliderId, &Transform)> {
        self.records.iter().map(|(id, t)| (*id, t))
    }
}
