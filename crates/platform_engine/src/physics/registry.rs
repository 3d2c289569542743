//! Collision registry
//!
//! The single authority for collision state in a world. It composes the
//! collider table, the render transform cache and the query engine, and
//! keeps the first two referentially consistent: an id has a transform
//! record exactly when it has a collider entry.
//!
//! The registry is an ordinary value. The world initializer creates one and
//! the step loop hands `&mut` access to each collaborator in turn; nothing
//! reaches it through global state.
//!
//! # Threading
//!
//! All calls are expected from one simulation thread, once per step. A
//! caller that queries and then commits a move does so without any
//! transaction: two movers could each see a free spot and both take it.
//! Parallel updates would need the registry behind a lock or a per-step
//! snapshot.

use thiserror::Error;

use crate::core::config::RegistryConfig;
use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::physics::bounds::BoundingVolume;
use crate::physics::broad_phase::BroadPhase;
use crate::physics::collider_table::{ColliderEntry, ColliderId, ColliderTable};
use crate::physics::query::QueryEngine;
use crate::physics::transform_cache::TransformCache;

/// Registry errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// A size component was zero, negative or not finite
    #[error("Invalid collider geometry: size {size:?} must be positive on every axis")]
    InvalidGeometry {
        /// The rejected size
        size: Vec3,
    },

    /// The id was never registered or has been released
    #[error("Unknown collider {0}")]
    UnknownCollider(ColliderId),

    /// Every identifier has been handed out; ids are never reused
    #[error("Collider identifiers exhausted")]
    IdSpaceExhausted,
}

/// Collision registry facade
pub struct CollisionRegistry {
    colliders: ColliderTable,
    transforms: TransformCache,
    query: QueryEngine,
}

impl Default for CollisionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionRegistry {
    /// Create a registry with the exhaustive broad phase
    pub fn new() -> Self {
        Self::with_config(&RegistryConfig::default())
    }

    /// Create a registry using the broad phase named in `config`
    pub fn with_config(config: &RegistryConfig) -> Self {
        log::info!("Creating collision registry with {:?} broad phase", config.broad_phase);
        Self::from_query_engine(QueryEngine::from_config(config))
    }

    /// Create a registry over a caller-supplied spatial index
    pub fn with_broad_phase(broad_phase: Box<dyn BroadPhase>) -> Self {
        Self::from_query_engine(QueryEngine::new(broad_phase))
    }

    fn from_query_engine(query: QueryEngine) -> Self {
        Self {
            colliders: ColliderTable::new(),
            transforms: TransformCache::new(),
            query,
        }
    }

    /// Register a box of full size `size` centered at `center`
    ///
    /// The render transform starts at `center` with identity rotation and
    /// unit scale (the instanced mesh is sized by its own base dimensions).
    pub fn register(&mut self, center: Vec3, size: Vec3, is_dynamic: bool) -> Result<ColliderId, RegistryError> {
        self.register_with_transform(center, size, is_dynamic, Transform::from_position(center))
    }

    /// Register a box together with its initial render transform
    pub fn register_with_transform(
        &mut self,
        center: Vec3,
        size: Vec3,
        is_dynamic: bool,
        transform: Transform,
    ) -> Result<ColliderId, RegistryError> {
        let id = self.colliders.register(center, size, is_dynamic)?;
        let entry = self.colliders.get(id)?;
        self.query.track(id, &entry.volume);
        self.transforms.set(id, transform);
        Ok(id)
    }

    /// Replace the center and size of a live collider
    pub fn update(&mut self, id: ColliderId, center: Vec3, size: Vec3) -> Result<(), RegistryError> {
        self.colliders.update(id, center, size)?;
        let entry = self.colliders.get(id)?;
        self.query.retrack(id, &entry.volume);
        Ok(())
    }

    /// Move a live collider without changing its size
    pub fn move_to(&mut self, id: ColliderId, center: Vec3) -> Result<(), RegistryError> {
        let size = self.colliders.get(id)?.volume.size();
        self.update(id, center, size)
    }

    /// Current collision state of a live collider
    pub fn get(&self, id: ColliderId) -> Result<ColliderEntry, RegistryError> {
        self.colliders.get(id)
    }

    /// Remove a collider and its render transform
    ///
    /// Every despawn path must call this, otherwise the box keeps blocking
    /// movement at its last position. The id is never handed out again.
    pub fn release(&mut self, id: ColliderId) -> Result<ColliderEntry, RegistryError> {
        let entry = self.colliders.release(id)?;
        self.transforms.remove(id);
        self.query.untrack(id);
        Ok(entry)
    }

    /// Replace the render transform of a live collider
    ///
    /// The collider's box is left untouched; callers update both each step.
    pub fn set_transform(&mut self, id: ColliderId, transform: Transform) -> Result<(), RegistryError> {
        if !self.colliders.contains(id) {
            return Err(RegistryError::UnknownCollider(id));
        }
        self.transforms.set(id, transform);
        Ok(())
    }

    /// Render transform of a live collider
    pub fn transform(&self, id: ColliderId) -> Result<Transform, RegistryError> {
        self.transforms.get(id).copied().ok_or(RegistryError::UnknownCollider(id))
    }

    /// Would `id`'s box, centered at `candidate`, overlap another collider?
    ///
    /// Returns the first overlapping id in registration order, or `None`.
    pub fn check_collision(&self, id: ColliderId, candidate: Vec3) -> Result<Option<ColliderId>, RegistryError> {
        let moved = self.colliders.get(id)?.volume.at(candidate);
        let hit = self.query.first_hit(&self.colliders, id, &moved);
        if let Some(other) = hit {
            log::trace!("{} at {:?} overlaps {}", id, candidate, other);
        }
        Ok(hit)
    }

    /// Boolean form of [`Self::check_collision`]
    pub fn would_collide(&self, id: ColliderId, candidate: Vec3) -> Result<bool, RegistryError> {
        Ok(self.check_collision(id, candidate)?.is_some())
    }

    /// Every collider that `id`'s box would overlap at `candidate`
    pub fn overlapping(&self, id: ColliderId, candidate: Vec3) -> Result<Vec<ColliderId>, RegistryError> {
        let moved = self.colliders.get(id)?.volume.at(candidate);
        Ok(self.query.all_hits(&self.colliders, id, &moved))
    }

    /// Whether `id` is live
    pub fn contains(&self, id: ColliderId) -> bool {
        self.colliders.contains(id)
    }

    /// Number of live colliders
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether no collider is live
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Live ids in registration order
    pub fn ids(&self) -> Vec<ColliderId> {
        self.colliders.iter().map(|(id, _)| id).collect()
    }

    /// Live collision state in registration order
    pub fn entries(&self) -> impl Iterator<Item = (ColliderId, &ColliderEntry)> {
        self.colliders.iter()
    }

    /// Per-instance matrices for the render layer, in registration order
    ///
    /// Hidden (zero-scale) records are included; drawing them is harmless
    /// and keeps instance indices stable.
    pub fn instance_transforms(&self) -> Vec<(ColliderId, Mat4)> {
        self.transforms
            .iter()
            .map(|(id, transform)| (id, transform.to_matrix()))
            .collect()
    }

    /// Exact overlap test between two live colliders at their current positions
    pub fn overlap_between(&self, a: ColliderId, b: ColliderId) -> Result<bool, RegistryError> {
        let a = self.colliders.get(a)?;
        let b = self.colliders.get(b)?;
        Ok(a.volume.overlaps(&b.volume))
    }

    /// Volume `id` would have at `candidate`
    pub fn moved(&self, id: ColliderId, candidate: Vec3) -> Result<BoundingVolume, RegistryError> {
        Ok(self.colliders.get(id)?.volume.at(candidate))
    }

    /// Check that both tables and the spatial index agree on the live set
    pub fn is_consistent(&self) -> bool {
        self.colliders.len() == self.transforms.len()
            && self.colliders.len() == self.query.tracked()
            && self.colliders.iter().all(|(id, _)| self.transforms.get(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BroadPhaseKind;
    use crate::foundation::math::rotation_z_degrees;

    fn half() -> Vec3 {
        Vec3::new(1.0, 1.0, 1.0)
    }

    fn registries() -> Vec<CollisionRegistry> {
        vec![
            CollisionRegistry::new(),
            CollisionRegistry::with_config(&RegistryConfig {
                broad_phase: BroadPhaseKind::Grid { cell_size: 2.0 },
                grid_max_cells_per_volume: 64,
            }),
        ]
    }

    #[test]
    fn test_no_self_collision() {
        for mut registry in registries() {
            let id = registry.register(Vec3::zeros(), half(), true).unwrap();

            for candidate in [Vec3::zeros(), Vec3::new(0.1, 0.0, 0.0), Vec3::new(-5.0, 3.0, 1.0)] {
                assert_eq!(registry.check_collision(id, candidate).unwrap(), None);
                assert!(registry.overlapping(id, candidate).unwrap().is_empty());
            }
        }
    }

    #[test]
    fn test_rejected_register_leaves_no_residue() {
        for mut registry in registries() {
            let live = registry.register(Vec3::zeros(), half(), false).unwrap();

            for size in [Vec3::new(0.0, 1.0, 1.0), Vec3::new(1.0, -2.0, 1.0), Vec3::new(f32::NAN, 1.0, 1.0)] {
                let err = registry
                    .register_with_transform(Vec3::new(0.25, 0.0, 0.0), size, true, Transform::identity())
                    .unwrap_err();
                assert!(matches!(err, RegistryError::InvalidGeometry { .. }));
            }

            assert_eq!(registry.ids(), vec![live]);
            assert_eq!(registry.instance_transforms().len(), 1);
            assert!(registry.is_consistent());

            // The index holds nothing for the rejected spot, only the live box
            let mover = registry.register(Vec3::new(10.0, 0.0, 0.0), half(), true).unwrap();
            assert_eq!(registry.overlapping(mover, Vec3::new(0.25, 0.0, 0.0)).unwrap(), vec![live]);
        }
    }

    #[test]
    fn test_overlap_is_symmetric() {
        for mut registry in registries() {
            let a = registry.register(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0), false).unwrap();
            let b = registry.register(Vec3::new(1.5, 0.5, 0.0), Vec3::new(2.0, 2.0, 2.0), false).unwrap();

            let a_center = registry.get(a).unwrap().center();
            let b_center = registry.get(b).unwrap().center();
            assert_eq!(registry.check_collision(a, a_center).unwrap(), Some(b));
            assert_eq!(registry.check_collision(b, b_center).unwrap(), Some(a));
            assert!(registry.overlap_between(a, b).unwrap());
        }
    }

    #[test]
    fn test_static_volumes_are_queried_like_dynamic_ones() {
        let mut registry = CollisionRegistry::new();
        let wall = registry.register(Vec3::zeros(), half(), false).unwrap();
        let other_wall = registry.register(Vec3::new(0.5, 0.0, 0.0), half(), false).unwrap();

        assert_eq!(registry.check_collision(wall, Vec3::zeros()).unwrap(), Some(other_wall));
    }

    #[test]
    fn test_first_hit_follows_registration_order() {
        for mut registry in registries() {
            let mover = registry.register(Vec3::new(10.0, 0.0, 0.0), half(), true).unwrap();
            let first = registry.register(Vec3::new(0.2, 0.0, 0.0), half(), false).unwrap();
            let second = registry.register(Vec3::new(-0.2, 0.0, 0.0), half(), false).unwrap();

            assert_eq!(registry.check_collision(mover, Vec3::zeros()).unwrap(), Some(first));
            assert_eq!(registry.overlapping(mover, Vec3::zeros()).unwrap(), vec![first, second]);
        }
    }

    #[test]
    fn test_register_seeds_transform() {
        let mut registry = CollisionRegistry::new();
        let id = registry.register(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 4.0, 4.0), false).unwrap();

        let transform = registry.transform(id).unwrap();
        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0));
        assert!(registry.is_consistent());
    }

    #[test]
    fn test_transform_does_not_affect_collision() {
        let mut registry = CollisionRegistry::new();
        let mover = registry.register(Vec3::new(5.0, 0.0, 0.0), half(), true).unwrap();
        let block = registry.register(Vec3::zeros(), half(), false).unwrap();

        // Rotated, then hidden: neither changes the collision box
        let rotated = Transform::from_trs(Vec3::zeros(), rotation_z_degrees(45.0), Vec3::new(3.0, 3.0, 3.0));
        registry.set_transform(block, rotated).unwrap();
        assert_eq!(registry.check_collision(mover, Vec3::new(1.2, 0.0, 0.0)).unwrap(), None);

        registry.set_transform(block, rotated.hidden()).unwrap();
        assert_eq!(registry.check_collision(mover, Vec3::new(0.5, 0.0, 0.0)).unwrap(), Some(block));
        assert!(registry.transform(block).unwrap().is_hidden());
    }

    #[test]
    fn test_release_frees_footprint_and_transform() {
        for mut registry in registries() {
            let mover = registry.register(Vec3::new(5.0, 0.0, 0.0), half(), true).unwrap();
            let enemy = registry.register(Vec3::zeros(), half(), false).unwrap();
            let bystander = registry.register(Vec3::new(0.0, 10.0, 0.0), half(), false).unwrap();

            registry.release(enemy).unwrap();

            assert_eq!(registry.check_collision(mover, Vec3::zeros()).unwrap(), None);
            assert_eq!(registry.check_collision(mover, Vec3::new(0.0, 10.0, 0.0)).unwrap(), Some(bystander));
            assert_eq!(registry.transform(enemy), Err(RegistryError::UnknownCollider(enemy)));
            assert_eq!(registry.ids(), vec![mover, bystander]);
            assert!(registry.is_consistent());
        }
    }

    #[test]
    fn test_unknown_ids_fail_everywhere() {
        let mut registry = CollisionRegistry::new();
        let id = registry.register(Vec3::zeros(), half(), false).unwrap();
        registry.release(id).unwrap();
        let unknown = Err(RegistryError::UnknownCollider(id));

        assert_eq!(registry.get(id).map(|_| ()), unknown);
        assert_eq!(registry.update(id, Vec3::zeros(), half()), unknown);
        assert_eq!(registry.check_collision(id, Vec3::zeros()).map(|_| ()), unknown);
        assert_eq!(registry.set_transform(id, Transform::identity()), unknown);
        assert_eq!(registry.release(id).map(|_| ()), unknown);
    }

    #[test]
    fn test_update_moves_volume_in_every_index() {
        for mut registry in registries() {
            let mover = registry.register(Vec3::new(-20.0, 0.0, 0.0), half(), true).unwrap();
            let block = registry.register(Vec3::zeros(), half(), false).unwrap();

            registry.move_to(block, Vec3::new(30.0, 0.0, 0.0)).unwrap();

            assert_eq!(registry.check_collision(mover, Vec3::zeros()).unwrap(), None);
            assert_eq!(registry.check_collision(mover, Vec3::new(30.5, 0.0, 0.0)).unwrap(), Some(block));
            assert_eq!(registry.get(block).unwrap().volume.size(), half());
        }
    }

    #[test]
    fn test_instance_transforms_in_registration_order() {
        let mut registry = CollisionRegistry::new();
        let a = registry.register(Vec3::new(1.0, 0.0, 0.0), half(), false).unwrap();
        let b = registry.register(Vec3::new(2.0, 0.0, 0.0), half(), false).unwrap();

        let matrices = registry.instance_transforms();
        assert_eq!(matrices.len(), 2);
        assert_eq!(matrices[0].0, a);
        assert_eq!(matrices[1].0, b);
        assert_eq!(matrices[1].1.m14, 2.0);
    }
}
