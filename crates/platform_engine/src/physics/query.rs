//! Query engine
//!
//! Broad phase from the configured spatial index, narrow phase with the
//! exact box overlap test. Answers "would this id's box overlap anything
//! else if it were centered here?".

use crate::core::config::{BroadPhaseKind, RegistryConfig};
use crate::physics::bounds::BoundingVolume;
use crate::physics::broad_phase::{BroadPhase, GridBroadPhase, LinearBroadPhase};
use crate::physics::collider_table::{ColliderId, ColliderTable};

/// Two-phase overlap queries over a collider table
pub struct QueryEngine {
    broad_phase: Box<dyn BroadPhase>,
}

impl QueryEngine {
    /// Create a query engine over the given spatial index
    pub fn new(broad_phase: Box<dyn BroadPhase>) -> Self {
        Self { broad_phase }
    }

    /// Create a query engine with the index named in `config`
    pub fn from_config(config: &RegistryConfig) -> Self {
        let broad_phase: Box<dyn BroadPhase> = match config.broad_phase {
            BroadPhaseKind::Linear => Box::new(LinearBroadPhase::new()),
            BroadPhaseKind::Grid { cell_size } => {
                Box::new(GridBroadPhase::new(cell_size, config.grid_max_cells_per_volume))
            }
        };
        Self::new(broad_phase)
    }

    /// Start tracking a newly registered volume
    pub fn track(&mut self, id: ColliderId, volume: &BoundingVolume) {
        self.broad_phase.insert(id, volume);
    }

    /// Follow a moved or resized volume
    pub fn retrack(&mut self, id: ColliderId, volume: &BoundingVolume) {
        self.broad_phase.update(id, volume);
    }

    /// Stop tracking a released volume
    pub fn untrack(&mut self, id: ColliderId) {
        self.broad_phase.remove(id);
    }

    /// Number of volumes in the spatial index
    pub fn tracked(&self) -> usize {
        self.broad_phase.len()
    }

    /// First live volume, in registration order, that overlaps `moved`
    ///
    /// `mover` itself is always skipped. Which volume is reported when
    /// several overlap carries no meaning beyond "the earliest registered".
    pub fn first_hit(&self, table: &ColliderTable, mover: ColliderId, moved: &BoundingVolume) -> Option<ColliderId> {
        self.hits(table, mover, moved).next()
    }

    /// Every live volume overlapping `moved`, in registration order
    pub fn all_hits(&self, table: &ColliderTable, mover: ColliderId, moved: &BoundingVolume) -> Vec<ColliderId> {
        self.hits(table, mover, moved).collect()
    }

    fn hits<'a>(
        &self,
        table: &'a ColliderTable,
        mover: ColliderId,
        moved: &'a BoundingVolume,
    ) -> impl Iterator<Item = ColliderId> + 'a {
        let candidates = self.broad_phase.candidates(moved);
        log::trace!("Query for {} tests {} candidates", mover, candidates.len());

        candidates
            .into_iter()
            .filter(move |other| *other != mover)
            .filter(move |other| {
                table
                    .get(*other)
                    .is_ok_and(|entry| moved.overlaps(&entry.volume))
            })
    }
}
