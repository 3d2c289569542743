//! Broad-phase spatial index
//!
//! The query engine asks the broad phase for candidate ids near a box, then
//! runs the exact overlap test on those. Swapping the index changes cost,
//! not results: every implementation returns candidates sorted by id so the
//! first reported hit is the same whichever index is in use.

use std::collections::{BTreeSet, HashMap};

use crate::physics::bounds::BoundingVolume;
use crate::physics::collider_table::ColliderId;

/// Spatial index seam for the query engine
pub trait BroadPhase: Send + Sync {
    /// Start tracking `id` with the given volume
    fn insert(&mut self, id: ColliderId, volume: &BoundingVolume);

    /// Move or resize a tracked id
    fn update(&mut self, id: ColliderId, volume: &BoundingVolume);

    /// Stop tracking `id`
    fn remove(&mut self, id: ColliderId);

    /// Ids that might overlap `volume`, ascending, without duplicates
    ///
    /// May return ids that do not overlap; must never omit one that does.
    fn candidates(&self, volume: &BoundingVolume) -> Vec<ColliderId>;

    /// Forget every id
    fn clear(&mut self);

    /// Number of tracked ids
    fn len(&self) -> usize;

    /// Whether nothing is tracked
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exhaustive index: every tracked id is a candidate
#[derive(Debug, Default)]
pub struct LinearBroadPhase {
    ids: BTreeSet<ColliderId>,
}

impl LinearBroadPhase {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }
}

impl BroadPhase for LinearBroadPhase {
    fn insert(&mut self, id: ColliderId, _volume: &BoundingVolume) {
        self.ids.insert(id);
    }

    fn update(&mut self, id: ColliderId, _volume: &BoundingVolume) {
        self.ids.insert(id);
    }

    fn remove(&mut self, id: ColliderId) {
        self.ids.remove(&id);
    }

    fn candidates(&self, _volume: &BoundingVolume) -> Vec<ColliderId> {
        self.ids.iter().copied().collect()
    }

    fn clear(&mut self) {
        self.ids.clear();
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

type Cell = (i32, i32, i32);

/// Inclusive range of grid cells covered by a volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    min: Cell,
    max: Cell,
}

impl CellRange {
    fn cell_count(&self) -> u64 {
        let span = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1).max(0).unsigned_abs();
        span(self.min.0, self.max.0)
            .saturating_mul(span(self.min.1, self.max.1))
            .saturating_mul(span(self.min.2, self.max.2))
    }

    fn cells(self) -> impl Iterator<Item = Cell> {
        (self.min.0..=self.max.0).flat_map(move |x| {
            (self.min.1..=self.max.1)
                .flat_map(move |y| (self.min.2..=self.max.2).map(move |z| (x, y, z)))
        })
    }
}

/// Where a tracked id lives in the grid
#[derive(Debug, Clone, Copy)]
enum Placement {
    Cells(CellRange),
    Overflow,
}

/// Uniform hash grid
///
/// Each volume is bucketed into every cubic cell it touches. Volumes that
/// would touch more than `max_cells_per_volume` cells (the ground slab, for
/// instance) go to an overflow list that is returned with every query.
#[derive(Debug)]
pub struct GridBroadPhase {
    cell_size: f32,
    max_cells_per_volume: u64,
    cells: HashMap<Cell, Vec<ColliderId>>,
    placements: HashMap<ColliderId, Placement>,
    overflow: BTreeSet<ColliderId>,
}

impl GridBroadPhase {
    /// Create an empty grid
    pub fn new(cell_size: f32, max_cells_per_volume: usize) -> Self {
        Self {
            cell_size,
            max_cells_per_volume: max_cells_per_volume.max(1) as u64,
            cells: HashMap::new(),
            placements: HashMap::new(),
            overflow: BTreeSet::new(),
        }
    }

    /// Ids that did not fit the cell budget
    pub fn overflow_count(&self) -> usize {
        self.overflow.len()
    }

    /// Number of non-empty cells
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, value: f32) -> i32 {
        (value / self.cell_size).floor() as i32
    }

    fn range_of(&self, volume: &BoundingVolume) -> CellRange {
        let min = volume.min();
        let max = volume.max();
        CellRange {
            min: (self.cell_of(min.x), self.cell_of(min.y), self.cell_of(min.z)),
            max: (self.cell_of(max.x), self.cell_of(max.y), self.cell_of(max.z)),
        }
    }

    fn place(&mut self, id: ColliderId, volume: &BoundingVolume) {
        let range = self.range_of(volume);
        if range.cell_count() > self.max_cells_per_volume {
            self.overflow.insert(id);
            self.placements.insert(id, Placement::Overflow);
            return;
        }

        for cell in range.cells() {
            self.cells.entry(cell).or_default().push(id);
        }
        self.placements.insert(id, Placement::Cells(range));
    }

    fn unplace(&mut self, id: ColliderId) {
        match self.placements.remove(&id) {
            Some(Placement::Cells(range)) => {
                for cell in range.cells() {
                    if let Some(bucket) = self.cells.get_mut(&cell) {
                        bucket.retain(|other| *other != id);
                        if bucket.is_empty() {
                            self.cells.remove(&cell);
                        }
                    }
                }
            }
            Some(Placement::Overflow) => {
                self.overflow.remove(&id);
            }
            None => {}
        }
    }
}

impl BroadPhase for GridBroadPhase {
    fn insert(&mut self, id: ColliderId, volume: &BoundingVolume) {
        self.unplace(id);
        self.place(id, volume);
    }

    fn update(&mut self, id: ColliderId, volume: &BoundingVolume) {
        if let Some(Placement::Cells(current)) = self.placements.get(&id) {
            if *current == self.range_of(volume) {
                return;
            }
        }
        self.unplace(id);
        self.place(id, volume);
    }

    fn remove(&mut self, id: ColliderId) {
        self.unplace(id);
    }

    fn candidates(&self, volume: &BoundingVolume) -> Vec<ColliderId> {
        let range = self.range_of(volume);
        if range.cell_count() > self.max_cells_per_volume {
            return self.placements.keys().copied().collect::<BTreeSet<_>>().into_iter().collect();
        }

        let mut found: BTreeSet<ColliderId> = self.overflow.clone();
        for cell in range.cells() {
            if let Some(bucket) = self.cells.get(&cell) {
                found.extend(bucket.iter().copied());
            }
        }
        found.into_iter().collect()
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.placements.clear();
        self.overflow.clear();
    }

    fn len(&self) -> usize {
        self.placements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::physics::collider_table::ColliderTable;

    fn ids(n: usize) -> Vec<ColliderId> {
        let mut table = ColliderTable::new();
        (0..n)
            .map(|_| table.register(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0), false).unwrap())
            .collect()
    }

    fn unit_at(x: f32, y: f32) -> BoundingVolume {
        BoundingVolume::from_size(Vec3::new(x, y, 0.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_linear_returns_everything_in_order() {
        let ids = ids(3);
        let mut linear = LinearBroadPhase::new();
        linear.insert(ids[2], &unit_at(0.0, 0.0));
        linear.insert(ids[0], &unit_at(100.0, 0.0));
        linear.insert(ids[1], &unit_at(-100.0, 0.0));

        assert_eq!(linear.candidates(&unit_at(0.0, 0.0)), ids);

        linear.remove(ids[1]);
        assert_eq!(linear.len(), 2);
    }

    #[test]
    fn test_grid_filters_distant_volumes() {
        let ids = ids(2);
        let mut grid = GridBroadPhase::new(2.0, 64);
        grid.insert(ids[0], &unit_at(0.0, 0.0));
        grid.insert(ids[1], &unit_at(40.0, 0.0));

        assert_eq!(grid.candidates(&unit_at(0.5, 0.0)), vec![ids[0]]);
        assert_eq!(grid.candidates(&unit_at(40.5, 0.0)), vec![ids[1]]);
        assert!(grid.candidates(&unit_at(20.0, 0.0)).is_empty());
    }

    #[test]
    fn test_grid_tracks_updates_and_removal() {
        let ids = ids(1);
        let mut grid = GridBroadPhase::new(2.0, 64);
        grid.insert(ids[0], &unit_at(0.0, 0.0));

        grid.update(ids[0], &unit_at(30.0, 0.0));
        assert!(grid.candidates(&unit_at(0.0, 0.0)).is_empty());
        assert_eq!(grid.candidates(&unit_at(30.0, 0.0)), vec![ids[0]]);

        grid.remove(ids[0]);
        assert!(grid.is_empty());
        assert_eq!(grid.occupied_cells(), 0);
    }

    #[test]
    fn test_oversized_volume_goes_to_overflow() {
        let ids = ids(2);
        let mut grid = GridBroadPhase::new(1.0, 8);
        let ground = BoundingVolume::from_size(Vec3::new(0.0, -20.0, 0.0), Vec3::new(200.0, 1.0, 200.0));
        grid.insert(ids[0], &ground);
        grid.insert(ids[1], &unit_at(50.0, 50.0));

        assert_eq!(grid.overflow_count(), 1);
        assert_eq!(grid.candidates(&unit_at(-80.0, -19.0)), vec![ids[0]]);
        assert_eq!(grid.candidates(&unit_at(50.0, 50.0)), vec![ids[0], ids[1]]);
    }

    #[test]
    fn test_grid_candidates_are_sorted_and_unique() {
        let ids = ids(3);
        let mut grid = GridBroadPhase::new(1.0, 64);
        // Each box spans several cells shared with the others
        grid.insert(ids[2], &unit_at(0.2, 0.2));
        grid.insert(ids[0], &unit_at(0.4, 0.4));
        grid.insert(ids[1], &unit_at(0.6, 0.6));

        assert_eq!(grid.candidates(&unit_at(0.5, 0.5)), ids);
    }
}
