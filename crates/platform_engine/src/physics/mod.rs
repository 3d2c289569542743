//! Physics module: the collision registry
//!
//! World boxes are drawn as instanced geometry with no per-object engine
//! collider, so collision lives here instead: axis-aligned boxes keyed by
//! stable ids, a render transform per id, and a two-phase overlap query
//! used by movers to test a position before committing to it.
//!
//! # Module Organization
//!
//! - [`bounds`] - Axis-aligned bounding volume and the overlap test
//! - [`collider_table`] - Id allocation and collision geometry storage
//! - [`transform_cache`] - Render transforms, independent of collision
//! - [`broad_phase`] - Swappable spatial index (linear scan, hash grid)
//! - [`query`] - Broad phase + narrow phase queries
//! - [`registry`] - The facade every collaborator talks to

pub mod bounds;
pub mod collider_table;
pub mod transform_cache;
pub mod broad_phase;
pub mod query;
pub mod registry;

pub use bounds::BoundingVolume;
pub use collider_table::{ColliderEntry, ColliderId, ColliderTable};
pub use transform_cache::TransformCache;
pub use broad_phase::{BroadPhase, GridBroadPhase, LinearBroadPhase};
pub use query::QueryEngine;
pub use registry::{CollisionRegistry, RegistryError};
