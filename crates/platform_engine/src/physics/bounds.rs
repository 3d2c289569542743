//! Axis-aligned bounding volumes
//!
//! The unit of collision for the registry. Shape (half-extents) is fixed at
//! construction; position moves freely. Rotation is never applied, even when
//! the render transform of the same object carries one.

use crate::foundation::math::Vec3;

/// Axis-aligned box described by center and half-extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    /// World-space center
    pub center: Vec3,
    /// Half the width, height and depth; every component is positive
    pub half_extents: Vec3,
}

impl BoundingVolume {
    /// Create a volume from center and half-extents
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }

    /// Create a volume from center and full size
    pub fn from_size(center: Vec3, size: Vec3) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
        }
    }

    /// Same shape, moved to `center`
    pub fn at(&self, center: Vec3) -> Self {
        Self {
            center,
            half_extents: self.half_extents,
        }
    }

    /// Full width, height and depth
    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Strict overlap test
    ///
    /// Boxes overlap iff on every axis the distance between centers is less
    /// than the sum of the half-extents. Faces that merely touch do not
    /// overlap, so a box resting exactly on another is free to slide.
    pub fn overlaps(&self, other: &BoundingVolume) -> bool {
        (0..3).all(|axis| {
            (self.center[axis] - other.center[axis]).abs()
                < self.half_extents[axis] + other.half_extents[axis]
        })
    }

    /// Whether every component of `size` is a finite positive number
    pub fn is_valid_size(size: &Vec3) -> bool {
        size.iter().all(|c| c.is_finite() && *c > 0.0)
    }
}
