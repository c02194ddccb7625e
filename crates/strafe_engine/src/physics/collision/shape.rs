//! High-level collision shape abstractions
//!
//! Shapes are stored relative to their body and placed in world space
//! on demand during contact tests.

use crate::foundation::math::Vec3;
use super::primitives::{Aabb, BoundingSphere, ContactPoint};
use serde::{Deserialize, Serialize};

/// Collision shape types (stored relative to the owning body)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionShape {
    /// A sphere with the given radius
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// An axis-aligned box with the given half extents
    Box {
        /// Half size along each axis
        half_extents: Vec3,
    },
}

impl CollisionShape {
    /// Creates a spherical collision shape with given radius
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }
    
    /// Creates an axis-aligned box from its half extents
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Box { half_extents }
    }
    
    /// Whether every dimension is finite and strictly positive
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Sphere { radius } => radius.is_finite() && *radius > 0.0,
            Self::Box { half_extents } => half_extents.iter().all(|e| e.is_finite() && *e > 0.0),
        }
    }
    
    /// Distance from the shape's center to its lowest point
    pub fn half_height(&self) -> f32 {
        match self {
            Self::Sphere { radius } => *radius,
            Self::Box { half_extents } => half_extents.y,
        }
    }
    
    /// Radius of a sphere enclosing the shape
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Self::Sphere { radius } => *radius,
            Self::Box { half_extents } => half_extents.magnitude(),
        }
    }
    
    /// Place this shape at `position` in world space
    pub fn to_world_space(&self, position: Vec3) -> WorldSpaceShape {
        match self {
            Self::Sphere { radius } => WorldSpaceShape::Sphere(BoundingSphere::new(position, *radius)),
            Self::Box { half_extents } => {
                WorldSpaceShape::Box(Aabb::from_center_extents(position, *half_extents))
            }
        }
    }
}

/// World-space collision shape (temporary, for testing only)
#[derive(Debug, Clone, Copy)]
pub enum WorldSpaceShape {
    /// World-space sphere
    Sphere(BoundingSphere),
    /// World-space box
    Box(Aabb),
}

impl WorldSpaceShape {
    /// Get center position
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Sphere(sphere) => sphere.center,
            Self::Box(aabb) => aabb.center(),
        }
    }
    
    /// Contact with another shape, normal pointing from `self` towards `other`
    pub fn contact(&self, other: &WorldSpaceShape) -> Option<ContactPoint> {
        match (self, other) {
            (Self::Sphere(a), Self::Sphere(b)) => a.contact_sphere(b),
            (Self::Sphere(sphere), Self::Box(aabb)) => sphere.contact_aabb(aabb),
            (Self::Box(aabb), Self::Sphere(sphere)) => sphere.contact_aabb(aabb).map(ContactPoint::flipped),
            (Self::Box(a), Self::Box(b)) => a.contact_aabb(b),
        }
    }
    
    /// Test if this shape intersects with another shape
    pub fn intersects(&self, other: &WorldSpaceShape) -> bool {
        self.contact(other).is_some()
    }
}
