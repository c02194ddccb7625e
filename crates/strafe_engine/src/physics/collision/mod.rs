//! Collision volumes and narrow-phase contact tests
//!
//! - [`primitives`] - Spheres, boxes and pairwise contact generation
//! - [`shape`] - Body-relative shapes placed in world space on demand

pub mod primitives;
pub mod shape;

pub use primitives::{Aabb, BoundingSphere, ContactPoint};
pub use shape::{CollisionShape, WorldSpaceShape};
