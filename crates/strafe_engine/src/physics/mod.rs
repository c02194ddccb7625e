//! Physics module: the simulation a scene owns and the queries characters need
//!
//! The world is a minimal collaborator for the character controller. It
//! integrates linear velocity under gravity, keeps dynamic bodies out of
//! static geometry and answers contact tests for probe volumes.

pub mod collision;
pub mod collision_layers;
pub mod grounded;
pub mod world;

pub use collision::{Aabb, BoundingSphere, CollisionShape, ContactPoint};
pub use collision_layers::CollisionLayers;
pub use grounded::{query_ground, GroundContact, GroundTransition};
pub use world::{BodyDesc, BodyHandle, BodyKind, Contact, PhysicsError, PhysicsWorld};
