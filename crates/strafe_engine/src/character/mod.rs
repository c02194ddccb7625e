//! Character movement
//!
//! [`movement`] holds the pure velocity curves; [`CharacterController`] is
//! the component that runs them against the physics world once per tick.

pub mod controller;
pub mod movement;

pub use controller::{CharacterController, ControllerError};
pub use movement::{
    accelerate, air_acceleration, apply_friction, facing_basis, ground_acceleration, wish_direction,
    MovementTuning, WishDirectionMode,
};
