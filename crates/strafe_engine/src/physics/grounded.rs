//! Ground detection for characters
//!
//! A character is grounded when the small probe volume under its feet
//! touches anything other than the character itself.

use crate::foundation::math::Point3;
use super::world::{BodyHandle, PhysicsError, PhysicsWorld};

/// Result of a ground query
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroundContact {
    /// Whether the probe touches ground this tick
    pub grounded: bool,
    /// One representative contact point when grounded
    pub ground_point: Option<Point3>,
}

/// Query whether `character` stands on something, using its `probe` volume
///
/// Any single contact is reported as the ground point; no ordering is
/// guaranteed when the probe touches several bodies.
pub fn query_ground(
    world: &PhysicsWorld,
    character: BodyHandle,
    probe: BodyHandle,
) -> Result<GroundContact, PhysicsError> {
    if !world.contains(character) {
        return Err(PhysicsError::UnknownBody(character));
    }

    let ground_point = world
        .contact_test(probe)?
        .into_iter()
        .find(|contact| contact.other != character)
        .map(|contact| contact.point);

    Ok(GroundContact {
        grounded: ground_point.is_some(),
        ground_point,
    })
}

/// Edge between two consecutive grounded samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundTransition {
    /// Airborne last tick, grounded now
    Landed,
    /// Grounded last tick, airborne now
    LeftGround,
    /// Grounded on both ticks
    StayedGrounded,
    /// Airborne on both ticks
    StayedAirborne,
}

impl GroundTransition {
    /// Classify the change from `previous` to `current`
    pub fn between(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => Self::Landed,
            (true, false) => Self::LeftGround,
            (true, true) => Self::StayedGrounded,
            (false, false) => Self::StayedAirborne,
        }
    }
}
