//! Quake-style velocity integration
//!
//! Pure functions from (previous velocity, wish direction, tuning, dt) to a
//! new velocity. Nothing here touches the physics world, so every curve can
//! be tested in isolation.
//!
//! The acceleration clamp only limits speed *along the wish direction*.
//! Turning the wish direction while airborne therefore keeps adding speed
//! sideways, which is what makes air strafing work.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::input::{InputAction, InputSource};

/// Acceleration curve constants for one character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Acceleration applied along the wish direction on the ground (units/s²)
    pub ground_acceleration: f32,
    /// Speed cap along the wish direction on the ground
    pub max_ground_speed: f32,
    /// Acceleration applied along the wish direction in the air
    pub air_acceleration: f32,
    /// Speed cap along the wish direction in the air
    pub max_air_speed: f32,
    /// Ground friction coefficient (1/s)
    pub friction: f32,
    /// Vertical speed added by a jump
    pub jump_impulse: f32,
}

impl MovementTuning {
    /// Check every constant is finite and non-negative
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("ground_acceleration", self.ground_acceleration),
            ("max_ground_speed", self.max_ground_speed),
            ("air_acceleration", self.air_acceleration),
            ("max_air_speed", self.max_air_speed),
            ("friction", self.friction),
            ("jump_impulse", self.jump_impulse),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("Movement tuning '{}' must be finite and non-negative, got {}", name, value));
            }
        }
        Ok(())
    }
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            ground_acceleration: 60.0,
            max_ground_speed: 6.0,
            air_acceleration: 40.0,
            max_air_speed: 1.0,
            friction: 6.0,
            jump_impulse: 4.75,
        }
    }
}

/// How movement actions map onto world directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WishDirectionMode {
    /// Forward follows the character's facing yaw
    #[default]
    FacingRelative,
    /// Forward is always +X and right is always +Z
    AbsoluteAxes,
}

/// Add speed along `wish_dir`, capped so the projected speed reaches at most `max_speed`
///
/// When the velocity already exceeds the cap along `wish_dir` the added
/// speed is negative. A zero `wish_dir` leaves the velocity untouched.
pub fn accelerate(wish_dir: Vec3, prev_velocity: Vec3, acceleration: f32, max_speed: f32, delta_time: f32) -> Vec3 {
    let projected_speed = prev_velocity.dot(&wish_dir);
    let mut wish_speed = acceleration * delta_time;

    if projected_speed + wish_speed > max_speed {
        wish_speed = max_speed - projected_speed;
    }

    prev_velocity + wish_dir * wish_speed
}

/// Scale a velocity down by `speed * friction * dt`, never reversing it
pub fn apply_friction(velocity: Vec3, friction: f32, delta_time: f32) -> Vec3 {
    let speed = velocity.norm();
    if speed == 0.0 {
        return velocity;
    }

    let drop = speed * friction * delta_time;
    velocity * ((speed - drop).max(0.0) / speed)
}

/// Ground movement: friction, then acceleration with the ground constants
pub fn ground_acceleration(wish_dir: Vec3, prev_velocity: Vec3, tuning: &MovementTuning, delta_time: f32) -> Vec3 {
    let slowed = apply_friction(prev_velocity, tuning.friction, delta_time);
    accelerate(wish_dir, slowed, tuning.ground_acceleration, tuning.max_ground_speed, delta_time)
}

/// Air movement: acceleration with the air constants, no friction
pub fn air_acceleration(wish_dir: Vec3, prev_velocity: Vec3, tuning: &MovementTuning, delta_time: f32) -> Vec3 {
    accelerate(wish_dir, prev_velocity, tuning.air_acceleration, tuning.max_air_speed, delta_time)
}

/// Horizontal forward and right vectors for a facing yaw in radians
pub fn facing_basis(yaw: f32) -> (Vec3, Vec3) {
    let (sin, cos) = yaw.sin_cos();
    (Vec3::new(cos, 0.0, sin), Vec3::new(-sin, 0.0, cos))
}

/// Unit wish direction from the movement actions, or zero when they cancel out
pub fn wish_direction(input: &dyn InputSource, yaw: f32, mode: WishDirectionMode) -> Vec3 {
    let yaw = match mode {
        WishDirectionMode::FacingRelative => yaw,
        WishDirectionMode::AbsoluteAxes => 0.0,
    };
    let (forward, right) = facing_basis(yaw);

    let mut wish = Vec3::zeros();
    if input.is_action_pressed(InputAction::MoveForward) {
        wish += forward;
    }
    if input.is_action_pressed(InputAction::MoveBack) {
        wish -= forward;
    }
    if input.is_action_pressed(InputAction::StrafeRight) {
        wish += right;
    }
    if input.is_action_pressed(InputAction::StrafeLeft) {
        wish -= right;
    }

    wish.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use crate::input::ActionSet;
    use approx::assert_relative_eq;

    fn assert_vec_eq(actual: Vec3, expected: Vec3) {
        assert_relative_eq!(actual.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(actual.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(actual.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn test_accelerate_from_rest_is_capped() {
        let velocity = accelerate(Vec3::new(1.0, 0.0, 0.0), Vec3::zeros(), 10.0, 5.0, 1.0);
        assert_vec_eq(velocity, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_accelerate_below_cap_adds_full_step() {
        let velocity = accelerate(Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), 10.0, 5.0, 0.1);
        assert_vec_eq(velocity, Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_accelerate_zero_wish_keeps_velocity() {
        let previous = Vec3::new(3.0, -2.0, 7.0);
        assert_eq!(accelerate(Vec3::zeros(), previous, 100.0, 1.0, 0.5), previous);
    }

    #[test]
    fn test_accelerate_above_cap_slows_along_wish() {
        let velocity = accelerate(Vec3::new(1.0, 0.0, 0.0), Vec3::new(8.0, 0.0, 0.0), 10.0, 5.0, 0.1);
        assert_vec_eq(velocity, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_accelerate_never_exceeds_cap_when_starting_under_it() {
        let directions = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0).normalize(),
            Vec3::new(-0.6, 0.0, 0.8),
        ];
        let velocities = [
            Vec3::zeros(),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(-4.0, 1.0, 3.0),
            Vec3::new(0.5, 0.0, -0.5),
        ];

        for wish in directions {
            for previous in velocities {
                if previous.dot(&wish) > 5.0 {
                    continue;
                }
                for delta_time in [0.001, 1.0 / 60.0, 0.1, 1.0] {
                    let velocity = accelerate(wish, previous, 40.0, 5.0, delta_time);
                    assert!(velocity.dot(&wish) <= 5.0 + 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_friction_example() {
        let velocity = apply_friction(Vec3::new(10.0, 0.0, 0.0), 2.0, 0.1);
        assert_vec_eq(velocity, Vec3::new(8.0, 0.0, 0.0));
    }

    #[test]
    fn test_friction_stops_instead_of_reversing() {
        let velocity = apply_friction(Vec3::new(1.0, 0.0, 1.0), 50.0, 1.0);
        assert_eq!(velocity, Vec3::zeros());
    }

    #[test]
    fn test_friction_on_rest_is_a_no_op() {
        assert_eq!(apply_friction(Vec3::zeros(), 6.0, 1.0 / 60.0), Vec3::zeros());
    }

    #[test]
    fn test_ground_friction_without_input_never_speeds_up() {
        let tuning = MovementTuning::default();
        let mut velocity = Vec3::new(4.0, 0.0, -3.0);
        let direction = velocity.normalize();

        for _ in 0..120 {
            let next = ground_acceleration(Vec3::zeros(), velocity, &tuning, 1.0 / 60.0);
            assert!(next.norm() <= velocity.norm());
            if next.norm() > 0.0 {
                assert_vec_eq(next.normalize(), direction);
            }
            velocity = next;
        }
        assert!(velocity.norm() < 0.01);
    }

    #[test]
    fn test_ground_acceleration_applies_friction_first() {
        let tuning = MovementTuning {
            ground_acceleration: 10.0,
            max_ground_speed: 100.0,
            friction: 2.0,
            ..MovementTuning::default()
        };
        // (10,0,0) -> friction to (8,0,0) -> +1 along x
        let velocity = ground_acceleration(Vec3::new(1.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0), &tuning, 0.1);
        assert_vec_eq(velocity, Vec3::new(9.0, 0.0, 0.0));
    }

    #[test]
    fn test_air_acceleration_approaches_cap_without_exceeding() {
        let tuning = MovementTuning::default();
        let wish = Vec3::new(1.0, 0.0, 0.0);
        let mut velocity = Vec3::zeros();
        let mut previous_speed = 0.0;

        for _ in 0..30 {
            velocity = air_acceleration(wish, velocity, &tuning, 1.0 / 120.0);
            let speed = velocity.dot(&wish);
            assert!(speed <= tuning.max_air_speed + 1e-6);
            assert!(speed >= previous_speed - 1e-6);
            previous_speed = speed;
        }
        assert_relative_eq!(previous_speed, tuning.max_air_speed, epsilon = 1e-6);
    }

    #[test]
    fn test_air_strafe_gains_speed_beyond_cap() {
        let tuning = MovementTuning::default();
        let mut velocity = Vec3::new(5.0, 0.0, 0.0);

        // Sideways wish is orthogonal to the current velocity, so the cap never bites
        for _ in 0..10 {
            velocity = air_acceleration(Vec3::new(0.0, 0.0, 1.0), velocity, &tuning, 1.0 / 60.0);
        }
        assert!(velocity.norm() > 5.0);
    }

    #[test]
    fn test_facing_basis_at_zero_and_quarter_turn() {
        let (forward, right) = facing_basis(0.0);
        assert_vec_eq(forward, Vec3::new(1.0, 0.0, 0.0));
        assert_vec_eq(right, Vec3::new(0.0, 0.0, 1.0));

        let (forward, right) = facing_basis(HALF_PI);
        assert_vec_eq(forward, Vec3::new(0.0, 0.0, 1.0));
        assert_vec_eq(right, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_wish_direction_diagonal_is_normalized() {
        let input = ActionSet::pressed(&[InputAction::MoveForward, InputAction::StrafeRight]);
        let wish = wish_direction(&input, 0.0, WishDirectionMode::FacingRelative);

        assert_relative_eq!(wish.norm(), 1.0, epsilon = 1e-6);
        assert_vec_eq(wish, Vec3::new(1.0, 0.0, 1.0).normalize());
    }

    #[test]
    fn test_wish_direction_cancelling_inputs_is_zero() {
        let input = ActionSet::pressed(&[
            InputAction::MoveForward,
            InputAction::MoveBack,
            InputAction::StrafeLeft,
            InputAction::StrafeRight,
        ]);
        assert_eq!(wish_direction(&input, 1.2, WishDirectionMode::FacingRelative), Vec3::zeros());
        assert_eq!(wish_direction(&ActionSet::empty(), 0.0, WishDirectionMode::FacingRelative), Vec3::zeros());
    }

    #[test]
    fn test_wish_direction_modes() {
        let input = ActionSet::pressed(&[InputAction::StrafeLeft]);

        let relative = wish_direction(&input, HALF_PI, WishDirectionMode::FacingRelative);
        assert_vec_eq(relative, Vec3::new(1.0, 0.0, 0.0));

        let absolute = wish_direction(&input, HALF_PI, WishDirectionMode::AbsoluteAxes);
        assert_vec_eq(absolute, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_tuning_validation() {
        assert!(MovementTuning::default().validate().is_ok());
        let tuning = MovementTuning { max_air_speed: f32::NAN, ..MovementTuning::default() };
        assert!(tuning.validate().is_err());
    }
}
