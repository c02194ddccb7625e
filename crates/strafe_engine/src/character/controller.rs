//! Character motion controller
//!
//! Each physics tick, in order:
//! 1. read the body's velocity and poll the ground probe
//! 2. fire the landing sound on a fresh landing
//! 3. build the wish direction from the movement actions
//! 4. run the ground or air curve
//! 5. add the jump impulse when jumping from the ground
//! 6. write the velocity back
//!
//! The probe reaches below the feet, so it keeps touching the ground for a
//! few ticks after takeoff. Until a jump stops rising the character counts
//! as airborne, which keeps a held jump key to one impulse per takeoff.

use thiserror::Error;

use crate::audio::AudioSink;
use crate::core::config::CharacterConfig;
use crate::debug::{DebugColor, DebugDrawSystem};
use crate::foundation::math::{Point3, Vec3};
use crate::input::{InputAction, InputSource};
use crate::physics::{query_ground, BodyHandle, GroundContact, GroundTransition, PhysicsError, PhysicsWorld};
use crate::scene::{Component, ComponentError, SceneContext};
use super::movement::{air_acceleration, ground_acceleration, wish_direction, MovementTuning, WishDirectionMode};

/// Colour of the ground probe debug sphere
const PROBE_DEBUG_COLOR: DebugColor = DebugColor::new(0.0, 0.0, 1.0, 1.0);

/// Character controller errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// The body or probe handle no longer resolves
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    /// Tuning or probe settings rejected
    #[error("Invalid character configuration: {0}")]
    InvalidTuning(String),
}

/// Drives one character body with quake-style movement
#[derive(Debug, Clone)]
pub struct CharacterController {
    body: BodyHandle,
    probe: BodyHandle,
    tuning: MovementTuning,
    probe_distance: f32,
    grounded: bool,
    ground_point: Option<Point3>,
    jumping: bool,
    yaw: f32,
    wish_mode: WishDirectionMode,
    sound_effects_enabled: bool,
    landing_sound: String,
    debug_draw_probe: bool,
}

impl CharacterController {
    /// Wrap an existing body and ground probe
    pub fn new(body: BodyHandle, probe: BodyHandle, config: &CharacterConfig) -> Result<Self, ControllerError> {
        config.validate().map_err(ControllerError::InvalidTuning)?;

        Ok(Self {
            body,
            probe,
            tuning: config.tuning,
            probe_distance: config.probe_distance,
            grounded: false,
            ground_point: None,
            jumping: false,
            yaw: 0.0,
            wish_mode: config.wish_mode,
            sound_effects_enabled: config.sound_effects_enabled,
            landing_sound: config.landing_sound.clone(),
            debug_draw_probe: config.debug_draw_probe,
        })
    }

    /// Create the ground probe at the bottom of `body` and wrap both
    ///
    /// The probe is a sphere of radius `probe_distance` centred on the
    /// lowest point of the body's shape.
    pub fn attach(world: &mut PhysicsWorld, body: BodyHandle, config: &CharacterConfig) -> Result<Self, ControllerError> {
        config.validate().map_err(ControllerError::InvalidTuning)?;

        let feet = Vec3::new(0.0, -world.shape(body)?.half_height(), 0.0);
        let probe = world.add_probe(body, feet, config.probe_distance)?;
        Self::new(body, probe, config)
    }

    /// Character body handle
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Ground probe handle
    pub fn probe(&self) -> BodyHandle {
        self.probe
    }

    /// Grounded flag from the last tick
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Ground contact from the last tick
    pub fn ground_point(&self) -> Option<Point3> {
        self.ground_point
    }

    /// Whether the character is still rising from its last jump
    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    /// Facing yaw in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Set the facing yaw, usually from the view camera
    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }

    /// Current tuning
    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    /// Replace the tuning after validating it
    pub fn set_tuning(&mut self, tuning: MovementTuning) -> Result<(), ControllerError> {
        tuning.validate().map_err(ControllerError::InvalidTuning)?;
        self.tuning = tuning;
        Ok(())
    }

    /// Switch between facing-relative and absolute-axis movement
    pub fn set_wish_mode(&mut self, mode: WishDirectionMode) {
        self.wish_mode = mode;
    }

    /// Enable or disable the landing sound
    pub fn set_sound_effects_enabled(&mut self, enabled: bool) {
        self.sound_effects_enabled = enabled;
    }

    /// Enable or disable the probe debug sphere
    pub fn set_debug_draw_probe(&mut self, enabled: bool) {
        self.debug_draw_probe = enabled;
    }

    /// Run one movement tick and return the velocity written to the body
    pub fn physics_tick(
        &mut self,
        world: &mut PhysicsWorld,
        input: &dyn InputSource,
        audio: &mut dyn AudioSink,
        delta_time: f32,
    ) -> Result<Vec3, ControllerError> {
        let previous = world.linear_velocity(self.body)?;
        let mut ground = query_ground(world, self.body, self.probe)?;
        if self.jumping {
            if previous.y > 0.0 {
                ground = GroundContact::default();
            } else {
                self.jumping = false;
            }
        }

        if GroundTransition::between(self.grounded, ground.grounded) == GroundTransition::Landed {
            log::debug!("Character landed at {:?}", ground.ground_point);
            if self.sound_effects_enabled {
                audio.play_sound_effect(&self.landing_sound);
            }
        }
        self.grounded = ground.grounded;
        self.ground_point = ground.ground_point;

        let wish = wish_direction(input, self.yaw, self.wish_mode);

        let mut velocity = if self.grounded {
            ground_acceleration(wish, previous, &self.tuning, delta_time)
        } else {
            air_acceleration(wish, previous, &self.tuning, delta_time)
        };

        if self.grounded && input.is_action_pressed(InputAction::Jump) {
            velocity.y += self.tuning.jump_impulse;
            self.jumping = true;
        }

        log::trace!("Character velocity {:?} -> {:?} (grounded: {})", previous, velocity, self.grounded);
        world.set_linear_velocity(self.body, velocity)?;
        Ok(velocity)
    }

    /// Queue the probe debug sphere when enabled
    pub fn draw_debug(&self, world: &PhysicsWorld, draw: &mut DebugDrawSystem) -> Result<(), ControllerError> {
        if !self.debug_draw_probe {
            return Ok(());
        }

        let center = world.world_position(self.probe)?;
        draw.draw_sphere(center.coords, self.probe_distance, PROBE_DEBUG_COLOR, 0.0);
        Ok(())
    }
}

impl Component for CharacterController {
    fn on_physics_update(&mut self, ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
        let delta_time = ctx.delta_time();
        let (world, frame) = ctx.split();
        self.physics_tick(world, frame.input, &mut *frame.audio, delta_time)?;
        Ok(())
    }

    fn on_render_debug_ui(&mut self, ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
        let (world, frame) = ctx.split();
        self.draw_debug(world, frame.debug_draw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundManager;
    use crate::debug::DebugShape;
    use crate::input::ActionSet;
    use crate::physics::{BodyDesc, CollisionLayers, CollisionShape};
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    struct Rig {
        world: PhysicsWorld,
        controller: CharacterController,
        sounds: SoundManager,
    }

    impl Rig {
        fn new(height: f32, config: &CharacterConfig) -> Self {
            let mut world = PhysicsWorld::new(Vec3::zeros());
            world
                .add_body(BodyDesc::fixed(
                    CollisionShape::cuboid(Vec3::new(20.0, 0.5, 20.0)),
                    Vec3::new(0.0, -0.5, 0.0),
                ))
                .unwrap();
            let body = world
                .add_body(
                    BodyDesc::dynamic(CollisionShape::sphere(0.5), Vec3::new(0.0, height, 0.0))
                        .with_layers(CollisionLayers::CHARACTER, CollisionLayers::all()),
                )
                .unwrap();
            let controller = CharacterController::attach(&mut world, body, config).unwrap();

            let mut sounds = SoundManager::new();
            sounds.register("landing", 1.0);
            Self { world, controller, sounds }
        }

        fn tick(&mut self, input: ActionSet) -> Result<Vec3, ControllerError> {
            self.controller.physics_tick(&mut self.world, &input, &mut self.sounds, DT)
        }

        fn teleport(&mut self, height: f32) {
            self.world
                .set_world_position(self.controller.body(), Vec3::new(0.0, height, 0.0))
                .unwrap();
        }
    }

    #[test]
    fn test_probe_sits_under_the_feet() {
        let rig = Rig::new(0.5, &CharacterConfig::default());
        let probe = rig.world.world_position(rig.controller.probe()).unwrap();
        assert_relative_eq!(probe.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_landing_sound_fires_once_per_landing() {
        let mut rig = Rig::new(3.0, &CharacterConfig::default());

        rig.tick(ActionSet::empty()).unwrap();
        assert!(!rig.controller.is_grounded());
        assert!(rig.sounds.pending().is_empty());

        rig.teleport(0.5);
        rig.tick(ActionSet::empty()).unwrap();
        assert!(rig.controller.is_grounded());
        assert!(rig.controller.ground_point().is_some());
        assert_eq!(rig.sounds.pending().len(), 1);

        rig.tick(ActionSet::empty()).unwrap();
        assert_eq!(rig.sounds.drain().len(), 1);

        // Leave the ground and land again
        rig.teleport(3.0);
        rig.tick(ActionSet::empty()).unwrap();
        rig.teleport(0.5);
        rig.tick(ActionSet::empty()).unwrap();
        assert_eq!(rig.sounds.drain().len(), 1);
    }

    #[test]
    fn test_landing_is_silent_when_sounds_disabled() {
        let config = CharacterConfig {
            sound_effects_enabled: false,
            ..CharacterConfig::default()
        };
        let mut rig = Rig::new(0.5, &config);

        rig.tick(ActionSet::empty()).unwrap();
        assert!(rig.controller.is_grounded());
        assert!(rig.sounds.pending().is_empty());
    }

    #[test]
    fn test_jump_only_from_ground() {
        let jump = ActionSet::pressed(&[InputAction::Jump]);
        let impulse = MovementTuning::default().jump_impulse;

        let mut rig = Rig::new(0.5, &CharacterConfig::default());
        let velocity = rig.tick(jump).unwrap();
        assert_relative_eq!(velocity.y, impulse);

        let mut rig = Rig::new(3.0, &CharacterConfig::default());
        let velocity = rig.tick(jump).unwrap();
        assert_relative_eq!(velocity.y, 0.0);
    }

    #[test]
    fn test_held_jump_applies_one_impulse_per_takeoff() {
        let jump = ActionSet::pressed(&[InputAction::Jump]);
        let impulse = MovementTuning::default().jump_impulse;
        let mut rig = Rig::new(0.5, &CharacterConfig::default());

        let velocity = rig.tick(jump).unwrap();
        assert_relative_eq!(velocity.y, impulse);
        assert!(rig.controller.is_jumping());

        // The probe still overlaps the ground, but a rising jump is airborne
        for _ in 0..10 {
            let velocity = rig.tick(jump).unwrap();
            assert_relative_eq!(velocity.y, impulse);
            assert!(!rig.controller.is_grounded());
        }
        assert_eq!(rig.sounds.drain().len(), 1);

        // Once the rise stops the ground counts again and a new jump is allowed
        let body = rig.controller.body();
        rig.world.set_linear_velocity(body, Vec3::zeros()).unwrap();
        let velocity = rig.tick(jump).unwrap();
        assert!(rig.controller.is_grounded());
        assert_relative_eq!(velocity.y, impulse);
        assert_eq!(rig.sounds.drain().len(), 1);
    }

    #[test]
    fn test_velocity_is_overwritten_with_ground_friction() {
        let mut rig = Rig::new(0.5, &CharacterConfig::default());
        let body = rig.controller.body();
        rig.world.set_linear_velocity(body, Vec3::new(3.0, 0.0, 0.0)).unwrap();

        let velocity = rig.tick(ActionSet::empty()).unwrap();
        let expected = 3.0 * (1.0 - MovementTuning::default().friction * DT);
        assert_relative_eq!(velocity.x, expected, epsilon = 1e-5);
        assert_eq!(rig.world.linear_velocity(body).unwrap(), velocity);
    }

    #[test]
    fn test_air_control_uses_air_constants() {
        let mut rig = Rig::new(3.0, &CharacterConfig::default());
        let tuning = MovementTuning::default();

        let velocity = rig.tick(ActionSet::pressed(&[InputAction::MoveForward])).unwrap();
        let expected = (tuning.air_acceleration * DT).min(tuning.max_air_speed);
        assert_relative_eq!(velocity.x, expected, epsilon = 1e-5);
        assert_relative_eq!(velocity.z, 0.0);
    }

    #[test]
    fn test_yaw_turns_movement() {
        let mut rig = Rig::new(0.5, &CharacterConfig::default());
        rig.controller.set_yaw(std::f32::consts::FRAC_PI_2);

        let velocity = rig.tick(ActionSet::pressed(&[InputAction::MoveForward])).unwrap();
        assert!(velocity.z > 0.0);
        assert_relative_eq!(velocity.x, 0.0, epsilon = 1e-5);

        rig.controller.set_wish_mode(WishDirectionMode::AbsoluteAxes);
        let velocity = rig.tick(ActionSet::pressed(&[InputAction::MoveForward])).unwrap();
        assert!(velocity.x > 0.0);
    }

    #[test]
    fn test_missing_body_fails_fast() {
        let mut rig = Rig::new(0.5, &CharacterConfig::default());
        let body = rig.controller.body();
        rig.world.remove_body(body).unwrap();

        assert_eq!(
            rig.tick(ActionSet::empty()),
            Err(ControllerError::Physics(PhysicsError::UnknownBody(body)))
        );
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let mut world = PhysicsWorld::default();
        let body = world
            .add_body(BodyDesc::dynamic(CollisionShape::sphere(0.5), Vec3::zeros()))
            .unwrap();

        let config = CharacterConfig {
            probe_distance: -1.0,
            ..CharacterConfig::default()
        };
        assert!(matches!(
            CharacterController::attach(&mut world, body, &config),
            Err(ControllerError::InvalidTuning(_))
        ));

        let mut controller = CharacterController::attach(&mut world, body, &CharacterConfig::default()).unwrap();
        let bad = MovementTuning { friction: f32::INFINITY, ..MovementTuning::default() };
        assert!(controller.set_tuning(bad).is_err());
        assert_eq!(controller.tuning(), &MovementTuning::default());
    }

    #[test]
    fn test_probe_debug_sphere() {
        let mut rig = Rig::new(0.5, &CharacterConfig::default());
        let mut draw = DebugDrawSystem::new();

        rig.controller.draw_debug(&rig.world, &mut draw).unwrap();
        assert_eq!(draw.shape_count(), 0);

        rig.controller.set_debug_draw_probe(true);
        rig.controller.draw_debug(&rig.world, &mut draw).unwrap();
        let primitive = draw.primitives().next().unwrap();
        assert_eq!(primitive.color, PROBE_DEBUG_COLOR);
        match primitive.shape {
            DebugShape::Sphere { radius, .. } => assert_relative_eq!(radius, 0.25),
            ref other => panic!("unexpected shape {:?}", other),
        }

        rig.tick(ActionSet::empty()).unwrap();
        assert_relative_eq!(rig.controller.yaw(), 0.0);
    }
}
