//! Per-call contexts handed to lifecycle hooks
//!
//! Hooks never reach for global state. The host builds a [`FrameContext`]
//! once per frame; the scene wraps it in a [`SceneContext`] for each hook
//! call, adding the physics world and the deferred entity command queue.

use crate::audio::AudioSink;
use crate::debug::DebugDrawSystem;
use crate::input::InputSource;
use crate::physics::PhysicsWorld;
use super::entity::Component;

/// Collaborators the host supplies for one frame
pub struct FrameContext<'f> {
    /// Seconds covered by the message being dispatched
    pub delta_time: f32,
    /// Logical action state
    pub input: &'f dyn InputSource,
    /// Sound effect requests
    pub audio: &'f mut dyn AudioSink,
    /// Debug shape sink
    pub debug_draw: &'f mut DebugDrawSystem,
}

impl<'f> FrameContext<'f> {
    /// Bundle the frame collaborators
    pub fn new(
        delta_time: f32,
        input: &'f dyn InputSource,
        audio: &'f mut dyn AudioSink,
        debug_draw: &'f mut DebugDrawSystem,
    ) -> Self {
        Self {
            delta_time,
            input,
            audio,
            debug_draw,
        }
    }
}

/// Entity spawn or removal requested during a dispatch
pub(crate) enum EntityCommand {
    Spawn {
        name: Option<String>,
        components: Vec<Box<dyn Component>>,
    },
    Remove(String),
}

/// What a component or scene hook can reach during one call
pub struct SceneContext<'a, 'f> {
    frame: &'a mut FrameContext<'f>,
    physics: &'a mut PhysicsWorld,
    commands: &'a mut Vec<EntityCommand>,
    entity: Option<&'a str>,
}

impl<'a, 'f> SceneContext<'a, 'f> {
    pub(crate) fn new(
        frame: &'a mut FrameContext<'f>,
        physics: &'a mut PhysicsWorld,
        commands: &'a mut Vec<EntityCommand>,
        entity: Option<&'a str>,
    ) -> Self {
        Self {
            frame,
            physics,
            commands,
            entity,
        }
    }

    /// Seconds covered by this message
    pub fn delta_time(&self) -> f32 {
        self.frame.delta_time
    }

    /// Logical action state
    pub fn input(&self) -> &dyn InputSource {
        self.frame.input
    }

    /// Sound effect sink
    pub fn audio(&mut self) -> &mut dyn AudioSink {
        &mut *self.frame.audio
    }

    /// Debug shape sink
    pub fn debug_draw(&mut self) -> &mut DebugDrawSystem {
        &mut *self.frame.debug_draw
    }

    /// The scene's physics world
    pub fn physics(&self) -> &PhysicsWorld {
        self.physics
    }

    /// The scene's physics world, mutably
    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut *self.physics
    }

    /// Borrow the physics world and the frame collaborators at the same time
    pub fn split(&mut self) -> (&mut PhysicsWorld, &mut FrameContext<'f>) {
        (&mut *self.physics, &mut *self.frame)
    }

    /// Name of the entity receiving the message, `None` for scene-level hooks
    pub fn entity_name(&self) -> Option<&str> {
        self.entity
    }

    /// Spawn an entity once the current dispatch finishes
    pub fn queue_entity(&mut self, name: Option<&str>, components: Vec<Box<dyn Component>>) {
        self.commands.push(EntityCommand::Spawn {
            name: name.map(str::to_string),
            components,
        });
    }

    /// Remove an entity once the current dispatch finishes
    pub fn queue_removal(&mut self, name: &str) {
        self.commands.push(EntityCommand::Remove(name.to_string()));
    }
}
