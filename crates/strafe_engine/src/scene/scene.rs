//! # Scene
//!
//! A scene owns its entities and, while loaded, exactly one physics world.
//! The host drives it with lifecycle messages each frame; concrete scenes
//! plug in through [`SceneBehavior`].
//!
//! ## States
//!
//! ```text
//!          load                play                 pause
//! Unloaded ────► Start ───────────────► Playing ◄──────────► Paused
//!                  ▲   (dispatches Start)        play
//!                  └──────────── reset (unload + load) ───────────┘
//! ```
//!
//! Update and PhysicsUpdate only reach entities while playing.
//! RenderDebugUI runs in every loaded state so debug views stay live while
//! paused.

use std::fmt;
use thiserror::Error;

use crate::core::config::PhysicsConfig;
use crate::physics::PhysicsWorld;
use super::camera::Camera;
use super::container::EntityContainer;
use super::context::{EntityCommand, FrameContext, SceneContext};
use super::entity::{Component, ComponentError, Entity, LifecycleEvent};

/// Scene errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// A message arrived before `load` or after `unload`
    #[error("Scene is not loaded")]
    NotLoaded,

    /// `load` was called twice without an `unload` in between
    #[error("Scene is already loaded")]
    AlreadyLoaded,

    /// A component hook failed
    ///
    /// The dispatch stops at the failing entity: later entities and the
    /// scene-level hook do not receive that message. Entity commands queued
    /// before the failure are still applied.
    #[error("Entity '{entity}' failed during {event}: {source}")]
    Component {
        /// Entity owning the failing component
        entity: String,
        /// Message being dispatched
        event: LifecycleEvent,
        /// Underlying failure
        #[source]
        source: ComponentError,
    },

    /// A scene-level hook failed
    #[error("Scene hook failed during {event}: {source}")]
    Hook {
        /// Message being dispatched
        event: LifecycleEvent,
        /// Underlying failure
        #[source]
        source: ComponentError,
    },

    /// The load or unload hook failed
    #[error("Scene setup failed: {0}")]
    Setup(#[source] ComponentError),
}

/// Playback state of a loaded scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// Loaded, waiting for the first play
    Start,
    /// Update and physics messages are dispatched
    Playing,
    /// Frozen; only debug rendering runs
    Paused,
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "Start",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
        };
        f.write_str(name)
    }
}

/// Extension points for a concrete scene
///
/// Only [`SceneBehavior::main_camera`] is required. Most behaviour belongs
/// in components; these hooks run after every entity has received the
/// message of the same name.
pub trait SceneBehavior {
    /// Camera the renderer should use for this scene
    fn main_camera(&self) -> &Camera;

    /// Build entities and physics bodies
    fn on_load(&mut self, _entities: &mut EntityContainer, _physics: &mut PhysicsWorld) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Release anything the behavior holds; entities and physics are dropped right after
    fn on_unload(&mut self, _entities: &mut EntityContainer, _physics: &mut PhysicsWorld) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Scene-level Start
    fn on_start(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Scene-level Update
    fn on_update(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Scene-level PhysicsUpdate
    fn on_physics_update(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Scene-level RenderDebugUI
    fn on_imgui_render(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Scene-level Destroy
    fn on_destroy(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
        Ok(())
    }
}

/// A scene driven by the host frame loop
pub struct Scene<B: SceneBehavior> {
    behavior: B,
    entities: EntityContainer,
    physics: Option<PhysicsWorld>,
    physics_config: PhysicsConfig,
    fly_camera: Camera,
    state: SceneState,
}

impl<B: SceneBehavior> Scene<B> {
    /// Create an unloaded scene
    ///
    /// The fly camera is the engine's default free camera, attached to every scene.
    pub fn new(behavior: B, fly_camera: Camera, physics_config: PhysicsConfig) -> Self {
        Self {
            behavior,
            entities: EntityContainer::new(),
            physics: None,
            physics_config,
            fly_camera,
            state: SceneState::Start,
        }
    }

    /// The concrete scene's behavior
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    /// The concrete scene's behavior, mutably
    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }

    /// Current playback state
    pub fn state(&self) -> SceneState {
        self.state
    }

    /// Whether the scene holds a physics world and can receive messages
    pub fn is_loaded(&self) -> bool {
        self.physics.is_some()
    }

    /// Camera chosen by the concrete scene
    pub fn main_camera(&self) -> &Camera {
        self.behavior.main_camera()
    }

    /// The engine's free camera
    pub fn fly_camera(&self) -> &Camera {
        &self.fly_camera
    }

    /// The engine's free camera, mutably
    pub fn fly_camera_mut(&mut self) -> &mut Camera {
        &mut self.fly_camera
    }

    /// Physics world, present while loaded
    pub fn physics_world(&self) -> Option<&PhysicsWorld> {
        self.physics.as_ref()
    }

    /// Physics world, mutably
    pub fn physics_world_mut(&mut self) -> Option<&mut PhysicsWorld> {
        self.physics.as_mut()
    }

    /// Every entity in creation order
    pub fn entities(&self) -> &EntityContainer {
        &self.entities
    }

    /// Add an entity outside of a dispatch
    pub fn add_entity(&mut self, name: Option<&str>) -> Result<&mut Entity, SceneError> {
        if !self.is_loaded() {
            return Err(SceneError::NotLoaded);
        }
        Ok(self.entities.add_entity(name))
    }

    /// Look up an entity by name
    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get_entity(name)
    }

    /// Look up an entity by name, mutably
    pub fn get_entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.get_entity_mut(name)
    }

    /// Remove an entity outside of a dispatch
    pub fn remove_entity(&mut self, name: &str) -> Option<Entity> {
        self.entities.remove_entity(name)
    }

    /// First component of type `T` on the named entity
    pub fn entity_component<T: Component>(&self, name: &str) -> Option<&T> {
        self.entities.get_entity(name)?.component::<T>()
    }

    /// Log every entity name
    pub fn log_entity_list(&self) {
        self.entities.log_entity_list();
    }

    /// Allocate the physics world and run the load hook
    ///
    /// A failing hook leaves the scene unloaded.
    pub fn load(&mut self) -> Result<(), SceneError> {
        if self.is_loaded() {
            return Err(SceneError::AlreadyLoaded);
        }

        let mut physics = PhysicsWorld::from_config(&self.physics_config);
        self.state = SceneState::Start;

        if let Err(source) = self.behavior.on_load(&mut self.entities, &mut physics) {
            self.entities.clear();
            return Err(SceneError::Setup(source));
        }

        self.physics = Some(physics);
        log::info!("Scene loaded with {} entities", self.entities.len());
        Ok(())
    }

    /// Run the unload hook, then drop the physics world and every entity
    ///
    /// Teardown completes even when the hook fails; the hook's error is
    /// returned afterwards. Unloading an unloaded scene does nothing.
    pub fn unload(&mut self) -> Result<(), SceneError> {
        let Some(mut physics) = self.physics.take() else {
            log::debug!("Scene is not loaded; nothing to unload");
            return Ok(());
        };

        let result = self.behavior.on_unload(&mut self.entities, &mut physics);
        self.entities.clear();
        drop(physics);
        self.state = SceneState::Start;
        log::info!("Scene unloaded");

        result.map_err(SceneError::Setup)
    }

    /// Return to Start by unloading and loading again
    ///
    /// The scene is reloaded even when the unload hook fails; the first
    /// error is returned.
    pub fn reset(&mut self) -> Result<(), SceneError> {
        log::info!("Resetting scene");
        let unloaded = self.unload();
        let loaded = self.load();
        unloaded.and(loaded)
    }

    /// Enter Playing; the first entry from Start dispatches Start
    pub fn play(&mut self, frame: &mut FrameContext<'_>) -> Result<(), SceneError> {
        if !self.is_loaded() {
            return Err(SceneError::NotLoaded);
        }

        match self.state {
            SceneState::Playing => {
                log::warn!("Scene is already playing");
                Ok(())
            }
            SceneState::Paused => {
                self.transition(SceneState::Playing);
                Ok(())
            }
            SceneState::Start => {
                self.transition(SceneState::Playing);
                self.start(frame)
            }
        }
    }

    /// Freeze Update and PhysicsUpdate
    pub fn pause(&mut self) -> Result<(), SceneError> {
        if !self.is_loaded() {
            return Err(SceneError::NotLoaded);
        }

        if self.state == SceneState::Playing {
            self.transition(SceneState::Paused);
        } else {
            log::warn!("Cannot pause a scene in state {}", self.state);
        }
        Ok(())
    }

    /// Dispatch Start to every entity, then the scene hook
    pub fn start(&mut self, frame: &mut FrameContext<'_>) -> Result<(), SceneError> {
        self.dispatch(LifecycleEvent::Start, frame)
    }

    /// Dispatch Update while playing
    pub fn update(&mut self, frame: &mut FrameContext<'_>) -> Result<(), SceneError> {
        self.dispatch_while_playing(LifecycleEvent::Update, frame)
    }

    /// Dispatch PhysicsUpdate while playing
    pub fn physics_update(&mut self, frame: &mut FrameContext<'_>) -> Result<(), SceneError> {
        self.dispatch_while_playing(LifecycleEvent::PhysicsUpdate, frame)
    }

    /// Dispatch RenderDebugUI in any loaded state
    pub fn render_debug_ui(&mut self, frame: &mut FrameContext<'_>) -> Result<(), SceneError> {
        self.dispatch(LifecycleEvent::RenderDebugUi, frame)
    }

    /// Dispatch Destroy
    pub fn destroy(&mut self, frame: &mut FrameContext<'_>) -> Result<(), SceneError> {
        self.dispatch(LifecycleEvent::Destroy, frame)
    }

    /// Advance the physics world by `delta_time` while playing
    pub fn step_physics(&mut self, delta_time: f32) -> Result<(), SceneError> {
        let playing = self.state == SceneState::Playing;
        let physics = self.physics.as_mut().ok_or(SceneError::NotLoaded)?;
        if playing {
            physics.step(delta_time);
        }
        Ok(())
    }

    fn transition(&mut self, next: SceneState) {
        log::info!("Scene state {} -> {}", self.state, next);
        self.state = next;
    }

    fn dispatch_while_playing(&mut self, event: LifecycleEvent, frame: &mut FrameContext<'_>) -> Result<(), SceneError> {
        if !self.is_loaded() {
            return Err(SceneError::NotLoaded);
        }
        if self.state != SceneState::Playing {
            log::trace!("Skipping {} while {}", event, self.state);
            return Ok(());
        }
        self.dispatch(event, frame)
    }

    fn dispatch(&mut self, event: LifecycleEvent, frame: &mut FrameContext<'_>) -> Result<(), SceneError> {
        let physics = self.physics.as_mut().ok_or(SceneError::NotLoaded)?;
        let mut commands: Vec<EntityCommand> = Vec::new();

        let result = self
            .entities
            .dispatch(event, frame, physics, &mut commands)
            .and_then(|()| {
                let mut ctx = SceneContext::new(frame, physics, &mut commands, None);
                let behavior = &mut self.behavior;
                let outcome = match event {
                    LifecycleEvent::Start => behavior.on_start(&mut ctx),
                    LifecycleEvent::Update => behavior.on_update(&mut ctx),
                    LifecycleEvent::PhysicsUpdate => behavior.on_physics_update(&mut ctx),
                    LifecycleEvent::RenderDebugUi => behavior.on_imgui_render(&mut ctx),
                    LifecycleEvent::Destroy => behavior.on_destroy(&mut ctx),
                };
                outcome.map_err(|source| SceneError::Hook { event, source })
            });

        self.entities.apply(commands);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundManager;
    use crate::debug::DebugDrawSystem;
    use crate::input::ActionSet;

    #[derive(Default)]
    struct Recorder {
        starts: u32,
        updates: u32,
        physics_updates: u32,
        renders: u32,
        destroys: u32,
    }

    impl Component for Recorder {
        fn on_start(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
            self.starts += 1;
            Ok(())
        }

        fn on_update(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
            self.updates += 1;
            Ok(())
        }

        fn on_physics_update(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
            self.physics_updates += 1;
            Ok(())
        }

        fn on_render_debug_ui(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
            self.renders += 1;
            Ok(())
        }

        fn on_destroy(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
            self.destroys += 1;
            Ok(())
        }
    }

    /// Spawns a recorder on its first update, then removes itself on the next
    #[derive(Default)]
    struct Spawner {
        updates: u32,
    }

    impl Component for Spawner {
        fn on_update(&mut self, ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
            self.updates += 1;
            match self.updates {
                1 => ctx.queue_entity(Some("Spawned"), vec![Box::new(Recorder::default())]),
                2 => {
                    let name = ctx.entity_name().unwrap_or_default().to_string();
                    ctx.queue_removal(&name);
                }
                _ => {}
            }
            Ok(())
        }
    }

    struct Failing;

    impl Component for Failing {
        fn on_update(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
            Err("broken component".into())
        }
    }

    #[derive(Default)]
    struct TestScene {
        camera: Camera,
        loads: u32,
        unloads: u32,
        scene_starts: u32,
        fail_unload: bool,
    }

    impl SceneBehavior for TestScene {
        fn main_camera(&self) -> &Camera {
            &self.camera
        }

        fn on_load(&mut self, entities: &mut EntityContainer, _physics: &mut PhysicsWorld) -> Result<(), ComponentError> {
            self.loads += 1;
            entities.add_entity(Some("Recorder")).add_component(Recorder::default());
            Ok(())
        }

        fn on_unload(&mut self, _entities: &mut EntityContainer, _physics: &mut PhysicsWorld) -> Result<(), ComponentError> {
            self.unloads += 1;
            if self.fail_unload {
                return Err("unload hook failed".into());
            }
            Ok(())
        }

        fn on_start(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
            self.scene_starts += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Harness {
        input: ActionSet,
        audio: SoundManager,
        draw: DebugDrawSystem,
    }

    impl Harness {
        fn frame(&mut self) -> FrameContext<'_> {
            FrameContext::new(1.0 / 60.0, &self.input, &mut self.audio, &mut self.draw)
        }
    }

    fn loaded_scene() -> Scene<TestScene> {
        let mut scene = Scene::new(TestScene::default(), Camera::default(), PhysicsConfig::default());
        scene.load().unwrap();
        scene
    }

    fn recorder(scene: &Scene<TestScene>) -> &Recorder {
        scene.entity_component::<Recorder>("Recorder").unwrap()
    }

    #[test]
    fn test_play_dispatches_start_once() {
        let mut harness = Harness::default();
        let mut scene = loaded_scene();
        assert_eq!(scene.state(), SceneState::Start);

        scene.play(&mut harness.frame()).unwrap();
        assert_eq!(scene.state(), SceneState::Playing);
        assert_eq!(recorder(&scene).starts, 1);
        assert_eq!(scene.behavior().scene_starts, 1);

        scene.play(&mut harness.frame()).unwrap();
        scene.pause().unwrap();
        scene.play(&mut harness.frame()).unwrap();
        assert_eq!(recorder(&scene).starts, 1);
        assert_eq!(scene.behavior().scene_starts, 1);
    }

    #[test]
    fn test_pause_freezes_updates_but_not_debug_render() {
        let mut harness = Harness::default();
        let mut scene = loaded_scene();

        // Nothing but debug rendering runs before play
        scene.update(&mut harness.frame()).unwrap();
        scene.render_debug_ui(&mut harness.frame()).unwrap();
        assert_eq!(recorder(&scene).updates, 0);
        assert_eq!(recorder(&scene).renders, 1);

        scene.play(&mut harness.frame()).unwrap();
        scene.update(&mut harness.frame()).unwrap();
        scene.physics_update(&mut harness.frame()).unwrap();
        scene.physics_update(&mut harness.frame()).unwrap();

        scene.pause().unwrap();
        assert_eq!(scene.state(), SceneState::Paused);
        scene.update(&mut harness.frame()).unwrap();
        scene.physics_update(&mut harness.frame()).unwrap();
        scene.render_debug_ui(&mut harness.frame()).unwrap();

        let recorded = recorder(&scene);
        assert_eq!(recorded.updates, 1);
        assert_eq!(recorded.physics_updates, 2);
        assert_eq!(recorded.renders, 2);
    }

    #[test]
    fn test_pause_outside_playing_is_ignored() {
        let mut scene = loaded_scene();
        scene.pause().unwrap();
        assert_eq!(scene.state(), SceneState::Start);
    }

    #[test]
    fn test_reset_reloads_and_restarts() {
        let mut harness = Harness::default();
        let mut scene = loaded_scene();
        scene.play(&mut harness.frame()).unwrap();
        scene.update(&mut harness.frame()).unwrap();

        scene.reset().unwrap();
        assert_eq!(scene.state(), SceneState::Start);
        assert_eq!(scene.behavior().loads, 2);
        assert_eq!(scene.behavior().unloads, 1);
        assert_eq!(recorder(&scene).updates, 0);
        assert_eq!(scene.entities().entity_names(), vec!["Recorder"]);

        scene.play(&mut harness.frame()).unwrap();
        assert_eq!(recorder(&scene).starts, 1);
        assert_eq!(scene.behavior().scene_starts, 2);
    }

    #[test]
    fn test_reset_reloads_after_failing_unload_hook() {
        let mut harness = Harness::default();
        let mut scene = loaded_scene();
        scene.behavior_mut().fail_unload = true;
        scene.play(&mut harness.frame()).unwrap();

        assert!(matches!(scene.reset(), Err(SceneError::Setup(_))));
        assert!(scene.is_loaded());
        assert_eq!(scene.state(), SceneState::Start);
        assert_eq!(scene.behavior().loads, 2);
        assert_eq!(scene.entities().entity_names(), vec!["Recorder"]);

        scene.play(&mut harness.frame()).unwrap();
        assert_eq!(recorder(&scene).starts, 1);
    }

    #[test]
    fn test_reset_loads_an_unloaded_scene() {
        let mut scene = loaded_scene();
        scene.unload().unwrap();

        scene.reset().unwrap();
        assert!(scene.is_loaded());
        assert_eq!(scene.behavior().unloads, 1);
    }

    #[test]
    fn test_unload_releases_everything() {
        let mut harness = Harness::default();
        let mut scene = loaded_scene();
        assert!(scene.physics_world().is_some());

        scene.unload().unwrap();
        assert!(!scene.is_loaded());
        assert!(scene.physics_world().is_none());
        assert!(scene.entities().is_empty());

        assert!(matches!(scene.update(&mut harness.frame()), Err(SceneError::NotLoaded)));
        assert!(matches!(scene.render_debug_ui(&mut harness.frame()), Err(SceneError::NotLoaded)));
        assert!(matches!(scene.play(&mut harness.frame()), Err(SceneError::NotLoaded)));
        assert!(matches!(scene.pause(), Err(SceneError::NotLoaded)));
        assert!(matches!(scene.step_physics(0.1), Err(SceneError::NotLoaded)));
        scene.unload().unwrap();
        assert_eq!(scene.behavior().unloads, 1);
        assert!(matches!(scene.add_entity(None), Err(SceneError::NotLoaded)));
    }

    #[test]
    fn test_double_load_is_rejected() {
        let mut scene = loaded_scene();
        assert!(matches!(scene.load(), Err(SceneError::AlreadyLoaded)));
        assert_eq!(scene.entities().len(), 1);
    }

    #[test]
    fn test_entities_spawned_during_dispatch_wait_for_next_cycle() {
        let mut harness = Harness::default();
        let mut scene = loaded_scene();
        scene.add_entity(Some("Spawner")).unwrap().add_component(Spawner::default());
        scene.play(&mut harness.frame()).unwrap();

        scene.update(&mut harness.frame()).unwrap();
        let spawned = scene.entity_component::<Recorder>("Spawned").unwrap();
        assert_eq!(spawned.updates, 0);
        assert_eq!(scene.entities().entity_names(), vec!["Recorder", "Spawner", "Spawned"]);

        scene.update(&mut harness.frame()).unwrap();
        assert_eq!(scene.entity_component::<Recorder>("Spawned").unwrap().updates, 1);
        assert!(scene.get_entity("Spawner").is_none());
    }

    #[test]
    fn test_component_failure_names_the_entity() {
        let mut harness = Harness::default();
        let mut scene = loaded_scene();
        scene.add_entity(Some("Broken")).unwrap().add_component(Failing);
        scene.play(&mut harness.frame()).unwrap();

        match scene.update(&mut harness.frame()) {
            Err(SceneError::Component { entity, event, .. }) => {
                assert_eq!(entity, "Broken");
                assert_eq!(event, LifecycleEvent::Update);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_destroy_reaches_every_entity() {
        let mut harness = Harness::default();
        let mut scene = loaded_scene();
        scene.destroy(&mut harness.frame()).unwrap();
        assert_eq!(recorder(&scene).destroys, 1);
    }

    #[test]
    fn test_physics_only_steps_while_playing() {
        let mut harness = Harness::default();
        let mut scene = loaded_scene();
        let body = scene
            .physics_world_mut()
            .unwrap()
            .add_body(crate::physics::BodyDesc::dynamic(
                crate::physics::CollisionShape::sphere(0.5),
                crate::foundation::math::Vec3::new(0.0, 10.0, 0.0),
            ))
            .unwrap();

        scene.step_physics(0.1).unwrap();
        assert_eq!(scene.physics_world().unwrap().world_position(body).unwrap().y, 10.0);

        scene.play(&mut harness.frame()).unwrap();
        scene.step_physics(0.1).unwrap();
        assert!(scene.physics_world().unwrap().world_position(body).unwrap().y < 10.0);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(SceneState::Start.to_string(), "Start");
        assert_eq!(SceneState::Playing.to_string(), "Playing");
        assert_eq!(SceneState::Paused.to_string(), "Paused");
    }

    #[test]
    fn test_cameras() {
        let mut scene = loaded_scene();
        scene.fly_camera_mut().set_position(crate::foundation::math::Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.fly_camera().position.z, 3.0);
        assert_eq!(scene.main_camera().position, Camera::default().position);
    }
}
