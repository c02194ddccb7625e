//! # Strafe Engine
//!
//! Scene lifecycle runtime and quake-style character movement for 3D games.
//!
//! ## Features
//!
//! - **Scenes**: Load/play/pause/reset state machine owning entities and a physics world
//! - **Entities**: Named, ordered component bundles with deterministic lifecycle dispatch
//! - **Character Movement**: Ground friction, capped acceleration and air strafing
//! - **Physics**: Minimal world with ghost probes for grounded checks
//! - **Configuration**: TOML or RON files with validated defaults
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use strafe_engine::prelude::*;
//!
//! struct Arena {
//!     camera: Camera,
//! }
//!
//! impl SceneBehavior for Arena {
//!     fn main_camera(&self) -> &Camera {
//!         &self.camera
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new(ApplicationConfig::default())?;
//!     let mut scene = engine.create_scene(Arena { camera: Camera::default() });
//!     scene.load()?;
//!     engine.with_frame(0.0, |frame| scene.play(frame))?;
//!
//!     for _ in 0..60 {
//!         engine.run_frame(&mut scene, 1.0 / 60.0)?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod audio;
pub mod character;
pub mod debug;
pub mod input;
pub mod physics;
pub mod scene;

mod engine;

#[cfg(test)]
mod tests;

pub use engine::{Engine, EngineError, EngineEvent};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Engine, EngineError, EngineEvent,
        audio::{AudioSink, SoundManager},
        character::{CharacterController, ControllerError, MovementTuning, WishDirectionMode},
        core::config::{ApplicationConfig, CharacterConfig, EngineConfig, PhysicsConfig, Config, ConfigError},
        debug::DebugDrawSystem,
        foundation::math::{Vec3, Point3, Mat4},
        input::{ActionSet, InputAction, InputManager, InputSource, KeyCode},
        physics::{BodyDesc, BodyHandle, CollisionLayers, CollisionShape, PhysicsWorld},
        scene::{
            Camera, Component, ComponentError, Entity, EntityContainer, FrameContext,
            Scene, SceneBehavior, SceneContext, SceneError, SceneState,
        },
    };
}
