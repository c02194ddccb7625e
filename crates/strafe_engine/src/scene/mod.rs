//! Scene management system
//!
//! A [`Scene`] owns a container of named entities and a physics world, and
//! forwards the host's lifecycle messages to them in creation order.
//!
//! ## Architecture
//!
//! ```text
//! Host frame loop (Engine)
//!      ↓  Update / PhysicsUpdate / RenderDebugUI
//! Scene (state machine)
//!      ↓  same message, creation order
//! Entities → Components (e.g. CharacterController)
//!      ↓
//! Scene-level hook (SceneBehavior)
//! ```

mod camera;
mod container;
mod context;
mod entity;
#[allow(clippy::module_inception)]
mod scene;

pub use camera::Camera;
pub use container::{EntityContainer, DEFAULT_ENTITY_NAME};
pub use context::{FrameContext, SceneContext};
pub use entity::{AsAny, Component, ComponentError, Entity, LifecycleEvent};
pub use scene::{Scene, SceneBehavior, SceneError, SceneState};
