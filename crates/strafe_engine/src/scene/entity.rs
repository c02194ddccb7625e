//! Entities and their lifecycle components

use std::any::Any;
use std::fmt;

use crate::physics::PhysicsWorld;
use super::context::{EntityCommand, FrameContext, SceneContext};
use super::scene::SceneError;

/// Error a component hook may return
pub type ComponentError = Box<dyn std::error::Error + Send + Sync>;

/// Lifecycle messages dispatched to every entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Once, when play first begins
    Start,
    /// Once per frame while playing
    Update,
    /// Zero or more times per frame while playing
    PhysicsUpdate,
    /// Once per frame in any loaded state
    RenderDebugUi,
    /// When the host tears the scene down
    Destroy,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "Start",
            Self::Update => "Update",
            Self::PhysicsUpdate => "PhysicsUpdate",
            Self::RenderDebugUi => "RenderDebugUI",
            Self::Destroy => "Destroy",
        };
        f.write_str(name)
    }
}

/// Upcast helper so components can be looked up by concrete type
pub trait AsAny: Any {
    /// `self` as [`Any`]
    fn as_any(&self) -> &dyn Any;
    /// `self` as mutable [`Any`]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A unit of behaviour attached to an entity
///
/// Every hook defaults to doing nothing, so components only implement the
/// messages they care about.
pub trait Component: AsAny {
    /// Called once when the scene starts playing
    fn on_start(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Called once per frame while playing
    fn on_update(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Called once per physics tick while playing
    fn on_physics_update(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Called once per frame for debug visualization, even while paused
    fn on_render_debug_ui(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Called when the scene is destroyed
    fn on_destroy(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
        Ok(())
    }
}

pub(crate) fn invoke(
    component: &mut dyn Component,
    event: LifecycleEvent,
    ctx: &mut SceneContext<'_, '_>,
) -> Result<(), ComponentError> {
    match event {
        LifecycleEvent::Start => component.on_start(ctx),
        LifecycleEvent::Update => component.on_update(ctx),
        LifecycleEvent::PhysicsUpdate => component.on_physics_update(ctx),
        LifecycleEvent::RenderDebugUi => component.on_render_debug_ui(ctx),
        LifecycleEvent::Destroy => component.on_destroy(ctx),
    }
}

/// A named, ordered bundle of components owned by one scene
pub struct Entity {
    name: String,
    components: Vec<Box<dyn Component>>,
}

impl Entity {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            components: Vec::new(),
        }
    }

    /// Unique name within the owning scene
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach a component; components receive messages in attachment order
    pub fn add_component<C: Component>(&mut self, component: C) -> &mut Self {
        self.components.push(Box::new(component));
        self
    }

    /// Attach an already boxed component
    pub fn add_boxed_component(&mut self, component: Box<dyn Component>) -> &mut Self {
        self.components.push(component);
        self
    }

    /// First component of type `T`
    pub fn component<T: Component>(&self) -> Option<&T> {
        self.components
            .iter()
            .find_map(|component| (**component).as_any().downcast_ref::<T>())
    }

    /// First component of type `T`, mutably
    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find_map(|component| (**component).as_any_mut().downcast_mut::<T>())
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Send `event` to every component in attachment order, stopping at the first failure
    pub(crate) fn dispatch(
        &mut self,
        event: LifecycleEvent,
        frame: &mut FrameContext<'_>,
        physics: &mut PhysicsWorld,
        commands: &mut Vec<EntityCommand>,
    ) -> Result<(), SceneError> {
        for component in &mut self.components {
            let mut ctx = SceneContext::new(&mut *frame, &mut *physics, &mut *commands, Some(self.name.as_str()));
            invoke(&mut **component, event, &mut ctx).map_err(|source| SceneError::Component {
                entity: self.name.clone(),
                event,
                source,
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("components", &self.components.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health(u32);
    impl Component for Health {}

    struct Tag;
    impl Component for Tag {}

    #[test]
    fn test_typed_component_lookup() {
        let mut entity = Entity::new("Player".to_string());
        entity.add_component(Tag).add_component(Health(10));

        assert_eq!(entity.component_count(), 2);
        assert_eq!(entity.component::<Health>().map(|h| h.0), Some(10));

        if let Some(health) = entity.component_mut::<Health>() {
            health.0 -= 3;
        }
        assert_eq!(entity.component::<Health>().map(|h| h.0), Some(7));
    }

    #[test]
    fn test_missing_component_is_none() {
        let mut entity = Entity::new("Crate".to_string());
        entity.add_boxed_component(Box::new(Tag));
        assert!(entity.component::<Health>().is_none());
        assert!(entity.component::<Tag>().is_some());
    }

    #[test]
    fn test_event_names() {
        assert_eq!(LifecycleEvent::RenderDebugUi.to_string(), "RenderDebugUI");
        assert_eq!(LifecycleEvent::PhysicsUpdate.to_string(), "PhysicsUpdate");
    }
}
