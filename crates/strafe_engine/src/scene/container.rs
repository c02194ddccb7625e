//! Ordered entity storage with unique names
//!
//! Entities keep creation order for the whole loaded session so every
//! lifecycle message reaches them in the same sequence. Names are made
//! unique with a per-base-name counter that only ever grows, so a removed
//! entity's suffix is never handed out again.

use std::collections::HashMap;

use crate::physics::PhysicsWorld;
use super::context::{EntityCommand, FrameContext};
use super::entity::{Entity, LifecycleEvent};
use super::scene::SceneError;

/// Base name for entities created without one
pub const DEFAULT_ENTITY_NAME: &str = "Entity";

/// Owns every entity in a scene
#[derive(Debug, Default)]
pub struct EntityContainer {
    entities: Vec<Entity>,
    name_counts: HashMap<String, u32>,
}

impl EntityContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, de-duplicating its name
    ///
    /// `None` or an empty name uses [`DEFAULT_ENTITY_NAME`]. A taken name gets
    /// the next suffix for that base: `Foo`, `Foo1`, `Foo2`, ...
    pub fn add_entity(&mut self, name: Option<&str>) -> &mut Entity {
        let base = name.filter(|name| !name.is_empty()).unwrap_or(DEFAULT_ENTITY_NAME);
        let name = self.unique_name(base);
        log::debug!("Added entity '{}'", name);

        let index = self.entities.len();
        self.entities.push(Entity::new(name));
        &mut self.entities[index]
    }

    /// Look up an entity by exact name
    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name() == name)
    }

    /// Look up an entity by exact name, mutably
    pub fn get_entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.name() == name)
    }

    /// Whether an entity with this exact name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get_entity(name).is_some()
    }

    /// Remove an entity, keeping the order of the rest
    pub fn remove_entity(&mut self, name: &str) -> Option<Entity> {
        let index = self.entities.iter().position(|entity| entity.name() == name)?;
        log::debug!("Removed entity '{}'", name);
        Some(self.entities.remove(index))
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the container holds no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Entity names in creation order
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.iter().map(Entity::name).collect()
    }

    /// Log every entity name at info level
    pub fn log_entity_list(&self) {
        log::info!("Entities ({}):", self.entities.len());
        for entity in &self.entities {
            log::info!("  {} ({} components)", entity.name(), entity.component_count());
        }
    }

    /// Drop every entity and forget the name counters
    pub fn clear(&mut self) {
        self.entities.clear();
        self.name_counts.clear();
    }

    /// Send `event` to every entity in creation order
    pub(crate) fn dispatch(
        &mut self,
        event: LifecycleEvent,
        frame: &mut FrameContext<'_>,
        physics: &mut PhysicsWorld,
        commands: &mut Vec<EntityCommand>,
    ) -> Result<(), SceneError> {
        log::trace!("Dispatching {} to {} entities", event, self.entities.len());
        for entity in &mut self.entities {
            entity.dispatch(event, frame, physics, commands)?;
        }
        Ok(())
    }

    /// Apply spawns and removals queued during a dispatch
    pub(crate) fn apply(&mut self, commands: Vec<EntityCommand>) {
        for command in commands {
            match command {
                EntityCommand::Spawn { name, components } => {
                    let entity = self.add_entity(name.as_deref());
                    for component in components {
                        entity.add_boxed_component(component);
                    }
                }
                EntityCommand::Remove(name) => {
                    if self.remove_entity(&name).is_none() {
                        log::warn!("Queued removal of unknown entity '{}'", name);
                    }
                }
            }
        }
    }

    fn unique_name(&mut self, base: &str) -> String {
        let taken = |entities: &[Entity], name: &str| entities.iter().any(|entity| entity.name() == name);

        let count = self.name_counts.entry(base.to_string()).or_insert(0);
        if !taken(&self.entities, base) {
            return base.to_string();
        }

        loop {
            *count += 1;
            let candidate = format!("{}{}", base, count);
            if !taken(&self.entities, &candidate) {
                return candidate;
            }
        }
    }
}
