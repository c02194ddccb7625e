//! Physics world owned by a scene
//!
//! A deliberately small simulation: bodies translate under gravity, dynamic
//! bodies are pushed out of static geometry, and ghost bodies (probes) ride
//! along with a parent body and only answer contact queries. Rotation,
//! restitution and dynamic-versus-dynamic response are not simulated.

use crate::core::config::PhysicsConfig;
use crate::debug::DebugDrawSystem;
use crate::foundation::math::{Point3, Vec3, Vec4};
use super::collision::{CollisionShape, WorldSpaceShape};
use super::collision_layers::CollisionLayers;
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

new_key_type! {
    /// Stable handle to a body in a [`PhysicsWorld`]
    pub struct BodyHandle;
}

/// Physics errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// The handle does not refer to a live body
    #[error("Unknown physics body {0:?}")]
    UnknownBody(BodyHandle),

    /// Shape dimensions were zero, negative or not finite
    #[error("Invalid collision shape: {0:?}")]
    InvalidShape(CollisionShape),
}

/// How a body takes part in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves; other bodies are pushed out of it
    Static,
    /// Integrates gravity and velocity, resolved against static bodies
    Dynamic,
    /// Query-only volume that follows an optional parent body
    Ghost,
}

/// Description used to create a body
#[derive(Debug, Clone)]
pub struct BodyDesc {
    /// Simulation role
    pub kind: BodyKind,
    /// Collision volume
    pub shape: CollisionShape,
    /// Initial world position of the shape's center
    pub position: Vec3,
    /// Initial linear velocity
    pub linear_velocity: Vec3,
    /// Layer the body lives on
    pub layer: CollisionLayers,
    /// Layers the body collides with
    pub mask: CollisionLayers,
}

impl BodyDesc {
    /// A dynamic body
    pub fn dynamic(shape: CollisionShape, position: Vec3) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            shape,
            position,
            linear_velocity: Vec3::zeros(),
            layer: CollisionLayers::PROP,
            mask: CollisionLayers::all(),
        }
    }

    /// A static body
    pub fn fixed(shape: CollisionShape, position: Vec3) -> Self {
        Self {
            kind: BodyKind::Static,
            shape,
            position,
            linear_velocity: Vec3::zeros(),
            layer: CollisionLayers::ENVIRONMENT,
            mask: CollisionLayers::all(),
        }
    }

    /// Set the collision layer and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Set the initial linear velocity
    pub fn with_velocity(mut self, linear_velocity: Vec3) -> Self {
        self.linear_velocity = linear_velocity;
        self
    }
}

/// A contact reported by [`PhysicsWorld::contact_test`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The body touched by the queried volume
    pub other: BodyHandle,
    /// Contact point in world space
    pub point: Point3,
    /// Unit normal from the queried volume towards `other`
    pub normal: Vec3,
    /// Overlap depth
    pub depth: f32,
}

#[derive(Debug, Clone)]
struct Body {
    kind: BodyKind,
    shape: CollisionShape,
    position: Vec3,
    velocity: Vec3,
    layer: CollisionLayers,
    mask: CollisionLayers,
    attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Copy)]
struct Attachment {
    parent: BodyHandle,
    offset: Vec3,
}

impl Body {
    fn world_shape(&self) -> WorldSpaceShape {
        self.shape.to_world_space(self.position)
    }
}

/// The simulation a scene owns for its loaded lifetime
pub struct PhysicsWorld {
    bodies: SlotMap<BodyHandle, Body>,
    gravity: Vec3,

    /// Draw every collider in [`PhysicsWorld::debug_draw`]
    pub debug_enabled: bool,
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity
    pub fn new(gravity: Vec3) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            gravity,
            debug_enabled: false,
        }
    }

    /// Create an empty world from configuration
    pub fn from_config(config: &PhysicsConfig) -> Self {
        let mut world = Self::new(config.gravity);
        world.debug_enabled = config.debug_draw_colliders;
        world
    }

    /// Gravity applied to dynamic bodies
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Number of live bodies, probes included
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Whether `handle` refers to a live body
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(handle)
    }

    /// Add a body
    pub fn add_body(&mut self, desc: BodyDesc) -> Result<BodyHandle, PhysicsError> {
        if !desc.shape.is_valid() {
            return Err(PhysicsError::InvalidShape(desc.shape));
        }

        let handle = self.bodies.insert(Body {
            kind: desc.kind,
            shape: desc.shape,
            position: desc.position,
            velocity: desc.linear_velocity,
            layer: desc.layer,
            mask: desc.mask,
            attachment: None,
        });
        log::trace!("Added {:?} body {:?} at {:?}", desc.kind, handle, desc.position);
        Ok(handle)
    }

    /// Add a ghost sphere that follows `parent` at `offset`
    ///
    /// Probes never move on their own, are ignored by the solver and are
    /// skipped when other volumes run contact tests.
    pub fn add_probe(
        &mut self,
        parent: BodyHandle,
        offset: Vec3,
        radius: f32,
    ) -> Result<BodyHandle, PhysicsError> {
        let parent_position = self.body(parent)?.position;
        let shape = CollisionShape::sphere(radius);
        if !shape.is_valid() {
            return Err(PhysicsError::InvalidShape(shape));
        }

        let handle = self.bodies.insert(Body {
            kind: BodyKind::Ghost,
            shape,
            position: parent_position + offset,
            velocity: Vec3::zeros(),
            layer: CollisionLayers::PROBE,
            mask: CollisionLayers::all() - CollisionLayers::PROBE,
            attachment: Some(Attachment { parent, offset }),
        });
        Ok(handle)
    }

    /// Remove a body along with any probes attached to it
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<(), PhysicsError> {
        self.bodies.remove(handle).ok_or(PhysicsError::UnknownBody(handle))?;
        self.bodies
            .retain(|_, body| body.attachment.map_or(true, |attachment| attachment.parent != handle));
        Ok(())
    }

    /// Current linear velocity of a body
    pub fn linear_velocity(&self, handle: BodyHandle) -> Result<Vec3, PhysicsError> {
        Ok(self.body(handle)?.velocity)
    }

    /// Overwrite the linear velocity of a body
    pub fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.velocity = velocity;
        Ok(())
    }

    /// World position of a body's center
    pub fn world_position(&self, handle: BodyHandle) -> Result<Point3, PhysicsError> {
        Ok(Point3::from(self.body(handle)?.position))
    }

    /// Teleport a body; attached probes follow immediately
    pub fn set_world_position(&mut self, handle: BodyHandle, position: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.position = position;
        self.sync_attachments();
        Ok(())
    }

    /// Collision shape of a body
    pub fn shape(&self, handle: BodyHandle) -> Result<CollisionShape, PhysicsError> {
        Ok(self.body(handle)?.shape)
    }

    /// All non-ghost bodies the volume `handle` currently overlaps
    ///
    /// Layer filtering applies in both directions. The queried body itself is
    /// never reported; its parent (for probes) is, so callers filter it.
    pub fn contact_test(&self, handle: BodyHandle) -> Result<Vec<Contact>, PhysicsError> {
        let query = self.body(handle)?;
        let query_shape = query.world_shape();

        let contacts = self
            .bodies
            .iter()
            .filter(|(other, body)| {
                *other != handle
                    && body.kind != BodyKind::Ghost
                    && CollisionLayers::should_collide(query.layer, query.mask, body.layer, body.mask)
            })
            .filter_map(|(other, body)| {
                query_shape.contact(&body.world_shape()).map(|contact| Contact {
                    other,
                    point: Point3::from(contact.point),
                    normal: contact.normal,
                    depth: contact.depth,
                })
            })
            .collect();

        Ok(contacts)
    }

    /// Advance the simulation by `delta_time` seconds
    pub fn step(&mut self, delta_time: f32) {
        if delta_time <= 0.0 {
            return;
        }

        let solids: Vec<(CollisionLayers, CollisionLayers, WorldSpaceShape)> = self
            .bodies
            .values()
            .filter(|body| body.kind == BodyKind::Static)
            .map(|body| (body.layer, body.mask, body.world_shape()))
            .collect();

        let gravity = self.gravity;
        for body in self.bodies.values_mut().filter(|body| body.kind == BodyKind::Dynamic) {
            body.velocity += gravity * delta_time;
            body.position += body.velocity * delta_time;

            for (layer, mask, solid) in &solids {
                if !CollisionLayers::should_collide(body.layer, body.mask, *layer, *mask) {
                    continue;
                }
                if let Some(contact) = body.world_shape().contact(solid) {
                    body.position -= contact.normal * contact.depth;
                    let into_surface = body.velocity.dot(&contact.normal);
                    if into_surface > 0.0 {
                        body.velocity -= contact.normal * into_surface;
                    }
                }
            }
        }

        self.sync_attachments();
    }

    /// Queue wireframe shapes for every collider when debug drawing is enabled
    pub fn debug_draw(&self, draw: &mut DebugDrawSystem) {
        if !self.debug_enabled {
            return;
        }

        let color = Vec4::new(0.0, 1.0, 0.0, 1.0);
        for body in self.bodies.values().filter(|body| body.kind != BodyKind::Ghost) {
            match body.shape {
                CollisionShape::Sphere { radius } => draw.draw_sphere(body.position, radius, color, 0.0),
                CollisionShape::Box { half_extents } => draw.draw_box(body.position, half_extents, color, 0.0),
            }
        }
    }

    /// Remove every body
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    fn body(&self, handle: BodyHandle) -> Result<&Body, PhysicsError> {
        self.bodies.get(handle).ok_or(PhysicsError::UnknownBody(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body, PhysicsError> {
        self.bodies.get_mut(handle).ok_or(PhysicsError::UnknownBody(handle))
    }

    fn sync_attachments(&mut self) {
        let updates: Vec<(BodyHandle, Vec3)> = self
            .bodies
            .iter()
            .filter_map(|(handle, body)| {
                let attachment = body.attachment?;
                let parent = self.bodies.get(attachment.parent)?;
                Some((handle, parent.position + attachment.offset))
            })
            .collect();

        for (handle, position) in updates {
            if let Some(body) = self.bodies.get_mut(handle) {
                body.position = position;
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}
