//! Debug drawing primitives and system
//!
//! Shapes are either temporary (expire after their duration, a duration of
//! zero lasts exactly one frame) or persistent (kept until removed by id).

use crate::foundation::math::{Vec3, Vec4};
use std::collections::HashMap;

/// RGBA color in the 0..1 range
pub type DebugColor = Vec4;

/// Debug shape geometry
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Line segment from start to end
    Line {
        /// Segment start
        start: Vec3,
        /// Segment end
        end: Vec3,
    },
    
    /// Wireframe sphere
    Sphere {
        /// Sphere center
        center: Vec3,
        /// Sphere radius
        radius: f32,
    },
    
    /// Wireframe axis-aligned box
    Box {
        /// Box center
        center: Vec3,
        /// Half size along each axis
        extents: Vec3,
    },
    
    /// Point marker
    Point {
        /// Marker position
        position: Vec3,
        /// Marker size in pixels
        size: f32,
    },
}

/// A shape with its color and remaining lifetime
#[derive(Clone, Debug, PartialEq)]
pub struct DebugPrimitive {
    /// Geometry to draw
    pub shape: DebugShape,
    /// RGBA color
    pub color: DebugColor,
    /// Remaining lifetime in seconds
    pub duration: f32,
}

impl DebugPrimitive {
    /// Decrease duration by delta_time, returns true if expired
    fn tick(&mut self, delta_time: f32) -> bool {
        self.duration -= delta_time;
        self.duration <= 0.0
    }
}

/// Debug drawing system collecting shapes for the renderer
pub struct DebugDrawSystem {
    /// Temporary shapes that expire after their duration
    temporary: Vec<DebugPrimitive>,
    
    /// Persistent shapes that remain until manually removed
    persistent: HashMap<String, DebugPrimitive>,
    
    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            temporary: Vec::new(),
            persistent: HashMap::new(),
            enabled: true,
        }
    }
    
    fn push(&mut self, shape: DebugShape, color: DebugColor, duration: f32) {
        if self.enabled {
            self.temporary.push(DebugPrimitive { shape, color, duration });
        }
    }
    
    /// Draw a line segment (temporary)
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, color: DebugColor, duration: f32) {
        self.push(DebugShape::Line { start, end }, color, duration);
    }
    
    /// Draw a wireframe sphere (temporary)
    pub fn draw_sphere(&mut self, center: Vec3, radius: f32, color: DebugColor, duration: f32) {
        self.push(DebugShape::Sphere { center, radius }, color, duration);
    }
    
    /// Draw a wireframe box (temporary)
    pub fn draw_box(&mut self, center: Vec3, extents: Vec3, color: DebugColor, duration: f32) {
        self.push(DebugShape::Box { center, extents }, color, duration);
    }
    
    /// Draw a point (temporary)
    pub fn draw_point(&mut self, position: Vec3, color: DebugColor, size: f32, duration: f32) {
        self.push(DebugShape::Point { position, size }, color, duration);
    }
    
    /// Draw a persistent shape that remains until explicitly removed
    pub fn draw_persistent(&mut self, id: impl Into<String>, shape: DebugShape, color: DebugColor) {
        if !self.enabled {
            return;
        }
        
        self.persistent.insert(
            id.into(),
            DebugPrimitive {
                shape,
                color,
                duration: f32::INFINITY,
            },
        );
    }
    
    /// Remove a persistent shape
    pub fn clear_persistent(&mut self, id: &str) {
        self.persistent.remove(id);
    }
    
    /// Update shape lifetimes and remove expired temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        self.temporary.retain_mut(|primitive| !primitive.tick(delta_time));
    }
    
    /// All shapes to render this frame (temporary and persistent)
    pub fn primitives(&self) -> impl Iterator<Item = &DebugPrimitive> {
        self.temporary.iter().chain(self.persistent.values())
    }
    
    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.temporary.len() + self.persistent.len()
    }
    
    /// Clear all shapes (temporary and persistent)
    pub fn clear(&mut self) {
        self.temporary.clear();
        self.persistent.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}
