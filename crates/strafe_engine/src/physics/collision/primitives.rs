//! Primitive collision volumes and contact generation
//!
//! Spheres and axis-aligned boxes are the only volumes the physics world
//! needs for characters, probes and level geometry. Every pairwise test
//! reports a [`ContactPoint`] whose normal points from the first volume
//! towards the second.

use crate::foundation::math::{Vec3, UP};

/// Contact between two overlapping volumes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    /// Representative point of the contact in world space
    pub point: Vec3,
    /// Unit normal pointing from the first volume towards the second
    pub normal: Vec3,
    /// Overlap along the normal (0 when just touching)
    pub depth: f32,
}

impl ContactPoint {
    /// The same contact seen from the other volume
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Get the penetration depth if intersecting (0.0 if not intersecting)
    pub fn penetration_depth(&self, other: &BoundingSphere) -> f32 {
        let distance = (self.center - other.center).magnitude();
        let radius_sum = self.radius + other.radius;
        if distance < radius_sum {
            radius_sum - distance
        } else {
            0.0
        }
    }

    /// Contact with another sphere
    pub fn contact_sphere(&self, other: &BoundingSphere) -> Option<ContactPoint> {
        if !self.intersects(other) {
            return None;
        }
        
        let offset = other.center - self.center;
        let distance = offset.magnitude();
        // Concentric spheres have no preferred direction; separate along up
        let normal = if distance > 0.0 { offset / distance } else { UP };
        let depth = self.radius + other.radius - distance;
        
        Some(ContactPoint {
            point: self.center + normal * (self.radius - depth * 0.5),
            normal,
            depth,
        })
    }

    /// Contact with an axis-aligned box
    pub fn contact_aabb(&self, aabb: &Aabb) -> Option<ContactPoint> {
        let closest = aabb.closest_point(self.center);
        let offset = closest - self.center;
        let distance_squared = offset.magnitude_squared();
        
        if distance_squared > self.radius * self.radius {
            return None;
        }
        
        if distance_squared > 0.0 {
            let distance = distance_squared.sqrt();
            return Some(ContactPoint {
                point: closest,
                normal: offset / distance,
                depth: self.radius - distance,
            });
        }
        
        // Center inside the box: leave through the nearest face
        let (outward, face_distance) = aabb.nearest_face(self.center);
        Some(ContactPoint {
            point: self.center,
            normal: -outward,
            depth: self.radius + face_distance,
        })
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
    
    /// Create an AABB centered at a point with given half extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }
    
    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
    
    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
    
    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }
    
    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }
    
    /// Closest point inside the box to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }
    
    /// Outward normal and distance of the face nearest to an interior point
    fn nearest_face(&self, point: Vec3) -> (Vec3, f32) {
        let candidates = [
            (Vec3::new(-1.0, 0.0, 0.0), point.x - self.min.x),
            (Vec3::new(1.0, 0.0, 0.0), self.max.x - point.x),
            (Vec3::new(0.0, -1.0, 0.0), point.y - self.min.y),
            (Vec3::new(0.0, 1.0, 0.0), self.max.y - point.y),
            (Vec3::new(0.0, 0.0, -1.0), point.z - self.min.z),
            (Vec3::new(0.0, 0.0, 1.0), self.max.z - point.z),
        ];
        
        candidates
            .into_iter()
            .fold((UP, f32::INFINITY), |best, candidate| {
                if candidate.1 < best.1 { candidate } else { best }
            })
    }
    
    /// Contact with another box, separating along the axis of least overlap
    pub fn contact_aabb(&self, other: &Aabb) -> Option<ContactPoint> {
        if !self.intersects(other) {
            return None;
        }
        
        let overlap_min = self.min.sup(&other.min);
        let overlap_max = self.max.inf(&other.max);
        let overlap = overlap_max - overlap_min;
        let direction = other.center() - self.center();
        
        let mut axis = 0;
        for i in 1..3 {
            if overlap[i] < overlap[axis] {
                axis = i;
            }
        }
        
        let mut normal = Vec3::zeros();
        normal[axis] = if direction[axis] < 0.0 { -1.0 } else { 1.0 };
        
        Some(ContactPoint {
            point: (overlap_min + overlap_max) * 0.5,
            normal,
            depth: overlap[axis],
        })
    }
}
