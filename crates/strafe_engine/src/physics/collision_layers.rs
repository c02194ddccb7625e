//! Collision layer system for filtering contact tests

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Collision layers a body lives on, or may collide with when used as a mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionLayers: u32 {
        /// Player-controlled characters
        const CHARACTER = 1 << 0;
        /// Static level geometry
        const ENVIRONMENT = 1 << 1;
        /// Loose dynamic props
        const PROP = 1 << 2;
        /// Query-only ghost volumes such as ground probes
        const PROBE = 1 << 3;
    }
}

impl CollisionLayers {
    /// Check if two bodies should collide based on their layers and masks
    ///
    /// A's layer must be in B's mask AND B's layer must be in A's mask.
    pub fn should_collide(
        layer_a: CollisionLayers,
        mask_a: CollisionLayers,
        layer_b: CollisionLayers,
        mask_b: CollisionLayers,
    ) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }
}
