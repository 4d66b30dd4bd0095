use rapier2d::prelude::*;

/// Collision categories used by the block world
///
/// Every simulated body lives in the default category. Placement probes get
/// their own category so they can be queried without ever touching a real body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Blocks and boundaries - interact with everything simulated
    Default = 0b0000_0001,

    /// Placement probes - never collide, only used for region queries
    PlacementProbe = 0b0000_0011,
}

impl CollisionGroups {
    /// Category bits
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self.bits());

        let filter = match self {
            CollisionGroups::Default => Group::ALL,
            // Probes are never inserted into the world, but make sure they
            // would not respond to anything even if they were
            CollisionGroups::PlacementProbe => Group::NONE,
        };

        InteractionGroups::new(memberships, filter)
    }
}
