use super::collision::CollisionGroups;
use rapier2d::prelude::*;

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// Surface and mass properties shared by a family of bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMaterial {
    /// Sliding friction coefficient
    pub friction: Real,
    /// Friction needed to start sliding. rapier2d has a single coefficient,
    /// so this is carried for inspection and the collider uses `friction`.
    pub friction_static: Real,
    /// Mass per unit area
    pub density: Real,
    /// Bounciness (0.0 = none)
    pub restitution: Real,
    /// Frames of rest before the body may fall asleep
    pub sleep_threshold: u32,
    /// Velocity damping per second, standing in for air friction
    pub linear_damping: Real,
}

/// Material of every movable block
pub const BLOCK_MATERIAL: BodyMaterial = BodyMaterial {
    friction: 0.9,
    friction_static: 1.4,
    density: 0.0035,
    restitution: 0.0015,
    sleep_threshold: 30,
    // 1% velocity loss per 60 Hz frame
    linear_damping: 0.6,
};

/// Material of static level boundaries
pub const BOUNDARY_MATERIAL: BodyMaterial = BodyMaterial {
    friction: 0.9,
    friction_static: 2.0,
    density: 0.001,
    restitution: 0.0,
    sleep_threshold: 0,
    linear_damping: 0.0,
};

/// Probe rectangles are shrunk to this fraction of the block size
pub const PROBE_SHRINK: Real = 0.85;

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    linear_damping: Real,
    can_sleep: bool,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Isometry::identity(),
            linear_damping: 0.0,
            can_sleep: true,
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            position: Isometry::identity(),
            linear_damping: 0.0,
            can_sleep: false,
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    /// Set the linear damping
    pub fn linear_damping(mut self, damping: Real) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .linear_damping(self.linear_damping)
            .can_sleep(self.can_sleep)
            .build()
    }
}

/// Builder for rectangular colliders
pub struct ColliderBuilder2D {
    shape: SharedShape,
    translation: Option<Vector<Real>>,
    collision_groups: CollisionGroups,
    friction: Real,
    restitution: Real,
    density: Real,
}

impl ColliderBuilder2D {
    /// Create a box-shaped collider from full width and height
    pub fn rectangle(width: Real, height: Real) -> Self {
        Self {
            shape: SharedShape::cuboid(width / 2.0, height / 2.0),
            translation: None,
            collision_groups: CollisionGroups::Default,
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
        }
    }

    /// Apply every surface property of a material
    pub fn material(mut self, material: &BodyMaterial) -> Self {
        self.friction = material.friction;
        self.restitution = material.restitution;
        self.density = material.density;
        self
    }

    /// Place the collider in world space (only meaningful without a parent body)
    pub fn translation(mut self, x: Real, y: Real) -> Self {
        self.translation = Some(vector![x, y]);
        self
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        let mut builder = ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .friction(self.friction)
            .restitution(self.restitution)
            .density(self.density);

        if let Some(translation) = self.translation {
            builder = builder.translation(translation);
        }

        builder.build()
    }
}

/// Body and collider configurations for block-world entities
pub mod presets {
    use super::*;

    /// Movable block body
    pub fn block_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y)
            .linear_damping(BLOCK_MATERIAL.linear_damping)
            .can_sleep(BLOCK_MATERIAL.sleep_threshold > 0)
            .build()
    }

    /// Movable block collider
    pub fn block_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::rectangle(width, height)
            .material(&BLOCK_MATERIAL)
            .build()
    }

    /// Static boundary body
    pub fn boundary_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    /// Static boundary collider
    pub fn boundary_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::rectangle(width, height)
            .material(&BOUNDARY_MATERIAL)
            .build()
    }

    /// Free-standing probe used to test a candidate placement.
    ///
    /// The probe is shrunk so that blocks resting flush against a neighbour
    /// do not count as overlapping it.
    pub fn placement_probe(x: Real, y: Real, width: Real, height: Real) -> Collider {
        ColliderBuilder2D::rectangle(width * PROBE_SHRINK, height * PROBE_SHRINK)
            .translation(x, y)
            .collision_groups(CollisionGroups::PlacementProbe)
            .build()
    }
}
