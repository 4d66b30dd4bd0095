// Static level edges and obstacles

use glam::Vec2;
use log::debug;

use crate::core::SimulationSettings;
use crate::engine::physics::{body::presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};

/// An immovable rectangle registered into the world at construction
#[derive(Debug, Clone, Copy)]
pub struct Boundary {
    /// Display width
    pub w: f32,
    /// Display height
    pub h: f32,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

impl Boundary {
    /// Create a boundary centered at (`x`, `y`) in display units
    pub fn new(
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        world: &mut PhysicsWorld,
        settings: &SimulationSettings,
    ) -> Self {
        let scale = settings.world_scale;
        let (body, collider) = world.add_body(
            presets::boundary_body(x * scale, y * scale),
            presets::boundary_collider(w * scale, h * scale),
        );
        debug!("Boundary {}x{} at ({}, {}) as {:?}", w, h, x, y, body);

        Self {
            w,
            h,
            body,
            collider,
        }
    }

    pub fn body_handle(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider_handle(&self) -> ColliderHandle {
        self.collider
    }

    /// Physics-space center, if the body is still in the world
    pub fn position(&self, world: &PhysicsWorld) -> Option<Vec2> {
        world.get_rigid_body(self.body).map(|body| {
            let pos = body.translation();
            Vec2::new(pos.x, pos.y)
        })
    }
}
