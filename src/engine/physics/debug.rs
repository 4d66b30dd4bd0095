use rapier2d::prelude::*;

use super::world::DebugData;
use crate::engine::renderer::{Color, DrawContext, DrawScope};

/// Outline colors by body type
const DYNAMIC_COLOR: Color = Color::rgb(0, 200, 0);
const FIXED_COLOR: Color = Color::rgb(128, 128, 128);
const KINEMATIC_COLOR: Color = Color::rgb(0, 128, 255);
const ORPHAN_COLOR: Color = Color::rgb(255, 255, 255);

/// Draws the outline of every collider in the world.
///
/// Coordinates are divided by `world_scale` so the overlay lines up with
/// blocks drawn in display units.
#[derive(Debug, Clone)]
pub struct DebugOverlay {
    enabled: bool,
    world_scale: Real,
}

impl DebugOverlay {
    pub fn new(world_scale: Real) -> Self {
        Self {
            enabled: false, // Disabled by default
            world_scale,
        }
    }

    /// Enable or disable the overlay
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if the overlay is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Draw every collider of the world onto `ctx`
    pub fn draw<C: DrawContext + ?Sized>(&self, ctx: &mut C, data: &DebugData<'_>) {
        if !self.enabled {
            return;
        }

        for (_handle, collider) in data.colliders.iter() {
            let color = match collider.parent().and_then(|h| data.rigid_bodies.get(h)) {
                Some(body) => match body.body_type() {
                    RigidBodyType::Dynamic => DYNAMIC_COLOR,
                    RigidBodyType::Fixed => FIXED_COLOR,
                    RigidBodyType::KinematicPositionBased
                    | RigidBodyType::KinematicVelocityBased => KINEMATIC_COLOR,
                },
                None => ORPHAN_COLOR,
            };

            self.draw_collider(ctx, collider, color);
        }
    }

    fn draw_collider<C: DrawContext + ?Sized>(&self, ctx: &mut C, collider: &Collider, color: Color) {
        let position = collider.position();
        let mut env = DrawScope::new(ctx);
        env.translate(
            position.translation.x / self.world_scale,
            position.translation.y / self.world_scale,
        );
        env.rotate(position.rotation.angle());
        env.stroke(color);
        env.stroke_weight(1.0);

        match collider.shape().as_cuboid() {
            Some(cuboid) => {
                let w = cuboid.half_extents.x * 2.0 / self.world_scale;
                let h = cuboid.half_extents.y * 2.0 / self.world_scale;
                // Four edges
                let corners = [
                    (-w / 2.0, -h / 2.0),
                    (w / 2.0, -h / 2.0),
                    (w / 2.0, h / 2.0),
                    (-w / 2.0, h / 2.0),
                ];
                for i in 0..4 {
                    let (x1, y1) = corners[i];
                    let (x2, y2) = corners[(i + 1) % 4];
                    env.line(x1, y1, x2, y2);
                }
            }
            None => {
                // For other shapes, draw a simple cross
                let size = 5.0;
                env.line(-size, 0.0, size, 0.0);
                env.line(0.0, -size, 0.0, size);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::{body::presets, PhysicsWorld};
    use crate::engine::renderer::{DrawCommand, DrawList};

    #[test]
    fn test_disabled_overlay_draws_nothing() {
        let mut world = PhysicsWorld::default();
        world.add_body(
            presets::boundary_body(0.0, 0.0),
            presets::boundary_collider(10.0, 10.0),
        );

        let mut list = DrawList::new();
        DebugOverlay::new(1.0).draw(&mut list, &world.debug_data());
        assert!(list.commands().is_empty());
    }

    #[test]
    fn test_box_outline_colored_by_body_type() {
        let mut world = PhysicsWorld::default();
        world.add_body(
            presets::boundary_body(0.0, 0.0),
            presets::boundary_collider(10.0, 10.0),
        );
        world.add_body(
            presets::block_body(50.0, 0.0),
            presets::block_collider(10.0, 10.0),
        );

        let mut overlay = DebugOverlay::new(1.0);
        overlay.set_enabled(true);
        let mut list = DrawList::new();
        overlay.draw(&mut list, &world.debug_data());

        assert_eq!(list.commands().len(), 8);
        assert_eq!(list.depth(), 0);
        let strokes: Vec<_> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { stroke, .. } => *stroke,
                _ => None,
            })
            .collect();
        assert!(strokes.contains(&FIXED_COLOR));
        assert!(strokes.contains(&DYNAMIC_COLOR));
    }
}
