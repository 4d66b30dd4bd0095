// Block entity: one movable rigid body, or a placement probe

use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use log::debug;

use super::kind::BlockKind;
use crate::core::math::{drifted, oriented_dims};
use crate::core::SimulationSettings;
use crate::engine::physics::{
    body::presets, Collider, ColliderHandle, PhysicsWorld, RigidBodyHandle,
};
use crate::engine::renderer::{Color, DrawContext, DrawScope, RectMode};

/// Grid cell a block was dropped into (column, row)
pub type GridIndex = (i32, i32);

/// Drift along either axis beyond which a placed block counts as moved
pub const MOTION_THRESHOLD: f32 = 10.0;

/// Rotation in radians beyond which a placed block counts as toppled
pub const ROTATION_THRESHOLD: f32 = 0.70;

/// Outline drawn around every block
const OUTLINE_COLOR: Color = Color::rgb(28, 54, 62);
const OUTLINE_WEIGHT: f32 = 2.0;

/// Errors from calling a block operation in the wrong mode
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum BlockError {
    #[error("block is a placement probe and has no simulated body")]
    NotPlaced,

    #[error("block is placed and has no placement probe")]
    NotTesting,

    #[error("rigid body {0:?} is no longer in the physics world")]
    MissingBody(RigidBodyHandle),
}

/// Where and how a block should be created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockPlacement {
    /// Center in display units
    pub position: Vec2,
    /// Swap the kind's width and height
    pub rotated: bool,
    /// Grid cell, when the caller tracks one
    pub grid_index: Option<GridIndex>,
}

impl BlockPlacement {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            rotated: false,
            grid_index: None,
        }
    }

    pub fn rotated(mut self, rotated: bool) -> Self {
        self.rotated = rotated;
        self
    }

    pub fn at_grid(mut self, column: i32, row: i32) -> Self {
        self.grid_index = Some((column, row));
        self
    }
}

/// The two mutually exclusive lives of a block
#[derive(Clone)]
pub enum BlockMode {
    /// Registered in the world and simulated
    Placed {
        body: RigidBodyHandle,
        collider: ColliderHandle,
        /// Physics-space position at creation
        origin: Vec2,
    },
    /// Free-standing probe used to validate a candidate placement
    Testing { probe: Collider },
}

// rapier colliders carry no Debug impl; show the test collider by its bounds
impl fmt::Debug for BlockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placed {
                body,
                collider,
                origin,
            } => f
                .debug_struct("Placed")
                .field("body", body)
                .field("collider", collider)
                .field("origin", origin)
                .finish(),
            Self::Testing { probe } => {
                let bounds = probe.compute_aabb();
                f.debug_struct("Testing")
                    .field("mins", &(bounds.mins.x, bounds.mins.y))
                    .field("maxs", &(bounds.maxs.x, bounds.maxs.y))
                    .finish()
            }
        }
    }
}

/// A block of some kind, either simulated or being test-placed
#[derive(Debug, Clone)]
pub struct Block {
    kind: Arc<BlockKind>,
    grid_index: Option<GridIndex>,
    color: Color,
    /// Oriented display width
    w: f32,
    /// Oriented display height
    h: f32,
    mode: BlockMode,
}

impl Block {
    /// Create a block.
    ///
    /// With `testing_placement` unset the block's body is registered into
    /// `world` immediately. Otherwise only a probe is built and the world is
    /// left untouched.
    pub fn new(
        kind: Arc<BlockKind>,
        placement: BlockPlacement,
        testing_placement: bool,
        world: &mut PhysicsWorld,
        settings: &SimulationSettings,
    ) -> Self {
        if testing_placement {
            Self::test_placement(kind, placement, settings)
        } else {
            Self::place(kind, placement, world, settings)
        }
    }

    /// Create a simulated block and add its body to the world
    pub fn place(
        kind: Arc<BlockKind>,
        placement: BlockPlacement,
        world: &mut PhysicsWorld,
        settings: &SimulationSettings,
    ) -> Self {
        let (w, h) = oriented_dims(
            kind.width,
            kind.height,
            placement.rotated,
            settings.shape_scale,
        );
        let scale = settings.world_scale;
        let origin = placement.position * scale;

        let (body, collider) = world.add_body(
            presets::block_body(origin.x, origin.y),
            presets::block_collider(w * scale, h * scale),
        );
        debug!(
            "Placed {}x{} block at ({}, {}) as {:?}",
            kind.width, kind.height, origin.x, origin.y, body
        );

        Self {
            color: kind.color,
            kind,
            grid_index: placement.grid_index,
            w,
            h,
            mode: BlockMode::Placed {
                body,
                collider,
                origin,
            },
        }
    }

    /// Create a placement probe. Nothing is added to the world.
    pub fn test_placement(
        kind: Arc<BlockKind>,
        placement: BlockPlacement,
        settings: &SimulationSettings,
    ) -> Self {
        let (w, h) = oriented_dims(
            kind.width,
            kind.height,
            placement.rotated,
            settings.shape_scale,
        );
        let scale = settings.world_scale;
        let center = placement.position * scale;

        Self {
            color: kind.color,
            kind,
            grid_index: placement.grid_index,
            w,
            h,
            mode: BlockMode::Testing {
                probe: presets::placement_probe(center.x, center.y, w * scale, h * scale),
            },
        }
    }

    /// Draw the block at its current simulated pose.
    ///
    /// All transform and style changes are scoped and undone before
    /// returning, including on error.
    pub fn show<C: DrawContext + ?Sized>(
        &self,
        ctx: &mut C,
        world: &PhysicsWorld,
        settings: &SimulationSettings,
    ) -> Result<(), BlockError> {
        let (position, angle) = self.pose(world)?;

        let mut env = DrawScope::new(ctx);
        env.rect_mode(RectMode::Center);
        env.translate(
            position.x / settings.world_scale,
            position.y / settings.world_scale,
        );
        env.rotate(angle);
        env.stroke(OUTLINE_COLOR);
        env.stroke_weight(OUTLINE_WEIGHT);
        env.fill(self.color);

        if settings.chocolate_blocks {
            self.kind.draw_chocolate_blocks(&mut *env, self.w, self.h);
        } else {
            env.rect(0.0, 0.0, self.w, self.h);
        }

        Ok(())
    }

    /// Whether the probe's spot is free.
    ///
    /// The probe's bounding box is stretched up to `y = 0` so a block can
    /// never be slid underneath another one. Always `false` while the
    /// placement gate in `settings` is closed.
    pub fn can_be_placed(
        &self,
        world: &PhysicsWorld,
        settings: &SimulationSettings,
    ) -> Result<bool, BlockError> {
        if !settings.placement_allowed {
            return Ok(false);
        }

        let BlockMode::Testing { probe } = &self.mode else {
            return Err(BlockError::NotTesting);
        };

        let mut region = probe.compute_aabb();
        region.mins.y = 0.0;
        Ok(world.query_region(&region).is_empty())
    }

    /// Whether the block has drifted or tipped since it was placed
    pub fn check_motion(&self, world: &PhysicsWorld) -> Result<bool, BlockError> {
        let BlockMode::Placed { origin, .. } = &self.mode else {
            return Err(BlockError::NotPlaced);
        };
        let (position, angle) = self.pose(world)?;

        let x_move = drifted(position.x, origin.x, MOTION_THRESHOLD);
        let y_move = drifted(position.y, origin.y, MOTION_THRESHOLD);
        let rotated = angle.abs() > ROTATION_THRESHOLD;

        Ok(x_move || y_move || rotated)
    }

    /// Take the block's body out of the world
    pub fn remove(self, world: &mut PhysicsWorld) -> Result<(), BlockError> {
        match self.mode {
            BlockMode::Placed { body, .. } => {
                world
                    .remove_rigid_body(body)
                    .ok_or(BlockError::MissingBody(body))?;
                debug!("Removed block body {:?}", body);
                Ok(())
            }
            // Probes never entered the world
            BlockMode::Testing { .. } => Ok(()),
        }
    }

    /// Current physics-space position and rotation of a placed block
    pub fn pose(&self, world: &PhysicsWorld) -> Result<(Vec2, f32), BlockError> {
        let BlockMode::Placed { body, .. } = &self.mode else {
            return Err(BlockError::NotPlaced);
        };
        let body = world
            .get_rigid_body(*body)
            .ok_or(BlockError::MissingBody(*body))?;

        let translation = body.translation();
        Ok((
            Vec2::new(translation.x, translation.y),
            body.rotation().angle(),
        ))
    }

    pub fn kind(&self) -> &Arc<BlockKind> {
        &self.kind
    }

    pub fn grid_index(&self) -> Option<GridIndex> {
        self.grid_index
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Oriented display width
    pub fn width(&self) -> f32 {
        self.w
    }

    /// Oriented display height
    pub fn height(&self) -> f32 {
        self.h
    }

    pub fn mode(&self) -> &BlockMode {
        &self.mode
    }

    pub fn is_testing(&self) -> bool {
        matches!(self.mode, BlockMode::Testing { .. })
    }

    /// Physics-space position recorded at placement
    pub fn origin(&self) -> Option<Vec2> {
        match self.mode {
            BlockMode::Placed { origin, .. } => Some(origin),
            BlockMode::Testing { .. } => None,
        }
    }

    pub fn body_handle(&self) -> Option<RigidBodyHandle> {
        match self.mode {
            BlockMode::Placed { body, .. } => Some(body),
            BlockMode::Testing { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::presets;
    use rapier2d::prelude::{Isometry, Vector};
    use crate::engine::renderer::{DrawCommand, DrawList};
    use approx::assert_relative_eq;

    fn red_domino() -> Arc<BlockKind> {
        Arc::new(BlockKind::new(2.0, 1.0, Color::rgb(255, 0, 0)))
    }

    fn world_for(settings: &SimulationSettings) -> PhysicsWorld {
        PhysicsWorld::new(settings.gravity)
    }

    fn nudge(world: &mut PhysicsWorld, block: &Block, dx: f32, dy: f32) {
        let body = world.get_rigid_body_mut(block.body_handle().unwrap()).unwrap();
        let t = *body.translation();
        body.set_translation(Vector::new(t.x + dx, t.y + dy), true);
    }

    fn turn(world: &mut PhysicsWorld, handle: RigidBodyHandle, angle: f32) {
        let body = world.get_rigid_body_mut(handle).unwrap();
        let t = *body.translation();
        body.set_position(Isometry::new(t, angle), true);
    }

    #[test]
    fn test_unrotated_dimensions() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        let block = Block::new(
            red_domino(),
            BlockPlacement::new(5.0, 5.0),
            false,
            &mut world,
            &settings,
        );

        assert_eq!(block.width(), 2.0 * settings.shape_scale);
        assert_eq!(block.height(), 1.0 * settings.shape_scale);
        assert_eq!(block.color(), Color::rgb(255, 0, 0));
        assert_eq!(
            block.origin(),
            Some(Vec2::new(5.0 * settings.world_scale, 5.0 * settings.world_scale))
        );
    }

    #[test]
    fn test_rotated_dimensions_are_swapped() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        let block = Block::new(
            red_domino(),
            BlockPlacement::new(5.0, 5.0).rotated(true),
            false,
            &mut world,
            &settings,
        );

        assert_eq!(block.width(), 1.0 * settings.shape_scale);
        assert_eq!(block.height(), 2.0 * settings.shape_scale);
    }

    #[test]
    fn test_body_uses_world_scaled_size() {
        let mut settings = SimulationSettings::default();
        settings.world_scale = 2.0;
        let mut world = world_for(&settings);
        let block = Block::place(
            red_domino(),
            BlockPlacement::new(5.0, 5.0),
            &mut world,
            &settings,
        );

        let BlockMode::Placed { collider, origin, .. } = block.mode() else {
            panic!("expected a placed block");
        };
        assert_eq!(*origin, Vec2::new(10.0, 10.0));
        let cuboid = world
            .get_collider(*collider)
            .unwrap()
            .shape()
            .as_cuboid()
            .unwrap();
        assert_relative_eq!(cuboid.half_extents.x, 2.0 * 25.0 * 2.0 / 2.0);
        assert_relative_eq!(cuboid.half_extents.y, 25.0 * 2.0 / 2.0);
    }

    #[test]
    fn test_placed_block_registers_body() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        let block = Block::place(
            red_domino(),
            BlockPlacement::new(5.0, 5.0).at_grid(3, 4),
            &mut world,
            &settings,
        );

        assert_eq!(world.body_count(), 1);
        assert!(!block.is_testing());
        assert_eq!(block.grid_index(), Some((3, 4)));
    }

    #[test]
    fn test_probe_does_not_touch_world() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        let block = Block::new(
            red_domino(),
            BlockPlacement::new(5.0, 5.0),
            true,
            &mut world,
            &settings,
        );

        assert_eq!(world.body_count(), 0);
        assert!(block.is_testing());
        assert!(block.origin().is_none());
        let BlockMode::Testing { probe } = block.mode() else {
            panic!("expected a probe");
        };
        assert_eq!(probe.collision_groups().memberships.bits(), 3);
    }

    #[test]
    fn test_debug_output_for_both_modes() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        let testing = Block::test_placement(red_domino(), BlockPlacement::new(5.0, 5.0), &settings);
        let placed = Block::place(red_domino(), BlockPlacement::new(5.0, 5.0), &mut world, &settings);

        let testing_text = format!("{testing:?}");
        assert!(testing_text.contains("Testing"));
        assert!(testing_text.contains("mins"));
        assert!(format!("{placed:?}").contains("Placed"));
    }

    #[test]
    fn test_no_motion_right_after_placement() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        let block = Block::place(
            red_domino(),
            BlockPlacement::new(100.0, 100.0),
            &mut world,
            &settings,
        );

        assert_eq!(block.check_motion(&world), Ok(false));
    }

    #[test]
    fn test_horizontal_drift_detected() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        let block = Block::place(
            red_domino(),
            BlockPlacement::new(100.0, 100.0),
            &mut world,
            &settings,
        );

        nudge(&mut world, &block, 9.0, 0.0);
        assert_eq!(block.check_motion(&world), Ok(false));
        nudge(&mut world, &block, 6.0, 0.0);
        assert_eq!(block.check_motion(&world), Ok(true));
    }

    #[test]
    fn test_vertical_drift_detected() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        let block = Block::place(
            red_domino(),
            BlockPlacement::new(100.0, 100.0),
            &mut world,
            &settings,
        );

        nudge(&mut world, &block, 0.0, -10.5);
        assert_eq!(block.check_motion(&world), Ok(true));
    }

    #[test]
    fn test_rotation_detected() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        let block = Block::place(
            red_domino(),
            BlockPlacement::new(100.0, 100.0),
            &mut world,
            &settings,
        );
        let handle = block.body_handle().unwrap();

        turn(&mut world, handle, 0.69);
        assert_eq!(block.check_motion(&world), Ok(false));
        turn(&mut world, handle, -0.71);
        assert_eq!(block.check_motion(&world), Ok(true));
    }

    #[test]
    fn test_falling_block_eventually_moves() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        let block = Block::place(
            red_domino(),
            BlockPlacement::new(100.0, 0.0),
            &mut world,
            &settings,
        );

        for _ in 0..30 {
            world.step();
        }
        assert_eq!(block.check_motion(&world), Ok(true));
    }

    #[test]
    fn test_placement_gate_closed() {
        let settings = SimulationSettings::default().with_placement_allowed(false);
        let world = world_for(&settings);
        let probe = Block::test_placement(red_domino(), BlockPlacement::new(50.0, 50.0), &settings);

        // Empty world, but the gate wins
        assert_eq!(probe.can_be_placed(&world, &settings), Ok(false));
    }

    #[test]
    fn test_can_be_placed_in_empty_world() {
        let settings = SimulationSettings::default();
        let world = world_for(&settings);
        let probe = Block::test_placement(red_domino(), BlockPlacement::new(50.0, 50.0), &settings);

        assert_eq!(probe.can_be_placed(&world, &settings), Ok(true));
    }

    #[test]
    fn test_can_be_placed_blocked_from_above() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        // A fixed obstacle well above the candidate spot still blocks it
        world.add_body(
            presets::boundary_body(50.0, 10.0),
            presets::boundary_collider(20.0, 10.0),
        );
        let probe = Block::test_placement(red_domino(), BlockPlacement::new(50.0, 150.0), &settings);

        assert_eq!(probe.can_be_placed(&world, &settings), Ok(false));
    }

    #[test]
    fn test_can_be_placed_beside_neighbour() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        // Neighbour flush against the candidate's left edge
        Block::place(
            red_domino(),
            BlockPlacement::new(50.0, 100.0),
            &mut world,
            &settings,
        );
        let probe = Block::test_placement(red_domino(), BlockPlacement::new(100.0, 100.0), &settings);

        assert_eq!(probe.can_be_placed(&world, &settings), Ok(true));
    }

    #[test]
    fn test_can_be_placed_overlap_below_is_ignored() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        // Floor directly below the candidate: touches the full block but not the shrunk probe
        world.add_body(
            presets::boundary_body(100.0, 125.0),
            presets::boundary_collider(400.0, 25.0),
        );
        let probe = Block::test_placement(red_domino(), BlockPlacement::new(100.0, 100.0), &settings);

        assert_eq!(probe.can_be_placed(&world, &settings), Ok(true));
    }

    #[test]
    fn test_mode_errors() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        let placed = Block::place(
            red_domino(),
            BlockPlacement::new(5.0, 5.0),
            &mut world,
            &settings,
        );
        let probe = Block::test_placement(red_domino(), BlockPlacement::new(5.0, 5.0), &settings);

        assert_eq!(
            placed.can_be_placed(&world, &settings),
            Err(BlockError::NotTesting)
        );
        assert_eq!(probe.check_motion(&world), Err(BlockError::NotPlaced));
        let mut list = DrawList::new();
        assert_eq!(
            probe.show(&mut list, &world, &settings),
            Err(BlockError::NotPlaced)
        );
        assert_eq!(list.depth(), 0);
    }

    #[test]
    fn test_remove_releases_body() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        let block = Block::place(
            red_domino(),
            BlockPlacement::new(5.0, 5.0),
            &mut world,
            &settings,
        );
        let stale = block.clone();

        assert_eq!(block.remove(&mut world), Ok(()));
        assert_eq!(world.body_count(), 0);
        let handle = stale.body_handle().unwrap();
        assert_eq!(stale.check_motion(&world), Err(BlockError::MissingBody(handle)));
    }

    #[test]
    fn test_show_plain_rect() {
        let settings = SimulationSettings::default();
        let mut world = world_for(&settings);
        let block = Block::place(
            red_domino(),
            BlockPlacement::new(100.0, 60.0),
            &mut world,
            &settings,
        );

        let mut list = DrawList::new();
        block.show(&mut list, &world, &settings).unwrap();

        assert_eq!(list.depth(), 0);
        assert_eq!(list.commands().len(), 1);
        let DrawCommand::Rect {
            x,
            y,
            w,
            h,
            transform,
            fill,
            stroke,
            stroke_weight,
        } = list.commands()[0]
        else {
            panic!("expected a rect");
        };
        assert_eq!((w, h), (50.0, 25.0));
        assert_eq!((x, y), (-25.0, -12.5));
        assert_eq!((transform[4], transform[5]), (100.0, 60.0));
        assert_eq!(fill, Some(Color::rgb(255, 0, 0)));
        assert_eq!(stroke, Some(OUTLINE_COLOR));
        assert_eq!(stroke_weight, OUTLINE_WEIGHT);
    }

    #[test]
    fn test_show_divides_by_world_scale() {
        let mut settings = SimulationSettings::default();
        settings.world_scale = 2.0;
        let mut world = world_for(&settings);
        let block = Block::place(
            red_domino(),
            BlockPlacement::new(100.0, 60.0),
            &mut world,
            &settings,
        );

        let mut list = DrawList::new();
        block.show(&mut list, &world, &settings).unwrap();

        let DrawCommand::Rect { transform, .. } = list.commands()[0] else {
            panic!("expected a rect");
        };
        assert_eq!((transform[4], transform[5]), (100.0, 60.0));
    }

    #[test]
    fn test_show_chocolate() {
        let mut settings = SimulationSettings::default();
        settings.chocolate_blocks = true;
        let mut world = world_for(&settings);
        let block = Block::place(
            red_domino(),
            BlockPlacement::new(100.0, 60.0),
            &mut world,
            &settings,
        );

        let mut list = DrawList::new();
        block.show(&mut list, &world, &settings).unwrap();

        assert_eq!(list.depth(), 0);
        // Outline plus one groove between the two cells
        assert_eq!(list.commands().len(), 2);
        assert!(matches!(list.commands()[1], DrawCommand::Line { .. }));
    }
}
