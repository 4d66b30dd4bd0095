// Scene: the frame loop that owns the world and every entity in it

use std::sync::Arc;

use log::{debug, info};

use super::blocks::{Block, BlockError, BlockKind, BlockPlacement, Boundary};
use crate::core::SimulationSettings;
use crate::engine::physics::{DebugOverlay, PhysicsWorld};
use crate::engine::renderer::DrawContext;

/// Thickness of the stage floor in grid cells
const FLOOR_THICKNESS: f32 = 1.0;

/// Owns the physics world together with the blocks and boundaries in it
pub struct Scene {
    settings: SimulationSettings,
    world: PhysicsWorld,
    boundaries: Vec<Boundary>,
    blocks: Vec<Block>,
    overlay: DebugOverlay,
}

impl Scene {
    /// Create an empty scene
    pub fn new(settings: SimulationSettings) -> Self {
        let mut world = PhysicsWorld::new(settings.gravity);
        world.set_timestep(settings.timestep);
        let overlay = DebugOverlay::new(settings.world_scale);

        Self {
            settings,
            world,
            boundaries: Vec::new(),
            blocks: Vec::new(),
            overlay,
        }
    }

    /// Create a scene with a floor directly below the last grid row
    pub fn with_floor(settings: SimulationSettings) -> Self {
        let mut scene = Self::new(settings);
        let cell = scene.settings.shape_scale;
        let width = scene.settings.grid_width as f32 * cell;
        let floor_top = scene.settings.grid_height as f32 * cell;
        let thickness = FLOOR_THICKNESS * cell;

        scene.add_boundary(
            width / 2.0,
            floor_top + thickness / 2.0,
            width,
            thickness,
        );
        info!(
            "Scene ready: {}x{} grid, floor at y={}",
            scene.settings.grid_width, scene.settings.grid_height, floor_top
        );
        scene
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Open or close the placement gate
    pub fn set_placement_allowed(&mut self, allowed: bool) {
        self.settings.placement_allowed = allowed;
    }

    /// Switch between plain and chocolate block rendering
    pub fn set_chocolate_blocks(&mut self, enabled: bool) {
        self.settings.chocolate_blocks = enabled;
    }

    pub fn overlay_mut(&mut self) -> &mut DebugOverlay {
        &mut self.overlay
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// Add a static boundary (display units, centered)
    pub fn add_boundary(&mut self, x: f32, y: f32, w: f32, h: f32) -> &Boundary {
        let boundary = Boundary::new(x, y, w, h, &mut self.world, &self.settings);
        self.boundaries.push(boundary);
        &self.boundaries[self.boundaries.len() - 1]
    }

    /// Build a placement probe for `kind` without touching the world
    pub fn preview(&self, kind: Arc<BlockKind>, placement: BlockPlacement) -> Block {
        Block::test_placement(kind, placement, &self.settings)
    }

    /// Place a block unconditionally and return its index
    pub fn place(&mut self, kind: Arc<BlockKind>, placement: BlockPlacement) -> usize {
        let block = Block::place(kind, placement, &mut self.world, &self.settings);
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    /// Place a block only if its probe says the spot is free.
    ///
    /// Returns the new block's index, or `None` when placement was refused.
    pub fn try_place(
        &mut self,
        kind: Arc<BlockKind>,
        placement: BlockPlacement,
    ) -> Result<Option<usize>, BlockError> {
        let probe = self.preview(Arc::clone(&kind), placement);
        if !probe.can_be_placed(&self.world, &self.settings)? {
            debug!("Placement refused at {:?}", placement.position);
            return Ok(None);
        }
        Ok(Some(self.place(kind, placement)))
    }

    /// Remove the block at `index` and release its body
    pub fn remove_block(&mut self, index: usize) -> Option<Result<(), BlockError>> {
        if index >= self.blocks.len() {
            return None;
        }
        let block = self.blocks.remove(index);
        Some(block.remove(&mut self.world))
    }

    /// Advance the simulation by one timestep
    pub fn step(&mut self) {
        self.world.step();
    }

    /// Draw every block, then the debug overlay if enabled
    pub fn render<C: DrawContext + ?Sized>(&self, ctx: &mut C) -> Result<(), BlockError> {
        for block in &self.blocks {
            block.show(ctx, &self.world, &self.settings)?;
        }
        self.overlay.draw(ctx, &self.world.debug_data());
        Ok(())
    }

    /// One frame of the outer loop: step then draw
    pub fn frame<C: DrawContext + ?Sized>(&mut self, ctx: &mut C) -> Result<(), BlockError> {
        self.step();
        self.render(ctx)
    }

    /// Indices of blocks that have drifted or tipped since placement
    pub fn moved_blocks(&self) -> Result<Vec<usize>, BlockError> {
        let mut moved = Vec::new();
        for (index, block) in self.blocks.iter().enumerate() {
            if block.check_motion(&self.world)? {
                moved.push(index);
            }
        }
        Ok(moved)
    }

    /// Whether any placed block has moved
    pub fn any_block_moved(&self) -> Result<bool, BlockError> {
        for block in &self.blocks {
            if block.check_motion(&self.world)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Stage size in display units
    pub fn stage_size(&self) -> (f32, f32) {
        let cell = self.settings.shape_scale;
        (
            self.settings.grid_width as f32 * cell,
            (self.settings.grid_height as f32 + FLOOR_THICKNESS) * cell,
        )
    }
}
