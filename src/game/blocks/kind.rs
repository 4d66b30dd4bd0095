// Block kinds and the registry that owns them

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::renderer::{Color, DrawContext, RectMode};

/// Palette handed out to kinds in registration order
pub const BLOCK_PALETTE: [Color; 6] = [
    Color::rgb(208, 72, 72),
    Color::rgb(72, 132, 208),
    Color::rgb(232, 176, 48),
    Color::rgb(96, 176, 104),
    Color::rgb(160, 104, 192),
    Color::rgb(224, 128, 64),
];

/// Color of the grooves between chocolate segments
const GROOVE_COLOR: Color = Color::rgb(74, 44, 30);

/// A block shape: nominal size in grid cells plus a color
#[derive(Debug, Clone, PartialEq)]
pub struct BlockKind {
    /// Width in grid cells
    pub width: f32,
    /// Height in grid cells
    pub height: f32,
    /// Fill color
    pub color: Color,
}

impl BlockKind {
    pub fn new(width: f32, height: f32, color: Color) -> Self {
        Self {
            width,
            height,
            color,
        }
    }

    /// Draw the segmented "chocolate bar" appearance of this kind.
    ///
    /// The context is expected to be centered on the block and already
    /// rotated; `w` and `h` are the oriented display size. One segment is
    /// drawn per grid cell.
    pub fn draw_chocolate_blocks<C: DrawContext + ?Sized>(&self, env: &mut C, w: f32, h: f32) {
        env.rect_mode(RectMode::Center);
        env.rect(0.0, 0.0, w, h);

        // Oriented cell counts follow the oriented display size
        let (cols, rows) = if (w >= h) == (self.width >= self.height) {
            (self.width, self.height)
        } else {
            (self.height, self.width)
        };
        let cols = cols.round().max(1.0) as u32;
        let rows = rows.round().max(1.0) as u32;

        env.stroke(GROOVE_COLOR);
        let left = -w / 2.0;
        let top = -h / 2.0;
        for i in 1..cols {
            let x = left + w * i as f32 / cols as f32;
            env.line(x, top, x, top + h);
        }
        for j in 1..rows {
            let y = top + h * j as f32 / rows as f32;
            env.line(left, y, left + w, y);
        }
    }
}

/// Shared owner of block kinds.
///
/// Kinds are interned by their grid dimensions so every block of the same
/// size shares one kind and one color.
#[derive(Debug, Default)]
pub struct KindRegistry {
    kinds: Vec<Arc<BlockKind>>,
    by_size: HashMap<(u32, u32), usize>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the kind with these dimensions, registering it on first use
    pub fn get_or_insert(&mut self, width: f32, height: f32) -> Arc<BlockKind> {
        let key = (width.to_bits(), height.to_bits());
        if let Some(&index) = self.by_size.get(&key) {
            return Arc::clone(&self.kinds[index]);
        }

        let color = BLOCK_PALETTE[self.kinds.len() % BLOCK_PALETTE.len()];
        let kind = Arc::new(BlockKind::new(width, height, color));
        self.by_size.insert(key, self.kinds.len());
        self.kinds.push(Arc::clone(&kind));
        kind
    }

    /// All registered kinds in registration order
    pub fn kinds(&self) -> &[Arc<BlockKind>] {
        &self.kinds
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
