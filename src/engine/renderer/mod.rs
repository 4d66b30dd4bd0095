// 2D immediate-mode drawing interface

mod draw_list;

pub use draw_list::{DrawCommand, DrawList};

use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create a color from its components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

/// How `rect` interprets its x/y arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RectMode {
    /// x/y is the top-left corner
    #[default]
    Corner,
    /// x/y is the center
    Center,
}

/// A 2D drawing surface with a save/restore state stack.
///
/// Mirrors the canvas-style API the game draws with: styling and transforms
/// accumulate until the matching `pop`.
pub trait DrawContext {
    /// Save the current transform and style
    fn push(&mut self);
    /// Restore the most recently saved transform and style
    fn pop(&mut self);

    fn rect_mode(&mut self, mode: RectMode);
    fn translate(&mut self, x: f32, y: f32);
    /// Rotate by `angle` radians
    fn rotate(&mut self, angle: f32);

    fn stroke(&mut self, color: Color);
    fn stroke_weight(&mut self, weight: f32);
    fn fill(&mut self, color: Color);

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);
}

/// Drawing state scope: pushes on creation, pops on drop.
///
/// Derefs to the wrapped context so drawing calls go straight through.
pub struct DrawScope<'a, C: DrawContext + ?Sized> {
    ctx: &'a mut C,
}

impl<'a, C: DrawContext + ?Sized> DrawScope<'a, C> {
    pub fn new(ctx: &'a mut C) -> Self {
        ctx.push();
        Self { ctx }
    }
}

impl<C: DrawContext + ?Sized> Deref for DrawScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.ctx
    }
}

impl<C: DrawContext + ?Sized> DerefMut for DrawScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.ctx
    }
}

impl<C: DrawContext + ?Sized> Drop for DrawScope<'_, C> {
    fn drop(&mut self) {
        self.ctx.pop();
    }
}
