// Recording draw context with SVG export

use super::{Color, DrawContext, RectMode};
use glam::{Affine2, Vec2};
use serde::Serialize;

/// A resolved drawing command.
///
/// `transform` is the column-major 2x3 matrix `[a, b, c, d, e, f]` in effect
/// when the command was issued (same layout as SVG's `matrix()`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Rect {
        /// Top-left corner in local coordinates (rect mode already applied)
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        transform: [f32; 6],
        fill: Option<Color>,
        stroke: Option<Color>,
        stroke_weight: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        transform: [f32; 6],
        stroke: Option<Color>,
        stroke_weight: f32,
    },
}

#[derive(Debug, Clone, Copy)]
struct DrawState {
    transform: Affine2,
    rect_mode: RectMode,
    fill: Option<Color>,
    stroke: Option<Color>,
    stroke_weight: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            rect_mode: RectMode::Corner,
            fill: Some(Color::WHITE),
            stroke: Some(Color::BLACK),
            stroke_weight: 1.0,
        }
    }
}

/// Draw context that records every command instead of rasterizing it
#[derive(Debug, Default)]
pub struct DrawList {
    state: DrawState,
    saved: Vec<DrawState>,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in issue order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of unmatched `push` calls
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Map a local point through the current transform
    pub fn to_world(&self, x: f32, y: f32) -> Vec2 {
        self.state.transform.transform_point2(Vec2::new(x, y))
    }

    /// Drop recorded commands, keeping the current state
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Render the recorded commands as a standalone SVG document
    pub fn to_svg(&self, width: f32, height: f32) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        svg.push('\n');

        for command in &self.commands {
            let element = match command {
                DrawCommand::Rect {
                    x,
                    y,
                    w,
                    h,
                    transform,
                    fill,
                    stroke,
                    stroke_weight,
                } => format!(
                    r#"  <rect x="{x}" y="{y}" width="{w}" height="{h}" transform="{}" fill="{}" stroke="{}" stroke-width="{stroke_weight}"/>"#,
                    svg_matrix(transform),
                    svg_paint(*fill),
                    svg_paint(*stroke),
                ),
                DrawCommand::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    transform,
                    stroke,
                    stroke_weight,
                } => format!(
                    r#"  <line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" transform="{}" stroke="{}" stroke-width="{stroke_weight}"/>"#,
                    svg_matrix(transform),
                    svg_paint(*stroke),
                ),
            };
            svg.push_str(&element);
            svg.push('\n');
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn svg_matrix(m: &[f32; 6]) -> String {
    format!(
        "matrix({} {} {} {} {} {})",
        m[0], m[1], m[2], m[3], m[4], m[5]
    )
}

fn svg_paint(color: Option<Color>) -> String {
    color.map_or_else(|| "none".to_string(), Color::to_hex)
}

impl DrawContext for DrawList {
    fn push(&mut self) {
        self.saved.push(self.state);
    }

    fn pop(&mut self) {
        match self.saved.pop() {
            Some(state) => self.state = state,
            None => log::warn!("DrawList::pop called without a matching push"),
        }
    }

    fn rect_mode(&mut self, mode: RectMode) {
        self.state.rect_mode = mode;
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform * Affine2::from_translation(Vec2::new(x, y));
    }

    fn rotate(&mut self, angle: f32) {
        self.state.transform = self.state.transform * Affine2::from_angle(angle);
    }

    fn stroke(&mut self, color: Color) {
        self.state.stroke = Some(color);
    }

    fn stroke_weight(&mut self, weight: f32) {
        self.state.stroke_weight = weight;
    }

    fn fill(&mut self, color: Color) {
        self.state.fill = Some(color);
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let (x, y) = match self.state.rect_mode {
            RectMode::Corner => (x, y),
            RectMode::Center => (x - w / 2.0, y - h / 2.0),
        };
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            w,
            h,
            transform: self.state.transform.to_cols_array(),
            fill: self.state.fill,
            stroke: self.state.stroke,
            stroke_weight: self.state.stroke_weight,
        });
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.commands.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            transform: self.state.transform.to_cols_array(),
            stroke: self.state.stroke,
            stroke_weight: self.state.stroke_weight,
        });
    }
}
