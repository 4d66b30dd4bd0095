// Tower stability checks and the line-oriented stability server

use std::io::{BufRead, Write};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::blocks::{BlockPlacement, KindRegistry};
use super::scene::Scene;
use crate::core::SimulationSettings;

/// Stability request errors
#[derive(Debug, thiserror::Error)]
pub enum StabilityError {
    #[error("Malformed request: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Block {index} has non-positive size {w}x{h}")]
    EmptyBlock { index: usize, w: f32, h: f32 },

    #[error("Block {index} has a non-finite field")]
    NonFinite { index: usize },

    #[error(transparent)]
    Block(#[from] super::blocks::BlockError),
}

/// One block of a stability request, in grid cells.
///
/// `y` is the screen row (counted from the top) of the block's bottom cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerializedBlock {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl SerializedBlock {
    /// Center of the block in display units
    pub fn placement(&self, settings: &SimulationSettings) -> BlockPlacement {
        let cell = settings.shape_scale;
        BlockPlacement::new(
            (self.x + self.w / 2.0) * cell,
            (self.y + 1.0 - self.h / 2.0) * cell,
        )
        .at_grid(self.x as i32, self.y as i32)
    }
}

/// Parse one request line: a JSON array of blocks
pub fn parse_request(line: &str) -> Result<Vec<SerializedBlock>, StabilityError> {
    let blocks: Vec<SerializedBlock> = serde_json::from_str(line)?;
    for (index, block) in blocks.iter().enumerate() {
        if ![block.x, block.y, block.w, block.h].iter().all(|v| v.is_finite()) {
            return Err(StabilityError::NonFinite { index });
        }
        if block.w <= 0.0 || block.h <= 0.0 {
            return Err(StabilityError::EmptyBlock {
                index,
                w: block.w,
                h: block.h,
            });
        }
    }
    Ok(blocks)
}

/// Build a floored scene holding every block of the request.
///
/// Blocks are placed unconditionally: the structure is given, not built.
pub fn build_scene(blocks: &[SerializedBlock], settings: &SimulationSettings) -> Scene {
    let mut scene = Scene::with_floor(settings.clone());
    let mut kinds = KindRegistry::new();
    for block in blocks {
        let kind = kinds.get_or_insert(block.w, block.h);
        scene.place(kind, block.placement(settings));
    }
    scene
}

/// Simulate the structure and report whether every block stays put.
///
/// Returns `false` as soon as any block drifts or tips during
/// `settle_frames` frames.
pub fn check_stability(
    blocks: &[SerializedBlock],
    settings: &SimulationSettings,
) -> Result<bool, StabilityError> {
    let mut scene = build_scene(blocks, settings);

    for frame in 0..settings.settle_frames {
        scene.step();
        let moved = scene.moved_blocks()?;
        if !moved.is_empty() {
            debug!("Blocks {:?} moved after {} frames", moved, frame + 1);
            return Ok(false);
        }
    }

    Ok(true)
}

/// Answer stability requests line by line.
///
/// Writes `ready` once, then `true`, `false` or `error` per input line.
/// Blank lines are skipped, and a line that is not UTF-8 gets `error`.
/// Returns the number of requests answered.
pub fn serve<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    settings: &SimulationSettings,
) -> std::io::Result<usize> {
    writeln!(output, "ready")?;
    output.flush()?;
    info!("Stability server ready");

    let mut answered = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let reply = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => match parse_request(line.trim())
                .and_then(|blocks| check_stability(&blocks, settings))
            {
                Ok(stable) => stable.to_string(),
                Err(e) => {
                    warn!("Rejected request: {}", e);
                    "error".to_string()
                }
            },
            Err(e) => {
                warn!("Rejected request: {}", e);
                "error".to_string()
            }
        };
        writeln!(output, "{reply}")?;
        output.flush()?;
        answered += 1;
    }

    info!("Input closed after {} requests", answered);
    Ok(answered)
}
