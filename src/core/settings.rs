// Simulation settings shared by every block, boundary and scene

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings loading errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Values the block and boundary wrappers read on every call.
///
/// These were process-wide globals written by the surrounding game; here they
/// travel by reference so every consumer sees the same snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Display units to physics units
    pub world_scale: f32,
    /// Grid cells to display units
    pub shape_scale: f32,
    /// Draw blocks with the segmented chocolate look instead of plain rectangles
    pub chocolate_blocks: bool,
    /// Gate for `Block::can_be_placed`
    pub placement_allowed: bool,

    // Physics
    /// Downward acceleration in physics units per second squared (y grows downward)
    pub gravity: f32,
    /// Fixed physics timestep in seconds
    pub timestep: f32,

    // Stage
    /// Stage width in grid cells
    pub grid_width: u32,
    /// Stage height in grid cells; the floor sits directly below the last row
    pub grid_height: u32,
    /// Frames simulated before a structure is declared stable
    pub settle_frames: u32,
}

/// Settings used when no configuration file is given
pub const DEFAULT_SETTINGS: SimulationSettings = SimulationSettings {
    world_scale: 1.0,
    shape_scale: 25.0,
    chocolate_blocks: false,
    placement_allowed: true,

    gravity: 980.0,
    timestep: 1.0 / 60.0,

    grid_width: 18,
    grid_height: 8,
    settle_frames: 150,
};

impl Default for SimulationSettings {
    fn default() -> Self {
        DEFAULT_SETTINGS
    }
}

impl SimulationSettings {
    /// Load settings from a JSON file. Missing fields fall back to the defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parse settings from a JSON string and validate them
    pub fn from_json(data: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(data)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the physics world cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("world_scale", self.world_scale),
            ("shape_scale", self.shape_scale),
            ("timestep", self.timestep),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be positive and finite, got {value}"),
                });
            }
        }

        if !self.gravity.is_finite() {
            return Err(SettingsError::Invalid {
                field: "gravity",
                reason: format!("must be finite, got {}", self.gravity),
            });
        }

        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(SettingsError::Invalid {
                field: "grid",
                reason: "stage must be at least one cell in each direction".to_string(),
            });
        }

        Ok(())
    }

    /// Size of one grid cell in physics units
    pub fn cell_size(&self) -> f32 {
        self.shape_scale * self.world_scale
    }

    /// Copy of these settings with the placement gate set
    pub fn with_placement_allowed(mut self, allowed: bool) -> Self {
        self.placement_allowed = allowed;
        self
    }
}
