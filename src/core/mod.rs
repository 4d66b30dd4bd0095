// Shared helpers and simulation-wide settings

pub mod math;
pub mod settings;

pub use settings::{SettingsError, SimulationSettings};
