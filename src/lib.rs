// Physics-backed block placement: blocks, boundaries, scenes and stability checks

pub mod core;
pub mod engine;
pub mod game;
