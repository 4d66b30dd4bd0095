// Engine modules: physics and 2D drawing

pub mod physics;
pub mod renderer;
