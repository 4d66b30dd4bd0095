// Game modules: block entities, the scene loop and stability checks

pub mod blocks;
pub mod scene;
pub mod stability;

pub use scene::Scene;
