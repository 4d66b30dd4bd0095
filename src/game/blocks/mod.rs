// Block world entities
//
// - Block kinds and the registry that shares them
// - Blocks: simulated bodies or placement probes
// - Boundaries: static floor, walls and obstacles

pub mod block;
pub mod boundary;
pub mod kind;

// Re-export commonly used types
pub use block::{Block, BlockError, BlockMode, BlockPlacement, GridIndex};
pub use boundary::Boundary;
pub use kind::{BlockKind, KindRegistry};
