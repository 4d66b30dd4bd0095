// Physics system using rapier2d

pub mod body;
mod collision;
mod debug;
mod world;

pub use body::{BodyMaterial, RigidBodyHandle, BLOCK_MATERIAL, BOUNDARY_MATERIAL};
pub use collision::CollisionGroups;
pub use debug::DebugOverlay;
pub use world::{DebugData, PhysicsWorld};

// Re-export commonly used rapier types for convenience
pub use rapier2d::parry::bounding_volume::Aabb;
pub use rapier2d::prelude::{Collider, ColliderHandle, Real, Vector};
