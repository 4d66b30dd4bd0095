use log::debug;
use rapier2d::parry::bounding_volume::{Aabb, BoundingVolume};
use rapier2d::prelude::*;

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier2d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier2d::prelude::ColliderHandle;

/// Physics world shared by every block and boundary.
///
/// Uses screen coordinates: x grows to the right, y grows downward, so
/// gravity is a positive y acceleration.
pub struct PhysicsWorld {
    /// Gravity vector
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,

    /// Number of steps taken so far
    steps: u64,
}

impl PhysicsWorld {
    /// Create a new physics world with the given downward gravity
    pub fn new(gravity: Real) -> Self {
        Self::with_gravity(vector![0.0, gravity])
    }

    /// Create a new physics world with a custom gravity vector
    pub fn with_gravity(gravity: Vector<Real>) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            steps: 0,
        }
    }

    /// Step the physics simulation forward by one timestep
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
        self.steps += 1;
    }

    /// Add a rigid body together with its collider
    pub fn add_body(
        &mut self,
        body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body_handle = self.rigid_body_set.insert(body);
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);
        debug!(
            "Registered body {:?} ({} bodies in world)",
            body_handle,
            self.rigid_body_set.len()
        );
        (body_handle, collider_handle)
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) -> Option<RigidBody> {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        )
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable reference to a rigid body
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Get a reference to a collider
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// All colliders whose bounding box overlaps `region`.
    ///
    /// Scans the whole collider set and computes each bounding box from the
    /// collider's current pose, so bodies registered since the last step are
    /// included. Touching edges count as overlap.
    pub fn query_region(&self, region: &Aabb) -> Vec<ColliderHandle> {
        self.collider_set
            .iter()
            .filter(|(_, collider)| collider.compute_aabb().intersects(region))
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Number of rigid bodies in the world
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Number of steps taken since creation
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vector<Real> {
        self.gravity
    }

    /// Set the timestep for physics simulation
    pub fn set_timestep(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
    }

    /// Get the current timestep
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }

    /// Get references to internal components for debug rendering
    pub fn debug_data(&self) -> DebugData<'_> {
        DebugData {
            rigid_bodies: &self.rigid_body_set,
            colliders: &self.collider_set,
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(980.0)
    }
}

/// Data structure for debug rendering
pub struct DebugData<'a> {
    pub rigid_bodies: &'a RigidBodySet,
    pub colliders: &'a ColliderSet,
}
