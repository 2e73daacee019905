//! Rapier-based world container for the level simulation.
//!
//! This module owns the Rapier sets and pipeline state needed to step the
//! level at a fixed tick. Bridges insert their bodies and joints here at
//! load time; the level loop calls [`PhysicsWorld::step`] once per tick.

// Re-export Rapier so downstream crates (the level loop) can use Rapier
// macros/types without needing to depend on `rapier2d` directly.
pub use rapier2d;

use rapier2d::prelude::*;

use crate::context::SimulationContext;

/// In-memory Rapier structures for one level: body/collider/joint sets plus
/// the stepping pipeline.
///
/// Built once at level load and stepped at a fixed rate; nothing here is
/// rebuilt mid-level.
pub struct PhysicsWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub impulse_joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
    pub islands: IslandManager,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    pub ccd_solver: CCDSolver,
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
}

impl PhysicsWorld {
    /// Create an empty world with the timestep taken from the context.
    pub fn new(ctx: &SimulationContext) -> Self {
        let mut params = IntegrationParameters::default();
        params.dt = ctx.dt();

        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            pipeline: PhysicsPipeline::new(),
            params,
        }
    }

    /// Advance the simulation by one fixed tick.
    pub fn step(&mut self, ctx: &SimulationContext) {
        // Using default hooks/events (none).
        let hooks = ();
        let events = ();

        self.pipeline.step(
            &ctx.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &hooks,
            &events,
        );
    }

    /// Insert a static terrain slab the player can stand on.
    ///
    /// Terrain is plain fixed geometry: it collides with the player only and
    /// plays no part in the bridge mechanism.
    pub fn add_terrain_slab(
        &mut self,
        ctx: &SimulationContext,
        center: Vector<f32>,
        half_extents: Vector<f32>,
    ) -> RigidBodyHandle {
        let iso = Isometry::translation(center.x, center.y);
        let rb = RigidBodyBuilder::fixed().pose(iso).build();
        let handle = self.bodies.insert(rb);

        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .collision_groups(ctx.terrain_groups())
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GRAVITY_MPS2;
    use crate::context::SimulationContext;

    #[test]
    fn dynamic_body_falls_under_gravity() {
        let ctx = SimulationContext::default();
        let mut world = PhysicsWorld::new(&ctx);

        let rb = RigidBodyBuilder::dynamic()
            .pose(Isometry::translation(0.0, 10.0))
            .build();
        let handle = world.bodies.insert(rb);
        let collider = ColliderBuilder::ball(0.5)
            .collision_groups(ctx.player_groups())
            .build();
        world
            .colliders
            .insert_with_parent(collider, handle, &mut world.bodies);

        for _ in 0..30 {
            world.step(&ctx);
        }

        let body = world.bodies.get(handle).expect("body exists");
        assert!(body.translation().y < 10.0);
        assert!(body.linvel().y < 0.0);
    }

    #[test]
    fn terrain_slab_is_fixed_and_supports_the_player() {
        let ctx = SimulationContext::default();
        let mut world = PhysicsWorld::new(&ctx);
        let slab = world.add_terrain_slab(&ctx, vector![0.0, -0.5], vector![20.0, 0.5]);
        assert!(world.bodies.get(slab).expect("slab exists").is_fixed());

        // Drop a player-group ball onto the slab; it must come to rest above it.
        let rb = RigidBodyBuilder::dynamic()
            .pose(Isometry::translation(0.0, 2.0))
            .build();
        let ball = world.bodies.insert(rb);
        let collider = ColliderBuilder::ball(0.5)
            .collision_groups(ctx.player_groups())
            .build();
        world
            .colliders
            .insert_with_parent(collider, ball, &mut world.bodies);

        for _ in 0..240 {
            world.step(&ctx);
        }

        let body = world.bodies.get(ball).expect("ball exists");
        assert!(body.translation().y > 0.0, "ball fell through the terrain");
        assert!(body.linvel().norm() < 0.5, "ball should settle");
    }

    #[test]
    fn gravity_magnitude_matches_constant() {
        let ctx = SimulationContext::default();
        assert!((ctx.gravity.y + GRAVITY_MPS2).abs() < 1.0e-6);
        assert_eq!(ctx.gravity.x, 0.0);
    }
}
