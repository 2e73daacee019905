//! The player rig: one dynamic body driven by velocity-setting inputs.

use shared::SimulationContext;
use shared::world::PhysicsWorld;
use shared::world::rapier2d::parry::bounding_volume::Aabb;
use shared::world::rapier2d::prelude::*;

/// Horizontal run speed applied while a direction key is held (m/s).
pub const RUN_SPEED: f32 = 4.0;
/// Upward velocity applied on jump (m/s).
pub const JUMP_SPEED: f32 = 5.0;

/// Player half extents (meters): a small standing box.
pub const HALF_WIDTH: f32 = 0.4;
pub const HALF_HEIGHT: f32 = 0.9;

/// Handle-holding wrapper around the player's rigid body.
pub struct PlayerRig {
    body: RigidBodyHandle,
}

impl PlayerRig {
    /// Spawn the player at `(x, y)` (body center), colliding with terrain
    /// and bridge floors. Rotation is locked so the box never tips over.
    pub fn new(ctx: &SimulationContext, world: &mut PhysicsWorld, x: f32, y: f32) -> Self {
        let rb = RigidBodyBuilder::dynamic()
            .pose(Isometry::translation(x, y))
            .lock_rotations()
            .build();
        let body = world.bodies.insert(rb);

        let collider = ColliderBuilder::cuboid(HALF_WIDTH, HALF_HEIGHT)
            .collision_groups(ctx.player_groups())
            .build();
        world
            .colliders
            .insert_with_parent(collider, body, &mut world.bodies);

        Self { body }
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn move_left(&self, bodies: &mut RigidBodySet) {
        self.set_horizontal_velocity(bodies, -RUN_SPEED);
    }

    pub fn move_right(&self, bodies: &mut RigidBodySet) {
        self.set_horizontal_velocity(bodies, RUN_SPEED);
    }

    /// Set upward velocity. No ground check: holding jump keeps the player
    /// aloft, which level design tolerates.
    pub fn jump(&self, bodies: &mut RigidBodySet) {
        if let Some(body) = bodies.get_mut(self.body) {
            let vx = body.linvel().x;
            body.set_linvel(vector![vx, JUMP_SPEED], true);
        }
    }

    /// Current world-space bounding box, used for trigger resolution.
    pub fn bounds(&self, bodies: &RigidBodySet) -> Aabb {
        let center = bodies
            .get(self.body)
            .map(|b| *b.translation())
            .unwrap_or_else(|| vector![0.0, 0.0]);
        Aabb::new(
            point![center.x - HALF_WIDTH, center.y - HALF_HEIGHT],
            point![center.x + HALF_WIDTH, center.y + HALF_HEIGHT],
        )
    }

    fn set_horizontal_velocity(&self, bodies: &mut RigidBodySet, vx: f32) {
        if let Some(body) = bodies.get_mut(self.body) {
            let vy = body.linvel().y;
            body.set_linvel(vector![vx, vy], true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_player() -> (SimulationContext, PhysicsWorld, PlayerRig) {
        let ctx = SimulationContext::default();
        let mut world = PhysicsWorld::new(&ctx);
        world.add_terrain_slab(&ctx, vector![0.0, -0.5], vector![50.0, 0.5]);
        let player = PlayerRig::new(&ctx, &mut world, 0.0, HALF_HEIGHT);
        (ctx, world, player)
    }

    #[test]
    fn movement_sets_horizontal_velocity_only() {
        let (_, mut world, player) = world_with_player();

        player.move_right(&mut world.bodies);
        let body = world.bodies.get(player.body()).expect("player exists");
        assert_eq!(body.linvel().x, RUN_SPEED);

        player.move_left(&mut world.bodies);
        let body = world.bodies.get(player.body()).expect("player exists");
        assert_eq!(body.linvel().x, -RUN_SPEED);
    }

    #[test]
    fn player_stands_on_terrain() {
        let (ctx, mut world, player) = world_with_player();
        for _ in 0..120 {
            world.step(&ctx);
        }
        let body = world.bodies.get(player.body()).expect("player exists");
        assert!(body.translation().y > 0.0, "player fell through terrain");
    }

    #[test]
    fn bounds_track_the_body() {
        let (ctx, mut world, player) = world_with_player();
        player.move_right(&mut world.bodies);
        for _ in 0..30 {
            player.move_right(&mut world.bodies);
            world.step(&ctx);
        }
        let bounds = player.bounds(&world.bodies);
        assert!(bounds.mins.x > 0.0, "bounds should follow the moving body");
    }
}
