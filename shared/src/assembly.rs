//! Bridge component set: three rigid bodies and two lock constraints.
//!
//! Every bridge is the trio {art, floor, gear}:
//! - the art body is the visual bridge and the reference pose;
//! - the floor body is the only body the player collides with, kept at the
//!   walkable surface below the art center;
//! - the gear body drives rotation and collides with nothing.
//!
//! Two fixed (lock) joints anchor the art and floor to the gear's pivot, so
//! spinning the gear swings the whole trio as one rigid unit around a point
//! outside the art footprint, which reads as a far-side hinge.
//!
//! Invariant: all three bodies share the same static/dynamic state at all
//! times. Only [`BridgeAssembly::set_kinematic_state`] flips it, and it flips
//! all three together.

use rapier2d::prelude::*;

use crate::constants::{
    FLOOR_DROP_M, FLOOR_THICKNESS_M, GEAR_DENSITY, GEAR_OFFSET_FACTOR, PLATE_DENSITY,
};
use crate::context::SimulationContext;
use crate::level_data::BridgeRecord;
use crate::world::PhysicsWorld;

/// Handles and derived geometry for one bridge's bodies and joints.
pub struct BridgeAssembly {
    pub art: RigidBodyHandle,
    pub floor: RigidBodyHandle,
    pub gear: RigidBodyHandle,
    /// Horizontal offset from the art center to the gear pivot (signed).
    gear_offset_x: f32,
    /// Width of the walkable floor body (consumed by wire geometry).
    floor_width: f32,
}

impl BridgeAssembly {
    /// Build the trio of bodies and wire the two lock constraints.
    ///
    /// All three bodies start fixed with gravity scale zero, so they hold
    /// pose until triggered and do not free-fall once made dynamic.
    pub fn new(record: &BridgeRecord, ctx: &SimulationContext, world: &mut PhysicsWorld) -> Self {
        let gear_offset_x = record.direction.gear_side() * GEAR_OFFSET_FACTOR * record.art_width;
        let half_w = record.art_width / 2.0;
        let half_h = record.art_height / 2.0;

        // Art body: the reference pose. Never collides.
        let art = insert_bridge_body(world, record.start_x, record.start_y);
        let art_collider = ColliderBuilder::cuboid(half_w, half_h)
            .collision_groups(ctx.non_colliding())
            .density(PLATE_DENSITY)
            .build();
        world
            .colliders
            .insert_with_parent(art_collider, art, &mut world.bodies);

        // Gear body: twice the art width, offset fully outside the art
        // footprint on the side the bridge swings around. Never collides.
        let gear = insert_bridge_body(world, record.start_x + gear_offset_x, record.start_y);
        let gear_collider = ColliderBuilder::cuboid(record.art_width, half_h)
            .collision_groups(ctx.non_colliding())
            .density(GEAR_DENSITY)
            .build();
        world
            .colliders
            .insert_with_parent(gear_collider, gear, &mut world.bodies);

        // Floor body: the walkable surface, directly below the art center.
        let floor = insert_bridge_body(world, record.start_x, record.start_y - FLOOR_DROP_M);
        let floor_collider = ColliderBuilder::cuboid(half_w, FLOOR_THICKNESS_M / 2.0)
            .collision_groups(ctx.bridge_floor_groups())
            .density(PLATE_DENSITY)
            .build();
        world
            .colliders
            .insert_with_parent(floor_collider, floor, &mut world.bodies);

        // Lock constraints, both anchored at the gear pivot:
        // in art-local coordinates the gear sits at (gear_offset_x, 0);
        // in floor-local coordinates it sits FLOOR_DROP_M higher.
        let art_joint = FixedJointBuilder::new()
            .local_anchor1(point![0.0, 0.0])
            .local_anchor2(point![gear_offset_x, 0.0]);
        world.impulse_joints.insert(gear, art, art_joint, true);

        let floor_joint = FixedJointBuilder::new()
            .local_anchor1(point![0.0, 0.0])
            .local_anchor2(point![gear_offset_x, FLOOR_DROP_M]);
        world.impulse_joints.insert(gear, floor, floor_joint, true);

        Self {
            art,
            floor,
            gear,
            gear_offset_x,
            floor_width: record.art_width,
        }
    }

    /// All three body handles, gear last.
    pub fn handles(&self) -> [RigidBodyHandle; 3] {
        [self.art, self.floor, self.gear]
    }

    /// Flip the whole trio between fixed and dynamic. The three bodies are
    /// never flipped individually.
    pub fn set_kinematic_state(&self, bodies: &mut RigidBodySet, dynamic: bool) {
        let body_type = if dynamic {
            RigidBodyType::Dynamic
        } else {
            RigidBodyType::Fixed
        };
        for handle in self.handles() {
            if let Some(body) = bodies.get_mut(handle) {
                body.set_body_type(body_type, true);
            }
        }
    }

    /// Zero linear and angular velocity on all three bodies.
    pub fn zero_velocities(&self, bodies: &mut RigidBodySet) {
        for handle in self.handles() {
            if let Some(body) = bodies.get_mut(handle) {
                body.set_linvel(vector![0.0, 0.0], true);
                body.set_angvel(0.0, true);
            }
        }
    }

    /// True if every body in the trio is currently fixed.
    pub fn all_fixed(&self, bodies: &RigidBodySet) -> bool {
        self.handles()
            .iter()
            .all(|&h| bodies.get(h).is_some_and(|b| b.is_fixed()))
    }

    /// Current gear angle (radians, in `(-PI, PI]`).
    pub fn gear_angle(&self, bodies: &RigidBodySet) -> f32 {
        bodies
            .get(self.gear)
            .map(|b| b.rotation().angle())
            .unwrap_or(0.0)
    }

    /// Current gear angular velocity (rad/s).
    pub fn gear_angvel(&self, bodies: &RigidBodySet) -> f32 {
        bodies.get(self.gear).map(|b| b.angvel()).unwrap_or(0.0)
    }

    /// Command the gear's angular velocity. The lock constraints carry the
    /// art and floor bodies along.
    pub fn set_gear_angvel(&self, bodies: &mut RigidBodySet, angvel: f32) {
        if let Some(body) = bodies.get_mut(self.gear) {
            body.set_angvel(angvel, true);
        }
    }

    /// Overwrite the gear angle (the overshoot clamp). Leaves the art and
    /// floor bodies at their integrated pose.
    pub fn clamp_gear_angle(&self, bodies: &mut RigidBodySet, angle: f32) {
        if let Some(body) = bodies.get_mut(self.gear) {
            body.set_rotation(Rotation::new(angle), true);
        }
    }

    /// World-space gear pivot position (wire geometry reads this each frame).
    pub fn gear_position(&self, bodies: &RigidBodySet) -> Vector<f32> {
        bodies
            .get(self.gear)
            .map(|b| *b.translation())
            .unwrap_or_else(|| vector![0.0, 0.0])
    }

    /// Signed horizontal offset from the art center to the gear pivot.
    pub fn gear_offset_x(&self) -> f32 {
        self.gear_offset_x
    }

    /// Width of the walkable floor body (meters).
    pub fn floor_width(&self) -> f32 {
        self.floor_width
    }
}

fn insert_bridge_body(world: &mut PhysicsWorld, x: f32, y: f32) -> RigidBodyHandle {
    let rb = RigidBodyBuilder::fixed()
        .pose(Isometry::translation(x, y))
        .gravity_scale(0.0)
        .build();
    world.bodies.insert(rb)
}
