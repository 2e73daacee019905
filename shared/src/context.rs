//! Shared, process-wide simulation configuration, passed explicitly.
//!
//! Every body-owning component takes a [`SimulationContext`] at construction
//! instead of reading ambient globals. This keeps collision groups, gravity,
//! and tick timing in one place and makes tests trivial to parameterize.

use rapier2d::prelude::*;

use crate::constants::{
    GEAR_ANGULAR_SPEED, GRAVITY_MPS2, ROTATION_DURATION_TICKS, TICK_RATE_HZ,
};

/// Collision group occupied by the player body.
pub const GROUP_PLAYER: Group = Group::GROUP_1;
/// Collision group occupied by walkable bridge floor bodies.
pub const GROUP_BRIDGE_FLOOR: Group = Group::GROUP_2;
/// Collision group occupied by static terrain.
pub const GROUP_TERRAIN: Group = Group::GROUP_3;

/// Explicit simulation configuration shared by the level loop and every
/// bridge assembly.
#[derive(Clone, Copy, Debug)]
pub struct SimulationContext {
    /// World gravity (m/s^2). Y-up, so this points down.
    pub gravity: Vector<f32>,
    /// Fixed tick rate (Hz).
    pub tick_rate_hz: u32,
    /// Ticks from `trigger()` to the scheduled rotation stop.
    pub rotation_duration_ticks: u64,
    /// Magnitude of the commanded gear angular velocity (rad/s).
    pub gear_angular_speed: f32,
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self {
            gravity: vector![0.0, -GRAVITY_MPS2],
            tick_rate_hz: TICK_RATE_HZ,
            rotation_duration_ticks: ROTATION_DURATION_TICKS,
            gear_angular_speed: GEAR_ANGULAR_SPEED,
        }
    }
}

impl SimulationContext {
    /// Fixed timestep (seconds) derived from the tick rate.
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }

    /// Groups for the player body: collides with terrain and bridge floors.
    pub fn player_groups(&self) -> InteractionGroups {
        InteractionGroups::new(
            GROUP_PLAYER,
            GROUP_TERRAIN | GROUP_BRIDGE_FLOOR,
            InteractionTestMode::And,
        )
    }

    /// Groups for a walkable bridge floor body: collides with the player only.
    pub fn bridge_floor_groups(&self) -> InteractionGroups {
        InteractionGroups::new(GROUP_BRIDGE_FLOOR, GROUP_PLAYER, InteractionTestMode::And)
    }

    /// Groups for static terrain: collides with the player only.
    pub fn terrain_groups(&self) -> InteractionGroups {
        InteractionGroups::new(GROUP_TERRAIN, GROUP_PLAYER, InteractionTestMode::And)
    }

    /// Groups for bodies that must never collide (art and gear bodies).
    pub fn non_colliding(&self) -> InteractionGroups {
        InteractionGroups::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_matches_tick_rate() {
        let ctx = SimulationContext::default();
        assert!((ctx.dt() - 1.0 / 60.0).abs() < 1.0e-9);
    }

    #[test]
    fn player_and_floor_groups_are_mutual() {
        let ctx = SimulationContext::default();
        let player = ctx.player_groups();
        let floor = ctx.bridge_floor_groups();
        assert!(player.test(floor));
        assert!(floor.test(player));
    }

    #[test]
    fn non_colliding_groups_match_nothing() {
        let ctx = SimulationContext::default();
        let none = ctx.non_colliding();
        assert!(!none.test(ctx.player_groups()));
        assert!(!none.test(ctx.terrain_groups()));
        assert!(!none.test(none));
    }
}
