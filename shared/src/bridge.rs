//! The bridge rotation state machine.
//!
//! A bridge cycles between two resting orientations by spinning its gear
//! body for a fixed number of ticks (open-loop: commanded velocity plus a
//! deadline, no angle feedback). Two mechanisms can stop a rotation:
//!
//! 1. the scheduled deadline (the primary mechanism), and
//! 2. the per-tick bounds clamp, which catches overshoot past either bound
//!    and stops early.
//!
//! Whichever fires first wins; the stop itself is idempotent, so the loser
//! firing anyway is a safe no-op. Undershoot (the deadline arriving before
//! the gear reaches its bound) is accepted behavior, not corrected.

use rapier2d::prelude::RigidBodySet;

use crate::assembly::BridgeAssembly;
use crate::context::SimulationContext;
use crate::level_data::RotationDirection;
use crate::wire::{Fastener, WireSegment, wire_segment};
use nalgebra::Point2;

/// Resting orientation of a bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestState {
    Up,
    Down,
}

impl RestState {
    pub fn toggled(self) -> Self {
        match self {
            RestState::Up => RestState::Down,
            RestState::Down => RestState::Up,
        }
    }
}

/// Whether the bridge is at rest or mid-rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Resting,
    Rotating,
}

/// Sign of the gear angular velocity for a rotation toward `target`.
///
/// `direction` fixes which absolute sign corresponds to "up" for this
/// bridge; rotating toward "down" uses the opposite sign. The world is y-up,
/// so clockwise-toward-up is a negative angular velocity.
pub fn angular_sign(direction: RotationDirection, target: RestState) -> f32 {
    match (direction, target) {
        (RotationDirection::Clockwise, RestState::Up) => -1.0,
        (RotationDirection::Clockwise, RestState::Down) => 1.0,
        (RotationDirection::CounterClockwise, RestState::Up) => 1.0,
        (RotationDirection::CounterClockwise, RestState::Down) => -1.0,
    }
}

/// One drawbridge: a component set, its angular bounds, and the two-state
/// rotation cycle.
pub struct Bridge {
    key: String,
    min_bound: f32,
    max_bound: f32,
    direction: RotationDirection,
    up_at_start: bool,
    rest_state: RestState,
    phase: Phase,
    assembly: BridgeAssembly,
    fastener: Fastener,
}

impl Bridge {
    /// Assemble a bridge from its validated pieces.
    ///
    /// Bounds are validated when the level record is loaded; this is a
    /// construction-order guard, not the validation point.
    pub fn new(
        key: String,
        min_bound: f32,
        max_bound: f32,
        direction: RotationDirection,
        up_at_start: bool,
        assembly: BridgeAssembly,
        fastener: Fastener,
    ) -> Self {
        debug_assert!(min_bound <= max_bound, "bounds validated at load time");
        Self {
            key,
            min_bound,
            max_bound,
            direction,
            up_at_start,
            // All gears spawn at angle zero; the leveling pass rotates
            // bridges to their declared start orientation.
            rest_state: RestState::Down,
            phase: Phase::Resting,
            assembly,
            fastener,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn direction(&self) -> RotationDirection {
        self.direction
    }

    /// Declared start orientation from level data.
    pub fn up_at_start(&self) -> bool {
        self.up_at_start
    }

    pub fn rest_state(&self) -> RestState {
        self.rest_state
    }

    pub fn is_rotating(&self) -> bool {
        self.phase == Phase::Rotating
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.min_bound, self.max_bound)
    }

    pub fn assembly(&self) -> &BridgeAssembly {
        &self.assembly
    }

    pub fn fastener(&self) -> &Fastener {
        &self.fastener
    }

    /// Pre-set the resting orientation without rotating.
    ///
    /// Only the registry's leveling pass uses this: a bridge that must rest
    /// down gets its state flipped to Up first, so the convergence rotation
    /// aims down.
    pub(crate) fn set_rest_state(&mut self, rest_state: RestState) {
        self.rest_state = rest_state;
    }

    /// Start a rotation toward the opposite resting orientation.
    ///
    /// Returns `true` if a rotation actually started so the caller can
    /// schedule the deadline stop. Triggering a rotating bridge is a no-op
    /// (`false`), not a fault: state, velocity sign, and any pending
    /// deadline are untouched.
    pub fn trigger(&mut self, ctx: &SimulationContext, bodies: &mut RigidBodySet) -> bool {
        if self.phase == Phase::Rotating {
            log::debug!("bridge `{}` already rotating, trigger ignored", self.key);
            return false;
        }

        let target = self.rest_state.toggled();
        let angvel = angular_sign(self.direction, target) * ctx.gear_angular_speed;

        self.phase = Phase::Rotating;
        self.assembly.set_kinematic_state(bodies, true);
        self.assembly.set_gear_angvel(bodies, angvel);

        log::info!(
            "bridge `{}` rotating toward {:?} (angvel {:.3} rad/s)",
            self.key,
            target,
            angvel
        );
        true
    }

    /// Stop the rotation: zero velocities, freeze all three bodies, flip the
    /// resting orientation.
    ///
    /// Idempotent: stopping an already-resting bridge is a safe no-op, so
    /// the deadline and the bounds clamp can race without double-executing.
    pub fn finish_rotation(&mut self, bodies: &mut RigidBodySet) {
        if self.phase != Phase::Rotating {
            return;
        }

        self.assembly.zero_velocities(bodies);
        self.assembly.set_kinematic_state(bodies, false);
        self.rest_state = self.rest_state.toggled();
        self.phase = Phase::Resting;

        log::info!(
            "bridge `{}` at rest {:?}, gear angle {:.3}",
            self.key,
            self.rest_state,
            self.assembly.gear_angle(bodies)
        );
    }

    /// Per-tick overshoot guard while rotating.
    ///
    /// If the gear angle has escaped `[min_bound, max_bound]`, clamp it to
    /// the violated bound and stop exactly as the deadline would. Returns
    /// `true` when it stopped the bridge, so the caller can cancel the
    /// pending deadline. Does nothing about undershoot.
    pub fn enforce_bounds(&mut self, bodies: &mut RigidBodySet) -> bool {
        if self.phase != Phase::Rotating {
            return false;
        }

        let angle = self.assembly.gear_angle(bodies);
        let clamp_to = if angle > self.max_bound {
            self.max_bound
        } else if angle < self.min_bound {
            self.min_bound
        } else {
            return false;
        };

        log::warn!(
            "bridge `{}` overshot to {:.3}, clamping to {:.3}",
            self.key,
            angle,
            clamp_to
        );
        self.assembly.clamp_gear_angle(bodies, clamp_to);
        self.finish_rotation(bodies);
        true
    }

    /// This frame's decorative wire (pure read of the gear pose).
    pub fn wire(&self, bodies: &RigidBodySet) -> WireSegment {
        let gear_pos = self.assembly.gear_position(bodies);
        wire_segment(
            &self.fastener,
            self.direction,
            self.assembly.gear_angle(bodies),
            Point2::new(gear_pos.x, gear_pos.y),
            self.assembly.floor_width(),
        )
    }
}
