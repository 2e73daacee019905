//! Ordered collection of bridges and their trigger zones.
//!
//! Registry order is level-data order and drives trigger resolution:
//! `resolve_active_trigger` returns the first overlapped switch, not the
//! nearest one. The registry also owns the load-time leveling pass that
//! rotates every bridge to its declared start orientation.

use rapier2d::parry::bounding_volume::{Aabb, BoundingVolume};
use rapier2d::prelude::{RigidBodySet, point};

use crate::assembly::BridgeAssembly;
use crate::bridge::{Bridge, RestState};
use crate::context::SimulationContext;
use crate::level_data::{LevelData, LevelError, SwitchRecord};
use crate::scheduler::{RotationScheduler, Tick};
use crate::wire::{Fastener, WireSegment};
use crate::world::PhysicsWorld;

/// A trigger zone: pose plus bounding region, read-only after creation.
pub struct Switch {
    key: String,
    region: Aabb,
}

impl Switch {
    pub fn new(record: &SwitchRecord) -> Self {
        Self {
            key: record.key.clone(),
            region: Aabb::new(
                point![
                    record.start_x - record.half_width,
                    record.start_y - record.half_height
                ],
                point![
                    record.start_x + record.half_width,
                    record.start_y + record.half_height
                ],
            ),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn region(&self) -> &Aabb {
        &self.region
    }

    pub fn overlaps(&self, bounds: &Aabb) -> bool {
        self.region.intersects(bounds)
    }
}

/// All bridges in the level plus their switches, index-aligned.
pub struct BridgeRegistry {
    bridges: Vec<Bridge>,
    switches: Vec<Switch>,
}

impl BridgeRegistry {
    /// Build every bridge and switch from validated level data, inserting
    /// their bodies and joints into `world`.
    ///
    /// Records are re-validated here so hand-built level data fails fast the
    /// same way parsed data does.
    pub fn from_level(
        data: &LevelData,
        ctx: &SimulationContext,
        world: &mut PhysicsWorld,
    ) -> Result<Self, LevelError> {
        let mut bridges = Vec::with_capacity(data.bridges.len());
        let mut switches = Vec::with_capacity(data.bridges.len());

        for record in &data.bridges {
            record.validate()?;

            let assembly = BridgeAssembly::new(record, ctx, world);
            let fastener = Fastener::for_bridge(
                record.direction,
                record.start_x,
                record.start_y,
                record.art_width,
            );
            bridges.push(Bridge::new(
                record.key.clone(),
                record.min_bound,
                record.max_bound,
                record.direction,
                record.up_at_start,
                assembly,
                fastener,
            ));
            switches.push(Switch::new(&record.switch));
        }

        log::info!("registry built with {} bridge(s)", bridges.len());
        Ok(Self { bridges, switches })
    }

    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }

    pub fn bridge(&self, index: usize) -> Option<&Bridge> {
        self.bridges.get(index)
    }

    pub fn switch(&self, index: usize) -> Option<&Switch> {
        self.switches.get(index)
    }

    /// First switch (in registry order) whose region overlaps the player.
    pub fn resolve_active_trigger(&self, player_bounds: &Aabb) -> Option<usize> {
        self.switches
            .iter()
            .position(|s| s.overlaps(player_bounds))
    }

    /// True if any bridge is mid-rotation.
    pub fn any_rotating(&self) -> bool {
        self.bridges.iter().any(Bridge::is_rotating)
    }

    /// Index of the bridge currently rotating, if any.
    pub fn rotating_index(&self) -> Option<usize> {
        self.bridges.iter().position(Bridge::is_rotating)
    }

    /// Trigger `index` and schedule its deadline stop. No-op if the bridge
    /// is already rotating or the index is out of range.
    pub fn trigger(
        &mut self,
        index: usize,
        now: Tick,
        ctx: &SimulationContext,
        bodies: &mut RigidBodySet,
        scheduler: &mut RotationScheduler,
    ) {
        let Some(bridge) = self.bridges.get_mut(index) else {
            return;
        };
        if bridge.trigger(ctx, bodies) {
            scheduler.schedule(now + ctx.rotation_duration_ticks, index);
        }
    }

    /// Deadline stop for `index` (idempotent if the clamp already fired).
    pub fn finish(&mut self, index: usize, bodies: &mut RigidBodySet) {
        if let Some(bridge) = self.bridges.get_mut(index) {
            bridge.finish_rotation(bodies);
        }
    }

    /// Run the overshoot clamp on one bridge, cancelling its deadline if
    /// the clamp stopped it.
    pub fn enforce_bounds(
        &mut self,
        index: usize,
        bodies: &mut RigidBodySet,
        scheduler: &mut RotationScheduler,
    ) {
        if let Some(bridge) = self.bridges.get_mut(index) {
            if bridge.enforce_bounds(bodies) {
                scheduler.cancel(index);
            }
        }
    }

    /// Run the overshoot clamp on every rotating bridge (the leveling pass
    /// has several rotating at once, with no active switch).
    pub fn enforce_bounds_all(
        &mut self,
        bodies: &mut RigidBodySet,
        scheduler: &mut RotationScheduler,
    ) {
        for index in 0..self.bridges.len() {
            self.enforce_bounds(index, bodies, scheduler);
        }
    }

    /// Load-time leveling pass.
    ///
    /// Every bridge whose gear is not resting exactly at a bound, or whose
    /// `up_at_start` flag is set, gets one convergence rotation. A bridge
    /// that must end down has its rest state pre-flipped to Up so the
    /// rotation aims down. Gears spawn at angle zero, so an `up_at_start`
    /// bridge rotates even from a bound angle of zero.
    pub fn initialize_start_positions(
        &mut self,
        now: Tick,
        ctx: &SimulationContext,
        bodies: &mut RigidBodySet,
        scheduler: &mut RotationScheduler,
    ) {
        for (index, bridge) in self.bridges.iter_mut().enumerate() {
            let starts_up = bridge.up_at_start();
            let (min, max) = bridge.bounds();
            let angle = bridge.assembly().gear_angle(bodies);

            // Exact comparison on purpose: a freshly-spawned gear is at
            // its literal rest angle or it is not.
            let at_rest_angle = angle == min || angle == max;
            if !starts_up && at_rest_angle {
                continue;
            }

            if !starts_up {
                // Must end Down: aim the convergence rotation downward.
                bridge.set_rest_state(RestState::Up);
            }
            if bridge.trigger(ctx, bodies) {
                scheduler.schedule(now + ctx.rotation_duration_ticks, index);
            }
        }
    }

    /// This frame's decorative wires, one per bridge, in registry order.
    pub fn wire_segments(&self, bodies: &RigidBodySet) -> Vec<WireSegment> {
        self.bridges.iter().map(|b| b.wire(bodies)).collect()
    }
}
