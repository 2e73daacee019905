//! The per-tick level loop.
//!
//! One `Level` owns the physics world, the bridge registry, the rotation
//! scheduler, and the player. Each tick it:
//!
//! 1. runs the overshoot clamp on rotating bridges (the active one, or all
//!    of them during the load-time leveling pass), always before deadline
//!    polling so the clamp wins any race with the timer;
//! 2. polls the scheduler and finishes due rotations (idempotent with 1);
//! 3. applies player input, but only while no bridge is rotating; this is
//!    where the global "one active rotation" policy lives (the bridges
//!    themselves do not enforce it);
//! 4. steps the physics pipeline;
//! 5. recomputes the decorative wires from the fresh poses.
//!
//! Teardown is trivially safe: the scheduler and the registry are owned by
//! the same struct and dropped together, so no deadline can outlive the
//! bridge it targets.

use shared::level_data::LevelData;
use shared::scheduler::{RotationScheduler, Tick};
use shared::wire::WireSegment;
use shared::world::rapier2d::prelude::vector;
use shared::{BridgeRegistry, LevelError, PhysicsWorld, SimulationContext};

use crate::player::{HALF_HEIGHT, PlayerRig};

/// Per-tick input sample: a handful of booleans, already decoupled from any
/// input device.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// The "activate" key: while held over a switch, triggers its bridge.
    pub activate: bool,
}

/// What one tick produced, for rendering and tests.
pub struct TickFrame {
    pub tick: Tick,
    pub any_rotating: bool,
    /// One decorative wire per bridge, in registry order.
    pub wires: Vec<WireSegment>,
}

/// A running level: world, bridges, scheduler, player, tick counter.
pub struct Level {
    ctx: SimulationContext,
    world: PhysicsWorld,
    registry: BridgeRegistry,
    scheduler: RotationScheduler,
    player: PlayerRig,
    /// Switch index of the bridge the player last activated; `None` during
    /// the load-time leveling pass, when several bridges rotate at once.
    active_switch: Option<usize>,
    tick: Tick,
}

impl Level {
    /// Parse, validate, and build a level from JSON.
    ///
    /// Construction also runs the leveling pass: every bridge not already
    /// resting at its declared orientation starts a convergence rotation
    /// that plays out over the first ~seconds of simulation.
    pub fn from_json(
        json: &str,
        ctx: SimulationContext,
        player_spawn_x: f32,
    ) -> Result<Self, LevelError> {
        let data = LevelData::from_json(json)?;
        Self::from_data(&data, ctx, player_spawn_x)
    }

    /// Build a level from already-parsed data (tests construct records
    /// directly).
    pub fn from_data(
        data: &LevelData,
        ctx: SimulationContext,
        player_spawn_x: f32,
    ) -> Result<Self, LevelError> {
        let mut world = PhysicsWorld::new(&ctx);

        // Ground slab under the whole playfield; bridges span gaps above it.
        world.add_terrain_slab(&ctx, vector![0.0, -0.5], vector![200.0, 0.5]);

        let mut registry = BridgeRegistry::from_level(data, &ctx, &mut world)?;
        let player = PlayerRig::new(&ctx, &mut world, player_spawn_x, HALF_HEIGHT);

        let mut scheduler = RotationScheduler::new();
        registry.initialize_start_positions(0, &ctx, &mut world.bodies, &mut scheduler);
        log::info!(
            "level ready: {} bridge(s), leveling pass {}",
            registry.len(),
            if scheduler.is_empty() {
                "idle"
            } else {
                "running"
            }
        );

        Ok(Self {
            ctx,
            world,
            registry,
            scheduler,
            player,
            active_switch: None,
            tick: 0,
        })
    }

    pub fn registry(&self) -> &BridgeRegistry {
        &self.registry
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn player(&self) -> &PlayerRig {
        &self.player
    }

    pub fn tick_count(&self) -> Tick {
        self.tick
    }

    /// Advance the level by one fixed tick.
    pub fn tick(&mut self, input: TickInput) -> TickFrame {
        self.tick += 1;
        let now = self.tick;

        // 1) Overshoot clamp, before the deadline poll.
        if self.registry.any_rotating() {
            match self.active_switch {
                Some(index) => {
                    self.registry
                        .enforce_bounds(index, &mut self.world.bodies, &mut self.scheduler);
                }
                // Leveling pass: several bridges may rotate with no switch
                // pressed. Clamp all of them.
                None => {
                    self.registry
                        .enforce_bounds_all(&mut self.world.bodies, &mut self.scheduler);
                }
            }
        }

        // 2) Deadline stops. Idempotent against step 1.
        for index in self.scheduler.take_due(now) {
            self.registry.finish(index, &mut self.world.bodies);
        }
        if !self.registry.any_rotating() {
            self.active_switch = None;
        }

        // 3) Input, gated on the one-active-rotation policy.
        if self.registry.any_rotating() {
            if input.left || input.right || input.jump || input.activate {
                log::debug!("tick {now}: input suppressed while a bridge rotates");
            }
        } else {
            self.apply_input(now, input);
        }

        // 4) Physics.
        self.world.step(&self.ctx);

        // 5) Decorative wires from the fresh poses.
        let wires = self.registry.wire_segments(&self.world.bodies);

        TickFrame {
            tick: now,
            any_rotating: self.registry.any_rotating(),
            wires,
        }
    }

    fn apply_input(&mut self, now: Tick, input: TickInput) {
        if input.left {
            self.player.move_left(&mut self.world.bodies);
        } else if input.right {
            self.player.move_right(&mut self.world.bodies);
        }
        if input.jump {
            self.player.jump(&mut self.world.bodies);
        }

        if input.activate {
            let bounds = self.player.bounds(&self.world.bodies);
            if let Some(index) = self.registry.resolve_active_trigger(&bounds) {
                self.active_switch = Some(index);
                self.registry.trigger(
                    index,
                    now,
                    &self.ctx,
                    &mut self.world.bodies,
                    &mut self.scheduler,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::RestState;
    use shared::level_data::{BridgeRecord, RotationDirection, SwitchRecord};
    use std::f32::consts::FRAC_PI_2;

    /// Generous upper bound on a full rotation: duration plus slack for the
    /// clamp path and settling.
    const CYCLE_TICKS: u32 = 90;

    fn bridge_record(key: &str, switch_x: f32) -> BridgeRecord {
        BridgeRecord {
            key: key.to_string(),
            start_x: 10.0,
            start_y: 4.0,
            up_at_start: false,
            min_bound: 0.0,
            max_bound: FRAC_PI_2,
            direction: RotationDirection::CounterClockwise,
            art_width: 8.0,
            art_height: 1.0,
            switch: SwitchRecord {
                key: format!("{key}_switch"),
                start_x: switch_x,
                start_y: 1.0,
                half_width: 1.0,
                half_height: 1.5,
            },
        }
    }

    fn level_with(records: Vec<BridgeRecord>, player_spawn_x: f32) -> Level {
        let data = LevelData { bridges: records };
        Level::from_data(&data, SimulationContext::default(), player_spawn_x)
            .expect("level should build")
    }

    fn run_idle(level: &mut Level, ticks: u32) {
        for _ in 0..ticks {
            level.tick(TickInput::default());
        }
    }

    #[test]
    fn down_at_start_bridge_at_its_bound_never_moves() {
        // Gear spawns at 0 == min_bound, up_at_start is false: the leveling
        // pass must not fire.
        let mut level = level_with(vec![bridge_record("bridge_to_town", 0.0)], 50.0);

        assert!(!level.registry().any_rotating());
        run_idle(&mut level, 10);

        let bridge = level.registry().bridge(0).expect("bridge 0");
        assert_eq!(bridge.rest_state(), RestState::Down);
        assert_eq!(
            bridge.assembly().gear_angle(&level.world().bodies),
            0.0
        );
    }

    #[test]
    fn up_at_start_bridge_levels_to_up() {
        let mut rec = bridge_record("main_entrance", 0.0);
        rec.up_at_start = true;
        rec.min_bound = -FRAC_PI_2;
        rec.max_bound = 0.0;
        rec.direction = RotationDirection::Clockwise;
        let mut level = level_with(vec![rec], 50.0);

        // The leveling pass fires even though the gear starts at a bound.
        assert!(level.registry().any_rotating());
        run_idle(&mut level, CYCLE_TICKS);

        let bridge = level.registry().bridge(0).expect("bridge 0");
        assert!(!bridge.is_rotating());
        assert_eq!(bridge.rest_state(), RestState::Up);

        let angle = bridge.assembly().gear_angle(&level.world().bodies);
        assert!(
            (-FRAC_PI_2 - 1.0e-4..=1.0e-4).contains(&angle),
            "gear angle {angle} escaped [-PI/2, 0]"
        );
        assert!(bridge.assembly().all_fixed(&level.world().bodies));
    }

    #[test]
    fn bounds_invariant_holds_every_tick_of_a_rotation() {
        let mut rec = bridge_record("cave_bridge", 0.0);
        rec.up_at_start = true;
        let mut level = level_with(vec![rec], 50.0);

        // The clamp runs before the physics step, so the pose observed after
        // a tick may transiently exceed a bound by up to one tick of travel
        // before the next tick's clamp corrects it.
        let ctx = SimulationContext::default();
        let slack = ctx.gear_angular_speed * ctx.dt() + 1.0e-4;

        for _ in 0..CYCLE_TICKS {
            level.tick(TickInput::default());
            let bridge = level.registry().bridge(0).expect("bridge 0");
            let angle = bridge.assembly().gear_angle(&level.world().bodies);
            let (min, max) = bridge.bounds();
            assert!(
                angle >= min - slack && angle <= max + slack,
                "angle {angle} outside [{min}, {max}] after enforce_bounds"
            );
        }
    }

    #[test]
    fn activate_over_switch_triggers_and_completes_a_cycle() {
        // Switch directly under the player spawn.
        let mut level = level_with(vec![bridge_record("bridge_to_town", 0.0)], 0.0);
        run_idle(&mut level, 30); // let the player settle on the ground

        let frame = level.tick(TickInput {
            activate: true,
            ..TickInput::default()
        });
        assert!(frame.any_rotating, "activate over the switch should trigger");

        run_idle(&mut level, CYCLE_TICKS);
        let bridge = level.registry().bridge(0).expect("bridge 0");
        assert!(!bridge.is_rotating());
        assert_eq!(bridge.rest_state(), RestState::Up);
    }

    #[test]
    fn two_full_cycles_return_to_the_original_state() {
        let mut level = level_with(vec![bridge_record("bridge_to_town", 0.0)], 0.0);
        run_idle(&mut level, 30);

        for _ in 0..2 {
            level.tick(TickInput {
                activate: true,
                ..TickInput::default()
            });
            run_idle(&mut level, CYCLE_TICKS);
        }

        let bridge = level.registry().bridge(0).expect("bridge 0");
        assert_eq!(bridge.rest_state(), RestState::Down);
        assert!(bridge.assembly().all_fixed(&level.world().bodies));
        for handle in bridge.assembly().handles() {
            let body = level.world().bodies.get(handle).expect("body exists");
            assert_eq!(body.linvel().norm(), 0.0);
            assert_eq!(body.angvel(), 0.0);
        }
    }

    #[test]
    fn trigger_is_suppressed_while_another_bridge_rotates() {
        // Two bridges; both switches sit under the player spawn, so the
        // activate key alone decides what happens.
        let far = {
            let mut rec = bridge_record("far_bridge", 0.0);
            rec.start_x = 60.0;
            rec.switch.start_x = 0.5;
            rec
        };
        let mut level = level_with(vec![bridge_record("near_bridge", 0.0), far], 0.0);
        run_idle(&mut level, 30);

        // First activate: lower-index switch wins even though both overlap.
        level.tick(TickInput {
            activate: true,
            ..TickInput::default()
        });
        assert!(level.registry().bridge(0).expect("bridge 0").is_rotating());
        assert!(!level.registry().bridge(1).expect("bridge 1").is_rotating());

        // Holding activate during the rotation must not start bridge 1.
        for _ in 0..10 {
            level.tick(TickInput {
                activate: true,
                ..TickInput::default()
            });
            assert!(
                !level.registry().bridge(1).expect("bridge 1").is_rotating(),
                "second trigger must be suppressed while the first rotates"
            );
        }
    }

    #[test]
    fn movement_input_is_ignored_while_rotating() {
        let mut level = level_with(vec![bridge_record("bridge_to_town", 0.0)], 0.0);
        run_idle(&mut level, 30);

        level.tick(TickInput {
            activate: true,
            ..TickInput::default()
        });
        assert!(level.registry().any_rotating());

        // Pushing right while the bridge rotates must not set run velocity.
        level.tick(TickInput {
            right: true,
            ..TickInput::default()
        });
        let body = level
            .world()
            .bodies
            .get(level.player().body())
            .expect("player exists");
        assert!(
            body.linvel().x.abs() < crate::player::RUN_SPEED / 2.0,
            "player run speed applied while a bridge was rotating"
        );
    }

    #[test]
    fn frames_report_one_wire_per_bridge() {
        let far = {
            let mut rec = bridge_record("far_bridge", 30.0);
            rec.start_x = 60.0;
            rec
        };
        let mut level = level_with(vec![bridge_record("near_bridge", 0.0), far], 50.0);
        let frame = level.tick(TickInput::default());
        assert_eq!(frame.wires.len(), 2);
        assert_eq!(frame.tick, 1);
    }
}
