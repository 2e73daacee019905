//! Deferred one-shot rotation stops.
//!
//! Rotation completion is modeled as explicit scheduled-event entries
//! (deadline tick + bridge index) polled once per simulation tick by the
//! level loop, not as engine-level timer callbacks. That keeps the bridge
//! state machine pure and the timing fully testable without wall-clock
//! waits.
//!
//! Guarantees
//! - Exactly-once: [`RotationScheduler::take_due`] removes entries as it
//!   yields them.
//! - Cancellable: an early bounds-clamp stop (or level teardown) removes the
//!   pending entry so the deadline can never double-execute the stop.
//! - One entry per bridge: scheduling replaces any stale entry for the same
//!   bridge index.

/// Simulation tick counter. Starts at zero at level load.
pub type Tick = u64;

#[derive(Clone, Copy, Debug)]
struct ScheduledStop {
    deadline: Tick,
    bridge: usize,
}

/// Pending rotation-stop deadlines, polled by the level loop.
#[derive(Default)]
pub struct RotationScheduler {
    entries: Vec<ScheduledStop>,
}

impl RotationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a stop for `bridge` at `deadline`, replacing any entry the
    /// bridge already has.
    pub fn schedule(&mut self, deadline: Tick, bridge: usize) {
        self.cancel(bridge);
        self.entries.push(ScheduledStop { deadline, bridge });
    }

    /// Remove any pending stop for `bridge`. No-op if none is pending.
    pub fn cancel(&mut self, bridge: usize) {
        self.entries.retain(|e| e.bridge != bridge);
    }

    /// Remove every pending stop (level teardown).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drain every stop whose deadline has arrived, in scheduling order.
    pub fn take_due(&mut self, now: Tick) -> Vec<usize> {
        let mut due = Vec::new();
        self.entries.retain(|e| {
            if e.deadline <= now {
                due.push(e.bridge);
                false
            } else {
                true
            }
        });
        due
    }

    /// Deadline currently pending for `bridge`, if any.
    pub fn deadline_for(&self, bridge: usize) -> Option<Tick> {
        self.entries
            .iter()
            .find(|e| e.bridge == bridge)
            .map(|e| e.deadline)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
