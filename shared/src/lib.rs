pub mod assembly;
pub mod bridge;
pub mod constants;
pub mod context;
pub mod level_data;
pub mod registry;
pub mod scheduler;
pub mod wire;
pub mod world;

pub use assembly::BridgeAssembly;
pub use bridge::{Bridge, Phase, RestState, angular_sign};
pub use constants::{
    FLOOR_DROP_M, FLOOR_THICKNESS_M, GEAR_ANGULAR_SPEED, GEAR_OFFSET_FACTOR,
    ROTATION_DURATION_TICKS, TICK_RATE_HZ,
};
pub use context::SimulationContext;
pub use level_data::{BridgeRecord, LevelData, LevelError, RotationDirection, SwitchRecord};
pub use registry::{BridgeRegistry, Switch};
pub use scheduler::{RotationScheduler, Tick};
pub use wire::{Fastener, WireSegment, wire_endpoint};
pub use world::PhysicsWorld;
