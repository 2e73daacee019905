//! Headless demo runner: loads the embedded level, walks the player to the
//! first switch, activates it, and logs what the level does.

mod level;
mod player;

use level::{Level, TickInput};
use shared::SimulationContext;

/// Demo level: two drawbridges with opposite directions, one starting up.
const DEMO_LEVEL: &str = r#"{
    "bridges": [
        {
            "key": "bridge_to_town",
            "start_x": 14.0,
            "start_y": 4.0,
            "up_at_start": false,
            "min_bound": 0.0,
            "max_bound": 1.5707,
            "direction": "counterclockwise",
            "switch": {
                "key": "bridge_to_town_switch",
                "start_x": 4.0,
                "start_y": 1.0,
                "half_width": 1.0,
                "half_height": 1.5
            }
        },
        {
            "key": "main_entrance",
            "start_x": 40.0,
            "start_y": 5.0,
            "up_at_start": true,
            "min_bound": -1.5707,
            "max_bound": 0.0,
            "direction": "clockwise",
            "switch": {
                "key": "main_entrance_switch",
                "start_x": 30.0,
                "start_y": 1.0,
                "half_width": 1.0,
                "half_height": 1.5
            }
        }
    ]
}"#;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ctx = SimulationContext::default();
    let mut level = match Level::from_json(DEMO_LEVEL, ctx, 4.0) {
        Ok(level) => level,
        Err(err) => {
            log::error!("failed to load level: {err}");
            std::process::exit(1);
        }
    };

    // Scripted session: settle and run the leveling pass, press activate on
    // the first switch, then idle while the bridge swings up.
    let total_ticks = 600u64;
    for i in 0..total_ticks {
        let input = TickInput {
            activate: i == 200,
            ..TickInput::default()
        };
        let frame = level.tick(input);

        if frame.tick % 60 == 0 {
            for (idx, wire) in frame.wires.iter().enumerate() {
                log::info!(
                    "tick {:>4} wire[{idx}] ({:.2}, {:.2}) -> ({:.2}, {:.2}) rotating={}",
                    frame.tick,
                    wire.start.x,
                    wire.start.y,
                    wire.end.x,
                    wire.end.y,
                    frame.any_rotating
                );
            }
        }
    }

    for idx in 0..level.registry().len() {
        let Some(bridge) = level.registry().bridge(idx) else {
            continue;
        };
        log::info!(
            "bridge `{}` finished at rest {:?}, gear angle {:.3}",
            bridge.key(),
            bridge.rest_state(),
            bridge.assembly().gear_angle(&level.world().bodies)
        );
    }
}
