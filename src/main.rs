//! Headless native entry point
//!
//! Runs a short scripted session against the deterministic core and logs the
//! outcome. Useful for smoke-testing a build and for profiling; the real
//! front end drives the same `tick` from its frame loop.

use glam::Vec2;

use rooftop_rescue::Progress;
use rooftop_rescue::sim::{GameState, Status, TickInput, tick};

const DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xC0FFEE);
    log::info!("starting scripted session with seed {seed}");

    let mut state = GameState::new(seed);
    let arena = Vec2::new(state.config.layout.width, state.config.layout.height);

    // Sweep toward the arena center with the trigger held for up to a minute
    // of simulated play
    for _ in 0..3600 {
        let to_center = arena / 2.0 - state.player.body.pos;
        let input = TickInput {
            right: to_center.x > 10.0,
            left: to_center.x < -10.0,
            down: to_center.y > 10.0,
            up: to_center.y < -10.0,
            shooting: true,
            pointer: state
                .kidnappers
                .first()
                .map(|k| k.body.pos)
                .unwrap_or(arena / 2.0),
            pause: false,
        };
        tick(&mut state, &input, DT);
        if state.status != Status::Playing {
            break;
        }
    }

    let mut progress = Progress::new();
    progress.record_session(&state);
    if state.status == Status::GameOver {
        progress.record_death();
    }

    log::info!(
        "session ended: {:?} after {:.1}s, score {}, kills {}, player health {}",
        state.status,
        state.time_ms / 1000.0,
        state.score,
        state.kill_count,
        state.player.health
    );
    match serde_json::to_string_pretty(&progress) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("failed to serialize progress: {err}"),
    }
}
