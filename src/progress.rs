//! Run progress facts
//!
//! The simulation core never touches storage; it hands these scalar facts to
//! whoever persists them (a save file, LocalStorage, a server). All update
//! methods are pure accumulators over completed-run events.

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Cumulative progress across runs, serializable for external persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub current_level: u32,
    pub max_level_reached: u32,
    pub total_kills: u32,
    pub total_deaths: u32,
    pub total_score: u64,
    pub best_streak: u32,
    pub pickups_collected: u32,
    /// Accumulated simulated play time in seconds
    pub play_time_s: f64,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            current_level: 1,
            max_level_reached: 1,
            total_kills: 0,
            total_deaths: 0,
            total_score: 0,
            best_streak: 0,
            pickups_collected: 0,
            play_time_s: 0.0,
        }
    }
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entering a level moves the cursor and the high-water mark
    pub fn record_level(&mut self, level: u32) {
        self.current_level = level;
        self.max_level_reached = self.max_level_reached.max(level);
    }

    pub fn record_kill(&mut self) {
        self.total_kills += 1;
    }

    pub fn record_death(&mut self) {
        self.total_deaths += 1;
    }

    pub fn record_pickup(&mut self) {
        self.pickups_collected += 1;
    }

    pub fn record_play_time(&mut self, seconds: f64) {
        self.play_time_s += seconds;
    }

    /// Fold a finished level (complete or lost) into the totals
    pub fn record_session(&mut self, state: &GameState) {
        self.record_level(state.level);
        self.total_kills += state.kill_count;
        self.total_score += state.score;
        self.best_streak = self.best_streak.max(state.best_streak);
        self.pickups_collected += state.pickups.iter().filter(|p| p.collected).count() as u32;
        self.play_time_s += state.time_ms / 1000.0;
    }
}
