//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick consumes one clamped time delta and one input snapshot
//! - Seeded RNG only, owned by the state
//! - Stable iteration order (roster/input order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod geom;
pub mod levelgen;
pub mod movement;
pub mod particles;
pub mod state;
pub mod tick;
pub mod vision;

pub use collision::{BulletHits, bullet_vs_entities, bullet_vs_obstacles, resolve_against_obstacles};
pub use geom::Rect;
pub use levelgen::generate_level;
pub use state::{
    Body, Bullet, GameState, HealthPickup, Hostage, Kidnapper, KidnapperKind, KidnapperState,
    LevelConfig, Obstacle, ObstacleKind, Owner, Particle, Player, RooftopLayout, SpawnZone, Status,
    ZoneKind,
};
pub use tick::{TickInput, tick};
pub use vision::can_see;
