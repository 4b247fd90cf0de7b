//! Game state and core simulation types
//!
//! Everything a tick reads and writes lives here. The whole model is
//! serializable so a holder of authoritative state can snapshot it; cosmetic
//! particle buffers are skipped.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::levelgen;
use crate::consts::*;

/// Shared geometric base embedded in every entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle in radians
    pub facing: f32,
    /// Collision radius
    pub radius: f32,
}

impl Body {
    pub fn at(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            facing: 0.0,
            radius,
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub health: i32,
    pub max_health: i32,
    /// Movement speed in units/s
    pub speed: f32,
    /// Minimum milliseconds between shots
    pub fire_rate_ms: f64,
    /// Simulation time of the last shot
    pub last_shot_ms: f64,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::at(pos, PLAYER_RADIUS),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            speed: PLAYER_SPEED,
            fire_rate_ms: PLAYER_FIRE_RATE_MS,
            // Negative stamp so the first shot is not gated
            last_shot_ms: -PLAYER_FIRE_RATE_MS,
        }
    }
}

/// Kidnapper archetype, fixing base stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KidnapperKind {
    Normal,
    /// Sees farther and moves faster, same one-hit health
    Scout,
    /// Takes two hits, short-sighted, fires faster
    Heavy,
}

impl KidnapperKind {
    pub fn base_health(self) -> i32 {
        match self {
            Self::Normal | Self::Scout => 1,
            Self::Heavy => 2,
        }
    }

    /// View distance before the difficulty bonus
    pub fn base_view_distance(self) -> f32 {
        match self {
            Self::Normal => 300.0,
            Self::Scout => 400.0,
            Self::Heavy => 250.0,
        }
    }

    /// Shoot cooldown before the difficulty reduction
    pub fn base_cooldown_ms(self) -> f64 {
        match self {
            Self::Normal => 1500.0,
            Self::Scout => 1800.0,
            Self::Heavy => 1000.0,
        }
    }

    /// Multiplier applied to patrol and alert speeds
    pub fn speed_factor(self) -> f32 {
        match self {
            Self::Normal => 1.0,
            Self::Scout => 1.3,
            Self::Heavy => 0.8,
        }
    }

    /// Roll an archetype for the given difficulty tier. Scouts join the pool
    /// at tier 1, heavies at tier 2, each at 25% weight.
    pub fn roll(tier: u32, rng: &mut Pcg32) -> Self {
        let roll: u32 = rng.random_range(0..100);
        if tier >= 2 && roll < 25 {
            Self::Heavy
        } else if tier >= 1 && roll < 50 {
            Self::Scout
        } else {
            Self::Normal
        }
    }
}

/// Behavioral state of a kidnapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KidnapperState {
    Idle,
    Patrolling,
    Alerted,
    Shooting,
}

/// An AI-controlled hostile agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kidnapper {
    pub id: u32,
    pub body: Body,
    pub kind: KidnapperKind,
    pub health: i32,
    pub state: KidnapperState,
    pub view_distance: f32,
    /// Full cone width; targets within facing ± half of this are in cone
    pub view_angle: f32,
    pub patrol_points: Vec<Vec2>,
    pub patrol_index: usize,
    /// Decaying pursuit drive in [0, 100]
    pub alertness: f32,
    pub shoot_cooldown_ms: f64,
    pub last_shot_ms: f64,
    /// Last known target position while alerted or shooting
    pub target: Option<Vec2>,
}

impl Kidnapper {
    pub fn new(
        id: u32,
        kind: KidnapperKind,
        pos: Vec2,
        tier: u32,
        patrol_points: Vec<Vec2>,
        rng: &mut Pcg32,
    ) -> Self {
        let cooldown = (kind.base_cooldown_ms() - tier as f64 * 100.0).max(300.0);
        Self {
            id,
            body: Body {
                pos,
                vel: Vec2::ZERO,
                facing: rng.random_range(0.0..std::f32::consts::TAU),
                radius: KIDNAPPER_RADIUS,
            },
            kind,
            health: kind.base_health(),
            state: KidnapperState::Patrolling,
            view_distance: kind.base_view_distance() + tier as f32 * 50.0,
            view_angle: KIDNAPPER_VIEW_ANGLE,
            patrol_points,
            patrol_index: 0,
            alertness: 0.0,
            shoot_cooldown_ms: cooldown,
            last_shot_ms: -cooldown,
            target: None,
        }
    }
}

/// The rescue target. Static set dressing until the level is cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostage {
    pub id: u32,
    pub body: Body,
    pub rescued: bool,
}

/// Who fired a bullet. Player bullets only hit kidnappers and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Kidnapper(u32),
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub body: Body,
    pub damage: i32,
    pub owner: Owner,
    /// Milliseconds of flight before expiry
    pub lifespan_ms: f64,
    /// Simulation time the bullet was spawned
    pub created_at_ms: f64,
}

/// Obstacle material, cosmetic beyond collision/occlusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Wall,
    Crate,
    Hvac,
    WaterTank,
}

/// Axis-aligned rectangle blocking movement, bullets and sight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

/// Role of a spawn zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    Player,
    Kidnapper,
}

/// Circular region consumed at level start to seed entity positions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnZone {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: ZoneKind,
}

/// A collectible heal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthPickup {
    pub id: u32,
    pub body: Body,
    pub heal: i32,
    pub collected: bool,
}

/// A cosmetic particle. No gameplay interaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Packed 0xRRGGBB for the renderer
    pub color: u32,
    pub size: f32,
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Opacity derived from remaining life
    pub fn alpha(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// The static arena for one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RooftopLayout {
    pub width: f32,
    pub height: f32,
    pub obstacles: Vec<Obstacle>,
    pub spawn_zones: Vec<SpawnZone>,
    pub hostage_pos: Vec2,
    pub pickups: Vec<HealthPickup>,
}

impl RooftopLayout {
    /// Arena bounds as a rectangle at the origin
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Per-level configuration produced by the generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub level: u32,
    pub kidnapper_count: u32,
    /// Tier derived from the level number (level / 100)
    pub difficulty: u32,
    pub layout: RooftopLayout,
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Playing,
    Paused,
    LevelComplete,
    GameOver,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// State-owned RNG; every random draw in the core goes through it
    pub rng: Pcg32,
    pub level: u32,
    pub config: LevelConfig,
    pub status: Status,
    /// Accumulated simulated time in milliseconds
    pub time_ms: f64,
    /// Tick counter
    pub ticks: u64,
    pub player: Player,
    pub kidnappers: Vec<Kidnapper>,
    pub hostages: Vec<Hostage>,
    pub bullets: Vec<Bullet>,
    pub pickups: Vec<HealthPickup>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    pub score: u64,
    /// Kills on the current level
    pub kill_count: u32,
    /// Kills across the whole run
    pub total_kills: u32,
    pub kill_streak: u32,
    pub best_streak: u32,
    /// Simulation time of the most recent kill
    pub last_kill_ms: f64,
    /// Cosmetic shake magnitude in [0, 1], decayed each tick
    pub camera_shake: f32,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run on level 1
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let config = levelgen::generate_level(1, &mut rng);
        let mut state = Self {
            seed,
            rng,
            level: 1,
            config,
            status: Status::Playing,
            time_ms: 0.0,
            ticks: 0,
            player: Player::new(Vec2::ZERO),
            kidnappers: Vec::new(),
            hostages: Vec::new(),
            bullets: Vec::new(),
            pickups: Vec::new(),
            particles: Vec::new(),
            score: 0,
            kill_count: 0,
            total_kills: 0,
            kill_streak: 0,
            best_streak: 0,
            last_kill_ms: f64::MIN,
            camera_shake: 0.0,
            next_id: 1,
        };
        state.populate_level();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Regenerate and enter the given level. Run totals carry over,
    /// per-level counters reset.
    pub fn start_level(&mut self, level: u32) {
        self.config = levelgen::generate_level(level, &mut self.rng);
        self.level = level;
        self.score = 0;
        self.kill_count = 0;
        self.kill_streak = 0;
        self.last_kill_ms = f64::MIN;
        self.camera_shake = 0.0;
        self.populate_level();
    }

    /// Seed entities from the current level config
    fn populate_level(&mut self) {
        let layout = &self.config.layout;

        let player_pos = layout
            .spawn_zones
            .iter()
            .find(|z| z.kind == ZoneKind::Player)
            .map(|z| z.pos)
            .unwrap_or(Vec2::new(layout.width / 2.0, layout.height / 2.0));
        self.player = Player::new(player_pos);

        let tier = self.config.difficulty;
        let count = self.config.kidnapper_count;
        let positions = levelgen::spawn_positions(&self.config.layout, count, &mut self.rng);
        let mut kidnappers = Vec::with_capacity(positions.len());
        for pos in positions {
            let id = self.next_entity_id();
            let kind = KidnapperKind::roll(tier, &mut self.rng);
            let route = levelgen::patrol_route(&self.config.layout, &mut self.rng);
            kidnappers.push(Kidnapper::new(id, kind, pos, tier, route, &mut self.rng));
        }
        self.kidnappers = kidnappers;

        let hostage_id = self.next_entity_id();
        self.hostages = vec![Hostage {
            id: hostage_id,
            body: Body::at(self.config.layout.hostage_pos, 15.0),
            rescued: false,
        }];

        self.pickups = self.config.layout.pickups.clone();
        self.bullets.clear();
        self.particles.clear();
        self.status = Status::Playing;
    }

    /// Apply bullet damage to the player, clamping at zero
    pub fn damage_player(&mut self, damage: i32) {
        self.player.health = (self.player.health - damage).max(0);
    }

    /// Record a kill: score, per-level and run totals, streak window
    pub fn record_kill(&mut self) {
        self.kill_count += 1;
        self.total_kills += 1;
        self.score += KILL_SCORE;
        if self.time_ms - self.last_kill_ms <= STREAK_WINDOW_MS {
            self.kill_streak += 1;
        } else {
            self.kill_streak = 1;
        }
        self.best_streak = self.best_streak.max(self.kill_streak);
        self.last_kill_ms = self.time_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_spawns_roster_from_config() {
        let state = GameState::new(7);
        assert_eq!(state.level, 1);
        assert_eq!(state.kidnappers.len(), state.config.kidnapper_count as usize);
        assert_eq!(state.hostages.len(), 1);
        assert!(!state.hostages[0].rescued);
        assert_eq!(state.status, Status::Playing);
    }

    #[test]
    fn player_spawns_inside_player_zone() {
        let state = GameState::new(11);
        let zone = state
            .config
            .layout
            .spawn_zones
            .iter()
            .find(|z| z.kind == ZoneKind::Player)
            .expect("player zone");
        assert!(state.player.body.pos.distance(zone.pos) <= zone.radius);
    }

    #[test]
    fn record_kill_tracks_streaks_within_window() {
        let mut state = GameState::new(3);
        state.time_ms = 1000.0;
        state.record_kill();
        assert_eq!(state.kill_streak, 1);

        state.time_ms = 3000.0;
        state.record_kill();
        assert_eq!(state.kill_streak, 2);
        assert_eq!(state.best_streak, 2);

        // Outside the 5 s window the streak resets
        state.time_ms = 20_000.0;
        state.record_kill();
        assert_eq!(state.kill_streak, 1);
        assert_eq!(state.best_streak, 2);
        assert_eq!(state.score, 3 * crate::consts::KILL_SCORE);
    }

    #[test]
    fn damage_clamps_health_at_zero() {
        let mut state = GameState::new(5);
        state.damage_player(10_000);
        assert_eq!(state.player.health, 0);
    }

    #[test]
    fn snapshot_round_trips_through_serde() {
        let state = GameState::new(42);
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.level, state.level);
        assert_eq!(back.kidnappers.len(), state.kidnappers.len());
        assert_eq!(back.player.health, state.player.health);
    }

    #[test]
    fn archetype_roll_respects_tier_gates() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..200 {
            assert_eq!(KidnapperKind::roll(0, &mut rng), KidnapperKind::Normal);
        }
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..200 {
            assert_ne!(KidnapperKind::roll(1, &mut rng), KidnapperKind::Heavy);
        }
    }
}
