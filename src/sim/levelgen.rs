//! Procedural rooftop generation
//!
//! Layouts are produced from the state RNG only, so a given seed and level
//! sequence always yields the same arena. Placement uses bounded rejection
//! sampling with explicit fallbacks rather than unbounded retry loops.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{
    Body, HealthPickup, LevelConfig, Obstacle, ObstacleKind, RooftopLayout, SpawnZone, ZoneKind,
};

const BASE_WIDTH: f32 = 1280.0;
const BASE_HEIGHT: f32 = 720.0;
/// Arena growth per difficulty tier
const TIER_SIZE_STEP: f32 = 100.0;
const WALL_THICKNESS: f32 = 20.0;
/// Interior margin used for zone, route and pickup placement
const WALL_PADDING: f32 = 100.0;

const OBSTACLE_KINDS: [ObstacleKind; 4] = [
    ObstacleKind::Wall,
    ObstacleKind::Crate,
    ObstacleKind::Hvac,
    ObstacleKind::WaterTank,
];

/// Build the full configuration for a level
pub fn generate_level(level: u32, rng: &mut Pcg32) -> LevelConfig {
    let difficulty = level / 100;
    let kidnapper_count = (1 + level / 100).clamp(1, 10);

    let layout = generate_layout(difficulty, rng);
    log::info!(
        "generated level {level}: tier {difficulty}, {} kidnappers, {} obstacles, {:.0}x{:.0}",
        kidnapper_count,
        layout.obstacles.len(),
        layout.width,
        layout.height
    );

    LevelConfig {
        level,
        kidnapper_count,
        difficulty,
        layout,
    }
}

fn generate_layout(difficulty: u32, rng: &mut Pcg32) -> RooftopLayout {
    let width = BASE_WIDTH + difficulty as f32 * TIER_SIZE_STEP;
    let height = BASE_HEIGHT + difficulty as f32 * TIER_SIZE_STEP;

    let density = 0.001 + difficulty as f32 * 0.0005;
    let obstacles = generate_obstacles(width, height, density, rng);
    let spawn_zones = generate_spawn_zones(width, height, difficulty, rng);
    let hostage_pos = hostage_position(width, height, &spawn_zones, rng);
    let pickups = generate_pickups(width, height, &obstacles, &spawn_zones, difficulty, rng);

    RooftopLayout {
        width,
        height,
        obstacles,
        spawn_zones,
        hostage_pos,
        pickups,
    }
}

/// Perimeter walls first, then randomly sized interior obstacles. Each
/// candidate gets a single placement attempt and is dropped on overlap.
fn generate_obstacles(width: f32, height: f32, density: f32, rng: &mut Pcg32) -> Vec<Obstacle> {
    let mut obstacles = vec![
        wall(0.0, 0.0, width, WALL_THICKNESS),
        wall(0.0, 0.0, WALL_THICKNESS, height),
        wall(width - WALL_THICKNESS, 0.0, WALL_THICKNESS, height),
        wall(0.0, height - WALL_THICKNESS, width, WALL_THICKNESS),
    ];

    let count = (width * height * density) as usize;
    for _ in 0..count {
        let kind = OBSTACLE_KINDS[rng.random_range(0..OBSTACLE_KINDS.len())];
        let w = rng.random_range(50.0..150.0);
        let h = rng.random_range(50.0..150.0);
        let candidate = Obstacle {
            pos: Vec2::new(
                rng.random_range(WALL_THICKNESS..width - w - WALL_THICKNESS),
                rng.random_range(WALL_THICKNESS..height - h - WALL_THICKNESS),
            ),
            width: w,
            height: h,
            kind,
        };

        let overlaps = obstacles
            .iter()
            .any(|existing| candidate.rect().overlaps(&existing.rect()));
        if !overlaps {
            obstacles.push(candidate);
        }
    }

    obstacles
}

fn wall(x: f32, y: f32, width: f32, height: f32) -> Obstacle {
    Obstacle {
        pos: Vec2::new(x, y),
        width,
        height,
        kind: ObstacleKind::Wall,
    }
}

/// Player zone fixed in the top-left corner; kidnapper zones sampled across
/// the interior, keeping a minimum distance from the player. A zone that
/// exhausts its attempts lands in the far corner instead of being dropped.
fn generate_spawn_zones(width: f32, height: f32, difficulty: u32, rng: &mut Pcg32) -> Vec<SpawnZone> {
    let player_pos = Vec2::new(WALL_PADDING, WALL_PADDING);
    let mut zones = vec![SpawnZone {
        pos: player_pos,
        radius: 50.0,
        kind: ZoneKind::Player,
    }];

    let zone_count = (3 + difficulty / 2).max(3);
    for _ in 0..zone_count {
        let mut pos = Vec2::new(width - WALL_PADDING, height - WALL_PADDING);
        for _ in 0..20 {
            let candidate = interior_point(width, height, rng);
            if candidate.distance(player_pos) > 200.0 {
                pos = candidate;
                break;
            }
        }
        zones.push(SpawnZone {
            pos,
            radius: 80.0,
            kind: ZoneKind::Kidnapper,
        });
    }

    zones
}

/// Somewhere away from every spawn zone, or the arena center as a fallback
fn hostage_position(width: f32, height: f32, zones: &[SpawnZone], rng: &mut Pcg32) -> Vec2 {
    for _ in 0..50 {
        let candidate = interior_point(width, height, rng);
        if zones.iter().all(|z| candidate.distance(z.pos) > 150.0) {
            return candidate;
        }
    }
    Vec2::new(width / 2.0, height / 2.0)
}

fn generate_pickups(
    width: f32,
    height: f32,
    obstacles: &[Obstacle],
    zones: &[SpawnZone],
    difficulty: u32,
    rng: &mut Pcg32,
) -> Vec<HealthPickup> {
    let count = (1 + difficulty / 2).min(3);
    let mut pickups = Vec::with_capacity(count as usize);

    for i in 0..count {
        for _ in 0..30 {
            let candidate = interior_point(width, height, rng);
            let clear_of_zones = zones.iter().all(|z| candidate.distance(z.pos) > 200.0);
            let clear_of_obstacles = !obstacles
                .iter()
                .any(|o| o.rect().contains(candidate));
            if clear_of_zones && clear_of_obstacles {
                pickups.push(HealthPickup {
                    id: i,
                    body: Body::at(candidate, 15.0),
                    heal: 30,
                    collected: false,
                });
                break;
            }
        }
    }

    pickups
}

/// Initial kidnapper positions, cycling through the kidnapper zones with a
/// little jitter inside each
pub fn spawn_positions(layout: &RooftopLayout, count: u32, rng: &mut Pcg32) -> Vec<Vec2> {
    let zones: Vec<&SpawnZone> = layout
        .spawn_zones
        .iter()
        .filter(|z| z.kind == ZoneKind::Kidnapper)
        .collect();
    if zones.is_empty() {
        return vec![Vec2::new(layout.width / 2.0, layout.height / 2.0); count as usize];
    }

    (0..count as usize)
        .map(|i| {
            let zone = zones[i % zones.len()];
            let half = zone.radius / 2.0;
            zone.pos
                + Vec2::new(
                    rng.random_range(-half..half),
                    rng.random_range(-half..half),
                )
        })
        .collect()
}

/// A 3-5 waypoint loop through the arena interior
pub fn patrol_route(layout: &RooftopLayout, rng: &mut Pcg32) -> Vec<Vec2> {
    let count = rng.random_range(3..=5);
    (0..count)
        .map(|_| interior_point(layout.width, layout.height, rng))
        .collect()
}

fn interior_point(width: f32, height: f32, rng: &mut Pcg32) -> Vec2 {
    Vec2::new(
        rng.random_range(WALL_PADDING..width - WALL_PADDING),
        rng.random_range(WALL_PADDING..height - WALL_PADDING),
    )
}
