//! Per-frame simulation tick
//!
//! One call to [`tick`] advances the whole game by a single frame, running
//! every phase in a fixed order: player input and movement, obstacle
//! resolution, shooting, AI, bullet flight and expiry, collision passes,
//! damage and death, alert propagation, particles, pickups, win/lose.
//! Given the same state, inputs and deltas, the result is bit-identical.

use glam::Vec2;

use super::collision::{bullet_vs_entities, bullet_vs_obstacles, resolve_against_obstacles};
use super::geom::circles_overlap;
use super::state::{Body, Bullet, GameState, Owner, Status};
use super::{ai, movement, particles};
use crate::consts::*;
use crate::vec_from_angle;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire button held
    pub shooting: bool,
    /// Aim point in arena coordinates
    pub pointer: Vec2,
    /// Pause was pressed this frame (edge, not level)
    pub pause: bool,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.status {
            Status::Playing => {
                state.status = Status::Paused;
                return;
            }
            Status::Paused => state.status = Status::Playing,
            _ => {}
        }
    }
    if state.status != Status::Playing {
        return;
    }

    // A stalled frame must not produce a runaway integration
    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.ticks += 1;
    state.time_ms += (dt * 1000.0) as f64;
    let now_ms = state.time_ms;

    state.camera_shake *= 0.9;
    if state.camera_shake < 0.01 {
        state.camera_shake = 0.0;
    }

    let bounds = state.config.layout.bounds();

    // Player movement and obstacle resolution
    movement::apply_player_input(&mut state.player, input, dt);
    movement::constrain_to_bounds(&mut state.player.body, bounds);
    resolve_against_obstacles([&mut state.player.body], &state.config.layout.obstacles);

    // Player shooting, gated by fire rate
    if input.shooting && now_ms - state.player.last_shot_ms >= state.player.fire_rate_ms {
        let pos = state.player.body.pos;
        let facing = state.player.body.facing;
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            body: Body {
                pos,
                vel: vec_from_angle(facing) * PLAYER_BULLET_SPEED,
                facing,
                radius: BULLET_RADIUS,
            },
            damage: PLAYER_BULLET_DAMAGE,
            owner: Owner::Player,
            lifespan_ms: BULLET_LIFESPAN_MS,
            created_at_ms: now_ms,
        });
        state.player.last_shot_ms = now_ms;
        particles::spawn_muzzle_flash(&mut state.particles, pos, facing, &mut state.rng);
    }

    // AI update and obstacle resolution for the roster
    ai::update(
        &mut state.kidnappers,
        &state.player,
        &state.config.layout.obstacles,
        dt,
    );
    resolve_against_obstacles(
        state.kidnappers.iter_mut().map(|k| &mut k.body),
        &state.config.layout.obstacles,
    );

    // Enemy fire
    let mut roster = std::mem::take(&mut state.kidnappers);
    let new_bullets = ai::bullets_to_spawn(&mut roster, now_ms, || state.next_entity_id());
    state.kidnappers = roster;
    for bullet in &new_bullets {
        particles::spawn_muzzle_flash(
            &mut state.particles,
            bullet.body.pos,
            bullet.body.facing,
            &mut state.rng,
        );
    }
    state.bullets.extend(new_bullets);

    // Bullet flight and expiry, then drop those that hit an obstacle
    for bullet in &mut state.bullets {
        movement::integrate(&mut bullet.body, dt);
    }
    state
        .bullets
        .retain(|b| now_ms - b.created_at_ms < b.lifespan_ms);
    let flying = std::mem::take(&mut state.bullets);
    state.bullets = bullet_vs_obstacles(flying, &state.config.layout.obstacles);

    // Bullet-entity collisions
    let flying = std::mem::take(&mut state.bullets);
    let hits = bullet_vs_entities(flying, &state.player, &state.kidnappers);
    state.bullets = hits.surviving;

    let player_damage: i32 = hits.player_hits.iter().map(|b| b.damage).sum();
    if player_damage > 0 {
        state.damage_player(player_damage);
        for bullet in &hits.player_hits {
            particles::spawn_impact(&mut state.particles, bullet.body.pos, &mut state.rng);
        }
    }

    // Each hit counts one step toward the kill threshold
    let mut wound_positions = Vec::new();
    for (id, bullet) in &hits.kidnapper_hits {
        if let Some(kidnapper) = state.kidnappers.iter_mut().find(|k| k.id == *id) {
            kidnapper.health -= 1;
            if kidnapper.health > 0 {
                wound_positions.push(bullet.body.pos);
            }
        }
    }
    for pos in wound_positions {
        particles::spawn_impact(&mut state.particles, pos, &mut state.rng);
    }

    // Remove the dead, then let witnesses react to each death
    let mut death_positions = Vec::new();
    state.kidnappers.retain(|k| {
        if k.health <= 0 {
            death_positions.push(k.body.pos);
            false
        } else {
            true
        }
    });
    for pos in &death_positions {
        state.record_kill();
        particles::spawn_explosion(&mut state.particles, *pos, &mut state.rng);
        state.camera_shake = (state.camera_shake + 0.3).min(1.0);
    }
    for pos in &death_positions {
        ai::alert_from_death(*pos, &mut state.kidnappers, &state.config.layout.obstacles);
    }

    particles::update(&mut state.particles, dt);

    // Pickup collection
    let player_pos = state.player.body.pos;
    let player_radius = state.player.body.radius;
    let mut collected = Vec::new();
    for pickup in state.pickups.iter_mut() {
        if !pickup.collected
            && circles_overlap(player_pos, player_radius, pickup.body.pos, pickup.body.radius)
        {
            pickup.collected = true;
            collected.push((pickup.body.pos, pickup.heal));
        }
    }
    for (pos, heal) in collected {
        state.player.health = (state.player.health + heal).min(state.player.max_health);
        particles::spawn_pickup_burst(&mut state.particles, pos, &mut state.rng);
    }

    // Win/lose
    if state.player.health <= 0 {
        state.status = Status::GameOver;
        log::info!(
            "game over on level {} at {:.1}s, score {}",
            state.level,
            state.time_ms / 1000.0,
            state.score
        );
    } else if state.kidnappers.is_empty() {
        state.status = Status::LevelComplete;
        for hostage in &mut state.hostages {
            hostage.rescued = true;
        }
        log::info!(
            "level {} complete: {} kills, score {}, best streak {}",
            state.level,
            state.kill_count,
            state.score,
            state.best_streak
        );
    }
}
