//! Cosmetic particle effects
//!
//! Particles are fire-and-forget visuals: they drift, shed velocity to
//! friction and fade out over their lifetime. Nothing in here feeds back
//! into gameplay, but spawning still draws from the state RNG so replays
//! stay bit-identical.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::Particle;
use crate::vec_from_angle;

const FRICTION: f32 = 0.95;

const IMPACT_COLOR: u32 = 0xFFFFFF;
const EXPLOSION_COLOR: u32 = 0xFF0000;
const FLASH_COLOR: u32 = 0xFFFF00;
const PICKUP_COLOR: u32 = 0x00FF00;

fn particle(pos: Vec2, angle: f32, speed: f32, color: u32, size: f32, life: f32) -> Particle {
    Particle {
        pos,
        vel: vec_from_angle(angle) * speed,
        color,
        size,
        life,
        max_life: life,
    }
}

/// Small white burst where a bullet hits something
pub fn spawn_impact(out: &mut Vec<Particle>, pos: Vec2, rng: &mut Pcg32) {
    let count = 8;
    for i in 0..count {
        let angle = TAU * i as f32 / count as f32 + rng.random_range(-0.25..0.25);
        let speed = rng.random_range(100.0..200.0);
        let size = rng.random_range(3.0..5.0);
        out.push(particle(pos, angle, speed, IMPACT_COLOR, size, 0.5));
    }
}

/// Scattered red burst when a kidnapper dies
pub fn spawn_explosion(out: &mut Vec<Particle>, pos: Vec2, rng: &mut Pcg32) {
    for _ in 0..20 {
        let angle = rng.random_range(0.0..TAU);
        let speed = rng.random_range(50.0..250.0);
        let size = rng.random_range(2.0..6.0);
        let life = rng.random_range(0.8..1.2);
        out.push(particle(pos, angle, speed, EXPLOSION_COLOR, size, life));
    }
}

/// Short yellow flash at a muzzle, offset along the firing direction
pub fn spawn_muzzle_flash(out: &mut Vec<Particle>, pos: Vec2, facing: f32, rng: &mut Pcg32) {
    let origin = pos + vec_from_angle(facing) * 20.0;
    for _ in 0..6 {
        let angle = facing + rng.random_range(-0.15..0.15);
        let speed = rng.random_range(200.0..300.0);
        let size = rng.random_range(2.0..4.0);
        out.push(particle(origin, angle, speed, FLASH_COLOR, size, 0.2));
    }
}

/// Even green ring when a health pickup is collected
pub fn spawn_pickup_burst(out: &mut Vec<Particle>, pos: Vec2, rng: &mut Pcg32) {
    let count = 12;
    for i in 0..count {
        let angle = TAU * i as f32 / count as f32;
        let speed = rng.random_range(80.0..120.0);
        out.push(particle(pos, angle, speed, PICKUP_COLOR, 3.0, 0.6));
    }
}

/// Integrate, apply friction, age out dead particles
pub fn update(particles: &mut Vec<Particle>, dt: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel * dt;
        p.vel *= FRICTION;
        p.life -= dt;
    }
    particles.retain(|p| p.life > 0.0);
}
