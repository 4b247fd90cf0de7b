//! Collision resolution passes
//!
//! Obstacle push-out for moving entities, and the two bullet pruning passes
//! the orchestrator runs each tick. Resolution against multiple overlapping
//! obstacles is sequential in input order; the net push after the first pass
//! may still overlap a later obstacle and is not re-resolved.

use super::geom::{circle_rect_overlap, circles_overlap, resolve_circle_rect};
use super::state::{Body, Bullet, Kidnapper, Obstacle, Owner, Player};

/// Push every body out of every obstacle it penetrates, obstacle by obstacle
/// in input order.
pub fn resolve_against_obstacles<'a, I>(bodies: I, obstacles: &[Obstacle])
where
    I: IntoIterator<Item = &'a mut Body>,
{
    for body in bodies {
        for obstacle in obstacles {
            body.pos = resolve_circle_rect(body.pos, body.radius, &obstacle.rect());
        }
    }
}

/// Outcome of the bullet-vs-entity pass
#[derive(Debug, Default)]
pub struct BulletHits {
    /// Enemy bullets that struck the player
    pub player_hits: Vec<Bullet>,
    /// Player bullets that struck a kidnapper, keyed by kidnapper id
    pub kidnapper_hits: Vec<(u32, Bullet)>,
    /// Bullets that hit nothing this tick
    pub surviving: Vec<Bullet>,
}

/// Resolve every bullet against at most one target.
///
/// Ownership rules: a player bullet can only hit kidnappers, an enemy bullet
/// can only hit the player. Kidnappers are tested in roster order and the
/// first overlap wins. A bullet that hits anything leaves the surviving set.
pub fn bullet_vs_entities(
    bullets: Vec<Bullet>,
    player: &Player,
    kidnappers: &[Kidnapper],
) -> BulletHits {
    let mut hits = BulletHits::default();

    for bullet in bullets {
        match bullet.owner {
            Owner::Kidnapper(_) => {
                if circles_overlap(
                    bullet.body.pos,
                    bullet.body.radius,
                    player.body.pos,
                    player.body.radius,
                ) {
                    hits.player_hits.push(bullet);
                    continue;
                }
            }
            Owner::Player => {
                if let Some(victim) = kidnappers.iter().find(|k| {
                    circles_overlap(
                        bullet.body.pos,
                        bullet.body.radius,
                        k.body.pos,
                        k.body.radius,
                    )
                }) {
                    hits.kidnapper_hits.push((victim.id, bullet));
                    continue;
                }
            }
        }
        hits.surviving.push(bullet);
    }

    hits
}

/// Drop every bullet overlapping any obstacle. Obstacles are opaque to fire.
pub fn bullet_vs_obstacles(bullets: Vec<Bullet>, obstacles: &[Obstacle]) -> Vec<Bullet> {
    bullets
        .into_iter()
        .filter(|b| {
            !obstacles
                .iter()
                .any(|o| circle_rect_overlap(b.body.pos, b.body.radius, &o.rect()))
        })
        .collect()
}
