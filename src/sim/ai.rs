//! Kidnapper finite-state machine and alert propagation
//!
//! Each agent is evaluated once per tick against a snapshot of its peers, so
//! no agent observes a partially updated roster. Transition precedence within
//! a state follows a strict order: see the player, then see an alerted peer,
//! then continue the current behavior.

use glam::Vec2;

use super::movement::{integrate, seek};
use super::state::{Body, Bullet, Kidnapper, KidnapperState, Obstacle, Owner, Player};
use super::vision::can_see;
use crate::consts::*;
use crate::{angle_of, vec_from_angle};

/// What a peer looked like at the start of the tick
#[derive(Clone, Copy)]
struct PeerSnapshot {
    id: u32,
    pos: Vec2,
    state: KidnapperState,
    target: Option<Vec2>,
}

/// Advance every kidnapper's state machine by one tick
pub fn update(kidnappers: &mut [Kidnapper], player: &Player, obstacles: &[Obstacle], dt: f32) {
    let peers: Vec<PeerSnapshot> = kidnappers
        .iter()
        .map(|k| PeerSnapshot {
            id: k.id,
            pos: k.body.pos,
            state: k.state,
            target: k.target,
        })
        .collect();

    for kidnapper in kidnappers.iter_mut() {
        match kidnapper.state {
            KidnapperState::Idle | KidnapperState::Patrolling => {
                handle_patrol(kidnapper, player, &peers, obstacles, dt);
            }
            KidnapperState::Alerted => handle_alerted(kidnapper, player, obstacles, dt),
            KidnapperState::Shooting => handle_shooting(kidnapper, player, obstacles),
        }
    }
}

fn handle_patrol(
    kidnapper: &mut Kidnapper,
    player: &Player,
    peers: &[PeerSnapshot],
    obstacles: &[Obstacle],
    dt: f32,
) {
    if can_see(kidnapper, player.body.pos, obstacles) {
        kidnapper.state = KidnapperState::Alerted;
        kidnapper.target = Some(player.body.pos);
        kidnapper.alertness = 100.0;
        return;
    }

    // A visibly agitated peer pulls this agent in, inheriting its target
    for peer in peers {
        if peer.id != kidnapper.id
            && matches!(peer.state, KidnapperState::Alerted | KidnapperState::Shooting)
            && can_see(kidnapper, peer.pos, obstacles)
        {
            kidnapper.state = KidnapperState::Alerted;
            kidnapper.alertness = 100.0;
            kidnapper.target = peer.target;
            return;
        }
    }

    if kidnapper.patrol_points.is_empty() {
        return;
    }

    let waypoint = kidnapper.patrol_points[kidnapper.patrol_index];
    if kidnapper.body.pos.distance(waypoint) < PATROL_ARRIVAL {
        kidnapper.patrol_index = (kidnapper.patrol_index + 1) % kidnapper.patrol_points.len();
        return;
    }

    let dir = waypoint - kidnapper.body.pos;
    kidnapper.state = KidnapperState::Patrolling;
    kidnapper.body.vel = dir.normalize() * PATROL_SPEED * kidnapper.kind.speed_factor();
    kidnapper.body.facing = angle_of(dir);
    integrate(&mut kidnapper.body, dt);
}

fn handle_alerted(kidnapper: &mut Kidnapper, player: &Player, obstacles: &[Obstacle], dt: f32) {
    if can_see(kidnapper, player.body.pos, obstacles) {
        kidnapper.state = KidnapperState::Shooting;
        kidnapper.target = Some(player.body.pos);
        return;
    }

    let Some(target) = kidnapper.target else {
        kidnapper.state = KidnapperState::Patrolling;
        kidnapper.alertness = 0.0;
        return;
    };

    if kidnapper.body.pos.distance(target) < ALERT_ARRIVAL {
        // Search spot reached; lose interest gradually
        kidnapper.alertness = (kidnapper.alertness - ALERTNESS_DECAY * dt).max(0.0);
        if kidnapper.alertness == 0.0 {
            kidnapper.state = KidnapperState::Patrolling;
            kidnapper.target = None;
        }
        return;
    }

    let dir = target - kidnapper.body.pos;
    kidnapper.body.facing = angle_of(dir);
    seek(
        &mut kidnapper.body,
        target,
        ALERT_SPEED * kidnapper.kind.speed_factor(),
        dt,
    );
}

fn handle_shooting(kidnapper: &mut Kidnapper, player: &Player, obstacles: &[Obstacle]) {
    if !can_see(kidnapper, player.body.pos, obstacles) {
        // Lost sight: fall back to searching the last seen position,
        // never straight to patrolling
        kidnapper.state = KidnapperState::Alerted;
        kidnapper.target = Some(player.body.pos);
        return;
    }

    kidnapper.body.facing = angle_of(player.body.pos - kidnapper.body.pos);
    kidnapper.target = Some(player.body.pos);
    kidnapper.body.vel = Vec2::ZERO;
}

/// Emit a bullet for every shooting agent whose cooldown has elapsed,
/// stamping its last-shot time. `next_id` allocates entity ids.
pub fn bullets_to_spawn<F>(kidnappers: &mut [Kidnapper], now_ms: f64, mut next_id: F) -> Vec<Bullet>
where
    F: FnMut() -> u32,
{
    let mut bullets = Vec::new();

    for kidnapper in kidnappers.iter_mut() {
        if kidnapper.state != KidnapperState::Shooting {
            continue;
        }
        if now_ms - kidnapper.last_shot_ms < kidnapper.shoot_cooldown_ms {
            continue;
        }

        let facing = kidnapper.body.facing;
        bullets.push(Bullet {
            id: next_id(),
            body: Body {
                pos: kidnapper.body.pos,
                vel: vec_from_angle(facing) * KIDNAPPER_BULLET_SPEED,
                facing,
                radius: BULLET_RADIUS,
            },
            damage: KIDNAPPER_BULLET_DAMAGE,
            owner: Owner::Kidnapper(kidnapper.id),
            lifespan_ms: BULLET_LIFESPAN_MS,
            created_at_ms: now_ms,
        });
        kidnapper.last_shot_ms = now_ms;
    }

    bullets
}

/// A kill was witnessed: every surviving agent that can see the death spot
/// snaps to alerted and converges on it.
pub fn alert_from_death(death_pos: Vec2, kidnappers: &mut [Kidnapper], obstacles: &[Obstacle]) {
    for kidnapper in kidnappers.iter_mut() {
        if can_see(kidnapper, death_pos, obstacles) {
            kidnapper.state = KidnapperState::Alerted;
            kidnapper.alertness = 100.0;
            kidnapper.target = Some(death_pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::KidnapperKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn kidnapper(id: u32, pos: Vec2, facing: f32) -> Kidnapper {
        let mut rng = Pcg32::seed_from_u64(id as u64);
        let mut k = Kidnapper::new(id, KidnapperKind::Normal, pos, 0, Vec::new(), &mut rng);
        k.body.facing = facing;
        k
    }

    fn player_at(pos: Vec2) -> Player {
        Player::new(pos)
    }

    #[test]
    fn patroller_spotting_player_becomes_alerted() {
        let player = player_at(Vec2::new(200.0, 0.0));
        let mut roster = vec![kidnapper(1, Vec2::ZERO, 0.0)];
        update(&mut roster, &player, &[], 0.016);
        assert_eq!(roster[0].state, KidnapperState::Alerted);
        assert_eq!(roster[0].target, Some(player.body.pos));
        assert_eq!(roster[0].alertness, 100.0);
    }

    #[test]
    fn patroller_inherits_target_from_visible_alerted_peer() {
        // Player far away; peer at (150, 0) is alerted with a known target
        let player = player_at(Vec2::new(5000.0, 5000.0));
        let mut watcher = kidnapper(1, Vec2::ZERO, 0.0);
        watcher.patrol_points = vec![Vec2::new(0.0, 300.0)];
        let mut peer = kidnapper(2, Vec2::new(150.0, 0.0), 0.0);
        peer.state = KidnapperState::Alerted;
        peer.target = Some(Vec2::new(400.0, 400.0));

        let mut roster = vec![watcher, peer];
        update(&mut roster, &player, &[], 0.016);
        assert_eq!(roster[0].state, KidnapperState::Alerted);
        assert_eq!(roster[0].target, Some(Vec2::new(400.0, 400.0)));
    }

    #[test]
    fn patroller_advances_waypoints_cyclically() {
        let player = player_at(Vec2::new(5000.0, 5000.0));
        let mut k = kidnapper(1, Vec2::ZERO, 0.0);
        k.patrol_points = vec![Vec2::new(10.0, 0.0), Vec2::new(500.0, 0.0)];
        let mut roster = vec![k];

        // Within 30 units of the first waypoint: index advances, no movement
        update(&mut roster, &player, &[], 0.016);
        assert_eq!(roster[0].patrol_index, 1);

        // Far from the second: moves toward it at patrol speed
        let before = roster[0].body.pos;
        update(&mut roster, &player, &[], 0.1);
        assert_eq!(roster[0].state, KidnapperState::Patrolling);
        assert!(roster[0].body.pos.x > before.x);
        assert!((roster[0].body.vel.length() - PATROL_SPEED).abs() < 1e-3);
    }

    #[test]
    fn alerted_with_visible_player_starts_shooting() {
        let player = player_at(Vec2::new(200.0, 0.0));
        let mut k = kidnapper(1, Vec2::ZERO, 0.0);
        k.state = KidnapperState::Alerted;
        k.target = Some(Vec2::new(100.0, 100.0));
        let mut roster = vec![k];
        update(&mut roster, &player, &[], 0.016);
        assert_eq!(roster[0].state, KidnapperState::Shooting);
        assert_eq!(roster[0].target, Some(player.body.pos));
    }

    #[test]
    fn alertness_decays_at_the_search_spot_then_reverts_to_patrol() {
        let player = player_at(Vec2::new(5000.0, 5000.0));
        let mut k = kidnapper(1, Vec2::ZERO, 0.0);
        k.state = KidnapperState::Alerted;
        k.alertness = 100.0;
        // Within the 50-unit arrival radius of the target
        k.target = Some(Vec2::new(10.0, 0.0));
        let mut roster = vec![k];

        // 20/s decay: one 1 s tick drops 20
        update(&mut roster, &player, &[], 1.0);
        assert_eq!(roster[0].state, KidnapperState::Alerted);
        assert!((roster[0].alertness - 80.0).abs() < 1e-3);

        for _ in 0..4 {
            update(&mut roster, &player, &[], 1.0);
        }
        assert_eq!(roster[0].state, KidnapperState::Patrolling);
        assert_eq!(roster[0].target, None);
        assert_eq!(roster[0].alertness, 0.0);
    }

    #[test]
    fn shooter_losing_sight_falls_back_to_alerted_not_patrol() {
        let player = player_at(Vec2::new(200.0, 0.0));
        let mut k = kidnapper(1, Vec2::ZERO, 0.0);
        k.state = KidnapperState::Shooting;
        // A wall drops between them
        let wall = Obstacle {
            pos: Vec2::new(100.0, -50.0),
            width: 20.0,
            height: 100.0,
            kind: crate::sim::state::ObstacleKind::Wall,
        };
        let mut roster = vec![k];
        update(&mut roster, &player, &[wall], 0.016);
        assert_eq!(roster[0].state, KidnapperState::Alerted);
        assert_eq!(roster[0].target, Some(player.body.pos));
    }

    #[test]
    fn shooter_tracks_player_and_stands_still() {
        let player = player_at(Vec2::new(0.0, 150.0));
        let mut k = kidnapper(1, Vec2::ZERO, std::f32::consts::FRAC_PI_2);
        k.state = KidnapperState::Shooting;
        k.body.vel = Vec2::new(40.0, 0.0);
        let mut roster = vec![k];
        update(&mut roster, &player, &[], 0.016);
        assert_eq!(roster[0].state, KidnapperState::Shooting);
        assert_eq!(roster[0].body.vel, Vec2::ZERO);
        assert!((roster[0].body.facing - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn cooldown_gates_bullet_spawning() {
        let mut k = kidnapper(1, Vec2::ZERO, 0.0);
        k.state = KidnapperState::Shooting;
        let cooldown = k.shoot_cooldown_ms;
        let mut roster = vec![k];
        let mut id = 100;

        let first = bullets_to_spawn(&mut roster, 0.0, || {
            id += 1;
            id
        });
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].owner, Owner::Kidnapper(1));
        assert!((first[0].body.vel.length() - KIDNAPPER_BULLET_SPEED).abs() < 1e-3);

        // Too soon: nothing fires
        let second = bullets_to_spawn(&mut roster, cooldown / 2.0, || {
            id += 1;
            id
        });
        assert!(second.is_empty());

        let third = bullets_to_spawn(&mut roster, cooldown, || {
            id += 1;
            id
        });
        assert_eq!(third.len(), 1);
    }

    #[test]
    fn death_alert_reaches_witnesses_only() {
        let death = Vec2::new(150.0, 0.0);
        let witness_a = kidnapper(1, Vec2::ZERO, 0.0);
        let witness_b = kidnapper(2, Vec2::new(300.0, 0.0), std::f32::consts::PI);
        // Facing away from the death spot
        let oblivious = kidnapper(3, Vec2::new(150.0, 200.0), 0.0);

        let mut roster = vec![witness_a, witness_b, oblivious];
        alert_from_death(death, &mut roster, &[]);

        assert_eq!(roster[0].state, KidnapperState::Alerted);
        assert_eq!(roster[0].target, Some(death));
        assert_eq!(roster[1].state, KidnapperState::Alerted);
        assert_eq!(roster[2].state, KidnapperState::Patrolling);
    }
}
