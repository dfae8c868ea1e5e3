//! Shooter game logic: ship, bullets, asteroids.

use super::types::*;
use crate::core::collision::circles_overlap;
use crate::core::constants::OFFSCREEN_MARGIN;
use crate::core::entity::{approach, clamp_to_bounds, cull, integrate_all};
use crate::core::session::Session;
use glam::DVec2;
use rand::Rng;

/// UI-agnostic input actions for the shooter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShooterInput {
    MoveTo(f64),
    Fire,
    AutoFire(bool),
}

pub fn process_input(game: &mut ShooterGame, input: ShooterInput) {
    match input {
        ShooterInput::MoveTo(x) => {
            game.target_x = x.clamp(SHIP_RADIUS, game.bounds.width - SHIP_RADIUS);
        }
        ShooterInput::Fire => game.fire_queued = true,
        ShooterInput::AutoFire(on) => game.auto_fire = on,
    }
}

pub fn step<R: Rng>(game: &mut ShooterGame, dt: f64, session: &mut Session, rng: &mut R) {
    // 1. Integrate
    game.ship.x = approach(game.ship.x, game.target_x, SHIP_SPEED * dt);
    let mut vel = DVec2::ZERO;
    clamp_to_bounds(&mut game.ship, &mut vel, SHIP_RADIUS, &game.bounds);

    game.cooldown = (game.cooldown - dt).max(0.0);
    if (game.fire_queued || game.auto_fire) && game.cooldown <= 0.0 {
        game.fire();
    }
    game.fire_queued = false;

    integrate_all(&mut game.bullets, dt, 0.0);
    integrate_all(&mut game.asteroids, dt, 0.0);

    // 2. Bullets against asteroids
    for bullet in game.bullets.iter_mut() {
        let Some(rock) = game
            .asteroids
            .iter_mut()
            .find(|r| r.alive && circles_overlap(bullet.pos, bullet.radius, r.pos, r.radius))
        else {
            continue;
        };
        bullet.alive = false;
        if rock.damage(1) {
            game.destroyed += 1;
            session.add_score(game.combo.hit(rock.points));
        }
    }

    // Asteroids against the ship
    let ship = game.ship;
    for rock in game.asteroids.iter_mut().filter(|r| r.alive) {
        if circles_overlap(ship, SHIP_RADIUS, rock.pos, rock.radius) {
            rock.alive = false;
            game.combo.reset();
            session.lose_life();
        }
    }

    cull(&mut game.bullets, &game.bounds, 0.0);
    let escaped = cull(&mut game.asteroids, &game.bounds, OFFSCREEN_MARGIN);
    if escaped.iter().any(|r| r.pos.y > game.bounds.height) {
        game.combo.reset();
    }

    // 3. Spawn
    let progress = session.progress();
    for _ in 0..game.spawner.tick(dt, progress) {
        game.spawn_asteroid(rng, progress);
    }
}
