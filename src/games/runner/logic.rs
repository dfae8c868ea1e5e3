//! Runner game logic.

use super::types::*;
use crate::core::collision::circles_overlap;
use crate::core::constants::OFFSCREEN_MARGIN;
use crate::core::entity::{clamp_to_bounds, cull, integrate_all};
use crate::core::session::Session;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerInput {
    /// Fire one jetpack burst.
    Tap,
}

pub fn process_input(game: &mut RunnerGame, input: RunnerInput) {
    match input {
        RunnerInput::Tap => game.pending_bursts += 1,
    }
}

pub fn step<R: Rng>(game: &mut RunnerGame, dt: f64, session: &mut Session, rng: &mut R) {
    // 1. Integrate
    if game.pending_bursts > 0 {
        game.vel.y = -JETPACK_IMPULSE;
        game.pending_bursts = 0;
    }
    game.vel.y += RUNNER_GRAVITY * dt;
    game.pos += game.vel * dt;
    game.pos.x = RUNNER_X;
    clamp_to_bounds(&mut game.pos, &mut game.vel, RUNNER_RADIUS, &game.bounds);
    game.grounded = game.pos.y >= game.bounds.height - RUNNER_RADIUS;
    integrate_all(&mut game.debris, dt, 0.0);

    // 2. Collisions
    let runner = game.pos;
    for piece in game.debris.iter_mut().filter(|d| d.alive) {
        if circles_overlap(runner, RUNNER_RADIUS, piece.pos, piece.radius) {
            piece.alive = false;
            game.collisions += 1;
            session.lose_life();
            continue;
        }
        // 3. Scoring: one point the first time a piece is fully behind us
        if piece.points > 0 && piece.pos.x + piece.radius < runner.x - RUNNER_RADIUS {
            session.add_score(piece.points);
            piece.points = 0;
            game.dodged += 1;
        }
    }

    cull(&mut game.debris, &game.bounds, OFFSCREEN_MARGIN);

    // 4. Spawn
    let progress = session.progress();
    for _ in 0..game.spawner.tick(dt, progress) {
        game.spawn_debris(rng, progress);
    }
}
