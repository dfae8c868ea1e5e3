//! Slicer game logic: tosses, swipe trail, slices.

use super::types::*;
use crate::core::collision::segment_hits_circle;
use crate::core::constants::OFFSCREEN_MARGIN;
use crate::core::entity::{cull, integrate_all};
use crate::core::session::Session;
use glam::DVec2;
use rand::Rng;

/// UI-agnostic pointer events for the slicer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlicerInput {
    PointerDown(DVec2),
    PointerMove(DVec2),
    PointerUp,
}

pub fn process_input(game: &mut SlicerGame, input: SlicerInput) {
    match input {
        SlicerInput::PointerDown(pos) => {
            game.pointer_down = true;
            game.trail.clear();
            game.push_trail(pos);
        }
        SlicerInput::PointerMove(pos) => {
            if game.pointer_down {
                game.push_trail(pos);
            }
        }
        SlicerInput::PointerUp => {
            game.pointer_down = false;
            game.trail.clear();
        }
    }
}

pub fn step<R: Rng>(game: &mut SlicerGame, dt: f64, session: &mut Session, rng: &mut R) {
    // 1. Integrate
    integrate_all(&mut game.objects, dt, TOSS_GRAVITY);
    game.age_trail(dt);

    // 2. Every live trail segment against every object
    for pair in game.trail.windows(2) {
        let (a, b) = (pair[0].pos, pair[1].pos);
        for obj in game.objects.iter_mut().filter(|o| o.alive) {
            if !segment_hits_circle(a, b, obj.pos, obj.radius, SLICE_FORGIVENESS) {
                continue;
            }
            obj.alive = false;
            // 3. Scoring
            match obj.kind {
                Thrown::Fruit => {
                    game.sliced += 1;
                    session.add_score(game.combo.hit(obj.points));
                }
                Thrown::Bomb => {
                    game.bombs_hit += 1;
                    game.combo.reset();
                    session.lose_life();
                }
            }
        }
    }

    // Tosses start just below the field, inside the margin, so only objects
    // that fell back out are culled.
    let escaped = cull(&mut game.objects, &game.bounds, OFFSCREEN_MARGIN);
    let dropped = escaped.iter().filter(|o| o.kind == Thrown::Fruit).count() as u32;
    if dropped > 0 {
        game.dropped += dropped;
        game.combo.reset();
    }

    // 4. Spawn
    let progress = session.progress();
    for _ in 0..game.spawner.tick(dt, progress) {
        game.toss(rng, progress);
    }
}
