//! Catcher game logic: basket movement, falling objects, catches.

use super::types::*;
use crate::core::collision::circles_overlap;
use crate::core::constants::OFFSCREEN_MARGIN;
use crate::core::entity::{approach, clamp_to_bounds, cull, integrate_all};
use crate::core::session::Session;
use glam::DVec2;
use rand::Rng;

/// UI-agnostic input actions for the catcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatcherInput {
    /// Pointer moved to this x coordinate.
    MoveTo(f64),
}

pub fn process_input(game: &mut CatcherGame, input: CatcherInput) {
    match input {
        CatcherInput::MoveTo(x) => {
            game.target_x = x.clamp(BASKET_RADIUS, game.bounds.width - BASKET_RADIUS);
        }
    }
}

/// One simulation step: move everything, then resolve catches, then score.
pub fn step<R: Rng>(game: &mut CatcherGame, dt: f64, session: &mut Session, rng: &mut R) {
    // 1. Integrate
    game.basket.x = approach(game.basket.x, game.target_x, BASKET_SPEED * dt);
    let mut vel = DVec2::ZERO;
    clamp_to_bounds(&mut game.basket, &mut vel, BASKET_RADIUS, &game.bounds);
    integrate_all(&mut game.objects, dt, FALL_GRAVITY);

    // 2. Collisions against updated positions
    let basket = game.basket;
    for obj in game.objects.iter_mut().filter(|o| o.alive) {
        if !circles_overlap(basket, BASKET_RADIUS, obj.pos, obj.radius) {
            continue;
        }
        obj.alive = false;
        // 3. Scoring
        match obj.kind {
            Falling::Bomb => {
                game.bombs_hit += 1;
                session.lose_life();
            }
            Falling::Gem | Falling::Crystal => {
                game.caught += 1;
                session.add_score(obj.points);
            }
        }
    }

    let escaped = cull(&mut game.objects, &game.bounds, OFFSCREEN_MARGIN);
    game.missed += escaped.iter().filter(|o| o.kind != Falling::Bomb).count() as u32;

    // 4. Spawn
    let progress = session.progress();
    for _ in 0..game.spawner.tick(dt, progress) {
        game.spawn_object(rng, progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use crate::core::session::StartGate;
    use crate::games::GameId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn playing_session() -> Session {
        let mut session = Session::new(GameId::Catcher, GameConfig::for_game(GameId::Catcher));
        session
            .start(&StartGate {
                user_id: Some("u".to_string()),
                played_today: false,
            })
            .unwrap();
        session
    }

    #[test]
    fn test_basket_moves_toward_pointer_capped() {
        let mut game = CatcherGame::new();
        let mut session = playing_session();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let start_x = game.basket.x;
        process_input(&mut game, CatcherInput::MoveTo(0.0));
        step(&mut game, 0.1, &mut session, &mut rng);
        assert!((start_x - game.basket.x - BASKET_SPEED * 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_basket_never_leaves_field() {
        let mut game = CatcherGame::new();
        let mut session = playing_session();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        process_input(&mut game, CatcherInput::MoveTo(-500.0));
        for _ in 0..100 {
            step(&mut game, 0.05, &mut session, &mut rng);
        }
        assert_eq!(game.basket.x, BASKET_RADIUS);
    }

    #[test]
    fn test_catch_gem_scores() {
        let mut game = CatcherGame::new();
        let mut session = playing_session();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        game.drop_on_basket(Falling::Gem);
        game.drop_on_basket(Falling::Crystal);
        step(&mut game, 0.016, &mut session, &mut rng);
        assert_eq!(session.score, 4);
        assert_eq!(game.caught, 2);
    }

    #[test]
    fn test_bomb_costs_heart() {
        let mut game = CatcherGame::new();
        let mut session = playing_session();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        game.drop_on_basket(Falling::Bomb);
        step(&mut game, 0.016, &mut session, &mut rng);
        assert_eq!(session.lives, 2);
        assert_eq!(session.score, 0);
        assert!(game.objects.is_empty());
    }

    #[test]
    fn test_missed_objects_are_removed() {
        let mut game = CatcherGame::new();
        let mut session = playing_session();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        game.objects.push(
            crate::core::entity::Entity::new(
                Falling::Gem,
                DVec2::new(10.0, game.bounds.height + 100.0),
                DVec2::new(0.0, 200.0),
                14.0,
            )
            .with_points(1),
        );
        step(&mut game, 0.016, &mut session, &mut rng);
        assert_eq!(game.missed, 1);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_spawns_over_time() {
        let mut game = CatcherGame::new();
        let mut session = playing_session();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..60 {
            step(&mut game, 0.05, &mut session, &mut rng);
        }
        assert!(!game.objects.is_empty());
    }
}
