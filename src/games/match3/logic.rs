//! Match-3 game logic: swaps, cascades, reshuffles.

use super::types::*;
use crate::core::session::Session;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match3Input {
    /// Tap a cell. A second tap on a neighbour swaps the two.
    Select(Cell),
    /// Drag gesture: swap two cells directly.
    Swap(Cell, Cell),
}

/// Result of one swap attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    Ignored,
    Reverted,
    Matched { cleared: u32, cascades: u32, points: u32 },
}

fn in_bounds((row, col): Cell) -> bool {
    row < MATCH3_ROWS && col < MATCH3_COLS
}

fn adjacent(a: Cell, b: Cell) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

pub fn process_input<R: Rng>(
    game: &mut Match3Game,
    input: Match3Input,
    session: &mut Session,
    rng: &mut R,
) -> SwapOutcome {
    match input {
        Match3Input::Select(cell) => {
            if !in_bounds(cell) {
                return SwapOutcome::Ignored;
            }
            match game.selected.take() {
                Some(first) if adjacent(first, cell) => try_swap(game, first, cell, session, rng),
                Some(first) if first == cell => SwapOutcome::Ignored,
                _ => {
                    game.selected = Some(cell);
                    SwapOutcome::Ignored
                }
            }
        }
        Match3Input::Swap(a, b) => {
            game.selected = None;
            try_swap(game, a, b, session, rng)
        }
    }
}

/// Swap two neighbours. A swap that makes no run is undone; otherwise runs are
/// cleared and refilled until the board settles, each cascade level scoring
/// more than the last.
pub fn try_swap<R: Rng>(
    game: &mut Match3Game,
    a: Cell,
    b: Cell,
    session: &mut Session,
    rng: &mut R,
) -> SwapOutcome {
    if !in_bounds(a) || !in_bounds(b) || !adjacent(a, b) {
        return SwapOutcome::Ignored;
    }

    game.board.swap(a, b);
    if !game.board.has_matches() {
        game.board.swap(a, b);
        game.rejected_swaps += 1;
        game.last_cascade = 0;
        return SwapOutcome::Reverted;
    }
    game.swaps += 1;

    let mut cleared = 0;
    let mut cascades = 0;
    let mut points = 0;
    loop {
        let mask = game.board.find_matches();
        if !mask.iter().flatten().any(|&m| m) {
            break;
        }
        cascades += 1;
        let removed = game.board.collapse(&mask, rng);
        let earned = removed * POINTS_PER_CANDY * cascades;
        cleared += removed;
        points += earned;
        session.add_score(earned);
    }
    game.last_cascade = cascades;

    if !game.board.has_legal_move() {
        log::info!("match3 board has no moves left, reshuffling");
        game.board = generate_board(rng);
        game.reshuffles += 1;
    }

    SwapOutcome::Matched {
        cleared,
        cascades,
        points,
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
        let mut session = Session::new(GameId::Match3, GameConfig::for_game(GameId::Match3));
        session
            .start(&StartGate {
                user_id: Some("u".to_string()),
                played_today: false,
            })
            .unwrap();
        session
    }

    fn fallback_game() -> Match3Game {
        Match3Game {
            board: fallback_board(),
            selected: None,
            last_cascade: 0,
            swaps: 0,
            rejected_swaps: 0,
            reshuffles: 0,
        }
    }

    #[test]
    fn test_matching_swap_scores() {
        let mut game = fallback_game();
        let mut session = playing_session();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let outcome = try_swap(&mut game, (0, 2), (1, 2), &mut session, &mut rng);
        match outcome {
            SwapOutcome::Matched { cleared, cascades, points } => {
                assert!(cleared >= 3);
                assert!(cascades >= 1);
                assert_eq!(session.score, points);
            }
            other => panic!("expected match, got {other:?}"),
        }
        assert!(!game.board.has_matches());
        assert!(game.board.has_legal_move());
        assert_eq!(game.swaps, 1);
    }

    #[test]
    fn test_non_matching_swap_reverts() {
        let mut game = fallback_game();
        let mut session = playing_session();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let before = game.board.clone();
        let outcome = try_swap(&mut game, (5, 5), (5, 6), &mut session, &mut rng);
        assert_eq!(outcome, SwapOutcome::Reverted);
        assert_eq!(game.board, before);
        assert_eq!(session.score, 0);
        assert_eq!(game.rejected_swaps, 1);
    }

    #[test]
    fn test_non_adjacent_swap_ignored() {
        let mut game = fallback_game();
        let mut session = playing_session();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let outcome = try_swap(&mut game, (0, 0), (2, 0), &mut session, &mut rng);
        assert_eq!(outcome, SwapOutcome::Ignored);
        let outcome = try_swap(&mut game, (7, 7), (7, 8), &mut session, &mut rng);
        assert_eq!(outcome, SwapOutcome::Ignored);
    }

    #[test]
    fn test_tap_tap_selection_swaps() {
        let mut game = fallback_game();
        let mut session = playing_session();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let first = process_input(&mut game, Match3Input::Select((0, 2)), &mut session, &mut rng);
        assert_eq!(first, SwapOutcome::Ignored);
        assert_eq!(game.selected, Some((0, 2)));
        let second = process_input(&mut game, Match3Input::Select((1, 2)), &mut session, &mut rng);
        assert!(matches!(second, SwapOutcome::Matched { .. }));
        assert!(game.selected.is_none());
    }

    #[test]
    fn test_far_tap_moves_selection() {
        let mut game = fallback_game();
        let mut session = playing_session();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        process_input(&mut game, Match3Input::Select((0, 0)), &mut session, &mut rng);
        process_input(&mut game, Match3Input::Select((4, 4)), &mut session, &mut rng);
        assert_eq!(game.selected, Some((4, 4)));
    }
}
