//! Chess-vs-bot logic: player moves, delayed bot replies, game resolution.

use super::types::*;
use crate::core::session::Session;
use chess_engine::{Evaluate, GameResult, Move};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChessInput {
    /// Tap a square: selects a piece, or moves the selected piece there.
    Tap(Square),
    Resign,
}

pub fn process_input<R: Rng>(game: &mut ChessGame, input: ChessInput, session: &mut Session, rng: &mut R) {
    match input {
        ChessInput::Tap(sq) => {
            if let Some(m) = game.move_for(sq) {
                let from = game.selected.unwrap_or(sq);
                game.clear_selection();
                let result = game.board.play_move(m);
                if finish_turn(game, result, session) {
                    game.last_move = Some((from, sq));
                    game.moves_played += 1;
                    if game.outcome.is_none() {
                        game.bot_thinking = true;
                        game.bot_elapsed = 0.0;
                        game.bot_delay = BOT_THINK_SECONDS.sample(rng);
                    }
                }
            } else if !game.select(sq) {
                game.clear_selection();
            }
        }
        ChessInput::Resign => {
            if game.outcome.is_none() {
                game.outcome = Some(ChessOutcome::BotWon);
                session.lose_all_lives();
            }
        }
    }
}

/// Pick the bot's move: occasionally random, otherwise a depth-limited search.
pub fn bot_move<R: Rng>(board: &chess_engine::Board, level: BotLevel, rng: &mut R) -> Move {
    let legal = board.get_legal_moves();
    if legal.is_empty() {
        return Move::Resign;
    }
    if rng.gen::<f64>() < level.random_move_chance() {
        return legal[rng.gen_range(0..legal.len())];
    }
    let (best, _, _) = board.get_best_next_move(level.search_depth());
    best
}

/// Let the bot think for its delay, then answer.
pub fn step<R: Rng>(game: &mut ChessGame, dt: f64, session: &mut Session, rng: &mut R) {
    if !game.bot_thinking || game.outcome.is_some() {
        return;
    }
    game.bot_elapsed += dt;
    if game.bot_elapsed < game.bot_delay {
        return;
    }
    let m = bot_move(&game.board, game.level, rng);
    let result = game.board.play_move(m);
    game.bot_thinking = false;
    if finish_turn(game, result, session) {
        game.moves_played += 1;
        if let Move::Piece(from, to) = m {
            game.last_move = Some((square(from), square(to)));
        }
    }
}

/// Apply a move result to the game and session. Returns false for an illegal
/// move, which leaves the board unchanged.
pub fn finish_turn(game: &mut ChessGame, result: GameResult, session: &mut Session) -> bool {
    let outcome = match result {
        GameResult::Continuing(board) => {
            game.board = board;
            return true;
        }
        GameResult::Victory(winner) if winner == game.player_color() => ChessOutcome::PlayerWon,
        GameResult::Victory(_) => ChessOutcome::BotWon,
        GameResult::Stalemate => ChessOutcome::Stalemate,
        GameResult::IllegalMove(m) => {
            log::warn!("chess engine rejected {:?}", m);
            return false;
        }
    };
    log::debug!("chess game over: {:?}", outcome);
    game.outcome = Some(outcome);
    match outcome {
        ChessOutcome::PlayerWon => session.add_score(session.target_score),
        ChessOutcome::BotWon | ChessOutcome::Stalemate => session.lose_all_lives(),
    }
    true
}
