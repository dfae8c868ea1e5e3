//! Sliding puzzle logic.

use super::types::*;
use crate::core::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlidingInput {
    /// Tap the tile at (row, col).
    Tap(usize, usize),
}

pub fn process_input(game: &mut SlidingGame, input: SlidingInput, session: &mut Session) -> bool {
    match input {
        SlidingInput::Tap(row, col) => tap(game, row, col, session),
    }
}

/// Slide every tile between the tapped one and the blank toward the blank.
/// Returns false when the tap is not in line with the blank.
fn tap(game: &mut SlidingGame, row: usize, col: usize, session: &mut Session) -> bool {
    let w = game.width;
    if game.solved || row >= w || col >= w {
        return false;
    }
    let blank = game.blank();
    let (br, bc) = (blank / w, blank % w);
    if (row, col) == (br, bc) || (row != br && col != bc) {
        return false;
    }

    let target = row * w + col;
    let stride = if row == br { 1 } else { w };
    let mut hole = blank;
    while hole != target {
        let next = if target > hole { hole + stride } else { hole - stride };
        game.tiles.swap(hole, next);
        hole = next;
    }
    game.moves += 1;

    if is_solved(&game.tiles, w) {
        game.solved = true;
        session.add_score(session.target_score);
    }
    true
}
