//! Memory game logic.

use super::types::*;
use crate::core::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryInput {
    Flip(usize),
}

pub fn process_input(game: &mut MemoryGame, input: MemoryInput, session: &mut Session) {
    match input {
        MemoryInput::Flip(index) => flip(game, index, session),
    }
}

fn flip(game: &mut MemoryGame, index: usize, session: &mut Session) {
    if game.pending_hide.is_some() {
        return;
    }
    match game.cards.get(index) {
        Some(card) if card.state == CardState::Hidden => {}
        _ => return,
    }
    game.cards[index].state = CardState::Revealed;

    let Some(first) = game.first.take() else {
        game.first = Some(index);
        return;
    };

    if game.cards[first].face == game.cards[index].face {
        game.cards[first].state = CardState::Matched;
        game.cards[index].state = CardState::Matched;
        game.pairs_found += 1;
        session.add_score(POINTS_PER_PAIR);
    } else {
        game.mismatches += 1;
        game.pending_hide = Some(PendingHide {
            cards: (first, index),
            remaining: MISMATCH_HIDE_DELAY,
        });
        session.lose_life();
    }
}

/// Count down the mismatch delay and turn the pair back over.
pub fn step(game: &mut MemoryGame, dt: f64) {
    let Some(pending) = game.pending_hide.as_mut() else {
        return;
    };
    pending.remaining -= dt;
    if pending.remaining > 0.0 {
        return;
    }
    let (a, b) = pending.cards;
    game.cards[a].state = CardState::Hidden;
    game.cards[b].state = CardState::Hidden;
    game.pending_hide = None;
}
