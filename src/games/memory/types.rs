//! Memory card data structures.

use rand::seq::SliceRandom;
use rand::Rng;

pub const MEMORY_ROWS: usize = 4;
pub const MEMORY_COLS: usize = 4;
pub const MEMORY_PAIRS: usize = MEMORY_ROWS * MEMORY_COLS / 2;
pub const POINTS_PER_PAIR: u32 = 10;
/// Seconds a mismatched pair stays face up before flipping back.
pub const MISMATCH_HIDE_DELAY: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Hidden,
    Revealed,
    Matched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub face: u8,
    pub state: CardState,
}

/// A mismatched pair waiting to be turned back over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingHide {
    pub cards: (usize, usize),
    pub remaining: f64,
}

/// Main game state. Cards are stored row-major.
#[derive(Debug, Clone)]
pub struct MemoryGame {
    pub cards: Vec<Card>,
    /// First card of the pair being turned.
    pub first: Option<usize>,
    /// While set, further flips are ignored.
    pub pending_hide: Option<PendingHide>,

    // Stats
    pub pairs_found: u32,
    pub mismatches: u32,
}

impl MemoryGame {
    /// Deal a shuffled deck holding every face exactly twice.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut faces: Vec<u8> = (0..MEMORY_PAIRS as u8).flat_map(|f| [f, f]).collect();
        faces.shuffle(rng);
        Self {
            cards: faces
                .into_iter()
                .map(|face| Card {
                    face,
                    state: CardState::Hidden,
                })
                .collect(),
            first: None,
            pending_hide: None,
            pairs_found: 0,
            mismatches: 0,
        }
    }

    pub fn all_matched(&self) -> bool {
        self.cards.iter().all(|c| c.state == CardState::Matched)
    }

    /// Index of the other card with the same face.
    pub fn partner_of(&self, index: usize) -> Option<usize> {
        let face = self.cards.get(index)?.face;
        self.cards
            .iter()
            .enumerate()
            .position(|(i, c)| i != index && c.face == face)
    }
}
