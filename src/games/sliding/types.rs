//! Sliding puzzle board and shuffle.

use crate::core::constants::SLIDING_MAX_SHUFFLES;
use rand::seq::SliceRandom;
use rand::Rng;

pub const SLIDING_WIDTH: usize = 4;
/// Tile value of the blank.
pub const BLANK: u8 = 0;

/// Tiles in row-major order; `1..n` then the blank when solved.
pub fn solved_tiles(width: usize) -> Vec<u8> {
    let n = width * width;
    (1..n as u8).chain(std::iter::once(BLANK)).collect()
}

/// Pairs of tiles out of order, ignoring the blank.
pub fn inversions(tiles: &[u8]) -> usize {
    let numbered: Vec<u8> = tiles.iter().copied().filter(|&t| t != BLANK).collect();
    let mut count = 0;
    for (i, &a) in numbered.iter().enumerate() {
        count += numbered[i + 1..].iter().filter(|&&b| b < a).count();
    }
    count
}

/// Standard solvability test. Odd widths need an even inversion count; even
/// widths need inversions plus the blank's row (counted from the bottom,
/// starting at 1) to be odd.
pub fn is_solvable(tiles: &[u8], width: usize) -> bool {
    let inv = inversions(tiles);
    if width % 2 == 1 {
        return inv % 2 == 0;
    }
    let Some(blank) = tiles.iter().position(|&t| t == BLANK) else {
        return false;
    };
    let row_from_bottom = width - blank / width;
    (inv + row_from_bottom) % 2 == 1
}

pub fn is_solved(tiles: &[u8], width: usize) -> bool {
    tiles == solved_tiles(width).as_slice()
}

/// Random solvable, unsolved arrangement. Falls back to the solved board with
/// the last tile slid right when the shuffle budget runs out.
pub fn shuffle_tiles<R: Rng>(rng: &mut R, width: usize) -> Vec<u8> {
    let mut tiles = solved_tiles(width);
    for _ in 0..SLIDING_MAX_SHUFFLES {
        tiles.shuffle(rng);
        if is_solvable(&tiles, width) && !is_solved(&tiles, width) {
            return tiles;
        }
    }
    log::warn!("sliding shuffle exhausted after {} attempts", SLIDING_MAX_SHUFFLES);
    let mut tiles = solved_tiles(width);
    let n = tiles.len();
    tiles.swap(n - 1, n - 2);
    tiles
}

/// Main game state.
#[derive(Debug, Clone)]
pub struct SlidingGame {
    pub width: usize,
    pub tiles: Vec<u8>,
    pub moves: u32,
    pub solved: bool,
}

impl SlidingGame {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self::with_tiles(SLIDING_WIDTH, shuffle_tiles(rng, SLIDING_WIDTH))
    }

    pub fn with_tiles(width: usize, tiles: Vec<u8>) -> Self {
        Self {
            width,
            tiles,
            moves: 0,
            solved: false,
        }
    }

    pub fn blank(&self) -> usize {
        self.tiles.iter().position(|&t| t == BLANK).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_solved_board_is_solvable() {
        let tiles = solved_tiles(4);
        assert_eq!(inversions(&tiles), 0);
        assert!(is_solvable(&tiles, 4));
        assert!(is_solved(&tiles, 4));
    }

    #[test]
    fn test_single_swap_is_unsolvable() {
        // Classic 14-15 swap
        let mut tiles = solved_tiles(4);
        tiles.swap(13, 14);
        assert!(!is_solvable(&tiles, 4));
    }

    #[test]
    fn test_odd_width_rule() {
        let tiles = vec![1, 2, 3, 4, 5, 6, 8, 7, 0];
        assert!(!is_solvable(&tiles, 3));
        let tiles = vec![1, 2, 3, 4, 5, 6, 7, 0, 8];
        assert!(is_solvable(&tiles, 3));
    }

    #[test]
    fn test_blank_move_keeps_solvable() {
        let mut tiles = solved_tiles(4);
        // Slide tile 12 down into the blank
        tiles.swap(11, 15);
        assert!(is_solvable(&tiles, 4));
    }

    #[test]
    fn test_shuffles_are_solvable_and_unsolved() {
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let tiles = shuffle_tiles(&mut rng, SLIDING_WIDTH);
            assert!(is_solvable(&tiles, SLIDING_WIDTH), "seed {seed}");
            assert!(!is_solved(&tiles, SLIDING_WIDTH), "seed {seed}");
        }
    }
}
