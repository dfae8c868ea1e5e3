//! Match-3 board and generation.

use crate::core::constants::{MATCH3_BOARD_ATTEMPTS, MATCH3_CELL_RESAMPLES};
use rand::Rng;

pub const MATCH3_ROWS: usize = 8;
pub const MATCH3_COLS: usize = 8;
/// Number of candy kinds.
pub const MATCH3_KINDS: u8 = 6;
pub const POINTS_PER_CANDY: u32 = 20;

pub type Cell = (usize, usize);

/// 8×8 grid of candy kinds, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match3Board {
    pub cells: [[u8; MATCH3_COLS]; MATCH3_ROWS],
}

impl Match3Board {
    pub fn get(&self, (row, col): Cell) -> u8 {
        self.cells[row][col]
    }

    pub fn swap(&mut self, a: Cell, b: Cell) {
        let tmp = self.cells[a.0][a.1];
        self.cells[a.0][a.1] = self.cells[b.0][b.1];
        self.cells[b.0][b.1] = tmp;
    }

    /// Mark every cell that belongs to a horizontal or vertical run of 3+.
    pub fn find_matches(&self) -> [[bool; MATCH3_COLS]; MATCH3_ROWS] {
        let mut mask = [[false; MATCH3_COLS]; MATCH3_ROWS];
        for row in 0..MATCH3_ROWS {
            for col in 0..MATCH3_COLS {
                let kind = self.cells[row][col];
                if col + 2 < MATCH3_COLS
                    && self.cells[row][col + 1] == kind
                    && self.cells[row][col + 2] == kind
                {
                    for c in col..col + 3 {
                        mask[row][c] = true;
                    }
                }
                if row + 2 < MATCH3_ROWS
                    && self.cells[row + 1][col] == kind
                    && self.cells[row + 2][col] == kind
                {
                    for r in row..row + 3 {
                        mask[r][col] = true;
                    }
                }
            }
        }
        mask
    }

    pub fn has_matches(&self) -> bool {
        self.find_matches().iter().flatten().any(|&m| m)
    }

    /// True when at least one adjacent swap would produce a run.
    pub fn has_legal_move(&self) -> bool {
        let mut probe = self.clone();
        for row in 0..MATCH3_ROWS {
            for col in 0..MATCH3_COLS {
                for other in [(row, col + 1), (row + 1, col)] {
                    if other.0 >= MATCH3_ROWS || other.1 >= MATCH3_COLS {
                        continue;
                    }
                    probe.swap((row, col), other);
                    let found = probe.has_matches();
                    probe.swap((row, col), other);
                    if found {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Remove masked cells, let the rest fall, and refill from the top.
    /// Returns how many cells were cleared.
    pub fn collapse<R: Rng>(&mut self, mask: &[[bool; MATCH3_COLS]; MATCH3_ROWS], rng: &mut R) -> u32 {
        let mut cleared = 0;
        for col in 0..MATCH3_COLS {
            let survivors: Vec<u8> = (0..MATCH3_ROWS)
                .filter(|&row| !mask[row][col])
                .map(|row| self.cells[row][col])
                .collect();
            let missing = MATCH3_ROWS - survivors.len();
            cleared += missing as u32;
            for row in 0..missing {
                self.cells[row][col] = rng.gen_range(0..MATCH3_KINDS);
            }
            for (offset, kind) in survivors.into_iter().enumerate() {
                self.cells[missing + offset][col] = kind;
            }
        }
        cleared
    }
}

/// True when placing `kind` at (row, col) would complete a run with the two
/// cells to its left or the two above it. Cells are filled row-major so
/// nothing to the right or below exists yet.
fn completes_run(cells: &[[u8; MATCH3_COLS]; MATCH3_ROWS], row: usize, col: usize, kind: u8) -> bool {
    let horizontal = col >= 2 && cells[row][col - 1] == kind && cells[row][col - 2] == kind;
    let vertical = row >= 2 && cells[row - 1][col] == kind && cells[row - 2][col] == kind;
    horizontal || vertical
}

fn try_fill<R: Rng>(rng: &mut R) -> Option<Match3Board> {
    let mut cells = [[0u8; MATCH3_COLS]; MATCH3_ROWS];
    for row in 0..MATCH3_ROWS {
        for col in 0..MATCH3_COLS {
            let mut placed = false;
            for _ in 0..MATCH3_CELL_RESAMPLES {
                let kind = rng.gen_range(0..MATCH3_KINDS);
                if !completes_run(&cells, row, col, kind) {
                    cells[row][col] = kind;
                    placed = true;
                    break;
                }
            }
            if !placed {
                return None;
            }
        }
    }
    Some(Match3Board { cells })
}

/// Deterministic board with no runs and a known move: swapping (0,2) with
/// (1,2) completes the top row.
pub fn fallback_board() -> Match3Board {
    let mut cells = [[0u8; MATCH3_COLS]; MATCH3_ROWS];
    for (row, line) in cells.iter_mut().enumerate() {
        for (col, cell) in line.iter_mut().enumerate() {
            *cell = ((2 * row + col) % MATCH3_KINDS as usize) as u8;
        }
    }
    cells[0][1] = 0;
    cells[1][2] = 0;
    Match3Board { cells }
}

/// Random board with no pre-existing runs and at least one legal move.
pub fn generate_board<R: Rng>(rng: &mut R) -> Match3Board {
    for _ in 0..MATCH3_BOARD_ATTEMPTS {
        if let Some(board) = try_fill(rng) {
            if board.has_legal_move() {
                return board;
            }
        }
    }
    log::warn!(
        "match3 generation exhausted after {} attempts, using fallback board",
        MATCH3_BOARD_ATTEMPTS
    );
    fallback_board()
}

/// Main game state.
#[derive(Debug, Clone)]
pub struct Match3Game {
    pub board: Match3Board,
    /// First cell of a tap-tap swap.
    pub selected: Option<Cell>,
    /// Cascade depth of the last successful swap.
    pub last_cascade: u32,

    // Stats
    pub swaps: u32,
    pub rejected_swaps: u32,
    pub reshuffles: u32,
}

impl Match3Game {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self {
            board: generate_board(rng),
            selected: None,
            last_cascade: 0,
            swaps: 0,
            rejected_swaps: 0,
            reshuffles: 0,
        }
    }
}
