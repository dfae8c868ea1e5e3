//! Board generation for the path connector.
//!
//! Endpoints are placed at random, then every pair is routed with a BFS
//! through cells no other pair uses, longest pair first. An attempt where any
//! pair fails to route is thrown away whole. After the retry budget a
//! row-per-pair layout is used, which is always solvable.

use crate::core::constants::CONNECTOR_MAX_ATTEMPTS;
use crate::error::GameError;
use crate::games::GameId;
use rand::Rng;
use std::collections::VecDeque;

pub const CONNECTOR_SIZE: usize = 6;
pub const CONNECTOR_PAIRS: usize = 5;
/// Endpoints closer than this (Manhattan) make trivial pairs.
pub const MIN_ENDPOINT_DISTANCE: usize = 2;

pub type Cell = (usize, usize);

pub fn manhattan(a: Cell, b: Cell) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Orthogonal neighbours inside a `size`×`size` grid.
pub fn neighbours(size: usize, (row, col): Cell) -> impl Iterator<Item = Cell> {
    let up = row.checked_sub(1).map(|r| (r, col));
    let down = (row + 1 < size).then_some((row + 1, col));
    let left = col.checked_sub(1).map(|c| (row, c));
    let right = (col + 1 < size).then_some((row, col + 1));
    [up, down, left, right].into_iter().flatten()
}

/// A generated board: endpoints for the player, routed paths kept back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorPuzzle {
    pub size: usize,
    pub endpoints: Vec<(Cell, Cell)>,
    solution: Vec<Vec<Cell>>,
}

impl ConnectorPuzzle {
    /// Routed path for one pair, from its first endpoint to its second.
    /// Generator checks and scripted play only; never render it.
    pub(crate) fn solution_path(&self, pair: usize) -> Option<&[Cell]> {
        self.solution.get(pair).map(Vec::as_slice)
    }
}

/// Shortest path from `from` to `to` over cells whose owner is `None` or
/// `pair`.
fn route(size: usize, owners: &[Vec<Option<usize>>], pair: usize, from: Cell, to: Cell) -> Option<Vec<Cell>> {
    let mut came_from: Vec<Vec<Option<Cell>>> = vec![vec![None; size]; size];
    let mut visited = vec![vec![false; size]; size];
    let mut queue = VecDeque::new();
    visited[from.0][from.1] = true;
    queue.push_back(from);

    while let Some(cell) = queue.pop_front() {
        if cell == to {
            let mut path = vec![to];
            let mut cur = to;
            while let Some(prev) = came_from[cur.0][cur.1] {
                path.push(prev);
                cur = prev;
            }
            path.reverse();
            return Some(path);
        }
        for next in neighbours(size, cell) {
            if visited[next.0][next.1] {
                continue;
            }
            if owners[next.0][next.1].is_some_and(|owner| owner != pair) {
                continue;
            }
            visited[next.0][next.1] = true;
            came_from[next.0][next.1] = Some(cell);
            queue.push_back(next);
        }
    }
    None
}

fn random_cell<R: Rng>(rng: &mut R, size: usize) -> Cell {
    (rng.gen_range(0..size), rng.gen_range(0..size))
}

/// Place endpoint pairs on distinct cells, each pair at least
/// `MIN_ENDPOINT_DISTANCE` apart.
fn place_endpoints<R: Rng>(rng: &mut R, size: usize, pairs: usize) -> Option<Vec<(Cell, Cell)>> {
    let mut taken = vec![vec![false; size]; size];
    let mut endpoints = Vec::with_capacity(pairs);
    for _ in 0..pairs {
        let mut placed = None;
        for _ in 0..size * size * 4 {
            let a = random_cell(rng, size);
            let b = random_cell(rng, size);
            if taken[a.0][a.1] || taken[b.0][b.1] || manhattan(a, b) < MIN_ENDPOINT_DISTANCE {
                continue;
            }
            placed = Some((a, b));
            break;
        }
        let (a, b) = placed?;
        taken[a.0][a.1] = true;
        taken[b.0][b.1] = true;
        endpoints.push((a, b));
    }
    Some(endpoints)
}

fn try_generate<R: Rng>(rng: &mut R, size: usize, pairs: usize) -> Option<ConnectorPuzzle> {
    let endpoints = place_endpoints(rng, size, pairs)?;

    let mut owners = vec![vec![None; size]; size];
    for (pair, &(a, b)) in endpoints.iter().enumerate() {
        owners[a.0][a.1] = Some(pair);
        owners[b.0][b.1] = Some(pair);
    }

    let mut order: Vec<usize> = (0..pairs).collect();
    order.sort_by_key(|&p| std::cmp::Reverse(manhattan(endpoints[p].0, endpoints[p].1)));

    let mut solution = vec![Vec::new(); pairs];
    for pair in order {
        let (a, b) = endpoints[pair];
        let path = route(size, &owners, pair, a, b)?;
        for &(r, c) in &path {
            owners[r][c] = Some(pair);
        }
        solution[pair] = path;
    }

    Some(ConnectorPuzzle {
        size,
        endpoints,
        solution,
    })
}

/// One pair per row, endpoints at both ends, routed straight across.
/// Boards narrower than two cells are widened to two.
pub fn fallback_puzzle(size: usize, pairs: usize) -> ConnectorPuzzle {
    let size = size.max(2);
    let pairs = pairs.min(size);
    let endpoints = (0..pairs).map(|row| ((row, 0), (row, size - 1))).collect();
    let solution = (0..pairs)
        .map(|row| (0..size).map(|col| (row, col)).collect())
        .collect();
    ConnectorPuzzle {
        size,
        endpoints,
        solution,
    }
}

/// Up to `attempts` randomized tries, failing with `GenerationExhausted`.
pub fn generate_with_budget<R: Rng>(
    rng: &mut R,
    size: usize,
    pairs: usize,
    attempts: u32,
) -> Result<ConnectorPuzzle, GameError> {
    for _ in 0..attempts {
        if let Some(puzzle) = try_generate(rng, size, pairs) {
            return Ok(puzzle);
        }
    }
    Err(GameError::GenerationExhausted {
        game: GameId::Connector,
        attempts,
    })
}

/// Standard 6×6 board with 5 pairs. Never fails; falls back to the row layout.
pub fn generate_puzzle<R: Rng>(rng: &mut R) -> ConnectorPuzzle {
    generate_with_budget(rng, CONNECTOR_SIZE, CONNECTOR_PAIRS, CONNECTOR_MAX_ATTEMPTS).unwrap_or_else(|err| {
        log::warn!("{err}; using row layout");
        fallback_puzzle(CONNECTOR_SIZE, CONNECTOR_PAIRS)
    })
}
