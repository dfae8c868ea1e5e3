//! Connector game state.

use super::generation::{generate_puzzle, Cell, ConnectorPuzzle};
use rand::Rng;

pub const POINTS_PER_CONNECTION: u32 = 10;

/// What occupies a grid cell, for rendering and crossing checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOwner {
    Empty,
    Endpoint(usize),
    Path(usize),
}

/// Main game state.
#[derive(Debug, Clone)]
pub struct ConnectorGame {
    pub puzzle: ConnectorPuzzle,
    /// Player-drawn path per pair, starting at one of its endpoints.
    pub paths: Vec<Vec<Cell>>,
    pub connected: Vec<bool>,
    /// Pair currently being traced.
    pub active: Option<usize>,
}

impl ConnectorGame {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self::from_puzzle(generate_puzzle(rng))
    }

    pub fn from_puzzle(puzzle: ConnectorPuzzle) -> Self {
        let pairs = puzzle.endpoints.len();
        Self {
            puzzle,
            paths: vec![Vec::new(); pairs],
            connected: vec![false; pairs],
            active: None,
        }
    }

    pub fn size(&self) -> usize {
        self.puzzle.size
    }

    pub fn endpoint_pair(&self, cell: Cell) -> Option<usize> {
        self.puzzle
            .endpoints
            .iter()
            .position(|&(a, b)| a == cell || b == cell)
    }

    pub fn owner(&self, cell: Cell) -> CellOwner {
        if let Some(pair) = self.endpoint_pair(cell) {
            return CellOwner::Endpoint(pair);
        }
        match self.paths.iter().position(|p| p.contains(&cell)) {
            Some(pair) => CellOwner::Path(pair),
            None => CellOwner::Empty,
        }
    }

    pub fn all_connected(&self) -> bool {
        self.connected.iter().all(|&c| c)
    }

    /// The generator's route for a pair, revealed only after the player has
    /// connected that pair.
    pub fn solution(&self, pair: usize) -> Option<&[Cell]> {
        if !self.connected.get(pair).copied().unwrap_or(false) {
            return None;
        }
        self.puzzle.solution_path(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::connector::generation::{fallback_puzzle, CONNECTOR_PAIRS, CONNECTOR_SIZE};

    #[test]
    fn test_owner_lookup() {
        let game = ConnectorGame::from_puzzle(fallback_puzzle(CONNECTOR_SIZE, CONNECTOR_PAIRS));
        assert_eq!(game.owner((0, 0)), CellOwner::Endpoint(0));
        assert_eq!(game.owner((2, 5)), CellOwner::Endpoint(2));
        assert_eq!(game.owner((0, 3)), CellOwner::Empty);
    }

    #[test]
    fn test_solution_hidden_until_connected() {
        let mut game = ConnectorGame::from_puzzle(fallback_puzzle(CONNECTOR_SIZE, CONNECTOR_PAIRS));
        assert!(game.solution(0).is_none());
        game.connected[0] = true;
        assert_eq!(game.solution(0).map(|p| p.len()), Some(CONNECTOR_SIZE));
        assert!(game.solution(1).is_none());
        assert!(game.solution(42).is_none());
    }
}
