//! Connector game logic: tracing paths between endpoints.

use super::generation::{manhattan, Cell};
use super::types::*;
use crate::core::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorInput {
    /// Pointer pressed on a cell.
    Begin(Cell),
    /// Pointer dragged onto a cell.
    Extend(Cell),
    /// Pointer released.
    End,
}

pub fn process_input(game: &mut ConnectorGame, input: ConnectorInput, session: &mut Session) {
    match input {
        ConnectorInput::Begin(cell) => begin(game, cell),
        ConnectorInput::Extend(cell) => extend(game, cell, session),
        ConnectorInput::End => game.active = None,
    }
}

fn begin(game: &mut ConnectorGame, cell: Cell) {
    game.active = None;
    match game.owner(cell) {
        CellOwner::Endpoint(pair) if !game.connected[pair] => {
            game.paths[pair] = vec![cell];
            game.active = Some(pair);
        }
        CellOwner::Path(pair) if !game.connected[pair] => {
            // Resume from the middle of an unfinished path
            if let Some(at) = game.paths[pair].iter().position(|&c| c == cell) {
                game.paths[pair].truncate(at + 1);
                game.active = Some(pair);
            }
        }
        _ => {}
    }
}

fn extend(game: &mut ConnectorGame, cell: Cell, session: &mut Session) {
    let Some(pair) = game.active else {
        return;
    };
    if cell.0 >= game.size() || cell.1 >= game.size() {
        return;
    }
    let Some(&last) = game.paths[pair].last() else {
        return;
    };
    if manhattan(last, cell) != 1 {
        return;
    }

    // Dragging back over our own path shortens it
    if let Some(at) = game.paths[pair].iter().position(|&c| c == cell) {
        game.paths[pair].truncate(at + 1);
        return;
    }

    match game.owner(cell) {
        CellOwner::Empty => game.paths[pair].push(cell),
        CellOwner::Endpoint(owner) if owner == pair => {
            game.paths[pair].push(cell);
            game.connected[pair] = true;
            game.active = None;
            session.add_score(POINTS_PER_CONNECTION);
        }
        // Paths may not cross
        CellOwner::Endpoint(_) | CellOwner::Path(_) => {}
    }
}
