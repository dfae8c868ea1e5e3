//! Read-only snapshot handed to the presentation layer each frame.
//!
//! A `Frame` is a pure projection of engine state. Building one never mutates
//! the session or the game.

use crate::core::session::SessionState;
use serde::Serialize;

/// One drawable circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub kind: &'static str,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Sprite {
    pub fn new(kind: &'static str, pos: glam::DVec2, radius: f64) -> Self {
        Self {
            kind,
            x: pos.x,
            y: pos.y,
            radius,
        }
    }
}

/// Contents of one board cell for the grid games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellView {
    Empty,
    Candy { kind: u8, selected: bool },
    /// `face` is `None` while the card is face down.
    Card { face: Option<u8>, matched: bool },
    Endpoint { pair: usize, connected: bool },
    Path { pair: usize },
    Tile { number: u8 },
    Piece { glyph: char, selected: bool },
    ChessSquare { highlighted: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridView {
    pub rows: usize,
    pub cols: usize,
    /// Row-major.
    pub cells: Vec<CellView>,
}

/// Everything the UI needs to draw a frame and its HUD.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub state: SessionState,
    pub score: u32,
    pub target_score: u32,
    pub lives: u32,
    pub seconds_left: u64,
    pub combo: u32,
    pub sprites: Vec<Sprite>,
    pub grid: Option<GridView>,
}

impl Frame {
    /// Fraction of the target reached, for the progress bar.
    pub fn progress(&self) -> f64 {
        if self.target_score == 0 {
            return 1.0;
        }
        (self.score as f64 / self.target_score as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_capped() {
        let frame = Frame {
            state: SessionState::Playing,
            score: 150,
            target_score: 100,
            lives: 3,
            seconds_left: 10,
            combo: 1,
            sprites: Vec::new(),
            grid: None,
        };
        assert_eq!(frame.progress(), 1.0);
    }

    #[test]
    fn test_cell_view_serializes_tagged() {
        let json = serde_json::to_string(&CellView::Tile { number: 7 }).unwrap();
        assert_eq!(json, r#"{"type":"tile","number":7}"#);
    }
}
