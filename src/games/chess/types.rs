//! Chess-vs-bot data structures.

use crate::core::spawner::Range;
use chess_engine::{Color as ChessColor, Evaluate, Move, Piece, Position};
use serde::{Deserialize, Serialize};

/// Seconds the bot "thinks" before answering.
pub const BOT_THINK_SECONDS: Range = Range::new(0.6, 1.5);

/// Square as (file, rank), both 0..8; a1 is (0, 0).
pub type Square = (u8, u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotLevel {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl BotLevel {
    pub fn search_depth(&self) -> i32 {
        match self {
            Self::Easy => 1,
            Self::Normal => 2,
            Self::Hard => 3,
        }
    }

    /// Chance the bot plays a uniformly random legal move instead of searching.
    pub fn random_move_chance(&self) -> f64 {
        match self {
            Self::Easy => 0.5,
            Self::Normal => 0.1,
            Self::Hard => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChessOutcome {
    PlayerWon,
    BotWon,
    Stalemate,
}

/// Active game. The player is always white.
#[derive(Debug, Clone)]
pub struct ChessGame {
    pub board: chess_engine::Board,
    pub level: BotLevel,
    pub selected: Option<Square>,
    pub legal_destinations: Vec<Square>,
    pub bot_thinking: bool,
    pub bot_elapsed: f64,
    pub bot_delay: f64,
    pub outcome: Option<ChessOutcome>,
    pub last_move: Option<(Square, Square)>,
    pub moves_played: u32,
}

pub fn position(square: Square) -> Position {
    Position::new(square.1 as i32, square.0 as i32)
}

pub fn square(pos: Position) -> Square {
    (pos.get_col() as u8, pos.get_row() as u8)
}

/// Unicode glyph for a piece (filled glyphs for white on dark boards).
pub fn piece_glyph(piece: &Piece) -> char {
    match piece {
        Piece::King(ChessColor::White, _) => '\u{265A}',
        Piece::Queen(ChessColor::White, _) => '\u{265B}',
        Piece::Rook(ChessColor::White, _) => '\u{265C}',
        Piece::Bishop(ChessColor::White, _) => '\u{265D}',
        Piece::Knight(ChessColor::White, _) => '\u{265E}',
        Piece::Pawn(ChessColor::White, _) => '\u{265F}',
        Piece::King(ChessColor::Black, _) => '\u{2654}',
        Piece::Queen(ChessColor::Black, _) => '\u{2655}',
        Piece::Rook(ChessColor::Black, _) => '\u{2656}',
        Piece::Bishop(ChessColor::Black, _) => '\u{2657}',
        Piece::Knight(ChessColor::Black, _) => '\u{2658}',
        Piece::Pawn(ChessColor::Black, _) => '\u{2659}',
    }
}

impl ChessGame {
    pub fn new(level: BotLevel) -> Self {
        Self {
            board: chess_engine::Board::default(),
            level,
            selected: None,
            legal_destinations: Vec::new(),
            bot_thinking: false,
            bot_elapsed: 0.0,
            bot_delay: 0.0,
            outcome: None,
            last_move: None,
            moves_played: 0,
        }
    }

    pub fn player_color(&self) -> ChessColor {
        ChessColor::White
    }

    pub fn is_player_turn(&self) -> bool {
        self.outcome.is_none() && !self.bot_thinking && self.board.get_turn_color() == self.player_color()
    }

    /// Select one of the player's pieces and collect where it may go.
    pub fn select(&mut self, sq: Square) -> bool {
        if !self.is_player_turn() {
            return false;
        }
        let pos = position(sq);
        let Some(piece) = self.board.get_piece(pos) else {
            return false;
        };
        if piece.get_color() != self.player_color() {
            return false;
        }

        let mut destinations = Vec::new();
        for m in self.board.get_legal_moves() {
            match m {
                Move::Piece(from, to) if from == pos => destinations.push(square(to)),
                Move::KingSideCastle if piece.is_king() => destinations.push((6, 0)),
                Move::QueenSideCastle if piece.is_king() => destinations.push((2, 0)),
                _ => {}
            }
        }
        if destinations.is_empty() {
            return false;
        }
        self.selected = Some(sq);
        self.legal_destinations = destinations;
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.legal_destinations.clear();
    }

    /// Engine move for the selected piece going to `dest`, castling included.
    pub fn move_for(&self, dest: Square) -> Option<Move> {
        let from = self.selected?;
        if !self.legal_destinations.contains(&dest) {
            return None;
        }
        let is_king = self
            .board
            .get_piece(position(from))
            .is_some_and(|p| p.is_king());
        let m = if is_king && dest.0 == from.0 + 2 {
            Move::KingSideCastle
        } else if is_king && from.0 >= 2 && dest.0 == from.0 - 2 {
            Move::QueenSideCastle
        } else {
            Move::Piece(position(from), position(dest))
        };
        Some(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let game = ChessGame::new(BotLevel::Easy);
        assert!(game.is_player_turn());
        assert!(game.outcome.is_none());
        assert!(!game.board.get_legal_moves().is_empty());
    }

    #[test]
    fn test_select_pawn_lists_two_pushes() {
        let mut game = ChessGame::new(BotLevel::Easy);
        assert!(game.select((4, 1)));
        assert_eq!(game.legal_destinations.len(), 2);
        assert!(game.legal_destinations.contains(&(4, 3)));
    }

    #[test]
    fn test_cannot_select_enemy_or_empty() {
        let mut game = ChessGame::new(BotLevel::Easy);
        assert!(!game.select((4, 6)));
        assert!(!game.select((4, 4)));
        assert!(game.selected.is_none());
    }

    #[test]
    fn test_square_position_round_trip() {
        let sq = (6, 2);
        assert_eq!(square(position(sq)), sq);
    }

    #[test]
    fn test_level_tuning() {
        assert!(BotLevel::Easy.random_move_chance() > BotLevel::Hard.random_move_chance());
        assert!(BotLevel::Hard.search_depth() > BotLevel::Easy.search_depth());
    }
}
