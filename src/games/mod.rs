//! The mini-games.
//!
//! Each game keeps its own data in `types.rs` and its rules in `logic.rs`.
//! [`ActiveGame`] wraps whichever one is mounted so the engine can step,
//! feed input to, and draw any of them the same way.

pub mod catcher;
pub mod chess;
pub mod connector;
pub mod match3;
pub mod memory;
pub mod runner;
pub mod shooter;
pub mod slicer;
pub mod sliding;

use crate::core::frame::{CellView, GridView, Sprite};
use crate::core::session::{Session, SessionState};
use crate::error::GameError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a mini-game, also used as the ledger key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Catcher,
    Shooter,
    Slicer,
    Runner,
    Match3,
    Memory,
    Connector,
    Sliding,
    Chess,
}

impl GameId {
    pub const ALL: [GameId; 9] = [
        GameId::Catcher,
        GameId::Shooter,
        GameId::Slicer,
        GameId::Runner,
        GameId::Match3,
        GameId::Memory,
        GameId::Connector,
        GameId::Sliding,
        GameId::Chess,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Catcher => "catcher",
            GameId::Shooter => "shooter",
            GameId::Slicer => "slicer",
            GameId::Runner => "runner",
            GameId::Match3 => "match3",
            GameId::Memory => "memory",
            GameId::Connector => "connector",
            GameId::Sliding => "sliding",
            GameId::Chess => "chess",
        }
    }

    /// Games driven by continuous physics rather than discrete moves.
    pub fn is_realtime(&self) -> bool {
        matches!(
            self,
            GameId::Catcher | GameId::Shooter | GameId::Slicer | GameId::Runner
        )
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        GameId::ALL
            .into_iter()
            .find(|g| g.as_str() == lower)
            .ok_or_else(|| format!("unknown game: {s}"))
    }
}

/// Input for whichever game is mounted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameInput {
    Catcher(catcher::CatcherInput),
    Shooter(shooter::ShooterInput),
    Slicer(slicer::SlicerInput),
    Runner(runner::RunnerInput),
    Match3(match3::Match3Input),
    Memory(memory::MemoryInput),
    Connector(connector::ConnectorInput),
    Sliding(sliding::SlidingInput),
    Chess(chess::ChessInput),
}

/// State of the mounted game.
#[derive(Debug, Clone)]
pub enum ActiveGame {
    Catcher(catcher::CatcherGame),
    Shooter(shooter::ShooterGame),
    Slicer(slicer::SlicerGame),
    Runner(runner::RunnerGame),
    Match3(match3::Match3Game),
    Memory(memory::MemoryGame),
    Connector(connector::ConnectorGame),
    Sliding(sliding::SlidingGame),
    Chess(chess::ChessGame),
}

impl ActiveGame {
    /// Fresh game state; puzzle boards are generated here.
    pub fn new<R: Rng>(id: GameId, rng: &mut R) -> Self {
        match id {
            GameId::Catcher => Self::Catcher(catcher::CatcherGame::new()),
            GameId::Shooter => Self::Shooter(shooter::ShooterGame::new()),
            GameId::Slicer => Self::Slicer(slicer::SlicerGame::new()),
            GameId::Runner => Self::Runner(runner::RunnerGame::new()),
            GameId::Match3 => Self::Match3(match3::Match3Game::new(rng)),
            GameId::Memory => Self::Memory(memory::MemoryGame::new(rng)),
            GameId::Connector => Self::Connector(connector::ConnectorGame::new(rng)),
            GameId::Sliding => Self::Sliding(sliding::SlidingGame::new(rng)),
            GameId::Chess => Self::Chess(chess::ChessGame::new(chess::BotLevel::default())),
        }
    }

    pub fn id(&self) -> GameId {
        match self {
            Self::Catcher(_) => GameId::Catcher,
            Self::Shooter(_) => GameId::Shooter,
            Self::Slicer(_) => GameId::Slicer,
            Self::Runner(_) => GameId::Runner,
            Self::Match3(_) => GameId::Match3,
            Self::Memory(_) => GameId::Memory,
            Self::Connector(_) => GameId::Connector,
            Self::Sliding(_) => GameId::Sliding,
            Self::Chess(_) => GameId::Chess,
        }
    }

    /// Advance the simulation by `dt` seconds. Scoring goes through `session`.
    pub fn step<R: Rng>(&mut self, dt: f64, session: &mut Session, rng: &mut R) {
        match self {
            Self::Catcher(g) => catcher::step(g, dt, session, rng),
            Self::Shooter(g) => shooter::step(g, dt, session, rng),
            Self::Slicer(g) => slicer::step(g, dt, session, rng),
            Self::Runner(g) => runner::step(g, dt, session, rng),
            Self::Memory(g) => memory::step(g, dt),
            Self::Chess(g) => chess::step(g, dt, session, rng),
            Self::Match3(_) | Self::Connector(_) | Self::Sliding(_) => {}
        }
    }

    /// Route input to the game. Returns false when the input belongs to a
    /// different game.
    pub fn input<R: Rng>(&mut self, input: GameInput, session: &mut Session, rng: &mut R) -> bool {
        match (self, input) {
            (Self::Catcher(g), GameInput::Catcher(i)) => catcher::process_input(g, i),
            (Self::Shooter(g), GameInput::Shooter(i)) => shooter::process_input(g, i),
            (Self::Slicer(g), GameInput::Slicer(i)) => slicer::process_input(g, i),
            (Self::Runner(g), GameInput::Runner(i)) => runner::process_input(g, i),
            (Self::Match3(g), GameInput::Match3(i)) => {
                match3::process_input(g, i, session, rng);
            }
            (Self::Memory(g), GameInput::Memory(i)) => memory::process_input(g, i, session),
            (Self::Connector(g), GameInput::Connector(i)) => connector::process_input(g, i, session),
            (Self::Sliding(g), GameInput::Sliding(i)) => {
                sliding::process_input(g, i, session);
            }
            (Self::Chess(g), GameInput::Chess(i)) => chess::process_input(g, i, session, rng),
            _ => return false,
        }
        true
    }

    /// Reject non-finite positions or velocities before they reach scoring
    /// or the renderer.
    pub fn validate(&self) -> Result<(), GameError> {
        let finite = match self {
            Self::Catcher(g) => g.basket.is_finite() && g.objects.iter().all(|e| e.is_finite()),
            Self::Shooter(g) => {
                g.ship.is_finite()
                    && g.bullets.iter().all(|e| e.is_finite())
                    && g.asteroids.iter().all(|e| e.is_finite())
            }
            Self::Slicer(g) => {
                g.objects.iter().all(|e| e.is_finite()) && g.trail.iter().all(|p| p.pos.is_finite())
            }
            Self::Runner(g) => {
                g.pos.is_finite() && g.vel.is_finite() && g.debris.iter().all(|e| e.is_finite())
            }
            Self::Match3(_) | Self::Memory(_) | Self::Connector(_) | Self::Sliding(_) | Self::Chess(_) => true,
        };
        if finite {
            Ok(())
        } else {
            Err(GameError::CorruptState(format!("non-finite entity in {}", self.id())))
        }
    }

    /// Current combo multiplier, or cascade depth for match-3.
    pub fn combo(&self) -> u32 {
        match self {
            Self::Shooter(g) => g.combo.multiplier(),
            Self::Slicer(g) => g.combo.multiplier(),
            Self::Match3(g) => g.last_cascade.max(1),
            _ => 1,
        }
    }

    pub fn sprites(&self) -> Vec<Sprite> {
        let mut out = Vec::new();
        match self {
            Self::Catcher(g) => {
                out.push(Sprite::new("basket", g.basket, catcher::BASKET_RADIUS));
                out.extend(g.objects.iter().map(|o| Sprite::new(o.kind.sprite(), o.pos, o.radius)));
            }
            Self::Shooter(g) => {
                out.push(Sprite::new("ship", g.ship, shooter::SHIP_RADIUS));
                out.extend(g.bullets.iter().map(|b| Sprite::new("bullet", b.pos, b.radius)));
                out.extend(g.asteroids.iter().map(|a| Sprite::new(a.kind.sprite(), a.pos, a.radius)));
            }
            Self::Slicer(g) => {
                out.extend(g.objects.iter().map(|o| Sprite::new(o.kind.sprite(), o.pos, o.radius)));
                out.extend(g.trail.iter().map(|p| Sprite::new("trail", p.pos, 3.0)));
            }
            Self::Runner(g) => {
                out.push(Sprite::new("runner", g.pos, runner::RUNNER_RADIUS));
                out.extend(g.debris.iter().map(|d| Sprite::new("debris", d.pos, d.radius)));
            }
            _ => {}
        }
        out
    }

    /// Board view for the grid games. `state` decides what the preview shows.
    pub fn grid(&self, state: SessionState) -> Option<GridView> {
        let preview = state == SessionState::Preview;
        match self {
            Self::Match3(g) => {
                let mut cells = Vec::with_capacity(match3::MATCH3_ROWS * match3::MATCH3_COLS);
                for row in 0..match3::MATCH3_ROWS {
                    for col in 0..match3::MATCH3_COLS {
                        cells.push(CellView::Candy {
                            kind: g.board.get((row, col)),
                            selected: g.selected == Some((row, col)),
                        });
                    }
                }
                Some(GridView {
                    rows: match3::MATCH3_ROWS,
                    cols: match3::MATCH3_COLS,
                    cells,
                })
            }
            Self::Memory(g) => Some(GridView {
                rows: memory::MEMORY_ROWS,
                cols: memory::MEMORY_COLS,
                cells: g
                    .cards
                    .iter()
                    .map(|c| CellView::Card {
                        face: (preview || c.state != memory::CardState::Hidden).then_some(c.face),
                        matched: c.state == memory::CardState::Matched,
                    })
                    .collect(),
            }),
            Self::Connector(g) => {
                let size = g.size();
                let mut cells = Vec::with_capacity(size * size);
                for row in 0..size {
                    for col in 0..size {
                        cells.push(match g.owner((row, col)) {
                            connector::CellOwner::Empty => CellView::Empty,
                            connector::CellOwner::Endpoint(pair) => CellView::Endpoint {
                                pair,
                                connected: g.connected[pair],
                            },
                            connector::CellOwner::Path(pair) => CellView::Path { pair },
                        });
                    }
                }
                Some(GridView {
                    rows: size,
                    cols: size,
                    cells,
                })
            }
            Self::Sliding(g) => {
                // The preview shows the picture being assembled
                let tiles = if preview {
                    sliding::solved_tiles(g.width)
                } else {
                    g.tiles.clone()
                };
                Some(GridView {
                    rows: g.width,
                    cols: g.width,
                    cells: tiles
                        .into_iter()
                        .map(|t| match t {
                            sliding::BLANK => CellView::Empty,
                            number => CellView::Tile { number },
                        })
                        .collect(),
                })
            }
            Self::Chess(g) => {
                let mut cells = Vec::with_capacity(64);
                // Rank 8 on top
                for rank in (0..8u8).rev() {
                    for file in 0..8u8 {
                        let sq = (file, rank);
                        cells.push(match g.board.get_piece(chess::position(sq)) {
                            Some(piece) => CellView::Piece {
                                glyph: chess::piece_glyph(&piece),
                                selected: g.selected == Some(sq),
                            },
                            None => CellView::ChessSquare {
                                highlighted: g.legal_destinations.contains(&sq),
                            },
                        });
                    }
                }
                Some(GridView {
                    rows: 8,
                    cols: 8,
                    cells,
                })
            }
            _ => None,
        }
    }
}
