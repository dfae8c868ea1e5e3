//! Scripted player used by the headless binary and the integration tests.
//!
//! The pilot looks at the mounted game the way a player looks at the screen
//! and answers with ordinary inputs. It is deliberately decent, not perfect:
//! the runner and the sliding puzzle are often lost.

use crate::arcade::Arcade;
use crate::core::collision::segment_point_distance;
use crate::core::constants::FRAME_MS;
use crate::core::engine::{RewardStatus, SessionEngine};
use crate::core::session::SessionState;
use crate::error::Toast;
use crate::games::catcher::{CatcherInput, Falling};
use crate::games::chess::{ChessGame, ChessInput};
use crate::games::connector::ConnectorInput;
use crate::games::match3::{Match3Input, MATCH3_COLS, MATCH3_ROWS};
use crate::games::memory::{CardState, MemoryInput};
use crate::games::runner::RunnerInput;
use crate::games::shooter::ShooterInput;
use crate::games::slicer::{SlicerInput, Thrown};
use crate::games::sliding::SlidingInput;
use crate::games::{ActiveGame, GameId, GameInput};
use chess_engine::{Evaluate, Move};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Frames between moves in the turn-based games.
const PUZZLE_MOVE_FRAMES: u64 = 12;
/// Extra reach on each side of a fruit when swiping through it.
const SWIPE_REACH: f64 = 14.0;
const CHESS_SEARCH_DEPTH: i32 = 2;

pub struct Autopilot {
    rng: StdRng,
    /// Chance of playing the right move where a mistake is possible.
    skill: f64,
    /// Watch an ad when offered instead of declining.
    pub watch_ads: bool,
    frames: u64,
    swiping: bool,
    firing: bool,
    last_blank: Option<usize>,
}

impl Autopilot {
    pub fn new(seed: u64, skill: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            skill: skill.clamp(0.0, 1.0),
            watch_ads: true,
            frames: 0,
            swiping: false,
            firing: false,
            last_blank: None,
        }
    }

    fn reset(&mut self) {
        self.frames = 0;
        self.swiping = false;
        self.firing = false;
        self.last_blank = None;
    }

    /// Inputs for the coming frame.
    pub fn inputs(&mut self, engine: &SessionEngine) -> Vec<GameInput> {
        if engine.state() != SessionState::Playing {
            return Vec::new();
        }
        self.frames += 1;
        let puzzle_turn = self.frames % PUZZLE_MOVE_FRAMES == 0;
        match &engine.game {
            ActiveGame::Catcher(g) => {
                let target = g
                    .objects
                    .iter()
                    .filter(|o| o.alive && o.kind != Falling::Bomb && o.pos.y < g.basket.y)
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                    .map_or(g.bounds.width / 2.0, |o| o.pos.x);
                vec![GameInput::Catcher(CatcherInput::MoveTo(target))]
            }
            ActiveGame::Shooter(g) => {
                let mut out = Vec::new();
                if !self.firing {
                    self.firing = true;
                    out.push(GameInput::Shooter(ShooterInput::AutoFire(true)));
                }
                if let Some(rock) = g
                    .asteroids
                    .iter()
                    .filter(|a| a.alive)
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                {
                    out.push(GameInput::Shooter(ShooterInput::MoveTo(rock.pos.x)));
                }
                out
            }
            ActiveGame::Slicer(g) => {
                if self.swiping {
                    self.swiping = false;
                    return vec![GameInput::Slicer(SlicerInput::PointerUp)];
                }
                let bombs: Vec<(DVec2, f64)> = g
                    .objects
                    .iter()
                    .filter(|o| o.alive && o.kind == Thrown::Bomb)
                    .map(|o| (o.pos, o.radius))
                    .collect();
                let swipe = g
                    .objects
                    .iter()
                    .filter(|o| o.alive && o.kind == Thrown::Fruit && o.pos.y < g.bounds.height)
                    .map(|o| {
                        let reach = DVec2::new(o.radius + SWIPE_REACH, 0.0);
                        (o.pos - reach, o.pos + reach)
                    })
                    .find(|&(a, b)| {
                        bombs
                            .iter()
                            .all(|&(p, r)| segment_point_distance(a, b, p) > r * 2.0)
                    });
                match swipe {
                    Some((a, b)) => {
                        self.swiping = true;
                        vec![
                            GameInput::Slicer(SlicerInput::PointerDown(a)),
                            GameInput::Slicer(SlicerInput::PointerMove(b)),
                        ]
                    }
                    None => Vec::new(),
                }
            }
            ActiveGame::Runner(g) => {
                let cruise = g.bounds.height * 0.55;
                let threat = g.debris.iter().any(|d| {
                    d.alive
                        && d.pos.x > g.pos.x
                        && d.pos.x - g.pos.x < 140.0
                        && d.pos.y > g.pos.y
                        && d.pos.y - g.pos.y < d.radius + 40.0
                });
                if (g.pos.y > cruise && g.vel.y >= 0.0) || threat {
                    vec![GameInput::Runner(RunnerInput::Tap)]
                } else {
                    Vec::new()
                }
            }
            ActiveGame::Match3(g) => {
                if !puzzle_turn {
                    return Vec::new();
                }
                let mut moves = Vec::new();
                for row in 0..MATCH3_ROWS {
                    for col in 0..MATCH3_COLS {
                        for (dr, dc) in [(0, 1), (1, 0)] {
                            let other = (row + dr, col + dc);
                            if other.0 >= MATCH3_ROWS || other.1 >= MATCH3_COLS {
                                continue;
                            }
                            let mut board = g.board.clone();
                            board.swap((row, col), other);
                            if board.has_matches() {
                                moves.push(((row, col), other));
                            }
                        }
                    }
                }
                moves
                    .choose(&mut self.rng)
                    .map(|&(a, b)| vec![GameInput::Match3(Match3Input::Swap(a, b))])
                    .unwrap_or_default()
            }
            ActiveGame::Memory(g) => {
                if !puzzle_turn || g.pending_hide.is_some() {
                    return Vec::new();
                }
                let hidden: Vec<usize> = g
                    .cards
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.state == CardState::Hidden)
                    .map(|(i, _)| i)
                    .collect();
                let remembered = g
                    .first
                    .and_then(|first| g.partner_of(first))
                    .filter(|_| self.rng.gen_bool(self.skill));
                remembered
                    .or_else(|| hidden.choose(&mut self.rng).copied())
                    .map(|i| vec![GameInput::Memory(MemoryInput::Flip(i))])
                    .unwrap_or_default()
            }
            ActiveGame::Connector(g) => {
                if !puzzle_turn {
                    return Vec::new();
                }
                let Some(pair) = g.connected.iter().position(|&c| !c) else {
                    return Vec::new();
                };
                // Scripted play only: the hidden route must never reach a frame
                let Some(route) = g.puzzle.solution_path(pair) else {
                    return Vec::new();
                };
                let mut out = vec![GameInput::Connector(ConnectorInput::Begin(route[0]))];
                out.extend(
                    route[1..]
                        .iter()
                        .map(|&cell| GameInput::Connector(ConnectorInput::Extend(cell))),
                );
                out.push(GameInput::Connector(ConnectorInput::End));
                out
            }
            ActiveGame::Sliding(g) => {
                if !puzzle_turn {
                    return Vec::new();
                }
                let w = g.width;
                let blank = g.blank();
                let (br, bc) = (blank / w, blank % w);
                let mut options: Vec<(usize, usize)> = Vec::new();
                if br > 0 {
                    options.push((br - 1, bc));
                }
                if br + 1 < w {
                    options.push((br + 1, bc));
                }
                if bc > 0 {
                    options.push((br, bc - 1));
                }
                if bc + 1 < w {
                    options.push((br, bc + 1));
                }
                // Never slide straight back
                options.retain(|&(r, c)| Some(r * w + c) != self.last_blank);
                self.last_blank = Some(blank);
                options
                    .choose(&mut self.rng)
                    .map(|&(r, c)| vec![GameInput::Sliding(SlidingInput::Tap(r, c))])
                    .unwrap_or_default()
            }
            ActiveGame::Chess(g) => {
                if !g.is_player_turn() {
                    return Vec::new();
                }
                chess_taps(g)
                    .into_iter()
                    .map(GameInput::Chess)
                    .collect()
            }
        }
    }
}

fn chess_taps(game: &ChessGame) -> Vec<ChessInput> {
    let (best, _, _) = game.board.get_best_next_move(CHESS_SEARCH_DEPTH);
    match best {
        Move::Piece(from, to) => vec![
            ChessInput::Tap(crate::games::chess::square(from)),
            ChessInput::Tap(crate::games::chess::square(to)),
        ],
        Move::KingSideCastle => vec![ChessInput::Tap((4, 0)), ChessInput::Tap((6, 0))],
        Move::QueenSideCastle => vec![ChessInput::Tap((4, 0)), ChessInput::Tap((2, 0))],
        Move::Resign => vec![ChessInput::Resign],
    }
}

/// How one autoplayed session ended.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub game: GameId,
    pub state: SessionState,
    pub score: u32,
    pub target_score: u32,
    pub frames: u64,
    pub simulated_ms: u64,
    pub ads_watched: u32,
    pub reward: RewardStatus,
    pub toasts: Vec<Toast>,
}

impl SessionReport {
    pub fn won(&self) -> bool {
        self.state == SessionState::Win
    }
}

/// Play one session through the arcade, starting at `start_ms` on the host
/// clock and giving up after `limit_ms`. The reward commit, if any, is
/// awaited before returning.
pub async fn play_session(
    arcade: &mut Arcade,
    engine: &mut SessionEngine,
    pilot: &mut Autopilot,
    start_ms: u64,
    limit_ms: u64,
) -> SessionReport {
    pilot.reset();
    let mut now = start_ms;
    let mut frames = 0;
    if arcade.start(engine, now).await.is_ok() {
        while now - start_ms < limit_ms {
            now += FRAME_MS;
            frames += 1;
            for input in pilot.inputs(engine) {
                engine.input(input);
            }
            arcade.frame(engine, now);

            match engine.state() {
                SessionState::AdPrompt if pilot.watch_ads => {
                    log::debug!("{}: watching an ad", engine.game_id());
                    if engine.watch_ad(now).is_err() {
                        break;
                    }
                }
                SessionState::AdPrompt => {
                    if engine.decline_ad().is_err() {
                        break;
                    }
                }
                SessionState::Idle | SessionState::Win | SessionState::Lost => break,
                SessionState::Preview | SessionState::Playing => {}
            }
        }
        arcade.settle_reward(engine).await;
    }

    SessionReport {
        game: engine.game_id(),
        state: engine.state(),
        score: engine.session.score,
        target_score: engine.session.target_score,
        frames,
        simulated_ms: engine.simulated_ms(),
        ads_watched: engine.session.ads_watched,
        reward: engine.reward_status().clone(),
        toasts: arcade.take_toasts(),
    }
}
