//! Tunable per-game rules and arcade-wide settings.
//!
//! Defaults live in code; `~/.galaxy-trader/arcade.json` may override any of
//! them. A missing or malformed file falls back to the defaults.

use crate::core::constants::MAX_STEP_MS;
use crate::games::GameId;
use crate::utils::persistence;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// File name of the arcade config under the app directory.
pub const ARCADE_CONFIG_FILE: &str = "arcade.json";

/// Balance the reward is paid into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Diamonds,
    Credits,
}

impl Currency {
    /// Field name on the user document.
    pub fn field(&self) -> &'static str {
        match self {
            Currency::Diamonds => "diamonds",
            Currency::Credits => "credits",
        }
    }
}

/// Rules for one game: starting resources, goal, reward, and ad continuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub hearts_start: u32,
    pub target_score: u32,
    pub duration_ms: u64,
    /// Zero skips the preview state.
    pub preview_ms: u64,
    pub reward_amount: u64,
    pub xp_amount: u64,
    pub currency: Currency,
    /// Continuations allowed per run; zero disables the ad prompt.
    pub max_ads: u32,
    pub ad_bonus_ms: u64,
    pub ad_restore_hearts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hearts_start: 3,
            target_score: 100,
            duration_ms: 60_000,
            preview_ms: 0,
            reward_amount: 5,
            xp_amount: 20,
            currency: Currency::Diamonds,
            max_ads: 1,
            ad_bonus_ms: 15_000,
            ad_restore_hearts: 1,
        }
    }
}

impl GameConfig {
    /// Stock rules for each game.
    pub fn for_game(game: GameId) -> Self {
        let base = Self::default();
        match game {
            GameId::Catcher => Self {
                hearts_start: 3,
                target_score: 80,
                duration_ms: 60_000,
                ..base
            },
            GameId::Shooter => Self {
                target_score: 300,
                duration_ms: 90_000,
                reward_amount: 6,
                xp_amount: 25,
                ..base
            },
            GameId::Slicer => Self {
                target_score: 150,
                reward_amount: 5,
                ..base
            },
            GameId::Runner => Self {
                target_score: 40,
                duration_ms: 90_000,
                reward_amount: 4,
                ..base
            },
            GameId::Match3 => Self {
                hearts_start: 1,
                target_score: 1500,
                duration_ms: 90_000,
                reward_amount: 8,
                xp_amount: 30,
                currency: Currency::Credits,
                ..base
            },
            GameId::Memory => Self {
                hearts_start: 5,
                target_score: 80,
                preview_ms: 2000,
                ad_restore_hearts: 2,
                ..base
            },
            GameId::Connector => Self {
                hearts_start: 1,
                target_score: 50,
                duration_ms: 120_000,
                reward_amount: 6,
                ..base
            },
            GameId::Sliding => Self {
                hearts_start: 1,
                target_score: 100,
                duration_ms: 180_000,
                preview_ms: 1200,
                reward_amount: 10,
                xp_amount: 40,
                ad_bonus_ms: 30_000,
                ..base
            },
            GameId::Chess => Self {
                hearts_start: 1,
                target_score: 1,
                duration_ms: 600_000,
                reward_amount: 15,
                xp_amount: 50,
                max_ads: 0,
                ..base
            },
        }
    }
}

/// Arcade-wide settings plus per-game overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub max_step_ms: u64,
    /// Require a verified email before any game can start.
    pub require_verified_email: bool,
    /// Partial `GameConfig` objects, laid over the stock rules field by field.
    pub games: BTreeMap<GameId, Value>,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            max_step_ms: MAX_STEP_MS,
            require_verified_email: false,
            games: BTreeMap::new(),
        }
    }
}

impl ArcadeConfig {
    /// Load from the app directory, or defaults when absent.
    pub fn load() -> Self {
        persistence::load_json_or_default(ARCADE_CONFIG_FILE)
    }

    /// Rules for a game: stock rules with any overridden fields replaced.
    /// An override that does not fit the rules is ignored as a whole.
    pub fn game(&self, game: GameId) -> GameConfig {
        let stock = GameConfig::for_game(game);
        let Some(Value::Object(fields)) = self.games.get(&game) else {
            if self.games.contains_key(&game) {
                log::warn!("ignoring {game} override: not an object");
            }
            return stock;
        };
        let mut merged = match serde_json::to_value(&stock) {
            Ok(Value::Object(map)) => map,
            _ => return stock,
        };
        for (key, value) in fields {
            merged.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(merged)).unwrap_or_else(|e| {
            log::warn!("ignoring {game} override: {e}");
            stock
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catcher_defaults() {
        let config = GameConfig::for_game(GameId::Catcher);
        assert_eq!(config.hearts_start, 3);
        assert_eq!(config.target_score, 80);
        assert_eq!(config.duration_ms, 60_000);
        assert_eq!(config.currency, Currency::Diamonds);
    }

    #[test]
    fn test_chess_has_no_ads() {
        assert_eq!(GameConfig::for_game(GameId::Chess).max_ads, 0);
    }

    #[test]
    fn test_every_game_has_a_reachable_goal() {
        for game in GameId::ALL {
            let config = GameConfig::for_game(game);
            assert!(config.target_score > 0, "{game}");
            assert!(config.hearts_start > 0, "{game}");
            assert!(config.duration_ms >= 60_000, "{game}");
        }
    }

    #[test]
    fn test_partial_override_keeps_stock_rules() {
        let json = r#"{ "games": { "chess": { "target_score": 2 }, "memory": { "max_ads": 3 } } }"#;
        let config: ArcadeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_step_ms, MAX_STEP_MS);

        let chess = config.game(GameId::Chess);
        assert_eq!(chess.target_score, 2);
        assert_eq!(chess.max_ads, 0);
        assert_eq!(chess.hearts_start, 1);
        assert_eq!(chess.duration_ms, 600_000);

        let memory = config.game(GameId::Memory);
        assert_eq!(memory.max_ads, 3);
        assert_eq!(memory.hearts_start, 5);
        assert_eq!(memory.preview_ms, 2000);

        assert_eq!(config.game(GameId::Runner), GameConfig::for_game(GameId::Runner));
    }

    #[test]
    fn test_bad_override_falls_back_to_stock() {
        let json = r#"{ "games": { "catcher": { "target_score": "lots" }, "runner": 7 } }"#;
        let config: ArcadeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.game(GameId::Catcher), GameConfig::for_game(GameId::Catcher));
        assert_eq!(config.game(GameId::Runner), GameConfig::for_game(GameId::Runner));
    }

    #[test]
    fn test_currency_fields() {
        assert_eq!(Currency::Diamonds.field(), "diamonds");
        assert_eq!(Currency::Credits.field(), "credits");
    }
}
