// Mini-game domain types
//
// The ordering policy is a fixed table: each game declares whether a lower
// score (times) or a higher score (points, win rates) ranks better.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Direction in which scores improve
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Lower is better
    Asc,
    /// Higher is better
    Desc,
}

impl SortOrder {
    /// Whether `candidate` strictly beats `incumbent`
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            SortOrder::Asc => candidate < incumbent,
            SortOrder::Desc => candidate > incumbent,
        }
    }

    /// Ordering that puts the better score first
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            SortOrder::Asc => a.total_cmp(&b),
            SortOrder::Desc => b.total_cmp(&a),
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// `ORDER BY score <dir>` keyword, best first
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Comparison operator selecting scores strictly better than a bound
    pub fn better_op(self) -> &'static str {
        match self {
            SortOrder::Asc => "<",
            SortOrder::Desc => ">",
        }
    }

    /// Comparison operator selecting scores strictly worse than a bound
    pub fn worse_op(self) -> &'static str {
        self.reversed().better_op()
    }
}

/// Games with a server-side leaderboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum GameType {
    /// Milliseconds to react
    #[serde(rename = "reaction-time")]
    ReactionTime,
    /// Solve time in seconds
    #[serde(rename = "sudoku")]
    Sudoku,
    /// Clear time in seconds
    #[serde(rename = "minesweeper")]
    Minesweeper,
    /// Digits remembered
    #[serde(rename = "number-memory")]
    NumberMemory,
    #[serde(rename = "2048")]
    Game2048,
    #[serde(rename = "snake")]
    Snake,
    #[serde(rename = "tetris")]
    Tetris,
    /// Win rate; metadata carries win/loss counts
    #[serde(rename = "rock-paper-scissors")]
    RockPaperScissors,
}

impl GameType {
    pub const ALL: [GameType; 8] = [
        GameType::ReactionTime,
        GameType::Sudoku,
        GameType::Minesweeper,
        GameType::NumberMemory,
        GameType::Game2048,
        GameType::Snake,
        GameType::Tetris,
        GameType::RockPaperScissors,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::ReactionTime => "reaction-time",
            GameType::Sudoku => "sudoku",
            GameType::Minesweeper => "minesweeper",
            GameType::NumberMemory => "number-memory",
            GameType::Game2048 => "2048",
            GameType::Snake => "snake",
            GameType::Tetris => "tetris",
            GameType::RockPaperScissors => "rock-paper-scissors",
        }
    }

    /// The ordering policy. Consulted for every comparison, sort and count.
    pub fn sort_order(&self) -> SortOrder {
        match self {
            GameType::ReactionTime | GameType::Sudoku | GameType::Minesweeper => SortOrder::Asc,
            GameType::NumberMemory
            | GameType::Game2048
            | GameType::Snake
            | GameType::Tetris
            | GameType::RockPaperScissors => SortOrder::Desc,
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game type '{0}'")]
pub struct ParseGameTypeError(pub String);

impl std::str::FromStr for GameType {
    type Err = ParseGameTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        GameType::ALL
            .into_iter()
            .find(|g| g.as_str() == normalized)
            .ok_or_else(|| ParseGameTypeError(s.to_string()))
    }
}

/// Best score a user holds for a game
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct GameScore {
    pub id: i64,
    pub user_id: i64,
    pub game_type: GameType,
    pub score: f64,
    /// Opaque payload stored alongside the score.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_better_is_strict() {
        assert!(SortOrder::Asc.is_better(0.3, 0.5));
        assert!(!SortOrder::Asc.is_better(0.5, 0.5));
        assert!(!SortOrder::Asc.is_better(0.6, 0.5));

        assert!(SortOrder::Desc.is_better(200.0, 100.0));
        assert!(!SortOrder::Desc.is_better(100.0, 100.0));
        assert!(!SortOrder::Desc.is_better(50.0, 100.0));
    }

    #[test]
    fn test_compare_puts_best_first() {
        let mut scores = vec![60.0, 100.0, 80.0];
        scores.sort_by(|a, b| SortOrder::Desc.compare(*a, *b));
        assert_eq!(scores, vec![100.0, 80.0, 60.0]);

        scores.sort_by(|a, b| SortOrder::Asc.compare(*a, *b));
        assert_eq!(scores, vec![60.0, 80.0, 100.0]);
    }

    #[test]
    fn test_sql_fragments() {
        assert_eq!(SortOrder::Asc.as_sql(), "ASC");
        assert_eq!(SortOrder::Asc.better_op(), "<");
        assert_eq!(SortOrder::Asc.worse_op(), ">");
        assert_eq!(SortOrder::Desc.better_op(), ">");
        assert_eq!(SortOrder::Desc.reversed().as_sql(), "ASC");
    }

    #[test]
    fn test_policy_table() {
        assert_eq!(GameType::ReactionTime.sort_order(), SortOrder::Asc);
        assert_eq!(GameType::Sudoku.sort_order(), SortOrder::Asc);
        assert_eq!(GameType::Game2048.sort_order(), SortOrder::Desc);
        assert_eq!(GameType::RockPaperScissors.sort_order(), SortOrder::Desc);
    }

    #[test]
    fn test_game_type_round_trips_through_str() {
        for game in GameType::ALL {
            assert_eq!(game.as_str().parse::<GameType>().unwrap(), game);
            let json = serde_json::to_value(game).unwrap();
            assert_eq!(json, game.as_str());
        }
        assert_eq!(" Tetris ".parse::<GameType>().unwrap(), GameType::Tetris);
    }

    #[test]
    fn test_unknown_game_type() {
        assert_eq!(
            "pong".parse::<GameType>(),
            Err(ParseGameTypeError("pong".to_string()))
        );
    }
}
