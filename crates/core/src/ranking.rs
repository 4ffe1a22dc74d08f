// Rank assembly for game leaderboards
//
// Storage hands over rows already sorted best-first; this module turns them
// into ranked entries. Ranks are positional: leaderboard pages number rows by
// offset, and the around-me window numbers neighbours by distance from the
// caller's computed rank.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Number of neighbours shown on each side of the caller
pub const AROUND_ME_WINDOW: usize = 5;

/// A best-score row joined with its owner's display name
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub user_id: i64,
    pub user_name: Option<String>,
    pub score: f64,
    pub metadata: Option<serde_json::Value>,
    pub updated_at: DateTime<Utc>,
}

/// A leaderboard line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RankedScore {
    pub rank: i64,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub metadata: Option<serde_json::Value>,
    pub updated_at: DateTime<Utc>,
    /// Set on the caller's own line in around-me responses.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_me: bool,
}

impl RankedScore {
    pub fn new(entry: ScoreEntry, rank: i64, is_me: bool) -> Self {
        Self {
            rank,
            user_id: entry.user_id,
            user_name: entry.user_name,
            score: entry.score,
            metadata: entry.metadata,
            updated_at: entry.updated_at,
            is_me,
        }
    }
}

/// Rank from the number of strictly better scores. Ties share a rank.
pub fn rank_from_better_count(better: i64) -> i64 {
    better + 1
}

/// Number a best-first page: `rank = offset + position + 1`
pub fn rank_page(entries: Vec<ScoreEntry>, offset: i64) -> Vec<RankedScore> {
    entries
        .into_iter()
        .zip(offset + 1..)
        .map(|(entry, rank)| RankedScore::new(entry, rank, false))
        .collect()
}

/// Build the around-me window.
///
/// `above` and `below` are both ordered nearest-first. The result runs best to
/// worst: the better rows, the caller, then the worse rows.
pub fn assemble_around(
    my_rank: i64,
    me: ScoreEntry,
    above: Vec<ScoreEntry>,
    below: Vec<ScoreEntry>,
) -> Vec<RankedScore> {
    let mut rankings = Vec::with_capacity(above.len() + below.len() + 1);

    let above_len = above.len();
    for (index, entry) in above.into_iter().rev().enumerate() {
        let distance = (above_len - index) as i64;
        rankings.push(RankedScore::new(entry, my_rank - distance, false));
    }

    rankings.push(RankedScore::new(me, my_rank, true));

    for (entry, distance) in below.into_iter().zip(1i64..) {
        rankings.push(RankedScore::new(entry, my_rank + distance, false));
    }

    rankings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user_id: i64, score: f64) -> ScoreEntry {
        ScoreEntry {
            user_id,
            user_name: Some(format!("user-{user_id}")),
            score,
            metadata: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_rank_page_uses_offset() {
        let ranked = rank_page(vec![entry(1, 90.0), entry(2, 80.0)], 10);
        assert_eq!(ranked[0].rank, 11);
        assert_eq!(ranked[1].rank, 12);
        assert!(ranked.iter().all(|r| !r.is_me));
    }

    #[test]
    fn test_rank_page_ties_get_consecutive_ranks() {
        let ranked = rank_page(vec![entry(1, 80.0), entry(2, 80.0)], 0);
        assert_eq!(
            ranked.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_rank_from_better_count() {
        assert_eq!(rank_from_better_count(0), 1);
        assert_eq!(rank_from_better_count(4), 5);
    }

    #[test]
    fn test_assemble_around_single_neighbours() {
        let rankings = assemble_around(2, entry(2, 80.0), vec![entry(1, 100.0)], vec![entry(3, 60.0)]);

        let summary: Vec<_> = rankings
            .iter()
            .map(|r| (r.user_id, r.rank, r.is_me))
            .collect();
        assert_eq!(summary, vec![(1, 1, false), (2, 2, true), (3, 3, false)]);
    }

    #[test]
    fn test_assemble_around_orders_above_best_first() {
        // nearest-first: 90 is closest above 85, then 95, then 100
        let above = vec![entry(4, 90.0), entry(3, 95.0), entry(2, 100.0)];
        let below = vec![entry(6, 80.0), entry(7, 70.0)];
        let rankings = assemble_around(10, entry(5, 85.0), above, below);

        let summary: Vec<_> = rankings.iter().map(|r| (r.user_id, r.rank)).collect();
        assert_eq!(
            summary,
            vec![(2, 7), (3, 8), (4, 9), (5, 10), (6, 11), (7, 12)]
        );
        assert_eq!(rankings.iter().filter(|r| r.is_me).count(), 1);
    }

    #[test]
    fn test_assemble_around_alone() {
        let rankings = assemble_around(1, entry(1, 10.0), vec![], vec![]);
        assert_eq!(rankings.len(), 1);
        assert!(rankings[0].is_me);
        assert_eq!(rankings[0].rank, 1);
    }

    #[test]
    fn test_is_me_only_serialized_when_set() {
        let mine = RankedScore::new(entry(1, 10.0), 1, true);
        let other = RankedScore::new(entry(2, 9.0), 2, false);
        assert_eq!(serde_json::to_value(&mine).unwrap()["isMe"], true);
        assert!(serde_json::to_value(&other).unwrap().get("isMe").is_none());
    }
}
