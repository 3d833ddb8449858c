//! Matchmaker values: merged chart rows, era selections and projections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FighterId, RatingSnapshot};

/// One row of the two-fighter rating chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedSeriesPoint {
    pub date: NaiveDate,
    pub fighter1_rating: Option<f64>,
    pub fighter2_rating: Option<f64>,
}

impl MergedSeriesPoint {
    /// A row with no rating for either fighter.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            fighter1_rating: None,
            fighter2_rating: None,
        }
    }
}

/// One row of a single-fighter rating chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingPoint {
    pub date: NaiveDate,
    pub rating: f64,
}

/// A fighter paired with the era (snapshot) picked to represent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupSelection {
    pub fighter_id: FighterId,

    /// Display name; may be empty when only the ID is known
    #[serde(default)]
    pub fighter_name: String,

    pub snapshot: RatingSnapshot,
}

impl MatchupSelection {
    pub fn new(fighter_id: FighterId, snapshot: RatingSnapshot) -> Self {
        Self {
            fighter_id,
            fighter_name: String::new(),
            snapshot,
        }
    }

    /// Builder method to set the display name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.fighter_name = name.to_string();
        self
    }

    /// The rating that decides the projection.
    pub fn rating(&self) -> f64 {
        self.snapshot.ending_elo
    }

    /// Name if known, otherwise the fighter ID.
    pub fn label(&self) -> &str {
        if self.fighter_name.is_empty() {
            self.fighter_id.as_str()
        } else {
            &self.fighter_name
        }
    }
}

/// Projected result of a hypothetical matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchResult {
    Decided {
        winner: MatchupSelection,
        loser: MatchupSelection,
    },
    /// Both ratings exactly equal; neither fighter is favoured
    Draw { fighters: [MatchupSelection; 2] },
}

impl MatchResult {
    pub fn is_draw(&self) -> bool {
        matches!(self, MatchResult::Draw { .. })
    }

    pub fn winner(&self) -> Option<&MatchupSelection> {
        match self {
            MatchResult::Decided { winner, .. } => Some(winner),
            MatchResult::Draw { .. } => None,
        }
    }

    pub fn loser(&self) -> Option<&MatchupSelection> {
        match self {
            MatchResult::Decided { loser, .. } => Some(loser),
            MatchResult::Draw { .. } => None,
        }
    }

    /// Rating gap between the two selections (zero for a draw).
    pub fn margin(&self) -> f64 {
        match self {
            MatchResult::Decided { winner, loser } => winner.rating() - loser.rating(),
            MatchResult::Draw { .. } => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(id: &str, rating: f64) -> MatchupSelection {
        let snapshot = RatingSnapshot::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            "b1".into(),
            "x".into(),
            1500.0,
            rating,
        );
        MatchupSelection::new(id.into(), snapshot)
    }

    #[test]
    fn test_selection_label_falls_back_to_id() {
        let anonymous = selection("f1", 1500.0);
        assert_eq!(anonymous.label(), "f1");

        let named = selection("f1", 1500.0).with_name("Georges St-Pierre");
        assert_eq!(named.label(), "Georges St-Pierre");
    }

    #[test]
    fn test_result_accessors() {
        let decided = MatchResult::Decided {
            winner: selection("a", 1620.0),
            loser: selection("b", 1600.0),
        };
        assert!(!decided.is_draw());
        assert_eq!(decided.winner().unwrap().fighter_id.as_str(), "a");
        assert_eq!(decided.loser().unwrap().fighter_id.as_str(), "b");
        assert_eq!(decided.margin(), 20.0);

        let draw = MatchResult::Draw {
            fighters: [selection("a", 1600.0), selection("b", 1600.0)],
        };
        assert!(draw.is_draw());
        assert!(draw.winner().is_none());
        assert_eq!(draw.margin(), 0.0);
    }

    #[test]
    fn test_result_serializes_with_outcome_tag() {
        let draw = MatchResult::Draw {
            fighters: [selection("a", 1600.0), selection("b", 1600.0)],
        };
        let json = serde_json::to_value(&draw).unwrap();
        assert_eq!(json["outcome"], "draw");
        assert_eq!(json["fighters"][1]["fighter_id"], "b");
    }
}
