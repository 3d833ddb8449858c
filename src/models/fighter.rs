//! Fighter model as served by the fighter detail endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Bout, FighterId, FighterRatingSeries, FighterRef, RawRatingSnapshot};
use crate::reconcile::{validate_series, ReconcileError};

/// Every fighter starts at this rating before their first bout.
pub const STARTING_ELO: f64 = 1500.0;

fn default_elo() -> f64 {
    STARTING_ELO
}

fn default_draws() -> String {
    "0".to_string()
}

/// A fighter with profile data and rating history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub fighter_id: FighterId,
    pub name: String,

    #[serde(default)]
    pub nickname: Option<String>,

    #[serde(default)]
    pub wins: u32,

    #[serde(default)]
    pub losses: u32,

    /// Upstream stores draws as text, sometimes with a no-contest suffix
    /// such as "1 (1 NC)".
    #[serde(default = "default_draws")]
    pub draws: String,

    #[serde(default)]
    pub height_in: Option<u32>,

    #[serde(default)]
    pub weight_lb: Option<u32>,

    #[serde(default)]
    pub reach_in: Option<u32>,

    #[serde(default)]
    pub stance: Option<String>,

    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    /// Current rating
    #[serde(default = "default_elo")]
    pub elo: f64,

    /// Highest rating ever reached
    #[serde(default = "default_elo")]
    pub peak_elo: f64,

    /// Unvalidated history; see [`Fighter::rating_series`].
    #[serde(default)]
    pub elo_history: Vec<RawRatingSnapshot>,

    /// Bouts this fighter appears in, newest first
    #[serde(default)]
    pub participated_bouts: Vec<Bout>,
}

impl Fighter {
    pub fn new(fighter_id: FighterId, name: String) -> Self {
        Self {
            fighter_id,
            name,
            nickname: None,
            wins: 0,
            losses: 0,
            draws: default_draws(),
            height_in: None,
            weight_lb: None,
            reach_in: None,
            stance: None,
            date_of_birth: None,
            elo: STARTING_ELO,
            peak_elo: STARTING_ELO,
            elo_history: Vec::new(),
            participated_bouts: Vec::new(),
        }
    }

    /// Builder method to set the nickname.
    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.to_string());
        self
    }

    /// Builder method to set the win/loss/draw record.
    pub fn with_record(mut self, wins: u32, losses: u32, draws: &str) -> Self {
        self.wins = wins;
        self.losses = losses;
        self.draws = draws.to_string();
        self
    }

    /// Builder method to set the rating history. Also updates `elo` and
    /// `peak_elo` from the entries that carry an ending rating.
    pub fn with_history(mut self, history: Vec<RawRatingSnapshot>) -> Self {
        let endings: Vec<f64> = history.iter().filter_map(|h| h.ending_elo).collect();
        if let Some(&last) = endings.last() {
            self.elo = last;
        }
        self.peak_elo = endings.iter().copied().fold(STARTING_ELO, f64::max);
        self.elo_history = history;
        self
    }

    /// Builder method to set participated bouts (newest first).
    pub fn with_bouts(mut self, bouts: Vec<Bout>) -> Self {
        self.participated_bouts = bouts;
        self
    }

    /// Short summary used when this fighter is embedded in other records.
    pub fn summary(&self) -> FighterRef {
        FighterRef::new(self.fighter_id.clone(), self.name.clone())
    }

    /// Validate the raw history into a series usable by the reconciler.
    pub fn rating_series(&self) -> Result<FighterRatingSeries, ReconcileError> {
        validate_series(self.fighter_id.as_str(), &self.elo_history)
    }
}
