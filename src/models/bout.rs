//! Bout model: one fight between two fighters on an event.

use serde::{Deserialize, Serialize};

use super::{BoutId, Event, FighterId};

/// The short fighter summary the API embeds inside bouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterRef {
    pub fighter_id: FighterId,
    pub name: String,
}

impl FighterRef {
    pub fn new(fighter_id: FighterId, name: String) -> Self {
        Self { fighter_id, name }
    }
}

/// How a bout ended from one fighter's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoutOutcome {
    Win,
    Loss,
    /// No winner recorded: draw or no contest
    Draw,
    /// No winner because the result was overturned
    Overturned,
}

impl std::fmt::Display for BoutOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoutOutcome::Win => write!(f, "Win"),
            BoutOutcome::Loss => write!(f, "Loss"),
            BoutOutcome::Draw => write!(f, "Draw"),
            BoutOutcome::Overturned => write!(f, "Overturned"),
        }
    }
}

/// A single bout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bout {
    pub bout_id: BoutId,

    /// Card this bout was fought on
    pub event: Event,

    pub fighter_1: FighterRef,
    pub fighter_2: FighterRef,

    /// None for draws, no contests and overturned results
    #[serde(default)]
    pub winning_fighter: Option<FighterRef>,

    #[serde(default)]
    pub result: Option<String>,

    /// e.g. "KO/TKO", "Decision - Unanimous", "Overturned"
    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub ending_round: Option<String>,

    #[serde(default)]
    pub ending_time: Option<String>,

    #[serde(default)]
    pub time_format: Option<String>,

    #[serde(default)]
    pub referee: Option<String>,

    #[serde(default)]
    pub details: Option<String>,
}

impl Bout {
    pub fn new(bout_id: BoutId, event: Event, fighter_1: FighterRef, fighter_2: FighterRef) -> Self {
        Self {
            bout_id,
            event,
            fighter_1,
            fighter_2,
            winning_fighter: None,
            result: None,
            method: None,
            ending_round: None,
            ending_time: None,
            time_format: None,
            referee: None,
            details: None,
        }
    }

    /// Builder method to set the winner.
    pub fn with_winner(mut self, winner: FighterRef) -> Self {
        self.winning_fighter = Some(winner);
        self
    }

    /// Builder method to set the finishing method.
    pub fn with_method(mut self, method: &str) -> Self {
        self.method = Some(method.to_string());
        self
    }

    pub fn involves(&self, fighter_id: &FighterId) -> bool {
        &self.fighter_1.fighter_id == fighter_id || &self.fighter_2.fighter_id == fighter_id
    }

    /// The other fighter in this bout, if `fighter_id` took part.
    pub fn opponent_of(&self, fighter_id: &FighterId) -> Option<&FighterRef> {
        if &self.fighter_1.fighter_id == fighter_id {
            Some(&self.fighter_2)
        } else if &self.fighter_2.fighter_id == fighter_id {
            Some(&self.fighter_1)
        } else {
            None
        }
    }

    fn is_overturned(&self) -> bool {
        self.method
            .as_deref()
            .is_some_and(|m| m.trim().eq_ignore_ascii_case("overturned"))
    }

    /// Outcome for `fighter_id`, or None if they were not in this bout.
    pub fn outcome_for(&self, fighter_id: &FighterId) -> Option<BoutOutcome> {
        if !self.involves(fighter_id) {
            return None;
        }

        let outcome = match &self.winning_fighter {
            Some(winner) if &winner.fighter_id == fighter_id => BoutOutcome::Win,
            Some(_) => BoutOutcome::Loss,
            None if self.is_overturned() => BoutOutcome::Overturned,
            None => BoutOutcome::Draw,
        };
        Some(outcome)
    }
}
