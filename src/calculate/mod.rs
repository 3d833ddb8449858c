//! Derived fighter views.
//!
//! Builds what the fighter and matchmaker pages display from stored records:
//! - Bout history rows with per-bout rating movement
//! - Upcoming bout detection
//! - Selectable eras for the matchmaker

use chrono::NaiveDate;
use serde::Serialize;

use crate::format::{format_date, is_future_date};
use crate::models::{
    Bout, BoutId, BoutOutcome, Fighter, FighterRatingSeries, FighterRef, RatingSnapshot,
};

/// One line of a fighter's bout history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoutHistoryRow {
    pub bout_id: BoutId,
    pub outcome: BoutOutcome,
    pub opponent: FighterRef,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub method: Option<String>,
    pub ending_round: Option<String>,
    pub ending_time: Option<String>,
    pub referee: Option<String>,
    pub details: Option<String>,
    /// Rating after the bout, when the history has an entry for it
    pub rating_after: Option<f64>,
    pub rating_change: Option<f64>,
}

/// One selectable era in the matchmaker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EraOption {
    pub bout_id: BoutId,
    pub label: String,
    pub rating: f64,
}

/// "W-L-D" record line.
pub fn fighter_record(fighter: &Fighter) -> String {
    format!("{}-{}-{}", fighter.wins, fighter.losses, fighter.draws)
}

/// Classify a bout from `fighter`'s side and attach their rating movement.
fn history_row(
    fighter: &Fighter,
    bout: &Bout,
    series: &FighterRatingSeries,
) -> Option<BoutHistoryRow> {
    let outcome = bout.outcome_for(&fighter.fighter_id)?;
    let opponent = bout.opponent_of(&fighter.fighter_id)?.clone();
    let snapshot = series.find_bout(&bout.bout_id);

    Some(BoutHistoryRow {
        bout_id: bout.bout_id.clone(),
        outcome,
        opponent,
        event_name: bout.event.name.clone(),
        event_date: bout.event.date,
        method: bout.method.clone(),
        ending_round: bout.ending_round.clone(),
        ending_time: bout.ending_time.clone(),
        referee: bout.referee.clone(),
        details: bout.details.clone(),
        rating_after: snapshot.map(|s| s.ending_elo),
        rating_change: snapshot.and_then(|s| s.elo_change),
    })
}

/// Completed bouts, newest first. Bouts on future cards are left out, as are
/// bouts that do not involve the fighter.
pub fn bout_history(
    fighter: &Fighter,
    series: &FighterRatingSeries,
    today: NaiveDate,
) -> Vec<BoutHistoryRow> {
    fighter
        .participated_bouts
        .iter()
        .filter(|b| !is_future_date(b.event.date, today))
        .filter_map(|b| history_row(fighter, b, series))
        .collect()
}

/// The next scheduled bout, if the newest listed bout is on a future card.
pub fn upcoming_bout(fighter: &Fighter, today: NaiveDate) -> Option<&Bout> {
    fighter
        .participated_bouts
        .first()
        .filter(|b| is_future_date(b.event.date, today))
}

/// Selectable eras for the matchmaker, one per rating snapshot that names
/// its bout. Entries without a bout ID cannot be selected and are left out.
pub fn era_options(fighter: &Fighter, series: &FighterRatingSeries) -> Vec<EraOption> {
    series
        .iter()
        .filter_map(|snapshot| era_option(fighter, snapshot))
        .collect()
}

/// Opponent name for a snapshot: from the bout it belongs to, then from any
/// bout against the same opponent, falling back to the raw opponent ID.
fn opponent_label(fighter: &Fighter, snapshot: &RatingSnapshot) -> Option<String> {
    let bouts = &fighter.participated_bouts;
    let by_bout = snapshot.bout_id.as_ref().and_then(|id| {
        bouts
            .iter()
            .find(|b| &b.bout_id == id)
            .and_then(|b| b.opponent_of(&fighter.fighter_id))
    });
    let by_opponent = || {
        snapshot.opponent_id.as_ref().and_then(|id| {
            bouts
                .iter()
                .filter_map(|b| b.opponent_of(&fighter.fighter_id))
                .find(|o| &o.fighter_id == id)
        })
    };

    match by_bout.or_else(by_opponent) {
        Some(opponent) => Some(opponent.name.clone()),
        None => snapshot.opponent_id.as_ref().map(ToString::to_string),
    }
}

fn era_option(fighter: &Fighter, snapshot: &RatingSnapshot) -> Option<EraOption> {
    let bout_id = snapshot.bout_id.clone()?;
    let date = format_date(snapshot.date);
    let label = match opponent_label(fighter, snapshot) {
        Some(opponent) => format!("{} (vs {})", date, opponent),
        None => date,
    };

    Some(EraOption {
        bout_id,
        label,
        rating: snapshot.ending_elo,
    })
}
