//! Rating-series reconciliation for the matchmaker.
//!
//! Two operations make up the matchmaker:
//! - [`merge_for_charting`] lines two fighters' rating histories up on a shared,
//!   date-ordered axis so both can be plotted together
//! - [`project_winner`] compares one chosen era of each fighter
//!
//! Everything here is pure. Inputs are borrowed or consumed, nothing is cached,
//! and nothing is logged; malformed wire data is rejected before it reaches
//! the algorithms (see [`validate_series`]).

mod chart;

pub use chart::*;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    BoutId, FighterId, FighterRatingSeries, MatchResult, MatchupSelection, MergedSeriesPoint,
    RatingSnapshot, RawRatingSnapshot, SnapshotError,
};

/// Errors raised when reconciler input violates its contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    #[error("invalid rating snapshot #{index} for {fighter}: {source}")]
    InvalidSnapshot {
        fighter: String,
        index: usize,
        #[source]
        source: SnapshotError,
    },

    #[error("{fighter} has no rating snapshot for bout {bout_id}")]
    UnknownBout { fighter: String, bout_id: String },
}

/// Validate a raw history into a series, failing on the first bad entry.
///
/// `fighter` only labels the error.
pub fn validate_series(
    fighter: &str,
    raw: &[RawRatingSnapshot],
) -> Result<FighterRatingSeries, ReconcileError> {
    raw.iter()
        .enumerate()
        .map(|(index, entry)| {
            RatingSnapshot::try_from(entry.clone()).map_err(|source| {
                ReconcileError::InvalidSnapshot {
                    fighter: fighter.to_string(),
                    index,
                    source,
                }
            })
        })
        .collect()
}

/// Last-seen ratings while walking the merged rows.
#[derive(Debug, Default, Clone, Copy)]
struct CarryForward {
    fighter1: Option<f64>,
    fighter2: Option<f64>,
}

/// Advance one fighter's carried value past a row.
///
/// Past the fighter's final known date the value resets to None and stays there.
fn carry(
    last: &mut Option<f64>,
    value: Option<f64>,
    date: NaiveDate,
    cutoff: Option<NaiveDate>,
) -> Option<f64> {
    match cutoff {
        Some(cutoff) if date <= cutoff => {
            if value.is_some() {
                *last = value;
            }
        }
        _ => *last = None,
    }
    *last
}

/// Merge two fighters' histories into one date-ordered chart series.
///
/// Rows are unique per calendar date and strictly ascending. Gaps between a
/// fighter's own data points carry their previous rating forward; after
/// their final snapshot (in server order) their column is None.
pub fn merge_for_charting(
    series_a: &FighterRatingSeries,
    series_b: &FighterRatingSeries,
) -> Vec<MergedSeriesPoint> {
    let mut by_date: BTreeMap<NaiveDate, MergedSeriesPoint> = BTreeMap::new();

    for snapshot in series_a {
        by_date
            .entry(snapshot.date)
            .or_insert_with(|| MergedSeriesPoint::empty(snapshot.date))
            .fighter1_rating = Some(snapshot.ending_elo);
    }
    for snapshot in series_b {
        by_date
            .entry(snapshot.date)
            .or_insert_with(|| MergedSeriesPoint::empty(snapshot.date))
            .fighter2_rating = Some(snapshot.ending_elo);
    }

    let cutoff_a = series_a.last_date();
    let cutoff_b = series_b.last_date();

    by_date
        .into_values()
        .scan(CarryForward::default(), |state, row| {
            let fighter1_rating =
                carry(&mut state.fighter1, row.fighter1_rating, row.date, cutoff_a);
            let fighter2_rating =
                carry(&mut state.fighter2, row.fighter2_rating, row.date, cutoff_b);
            Some(MergedSeriesPoint {
                date: row.date,
                fighter1_rating,
                fighter2_rating,
            })
        })
        .collect()
}

/// Validate two raw histories, then merge them.
pub fn merge_raw_for_charting(
    raw_a: &[RawRatingSnapshot],
    raw_b: &[RawRatingSnapshot],
) -> Result<Vec<MergedSeriesPoint>, ReconcileError> {
    let series_a = validate_series("fighter 1", raw_a)?;
    let series_b = validate_series("fighter 2", raw_b)?;
    Ok(merge_for_charting(&series_a, &series_b))
}

/// Project the winner of a hypothetical bout between two chosen eras.
///
/// Only `ending_elo` matters. Ratings are compared exactly: no tolerance and
/// no rounding, so only bit-for-bit equal ratings give a draw.
pub fn project_winner(
    selection_a: MatchupSelection,
    selection_b: MatchupSelection,
) -> MatchResult {
    let (rating_a, rating_b) = (selection_a.rating(), selection_b.rating());
    debug_assert!(rating_a.is_finite() && rating_b.is_finite());

    if rating_a > rating_b {
        MatchResult::Decided {
            winner: selection_a,
            loser: selection_b,
        }
    } else if rating_b > rating_a {
        MatchResult::Decided {
            winner: selection_b,
            loser: selection_a,
        }
    } else {
        MatchResult::Draw {
            fighters: [selection_a, selection_b],
        }
    }
}

/// Validate two raw snapshots, then project the winner.
pub fn project_raw_winner(
    fighter_a: FighterId,
    raw_a: &RawRatingSnapshot,
    fighter_b: FighterId,
    raw_b: &RawRatingSnapshot,
) -> Result<MatchResult, ReconcileError> {
    let invalid = |fighter: &FighterId| {
        let fighter = fighter.to_string();
        move |source: SnapshotError| ReconcileError::InvalidSnapshot {
            fighter,
            index: 0,
            source,
        }
    };

    let snapshot_a = RatingSnapshot::try_from(raw_a.clone()).map_err(invalid(&fighter_a))?;
    let snapshot_b = RatingSnapshot::try_from(raw_b.clone()).map_err(invalid(&fighter_b))?;

    Ok(project_winner(
        MatchupSelection::new(fighter_a, snapshot_a),
        MatchupSelection::new(fighter_b, snapshot_b),
    ))
}

/// Pick the era produced by `bout_id` from a fighter's history.
pub fn select_era(
    fighter_id: &FighterId,
    series: &FighterRatingSeries,
    bout_id: &BoutId,
) -> Result<MatchupSelection, ReconcileError> {
    series
        .find_bout(bout_id)
        .map(|snapshot| MatchupSelection::new(fighter_id.clone(), snapshot.clone()))
        .ok_or_else(|| ReconcileError::UnknownBout {
            fighter: fighter_id.to_string(),
            bout_id: bout_id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn snap(d: &str, ending: f64) -> RatingSnapshot {
        RatingSnapshot::new(date(d), format!("bout-{d}").into(), "opp".into(), 1500.0, ending)
    }

    fn series(points: &[(&str, f64)]) -> FighterRatingSeries {
        points.iter().map(|(d, e)| snap(d, *e)).collect()
    }

    fn row(d: &str, f1: Option<f64>, f2: Option<f64>) -> MergedSeriesPoint {
        MergedSeriesPoint {
            date: date(d),
            fighter1_rating: f1,
            fighter2_rating: f2,
        }
    }

    fn pick(id: &str, ending: f64) -> MatchupSelection {
        MatchupSelection::new(id.into(), snap("2020-01-01", ending))
    }

    #[test]
    fn test_merge_carries_forward_and_cuts_off() {
        let a = series(&[("2020-01-01", 1500.0), ("2021-01-01", 1550.0)]);
        let b = series(&[("2020-06-01", 1480.0)]);

        let merged = merge_for_charting(&a, &b);

        assert_eq!(
            merged,
            vec![
                row("2020-01-01", Some(1500.0), None),
                row("2020-06-01", Some(1500.0), Some(1480.0)),
                row("2021-01-01", Some(1550.0), None),
            ]
        );
    }

    #[test]
    fn test_merge_both_empty() {
        let empty = FighterRatingSeries::default();
        let merged = merge_for_charting(&empty, &empty);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_one_side_empty() {
        let a = series(&[("2018-03-03", 1510.0), ("2019-03-03", 1490.0)]);
        let empty = FighterRatingSeries::default();

        let merged = merge_for_charting(&a, &empty);
        assert_eq!(
            merged,
            vec![
                row("2018-03-03", Some(1510.0), None),
                row("2019-03-03", Some(1490.0), None),
            ]
        );

        let flipped = merge_for_charting(&empty, &a);
        assert!(flipped.iter().all(|p| p.fighter1_rating.is_none()));
        assert_eq!(flipped[1].fighter2_rating, Some(1490.0));
    }

    #[test]
    fn test_merge_shared_single_date() {
        let a = series(&[("2022-05-05", 1400.0)]);
        let b = series(&[("2022-05-05", 1420.0)]);

        assert_eq!(
            merge_for_charting(&a, &b),
            vec![row("2022-05-05", Some(1400.0), Some(1420.0))]
        );
    }

    #[test]
    fn test_merge_same_date_last_write_wins() {
        let a = series(&[("2020-01-01", 1500.0), ("2020-01-01", 1530.0)]);
        let merged = merge_for_charting(&a, &FighterRatingSeries::default());
        assert_eq!(merged, vec![row("2020-01-01", Some(1530.0), None)]);
    }

    #[test]
    fn test_merge_orders_by_calendar_date_not_input_order() {
        let a = series(&[("2019-12-31", 1500.0), ("2020-02-01", 1520.0)]);
        let b = series(&[("2020-01-15", 1600.0), ("2020-03-01", 1610.0)]);

        let merged = merge_for_charting(&a, &b);
        let dates: Vec<NaiveDate> = merged.iter().map(|p| p.date).collect();

        assert_eq!(
            dates,
            vec![
                date("2019-12-31"),
                date("2020-01-15"),
                date("2020-02-01"),
                date("2020-03-01")
            ]
        );
        assert!(merged.windows(2).all(|w| w[0].date < w[1].date));
        // fighter 2 has no data before their first bout
        assert_eq!(merged[0].fighter2_rating, None);
        assert_eq!(merged[2].fighter2_rating, Some(1600.0));
        assert_eq!(merged[3].fighter1_rating, None);
    }

    #[test]
    fn test_merge_nulls_every_row_after_last_date() {
        let a = series(&[("2010-01-01", 1500.0)]);
        let b = series(&[
            ("2009-01-01", 1500.0),
            ("2011-01-01", 1510.0),
            ("2012-01-01", 1520.0),
            ("2013-01-01", 1530.0),
        ]);

        let merged = merge_for_charting(&a, &b);
        let cutoff = a.last_date().unwrap();

        for point in merged.iter().filter(|p| p.date > cutoff) {
            assert_eq!(point.fighter1_rating, None);
        }
        assert_eq!(merged[1].fighter1_rating, Some(1500.0));
        assert_eq!(merged[1].fighter2_rating, Some(1500.0));
    }

    #[test]
    fn test_merge_cutoff_uses_server_order() {
        // Final entry in server order is earlier than the one before it.
        let a = series(&[
            ("2020-01-01", 1500.0),
            ("2022-01-01", 1550.0),
            ("2021-01-01", 1520.0),
        ]);
        let merged = merge_for_charting(&a, &FighterRatingSeries::default());

        assert_eq!(
            merged,
            vec![
                row("2020-01-01", Some(1500.0), None),
                row("2021-01-01", Some(1520.0), None),
                row("2022-01-01", None, None),
            ]
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let a = series(&[("2020-01-01", 1500.0), ("2021-01-01", 1550.0)]);
        let b = series(&[("2020-06-01", 1480.0), ("2020-09-01", 1490.5)]);

        assert_eq!(merge_for_charting(&a, &b), merge_for_charting(&a, &b));
    }

    #[test]
    fn test_merge_raw_rejects_missing_rating() {
        let good = RawRatingSnapshot::from(&snap("2020-01-01", 1500.0));
        let mut bad = good.clone();
        bad.ending_elo = None;

        let err = merge_raw_for_charting(&[good.clone()], &[good.clone(), bad]).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::InvalidSnapshot {
                fighter: "fighter 2".to_string(),
                index: 1,
                source: SnapshotError::MissingField("ending_elo"),
            }
        );

        let ok = merge_raw_for_charting(&[good.clone()], &[good]).unwrap();
        assert_eq!(ok, vec![row("2020-01-01", Some(1500.0), Some(1500.0))]);
    }

    #[test]
    fn test_merge_raw_rejects_unparseable_date() {
        let mut bad = RawRatingSnapshot::from(&snap("2020-01-01", 1500.0));
        bad.date = Some("June 1st".to_string());

        let err = merge_raw_for_charting(&[bad], &[]).unwrap_err();
        assert!(err.to_string().contains("June 1st"));
    }

    #[test]
    fn test_merge_raw_accepts_entries_without_optional_fields() {
        let a = RawRatingSnapshot::from(&snap("2020-01-01", 1500.0));
        let mut b = RawRatingSnapshot::from(&snap("2020-06-01", 1480.0));
        b.opponent_id = None;
        b.bout_id = None;
        b.starting_elo = None;
        b.elo_change = None;

        let merged = merge_raw_for_charting(&[a], &[b]).unwrap();
        assert_eq!(
            merged,
            vec![
                row("2020-01-01", Some(1500.0), None),
                row("2020-06-01", Some(1500.0), Some(1480.0)),
            ]
        );
    }

    #[test]
    fn test_project_raw_winner_without_server_change() {
        let a = RawRatingSnapshot::from(&snap("2020-01-01", 1700.0));
        let mut b = RawRatingSnapshot::from(&snap("2020-01-01", 1650.0));
        b.elo_change = None;
        b.opponent_id = None;

        let result = project_raw_winner("a".into(), &a, "b".into(), &b).unwrap();
        assert_eq!(result.winner().unwrap().fighter_id.as_str(), "a");
        assert_eq!(result.loser().unwrap().snapshot.elo_change, None);
    }

    #[test]
    fn test_project_equal_ratings_is_draw() {
        let result = project_winner(pick("a", 1600.0), pick("b", 1600.0));
        assert!(result.is_draw());
    }

    #[test]
    fn test_project_higher_rating_wins() {
        let result = project_winner(pick("a", 1700.0), pick("b", 1650.0));
        assert_eq!(result.winner().unwrap().fighter_id.as_str(), "a");
        assert_eq!(result.loser().unwrap().fighter_id.as_str(), "b");
    }

    #[test]
    fn test_project_is_symmetric() {
        let x = pick("x", 1612.25);
        let y = pick("y", 1612.5);

        let forward = project_winner(x.clone(), y.clone());
        let backward = project_winner(y, x);

        assert_eq!(forward.winner(), backward.winner());
        assert_eq!(forward.loser(), backward.loser());
    }

    #[test]
    fn test_project_draw_ignores_other_fields() {
        let a = MatchupSelection::new(
            "a".into(),
            RatingSnapshot::new(date("2015-01-01"), "b1".into(), "o".into(), 1400.0, 1555.5)
                .with_elo_change(155.5),
        );
        let b = MatchupSelection::new(
            "b".into(),
            RatingSnapshot::new(date("2023-01-01"), "b2".into(), "o".into(), 1600.0, 1555.5)
                .with_elo_change(-44.5),
        );

        assert!(project_winner(a, b).is_draw());
    }

    #[test]
    fn test_project_no_epsilon() {
        let result = project_winner(pick("a", 1600.0), pick("b", 1600.0 + 1e-9));
        assert_eq!(result.winner().unwrap().fighter_id.as_str(), "b");
    }

    #[test]
    fn test_project_raw_winner() {
        let a = RawRatingSnapshot::from(&snap("2020-01-01", 1700.0));
        let b = RawRatingSnapshot::from(&snap("2020-01-01", 1650.0));

        let result = project_raw_winner("a".into(), &a, "b".into(), &b).unwrap();
        assert_eq!(result.winner().unwrap().fighter_id.as_str(), "a");

        let mut missing = b.clone();
        missing.ending_elo = None;
        let err = project_raw_winner("a".into(), &a, "b".into(), &missing).unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidSnapshot { ref fighter, .. } if fighter == "b"));
    }

    #[test]
    fn test_select_era() {
        let history = series(&[("2020-01-01", 1500.0), ("2021-01-01", 1550.0)]);
        let fighter: FighterId = "f1".into();

        let era = select_era(&fighter, &history, &"bout-2021-01-01".into()).unwrap();
        assert_eq!(era.rating(), 1550.0);

        let err = select_era(&fighter, &history, &"nope".into()).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::UnknownBout {
                fighter: "f1".to_string(),
                bout_id: "nope".to_string(),
            }
        );
    }
}
