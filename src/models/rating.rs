//! Elo rating history: the raw wire form and validated snapshots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{BoutId, FighterId};

/// Wire format of the calendar dates the API sends.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reasons a raw history entry cannot become a [`RatingSnapshot`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a finite number ({value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// One `elo_history` entry exactly as the API delivers it.
///
/// Nothing is trusted here: every field may be absent. Convert with
/// `RatingSnapshot::try_from` before using it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRatingSnapshot {
    pub date: Option<String>,
    pub bout_id: Option<String>,
    pub opponent_id: Option<String>,
    pub starting_elo: Option<f64>,
    pub ending_elo: Option<f64>,
    pub elo_change: Option<f64>,
}

/// A fighter's rating immediately after one bout.
///
/// Only `date` and `ending_elo` are required; they are all the chart and the
/// projection read. The remaining fields are informational and may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRatingSnapshot")]
pub struct RatingSnapshot {
    pub date: NaiveDate,
    pub bout_id: Option<BoutId>,
    pub opponent_id: Option<FighterId>,
    pub starting_elo: Option<f64>,
    pub ending_elo: f64,
    /// Server-supplied delta. Not recomputed from the two ratings.
    pub elo_change: Option<f64>,
}

impl RatingSnapshot {
    /// Build a snapshot whose change is derived from the two ratings.
    pub fn new(
        date: NaiveDate,
        bout_id: BoutId,
        opponent_id: FighterId,
        starting_elo: f64,
        ending_elo: f64,
    ) -> Self {
        Self {
            date,
            bout_id: Some(bout_id),
            opponent_id: Some(opponent_id),
            starting_elo: Some(starting_elo),
            ending_elo,
            elo_change: Some(ending_elo - starting_elo),
        }
    }

    /// A snapshot carrying nothing but the two required fields.
    pub fn bare(date: NaiveDate, ending_elo: f64) -> Self {
        Self {
            date,
            bout_id: None,
            opponent_id: None,
            starting_elo: None,
            ending_elo,
            elo_change: None,
        }
    }

    /// Override the rating change with the value the server reported.
    pub fn with_elo_change(mut self, elo_change: f64) -> Self {
        self.elo_change = Some(elo_change);
        self
    }
}

fn required_rating(value: Option<f64>, field: &'static str) -> Result<f64, SnapshotError> {
    match value {
        None => Err(SnapshotError::MissingField(field)),
        Some(v) => optional_rating(Some(v), field).map(|_| v),
    }
}

fn optional_rating(value: Option<f64>, field: &'static str) -> Result<Option<f64>, SnapshotError> {
    match value {
        Some(v) if !v.is_finite() => Err(SnapshotError::NonFinite { field, value: v }),
        other => Ok(other),
    }
}

/// Blank IDs read as absent.
fn optional_id(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse an API calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, SnapshotError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| SnapshotError::InvalidDate(value.to_string()))
}

impl TryFrom<RawRatingSnapshot> for RatingSnapshot {
    type Error = SnapshotError;

    fn try_from(raw: RawRatingSnapshot) -> Result<Self, Self::Error> {
        let ending_elo = required_rating(raw.ending_elo, "ending_elo")?;
        let date = match raw.date {
            Some(d) => parse_date(&d)?,
            None => return Err(SnapshotError::MissingField("date")),
        };

        Ok(Self {
            date,
            bout_id: optional_id(raw.bout_id).map(BoutId::from),
            opponent_id: optional_id(raw.opponent_id).map(FighterId::from),
            starting_elo: optional_rating(raw.starting_elo, "starting_elo")?,
            ending_elo,
            elo_change: optional_rating(raw.elo_change, "elo_change")?,
        })
    }
}

impl From<&RatingSnapshot> for RawRatingSnapshot {
    fn from(snapshot: &RatingSnapshot) -> Self {
        Self {
            date: Some(snapshot.date.format(DATE_FORMAT).to_string()),
            bout_id: snapshot.bout_id.as_ref().map(ToString::to_string),
            opponent_id: snapshot.opponent_id.as_ref().map(ToString::to_string),
            starting_elo: snapshot.starting_elo,
            ending_elo: Some(snapshot.ending_elo),
            elo_change: snapshot.elo_change,
        }
    }
}

/// A fighter's rating history in the order the server returned it
/// (the fighter's own bout chronology).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FighterRatingSeries {
    snapshots: Vec<RatingSnapshot>,
}

impl FighterRatingSeries {
    pub fn new(snapshots: Vec<RatingSnapshot>) -> Self {
        Self { snapshots }
    }

    pub fn snapshots(&self) -> &[RatingSnapshot] {
        &self.snapshots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RatingSnapshot> {
        self.snapshots.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Date of the final snapshot in server order, not the maximum date.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.snapshots.last().map(|s| s.date)
    }

    /// Find the snapshot produced by a given bout.
    pub fn find_bout(&self, bout_id: &BoutId) -> Option<&RatingSnapshot> {
        self.snapshots
            .iter()
            .find(|s| s.bout_id.as_ref() == Some(bout_id))
    }

    /// Highest ending rating across the whole history.
    pub fn peak(&self) -> Option<&RatingSnapshot> {
        self.snapshots
            .iter()
            .max_by(|a, b| a.ending_elo.total_cmp(&b.ending_elo))
    }
}

impl FromIterator<RatingSnapshot> for FighterRatingSeries {
    fn from_iter<I: IntoIterator<Item = RatingSnapshot>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FighterRatingSeries {
    type Item = &'a RatingSnapshot;
    type IntoIter = std::slice::Iter<'a, RatingSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, ending: Option<f64>) -> RawRatingSnapshot {
        RawRatingSnapshot {
            date: Some(date.to_string()),
            bout_id: Some("b1".to_string()),
            opponent_id: Some("f2".to_string()),
            starting_elo: Some(1500.0),
            ending_elo: ending,
            elo_change: ending.map(|e| e - 1500.0),
        }
    }

    #[test]
    fn test_snapshot_from_valid_raw() {
        let snapshot = RatingSnapshot::try_from(raw("2020-01-01", Some(1515.0))).unwrap();

        assert_eq!(snapshot.date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(snapshot.bout_id, Some("b1".into()));
        assert_eq!(snapshot.ending_elo, 1515.0);
        assert_eq!(snapshot.elo_change, Some(15.0));
    }

    #[test]
    fn test_missing_ending_elo_is_rejected() {
        let err = RatingSnapshot::try_from(raw("2020-01-01", None)).unwrap_err();
        assert_eq!(err, SnapshotError::MissingField("ending_elo"));
    }

    #[test]
    fn test_non_finite_rating_is_rejected() {
        let err = RatingSnapshot::try_from(raw("2020-01-01", Some(f64::NAN))).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::NonFinite {
                field: "ending_elo",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_dates_are_rejected() {
        for bad in ["2020-13-01", "2021-02-29", "01/02/2020", ""] {
            let err = RatingSnapshot::try_from(raw(bad, Some(1500.0))).unwrap_err();
            assert_eq!(err, SnapshotError::InvalidDate(bad.to_string()));
        }

        let mut missing = raw("2020-01-01", Some(1500.0));
        missing.date = None;
        assert_eq!(
            RatingSnapshot::try_from(missing).unwrap_err(),
            SnapshotError::MissingField("date")
        );
    }

    #[test]
    fn test_blank_bout_id_reads_as_absent() {
        let mut entry = raw("2020-01-01", Some(1500.0));
        entry.bout_id = Some(" ".to_string());
        assert_eq!(RatingSnapshot::try_from(entry).unwrap().bout_id, None);
    }

    #[test]
    fn test_only_date_and_ending_elo_are_required() {
        let entry = RawRatingSnapshot {
            date: Some("2020-01-01".to_string()),
            ending_elo: Some(1512.5),
            ..Default::default()
        };

        let snapshot = RatingSnapshot::try_from(entry).unwrap();
        assert_eq!(
            snapshot,
            RatingSnapshot::bare(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 1512.5)
        );
    }

    #[test]
    fn test_present_optional_rating_must_be_finite() {
        let mut entry = raw("2020-01-01", Some(1500.0));
        entry.starting_elo = Some(f64::INFINITY);
        assert!(matches!(
            RatingSnapshot::try_from(entry).unwrap_err(),
            SnapshotError::NonFinite {
                field: "starting_elo",
                ..
            }
        ));
    }

    #[test]
    fn test_server_change_is_kept_verbatim() {
        let mut entry = raw("2020-01-01", Some(1515.0));
        entry.elo_change = Some(14.999);
        let snapshot = RatingSnapshot::try_from(entry).unwrap();
        assert_eq!(snapshot.elo_change, Some(14.999));
    }

    #[test]
    fn test_snapshot_deserializes_through_validation() {
        let json = r#"{"date":"2019-03-02","bout_id":"b9","opponent_id":"f7","starting_elo":1480.5,"ending_elo":1496.25,"elo_change":15.75}"#;
        let snapshot: RatingSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.ending_elo, 1496.25);

        let missing = r#"{"date":"2019-03-02","bout_id":"b9","opponent_id":"f7","starting_elo":1480.5,"elo_change":15.75}"#;
        let err = serde_json::from_str::<RatingSnapshot>(missing).unwrap_err();
        assert!(err.to_string().contains("ending_elo"));
    }

    #[test]
    fn test_series_last_date_follows_server_order() {
        let series: FighterRatingSeries = [
            RatingSnapshot::new(
                NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
                "b2".into(),
                "x".into(),
                1500.0,
                1520.0,
            ),
            RatingSnapshot::new(
                NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
                "b1".into(),
                "y".into(),
                1520.0,
                1490.0,
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            series.last_date(),
            Some(NaiveDate::from_ymd_opt(2020, 5, 1).unwrap())
        );
        assert_eq!(series.peak().unwrap().bout_id, Some("b2".into()));
        assert!(series.find_bout(&"b1".into()).is_some());
        assert!(series.find_bout(&"zz".into()).is_none());
    }

    #[test]
    fn test_series_deserializes_from_history_array() {
        let json = r#"[{"date":"2019-03-02","ending_elo":1496.25},{"date":"2019-07-06","bout_id":"b2","ending_elo":1510.0}]"#;
        let series: FighterRatingSeries = serde_json::from_str(json).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.snapshots()[0].bout_id, None);
        let encoded = serde_json::to_string(&series).unwrap();
        assert_eq!(
            serde_json::from_str::<FighterRatingSeries>(&encoded).unwrap(),
            series
        );

        let bad = r#"[{"date":"2019-03-02"}]"#;
        assert!(serde_json::from_str::<FighterRatingSeries>(bad).is_err());
    }

    #[test]
    fn test_empty_series() {
        let series = FighterRatingSeries::default();
        assert!(series.is_empty());
        assert_eq!(series.last_date(), None);
        assert!(series.peak().is_none());
    }
}
