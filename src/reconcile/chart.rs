//! Chart helpers shared by the single-fighter and matchup charts.

use chrono::NaiveDate;

use crate::models::{FighterRatingSeries, MergedSeriesPoint, RatingPoint};

/// A row that can be placed on a date axis.
pub trait ChartPoint {
    fn date(&self) -> NaiveDate;

    /// Ratings plotted on this row; absent lines are None.
    fn ratings(&self) -> [Option<f64>; 2];
}

impl ChartPoint for MergedSeriesPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn ratings(&self) -> [Option<f64>; 2] {
        [self.fighter1_rating, self.fighter2_rating]
    }
}

impl ChartPoint for RatingPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn ratings(&self) -> [Option<f64>; 2] {
        [Some(self.rating), None]
    }
}

/// Points for a single fighter's chart, in server order.
pub fn single_fighter_series(series: &FighterRatingSeries) -> Vec<RatingPoint> {
    series
        .iter()
        .map(|s| RatingPoint {
            date: s.date,
            rating: s.ending_elo,
        })
        .collect()
}

/// First and last dates of a chart.
pub fn chart_date_range<P: ChartPoint>(points: &[P]) -> Option<(NaiveDate, NaiveDate)> {
    let first = points.first()?;
    let last = points.last()?;
    Some((first.date(), last.date()))
}

/// Y-axis bounds: lowest and highest plotted rating, widened by `padding`.
pub fn rating_axis_bounds<P: ChartPoint>(points: &[P], padding: f64) -> Option<(f64, f64)> {
    let mut ratings = points.iter().flat_map(|p| p.ratings()).flatten();
    let first = ratings.next()?;
    let (min, max) = ratings.fold((first, first), |(lo, hi), r| (lo.min(r), hi.max(r)));
    Some((min - padding, max + padding))
}
