use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily close (date → price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Daily closing prices of the benchmark ticker, sorted by date with at most
/// one point per date.
///
/// An empty series is valid: it is what the loader uses when history could
/// not be fetched, and every lookup against it returns `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSeries {
    pub symbol: String,
    points: Vec<PricePoint>,
}

impl BenchmarkSeries {
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    /// Build a series from provider output in any order.
    /// Drops non-finite and non-positive closes, sorts by date, and keeps the
    /// last point seen for a duplicated date.
    pub fn from_points(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        let mut points: Vec<PricePoint> = points
            .into_iter()
            .filter(|p| p.price.is_finite() && p.price > 0.0)
            .collect();
        // Stable sort keeps arrival order within a date, so the last duplicate wins below.
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self {
            symbol: symbol.into(),
            points: deduped,
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First close on or after `date` (O(log n)).
    pub fn first_on_or_after(&self, date: NaiveDate) -> Option<&PricePoint> {
        let idx = self.points.partition_point(|p| p.date < date);
        self.points.get(idx)
    }

    /// Most recent close in the series.
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}
