use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single daily observation as delivered by the market-data provider.
///
/// `adj_close` is the split- and dividend-adjusted close, and is the only
/// price the analytical pipeline consumes; the raw OHLCV fields are kept for
/// completeness of the fetched record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
}

/// One (date, adjusted-close) observation of a `PriceSeries`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub adj_close: f64,
}

/// An immutable, date-ordered series of adjusted closes for one symbol.
///
/// Invariants, enforced at construction: dates are strictly increasing and
/// unique. The series cannot be modified after it is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from unordered points, sorting by date and rejecting
    /// duplicate dates.
    pub fn new(symbol: String, mut points: Vec<PricePoint>) -> Result<Self, CoreError> {
        points.sort_by_key(|p| p.date);

        for pair in points.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(CoreError::DuplicateDate(symbol, pair[1].date));
            }
        }

        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
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
}

/// One (date, log-return) observation of a `ReturnSeries`.
///
/// The date is the later date of the consecutive price pair the return was
/// derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// An immutable, date-ordered series of daily log returns for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    symbol: String,
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn new(symbol: String, points: Vec<ReturnPoint>) -> Self {
        Self { symbol, points }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    /// The return values in date order, without their dates.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A date-indexed table of return columns, one per symbol, restricted to the
/// dates every column has an observation for (inner join on date).
///
/// Invariant: every column holds exactly one value per date in `dates`.
/// Columns are looked up by symbol, never by constructed column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedReturnTable {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl AlignedReturnTable {
    /// Builds a table from a shared date index and per-symbol columns,
    /// rejecting any column whose length differs from the index.
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self, CoreError> {
        for (symbol, column) in &columns {
            if column.len() != dates.len() {
                return Err(CoreError::ColumnLengthMismatch(
                    symbol.clone(),
                    column.len(),
                    dates.len(),
                ));
            }
        }

        Ok(Self { dates, columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The return column for one symbol, in date order.
    pub fn column(&self, symbol: &str) -> Option<&[f64]> {
        self.columns.get(symbol).map(|c| c.as_slice())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|s| s.as_str())
    }

    /// Number of rows (shared dates) in the table.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn price_series_sorts_points_by_date() {
        let series = PriceSeries::new(
            "TM".to_string(),
            vec![
                PricePoint { date: date(2024, 1, 3), adj_close: 182.0 },
                PricePoint { date: date(2024, 1, 2), adj_close: 180.5 },
            ],
        )
        .unwrap();

        assert_eq!(series.points()[0].date, date(2024, 1, 2));
        assert_eq!(series.points()[1].date, date(2024, 1, 3));
    }

    #[test]
    fn price_series_rejects_duplicate_dates() {
        let result = PriceSeries::new(
            "TM".to_string(),
            vec![
                PricePoint { date: date(2024, 1, 2), adj_close: 180.5 },
                PricePoint { date: date(2024, 1, 2), adj_close: 181.0 },
            ],
        );

        assert!(matches!(result, Err(CoreError::DuplicateDate(_, _))));
    }

    #[test]
    fn aligned_table_rejects_ragged_columns() {
        let mut columns = BTreeMap::new();
        columns.insert("TM".to_string(), vec![0.01, -0.02]);
        columns.insert("F".to_string(), vec![0.01]);

        let result = AlignedReturnTable::new(vec![date(2024, 1, 2), date(2024, 1, 3)], columns);

        assert!(matches!(result, Err(CoreError::ColumnLengthMismatch(_, _, _))));
    }
}
