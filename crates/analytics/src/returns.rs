use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::{AlignedReturnTable, PriceSeries, ReturnPoint, ReturnSeries};
use std::collections::{BTreeMap, BTreeSet};

/// Derives the daily log-return series from a price series.
///
/// Each return is `ln(p[i+1]) - ln(p[i])` and carries the later date of the
/// pair, so the derived series is exactly one observation shorter than the
/// price series it came from.
pub fn log_returns(prices: &PriceSeries) -> Result<ReturnSeries, AnalyticsError> {
    if prices.len() < 2 {
        return Err(AnalyticsError::NotEnoughData(format!(
            "price series for '{}' has {} observations, need at least 2",
            prices.symbol(),
            prices.len()
        )));
    }

    let points = prices
        .points()
        .windows(2)
        .map(|pair| ReturnPoint {
            date: pair[1].date,
            value: pair[1].adj_close.ln() - pair[0].adj_close.ln(),
        })
        .collect();

    Ok(ReturnSeries::new(prices.symbol().to_string(), points))
}

/// Joins return series into a single table on the intersection of their
/// dates (inner join). Dates missing from any series are dropped, so every
/// column of the result is fully populated.
pub fn align(series: &[ReturnSeries]) -> Result<AlignedReturnTable, AnalyticsError> {
    if series.is_empty() {
        return Err(AnalyticsError::NotEnoughData(
            "no return series to align".to_string(),
        ));
    }

    let mut shared: BTreeSet<NaiveDate> = series[0].points().iter().map(|p| p.date).collect();
    for s in &series[1..] {
        let dates: BTreeSet<NaiveDate> = s.points().iter().map(|p| p.date).collect();
        shared = shared.intersection(&dates).copied().collect();
    }

    if shared.is_empty() {
        return Err(AnalyticsError::NotEnoughData(
            "the return series share no trading dates".to_string(),
        ));
    }

    // BTreeSet iterates in ascending order, so the date index stays sorted.
    let dates: Vec<NaiveDate> = shared.into_iter().collect();

    let mut columns: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for s in series {
        let by_date: BTreeMap<NaiveDate, f64> =
            s.points().iter().map(|p| (p.date, p.value)).collect();

        let column = dates
            .iter()
            .map(|date| {
                by_date.get(date).copied().ok_or_else(|| {
                    AnalyticsError::MisalignedInput(format!(
                        "series '{}' is missing shared date {}",
                        s.symbol(),
                        date
                    ))
                })
            })
            .collect::<Result<Vec<f64>, AnalyticsError>>()?;

        if columns.insert(s.symbol().to_string(), column).is_some() {
            return Err(AnalyticsError::MisalignedInput(format!(
                "symbol '{}' appears more than once",
                s.symbol()
            )));
        }
    }

    tracing::debug!(
        rows = dates.len(),
        columns = columns.len(),
        "aligned return series on shared dates"
    );

    AlignedReturnTable::new(dates, columns).map_err(|e| AnalyticsError::Calculation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core_types::PricePoint;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn price_series(symbol: &str, prices: &[(u32, f64)]) -> PriceSeries {
        let points = prices
            .iter()
            .map(|&(d, adj_close)| PricePoint { date: date(d), adj_close })
            .collect();
        PriceSeries::new(symbol.to_string(), points).unwrap()
    }

    fn return_series(symbol: &str, returns: &[(u32, f64)]) -> ReturnSeries {
        let points = returns
            .iter()
            .map(|&(d, value)| ReturnPoint { date: date(d), value })
            .collect();
        ReturnSeries::new(symbol.to_string(), points)
    }

    #[test]
    fn return_series_is_one_shorter_than_prices() {
        let prices = price_series("TM", &[(2, 100.0), (3, 101.0), (4, 99.5), (5, 102.0)]);

        let returns = log_returns(&prices).unwrap();

        assert_eq!(returns.len(), prices.len() - 1);
        assert_eq!(returns.points()[0].date, date(3));
    }

    #[test]
    fn log_returns_reconstruct_prices() {
        let prices = price_series("TM", &[(2, 100.0), (3, 104.2), (4, 98.7), (5, 101.3)]);

        let returns = log_returns(&prices).unwrap();

        let mut cumulative = 0.0;
        for (ret, point) in returns.points().iter().zip(&prices.points()[1..]) {
            cumulative += ret.value;
            let reconstructed = prices.points()[0].adj_close * cumulative.exp();
            assert_relative_eq!(reconstructed, point.adj_close, epsilon = 1e-9);
        }
    }

    #[test]
    fn log_returns_require_two_observations() {
        let prices = price_series("TM", &[(2, 100.0)]);

        let result = log_returns(&prices);

        assert!(matches!(result, Err(AnalyticsError::NotEnoughData(_))));
    }

    #[test]
    fn align_keeps_only_shared_dates() {
        let a = return_series("TM", &[(2, 0.01), (3, -0.02), (4, 0.005)]);
        let b = return_series("F", &[(3, 0.002), (4, -0.001), (5, 0.03)]);

        let table = align(&[a, b]).unwrap();

        assert_eq!(table.dates(), &[date(3), date(4)]);
        assert_eq!(table.column("TM").unwrap(), &[-0.02, 0.005]);
        assert_eq!(table.column("F").unwrap(), &[0.002, -0.001]);
    }

    #[test]
    fn aligned_columns_are_fully_populated() {
        let a = return_series("TM", &[(2, 0.01), (3, -0.02), (5, 0.01)]);
        let b = return_series("F", &[(2, 0.002), (3, -0.001), (4, 0.03)]);
        let c = return_series("GM", &[(2, 0.004), (3, 0.001), (5, -0.01)]);

        let table = align(&[a, b, c]).unwrap();

        for symbol in ["TM", "F", "GM"] {
            let column = table.column(symbol).unwrap();
            assert_eq!(column.len(), table.len());
            assert!(column.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn align_rejects_disjoint_series() {
        let a = return_series("TM", &[(2, 0.01)]);
        let b = return_series("F", &[(3, 0.002)]);

        let result = align(&[a, b]);

        assert!(matches!(result, Err(AnalyticsError::NotEnoughData(_))));
    }
}
