use crate::error::ApiError;
use crate::responses::{ChartResponse, ChartResult};
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use configuration::ApiConfig;
use core_types::{Bar, PricePoint, PriceSeries};
use std::time::Duration;

pub mod error;
pub mod responses;

/// Fixed pause between retry attempts.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// The generic, abstract interface for a daily market-data provider.
/// This trait is the contract the report pipeline uses, allowing the
/// underlying implementation (live or mock) to be swapped out.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetches daily OHLC + adjusted-close history for one symbol over an
    /// inclusive date range.
    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, ApiError>;
}

/// A concrete `MarketDataClient` for the keyless Yahoo Finance chart
/// endpoint.
///
/// Every request runs under the configured per-request timeout, and failed
/// requests are retried a bounded number of times. Only transport errors and
/// 5xx responses are retried; a well-formed "no data" reply is final.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl YahooClient {
    pub fn new(api_config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api_config.timeout_secs))
            // The endpoint rejects requests without a browser-like agent.
            .user_agent("Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/118.0")
            .build()?;

        Ok(Self {
            client,
            base_url: api_config.base_url.clone(),
            max_retries: api_config.max_retries,
        })
    }

    /// One fetch attempt, with provider errors mapped onto `ApiError`.
    async fn fetch_chart(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, ApiError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        // period2 is exclusive; push it one day past the requested end.
        let period2 = end
            .checked_add_days(Days::new(1))
            .unwrap_or(end)
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "div,split".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Failed requests usually still carry a structured error body
            // worth surfacing (unknown symbol, invalid range).
            if let Ok(parsed) = serde_json::from_str::<ChartResponse>(&text) {
                if let Some(error) = parsed.chart.error {
                    return Err(ApiError::Provider(format!(
                        "{}: {}",
                        error.code, error.description
                    )));
                }
            }
            return Err(ApiError::Status(status.as_u16(), text));
        }

        let parsed = serde_json::from_str::<ChartResponse>(&text)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;

        if let Some(error) = parsed.chart.error {
            return Err(ApiError::Provider(format!(
                "{}: {}",
                error.code, error.description
            )));
        }

        let result = parsed
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| ApiError::EmptySeries(symbol.to_string()))?;

        bars_from_chart(result)
    }

    fn should_retry(error: &ApiError) -> bool {
        match error {
            ApiError::RequestBuild(_) => true,
            ApiError::Status(status, _) => *status >= 500,
            _ => false,
        }
    }
}

#[async_trait]
impl MarketDataClient for YahooClient {
    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, ApiError> {
        let mut attempt: u32 = 0;
        loop {
            match self.fetch_chart(symbol, start, end).await {
                Ok(bars) => {
                    tracing::debug!(symbol, bars = bars.len(), "fetched daily history");
                    return Ok(bars);
                }
                Err(error) if attempt < self.max_retries && Self::should_retry(&error) => {
                    attempt += 1;
                    tracing::warn!(symbol, attempt, %error, "fetch failed, retrying");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// Fetches one symbol's history and distills it into a `PriceSeries`,
/// applying the missing-data rule: days without a finite adjusted close are
/// dropped before the series is built. An empty result is an error — the
/// report cannot proceed without every requested symbol.
pub async fn fetch_price_series<C>(
    client: &C,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries, ApiError>
where
    C: MarketDataClient + ?Sized,
{
    let bars = client.fetch_daily_bars(symbol, start, end).await?;

    let points: Vec<PricePoint> = bars
        .iter()
        .filter(|bar| bar.adj_close.is_finite())
        .map(|bar| PricePoint {
            date: bar.date,
            adj_close: bar.adj_close,
        })
        .collect();

    if points.is_empty() {
        return Err(ApiError::EmptySeries(symbol.to_string()));
    }

    PriceSeries::new(symbol.to_string(), points).map_err(|e| ApiError::InvalidData(e.to_string()))
}

/// Zips the provider's parallel arrays into `Bar`s.
///
/// Days with a null adjusted close are dropped. Sparse raw fields do not
/// drop a day: indices routinely report null volume, so missing OHLC values
/// fall back to the adjusted close and missing volume to zero.
fn bars_from_chart(result: ChartResult) -> Result<Vec<Bar>, ApiError> {
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|block| block.adjclose)
        .unwrap_or_default();

    let field_at = |values: &Vec<Option<f64>>, i: usize, fallback: f64| {
        values.get(i).copied().flatten().unwrap_or(fallback)
    };

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(adj_close) = adjclose.get(i).copied().flatten().filter(|v| v.is_finite())
        else {
            continue;
        };

        let date = DateTime::<Utc>::from_timestamp(ts, 0)
            .ok_or_else(|| ApiError::InvalidData(format!("invalid timestamp {ts}")))?
            .date_naive();

        bars.push(Bar {
            date,
            open: field_at(&quote.open, i, adj_close),
            high: field_at(&quote.high, i, adj_close),
            low: field_at(&quote.low, i, adj_close),
            close: field_at(&quote.close, i, adj_close),
            adj_close,
            volume: field_at(&quote.volume, i, 0.0),
        });
    }

    Ok(bars)
}
