//! Yahoo Finance price history

use super::MarketDataSource;
use crate::error::{DashboardError, Result};
use crate::models::{PriceBar, Ticker, TimeSpan};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api as yahoo;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance client for daily bars
#[derive(Debug, Clone, Default)]
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    pub fn new() -> Self {
        Self {}
    }
}

fn to_offset(date: NaiveDate) -> Result<OffsetDateTime> {
    let timestamp = date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
    OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| DashboardError::fetch(PROVIDER, format!("invalid timestamp for {date}: {e}")))
}

/// Trading date of a quote timestamp, in UTC
fn trading_day(timestamp: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

/// Yahoo fills missing prices with zero
fn positive_price(price: f64) -> Option<f64> {
    (price.is_finite() && price > 0.0).then_some(price)
}

/// Unknown or non-finite adjusted closes become `None`
fn adjusted_close(adjclose: f64) -> Option<f64> {
    positive_price(adjclose)
}

/// Bars without a usable high and low are dropped
fn to_bar(quote: &yahoo::Quote) -> Option<PriceBar> {
    Some(PriceBar {
        date: trading_day(quote.timestamp)?,
        open: quote.open,
        high: positive_price(quote.high)?,
        low: positive_price(quote.low)?,
        close: quote.close,
        adjusted_close: adjusted_close(quote.adjclose),
        volume: quote.volume,
    })
}

/// Empty-data responses yield no bars, everything else is a fetch failure
fn empty_or_failure(ticker: &Ticker, error: yahoo::YahooError) -> Result<Vec<PriceBar>> {
    match error {
        yahoo::YahooError::NoResult | yahoo::YahooError::NoQuotes => {
            debug!(%ticker, "No quotes in response");
            Ok(Vec::new())
        }
        yahoo::YahooError::ApiError(ref message)
            if message.code.as_deref() == Some("Not Found") =>
        {
            debug!(%ticker, ?message, "Unknown ticker");
            Ok(Vec::new())
        }
        other => Err(DashboardError::fetch(PROVIDER, other)),
    }
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    async fn fetch_bars(&self, ticker: &Ticker, span: TimeSpan) -> Result<Vec<PriceBar>> {
        let (start, end) = span.resolve(Utc::now().date_naive());
        debug!(%ticker, %start, %end, "Fetching daily bars");

        let provider =
            yahoo::YahooConnector::new().map_err(|e| DashboardError::fetch(PROVIDER, e))?;

        let response = match provider
            .get_quote_history(ticker.as_str(), to_offset(start)?, to_offset(end)?)
            .await
        {
            Ok(response) => response,
            Err(e) => return empty_or_failure(ticker, e),
        };

        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) => return empty_or_failure(ticker, e),
        };

        let mut bars: Vec<PriceBar> = quotes
            .iter()
            .filter_map(to_bar)
            .filter(|bar| bar.date >= start && bar.date < end)
            .collect();
        bars.sort_by_key(|bar| bar.date);

        debug!(%ticker, count = bars.len(), "Fetched daily bars");
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{QuarterIndexing, aggregate_quarters};

    #[test]
    fn test_trading_day() {
        // 2024-01-02 14:30:00 UTC
        assert_eq!(
            trading_day(1_704_205_800),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }

    #[test]
    fn test_adjusted_close_filtering() {
        assert_eq!(adjusted_close(10.4), Some(10.4));
        assert_eq!(adjusted_close(f64::NAN), None);
        assert_eq!(adjusted_close(0.0), None);
    }

    fn quote(timestamp: i64, high: f64, low: f64, close: f64) -> yahoo::Quote {
        yahoo::Quote {
            timestamp,
            open: close,
            high,
            low,
            volume: 1_000,
            close,
            adjclose: close,
        }
    }

    #[test]
    fn test_to_bar_drops_zero_filled_prices() {
        let complete = quote(1_704_205_800, 192.0, 188.0, 190.0);
        let zero_filled = quote(1_704_292_200, 0.0, 0.0, 190.0);
        let nan_low = quote(1_704_378_600, 191.0, f64::NAN, 190.0);

        let bar = to_bar(&complete).unwrap();
        assert_eq!(bar.high, 192.0);
        assert_eq!(bar.low, 188.0);
        assert_eq!(bar.adjusted_close, Some(190.0));
        assert!(to_bar(&zero_filled).is_none());
        assert!(to_bar(&nan_low).is_none());

        let bars: Vec<PriceBar> = [complete, zero_filled, nan_low]
            .iter()
            .filter_map(to_bar)
            .collect();
        let quarters = aggregate_quarters(&bars, QuarterIndexing::default()).unwrap();
        assert_eq!(quarters.len(), 1);
        assert_eq!(quarters[0].high, 192.0);
        assert_eq!(quarters[0].low, 188.0);
    }

    #[test]
    fn test_empty_responses_yield_no_bars() {
        let ticker = Ticker::parse("ZZZZ").unwrap();

        let bars = empty_or_failure(&ticker, yahoo::YahooError::NoResult).unwrap();
        assert!(bars.is_empty());
        let bars = empty_or_failure(&ticker, yahoo::YahooError::NoQuotes).unwrap();
        assert!(bars.is_empty());

        let not_found = yahoo::YahooError::ApiError(
            serde_json::from_value(serde_json::json!({
                "code": "Not Found",
                "description": "No data found, symbol may be delisted"
            }))
            .unwrap(),
        );
        let bars = empty_or_failure(&ticker, not_found).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn test_malformed_responses_are_fetch_failures() {
        let ticker = Ticker::parse("AAPL").unwrap();

        let err = empty_or_failure(&ticker, yahoo::YahooError::DataInconsistency).unwrap_err();
        assert!(
            matches!(err, DashboardError::ExternalFetch { ref provider, .. } if provider == PROVIDER)
        );

        let bad_request = yahoo::YahooError::ApiError(
            serde_json::from_value(serde_json::json!({ "code": "Bad Request", "description": null }))
                .unwrap(),
        );
        let err = empty_or_failure(&ticker, bad_request).unwrap_err();
        assert!(matches!(err, DashboardError::ExternalFetch { .. }));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_bars() {
        let client = YahooFinanceClient::new();
        let ticker = Ticker::parse("AAPL").unwrap();
        let span = TimeSpan::between(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
        .unwrap();

        let bars = client.fetch_bars(&ticker, span).await.unwrap();
        assert!(!bars.is_empty());
        assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
    }
}
