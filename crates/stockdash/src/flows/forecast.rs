use super::{Dashboard, Section};
use crate::analysis::{TrendFit, aggregate_quarters, classify};
use crate::error::{DashboardError, Result};
use crate::models::{Decision, Prediction, QuarterlyAggregate, Ticker, TimeSpan};
use serde::Serialize;
use tracing::{info, warn};

/// Quarterly table, fitted lines and the resulting call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub quarters: Vec<QuarterlyAggregate>,
    pub fit: TrendFit,
    pub prediction: Prediction,
    pub decision: Decision,
}

/// Forecast panel for one ticker
#[derive(Debug, Clone)]
pub struct ForecastView {
    /// `None` when the input was not a usable ticker
    pub ticker: Option<Ticker>,
    pub outcome: Section<Forecast>,
}

impl Dashboard {
    /// Multi-year history → quarters → trend lines → Buy/Sell/Hold
    pub async fn forecast(&self, input: &str) -> ForecastView {
        let ticker = match Ticker::parse(input) {
            Ok(ticker) => ticker,
            Err(e) => {
                return ForecastView {
                    ticker: None,
                    outcome: Err(e),
                };
            }
        };

        let outcome = self.run_forecast(&ticker).await;
        match &outcome {
            Ok(forecast) => info!(
                %ticker,
                quarters = forecast.quarters.len(),
                decision = %forecast.decision,
                "Forecast complete"
            ),
            Err(e) => warn!(%ticker, error = %e, "Forecast unavailable"),
        }

        ForecastView {
            ticker: Some(ticker),
            outcome,
        }
    }

    async fn run_forecast(&self, ticker: &Ticker) -> Result<Forecast> {
        let span = TimeSpan::Trailing {
            years: self.config.forecast_lookback_years,
        };
        let bars = self.market.fetch_bars(ticker, span).await?;
        if bars.is_empty() {
            return Err(DashboardError::EmptyData {
                ticker: ticker.to_string(),
            });
        }

        let quarters = aggregate_quarters(&bars, self.config.quarter_indexing)?;
        let fit = TrendFit::fit(&quarters)?;
        let prediction = fit.predict_next();
        let decision = classify(&prediction, &fit.last, &self.config.thresholds);

        Ok(Forecast {
            quarters,
            fit,
            prediction,
            decision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::QuarterIndexing;
    use crate::api::{MockFundamentalsSource, MockMarketDataSource, MockNewsSource};
    use crate::config::DashboardConfig;
    use crate::models::PriceBar;
    use chrono::NaiveDate;
    use std::sync::Arc;

    /// One bar in the middle of each listed quarter
    fn quarterly_bars(quarters: &[(i32, u32, f64, f64)]) -> Vec<PriceBar> {
        quarters
            .iter()
            .map(|&(year, quarter, high, low)| PriceBar {
                date: NaiveDate::from_ymd_opt(year, quarter * 3 - 1, 15).unwrap(),
                open: low,
                high,
                low,
                close: high,
                adjusted_close: Some(high),
                volume: 1,
            })
            .collect()
    }

    fn dashboard(market: MockMarketDataSource, config: DashboardConfig) -> Dashboard {
        Dashboard::new(
            Arc::new(market),
            Arc::new(MockFundamentalsSource::new()),
            Arc::new(MockNewsSource::new()),
            config,
        )
    }

    fn market_with(bars: Vec<PriceBar>) -> MockMarketDataSource {
        let mut market = MockMarketDataSource::new();
        market
            .expect_fetch_bars()
            .withf(|_, span| *span == TimeSpan::Trailing { years: 4 })
            .times(1)
            .returning(move |_, _| Ok(bars.clone()));
        market
    }

    #[tokio::test]
    async fn test_rising_trend_is_buy() {
        let bars = quarterly_bars(&[
            (2023, 1, 100.0, 50.0),
            (2023, 2, 110.0, 55.0),
            (2023, 3, 120.0, 60.0),
            (2023, 4, 130.0, 65.0),
        ]);
        let view = dashboard(market_with(bars), DashboardConfig::default())
            .forecast(" msft ")
            .await;

        assert_eq!(view.ticker.unwrap().as_str(), "MSFT");
        let forecast = view.outcome.unwrap();
        assert_eq!(forecast.quarters.len(), 4);
        assert_eq!(forecast.prediction.quarter_index, 4);
        assert!((forecast.prediction.future_high - 140.0).abs() < 1e-9);
        assert!((forecast.prediction.future_low - 70.0).abs() < 1e-9);
        assert_eq!(forecast.decision, Decision::Buy);
    }

    #[tokio::test]
    async fn test_flat_trend_is_hold() {
        let bars = quarterly_bars(&[(2023, 1, 100.0, 50.0), (2023, 2, 100.0, 50.0)]);
        let view = dashboard(market_with(bars), DashboardConfig::default())
            .forecast("KO")
            .await;
        assert_eq!(view.outcome.unwrap().decision, Decision::Hold);
    }

    #[tokio::test]
    async fn test_calendar_indexing_accounts_for_gaps() {
        // Falls 10 per calendar quarter with a missing quarter in between
        let bars = quarterly_bars(&[
            (2023, 1, 100.0, 50.0),
            (2023, 2, 90.0, 40.0),
            (2023, 4, 70.0, 20.0),
        ]);
        let config = DashboardConfig::builder()
            .quarter_indexing(QuarterIndexing::Calendar)
            .build()
            .unwrap();

        let forecast = dashboard(market_with(bars), config)
            .forecast("F")
            .await
            .outcome
            .unwrap();

        assert_eq!(forecast.prediction.quarter_index, 4);
        assert!((forecast.prediction.future_high - 60.0).abs() < 1e-9);
        assert!((forecast.prediction.future_low - 10.0).abs() < 1e-9);
        assert_eq!(forecast.decision, Decision::Sell);
    }

    #[tokio::test]
    async fn test_single_quarter_is_insufficient() {
        let bars = quarterly_bars(&[(2024, 2, 100.0, 50.0)]);
        let view = dashboard(market_with(bars), DashboardConfig::default())
            .forecast("AAPL")
            .await;
        assert!(matches!(
            view.outcome,
            Err(DashboardError::InsufficientData { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_history() {
        let view = dashboard(market_with(Vec::new()), DashboardConfig::default())
            .forecast("ZZZZ")
            .await;
        assert!(matches!(view.outcome, Err(DashboardError::EmptyData { .. })));
    }

    #[tokio::test]
    async fn test_blank_ticker_skips_fetch() {
        let mut market = MockMarketDataSource::new();
        market.expect_fetch_bars().never();

        let view = dashboard(market, DashboardConfig::default()).forecast("   ").await;
        assert!(view.ticker.is_none());
        match view.outcome {
            Err(DashboardError::InvalidInput(message)) => {
                assert_eq!(message, "Please enter a valid ticker symbol.");
            }
            other => panic!("expected invalid input, got {other:?}"),
        }
    }
}
