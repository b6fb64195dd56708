//! Overview and forecast pipelines
//!
//! Each flow runs to completion and returns a view model. Failures are
//! stored per section so one broken provider never blanks the page.

mod forecast;
mod overview;

pub use forecast::{Forecast, ForecastView};
pub use overview::{ChartSeries, OverviewRequest, OverviewView};

use crate::api::{
    AlphaVantageClient, FinnhubClient, FundamentalsSource, MarketDataSource, NewsSource,
    YahooFinanceClient,
};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use std::sync::Arc;

/// Outcome of one independently rendered part of a view
pub type Section<T> = std::result::Result<T, DashboardError>;

/// Sources plus configuration; cheap to clone and share across requests
#[derive(Clone)]
pub struct Dashboard {
    market: Arc<dyn MarketDataSource>,
    fundamentals: Arc<dyn FundamentalsSource>,
    news: Arc<dyn NewsSource>,
    config: DashboardConfig,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    pub fn new(
        market: Arc<dyn MarketDataSource>,
        fundamentals: Arc<dyn FundamentalsSource>,
        news: Arc<dyn NewsSource>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            market,
            fundamentals,
            news,
            config,
        }
    }

    /// Yahoo Finance prices, Alpha Vantage statements, Finnhub news
    pub fn from_config(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            Arc::new(YahooFinanceClient::new()),
            Arc::new(AlphaVantageClient::from_config(&config)?),
            Arc::new(FinnhubClient::from_config(&config)?),
            config,
        ))
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
}
