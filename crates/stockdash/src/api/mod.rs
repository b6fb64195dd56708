//! Data sources behind trait seams, with production clients

pub mod alpha_vantage;
pub mod finnhub;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageClient;
pub use finnhub::FinnhubClient;
pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use crate::models::{FundamentalStatement, NewsItem, PriceBar, StatementKind, Ticker, TimeSpan};
use async_trait::async_trait;

/// Daily price history
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Bars ordered oldest first, or empty when the ticker/range has no data
    async fn fetch_bars(&self, ticker: &Ticker, span: TimeSpan) -> Result<Vec<PriceBar>>;
}

/// Annual financial statements
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FundamentalsSource: Send + Sync {
    async fn fetch_statement(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
    ) -> Result<FundamentalStatement>;
}

/// Recent company news with sentiment already scored
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Items newest first
    async fn fetch_news(&self, ticker: &Ticker) -> Result<Vec<NewsItem>>;
}
