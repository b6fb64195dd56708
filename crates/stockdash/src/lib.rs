//! Stock dashboard: price history, fundamentals, news sentiment and a
//! quarterly trend forecast for a single ticker.
//!
//! - [`api`]: data sources behind traits (Yahoo Finance, Alpha Vantage, Finnhub)
//! - [`analysis`]: percentage changes, risk summary, quarterly aggregation,
//!   trend fitting and the Buy/Sell/Hold classifier
//! - [`flows`]: the overview and forecast pipelines producing view models
//! - [`render`]: terminal and HTML renderers
//! - [`server`]: the axum web surface
//!
//! # Example
//!
//! ```rust,ignore
//! use stockdash::{Dashboard, DashboardConfig, TerminalRenderer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let dashboard = Dashboard::from_config(DashboardConfig::from_env()?)?;
//!
//!     let view = dashboard.forecast("AAPL").await;
//!     println!("{}", TerminalRenderer::default().render_forecast(&view));
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod flows;
pub mod models;
pub mod render;
pub mod sentiment;
pub mod server;
pub mod shell;

pub use config::{Credential, DashboardConfig};
pub use error::{DashboardError, Result};
pub use flows::{Dashboard, ForecastView, OverviewRequest, OverviewView};
pub use render::{HtmlRenderer, PageView, TerminalRenderer};
pub use shell::Command;
