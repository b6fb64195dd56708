//! Pure computations behind both flows
//!
//! Nothing in here performs I/O. The forecast path is
//! [`aggregate_quarters`] → [`TrendFit::fit`] → [`classify`]; the overview
//! path uses [`PricingSummary::from_bars`].

pub mod aggregator;
pub mod classifier;
pub mod returns;
pub mod trend;

pub use aggregator::{QuarterIndexing, aggregate_quarters};
pub use classifier::{Thresholds, classify};
pub use returns::{
    ChangeRow, PricingSummary, RiskAdjustedReturn, RiskSummary, TRADING_DAYS_PER_YEAR,
    percent_changes,
};
pub use trend::{TrendFit, fit_ols};
