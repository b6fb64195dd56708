//! Daily percentage changes and annualized return/risk

use crate::error::{DashboardError, Result};
use crate::models::{PriceBar, Ticker};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Annualization factor for daily statistics
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Relative change between consecutive prices, `p[i] / p[i-1] - 1`.
///
/// The result is one shorter than the input.
pub fn percent_changes(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// One row of the percentage-change table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeRow {
    pub date: NaiveDate,
    pub adjusted_close: f64,
    /// Fraction, not percent
    pub change: f64,
}

/// Return divided by volatility, undefined for a flat series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum RiskAdjustedReturn {
    Value(f64),
    Undefined,
}

impl RiskAdjustedReturn {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Undefined => None,
        }
    }
}

impl fmt::Display for RiskAdjustedReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v:.4}"),
            Self::Undefined => f.write_str("undefined"),
        }
    }
}

/// Annualized statistics, both in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub annual_return_pct: f64,
    pub annual_stdev_pct: f64,
    pub risk_adjusted: RiskAdjustedReturn,
}

impl RiskSummary {
    /// Summarize a non-empty series of daily changes.
    ///
    /// Standard deviation is the population form (divides by n).
    pub fn from_changes(changes: &[f64]) -> Result<Self> {
        if changes.is_empty() {
            return Err(DashboardError::EmptyInput("daily changes"));
        }

        let n = changes.len() as f64;
        let mean = changes.iter().sum::<f64>() / n;
        let variance = changes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;

        let annual_return_pct = mean * TRADING_DAYS_PER_YEAR * 100.0;
        let annual_stdev_pct = variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt() * 100.0;

        let risk_adjusted = if annual_stdev_pct > 0.0 && annual_stdev_pct.is_finite() {
            RiskAdjustedReturn::Value(annual_return_pct / annual_stdev_pct)
        } else {
            RiskAdjustedReturn::Undefined
        };

        Ok(Self {
            annual_return_pct,
            annual_stdev_pct,
            risk_adjusted,
        })
    }
}

/// Percentage-change table plus its risk summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSummary {
    pub rows: Vec<ChangeRow>,
    pub risk: RiskSummary,
}

impl PricingSummary {
    /// Build the table from bars ordered oldest first.
    ///
    /// Every bar must carry an adjusted close.
    pub fn from_bars(ticker: &Ticker, bars: &[PriceBar]) -> Result<Self> {
        let prices = bars
            .iter()
            .map(|bar| {
                bar.adjusted_close
                    .ok_or_else(|| DashboardError::MissingField {
                        ticker: ticker.to_string(),
                        field: "Adjusted Close".to_string(),
                    })
            })
            .collect::<Result<Vec<f64>>>()?;

        if prices.len() < 2 {
            return Err(DashboardError::InsufficientData {
                what: "prices",
                required: 2,
                actual: prices.len(),
            });
        }

        let changes = percent_changes(&prices);
        let risk = RiskSummary::from_changes(&changes)?;

        let rows = bars
            .iter()
            .skip(1)
            .zip(prices.iter().skip(1))
            .zip(changes)
            .map(|((bar, &adjusted_close), change)| ChangeRow {
                date: bar.date,
                adjusted_close,
                change,
            })
            .collect();

        Ok(Self { rows, risk })
    }
}
