//! Least-squares trend lines over quarterly highs and lows

use crate::error::{DashboardError, Result};
use crate::models::{Prediction, QuarterlyAggregate, TrendModel};
use serde::{Deserialize, Serialize};

/// Ordinary least squares fit of `y = slope * x + intercept`.
///
/// Needs at least two points with distinct `x`. A constant `y` gives a
/// slope of exactly zero.
pub fn fit_ols(points: &[(f64, f64)]) -> Result<TrendModel> {
    if points.len() < 2 {
        return Err(DashboardError::InsufficientData {
            what: "points",
            required: 2,
            actual: points.len(),
        });
    }

    let n = points.len() as f64;
    let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for &(x, y) in points {
        let dx = x - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }

    if sxx == 0.0 {
        return Err(DashboardError::InsufficientData {
            what: "distinct x values",
            required: 2,
            actual: 1,
        });
    }

    let slope = sxy / sxx;
    Ok(TrendModel {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// Independent trend lines for the high and low series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendFit {
    pub high: TrendModel,
    pub low: TrendModel,
    /// Most recent observed quarter
    pub last: QuarterlyAggregate,
}

impl TrendFit {
    /// Fit both lines over the whole aggregate sequence
    pub fn fit(quarters: &[QuarterlyAggregate]) -> Result<Self> {
        let Some(last) = quarters.last().copied() else {
            return Err(DashboardError::InsufficientData {
                what: "quarters",
                required: 2,
                actual: 0,
            });
        };

        if quarters.len() < 2 {
            return Err(DashboardError::InsufficientData {
                what: "quarters",
                required: 2,
                actual: quarters.len(),
            });
        }

        let highs: Vec<(f64, f64)> = quarters
            .iter()
            .map(|q| (q.quarter_index as f64, q.high))
            .collect();
        let lows: Vec<(f64, f64)> = quarters
            .iter()
            .map(|q| (q.quarter_index as f64, q.low))
            .collect();

        Ok(Self {
            high: fit_ols(&highs)?,
            low: fit_ols(&lows)?,
            last,
        })
    }

    /// Evaluate both lines one quarter past the last observation
    pub fn predict_next(&self) -> Prediction {
        let quarter_index = self.last.quarter_index + 1;
        let x = quarter_index as f64;
        Prediction {
            quarter_index,
            future_high: self.high.evaluate(x),
            future_low: self.low.evaluate(x),
        }
    }
}
