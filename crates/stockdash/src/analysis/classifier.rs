//! Buy/Sell/Hold rule on a one-quarter-ahead prediction

use crate::error::{DashboardError, Result};
use crate::models::{Decision, Prediction, QuarterlyAggregate};
use serde::{Deserialize, Serialize};

/// Ratios applied to the last observed quarter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Both predicted bounds must reach `buy_ratio` × last observed
    pub buy_ratio: f64,
    /// Both predicted bounds must fall to `sell_ratio` × last observed
    pub sell_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            buy_ratio: 1.05,
            sell_ratio: 0.95,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<()> {
        let finite = self.buy_ratio.is_finite() && self.sell_ratio.is_finite();
        if !finite || self.buy_ratio <= self.sell_ratio {
            return Err(DashboardError::Config(format!(
                "buy_ratio ({}) must be greater than sell_ratio ({})",
                self.buy_ratio, self.sell_ratio
            )));
        }
        Ok(())
    }
}

/// Compare a prediction with the most recent observed quarter.
///
/// Buy and Sell each need both the high and the low to confirm; any
/// mixed signal is Hold.
pub fn classify(
    prediction: &Prediction,
    last: &QuarterlyAggregate,
    thresholds: &Thresholds,
) -> Decision {
    let high = prediction.future_high;
    let low = prediction.future_low;

    if high >= thresholds.buy_ratio * last.high && low >= thresholds.buy_ratio * last.low {
        Decision::Buy
    } else if high <= thresholds.sell_ratio * last.high && low <= thresholds.sell_ratio * last.low
    {
        Decision::Sell
    } else {
        Decision::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuarterPeriod;

    fn last() -> QuarterlyAggregate {
        QuarterlyAggregate {
            quarter_index: 7,
            period: QuarterPeriod {
                year: 2024,
                quarter: 4,
            },
            high: 100.0,
            low: 50.0,
        }
    }

    fn predict(high: f64, low: f64) -> Prediction {
        Prediction {
            quarter_index: 8,
            future_high: high,
            future_low: low,
        }
    }

    #[test]
    fn test_buy_when_both_bounds_rise() {
        let decision = classify(&predict(106.0, 53.0), &last(), &Thresholds::default());
        assert_eq!(decision, Decision::Buy);
    }

    #[test]
    fn test_sell_when_both_bounds_fall() {
        let decision = classify(&predict(94.0, 47.0), &last(), &Thresholds::default());
        assert_eq!(decision, Decision::Sell);
    }

    #[test]
    fn test_hold_on_mixed_signal() {
        let decision = classify(&predict(106.0, 49.0), &last(), &Thresholds::default());
        assert_eq!(decision, Decision::Hold);

        let decision = classify(&predict(94.0, 53.0), &last(), &Thresholds::default());
        assert_eq!(decision, Decision::Hold);
    }

    #[test]
    fn test_hold_inside_band() {
        let decision = classify(&predict(101.0, 50.5), &last(), &Thresholds::default());
        assert_eq!(decision, Decision::Hold);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let t = Thresholds {
            buy_ratio: 1.5,
            sell_ratio: 0.5,
        };
        assert_eq!(classify(&predict(150.0, 75.0), &last(), &t), Decision::Buy);
        assert_eq!(classify(&predict(50.0, 25.0), &last(), &t), Decision::Sell);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(Thresholds::default().validate().is_ok());
        assert!(
            Thresholds {
                buy_ratio: 1.0,
                sell_ratio: 1.0
            }
            .validate()
            .is_err()
        );
        assert!(
            Thresholds {
                buy_ratio: f64::NAN,
                sell_ratio: 0.9
            }
            .validate()
            .is_err()
        );
    }
}
