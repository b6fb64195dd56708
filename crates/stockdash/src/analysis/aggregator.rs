//! Calendar-quarter resampling of daily bars

use crate::error::{DashboardError, Result};
use crate::models::{PriceBar, QuarterPeriod, QuarterlyAggregate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How `quarter_index` is assigned to emitted quarters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuarterIndexing {
    /// Position among emitted quarters; quarters without bars are skipped
    /// and do not consume an index.
    #[default]
    Emitted,
    /// Calendar quarters elapsed since the first observed quarter, so a
    /// data gap leaves a hole in the index sequence.
    Calendar,
}

/// Group bars by calendar quarter and reduce each group to its extremes.
///
/// Quarters come out in chronological order regardless of input order.
/// Empty quarters are never emitted.
pub fn aggregate_quarters(
    bars: &[PriceBar],
    indexing: QuarterIndexing,
) -> Result<Vec<QuarterlyAggregate>> {
    if bars.is_empty() {
        return Err(DashboardError::EmptyInput("price bars"));
    }

    let mut buckets: BTreeMap<QuarterPeriod, (f64, f64)> = BTreeMap::new();
    for bar in bars {
        buckets
            .entry(QuarterPeriod::of(bar.date))
            .and_modify(|(high, low)| {
                *high = high.max(bar.high);
                *low = low.min(bar.low);
            })
            .or_insert((bar.high, bar.low));
    }

    let first_ordinal = buckets
        .keys()
        .next()
        .map_or(0, QuarterPeriod::ordinal);

    let aggregates = buckets
        .into_iter()
        .enumerate()
        .map(|(position, (period, (high, low)))| {
            let quarter_index = match indexing {
                QuarterIndexing::Emitted => position,
                QuarterIndexing::Calendar => (period.ordinal() - first_ordinal) as usize,
            };
            QuarterlyAggregate {
                quarter_index,
                period,
                high,
                low,
            }
        })
        .collect();

    Ok(aggregates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(y: i32, m: u32, d: u32, high: f64, low: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: low,
            high,
            low,
            close: high,
            adjusted_close: Some(high),
            volume: 1_000,
        }
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let result = aggregate_quarters(&[], QuarterIndexing::Emitted);
        assert!(matches!(result, Err(DashboardError::EmptyInput(_))));
    }

    #[test]
    fn test_one_aggregate_per_distinct_quarter() {
        let bars = vec![
            bar(2023, 1, 3, 10.0, 8.0),
            bar(2023, 2, 15, 12.0, 9.0),
            bar(2023, 3, 31, 11.0, 7.5),
            bar(2023, 4, 3, 13.0, 10.0),
            bar(2023, 6, 30, 15.0, 11.0),
            bar(2023, 10, 2, 20.0, 18.0),
        ];

        let quarters = aggregate_quarters(&bars, QuarterIndexing::Emitted).unwrap();
        assert_eq!(quarters.len(), 3);

        let indices: Vec<usize> = quarters.iter().map(|q| q.quarter_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        assert_eq!(quarters[0].high, 12.0);
        assert_eq!(quarters[0].low, 7.5);
        assert_eq!(quarters[1].high, 15.0);
        assert_eq!(quarters[1].low, 10.0);
        assert_eq!(quarters[2].period, QuarterPeriod { year: 2023, quarter: 4 });
    }

    #[test]
    fn test_gap_quarter_is_not_emitted() {
        // Q3 2023 has no bars
        let bars = vec![
            bar(2023, 5, 1, 10.0, 9.0),
            bar(2023, 11, 1, 12.0, 11.0),
        ];

        let emitted = aggregate_quarters(&bars, QuarterIndexing::Emitted).unwrap();
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[1].quarter_index, 1);

        let calendar = aggregate_quarters(&bars, QuarterIndexing::Calendar).unwrap();
        assert_eq!(calendar.len(), 2);
        assert_eq!(calendar[0].quarter_index, 0);
        assert_eq!(calendar[1].quarter_index, 2);
    }

    #[test]
    fn test_unordered_input_is_sorted_by_quarter() {
        let bars = vec![
            bar(2024, 1, 10, 30.0, 29.0),
            bar(2023, 12, 29, 20.0, 19.0),
        ];

        let quarters = aggregate_quarters(&bars, QuarterIndexing::Emitted).unwrap();
        assert_eq!(quarters[0].period, QuarterPeriod { year: 2023, quarter: 4 });
        assert_eq!(quarters[1].period, QuarterPeriod { year: 2024, quarter: 1 });
    }

    #[test]
    fn test_same_quarter_in_different_years() {
        let bars = vec![bar(2022, 2, 1, 1.0, 1.0), bar(2023, 2, 1, 2.0, 2.0)];
        let quarters = aggregate_quarters(&bars, QuarterIndexing::Emitted).unwrap();
        assert_eq!(quarters.len(), 2);
    }
}
