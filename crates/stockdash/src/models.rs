//! Domain types shared by the sources, the analysis core and the views

use crate::error::{DashboardError, Result};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static TICKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9.^=\-]{1,15}$").expect("valid ticker pattern")
});

/// A normalized ticker symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Trim and upper-case user input, rejecting blanks and odd characters
    pub fn parse(input: &str) -> Result<Self> {
        let symbol = input.trim().to_uppercase();

        if symbol.is_empty() {
            return Err(DashboardError::InvalidInput(
                "Please enter a valid ticker symbol.".to_string(),
            ));
        }

        if !TICKER_PATTERN.is_match(&symbol) {
            return Err(DashboardError::InvalidInput(format!(
                "'{}' is not a valid ticker symbol.",
                input.trim()
            )));
        }

        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

/// Time span requested from the market data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSpan {
    /// Explicit dates; `end` is exclusive
    Between { start: NaiveDate, end: NaiveDate },
    /// The last N years up to today
    Trailing { years: u32 },
}

impl TimeSpan {
    /// Explicit range, rejecting `start > end`
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvalidInput(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self::Between { start, end })
    }

    /// Concrete `[start, end)` dates relative to `today`
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            Self::Between { start, end } => (start, end),
            Self::Trailing { years } => {
                let start = today
                    .checked_sub_months(Months::new(years.saturating_mul(12)))
                    .unwrap_or(NaiveDate::MIN);
                (start, today.succ_opt().unwrap_or(today))
            }
        }
    }
}

/// One trading day of prices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Absent when the provider does not report an adjusted close
    pub adjusted_close: Option<f64>,
    pub volume: u64,
}

/// Calendar quarter, e.g. 2024 Q3
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuarterPeriod {
    pub year: i32,
    /// 1..=4
    pub quarter: u32,
}

impl QuarterPeriod {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: date.month0() / 3 + 1,
        }
    }

    /// Quarters elapsed since year 0, Q1
    pub fn ordinal(&self) -> i64 {
        i64::from(self.year) * 4 + i64::from(self.quarter) - 1
    }

    /// Last calendar day of the quarter
    pub fn end_date(&self) -> NaiveDate {
        let (year, month) = if self.quarter == 4 {
            (self.year + 1, 1)
        } else {
            (self.year, self.quarter * 3 + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for QuarterPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Q{}", self.year, self.quarter)
    }
}

/// High/low of one non-empty calendar quarter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyAggregate {
    pub quarter_index: usize,
    pub period: QuarterPeriod,
    pub high: f64,
    pub low: f64,
}

/// Fitted line `value = slope * index + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendModel {
    pub fn evaluate(&self, index: f64) -> f64 {
        self.slope * index + self.intercept
    }
}

/// One-quarter-ahead prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub quarter_index: usize,
    pub future_high: f64,
    pub future_low: f64,
}

/// Outcome of the trend classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Decision::Buy => "Buy",
            Decision::Sell => "Sell",
            Decision::Hold => "Hold",
        };
        f.write_str(label)
    }
}

/// Which financial statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

impl StatementKind {
    pub const ALL: [StatementKind; 3] = [
        StatementKind::BalanceSheet,
        StatementKind::IncomeStatement,
        StatementKind::CashFlow,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            StatementKind::BalanceSheet => "Balance Sheet",
            StatementKind::IncomeStatement => "Income Statement",
            StatementKind::CashFlow => "Cash Flow Statement",
        }
    }
}

/// One line item across all reported periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub line_item: String,
    /// Aligned with `FundamentalStatement::periods`
    pub values: Vec<Option<f64>>,
}

/// Annual financial statement, line items by fiscal period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalStatement {
    pub kind: StatementKind,
    pub currency: Option<String>,
    /// Fiscal period end dates, in provider order (newest first)
    pub periods: Vec<String>,
    pub rows: Vec<StatementRow>,
}

impl FundamentalStatement {
    /// Look up one cell by line item and fiscal period
    pub fn value(&self, line_item: &str, period: &str) -> Option<f64> {
        let column = self.periods.iter().position(|p| p == period)?;
        self.rows
            .iter()
            .find(|row| row.line_item == line_item)
            .and_then(|row| row.values.get(column).copied().flatten())
    }
}

/// A news headline with sentiment scores in [-1, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub published_at: DateTime<Utc>,
    pub title: String,
    pub summary: String,
    pub title_sentiment: f64,
    pub summary_sentiment: f64,
    pub source: Option<String>,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ticker_normalization() {
        assert_eq!(Ticker::parse("  aapl ").unwrap().as_str(), "AAPL");
        assert_eq!(Ticker::parse("brk.b").unwrap().as_str(), "BRK.B");
        assert_eq!(Ticker::parse("^gspc").unwrap().as_str(), "^GSPC");
    }

    #[test]
    fn test_ticker_rejects_blank_and_garbage() {
        assert!(matches!(
            Ticker::parse("   "),
            Err(DashboardError::InvalidInput(_))
        ));
        assert!(Ticker::parse("AA PL").is_err());
        assert!(Ticker::parse("<script>").is_err());
    }

    #[test]
    fn test_ticker_serde() {
        let ticker: Ticker = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(ticker.as_str(), "MSFT");
        assert!(serde_json::from_str::<Ticker>("\"\"").is_err());
    }

    #[test]
    fn test_time_span_validation() {
        assert!(TimeSpan::between(date(2024, 2, 1), date(2024, 1, 1)).is_err());
        let span = TimeSpan::between(date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        assert_eq!(span.resolve(date(2030, 1, 1)), (date(2024, 1, 1), date(2024, 2, 1)));
    }

    #[test]
    fn test_trailing_span_resolves_from_today() {
        let span = TimeSpan::Trailing { years: 4 };
        assert_eq!(
            span.resolve(date(2026, 10, 19)),
            (date(2022, 10, 19), date(2026, 10, 20))
        );
    }

    #[test]
    fn test_quarter_period() {
        assert_eq!(QuarterPeriod::of(date(2024, 3, 31)).quarter, 1);
        assert_eq!(QuarterPeriod::of(date(2024, 4, 1)).quarter, 2);
        assert_eq!(QuarterPeriod::of(date(2024, 12, 31)).quarter, 4);
        assert_eq!(QuarterPeriod::of(date(2024, 8, 15)).end_date(), date(2024, 9, 30));
        assert_eq!(QuarterPeriod::of(date(2024, 11, 2)).end_date(), date(2024, 12, 31));

        let q4 = QuarterPeriod { year: 2023, quarter: 4 };
        let q1 = QuarterPeriod { year: 2024, quarter: 1 };
        assert_eq!(q1.ordinal() - q4.ordinal(), 1);
        assert_eq!(q1.to_string(), "2024 Q1");
    }

    #[test]
    fn test_statement_lookup() {
        let statement = FundamentalStatement {
            kind: StatementKind::BalanceSheet,
            currency: Some("USD".to_string()),
            periods: vec!["2024-12-31".to_string(), "2023-12-31".to_string()],
            rows: vec![StatementRow {
                line_item: "totalAssets".to_string(),
                values: vec![Some(10.0), None],
            }],
        };

        assert_eq!(statement.value("totalAssets", "2024-12-31"), Some(10.0));
        assert_eq!(statement.value("totalAssets", "2023-12-31"), None);
        assert_eq!(statement.value("totalAssets", "2022-12-31"), None);
        assert_eq!(statement.value("cash", "2024-12-31"), None);
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(Decision::Buy.to_string(), "Buy");
        assert_eq!(Decision::Hold.to_string(), "Hold");
    }
}
