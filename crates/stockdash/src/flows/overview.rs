use super::{Dashboard, Section};
use crate::analysis::PricingSummary;
use crate::error::{DashboardError, Result};
use crate::models::{
    FundamentalStatement, NewsItem, PriceBar, StatementKind, Ticker, TimeSpan,
};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

/// Window used when the start date is left blank
const DEFAULT_WINDOW_DAYS: u64 = 365;

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d").map(Some).map_err(|_| {
            DashboardError::InvalidInput(format!("{field} date '{v}' is not YYYY-MM-DD"))
        }),
    }
}

/// Validated overview input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewRequest {
    pub ticker: Ticker,
    pub start: NaiveDate,
    /// Exclusive
    pub end: NaiveDate,
}

impl OverviewRequest {
    pub fn new(ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let ticker = Ticker::parse(ticker)?;
        TimeSpan::between(start, end)?;
        Ok(Self { ticker, start, end })
    }

    /// From raw form text. A blank end is `today`; a blank start is one
    /// year before the end.
    pub fn from_form(
        ticker: &str,
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self> {
        let end = parse_date("end", end)?.unwrap_or(today);
        let start = parse_date("start", start)?.unwrap_or_else(|| {
            end.checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS))
                .unwrap_or(end)
        });
        Self::new(ticker, start, end)
    }

    fn span(&self) -> TimeSpan {
        TimeSpan::Between {
            start: self.start,
            end: self.end,
        }
    }
}

/// Adjusted close by date, oldest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub points: Vec<(NaiveDate, f64)>,
}

impl ChartSeries {
    /// Requires a non-empty series where every bar has an adjusted close
    fn from_bars(ticker: &Ticker, bars: &[PriceBar]) -> Result<Self> {
        if bars.is_empty() {
            return Err(DashboardError::EmptyData {
                ticker: ticker.to_string(),
            });
        }

        let points = bars
            .iter()
            .map(|bar| {
                bar.adjusted_close
                    .map(|close| (bar.date, close))
                    .ok_or_else(|| DashboardError::MissingField {
                        ticker: ticker.to_string(),
                        field: "Adjusted Close".to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { points })
    }

    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, &(_, v)| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Everything the overview page shows
#[derive(Debug, Clone)]
pub struct OverviewView {
    pub ticker: Ticker,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// `Err` means no chart is drawn, only the message
    pub chart: Section<ChartSeries>,
    pub pricing: Section<PricingSummary>,
    /// One entry per statement kind, in display order
    pub fundamentals: Vec<(StatementKind, Section<FundamentalStatement>)>,
    pub news: Section<Vec<NewsItem>>,
}

impl Dashboard {
    /// Prices, statements and news for one ticker and date range
    pub async fn overview(&self, request: &OverviewRequest) -> OverviewView {
        let ticker = &request.ticker;

        let bars = self.market.fetch_bars(ticker, request.span()).await;
        let (chart, pricing) = match bars {
            Ok(bars) => (
                ChartSeries::from_bars(ticker, &bars),
                // An empty range reads as missing data, not as too few prices
                if bars.is_empty() {
                    Err(DashboardError::EmptyData {
                        ticker: ticker.to_string(),
                    })
                } else {
                    PricingSummary::from_bars(ticker, &bars)
                },
            ),
            Err(e) => (Err(e.clone()), Err(e)),
        };
        if let Err(e) = &pricing {
            warn!(%ticker, error = %e, "Pricing section unavailable");
        }

        let mut fundamentals = Vec::with_capacity(StatementKind::ALL.len());
        for kind in StatementKind::ALL {
            let statement = self.fundamentals.fetch_statement(ticker, kind).await;
            if let Err(e) = &statement {
                warn!(%ticker, statement = kind.title(), error = %e, "Statement unavailable");
            }
            fundamentals.push((kind, statement));
        }

        let news = self.news.fetch_news(ticker).await.map(|mut items| {
            items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
            items.truncate(self.config.news_limit);
            items
        });
        if let Err(e) = &news {
            warn!(%ticker, error = %e, "News unavailable");
        }

        info!(%ticker, start = %request.start, end = %request.end, "Overview complete");

        OverviewView {
            ticker: ticker.clone(),
            start: request.start,
            end: request.end,
            chart,
            pricing,
            fundamentals,
            news,
        }
    }
}
