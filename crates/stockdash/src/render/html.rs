//! Single-page HTML rendering with MiniJinja

use super::{format_amount, format_change, format_sentiment};
use crate::error::{DashboardError, Result};
use crate::flows::{ChartSeries, ForecastView, OverviewView, Section};
use crate::models::FundamentalStatement;
use minijinja::{Environment, context};
use serde::Serialize;
use std::fmt::Write;

const TEMPLATE_NAME: &str = "dashboard.html";
const TEMPLATE: &str = include_str!("../../templates/dashboard.html");

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 300.0;

/// Form values echoed back into the page
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageQuery {
    pub ticker: String,
    pub start: String,
    pub end: String,
}

/// Everything one page load shows
#[derive(Debug, Clone, Default)]
pub struct PageView {
    pub query: PageQuery,
    /// Input rejected before any flow ran
    pub notice: Option<DashboardError>,
    pub overview: Option<OverviewView>,
    pub forecast: Option<ForecastView>,
}

#[derive(Debug, Serialize)]
struct MessageContext {
    kind: &'static str,
    text: String,
}

impl From<&DashboardError> for MessageContext {
    fn from(err: &DashboardError) -> Self {
        Self {
            kind: err.kind(),
            text: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChartContext {
    width: f64,
    height: f64,
    points: String,
    low: String,
    high: String,
    first: String,
    last: String,
}

#[derive(Debug, Serialize)]
struct PricingContext {
    rows: Vec<[String; 3]>,
    annual_return: String,
    annual_stdev: String,
    risk_adjusted: String,
}

#[derive(Debug, Serialize)]
struct StatementContext {
    title: &'static str,
    error: Option<MessageContext>,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct NewsContext {
    title: String,
    summary: String,
    published: String,
    title_sentiment: String,
    summary_sentiment: String,
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct OverviewContext {
    ticker: String,
    chart: Option<ChartContext>,
    chart_error: Option<MessageContext>,
    pricing: Option<PricingContext>,
    pricing_error: Option<MessageContext>,
    statements: Vec<StatementContext>,
    news: Vec<NewsContext>,
    news_error: Option<MessageContext>,
}

#[derive(Debug, Serialize)]
struct ForecastContext {
    ticker: Option<String>,
    error: Option<MessageContext>,
    quarters: Vec<[String; 4]>,
    future_high: String,
    future_low: String,
    decision: String,
}

fn split<T, C>(
    section: &Section<T>,
    f: impl FnOnce(&T) -> C,
) -> (Option<C>, Option<MessageContext>) {
    match section {
        Ok(value) => (Some(f(value)), None),
        Err(e) => (None, Some(e.into())),
    }
}

/// SVG polyline coordinates scaled into the chart box
fn polyline(chart: &ChartSeries) -> String {
    let Some((lo, hi)) = chart.min_max() else {
        return String::new();
    };
    let range = if hi > lo { hi - lo } else { 1.0 };
    let step = if chart.points.len() > 1 {
        CHART_WIDTH / (chart.points.len() - 1) as f64
    } else {
        0.0
    };

    let mut points = String::new();
    for (i, &(_, value)) in chart.points.iter().enumerate() {
        let x = i as f64 * step;
        let y = CHART_HEIGHT - (value - lo) / range * CHART_HEIGHT;
        if !points.is_empty() {
            points.push(' ');
        }
        let _ = write!(points, "{x:.1},{y:.1}");
    }
    points
}

fn chart_context(chart: &ChartSeries) -> ChartContext {
    let (lo, hi) = chart.min_max().unwrap_or((0.0, 0.0));
    let date_at = |point: Option<&(chrono::NaiveDate, f64)>| {
        point.map(|(date, _)| date.to_string()).unwrap_or_default()
    };
    ChartContext {
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
        points: polyline(chart),
        low: format!("{lo:.2}"),
        high: format!("{hi:.2}"),
        first: date_at(chart.points.first()),
        last: date_at(chart.points.last()),
    }
}

fn statement_context(statement: &FundamentalStatement) -> (Vec<String>, Vec<Vec<String>>) {
    let mut header = vec![match &statement.currency {
        Some(currency) => format!("Line item ({currency})"),
        None => "Line item".to_string(),
    }];
    header.extend(statement.periods.iter().cloned());

    let rows = statement
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.line_item.clone()];
            cells.extend(row.values.iter().map(|v| format_amount(*v)));
            cells
        })
        .collect();
    (header, rows)
}

fn overview_context(view: &OverviewView) -> OverviewContext {
    let (chart, chart_error) = split(&view.chart, chart_context);
    let (pricing, pricing_error) = split(&view.pricing, |pricing| PricingContext {
        rows: pricing
            .rows
            .iter()
            .map(|row| {
                [
                    row.date.to_string(),
                    format!("{:.2}", row.adjusted_close),
                    format_change(row.change),
                ]
            })
            .collect(),
        annual_return: format!("{:.2}%", pricing.risk.annual_return_pct),
        annual_stdev: format!("{:.2}%", pricing.risk.annual_stdev_pct),
        risk_adjusted: pricing.risk.risk_adjusted.to_string(),
    });

    let statements = view
        .fundamentals
        .iter()
        .map(|(kind, statement)| match statement {
            Ok(statement) => {
                let (header, rows) = statement_context(statement);
                StatementContext {
                    title: kind.title(),
                    error: None,
                    header,
                    rows,
                }
            }
            Err(e) => StatementContext {
                title: kind.title(),
                error: Some(e.into()),
                header: Vec::new(),
                rows: Vec::new(),
            },
        })
        .collect();

    let (news, news_error) = split(&view.news, |items| {
        items
            .iter()
            .map(|item| NewsContext {
                title: item.title.clone(),
                summary: item.summary.clone(),
                published: item.published_at.format("%Y-%m-%d %H:%M UTC").to_string(),
                title_sentiment: format_sentiment(item.title_sentiment),
                summary_sentiment: format_sentiment(item.summary_sentiment),
                url: item.url.clone(),
            })
            .collect()
    });

    OverviewContext {
        ticker: view.ticker.to_string(),
        chart,
        chart_error,
        pricing,
        pricing_error,
        statements,
        news: news.unwrap_or_default(),
        news_error,
    }
}

fn forecast_context(view: &ForecastView) -> ForecastContext {
    let ticker = view.ticker.as_ref().map(ToString::to_string);
    match &view.outcome {
        Ok(forecast) => ForecastContext {
            ticker,
            error: None,
            quarters: forecast
                .quarters
                .iter()
                .map(|q| {
                    [
                        q.period.to_string(),
                        q.quarter_index.to_string(),
                        format!("{:.2}", q.high),
                        format!("{:.2}", q.low),
                    ]
                })
                .collect(),
            future_high: format!("{:.2}", forecast.prediction.future_high),
            future_low: format!("{:.2}", forecast.prediction.future_low),
            decision: forecast.decision.to_string(),
        },
        Err(e) => ForecastContext {
            ticker,
            error: Some(e.into()),
            quarters: Vec::new(),
            future_high: String::new(),
            future_low: String::new(),
            decision: String::new(),
        },
    }
}

/// Renders the dashboard page; template is parsed once
#[derive(Debug)]
pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        // The .html name turns on HTML auto-escaping
        env.add_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render(&self, page: &PageView) -> Result<String> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        let rendered = template.render(context! {
            query => &page.query,
            notice => page.notice.as_ref().map(MessageContext::from),
            overview => page.overview.as_ref().map(overview_context),
            forecast => page.forecast.as_ref().map(forecast_context),
        })?;
        Ok(rendered)
    }
}
