//! Plain-text rendering with comfy-table

use super::{format_amount, format_change, format_sentiment};
use crate::error::DashboardError;
use crate::flows::{ChartSeries, ForecastView, OverviewView};
use crate::models::FundamentalStatement;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::fmt::Write;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Renders views for a terminal
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    /// Sparkline width in characters
    pub chart_width: usize,
    /// Most recent rows kept in the percentage-change table
    pub table_rows: usize,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self {
            chart_width: 60,
            table_rows: 20,
        }
    }
}

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn error_line(err: &DashboardError) -> String {
    format!("❌ {err}\n")
}

/// Downsample to `width` buckets and map each mean onto eight levels
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let buckets = width.min(values.len());
    let means: Vec<f64> = (0..buckets)
        .map(|b| {
            let from = b * values.len() / buckets;
            let to = ((b + 1) * values.len() / buckets).max(from + 1);
            values[from..to].iter().sum::<f64>() / (to - from) as f64
        })
        .collect();

    let lo = means.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    means
        .iter()
        .map(|v| {
            let level = if range > 0.0 {
                ((v - lo) / range * top).round() as usize
            } else {
                SPARK_LEVELS.len() / 2
            };
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

impl TerminalRenderer {
    pub fn render_overview(&self, view: &OverviewView) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({} to {})\n", view.ticker, view.start, view.end);

        match &view.chart {
            Ok(chart) => out.push_str(&self.render_chart(chart)),
            Err(e) => out.push_str(&error_line(e)),
        }

        out.push_str("\n== Pricing Data ==\n");
        match &view.pricing {
            Ok(pricing) => {
                let mut table = new_table(vec![
                    "Date".to_string(),
                    "Adj Close".to_string(),
                    "% Change".to_string(),
                ]);
                let skipped = pricing.rows.len().saturating_sub(self.table_rows);
                for row in pricing.rows.iter().skip(skipped) {
                    table.add_row(vec![
                        row.date.to_string(),
                        format!("{:.2}", row.adjusted_close),
                        format_change(row.change),
                    ]);
                }
                if skipped > 0 {
                    let _ = writeln!(out, "({skipped} earlier rows omitted)");
                }
                let _ = writeln!(out, "{table}");

                let risk = &pricing.risk;
                let _ = writeln!(out, "Annual Return: {:.2}%", risk.annual_return_pct);
                let _ = writeln!(out, "Standard Deviation: {:.2}%", risk.annual_stdev_pct);
                let _ = writeln!(out, "Risk Adjusted Return: {}", risk.risk_adjusted);
            }
            Err(e) => out.push_str(&error_line(e)),
        }

        out.push_str("\n== Fundamental Data ==\n");
        for (kind, statement) in &view.fundamentals {
            let _ = writeln!(out, "-- {} --", kind.title());
            match statement {
                Ok(statement) => {
                    let _ = writeln!(out, "{}", statement_table(statement));
                }
                Err(e) => out.push_str(&error_line(e)),
            }
        }

        out.push_str("\n== Top News ==\n");
        match &view.news {
            Ok(items) if items.is_empty() => out.push_str("No recent news.\n"),
            Ok(items) => {
                for (i, item) in items.iter().enumerate() {
                    let _ = writeln!(out, "News {}: {}", i + 1, item.title);
                    let published = item.published_at.format("%Y-%m-%d %H:%M UTC");
                    let _ = writeln!(out, "  Published: {published}");
                    if !item.summary.is_empty() {
                        let _ = writeln!(out, "  {}", item.summary);
                    }
                    let _ = writeln!(
                        out,
                        "  Title sentiment: {}  Summary sentiment: {}",
                        format_sentiment(item.title_sentiment),
                        format_sentiment(item.summary_sentiment)
                    );
                }
            }
            Err(e) => out.push_str(&error_line(e)),
        }

        out
    }

    fn render_chart(&self, chart: &ChartSeries) -> String {
        let values: Vec<f64> = chart.points.iter().map(|&(_, v)| v).collect();
        let mut out = String::new();
        if let (Some((first, _)), Some((last, _)), Some((lo, hi))) =
            (chart.points.first(), chart.points.last(), chart.min_max())
        {
            let _ = writeln!(out, "Adj Close  low {lo:.2}  high {hi:.2}");
            let _ = writeln!(out, "{}", sparkline(&values, self.chart_width));
            let _ = writeln!(out, "{first} .. {last}");
        }
        out
    }

    pub fn render_forecast(&self, view: &ForecastView) -> String {
        let mut out = String::new();
        if let Some(ticker) = &view.ticker {
            let _ = writeln!(out, "Forecast for {ticker}\n");
        }

        let forecast = match &view.outcome {
            Ok(forecast) => forecast,
            Err(e) => {
                out.push_str(&error_line(e));
                return out;
            }
        };

        let mut table = new_table(vec![
            "Quarter".to_string(),
            "Index".to_string(),
            "High".to_string(),
            "Low".to_string(),
        ]);
        for quarter in &forecast.quarters {
            table.add_row(vec![
                quarter.period.to_string(),
                quarter.quarter_index.to_string(),
                format!("{:.2}", quarter.high),
                format!("{:.2}", quarter.low),
            ]);
        }
        let _ = writeln!(out, "Quarterly High and Low Prices:\n{table}");

        let prediction = &forecast.prediction;
        out.push_str("\nPredicted Prices for Next Quarter:\n");
        let _ = writeln!(out, "Predicted High: {:.2}", prediction.future_high);
        let _ = writeln!(out, "Predicted Low: {:.2}", prediction.future_low);
        let _ = writeln!(out, "Final Decision for Next Quarter: {}", forecast.decision);
        out
    }
}

fn statement_table(statement: &FundamentalStatement) -> Table {
    let mut header = vec![match &statement.currency {
        Some(currency) => format!("Line item ({currency})"),
        None => "Line item".to_string(),
    }];
    header.extend(statement.periods.iter().cloned());

    let mut table = new_table(header);
    for row in &statement.rows {
        let mut cells = vec![row.line_item.clone()];
        cells.extend(row.values.iter().map(|v| format_amount(*v)));
        table.add_row(cells);
    }
    table
}
