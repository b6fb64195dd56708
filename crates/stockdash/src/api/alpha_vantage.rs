//! Alpha Vantage annual financial statements

use super::FundamentalsSource;
use crate::config::{Credential, DashboardConfig};
use crate::error::{DashboardError, Result};
use crate::models::{FundamentalStatement, StatementKind, StatementRow, Ticker};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

/// Metadata keys that are not line items
const FISCAL_DATE_KEY: &str = "fiscalDateEnding";
const CURRENCY_KEY: &str = "reportedCurrency";

fn function_name(kind: StatementKind) -> &'static str {
    match kind {
        StatementKind::BalanceSheet => "BALANCE_SHEET",
        StatementKind::IncomeStatement => "INCOME_STATEMENT",
        StatementKind::CashFlow => "CASH_FLOW",
    }
}

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: Option<Credential>,
}

impl AlphaVantageClient {
    /// Create a client; without a key every request fails with a config error
    pub fn new(api_key: Option<Credential>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, api_key })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Self::new(config.alpha_vantage_api_key.clone(), config.request_timeout)
    }

    fn api_key(&self) -> Result<&Credential> {
        self.api_key.as_ref().ok_or_else(|| {
            DashboardError::Config(format!(
                "{} is not set; fundamental data is unavailable",
                crate::config::ALPHA_VANTAGE_KEY_VAR
            ))
        })
    }
}

#[async_trait]
impl FundamentalsSource for AlphaVantageClient {
    async fn fetch_statement(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
    ) -> Result<FundamentalStatement> {
        let api_key = self.api_key()?;
        debug!(%ticker, statement = kind.title(), "Fetching statement");

        let params = [
            ("function", function_name(kind)),
            ("symbol", ticker.as_str()),
            ("apikey", api_key.expose()),
        ];

        let response = self
            .client
            .get(BASE_URL)
            .query(&params)
            .send()
            .await
            .map_err(|e| DashboardError::fetch(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(DashboardError::fetch(
                PROVIDER,
                format!("HTTP error: {}", response.status()),
            ));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| DashboardError::fetch(PROVIDER, e))?;

        parse_statement(ticker, kind, &data)
    }
}

/// Turn a statement payload into a table of line items by fiscal period
pub fn parse_statement(
    ticker: &Ticker,
    kind: StatementKind,
    data: &Value,
) -> Result<FundamentalStatement> {
    // Check for API error messages
    for key in ["Error Message", "Note", "Information"] {
        if let Some(message) = data.get(key) {
            let message = message.as_str().map_or_else(|| message.to_string(), str::to_string);
            return Err(DashboardError::fetch(PROVIDER, message));
        }
    }

    let reports = data
        .get("annualReports")
        .and_then(Value::as_array)
        .filter(|reports| !reports.is_empty())
        .ok_or_else(|| {
            DashboardError::fetch(
                PROVIDER,
                format!("no annual {} reported for {ticker}", kind.title().to_lowercase()),
            )
        })?;

    let periods: Vec<String> = reports
        .iter()
        .map(|report| text_field(report, FISCAL_DATE_KEY).unwrap_or_default())
        .collect();
    let currency = reports.iter().find_map(|report| text_field(report, CURRENCY_KEY));

    // Line items in first-seen order across all reports
    let mut line_items: Vec<&str> = Vec::new();
    for report in reports {
        let Some(fields) = report.as_object() else {
            continue;
        };
        for key in fields.keys() {
            if key != FISCAL_DATE_KEY && key != CURRENCY_KEY && !line_items.contains(&key.as_str())
            {
                line_items.push(key);
            }
        }
    }

    let rows = line_items
        .into_iter()
        .map(|item| StatementRow {
            line_item: item.to_string(),
            values: reports.iter().map(|report| numeric_field(report, item)).collect(),
        })
        .collect();

    Ok(FundamentalStatement {
        kind,
        currency,
        periods,
        rows,
    })
}

fn text_field(report: &Value, key: &str) -> Option<String> {
    report
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty() && *s != "None")
        .map(str::to_string)
}

/// Values arrive as strings; "None" and unparseable text are absent
fn numeric_field(report: &Value, key: &str) -> Option<f64> {
    match report.get(key)? {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
