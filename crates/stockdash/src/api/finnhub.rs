//! Finnhub company news, scored with the lexicon sentiment scorer

use super::NewsSource;
use crate::config::{Credential, DashboardConfig, FINNHUB_KEY_VAR};
use crate::error::{DashboardError, Result};
use crate::models::{NewsItem, Ticker};
use crate::sentiment::SentimentScorer;
use async_trait::async_trait;
use chrono::{DateTime, Days, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const COMPANY_NEWS_URL: &str = "https://finnhub.io/api/v1/company-news";
const PROVIDER: &str = "Finnhub";

/// Finnhub news article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinnhubNewsArticle {
    /// Publish time (UNIX timestamp)
    pub datetime: i64,
    /// News headline
    pub headline: String,
    /// Article summary
    #[serde(default)]
    pub summary: String,
    /// News source
    #[serde(default)]
    pub source: String,
    /// Article URL
    #[serde(default)]
    pub url: String,
}

/// Finnhub client for company news
#[derive(Debug, Clone)]
pub struct FinnhubClient {
    client: Client,
    api_key: Option<Credential>,
    lookback_days: u32,
    scorer: SentimentScorer,
}

impl FinnhubClient {
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.finnhub_api_key.clone(),
            lookback_days: config.news_lookback_days,
            scorer: SentimentScorer::new(),
        })
    }

    /// Get raw company news between two dates (YYYY-MM-DD)
    pub async fn get_company_news(
        &self,
        ticker: &Ticker,
        from: &str,
        to: &str,
    ) -> Result<Vec<FinnhubNewsArticle>> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            DashboardError::Config(format!("{FINNHUB_KEY_VAR} is not set; news is unavailable"))
        })?;

        let response = self
            .client
            .get(COMPANY_NEWS_URL)
            .query(&[
                ("symbol", ticker.as_str()),
                ("from", from),
                ("to", to),
                ("token", api_key.expose()),
            ])
            .send()
            .await
            .map_err(|e| DashboardError::fetch(PROVIDER, format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DashboardError::fetch(
                PROVIDER,
                format!("API error {status}: {body}"),
            ));
        }

        response
            .json::<Vec<FinnhubNewsArticle>>()
            .await
            .map_err(|e| DashboardError::fetch(PROVIDER, format!("failed to parse response: {e}")))
    }

    /// Score each article. The overview flow orders and limits them.
    fn to_items(&self, articles: Vec<FinnhubNewsArticle>) -> Vec<NewsItem> {
        articles
            .into_iter()
            .filter_map(|article| {
                let published_at = DateTime::<Utc>::from_timestamp(article.datetime, 0)?;
                Some(NewsItem {
                    published_at,
                    title_sentiment: self.scorer.score(&article.headline),
                    summary_sentiment: self.scorer.score(&article.summary),
                    title: article.headline,
                    summary: article.summary,
                    source: Some(article.source).filter(|s| !s.is_empty()),
                    url: web_link(article.url),
                })
            })
            .collect()
    }
}

/// Only plain web links are kept for rendering
fn web_link(url: String) -> Option<String> {
    let lower = url.trim_start().to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")).then_some(url)
}

#[async_trait]
impl NewsSource for FinnhubClient {
    async fn fetch_news(&self, ticker: &Ticker) -> Result<Vec<NewsItem>> {
        let to = Utc::now().date_naive();
        let from = to
            .checked_sub_days(Days::new(u64::from(self.lookback_days)))
            .unwrap_or(to);
        debug!(%ticker, %from, %to, "Fetching company news");

        let articles = self
            .get_company_news(ticker, &from.to_string(), &to.to_string())
            .await?;
        debug!(%ticker, count = articles.len(), "Fetched company news");

        Ok(self.to_items(articles))
    }
}
