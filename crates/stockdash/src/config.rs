//! Configuration for dashboard flows

use crate::analysis::{QuarterIndexing, Thresholds};
use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Environment variable holding the Alpha Vantage key
pub const ALPHA_VANTAGE_KEY_VAR: &str = "ALPHA_VANTAGE_API_KEY";
/// Environment variable holding the Finnhub key
pub const FINNHUB_KEY_VAR: &str = "FINNHUB_API_KEY";

/// An API credential supplied from outside the process.
///
/// `Debug` never prints the secret and it is never serialized.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key. Blank keys are rejected.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(DashboardError::Config("credential must not be blank".to_string()));
        }
        Ok(Self(key))
    }

    /// Read a credential from an environment variable, if set and non-blank
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var).ok().and_then(|key| Self::new(key).ok())
    }

    /// The raw secret, for building requests
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Configuration for dashboard flows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Alpha Vantage API key, used for fundamental statements
    #[serde(default, skip_serializing)]
    pub alpha_vantage_api_key: Option<Credential>,

    /// Finnhub API key, used for company news
    #[serde(default, skip_serializing)]
    pub finnhub_api_key: Option<Credential>,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Years of daily history fed to the forecast
    pub forecast_lookback_years: u32,

    /// Days of company news to request
    pub news_lookback_days: u32,

    /// Number of news items shown
    pub news_limit: usize,

    /// How quarters are numbered before the regression
    pub quarter_indexing: QuarterIndexing,

    /// Buy/Sell ratios for the classifier
    pub thresholds: Thresholds,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: None,
            finnhub_api_key: None,
            request_timeout: Duration::from_secs(30),
            forecast_lookback_years: 4,
            news_lookback_days: 7,
            news_limit: 10,
            quarter_indexing: QuarterIndexing::Emitted,
            thresholds: Thresholds::default(),
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Defaults plus credentials from the environment
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env_keys().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.forecast_lookback_years == 0 {
            return Err(DashboardError::Config(
                "forecast_lookback_years must be greater than 0".to_string(),
            ));
        }

        if self.news_lookback_days == 0 {
            return Err(DashboardError::Config(
                "news_lookback_days must be greater than 0".to_string(),
            ));
        }

        if self.news_limit == 0 {
            return Err(DashboardError::Config(
                "news_limit must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(DashboardError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        self.thresholds.validate()
    }
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    alpha_vantage_api_key: Option<Credential>,
    finnhub_api_key: Option<Credential>,
    request_timeout: Option<Duration>,
    forecast_lookback_years: Option<u32>,
    news_lookback_days: Option<u32>,
    news_limit: Option<usize>,
    quarter_indexing: Option<QuarterIndexing>,
    thresholds: Option<Thresholds>,
}

impl DashboardConfigBuilder {
    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: Credential) -> Self {
        self.alpha_vantage_api_key = Some(key);
        self
    }

    /// Set Finnhub API key
    pub fn finnhub_api_key(mut self, key: Credential) -> Self {
        self.finnhub_api_key = Some(key);
        self
    }

    /// Load both API keys from the environment, keeping any already set
    pub fn with_env_keys(mut self) -> Self {
        if self.alpha_vantage_api_key.is_none() {
            self.alpha_vantage_api_key = Credential::from_env(ALPHA_VANTAGE_KEY_VAR);
        }
        if self.finnhub_api_key.is_none() {
            self.finnhub_api_key = Credential::from_env(FINNHUB_KEY_VAR);
        }
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set forecast history length in years
    pub fn forecast_lookback_years(mut self, years: u32) -> Self {
        self.forecast_lookback_years = Some(years);
        self
    }

    /// Set news window in days
    pub fn news_lookback_days(mut self, days: u32) -> Self {
        self.news_lookback_days = Some(days);
        self
    }

    /// Set the number of news items shown
    pub fn news_limit(mut self, limit: usize) -> Self {
        self.news_limit = Some(limit);
        self
    }

    /// Set the quarter numbering scheme
    pub fn quarter_indexing(mut self, indexing: QuarterIndexing) -> Self {
        self.quarter_indexing = Some(indexing);
        self
    }

    /// Set classifier thresholds
    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let defaults = DashboardConfig::default();

        let config = DashboardConfig {
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            finnhub_api_key: self.finnhub_api_key,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            forecast_lookback_years: self
                .forecast_lookback_years
                .unwrap_or(defaults.forecast_lookback_years),
            news_lookback_days: self.news_lookback_days.unwrap_or(defaults.news_lookback_days),
            news_limit: self.news_limit.unwrap_or(defaults.news_limit),
            quarter_indexing: self.quarter_indexing.unwrap_or(defaults.quarter_indexing),
            thresholds: self.thresholds.unwrap_or(defaults.thresholds),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.forecast_lookback_years, 4);
        assert_eq!(config.news_limit, 10);
        assert_eq!(config.quarter_indexing, QuarterIndexing::Emitted);
        assert!(config.alpha_vantage_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialized_config_omits_keys() {
        let config = DashboardConfig::builder()
            .alpha_vantage_api_key(Credential::new("av-secret-123").unwrap())
            .finnhub_api_key(Credential::new("fh-secret-456").unwrap())
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("av-secret-123"));
        assert!(!json.contains("fh-secret-456"));
        assert!(!json.contains("api_key"));

        let restored: DashboardConfig = serde_json::from_str(&json).unwrap();
        assert!(restored.alpha_vantage_api_key.is_none());
        assert_eq!(restored.news_limit, config.news_limit);
    }

    #[test]
    fn test_config_builder() {
        let config = DashboardConfig::builder()
            .alpha_vantage_api_key(Credential::new("av-key").unwrap())
            .forecast_lookback_years(2)
            .request_timeout(Duration::from_secs(5))
            .quarter_indexing(QuarterIndexing::Calendar)
            .build()
            .unwrap();

        assert_eq!(config.forecast_lookback_years, 2);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.quarter_indexing, QuarterIndexing::Calendar);
        assert_eq!(
            config.alpha_vantage_api_key.as_ref().map(Credential::expose),
            Some("av-key")
        );
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        assert!(DashboardConfig::builder().news_limit(0).build().is_err());
        assert!(
            DashboardConfig::builder()
                .forecast_lookback_years(0)
                .build()
                .is_err()
        );
        assert!(DashboardConfig::builder().news_lookback_days(0).build().is_err());
    }

    #[test]
    fn test_validation_rejects_inverted_thresholds() {
        let config = DashboardConfig {
            thresholds: Thresholds {
                buy_ratio: 0.9,
                sell_ratio: 1.1,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credential_is_redacted() {
        let key = Credential::new("super-secret").unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("super-secret"));
        assert_eq!(key.expose(), "super-secret");
    }

    #[test]
    fn test_blank_credential_rejected() {
        assert!(Credential::new("   ").is_err());
    }
}
