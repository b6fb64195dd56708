//! Error types for dashboard flows

use thiserror::Error;

/// Errors produced while building a dashboard view
///
/// None of these are fatal: flows store them per section and the
/// renderers turn them into a message next to the affected tab.
#[derive(Debug, Clone, Error)]
pub enum DashboardError {
    /// The price source returned no bars for the ticker and range
    #[error("No data found for {ticker} in the requested range. Please try again.")]
    EmptyData { ticker: String },

    /// A computation was handed an empty input sequence
    #[error("Empty input: no {0} to process")]
    EmptyInput(&'static str),

    /// An expected price field is absent
    #[error("{field} data not available for {ticker}.")]
    MissingField { ticker: String, field: String },

    /// Not enough observations for the requested computation
    #[error("Insufficient data: need at least {required} {what}, got {actual}")]
    InsufficientData {
        what: &'static str,
        required: usize,
        actual: usize,
    },

    /// A call to an external data provider failed
    #[error("Error fetching data from {provider}: {message}")]
    ExternalFetch { provider: String, message: String },

    /// User input was rejected before any fetch happened
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rendering a view failed
    #[error("Render error: {0}")]
    Render(String),
}

impl DashboardError {
    /// Build an `ExternalFetch` error for a provider
    pub fn fetch(provider: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::ExternalFetch {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    /// Short machine-friendly tag, used by the HTML renderer for styling
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyData { .. } => "empty-data",
            Self::EmptyInput(_) => "empty-input",
            Self::MissingField { .. } => "missing-field",
            Self::InsufficientData { .. } => "insufficient-data",
            Self::ExternalFetch { .. } => "external-fetch",
            Self::InvalidInput(_) => "invalid-input",
            Self::Config(_) => "config",
            Self::Render(_) => "render",
        }
    }
}

impl From<minijinja::Error> for DashboardError {
    fn from(err: minijinja::Error) -> Self {
        DashboardError::Render(err.to_string())
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
