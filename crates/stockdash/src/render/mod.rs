//! Stateless renderers for overview and forecast views

pub mod html;
pub mod terminal;

pub use html::{HtmlRenderer, PageView};
pub use terminal::TerminalRenderer;

/// Compact amount for statement cells, e.g. `137.18B`
pub fn format_amount(value: Option<f64>) -> String {
    let Some(value) = value else {
        return "n/a".to_string();
    };

    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{value:.2}")
    }
}

/// A fraction shown as a percentage with sign, e.g. `+2.00%`
pub fn format_change(fraction: f64) -> String {
    format!("{:+.2}%", fraction * 100.0)
}

/// Headline sentiment as a signed score with a word
pub fn format_sentiment(score: f64) -> String {
    let label = if score > 0.0 {
        "positive"
    } else if score < 0.0 {
        "negative"
    } else {
        "neutral"
    };
    format!("{score:+.2} ({label})")
}
