//! Command parsing for the interactive shell

use crate::error::{DashboardError, Result};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Prices, statements and news
    Overview {
        ticker: String,
        start: Option<String>,
        end: Option<String>,
    },
    /// Quarterly trend forecast
    Predict { ticker: String },
    /// Show help
    Help,
    /// Leave the shell
    Exit,
}

impl Command {
    /// Parse a command from user input; a leading `/` is optional
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let input = input.strip_prefix('/').unwrap_or(input);

        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            return Err(DashboardError::InvalidInput("Empty command".to_string()));
        };

        let ticker = |name: &str| {
            args.first().map(|t| (*t).to_string()).ok_or_else(|| {
                DashboardError::InvalidInput(format!("Missing ticker for {name} command"))
            })
        };

        match cmd.to_lowercase().as_str() {
            "overview" | "o" => {
                if args.len() > 3 {
                    return Err(DashboardError::InvalidInput(
                        "Usage: overview <ticker> [start] [end]".to_string(),
                    ));
                }
                Ok(Command::Overview {
                    ticker: ticker("overview")?,
                    start: args.get(1).map(|s| (*s).to_string()),
                    end: args.get(2).map(|s| (*s).to_string()),
                })
            }
            "predict" | "forecast" | "p" => Ok(Command::Predict {
                ticker: ticker("predict")?,
            }),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            other => Err(DashboardError::InvalidInput(format!(
                "Unknown command: {other}. Type 'help' for a list of commands."
            ))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Stock Dashboard Commands
========================

  overview <ticker> [start] [end]   Price chart, returns, fundamentals, news
                                    Dates are YYYY-MM-DD; default is the last year
  predict <ticker>                  Quarterly trend forecast and recommendation
  help                              Show this help
  exit                              Leave the shell

Aliases: o = overview, p = predict, q = exit
"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overview() {
        let cmd = Command::parse("overview aapl 2024-01-01").unwrap();
        assert_eq!(
            cmd,
            Command::Overview {
                ticker: "aapl".to_string(),
                start: Some("2024-01-01".to_string()),
                end: None,
            }
        );

        let cmd = Command::parse("/o MSFT 2024-01-01 2024-06-30").unwrap();
        assert!(matches!(cmd, Command::Overview { end: Some(_), .. }));
    }

    #[test]
    fn test_parse_predict() {
        let cmd = Command::parse("predict tsla").unwrap();
        assert_eq!(
            cmd,
            Command::Predict {
                ticker: "tsla".to_string()
            }
        );
        assert_eq!(Command::parse("p tsla").unwrap(), cmd);
    }

    #[test]
    fn test_parse_missing_arg() {
        assert!(Command::parse("predict").is_err());
        assert!(Command::parse("overview").is_err());
        assert!(Command::parse("overview a b c d").is_err());
    }

    #[test]
    fn test_parse_help_and_exit() {
        assert_eq!(Command::parse("help").unwrap(), Command::Help);
        assert_eq!(Command::parse("/exit").unwrap(), Command::Exit);
        assert_eq!(Command::parse("QUIT").unwrap(), Command::Exit);
    }

    #[test]
    fn test_parse_unknown_and_empty() {
        assert!(Command::parse("   ").is_err());
        assert!(Command::parse("analyze AAPL").is_err());
    }
}
