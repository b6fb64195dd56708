//! Command-line interface for stockdash
//!
//! # Usage
//!
//! ```bash
//! export ALPHA_VANTAGE_API_KEY=...
//! export FINNHUB_API_KEY=...
//!
//! stockdash overview AAPL --start 2024-01-01 --end 2024-06-30
//! stockdash forecast AAPL
//! stockdash serve --addr 127.0.0.1:8501
//! stockdash shell
//! ```

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use stockdash::server::{self, AppState};
use stockdash::{Command, Dashboard, DashboardConfig, OverviewRequest, TerminalRenderer};
use stockdash_utils::{LogFormat, init_tracing};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stockdash")]
#[command(about = "Stock dashboard: prices, fundamentals, news and a trend forecast", long_about = None)]
struct Args {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Price chart, return/risk summary, statements and news
    Overview {
        ticker: String,
        /// YYYY-MM-DD, defaults to one year before the end date
        #[arg(long)]
        start: Option<String>,
        /// YYYY-MM-DD (exclusive), defaults to today
        #[arg(long)]
        end: Option<String>,
    },
    /// Quarterly high/low trend forecast with a recommendation
    Forecast { ticker: String },
    /// Serve the dashboard page over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8501")]
        addr: SocketAddr,
    },
    /// Interactive loop
    Shell,
}

fn print_banner() {
    println!(
        r"
╔══════════════════════════════════════════════════════╗
║                   Stock Dashboard                    ║
║                                                      ║
║  Commands:                                           ║
║    overview <ticker> [start] [end]                   ║
║    predict <ticker>                                  ║
║    help                                              ║
║    exit                                              ║
╚══════════════════════════════════════════════════════╝
"
    );
}

async fn overview(
    dashboard: &Dashboard,
    renderer: &TerminalRenderer,
    ticker: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> String {
    let today = Utc::now().date_naive();
    match OverviewRequest::from_form(ticker, start, end, today) {
        Ok(request) => renderer.render_overview(&dashboard.overview(&request).await),
        Err(e) => format!("❌ {e}\n"),
    }
}

async fn run_shell(dashboard: &Dashboard, renderer: &TerminalRenderer) -> anyhow::Result<()> {
    print_banner();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("stockdash> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        if input.trim().is_empty() {
            continue;
        }

        match Command::parse(&input) {
            Ok(Command::Overview { ticker, start, end }) => {
                let text =
                    overview(dashboard, renderer, &ticker, start.as_deref(), end.as_deref()).await;
                println!("{text}");
            }
            Ok(Command::Predict { ticker }) => {
                println!("{}", renderer.render_forecast(&dashboard.forecast(&ticker).await));
            }
            Ok(Command::Help) => println!("{}", Command::help_text()),
            Ok(Command::Exit) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => eprintln!("❌ {e}\n"),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(LogFormat::from_json_flag(args.log_json));

    let config = DashboardConfig::from_env()?;
    if config.alpha_vantage_api_key.is_none() {
        info!("ALPHA_VANTAGE_API_KEY not set; fundamental data will be unavailable");
    }
    if config.finnhub_api_key.is_none() {
        info!("FINNHUB_API_KEY not set; news will be unavailable");
    }

    let dashboard = Dashboard::from_config(config)?;
    let renderer = TerminalRenderer::default();

    match args.command {
        Commands::Overview { ticker, start, end } => {
            let text =
                overview(&dashboard, &renderer, &ticker, start.as_deref(), end.as_deref()).await;
            println!("{text}");
        }
        Commands::Forecast { ticker } => {
            println!("{}", renderer.render_forecast(&dashboard.forecast(&ticker).await));
        }
        Commands::Serve { addr } => {
            let state = AppState::new(dashboard)?;
            server::serve(state, addr).await?;
        }
        Commands::Shell => run_shell(&dashboard, &renderer).await?,
    }

    Ok(())
}
