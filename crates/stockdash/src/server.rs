//! Browser surface: one page, two forms

use crate::error::Result;
use crate::flows::{Dashboard, OverviewRequest};
use crate::render::html::{HtmlRenderer, PageQuery, PageView};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use axum::routing::get;
use chrono::Utc;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Immutable state shared by every request
#[derive(Clone)]
pub struct AppState {
    dashboard: Dashboard,
    renderer: Arc<HtmlRenderer>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Result<Self> {
        Ok(Self {
            dashboard,
            renderer: Arc::new(HtmlRenderer::new()?),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OverviewParams {
    pub ticker: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastParams {
    pub ticker: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(overview_page))
        .route("/forecast", get(forecast_page))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Dashboard listening");
    axum::serve(listener, router(state)).await
}

fn respond(state: &AppState, page: &PageView) -> Response {
    match state.renderer.render(page) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn overview_page(
    State(state): State<AppState>,
    Query(params): Query<OverviewParams>,
) -> Response {
    let mut page = PageView {
        query: PageQuery {
            ticker: params.ticker.clone().unwrap_or_default(),
            start: params.start.clone().unwrap_or_default(),
            end: params.end.clone().unwrap_or_default(),
        },
        ..Default::default()
    };

    // First visit: just the forms
    if let Some(ticker) = params.ticker.as_deref() {
        let today = Utc::now().date_naive();
        let start = params.start.as_deref();
        let end = params.end.as_deref();
        match OverviewRequest::from_form(ticker, start, end, today) {
            Ok(request) => {
                page.query.ticker = request.ticker.to_string();
                page.query.start = request.start.to_string();
                page.query.end = request.end.to_string();
                page.overview = Some(state.dashboard.overview(&request).await);
            }
            Err(e) => page.notice = Some(e),
        }
    }

    respond(&state, &page)
}

async fn forecast_page(
    State(state): State<AppState>,
    Query(params): Query<ForecastParams>,
) -> Response {
    let input = params.ticker.unwrap_or_default();
    let forecast = state.dashboard.forecast(&input).await;

    let page = PageView {
        query: PageQuery {
            ticker: forecast
                .ticker
                .as_ref()
                .map_or(input, ToString::to_string),
            ..Default::default()
        },
        forecast: Some(forecast),
        ..Default::default()
    };

    respond(&state, &page)
}

async fn health() -> &'static str {
    "ok"
}
