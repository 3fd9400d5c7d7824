pub mod api;

use crate::error::{AppError, Result};
use crate::models::{BreadthConfig, ProxyConfig};
use crate::services::{BreadthAggregator, ChartClient, HttpTransport, QuoteClient, ReqwestTransport};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tracing::error;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub charts: Arc<ChartClient>,
    pub quotes: Arc<QuoteClient>,
    pub breadth: Arc<BreadthAggregator>,
}

impl AppState {
    pub fn new(config: ProxyConfig, breadth_config: BreadthConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let charts = Arc::new(ChartClient::from_config(&config, transport.clone()));
        let quotes = Arc::new(QuoteClient::from_config(&config, transport));
        let breadth = Arc::new(BreadthAggregator::new(charts.clone(), breadth_config));

        Self {
            config: Arc::new(config),
            charts,
            quotes,
            breadth,
        }
    }

    /// Production state over a real HTTP client
    pub fn from_config(config: ProxyConfig) -> Result<Self> {
        let ceiling = config.chart_timeout.max(config.quote_timeout);
        let transport = Arc::new(ReqwestTransport::new(ceiling)?);
        Ok(Self::new(config, BreadthConfig::default(), transport))
    }
}

/// Turn a handler panic into the usual JSON error envelope
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal server error".to_string()
    };

    error!(error = %message, "Handler panicked");
    AppError::Other(message).into_response()
}

pub fn build_router(state: AppState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(cors::Any);

    Router::new()
        .route("/api/data", get(api::data_handler).options(api::options_handler))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer)
        .with_state(state)
}

/// Initialize tracing once per process. `RUST_LOG` wins over the `info` default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init();
}

/// Start the axum server
pub async fn serve(config: ProxyConfig) -> Result<()> {
    tracing::info!("Starting market dashboard proxy");

    let port = config.port;
    tracing::info!(
        chart_endpoints = ?config.chart_endpoints,
        quote_key = config.finnhub_key.is_some(),
        "Upstreams configured"
    );

    let app = build_router(AppState::from_config(config)?);

    tracing::info!("Registering routes:");
    tracing::info!("  GET /api/data?type=quotes&symbols=AAPL,MSFT");
    tracing::info!("  GET /api/data?type=candles&symbols=SPY,__VIX&range=1y");
    tracing::info!("  GET /api/data?type=vix");
    tracing::info!("  GET /api/data?type=breadth");

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
