//! Email Validation & Scoring API Server
//!
//! Thin HTTP surface over the mailgrade engine: single-address validation,
//! bulk batch submission with live progress, and delimited-text export.

use axum::Router;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use mailgrade_core::{
    catch_all::{CatchAllProbe, DisabledProbe, SmtpCatchAllProbe},
    dns::DomainResolver,
    reputation::StaticReputation,
    BulkValidator, EmailValidator, MemoryStore, ReferenceSets,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api_handler;
mod config;
mod routes;

use config::AppConfig;

/// Shared application state
pub struct AppState {
    pub validator: Arc<EmailValidator>,
    pub bulk: Arc<BulkValidator>,
    pub store: Arc<MemoryStore>,
    pub resolver: Arc<DomainResolver>,
    pub config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    init_tracing(&config);

    info!("starting mailgrade API v{}", env!("CARGO_PKG_VERSION"));

    let engine_config: mailgrade_core::EngineConfig = (&config.engine).into();

    let resolver = Arc::new(DomainResolver::new(
        engine_config.dns_timeout_ms,
        engine_config.dns_attempts,
        engine_config.dns_cache_ttl_ms,
    ));

    let prober: Arc<dyn CatchAllProbe> = if engine_config.enable_catch_all_probe {
        Arc::new(SmtpCatchAllProbe::new(
            engine_config.probe_timeout_ms,
            engine_config.probe_min_interval_ms,
        ))
    } else {
        Arc::new(DisabledProbe)
    };

    let validator = Arc::new(EmailValidator::with_parts(
        Arc::new(ReferenceSets::builtin()),
        Arc::clone(&resolver) as Arc<dyn mailgrade_core::dns::ResolveDomain>,
        prober,
        Arc::new(StaticReputation::builtin()),
    ));

    let store = Arc::new(MemoryStore::new());
    let bulk = Arc::new(BulkValidator::new(
        Arc::clone(&validator),
        Arc::clone(&store),
        engine_config.worker_concurrency,
    ));

    let state = Arc::new(AppState {
        validator,
        bulk,
        store,
        resolver,
        config: Arc::new(config.clone()),
    });

    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("server listening on {}", addr);
    info!("single validation: POST http://{}/v1/validate", addr);
    info!("batch submission:  POST http://{}/v1/lists", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down gracefully");
    Ok(())
}

/// Create the main application router
fn create_router(state: Arc<AppState>) -> Router {
    routes::build_routes(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers(tower_http::cors::Any),
        )
        .layer(CompressionLayer::new())
}

/// Load application configuration from defaults, file, and environment
fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if std::path::Path::new("Config.toml").exists() {
        figment = figment.merge(Toml::file("Config.toml"));
    }

    figment = figment.merge(Env::prefixed("MAILGRADE_").split("_"));

    Ok(figment.extract()?)
}

/// Initialize tracing and logging
fn init_tracing(config: &AppConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.observability.log_level.clone().into());

    if config.observability.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("received SIGTERM, starting graceful shutdown");
        },
    }
}
