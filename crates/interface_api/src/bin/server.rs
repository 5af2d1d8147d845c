//! Claim intake API server
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin insurance-claims-api
//!
//! API__PORT=9090 API__DATABASE__URL=postgres://... cargo run --bin insurance-claims-api
//! ```
//!
//! # Environment Variables
//!
//! Nested keys are separated by `__`:
//!
//! * `API__HOST`, `API__PORT` - Bind address (default: 0.0.0.0:8080)
//! * `API__LOG_LEVEL` - Filter used when `RUST_LOG` is unset (default: info)
//! * `API__LOG_FORMAT` - `pretty` or `json`
//! * `API__DATABASE__URL` - PostgreSQL connection string
//! * `API__SINKS__BUCKET_NAME`, `API__SINKS__TABLE_NAME`, `API__SINKS__REGION`,
//!   `API__SINKS__SENDER_ADDRESS`, `API__SINKS__RECIPIENT_ADDRESS`
//! * `API__SMTP__HOST`, `API__SMTP__PORT`, `API__SMTP__USERNAME`, `API__SMTP__PASSWORD`
//! * `API__IMAGE_STORE__ENDPOINT` or `API__IMAGE_STORE__LOCAL_DIR`
//! * `API__CLASSIFIER_SEED` - Makes the stub classifier reproducible

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{Clock, SystemClock};
use domain_claims::{
    ClaimIntakeService, DamageClassifier, IntakePorts, RandomDamageClassifier, RiskScorer,
};
use infra_db::{apply_schema, create_pool, ensure_report_table, PostgresHistoryAdapter, PostgresReportAdapter};
use infra_external::{image_store, SmtpNotifier};
use interface_api::config::{ApiConfig, LogFormat};
use interface_api::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    init_tracing(&config.log_level, config.log_format);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        database = %config.database.redacted_url(),
        table = %config.sinks.table_name,
        bucket = %config.sinks.bucket_name,
        "Starting claim intake API server"
    );

    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    apply_schema(&pool).await.context("failed to apply schema")?;
    ensure_report_table(&pool, &config.sinks.table_name)
        .await
        .context("failed to prepare report table")?;

    let ports = IntakePorts {
        history: Arc::new(PostgresHistoryAdapter::new(pool.clone())),
        reports: Arc::new(PostgresReportAdapter::new(pool.clone(), config.sinks.table_name.clone())?),
        images: image_store(&config.sinks, &config.image_store)?,
        notifier: Arc::new(SmtpNotifier::new(&config.smtp)?),
    };

    let classifier: Arc<dyn DamageClassifier> = match config.classifier_seed {
        Some(seed) => Arc::new(RandomDamageClassifier::seeded(seed)),
        None => Arc::new(RandomDamageClassifier::new()),
    };
    tracing::warn!(classifier = classifier.name(), "Damage classification is a random stub");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let intake = ClaimIntakeService::new(
        classifier,
        RiskScorer::with_clock(clock.clone()),
        ports.clone(),
        config.sinks.clone(),
    );

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server_addr()))?;
    let app = create_router(AppState::new(intake, &ports, clock, config));

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Installs the global subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
