//! Walkledger webhook server entry point.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use walkledger_api::config::Config;
use walkledger_api::error::AppError;
use walkledger_api::state::AppState;
use walkledger_api::telemetry;
use walkledger_core::clock::{Clock, SystemClock};
use walkledger_core::repository::LedgerRepository;
use walkledger_core::upstream::ActivityClient;
use walkledger_processing::application::worker::{self, ActivityWorker};
use walkledger_store::sqlite_ledger_repository::SqliteLedgerRepository;
use walkledger_store::{pool, schema};
use walkledger_strava::StravaClient;

const MAX_DB_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let tracer_provider = telemetry::init(config.otel_endpoint.as_deref())?;

    info!(?config, "Starting walkledger webhook server");

    let result = serve(config).await;
    if let Err(err) = &result {
        error!(error = %err, "server exited with error");
    }

    telemetry::shutdown(tracer_provider);
    result
}

async fn serve(config: Config) -> Result<(), AppError> {
    let pool = pool::connect(&config.database_url, MAX_DB_CONNECTIONS).await?;
    schema::ensure_schema(&pool).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ledger: Arc<dyn LedgerRepository> = Arc::new(SqliteLedgerRepository::new(pool.clone()));
    let client: Arc<dyn ActivityClient> = Arc::new(StravaClient::new(
        config.strava_api_base_url.as_str(),
        config.strava_access_token.as_str(),
    )?);

    let shutdown = CancellationToken::new();
    let (queue, receiver) = worker::queue(config.worker_queue_capacity);
    let activity_worker =
        ActivityWorker::new(clock, Arc::clone(&ledger), client, Arc::new(config.rules.clone()));
    let worker_handle = tokio::spawn(activity_worker.run(receiver, shutdown.clone()));

    let app = walkledger_api::app(AppState::new(
        ledger,
        queue,
        config.strava_verify_token.clone(),
    ));

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    if let Err(err) = worker_handle.await {
        error!(error = %err, "activity worker task failed");
    }
    pool.close().await;
    info!("walkledger stopped");

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM and cancels `token`.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("shutdown signal received");
    token.cancel();
}
