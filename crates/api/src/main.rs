use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use saltwatch_api::background;
use saltwatch_api::config::{MonitorConfig, ServerConfig};
use saltwatch_api::router::build_app_router;
use saltwatch_api::state::AppState;
use saltwatch_notify::{EmailConfig, Notifier, SmtpNotifier};
use saltwatch_store::{MeasurementLog, StateStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "saltwatch_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let monitor = MonitorConfig::load(&config.monitor_config_path)
        .expect("Failed to load monitor configuration");
    tracing::info!(
        recipient = %monitor.email_recipient,
        state_path = %monitor.state_path.display(),
        "Loaded monitor configuration"
    );

    // --- State store ---
    let store = Arc::new(StateStore::new(&monitor.state_path));
    store
        .load()
        .await
        .expect("Scale state file unreadable at startup");
    tracing::info!("Scale state check passed");

    let log = Arc::new(MeasurementLog::new(&monitor.log_path));

    // --- Notifier ---
    let notifier: Option<Arc<dyn Notifier>> = match EmailConfig::from_env() {
        Some(email) => Some(Arc::new(SmtpNotifier::new(email)) as Arc<dyn Notifier>),
        None => {
            tracing::warn!("SMTP_HOST not set, notifications will be logged and skipped");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        monitor: Arc::new(monitor),
        store,
        log,
        notifier,
    };

    // --- Periodic level check ---
    let check_cancel = tokio_util::sync::CancellationToken::new();
    let check_handle = tokio::spawn(background::level_check::run(
        state.clone(),
        config.check_interval_secs,
        check_cancel.clone(),
    ));
    tracing::info!("Level check task spawned");

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    check_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), check_handle).await;
    tracing::info!("Level check task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
