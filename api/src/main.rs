use api::routes::{app, frontend::FrontendFiles};
use api::state::AppState;
use std::net::SocketAddr;
use std::process::ExitCode;
use tokio::signal;
use tracing::{error, info};
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling,
};
use util::config;

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration and initialize logging
    let _log_guard = init_logging(&config::log_file(), &config::log_level());

    // Connect to the document store (and warehouse, if enabled)
    let app_state = match AppState::init().await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialise backend services: {e}");
            eprintln!("Failed to initialise backend services: {e}");
            return ExitCode::FAILURE;
        }
    };

    let app = app(app_state.clone(), FrontendFiles::from_config());

    // Start server
    let addr: SocketAddr = format!("{}:{}", config::host(), config::port())
        .parse()
        .expect("Invalid address");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    println!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
    );
    info!(env = %config::env(), store = app_state.store().backend(), "Server is live at http://{addr}");
    if let Some(project) = app_state.project_id() {
        info!("Connected to Firebase project {project}");
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server crashed");

    app_state.shutdown().await;
    info!("Server stopped");
    ExitCode::SUCCESS
}

/// Daily-rolling file writer. Buffered lines are flushed when the guard drops,
/// so `main` returns instead of exiting.
fn file_writer(dir: &str, log_file: &str) -> (NonBlocking, WorkerGuard) {
    std::fs::create_dir_all(dir).ok();
    tracing_appender::non_blocking(rolling::daily(dir, log_file))
}

fn init_logging(log_file: &str, log_level: &str) -> WorkerGuard {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let (file_writer, guard) = file_writer("logs", log_file);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = config::log_to_stdout().then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
            .with_thread_ids(true)
    });

    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("api=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
