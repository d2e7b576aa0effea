pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notify;
pub mod response;
pub mod router;
pub mod state;

use tokio::net::TcpListener;
use tokio::signal;

pub use error::{ApiError, ServerError};
pub use router::build_routes;
pub use state::AppState;

/// Serves the API on `host:port` until Ctrl+C or SIGTERM.
pub async fn listen(state: AppState, host: &str, port: u16) -> Result<(), ServerError> {
    let notifier = notify::spawn_notifier(state.lifecycle.events());

    let address = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Listening at {}", address);

    axum::serve(listener, build_routes(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    notifier.abort();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
