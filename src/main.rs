//! acme-admission - Validating admission webhook for ACME Orders.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Loads the webhook configuration from the environment
//! - Builds the admission engine and serves it over TLS until shutdown

use std::time::Duration;

use axum_server::Handle;
use tokio::signal;
use tracing::{error, info, warn};

use acme_admission::{AdmissionEngine, WebhookConfig, run_webhook_server};

/// Grace period for in-flight admission requests to complete during shutdown
const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("acme_admission=info".parse()?),
        )
        .json()
        .init();

    info!("Starting acme-admission");

    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A TLS crypto provider was already installed");
    }

    let config = WebhookConfig::from_env();
    if !config.has_certificates() {
        error!(
            cert_file = %config.cert_file.display(),
            key_file = %config.key_file.display(),
            "Webhook certificates not found"
        );
        return Err("webhook certificates not found".into());
    }

    let engine = AdmissionEngine::new();
    for (group, kind) in engine.kinds() {
        info!(group = %group, kind = %kind, "Serving admission validation");
    }

    let handle = Handle::new();
    let server = {
        let handle = handle.clone();
        tokio::spawn(async move { run_webhook_server(&config, engine, handle).await })
    };

    tokio::select! {
        result = server => {
            match result {
                Ok(Ok(())) => info!("Webhook server stopped"),
                Ok(Err(e)) => {
                    error!("Webhook server error: {}", e);
                    return Err(e.into());
                }
                Err(e) => error!("Webhook server task panicked: {}", e),
            }
        }
        // Handle graceful shutdown on SIGTERM or SIGINT
        _ = shutdown_signal() => {
            info!("Received shutdown signal, initiating graceful shutdown...");
            handle.graceful_shutdown(Some(Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS)));
        }
    }

    info!("acme-admission stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal - the webhook cannot shut down
/// gracefully without them. Using expect() here is intentional.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
