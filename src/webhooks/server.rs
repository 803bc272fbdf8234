//! Admission webhook server.
//!
//! Provides the HTTPS endpoint the API server calls for every Order create
//! and update.
//!
//! To enable the webhook:
//! 1. Issue a serving certificate for the webhook service
//! 2. Mount it at /etc/webhook/certs/ (or point `WEBHOOK_TLS_CERT_FILE` and
//!    `WEBHOOK_TLS_PRIVATE_KEY_FILE` at it)
//! 3. Create a ValidatingWebhookConfiguration pointing at `/validate`

use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::admission::{AdmissionEngine, AdmissionInput};
use crate::config::WebhookConfig;

/// Shared state for webhook handlers
pub struct WebhookState {
    pub engine: AdmissionEngine,
}

impl WebhookState {
    pub fn new(engine: AdmissionEngine) -> Self {
        Self { engine }
    }
}

/// Errors that can occur when running the webhook server
#[derive(Debug, Error)]
pub enum WebhookError {
    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(#[source] std::io::Error),

    /// Server error
    #[error("Webhook server error: {0}")]
    Server(#[source] std::io::Error),
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/validate", post(validate))
        .with_state(state)
}

/// Translate an admission request into engine input.
///
/// Objects are re-encoded as JSON so the engine decodes them in the version
/// they were sent in.
pub fn admission_input(
    request: &AdmissionRequest<DynamicObject>,
) -> Result<AdmissionInput, serde_json::Error> {
    Ok(AdmissionInput {
        operation: request.operation.clone(),
        kind: request.kind.clone(),
        request_kind: request.request_kind.clone(),
        old_object: request
            .old_object
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()?,
        object: request.object.as_ref().map(serde_json::to_vec).transpose()?,
    })
}

/// Run the engine against one request and build the response.
pub fn review_request(
    engine: &AdmissionEngine,
    request: &AdmissionRequest<DynamicObject>,
) -> AdmissionResponse {
    let uid = &request.uid;
    let input = match admission_input(request) {
        Ok(input) => input,
        Err(e) => {
            error!(uid = %uid, error = %e, "Failed to encode admission objects");
            return AdmissionResponse::from(request).deny(format!("invalid object: {}", e));
        }
    };

    let verdict = engine.review(&input);
    let mut response = AdmissionResponse::from(request);
    if let Some(message) = verdict.message() {
        warn!(
            uid = %uid,
            namespace = ?request.namespace,
            name = %request.name,
            outcome = ?verdict.outcome(),
            message = %message,
            "Admission request denied"
        );
        response = response.deny(message);
    } else {
        info!(uid = %uid, name = %request.name, "Admission request allowed");
    }

    if !verdict.warnings.is_empty() {
        response.warnings = Some(verdict.warnings);
    }
    response
}

/// Admission webhook handler
async fn validate(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<DynamicObject>>,
) -> impl IntoResponse {
    let request: AdmissionRequest<DynamicObject> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            return (
                StatusCode::BAD_REQUEST,
                Json(
                    AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e))
                        .into_review(),
                ),
            );
        }
    };

    debug!(
        uid = %request.uid,
        operation = ?request.operation,
        kind = %request.kind.kind,
        version = %request.kind.version,
        namespace = ?request.namespace,
        name = %request.name,
        "Processing admission request"
    );

    let response = review_request(&state.engine, &request);
    (StatusCode::OK, Json(response.into_review()))
}

/// Run the webhook server with TLS until `handle` is shut down.
///
/// TLS certificates are loaded from the paths in `config`.
pub async fn run_webhook_server(
    config: &WebhookConfig,
    engine: AdmissionEngine,
    handle: Handle,
) -> Result<(), WebhookError> {
    let app = create_webhook_router(Arc::new(WebhookState::new(engine)));

    let tls = RustlsConfig::from_pem_file(&config.cert_file, &config.key_file)
        .await
        .map_err(WebhookError::TlsConfig)?;

    let addr = config.socket_addr();
    info!(address = %addr, "Webhook server listening with TLS");

    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(WebhookError::Server)?;

    Ok(())
}
