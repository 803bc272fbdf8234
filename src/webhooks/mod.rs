//! Webhook module for serving admission requests over HTTPS.
//!
//! The server decodes each AdmissionReview, hands it to the
//! [`AdmissionEngine`](crate::admission::AdmissionEngine) and returns the
//! verdict with any deprecation warnings attached.

mod server;

pub use server::{
    WebhookError, WebhookState, admission_input, create_webhook_router, review_request,
    run_webhook_server,
};

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
