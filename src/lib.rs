//! acme-admission library crate
//!
//! Admission validation for the `acme.cert-manager.io` Order resource across
//! every served API version: a scheme of wire versions converting into one
//! canonical model, an immutable-field validator, a deprecation advisory and
//! the engine and webhook server that tie them together.

pub mod admission;
pub mod apis;
pub mod config;
pub mod scheme;
pub mod validation;
pub mod webhooks;

pub use admission::{AdmissionEngine, AdmissionInput, Outcome, Verdict};
pub use config::{WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT, WebhookConfig};
pub use scheme::{ConversionError, Convertible, Scheme};
pub use validation::{DeprecationTable, FieldError, FieldErrorList, WarningList};
pub use webhooks::{WebhookError, run_webhook_server};
