//! Canonical model for the `acme.cert-manager.io` API group.
//!
//! Every served wire version (`v1alpha2`, `v1alpha3`, `v1beta1`, `v1`) converts
//! into these types before validation. Field names used in validation paths are
//! the serialized names of this model, so error paths are identical whichever
//! version the caller used.
//!
//! Scalars that have an "unset" state distinct from their zero value (the
//! authorization `wildcard` flag, the order `state`) are `Option`s; everything
//! else uses its zero value to mean unset.

pub mod v1;
pub mod v1alpha2;
pub mod v1alpha3;
pub mod v1beta1;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// API group of all ACME resources.
pub const GROUP: &str = "acme.cert-manager.io";

/// Kind name of the Order resource.
pub const ORDER_KIND: &str = "Order";

/// Stable version every deprecated version should migrate to.
pub const STABLE_VERSION: &str = "v1";

// ============================================================================
// Order
// ============================================================================

/// Version-independent representation of an ACME Order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Order {
    /// Standard object metadata. Never inspected by validation.
    pub metadata: ObjectMeta,

    /// Caller-supplied intent.
    pub spec: OrderSpec,

    /// State computed by the ACME protocol driver.
    pub status: OrderStatus,
}

/// Desired state of an Order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSpec {
    /// DER encoded certificate signing request.
    pub request: Vec<u8>,

    /// Issuer that will sign the certificate.
    pub issuer_ref: IssuerReference,

    pub common_name: String,

    pub dns_names: Vec<String>,

    pub ip_addresses: Vec<String>,

    /// Requested certificate lifetime, in Go duration notation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Reference to the issuer of an Order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IssuerReference {
    pub name: String,
    pub kind: String,
    pub group: String,
}

/// Observed state of an Order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    /// URL of the Order resource on the ACME server.
    pub url: String,

    /// URL used to finalize the Order once all authorizations are valid.
    #[serde(rename = "finalizeURL")]
    pub finalize_url: String,

    /// PEM encoded certificate chain returned by the ACME server.
    pub certificate: Vec<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,

    pub reason: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_time: Option<String>,

    /// Authorizations that must be completed before the Order can be finalized.
    pub authorizations: Vec<AcmeAuthorization>,
}

/// One authorization an ACME server requires for an Order.
///
/// Authorizations have no key of their own; they are identified by their
/// position in [`OrderStatus::authorizations`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcmeAuthorization {
    pub url: String,

    /// DNS name or IP address being authorized.
    pub identifier: String,

    /// Unset, explicitly false and explicitly true are three distinct states.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<State>,

    pub challenges: Vec<AcmeChallenge>,
}

/// One challenge offered for an authorization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AcmeChallenge {
    pub url: String,
    pub token: String,
    /// Challenge type as named by the ACME server, e.g. `HTTP-01`.
    #[serde(rename = "type")]
    pub r#type: String,
}

/// ACME Order or Authorization state.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Valid,
    Ready,
    Pending,
    Processing,
    Invalid,
    Expired,
    Errored,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Valid => write!(f, "valid"),
            State::Ready => write!(f, "ready"),
            State::Pending => write!(f, "pending"),
            State::Processing => write!(f, "processing"),
            State::Invalid => write!(f, "invalid"),
            State::Expired => write!(f, "expired"),
            State::Errored => write!(f, "errored"),
        }
    }
}
