//! `acme.cert-manager.io/v1`, the stable version of the Order API.
//!
//! The status types declared here have kept the same shape since `v1alpha2`
//! and are shared by every served version of Order.

use k8s_openapi::ByteString;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::State;
use crate::scheme::Convertible;

/// Default kind of a referenced issuer.
pub const DEFAULT_ISSUER_KIND: &str = "Issuer";

/// Default group of a referenced issuer.
pub const DEFAULT_ISSUER_GROUP: &str = "cert-manager.io";

/// Order is a type to represent an Order with an ACME server.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "acme.cert-manager.io",
    version = "v1",
    kind = "Order",
    plural = "orders",
    status = "OrderStatus",
    namespaced,
    printcolumn = r#"{"name":"State","type":"string","jsonPath":".status.state"}"#,
    printcolumn = r#"{"name":"Issuer","type":"string","jsonPath":".spec.issuerRef.name","priority":1}"#,
    printcolumn = r#"{"name":"Reason","type":"string","jsonPath":".status.reason","priority":1}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct OrderSpec {
    /// Certificate signing request, DER encoded and base64 on the wire.
    #[serde(default)]
    #[schemars(with = "String")]
    pub request: ByteString,

    /// Issuer that will sign the certificate.
    #[serde(default)]
    pub issuer_ref: IssuerReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_names: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_addresses: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Reference to an issuer. Kind and group default to a namespaced
/// cert-manager `Issuer`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct IssuerReference {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl IssuerReference {
    pub(crate) fn apply_defaults(&mut self) {
        if self.kind.as_deref().unwrap_or_default().is_empty() {
            self.kind = Some(DEFAULT_ISSUER_KIND.to_string());
        }
        if self.group.as_deref().unwrap_or_default().is_empty() {
            self.group = Some(DEFAULT_ISSUER_GROUP.to_string());
        }
    }

    pub(crate) fn into_canonical(self) -> super::IssuerReference {
        super::IssuerReference {
            name: self.name,
            kind: self.kind.unwrap_or_default(),
            group: self.group.unwrap_or_default(),
        }
    }

    pub(crate) fn from_canonical(issuer_ref: &super::IssuerReference) -> Self {
        Self {
            name: issuer_ref.name.clone(),
            kind: non_empty(&issuer_ref.kind),
            group: non_empty(&issuer_ref.group),
        }
    }
}

/// Observed state of an Order.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(
        default,
        rename = "finalizeURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub finalize_url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorizations: Vec<AcmeAuthorization>,

    /// PEM encoded certificate chain, base64 on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub certificate: Option<ByteString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_time: Option<String>,
}

/// One authorization required by the ACME server.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcmeAuthorization {
    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<State>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub challenges: Vec<AcmeChallenge>,
}

/// One challenge offered for an authorization.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct AcmeChallenge {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub token: String,

    #[serde(default, rename = "type")]
    pub r#type: String,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn non_empty_bytes(value: &[u8]) -> Option<ByteString> {
    (!value.is_empty()).then(|| ByteString(value.to_vec()))
}

impl OrderStatus {
    pub(crate) fn into_canonical(self) -> super::OrderStatus {
        super::OrderStatus {
            url: self.url.unwrap_or_default(),
            finalize_url: self.finalize_url.unwrap_or_default(),
            certificate: self.certificate.map(|c| c.0).unwrap_or_default(),
            state: self.state,
            reason: self.reason.unwrap_or_default(),
            failure_time: self.failure_time,
            authorizations: self
                .authorizations
                .into_iter()
                .map(AcmeAuthorization::into_canonical)
                .collect(),
        }
    }

    /// `None` when the canonical status carries nothing.
    pub(crate) fn from_canonical(status: &super::OrderStatus) -> Option<Self> {
        if *status == super::OrderStatus::default() {
            return None;
        }
        Some(Self {
            url: non_empty(&status.url),
            finalize_url: non_empty(&status.finalize_url),
            authorizations: status
                .authorizations
                .iter()
                .map(AcmeAuthorization::from_canonical)
                .collect(),
            certificate: non_empty_bytes(&status.certificate),
            state: status.state,
            reason: non_empty(&status.reason),
            failure_time: status.failure_time.clone(),
        })
    }
}

impl AcmeAuthorization {
    fn into_canonical(self) -> super::AcmeAuthorization {
        super::AcmeAuthorization {
            url: self.url,
            identifier: self.identifier.unwrap_or_default(),
            wildcard: self.wildcard,
            initial_state: self.initial_state,
            challenges: self
                .challenges
                .into_iter()
                .map(|c| super::AcmeChallenge {
                    url: c.url,
                    token: c.token,
                    r#type: c.r#type,
                })
                .collect(),
        }
    }

    fn from_canonical(authorization: &super::AcmeAuthorization) -> Self {
        Self {
            url: authorization.url.clone(),
            identifier: non_empty(&authorization.identifier),
            wildcard: authorization.wildcard,
            initial_state: authorization.initial_state,
            challenges: authorization
                .challenges
                .iter()
                .map(|c| AcmeChallenge {
                    url: c.url.clone(),
                    token: c.token.clone(),
                    r#type: c.r#type.clone(),
                })
                .collect(),
        }
    }
}

impl Convertible for Order {
    type Canonical = super::Order;

    fn apply_defaults(&mut self) {
        self.spec.issuer_ref.apply_defaults();
    }

    fn into_canonical(self) -> super::Order {
        super::Order {
            metadata: self.metadata,
            spec: super::OrderSpec {
                request: self.spec.request.0,
                issuer_ref: self.spec.issuer_ref.into_canonical(),
                common_name: self.spec.common_name.unwrap_or_default(),
                dns_names: self.spec.dns_names,
                ip_addresses: self.spec.ip_addresses,
                duration: self.spec.duration,
            },
            status: self.status.map(OrderStatus::into_canonical).unwrap_or_default(),
        }
    }

    fn from_canonical(order: &super::Order) -> Self {
        Order {
            metadata: order.metadata.clone(),
            spec: OrderSpec {
                request: ByteString(order.spec.request.clone()),
                issuer_ref: IssuerReference::from_canonical(&order.spec.issuer_ref),
                common_name: non_empty(&order.spec.common_name),
                dns_names: order.spec.dns_names.clone(),
                ip_addresses: order.spec.ip_addresses.clone(),
                duration: order.spec.duration.clone(),
            },
            status: OrderStatus::from_canonical(&order.status),
        }
    }
}
