//! Test fixtures and builder patterns for Orders.

use acme_admission::apis::acme::{
    self, AcmeAuthorization, AcmeChallenge, GROUP, ORDER_KIND, State, v1, v1alpha2, v1alpha3,
    v1beta1,
};
use acme_admission::{AdmissionInput, Scheme};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::core::GroupVersionKind;

/// Every served version, oldest first.
pub const ALL_VERSIONS: [&str; 4] = ["v1alpha2", "v1alpha3", "v1beta1", "v1"];

/// Builder for creating canonical Order test fixtures.
///
/// # Example
/// ```
/// let order = OrderBuilder::new("order-1")
///     .request(b"CSR-BYTES")
///     .url("https://acme.example/order/1")
///     .build();
/// ```
#[derive(Clone, Debug)]
pub struct OrderBuilder {
    order: acme::Order,
}

impl OrderBuilder {
    /// Create a new builder with the given Order name.
    pub fn new(name: impl Into<String>) -> Self {
        let mut order = acme::Order {
            metadata: ObjectMeta {
                name: Some(name.into()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        order.spec.issuer_ref.name = "letsencrypt".to_string();
        order.spec.common_name = "example.com".to_string();
        order.spec.dns_names = vec!["example.com".to_string()];
        Self { order }
    }

    /// Set the certificate signing request.
    pub fn request(mut self, request: &[u8]) -> Self {
        self.order.spec.request = request.to_vec();
        self
    }

    /// Set the order URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.order.status.url = url.into();
        self
    }

    /// Set the finalize URL.
    pub fn finalize_url(mut self, url: impl Into<String>) -> Self {
        self.order.status.finalize_url = url.into();
        self
    }

    /// Set the issued certificate.
    pub fn certificate(mut self, certificate: &[u8]) -> Self {
        self.order.status.certificate = certificate.to_vec();
        self
    }

    /// Set the order state.
    pub fn state(mut self, state: State) -> Self {
        self.order.status.state = Some(state);
        self
    }

    /// Set the failure reason.
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.order.status.reason = reason.into();
        self
    }

    /// Append an authorization.
    pub fn authorization(mut self, authorization: AcmeAuthorization) -> Self {
        self.order.status.authorizations.push(authorization);
        self
    }

    /// Build the Order.
    pub fn build(self) -> acme::Order {
        self.order
    }
}

/// Authorization for `identifier` with one challenge per type.
pub fn authorization(url: &str, identifier: &str, challenge_types: &[&str]) -> AcmeAuthorization {
    AcmeAuthorization {
        url: url.to_string(),
        identifier: identifier.to_string(),
        wildcard: None,
        initial_state: Some(State::Pending),
        challenges: challenge_types
            .iter()
            .enumerate()
            .map(|(i, challenge_type)| AcmeChallenge {
                url: format!("{}/chall/{}", url, i),
                token: format!("token-{}", i),
                r#type: challenge_type.to_string(),
            })
            .collect(),
    }
}

/// Group/version/kind of an Order at `version`.
pub fn order_gvk(version: &str) -> GroupVersionKind {
    GroupVersionKind::gvk(GROUP, version, ORDER_KIND)
}

/// Encode `order` the way a client of `version` would send it.
pub fn encode(order: &acme::Order, version: &str) -> Vec<u8> {
    let scheme = Scheme::<acme::Order>::builder()
        .register::<v1alpha2::Order>()
        .register::<v1alpha3::Order>()
        .register::<v1beta1::Order>()
        .register::<v1::Order>()
        .build();
    scheme
        .convert_from_canonical(&order_gvk(version), order)
        .expect("failed to encode order")
}

/// Update request for `old` -> `new`, both encoded at `version`.
pub fn update(version: &str, old: &acme::Order, new: &acme::Order) -> AdmissionInput {
    AdmissionInput::update(
        order_gvk(version),
        Some(encode(old, version)),
        encode(new, version),
    )
}

/// Create request for `order` encoded at `version`.
pub fn create(version: &str, order: &acme::Order) -> AdmissionInput {
    AdmissionInput::create(order_gvk(version), encode(order, version))
}
