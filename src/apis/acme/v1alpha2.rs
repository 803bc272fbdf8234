//! `acme.cert-manager.io/v1alpha2`, the oldest served version. Carries the signing
//! request in `spec.csr`.

use k8s_openapi::ByteString;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::v1::{self, IssuerReference, OrderStatus};
use crate::scheme::Convertible;

/// Order as served at `v1alpha2`.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "acme.cert-manager.io",
    version = "v1alpha2",
    kind = "Order",
    plural = "orders",
    status = "OrderStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct OrderSpec {
    /// Certificate signing request. Renamed to `request` in `v1beta1`.
    #[serde(default)]
    #[schemars(with = "String")]
    pub csr: ByteString,

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

impl From<Order> for v1::Order {
    fn from(order: Order) -> Self {
        v1::Order {
            metadata: order.metadata,
            spec: v1::OrderSpec {
                request: order.spec.csr,
                issuer_ref: order.spec.issuer_ref,
                common_name: order.spec.common_name,
                dns_names: order.spec.dns_names,
                ip_addresses: order.spec.ip_addresses,
                duration: order.spec.duration,
            },
            status: order.status,
        }
    }
}

impl From<v1::Order> for Order {
    fn from(order: v1::Order) -> Self {
        Order {
            metadata: order.metadata,
            spec: OrderSpec {
                csr: order.spec.request,
                issuer_ref: order.spec.issuer_ref,
                common_name: order.spec.common_name,
                dns_names: order.spec.dns_names,
                ip_addresses: order.spec.ip_addresses,
                duration: order.spec.duration,
            },
            status: order.status,
        }
    }
}

impl Convertible for Order {
    type Canonical = super::Order;

    fn apply_defaults(&mut self) {
        self.spec.issuer_ref.apply_defaults();
    }

    fn into_canonical(self) -> super::Order {
        v1::Order::from(self).into_canonical()
    }

    fn from_canonical(order: &super::Order) -> Self {
        v1::Order::from_canonical(order).into()
    }
}
