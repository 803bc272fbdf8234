//! API types served by the webhook.
//!
//! Each API group has one canonical (version-independent) model and one module
//! per served wire version. Wire versions are declared with `kube::CustomResource`
//! and know how to convert themselves to and from the canonical model.

pub mod acme;

use kube::core::GroupVersionKind;

/// Format a group and version the way `apiVersion` fields carry them.
///
/// The core group is the empty string and is rendered as the bare version.
pub fn api_version(group: &str, version: &str) -> String {
    if group.is_empty() {
        version.to_string()
    } else {
        format!("{}/{}", group, version)
    }
}

/// `apiVersion` of a group/version/kind triple.
pub fn gvk_api_version(gvk: &GroupVersionKind) -> String {
    api_version(&gvk.group, &gvk.version)
}
