//! Deprecation advisory.
//!
//! Callers that address a resource through a superseded version get one
//! warning pointing at the stable version. The advisory only looks at the
//! requested group/version/kind, never at object content, and never turns a
//! request into a rejection.

use kube::core::GroupVersionKind;

use crate::apis::acme::{GROUP, ORDER_KIND, STABLE_VERSION};
use crate::apis::gvk_api_version;

/// Non-rejecting advisories returned alongside a verdict
pub type WarningList = Vec<String>;

/// Versions of the ACME API that are served but deprecated.
pub const DEPRECATED_ACME_VERSIONS: [&str; 3] = ["v1alpha2", "v1alpha3", "v1beta1"];

/// Render the advisory for a deprecated version.
pub fn deprecation_message(deprecated: &GroupVersionKind, replacement: &GroupVersionKind) -> String {
    format!(
        "{} {} is deprecated in v1.4+, unavailable in v1.6+; use {} {}",
        gvk_api_version(deprecated),
        deprecated.kind,
        gvk_api_version(replacement),
        replacement.kind
    )
}

/// Static map of deprecated versions to their replacement.
#[derive(Clone, Debug, Default)]
pub struct DeprecationTable {
    entries: Vec<(GroupVersionKind, GroupVersionKind)>,
}

impl DeprecationTable {
    /// Table covering every deprecated version of the ACME kinds served here.
    pub fn acme() -> Self {
        let replacement = GroupVersionKind::gvk(GROUP, STABLE_VERSION, ORDER_KIND);
        Self {
            entries: DEPRECATED_ACME_VERSIONS
                .iter()
                .map(|version| {
                    (
                        GroupVersionKind::gvk(GROUP, version, ORDER_KIND),
                        replacement.clone(),
                    )
                })
                .collect(),
        }
    }

    /// Add an entry. Only used while assembling the table.
    pub fn with(mut self, deprecated: GroupVersionKind, replacement: GroupVersionKind) -> Self {
        self.entries.push((deprecated, replacement));
        self
    }

    /// Replacement for `gvk`, if it is deprecated
    pub fn replacement(&self, gvk: &GroupVersionKind) -> Option<&GroupVersionKind> {
        self.entries
            .iter()
            .find(|(deprecated, _)| deprecated == gvk)
            .map(|(_, replacement)| replacement)
    }

    /// Warnings for a request addressed through `group`/`version`/`kind`.
    ///
    /// Returns exactly one warning for a deprecated triple and none otherwise.
    pub fn advise(&self, group: &str, version: &str, kind: &str) -> WarningList {
        let requested = GroupVersionKind::gvk(group, version, kind);
        self.replacement(&requested)
            .map(|replacement| deprecation_message(&requested, replacement))
            .into_iter()
            .collect()
    }
}
