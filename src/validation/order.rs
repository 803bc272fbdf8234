//! Admission rules for ACME Orders.
//!
//! An Order's signing request and everything the ACME server told us about the
//! order (its URLs, issued certificate, authorizations and challenges) may be
//! filled in once and never rewritten.

use super::field::PathSpec;

/// Fields of an Order that are immutable once set, in reporting order.
pub fn order_immutable_paths() -> Vec<PathSpec> {
    let authorizations = PathSpec::new("status").child("authorizations").each();
    let challenges = authorizations.clone().child("challenges").each();

    vec![
        PathSpec::new("spec").child("request"),
        PathSpec::new("status").child("url"),
        PathSpec::new("status").child("finalizeURL"),
        PathSpec::new("status").child("certificate"),
        authorizations.clone().child("url"),
        authorizations.clone().child("identifier"),
        authorizations.child("wildcard"),
        challenges.clone().child("url"),
        challenges.clone().child("token"),
        challenges.child("type"),
    ]
}
