//! Single-request admission scenarios.
//!
//! Each test encodes an old and new Order at one served version, runs the
//! engine and checks the verdict, the error paths and the warnings.

use std::sync::Arc;

use crate::fixtures::{ALL_VERSIONS, OrderBuilder, authorization, create, order_gvk, update};
use acme_admission::{AdmissionEngine, AdmissionInput, Outcome};

fn base() -> OrderBuilder {
    OrderBuilder::new("order-1").request(b"CSR-BYTES")
}

// ============================================================================
// End-to-end Scenarios
// ============================================================================

#[test]
fn test_status_url_change_is_rejected() {
    let engine = AdmissionEngine::new();
    let old = base().url("https://acme.example/order/1").build();
    let new = base().url("https://acme.example/order/2").build();

    let verdict = engine.validate_update(&update("v1", &old, &new));

    assert!(!verdict.allowed);
    assert_eq!(verdict.field_errors.len(), 1);
    assert_eq!(verdict.field_errors[0].path, "status.url");
    assert_eq!(verdict.field_errors[0].reason, "field is immutable once set");
    assert!(verdict.warnings.is_empty());
}

#[test]
fn test_update_without_old_object_on_deprecated_version() {
    let engine = AdmissionEngine::new();
    let new = base().build();
    let input = AdmissionInput::update(order_gvk("v1alpha3"), None, crate::encode(&new, "v1alpha3"));

    let verdict = engine.validate_update(&input);

    assert!(verdict.allowed);
    assert!(verdict.field_errors.is_empty());
    assert_eq!(
        verdict.warnings,
        vec![
            "acme.cert-manager.io/v1alpha3 Order is deprecated in v1.4+, unavailable in v1.6+; use acme.cert-manager.io/v1 Order"
                .to_string()
        ]
    );
}

// ============================================================================
// Version Independence
// ============================================================================

#[test]
fn test_error_paths_are_stable_across_versions() {
    let engine = AdmissionEngine::new();
    let old = base().build();
    let new = OrderBuilder::new("order-1").request(b"OTHER-CSR").build();

    for version in ALL_VERSIONS {
        let verdict = engine.validate_update(&update(version, &old, &new));
        assert_eq!(verdict.outcome(), Outcome::RejectedInvalid, "{}", version);
        assert_eq!(verdict.field_errors.len(), 1, "{}", version);
        assert_eq!(verdict.field_errors[0].path, "spec.request", "{}", version);

        let expected_warnings = usize::from(version != "v1");
        assert_eq!(verdict.warnings.len(), expected_warnings, "{}", version);
    }
}

#[test]
fn test_noop_update_is_allowed_for_every_version() {
    let engine = AdmissionEngine::new();
    let order = base()
        .url("https://acme.example/order/1")
        .finalize_url("https://acme.example/order/1/finalize")
        .certificate(b"-----BEGIN CERTIFICATE-----")
        .authorization(authorization("https://acme.example/authz/1", "example.com", &["http-01", "dns-01"]))
        .build();

    for version in ALL_VERSIONS {
        let verdict = engine.validate_update(&update(version, &order, &order));
        assert!(verdict.allowed, "{}: {:?}", version, verdict.field_errors);
    }
}

#[test]
fn test_requested_version_drives_warnings() {
    // The API server converted a v1beta1 request to v1 before calling us.
    let engine = AdmissionEngine::new();
    let order = base().build();
    let input = create("v1", &order).with_request_kind(order_gvk("v1beta1"));

    let verdict = engine.validate_create(&input);
    assert!(verdict.allowed);
    assert_eq!(verdict.warnings.len(), 1);
    assert!(verdict.warnings[0].starts_with("acme.cert-manager.io/v1beta1 Order"));
}

// ============================================================================
// Indexed Fields
// ============================================================================

#[test]
fn test_adding_authorization_is_allowed() {
    let engine = AdmissionEngine::new();
    let first = authorization("https://acme.example/authz/1", "example.com", &["http-01"]);
    let second = authorization("https://acme.example/authz/2", "www.example.com", &["http-01"]);
    let old = base().authorization(first.clone()).build();
    let new = base().authorization(first).authorization(second).build();

    let verdict = engine.validate_update(&update("v1beta1", &old, &new));
    assert!(verdict.allowed, "{:?}", verdict.field_errors);
}

#[test]
fn test_changed_challenge_token_reports_index() {
    let engine = AdmissionEngine::new();
    let first = authorization("https://acme.example/authz/1", "example.com", &["http-01"]);
    let second = authorization("https://acme.example/authz/2", "www.example.com", &["http-01", "dns-01"]);
    let old = base().authorization(first.clone()).authorization(second.clone()).build();

    let mut changed = second;
    changed.challenges[1].token = "rotated".to_string();
    let new = base().authorization(first).authorization(changed).build();

    let verdict = engine.validate_update(&update("v1", &old, &new));
    assert_eq!(verdict.field_errors.len(), 1);
    assert_eq!(
        verdict.field_errors[0].path,
        "status.authorizations[1].challenges[1].token"
    );
}

#[test]
fn test_wildcard_is_three_valued() {
    let engine = AdmissionEngine::new();
    let with_wildcard = |wildcard: Option<bool>| {
        let mut authz = authorization("https://acme.example/authz/1", "example.com", &["dns-01"]);
        authz.wildcard = wildcard;
        base().authorization(authz).build()
    };

    let unset_to_true = update("v1", &with_wildcard(None), &with_wildcard(Some(true)));
    assert!(engine.validate_update(&unset_to_true).allowed);

    let false_to_true = update("v1", &with_wildcard(Some(false)), &with_wildcard(Some(true)));
    let verdict = engine.validate_update(&false_to_true);
    assert_eq!(verdict.field_errors.len(), 1);
    assert_eq!(verdict.field_errors[0].path, "status.authorizations[0].wildcard");
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_errors_accumulate_in_declaration_order() {
    let engine = AdmissionEngine::new();
    let old = base()
        .url("https://acme.example/order/1")
        .finalize_url("https://acme.example/order/1/finalize")
        .certificate(b"CERT-1")
        .build();
    let new = OrderBuilder::new("order-1")
        .request(b"CSR-2")
        .url("https://acme.example/order/2")
        .finalize_url("https://acme.example/order/2/finalize")
        .certificate(b"CERT-2")
        .build();

    let verdict = engine.validate_update(&update("v1alpha2", &old, &new));
    let paths: Vec<_> = verdict.field_errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["spec.request", "status.url", "status.finalizeURL", "status.certificate"]
    );
    assert_eq!(verdict.warnings.len(), 1);

    let message = verdict.message().unwrap();
    assert!(message.starts_with("[spec.request: Forbidden: field is immutable once set, "));
}

#[test]
fn test_mutable_status_fields_may_change() {
    let engine = AdmissionEngine::new();
    let old = base().url("https://acme.example/order/1").reason("pending").build();
    let new = base().url("https://acme.example/order/1").reason("rate limited").build();

    assert!(engine.validate_update(&update("v1", &old, &new)).allowed);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_engine_is_shared_across_threads() {
    let engine = Arc::new(AdmissionEngine::new());
    let old = base().url("https://acme.example/order/1").build();
    let new = base().url("https://acme.example/order/2").build();

    std::thread::scope(|scope| {
        for version in ALL_VERSIONS {
            let engine = Arc::clone(&engine);
            let input = update(version, &old, &new);
            scope.spawn(move || {
                let verdict = engine.review(&input);
                assert_eq!(verdict.field_errors.len(), 1);
                assert_eq!(verdict.field_errors[0].path, "status.url");
            });
        }
    });
}
