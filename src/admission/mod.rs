//! Validation orchestrator.
//!
//! [`AdmissionEngine`] is built once at startup and shared by every request.
//! Per request it:
//! 1. computes deprecation warnings from the version the caller addressed
//! 2. decodes the payloads into the canonical model of their kind
//! 3. checks the kind's immutable paths (updates with an old object only)
//!
//! Warnings and field errors are independent: warnings are returned even when
//! the request is rejected, and any field error rejects the request no matter
//! how many warnings there are. A payload that cannot be decoded rejects the
//! request before any field is checked.

pub mod decoder;

use std::collections::BTreeMap;

use kube::core::GroupVersionKind;
use kube::core::admission::Operation;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::apis::acme::{self, GROUP, ORDER_KIND, v1, v1alpha2, v1alpha3, v1beta1};
use crate::apis::gvk_api_version;
use crate::scheme::{ConversionError, Result, Scheme};
use crate::validation::field::aggregate;
use crate::validation::{
    DeprecationTable, FieldErrorList, PathSpec, WarningList, check_immutable,
    order_immutable_paths,
};

/// What the transport extracted from an admission request.
#[derive(Clone, Debug)]
pub struct AdmissionInput {
    pub operation: Operation,
    /// Version the payloads are encoded in
    pub kind: GroupVersionKind,
    /// Version the caller addressed, when it differs from `kind`
    pub request_kind: Option<GroupVersionKind>,
    pub old_object: Option<Vec<u8>>,
    pub object: Option<Vec<u8>>,
}

impl AdmissionInput {
    pub fn create(kind: GroupVersionKind, object: Vec<u8>) -> Self {
        Self {
            operation: Operation::Create,
            kind,
            request_kind: None,
            old_object: None,
            object: Some(object),
        }
    }

    pub fn update(kind: GroupVersionKind, old_object: Option<Vec<u8>>, object: Vec<u8>) -> Self {
        Self {
            operation: Operation::Update,
            kind,
            request_kind: None,
            old_object,
            object: Some(object),
        }
    }

    pub fn with_request_kind(mut self, request_kind: GroupVersionKind) -> Self {
        self.request_kind = Some(request_kind);
        self
    }

    /// The group/version/kind the caller used
    pub fn requested(&self) -> &GroupVersionKind {
        self.request_kind.as_ref().unwrap_or(&self.kind)
    }
}

/// Terminal state of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Accepted,
    /// An immutable field was changed
    RejectedInvalid,
    /// A payload could not be decoded
    RejectedMalformed,
}

/// Combined answer for one admission request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub allowed: bool,
    pub field_errors: FieldErrorList,
    pub warnings: WarningList,
    /// Why the request could not be decoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
}

impl Verdict {
    fn validated(field_errors: FieldErrorList, warnings: WarningList) -> Self {
        Self {
            allowed: field_errors.is_empty(),
            field_errors,
            warnings,
            rejection: None,
        }
    }

    fn malformed(err: &ConversionError, warnings: WarningList) -> Self {
        Self {
            allowed: false,
            field_errors: FieldErrorList::new(),
            warnings,
            rejection: Some(err.to_string()),
        }
    }

    pub fn outcome(&self) -> Outcome {
        if self.rejection.is_some() {
            Outcome::RejectedMalformed
        } else if self.allowed {
            Outcome::Accepted
        } else {
            Outcome::RejectedInvalid
        }
    }

    /// Denial message, `None` when the request is allowed
    pub fn message(&self) -> Option<String> {
        if self.allowed {
            return None;
        }
        self.rejection
            .clone()
            .or_else(|| Some(aggregate(&self.field_errors)))
    }
}

/// Validation of one kind, independent of its canonical model.
trait KindValidator: Send + Sync {
    fn validate(&self, operation: &Operation, input: &AdmissionInput) -> Result<FieldErrorList>;
}

/// Decodes a kind through its scheme and checks its immutable paths.
struct ImmutableFieldsValidator<C> {
    scheme: Scheme<C>,
    paths: Vec<PathSpec>,
}

impl<C: Serialize> ImmutableFieldsValidator<C> {
    fn field_tree(&self, object: &C, gvk: &GroupVersionKind) -> Result<Value> {
        serde_json::to_value(object).map_err(|source| ConversionError::Encode {
            api_version: gvk_api_version(gvk),
            kind: gvk.kind.clone(),
            source,
        })
    }
}

impl<C: Serialize> KindValidator for ImmutableFieldsValidator<C> {
    fn validate(&self, operation: &Operation, input: &AdmissionInput) -> Result<FieldErrorList> {
        let decoded = decoder::decode(
            &self.scheme,
            operation,
            &input.kind,
            input.old_object.as_deref(),
            input.object.as_deref(),
        )?;
        let Some(old) = decoded.old else {
            return Ok(FieldErrorList::new());
        };

        let old = self.field_tree(&old, &input.kind)?;
        let new = self.field_tree(&decoded.new, &input.kind)?;
        Ok(check_immutable(&old, &new, &self.paths))
    }
}

/// Admission validation for every served kind.
pub struct AdmissionEngine {
    kinds: BTreeMap<(String, String), Box<dyn KindValidator>>,
    deprecations: DeprecationTable,
}

impl Default for AdmissionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AdmissionEngine {
    /// Engine serving the `acme.cert-manager.io` kinds.
    pub fn new() -> Self {
        let orders = Scheme::<acme::Order>::builder()
            .register::<v1alpha2::Order>()
            .register::<v1alpha3::Order>()
            .register::<v1beta1::Order>()
            .register::<v1::Order>()
            .build();

        Self::empty(DeprecationTable::acme()).with_kind(
            GROUP,
            ORDER_KIND,
            orders,
            order_immutable_paths(),
        )
    }

    /// Engine without any kinds.
    pub fn empty(deprecations: DeprecationTable) -> Self {
        Self {
            kinds: BTreeMap::new(),
            deprecations,
        }
    }

    /// Serve `group`/`kind` through `scheme`, protecting `paths` on update.
    pub fn with_kind<C>(
        mut self,
        group: &str,
        kind: &str,
        scheme: Scheme<C>,
        paths: Vec<PathSpec>,
    ) -> Self
    where
        C: Serialize + 'static,
    {
        self.kinds.insert(
            (group.to_string(), kind.to_string()),
            Box::new(ImmutableFieldsValidator { scheme, paths }),
        );
        self
    }

    /// Served `(group, kind)` pairs
    pub fn kinds(&self) -> impl Iterator<Item = (&str, &str)> {
        self.kinds
            .keys()
            .map(|(group, kind)| (group.as_str(), kind.as_str()))
    }

    /// Validate any operation. Only creates and updates are checked.
    pub fn review(&self, input: &AdmissionInput) -> Verdict {
        match input.operation {
            Operation::Create => self.validate_create(input),
            Operation::Update => self.validate_update(input),
            Operation::Delete | Operation::Connect => {
                Verdict::validated(FieldErrorList::new(), self.advise(input))
            }
        }
    }

    /// Validate a create. Only decodability and deprecation are checked.
    pub fn validate_create(&self, input: &AdmissionInput) -> Verdict {
        self.run(&Operation::Create, input)
    }

    /// Validate an update against the immutable paths of its kind.
    pub fn validate_update(&self, input: &AdmissionInput) -> Verdict {
        self.run(&Operation::Update, input)
    }

    fn advise(&self, input: &AdmissionInput) -> WarningList {
        let requested = input.requested();
        self.deprecations
            .advise(&requested.group, &requested.version, &requested.kind)
    }

    fn run(&self, operation: &Operation, input: &AdmissionInput) -> Verdict {
        let warnings = self.advise(input);
        let key = (input.kind.group.clone(), input.kind.kind.clone());

        let result = match self.kinds.get(&key) {
            Some(validator) => validator.validate(operation, input),
            None => Err(ConversionError::UnregisteredKind {
                group: key.0,
                kind: key.1,
            }),
        };

        let verdict = match result {
            Ok(errors) => Verdict::validated(errors, warnings),
            Err(err) => Verdict::malformed(&err, warnings),
        };
        debug!(
            operation = ?operation,
            kind = %input.kind.kind,
            version = %input.kind.version,
            outcome = ?verdict.outcome(),
            errors = verdict.field_errors.len(),
            warnings = verdict.warnings.len(),
            "Validated admission request"
        );
        verdict
    }
}
