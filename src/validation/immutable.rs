//! Generic immutability check over declared field paths.
//!
//! Objects are compared through their serialized field tree, so one walker
//! serves every kind. For each [`PathSpec`] the walker resolves the path in
//! both trees and reports [`FieldErrorKind::Forbidden`] wherever the old value
//! was set and the new value differs.
//!
//! Rules:
//! - a value is *empty* when it is absent, `null`, `""`, `[]` or `{}`; changing
//!   an empty value is always allowed
//! - booleans and numbers are never empty once present, so an optional flag
//!   explicitly set to `false` is protected while an unset one is not
//!
//! A field at the default of its type must therefore be absent from the tree.
//! Canonical models mark plain numeric and boolean fields with
//! `#[serde(skip_serializing_if = "is_default")]` (see [`is_default`]) and
//! model three-valued flags as `Option<bool>` serialized as absent or `null`.
//! - list elements are matched by position; indices present on either side are
//!   visited and a missing element reads as empty
//! - a length difference on its own is never reported
//!
//! [`FieldErrorKind::Forbidden`]: super::field::FieldErrorKind::Forbidden

use serde_json::Value;

use super::field::{FieldError, FieldErrorList, FieldPath, PathSpec, Segment};

/// Reason attached to every immutability violation.
pub const IMMUTABLE_FIELD_MESSAGE: &str = "field is immutable once set";

/// Check `paths` of `new` against `old`.
///
/// Errors follow the declaration order of `paths`, then index order.
pub fn check_immutable(old: &Value, new: &Value, paths: &[PathSpec]) -> FieldErrorList {
    let mut errors = FieldErrorList::new();
    for spec in paths {
        walk(
            Some(old),
            Some(new),
            spec.segments(),
            FieldPath::default(),
            &mut errors,
        );
    }
    errors
}

fn walk(
    old: Option<&Value>,
    new: Option<&Value>,
    segments: &[Segment],
    path: FieldPath,
    errors: &mut FieldErrorList,
) {
    // Nothing below an empty old value can be protected.
    if is_empty(old) {
        return;
    }

    let Some((segment, rest)) = segments.split_first() else {
        if old != new {
            errors.push(FieldError::forbidden(&path, IMMUTABLE_FIELD_MESSAGE));
        }
        return;
    };

    match segment {
        Segment::Field(name) => walk(
            old.and_then(|v| v.get(name.as_str())),
            new.and_then(|v| v.get(name.as_str())),
            rest,
            path.child(name),
            errors,
        ),
        Segment::Each => {
            let old_items = elements(old);
            let new_items = elements(new);
            for index in 0..old_items.len().max(new_items.len()) {
                walk(
                    old_items.get(index),
                    new_items.get(index),
                    rest,
                    path.index(index),
                    errors,
                );
            }
        }
    }
}

fn elements(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Whether `value` is the default of its type.
///
/// Canonical models put this on every plain scalar field that an immutable
/// path reaches, so a zero or `false` never reads as set.
pub fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Whether `value` counts as unset.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(fields)) => fields.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => false,
    }
}
