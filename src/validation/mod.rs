//! Validation building blocks.
//!
//! - [`field`]: field paths, declarative path specs and field errors
//! - [`immutable`]: the generic immutable-field walker
//! - [`deprecation`]: the version deprecation advisory
//! - [`order`]: rule tables for ACME Orders

pub mod deprecation;
pub mod field;
pub mod immutable;
pub mod order;

pub use deprecation::{DeprecationTable, WarningList};
pub use field::{FieldError, FieldErrorKind, FieldErrorList, FieldPath, PathSpec, Segment};
pub use immutable::{IMMUTABLE_FIELD_MESSAGE, check_immutable, is_default};
pub use order::order_immutable_paths;
