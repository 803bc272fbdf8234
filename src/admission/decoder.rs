//! Request decoder.
//!
//! Turns the raw old/new payloads of an admission request into canonical
//! objects. Create requests never decode an old object. An update without an
//! old object decodes like a create, which leaves nothing to protect.

use kube::core::GroupVersionKind;
use kube::core::admission::Operation;
use tracing::debug;

use crate::scheme::{ConversionError, Result, Scheme};

/// Canonical objects of one request.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded<C> {
    pub old: Option<C>,
    pub new: C,
}

/// Decode the payloads of a request encoded in version `gvk`.
pub fn decode<C>(
    scheme: &Scheme<C>,
    operation: &Operation,
    gvk: &GroupVersionKind,
    old: Option<&[u8]>,
    new: Option<&[u8]>,
) -> Result<Decoded<C>> {
    let new = new.ok_or(ConversionError::MissingObject)?;
    let new = scheme.convert_to_canonical(gvk, new)?;

    let old = match (operation, old) {
        (Operation::Update, Some(bytes)) => Some(scheme.convert_to_canonical(gvk, bytes)?),
        (Operation::Update, None) => {
            debug!(kind = %gvk.kind, "Update without old object, treating as create");
            None
        }
        _ => None,
    };

    Ok(Decoded { old, new })
}
