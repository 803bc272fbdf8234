//! Canonical type registry.
//!
//! A [`Scheme`] maps every served `(apiVersion, kind)` pair to a converter that
//! turns an encoded payload of that version into the canonical model, and back.
//! Schemes are assembled once at startup with [`SchemeBuilder`] and are
//! read-only afterwards, so a single instance can be shared by every request.
//!
//! Decoding a versioned payload always runs the version's defaults before the
//! conversion, so fields a caller left unset carry the value the version
//! documents rather than looking "empty" to later validation.

use std::collections::BTreeMap;

use kube::Resource;
use kube::core::GroupVersionKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::apis::gvk_api_version;

/// A wire version that can be converted to and from a canonical model.
pub trait Convertible: Sized {
    /// The version-independent model this version converts into.
    type Canonical;

    /// Fill in the documented defaults of this version for unset fields.
    fn apply_defaults(&mut self) {}

    /// Convert a defaulted wire object into the canonical model.
    fn into_canonical(self) -> Self::Canonical;

    /// Render a canonical object in this version.
    fn from_canonical(canonical: &Self::Canonical) -> Self;
}

/// Errors raised while moving between wire versions and the canonical model.
///
/// All of them are caused by the request itself, so none are retryable.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// No validation is registered for the requested kind
    #[error("no validation is registered for kind {kind} in group {group:?}")]
    UnregisteredKind { group: String, kind: String },

    /// The kind is known but not in the requested version
    #[error("{api_version}, Kind={kind} is not a registered version")]
    UnregisteredVersion { api_version: String, kind: String },

    /// The payload's own type metadata disagrees with the request
    #[error("object is {found} but the request declares {expected}")]
    Mismatch { expected: String, found: String },

    /// The payload does not match the shape of its version
    #[error("failed to decode {api_version}, Kind={kind}: {source}")]
    Malformed {
        api_version: String,
        kind: String,
        source: serde_json::Error,
    },

    /// A canonical object could not be rendered
    #[error("failed to encode {api_version}, Kind={kind}: {source}")]
    Encode {
        api_version: String,
        kind: String,
        source: serde_json::Error,
    },

    /// The request does not carry the object being admitted
    #[error("admission request does not carry an object")]
    MissingObject,
}

/// Result type alias for conversions
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Type metadata every payload may carry.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayloadTypeMeta {
    #[serde(default)]
    api_version: Option<String>,
    #[serde(default)]
    kind: Option<String>,
}

/// Conversion functions of one registered wire version.
struct Converter<C> {
    decode: fn(&[u8]) -> serde_json::Result<C>,
    encode: fn(&C) -> serde_json::Result<Vec<u8>>,
}

fn decode_versioned<V>(bytes: &[u8]) -> serde_json::Result<V::Canonical>
where
    V: Convertible + DeserializeOwned,
{
    let mut versioned: V = serde_json::from_slice(bytes)?;
    versioned.apply_defaults();
    Ok(versioned.into_canonical())
}

fn encode_versioned<V>(canonical: &V::Canonical) -> serde_json::Result<Vec<u8>>
where
    V: Convertible + Serialize,
{
    serde_json::to_vec(&V::from_canonical(canonical))
}

/// Registry of the wire versions that convert into canonical model `C`.
pub struct Scheme<C> {
    converters: BTreeMap<(String, String), Converter<C>>,
}

impl<C> Scheme<C> {
    /// Start assembling a scheme
    pub fn builder() -> SchemeBuilder<C> {
        SchemeBuilder {
            converters: BTreeMap::new(),
        }
    }

    /// Whether `gvk` is a registered wire version
    pub fn is_registered(&self, gvk: &GroupVersionKind) -> bool {
        self.converters
            .contains_key(&(gvk_api_version(gvk), gvk.kind.clone()))
    }

    /// Registered `(apiVersion, kind)` pairs, in sorted order
    pub fn registered(&self) -> impl Iterator<Item = (&str, &str)> {
        self.converters
            .keys()
            .map(|(api_version, kind)| (api_version.as_str(), kind.as_str()))
    }

    fn converter(&self, gvk: &GroupVersionKind) -> Result<(String, &Converter<C>)> {
        let api_version = gvk_api_version(gvk);
        let key = (api_version, gvk.kind.clone());
        match self.converters.get(&key) {
            Some(converter) => Ok((key.0, converter)),
            None => Err(ConversionError::UnregisteredVersion {
                api_version: key.0,
                kind: key.1,
            }),
        }
    }

    /// Decode a payload encoded in version `gvk` into the canonical model.
    ///
    /// The payload's `apiVersion` and `kind`, when present, must match `gvk`.
    pub fn convert_to_canonical(&self, gvk: &GroupVersionKind, bytes: &[u8]) -> Result<C> {
        let (api_version, converter) = self.converter(gvk)?;
        let malformed = |source| ConversionError::Malformed {
            api_version: api_version.clone(),
            kind: gvk.kind.clone(),
            source,
        };

        let meta: PayloadTypeMeta = serde_json::from_slice(bytes).map_err(malformed)?;
        let declared_version = meta.api_version.as_deref().unwrap_or(&api_version);
        let declared_kind = meta.kind.as_deref().unwrap_or(&gvk.kind);
        if declared_version != api_version || declared_kind != gvk.kind {
            return Err(ConversionError::Mismatch {
                expected: format!("{}, Kind={}", api_version, gvk.kind),
                found: format!("{}, Kind={}", declared_version, declared_kind),
            });
        }

        debug!(api_version = %api_version, kind = %gvk.kind, "Converting payload to canonical form");
        (converter.decode)(bytes).map_err(malformed)
    }

    /// Encode a canonical object in version `gvk`.
    pub fn convert_from_canonical(&self, gvk: &GroupVersionKind, canonical: &C) -> Result<Vec<u8>> {
        let (api_version, converter) = self.converter(gvk)?;
        (converter.encode)(canonical).map_err(|source| ConversionError::Encode {
            api_version,
            kind: gvk.kind.clone(),
            source,
        })
    }
}

/// Builder for a [`Scheme`]. Registration is only possible before `build`.
pub struct SchemeBuilder<C> {
    converters: BTreeMap<(String, String), Converter<C>>,
}

impl<C> SchemeBuilder<C> {
    /// Register wire version `V`, keyed by its own group, version and kind.
    pub fn register<V>(mut self) -> Self
    where
        V: Convertible<Canonical = C> + Resource<DynamicType = ()> + DeserializeOwned + Serialize,
    {
        let key = (V::api_version(&()).into_owned(), V::kind(&()).into_owned());
        self.converters.insert(
            key,
            Converter {
                decode: decode_versioned::<V>,
                encode: encode_versioned::<V>,
            },
        );
        self
    }

    /// Freeze the registry
    pub fn build(self) -> Scheme<C> {
        Scheme {
            converters: self.converters,
        }
    }
}
