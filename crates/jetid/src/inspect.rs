use chrono::{DateTime, SecondsFormat, Utc};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, FullId, Representation, Result};

/// An id rendered in every representation.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Renderings {
    pub hex: String,
    pub urlsafe: String,
    pub decimal: String,
    pub binary: String,
}

impl Renderings {
    /// Encodes `bytes` once per [`Representation`].
    pub fn of(bytes: &[u8]) -> Self {
        Self {
            hex: Representation::Hex.encode(bytes),
            urlsafe: Representation::UrlSafe.encode(bytes),
            decimal: Representation::Decimal.encode(bytes),
            binary: Representation::Binary.encode(bytes),
        }
    }
}

/// Full field decomposition of an id.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Explanation {
    /// The complete id, suffix included.
    pub id: Renderings,
    /// The 8-byte core alone.
    pub core: Renderings,
    /// Creation time, or `None` past chrono's representable range.
    pub created_at: Option<DateTime<Utc>>,
    /// RFC 3339 UTC with millisecond precision.
    pub created_timestamp_readable: String,
    pub client_id: u64,
    /// Position within the creation millisecond.
    pub sequence: u64,
    pub type_identifier: Option<u8>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub context: Option<u8>,
}

/// Whether `id` decodes to a valid id in `repr`, optionally carrying
/// `expected_type`. Never fails.
pub fn validate_id(id: &str, repr: Representation, expected_type: Option<u8>) -> bool {
    FullId::decode(id, repr).is_ok_and(|full| {
        expected_type.is_none_or(|expected| full.type_identifier() == Some(expected))
    })
}

/// Decomposes an id into its fields and re-renders it.
///
/// # Errors
///
/// Returns [`Error::Format`] if `id` does not decode in `repr`.
#[cfg_attr(feature = "tracing", instrument(level = "debug", err))]
pub fn explain_id(id: &str, repr: Representation) -> Result<Explanation> {
    let full = FullId::decode(id, repr)?;
    let core = full.core();
    let created_at = core.created_at();
    Ok(Explanation {
        id: Renderings::of(&full.to_bytes()),
        core: Renderings::of(&core.to_be_bytes()),
        created_timestamp_readable: created_at.map_or_else(
            || format!("{} ms since Unix epoch", core.unix_millis()),
            |t| t.to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        created_at,
        client_id: core.client_id(),
        sequence: core.sequence(),
        type_identifier: full.type_identifier(),
        context: full.context(),
    })
}

/// Compares two ids, ignoring their context bytes.
///
/// Ids differing only in context are equal; ids of different lengths never
/// are.
///
/// # Errors
///
/// Returns [`Error::Format`] if either id does not decode in `repr`.
pub fn compare_ids(a: &str, b: &str, repr: Representation) -> Result<bool> {
    let a = FullId::decode(a, repr)?.with_context_zeroed();
    let b = FullId::decode(b, repr)?.with_context_zeroed();
    Ok(a.to_bytes() == b.to_bytes())
}

/// Extracts the type identifier byte.
///
/// # Errors
///
/// - [`Error::Format`] if `id` does not decode in `repr`
/// - [`Error::NotPresent`] if the id has no type suffix
pub fn get_type(id: &str, repr: Representation) -> Result<u8> {
    FullId::decode(id, repr)?
        .type_identifier()
        .ok_or(Error::NotPresent {
            field: "type identifier",
            repr,
        })
}

/// Extracts the context byte.
///
/// # Errors
///
/// - [`Error::Format`] if `id` does not decode in `repr`
/// - [`Error::NotPresent`] if the id has no context suffix
pub fn get_context(id: &str, repr: Representation) -> Result<u8> {
    FullId::decode(id, repr)?.context().ok_or(Error::NotPresent {
        field: "context",
        repr,
    })
}
