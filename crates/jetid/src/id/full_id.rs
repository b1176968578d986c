use core::fmt;

use crate::{CoreId, Error, Representation, Result};

/// A core id with its optional type and context suffix.
///
/// The byte layout is `core(8) ‖ type(1) [‖ context(1)]`, so the variant
/// alone determines the total length (8, 9 or 10 bytes) and therefore the
/// fixed width of every textual encoding. A context byte can only follow a
/// type identifier.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FullId {
    /// The bare 8-byte core.
    CoreOnly(CoreId),
    /// Core followed by a type identifier byte.
    WithType(CoreId, u8),
    /// Core followed by a type identifier and a context byte.
    WithTypeAndContext(CoreId, u8, u8),
}

impl FullId {
    /// Byte length of a [`FullId::CoreOnly`].
    pub const CORE_LEN: usize = CoreId::BYTES;
    /// Byte length of a [`FullId::WithType`].
    pub const TYPED_LEN: usize = CoreId::BYTES + 1;
    /// Byte length of a [`FullId::WithTypeAndContext`].
    pub const CONTEXT_LEN: usize = CoreId::BYTES + 2;
    /// Every valid byte length, shortest first.
    pub const VALID_LENS: [usize; 3] = [Self::CORE_LEN, Self::TYPED_LEN, Self::CONTEXT_LEN];

    /// Builds the variant matching the supplied optional fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContextWithoutType`] if a context is given without a
    /// type identifier; the layout has no slot for it.
    pub fn new(core: CoreId, type_identifier: Option<u8>, context: Option<u8>) -> Result<Self> {
        match (type_identifier, context) {
            (None, None) => Ok(Self::CoreOnly(core)),
            (Some(ty), None) => Ok(Self::WithType(core, ty)),
            (Some(ty), Some(ctx)) => Ok(Self::WithTypeAndContext(core, ty, ctx)),
            (None, Some(_)) => Err(Error::ContextWithoutType),
        }
    }

    /// Attaches a suffix given as two-hex-digit text fields.
    ///
    /// # Errors
    ///
    /// - [`Error::Format`] if either field is not exactly two hex digits
    /// - [`Error::ContextWithoutType`] if `context` is given alone
    pub fn attach(core: CoreId, type_identifier: Option<&str>, context: Option<&str>) -> Result<Self> {
        let ty = type_identifier
            .map(|t| parse_hex_byte("type identifier", t))
            .transpose()?;
        let ctx = context.map(|c| parse_hex_byte("context", c)).transpose()?;
        Self::new(core, ty, ctx)
    }

    /// The leading 8-byte core.
    pub const fn core(&self) -> CoreId {
        match *self {
            Self::CoreOnly(core) | Self::WithType(core, _) | Self::WithTypeAndContext(core, _, _) => {
                core
            }
        }
    }

    /// Returns the same suffix on a different core.
    #[must_use]
    pub const fn with_core(self, core: CoreId) -> Self {
        match self {
            Self::CoreOnly(_) => Self::CoreOnly(core),
            Self::WithType(_, ty) => Self::WithType(core, ty),
            Self::WithTypeAndContext(_, ty, ctx) => Self::WithTypeAndContext(core, ty, ctx),
        }
    }

    /// The type identifier byte, if present.
    pub const fn type_identifier(&self) -> Option<u8> {
        match *self {
            Self::CoreOnly(_) => None,
            Self::WithType(_, ty) | Self::WithTypeAndContext(_, ty, _) => Some(ty),
        }
    }

    /// The context byte. Only ids that also carry a type identifier have
    /// one.
    pub const fn context(&self) -> Option<u8> {
        match *self {
            Self::WithTypeAndContext(_, _, ctx) => Some(ctx),
            Self::CoreOnly(_) | Self::WithType(..) => None,
        }
    }

    /// Total encoded length in bytes.
    pub const fn byte_len(&self) -> usize {
        match self {
            Self::CoreOnly(_) => Self::CORE_LEN,
            Self::WithType(..) => Self::TYPED_LEN,
            Self::WithTypeAndContext(..) => Self::CONTEXT_LEN,
        }
    }

    /// Returns the same id with its context byte (if any) set to zero.
    ///
    /// The length is preserved, so an id with a context never equals one
    /// without.
    #[must_use]
    pub const fn with_context_zeroed(self) -> Self {
        match self {
            Self::WithTypeAndContext(core, ty, _) => Self::WithTypeAndContext(core, ty, 0),
            other => other,
        }
    }

    /// Serializes to `core ‖ type ‖ context`, omitting absent fields.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len());
        out.extend_from_slice(&self.core().to_be_bytes());
        out.extend(self.type_identifier());
        out.extend(self.context());
        out
    }

    /// Splits a byte buffer back into core and suffix, dispatching purely on
    /// its length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] for any length other than 8, 9 or 10.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some((core, suffix)) = bytes.split_first_chunk::<{ CoreId::BYTES }>() else {
            return Err(invalid_len(bytes.len()));
        };
        let core = CoreId::from_be_bytes(*core);
        match *suffix {
            [] => Ok(Self::CoreOnly(core)),
            [ty] => Ok(Self::WithType(core, ty)),
            [ty, ctx] => Ok(Self::WithTypeAndContext(core, ty, ctx)),
            _ => Err(invalid_len(bytes.len())),
        }
    }

    /// Renders this id in `repr`.
    pub fn encode(&self, repr: Representation) -> String {
        repr.encode(&self.to_bytes())
    }

    /// Parses an id previously rendered in `repr`.
    ///
    /// Decimal text carries no width, so its value is placed in the shortest
    /// valid layout that holds it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the text does not match `repr`'s charset
    /// and width rules or does not decode to 8, 9 or 10 bytes.
    pub fn decode(text: &str, repr: Representation) -> Result<Self> {
        let bytes = repr.decode(text)?;
        match repr {
            Representation::Decimal => {
                let Some(&len) = Self::VALID_LENS.iter().find(|&&len| len >= bytes.len()) else {
                    return Err(invalid_len(bytes.len()));
                };
                let mut padded = vec![0; len - bytes.len()];
                padded.extend_from_slice(&bytes);
                Self::from_bytes(&padded)
            }
            Representation::Hex | Representation::UrlSafe | Representation::Binary => {
                Self::from_bytes(&bytes)
            }
        }
    }
}

impl From<CoreId> for FullId {
    fn from(core: CoreId) -> Self {
        Self::CoreOnly(core)
    }
}

impl fmt::Display for FullId {
    /// Formats as lowercase hex, the canonical sortable form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(Representation::Hex))
    }
}

fn invalid_len(len: usize) -> Error {
    Error::format("id", format!("{len} bytes, expected 8, 9 or 10"))
}

/// Parses exactly two hex digits (either case) into a byte.
///
/// # Errors
///
/// Returns [`Error::Format`] naming `what` on wrong length or non-hex
/// characters.
pub fn parse_hex_byte(what: &'static str, text: &str) -> Result<u8> {
    if text.len() != 2 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::format(
            what,
            format!("{text:?} is not a two-digit hex byte"),
        ));
    }
    u8::from_str_radix(text, 16).map_err(|e| Error::format(what, e.to_string()))
}
