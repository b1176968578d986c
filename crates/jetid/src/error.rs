use crate::Representation;

/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `jetid` can produce.
///
/// Every operation fails fast with the first violation it detects. The only
/// operations that never return an error are the classifying ones
/// ([`validate_id`](crate::validate_id) and
/// [`get_short_components`](crate::get_short_components)), which report
/// malformed input through their return value instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Input text or bytes do not match the expected charset, length or
    /// structure.
    #[error("invalid {what}: {reason}")]
    Format {
        /// What was being parsed (e.g. `"HEX id"`, `"type identifier"`).
        what: &'static str,
        /// Human-readable description of the violation.
        reason: String,
    },

    /// A numeric field does not fit its reserved bit width or range.
    #[error("{field} out of range: {value} (max {max})")]
    Range {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// The largest accepted value.
        max: u64,
    },

    /// The context byte was supplied without a type identifier.
    #[error("context requires a type identifier")]
    ContextWithoutType,

    /// The clock reported a time earlier than the last issued timestamp.
    ///
    /// Generation aborts immediately instead of waiting for the clock to
    /// catch up.
    #[error("clock moved backwards: now {now} ms < last {last} ms")]
    ClockRegression {
        /// Observed time, in milliseconds since the custom epoch.
        now: u64,
        /// Last issued timestamp, in milliseconds since the custom epoch.
        last: u64,
    },

    /// The system clock reads earlier than the custom epoch.
    ///
    /// No timestamp can be issued, so generation fails instead of waiting.
    #[error("clock reads {unix_millis} ms since the Unix epoch, before the 2020 epoch")]
    ClockBeforeEpoch {
        /// Observed time, in milliseconds since the Unix epoch.
        unix_millis: u64,
    },

    /// The requested field is not present in an id of this length.
    #[error("{field} is not present in this {repr} id")]
    NotPresent {
        /// The missing field.
        field: &'static str,
        /// Representation the id was decoded from.
        repr: Representation,
    },
}

/// Fails with [`Error::Range`] if `value > max`.
pub(crate) fn check_range(field: &'static str, value: u64, max: u64) -> Result<()> {
    if value > max {
        return Err(Error::Range { field, value, max });
    }
    Ok(())
}

impl Error {
    pub(crate) fn format(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Format {
            what,
            reason: reason.into(),
        }
    }
}

/// The four error categories an [`Error`] falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong charset, length or structure.
    Format,
    /// A field outside its range (including a clock before the epoch), or a
    /// field without the slot it needs.
    Range,
    /// The clock went backwards.
    ClockRegression,
    /// A requested field is absent.
    NotPresent,
}

impl Error {
    /// Returns the category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Format { .. } => ErrorKind::Format,
            Self::Range { .. } | Self::ContextWithoutType | Self::ClockBeforeEpoch { .. } => {
                ErrorKind::Range
            }
            Self::ClockRegression { .. } => ErrorKind::ClockRegression,
            Self::NotPresent { .. } => ErrorKind::NotPresent,
        }
    }
}
