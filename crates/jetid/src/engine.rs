#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    CoreGenerator, CoreId, Error, FullId, Representation, Result, ShortId, TimeSource, WallClock,
    default_client_id, error::check_range, get_context, get_type, parse_hex_byte, validate_id,
};

/// Optional inputs to the generation operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerateOptions<'a> {
    /// Overrides the engine's client id for this call.
    pub client_id: Option<u64>,
    /// Context byte as two hex digits; requires a type identifier.
    pub context: Option<&'a str>,
}

/// The id engine of one logical node.
///
/// Owns the node's [`CoreGenerator`] (and with it the only mutable state in
/// the crate) together with the client id used when a call does not supply
/// one. Share one engine per node, e.g. behind an `Arc`; every method takes
/// `&self`.
///
/// # Example
/// ```
/// use jetid::{GenerateOptions, IdEngine, Representation};
///
/// let engine = IdEngine::new();
/// let id = engine
///     .generate(Representation::Hex, Some("05"), GenerateOptions::default())
///     .unwrap();
/// assert_eq!(id.len(), 18);
/// assert!(id.ends_with("05"));
/// ```
#[derive(Debug)]
pub struct IdEngine<T = WallClock>
where
    T: TimeSource,
{
    generator: CoreGenerator<T>,
    client_id: u64,
}

impl IdEngine<WallClock> {
    /// An engine on the system clock with a client id derived from the
    /// process identity.
    pub fn new() -> Self {
        Self::with_time_source(WallClock)
    }
}

impl Default for IdEngine<WallClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IdEngine<T>
where
    T: TimeSource,
{
    /// Creates an engine reading `time`, with the default client id of
    /// this process.
    pub fn with_time_source(time: T) -> Self {
        Self {
            generator: CoreGenerator::new(time),
            client_id: default_client_id(),
        }
    }

    /// Replaces the default client id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Range`] if `client_id` does not fit in 10 bits.
    pub fn with_client_id(mut self, client_id: u64) -> Result<Self> {
        check_range("client id", client_id, CoreId::max_client_id())?;
        self.client_id = client_id;
        Ok(self)
    }

    /// The client id used when a call supplies none.
    pub const fn client_id(&self) -> u64 {
        self.client_id
    }

    /// The underlying core generator.
    pub const fn generator(&self) -> &CoreGenerator<T> {
        &self.generator
    }

    /// Issues a new core id, blocking briefly if the current millisecond's
    /// sequence space is exhausted.
    ///
    /// # Errors
    ///
    /// - [`Error::Range`] if `client_id` does not fit in 10 bits
    /// - [`Error::ClockRegression`] if the clock moved backwards
    pub fn generate_core(&self, client_id: Option<u64>) -> Result<CoreId> {
        self.generator.next_id(client_id.unwrap_or(self.client_id))
    }

    /// Issues a new id with the requested suffix.
    ///
    /// The suffix is validated before a sequence number is consumed.
    ///
    /// # Errors
    ///
    /// - [`Error::Format`] if the type or context is not two hex digits
    /// - [`Error::ContextWithoutType`] if only a context is given
    /// - any error of [`Self::generate_core`]
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self), err))]
    pub fn generate_id(
        &self,
        type_identifier: Option<&str>,
        options: GenerateOptions<'_>,
    ) -> Result<FullId> {
        let suffix = parse_suffix(type_identifier, options.context)?;
        let core = self.generate_core(options.client_id)?;
        Ok(suffix.with_core(core))
    }

    /// Issues a new id rendered in `repr`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate_id`].
    pub fn generate(
        &self,
        repr: Representation,
        type_identifier: Option<&str>,
        options: GenerateOptions<'_>,
    ) -> Result<String> {
        Ok(self.generate_id(type_identifier, options)?.encode(repr))
    }

    /// Issues a new 9-character short id for the current second.
    ///
    /// Short ids carry no client id; a supplied one is only range checked.
    ///
    /// # Errors
    ///
    /// - [`Error::Format`] if the type or context is not two hex digits
    /// - [`Error::Range`] if the client id does not fit in 10 bits
    /// - [`Error::ClockBeforeEpoch`] if the clock reads before 2020
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self), err))]
    pub fn generate_short(
        &self,
        type_identifier: &str,
        options: GenerateOptions<'_>,
    ) -> Result<String> {
        let suffix = parse_suffix(Some(type_identifier), options.context)?;
        if let Some(client_id) = options.client_id {
            check_range("client id", client_id, CoreId::max_client_id())?;
        }
        let secs = self.generator.time().try_current_millis()? / 1000;
        let ty = suffix.type_identifier().unwrap_or_default();
        let id = ShortId::new(secs, ty, suffix.context())?;
        Ok(id.pack())
    }
}

/// Validates a suffix on a placeholder core.
fn parse_suffix(type_identifier: Option<&str>, context: Option<&str>) -> Result<FullId> {
    FullId::attach(CoreId::from_raw(0), type_identifier, context)
}

/// Like [`validate_id`], with the expected type given as two hex digits.
///
/// An unparseable expected type makes the id invalid.
pub fn validate(id: &str, repr: Representation, expected_type: Option<&str>) -> bool {
    match expected_type.map(|t| parse_hex_byte("type identifier", t)) {
        None => validate_id(id, repr, None),
        Some(Ok(ty)) => validate_id(id, repr, Some(ty)),
        Some(Err(_)) => false,
    }
}

/// Like [`get_type`], rendered as two lowercase hex digits.
///
/// # Errors
///
/// Same as [`get_type`].
pub fn get_type_hex(id: &str, repr: Representation) -> Result<String> {
    get_type(id, repr).map(|b| format!("{b:02x}"))
}

/// Like [`get_context`], rendered as two lowercase hex digits.
///
/// # Errors
///
/// Same as [`get_context`].
pub fn get_context_hex(id: &str, repr: Representation) -> Result<String> {
    get_context(id, repr).map(|b| format!("{b:02x}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, compare_ids, convert, get_short_components};
    use std::collections::HashSet;

    struct FixedTime(u64);

    impl TimeSource for FixedTime {
        fn current_millis(&self) -> u64 {
            self.0
        }
    }

    struct PreEpochTime;

    impl TimeSource for PreEpochTime {
        fn current_millis(&self) -> u64 {
            0
        }

        fn try_current_millis(&self) -> Result<u64> {
            Err(Error::ClockBeforeEpoch { unix_millis: 0 })
        }
    }

    fn no_options() -> GenerateOptions<'static> {
        GenerateOptions::default()
    }

    #[test]
    fn pre_epoch_clock_fails_both_generators() {
        let engine = IdEngine::with_time_source(PreEpochTime);
        let err = engine
            .generate(Representation::Hex, Some("05"), no_options())
            .unwrap_err();
        assert_eq!(err, Error::ClockBeforeEpoch { unix_millis: 0 });
        let err = engine.generate_short("05", no_options()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn hex_with_type_is_18_lowercase_chars_ending_in_type() {
        let id = IdEngine::new()
            .generate(Representation::Hex, Some("05"), no_options())
            .unwrap();
        assert_eq!(id.len(), 18);
        assert!(id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
        assert!(id.ends_with("05"));
    }

    #[test]
    fn urlsafe_without_type_is_longer_than_10() {
        let id = IdEngine::new()
            .generate(Representation::UrlSafe, None, no_options())
            .unwrap();
        assert!(id.len() > 10);
    }

    #[test]
    fn context_is_ignored_by_compare() {
        let a = IdEngine::with_time_source(FixedTime(42))
            .with_client_id(1)
            .unwrap()
            .generate(
                Representation::Hex,
                Some("05"),
                GenerateOptions {
                    context: Some("AA"),
                    ..no_options()
                },
            )
            .unwrap();
        let b = IdEngine::with_time_source(FixedTime(42))
            .with_client_id(1)
            .unwrap()
            .generate(
                Representation::Hex,
                Some("05"),
                GenerateOptions {
                    context: Some("BB"),
                    ..no_options()
                },
            )
            .unwrap();
        assert_ne!(a, b);
        assert!(a.ends_with("05aa"));
        assert_eq!(compare_ids(&a, &b, Representation::Hex), Ok(true));
    }

    #[test]
    fn suffix_errors_do_not_consume_sequence() {
        let engine = IdEngine::with_time_source(FixedTime(42));
        let options = GenerateOptions {
            context: Some("AA"),
            ..no_options()
        };
        let err = engine.generate(Representation::Hex, None, options).unwrap_err();
        assert_eq!(err, Error::ContextWithoutType);
        assert_eq!(err.kind(), ErrorKind::Range);
        let err = engine
            .generate(Representation::Hex, Some("5"), no_options())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(engine.generator().state().last_timestamp, None);
    }

    #[test]
    fn explicit_client_id_is_embedded_and_range_checked() {
        let engine = IdEngine::new().with_client_id(3).unwrap();
        let id = engine.generate_id(Some("01"), no_options()).unwrap();
        assert_eq!(id.core().client_id(), 3);

        let options = GenerateOptions {
            client_id: Some(1023),
            ..no_options()
        };
        let id = engine.generate_id(None, options).unwrap();
        assert_eq!(id.core().client_id(), 1023);

        let options = GenerateOptions {
            client_id: Some(1024),
            ..no_options()
        };
        let err = engine.generate_id(None, options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(IdEngine::new().with_client_id(4096).is_err());
    }

    #[test]
    fn generated_ids_sort_in_creation_order() {
        let engine = IdEngine::new();
        let ids: Vec<FullId> = (0..10_000)
            .map(|_| engine.generate_id(Some("07"), no_options()).unwrap())
            .collect();
        for repr in [Representation::Hex, Representation::UrlSafe] {
            let encoded: Vec<String> = ids.iter().map(|id| id.encode(repr)).collect();
            assert!(encoded.windows(2).all(|w| w[0] < w[1]), "{repr} not sorted");
        }
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn generated_ids_convert_between_all_representations() {
        let engine = IdEngine::new();
        let id = engine
            .generate_id(
                Some("0a"),
                GenerateOptions {
                    context: Some("ff"),
                    ..no_options()
                },
            )
            .unwrap();
        for from in Representation::ALL {
            for to in Representation::ALL {
                let text = id.encode(from);
                let there = convert(&text, from, to).unwrap();
                assert_eq!(there, id.encode(to));
                assert_eq!(convert(&there, to, from), Ok(text));
            }
        }
    }

    #[test]
    fn short_ids_decode_to_current_second() {
        let engine = IdEngine::with_time_source(FixedTime(86_400_500));
        let options = GenerateOptions {
            context: Some("0c"),
            ..no_options()
        };
        let text = engine.generate_short("0A", options).unwrap();
        assert_eq!(text.len(), 9);

        let parts = get_short_components(&text);
        assert!(parts.is_valid);
        assert_eq!(parts.type_identifier, Some(0x0A));
        assert_eq!(parts.context, Some(0x0C));
        assert_eq!(
            parts.timestamp.map(|t| t.to_rfc3339()),
            Some(String::from("2020-01-02T00:00:00+00:00"))
        );
    }

    #[test]
    fn short_requires_well_formed_type() {
        let engine = IdEngine::new();
        assert_eq!(
            engine.generate_short("", no_options()).unwrap_err().kind(),
            ErrorKind::Format
        );
        let options = GenerateOptions {
            client_id: Some(2000),
            ..no_options()
        };
        assert_eq!(
            engine.generate_short("01", options).unwrap_err().kind(),
            ErrorKind::Range
        );
    }

    #[test]
    fn string_typed_helpers() {
        let id = FullId::WithTypeAndContext(CoreId::from(1, 2, 3), 0x0B, 0xC0)
            .encode(Representation::Binary);
        assert!(validate(&id, Representation::Binary, Some("0B")));
        assert!(!validate(&id, Representation::Binary, Some("0C")));
        assert!(!validate(&id, Representation::Binary, Some("zz")));
        assert!(validate(&id, Representation::Binary, None));
        assert_eq!(get_type_hex(&id, Representation::Binary), Ok(String::from("0b")));
        assert_eq!(get_context_hex(&id, Representation::Binary), Ok(String::from("c0")));
    }
}
