use anyhow::{Context, bail};
use clap::Parser;
use jetid::Representation;

/// Command-line arguments of the `jetid` binary.
///
/// The flags select one operation; when several are given, the first match
/// in this order wins: `--rrn`, an id to inspect (positional or
/// `--convert`), `--short`, `--hex`, `--decimal`, `--binary`, and finally
/// URL-safe generation, which is also what a bare `jetid` does.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "jetid",
    version,
    about = "Generate, convert and inspect jetid identifiers",
    after_help = "Examples:
  jetid --hex 05
  jetid --urlsafe
  jetid --convert 1bxd3N9RUsdb --from URLSAFE --to HEX
  jetid 0a1b2c3d4e5f6a7b05 --from HEX --to DECIMAL
  jetid --validate 1bxd3N9RUsdb
  jetid --explain 1bxd3N9RUsdb
  jetid 1bxd3N9RUsdb --get-type
  jetid --rrn"
)]
pub struct CliArgs {
    /// Id to convert or inspect.
    #[arg(value_name = "ID")]
    pub id: Option<String>,

    /// Id to convert or inspect; takes precedence over the positional id.
    #[arg(long, value_name = "ID")]
    pub convert: Option<String>,

    /// Generate a hex id, optionally with a type identifier.
    #[arg(long, value_name = "TYPE", num_args = 0..=1, default_missing_value = "")]
    pub hex: Option<String>,

    /// Generate a URL-safe id, optionally with a type identifier.
    #[arg(long, value_name = "TYPE", num_args = 0..=1, default_missing_value = "")]
    pub urlsafe: Option<String>,

    /// Generate a decimal id, optionally with a type identifier.
    #[arg(long, value_name = "TYPE", num_args = 0..=1, default_missing_value = "")]
    pub decimal: Option<String>,

    /// Generate a binary id, optionally with a type identifier.
    #[arg(long, value_name = "TYPE", num_args = 0..=1, default_missing_value = "")]
    pub binary: Option<String>,

    /// Generate a 9-character short id with the given type identifier.
    #[arg(long, value_name = "TYPE")]
    pub short: Option<String>,

    /// Client id (0-1023) embedded in generated ids.
    ///
    /// Environment variable: `JETID_CLIENT_ID`
    #[arg(long, alias = "clientId", env = "JETID_CLIENT_ID", value_name = "ID")]
    pub client_id: Option<u64>,

    /// Context byte (two hex digits) appended after the type identifier.
    #[arg(long, value_name = "CTX")]
    pub context: Option<String>,

    /// Representation of the id being inspected.
    #[arg(long, value_name = "REP", default_value = "URLSAFE")]
    pub from: Representation,

    /// Target representation for conversion.
    #[arg(long, value_name = "REP", default_value = "HEX")]
    pub to: Representation,

    /// Validate the id; the generation flag's value is the expected type.
    #[arg(long)]
    pub validate: bool,

    /// Break the id down into its components.
    #[arg(long)]
    pub explain: bool,

    /// Print `--explain` output as JSON.
    #[arg(long, requires = "explain")]
    pub json: bool,

    /// Compare the id with another, ignoring the context byte.
    #[arg(long, value_name = "ID")]
    pub compare: Option<String>,

    /// Print the id's type identifier.
    #[arg(long, alias = "getType")]
    pub get_type: bool,

    /// Print the id's context byte.
    #[arg(long, alias = "getContext")]
    pub get_context: bool,

    /// Generate a Retrieval Reference Number, optionally with a fixed STAN.
    #[arg(long, value_name = "STAN", num_args = 0..=1, default_missing_value = "")]
    pub rrn: Option<String>,
}

/// The single operation one invocation performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Rrn {
        stan: Option<u64>,
    },
    Convert {
        id: String,
        from: Representation,
        to: Representation,
    },
    Validate {
        id: String,
        from: Representation,
        expected_type: Option<String>,
    },
    ValidateShort {
        id: String,
    },
    Explain {
        id: String,
        from: Representation,
        json: bool,
    },
    ExplainShort {
        id: String,
        json: bool,
    },
    Compare {
        id: String,
        other: String,
        from: Representation,
    },
    GetType {
        id: String,
        from: Representation,
    },
    GetContext {
        id: String,
        from: Representation,
    },
    Short {
        type_identifier: String,
    },
    Generate {
        repr: Representation,
        type_identifier: Option<String>,
    },
}

/// Validated configuration of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub command: Command,
    pub client_id: Option<u64>,
    pub context: Option<String>,
}

/// Length of a short id; such inputs to `--validate`/`--explain` are routed
/// to the short-id decoder.
const SHORT_ID_LEN: usize = jetid::ShortId::LEN;

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let command = select_command(&args)?;
        Ok(Self {
            command,
            client_id: args.client_id,
            context: args.context,
        })
    }
}

fn select_command(args: &CliArgs) -> anyhow::Result<Command> {
    if let Some(stan) = &args.rrn {
        let stan = non_empty(stan)
            .map(|s| s.parse::<u64>().with_context(|| format!("invalid STAN `{s}`")))
            .transpose()?;
        return Ok(Command::Rrn { stan });
    }

    if let Some(id) = args.convert.clone().or_else(|| args.id.clone()) {
        let from = args.from;
        let is_short = id.len() == SHORT_ID_LEN;
        let command = if args.validate {
            if is_short {
                Command::ValidateShort { id }
            } else {
                Command::Validate {
                    id,
                    from,
                    expected_type: generation_type(args),
                }
            }
        } else if args.explain {
            if is_short {
                Command::ExplainShort {
                    id,
                    json: args.json,
                }
            } else {
                Command::Explain {
                    id,
                    from,
                    json: args.json,
                }
            }
        } else if let Some(other) = args.compare.clone() {
            Command::Compare { id, other, from }
        } else if args.get_type {
            Command::GetType { id, from }
        } else if args.get_context {
            Command::GetContext { id, from }
        } else {
            Command::Convert {
                id,
                from,
                to: args.to,
            }
        };
        return Ok(command);
    }

    if let Some(ty) = &args.short {
        let Some(ty) = non_empty(ty) else {
            bail!("Short ID requires a type identifier (e.g., --short '0A')");
        };
        return Ok(Command::Short {
            type_identifier: ty.to_owned(),
        });
    }

    let (repr, ty) = [
        (Representation::Hex, &args.hex),
        (Representation::Decimal, &args.decimal),
        (Representation::Binary, &args.binary),
    ]
    .into_iter()
    .find_map(|(repr, ty)| ty.as_ref().map(|ty| (repr, ty.as_str())))
    .unwrap_or((
        Representation::UrlSafe,
        args.urlsafe.as_deref().unwrap_or_default(),
    ));

    Ok(Command::Generate {
        repr,
        type_identifier: non_empty(ty).map(str::to_owned),
    })
}

/// The first non-empty type given to a generation flag.
fn generation_type(args: &CliArgs) -> Option<String> {
    [&args.hex, &args.urlsafe, &args.decimal, &args.binary]
        .into_iter()
        .flatten()
        .find_map(|ty| non_empty(ty))
        .map(str::to_owned)
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> CliConfig {
        let args = CliArgs::try_parse_from(core::iter::once("jetid").chain(args.iter().copied()))
            .unwrap();
        CliConfig::try_from(args).unwrap()
    }

    #[test]
    fn clap_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn bare_invocation_generates_urlsafe() {
        assert_eq!(
            parse(&[]).command,
            Command::Generate {
                repr: Representation::UrlSafe,
                type_identifier: None
            }
        );
    }

    #[test]
    fn generation_flags_take_optional_type() {
        assert_eq!(
            parse(&["--hex", "05"]).command,
            Command::Generate {
                repr: Representation::Hex,
                type_identifier: Some("05".into())
            }
        );
        assert_eq!(
            parse(&["--binary"]).command,
            Command::Generate {
                repr: Representation::Binary,
                type_identifier: None
            }
        );
        assert_eq!(
            parse(&["--urlsafe", "0a", "--context", "ff", "--client-id", "9"]),
            CliConfig {
                command: Command::Generate {
                    repr: Representation::UrlSafe,
                    type_identifier: Some("0a".into())
                },
                client_id: Some(9),
                context: Some("ff".into()),
            }
        );
    }

    #[test]
    fn hex_wins_over_decimal_and_binary() {
        assert_eq!(
            parse(&["--binary", "01", "--hex", "02"]).command,
            Command::Generate {
                repr: Representation::Hex,
                type_identifier: Some("02".into())
            }
        );
    }

    #[test]
    fn id_defaults_to_urlsafe_to_hex_conversion() {
        assert_eq!(
            parse(&["1bxd3N9RUsdb"]).command,
            Command::Convert {
                id: "1bxd3N9RUsdb".into(),
                from: Representation::UrlSafe,
                to: Representation::Hex
            }
        );
        assert_eq!(
            parse(&["--convert", "ab", "--from", "hex", "--to", "DECIMAL", "ignored"]).command,
            Command::Convert {
                id: "ab".into(),
                from: Representation::Hex,
                to: Representation::Decimal
            }
        );
    }

    #[test]
    fn validate_uses_generation_flag_as_expected_type() {
        assert_eq!(
            parse(&["--validate", "0123456789abcdef05", "--from", "HEX", "--hex", "05"]).command,
            Command::Validate {
                id: "0123456789abcdef05".into(),
                from: Representation::Hex,
                expected_type: Some("05".into())
            }
        );
    }

    #[test]
    fn nine_character_ids_are_short() {
        assert_eq!(
            parse(&["--validate", "ABCDEFGHI"]).command,
            Command::ValidateShort {
                id: "ABCDEFGHI".into()
            }
        );
        assert_eq!(
            parse(&["--explain", "ABCDEFGHI", "--json"]).command,
            Command::ExplainShort {
                id: "ABCDEFGHI".into(),
                json: true
            }
        );
    }

    #[test]
    fn inspection_flags() {
        assert_eq!(
            parse(&["x", "--compare", "y"]).command,
            Command::Compare {
                id: "x".into(),
                other: "y".into(),
                from: Representation::UrlSafe
            }
        );
        assert_eq!(
            parse(&["x", "--getType"]).command,
            Command::GetType {
                id: "x".into(),
                from: Representation::UrlSafe
            }
        );
        assert_eq!(
            parse(&["x", "--get-context", "--from", "binary"]).command,
            Command::GetContext {
                id: "x".into(),
                from: Representation::Binary
            }
        );
    }

    #[test]
    fn rrn_takes_optional_stan() {
        assert_eq!(parse(&["--rrn"]).command, Command::Rrn { stan: None });
        assert_eq!(
            parse(&["--rrn", "42", "--hex"]).command,
            Command::Rrn { stan: Some(42) }
        );
        let args = CliArgs::try_parse_from(["jetid", "--rrn", "abc"]).unwrap();
        assert!(CliConfig::try_from(args).is_err());
    }

    #[test]
    fn short_requires_type() {
        assert_eq!(
            parse(&["--short", "0A"]).command,
            Command::Short {
                type_identifier: "0A".into()
            }
        );
        let args = CliArgs::try_parse_from(["jetid", "--short", ""]).unwrap();
        let err = CliConfig::try_from(args).unwrap_err();
        assert!(err.to_string().contains("requires a type identifier"));
    }

    #[test]
    fn unknown_representation_is_rejected() {
        assert!(CliArgs::try_parse_from(["jetid", "x", "--from", "BASE64"]).is_err());
    }
}
