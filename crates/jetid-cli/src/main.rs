#![doc = include_str!("../README.md")]

mod config;
mod render;
mod telemetry;

use clap::Parser;
use config::{CliArgs, CliConfig, Command};
use jetid::{
    GenerateOptions, IdEngine, TimeSource, compare_ids, convert, explain_id, generate_rrn,
    get_context_hex, get_short_components, get_type_hex, validate, validate_short,
};
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    telemetry::init_tracing()?;
    let config = CliConfig::try_from(args)?;
    tracing::debug!(?config, "dispatching");

    let engine = IdEngine::new();
    let stdout = std::io::stdout();
    execute(&config, &engine, &mut stdout.lock())
}

/// Runs one command, writing its result to `out`.
fn execute<T>(config: &CliConfig, engine: &IdEngine<T>, out: &mut impl Write) -> anyhow::Result<()>
where
    T: TimeSource,
{
    let options = GenerateOptions {
        client_id: config.client_id,
        context: config.context.as_deref(),
    };

    match &config.command {
        Command::Rrn { stan } => writeln!(out, "{}", generate_rrn(*stan)?)?,
        Command::Convert { id, from, to } => writeln!(out, "{}", convert(id, *from, *to)?)?,
        Command::Validate {
            id,
            from,
            expected_type,
        } => writeln!(out, "{}", validate(id, *from, expected_type.as_deref()))?,
        Command::ValidateShort { id } => writeln!(out, "{}", validate_short(id))?,
        Command::Explain { id, from, json } => {
            render::explanation(out, &explain_id(id, *from)?, *json)?;
        }
        Command::ExplainShort { id, json } => {
            render::short_components(out, id, &get_short_components(id), *json)?;
        }
        Command::Compare { id, other, from } => {
            writeln!(out, "{}", compare_ids(id, other, *from)?)?;
        }
        Command::GetType { id, from } => writeln!(out, "{}", get_type_hex(id, *from)?)?,
        Command::GetContext { id, from } => writeln!(out, "{}", get_context_hex(id, *from)?)?,
        Command::Short { type_identifier } => {
            writeln!(out, "{}", engine.generate_short(type_identifier, options)?)?;
        }
        Command::Generate {
            repr,
            type_identifier,
        } => {
            let id = engine.generate(*repr, type_identifier.as_deref(), options)?;
            writeln!(out, "{id}")?;
        }
    }
    Ok(())
}
