use chrono::SecondsFormat;
use jetid::{Explanation, ShortComponents};
use std::io::Write;

const RULE: &str = "--------------------------------";

fn hex_or_none(byte: Option<u8>) -> String {
    byte.map_or_else(|| String::from("None"), |b| format!("{b:02x}"))
}

/// Writes the breakdown of a full id, as text or pretty JSON.
pub fn explanation(out: &mut impl Write, details: &Explanation, json: bool) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, details)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "JetID Component Breakdown")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{:<17}{}", "URL-Safe:", details.id.urlsafe)?;
    writeln!(out, "{:<17}{}", "Hex:", details.id.hex)?;
    writeln!(out, "{:<17}{}", "Decimal:", details.id.decimal)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{:<17}{}", "Timestamp:", details.created_timestamp_readable)?;
    writeln!(out, "{:<17}{}", "Client ID:", details.client_id)?;
    writeln!(out, "{:<17}{}", "Sequence:", details.sequence)?;
    writeln!(out, "{:<17}{}", "Type ID:", hex_or_none(details.type_identifier))?;
    if details.context.is_some() {
        writeln!(out, "{:<17}{}", "Context:", hex_or_none(details.context))?;
    }
    Ok(())
}

/// Writes the breakdown of a short id. Invalid ids only report validity.
pub fn short_components(
    out: &mut impl Write,
    id: &str,
    details: &ShortComponents,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, details)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Short ID Breakdown")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{:<17}{}", "ID:", id)?;
    writeln!(
        out,
        "{:<17}{}",
        "Valid:",
        if details.is_valid { "Yes" } else { "No" }
    )?;
    if details.is_valid {
        if let Some(timestamp) = details.timestamp {
            let readable = timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
            writeln!(out, "{:<17}{}", "Timestamp:", readable)?;
        }
        writeln!(
            out,
            "{:<17}{}",
            "Type Identifier:",
            hex_or_none(details.type_identifier)
        )?;
        if details.context.is_some() {
            writeln!(out, "{:<17}{}", "Context:", hex_or_none(details.context))?;
        }
    }
    Ok(())
}
