//! Decoded message reports
//!
//! Renders decoded messages either as plain text, one `id: payload` line
//! per message, or as a JSON array for machine consumption.

use anyhow::Result;
use can_transcript_decoder::ParsedMessage;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Txt,
    Json,
}

impl OutputFormat {
    /// File extension used for reports written into an output directory
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Json => "json",
        }
    }
}

/// Write all decoded messages to `out` in the requested format
pub fn write_messages<W: Write>(
    out: &mut W,
    messages: &[ParsedMessage],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Txt => {
            for message in messages {
                writeln!(out, "{}", message)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, messages)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
