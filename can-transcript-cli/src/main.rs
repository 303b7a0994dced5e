//! CAN Transcript Reader CLI Application
//!
//! This is the command-line interface for the transcript decoder. It uses
//! the can-transcript-decoder library and adds:
//! - Argument parsing and logging setup
//! - TXT/JSON report writing
//! - TOML-driven batch decoding of multiple transcripts

use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use can_transcript_decoder::TranscriptDecoder;

mod config;
mod report;

use report::OutputFormat;

/// CAN Transcript Reader - Decode ISO-TP transcripts into messages
#[derive(Parser, Debug)]
#[command(name = "can-transcript-cli")]
#[command(about = "Decode CAN bus transcripts into reassembled messages", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the transcript file to decode
    #[arg(value_name = "FILE")]
    transcript: Option<PathBuf>,

    /// Output file for decoded messages (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "txt")]
    format: OutputFormat,

    /// Path to configuration file (config.toml) for batch decoding
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of messages to report
    #[arg(long, value_name = "COUNT")]
    max_messages: Option<usize>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("CAN Transcript Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", can_transcript_decoder::VERSION);

    if let Some(transcript) = args.transcript.clone() {
        decode_single(&transcript, &args)
    } else if let Some(config_path) = args.config.clone() {
        batch_mode(&config_path)
    } else {
        println!("CAN Transcript Reader - No input specified");
        println!("\nQuick Start:");
        println!("  can-transcript-cli transcript.txt");
        println!("  can-transcript-cli transcript.txt --format json --output messages.json");
        println!("\nFor batch decoding:");
        println!("  can-transcript-cli --config config.toml");
        println!("\nUse --help for more options");
        Ok(())
    }
}

/// Decode one transcript and write its report.
///
/// Messages decoded before a failure are still written; the failure is then
/// reported with the line that triggered it and the process exits nonzero.
fn decode_single(path: &Path, args: &Args) -> Result<()> {
    let decoder = TranscriptDecoder::new();
    let mut transcript = decoder
        .decode_file(path)
        .with_context(|| format!("Failed to open transcript: {:?}", path))?;

    if let Some(limit) = args.max_messages {
        transcript.messages.truncate(limit);
    }

    let mut out: Box<dyn Write> = match &args.output {
        Some(out_path) => Box::new(
            File::create(out_path)
                .with_context(|| format!("Failed to create output file: {:?}", out_path))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    report::write_messages(&mut out, &transcript.messages, args.format)?;

    log::info!(
        "Decoded {} message(s) from {:?}",
        transcript.messages.len(),
        path
    );

    if let Some(failure) = transcript.failure {
        log::error!("Parse aborted: {}", failure);
        return Err(anyhow::Error::new(failure).context(format!("Failed to parse {:?}", path)));
    }
    Ok(())
}

/// Decode every transcript named in the configuration file.
///
/// Files are independent: a failing transcript is logged and counted, and
/// the remaining files are still processed.
fn batch_mode(config_path: &Path) -> Result<()> {
    log::info!("Loading configuration from: {:?}", config_path);
    let config = config::load_config(config_path)?;

    let decoder = TranscriptDecoder::new();
    let mut failed = 0usize;
    for file in &config.input.files {
        print!("Decoding {:?} ... ", file);
        io::stdout().flush()?;
        match decode_to_report(&decoder, file, &config.output) {
            Ok(count) => println!("✓ ({} messages)", count),
            Err(e) => {
                println!("✗");
                log::error!("{:#}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} transcript(s) failed to decode", failed);
    }
    Ok(())
}

/// Decode one transcript and write its report into the configured location
fn decode_to_report(
    decoder: &TranscriptDecoder,
    file: &Path,
    output: &config::OutputConfig,
) -> Result<usize> {
    let transcript = decoder
        .decode_file(file)
        .with_context(|| format!("Failed to open transcript: {:?}", file))?;

    match &output.output_dir {
        Some(dir) => {
            let stem = file.file_stem().unwrap_or_else(|| OsStr::new("transcript"));
            let out_path = dir.join(stem).with_extension(output.format.extension());
            let mut out = File::create(&out_path)
                .with_context(|| format!("Failed to create report file: {:?}", out_path))?;
            report::write_messages(&mut out, &transcript.messages, output.format)?;
            log::info!("Report written to {:?}", out_path);
        }
        None => {
            report::write_messages(&mut io::stdout().lock(), &transcript.messages, output.format)?;
        }
    }

    let count = transcript.messages.len();
    match transcript.failure {
        Some(failure) => {
            Err(anyhow::Error::new(failure).context(format!("Failed to parse {:?}", file)))
        }
        None => Ok(count),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
