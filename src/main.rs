//! Command-line interface for the file forensics engine
//!
//! Thin presentation layer: parses arguments, hands each path to
//! `ffx::analyze`, and prints the resulting reports. Multiple files are
//! analyzed in parallel; analyses share no state.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgAction, Command};
use rayon::prelude::*;
use tracing::{error, Level};

use ffx::{analyze, ForensicReport, ParsedMetadata};

fn cli() -> Command {
    Command::new("ffx")
        .about("File forensics: digests, signatures, entropy, steganography indicators, anomalies")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("files")
                .help("Files to analyze")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Append)
                .required(true),
        )
        .arg(
            Arg::new("metadata")
                .long("metadata")
                .short('m')
                .help("JSON file with parsed metadata from an external format parser")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["json", "text"])
                .default_value("json"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("Log verbosity")
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .default_value("warn"),
        )
}

fn main() {
    let matches = cli().get_matches();

    let level: Level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("warn")
        .parse()
        .unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let metadata = match matches.get_one::<PathBuf>("metadata") {
        Some(path) => match load_metadata(path) {
            Ok(meta) => meta,
            Err(message) => {
                error!("{}", message);
                eprintln!("{}", message);
                process::exit(2);
            }
        },
        None => ParsedMetadata::default(),
    };

    let files: Vec<PathBuf> = matches
        .get_many::<PathBuf>("files")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default();
    let as_text = matches.get_one::<String>("format").map(String::as_str) == Some("text");

    let reports: Vec<(PathBuf, ForensicReport)> = files
        .par_iter()
        .map(|path| (path.clone(), analyze(path, metadata.clone())))
        .collect();

    let mut failed = false;
    for (path, report) in &reports {
        if as_text {
            print_text(path, report);
        } else {
            match serde_json::to_string_pretty(report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    error!(path = %path.display(), "report serialization failed: {}", e);
                    failed = true;
                }
            }
        }
        if !report.errors.is_empty() {
            failed = true;
        }
    }

    if failed {
        process::exit(1);
    }
}

fn load_metadata(path: &PathBuf) -> Result<ParsedMetadata, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("cannot read metadata file {}: {}", path.display(), e))?;
    serde_json::from_str(&raw)
        .map_err(|e| format!("cannot parse metadata file {}: {}", path.display(), e))
}

fn print_text(path: &std::path::Path, report: &ForensicReport) {
    println!("=== {} ===", path.display());
    for err in &report.errors {
        println!("  error: {}", err);
    }
    let Some(info) = &report.file_info else {
        return;
    };
    println!("  size: {} bytes", info.file_size);
    println!("  magic: {}", report.signatures.magic_number);
    for (format, m) in &report.signatures.known_signatures {
        println!("  format: {} ({})", format, m.description);
    }
    if let Some(mismatch) = report.signatures.extension_mismatch {
        println!("  extension mismatch: {}", mismatch);
    }
    if let Some(sha256) = report.hashes.whole.get("sha256") {
        println!("  sha256: {}", sha256);
    }
    println!("  header entropy: {:.4}", report.header_analysis.entropy);
    if let Some(trailer) = &report.trailer_analysis {
        println!("  trailer entropy: {:.4}", trailer.window.entropy);
        for embedded in &trailer.embedded_signatures {
            println!(
                "  embedded: {} at trailer offset {}",
                embedded.signature, embedded.offset
            );
        }
    }
    if report.anomalies.is_empty() {
        println!("  anomalies: none");
    } else {
        for anomaly in &report.anomalies {
            println!("  anomaly: {}", anomaly);
        }
    }
}
