//! Forensic report assembly
//!
//! `analyze` is the crate's top-level entry point. It sequences the digest
//! engine, signature matcher, entropy analyzer, steganography detector, and
//! anomaly synthesizer over one file and returns a single immutable report.
//! A failure in one component never aborts the others; its note lands in
//! `errors` and the affected fields stay at their documented empty state.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::anomaly::{self, AnomalyInputs};
use crate::config::AnalysisConfig;
use crate::digest::{self, DigestSet};
use crate::entropy::{self, TrailerAnalysis, WindowAnalysis};
use crate::error::{Error, Result};
use crate::identity::FileIdentity;
use crate::metadata::ParsedMetadata;
use crate::signature::{self, SignatureProfile};
use crate::stego::{self, SteganographyIndicators};

/// Aggregated forensic facts about one file. Constructed fresh per analysis,
/// read-only afterwards, serializable to nested JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForensicReport {
    /// Absent only when the stat itself failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileIdentity>,
    pub hashes: DigestSet,
    pub signatures: SignatureProfile,
    pub header_analysis: WindowAnalysis,
    /// Absent for files smaller than the analysis window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailer_analysis: Option<TrailerAnalysis>,
    pub steganography_indicators: SteganographyIndicators,
    pub anomalies: Vec<String>,
    /// Caller-supplied parsed metadata, merged verbatim.
    pub parsed_metadata: ParsedMetadata,
    /// Component failure notes; empty for a clean analysis.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ForensicReport {
    /// A report-shaped error value for analyses that could not start.
    fn failure(metadata: ParsedMetadata, message: String) -> Self {
        Self {
            parsed_metadata: metadata,
            errors: vec![message],
            ..Default::default()
        }
    }
}

/// Analyzes the file at `path` with default settings.
///
/// Infallible at this level: precondition violations and unexpected
/// component failures are reported inside the returned value rather than
/// propagated, so callers never receive a half-built report without an
/// accompanying error annotation.
pub fn analyze(path: &Path, metadata: ParsedMetadata) -> ForensicReport {
    analyze_with_config(path, metadata, &AnalysisConfig::default())
}

pub fn analyze_with_config(
    path: &Path,
    metadata: ParsedMetadata,
    config: &AnalysisConfig,
) -> ForensicReport {
    if let Err(e) = config.validate() {
        return ForensicReport::failure(metadata, e.to_string());
    }
    if !path.is_file() {
        let e = Error::FileNotFound(path.to_path_buf());
        warn!(path = %path.display(), "analysis refused: not a regular file");
        return ForensicReport::failure(metadata, e.to_string());
    }

    let identity = match FileIdentity::capture(path) {
        Ok(identity) => identity,
        Err(e) => return ForensicReport::failure(metadata, format!("stat failed: {}", e)),
    };

    let mut errors = Vec::new();

    let hashes = match digest::compute_digests_with(path, config) {
        Ok(set) => set,
        Err(e) => {
            errors.push(format!("digest engine failed: {}", e));
            DigestSet::default()
        }
    };

    let (header_window, trailer_window) = match read_windows(path, config.window_size) {
        Ok(windows) => windows,
        Err(e) => {
            errors.push(format!("window read failed: {}", e));
            (Vec::new(), None)
        }
    };

    // Trailer hex in the signature profile requires a file strictly larger
    // than the window; trailer entropy analysis requires at least one window.
    let trailer_for_signatures = trailer_window
        .as_deref()
        .filter(|_| identity.file_size > config.window_size as u64);
    let signatures = signature::build_profile(
        &header_window,
        trailer_for_signatures,
        &identity.file_extension,
    );

    let header_analysis = entropy::analyze_window(&header_window);
    let trailer_analysis = trailer_window.as_deref().map(entropy::analyze_trailer);

    let steganography_indicators = match stego::detect_indicators_with(path, config) {
        Ok(indicators) => indicators,
        Err(e) => {
            errors.push(format!("steganography detector failed: {}", e));
            SteganographyIndicators::default()
        }
    };

    let anomalies = anomaly::synthesize_with(
        &AnomalyInputs {
            identity: &identity,
            digests: &hashes,
            signatures: &signatures,
            header_analysis: &header_analysis,
            metadata: &metadata,
        },
        config,
    );

    info!(
        path = %identity.file_path,
        anomalies = anomalies.len(),
        component_errors = errors.len(),
        "analysis complete"
    );
    ForensicReport {
        file_info: Some(identity),
        hashes,
        signatures,
        header_analysis,
        trailer_analysis,
        steganography_indicators,
        anomalies,
        parsed_metadata: metadata,
        errors,
    }
}

/// Reads the head window and, for files at least one window long, the tail
/// window. The reads are sequenced on one handle, never interleaved.
fn read_windows(path: &Path, window_size: usize) -> Result<(Vec<u8>, Option<Vec<u8>>)> {
    let mut file = File::open(path)?;
    let file_size = file.metadata()?.len();

    let mut header = vec![0u8; window_size.min(file_size as usize)];
    file.read_exact(&mut header)?;

    let trailer = if file_size >= window_size as u64 {
        file.seek(SeekFrom::End(-(window_size as i64)))?;
        let mut trailer = vec![0u8; window_size];
        file.read_exact(&mut trailer)?;
        Some(trailer)
    } else {
        None
    };

    Ok((header, trailer))
}
