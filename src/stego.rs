//! Steganography indicator detection
//!
//! Heuristic signals only: a set EOF marker check, a capped-sample entropy
//! measurement, and two fixed ASCII marker containment tests. False
//! positives are expected and acceptable; none of these flags is a verdict.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::entropy::shannon_entropy;
use crate::error::Result;
use crate::signature::catalog::STANDARD_EOF_MARKERS;

/// The trailing-bytes EOF marker check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EofMarkerCheck {
    /// Uppercase hex of the last 8 bytes.
    pub value: String,
    pub is_standard_eof: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SteganographyIndicators {
    /// Absent for files of 100 bytes or fewer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eof_markers: Option<EofMarkerCheck>,
    /// Entropy of the leading sample (capped at the stego sample size).
    pub entropy: f64,
    /// "LZB" seen in the lossily decoded leading marker window.
    pub lzb_signature: bool,
    /// Raw bytes "INVS" seen in the leading marker window.
    pub invisible_secrets: bool,
}

/// Runs the indicator checks on the file at `path` with default limits.
pub fn detect_indicators(path: &Path) -> Result<SteganographyIndicators> {
    detect_indicators_with(path, &AnalysisConfig::default())
}

pub fn detect_indicators_with(
    path: &Path,
    config: &AnalysisConfig,
) -> Result<SteganographyIndicators> {
    let mut file = File::open(path)?;
    let file_size = file.metadata()?.len();

    let eof_markers = if file_size > 100 {
        file.seek(SeekFrom::End(-8))?;
        let mut last = [0u8; 8];
        file.read_exact(&mut last)?;
        let value = hex::encode_upper(last);
        let is_standard_eof = STANDARD_EOF_MARKERS
            .iter()
            .any(|marker| value.ends_with(marker));
        Some(EofMarkerCheck {
            value,
            is_standard_eof,
        })
    } else {
        None
    };

    file.seek(SeekFrom::Start(0))?;
    let mut sample = vec![0u8; config.stego_sample_size.min(file_size as usize)];
    file.read_exact(&mut sample)?;
    let entropy = shannon_entropy(&sample);

    // The marker window sits inside the sample already read.
    let marker_window = &sample[..sample.len().min(config.marker_scan_size)];
    let lzb_signature = String::from_utf8_lossy(marker_window).contains("LZB");
    let invisible_secrets = contains(marker_window, b"INVS");

    debug!(size = file_size, entropy, "steganography indicators collected");
    Ok(SteganographyIndicators {
        eof_markers,
        entropy,
        lzb_signature,
        invisible_secrets,
    })
}

fn contains(data: &[u8], needle: &[u8]) -> bool {
    data.len() >= needle.len() && data.windows(needle.len()).any(|w| w == needle)
}
