//! Entropy and byte-distribution analysis

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::signature::{self, EmbeddedMatch, SignatureMatch};

/// Statistical profile of a byte window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowAnalysis {
    pub window_size: usize,
    /// Shannon entropy in bits; 0.0 for an empty window, 8.0 maximum.
    pub entropy: f64,
    pub null_bytes: usize,
    /// ASCII 32..=126.
    pub printable_chars: usize,
    /// Below 32, or exactly 127.
    pub control_chars: usize,
    pub signature_matches: BTreeMap<String, SignatureMatch>,
}

/// Trailer window profile plus embedded-signature scan results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailerAnalysis {
    #[serde(flatten)]
    pub window: WindowAnalysis,
    pub embedded_signatures: Vec<EmbeddedMatch>,
}

/// Calculates the Shannon entropy of a byte slice.
///
/// Empty input is 0.0 by convention, not NaN.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    let mut frequencies = [0usize; 256];
    for byte in data {
        frequencies[*byte as usize] += 1;
    }

    let len = data.len() as f64;
    frequencies
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Profiles an arbitrary byte window: entropy, byte-class counts, and the
/// catalog signatures matching the window's prefix.
pub fn analyze_window(buffer: &[u8]) -> WindowAnalysis {
    let mut null_bytes = 0;
    let mut printable_chars = 0;
    let mut control_chars = 0;
    for &byte in buffer {
        if byte == 0 {
            null_bytes += 1;
        }
        if (32..=126).contains(&byte) {
            printable_chars += 1;
        }
        if byte < 32 || byte == 127 {
            control_chars += 1;
        }
    }

    WindowAnalysis {
        window_size: buffer.len(),
        entropy: shannon_entropy(buffer),
        null_bytes,
        printable_chars,
        control_chars,
        signature_matches: signature::identify_signatures(buffer),
    }
}

/// Profiles the trailer window and scans it for embedded payload signatures.
pub fn analyze_trailer(buffer: &[u8]) -> TrailerAnalysis {
    TrailerAnalysis {
        window: analyze_window(buffer),
        embedded_signatures: signature::find_embedded_signatures(buffer),
    }
}
