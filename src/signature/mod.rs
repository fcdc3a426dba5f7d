//! Signature catalog and matcher
//!
//! Identifies a file's true format from byte-level magic patterns,
//! independent of its extension, and scans buffers for embedded
//! archive/image signatures. All scans are linear; the catalog's fixed
//! iteration order keeps results reproducible.

pub mod catalog;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use catalog::{CATALOG, EMBEDDED_SIGNATURES};

/// A catalog pattern matched at the start of a buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureMatch {
    pub description: String,
    pub offset: usize,
    /// Uppercase hex of the matched pattern bytes.
    pub hex: String,
}

/// An embedded signature found anywhere inside a buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedMatch {
    pub signature: String,
    pub offset: usize,
    pub hex: String,
}

/// Byte-level signature facts about one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignatureProfile {
    /// Hex of the first 32 bytes.
    pub file_header: String,
    /// Hex of the last 32 bytes; absent when the file fits in one window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_trailer: Option<String>,
    /// Uppercase hex of the 4-byte magic number.
    pub magic_number: String,
    /// `None` when the header matches no extension-bearing catalog entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_mismatch: Option<bool>,
    pub known_signatures: BTreeMap<String, SignatureMatch>,
}

/// Matches the buffer's prefix against the catalog.
///
/// Patterns are tried in table order and only the first matching pattern per
/// format is recorded: first-match-wins, not longest-match.
pub fn identify_signatures(buffer: &[u8]) -> BTreeMap<String, SignatureMatch> {
    let mut matches = BTreeMap::new();
    for entry in CATALOG {
        for pattern in entry.patterns {
            if pattern.verify_only {
                continue;
            }
            if buffer.starts_with(pattern.bytes) {
                matches.insert(
                    entry.format.to_string(),
                    SignatureMatch {
                        description: pattern.description.to_string(),
                        offset: 0,
                        hex: hex::encode_upper(pattern.bytes),
                    },
                );
                break;
            }
        }
    }
    matches
}

/// Checks whether the header's magic belongs to a different extension than
/// the file actually carries.
///
/// Returns `Some(true)` when the magic matches another extension's expected
/// pattern, `Some(false)` when it matches the actual extension, and `None`
/// when the header matches no extension-bearing catalog entry.
pub fn check_extension_mismatch(header: &[u8], extension: &str) -> Option<bool> {
    for entry in CATALOG {
        if entry.extensions.is_empty() {
            continue;
        }
        if entry.patterns.iter().any(|p| header.starts_with(p.bytes)) {
            return Some(!entry.extensions.contains(&extension));
        }
    }
    None
}

/// Scans for archive/image magics anywhere within the buffer, reporting the
/// first occurrence offset per signature type in table order.
pub fn find_embedded_signatures(buffer: &[u8]) -> Vec<EmbeddedMatch> {
    let mut found = Vec::new();
    for (name, pattern) in EMBEDDED_SIGNATURES {
        if let Some(offset) = find_pattern(buffer, pattern) {
            found.push(EmbeddedMatch {
                signature: (*name).to_string(),
                offset,
                hex: hex::encode_upper(pattern),
            });
        }
    }
    found
}

fn find_pattern(data: &[u8], pattern: &[u8]) -> Option<usize> {
    if pattern.is_empty() || data.len() < pattern.len() {
        return None;
    }
    data.windows(pattern.len()).position(|w| w == pattern)
}

/// Builds the signature profile from the already-read head window, the tail
/// window (when present), and the file's lowercase extension.
pub fn build_profile(
    header_window: &[u8],
    trailer_window: Option<&[u8]>,
    extension: &str,
) -> SignatureProfile {
    let header32 = &header_window[..header_window.len().min(32)];
    let magic = &header_window[..header_window.len().min(4)];

    let profile = SignatureProfile {
        file_header: hex::encode(header32),
        file_trailer: trailer_window.map(|t| {
            let start = t.len().saturating_sub(32);
            hex::encode(&t[start..])
        }),
        magic_number: hex::encode_upper(magic),
        extension_mismatch: check_extension_mismatch(header_window, extension),
        known_signatures: identify_signatures(header_window),
    };
    debug!(
        magic = %profile.magic_number,
        formats = profile.known_signatures.len(),
        "built signature profile"
    );
    profile
}
