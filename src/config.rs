//! Configuration types and validation for the analysis pipeline

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunable parameters for a single-file analysis.
///
/// The defaults are the values the report format is defined around; changing
/// them changes which windows the digests and entropy profiles describe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Size of the head and tail digest/entropy windows in bytes.
    pub window_size: usize,
    /// Chunk size for the streaming whole-file digest pass.
    pub chunk_size: usize,
    /// Maximum leading sample fed to the steganography entropy check.
    pub stego_sample_size: usize,
    /// How many leading bytes are searched for ASCII stego markers.
    pub marker_scan_size: usize,
    /// Header entropy above this value (bits) is flagged as an anomaly.
    pub entropy_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: 1024,
            chunk_size: 8192,
            stego_sample_size: 8192,
            marker_scan_size: 100,
            entropy_threshold: 7.9,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::InvalidConfiguration(
                "window_size must be non-zero".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfiguration(
                "chunk_size must be non-zero".into(),
            ));
        }
        if !(0.0..=8.0).contains(&self.entropy_threshold) {
            return Err(Error::InvalidConfiguration(format!(
                "entropy_threshold {} outside 0.0..=8.0",
                self.entropy_threshold
            )));
        }
        Ok(())
    }
}
