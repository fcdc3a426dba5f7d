//! File forensics engine
//!
//! Given an arbitrary binary file, computes cryptographic digests, identifies
//! the true format from byte-level signatures, measures Shannon entropy over
//! bounded windows, collects steganography indicators, and synthesizes
//! anomalies by cross-referencing those facts against file-system metadata
//! and a caller-supplied parsed-metadata record.
//!
//! The engine performs no printing or presentation; `analyze` returns a
//! plain serializable [`report::ForensicReport`] and retains no state
//! between invocations.

pub mod anomaly;
pub mod config;
pub mod digest;
pub mod entropy;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod report;
pub mod signature;
pub mod stego;

// Re-exports for crate consumers
pub use anomaly::{synthesize, synthesize_with, AnomalyInputs};
pub use config::AnalysisConfig;
pub use digest::{compute_digests, compute_digests_with, DigestSet};
pub use entropy::{analyze_window, shannon_entropy, TrailerAnalysis, WindowAnalysis};
pub use error::{Error, Result};
pub use identity::{FileFlag, FileIdentity};
pub use metadata::{AudioTrack, GeneralTrack, MenuTrack, OtherTrack, ParsedMetadata, TrackRecord};
pub use report::{analyze, analyze_with_config, ForensicReport};
pub use signature::{
    check_extension_mismatch, find_embedded_signatures, identify_signatures, EmbeddedMatch,
    SignatureMatch, SignatureProfile,
};
pub use stego::{detect_indicators, detect_indicators_with, SteganographyIndicators};
