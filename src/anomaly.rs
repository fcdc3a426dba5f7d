//! Anomaly synthesis
//!
//! Cross-references independently derived facts about one file and emits
//! human-readable anomaly strings. The checks run in a fixed order, never
//! short-circuit, and silently skip when an optional input is absent.

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::digest::DigestSet;
use crate::entropy::WindowAnalysis;
use crate::identity::FileIdentity;
use crate::metadata::ParsedMetadata;
use crate::signature::SignatureProfile;

/// Everything the synthesizer cross-references.
pub struct AnomalyInputs<'a> {
    pub identity: &'a FileIdentity,
    pub digests: &'a DigestSet,
    pub signatures: &'a SignatureProfile,
    pub header_analysis: &'a WindowAnalysis,
    pub metadata: &'a ParsedMetadata,
}

/// Runs the fixed check sequence with the default entropy threshold.
pub fn synthesize(inputs: &AnomalyInputs<'_>) -> Vec<String> {
    synthesize_with(inputs, &AnalysisConfig::default())
}

/// Check order: size mismatch, timestamp inversion, head/tail digest
/// collision, extension mismatch, high header entropy. Order is part of the
/// report contract.
pub fn synthesize_with(inputs: &AnomalyInputs<'_>, config: &AnalysisConfig) -> Vec<String> {
    let mut anomalies = Vec::new();

    if let Some(reported) = inputs.metadata.reported_file_size() {
        let actual = inputs.identity.file_size;
        if reported != actual {
            anomalies.push(format!(
                "Size mismatch: Metadata reports {} bytes, actual is {} bytes",
                reported, actual
            ));
        }
    }

    if inputs.identity.created_utc > inputs.identity.modified_utc {
        anomalies.push("Creation time is after modification time".to_string());
    }

    if let (Some(head), Some(tail)) = (inputs.digests.head_sha256(), inputs.digests.tail_sha256()) {
        if head == tail {
            anomalies
                .push("Header and trailer hashes match - possible uniform data pattern".to_string());
        }
    }

    if inputs.signatures.extension_mismatch == Some(true) {
        anomalies.push("File extension does not match file signature".to_string());
    }

    let entropy = inputs.header_analysis.entropy;
    if entropy > config.entropy_threshold {
        anomalies.push(format!(
            "High header entropy ({:.2}), possible encrypted content",
            entropy
        ));
    }

    debug!(count = anomalies.len(), "anomaly synthesis complete");
    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::FileFlag;
    use crate::metadata::GeneralTrack;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn identity(size: u64, created_secs: i64, modified_secs: i64) -> FileIdentity {
        FileIdentity {
            file_path: "/tmp/sample.bin".into(),
            file_name: "sample.bin".into(),
            file_size: size,
            inode: 0,
            device: 0,
            hard_links: 1,
            uid: 0,
            gid: 0,
            created_utc: Utc.timestamp_opt(created_secs, 0).unwrap(),
            modified_utc: Utc.timestamp_opt(modified_secs, 0).unwrap(),
            accessed_utc: Utc.timestamp_opt(modified_secs, 0).unwrap(),
            file_extension: ".bin".into(),
            file_permissions: "0644".into(),
            flags: Vec::<FileFlag>::new(),
        }
    }

    fn digests(head_sha256: Option<&str>, tail_sha256: Option<&str>) -> DigestSet {
        let window = |sha: &str| {
            let mut m = BTreeMap::new();
            m.insert("sha256".to_string(), sha.to_string());
            m
        };
        DigestSet {
            whole: BTreeMap::new(),
            head_1k: head_sha256.map(window),
            tail_1k: tail_sha256.map(window),
        }
    }

    fn base_inputs<'a>(
        identity: &'a FileIdentity,
        digests: &'a DigestSet,
        signatures: &'a SignatureProfile,
        header: &'a WindowAnalysis,
        metadata: &'a ParsedMetadata,
    ) -> AnomalyInputs<'a> {
        AnomalyInputs {
            identity,
            digests,
            signatures,
            header_analysis: header,
            metadata,
        }
    }

    #[test]
    fn test_size_mismatch_reported_once_with_both_values() {
        let identity = identity(200, 100, 200);
        let digests = digests(None, None);
        let signatures = SignatureProfile::default();
        let header = WindowAnalysis::default();
        let metadata = ParsedMetadata {
            general: Some(GeneralTrack {
                file_size: Some(100),
                ..Default::default()
            }),
            ..Default::default()
        };
        let anomalies = synthesize(&base_inputs(
            &identity, &digests, &signatures, &header, &metadata,
        ));
        let size_hits: Vec<_> = anomalies
            .iter()
            .filter(|a| a.contains("Size mismatch"))
            .collect();
        assert_eq!(size_hits.len(), 1);
        assert!(size_hits[0].contains("100"));
        assert!(size_hits[0].contains("200"));
    }

    #[test]
    fn test_missing_reported_size_skips_check() {
        let identity = identity(200, 100, 200);
        let digests = digests(None, None);
        let signatures = SignatureProfile::default();
        let header = WindowAnalysis::default();
        let metadata = ParsedMetadata::default();
        let anomalies = synthesize(&base_inputs(
            &identity, &digests, &signatures, &header, &metadata,
        ));
        assert!(anomalies.iter().all(|a| !a.contains("Size mismatch")));
    }

    #[test]
    fn test_creation_after_modification() {
        let identity = identity(10, 5000, 1000);
        let digests = digests(None, None);
        let signatures = SignatureProfile::default();
        let header = WindowAnalysis::default();
        let metadata = ParsedMetadata::default();
        let anomalies = synthesize(&base_inputs(
            &identity, &digests, &signatures, &header, &metadata,
        ));
        assert!(anomalies
            .iter()
            .any(|a| a == "Creation time is after modification time"));
    }

    #[test]
    fn test_head_tail_collision_reported_exactly_once() {
        let identity = identity(4096, 100, 200);
        let digests = digests(Some("abc123"), Some("abc123"));
        let signatures = SignatureProfile::default();
        let header = WindowAnalysis::default();
        let metadata = ParsedMetadata::default();
        let anomalies = synthesize(&base_inputs(
            &identity, &digests, &signatures, &header, &metadata,
        ));
        let hits = anomalies
            .iter()
            .filter(|a| a.contains("Header and trailer hashes match"))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_distinct_head_tail_not_flagged() {
        let identity = identity(4096, 100, 200);
        let digests = digests(Some("abc"), Some("def"));
        let signatures = SignatureProfile::default();
        let header = WindowAnalysis::default();
        let metadata = ParsedMetadata::default();
        let anomalies = synthesize(&base_inputs(
            &identity, &digests, &signatures, &header, &metadata,
        ));
        assert!(anomalies
            .iter()
            .all(|a| !a.contains("Header and trailer hashes match")));
    }

    #[test]
    fn test_extension_mismatch_and_entropy() {
        let identity = identity(4096, 100, 200);
        let digests = digests(None, None);
        let signatures = SignatureProfile {
            extension_mismatch: Some(true),
            ..Default::default()
        };
        let header = WindowAnalysis {
            entropy: 7.95,
            ..Default::default()
        };
        let metadata = ParsedMetadata::default();
        let anomalies = synthesize(&base_inputs(
            &identity, &digests, &signatures, &header, &metadata,
        ));
        assert_eq!(
            anomalies,
            vec![
                "File extension does not match file signature".to_string(),
                "High header entropy (7.95), possible encrypted content".to_string(),
            ]
        );
    }

    #[test]
    fn test_check_order_is_stable() {
        let identity = identity(200, 5000, 1000);
        let digests = digests(Some("same"), Some("same"));
        let signatures = SignatureProfile {
            extension_mismatch: Some(true),
            ..Default::default()
        };
        let header = WindowAnalysis {
            entropy: 8.0,
            ..Default::default()
        };
        let metadata = ParsedMetadata {
            general: Some(GeneralTrack {
                file_size: Some(100),
                ..Default::default()
            }),
            ..Default::default()
        };
        let anomalies = synthesize(&base_inputs(
            &identity, &digests, &signatures, &header, &metadata,
        ));
        assert_eq!(anomalies.len(), 5);
        assert!(anomalies[0].contains("Size mismatch"));
        assert!(anomalies[1].contains("Creation time"));
        assert!(anomalies[2].contains("Header and trailer hashes match"));
        assert!(anomalies[3].contains("File extension"));
        assert!(anomalies[4].contains("High header entropy"));
    }
}
