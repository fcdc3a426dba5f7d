//! End-to-end analysis tests over generated files

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use ffx::{analyze, GeneralTrack, ParsedMetadata};

struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn new(extension: &str, contents: &[u8]) -> Self {
        let name = format!("ffx-it-{}{}", uuid::Uuid::new_v4(), extension);
        let path = std::env::temp_dir().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents).unwrap();
        Self { path }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        fs::remove_file(&self.path).ok();
    }
}

/// A well-formed-enough PNG: correct magic, low-entropy body, IEND trailer.
fn png_bytes(body_len: usize) -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend(std::iter::repeat(0x41u8).take(body_len));
    data.extend_from_slice(&[0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82]);
    data
}

#[test]
fn analyzes_png_file_end_to_end() {
    let file = TempFile::new(".png", &png_bytes(4096));
    let report = analyze(&file.path, ParsedMetadata::default());

    assert!(report.errors.is_empty());
    let info = report.file_info.as_ref().unwrap();
    assert_eq!(info.file_size, 4096 + 16);

    // Signature identification from bytes, not extension
    let png = report.signatures.known_signatures.get("PNG").unwrap();
    assert_eq!(png.offset, 0);
    assert_eq!(png.hex, "89504E47");
    assert_eq!(report.signatures.magic_number, "89504E47");
    // PNG carries no extension mapping, so no mismatch verdict either way
    assert_eq!(report.signatures.extension_mismatch, None);

    // Whole/head/tail digest scopes all populated for a multi-window file
    assert_eq!(report.hashes.whole.len(), 6);
    assert_eq!(report.hashes.head_1k.as_ref().unwrap().len(), 3);
    assert_eq!(report.hashes.tail_1k.as_ref().unwrap().len(), 3);

    // Trailer analysis present and the IEND marker recognized as standard
    assert!(report.trailer_analysis.is_some());
    let eof = report.steganography_indicators.eof_markers.as_ref().unwrap();
    assert_eq!(eof.value, "49454E44AE426082");
    assert!(eof.is_standard_eof);
}

#[test]
fn small_file_omits_trailer_fields_without_error() {
    let file = TempFile::new(".bin", b"just a few bytes");
    let report = analyze(&file.path, ParsedMetadata::default());

    assert!(report.errors.is_empty());
    assert!(report.trailer_analysis.is_none());
    assert!(report.hashes.tail_1k.is_none());
    assert!(report.signatures.file_trailer.is_none());
    assert!(report.steganography_indicators.eof_markers.is_none());
    assert!(report.hashes.head_1k.is_some());
    assert_eq!(report.header_analysis.window_size, 16);
}

#[test]
fn zero_byte_file_gets_empty_input_digests() {
    let file = TempFile::new(".bin", b"");
    let report = analyze(&file.path, ParsedMetadata::default());

    assert!(report.errors.is_empty());
    assert_eq!(
        report.hashes.whole.get("md5").unwrap(),
        "d41d8cd98f00b204e9800998ecf8427e"
    );
    assert!(report.hashes.head_1k.is_none());
    assert!(report.hashes.tail_1k.is_none());
    assert_eq!(report.header_analysis.entropy, 0.0);
    assert_eq!(report.header_analysis.window_size, 0);
    assert_eq!(report.signatures.magic_number, "");
}

#[test]
fn size_mismatch_anomaly_quotes_both_sizes() {
    let file = TempFile::new(".bin", &vec![0x5Au8; 200]);
    let metadata = ParsedMetadata {
        general: Some(GeneralTrack {
            file_size: Some(100),
            ..Default::default()
        }),
        ..Default::default()
    };
    let report = analyze(&file.path, metadata);

    let size_hits: Vec<_> = report
        .anomalies
        .iter()
        .filter(|a| a.contains("Size mismatch"))
        .collect();
    assert_eq!(size_hits.len(), 1);
    assert!(size_hits[0].contains("100"));
    assert!(size_hits[0].contains("200"));
    // Metadata is merged verbatim into the report
    assert_eq!(report.parsed_metadata.reported_file_size(), Some(100));
}

#[test]
fn uniform_windows_trigger_hash_collision_anomaly() {
    // Head and tail windows both contain 1024 identical bytes.
    let file = TempFile::new(".bin", &vec![0xEEu8; 4096]);
    let report = analyze(&file.path, ParsedMetadata::default());

    let hits = report
        .anomalies
        .iter()
        .filter(|a| a.contains("Header and trailer hashes match"))
        .count();
    assert_eq!(hits, 1);
}

#[test]
fn extension_mismatch_is_flagged_as_anomaly() {
    let mut contents = b"fLaC".to_vec();
    contents.resize(512, 0);
    let file = TempFile::new(".mp3", &contents);
    let report = analyze(&file.path, ParsedMetadata::default());

    assert_eq!(report.signatures.extension_mismatch, Some(true));
    assert!(report
        .anomalies
        .iter()
        .any(|a| a == "File extension does not match file signature"));
}

#[test]
fn high_entropy_header_is_flagged() {
    // A full byte cycle in every window position: entropy exactly 8.0.
    let contents: Vec<u8> = (0..=255u8).cycle().take(2048).collect();
    let file = TempFile::new(".bin", &contents);
    let report = analyze(&file.path, ParsedMetadata::default());

    assert!(report.header_analysis.entropy > 7.9);
    assert!(report
        .anomalies
        .iter()
        .any(|a| a.contains("High header entropy")));
}

#[test]
fn repeated_analysis_is_identical_except_access_time() {
    let file = TempFile::new(".png", &png_bytes(2048));

    let first = analyze(&file.path, ParsedMetadata::default());
    let second = analyze(&file.path, ParsedMetadata::default());

    let mut a = serde_json::to_value(&first).unwrap();
    let mut b = serde_json::to_value(&second).unwrap();
    a["file_info"]["accessed_utc"] = serde_json::Value::Null;
    b["file_info"]["accessed_utc"] = serde_json::Value::Null;
    assert_eq!(a, b);
}

#[test]
fn missing_file_report_carries_error_annotation() {
    let path = std::env::temp_dir().join(format!("ffx-it-{}.gone", uuid::Uuid::new_v4()));
    let report = analyze(&path, ParsedMetadata::default());

    assert!(report.file_info.is_none());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("File not found"));
    // The report still serializes as a report-shaped value
    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("errors").is_some());
}

#[test]
fn embedded_zip_in_trailer_is_reported() {
    let mut contents = vec![0u8; 4096];
    // Appended ZIP local-file header near the end of the file
    contents[3500..3504].copy_from_slice(b"PK\x03\x04");
    let file = TempFile::new(".bin", &contents);
    let report = analyze(&file.path, ParsedMetadata::default());

    let trailer = report.trailer_analysis.as_ref().unwrap();
    let zip = trailer
        .embedded_signatures
        .iter()
        .find(|m| m.signature == "ZIP")
        .expect("appended ZIP magic should be detected in the trailer window");
    // Offset is relative to the 1024-byte trailer window (3500 - 3072)
    assert_eq!(zip.offset, 428);
}
