//! Caller-supplied parsed metadata
//!
//! An external format-specific parser hands the engine one of these records.
//! The engine reads a single field from it (`general.file_size`, for the
//! size-mismatch anomaly check) and merges the rest into the report
//! verbatim, without interpretation.
//!
//! The schema is fixed and explicitly enumerated per track kind. Unknown
//! parser output goes into `extra` as plain strings rather than being
//! reflected over.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single parsed track, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "track_type")]
pub enum TrackRecord {
    General(GeneralTrack),
    Audio(AudioTrack),
    Menu(MenuTrack),
    Other(OtherTrack),
}

/// Container-level metadata reported by the external parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralTrack {
    /// File size as the container claims it, not as the filesystem reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_bit_rate: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoded_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writing_application: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Chapter/menu track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuTrack {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<String>,
}

/// Any track the parser reports that is neither general, audio, nor menu.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherTrack {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

/// The full record handed over by the external parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general: Option<GeneralTrack>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audio: Vec<AudioTrack>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chapters: Vec<MenuTrack>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<OtherTrack>,
    /// Parser fields with no named slot, carried verbatim.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl ParsedMetadata {
    /// The container-reported file size, if the parser supplied one.
    pub fn reported_file_size(&self) -> Option<u64> {
        self.general.as_ref().and_then(|g| g.file_size)
    }
}
