//! File-system identity capture
//!
//! Everything in [`FileIdentity`] comes from a single stat call. A race
//! between the stat and later reads of the same file is tolerated; the
//! identity is not re-validated.

use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Normalized platform file flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFlag {
    #[serde(rename = "IMMUTABLE")]
    Immutable,
    #[serde(rename = "APPEND_ONLY")]
    AppendOnly,
    #[serde(rename = "HIDDEN")]
    Hidden,
    #[serde(rename = "SYSTEM")]
    System,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

/// Immutable snapshot of a file's stat attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileIdentity {
    pub file_path: String,
    pub file_name: String,
    pub file_size: u64,
    pub inode: u64,
    pub device: u64,
    pub hard_links: u64,
    pub uid: u32,
    pub gid: u32,
    pub created_utc: DateTime<Utc>,
    pub modified_utc: DateTime<Utc>,
    pub accessed_utc: DateTime<Utc>,
    /// Lowercase extension including the leading dot, empty if none.
    pub file_extension: String,
    /// Four-digit octal permission string, e.g. "0644".
    pub file_permissions: String,
    pub flags: Vec<FileFlag>,
}

impl FileIdentity {
    /// Captures the identity of a regular file with one stat call.
    pub fn capture(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let absolute = std::fs::canonicalize(path)?;
        let file_name = absolute
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_extension = absolute
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        let identity = Self {
            file_path: absolute.to_string_lossy().into_owned(),
            file_size: metadata.len(),
            inode: inode(&metadata),
            device: device(&metadata),
            hard_links: hard_links(&metadata),
            uid: owner_uid(&metadata),
            gid: owner_gid(&metadata),
            created_utc: created_utc(&metadata),
            modified_utc: modified_utc(&metadata),
            accessed_utc: accessed_utc(&metadata),
            file_permissions: permission_string(&metadata),
            flags: platform_flags(&file_name, &metadata),
            file_name,
            file_extension,
        };
        debug!(path = %identity.file_path, size = identity.file_size, "captured file identity");
        Ok(identity)
    }
}

#[allow(dead_code)]
fn system_time_utc(time: std::io::Result<SystemTime>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    time.map(DateTime::<Utc>::from).unwrap_or(fallback)
}

#[allow(dead_code)]
fn epoch_utc(secs: i64, nanos: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, nanos as u32)
        .single()
        .unwrap_or_default()
}

#[cfg(unix)]
mod platform {
    use super::*;
    use std::os::unix::fs::MetadataExt;

    pub fn inode(m: &Metadata) -> u64 {
        m.ino()
    }

    pub fn device(m: &Metadata) -> u64 {
        m.dev()
    }

    pub fn hard_links(m: &Metadata) -> u64 {
        m.nlink()
    }

    pub fn owner_uid(m: &Metadata) -> u32 {
        m.uid()
    }

    pub fn owner_gid(m: &Metadata) -> u32 {
        m.gid()
    }

    /// Change time stands in for creation time: not every Unix filesystem
    /// records a birth time, and ctime is the closest universally available
    /// analogue.
    pub fn created_utc(m: &Metadata) -> DateTime<Utc> {
        epoch_utc(m.ctime(), m.ctime_nsec())
    }

    pub fn modified_utc(m: &Metadata) -> DateTime<Utc> {
        epoch_utc(m.mtime(), m.mtime_nsec())
    }

    pub fn accessed_utc(m: &Metadata) -> DateTime<Utc> {
        epoch_utc(m.atime(), m.atime_nsec())
    }

    pub fn permission_string(m: &Metadata) -> String {
        format!("{:04o}", m.mode() & 0o7777)
    }

    pub fn platform_flags(file_name: &str, _m: &Metadata) -> Vec<FileFlag> {
        let mut flags = Vec::new();
        if file_name.starts_with('.') {
            flags.push(FileFlag::Hidden);
        }
        flags
    }
}

#[cfg(windows)]
mod platform {
    use super::*;
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    const FILE_ATTRIBUTE_SYSTEM: u32 = 0x4;
    const FILE_ATTRIBUTE_READONLY: u32 = 0x1;

    pub fn inode(_m: &Metadata) -> u64 {
        0
    }

    pub fn device(_m: &Metadata) -> u64 {
        0
    }

    pub fn hard_links(_m: &Metadata) -> u64 {
        1
    }

    pub fn owner_uid(_m: &Metadata) -> u32 {
        0
    }

    pub fn owner_gid(_m: &Metadata) -> u32 {
        0
    }

    pub fn created_utc(m: &Metadata) -> DateTime<Utc> {
        system_time_utc(m.created(), modified_utc(m))
    }

    pub fn modified_utc(m: &Metadata) -> DateTime<Utc> {
        system_time_utc(m.modified(), Utc.timestamp_opt(0, 0).unwrap())
    }

    pub fn accessed_utc(m: &Metadata) -> DateTime<Utc> {
        system_time_utc(m.accessed(), modified_utc(m))
    }

    pub fn permission_string(m: &Metadata) -> String {
        if m.file_attributes() & FILE_ATTRIBUTE_READONLY != 0 {
            "0444".to_string()
        } else {
            "0666".to_string()
        }
    }

    pub fn platform_flags(_file_name: &str, m: &Metadata) -> Vec<FileFlag> {
        let attrs = m.file_attributes();
        let mut flags = Vec::new();
        if attrs & FILE_ATTRIBUTE_HIDDEN != 0 {
            flags.push(FileFlag::Hidden);
        }
        if attrs & FILE_ATTRIBUTE_SYSTEM != 0 {
            flags.push(FileFlag::System);
        }
        flags
    }
}

#[cfg(not(any(unix, windows)))]
mod platform {
    use super::*;

    pub fn inode(_m: &Metadata) -> u64 {
        0
    }

    pub fn device(_m: &Metadata) -> u64 {
        0
    }

    pub fn hard_links(_m: &Metadata) -> u64 {
        1
    }

    pub fn owner_uid(_m: &Metadata) -> u32 {
        0
    }

    pub fn owner_gid(_m: &Metadata) -> u32 {
        0
    }

    pub fn created_utc(m: &Metadata) -> DateTime<Utc> {
        system_time_utc(m.created(), modified_utc(m))
    }

    pub fn modified_utc(m: &Metadata) -> DateTime<Utc> {
        system_time_utc(m.modified(), Utc.timestamp_opt(0, 0).unwrap())
    }

    pub fn accessed_utc(m: &Metadata) -> DateTime<Utc> {
        system_time_utc(m.accessed(), modified_utc(m))
    }

    pub fn permission_string(_m: &Metadata) -> String {
        "0000".to_string()
    }

    pub fn platform_flags(_file_name: &str, _m: &Metadata) -> Vec<FileFlag> {
        vec![FileFlag::Unknown]
    }
}

use platform::*;
