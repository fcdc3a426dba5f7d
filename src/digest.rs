//! Digest engine
//!
//! Streams the file once for the whole-file digests and once each for the
//! bounded head/tail windows. Every algorithm in a scope consumes the exact
//! same byte window: one read is fanned out to all accumulators, and no
//! algorithm re-reads the file.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use blake2::Blake2b512;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use sha3::Sha3_256;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::Result;

/// Hex digests per scope. Head is absent only for zero-byte files; tail is
/// absent when the file fits entirely inside one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigestSet {
    pub whole: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_1k: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_1k: Option<BTreeMap<String, String>>,
}

impl DigestSet {
    /// SHA-256 of the head window, used by the anomaly synthesizer.
    pub fn head_sha256(&self) -> Option<&str> {
        self.head_1k.as_ref()?.get("sha256").map(String::as_str)
    }

    /// SHA-256 of the tail window.
    pub fn tail_sha256(&self) -> Option<&str> {
        self.tail_1k.as_ref()?.get("sha256").map(String::as_str)
    }
}

/// Independent accumulators for the whole-file pass.
struct WholeFileHashers {
    md5: md5::Context,
    sha1: Sha1,
    sha256: Sha256,
    sha512: Sha512,
    sha3_256: Sha3_256,
    blake2b: Blake2b512,
}

impl WholeFileHashers {
    fn new() -> Self {
        Self {
            md5: md5::Context::new(),
            sha1: Sha1::new(),
            sha256: Sha256::new(),
            sha512: Sha512::new(),
            sha3_256: Sha3_256::new(),
            blake2b: Blake2b512::new(),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        self.md5.consume(chunk);
        self.sha1.update(chunk);
        self.sha256.update(chunk);
        self.sha512.update(chunk);
        self.sha3_256.update(chunk);
        self.blake2b.update(chunk);
    }

    fn finalize(self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        out.insert("md5".into(), format!("{:x}", self.md5.compute()));
        out.insert("sha1".into(), hex::encode(self.sha1.finalize()));
        out.insert("sha256".into(), hex::encode(self.sha256.finalize()));
        out.insert("sha512".into(), hex::encode(self.sha512.finalize()));
        out.insert("sha3_256".into(), hex::encode(self.sha3_256.finalize()));
        out.insert("blake2b".into(), hex::encode(self.blake2b.finalize()));
        out
    }
}

/// Accumulators for the bounded head/tail windows.
struct WindowHashers {
    md5: md5::Context,
    sha1: Sha1,
    sha256: Sha256,
}

impl WindowHashers {
    fn new() -> Self {
        Self {
            md5: md5::Context::new(),
            sha1: Sha1::new(),
            sha256: Sha256::new(),
        }
    }

    fn digest(window: &[u8]) -> BTreeMap<String, String> {
        let mut hashers = Self::new();
        hashers.md5.consume(window);
        hashers.sha1.update(window);
        hashers.sha256.update(window);

        let mut out = BTreeMap::new();
        out.insert("md5".into(), format!("{:x}", hashers.md5.compute()));
        out.insert("sha1".into(), hex::encode(hashers.sha1.finalize()));
        out.insert("sha256".into(), hex::encode(hashers.sha256.finalize()));
        out
    }
}

/// Computes all digests for the file at `path` using default window sizes.
pub fn compute_digests(path: &Path) -> Result<DigestSet> {
    compute_digests_with(path, &AnalysisConfig::default())
}

/// Computes all digests with explicit window/chunk sizes.
///
/// The file handle is read strictly sequentially: head window first, then a
/// rewind and the chunked whole-file pass, then the tail seek. The three
/// reads never interleave.
pub fn compute_digests_with(path: &Path, config: &AnalysisConfig) -> Result<DigestSet> {
    let mut file = File::open(path)?;
    let file_size = file.metadata()?.len();

    let mut head = vec![0u8; config.window_size];
    let head_len = read_up_to(&mut file, &mut head)?;
    head.truncate(head_len);

    file.seek(SeekFrom::Start(0))?;
    let mut whole = WholeFileHashers::new();
    let mut chunk = vec![0u8; config.chunk_size];
    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        whole.update(&chunk[..n]);
    }

    let tail_1k = if file_size > config.window_size as u64 {
        file.seek(SeekFrom::End(-(config.window_size as i64)))?;
        let mut tail = vec![0u8; config.window_size];
        file.read_exact(&mut tail)?;
        Some(WindowHashers::digest(&tail))
    } else {
        None
    };

    let head_1k = if head.is_empty() {
        None
    } else {
        Some(WindowHashers::digest(&head))
    };

    debug!(size = file_size, "computed digest set");
    Ok(DigestSet {
        whole: whole.finalize(),
        head_1k,
        tail_1k,
    })
}

/// Reads until the buffer is full or EOF, returning the number of bytes read.
fn read_up_to(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = file.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}
