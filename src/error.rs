//! Error types and handling for the file forensics engine

use std::io;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;

/// Custom result type for forensics operations
pub type Result<T> = StdResult<T, Error>;

/// Core error type for forensics operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The path does not resolve to a regular file. Callers are expected to
    /// validate paths up front, so hitting this mid-analysis is a
    /// precondition violation rather than an I/O fault.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Read or seek failure mid-analysis: permissions revoked, device error,
    /// file truncated concurrently.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A byte sequence expected to be text was not valid in the declared
    /// encoding. Recovered locally with replacement markers; never fatal at
    /// the report level.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
