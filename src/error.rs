//! Error types shared by every container format.

use std::path::PathBuf;

/// Fatal conditions that can occur while building or reading an archive.
///
/// Every compress/decompress entry point in this crate returns `Result<_,Error>`.
/// There is no partial-output recovery: on error the caller discards whatever has
/// been written so far.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("bad magic in {path}: expected {expected:02x?}, found {found:02x?}")]
    BadMagic { path: PathBuf, expected: [u8;4], found: [u8;4] },

    #[error("truncated stream while reading {context}")]
    TruncatedStream { context: &'static str },

    #[error("invalid frequency table: {reason}")]
    InvalidFrequencyTable { reason: &'static str },

    #[error("arithmetic coder total {total} exceeds maximum")]
    OversizedTotal { total: u64 },

    #[error("invalid back-reference at output offset {offset}: distance={distance} length={length}")]
    InvalidBackReference { distance: u32, length: u32, offset: usize },

    #[error("unknown compression method {0:?}")]
    UnknownMethod(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T,Error>;

/// Convenience constructor, mirrors the `bad_magic(...)`-style helpers common
/// to this crate's ambient error-handling idiom.
pub fn bad_magic(path: impl Into<PathBuf>, expected: [u8;4], found: [u8;4]) -> Error {
    Error::BadMagic { path: path.into(), expected, found }
}

pub fn truncated(context: &'static str) -> Error {
    Error::TruncatedStream { context }
}

pub fn bad_freq_table(reason: &'static str) -> Error {
    Error::InvalidFrequencyTable { reason }
}

pub fn oversized_total(total: u64) -> Error {
    Error::OversizedTotal { total }
}

pub fn bad_backref(distance: u32, length: u32, offset: usize) -> Error {
    Error::InvalidBackReference { distance, length, offset }
}
