//! Error types for archive loading and entry reads.

use std::io;

use thiserror::Error;

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, ZipError>;

/// Errors that can occur while loading an archive or reading an entry.
///
/// Load-time variants leave no archive behind: a failed load means the file
/// is unusable. Read-time variants only affect the entry being read.
#[derive(Debug, Error)]
pub enum ZipError {
    /// I/O error while opening, mapping or reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No end of central directory record in the scanned tail.
    #[error("Not a valid ZIP file: end of central directory record not found")]
    NotAnArchive,

    /// A central directory record does not start with its signature.
    #[error("Invalid Central Directory File Header at offset {offset}")]
    CorruptCentralDirectory { offset: u64 },

    /// The EOCD places the central directory outside the archive.
    #[error("Central Directory at offset {offset} ({size} bytes) extends past end of archive ({available} bytes)")]
    CentralDirectoryOutOfBounds { offset: u64, size: u64, available: u64 },

    /// A local file header does not start with its signature.
    #[error("Invalid Local File Header at offset {offset}")]
    InvalidLocalHeader { offset: u64 },

    /// The local extra field length is larger than any ordinary entry uses.
    #[error("Local extra field at offset {offset} is {len} bytes (max {max})")]
    LocalExtraTooLong { offset: u64, len: u16, max: u16 },

    /// A read needs bytes past the end of the archive.
    #[error("Unexpected end of archive: need {needed} bytes at offset {offset}, archive has {available}")]
    UnexpectedEof {
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// Compression method other than STORED or DEFLATE.
    #[error("Unsupported compression method: {0}")]
    UnsupportedCompression(u16),

    /// The inflater made no progress while output was still expected.
    #[error("Inflater stalled after {produced} of {expected} bytes: compressed data is corrupt")]
    InflateStalled { produced: usize, expected: usize },

    /// The deflate stream itself is malformed.
    #[error("Deflate error: {0}")]
    Inflate(#[from] flate2::DecompressError),

    /// Content was requested from a directory entry.
    #[error("Entry has no data: {0}")]
    NoData(String),

    /// A name appears twice in the central directory under a strict policy.
    #[error("Duplicate entry name: {0}")]
    DuplicateEntry(String),

    /// Releasing the mapped region failed.
    #[error("Failed to release mapped region: {0}")]
    Unmap(#[source] io::Error),
}

impl ZipError {
    /// Whether this error means the archive as a whole is unusable, as
    /// opposed to a failure local to a single entry.
    pub fn is_corrupt_archive(&self) -> bool {
        matches!(
            self,
            ZipError::NotAnArchive
                | ZipError::CorruptCentralDirectory { .. }
                | ZipError::CentralDirectoryOutOfBounds { .. }
                | ZipError::DuplicateEntry(_)
        )
    }
}
