//! ZIP archive loading and entry access.
//!
//! This module reads a whole archive through a memory map, indexes its
//! Central Directory once, and decodes entries on demand.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - `parser`: Walks the Central Directory and builds the index
//! - [`index`]: Open-addressing name table with linear probing
//! - [`ZipEntry`]: Per-entry metadata with a lazily resolved data offset
//! - `reader`: Decoding of entry content (bytes, pooled buffers, streams)
//! - [`ZipArchive`]: The loaded archive handle
//! - [`ZipExtractor`]: Extraction to files and stdout for the CLI
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! ## Supported Features
//!
//! - Standard ZIP format with 32-bit sizes and offsets
//! - More than 65535 entries (the EOCD count field is only a sizing hint)
//! - STORED (no compression) method
//! - DEFLATE compression method
//!
//! ## Limitations
//!
//! - No ZIP64 extensions
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

mod archive;
mod entry;
mod extractor;
pub mod index;
mod options;
mod parser;
mod reader;
pub mod structures;

pub use archive::ZipArchive;
pub use entry::ZipEntry;
pub use extractor::ZipExtractor;
pub use index::hash_name;
pub use options::{DEFAULT_MAX_LOCAL_EXTRA_LEN, DuplicatePolicy, LoadOptions};
pub use reader::{EntryBuffer, EntryStream};
pub use structures::CompressionMethod;
