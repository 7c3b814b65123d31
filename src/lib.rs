//! # zipmap
//!
//! A memory-mapped, random-access ZIP reader.
//!
//! Opening an archive maps the file, locates the End of Central Directory
//! record and indexes every entry by name in one pass. Lookups are a single
//! hash probe; entry content is decoded only when asked for, straight out of
//! the mapping, without copying the archive into memory.
//!
//! ## Features
//!
//! - O(1) name lookups over an open-addressing table
//! - Lazily resolved, cached data offsets
//! - Support for STORED (uncompressed) and DEFLATE compression methods
//! - Pooled output buffers for deflated entries
//! - Deterministic release of the mapping on close
//!
//! ## Example
//!
//! ```no_run
//! use zipmap::ZipArchive;
//!
//! fn main() -> zipmap::Result<()> {
//!     let archive = ZipArchive::open("archive.zip")?;
//!
//!     for entry in archive.entries() {
//!         println!("{} ({} bytes)", entry.name(), entry.size());
//!     }
//!
//!     if let Some(entry) = archive.entry("docs/readme.txt") {
//!         let text = entry.data(&archive)?;
//!         println!("{}", String::from_utf8_lossy(&text));
//!     }
//!
//!     archive.close()
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod pool;
pub mod zip;

pub use cli::Cli;
pub use error::{Result, ZipError};
pub use pool::{BufferPool, SharedBufferPool};
pub use zip::{
    CompressionMethod, DuplicatePolicy, EntryBuffer, EntryStream, LoadOptions, ZipArchive,
    ZipEntry, ZipExtractor, hash_name,
};
