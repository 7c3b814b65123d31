use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, ZipError};
use crate::io::{Region, open_region};
use crate::pool::BufferPool;

use super::entry::ZipEntry;
use super::index::{NameTable, hash_name};
use super::options::LoadOptions;
use super::parser::ZipParser;
use super::reader::EntryBuffer;

/// A loaded, read-only ZIP archive.
///
/// The Central Directory is parsed once on open; afterwards the archive is
/// immutable and can be shared across threads. Entry content is decoded on
/// demand from the mapped file.
///
/// ## Example
///
/// ```no_run
/// use zipmap::ZipArchive;
///
/// let archive = ZipArchive::open("bundle.zip")?;
/// if let Some(entry) = archive.entry("META-INF/MANIFEST.MF") {
///     let bytes = entry.data(&archive)?;
///     println!("{}", String::from_utf8_lossy(&bytes));
/// }
/// archive.close()?;
/// # Ok::<(), zipmap::ZipError>(())
/// ```
pub struct ZipArchive {
    region: Region,
    entries: Vec<Arc<ZipEntry>>,
    table: NameTable,
    comment: Vec<u8>,
    options: LoadOptions,
}

impl ZipArchive {
    /// Open the archive at `path` with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, LoadOptions::default())
    }

    /// Open the archive at `path` and pass its comment to `sink`.
    pub fn open_with_comment(path: impl AsRef<Path>, sink: impl FnOnce(&[u8])) -> Result<Self> {
        let archive = Self::open(path)?;
        sink(&archive.comment);
        Ok(archive)
    }

    pub fn open_with(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let region = open_region(path, options.use_mmap)?;
        debug!(path = %path.display(), size = region.len(), mapped = region.is_mapped(), "opening archive");
        Self::load(region, options)
    }

    /// Load an archive held in memory.
    pub fn from_bytes(bytes: Vec<u8>, options: LoadOptions) -> Result<Self> {
        Self::load(Region::from(bytes), options)
    }

    fn load(region: Region, options: LoadOptions) -> Result<Self> {
        let cd = ZipParser::new(&region, &options).parse()?;
        Ok(Self {
            region,
            entries: cd.entries,
            table: cd.table,
            comment: cd.comment,
            options,
        })
    }

    /// Non-directory entries in Central Directory order.
    pub fn entries(&self) -> &[Arc<ZipEntry>] {
        &self.entries
    }

    /// The name table's slots, including empty ones.
    pub fn raw_name_table(&self) -> &[Option<Arc<ZipEntry>>] {
        self.table.slots()
    }

    /// Look up an entry (file or directory) by its full name.
    pub fn entry(&self, name: &str) -> Option<&Arc<ZipEntry>> {
        self.table.get(name, hash_name(name.as_bytes()))
    }

    /// Look up an entry with a hash computed by [`hash_name`].
    pub fn entry_with_hash(&self, name: &str, hash: u32) -> Option<&Arc<ZipEntry>> {
        self.table.get(name, hash)
    }

    /// Number of non-directory entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Archive comment, empty if there is none.
    pub fn comment(&self) -> &[u8] {
        &self.comment
    }

    /// Whether the archive is served from a memory map.
    pub fn is_mapped(&self) -> bool {
        self.region.is_mapped()
    }

    /// Return a buffer obtained from [`ZipEntry::buffer`] to the pool.
    ///
    /// Buffers pointing into the archive need no release; this is a no-op
    /// for them.
    pub fn release_buffer(&self, buffer: EntryBuffer<'_>) {
        if let EntryBuffer::Pooled(buf) = buffer {
            self.options.pool.release(buf);
        }
    }

    /// Release the archive's region now.
    ///
    /// Consuming the archive means no entry can be read from it afterwards,
    /// and outstanding buffers or streams keep it from being closed.
    pub fn close(self) -> Result<()> {
        let Self { region, options, .. } = self;
        options.unmapper.unmap(region).map_err(ZipError::Unmap)
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.region
    }

    pub(crate) fn pool(&self) -> &dyn BufferPool {
        &*self.options.pool
    }

    pub(crate) fn options(&self) -> &LoadOptions {
        &self.options
    }
}

impl fmt::Debug for ZipArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipArchive")
            .field("size", &self.region.len())
            .field("mapped", &self.region.is_mapped())
            .field("entries", &self.entries.len())
            .field("names", &self.table.len())
            .finish()
    }
}
