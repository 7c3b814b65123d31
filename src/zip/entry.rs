use std::sync::OnceLock;

use super::structures::CompressionMethod;

/// One entry of a loaded archive.
///
/// All fields are fixed once the archive is loaded except the data offset,
/// which is resolved on first read (or earlier, when the loader can infer it
/// from the layout of the following entry) and then cached.
#[derive(Debug)]
pub struct ZipEntry {
    pub(crate) name: String,
    /// Name length in bytes as recorded in the central directory
    pub(crate) name_len: u16,
    pub(crate) hash: u32,
    pub(crate) method: u16,
    pub(crate) compressed_size: u32,
    pub(crate) size: u32,
    pub(crate) lfh_offset: u32,
    pub(crate) is_directory: bool,
    pub(crate) data_offset: OnceLock<u64>,
}

impl ZipEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uncompressed size. Always 0 for directories.
    pub fn size(&self) -> u64 {
        self.size as u64
    }

    /// Compressed size. Always 0 for directories.
    pub fn compressed_size(&self) -> u64 {
        self.compressed_size as u64
    }

    /// Raw compression method code.
    pub fn method(&self) -> u16 {
        self.method
    }

    pub fn compression_method(&self) -> CompressionMethod {
        CompressionMethod::from_u16(self.method)
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Offset of the local file header within the archive.
    pub fn local_header_offset(&self) -> u64 {
        self.lfh_offset as u64
    }

    /// Hash of the name as used by the archive's name table.
    pub fn name_hash(&self) -> u32 {
        self.hash
    }

    /// Data offset, if it has already been resolved.
    pub fn cached_data_offset(&self) -> Option<u64> {
        self.data_offset.get().copied()
    }

    /// Publish the data offset. Every writer computes the same value from
    /// the same immutable fields, so losing the race is harmless.
    pub(crate) fn publish_data_offset(&self, offset: u64) -> u64 {
        match self.data_offset.set(offset) {
            Ok(()) => offset,
            Err(_) => {
                debug_assert_eq!(self.data_offset.get().copied(), Some(offset));
                offset
            }
        }
    }
}
