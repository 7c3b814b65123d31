//! Low-level ZIP archive parser.
//!
//! This module turns the bytes of a whole archive into the in-memory index
//! served by [`ZipArchive`](super::ZipArchive).
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) by scanning backwards
//! 2. Read the entry count, size and offset of the Central Directory
//! 3. Walk the Central Directory once, filling the name table and the
//!    ordered entry list
//!
//! Local File Headers are not touched here. The data offset of an entry is
//! resolved lazily on first read, except when the position of the following
//! header already pins it down (see [`ZipParser::chain_data_offset`]).

use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::error::{Result, ZipError};

use super::entry::ZipEntry;
use super::index::{NameTable, hash_name};
use super::options::{DuplicatePolicy, LoadOptions};
use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// Bounds the first pass of the EOCD search. Archives with other data
/// appended after the EOCD are only found by the second pass.
const MAX_COMMENT_SIZE: usize = 65535;

/// Smallest possible Central Directory record: fixed header plus a
/// one-byte name. Used to estimate the entry count when the EOCD count
/// field has overflowed.
const MIN_CDFH_RECORD: usize = CDFH_MIN_SIZE + 1;

/// Result of walking the Central Directory.
pub(crate) struct CentralDirectory {
    /// Non-directory entries in Central Directory order
    pub entries: Vec<Arc<ZipEntry>>,
    /// Every entry, directories included, keyed by name
    pub table: NameTable,
    /// Archive comment from the EOCD
    pub comment: Vec<u8>,
}

/// Low-level ZIP parser over the bytes of a whole archive.
///
/// ## Usage
///
/// Typically used through [`ZipArchive`](super::ZipArchive) rather than
/// directly.
pub(crate) struct ZipParser<'a> {
    /// The whole archive
    data: &'a [u8],
    options: &'a LoadOptions,
}

impl<'a> ZipParser<'a> {
    pub fn new(data: &'a [u8], options: &'a LoadOptions) -> Self {
        Self { data, options }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// The EOCD sits at the end of the file unless the archive carries a
    /// comment or trailing data, in which case it is found by scanning
    /// backwards for its signature. The comment window is searched first;
    /// the rest of the file down to offset 0 only if that finds nothing.
    ///
    /// # Returns
    ///
    /// A tuple of (EOCD record, offset of EOCD in file).
    ///
    /// # Errors
    ///
    /// Returns [`ZipError::NotAnArchive`] if the file is shorter than an
    /// EOCD or no signature is found.
    pub fn find_eocd(&self) -> Result<(EndOfCentralDirectory, usize)> {
        let size = self.data.len();
        if size < EndOfCentralDirectory::SIZE {
            return Err(ZipError::NotAnArchive);
        }

        let last = size - EndOfCentralDirectory::SIZE;
        let first = last.saturating_sub(MAX_COMMENT_SIZE);

        let offset = match self.scan_eocd(first, last) {
            Some(offset) => offset,
            None if first > 0 => {
                debug!(first, "no EOCD in comment window, scanning trailing data");
                self.scan_eocd(0, first - 1).ok_or(ZipError::NotAnArchive)?
            }
            None => return Err(ZipError::NotAnArchive),
        };

        let eocd = EndOfCentralDirectory::from_bytes(&self.data[offset..])?;
        debug!(offset, entries = eocd.total_entries, cd_size = eocd.cd_size, "found EOCD");
        Ok((eocd, offset))
    }

    /// Last offset in `first..=last` holding the EOCD signature.
    fn scan_eocd(&self, first: usize, last: usize) -> Option<usize> {
        (first..=last)
            .rev()
            .find(|&offset| &self.data[offset..offset + 4] == EndOfCentralDirectory::SIGNATURE)
    }

    /// Parse the whole Central Directory.
    ///
    /// # Errors
    ///
    /// Fails if the directory lies outside the archive, if any record does
    /// not start with its signature, or if a duplicate name is found under
    /// [`DuplicatePolicy::Error`]. Nothing is returned on failure.
    pub fn parse(&self) -> Result<CentralDirectory> {
        let (eocd, eocd_offset) = self.find_eocd()?;

        let comment_start = eocd_offset + EndOfCentralDirectory::SIZE;
        let comment_end = (comment_start + eocd.comment_len as usize).min(self.data.len());
        let comment = self.data[comment_start..comment_end].to_vec();

        let cd_start = eocd.cd_offset as usize;
        let cd_size = eocd.cd_size as usize;
        let cd_end = cd_start
            .checked_add(cd_size)
            .filter(|&end| end <= self.data.len())
            .ok_or(ZipError::CentralDirectoryOutOfBounds {
                offset: cd_start as u64,
                size: cd_size as u64,
                available: self.data.len() as u64,
            })?;

        // The count field is only a sizing hint: the walk below is bounded by
        // the directory size, not by the count.
        let expected = if eocd.entry_count_overflowed() {
            cd_size / MIN_CDFH_RECORD
        } else {
            eocd.total_entries as usize
        };
        debug!(expected, overflowed = eocd.entry_count_overflowed(), "sizing name table");

        let mut table = NameTable::with_expected(expected);
        let mut entries = Vec::with_capacity(expected);
        let mut prev: Option<Arc<ZipEntry>> = None;
        let mut pos = cd_start;

        while pos < cd_end {
            let (entry, record_len) = self.parse_cdfh(pos, cd_end)?;
            let entry = Arc::new(entry);

            if let Some(prev) = prev.take() {
                Self::chain_data_offset(&prev, entry.local_header_offset());
            }

            match table.insert(Arc::clone(&entry)) {
                Ok(()) => {
                    if !entry.is_directory() {
                        entries.push(Arc::clone(&entry));
                    }
                }
                Err(rejected) => match self.options.duplicates {
                    DuplicatePolicy::FirstWins => {
                        warn!(name = rejected.name(), offset = pos, "skipping duplicate entry");
                    }
                    DuplicatePolicy::Error => {
                        return Err(ZipError::DuplicateEntry(rejected.name().to_string()));
                    }
                },
            }

            prev = Some(entry);
            pos += record_len;
        }

        if let Some(prev) = prev {
            Self::chain_data_offset(&prev, cd_start as u64);
        }

        entries.shrink_to_fit();
        debug!(
            files = entries.len(),
            names = table.len(),
            capacity = table.capacity(),
            "loaded central directory"
        );

        Ok(CentralDirectory {
            entries,
            table,
            comment,
        })
    }

    /// Parse the Central Directory File Header starting at `pos`.
    ///
    /// The record must fit entirely before `cd_end`; a bad signature or a
    /// record running past the end both mean the declared directory size is
    /// wrong.
    ///
    /// # Returns
    ///
    /// The entry and the full length of its record.
    fn parse_cdfh(&self, pos: usize, cd_end: usize) -> Result<(ZipEntry, usize)> {
        let corrupt = || ZipError::CorruptCentralDirectory { offset: pos as u64 };

        let header = CentralDirectoryHeader::from_bytes(&self.data[pos..cd_end]).ok_or_else(corrupt)?;
        if pos + header.record_len() > cd_end {
            return Err(corrupt());
        }

        let name_start = pos + CDFH_MIN_SIZE;
        let name_bytes = &self.data[name_start..name_start + header.name_len as usize];
        // Use lossy conversion to handle non-UTF8 filenames gracefully
        let name = String::from_utf8_lossy(name_bytes).into_owned();

        // Directory entries end with '/'
        let is_directory = name.ends_with('/');
        let (compressed_size, size) = if is_directory {
            (0, 0)
        } else {
            (header.compressed_size, header.uncompressed_size)
        };

        let entry = ZipEntry {
            hash: hash_name(name.as_bytes()),
            name,
            name_len: header.name_len,
            method: header.method,
            compressed_size,
            size,
            lfh_offset: header.lfh_offset,
            is_directory,
            data_offset: OnceLock::new(),
        };
        Ok((entry, header.record_len()))
    }

    /// Fill in `prev`'s data offset from the offset of the header that
    /// follows its data.
    ///
    /// If `next_header - compressed_size` lands exactly after a local header
    /// with the same name and no extra field, that is where the data starts.
    /// Any other layout (local extra fields, data descriptors, reordered
    /// entries) is left for lazy resolution.
    fn chain_data_offset(prev: &ZipEntry, next_header: u64) {
        if prev.is_directory() || prev.cached_data_offset().is_some() {
            return;
        }
        let Some(data_start) = next_header.checked_sub(prev.compressed_size()) else {
            return;
        };
        if data_start == prev.local_header_offset() + LFH_SIZE as u64 + prev.name_len as u64 {
            prev.publish_data_offset(data_start);
        }
    }
}
