//! Decoding entry content out of the archive's region.

use std::io::{self, Read};
use std::ops::Deref;

use byteorder::{ByteOrder, LittleEndian};
use flate2::{Decompress, FlushDecompress, Status};
use tracing::trace;

use crate::error::{Result, ZipError};
use crate::pool::BufferPool;

use super::archive::ZipArchive;
use super::entry::ZipEntry;
use super::structures::{CompressionMethod, LFH_EXTRA_LEN_OFFSET, LFH_SIGNATURE, LFH_SIZE};

/// Entry content returned by [`ZipEntry::buffer`].
///
/// Stored entries are served straight from the archive region. Deflated
/// entries are inflated into a buffer taken from the archive's pool; hand it
/// back with [`ZipArchive::release_buffer`] once done.
#[derive(Debug)]
pub enum EntryBuffer<'a> {
    Mapped(&'a [u8]),
    Pooled(Vec<u8>),
}

impl EntryBuffer<'_> {
    pub fn is_pooled(&self) -> bool {
        matches!(self, EntryBuffer::Pooled(_))
    }
}

impl Deref for EntryBuffer<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            EntryBuffer::Mapped(bytes) => bytes,
            EntryBuffer::Pooled(buf) => buf,
        }
    }
}

/// Sequential reader over an [`EntryBuffer`].
///
/// A pooled buffer goes back to the pool when the stream is dropped.
pub struct EntryStream<'a> {
    buffer: Option<EntryBuffer<'a>>,
    pos: usize,
    pool: &'a dyn BufferPool,
}

impl EntryStream<'_> {
    /// Bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.buffer.as_deref().map_or(0, |b| b.len() - self.pos)
    }
}

impl Read for EntryStream<'_> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let Some(buffer) = self.buffer.as_deref() else {
            return Ok(0);
        };
        let rest = &buffer[self.pos..];
        let n = rest.len().min(out.len());
        out[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl Drop for EntryStream<'_> {
    fn drop(&mut self) {
        if let Some(EntryBuffer::Pooled(buf)) = self.buffer.take() {
            self.pool.release(buf);
        }
    }
}

impl ZipEntry {
    /// Read and decode the whole entry into a new vector.
    pub fn data(&self, archive: &ZipArchive) -> Result<Vec<u8>> {
        let compressed = self.compressed_bytes(archive)?;
        match self.compression_method() {
            CompressionMethod::Stored => Ok(self.stored_bytes(archive)?.to_vec()),
            CompressionMethod::Deflate => {
                let mut out = vec![0; self.size as usize];
                inflate(compressed, &mut out)?;
                Ok(out)
            }
            CompressionMethod::Unknown(code) => Err(ZipError::UnsupportedCompression(code)),
        }
    }

    /// Decode the entry into a buffer borrowed from the archive.
    pub fn buffer<'a>(&self, archive: &'a ZipArchive) -> Result<EntryBuffer<'a>> {
        let compressed = self.compressed_bytes(archive)?;
        match self.compression_method() {
            CompressionMethod::Stored => Ok(EntryBuffer::Mapped(self.stored_bytes(archive)?)),
            CompressionMethod::Deflate => {
                let mut buf = archive.pool().allocate(self.size as usize);
                if let Err(e) = inflate(compressed, &mut buf) {
                    archive.pool().release(buf);
                    return Err(e);
                }
                Ok(EntryBuffer::Pooled(buf))
            }
            CompressionMethod::Unknown(code) => Err(ZipError::UnsupportedCompression(code)),
        }
    }

    /// Decode the entry and wrap it in a [`Read`] stream.
    pub fn stream<'a>(&self, archive: &'a ZipArchive) -> Result<EntryStream<'a>> {
        let buffer = self.buffer(archive)?;
        Ok(EntryStream {
            buffer: Some(buffer),
            pos: 0,
            pool: archive.pool(),
        })
    }

    /// Offset of the entry's data, resolving and caching it if needed.
    pub fn data_offset(&self, archive: &ZipArchive) -> Result<u64> {
        if let Some(offset) = self.cached_data_offset() {
            return Ok(offset);
        }

        let lfh_offset = self.local_header_offset();
        let header = slice_at(archive.bytes(), lfh_offset, LFH_SIZE as u64)?;
        if &header[0..4] != LFH_SIGNATURE {
            return Err(ZipError::InvalidLocalHeader { offset: lfh_offset });
        }

        let extra_len = LittleEndian::read_u16(&header[LFH_EXTRA_LEN_OFFSET..]);
        let max = archive.options().max_local_extra_len;
        if extra_len > max {
            return Err(ZipError::LocalExtraTooLong {
                offset: lfh_offset,
                len: extra_len,
                max,
            });
        }

        let offset = lfh_offset + LFH_SIZE as u64 + self.name_len as u64 + extra_len as u64;
        trace!(name = self.name(), offset, "resolved data offset");
        Ok(self.publish_data_offset(offset))
    }

    /// The compressed payload. Fails for directories and truncated archives.
    fn compressed_bytes<'a>(&self, archive: &'a ZipArchive) -> Result<&'a [u8]> {
        if self.is_directory() {
            return Err(ZipError::NoData(self.name().to_string()));
        }
        let offset = self.data_offset(archive)?;
        slice_at(archive.bytes(), offset, self.compressed_size())
    }

    /// The `size` bytes of a stored entry.
    fn stored_bytes<'a>(&self, archive: &'a ZipArchive) -> Result<&'a [u8]> {
        let offset = self.data_offset(archive)?;
        slice_at(archive.bytes(), offset, self.size())
    }
}

fn slice_at(data: &[u8], offset: u64, len: u64) -> Result<&[u8]> {
    let eof = || ZipError::UnexpectedEof {
        offset,
        needed: len,
        available: data.len() as u64,
    };
    let end = offset.checked_add(len).ok_or_else(eof)?;
    if end > data.len() as u64 {
        return Err(eof());
    }
    Ok(&data[offset as usize..end as usize])
}

/// Inflate raw DEFLATE `input` until `out` is full.
fn inflate(input: &[u8], out: &mut [u8]) -> Result<()> {
    let mut inflater = Decompress::new(false);

    while (inflater.total_out() as usize) < out.len() {
        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out() as usize;

        let status =
            inflater.decompress(&input[consumed..], &mut out[produced..], FlushDecompress::None)?;

        let produced_now = inflater.total_out() as usize;
        let stalled = inflater.total_in() as usize == consumed && produced_now == produced;
        // The stream ended, or there is no input left to feed and no output:
        // either way the compressed data is corrupt.
        if produced_now < out.len() && (stalled || status == Status::StreamEnd) {
            return Err(ZipError::InflateStalled {
                produced: produced_now,
                expected: out.len(),
            });
        }
    }

    Ok(())
}
