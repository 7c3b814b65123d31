use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{Result, ZipError};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// End of Central Directory (EOCD) - 22 bytes minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment_len: u16,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    /// Entry count value meaning "more than a 16-bit field can hold".
    pub const ENTRY_COUNT_OVERFLOW: u16 = 0xFFFF;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(ZipError::NotAnArchive);
        }

        // Skip disk number, disk with CD and entries on this disk
        let mut cursor = Cursor::new(&data[10..Self::SIZE]);

        Ok(Self {
            total_entries: cursor.read_u16::<LittleEndian>()?,
            cd_size: cursor.read_u32::<LittleEndian>()?,
            cd_offset: cursor.read_u32::<LittleEndian>()?,
            comment_len: cursor.read_u16::<LittleEndian>()?,
        })
    }

    /// Whether the entry count field overflowed and must be estimated.
    pub fn entry_count_overflowed(&self) -> bool {
        self.total_entries == Self::ENTRY_COUNT_OVERFLOW
    }
}

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
pub const CDFH_MIN_SIZE: usize = 46;

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// Offset of the extra field length inside a Local File Header.
pub const LFH_EXTRA_LEN_OFFSET: usize = 28;

/// Fixed part of a Central Directory File Header.
///
/// Only the fields needed to locate and decode entry data are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentralDirectoryHeader {
    pub method: u16,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub name_len: u16,
    pub extra_len: u16,
    pub comment_len: u16,
    pub lfh_offset: u32,
}

impl CentralDirectoryHeader {
    /// Parse the fixed 46-byte header at the start of `data`.
    ///
    /// Returns `None` when the signature does not match.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < CDFH_MIN_SIZE || &data[0..4] != CDFH_SIGNATURE {
            return None;
        }

        Some(Self {
            method: LittleEndian::read_u16(&data[10..]),
            compressed_size: LittleEndian::read_u32(&data[20..]),
            uncompressed_size: LittleEndian::read_u32(&data[24..]),
            name_len: LittleEndian::read_u16(&data[28..]),
            extra_len: LittleEndian::read_u16(&data[30..]),
            comment_len: LittleEndian::read_u16(&data[32..]),
            lfh_offset: LittleEndian::read_u32(&data[42..]),
        })
    }

    /// Full length of the record including name, extra field and comment.
    pub fn record_len(&self) -> usize {
        CDFH_MIN_SIZE + self.name_len as usize + self.extra_len as usize + self.comment_len as usize
    }
}
