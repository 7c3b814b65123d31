//! Byte sources backing an archive.
//!
//! An archive lives in a [`Region`]: either a read-only memory map of the
//! file or, when mapping is unavailable, the whole file read into memory.
//! Releasing a region goes through an [`Unmap`] capability so callers can
//! decide whether teardown happens on drop or is forced immediately.

mod local;
mod unmap;

pub use local::open_region;
pub use unmap::{DropUnmap, Unmap};

#[cfg(unix)]
pub use unmap::ForceUnmap;

use std::ops::Deref;

use memmap2::Mmap;

/// Contiguous bytes of a whole archive.
#[derive(Debug)]
pub enum Region {
    /// Read-only memory map of the file
    Mapped(Mmap),
    /// File contents read into memory
    Owned(Vec<u8>),
}

impl Region {
    /// Whether the bytes come from a memory map.
    pub fn is_mapped(&self) -> bool {
        matches!(self, Region::Mapped(_))
    }
}

impl Deref for Region {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Region::Mapped(mmap) => mmap,
            Region::Owned(bytes) => bytes,
        }
    }
}

impl From<Vec<u8>> for Region {
    fn from(bytes: Vec<u8>) -> Self {
        Region::Owned(bytes)
    }
}
