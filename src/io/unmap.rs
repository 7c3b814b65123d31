use std::io;

use super::Region;

/// Capability to release an archive's [`Region`].
pub trait Unmap: Send + Sync {
    /// Release the region now. The region is consumed either way.
    fn unmap(&self, region: Region) -> io::Result<()>;
}

/// Releases a region by dropping it.
///
/// A dropped [`memmap2::Mmap`] is unmapped synchronously, so this is enough
/// wherever release errors do not need to be observed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DropUnmap;

impl Unmap for DropUnmap {
    fn unmap(&self, region: Region) -> io::Result<()> {
        drop(region);
        Ok(())
    }
}

/// Releases a mapped region with `munmap(2)` and reports its failure.
///
/// Owned regions are simply dropped.
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct ForceUnmap;

#[cfg(unix)]
impl Unmap for ForceUnmap {
    fn unmap(&self, region: Region) -> io::Result<()> {
        use std::mem::ManuallyDrop;

        let mmap = match region {
            Region::Mapped(mmap) if !mmap.is_empty() => ManuallyDrop::new(mmap),
            other => {
                drop(other);
                return Ok(());
            }
        };

        let ptr = mmap.as_ptr() as *mut libc::c_void;
        // SAFETY: ptr/len describe a live mapping created with offset 0, so
        // ptr is page aligned. The Mmap is never dropped after a successful
        // munmap, so the range is not released twice.
        let rc = unsafe { libc::munmap(ptr, mmap.len()) };
        if rc != 0 {
            let err = io::Error::last_os_error();
            drop(ManuallyDrop::into_inner(mmap));
            return Err(err);
        }
        Ok(())
    }
}
