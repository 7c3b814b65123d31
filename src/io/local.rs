use std::fs::File;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use super::Region;
use crate::error::Result;

/// Open a local file as a [`Region`].
///
/// With `use_mmap` the file is mapped read-only. If mapping is not requested,
/// or the underlying store refuses it, the file is read fully into memory
/// instead; both forms serve reads identically.
pub fn open_region(path: &Path, use_mmap: bool) -> Result<Region> {
    let mut file = File::open(path)?;
    let size = file.metadata()?.len();

    if use_mmap && size > 0 {
        // SAFETY: the map is read-only and the archive is treated as
        // immutable for the lifetime of the handle.
        match unsafe { Mmap::map(&file) } {
            Ok(mmap) => return Ok(Region::Mapped(mmap)),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "mmap unavailable, reading file into memory");
            }
        }
    }

    let mut buf = Vec::with_capacity(size as usize);
    file.read_to_end(&mut buf)?;
    Ok(Region::Owned(buf))
}
