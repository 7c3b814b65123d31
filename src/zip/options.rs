use std::fmt;
use std::sync::Arc;

use crate::io::{DropUnmap, Unmap};
use crate::pool::{BufferPool, SharedBufferPool};

/// Default upper bound on a local header's extra field length.
pub const DEFAULT_MAX_LOCAL_EXTRA_LEN: u16 = 128;

/// What to do when the central directory lists the same name twice.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the first record with a given name and skip later ones.
    #[default]
    FirstWins,
    /// Fail the load with [`ZipError::DuplicateEntry`](crate::ZipError::DuplicateEntry).
    Error,
}

/// Settings for loading an archive.
#[derive(Clone)]
pub struct LoadOptions {
    pub(crate) duplicates: DuplicatePolicy,
    pub(crate) use_mmap: bool,
    pub(crate) max_local_extra_len: u16,
    pub(crate) pool: Arc<dyn BufferPool>,
    pub(crate) unmapper: Arc<dyn Unmap>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            use_mmap: true,
            max_local_extra_len: DEFAULT_MAX_LOCAL_EXTRA_LEN,
            pool: Arc::new(SharedBufferPool::new()),
            unmapper: Arc::new(DropUnmap),
        }
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Map the file (the default) or read it into memory.
    pub fn use_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Local extra fields longer than this are treated as corruption.
    pub fn max_local_extra_len(mut self, max: u16) -> Self {
        self.max_local_extra_len = max;
        self
    }

    /// Pool supplying output buffers for deflated entries.
    pub fn pool(mut self, pool: Arc<dyn BufferPool>) -> Self {
        self.pool = pool;
        self
    }

    /// Capability used by [`ZipArchive::close`](crate::ZipArchive::close).
    pub fn unmapper(mut self, unmapper: Arc<dyn Unmap>) -> Self {
        self.unmapper = unmapper;
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("duplicates", &self.duplicates)
            .field("use_mmap", &self.use_mmap)
            .field("max_local_extra_len", &self.max_local_extra_len)
            .finish_non_exhaustive()
    }
}
