//! Reusable output buffers for decompression.

use parking_lot::Mutex;

/// Source of decompression output buffers.
///
/// Buffers handed out by [`allocate`](BufferPool::allocate) have exactly the
/// requested length. Returning them through [`release`](BufferPool::release)
/// lets later reads reuse the allocation.
pub trait BufferPool: Send + Sync {
    fn allocate(&self, size: usize) -> Vec<u8>;

    fn release(&self, buf: Vec<u8>);
}

/// Default number of buffers a [`SharedBufferPool`] keeps around.
const DEFAULT_MAX_RETAINED: usize = 16;

/// Buffers larger than this are never retained.
const DEFAULT_MAX_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// Thread-safe free list of byte buffers.
#[derive(Debug)]
pub struct SharedBufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    max_retained: usize,
    max_buffer_size: usize,
}

impl SharedBufferPool {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_RETAINED, DEFAULT_MAX_BUFFER_SIZE)
    }

    /// Pool keeping at most `max_retained` buffers of at most
    /// `max_buffer_size` bytes of capacity each.
    pub fn with_limits(max_retained: usize, max_buffer_size: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_retained,
            max_buffer_size,
        }
    }

    /// Number of buffers currently waiting for reuse.
    pub fn retained(&self) -> usize {
        self.free.lock().len()
    }
}

impl Default for SharedBufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferPool for SharedBufferPool {
    fn allocate(&self, size: usize) -> Vec<u8> {
        let reused = {
            let mut free = self.free.lock();
            let fit = free.iter().position(|buf| buf.capacity() >= size);
            fit.map(|i| free.swap_remove(i))
        };

        match reused {
            Some(mut buf) => {
                buf.clear();
                buf.resize(size, 0);
                buf
            }
            None => vec![0; size],
        }
    }

    fn release(&self, buf: Vec<u8>) {
        if buf.capacity() == 0 || buf.capacity() > self.max_buffer_size {
            return;
        }
        let mut free = self.free.lock();
        if free.len() < self.max_retained {
            free.push(buf);
        }
    }
}
