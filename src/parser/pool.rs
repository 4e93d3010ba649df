//! LIFO pool of scratch [`Buffer`]s.
//!
//! Every recursive block/inline render needs a fresh scratch buffer to
//! accumulate a child's rendered output before invoking the parent's
//! callback. Allocating one per recursion would be the single biggest
//! allocation hot spot in a deeply nested document, so acquisitions are
//! served from a pool and returned to it when the scratch goes out of scope.
//!
//! [`Scratch`] is the scoped-acquisition guard: it derefs to [`Buffer`] and
//! returns its buffer to the pool on drop, which is what gives us the
//! "always returned on all exit paths" property without the caller having
//! to remember to release anything (including on an early `return` or a
//! `?`).

use crate::buffer::Buffer;
use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

/// Caps how many freed buffers are retained; beyond this, excess buffers are
/// dropped instead of pooled.
const MAX_POOLED: usize = 64;

#[derive(Debug, Default)]
pub struct BufferPool {
    free: RefCell<Vec<Buffer>>,
}

impl BufferPool {
    pub fn new() -> Self {
        BufferPool {
            free: RefCell::new(Vec::new()),
        }
    }

    /// Acquire a scratch buffer: pop from the free list or allocate fresh.
    pub fn acquire(&self) -> Scratch<'_> {
        let buffer = self
            .free
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| Buffer::with_capacity(128));
        Scratch {
            pool: self,
            buffer: Some(buffer),
        }
    }

    fn release(&self, mut buffer: Buffer) {
        buffer.reset();
        let mut free = self.free.borrow_mut();
        if free.len() < MAX_POOLED {
            free.push(buffer);
        } else {
            log::trace!("buffer pool: dropping excess buffer past cap ({MAX_POOLED})");
        }
    }
}

/// Scoped acquisition of a pooled [`Buffer`]; returns it to the pool on
/// drop, regardless of how the scope is exited.
pub struct Scratch<'a> {
    pool: &'a BufferPool,
    buffer: Option<Buffer>,
}

impl Deref for Scratch<'_> {
    type Target = Buffer;
    fn deref(&self) -> &Buffer {
        self.buffer.as_ref().expect("scratch buffer taken twice")
    }
}

impl DerefMut for Scratch<'_> {
    fn deref_mut(&mut self) -> &mut Buffer {
        self.buffer.as_mut().expect("scratch buffer taken twice")
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.release(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_released_buffers() {
        let pool = BufferPool::new();
        {
            let mut s = pool.acquire();
            s.push_str("abc");
        }
        assert_eq!(pool.free.borrow().len(), 1);
        let s = pool.acquire();
        assert!(s.is_empty(), "released buffer must come back reset");
        assert_eq!(pool.free.borrow().len(), 0);
    }

    #[test]
    fn caps_pooled_buffers() {
        let pool = BufferPool::new();
        let mut guards = Vec::new();
        for _ in 0..(MAX_POOLED + 8) {
            guards.push(pool.acquire());
        }
        drop(guards);
        assert_eq!(pool.free.borrow().len(), MAX_POOLED);
    }
}
