use crate::{error::ZeroCapacitySnafu, Error};
use heapless::Deque;
use snafu::ensure;

/// Fixed-capacity FIFO byte store the parser reads from.
///
/// Implementations never allocate and never evict buffered bytes to make room: a write that
/// does not fit is cut short instead.
pub trait RingBuffer {
    /// Total number of bytes the buffer can hold.
    fn capacity(&self) -> usize;

    /// Number of bytes currently buffered.
    fn full(&self) -> usize;

    /// Appends as many bytes of `src` as fit and returns how many were accepted.
    fn write(&mut self, src: &[u8]) -> usize;

    /// Removes up to `dst.len()` bytes from the front into `dst` and returns how many were read.
    fn read(&mut self, dst: &mut [u8]) -> usize;

    /// Discards all buffered bytes and returns how many there were.
    fn reset(&mut self) -> usize;

    /// Number of bytes that can still be written.
    fn free(&self) -> usize {
        self.capacity() - self.full()
    }
}

/// Ring buffer over caller-owned backing memory.
///
/// The whole slice is usable, so a 128 byte slice buffers up to 128 bytes.
#[derive(Debug)]
pub struct SliceRingBuffer<'a> {
    buf: &'a mut [u8],
    head: usize,
    len: usize,
}

impl<'a> SliceRingBuffer<'a> {
    /// Creates an empty ring buffer backed by `buf`. Fails if `buf` is empty.
    pub fn new(buf: &'a mut [u8]) -> Result<Self, Error> {
        ensure!(!buf.is_empty(), ZeroCapacitySnafu);

        Ok(Self {
            buf,
            head: 0,
            len: 0,
        })
    }

    /// Gives the backing memory back to the caller.
    pub fn into_inner(self) -> &'a mut [u8] {
        self.buf
    }
}

impl RingBuffer for SliceRingBuffer<'_> {
    fn capacity(&self) -> usize {
        self.buf.len()
    }

    fn full(&self) -> usize {
        self.len
    }

    fn write(&mut self, src: &[u8]) -> usize {
        let cap = self.buf.len();
        let n = src.len().min(cap - self.len);
        let tail = (self.head + self.len) % cap;

        // Up to the end of the storage, then wrap to the start
        let first = n.min(cap - tail);
        self.buf[tail..tail + first].copy_from_slice(&src[..first]);
        self.buf[..n - first].copy_from_slice(&src[first..n]);

        self.len += n;
        n
    }

    fn read(&mut self, dst: &mut [u8]) -> usize {
        let cap = self.buf.len();
        let n = dst.len().min(self.len);

        let first = n.min(cap - self.head);
        dst[..first].copy_from_slice(&self.buf[self.head..self.head + first]);
        dst[first..n].copy_from_slice(&self.buf[..n - first]);

        self.head = (self.head + n) % cap;
        self.len -= n;
        n
    }

    fn reset(&mut self) -> usize {
        let discarded = self.len;
        self.head = 0;
        self.len = 0;
        discarded
    }
}

/// Statically sized storage owned by value, for parsers that live in a `static`.
impl<const N: usize> RingBuffer for Deque<u8, N> {
    fn capacity(&self) -> usize {
        N
    }

    fn full(&self) -> usize {
        self.len()
    }

    fn write(&mut self, src: &[u8]) -> usize {
        let mut written = 0;
        for &byte in src {
            if self.push_back(byte).is_err() {
                break;
            }
            written += 1;
        }
        written
    }

    fn read(&mut self, dst: &mut [u8]) -> usize {
        let mut read = 0;
        for slot in dst.iter_mut() {
            let Some(byte) = self.pop_front() else {
                break;
            };
            *slot = byte;
            read += 1;
        }
        read
    }

    fn reset(&mut self) -> usize {
        let discarded = self.len();
        self.clear();
        discarded
    }
}
