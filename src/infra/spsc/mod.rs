//! Lock-free single-producer/single-consumer byte ring.
//!
//! The producer half lives in the transport interrupt (ISR/DMA completion),
//! the consumer half in the application thread. Unlike a plain pop-only
//! queue, the consumer can peek at arbitrary offsets inside the readable
//! window without consuming, which is what the frame parser needs to scan
//! candidate frames in place before releasing them.
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

//==================================================================================Structs

/// Fixed-capacity SPSC circular byte buffer.
///
/// One slot is always kept free to distinguish full from empty, so at most
/// `N - 1` bytes are readable at any time. Cursor updates use
/// acquire/release ordering: the producer publishes bytes before advancing
/// the write cursor, and the consumer only trusts bytes strictly between
/// the two cursors.
pub struct ByteRing<const N: usize> {
    buffer: UnsafeCell<[u8; N]>,
    write: AtomicUsize,
    read: AtomicUsize,
}

// The two halves returned by `split` enforce the single-producer /
// single-consumer discipline; the raw ring is then safe to share.
unsafe impl<const N: usize> Sync for ByteRing<N> {}

/// Writing half of the ring. Safe to drive from interrupt context.
pub struct Producer<'a, const N: usize> {
    ring: &'a ByteRing<N>,
}

/// Reading half of the ring. Owned by the application thread.
pub struct Consumer<'a, const N: usize> {
    ring: &'a ByteRing<N>,
}

//==================================================================================ByteRing

impl<const N: usize> ByteRing<N> {
    /// Create an empty ring. Usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            buffer: UnsafeCell::new([0; N]),
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
        }
    }

    /// Split the ring into its producer and consumer halves.
    ///
    /// Taking `&mut self` guarantees each half exists at most once.
    pub fn split(&mut self) -> (Producer<'_, N>, Consumer<'_, N>) {
        let ring: &ByteRing<N> = self;
        (Producer { ring }, Consumer { ring })
    }
}

impl<const N: usize> Default for ByteRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

//==================================================================================Producer

impl<const N: usize> Producer<'_, N> {
    /// Number of bytes that can currently be stored.
    pub fn free(&self) -> usize {
        let write = self.ring.write.load(Ordering::Relaxed);
        let read = self.ring.read.load(Ordering::Acquire);
        (read + N - write - 1) % N
    }

    /// Append `bytes` to the ring and return how many were stored.
    ///
    /// Bytes that do not fit are dropped: keeping the consumer ahead of the
    /// producer is a capacity contract owed by the transport collaborator,
    /// and the ring never overwrites unread data to hide a violation.
    pub fn push_slice(&mut self, bytes: &[u8]) -> usize {
        let stored = bytes.len().min(self.free());
        let mut write = self.ring.write.load(Ordering::Relaxed);

        for &byte in &bytes[..stored] {
            // Safety: the producer is the only writer, and `free()` keeps
            // every touched slot outside the consumer's readable window.
            unsafe {
                (*self.ring.buffer.get())[write] = byte;
            }
            write = (write + 1) % N;
        }

        // Publish the bytes before moving the cursor.
        self.ring.write.store(write, Ordering::Release);
        stored
    }
}

//==================================================================================Consumer

impl<const N: usize> Consumer<'_, N> {
    /// Number of readable bytes between the two cursors.
    pub fn len(&self) -> usize {
        let write = self.ring.write.load(Ordering::Acquire);
        let read = self.ring.read.load(Ordering::Relaxed);
        (write + N - read) % N
    }

    /// True when no byte is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the byte `offset` positions past the read cursor without
    /// consuming it. Returns `None` past the readable window.
    pub fn peek(&self, offset: usize) -> Option<u8> {
        if offset >= self.len() {
            return None;
        }
        let read = self.ring.read.load(Ordering::Relaxed);
        let index = (read + offset) % N;
        // Safety: `offset < len()` keeps the slot strictly between the two
        // cursors, where the producer never writes.
        Some(unsafe { (*self.ring.buffer.get())[index] })
    }

    /// Consume `count` bytes. `count` is clamped to the readable window.
    pub fn release(&mut self, count: usize) {
        let count = count.min(self.len());
        let read = self.ring.read.load(Ordering::Relaxed);
        self.ring
            .read
            .store((read + count) % N, Ordering::Release);
    }
}
