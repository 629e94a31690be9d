//! Growable circular buffer used to stream text without holding a whole file.
//!
//! The buffer models a queue: producers ask for a contiguous writable block
//! with [`RingBuffer::prepare_block`], fill some prefix of it and commit the
//! amount with [`RingBuffer::record_growth`]; consumers look ahead with
//! [`RingBuffer::get`] and discard consumed items with [`RingBuffer::dequeue`].
//!
//! # Invariants
//! - `count <= capacity`, and `start < capacity` whenever `capacity > 0`.
//! - The live items occupy `count` slots starting at `start`, possibly
//!   wrapping past the end of the backing vector.
//! - Dequeued slots are only reused by later writes; live items are never
//!   overwritten or dropped.
//!
//! # Layout
//! `prepare_block` always hands out the free tail after the live data. When
//! that tail is too short (data wraps, or sits at the back with free room at
//! the front) the live items are first rotated to offset 0. When the free
//! space in total is too small, capacity doubles (or grows to the requested
//! minimum, whichever is larger).

use std::fmt;

/// A growable circular queue of `Copy` items.
///
/// # Examples
///
/// ```rust
/// use flatfile::RingBuffer;
///
/// let mut ring = RingBuffer::with_capacity(4);
/// let block = ring.prepare_block(3);
/// block[..3].copy_from_slice(&['a', 'b', 'c']);
/// ring.record_growth(3);
///
/// assert_eq!(ring.get(0), Some('a'));
/// ring.dequeue(2);
/// assert_eq!(ring.len(), 1);
/// assert_eq!(ring.get(0), Some('c'));
/// ```
pub struct RingBuffer<T> {
    buffer: Vec<T>,
    start: usize,
    count: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Creates an empty buffer. A zero capacity is bumped to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RingBuffer {
            buffer: vec![T::default(); capacity.max(1)],
            start: 0,
            count: 0,
        }
    }

    /// Number of live items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the live item `index` positions from the front.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.count {
            return None;
        }
        Some(self.buffer[(self.start + index) % self.buffer.len()])
    }

    /// Returns the live items as up to two slices in logical order.
    #[must_use]
    pub fn segments(&self) -> (&[T], &[T]) {
        let cap = self.buffer.len();
        if self.count <= cap - self.start {
            (&self.buffer[self.start..self.start + self.count], &[])
        } else {
            let first = cap - self.start;
            (&self.buffer[self.start..], &self.buffer[..self.count - first])
        }
    }

    /// Iterates over the live items front to back.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let (head, tail) = self.segments();
        head.iter().chain(tail.iter()).copied()
    }

    /// Appends one item, wrapping around the end of the backing vector.
    pub fn push(&mut self, item: T) {
        if self.count == self.buffer.len() {
            self.grow(self.count + 1);
        }
        let index = (self.start + self.count) % self.buffer.len();
        self.buffer[index] = item;
        self.count += 1;
    }

    /// Returns a contiguous writable block of at least `minimum` items
    /// (at least one item when `minimum` is zero).
    ///
    /// The block always directly follows the live data, so after writing `n`
    /// items to its front, [`record_growth(n)`](Self::record_growth) appends
    /// them in order.
    pub fn prepare_block(&mut self, minimum: usize) -> &mut [T] {
        let minimum = minimum.max(1);
        if self.count == 0 {
            self.start = 0;
        }
        if self.buffer.len() - self.count < minimum {
            self.grow(self.count + minimum);
        }

        let end = self.start + self.count;
        if end >= self.buffer.len() || self.buffer.len() - end < minimum {
            self.compact();
        }
        let end = self.start + self.count;
        &mut self.buffer[end..]
    }

    /// Commits `written` items to the block returned by the last
    /// [`prepare_block`](Self::prepare_block).
    pub fn record_growth(&mut self, written: usize) {
        let free = self.buffer.len() - (self.start + self.count).min(self.buffer.len());
        debug_assert!(written <= free, "recorded more growth than the prepared block holds");
        self.count += written.min(free);
    }

    /// Discards up to `n` items from the front, returning how many were removed.
    pub fn dequeue(&mut self, n: usize) -> usize {
        let n = n.min(self.count);
        self.start = (self.start + n) % self.buffer.len();
        self.count -= n;
        if self.count == 0 {
            self.start = 0;
        }
        n
    }

    /// Removes every live item.
    pub fn clear(&mut self) {
        self.start = 0;
        self.count = 0;
    }

    fn compact(&mut self) {
        if self.start == 0 {
            return;
        }
        log::trace!(
            "compacting ring buffer: moving {} items from offset {}",
            self.count,
            self.start
        );
        // Rotation places the head segment at 0 with any wrapped tail right after it.
        self.buffer.rotate_left(self.start);
        self.start = 0;
    }

    fn grow(&mut self, minimum: usize) {
        let capacity = (self.buffer.len() * 2).max(minimum);
        log::trace!(
            "growing ring buffer from {} to {} items",
            self.buffer.len(),
            capacity
        );
        let mut buffer = Vec::with_capacity(capacity);
        let (head, tail) = self.segments();
        buffer.extend_from_slice(head);
        buffer.extend_from_slice(tail);
        buffer.resize(capacity, T::default());
        self.buffer = buffer;
        self.start = 0;
    }
}

impl<T: Copy + Default + fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("start", &self.start)
            .field("count", &self.count)
            .field("capacity", &self.buffer.len())
            .field("items", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(ring: &mut RingBuffer<u8>, items: &[u8]) {
        let block = ring.prepare_block(items.len());
        block[..items.len()].copy_from_slice(items);
        ring.record_growth(items.len());
    }

    #[test]
    fn test_empty_buffer_offers_full_capacity() {
        let mut ring = RingBuffer::<u8>::with_capacity(8);
        fill(&mut ring, b"abc");
        ring.dequeue(3);
        assert_eq!(ring.prepare_block(1).len(), 8);
    }

    #[test]
    fn test_room_at_beginning_is_shifted_to_the_end() {
        let mut ring = RingBuffer::<u8>::with_capacity(8);
        fill(&mut ring, b"abcdefgh");
        ring.dequeue(5);
        let block_len = ring.prepare_block(4).len();
        assert_eq!(block_len, 5);
        assert_eq!(ring.capacity(), 8);
        assert_eq!(ring.iter().collect::<Vec<_>>(), b"fgh");
    }

    #[test]
    fn test_wrapped_data_is_compacted() {
        let mut ring = RingBuffer::<u8>::with_capacity(4);
        for b in b"abcd" {
            ring.push(*b);
        }
        ring.dequeue(2);
        ring.push(b'e');
        ring.push(b'f');
        assert_eq!(ring.segments(), (&b"cd"[..], &b"ef"[..]));

        ring.dequeue(1);
        fill(&mut ring, b"g");
        assert_eq!(ring.iter().collect::<Vec<_>>(), b"defg");
        assert_eq!(ring.capacity(), 4);
    }

    #[test]
    fn test_growth_doubles_or_meets_minimum() {
        let mut ring = RingBuffer::<u8>::with_capacity(4);
        fill(&mut ring, b"abcd");
        fill(&mut ring, b"e");
        assert_eq!(ring.capacity(), 8);
        fill(&mut ring, &[b'x'; 20]);
        assert_eq!(ring.capacity(), 25);
        assert_eq!(ring.len(), 25);
        assert_eq!(ring.get(4), Some(b'e'));
    }

    #[test]
    fn test_dequeue_more_than_available() {
        let mut ring = RingBuffer::<u8>::with_capacity(4);
        fill(&mut ring, b"ab");
        assert_eq!(ring.dequeue(10), 2);
        assert!(ring.is_empty());
        assert_eq!(ring.get(0), None);
    }
}
