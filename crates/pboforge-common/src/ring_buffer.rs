//! Growable circular buffer.
//!
//! [`RingBuffer`] is a FIFO with indexed access relative to the oldest
//! element. It supports two insertion modes:
//!
//! - [`RingBuffer::write`] keeps the capacity fixed and overwrites the oldest
//!   element once the buffer is full.
//! - [`RingBuffer::add`] never drops data: a full buffer grows its logical
//!   capacity by one, reallocating the backing storage geometrically when the
//!   spare room runs out.
//!
//! The lexer uses it as an unbounded lookahead queue and the file reader as a
//! character window.

use std::ops::{Index, IndexMut};

/// A circular FIFO buffer with relative indexing.
///
/// # Example
///
/// ```
/// use pboforge_common::RingBuffer;
///
/// let mut buffer = RingBuffer::new(2);
/// buffer.write(1);
/// buffer.write(2);
/// buffer.write(3);
/// assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
///
/// buffer.add(4);
/// assert_eq!(buffer.capacity(), 3);
/// assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    storage: Vec<Option<T>>,
    capacity: usize,
    head: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be at least 1");
        let mut storage = Vec::with_capacity(capacity);
        storage.resize_with(capacity, || None);
        Self {
            storage,
            capacity,
            head: 0,
            len: 0,
        }
    }

    /// Number of stored elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the next [`write`](Self::write) would overwrite.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Logical capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    fn slot(&self, index: usize) -> usize {
        (self.head + index) % self.capacity
    }

    /// Get the element `index` positions after the oldest one.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.storage[self.slot(index)].as_ref()
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let slot = self.slot(index);
        self.storage[slot].as_mut()
    }

    /// Append an element, overwriting the oldest one when full.
    pub fn write(&mut self, value: T) {
        if self.is_full() {
            self.storage[self.head] = Some(value);
            self.head = (self.head + 1) % self.capacity;
        } else {
            let slot = self.slot(self.len);
            self.storage[slot] = Some(value);
            self.len += 1;
        }
    }

    /// Append an element, growing the capacity by one when full.
    pub fn add(&mut self, value: T) {
        if self.is_full() {
            self.grow();
        }
        self.write(value);
    }

    /// Re-lay the elements oldest-first and bump the capacity by one.
    fn grow(&mut self) {
        let mut ordered = Vec::with_capacity(self.len);
        for index in 0..self.len {
            let slot = self.slot(index);
            ordered.push(self.storage[slot].take());
        }

        self.capacity += 1;
        if self.capacity > self.storage.len() {
            let target = grown_storage_len(self.storage.len()).max(self.capacity);
            self.storage.resize_with(target, || None);
        }

        for (slot, value) in ordered.into_iter().enumerate() {
            self.storage[slot] = value;
        }
        self.head = 0;
    }

    /// Remove and return the oldest element.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.storage[self.head].take();
        self.head = (self.head + 1) % self.capacity;
        self.len -= 1;
        value
    }

    /// Remove up to `count` of the oldest elements, oldest first.
    pub fn pop_n(&mut self, count: usize) -> Vec<T> {
        let count = count.min(self.len);
        let mut popped = Vec::with_capacity(count);
        for _ in 0..count {
            match self.pop() {
                Some(value) => popped.push(value),
                None => break,
            }
        }
        popped
    }

    /// Drop every element, keeping the capacity.
    pub fn clear(&mut self) {
        for slot in &mut self.storage {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Iterate from the oldest to the newest element.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |index| self.get(index))
    }
}

impl<T: PartialEq> RingBuffer<T> {
    /// Linear search by equality.
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|item| item == value)
    }
}

/// Storage growth: doubling while small, then +20%, then +5%.
fn grown_storage_len(current: usize) -> usize {
    if current < 256 {
        current * 2
    } else if current < 1024 {
        current + current.div_ceil(5)
    } else {
        current + current.div_ceil(20)
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("ring buffer index {index} out of range (len {})", self.len),
        }
    }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("ring buffer index {index} out of range (len {len})"),
        }
    }
}

impl<T> FromIterator<T> for RingBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buffer = RingBuffer::new(1);
        buffer.extend(iter);
        buffer
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(buffer: &RingBuffer<i32>) -> Vec<i32> {
        buffer.iter().copied().collect()
    }

    #[test]
    fn test_write_over_capacity_shifts() {
        let mut buffer = RingBuffer::new(3);
        for value in 1..=5 {
            buffer.write(value);
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.capacity(), 3);
        assert_eq!(collect(&buffer), vec![3, 4, 5]);
        assert_eq!(buffer[0], 3);
        assert_eq!(buffer[2], 5);
    }

    #[test]
    fn test_add_over_capacity_grows() {
        let mut buffer = RingBuffer::new(2);
        for value in 0..600 {
            buffer.add(value);
            assert!(buffer.len() <= buffer.capacity());
        }
        assert_eq!(buffer.len(), 600);
        assert_eq!(collect(&buffer), (0..600).collect::<Vec<_>>());
    }

    #[test]
    fn test_add_after_wraparound_keeps_order() {
        let mut buffer = RingBuffer::new(3);
        buffer.write(1);
        buffer.write(2);
        buffer.write(3);
        buffer.write(4);
        buffer.add(5);
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(collect(&buffer), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_from_iter_sizes_to_content() {
        let buffer: RingBuffer<i32> = vec![2, 3, 4, 5].into_iter().collect();
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(collect(&buffer), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_pop_and_pop_n() {
        let mut buffer: RingBuffer<i32> = (1..=5).collect();
        assert_eq!(buffer.pop(), Some(1));
        assert_eq!(buffer.pop_n(2), vec![2, 3]);
        assert_eq!(buffer.pop_n(10), vec![4, 5]);
        assert_eq!(buffer.pop(), None);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_contains_and_clear() {
        let mut buffer: RingBuffer<i32> = (1..=3).collect();
        assert!(buffer.contains(&2));
        assert!(!buffer.contains(&7));
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(!buffer.contains(&2));
        buffer.write(9);
        assert_eq!(collect(&buffer), vec![9]);
    }

    #[test]
    fn test_index_mut() {
        let mut buffer: RingBuffer<i32> = (1..=3).collect();
        buffer[1] = 20;
        assert_eq!(collect(&buffer), vec![1, 20, 3]);
    }

    #[test]
    #[should_panic]
    fn test_zero_capacity_panics() {
        let _ = RingBuffer::<u8>::new(0);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range_panics() {
        let buffer: RingBuffer<i32> = (1..=2).collect();
        let _ = buffer[2];
    }

    #[test]
    fn test_storage_growth_thresholds() {
        assert_eq!(grown_storage_len(10), 20);
        assert_eq!(grown_storage_len(255), 510);
        assert_eq!(grown_storage_len(256), 308);
        assert_eq!(grown_storage_len(1023), 1228);
        assert_eq!(grown_storage_len(1024), 1076);
        assert_eq!(grown_storage_len(1025), 1077);
    }

    #[test]
    fn test_add_past_256_grows_by_a_fifth() {
        let mut buffer = RingBuffer::new(256);
        for value in 0..256 {
            buffer.add(value);
        }
        // Wrap the head so growth has to re-lay the elements.
        assert_eq!(buffer.pop_n(10), (0..10).collect::<Vec<_>>());
        for value in 256..266 {
            buffer.add(value);
        }
        assert_eq!(buffer.storage.len(), 256);

        buffer.add(266);
        assert_eq!(buffer.capacity(), 257);
        assert_eq!(buffer.storage.len(), 308);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), (10..267).collect::<Vec<_>>());
    }
}
