// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A fixed-capacity circular buffer.

/// A circular buffer that overwrites its oldest element once full.
///
/// Pushing is O(1): the write cursor moves modulo the capacity instead of
/// shifting elements.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    data: Vec<T>,
    head: usize,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` elements (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Pushes a value, returning the evicted oldest value if the buffer was full.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.data.len() < self.capacity {
            self.data.push(value);
            None
        } else {
            let evicted = std::mem::replace(&mut self.data[self.head], value);
            self.head = (self.head + 1) % self.capacity;
            Some(evicted)
        }
    }

    /// Returns the number of elements currently stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the maximum number of elements retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        let (newer, older) = self.data.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    /// Returns the most recently pushed value.
    pub fn latest(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.data.clear();
        self.head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_iter_in_chronological_order() {
        let mut rb = RingBuffer::new(3);
        assert!(rb.is_empty());
        assert_eq!(rb.push(1), None);
        assert_eq!(rb.push(2), None);
        assert_eq!(rb.push(3), None);
        assert_eq!(rb.push(4), Some(1));

        let values: Vec<i32> = rb.iter().copied().collect();
        assert_eq!(values, vec![2, 3, 4]);
        assert_eq!(rb.len(), 3);
        assert_eq!(rb.latest(), Some(&4));
    }

    #[test]
    fn wraps_repeatedly() {
        let mut rb = RingBuffer::new(2);
        for i in 0..7 {
            rb.push(i);
        }
        let values: Vec<i32> = rb.iter().copied().collect();
        assert_eq!(values, vec![5, 6]);

        let newest_first: Vec<i32> = rb.iter().rev().copied().collect();
        assert_eq!(newest_first, vec![6, 5]);
    }

    #[test]
    fn zero_capacity_is_promoted_to_one() {
        let mut rb = RingBuffer::new(0);
        assert_eq!(rb.capacity(), 1);
        rb.push("a");
        assert_eq!(rb.push("b"), Some("a"));
        assert_eq!(rb.latest(), Some(&"b"));
    }

    #[test]
    fn clear_resets_the_cursor() {
        let mut rb = RingBuffer::new(2);
        rb.push(1);
        rb.push(2);
        rb.push(3);
        rb.clear();
        assert!(rb.is_empty());
        rb.push(9);
        assert_eq!(rb.iter().copied().collect::<Vec<_>>(), vec![9]);
    }
}
