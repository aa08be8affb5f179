//! Array-backed bounded min-heap
//!
//! The heap never holds more than its capacity. Pushing into a full heap
//! hands the item back instead of growing, so the bound cannot be broken
//! by accident.

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Min-heap with a fixed maximum size
///
/// Elements live in a `Vec` in implicit binary-tree order: the children of
/// index `i` are `2i + 1` and `2i + 2`, and every parent is `<=` its
/// children, so the minimum is always at index 0.
#[derive(Clone, Debug)]
pub struct BoundedMinHeap<T: Ord> {
    /// Maximum number of elements
    capacity: usize,
    /// Heap-ordered storage
    data: Vec<T>,
}

impl<T: Ord> BoundedMinHeap<T> {
    /// Create an empty heap holding at most `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            data: Vec::with_capacity(capacity),
        }
    }

    /// Build a heap from arbitrary elements, keeping the `capacity` largest
    ///
    /// Heapifies in `O(n)` and then pops minima until the bound holds.
    pub fn from_vec(capacity: usize, data: Vec<T>) -> Self {
        let mut heap = Self { capacity, data };
        heap.heapify();
        while heap.data.len() > heap.capacity {
            heap.pop_min();
        }
        heap
    }

    /// Maximum number of elements
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of elements held
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if the heap is at capacity
    pub fn is_full(&self) -> bool {
        self.data.len() >= self.capacity
    }

    /// Smallest element
    pub fn peek_min(&self) -> Option<&T> {
        self.data.first()
    }

    /// Insert an element if there is room
    ///
    /// Returns the element back if the heap is full.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.data.push(item);
        self.sift_up(self.data.len() - 1);
        Ok(())
    }

    /// Replace the minimum with `item` and return the evicted minimum
    ///
    /// On an empty heap the item is inserted (if capacity allows) and
    /// `None` is returned.
    pub fn replace_min(&mut self, item: T) -> Option<T> {
        if self.data.is_empty() {
            // a capacity-0 heap hands the item back; it is dropped here
            if let Err(dropped) = self.push(item) {
                drop(dropped);
            }
            return None;
        }
        let evicted = core::mem::replace(&mut self.data[0], item);
        self.sift_down(0, self.data.len());
        Some(evicted)
    }

    /// Remove and return the smallest element
    pub fn pop_min(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let min = self.data.pop();
        self.sift_down(0, self.data.len());
        min
    }

    /// Elements in heap order
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Remove all elements
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Backing storage in heap order
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Elements in ascending order
    ///
    /// Heap-sorts in place: each pass moves the current minimum to the end
    /// of the shrinking heap region, which leaves the array descending.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut end = self.data.len();
        while end > 1 {
            end -= 1;
            self.data.swap(0, end);
            self.sift_down(0, end);
        }
        self.data.reverse();
        self.data
    }

    fn heapify(&mut self) {
        let len = self.data.len();
        for i in (0..len / 2).rev() {
            self.sift_down(i, len);
        }
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.data[idx] >= self.data[parent] {
                break;
            }
            self.data.swap(idx, parent);
            idx = parent;
        }
    }

    /// Restore heap order below `idx`, treating `data[..end]` as the heap
    fn sift_down(&mut self, mut idx: usize, end: usize) {
        loop {
            let left = 2 * idx + 1;
            if left >= end {
                break;
            }
            let right = left + 1;
            let smallest = if right < end && self.data[right] < self.data[left] {
                right
            } else {
                left
            };
            if self.data[idx] <= self.data[smallest] {
                break;
            }
            self.data.swap(idx, smallest);
            idx = smallest;
        }
    }
}

impl<'a, T: Ord> IntoIterator for &'a BoundedMinHeap<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(feature = "serde")]
impl<T: Ord + Clone + serde::Serialize> serde::Serialize for BoundedMinHeap<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let items = self.clone().into_sorted_vec();

        let mut state = serializer.serialize_struct("BoundedMinHeap", 2)?;
        state.serialize_field("capacity", &self.capacity)?;
        state.serialize_field("items", &items)?;
        state.end()
    }
}
