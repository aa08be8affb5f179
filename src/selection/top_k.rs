//! Exact top-K selection for streams
//!
//! [`TopKSelector`] keeps the `k` largest elements seen in a bounded
//! min-heap. The heap minimum is the admission threshold: a new element
//! enters only if it is strictly greater.

use crate::selection::heap::BoundedMinHeap;
use crate::traits::{Accumulator, Collector, Error};
use core::marker::PhantomData;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Selector of the `k` largest elements of a stream
///
/// # Guarantees
///
/// - Never holds more than `k` elements
/// - After any sequence of consumes and merges, holds exactly the `k`
///   largest values (as a multiset) of everything folded in
/// - Equal values are kept as separate entries; on a tie at the boundary
///   the element already held is kept
///
/// # Example
///
/// ```
/// use flowpick::selection::TopKSelector;
///
/// let mut top = TopKSelector::new(3).unwrap();
/// for x in [5, 3, 8, 1, 9, 2] {
///     top.consume(x);
/// }
/// assert_eq!(top.finish(), vec![5, 8, 9]);
/// ```
#[derive(Clone, Debug)]
pub struct TopKSelector<T: Ord> {
    /// Current best-k elements
    held: BoundedMinHeap<T>,
    /// Number of items consumed, including merged-in ones
    seen: u64,
}

impl<T: Ord> TopKSelector<T> {
    /// Create a selector keeping the `k` largest elements
    ///
    /// Returns [`Error::ZeroCapacity`] if `k` is zero.
    pub fn new(k: usize) -> Result<Self, Error> {
        if k == 0 {
            return Err(Error::ZeroCapacity);
        }
        tracing::trace!(capacity = k, "creating top-k selector");
        Ok(Self {
            held: BoundedMinHeap::with_capacity(k),
            seen: 0,
        })
    }

    /// Offer an element
    ///
    /// Runs in `O(log k)`.
    pub fn consume(&mut self, item: T) {
        self.seen += 1;
        if let Err(item) = self.held.push(item) {
            if self.held.peek_min().is_some_and(|min| item > *min) {
                self.held.replace_min(item);
            }
        }
    }

    /// Merge another selector into this one
    ///
    /// The result holds exactly the top `k` of both selectors' elements.
    /// Returns [`Error::IncompatibleConfig`] if the capacities differ.
    pub fn merge(self, other: Self) -> Result<Self, Error> {
        let capacity = self.capacity();
        if capacity != other.capacity() {
            return Err(Error::incompatible(
                format_args!("capacity={}", capacity),
                format_args!("capacity={}", other.capacity()),
            ));
        }

        tracing::trace!(
            capacity,
            left = self.held.len(),
            right = other.held.len(),
            "merging top-k selectors"
        );

        let seen = self.seen + other.seen;
        let (mut union, rest) = if self.held.len() >= other.held.len() {
            (self.held.into_vec(), other.held.into_vec())
        } else {
            (other.held.into_vec(), self.held.into_vec())
        };
        union.extend(rest);

        Ok(Self {
            held: BoundedMinHeap::from_vec(capacity, union),
            seen,
        })
    }

    /// Consume the selector and return the held elements in ascending order
    pub fn finish(self) -> Vec<T> {
        self.held.into_sorted_vec()
    }

    /// Maximum number of elements kept (k)
    pub fn capacity(&self) -> usize {
        self.held.capacity()
    }

    /// Number of elements currently held
    pub fn len(&self) -> usize {
        self.held.len()
    }

    /// Check if no element is held
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Check if `k` elements are held
    pub fn is_full(&self) -> bool {
        self.held.is_full()
    }

    /// Number of items consumed, including merged-in ones
    pub fn seen(&self) -> u64 {
        self.seen
    }

    /// Smallest held element, the admission threshold once full
    pub fn min(&self) -> Option<&T> {
        self.held.peek_min()
    }

    /// Held elements in unspecified order
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.held.iter()
    }

    /// Remove all elements, keeping the capacity
    pub fn clear(&mut self) {
        self.held.clear();
        self.seen = 0;
    }
}

impl<T: Ord> Accumulator for TopKSelector<T> {
    type Item = T;
    type Output = Vec<T>;

    fn consume(&mut self, item: T) -> Result<(), Error> {
        TopKSelector::consume(self, item);
        Ok(())
    }

    fn merge(self, other: Self) -> Result<Self, Error> {
        TopKSelector::merge(self, other)
    }

    fn finish(self) -> Vec<T> {
        TopKSelector::finish(self)
    }

    fn count(&self) -> u64 {
        self.seen
    }
}

#[cfg(feature = "serde")]
impl<T: Ord + Clone + serde::Serialize> serde::Serialize for TopKSelector<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let items = self.held.clone().into_sorted_vec();

        let mut state = serializer.serialize_struct("TopKSelector", 3)?;
        state.serialize_field("capacity", &self.capacity())?;
        state.serialize_field("seen", &self.seen)?;
        state.serialize_field("items", &items)?;
        state.end()
    }
}

/// Creates empty [`TopKSelector`]s with a shared capacity
///
/// # Example
///
/// ```
/// use flowpick::selection::TopKCollector;
/// use flowpick::traits::Collector;
///
/// let top = TopKCollector::new(2).collect([4, 1, 7, 3]).unwrap();
/// assert_eq!(top, vec![4, 7]);
/// ```
#[derive(Debug)]
pub struct TopKCollector<T> {
    k: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for TopKCollector<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TopKCollector<T> {}

impl<T> TopKCollector<T> {
    /// Create a collector for the `k` largest elements
    ///
    /// The capacity is validated when accumulators are created.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            _marker: PhantomData,
        }
    }

    /// Number of elements each selector keeps
    pub fn k(&self) -> usize {
        self.k
    }
}

impl<T: Ord> Collector for TopKCollector<T> {
    type Item = T;
    type Output = Vec<T>;
    type Accumulator = TopKSelector<T>;

    fn create(&self) -> Result<TopKSelector<T>, Error> {
        TopKSelector::new(self.k)
    }
}
