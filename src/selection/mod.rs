//! Bounded top-K selection
//!
//! # Algorithms
//!
//! - [`BoundedMinHeap`]: array-backed min-heap that never exceeds its capacity
//! - [`TopKSelector`]: exact k largest elements, mergeable across partitions
//!
//! # Example
//!
//! ```
//! use flowpick::selection::TopKSelector;
//!
//! let mut worker1 = TopKSelector::new(3).unwrap();
//! let mut worker2 = TopKSelector::new(3).unwrap();
//!
//! for x in [5, 8, 9] {
//!     worker1.consume(x);
//! }
//! for x in [1, 2, 3] {
//!     worker2.consume(x);
//! }
//!
//! let merged = worker1.merge(worker2).unwrap();
//! assert_eq!(merged.finish(), vec![5, 8, 9]);
//! ```

mod heap;
mod top_k;

pub use heap::BoundedMinHeap;
pub use top_k::{TopKCollector, TopKSelector};
