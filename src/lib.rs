//! # Flowpick
//!
//! Mergeable stream accumulators for fold/reduce pipelines.
//!
//! Flowpick provides two aggregators that can be folded over arbitrary
//! partitions of a stream and merged back together in any order, giving the
//! same answer as a single pass over the whole input:
//!
//! - **Uniform sampling**: pick one element, each with probability `1/n`
//! - **Top-K selection**: keep the `k` largest elements by a total order
//!
//! ## Quick Start
//!
//! ```rust
//! use flowpick::prelude::*;
//!
//! let mut top = TopKSelector::new(3).unwrap();
//! for x in [5, 3, 8, 1, 9, 2] {
//!     top.consume(x);
//! }
//! assert_eq!(top.finish(), vec![5, 8, 9]);
//! ```
//!
//! ## Distributed Computing
//!
//! Every accumulator implements the [`Accumulator`](traits::Accumulator)
//! trait, and every factory the [`Collector`](traits::Collector) trait, so a
//! harness can fold each partition independently and merge the partials:
//!
//! ```rust
//! use flowpick::sampling::RandomValueCollector;
//! use flowpick::traits::Collector;
//! use rand_pcg::Pcg64;
//!
//! let collector = RandomValueCollector::<u32, Pcg64>::with_seed(42);
//!
//! // Each worker processes its partition with its own random source
//! let mut worker1 = collector.create().unwrap();
//! let mut worker2 = collector.create().unwrap();
//! worker1.consume(1).unwrap();
//! worker2.consume(2).unwrap();
//!
//! // Merge results
//! let merged = worker1.merge(worker2).unwrap();
//! assert_eq!(merged.count(), 2);
//! ```
//!
//! ## Feature Flags
//!
//! Algorithm families:
//! - `sampling` (default): uniform single-element sampling
//! - `selection` (default): bounded min-heap and top-K selection
//! - `full`: enable everything below
//!
//! Platform features:
//! - `std` (default): standard library support, OS-seeded collectors
//! - `serde`: serialization of selector state
//! - `rayon`: parallel fold/reduce driver

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Core traits always available
pub mod reduce;
pub mod traits;

#[cfg(feature = "sampling")]
#[cfg_attr(docsrs, doc(cfg(feature = "sampling")))]
pub mod sampling;

#[cfg(feature = "selection")]
#[cfg_attr(docsrs, doc(cfg(feature = "selection")))]
pub mod selection;

pub use traits::{Error, ErrorKind};

pub mod prelude {
    pub use crate::traits::*;

    #[cfg(feature = "sampling")]
    pub use crate::sampling::{RandomSource, RandomValueCollector, UniformSampler};

    #[cfg(feature = "selection")]
    pub use crate::selection::{BoundedMinHeap, TopKCollector, TopKSelector};
}

#[cfg(feature = "sampling")]
pub use sampling::UniformSampler;

#[cfg(feature = "selection")]
pub use selection::TopKSelector;
