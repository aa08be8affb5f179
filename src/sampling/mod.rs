//! Stream sampling
//!
//! This module provides uniform single-element sampling that stays unbiased
//! when partial samplers are merged in any order.
//!
//! # Example
//!
//! ```
//! use flowpick::sampling::UniformSampler;
//! use rand::SeedableRng;
//! use rand_pcg::Pcg64;
//!
//! let mut sampler = UniformSampler::new(Pcg64::seed_from_u64(7));
//!
//! // Stream a million items, keep one
//! for i in 0..1_000_000 {
//!     sampler.consume(i).unwrap();
//! }
//!
//! // Each item had probability 1/1_000_000 of being picked
//! assert!(sampler.finish().is_some());
//! ```

mod source;
mod uniform;

pub use source::RandomSource;
pub use uniform::{RandomValueCollector, UniformSampler};
