//! Uniform single-element sampling from streams
//!
//! A [`UniformSampler`] holds one candidate out of every element it has
//! seen, chosen so that each element is equally likely to be the final
//! result. Partial samplers built over disjoint partitions merge into a
//! sampler over the whole input with the same guarantee.

use crate::sampling::source::{splitmix64, RandomSource};
use crate::traits::{Accumulator, Collector, Error};
use core::marker::PhantomData;
use core::sync::atomic::{AtomicU64, Ordering};
use rand::{RngCore, SeedableRng};

/// Reservoir sampler of size one
///
/// # Algorithm
///
/// 1. On the i-th element (1-indexed), draw `r` uniformly in `[0, i)`
/// 2. If `r == 0`, the element replaces the current candidate
///
/// After `n` elements each one is the candidate with probability `1/n`.
///
/// Merging a sampler over `a` elements with one over `b` elements keeps the
/// left candidate with probability `a/(a+b)`, which preserves the `1/n`
/// guarantee for any partitioning and any merge order.
///
/// # Example
///
/// ```
/// use flowpick::sampling::UniformSampler;
/// use rand::SeedableRng;
/// use rand_pcg::Pcg64;
///
/// let mut left = UniformSampler::new(Pcg64::seed_from_u64(1));
/// let mut right = UniformSampler::new(Pcg64::seed_from_u64(2));
///
/// for i in 0..50 {
///     left.consume(i).unwrap();
/// }
/// for i in 50..100 {
///     right.consume(i).unwrap();
/// }
///
/// let merged = left.merge(right).unwrap();
/// assert_eq!(merged.count(), 100);
/// assert!(merged.finish().unwrap() < 100);
/// ```
#[derive(Clone, Debug)]
pub struct UniformSampler<T, R> {
    /// Number of items seen, including merged-in ones
    count: u64,
    /// Currently selected item
    candidate: Option<T>,
    /// Injected source of randomness
    source: R,
}

impl<T, R: RandomSource> UniformSampler<T, R> {
    /// Create an empty sampler drawing from `source`
    pub fn new(source: R) -> Self {
        Self {
            count: 0,
            candidate: None,
            source,
        }
    }

    /// Offer an item to the sampler
    ///
    /// If the draw fails the sampler is left unchanged.
    pub fn consume(&mut self, item: T) -> Result<(), Error> {
        let count = self.count + 1;
        if self.source.next_below(count)? == 0 {
            self.candidate = Some(item);
        }
        self.count = count;
        Ok(())
    }

    /// Offer an item that may be absent
    ///
    /// Returns [`Error::AbsentElement`] for `None` without touching the state.
    pub fn consume_option(&mut self, item: Option<T>) -> Result<(), Error> {
        match item {
            Some(item) => self.consume(item),
            None => Err(Error::AbsentElement),
        }
    }

    /// Merge another sampler into this one
    ///
    /// The candidate of `self` survives with probability
    /// `self.count / (self.count + other.count)`. The other sampler's random
    /// source is dropped.
    pub fn merge(mut self, other: Self) -> Result<Self, Error> {
        let total = self.count + other.count;
        tracing::trace!(
            left = self.count,
            right = other.count,
            total,
            "merging uniform samplers"
        );

        if total == 0 {
            return Ok(self);
        }

        if self.source.next_below(total)? >= self.count {
            self.candidate = other.candidate;
        }
        self.count = total;
        Ok(self)
    }
}

impl<T, R> UniformSampler<T, R> {
    /// Consume the sampler and return the selected item
    pub fn finish(self) -> Option<T> {
        self.candidate
    }

    /// Currently selected item
    pub fn candidate(&self) -> Option<&T> {
        self.candidate.as_ref()
    }

    /// Number of items seen, including merged-in ones
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Check if nothing was consumed
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Probability that any given item seen so far is the candidate
    pub fn selection_probability(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            1.0 / self.count as f64
        }
    }

    /// Reset to the empty state, keeping the random source
    pub fn clear(&mut self) {
        self.count = 0;
        self.candidate = None;
    }

    /// Take back the random source
    pub fn into_source(self) -> R {
        self.source
    }
}

impl<T, R: RandomSource> Accumulator for UniformSampler<T, R> {
    type Item = T;
    type Output = Option<T>;

    fn consume(&mut self, item: T) -> Result<(), Error> {
        UniformSampler::consume(self, item)
    }

    fn merge(self, other: Self) -> Result<Self, Error> {
        UniformSampler::merge(self, other)
    }

    fn finish(self) -> Option<T> {
        UniformSampler::finish(self)
    }

    fn count(&self) -> u64 {
        self.count
    }
}

/// Creates one independently seeded [`UniformSampler`] per partition
///
/// Every call to `create` derives a fresh seed from the base seed and a
/// stream counter, so no generator is shared between workers.
///
/// # Example
///
/// ```
/// use flowpick::sampling::RandomValueCollector;
/// use flowpick::traits::Collector;
/// use rand_pcg::Pcg64;
///
/// let collector = RandomValueCollector::<&str, Pcg64>::with_seed(42);
/// let picked = collector.collect(["a", "b", "c", "d"]).unwrap();
/// assert!(picked.is_some());
/// ```
#[derive(Debug)]
pub struct RandomValueCollector<T, R> {
    seed: u64,
    next_stream: AtomicU64,
    _marker: PhantomData<fn() -> (T, R)>,
}

impl<T, R: RngCore + SeedableRng> RandomValueCollector<T, R> {
    /// Create a collector whose samplers are seeded from `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            next_stream: AtomicU64::new(0),
            _marker: PhantomData,
        }
    }

    /// Create a collector seeded from operating system entropy
    #[cfg(feature = "std")]
    pub fn from_entropy() -> Self {
        Self::with_seed(rand::rngs::OsRng.next_u64())
    }

    /// Base seed of this collector
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn next_source(&self) -> R {
        let stream = self.next_stream.fetch_add(1, Ordering::Relaxed);
        R::seed_from_u64(splitmix64(self.seed ^ splitmix64(stream)))
    }
}

impl<T, R: RngCore + SeedableRng> Collector for RandomValueCollector<T, R> {
    type Item = T;
    type Output = Option<T>;
    type Accumulator = UniformSampler<T, R>;

    fn create(&self) -> Result<UniformSampler<T, R>, Error> {
        Ok(UniformSampler::new(self.next_source()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::source::testing::{FailingRng, ScriptedRng};
    use crate::traits::ErrorKind;
    use rand_pcg::Pcg64;

    fn sampler(seed: u64) -> UniformSampler<u32, Pcg64> {
        UniformSampler::new(Pcg64::seed_from_u64(seed))
    }

    #[test]
    fn test_empty() {
        let s = sampler(1);
        assert!(s.is_empty());
        assert_eq!(s.selection_probability(), 0.0);
        assert_eq!(s.finish(), None);
    }

    #[test]
    fn test_single_element_always_selected() {
        for seed in 0..100 {
            let mut s = sampler(seed);
            s.consume(7).unwrap();
            assert_eq!(s.finish(), Some(7));
        }
    }

    #[test]
    fn test_absent_element_rejected() {
        let mut s = sampler(1);
        s.consume(1).unwrap();

        let err = s.consume_option(None).unwrap_err();
        assert_eq!(err, Error::AbsentElement);
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(s.count(), 1);
        assert_eq!(s.candidate(), Some(&1));

        s.consume_option(Some(2)).unwrap();
        assert_eq!(s.count(), 2);
    }

    #[test]
    fn test_candidate_replaced_on_zero_draw() {
        // Draws: 0 (take 10), 0 (take 20), 1 (keep 20)
        let mut s = UniformSampler::new(ScriptedRng::new(vec![0, 0, 1]));
        s.consume(10).unwrap();
        s.consume(20).unwrap();
        s.consume(30).unwrap();
        assert_eq!(s.count(), 3);
        assert_eq!(s.finish(), Some(20));
    }

    #[test]
    fn test_merge_weighting() {
        let left = UniformSampler {
            count: 3,
            candidate: Some("left"),
            source: ScriptedRng::new(vec![2]),
        };
        let right = UniformSampler {
            count: 5,
            candidate: Some("right"),
            source: ScriptedRng::new(vec![0]),
        };
        // r = 2 < 3 keeps the left candidate
        let merged = left.merge(right).unwrap();
        assert_eq!(merged.count(), 8);
        assert_eq!(merged.candidate(), Some(&"left"));

        let left = UniformSampler {
            count: 3,
            candidate: Some("left"),
            source: ScriptedRng::new(vec![3]),
        };
        let right = UniformSampler {
            count: 5,
            candidate: Some("right"),
            source: ScriptedRng::new(vec![0]),
        };
        // r = 3 >= 3 takes the right candidate
        let merged = left.merge(right).unwrap();
        assert_eq!(merged.candidate(), Some(&"right"));
    }

    #[test]
    fn test_merge_with_empty() {
        for seed in 0..50 {
            let mut populated = sampler(seed);
            for i in 0..10 {
                populated.consume(i).unwrap();
            }
            let expected = populated.candidate().copied();

            let merged = populated.clone().merge(sampler(seed + 1000)).unwrap();
            assert_eq!(merged.count(), 10);
            assert_eq!(merged.candidate().copied(), expected);

            let merged = sampler(seed + 2000).merge(populated).unwrap();
            assert_eq!(merged.count(), 10);
            assert_eq!(merged.candidate().copied(), expected);
        }
    }

    #[test]
    fn test_merge_empty_into_empty() {
        let merged = UniformSampler::<u32, _>::new(FailingRng)
            .merge(UniformSampler::new(FailingRng))
            .unwrap();
        assert!(merged.is_empty());
        assert_eq!(merged.finish(), None);
    }

    #[test]
    fn test_failure_leaves_state_unchanged() {
        let mut s = UniformSampler::<u32, _>::new(FailingRng);
        let err = s.consume(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RandomSourceFailure);
        assert!(s.is_empty());
        assert_eq!(s.candidate(), None);
    }

    #[test]
    fn test_merge_failure_propagates() {
        let mut right = sampler(3);
        right.consume(1).unwrap();
        let left = UniformSampler {
            count: 0,
            candidate: None,
            source: FailingRng,
        };
        let right = UniformSampler {
            count: right.count,
            candidate: right.candidate,
            source: FailingRng,
        };
        let err = left.merge(right).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RandomSourceFailure);
    }

    #[test]
    fn test_uniformity() {
        let mut counts = [0usize; 10];
        let iterations = 20_000;

        for i in 0..iterations {
            let mut s = sampler(i as u64);
            for item in 0..10u32 {
                s.consume(item).unwrap();
            }
            counts[s.finish().unwrap() as usize] += 1;
        }

        let expected = iterations / 10;
        for (i, &count) in counts.iter().enumerate() {
            let deviation = (count as i64 - expected as i64).abs() as f64 / expected as f64;
            assert!(
                deviation < 0.1,
                "Item {} appeared {} times (expected ~{})",
                i,
                count,
                expected
            );
        }
    }

    #[test]
    fn test_selection_probability() {
        let mut s = sampler(9);
        for i in 0..4 {
            s.consume(i).unwrap();
        }
        assert!((s.selection_probability() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clear() {
        let mut s = sampler(5);
        for i in 0..10 {
            s.consume(i).unwrap();
        }
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.candidate(), None);
    }

    #[test]
    fn test_collector_streams_are_independent() {
        let collector = RandomValueCollector::<u32, Pcg64>::with_seed(42);
        let mut a = collector.create().unwrap().into_source();
        let mut b = collector.create().unwrap().into_source();
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_collector_reproducible() {
        let picks = |seed| {
            let collector = RandomValueCollector::<u32, Pcg64>::with_seed(seed);
            (0..20)
                .map(|_| collector.collect(0..100).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(7), picks(7));
    }
}
