//! Fold/reduce drivers for accumulators
//!
//! These helpers drive any [`Collector`] through the classic fork-join
//! shape: one accumulator per partition, a local fold, then a merge tree.
//! They are conveniences; any harness that calls `create`, `consume`,
//! `merge` and `finish` in that shape gets the same results.

use crate::traits::{Accumulator, Collector, Error};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Consume every item into `acc`
pub fn fold<A, I>(mut acc: A, items: I) -> Result<A, Error>
where
    A: Accumulator,
    I: IntoIterator<Item = A::Item>,
{
    for item in items {
        acc.consume(item)?;
    }
    Ok(acc)
}

/// Merge partial states pairwise as a balanced binary tree
///
/// Returns `None` if there are no partials.
pub fn merge_all<A: Accumulator>(partials: Vec<A>) -> Result<Option<A>, Error> {
    let mut level = partials;
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut iter = level.into_iter();
        while let Some(left) = iter.next() {
            match iter.next() {
                Some(right) => next.push(left.merge(right)?),
                None => next.push(left),
            }
        }
        level = next;
    }
    Ok(level.pop())
}

/// Fold each partition into its own accumulator and merge the results
///
/// With no partitions the result is that of a fresh, empty accumulator.
pub fn collect_partitions<C, P, I>(collector: &C, partitions: P) -> Result<C::Output, Error>
where
    C: Collector,
    P: IntoIterator<Item = I>,
    I: IntoIterator<Item = C::Item>,
{
    let partials = partitions
        .into_iter()
        .map(|partition| fold(collector.create()?, partition))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(partitions = partials.len(), "merging partition accumulators");

    match merge_all(partials)? {
        Some(acc) => Ok(acc.finish()),
        None => Ok(collector.create()?.finish()),
    }
}

/// Fold a parallel iterator with rayon and reduce the partial states
///
/// Rayon decides the partitioning; each split gets a fresh accumulator from
/// `collector.create()`.
#[cfg(feature = "rayon")]
#[cfg_attr(docsrs, doc(cfg(feature = "rayon")))]
pub fn par_collect<C, I>(collector: &C, items: I) -> Result<C::Output, Error>
where
    C: Collector + Sync,
    C::Accumulator: Send,
    C::Item: Send,
    I: rayon::iter::IntoParallelIterator<Item = C::Item>,
{
    use rayon::iter::ParallelIterator;

    items
        .into_par_iter()
        .fold(
            || collector.create(),
            |acc, item| {
                let mut acc = acc?;
                acc.consume(item)?;
                Ok(acc)
            },
        )
        .reduce(|| collector.create(), |a, b| a?.merge(b?))
        .map(Accumulator::finish)
}
