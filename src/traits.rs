//! Core traits for mergeable accumulators
//!
//! Every accumulator implements [`Accumulator`]: it is created empty, fed
//! items with `consume`, combined with another partial state through `merge`,
//! and read once with `finish`. A [`Collector`] is the factory a fold harness
//! uses to create one fresh accumulator per partition.

#[cfg(feature = "std")]
use std::string::{String, ToString};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::string::{String, ToString};

/// Broad category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller passed a value the operation cannot accept
    InvalidArgument,
    /// The injected randomness provider failed; not recoverable
    RandomSourceFailure,
}

/// Errors returned by accumulator operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An absent element was offered to an accumulator
    #[error("element must not be absent")]
    AbsentElement,
    /// A top-k capacity of zero was requested
    #[error("capacity must be positive")]
    ZeroCapacity,
    /// A uniform draw was requested from an empty range
    #[error("cannot draw from an empty range")]
    EmptyRange,
    /// Two accumulators with different configurations were merged
    #[error("incompatible config: expected {expected}, found {found}")]
    IncompatibleConfig { expected: String, found: String },
    /// The random source reported a failure
    #[error("random source failure: {0}")]
    RandomSource(String),
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AbsentElement
            | Error::ZeroCapacity
            | Error::EmptyRange
            | Error::IncompatibleConfig { .. } => ErrorKind::InvalidArgument,
            Error::RandomSource(_) => ErrorKind::RandomSourceFailure,
        }
    }

    /// Wrap an error raised by a random number generator
    pub fn random_source(err: impl core::fmt::Display) -> Self {
        Error::RandomSource(err.to_string())
    }

    pub(crate) fn incompatible(expected: impl ToString, found: impl ToString) -> Self {
        Error::IncompatibleConfig {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// A partial aggregation state that can be folded and merged
///
/// Implementations must make `merge` associative and commutative with
/// respect to the result of `finish`: any partitioning of the input, folded
/// independently and merged in any tree shape, yields the same result (for
/// randomized accumulators, the same result distribution).
pub trait Accumulator: Sized {
    /// The type of item this accumulator consumes
    type Item;

    /// The value extracted by [`finish`](Accumulator::finish)
    type Output;

    /// Fold one item into the state
    ///
    /// On error the state is left exactly as it was before the call.
    fn consume(&mut self, item: Self::Item) -> Result<(), Error>;

    /// Combine two partial states into one
    ///
    /// Both inputs are consumed. Returns an error if the states are
    /// incompatible.
    fn merge(self, other: Self) -> Result<Self, Error>;

    /// Extract the final result
    fn finish(self) -> Self::Output;

    /// Number of items folded into this state, including merged-in ones
    fn count(&self) -> u64;

    /// Check if nothing was ever consumed
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Factory of fresh accumulators for a fold/reduce harness
pub trait Collector {
    /// The type of item the created accumulators consume
    type Item;

    /// The final result type
    type Output;

    /// The accumulator created for each partition
    type Accumulator: Accumulator<Item = Self::Item, Output = Self::Output>;

    /// Create an empty accumulator
    fn create(&self) -> Result<Self::Accumulator, Error>;

    /// Fold a whole sequence through a single accumulator
    fn collect<I>(&self, items: I) -> Result<Self::Output, Error>
    where
        I: IntoIterator<Item = Self::Item>,
    {
        let mut acc = self.create()?;
        for item in items {
            acc.consume(item)?;
        }
        Ok(acc.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::AbsentElement.kind(), ErrorKind::InvalidArgument);
        assert_eq!(Error::ZeroCapacity.kind(), ErrorKind::InvalidArgument);
        assert_eq!(Error::EmptyRange.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            Error::incompatible("capacity=3", "capacity=4").kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            Error::random_source("entropy exhausted").kind(),
            ErrorKind::RandomSourceFailure
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::incompatible("capacity=3", "capacity=4");
        assert_eq!(
            err.to_string(),
            "incompatible config: expected capacity=3, found capacity=4"
        );
        assert_eq!(
            Error::random_source("boom").to_string(),
            "random source failure: boom"
        );
    }
}
