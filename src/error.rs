//! Error types.

use std::sync::{MutexGuard, PoisonError};
use std::time::SystemTime;

/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All errors that generating or encoding an [`OrdinalId`](crate::OrdinalId) can produce.
///
/// A timestamp outside the configured window is deliberately *not* an error; see
/// [`Issued::sequence`](crate::Issued::sequence).
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The window end is not later than its start.
    #[error("window end must be later than its start (start: {start:?}, end: {end:?})")]
    InvalidWindow {
        /// Requested start of the window.
        start: SystemTime,
        /// Requested end of the window.
        end: SystemTime,
    },

    /// The sequence does not fit in the 48-bit suffix field.
    ///
    /// Returned instead of wrapping around, since a wrapped suffix would sort before every
    /// previously issued identifier.
    #[error("sequence {sequence} is outside the 48-bit encodable range")]
    SequenceOverflow {
        /// The sequence that could not be encoded.
        sequence: i64,
    },

    /// A thread panicked while holding the sequence lock.
    #[error("sequence lock poisoned")]
    LockPoisoned,
}

impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

/// Error parsing an invalid string representation of [`OrdinalId`](crate::OrdinalId).
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
#[error("invalid string representation")]
pub struct ParseError {}
