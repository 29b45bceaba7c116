//! Lock-protected counter that keeps issued sequences strictly increasing.

use std::sync::Mutex;

use tracing::{error, trace};

use crate::error::{Error, Result};
use crate::id::MAX_SEQUENCE;

/// Holds the last sequence issued by one generator and hands out strictly increasing successors.
///
/// A candidate that does not exceed the last issued value is bumped to `last + 1`; any larger
/// candidate is issued as is. Calls from any number of threads serialize on a single mutex, and
/// the critical section is a compare, an add and a store.
///
/// # Examples
///
/// ```rust
/// use ordinal_id::MonotonicGuard;
///
/// let guard = MonotonicGuard::new();
/// assert_eq!(guard.advance(0)?, 0);
/// assert_eq!(guard.advance(0)?, 1);
/// assert_eq!(guard.advance(10)?, 10);
/// assert_eq!(guard.advance(4)?, 11);
/// # Ok::<(), ordinal_id::Error>(())
/// ```
#[derive(Debug)]
pub struct MonotonicGuard {
    last: Mutex<i64>,
}

impl MonotonicGuard {
    /// Value held before anything has been issued; every valid sequence is larger.
    const UNSET: i64 = -1;

    /// Creates a guard that has issued nothing yet.
    pub const fn new() -> Self {
        Self {
            last: Mutex::new(Self::UNSET),
        }
    }

    /// Issues `candidate`, or `last + 1` if `candidate` would not increase the sequence.
    ///
    /// # Errors
    ///
    /// - [`Error::SequenceOverflow`] if the value to issue exceeds the 48-bit suffix range. The
    ///   guard keeps its previous state, so later calls keep failing rather than wrapping.
    /// - [`Error::LockPoisoned`] if another thread panicked while holding the lock.
    pub fn advance(&self, candidate: i64) -> Result<i64> {
        let mut last = self.last.lock()?;
        let issued = if candidate <= *last {
            trace!(candidate, last = *last, "bumping non-increasing candidate");
            *last + 1
        } else {
            candidate
        };

        if issued > MAX_SEQUENCE {
            error!(sequence = issued, "sequence space exhausted");
            return Err(Error::SequenceOverflow { sequence: issued });
        }

        *last = issued;
        Ok(issued)
    }

    /// Returns the last issued sequence, or `None` if nothing has been issued.
    pub fn last(&self) -> Result<Option<i64>> {
        let last = *self.last.lock()?;
        Ok((last != Self::UNSET).then_some(last))
    }
}

impl Default for MonotonicGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::MonotonicGuard;
    use crate::id::MAX_SEQUENCE;
    use crate::Error;

    /// Bumps a repeated zero candidate to one
    #[test]
    fn bumps_a_repeated_zero_candidate_to_one() {
        let g = MonotonicGuard::new();
        assert_eq!(g.last(), Ok(None));
        assert_eq!(g.advance(0), Ok(0));
        assert_eq!(g.advance(0), Ok(1));
        assert_eq!(g.last(), Ok(Some(1)));
    }

    /// Issues zero for the candidate at the window start
    #[test]
    fn issues_zero_for_the_candidate_at_the_window_start() {
        let g = MonotonicGuard::new();
        assert_eq!(g.advance(-1), Ok(0));
        assert_eq!(g.advance(-1), Ok(1));
    }

    /// Issues increasing values even with decreasing or constant candidates
    #[test]
    fn issues_increasing_values_even_with_decreasing_or_constant_candidates() {
        let g = MonotonicGuard::new();
        let base = 0x0123_4567_89ab_i64;
        let mut prev = g.advance(base).unwrap();
        assert_eq!(prev, base);
        for i in 0..100_000i64 {
            let curr = g.advance(base - i.min(4_000)).unwrap();
            assert_eq!(curr, prev + 1);
            prev = curr;
        }
    }

    /// Jumps forward to larger candidates
    #[test]
    fn jumps_forward_to_larger_candidates() {
        let g = MonotonicGuard::new();
        assert_eq!(g.advance(5), Ok(5));
        assert_eq!(g.advance(1_000), Ok(1_000));
        assert_eq!(g.advance(999), Ok(1_001));
        assert_eq!(g.advance(2_000), Ok(2_000));
    }

    /// Refuses to issue beyond the 48-bit range without moving
    #[test]
    fn refuses_to_issue_beyond_the_48_bit_range_without_moving() {
        let g = MonotonicGuard::new();
        assert_eq!(g.advance(MAX_SEQUENCE), Ok(MAX_SEQUENCE));
        assert_eq!(
            g.advance(0),
            Err(Error::SequenceOverflow {
                sequence: MAX_SEQUENCE + 1
            })
        );
        assert_eq!(g.last(), Ok(Some(MAX_SEQUENCE)));

        let g = MonotonicGuard::new();
        assert!(g.advance(MAX_SEQUENCE + 1).is_err());
        assert_eq!(g.last(), Ok(None));
    }

    /// Issues no duplicates under multithreading
    #[test]
    fn issues_no_duplicates_under_multithreading() {
        use std::{collections::HashSet, sync::mpsc, thread};

        let g = MonotonicGuard::new();
        let (tx, rx) = mpsc::channel();
        thread::scope(|s| {
            for _ in 0..4 {
                let tx = tx.clone();
                let g = &g;
                s.spawn(move || {
                    let mut prev = -1;
                    for _ in 0..10_000 {
                        let curr = g.advance(0).unwrap();
                        assert!(prev < curr);
                        prev = curr;
                        tx.send(curr).unwrap();
                    }
                });
            }
        });
        drop(tx);

        let s: HashSet<i64> = rx.iter().collect();
        assert_eq!(s.len(), 4 * 10_000);
        assert_eq!(s.iter().max(), Some(&(4 * 10_000 - 1)));
    }
}
