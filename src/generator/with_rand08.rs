//! Integration with `rand` (v0.8) crate.

use std::sync::{Mutex, PoisonError};

use rand::RngCore;

use super::{Generator, RandSource, StdSystemTime};
use crate::window::TimeWindow;

/// An adapter that implements [`RandSource`] for [`RngCore`] types.
///
/// The wrapped RNG sits behind its own mutex, separate from the sequence lock of the generator.
#[derive(Debug, Default)]
pub struct Adapter<T>(Mutex<T>);

impl<T> Adapter<T> {
    /// Wraps `rng`.
    pub const fn new(rng: T) -> Self {
        Self(Mutex::new(rng))
    }

    /// Returns the wrapped RNG.
    pub fn into_inner(self) -> T {
        self.0.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: RngCore> RandSource for Adapter<T> {
    fn fill_bytes(&self, dest: &mut [u8]) {
        // a panic elsewhere cannot leave an RNG in a state unfit for drawing bytes
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fill_bytes(dest);
    }
}

impl<T: RngCore> Generator<Adapter<T>, StdSystemTime> {
    /// Creates a generator object with a specified random number generator that implements
    /// [`RngCore`] from `rand` (v0.8) crate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordinal_id::{Generator, TimeWindow};
    /// use rand_chacha::{rand_core::SeedableRng, ChaCha12Rng};
    ///
    /// let g = Generator::with_rand08(TimeWindow::default(), ChaCha12Rng::seed_from_u64(42));
    /// println!("{}", g.next_id()?);
    /// # Ok::<(), ordinal_id::Error>(())
    /// ```
    pub fn with_rand08(window: TimeWindow, rng: T) -> Self {
        Self::with_sources(window, Adapter::new(rng), StdSystemTime)
    }
}
