//! Ordinal identifier generator and related types.

use std::time::{Duration, SystemTime};

use rand::RngCore;
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::guard::MonotonicGuard;
use crate::id::{OrdinalId, PREFIX_BYTES};
use crate::window::TimeWindow;

pub mod with_rand08;

/// A trait for the entropy source that fills identifier prefixes.
///
/// Takes `&self` so that one generator can be shared across threads; implementations that wrap
/// a stateful RNG provide their own interior mutability (see [`with_rand08::Adapter`]).
pub trait RandSource {
    /// Fills `dest` with random data.
    fn fill_bytes(&self, dest: &mut [u8]);
}

/// A [`RandSource`] that reads the calling thread's `rand::thread_rng()`.
///
/// The thread-local RNG is ChaCha-based and periodically reseeded, which is more than this crate
/// needs: prefixes only have to be unpredictable enough to avoid collisions between processes,
/// not to resist an attacker. The type stores nothing, so it is `Send + Sync` and contention-free.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        rand::thread_rng().fill_bytes(dest);
    }
}

/// A trait for the clock a generator reads when no timestamp is given.
pub trait TimeSource {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// A [`TimeSource`] backed by [`SystemTime::now`].
#[derive(Default, Clone, Copy, Debug)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// The outcome of one generation call: the identifier plus the sequence it carries, if any.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Issued {
    /// The generated identifier.
    pub id: OrdinalId,

    /// The sequence encoded in the suffix of `id`.
    ///
    /// `None` means the timestamp fell outside the window and `id` is fully random: it does not
    /// sort relative to any other identifier from the same generator.
    pub sequence: Option<i64>,
}

impl Issued {
    /// Returns `true` if the identifier carries a time-ordered sequence.
    pub const fn is_ordered(&self) -> bool {
        self.sequence.is_some()
    }
}

/// Represents an ordinal identifier generator that maps timestamps in a [`TimeWindow`] onto a
/// 48-bit sequence and guarantees that sequences issued by one instance strictly increase.
///
/// Every identifier is 10 bytes from the [`RandSource`] followed by the 6-byte big-endian
/// sequence. Identifiers compare by their random prefix first, so it is the *sequence*, not the
/// byte order of whole identifiers, that reflects issue order.
///
/// # Generator functions
///
/// | Method                     | Sequence from                   | Outside the window     |
/// | -------------------------- | ------------------------------- | ---------------------- |
/// | [`next_id`]                | current time                    | random identifier      |
/// | [`next_id_at`]             | given timestamp                 | random identifier      |
/// | [`issue`] / [`issue_at`]   | as above, reporting the outcome | `sequence: None`       |
/// | [`next_id_for_sequence`]   | given sequence                  | n/a                    |
/// | [`random_id`]              | none                            | n/a                    |
///
/// All sequenced paths go through a [`MonotonicGuard`], so a candidate that does not exceed the
/// previous one is bumped to `previous + 1`. Sustained call rates above one identifier per
/// [`time_per_sequence`] therefore run ahead of the clock rather than repeating a value.
///
/// # Examples
///
/// ```rust
/// use ordinal_id::{Generator, TimeWindow};
/// use std::{sync, thread};
///
/// let g = sync::Arc::new(Generator::new(TimeWindow::default()));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.next_id().unwrap(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
///
/// [`next_id`]: Generator::next_id
/// [`next_id_at`]: Generator::next_id_at
/// [`issue`]: Generator::issue
/// [`issue_at`]: Generator::issue_at
/// [`next_id_for_sequence`]: Generator::next_id_for_sequence
/// [`random_id`]: Generator::random_id
/// [`time_per_sequence`]: Generator::time_per_sequence
#[derive(Debug)]
pub struct Generator<R = ThreadRandom, T = StdSystemTime> {
    window: TimeWindow,
    guard: MonotonicGuard,

    /// The random number generator used by the generator.
    rand: R,

    /// The clock read by the time-driven methods.
    time: T,
}

impl Generator {
    /// Creates a generator over `window` using [`ThreadRandom`] and the system clock.
    pub fn new(window: TimeWindow) -> Self {
        Self::with_sources(window, ThreadRandom, StdSystemTime)
    }
}

impl Default for Generator {
    /// Creates a generator over [`TimeWindow::default`].
    fn default() -> Self {
        Self::new(TimeWindow::default())
    }
}

impl<R: RandSource, T: TimeSource> Generator<R, T> {
    /// Creates a generator with a custom entropy source and clock.
    pub fn with_sources(window: TimeWindow, rand: R, time: T) -> Self {
        debug!(?window, "creating ordinal id generator");
        Self {
            window,
            guard: MonotonicGuard::new(),
            rand,
            time,
        }
    }

    /// Returns the configured window.
    pub const fn window(&self) -> &TimeWindow {
        &self.window
    }

    /// Returns the length of the configured window.
    pub fn total_period(&self) -> Duration {
        self.window.total_period()
    }

    /// Returns the time covered by one sequence increment, in seconds.
    pub fn time_per_sequence(&self) -> f64 {
        self.window.time_per_sequence()
    }

    /// Returns the last sequence this generator issued, or `None` before the first one.
    pub fn last_sequence(&self) -> Result<Option<i64>> {
        self.guard.last()
    }

    /// Generates an identifier for the current time.
    ///
    /// See [`Generator::issue_at`] for the errors and the out-of-window behavior.
    pub fn next_id(&self) -> Result<OrdinalId> {
        self.issue().map(|e| e.id)
    }

    /// Generates an identifier for `at`.
    ///
    /// See [`Generator::issue_at`] for the errors and the out-of-window behavior.
    pub fn next_id_at(&self, at: SystemTime) -> Result<OrdinalId> {
        self.issue_at(at).map(|e| e.id)
    }

    /// Generates an identifier for the current time, reporting whether it is sequenced.
    pub fn issue(&self) -> Result<Issued> {
        self.issue_at(self.time.now())
    }

    /// Generates an identifier for `at`, reporting whether it is sequenced.
    ///
    /// A timestamp outside the window does not fail: the identifier is fully random, the guard
    /// is left untouched and [`Issued::sequence`] is `None`.
    ///
    /// # Errors
    ///
    /// - [`Error::SequenceOverflow`] if the guard has run past the last sequence of the window.
    /// - [`Error::LockPoisoned`] if another thread panicked while holding the guard.
    ///
    /// [`Error::SequenceOverflow`]: crate::Error::SequenceOverflow
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    #[instrument(level = "trace", skip(self))]
    pub fn issue_at(&self, at: SystemTime) -> Result<Issued> {
        let Some(candidate) = self.window.map_to_sequence(at) else {
            warn!(?at, window = ?self.window, "timestamp outside window; issuing random id");
            return Ok(Issued {
                id: self.random_id(),
                sequence: None,
            });
        };

        let sequence = self.guard.advance(candidate)?;
        Ok(Issued {
            id: self.encode(sequence)?,
            sequence: Some(sequence),
        })
    }

    /// Generates an identifier for a precomputed sequence, skipping the time mapping.
    ///
    /// The sequence still passes through the guard, so calling this twice with `0` on a fresh
    /// generator yields sequences `0` and `1`.
    ///
    /// # Errors
    ///
    /// Same as [`Generator::issue_at`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// let g = ordinal_id::Generator::default();
    /// assert_eq!(g.next_id_for_sequence(0)?.sequence(), 0);
    /// assert_eq!(g.next_id_for_sequence(0)?.sequence(), 1);
    /// # Ok::<(), ordinal_id::Error>(())
    /// ```
    #[instrument(level = "trace", skip(self))]
    pub fn next_id_for_sequence(&self, sequence: i64) -> Result<OrdinalId> {
        let sequence = self.guard.advance(sequence)?;
        self.encode(sequence)
    }

    /// Generates a fully random identifier without touching the sequence.
    pub fn random_id(&self) -> OrdinalId {
        let mut bytes = [0u8; 16];
        self.rand.fill_bytes(&mut bytes);
        OrdinalId::from(bytes)
    }

    /// Returns an infinite iterator that yields [`Generator::next_id`] for each call of `next()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let g = ordinal_id::Generator::default();
    /// for (i, e) in g.iter().enumerate().skip(4).take(4) {
    ///     println!("[{}] {}", i, e?);
    /// }
    /// # Ok::<(), ordinal_id::Error>(())
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = Result<OrdinalId>> + '_ {
        std::iter::repeat_with(move || self.next_id())
    }

    fn encode(&self, sequence: i64) -> Result<OrdinalId> {
        let mut prefix = [0u8; PREFIX_BYTES];
        self.rand.fill_bytes(&mut prefix);
        OrdinalId::from_parts(prefix, sequence)
    }
}
