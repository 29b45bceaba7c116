//! Time windows and the mapping from timestamps to sequence numbers.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};
use crate::id::SEQUENCE_BYTES;

/// Number of distinct sequence values a window is divided into (256^6 = 2^48).
pub const MAX_PERMUTATIONS: i64 = 1 << (8 * SEQUENCE_BYTES);

/// Start of the default window, 2011-10-15T00:00:00Z, in seconds since the Unix epoch.
pub const DEFAULT_START_SECS: u64 = 1_318_636_800;

/// End of the default window, 2100-01-01T00:00:00Z, in seconds since the Unix epoch.
pub const DEFAULT_END_SECS: u64 = 4_102_444_800;

/// Represents the interval over which timestamps map onto the 48-bit sequence space.
///
/// The window is split into [`MAX_PERMUTATIONS`] equal slices. A timestamp in slice `n`
/// becomes the sequence candidate `n - 1`; the first identifier of a fresh generator is then
/// bumped to sequence `0`.
///
/// # Examples
///
/// ```rust
/// use std::time::{Duration, UNIX_EPOCH};
/// use ordinal_id::TimeWindow;
///
/// let start = UNIX_EPOCH + Duration::from_secs(1_577_836_800); // 2020-01-01
/// let window = TimeWindow::new(start, start + Duration::from_secs(86_400))?;
/// assert_eq!(window.total_period(), Duration::from_secs(86_400));
/// assert_eq!(window.map_to_sequence(start), Some(-1));
/// assert_eq!(window.map_to_sequence(start - Duration::from_secs(1)), None);
/// # Ok::<(), ordinal_id::Error>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawWindow"))]
pub struct TimeWindow {
    start: SystemTime,
    end: SystemTime,
}

impl TimeWindow {
    /// Creates a window spanning `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWindow`] unless `end` is strictly later than `start`.
    pub fn new(start: SystemTime, end: SystemTime) -> Result<Self> {
        if end <= start {
            return Err(Error::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the start of the window.
    pub const fn start(&self) -> SystemTime {
        self.start
    }

    /// Returns the end of the window.
    pub const fn end(&self) -> SystemTime {
        self.end
    }

    /// Returns `end - start`.
    pub fn total_period(&self) -> Duration {
        self.end
            .duration_since(self.start)
            .unwrap_or(Duration::ZERO)
    }

    /// Returns the wall-clock time covered by one sequence increment, in seconds.
    ///
    /// Expressed as `f64` because realistic windows give sub-nanosecond slices.
    pub fn time_per_sequence(&self) -> f64 {
        self.total_period().as_secs_f64() / MAX_PERMUTATIONS as f64
    }

    /// Returns whether `at` lies within `start..=end`.
    pub fn contains(&self, at: SystemTime) -> bool {
        self.start <= at && at <= self.end
    }

    /// Maps a timestamp to a sequence candidate, or returns `None` if it is outside the window.
    ///
    /// Computes `floor(elapsed / total * MAX_PERMUTATIONS) - 1` in exact integer nanoseconds.
    /// The result ranges from `-1` at `start` to `MAX_PERMUTATIONS - 1` at `end`.
    pub fn map_to_sequence(&self, at: SystemTime) -> Option<i64> {
        if !self.contains(at) {
            return None;
        }

        let elapsed = at.duration_since(self.start).ok()?.as_nanos();
        let total = self.total_period().as_nanos();
        let slice = match elapsed.checked_mul(MAX_PERMUTATIONS as u128) {
            Some(scaled) => scaled / total,
            // only reachable for windows longer than 2^80 ns (tens of millions of years)
            None => (elapsed as f64 / total as f64 * MAX_PERMUTATIONS as f64) as u128,
        };
        Some(slice as i64 - 1)
    }
}

impl Default for TimeWindow {
    /// Returns the window from 2011-10-15 to 2100-01-01 (UTC).
    fn default() -> Self {
        Self {
            start: UNIX_EPOCH + Duration::from_secs(DEFAULT_START_SECS),
            end: UNIX_EPOCH + Duration::from_secs(DEFAULT_END_SECS),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawWindow {
    start: SystemTime,
    end: SystemTime,
}

#[cfg(feature = "serde")]
impl TryFrom<RawWindow> for TimeWindow {
    type Error = Error;

    fn try_from(src: RawWindow) -> Result<Self> {
        Self::new(src.start, src.end)
    }
}
