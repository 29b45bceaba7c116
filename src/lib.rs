//! Time-ordered 128-bit identifiers built from a random prefix and a 48-bit sequence
//!
//! ```rust
//! let id = ordinal_id::ordinal_id()?;
//! println!("{}", id); // e.g., "5d6e0a3c-91f4-2b7e-c3a8-0ea24f1b9c37"
//! println!("{:?}", id.as_bytes()); // as 16-byte array
//! println!("{}", id.sequence()); // position of this id within the window
//! # Ok::<(), ordinal_id::Error>(())
//! ```
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            prefix                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            prefix                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |            prefix             |           sequence            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           sequence                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 80-bit `prefix` field is filled from a random number generator. It is what keeps
//!   identifiers from different processes apart; there is no coordination between processes.
//! - The 48-bit `sequence` field is big-endian. A [`TimeWindow`] (by default 2011-10-15 to
//!   2100-01-01) is cut into 2^48 equal slices, and the slice the current time falls into,
//!   minus one, is the sequence candidate.
//!
//! Each [`Generator`] keeps the last sequence it issued behind a lock. A candidate that does not
//! exceed it is bumped to `last + 1`, so sequences from one generator strictly increase even
//! when calls outpace the slice width (about 10 µs for the default window) or the clock steps
//! back. When the bumped sequence would leave the 48-bit range, generation fails with
//! [`Error::SequenceOverflow`] instead of wrapping around.
//!
//! Timestamps outside the window do not fail either: the generator returns a fully random
//! identifier and reports it through [`Issued::sequence`] being `None`.
//!
//! The identifiers are not suitable where unpredictability is a security requirement.
//!
//! # Crate features
//!
//! - `global_gen` (default): the process-wide generator behind [`ordinal_id()`] and
//!   [`random_id()`].
//! - `serde`: `Serialize`/`Deserialize` for [`OrdinalId`], and validated deserialization of
//!   [`TimeWindow`].
//! - `uuid`: conversions from and to `uuid::Uuid`.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::{Error, ParseError, Result};

mod id;
pub use id::{OrdinalId, MAX_SEQUENCE, PREFIX_BYTES, SEQUENCE_BYTES};

pub mod window;
pub use window::{TimeWindow, MAX_PERMUTATIONS};

mod guard;
pub use guard::MonotonicGuard;

pub mod generator;
pub use generator::{Generator, Issued, RandSource, StdSystemTime, ThreadRandom, TimeSource};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{global, ordinal_id, random_id};
