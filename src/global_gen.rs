//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use tracing::debug;

use crate::error::Result;
use crate::{Generator, OrdinalId};

/// Returns the process-wide generator over [`TimeWindow::default`], creating one if none exists.
///
/// Initialization runs exactly once; concurrent first callers all observe the same instance.
///
/// [`TimeWindow::default`]: crate::TimeWindow::default
pub fn global() -> &'static Generator {
    static G: sync::OnceLock<Generator> = sync::OnceLock::new();
    G.get_or_init(|| {
        debug!("initializing global ordinal id generator");
        Generator::default()
    })
}

/// Generates an ordinal identifier for the current time.
///
/// This function employs the global generator and guarantees the process-wide increasing order
/// of the sequences it issues.
///
/// # Examples
///
/// ```rust
/// let id = ordinal_id::ordinal_id()?;
/// println!("{}", id); // e.g., "5d6e0a3c-91f4-2b7e-c3a8-0ea24f1b9c37"
/// println!("{:?}", id.as_bytes()); // as 16-byte array
///
/// let id_string: String = ordinal_id::ordinal_id()?.to_string();
/// # Ok::<(), ordinal_id::Error>(())
/// ```
pub fn ordinal_id() -> Result<OrdinalId> {
    global().next_id()
}

/// Generates a fully random identifier with the global generator's entropy source.
///
/// # Examples
///
/// ```rust
/// let id = ordinal_id::random_id();
/// println!("{}", id); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// ```
pub fn random_id() -> OrdinalId {
    global().random_id()
}

#[cfg(test)]
mod tests {
    use super::{global, ordinal_id, random_id};
    use crate::Generator;

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| ordinal_id().unwrap().into()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
        assert!(re.is_match(&random_id().to_string()));
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Generates sortable sequence group by creation time
    #[test]
    fn generates_sortable_sequence_group_by_creation_time() {
        SAMPLES.with(|samples| {
            for i in 1..N_SAMPLES {
                assert!(samples[i - 1][24..] < samples[i][24..]);
            }
        });
    }

    /// Encodes up-to-date sequence
    #[test]
    fn encodes_up_to_date_sequence() {
        use std::time::SystemTime;
        let w = global().window();
        for _ in 0..10_000 {
            let before = w.map_to_sequence(SystemTime::now()).unwrap();
            let e = ordinal_id().unwrap().sequence();
            // other tests share the global generator and may push it ahead of the clock
            assert!(before <= e);
        }
    }

    /// Returns the same instance to every thread
    #[test]
    fn returns_the_same_instance_to_every_thread() {
        use std::thread;

        let addrs: Vec<usize> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| global() as *const Generator as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(addrs.iter().all(|&e| e == global() as *const Generator as usize));
    }

    /// Generates no IDs sharing same sequence under multithreading
    #[test]
    fn generates_no_ids_sharing_same_sequence_under_multithreading(
    ) -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        tx.send(ordinal_id().unwrap()).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert(e.sequence());
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }
}
