use std::sync::{Arc, OnceLock};

use portable_atomic::{AtomicU64, Ordering};

use crate::{RandSource, ThreadRandom};

/// The shared counter behind every [`FreeRunningGenerator`].
///
/// Starts at a seed and is advanced by one atomic fetch-and-add per call, no
/// matter which generator or layout is asking. Each caller masks the result
/// to its own sequence width, so the raw value is free to wrap around.
///
/// Use [`FreeCounter::process`] for the process-wide instance, or build one
/// from a fixed seed for deterministic tests.
///
/// [`FreeRunningGenerator`]: crate::FreeRunningGenerator
#[derive(Debug)]
pub struct FreeCounter {
    #[cfg(feature = "cache-padded")]
    value: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    value: AtomicU64,
}

impl FreeCounter {
    /// Creates a counter whose first [`FreeCounter::advance`] is `seed + 1`.
    pub fn new(seed: u64) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            value: crossbeam_utils::CachePadded::new(AtomicU64::new(seed)),
            #[cfg(not(feature = "cache-padded"))]
            value: AtomicU64::new(seed),
        }
    }

    /// Creates a counter seeded from `rand`.
    pub fn from_rand<R: RandSource>(rand: &R) -> Self {
        Self::new(rand.rand())
    }

    /// Creates a counter with a random seed from [`ThreadRandom`].
    pub fn random() -> Self {
        Self::from_rand(&ThreadRandom)
    }

    /// The process-wide counter, randomly seeded on first use.
    pub fn process() -> Arc<Self> {
        static PROCESS: OnceLock<Arc<FreeCounter>> = OnceLock::new();
        Arc::clone(PROCESS.get_or_init(|| Arc::new(Self::random())))
    }

    /// Advances the counter and returns the new value.
    pub fn advance(&self) -> u64 {
        self.value.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// The last value handed out, or the seed.
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}
