use crate::{Error, Result, TimeSource, TimeUnit};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Custom epoch: Sunday, January 1, 2017 00:00:00 UTC
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(1_483_228_800_000);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// A [`TimeSource`] backed by [`SystemTime::now`].
///
/// This is a wall clock. It follows NTP corrections and manual adjustments,
/// which is exactly what lets the [`MonotonicGenerator`] notice a rollback.
/// A system time before 1970 reads as zero.
///
/// [`MonotonicGenerator`]: crate::MonotonicGenerator
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}

/// Converts between wall-clock time and timestamp fields counted from a
/// custom epoch.
///
/// One clock is meant to be built at startup and cloned into every generator.
/// It carries no unit of its own: the unit belongs to the layout, so the same
/// clock can serve a seconds layout and a milliseconds layout side by side.
///
/// # Example
///
/// ```
/// use tessera::{EpochClock, TimeSource, TimeUnit, CUSTOM_EPOCH};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_483_228_800_000 + 5_250
///     }
/// }
///
/// let clock = EpochClock::with_source(CUSTOM_EPOCH, FixedTime);
/// assert_eq!(clock.now(TimeUnit::Milliseconds).unwrap(), 5_250);
/// assert_eq!(clock.now(TimeUnit::Seconds).unwrap(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct EpochClock<T = SystemClock> {
    epoch_ms: u64,
    source: T,
}

impl Default for EpochClock {
    /// A system clock anchored at [`CUSTOM_EPOCH`].
    fn default() -> Self {
        Self::new(CUSTOM_EPOCH)
    }
}

impl EpochClock {
    /// Creates a system clock anchored at `epoch`, given as a duration since
    /// 1970-01-01 UTC.
    pub fn new(epoch: Duration) -> Self {
        Self::with_source(epoch, SystemClock)
    }
}

impl<T: TimeSource> EpochClock<T> {
    /// Creates a clock anchored at `epoch` that reads time from `source`.
    pub fn with_source(epoch: Duration, source: T) -> Self {
        Self {
            epoch_ms: epoch.as_millis() as u64,
            source,
        }
    }

    /// The epoch as a duration since the Unix epoch.
    pub fn epoch(&self) -> Duration {
        Duration::from_millis(self.epoch_ms)
    }

    /// The underlying time source.
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Reads the time source and returns elapsed `unit`s since the epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BeforeEpoch`] if the source reports a time earlier
    /// than the epoch.
    pub fn now(&self, unit: TimeUnit) -> Result<u64> {
        self.ticks_from_unix_millis(self.source.current_millis(), unit)
    }

    /// Converts a wall-clock instant to elapsed `unit`s since the epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BeforeEpoch`] if `at` precedes the epoch.
    pub fn ticks_at(&self, at: SystemTime, unit: TimeUnit) -> Result<u64> {
        let unix_ms = match at.duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as u64,
            Err(before) => {
                let behind = before.duration().as_millis() as u64;
                return Err(Error::BeforeEpoch {
                    behind_ms: behind.saturating_add(self.epoch_ms),
                });
            }
        };
        self.ticks_from_unix_millis(unix_ms, unit)
    }

    /// Converts a timestamp field back to the wall-clock instant it encodes.
    pub fn to_system_time(&self, ticks: u64, unit: TimeUnit) -> SystemTime {
        let millis = self.epoch_ms.saturating_add(unit.to_millis(ticks));
        UNIX_EPOCH + Duration::from_millis(millis)
    }

    fn ticks_from_unix_millis(&self, unix_ms: u64, unit: TimeUnit) -> Result<u64> {
        let elapsed = unix_ms
            .checked_sub(self.epoch_ms)
            .ok_or_else(|| Error::BeforeEpoch {
                behind_ms: self.epoch_ms - unix_ms,
            })?;
        Ok(unit.from_millis(elapsed))
    }
}
