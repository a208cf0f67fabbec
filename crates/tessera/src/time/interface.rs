use std::sync::Arc;

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the system clock or a mocked time
/// source in tests. The unit is **milliseconds since the Unix epoch**; the
/// custom epoch of an id layout is applied by [`EpochClock`].
///
/// Unlike a monotonic timer, a wall-clock source may step backwards. The
/// [`MonotonicGenerator`] detects that and refuses to issue ids.
///
/// # Example
///
/// ```
/// use tessera::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
///
/// [`EpochClock`]: crate::EpochClock
/// [`MonotonicGenerator`]: crate::MonotonicGenerator
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

/// The unit a timestamp field counts in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    /// Number of milliseconds in one unit.
    pub const fn millis_per_unit(self) -> u64 {
        match self {
            Self::Seconds => 1_000,
            Self::Milliseconds => 1,
        }
    }

    /// Converts milliseconds to whole units, rounding down.
    pub const fn from_millis(self, millis: u64) -> u64 {
        millis / self.millis_per_unit()
    }

    /// Converts units to milliseconds, saturating at `u64::MAX`.
    pub const fn to_millis(self, ticks: u64) -> u64 {
        ticks.saturating_mul(self.millis_per_unit())
    }
}
