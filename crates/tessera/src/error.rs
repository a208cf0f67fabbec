/// A result type defaulting to the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `tessera` can emit.
///
/// Every error is returned at the point of detection. Nothing in the crate
/// substitutes a default for an invalid input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A field value does not fit in the field's bit width.
    ///
    /// Raised before any bit is written, so no partially packed id ever
    /// escapes. Recoverable by supplying a corrected value.
    #[error("the '{field}' value {value} is out of range (it must fit in {bits} bits)")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// Width of the field in bits.
        bits: u8,
    },

    /// The clock reports a time earlier than the last issued timestamp of a
    /// [`MonotonicGenerator`].
    ///
    /// This is an environment fault (NTP step, VM migration) and is never
    /// retried by the generator itself.
    ///
    /// [`MonotonicGenerator`]: crate::MonotonicGenerator
    #[error("clock moved backwards, refusing to generate ids for {behind} time units")]
    ClockRollback {
        /// Magnitude of the rollback, in the layout's time unit.
        behind: u64,
    },

    /// The input is not a well-formed signed 64-bit decimal literal.
    #[error("'{input}' is not a valid id string")]
    Format {
        /// The rejected input.
        input: String,
    },

    /// A value was supplied for a field the layout does not define.
    #[error("the layout has no field named '{name}'")]
    UnknownField {
        /// The unrecognised field name.
        name: String,
    },

    /// A layout field was left without a value.
    #[error("no value supplied for field '{name}'")]
    MissingField {
        /// The field without a value.
        name: &'static str,
    },

    /// A layout definition violates a layout invariant.
    #[error("invalid layout: {reason}")]
    InvalidLayout {
        /// What is wrong with the definition.
        reason: String,
    },

    /// The time source reports a time earlier than the clock's epoch.
    #[error("current time is {behind_ms} ms before the configured epoch")]
    BeforeEpoch {
        /// Distance to the epoch in milliseconds.
        behind_ms: u64,
    },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_names_field_value_and_width() {
        let err = Error::OutOfRange {
            field: "sequence",
            value: 4096,
            bits: 12,
        };
        assert_eq!(
            err.to_string(),
            "the 'sequence' value 4096 is out of range (it must fit in 12 bits)"
        );
    }

    #[test]
    fn clock_rollback_reports_magnitude() {
        let err = Error::ClockRollback { behind: 7 };
        assert!(err.to_string().contains("7 time units"));
    }
}
