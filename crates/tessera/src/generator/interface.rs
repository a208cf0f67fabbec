use crate::{Result, StructuredId};

/// A minimal interface over both generation strategies.
///
/// Implemented by [`FreeRunningGenerator`] (with no overrides) and
/// [`MonotonicGenerator`], so callers can pick a strategy at runtime.
///
/// [`FreeRunningGenerator`]: crate::FreeRunningGenerator
/// [`MonotonicGenerator`]: crate::MonotonicGenerator
pub trait IdGenerator {
    /// Returns the next id.
    fn next_id(&self) -> Result<StructuredId>;
}
