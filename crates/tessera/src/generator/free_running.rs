use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    EpochClock, Error, FieldValues, FreeCounter, IdGenerator, Layout, Overrides, PRECISION,
    Result, SEQUENCE, StructuredId, SystemClock, TIMESTAMP, TimeSource,
};

/// A generator that pairs the current time with a shared atomic counter.
///
/// Never blocks and never takes a lock: the only shared state is one
/// [`FreeCounter`], advanced by a single fetch-and-add per call. Two calls
/// never observe the same counter value, but ids are not ordered within a
/// time unit and can repeat once the masked counter wraps inside one unit.
/// Use [`MonotonicGenerator`] when strict ordering matters.
///
/// ## Recommended When
/// - Ids only need to be unique with high probability
/// - Callers want to pin some fields (timestamp, origin) explicitly
///
/// # Example
///
/// ```
/// use tessera::{EpochClock, FreeRunningGenerator, Layout, Overrides};
///
/// let generator = FreeRunningGenerator::new(Layout::regional(), EpochClock::default());
/// let id = generator
///     .generate_with(&Overrides::new().region(2).machine(9))
///     .unwrap();
///
/// let fields = Layout::regional().unpack(id);
/// assert_eq!(fields.get("region"), Some(2));
/// assert_eq!(fields.get("machine"), Some(9));
/// ```
///
/// [`MonotonicGenerator`]: crate::MonotonicGenerator
#[derive(Clone, Debug)]
pub struct FreeRunningGenerator<T = SystemClock> {
    layout: Layout,
    clock: EpochClock<T>,
    counter: Arc<FreeCounter>,
}

impl FreeRunningGenerator {
    /// Creates a generator backed by the process-wide [`FreeCounter`].
    pub fn new(layout: Layout, clock: EpochClock) -> Self {
        Self::with_counter(layout, clock, FreeCounter::process())
    }
}

impl<T: TimeSource> FreeRunningGenerator<T> {
    /// Creates a generator that draws sequence values from `counter`.
    pub fn with_counter(layout: Layout, clock: EpochClock<T>, counter: Arc<FreeCounter>) -> Self {
        Self {
            layout,
            clock,
            counter,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn counter(&self) -> &Arc<FreeCounter> {
        &self.counter
    }

    /// Generates an id with every field at its default.
    ///
    /// # Errors
    ///
    /// See [`FreeRunningGenerator::generate_with`].
    pub fn generate(&self) -> Result<StructuredId> {
        self.generate_with(&Overrides::default())
    }

    /// Generates an id, taking each field from `overrides` when present.
    ///
    /// Defaults: the current time for `timestamp`, the next counter value
    /// masked to the field width for `sequence`, 0 otherwise. A
    /// dual-precision layout uses the `precision` override, or seconds.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownField`] if an override names no field of the
    ///   selected layout, or an instant is given for a layout without a
    ///   timestamp
    /// - [`Error::OutOfRange`] if an override or the current time does not
    ///   fit its field
    /// - [`Error::BeforeEpoch`] if the timestamp would precede the epoch
    ///
    /// The shared counter only advances once every check has passed.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_with(&self, overrides: &Overrides) -> Result<StructuredId> {
        let layout = match &self.layout {
            Layout::Fixed(layout) => layout,
            Layout::DualPrecision(dual) => dual.select(overrides.get(PRECISION).unwrap_or(0))?,
        };

        // Overrides are checked against the selected variant, before the
        // clock is read or the counter is touched.
        for (name, value) in overrides.iter() {
            let field = layout.field(name).ok_or_else(|| Error::UnknownField {
                name: name.to_owned(),
            })?;
            field.check(value)?;
        }
        let timestamp = layout.field(TIMESTAMP);
        if overrides.instant().is_some() && timestamp.is_none() {
            return Err(Error::UnknownField {
                name: TIMESTAMP.to_owned(),
            });
        }

        let ticks = match (timestamp, overrides.get(TIMESTAMP), overrides.instant()) {
            (Some(field), None, at) => {
                let ticks = match at {
                    Some(at) => self.clock.ticks_at(at, layout.unit())?,
                    None => self.clock.now(layout.unit())?,
                };
                field.check(ticks)?;
                Some(ticks)
            }
            _ => None,
        };

        let mut values = FieldValues::with_capacity(layout.fields().len());
        for field in layout.fields() {
            let value = match (field.name(), overrides.get(field.name())) {
                (_, Some(value)) => value,
                (TIMESTAMP, None) => ticks.unwrap_or(0),
                (SEQUENCE, None) => self.counter.advance() & field.mask(),
                _ => 0,
            };
            values.set(field.name(), value);
        }

        layout.pack(&values)
    }
}

impl<T: TimeSource> IdGenerator for FreeRunningGenerator<T> {
    fn next_id(&self) -> Result<StructuredId> {
        self.generate()
    }
}
