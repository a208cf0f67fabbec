use core::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    DATA_CENTER, EpochClock, Error, Field, FieldLayout, FieldValues, IdGenerator, Layout, MACHINE,
    PRECISION, REGION, RESERVED, Result, SEQUENCE, StructuredId, SystemClock, TIMESTAMP,
    TimeSource, WORKER, generator::Mutex,
};

#[derive(Copy, Clone, Debug)]
struct State {
    /// `None` until the first id is issued.
    last_timestamp: Option<u64>,
    sequence: u64,
}

/// A lock-based generator whose ids strictly increase.
///
/// Every call runs under one mutex: read the clock, compare against the last
/// issued timestamp, advance or reset the sequence, and pack. When the
/// sequence space of the current time unit is used up the call spins until
/// the clock moves on. A clock that moves backwards fails the call with
/// [`Error::ClockRollback`].
///
/// Fixed fields (data center, worker, region, machine, ...) are validated
/// and packed once, when the generator is built.
///
/// ## Recommended When
/// - Ids must be strictly increasing per generator
/// - The `(origin fields)` of every generator are assigned uniquely
///
/// ## See Also
/// - [`FreeRunningGenerator`]
///
/// # Example
///
/// ```
/// use tessera::{EpochClock, Layout, MonotonicGenerator, TWITTER_EPOCH};
///
/// let generator = MonotonicGenerator::builder(Layout::twitter())
///     .data_center(1)
///     .worker(7)
///     .build(EpochClock::new(TWITTER_EPOCH))
///     .unwrap();
///
/// let a = generator.next_id().unwrap();
/// let b = generator.next_id().unwrap();
/// assert!(a < b);
/// ```
///
/// [`FreeRunningGenerator`]: crate::FreeRunningGenerator
#[derive(Debug)]
pub struct MonotonicGenerator<T = SystemClock> {
    layout: FieldLayout,
    /// Fixed fields, already shifted into place.
    base: u64,
    timestamp: Field,
    sequence: Field,
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<State>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<State>,
    clock: EpochClock<T>,
}

impl MonotonicGenerator {
    /// Starts configuring a generator for `layout`.
    pub fn builder(layout: Layout) -> MonotonicBuilder {
        MonotonicBuilder {
            layout,
            fixed: Vec::new(),
            resume: None,
        }
    }
}

impl<T: TimeSource> MonotonicGenerator<T> {
    /// The field layout ids are packed with. For a dual-precision layout
    /// this is the sub-layout picked at construction.
    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    pub fn clock(&self) -> &EpochClock<T> {
        &self.clock
    }

    /// Generates the next id.
    ///
    /// Blocks (spinning) for at most one time unit when the sequence of the
    /// current unit is exhausted.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRollback`] if the clock reads earlier than the last
    ///   issued timestamp; the generator state is left untouched
    /// - [`Error::BeforeEpoch`] if the clock reads earlier than the epoch
    /// - [`Error::OutOfRange`] once the timestamp outgrows its field
    /// - [`Error::LockPoisoned`] if a previous holder of the lock panicked
    ///   (std mutex only)
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<StructuredId> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let mut now = self.clock.now(self.layout.unit())?;
        let sequence = match state.last_timestamp {
            Some(last) => match now.cmp(&last) {
                Ordering::Less => return Err(Self::cold_clock_behind(now, last)),
                Ordering::Equal => {
                    let next = state.sequence.wrapping_add(1) & self.sequence.mask();
                    if next == 0 {
                        now = self.wait_past(last)?;
                    }
                    next
                }
                Ordering::Greater => 0,
            },
            None => 0,
        };

        self.timestamp.check(now)?;
        let id = StructuredId::from_bits(
            self.base | self.timestamp.place(now) | self.sequence.place(sequence),
        );

        state.last_timestamp = Some(now);
        state.sequence = sequence;
        Ok(id)
    }

    /// Spins until the clock reads past `last`.
    fn wait_past(&self, last: u64) -> Result<u64> {
        #[cfg(feature = "tracing")]
        tracing::debug!(last, "sequence exhausted, waiting for the next time unit");

        loop {
            core::hint::spin_loop();
            let now = self.clock.now(self.layout.unit())?;
            match now.cmp(&last) {
                Ordering::Greater => return Ok(now),
                Ordering::Equal => {}
                Ordering::Less => return Err(Self::cold_clock_behind(now, last)),
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last: u64) -> Error {
        let behind = last - now;
        #[cfg(feature = "tracing")]
        tracing::warn!(behind, "clock moved backwards, refusing to generate ids");
        Error::ClockRollback { behind }
    }
}

impl<T: TimeSource> IdGenerator for MonotonicGenerator<T> {
    fn next_id(&self) -> Result<StructuredId> {
        self.next_id()
    }
}

/// Configures the fixed fields and starting state of a
/// [`MonotonicGenerator`].
///
/// Fields left unset are packed as 0. `timestamp` and `sequence` are owned
/// by the generator and cannot be fixed.
#[derive(Clone, Debug)]
#[must_use]
pub struct MonotonicBuilder {
    layout: Layout,
    fixed: Vec<(String, u64)>,
    resume: Option<(u64, u64)>,
}

impl MonotonicBuilder {
    /// Fixes the field called `name` for every id.
    pub fn field(mut self, name: impl Into<String>, value: u64) -> Self {
        self.fixed.push((name.into(), value));
        self
    }

    pub fn data_center(self, value: u64) -> Self {
        self.field(DATA_CENTER, value)
    }

    pub fn worker(self, value: u64) -> Self {
        self.field(WORKER, value)
    }

    pub fn region(self, value: u64) -> Self {
        self.field(REGION, value)
    }

    pub fn machine(self, value: u64) -> Self {
        self.field(MACHINE, value)
    }

    pub fn reserved(self, value: u64) -> Self {
        self.field(RESERVED, value)
    }

    /// Binds a dual-precision layout to seconds (0) or milliseconds (1).
    /// Seconds when unset.
    pub fn precision(self, value: u64) -> Self {
        self.field(PRECISION, value)
    }

    /// Starts as if `(last_timestamp, sequence)` had just been issued.
    pub fn resume_from(mut self, last_timestamp: u64, sequence: u64) -> Self {
        self.resume = Some((last_timestamp, sequence));
        self
    }

    /// Validates the configuration and builds the generator.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownField`] for a fixed field the layout lacks
    /// - [`Error::OutOfRange`] for a fixed value or resume state that does
    ///   not fit its field
    /// - [`Error::InvalidLayout`] if `timestamp` or `sequence` is fixed, or
    ///   the layout lacks either of them
    pub fn build<T: TimeSource>(self, clock: EpochClock<T>) -> Result<MonotonicGenerator<T>> {
        let mut fixed = FieldValues::with_capacity(self.fixed.len());
        for (name, value) in &self.fixed {
            let field = self.layout.field(name).ok_or_else(|| Error::UnknownField {
                name: name.clone(),
            })?;
            if field.name() == TIMESTAMP || field.name() == SEQUENCE {
                return Err(Error::InvalidLayout {
                    reason: format!("'{}' is generated and cannot be fixed", field.name()),
                });
            }
            fixed.set(field.name(), *value);
        }

        let layout = match self.layout {
            Layout::Fixed(layout) => layout,
            Layout::DualPrecision(dual) => dual.select(fixed.get(PRECISION).unwrap_or(0))?.clone(),
        };

        let required = |name: &'static str| {
            layout.field(name).copied().ok_or_else(|| Error::InvalidLayout {
                reason: format!("a monotonic layout needs a '{name}' field"),
            })
        };
        let timestamp = required(TIMESTAMP)?;
        let sequence = required(SEQUENCE)?;

        let mut base = 0;
        for (name, value) in fixed.iter() {
            // Every name was resolved against some variant above
            let field = layout.field(name).ok_or_else(|| Error::UnknownField {
                name: name.to_owned(),
            })?;
            field.check(value)?;
            base |= field.place(value);
        }

        let state = match self.resume {
            Some((last, seq)) => {
                timestamp.check(last)?;
                sequence.check(seq)?;
                State {
                    last_timestamp: Some(last),
                    sequence: seq,
                }
            }
            None => State {
                last_timestamp: None,
                sequence: 0,
            },
        };

        Ok(MonotonicGenerator {
            layout,
            base,
            timestamp,
            sequence,
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(state)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(state),
            clock,
        })
    }
}
