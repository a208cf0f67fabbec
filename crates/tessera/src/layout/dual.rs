use crate::{Error, Field, FieldLayout, PRECISION, Result, SEQUENCE, TIMESTAMP, TimeUnit};

/// Two layouts sharing a 1-bit `precision` flag at the same position.
///
/// The flag picks the sub-layout: 0 for the seconds layout, 1 for the
/// milliseconds layout. The widths and shifts of `timestamp` and `sequence`
/// differ between the two, so the flag must be read before either of them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DualPrecisionLayout {
    flag: Field,
    seconds: FieldLayout,
    millis: FieldLayout,
}

impl DualPrecisionLayout {
    /// Pairs a seconds layout with a milliseconds layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] unless both layouts carry a 1-bit
    /// `precision` field at the same shift, a `timestamp` and a `sequence`
    /// field, and count in seconds and milliseconds respectively.
    pub fn new(seconds: FieldLayout, millis: FieldLayout) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidLayout {
            reason: reason.to_owned(),
        };

        if seconds.unit() != TimeUnit::Seconds || millis.unit() != TimeUnit::Milliseconds {
            return Err(invalid(
                "dual-precision sub-layouts must count in seconds and milliseconds",
            ));
        }
        for sub in [&seconds, &millis] {
            if sub.field(TIMESTAMP).is_none() || sub.field(SEQUENCE).is_none() {
                return Err(invalid(
                    "dual-precision sub-layouts need a timestamp and a sequence field",
                ));
            }
        }

        let flag = match (seconds.field(PRECISION), millis.field(PRECISION)) {
            (Some(a), Some(b)) if a == b && a.bits() == 1 => *a,
            (Some(_), Some(_)) => {
                return Err(invalid(
                    "the precision flag must be 1 bit at the same position in both sub-layouts",
                ));
            }
            _ => return Err(invalid("both sub-layouts need a precision field")),
        };

        Ok(Self {
            flag,
            seconds,
            millis,
        })
    }

    /// Builds a pair already known to be valid.
    pub(crate) fn from_parts(seconds: FieldLayout, millis: FieldLayout) -> Self {
        let flag = seconds
            .field(PRECISION)
            .copied()
            .unwrap_or(Field::new(PRECISION, 1, 0));
        debug_assert_eq!(millis.field(PRECISION), Some(&flag));
        Self {
            flag,
            seconds,
            millis,
        }
    }

    /// The precision flag.
    pub fn flag(&self) -> &Field {
        &self.flag
    }

    pub fn seconds(&self) -> &FieldLayout {
        &self.seconds
    }

    pub fn millis(&self) -> &FieldLayout {
        &self.millis
    }

    /// Picks the sub-layout for a precision value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `precision` is neither 0 nor 1.
    pub fn select(&self, precision: u64) -> Result<&FieldLayout> {
        self.flag.check(precision)?;
        Ok(self.select_raw(self.flag.place(precision)))
    }

    /// Picks the sub-layout named by the flag bit of a packed id.
    pub fn select_raw(&self, raw: u64) -> &FieldLayout {
        match self.flag.extract(raw) {
            0 => &self.seconds,
            _ => &self.millis,
        }
    }
}
