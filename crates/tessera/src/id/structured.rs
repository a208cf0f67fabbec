use core::fmt;

/// A packed identifier, carried as a signed 64-bit integer.
///
/// The bits are partitioned by a [`Layout`]; the id itself is opaque.
/// Ordering and equality are those of the underlying `i64`, so ids packed
/// with the sign bit set sort before all non-negative ids.
///
/// The canonical text form is the plain decimal of the `i64` (see
/// [`StructuredId::parse`]).
///
/// [`Layout`]: crate::Layout
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StructuredId {
    id: i64,
}

impl StructuredId {
    /// The all-zero id, the usual fallback after a failed
    /// [`StructuredId::try_parse`].
    pub const ZERO: Self = Self::from_raw(0);

    pub const fn from_raw(raw: i64) -> Self {
        Self { id: raw }
    }

    pub const fn to_raw(self) -> i64 {
        self.id
    }

    /// Reinterprets an unsigned bit pattern as an id.
    pub const fn from_bits(bits: u64) -> Self {
        Self::from_raw(bits as i64)
    }

    /// The two's-complement bit pattern of the id.
    pub const fn to_bits(self) -> u64 {
        self.id as u64
    }
}

impl From<i64> for StructuredId {
    fn from(raw: i64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<StructuredId> for i64 {
    fn from(id: StructuredId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for StructuredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

impl fmt::Debug for StructuredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredId")
            .field("id", &self.id)
            .field("bits", &format_args!("{:#018x}", self.to_bits()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_signed_value() {
        let negative = StructuredId::from_bits(1 << 63);
        let positive = StructuredId::from_raw(1);
        assert!(negative < StructuredId::ZERO);
        assert!(StructuredId::ZERO < positive);
        assert_eq!(negative.to_raw(), i64::MIN);
    }

    #[test]
    fn bits_round_trip() {
        for raw in [0, 1, -1, i64::MIN, i64::MAX, -9_186_966_433_981_537_281] {
            let id = StructuredId::from(raw);
            assert_eq!(StructuredId::from_bits(id.to_bits()), id);
            assert_eq!(i64::from(id), raw);
        }
    }

    #[test]
    fn display_is_plain_decimal() {
        assert_eq!(StructuredId::from_raw(-42).to_string(), "-42");
        assert_eq!(StructuredId::default(), StructuredId::ZERO);
    }

    #[test]
    fn debug_shows_bit_pattern() {
        let debug = format!("{:?}", StructuredId::from_raw(-1));
        assert_eq!(debug, "StructuredId { id: -1, bits: 0xffffffffffffffff }");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_native_integer() {
        let id = StructuredId::from_raw(-4_603_796_181_450_817_391);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "-4603796181450817391");
        assert_eq!(serde_json::from_str::<StructuredId>(&json).unwrap(), id);
    }
}
