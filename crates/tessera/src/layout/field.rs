use crate::{Error, Result};

/// Reserved high-order bits, 0 by default.
pub const RESERVED: &str = "reserved";
/// Elapsed time units since the layout's epoch.
pub const TIMESTAMP: &str = "timestamp";
/// Intra-unit counter.
pub const SEQUENCE: &str = "sequence";
/// Deployment region.
pub const REGION: &str = "region";
/// Machine within a region.
pub const MACHINE: &str = "machine";
/// Data center, for the Twitter layout.
pub const DATA_CENTER: &str = "data_center";
/// Worker within a data center, for the Twitter layout.
pub const WORKER: &str = "worker";
/// Time precision flag of a dual-precision layout: 0 = seconds, 1 =
/// milliseconds.
pub const PRECISION: &str = "precision";

/// One named, fixed-width slice of a packed id.
///
/// A field occupies bits `shift..shift + bits` and accepts values in
/// `0..=mask()`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    name: &'static str,
    bits: u8,
    shift: u8,
}

impl Field {
    pub(crate) const fn new(name: &'static str, bits: u8, shift: u8) -> Self {
        debug_assert!(bits >= 1 && bits as u16 + shift as u16 <= 64);
        Self { name, bits, shift }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Width of the field in bits.
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Number of bits below the field.
    pub const fn shift(&self) -> u8 {
        self.shift
    }

    /// Bitmask of the field, unshifted. Also the largest accepted value.
    pub const fn mask(&self) -> u64 {
        if self.bits >= 64 {
            u64::MAX
        } else {
            (1 << self.bits) - 1
        }
    }

    /// Fails with [`Error::OutOfRange`] unless `value` fits in the field.
    pub fn check(&self, value: u64) -> Result<()> {
        if value > self.mask() {
            return Err(Error::OutOfRange {
                field: self.name,
                value,
                bits: self.bits,
            });
        }
        Ok(())
    }

    /// Masks `value` and moves it into position.
    pub const fn place(&self, value: u64) -> u64 {
        (value & self.mask()) << self.shift
    }

    /// Reads the field out of a packed bit pattern.
    pub const fn extract(&self, raw: u64) -> u64 {
        (raw >> self.shift) & self.mask()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_covers_width() {
        assert_eq!(Field::new(SEQUENCE, 12, 0).mask(), 0xfff);
        assert_eq!(Field::new(RESERVED, 1, 63).mask(), 1);
        assert_eq!(Field::new("raw", 64, 0).mask(), u64::MAX);
    }

    #[test]
    fn place_and_extract_at_the_sign_bit() {
        let reserved = Field::new(RESERVED, 1, 63);
        let raw = reserved.place(1);
        assert_eq!(raw, 1 << 63);
        assert!((raw as i64) < 0);
        assert_eq!(reserved.extract(raw), 1);
    }

    #[test]
    fn check_rejects_one_past_max() {
        let seq = Field::new(SEQUENCE, 12, 0);
        assert_eq!(seq.check(4095), Ok(()));
        assert_eq!(
            seq.check(4096),
            Err(Error::OutOfRange {
                field: SEQUENCE,
                value: 4096,
                bits: 12,
            })
        );
    }
}
