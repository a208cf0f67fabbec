use core::str::FromStr;

use crate::{Error, Result, StructuredId};

impl StructuredId {
    /// Parses the canonical decimal form: an optional `-` followed by ASCII
    /// digits, within `i64` range.
    ///
    /// Leading `+`, whitespace and digit separators are all rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] carrying the input if it is empty, malformed
    /// or out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use tessera::StructuredId;
    ///
    /// let id = StructuredId::parse("-9186966433981537281").unwrap();
    /// assert_eq!(id.to_string(), "-9186966433981537281");
    /// assert!(StructuredId::parse("+1").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let digits = input.strip_prefix('-').unwrap_or(input);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format_error(input));
        }
        input
            .parse::<i64>()
            .map(Self::from_raw)
            .map_err(|_| format_error(input))
    }

    /// Like [`StructuredId::parse`], but absent or malformed input yields
    /// `None`.
    ///
    /// ```
    /// use tessera::StructuredId;
    ///
    /// assert_eq!(StructuredId::try_parse(None), None);
    /// assert_eq!(StructuredId::try_parse(None).unwrap_or_default(), StructuredId::ZERO);
    /// assert_eq!(StructuredId::try_parse(Some("12")), Some(StructuredId::from_raw(12)));
    /// ```
    pub fn try_parse(input: Option<&str>) -> Option<Self> {
        input.and_then(|s| Self::parse(s).ok())
    }
}

#[cold]
fn format_error(input: &str) -> Error {
    Error::Format {
        input: input.to_owned(),
    }
}

impl FromStr for StructuredId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Layout;

    #[test]
    fn format_then_parse_is_identity() {
        for raw in [
            0,
            1,
            -1,
            i64::MIN,
            i64::MAX,
            36_671_638_107_855_309,
            -6_341_059_176_974_754_912,
        ] {
            let id = StructuredId::from_raw(raw);
            assert_eq!(StructuredId::parse(&id.to_string()), Ok(id));
        }
    }

    #[test]
    fn rejects_non_canonical_text() {
        for input in [
            "", "-", "+1", " 1", "1 ", "1,000", "1_000", "0x10", "--1", "١",
            "9223372036854775808", "-9223372036854775809",
        ] {
            assert_eq!(
                StructuredId::parse(input),
                Err(Error::Format {
                    input: input.to_owned()
                }),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn leading_zeros_are_accepted() {
        assert_eq!(StructuredId::parse("007"), Ok(StructuredId::from_raw(7)));
        assert_eq!(StructuredId::parse("-0"), Ok(StructuredId::ZERO));
    }

    #[test]
    fn try_parse_falls_back_to_none() {
        assert_eq!(StructuredId::try_parse(None), None);
        assert_eq!(StructuredId::try_parse(Some("abc")), None);
        assert_eq!(
            StructuredId::try_parse(None).unwrap_or_default(),
            StructuredId::ZERO
        );
    }

    #[test]
    fn parsed_literal_unpacks_to_reference_fields() {
        let id: StructuredId = "36671638107855309".parse().unwrap();
        let fields = Layout::regional().unpack(id);
        assert_eq!(
            fields.iter().collect::<Vec<_>>(),
            vec![
                ("reserved", 0),
                ("timestamp", 8_743_199_851),
                ("region", 0),
                ("machine", 0),
                ("sequence", 6_605),
            ]
        );
    }
}
