use crate::{Error, Field, FieldValues, Result, StructuredId, TimeUnit};

/// A fixed partition of up to 64 bits into named fields.
///
/// Fields are declared most-significant first. Each field's shift is the sum
/// of the widths declared after it, so the last field sits at bit 0. Any
/// bits above the first field are implicitly zero.
///
/// Invariants, checked by [`FieldLayout::new`]:
/// - at least one field, every width at least 1, names unique;
/// - widths sum to at most 64;
/// - when they sum to exactly 64, the top field is 1 bit wide, so a set top
///   bit becomes the sign bit of the `i64` container and still round-trips.
///
/// ```text
///  Bit Index:  63           63 62            22 21      18 17       13 12             0
///              +--------------+----------------+----------+-----------+---------------+
///  Field:      | reserved (1) | timestamp (41) | region(4)| machine(5)| sequence (13) |
///              +--------------+----------------+----------+-----------+---------------+
///              |<------------- MSB ------------ 64 bits ------------- LSB ----------->|
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldLayout {
    fields: Vec<Field>,
    unit: TimeUnit,
}

impl FieldLayout {
    /// Builds a layout from `(name, bits)` pairs, most-significant first.
    ///
    /// `unit` is the unit of the `timestamp` field, if the layout has one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] if the widths violate any of the
    /// invariants listed on the type.
    ///
    /// # Example
    ///
    /// ```
    /// use tessera::{FieldLayout, TimeUnit};
    ///
    /// let layout = FieldLayout::new(
    ///     TimeUnit::Milliseconds,
    ///     &[("timestamp", 40), ("sequence", 16)],
    /// )
    /// .unwrap();
    /// assert_eq!(layout.field("timestamp").unwrap().shift(), 16);
    ///
    /// assert!(FieldLayout::new(TimeUnit::Seconds, &[("a", 40), ("b", 40)]).is_err());
    /// ```
    pub fn new(unit: TimeUnit, widths: &[(&'static str, u8)]) -> Result<Self> {
        validate(widths)?;
        Ok(Self::from_widths(unit, widths))
    }

    /// Builds a layout from widths already known to be valid.
    pub(crate) fn from_widths(unit: TimeUnit, widths: &[(&'static str, u8)]) -> Self {
        debug_assert!(validate(widths).is_ok(), "invalid built-in layout");

        let mut shift = 0u8;
        let mut fields: Vec<Field> = widths
            .iter()
            .rev()
            .map(|&(name, bits)| {
                let field = Field::new(name, bits, shift);
                shift += bits;
                field
            })
            .collect();
        fields.reverse();

        Self { fields, unit }
    }

    /// Fields, most-significant first.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Unit of the `timestamp` field.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Sum of all field widths.
    pub fn total_bits(&self) -> u8 {
        self.fields.iter().map(Field::bits).sum()
    }

    /// Packs `values` into an id.
    ///
    /// Every value is validated before any bit is written.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownField`] if `values` names a field this layout lacks
    /// - [`Error::MissingField`] if a layout field has no value
    /// - [`Error::OutOfRange`] if a value does not fit its field
    pub fn pack(&self, values: &FieldValues) -> Result<StructuredId> {
        if let Some((name, _)) = values.iter().find(|(name, _)| self.field(name).is_none()) {
            return Err(Error::UnknownField {
                name: name.to_owned(),
            });
        }

        let mut resolved = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = values.get(field.name()).ok_or(Error::MissingField {
                name: field.name(),
            })?;
            field.check(value)?;
            resolved.push((field, value));
        }

        let raw = resolved
            .into_iter()
            .fold(0u64, |raw, (field, value)| raw | field.place(value));
        Ok(StructuredId::from_bits(raw))
    }

    /// Splits an id into its field values, most-significant first.
    pub fn unpack(&self, id: StructuredId) -> FieldValues {
        let raw = id.to_bits();
        let mut values = FieldValues::with_capacity(self.fields.len());
        for field in &self.fields {
            values.set(field.name(), field.extract(raw));
        }
        values
    }
}

fn validate(widths: &[(&'static str, u8)]) -> Result<()> {
    let invalid = |reason: String| Err(Error::InvalidLayout { reason });

    let Some(&(top_name, top_bits)) = widths.first() else {
        return invalid("a layout needs at least one field".into());
    };

    let mut total = 0u32;
    for (i, &(name, bits)) in widths.iter().enumerate() {
        if bits == 0 {
            return invalid(format!("field '{name}' has zero width"));
        }
        if widths[..i].iter().any(|&(other, _)| other == name) {
            return invalid(format!("field '{name}' is declared twice"));
        }
        total += u32::from(bits);
    }

    if total > 64 {
        return invalid(format!("fields need {total} bits, more than 64"));
    }
    if total == 64 && widths.len() > 1 && top_bits != 1 {
        return invalid(format!(
            "top field '{top_name}' holds the sign bit and must be 1 bit wide, not {top_bits}"
        ));
    }
    Ok(())
}
