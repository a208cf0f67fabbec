use crate::{
    DATA_CENTER, Decoded, DualPrecisionLayout, Error, Field, FieldLayout, FieldValues, MACHINE,
    PRECISION, REGION, RESERVED, Result, SEQUENCE, StructuredId, TIMESTAMP, TimeUnit, WORKER,
};

/// The bit layout of one identifier variant.
///
/// Most variants are a single [`FieldLayout`]. A dual-precision variant picks
/// between two field layouts with a 1-bit flag, see [`DualPrecisionLayout`].
///
/// # Example
///
/// ```
/// use tessera::{Layout, StructuredId};
///
/// let id: StructuredId = "36671638107855309".parse().unwrap();
/// let fields = Layout::regional().unpack(id);
/// assert_eq!(fields.get("timestamp"), Some(8_743_199_851));
/// assert_eq!(fields.get("sequence"), Some(6_605));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
    Fixed(FieldLayout),
    DualPrecision(DualPrecisionLayout),
}

impl Layout {
    /// Names accepted by [`Layout::by_name`].
    pub const NAMES: [&'static str; 4] = ["twitter", "regional", "wide_machine", "dual_precision"];

    /// The classic Twitter Snowflake layout, in milliseconds.
    ///
    /// ```text
    ///  Bit Index:  63           63 62            22 21             17 16        12 11             0
    ///              +--------------+----------------+-----------------+------------+---------------+
    ///  Field:      | reserved (1) | timestamp (41) | data_center (5) | worker (5) | sequence (12) |
    ///              +--------------+----------------+-----------------+------------+---------------+
    /// ```
    pub fn twitter() -> Self {
        Self::Fixed(FieldLayout::from_widths(
            TimeUnit::Milliseconds,
            &[
                (RESERVED, 1),
                (TIMESTAMP, 41),
                (DATA_CENTER, 5),
                (WORKER, 5),
                (SEQUENCE, 12),
            ],
        ))
    }

    /// Millisecond layout with 16 regions of 32 machines.
    ///
    /// ```text
    ///  Bit Index:  63           63 62            22 21        18 17         13 12             0
    ///              +--------------+----------------+------------+-------------+---------------+
    ///  Field:      | reserved (1) | timestamp (41) | region (4) | machine (5) | sequence (13) |
    ///              +--------------+----------------+------------+-------------+---------------+
    /// ```
    pub fn regional() -> Self {
        Self::Fixed(FieldLayout::from_widths(
            TimeUnit::Milliseconds,
            &[
                (RESERVED, 1),
                (TIMESTAMP, 41),
                (REGION, 4),
                (MACHINE, 5),
                (SEQUENCE, 13),
            ],
        ))
    }

    /// Millisecond layout with 8 regions of 1024 machines.
    ///
    /// ```text
    ///  Bit Index:  63           63 62            23 22        20 19          10 9              0
    ///              +--------------+----------------+------------+--------------+---------------+
    ///  Field:      | reserved (1) | timestamp (40) | region (3) | machine (10) | sequence (10) |
    ///              +--------------+----------------+------------+--------------+---------------+
    /// ```
    pub fn wide_machine() -> Self {
        Self::Fixed(FieldLayout::from_widths(
            TimeUnit::Milliseconds,
            &[
                (RESERVED, 1),
                (TIMESTAMP, 40),
                (REGION, 3),
                (MACHINE, 10),
                (SEQUENCE, 10),
            ],
        ))
    }

    /// Layout switching between second and millisecond precision.
    ///
    /// ```text
    ///  Bit Index:  63    63 62     61 60      51 50       50 49                             0
    ///              +-------+---------+----------+-----------+-------------------------------+
    ///  Field:      | rsv(1)| reg (2) | mach (10)| prec. (1) | timestamp (30) | sequence (20)|  prec. = 0
    ///              |       |         |          |           | timestamp (40) | sequence (10)|  prec. = 1
    ///              +-------+---------+----------+-----------+-------------------------------+
    /// ```
    pub fn dual_precision() -> Self {
        let sub = |unit: TimeUnit, timestamp: u8, sequence: u8| {
            FieldLayout::from_widths(
                unit,
                &[
                    (RESERVED, 1),
                    (REGION, 2),
                    (MACHINE, 10),
                    (PRECISION, 1),
                    (TIMESTAMP, timestamp),
                    (SEQUENCE, sequence),
                ],
            )
        };
        Self::DualPrecision(DualPrecisionLayout::from_parts(
            sub(TimeUnit::Seconds, 30, 20),
            sub(TimeUnit::Milliseconds, 40, 10),
        ))
    }

    /// Looks up a built-in layout by name, see [`Layout::NAMES`].
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "twitter" => Some(Self::twitter()),
            "regional" => Some(Self::regional()),
            "wide_machine" => Some(Self::wide_machine()),
            "dual_precision" => Some(Self::dual_precision()),
            _ => None,
        }
    }

    /// Every field layout this layout may use.
    pub fn variants(&self) -> impl Iterator<Item = &FieldLayout> {
        let pair = match self {
            Self::Fixed(layout) => [Some(layout), None],
            Self::DualPrecision(dual) => [Some(dual.seconds()), Some(dual.millis())],
        };
        pair.into_iter().flatten()
    }

    /// Finds a field by name in any variant. For a dual-precision layout this
    /// is the seconds variant's field when both have one.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.variants().find_map(|layout| layout.field(name))
    }

    /// Picks the field layout that applies to `values`.
    ///
    /// # Errors
    ///
    /// For a dual-precision layout, [`Error::MissingField`] if `values` has
    /// no `precision`, or [`Error::OutOfRange`] if it is not 0 or 1.
    pub fn resolve(&self, values: &FieldValues) -> Result<&FieldLayout> {
        match self {
            Self::Fixed(layout) => Ok(layout),
            Self::DualPrecision(dual) => {
                let precision = values
                    .get(PRECISION)
                    .ok_or(Error::MissingField { name: PRECISION })?;
                dual.select(precision)
            }
        }
    }

    /// Picks the field layout an id was packed with.
    pub fn resolve_id(&self, id: StructuredId) -> &FieldLayout {
        match self {
            Self::Fixed(layout) => layout,
            Self::DualPrecision(dual) => dual.select_raw(id.to_bits()),
        }
    }

    /// Packs `values` with the field layout they resolve to.
    ///
    /// # Errors
    ///
    /// See [`Layout::resolve`] and [`FieldLayout::pack`].
    pub fn pack(&self, values: &FieldValues) -> Result<StructuredId> {
        self.resolve(values)?.pack(values)
    }

    /// Splits an id into named fields. Never fails: every bit pattern decodes.
    pub fn unpack(&self, id: StructuredId) -> FieldValues {
        self.resolve_id(id).unpack(id)
    }

    /// Builds [`FieldValues`] from borrowed names, such as those read from a
    /// command line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] for a name no variant defines.
    pub fn values_from<'a, I>(&self, pairs: I) -> Result<FieldValues>
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        pairs
            .into_iter()
            .map(|(name, value)| {
                self.field(name)
                    .map(|field| (field.name(), value))
                    .ok_or_else(|| Error::UnknownField {
                        name: name.to_owned(),
                    })
            })
            .collect()
    }

    /// Returns a [`Display`] adapter rendering `id` as a bit table.
    ///
    /// [`Display`]: core::fmt::Display
    pub fn describe(&self, id: StructuredId) -> Decoded<'_> {
        Decoded::new(self.resolve_id(id), id)
    }
}

impl From<FieldLayout> for Layout {
    fn from(layout: FieldLayout) -> Self {
        Self::Fixed(layout)
    }
}

impl From<DualPrecisionLayout> for Layout {
    fn from(layout: DualPrecisionLayout) -> Self {
        Self::DualPrecision(layout)
    }
}
