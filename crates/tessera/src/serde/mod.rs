use serde::{Deserialize, Deserializer, Serializer};

/// (De)serializes a [`StructuredId`] as its canonical decimal string, for
/// consumers (JavaScript among them) that cannot hold a full 64-bit integer.
///
/// ```
/// use tessera::StructuredId;
///
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Row {
///     #[serde(with = "tessera::as_decimal")]
///     id: StructuredId,
/// }
///
/// let json = serde_json::to_string(&Row { id: StructuredId::from_raw(-7) }).unwrap();
/// assert_eq!(json, r#"{"id":"-7"}"#);
/// ```
///
/// [`StructuredId`]: crate::StructuredId
pub mod as_decimal {
    use super::{Deserialize, Deserializer, Serializer};
    use crate::StructuredId;

    /// Serialize an id as its decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &StructuredId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize an id from its decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the string is
    /// not a canonical decimal id.
    pub fn deserialize<'de, D>(d: D) -> Result<StructuredId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        StructuredId::parse(&s).map_err(serde::de::Error::custom)
    }
}
