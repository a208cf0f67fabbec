/// An ordered set of `name -> value` pairs for the fields of one id.
///
/// [`FieldLayout::unpack`] yields the fields most-significant first; values
/// built by hand may come in any order, since packing looks each field up by
/// name. Setting a name twice keeps the position of the first entry and the
/// value of the last.
///
/// # Example
///
/// ```
/// use tessera::{FieldValues, Layout};
///
/// let values = FieldValues::from([
///     ("reserved", 0),
///     ("timestamp", 8_743_199_851),
///     ("region", 0),
///     ("machine", 0),
///     ("sequence", 6_605),
/// ]);
/// let id = Layout::regional().pack(&values).unwrap();
/// assert_eq!(id.to_string(), "36671638107855309");
/// assert_eq!(Layout::regional().unpack(id), values);
/// ```
///
/// [`FieldLayout::unpack`]: crate::FieldLayout::unpack
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldValues {
    entries: Vec<(&'static str, u64)>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Sets `name` to `value` and returns `self`, for chaining.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: u64) -> Self {
        self.set(name, value);
        self
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn set(&mut self, name: &'static str, value: u64) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<const N: usize> From<[(&'static str, u64); N]> for FieldValues {
    fn from(entries: [(&'static str, u64); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl FromIterator<(&'static str, u64)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (&'static str, u64)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (name, value) in iter {
            values.set(name, value);
        }
        values
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FieldValues {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
