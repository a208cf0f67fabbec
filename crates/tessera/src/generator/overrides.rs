use std::time::SystemTime;

use crate::{DATA_CENTER, MACHINE, PRECISION, REGION, RESERVED, SEQUENCE, TIMESTAMP, WORKER};

/// Caller-supplied field values for [`FreeRunningGenerator::generate_with`].
///
/// Every field left out takes its default: "now" for `timestamp`, the next
/// shared counter value for `sequence`, and 0 for everything else. Names are
/// checked against the layout at generation time.
///
/// The timestamp can be given as raw units with [`Overrides::timestamp`] or
/// as a wall-clock instant with [`Overrides::at`]; whichever is set last
/// wins.
///
/// # Example
///
/// ```
/// use tessera::Overrides;
///
/// let overrides = Overrides::new().region(3).machine(17).sequence(42);
/// assert_eq!(overrides.get("machine"), Some(17));
/// assert_eq!(overrides.get("timestamp"), None);
/// ```
///
/// [`FreeRunningGenerator::generate_with`]: crate::FreeRunningGenerator::generate_with
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    values: Vec<(String, u64)>,
    at: Option<SystemTime>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the field called `name`.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: u64) -> Self {
        let name = name.into();
        if name == TIMESTAMP {
            self.at = None;
        }
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.values.push((name, value)),
        }
        self
    }

    /// Sets the timestamp in the layout's units since the epoch.
    #[must_use]
    pub fn timestamp(self, ticks: u64) -> Self {
        self.set(TIMESTAMP, ticks)
    }

    /// Sets the timestamp to a wall-clock instant.
    #[must_use]
    pub fn at(mut self, at: SystemTime) -> Self {
        self.values.retain(|(n, _)| n != TIMESTAMP);
        self.at = Some(at);
        self
    }

    #[must_use]
    pub fn sequence(self, value: u64) -> Self {
        self.set(SEQUENCE, value)
    }

    #[must_use]
    pub fn reserved(self, value: u64) -> Self {
        self.set(RESERVED, value)
    }

    #[must_use]
    pub fn region(self, value: u64) -> Self {
        self.set(REGION, value)
    }

    #[must_use]
    pub fn machine(self, value: u64) -> Self {
        self.set(MACHINE, value)
    }

    #[must_use]
    pub fn data_center(self, value: u64) -> Self {
        self.set(DATA_CENTER, value)
    }

    #[must_use]
    pub fn worker(self, value: u64) -> Self {
        self.set(WORKER, value)
    }

    /// Selects the sub-layout of a dual-precision layout: 0 for seconds, 1
    /// for milliseconds.
    #[must_use]
    pub fn precision(self, value: u64) -> Self {
        self.set(PRECISION, value)
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, value)| value)
    }

    /// The wall-clock instant set with [`Overrides::at`], if any.
    pub fn instant(&self) -> Option<SystemTime> {
        self.at
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    #[test]
    fn last_timestamp_form_wins() {
        let overrides = Overrides::new().timestamp(5).at(UNIX_EPOCH);
        assert_eq!(overrides.get(TIMESTAMP), None);
        assert_eq!(overrides.instant(), Some(UNIX_EPOCH));

        let overrides = overrides.timestamp(9);
        assert_eq!(overrides.get(TIMESTAMP), Some(9));
        assert_eq!(overrides.instant(), None);
    }

    #[test]
    fn set_replaces_previous_value() {
        let overrides = Overrides::new().set("region", 1).region(2);
        assert_eq!(overrides.iter().collect::<Vec<_>>(), vec![("region", 2)]);
    }
}
