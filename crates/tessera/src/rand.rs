use rand::{Rng, rng};

/// A trait for random sources that seed a [`FreeCounter`].
///
/// This abstraction allows you to plug in a real random source or a fixed
/// seed in tests.
///
/// # Example
/// ```
/// use tessera::{FreeCounter, RandSource};
///
/// struct FixedRand;
/// impl RandSource for FixedRand {
///     fn rand(&self) -> u64 {
///         1234
///     }
/// }
///
/// let counter = FreeCounter::from_rand(&FixedRand);
/// assert_eq!(counter.advance(), 1235);
/// ```
///
/// [`FreeCounter`]: crate::FreeCounter
pub trait RandSource {
    /// Returns a random integer.
    fn rand(&self) -> u64;
}

impl<R: RandSource + ?Sized> RandSource for &R {
    fn rand(&self) -> u64 {
        (**self).rand()
    }
}

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// This type does **not** store the RNG itself; it accesses the thread-local
/// generator on each call, so it may be freely shared across threads.
#[derive(Default, Clone, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_random_varies() {
        let seeds: Vec<u64> = (0..8).map(|_| ThreadRandom.rand()).collect();
        assert!(seeds.windows(2).any(|pair| pair[0] != pair[1]));
    }
}
