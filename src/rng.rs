//! Dependency-injected randomness.
//!
//! The evaluator never reaches for a global RNG: every [`ProgramEnv`](crate::program_env::ProgramEnv)
//! holds a handle implementing [`Rand`], so tests can substitute a fixed
//! sequence and get reproducible stroke streams.

use std::cell::RefCell;
use std::rc::Rc;

/// A source of uniform random numbers in `[low, high)`.
pub trait Rand {
    /// Draws one uniform sample from `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

/// Shared handle to a [`Rand`], cloned (by reference) into every fork so
/// siblings draw from the same underlying stream rather than independent
/// ones.
pub type RngRef = Rc<RefCell<dyn Rand>>;

/// An [`Rand`] backed by `rand`'s thread-local generator.
#[cfg(feature = "rand")]
#[derive(Debug, Default)]
pub struct ThreadRng;

#[cfg(feature = "rand")]
impl Rand for ThreadRng {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        use rand::RngExt;
        rand::rng().random_range(low..high)
    }
}

#[cfg(feature = "rand")]
/// Wraps `rand`'s thread-local generator as a [`RngRef`].
pub fn thread_rng_handle() -> RngRef {
    Rc::new(RefCell::new(ThreadRng))
}

/// A deterministic [`Rand`] that replays a fixed sequence, looping once
/// exhausted. Intended for tests that need reproducible stroke streams.
#[derive(Debug, Clone)]
pub struct FixedRng {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedRng {
    /// Creates a generator that replays `values` (as fractions in `[0, 1)`,
    /// scaled into each call's requested range) forever, looping.
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "FixedRng needs at least one value");
        Self { values, cursor: 0 }
    }
}

impl Rand for FixedRng {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        let fraction = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        low + fraction * (high - low)
    }
}

/// Wraps a [`FixedRng`] as a [`RngRef`], for convenient test setup.
pub fn fixed_rng_handle(values: Vec<f64>) -> RngRef {
    Rc::new(RefCell::new(FixedRng::new(values)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_rng_loops() {
        let mut rng = FixedRng::new(vec![0.0, 0.5, 1.0]);
        assert_eq!(rng.uniform(-10.0, 10.0), -10.0);
        assert_eq!(rng.uniform(-10.0, 10.0), 0.0);
        assert_eq!(rng.uniform(-10.0, 10.0), 10.0);
        assert_eq!(rng.uniform(-10.0, 10.0), -10.0);
    }
}
