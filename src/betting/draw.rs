use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Source of uniform draws in `[0, 1)` used to resolve bet outcomes
pub trait OutcomeDraw: Send + Sync {
    fn draw(&self) -> f64;
}

/// Shared pseudorandom generator. Not cryptographically secure.
pub struct RngDraw<R = StdRng> {
    rng: Mutex<R>,
}

impl<R: Rng + Send> RngDraw<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl RngDraw<StdRng> {
    /// Entropy-seeded generator
    pub fn new_random() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new_random, Self::seeded)
    }
}

impl<R: Rng + Send> OutcomeDraw for RngDraw<R> {
    fn draw(&self) -> f64 {
        // A panic elsewhere cannot leave the generator in a bad state
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen::<f64>()
    }
}

/// Always returns the same value
#[derive(Debug, Clone, Copy)]
pub struct FixedDraw(pub f64);

impl OutcomeDraw for FixedDraw {
    fn draw(&self) -> f64 {
        self.0
    }
}
