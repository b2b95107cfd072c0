//! Where the dice come from.  The engines never reach for a global
//! generator; they draw from whatever `RandomSource` the caller lends
//! them for the length of one `iterate` call.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A uniform generator of floats in [0, 1) and of integers in
/// [0, bound).
pub trait RandomSource {
    /// A float drawn uniformly from [0, 1).
    fn uniform01(&mut self) -> f64;

    /// An integer drawn uniformly from [0, bound).  `bound` is never 0.
    fn uniform_int(&mut self, bound: usize) -> usize;
}

impl<'a, S: RandomSource + ?Sized> RandomSource for &'a mut S {
    fn uniform01(&mut self) -> f64 {
        (**self).uniform01()
    }

    fn uniform_int(&mut self, bound: usize) -> usize {
        (**self).uniform_int(bound)
    }
}

/// Any `rand` generator, dressed up as a `RandomSource`.
#[derive(Clone, Debug)]
pub struct RngSource<R: Rng>(R);

impl<R: Rng> RngSource<R> {
    /// Wraps an existing generator.
    pub fn new(rng: R) -> Self {
        RngSource(rng)
    }
}

impl RngSource<StdRng> {
    /// A reproducible source: the same seed always yields the same
    /// draws.
    pub fn seeded(seed: u64) -> Self {
        RngSource(StdRng::seed_from_u64(seed))
    }

    /// A source seeded from the operating system.
    pub fn from_entropy() -> Self {
        RngSource(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform01(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn uniform_int(&mut self, bound: usize) -> usize {
        self.0.gen_range(0, bound)
    }
}

/// Replays two fixed scripts, one of floats and one of integers,
/// wrapping around when either runs out.  Integer draws are reduced
/// modulo the requested bound so a script can be reused across
/// polygons.
#[derive(Clone, Debug)]
pub struct Scripted {
    floats: Vec<f64>,
    ints: Vec<usize>,
    next_float: usize,
    next_int: usize,
}

impl Scripted {
    /// Builds a scripted source.  Empty scripts replay as 0.
    pub fn new(floats: Vec<f64>, ints: Vec<usize>) -> Self {
        Scripted {
            floats,
            ints,
            next_float: 0,
            next_int: 0,
        }
    }
}

impl RandomSource for Scripted {
    fn uniform01(&mut self) -> f64 {
        if self.floats.is_empty() {
            return 0.0;
        }
        let value = self.floats[self.next_float % self.floats.len()];
        self.next_float += 1;
        value
    }

    fn uniform_int(&mut self, bound: usize) -> usize {
        if self.ints.is_empty() {
            return 0;
        }
        let value = self.ints[self.next_int % self.ints.len()];
        self.next_int += 1;
        value % bound
    }
}
