//! Injectable source of uniform random numbers.
//!
//! Anything that needs randomness (pressure jitter, emergency outcomes,
//! temperature spikes) takes a `RandomSource` instead of reaching for a
//! global generator. Every `rand::RngCore` is a source; tests can script the
//! exact draws with [`ScriptedRandom`].

use rand::{Rng, RngCore};

use crate::numeric::Real;

/// Uniform random draws in `[0, 1)`.
pub trait RandomSource {
    /// Next draw, uniformly distributed in `[0, 1)`.
    fn next_unit(&mut self) -> Real;

    /// Uniform draw in `[low, high)`.
    fn uniform(&mut self, low: Real, high: Real) -> Real {
        low + self.next_unit() * (high - low)
    }

    /// Uniform whole number in `[low, low + span)`, i.e. `floor(u * span) + low`.
    fn whole_in(&mut self, low: Real, span: Real) -> Real {
        (self.next_unit() * span).floor() + low
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> Real {
        self.r#gen::<Real>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Values are clamped into `[0, 1)` on construction.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    draws: Vec<Real>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(draws: impl IntoIterator<Item = Real>) -> Self {
        let draws = draws
            .into_iter()
            .map(|u| u.clamp(0.0, 1.0 - Real::EPSILON))
            .collect();
        Self { draws, cursor: 0 }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> Real {
        if self.draws.is_empty() {
            return 0.0;
        }
        let u = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        u
    }
}
