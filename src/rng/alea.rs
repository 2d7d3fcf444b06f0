//! Alea, a small multiply-with-carry generator over doubles.
//!
//! The whole generator state is four numbers, so it is `Copy` and can be
//! embedded in a [`Context`](crate::context::Context) after every draw.

use serde::{Deserialize, Serialize};

use super::TWO_POW_NEG_32;
use super::mash::Mash;

const ALEA_MULTIPLIER: f64 = 2_091_639.0;

/// Snapshot of the generator: carry `c` and the three lagged values.
///
/// Field names match the persisted `prngstate` layout used by existing hosts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AleaState {
    pub c: f64,
    pub s0: f64,
    pub s1: f64,
    pub s2: f64,
}

impl AleaState {
    /// Seed a fresh generator from the textual form of a seed.
    #[must_use]
    pub fn from_seed(seed: &str) -> Self {
        let mut mash = Mash::new();
        let mut s0 = mash.mash(" ");
        let mut s1 = mash.mash(" ");
        let mut s2 = mash.mash(" ");

        s0 -= mash.mash(seed);
        if s0 < 0.0 {
            s0 += 1.0;
        }
        s1 -= mash.mash(seed);
        if s1 < 0.0 {
            s1 += 1.0;
        }
        s2 -= mash.mash(seed);
        if s2 < 0.0 {
            s2 += 1.0;
        }

        Self { c: 1.0, s0, s1, s2 }
    }

    /// Advance once, returning the next state and a fraction in [0, 1).
    #[must_use]
    pub fn next(self) -> (Self, f64) {
        let t = ALEA_MULTIPLIER * self.s0 + self.c * TWO_POW_NEG_32;
        let c = t.trunc();
        let s2 = t - c;
        (
            Self {
                c,
                s0: self.s1,
                s1: self.s2,
                s2,
            },
            s2,
        )
    }
}
