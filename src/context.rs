//! Seed-stream context: where in the deterministic sequence a game currently is.
//!
//! A [`Context`] is a plain value. [`Context::draw`] never mutates it; it
//! returns the fraction together with a *new* context that carries the
//! advanced generator state. Hosts persist the latest context between turns
//! and hand it to the resolver, so replays and rollbacks only need the
//! context that was current at the time.
//!
//! # Examples
//!
//! ```rust
//! use tumbler::context::Context;
//!
//! let start = Context::new("hi there");
//! let (ctx1, a) = start.draw();
//! let (_ctx2, b) = ctx1.draw();
//! assert_eq!((a, b), (0.573445922927931, 0.4695413049776107));
//!
//! // Re-drawing from the same context reproduces the same value.
//! assert_eq!(start.draw().1, a);
//! ```

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rng::AleaState;
use crate::utils::clock::Clock;

/// Seed used when a context carries none.
pub const DEFAULT_SEED: &str = "tumbler";

/// A string or numeric seed.
///
/// Numbers are hashed through their canonical decimal text, so
/// `Seed::Int(42)`, `Seed::Float(42.0)` and `Seed::Text("42")` all start the
/// same stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Seed {
    /// The text that is fed to the seed hash.
    #[must_use]
    pub fn to_key(&self) -> String {
        match self {
            Seed::Int(n) => n.to_string(),
            Seed::Float(x) => float_key(*x),
            Seed::Text(s) => s.clone(),
        }
    }
}

fn float_key(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x.is_infinite() {
        (if x > 0.0 { "Infinity" } else { "-Infinity" }).to_string()
    } else if x == 0.0 {
        "0".to_string()
    } else if x.fract() == 0.0 && x.abs() < 1e21 {
        format!("{x:.0}")
    } else {
        format!("{x}")
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key())
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Seed::Text(value.to_string())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Seed::Text(value)
    }
}

impl From<i64> for Seed {
    fn from(value: i64) -> Self {
        Seed::Int(value)
    }
}

impl From<i32> for Seed {
    fn from(value: i32) -> Self {
        Seed::Int(i64::from(value))
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Seed::Int(i64::from(value))
    }
}

impl From<f64> for Seed {
    fn from(value: f64) -> Self {
        Seed::Float(value)
    }
}

/// Seed plus the generator state reached so far.
///
/// Serializes as `{"seed": ..., "prngstate": {...}}`; `prngstate` is absent
/// until the first draw.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<Seed>,
    #[serde(
        default,
        rename = "prngstate",
        skip_serializing_if = "Option::is_none"
    )]
    prng_state: Option<AleaState>,
}

impl Context {
    #[must_use]
    pub fn new(seed: impl Into<Seed>) -> Self {
        Self {
            seed: Some(seed.into()),
            prng_state: None,
        }
    }

    /// A context without a seed. Draws fall back to [`DEFAULT_SEED`].
    #[must_use]
    pub fn unseeded() -> Self {
        Self::default()
    }

    /// Seed from the clock: the time in milliseconds, base 36, last ten digits.
    #[must_use]
    pub fn from_clock(clock: &dyn Clock) -> Self {
        let encoded = to_base36(clock.now_millis());
        let tail = encoded[encoded.len().saturating_sub(10)..].to_string();
        debug!(seed = %tail, "seeding context from clock");
        Self::new(Seed::Text(tail))
    }

    /// Seed from the thread-local OS-seeded generator.
    #[must_use]
    pub fn from_entropy() -> Self {
        let raw: u64 = rand::rng().random();
        Self::new(Seed::Text(to_base36(raw)))
    }

    /// Resume a stream from a persisted generator state.
    #[must_use]
    pub fn with_state(seed: Option<Seed>, state: AleaState) -> Self {
        Self {
            seed,
            prng_state: Some(state),
        }
    }

    #[must_use]
    pub fn seed(&self) -> Option<&Seed> {
        self.seed.as_ref()
    }

    #[must_use]
    pub fn prng_state(&self) -> Option<AleaState> {
        self.prng_state
    }

    fn current_state(&self) -> AleaState {
        match (self.prng_state, &self.seed) {
            (Some(state), _) => state,
            (None, Some(seed)) => AleaState::from_seed(&seed.to_key()),
            (None, None) => AleaState::from_seed(DEFAULT_SEED),
        }
    }

    /// Draw the next fraction in [0, 1) and the context that follows it.
    #[must_use]
    pub fn draw(&self) -> (Context, f64) {
        let (state, fraction) = self.current_state().next();
        (
            Context {
                seed: self.seed.clone(),
                prng_state: Some(state),
            },
            fraction,
        )
    }

    /// Draw `n` fractions in sequence.
    #[must_use]
    pub fn draws(&self, n: usize) -> (Context, Vec<f64>) {
        let mut ctx = self.clone();
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            let (next, f) = ctx.draw();
            out.push(f);
            ctx = next;
        }
        (ctx, out)
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::MockClock;
    use serde_json::json;

    #[test]
    fn pinned_draws_for_text_seed() {
        let ctx = Context::new("hi there");
        let (ctx2, a) = ctx.draw();
        assert_eq!(a, 0.573445922927931);
        let (ctx3, b) = ctx2.draw();
        assert_eq!(b, 0.4695413049776107);
        let (ctx4, c) = ctx3.draw();
        assert_eq!(c, 0.5943194630090147);
        assert_ne!(ctx4, ctx3);
    }

    #[test]
    fn successive_contexts_are_distinct() {
        let mut seen = vec![Context::new(0)];
        for _ in 0..50 {
            let (next, _) = seen.last().unwrap().draw();
            assert!(!seen.contains(&next));
            seen.push(next);
        }
    }

    #[test]
    fn reusing_a_context_replays_the_same_draw() {
        let ctx = Context::new("replay");
        let (_, first) = ctx.draw();
        let (_, again) = ctx.draw();
        assert_eq!(first, again);
    }

    #[test]
    fn independent_streams_with_same_seed_agree() {
        let (_, a) = Context::new("shared").draws(20);
        let (_, b) = Context::new("shared").draws(20);
        assert_eq!(a, b);
    }

    #[test]
    fn numeric_and_text_seeds_agree() {
        assert_eq!(Context::new(42).draws(3).1, Context::new("42").draws(3).1);
        assert_eq!(
            Context::new(42.0).draws(3).1,
            Context::new("42").draws(3).1
        );
        assert_eq!(Context::new(0).draw().1, 0.5945264333859086);
    }

    #[test]
    fn float_seeds_use_canonical_text() {
        assert_eq!(Seed::Float(2.5).to_key(), "2.5");
        assert_eq!(Seed::Float(-0.0).to_key(), "0");
        assert_eq!(Seed::Float(1e3).to_key(), "1000");
        assert_eq!(Seed::Float(f64::INFINITY).to_key(), "Infinity");
    }

    #[test]
    fn unseeded_context_falls_back_to_default_seed() {
        let (_, a) = Context::unseeded().draws(4);
        let (_, b) = Context::new(DEFAULT_SEED).draws(4);
        assert_eq!(a, b);
    }

    #[test]
    fn draw_does_not_touch_the_input() {
        let ctx = Context::new("frozen");
        let before = ctx.clone();
        let _ = ctx.draws(5);
        assert_eq!(ctx, before);
        assert!(ctx.prng_state().is_none());
    }

    #[test]
    fn serde_round_trip_continues_the_stream() {
        let (mid, _) = Context::new("persist me").draws(7);
        let wire = serde_json::to_string(&mid).unwrap();
        let restored: Context = serde_json::from_str(&wire).unwrap();
        assert_eq!(restored, mid);
        assert_eq!(restored.draws(5).1, mid.draws(5).1);
    }

    #[test]
    fn serialized_layout() {
        let fresh = serde_json::to_value(Context::new(0)).unwrap();
        assert_eq!(fresh, json!({"seed": 0}));

        let (advanced, _) = Context::new("x").draw();
        let wire = serde_json::to_value(&advanced).unwrap();
        assert_eq!(wire["seed"], "x");
        for key in ["c", "s0", "s1", "s2"] {
            assert!(wire["prngstate"].get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn accepts_externally_persisted_state() {
        let wire = json!({
            "seed": "hi there",
            "prngstate": {
                "c": 985550,
                "s0": 0.12229331606067717,
                "s1": 0.8348207287490368,
                "s2": 0.573445922927931
            }
        });
        let ctx: Context = serde_json::from_value(wire).unwrap();
        assert_eq!(ctx.draw().1, 0.4695413049776107);
    }

    #[test]
    fn clock_seed_is_reproducible_for_a_fixed_time() {
        let clock = MockClock::from_millis(1_700_000_000_123);
        let a = Context::from_clock(&clock);
        let b = Context::from_clock(&clock);
        assert_eq!(a, b);
        assert_eq!(a.seed(), Some(&Seed::Text(to_base36(1_700_000_000_123))));
        assert!(a.seed().unwrap().to_key().len() <= 10);
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_123), "loyw3v5n");
    }

    #[test]
    fn entropy_seeds_draw_in_range() {
        let (_, fractions) = Context::from_entropy().draws(16);
        assert!(fractions.iter().all(|f| (0.0..1.0).contains(f)));
    }
}
