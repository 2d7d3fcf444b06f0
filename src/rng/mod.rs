//! The seed stream.
//!
//! - `mash`: seed hashing.
//! - `alea`: the generator and its copyable state.
//!
//! Nothing in here keeps global state. A draw takes a
//! [`Context`](crate::context::Context) and hands back a new one.

mod alea;
mod mash;

pub use alea::AleaState;

use crate::context::Context;

pub(crate) const TWO_POW_32: f64 = 4_294_967_296.0;
pub(crate) const TWO_POW_NEG_32: f64 = 2.328_306_436_538_696_3e-10;

/// Draw the next fraction in [0, 1) from `ctx`.
///
/// Equivalent to [`Context::draw`]; provided for hosts that prefer a free
/// function at the call site.
///
/// ```rust
/// use tumbler::{context::Context, rng};
///
/// let ctx = Context::new("hi there");
/// let (next, f) = rng::draw(&ctx);
/// assert_eq!(f, 0.573445922927931);
/// assert_ne!(next, ctx);
/// ```
#[must_use]
pub fn draw(ctx: &Context) -> (Context, f64) {
    ctx.draw()
}
