//! Mash, the string hash Alea uses to turn a seed into its initial state.
//!
//! The arithmetic is carried out in `f64` with explicit 32-bit wraparound so
//! that every intermediate matches the reference generator exactly.

use super::{TWO_POW_32, TWO_POW_NEG_32};

const MASH_INIT: u32 = 0xefc8_249d;
const MASH_MULTIPLIER: f64 = 0.025_196_032_824_169_38;

/// Stateful hasher. Successive calls continue from the previous state, which
/// is how Alea derives three different values from the same input.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Mash {
    n: f64,
}

impl Mash {
    pub(crate) fn new() -> Self {
        Self {
            n: f64::from(MASH_INIT),
        }
    }

    /// Hash `data` (as UTF-16 code units) into a fraction in [0, 1).
    pub(crate) fn mash(&mut self, data: &str) -> f64 {
        let mut n = self.n;
        for unit in data.encode_utf16() {
            n += f64::from(unit);
            let mut h = MASH_MULTIPLIER * n;
            n = to_uint32(h);
            h -= n;
            h *= n;
            n = to_uint32(h);
            h -= n;
            n += h * TWO_POW_32;
        }
        self.n = n;
        to_uint32(n) * TWO_POW_NEG_32
    }
}

/// Truncate a non-negative double and wrap it into the u32 range.
fn to_uint32(x: f64) -> f64 {
    ((x as u64) & 0xffff_ffff) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successive_hashes_continue_the_state() {
        let mut mash = Mash::new();
        assert_eq!(mash.mash(" "), 0.8633289230056107);
        assert_eq!(mash.mash(" "), 0.15019597788341343);
        assert_eq!(mash.mash(" "), 0.9176952994894236);
        assert_eq!(mash.mash("hi there"), 0.3921431335620582);
    }

    #[test]
    fn wraps_like_unsigned_32_bit() {
        assert_eq!(to_uint32(4_294_967_296.0), 0.0);
        assert_eq!(to_uint32(4_294_967_297.9), 1.0);
        assert_eq!(to_uint32(12.7), 12.0);
    }
}
