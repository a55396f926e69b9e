//! 512-bit intermediates for full-width products and modular reduction.

use std::convert::From;
use std::ops::Add;

use super::algorithms::{add2, div_rem_le};
use crate::U256;

#[repr(C)]
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
/// An unsigned 512-bit integer, sixteen big-endian `u32` words. Only the
/// operations ADDMOD/MULMOD need are provided.
pub struct U512([u32; 16]);

impl U512 {
    pub fn zero() -> U512 {
        U512([0; 16])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|d| *d == 0)
    }

    pub(crate) fn from_raw(raw: [u32; 16]) -> U512 {
        U512(raw)
    }

    /// Reduce by a 256-bit modulus. The modulus must be nonzero.
    pub fn rem_u256(&self, modulus: U256) -> U256 {
        debug_assert!(!modulus.is_zero());

        let mut le: Vec<u32> = self.0.iter().rev().cloned().collect();
        while le.len() > 1 && *le.last().unwrap() == 0 {
            le.pop();
        }
        let full: [u32; 8] = modulus.into();
        let mut mle: Vec<u32> = full.iter().rev().cloned().collect();
        while mle.len() > 1 && *mle.last().unwrap() == 0 {
            mle.pop();
        }

        let (_, r) = div_rem_le(&le, &mle);
        let mut out = [0u32; 8];
        for (i, d) in r.iter().enumerate() {
            out[7 - i] = *d;
        }
        U256::from(out)
    }
}

impl From<U256> for U512 {
    fn from(val: U256) -> U512 {
        let words: [u32; 8] = val.into();
        let mut r = [0u32; 16];
        r[8..].copy_from_slice(&words);
        U512(r)
    }
}

impl From<U512> for U256 {
    /// Truncates to the low 256 bits.
    fn from(val: U512) -> U256 {
        let mut r = [0u32; 8];
        r.copy_from_slice(&val.0[8..]);
        U256::from(r)
    }
}

impl Add<U512> for U512 {
    type Output = U512;

    fn add(mut self, other: U512) -> U512 {
        let U512(ref mut a) = self;
        let U512(ref b) = other;
        add2(a, b);
        U512(*a)
    }
}

#[cfg(test)]
mod tests {
    use super::U512;
    use crate::U256;

    #[test]
    fn full_mul_halves() {
        // max * max = 2^512 - 2^257 + 1; the low half is 1 and the whole
        // product reduces to zero mod (2^256 - 1).
        let p = U256::max_value().full_mul(U256::max_value());
        assert_eq!(U256::from(p), U256::one());
        assert_eq!(p.rem_u256(U256::max_value()), U256::zero());
    }

    #[test]
    fn add_then_reduce() {
        let s = U512::from(U256::max_value()) + U512::from(U256::max_value());
        assert_eq!(s.rem_u256(U256::from(10u64)), U256::zero());
    }

    #[test]
    fn truncation() {
        let p = U256::from(2u64).full_mul(U256::from(3u64));
        assert_eq!(U256::from(p), U256::from(6u64));
    }
}
