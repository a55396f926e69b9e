//! # 256-bit unsigned integers
//!
//! Eight big-endian `u32` words. All arithmetic wraps modulo 2^256 and
//! division by zero yields zero, matching the machine-word semantics the
//! interpreter exposes to contract code.

use std::cmp::Ordering;
use std::convert::{AsRef, From, Into};
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Not, Rem, Shl, Shr, Sub};
use std::str::FromStr;

use super::algorithms::{add2, big_digit, div_rem_le, from_signed, mac3, sub2_sign};
use super::{read_hex, ParseHexError, Sign};
use crate::u512::U512;

pub(crate) const SIGN_BIT_MASK: U256 = U256([
    0x7fffffffu32,
    0xffffffffu32,
    0xffffffffu32,
    0xffffffffu32,
    0xffffffffu32,
    0xffffffffu32,
    0xffffffffu32,
    0xffffffffu32,
]);

#[repr(C)]
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
/// Represents an unsigned 256-bit integer.
pub struct U256(pub(crate) [u32; 8]);

impl U256 {
    /// Zero value of U256.
    pub fn zero() -> U256 {
        U256([0; 8])
    }
    /// One value of U256.
    pub fn one() -> U256 {
        1u64.into()
    }

    /// Maximum value of U256.
    pub fn max_value() -> U256 {
        !U256::zero()
    }
    /// Minimum value of U256.
    pub fn min_value() -> U256 {
        U256::zero()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|d| *d == 0)
    }

    /// Add two U256 with overflowing.
    pub fn overflowing_add(mut self, other: U256) -> (U256, bool) {
        let U256(ref mut a) = self;
        let U256(ref b) = other;

        let carry = add2(a, b);
        (U256(*a), carry > 0)
    }

    /// Substract two U256 with underflowing.
    pub fn underflowing_sub(mut self, other: U256) -> (U256, bool) {
        let U256(ref mut a) = self;
        let U256(ref b) = other;

        let sign = sub2_sign(a, b);
        from_signed(sign, a);
        (U256(*a), sign == Sign::Minus)
    }

    /// Multiply two U256 with overflowing.
    pub fn overflowing_mul(mut self, other: U256) -> (U256, bool) {
        let mut ret = [0u32; 8];
        let U256(ref mut a) = self;
        let U256(ref b) = other;

        let mut overflow = false;

        for (i, bi) in b.iter().rev().enumerate() {
            let carry = mac3(&mut ret[0..(8 - i)], a, *bi);
            if carry > 0 {
                overflow = true;
            }
        }

        (U256(ret), overflow)
    }

    pub fn wrapping_add(self, other: U256) -> U256 {
        self.overflowing_add(other).0
    }

    pub fn wrapping_sub(self, other: U256) -> U256 {
        self.underflowing_sub(other).0
    }

    pub fn wrapping_mul(self, other: U256) -> U256 {
        self.overflowing_mul(other).0
    }

    /// Full-width multiplication into a 512-bit product.
    pub fn full_mul(self, other: U256) -> U512 {
        let mut ret = [0u32; 16];
        let U256(ref a) = self;
        let U256(ref b) = other;

        for (i, bi) in b.iter().rev().enumerate() {
            mac3(&mut ret[0..(16 - i)], a, *bi);
        }

        U512::from_raw(ret)
    }

    /// Quotient and remainder in one pass. Divisor zero yields (0, 0).
    pub fn div_rem(self, other: U256) -> (U256, U256) {
        if other.is_zero() {
            return (U256::zero(), U256::zero());
        }
        let (q, r) = div_rem_le(&self.to_le_digits(), &other.to_le_digits());
        (U256::from_le_digits(&q), U256::from_le_digits(&r))
    }

    /// `(self + other) mod modulus` without intermediate truncation.
    /// Modulus zero yields zero.
    pub fn add_mod(self, other: U256, modulus: U256) -> U256 {
        if modulus.is_zero() {
            return U256::zero();
        }
        (U512::from(self) + U512::from(other)).rem_u256(modulus)
    }

    /// `(self * other) mod modulus` over the full 512-bit product.
    /// Modulus zero yields zero.
    pub fn mul_mod(self, other: U256, modulus: U256) -> U256 {
        if modulus.is_zero() {
            return U256::zero();
        }
        self.full_mul(other).rem_u256(modulus)
    }

    /// Exponentiation by squaring, mod 2^256.
    pub fn pow(self, other: U256) -> U256 {
        let mut base = self;
        let mut exp = other;
        let mut acc = U256::one();

        while !exp.is_zero() {
            if exp.bit(0) {
                acc = acc.wrapping_mul(base);
            }
            base = base.wrapping_mul(base);
            exp = exp >> 1;
        }

        acc
    }

    /// Bits needed to represent this value.
    pub fn bits(&self) -> usize {
        let &U256(ref arr) = self;
        let mut current_bits = 0;
        for i in (0..8).rev() {
            if arr[i] == 0 {
                continue;
            }

            current_bits = (32 - arr[i].leading_zeros() as usize) + ((7 - i) * 32);
        }
        current_bits
    }

    /// The `index`-th bit, counted from the least significant.
    pub fn bit(&self, index: usize) -> bool {
        debug_assert!(index < 256);
        (self.0[7 - index / 32] >> (index % 32)) & 1 == 1
    }

    /// The `index`-th byte, counted from the least significant.
    pub fn byte(&self, index: usize) -> u8 {
        debug_assert!(index < 32);
        (self.0[7 - index / 4] >> ((index % 4) * 8)) as u8
    }

    /// The low 64 bits, truncating.
    pub fn low_u64(&self) -> u64 {
        let lo = self.0[7] as u64;
        let hi = self.0[6] as u64;
        lo | (hi << 32)
    }

    /// Big-endian bytes with leading zeros stripped. Zero encodes as an
    /// empty vector.
    pub fn to_bytes_trimmed(&self) -> Vec<u8> {
        let full: [u8; 32] = (*self).into();
        let skip = full.iter().take_while(|b| **b == 0).count();
        full[skip..].to_vec()
    }

    fn to_le_digits(&self) -> Vec<u32> {
        let mut le: Vec<u32> = self.0.iter().rev().cloned().collect();
        while le.len() > 1 && *le.last().unwrap() == 0 {
            le.pop();
        }
        le
    }

    fn from_le_digits(le: &[u32]) -> U256 {
        debug_assert!(le.len() <= 8);
        let mut r = [0u32; 8];
        for (i, d) in le.iter().enumerate() {
            r[7 - i] = *d;
        }
        U256(r)
    }
}

// Froms, Intos and Defaults

impl Default for U256 {
    fn default() -> U256 {
        U256::zero()
    }
}

impl FromStr for U256 {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<U256, ParseHexError> {
        let bytes = read_hex(s)?;
        if bytes.len() > 32 {
            return Err(ParseHexError::TooLong);
        }
        Ok(U256::from(bytes.as_ref()))
    }
}

impl From<bool> for U256 {
    fn from(val: bool) -> U256 {
        if val {
            U256::one()
        } else {
            U256::zero()
        }
    }
}

impl From<u64> for U256 {
    fn from(val: u64) -> U256 {
        U256([
            0,
            0,
            0,
            0,
            0,
            0,
            big_digit::get_hi(val),
            big_digit::get_lo(val),
        ])
    }
}

impl From<usize> for U256 {
    fn from(val: usize) -> U256 {
        (val as u64).into()
    }
}

impl<'a> From<&'a [u8]> for U256 {
    fn from(val: &'a [u8]) -> U256 {
        debug_assert!(val.len() <= 32);

        let mut r = [0u8; 32];
        let reserved = 32 - val.len();

        r[reserved..].copy_from_slice(val);
        r.into()
    }
}

impl From<[u8; 32]> for U256 {
    fn from(val: [u8; 32]) -> U256 {
        let mut r = [0u32; 8];
        for i in 0..8 {
            r[i] = (val[i * 4] as u32) << 24
                | (val[i * 4 + 1] as u32) << 16
                | (val[i * 4 + 2] as u32) << 8
                | (val[i * 4 + 3] as u32);
        }
        U256(r)
    }
}

impl Into<[u8; 32]> for U256 {
    fn into(self) -> [u8; 32] {
        let mut r = [0u8; 32];
        for i in 0..8 {
            r[i * 4] = (self.0[i] >> 24) as u8;
            r[i * 4 + 1] = (self.0[i] >> 16) as u8;
            r[i * 4 + 2] = (self.0[i] >> 8) as u8;
            r[i * 4 + 3] = self.0[i] as u8;
        }
        r
    }
}

impl From<[u32; 8]> for U256 {
    fn from(val: [u32; 8]) -> U256 {
        U256(val)
    }
}

impl Into<[u32; 8]> for U256 {
    fn into(self) -> [u32; 8] {
        self.0
    }
}

// Ord

impl Ord for U256 {
    fn cmp(&self, other: &U256) -> Ordering {
        let &U256(ref me) = self;
        let &U256(ref you) = other;
        for i in 0..8 {
            if me[i] < you[i] {
                return Ordering::Less;
            }
            if me[i] > you[i] {
                return Ordering::Greater;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &U256) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl BitAnd<U256> for U256 {
    type Output = U256;

    fn bitand(self, other: U256) -> U256 {
        let mut r = self;
        for i in 0..8 {
            r.0[i] &= other.0[i];
        }
        r
    }
}

impl BitOr<U256> for U256 {
    type Output = U256;

    fn bitor(self, other: U256) -> U256 {
        let mut r = self;
        for i in 0..8 {
            r.0[i] |= other.0[i];
        }
        r
    }
}

impl BitXor<U256> for U256 {
    type Output = U256;

    fn bitxor(self, other: U256) -> U256 {
        let mut r = self;
        for i in 0..8 {
            r.0[i] ^= other.0[i];
        }
        r
    }
}

impl Shl<usize> for U256 {
    type Output = U256;

    fn shl(self, shift: usize) -> U256 {
        let U256(ref original) = self;
        let mut ret = [0u32; 8];
        let word_shift = shift / 32;
        let bit_shift = shift % 32;
        for i in (0..8).rev() {
            // Shift
            if i >= word_shift {
                ret[i - word_shift] |= original[i] << bit_shift;
            }
            // Carry
            if bit_shift > 0 && i >= word_shift + 1 {
                ret[i - word_shift - 1] |= original[i] >> (32 - bit_shift);
            }
        }
        U256(ret)
    }
}

impl Shr<usize> for U256 {
    type Output = U256;

    fn shr(self, shift: usize) -> U256 {
        let U256(ref original) = self;
        let mut ret = [0u32; 8];
        let word_shift = shift / 32;
        let bit_shift = shift % 32;
        for i in (0..8).rev() {
            // Shift
            if i + word_shift < 8 {
                ret[i + word_shift] |= original[i] >> bit_shift;
            }
            // Carry
            if bit_shift > 0 && i > 0 && i + word_shift < 8 {
                ret[i + word_shift] |= original[i - 1] << (32 - bit_shift);
            }
        }
        U256(ret)
    }
}

// Operators wrap mod 2^256. Callers that need the carry use the
// overflowing_ variants.

impl Add<U256> for U256 {
    type Output = U256;

    fn add(self, other: U256) -> U256 {
        self.wrapping_add(other)
    }
}

impl Sub<U256> for U256 {
    type Output = U256;

    fn sub(self, other: U256) -> U256 {
        self.wrapping_sub(other)
    }
}

impl Mul<U256> for U256 {
    type Output = U256;

    fn mul(self, other: U256) -> U256 {
        self.wrapping_mul(other)
    }
}

impl Div for U256 {
    type Output = U256;

    fn div(self, other: U256) -> U256 {
        self.div_rem(other).0
    }
}

impl Rem for U256 {
    type Output = U256;

    fn rem(self, other: U256) -> U256 {
        self.div_rem(other).1
    }
}

impl Not for U256 {
    type Output = U256;

    fn not(self) -> U256 {
        let U256(ref arr) = self;
        let mut ret = [0u32; 8];
        for i in 0..8 {
            ret[i] = !arr[i];
        }
        U256(ret)
    }
}

impl fmt::LowerHex for U256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for i in 0..8 {
            write!(f, "{:08x}", self.0[i])?;
        }
        Ok(())
    }
}

impl fmt::UpperHex for U256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for i in 0..8 {
            write!(f, "{:08X}", self.0[i])?;
        }
        Ok(())
    }
}
