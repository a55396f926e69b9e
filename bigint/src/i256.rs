//! Signed view of 256-bit machine words.

use std::cmp::Ordering;
use std::convert::From;
use std::ops::{Div, Rem};

use super::u256::SIGN_BIT_MASK;
use super::{Sign, U256};

#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
/// Sign-and-magnitude view of a two's-complement 256-bit word. Built from
/// a `U256` at the opcode boundary and converted back after computing.
pub struct I256(pub Sign, pub U256);

impl I256 {
    /// Zero value of I256.
    pub fn zero() -> I256 {
        I256(Sign::NoSign, U256::zero())
    }
    /// One value of I256.
    pub fn one() -> I256 {
        I256(Sign::Plus, U256::one())
    }
    /// Maximum value of I256.
    pub fn max_value() -> I256 {
        I256(Sign::Plus, U256::max_value() & SIGN_BIT_MASK)
    }
    /// Minimum value of I256.
    pub fn min_value() -> I256 {
        I256(Sign::Minus, (U256::max_value() & SIGN_BIT_MASK) + U256::one())
    }
}

impl Default for I256 {
    fn default() -> I256 {
        I256::zero()
    }
}

impl From<U256> for I256 {
    fn from(val: U256) -> I256 {
        if val.is_zero() {
            I256::zero()
        } else if val & SIGN_BIT_MASK == val {
            I256(Sign::Plus, val)
        } else {
            I256(Sign::Minus, (!val).wrapping_add(U256::one()))
        }
    }
}

impl From<I256> for U256 {
    fn from(val: I256) -> U256 {
        match val.0 {
            Sign::NoSign => U256::zero(),
            Sign::Plus => val.1,
            Sign::Minus => (!val.1).wrapping_add(U256::one()),
        }
    }
}

impl Ord for I256 {
    fn cmp(&self, other: &I256) -> Ordering {
        match (self.0, other.0) {
            (Sign::NoSign, Sign::NoSign) => Ordering::Equal,
            (Sign::NoSign, Sign::Plus) => Ordering::Less,
            (Sign::NoSign, Sign::Minus) => Ordering::Greater,
            (Sign::Minus, Sign::NoSign) => Ordering::Less,
            (Sign::Minus, Sign::Plus) => Ordering::Less,
            (Sign::Minus, Sign::Minus) => self.1.cmp(&other.1).reverse(),
            (Sign::Plus, Sign::Minus) => Ordering::Greater,
            (Sign::Plus, Sign::NoSign) => Ordering::Greater,
            (Sign::Plus, Sign::Plus) => self.1.cmp(&other.1),
        }
    }
}

impl PartialOrd for I256 {
    fn partial_cmp(&self, other: &I256) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Div for I256 {
    type Output = I256;

    fn div(self, other: I256) -> I256 {
        if other == I256::zero() {
            return I256::zero();
        }

        // The one overflowing quotient wraps back onto itself.
        if self == I256::min_value() && other == I256(Sign::Minus, U256::one()) {
            return I256::min_value();
        }

        let d = self.1 / other.1;

        if d.is_zero() {
            return I256::zero();
        }

        match (self.0, other.0) {
            (Sign::Plus, Sign::Plus) | (Sign::Minus, Sign::Minus) => I256(Sign::Plus, d),
            (Sign::Plus, Sign::Minus) | (Sign::Minus, Sign::Plus) => I256(Sign::Minus, d),
            _ => I256::zero(),
        }
    }
}

impl Rem for I256 {
    type Output = I256;

    /// Remainder takes the sign of the dividend.
    fn rem(self, other: I256) -> I256 {
        let r = (self.1 % other.1) & SIGN_BIT_MASK;

        if r.is_zero() {
            return I256::zero();
        }

        I256(self.0, r)
    }
}

#[cfg(test)]
mod tests {
    use super::I256;
    use crate::U256;
    use std::str::FromStr;

    fn u(s: &str) -> U256 {
        U256::from_str(s).unwrap()
    }

    #[test]
    fn sdiv_min_by_minus_one_wraps() {
        let min = u("0x8000000000000000000000000000000000000000000000000000000000000000");
        let minus_one = U256::max_value();
        let q: U256 = (I256::from(min) / I256::from(minus_one)).into();
        assert_eq!(q, min);
    }

    #[test]
    fn sdiv_min_by_one_is_identity() {
        let min = u("0x8000000000000000000000000000000000000000000000000000000000000000");
        let q: U256 = (I256::from(min) / I256::one()).into();
        assert_eq!(q, min);
        let q: U256 = (I256::from(min) / I256::from(min)).into();
        assert_eq!(q, U256::one());
    }

    #[test]
    fn sdiv_signs() {
        let minus_four: U256 = U256::zero().wrapping_sub(U256::from(4u64));
        let minus_two: U256 = U256::zero().wrapping_sub(U256::from(2u64));
        let two = U256::from(2u64);

        let q: U256 = (I256::from(minus_four) / I256::from(two)).into();
        assert_eq!(q, minus_two);
        let q: U256 = (I256::from(U256::from(4u64)) / I256::from(minus_two)).into();
        assert_eq!(q, minus_two);
        let q: U256 = (I256::from(minus_four) / I256::from(minus_two)).into();
        assert_eq!(q, two);
    }

    #[test]
    fn sdiv_by_zero_is_zero() {
        let q: U256 = (I256::from(U256::from(7u64)) / I256::zero()).into();
        assert_eq!(q, U256::zero());
    }

    #[test]
    fn srem_follows_dividend() {
        let minus_seven = U256::zero().wrapping_sub(U256::from(7u64));
        let minus_one = U256::max_value();
        let minus_three = U256::zero().wrapping_sub(U256::from(3u64));

        let r: U256 = (I256::from(minus_seven) % I256::from(U256::from(3u64))).into();
        assert_eq!(r, minus_one);
        let r: U256 = (I256::from(U256::from(7u64)) % I256::from(minus_three)).into();
        assert_eq!(r, U256::one());
    }

    #[test]
    fn roundtrip_min() {
        let min = u("0x8000000000000000000000000000000000000000000000000000000000000000");
        let back: U256 = I256::from(min).into();
        assert_eq!(back, min);
    }

    #[test]
    fn signed_ordering() {
        let minus_one = I256::from(U256::max_value());
        assert!(minus_one < I256::zero());
        assert!(I256::zero() < I256::one());
        assert!(I256::min_value() < minus_one);
        assert!(I256::one() < I256::max_value());
    }
}
