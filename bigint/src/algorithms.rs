use super::Sign;
use std::cmp::Ordering::{self, Equal, Greater, Less};

#[allow(non_snake_case)]
pub mod big_digit {
    /// A `BigDigit` is the composing element of fixed-width integers here.
    pub type BigDigit = u32;

    /// A `DoubleBigDigit` is the internal type used to do the computations.
    /// Its size is the double of the size of `BigDigit`.
    pub type DoubleBigDigit = u64;

    // `DoubleBigDigit` size dependent
    pub const BITS: usize = 32;

    pub const BASE: DoubleBigDigit = 1 << BITS;
    const LO_MASK: DoubleBigDigit = (-1i32 as DoubleBigDigit) >> BITS;

    #[inline]
    pub fn get_hi(n: DoubleBigDigit) -> BigDigit {
        (n >> BITS) as BigDigit
    }
    #[inline]
    pub fn get_lo(n: DoubleBigDigit) -> BigDigit {
        (n & LO_MASK) as BigDigit
    }

    /// Split one `DoubleBigDigit` into two `BigDigit`s.
    #[inline]
    pub fn from_doublebigdigit(n: DoubleBigDigit) -> (BigDigit, BigDigit) {
        (get_hi(n), get_lo(n))
    }
}

use self::big_digit::{BigDigit, DoubleBigDigit};

// Generic functions for add/subtract/multiply with carry/borrow.
// Slices are big-endian: index 0 is the most significant digit.

// Add with carry:
#[inline]
fn adc(a: BigDigit, b: BigDigit, carry: &mut BigDigit) -> BigDigit {
    let (hi, lo) = big_digit::from_doublebigdigit(
        (a as DoubleBigDigit) + (b as DoubleBigDigit) + (*carry as DoubleBigDigit),
    );

    *carry = hi;
    lo
}

// Subtract with borrow:
#[inline]
fn sbb(a: BigDigit, b: BigDigit, borrow: &mut BigDigit) -> BigDigit {
    let (hi, lo) = big_digit::from_doublebigdigit(
        big_digit::BASE + (a as DoubleBigDigit)
            - (b as DoubleBigDigit)
            - (*borrow as DoubleBigDigit),
    );
    // hi * (base) + lo == 1*(base) + ai - bi - borrow
    // => ai - bi - borrow < 0 <=> hi == 0
    *borrow = (hi == 0) as BigDigit;
    lo
}

#[inline]
pub fn mac_with_carry(a: BigDigit, b: BigDigit, c: BigDigit, carry: &mut BigDigit) -> BigDigit {
    let (hi, lo) = big_digit::from_doublebigdigit(
        (a as DoubleBigDigit) + (b as DoubleBigDigit) * (c as DoubleBigDigit)
            + (*carry as DoubleBigDigit),
    );
    *carry = hi;
    lo
}

pub fn inc(a: &mut [BigDigit]) -> BigDigit {
    let mut carry = 1;

    for ai in a.iter_mut().rev() {
        if carry == 0 {
            break;
        }
        *ai = adc(*ai, 0, &mut carry);
    }

    carry
}

pub fn add2(a: &mut [BigDigit], b: &[BigDigit]) -> BigDigit {
    debug_assert!(a.len() == b.len());

    let mut carry = 0;

    for (a, b) in a.iter_mut().zip(b.iter()).rev() {
        *a = adc(*a, *b, &mut carry);
    }

    carry
}

pub fn sub2(a: &mut [BigDigit], b: &[BigDigit]) -> BigDigit {
    debug_assert!(a.len() == b.len());

    let mut borrow: BigDigit = 0;

    for (a, b) in a.iter_mut().zip(b.iter()).rev() {
        *a = sbb(*a, *b, &mut borrow);
    }

    borrow
}

pub fn sub2_rev(a: &[BigDigit], b: &mut [BigDigit]) -> BigDigit {
    debug_assert!(b.len() == a.len());

    let mut borrow: BigDigit = 0;

    for (a, b) in a.iter().zip(b.iter_mut()).rev() {
        *b = sbb(*a, *b, &mut borrow);
    }

    borrow
}

pub fn sub2_sign(a: &mut [BigDigit], b: &[BigDigit]) -> Sign {
    match cmp_slice(a, b) {
        Greater => {
            sub2(a, b);
            Sign::Plus
        }
        Less => {
            sub2_rev(b, a);
            Sign::Minus
        }
        _ => {
            sub2(a, b);
            Sign::NoSign
        }
    }
}

/// Rewrites a magnitude into its two's-complement form when the sign is
/// negative. No-op otherwise.
pub fn from_signed(sign: Sign, a: &mut [BigDigit]) {
    if sign != Sign::Minus {
        return;
    }
    for ai in a.iter_mut() {
        *ai = !*ai;
    }
    inc(a);
}

/// Three argument multiply accumulate:
/// acc += b * c
pub fn mac3(acc: &mut [BigDigit], b: &[BigDigit], c: BigDigit) -> BigDigit {
    if c == 0 {
        return 0;
    }

    let mut b_iter = b.iter().rev();
    let mut carry = 0;

    for ai in acc.iter_mut().rev() {
        if let Some(bi) = b_iter.next() {
            *ai = mac_with_carry(*ai, *bi, c, &mut carry);
        } else if carry != 0 {
            *ai = mac_with_carry(*ai, 0, c, &mut carry);
        } else {
            break;
        }
    }

    carry
}

pub fn cmp_slice(a: &[BigDigit], b: &[BigDigit]) -> Ordering {
    debug_assert!(a.len() == b.len());

    for (&ai, &bi) in a.iter().zip(b) {
        if ai < bi {
            return Less;
        }
        if ai > bi {
            return Greater;
        }
    }
    Equal
}

// Long division below works on little-endian digit vectors with no leading
// zero digit (except the canonical zero, `[0]`). The big-endian callers in
// u256/u512 convert at the boundary.

fn cmp_le_slice(a: &[BigDigit], b: &[BigDigit]) -> Ordering {
    if a.len() != b.len() {
        return a.len().cmp(&b.len());
    }
    for (&ai, &bi) in a.iter().zip(b).rev() {
        match ai.cmp(&bi) {
            Equal => (),
            other => return other,
        }
    }
    Equal
}

fn trim_le(a: &mut Vec<BigDigit>) {
    while a.len() > 1 && *a.last().unwrap() == 0 {
        a.pop();
    }
}

// Shift left by `s` bits, s < 32, growing by one digit.
fn shl_le(src: &[BigDigit], s: u32) -> Vec<BigDigit> {
    let mut out = vec![0; src.len() + 1];
    if s == 0 {
        out[..src.len()].copy_from_slice(src);
        return out;
    }
    let mut carry = 0;
    for (i, &d) in src.iter().enumerate() {
        out[i] = (d << s) | carry;
        carry = d >> (32 - s);
    }
    out[src.len()] = carry;
    out
}

fn div_rem_small(u: &[BigDigit], d: BigDigit) -> (Vec<BigDigit>, Vec<BigDigit>) {
    let d = d as DoubleBigDigit;
    let mut q = vec![0; u.len()];
    let mut r: DoubleBigDigit = 0;
    for i in (0..u.len()).rev() {
        let acc = (r << 32) | u[i] as DoubleBigDigit;
        q[i] = (acc / d) as BigDigit;
        r = acc % d;
    }
    trim_le(&mut q);
    (q, vec![r as BigDigit])
}

/// Knuth Algorithm D long division on little-endian, trimmed digit
/// vectors. The divisor must be nonzero. Returns (quotient, remainder),
/// both trimmed.
pub fn div_rem_le(u: &[BigDigit], v: &[BigDigit]) -> (Vec<BigDigit>, Vec<BigDigit>) {
    debug_assert!(!v.is_empty() && !(v.len() > 1 && *v.last().unwrap() == 0));
    debug_assert!(!(v.len() == 1 && v[0] == 0));

    if cmp_le_slice(u, v) == Less {
        return (vec![0], u.to_vec());
    }
    if v.len() == 1 {
        return div_rem_small(u, v[0]);
    }

    let n = v.len();
    let m = u.len() - n;

    // D1: normalize so the divisor's top digit has its high bit set.
    let s = v[n - 1].leading_zeros();
    let mut vn = shl_le(v, s);
    vn.truncate(n);
    let mut un = shl_le(u, s);

    let mut q = vec![0; m + 1];

    for j in (0..=m).rev() {
        // D3: estimate the quotient digit from the top two dividend
        // digits, then correct it at most twice.
        let top = ((un[j + n] as DoubleBigDigit) << 32) | un[j + n - 1] as DoubleBigDigit;
        let mut qhat = top / vn[n - 1] as DoubleBigDigit;
        let mut rhat = top % vn[n - 1] as DoubleBigDigit;

        loop {
            if qhat >= big_digit::BASE
                || qhat * vn[n - 2] as DoubleBigDigit
                    > (rhat << 32) | un[j + n - 2] as DoubleBigDigit
            {
                qhat -= 1;
                rhat += vn[n - 1] as DoubleBigDigit;
                if rhat < big_digit::BASE {
                    continue;
                }
            }
            break;
        }

        // D4: multiply and subtract.
        let mut borrow: i64 = 0;
        let mut carry: DoubleBigDigit = 0;
        for i in 0..n {
            let p = qhat * vn[i] as DoubleBigDigit + carry;
            carry = p >> 32;
            let t = un[i + j] as i64 - (p & 0xffff_ffff) as i64 - borrow;
            un[i + j] = t as BigDigit;
            borrow = (t < 0) as i64;
        }
        let t = un[j + n] as i64 - carry as i64 - borrow;
        un[j + n] = t as BigDigit;

        // D6: the estimate was one too large; add the divisor back.
        if t < 0 {
            qhat -= 1;
            let mut c: DoubleBigDigit = 0;
            for i in 0..n {
                let sum = un[i + j] as DoubleBigDigit + vn[i] as DoubleBigDigit + c;
                un[i + j] = sum as BigDigit;
                c = sum >> 32;
            }
            un[j + n] = un[j + n].wrapping_add(c as BigDigit);
        }

        q[j] = qhat as BigDigit;
    }

    // D8: denormalize the remainder.
    let mut r = vec![0; n];
    if s == 0 {
        r.copy_from_slice(&un[..n]);
    } else {
        for i in 0..n {
            r[i] = (un[i] >> s) | (un[i + 1] << (32 - s));
        }
    }

    trim_le(&mut q);
    trim_le(&mut r);
    (q, r)
}
