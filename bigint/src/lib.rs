//! Fixed-width integer arithmetic for the Florin contract machine.
//!
//! All 256-bit values are held as eight big-endian `u32` words. Every
//! operation is total: results wrap modulo 2^256 and division by zero
//! yields zero, so callers never have to branch on arithmetic errors.

mod algorithms;
mod hash;
mod i256;
mod u256;
mod u512;

pub use self::hash::{Address, H256};
pub use self::i256::I256;
pub use self::u256::U256;
pub use self::u512::U512;

#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
/// Sign of an integer.
pub enum Sign {
    Minus,
    NoSign,
    Plus,
}

#[derive(Debug, Eq, PartialEq)]
/// Errors exhibited from `read_hex`.
pub enum ParseHexError {
    InvalidCharacter,
    TooLong,
}

/// Parses a hex string, with or without a leading `0x`, into bytes.
/// Odd-length strings are interpreted with an implied leading zero.
pub fn read_hex(s: &str) -> Result<Vec<u8>, ParseHexError> {
    let s = if s.starts_with("0x") { &s[2..] } else { s };

    let mut res = Vec::with_capacity(s.len() / 2 + 1);
    let mut cur = 0u8;
    let mut half = s.len() & 1 == 1;

    for c in s.chars() {
        let v = match c.to_digit(16) {
            Some(v) => v as u8,
            None => return Err(ParseHexError::InvalidCharacter),
        };
        if half {
            res.push(cur << 4 | v);
            cur = 0;
        } else {
            cur = v;
        }
        half = !half;
    }

    Ok(res)
}
