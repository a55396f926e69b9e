//! Fixed-width byte newtypes: 256-bit hashes and 160-bit addresses.

use std::fmt;
use std::str::FromStr;

use super::{read_hex, ParseHexError, U256};

#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Default)]
/// A 256-bit digest or storage key.
pub struct H256([u8; 32]);

impl H256 {
    pub fn zero() -> H256 {
        H256([0; 32])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Builds from big-endian bytes, right-aligned and zero-padded.
    /// Slices longer than 32 bytes keep the low 32.
    pub fn from_slice(val: &[u8]) -> H256 {
        let mut r = [0u8; 32];
        if val.len() >= 32 {
            r.copy_from_slice(&val[val.len() - 32..]);
        } else {
            r[32 - val.len()..].copy_from_slice(val);
        }
        H256(r)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for H256 {
    fn from(val: [u8; 32]) -> H256 {
        H256(val)
    }
}

impl From<H256> for [u8; 32] {
    fn from(val: H256) -> [u8; 32] {
        val.0
    }
}

impl From<U256> for H256 {
    fn from(val: U256) -> H256 {
        H256(val.into())
    }
}

impl From<H256> for U256 {
    fn from(val: H256) -> U256 {
        U256::from(val.0)
    }
}

impl FromStr for H256 {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<H256, ParseHexError> {
        let bytes = read_hex(s)?;
        if bytes.len() > 32 {
            return Err(ParseHexError::TooLong);
        }
        Ok(H256::from_slice(&bytes))
    }
}

impl fmt::LowerHex for H256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:x}", self)
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:x}", self)
    }
}

#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Default)]
/// A 160-bit account address.
pub struct Address([u8; 20]);

impl Address {
    pub fn zero() -> Address {
        Address([0; 20])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Builds from big-endian bytes, right-aligned and zero-padded.
    /// Slices longer than 20 bytes keep the low 20.
    pub fn from_slice(val: &[u8]) -> Address {
        let mut r = [0u8; 20];
        if val.len() >= 20 {
            r.copy_from_slice(&val[val.len() - 20..]);
        } else {
            r[20 - val.len()..].copy_from_slice(val);
        }
        Address(r)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(val: [u8; 20]) -> Address {
        Address(val)
    }
}

impl From<H256> for Address {
    /// The low 20 bytes of a digest.
    fn from(val: H256) -> Address {
        Address::from_slice(&val.0[12..])
    }
}

impl From<Address> for H256 {
    fn from(val: Address) -> H256 {
        H256::from_slice(&val.0)
    }
}

impl From<Address> for U256 {
    fn from(val: Address) -> U256 {
        U256::from(&val.0[..])
    }
}

impl From<U256> for Address {
    /// The low 20 bytes of a 256-bit word.
    fn from(val: U256) -> Address {
        let raw: [u8; 32] = val.into();
        Address::from_slice(&raw[12..])
    }
}

impl FromStr for Address {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<Address, ParseHexError> {
        let bytes = read_hex(s)?;
        if bytes.len() > 20 {
            return Err(ParseHexError::TooLong);
        }
        Ok(Address::from_slice(&bytes))
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:x}", self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:x}", self)
    }
}
