use crate::util::keccak256;
use florin_bigint::{H256, U256};
use rlp::{Encodable, RlpStream};

/// Digest of empty code, the `code_hash` of accounts without a contract.
pub fn empty_code_hash() -> H256 {
	keccak256(&[])
}

/// One account record as held by the state trie. A zero `storage_root`
/// stands for an empty storage sub-trie.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Account {
	pub nonce: u64,
	pub balance: U256,
	pub storage_root: H256,
	pub code_hash: H256,
}

impl Account {
	pub fn empty() -> Account {
		Account {
			nonce: 0,
			balance: U256::zero(),
			storage_root: H256::zero(),
			code_hash: empty_code_hash(),
		}
	}

	/// Empty accounts are removed from the trie at merge time.
	pub fn is_empty(&self) -> bool {
		self.nonce == 0
			&& self.balance.is_zero()
			&& self.storage_root.is_zero()
			&& self.code_hash == empty_code_hash()
	}

	pub fn has_code(&self) -> bool {
		!self.code_hash.is_zero() && self.code_hash != empty_code_hash()
	}
}

impl Default for Account {
	fn default() -> Account {
		Account::empty()
	}
}

impl Encodable for Account {
	fn rlp_append(&self, s: &mut RlpStream) {
		s.begin_list(4);
		s.append(&self.nonce);
		s.append(&self.balance.to_bytes_trimmed());
		s.append(&self.storage_root.as_bytes());
		s.append(&self.code_hash.as_bytes());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fresh_account_is_empty() {
		assert!(Account::empty().is_empty());
		assert!(!Account::empty().has_code());
	}

	#[test]
	fn balance_makes_nonempty() {
		let mut a = Account::empty();
		a.balance = U256::one();
		assert!(!a.is_empty());
	}

	#[test]
	fn encoding_distinguishes_nonce() {
		let a = Account::empty();
		let mut b = Account::empty();
		b.nonce = 1;
		assert_ne!(rlp::encode(&a), rlp::encode(&b));
	}
}
