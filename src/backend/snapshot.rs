use crate::account::Account;
use crate::util::keccak256;
use florin_bigint::{Address, H256};
use rlp::RlpStream;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// In-memory double of the node's trie store with get/revert/commit
/// semantics: every commit produces a fresh root and earlier roots stay
/// readable. Production persists tries to disk behind the same surface;
/// that is out of scope here.
///
/// A zero root is the empty trie.
pub struct Snapshot {
	store: Rc<RefCell<Store>>,
	height: u64,
	parent_hash: H256,
	root: H256,
}

#[derive(Default)]
struct Store {
	/// Account tries by state root.
	tries: BTreeMap<H256, BTreeMap<Address, Account>>,
	/// Storage sub-tries by storage root.
	storage_tries: BTreeMap<H256, BTreeMap<Vec<u8>, Vec<u8>>>,
	/// Contract code by content hash.
	code: BTreeMap<H256, Vec<u8>>,
}

impl Snapshot {
	/// Empty state at the given block scope.
	pub fn new(height: u64, parent_hash: H256) -> Snapshot {
		Snapshot {
			store: Rc::new(RefCell::new(Store::default())),
			height,
			parent_hash,
			root: H256::zero(),
		}
	}

	/// The same store advanced to another root, as a later block sees it.
	pub fn at_root(&self, root: H256, height: u64, parent_hash: H256) -> Snapshot {
		Snapshot {
			store: self.store.clone(),
			height,
			parent_hash,
			root,
		}
	}

	pub fn height(&self) -> u64 {
		self.height
	}

	pub fn parent_hash(&self) -> H256 {
		self.parent_hash
	}

	/// Base state root of this snapshot.
	pub fn root(&self) -> H256 {
		self.root
	}

	/// Account at the base root.
	pub fn account(&self, address: Address) -> Option<Account> {
		self.store
			.borrow()
			.tries
			.get(&self.root)
			.and_then(|trie| trie.get(&address))
			.cloned()
	}

	/// Storage entry under a storage sub-trie root.
	pub fn storage_value(&self, storage_root: H256, key: &[u8]) -> Option<Vec<u8>> {
		if storage_root.is_zero() {
			return None;
		}
		self.store
			.borrow()
			.storage_tries
			.get(&storage_root)
			.and_then(|trie| trie.get(key))
			.cloned()
	}

	pub fn code(&self, hash: H256) -> Option<Vec<u8>> {
		self.store.borrow().code.get(&hash).cloned()
	}

	/// Fold a delta into a copy of a storage sub-trie; empty values
	/// delete. Returns the new storage root.
	pub fn commit_storage(
		&self,
		base: H256,
		delta: &BTreeMap<Vec<u8>, Vec<u8>>,
	) -> H256 {
		let mut store = self.store.borrow_mut();
		let mut trie = store
			.storage_tries
			.get(&base)
			.cloned()
			.unwrap_or_default();
		for (key, value) in delta {
			if value.is_empty() {
				trie.remove(key);
			} else {
				trie.insert(key.clone(), value.clone());
			}
		}
		let root = storage_trie_root(&trie);
		if !root.is_zero() {
			store.storage_tries.insert(root, trie);
		}
		root
	}

	/// Persist code by content hash.
	pub fn commit_code(&self, code: Vec<u8>) -> H256 {
		let hash = keccak256(&code);
		self.store.borrow_mut().code.insert(hash, code);
		hash
	}

	/// Upsert accounts into a copy of the base trie; `None` removes.
	/// Returns the new state root. The base trie is untouched.
	pub fn commit_accounts(&self, delta: BTreeMap<Address, Option<Account>>) -> H256 {
		let mut store = self.store.borrow_mut();
		let mut trie = store.tries.get(&self.root).cloned().unwrap_or_default();
		for (address, entry) in delta {
			match entry {
				Some(account) => {
					trie.insert(address, account);
				}
				None => {
					trie.remove(&address);
				}
			}
		}
		let root = account_trie_root(&trie);
		if !root.is_zero() {
			store.tries.insert(root, trie);
		}
		root
	}
}

fn storage_trie_root(trie: &BTreeMap<Vec<u8>, Vec<u8>>) -> H256 {
	if trie.is_empty() {
		return H256::zero();
	}
	let mut stream = RlpStream::new_list(trie.len());
	for (key, value) in trie {
		stream.begin_list(2);
		stream.append(key);
		stream.append(value);
	}
	keccak256(&stream.out())
}

fn account_trie_root(trie: &BTreeMap<Address, Account>) -> H256 {
	if trie.is_empty() {
		return H256::zero();
	}
	let mut stream = RlpStream::new_list(trie.len());
	for (address, account) in trie {
		stream.begin_list(2);
		stream.append(&address.as_bytes());
		stream.append(account);
	}
	keccak256(&stream.out())
}

#[cfg(test)]
mod tests {
	use super::*;
	use florin_bigint::U256;

	#[test]
	fn empty_state_has_zero_root() {
		let snapshot = Snapshot::new(0, H256::zero());
		assert!(snapshot.root().is_zero());
		assert_eq!(snapshot.account(Address::zero()), None);
	}

	#[test]
	fn commit_accounts_leaves_base_readable() {
		let snapshot = Snapshot::new(1, H256::zero());
		let addr = Address::from_slice(&[1; 20]);
		let mut account = Account::empty();
		account.balance = U256::from(10u64);

		let mut delta = BTreeMap::new();
		delta.insert(addr, Some(account));
		let root = snapshot.commit_accounts(delta);
		assert!(!root.is_zero());

		// base root still reads as empty
		assert_eq!(snapshot.account(addr), None);

		let advanced = snapshot.at_root(root, 2, H256::zero());
		assert_eq!(
			advanced.account(addr).map(|a| a.balance),
			Some(U256::from(10u64))
		);
	}

	#[test]
	fn storage_commit_deletes_on_empty_value() {
		let snapshot = Snapshot::new(0, H256::zero());

		let mut delta = BTreeMap::new();
		delta.insert(b"k".to_vec(), b"v".to_vec());
		let root = snapshot.commit_storage(H256::zero(), &delta);
		assert_eq!(snapshot.storage_value(root, b"k"), Some(b"v".to_vec()));

		let mut delete = BTreeMap::new();
		delete.insert(b"k".to_vec(), Vec::new());
		let root2 = snapshot.commit_storage(root, &delete);
		assert!(root2.is_zero());
		// earlier root still readable
		assert_eq!(snapshot.storage_value(root, b"k"), Some(b"v".to_vec()));
	}

	#[test]
	fn code_round_trips_by_content_hash() {
		let snapshot = Snapshot::new(0, H256::zero());
		let hash = snapshot.commit_code(vec![0x60, 0x00]);
		assert_eq!(snapshot.code(hash), Some(vec![0x60, 0x00]));
		assert_eq!(snapshot.code(H256::zero()), None);
	}

	#[test]
	fn root_is_order_insensitive() {
		let a = Address::from_slice(&[1; 20]);
		let b = Address::from_slice(&[2; 20]);
		let mut acct = Account::empty();
		acct.nonce = 3;

		let s1 = Snapshot::new(0, H256::zero());
		let mut d1 = BTreeMap::new();
		d1.insert(a, Some(acct.clone()));
		d1.insert(b, Some(acct.clone()));

		let s2 = Snapshot::new(0, H256::zero());
		let mut d2 = BTreeMap::new();
		d2.insert(b, Some(acct.clone()));
		d2.insert(a, Some(acct));

		assert_eq!(s1.commit_accounts(d1), s2.commit_accounts(d2));
	}
}
