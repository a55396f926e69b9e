use crate::account::{empty_code_hash, Account};
use crate::backend::Snapshot;
use crate::builtin::Builtin;
use florin_bigint::{Address, H256, U256};
use florin_core::ExitError;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Copy-on-write state frame. Each call frame owns its parent chain
/// exclusively; a live child never mutates its parent, so rolling a
/// frame back is dropping its dirty maps.
///
/// Account tombstones are `None` entries; storage tombstones are empty
/// values.
pub struct Overlay {
	parent: Option<Box<Overlay>>,
	snapshot: Rc<Snapshot>,
	accounts: BTreeMap<Address, Option<Account>>,
	storage: BTreeMap<Address, BTreeMap<Vec<u8>, Vec<u8>>>,
	code: BTreeMap<Address, Vec<u8>>,
	builtins: Rc<BTreeMap<Address, Rc<dyn Builtin>>>,
	is_static: bool,
}

// builtins are trait objects; list their addresses instead
impl fmt::Debug for Overlay {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Overlay")
			.field("parent", &self.parent)
			.field("accounts", &self.accounts)
			.field("storage", &self.storage)
			.field("code", &self.code)
			.field("builtins", &self.builtins.keys().collect::<Vec<_>>())
			.field("is_static", &self.is_static)
			.finish()
	}
}

impl Overlay {
	pub fn new(snapshot: Rc<Snapshot>) -> Overlay {
		Overlay::with_builtins(snapshot, Rc::new(BTreeMap::new()))
	}

	pub fn with_builtins(
		snapshot: Rc<Snapshot>,
		builtins: Rc<BTreeMap<Address, Rc<dyn Builtin>>>,
	) -> Overlay {
		Overlay {
			parent: None,
			snapshot,
			accounts: BTreeMap::new(),
			storage: BTreeMap::new(),
			code: BTreeMap::new(),
			builtins,
			is_static: false,
		}
	}

	/// Push a child frame. The static flag is sticky down the chain.
	pub fn begin(self, is_static: bool) -> Overlay {
		let snapshot = self.snapshot.clone();
		let builtins = self.builtins.clone();
		let is_static = self.is_static || is_static;
		Overlay {
			parent: Some(Box::new(self)),
			snapshot,
			accounts: BTreeMap::new(),
			storage: BTreeMap::new(),
			code: BTreeMap::new(),
			builtins,
			is_static,
		}
	}

	/// Pop this frame, folding its dirty maps into the parent. A frame
	/// without a parent commits to nothing and survives unchanged.
	pub fn commit(mut self) -> Overlay {
		match self.parent.take() {
			Some(mut parent) => {
				for (address, entry) in self.accounts {
					parent.accounts.insert(address, entry);
				}
				for (address, delta) in self.storage {
					let slot = parent.storage.entry(address).or_default();
					for (key, value) in delta {
						slot.insert(key, value);
					}
				}
				for (address, code) in self.code {
					parent.code.insert(address, code);
				}
				*parent
			}
			None => self,
		}
	}

	/// Pop this frame, discarding its dirty maps.
	pub fn rollback(mut self) -> Overlay {
		match self.parent.take() {
			Some(parent) => *parent,
			None => {
				self.accounts.clear();
				self.storage.clear();
				self.code.clear();
				self
			}
		}
	}

	pub fn is_static(&self) -> bool {
		self.is_static
	}

	pub fn snapshot(&self) -> Rc<Snapshot> {
		self.snapshot.clone()
	}

	pub fn height(&self) -> u64 {
		self.snapshot.height()
	}

	pub fn parent_hash(&self) -> H256 {
		self.snapshot.parent_hash()
	}

	/// Root of the base trie underneath every frame.
	pub fn trie_root(&self) -> H256 {
		self.snapshot.root()
	}

	pub fn builtin(&self, address: Address) -> Option<Rc<dyn Builtin>> {
		self.builtins.get(&address).cloned()
	}

	/// Dirty chain first, then the base trie, then a synthesized empty
	/// account.
	pub fn account(&self, address: Address) -> Account {
		match self.lookup(address) {
			Some(Some(account)) => account,
			Some(None) => Account::empty(),
			None => self.snapshot.account(address).unwrap_or_default(),
		}
	}

	fn lookup(&self, address: Address) -> Option<Option<Account>> {
		if let Some(entry) = self.accounts.get(&address) {
			return Some(entry.clone());
		}
		self.parent.as_ref().and_then(|p| p.lookup(address))
	}

	/// Code of an account, through dirty frames down to the code store.
	pub fn code(&self, address: Address) -> Vec<u8> {
		if let Some(code) = self.dirty_code(address) {
			return code;
		}
		let account = self.account(address);
		if !account.has_code() {
			return Vec::new();
		}
		self.snapshot.code(account.code_hash).unwrap_or_default()
	}

	fn dirty_code(&self, address: Address) -> Option<Vec<u8>> {
		if let Some(code) = self.code.get(&address) {
			return Some(code.clone());
		}
		self.parent.as_ref().and_then(|p| p.dirty_code(address))
	}

	/// Read a storage entry; missing entries read as empty. A dirty
	/// tombstone shadows the base trie.
	pub fn db_get(&self, address: Address, key: &[u8]) -> Vec<u8> {
		if let Some(value) = self.dirty_storage(address, key) {
			return value;
		}
		let account = self.account(address);
		self.snapshot
			.storage_value(account.storage_root, key)
			.unwrap_or_default()
	}

	fn dirty_storage(&self, address: Address, key: &[u8]) -> Option<Vec<u8>> {
		if let Some(value) = self.storage.get(&address).and_then(|s| s.get(key)) {
			return Some(value.clone());
		}
		self.parent
			.as_ref()
			.and_then(|p| p.dirty_storage(address, key))
	}

	/// Write a storage entry into this frame. An empty value is a
	/// tombstone.
	pub fn db_set(&mut self, address: Address, key: &[u8], value: &[u8]) -> Result<(), ExitError> {
		self.check_writable()?;
		self.storage
			.entry(address)
			.or_default()
			.insert(key.to_vec(), value.to_vec());
		Ok(())
	}

	pub fn db_remove(&mut self, address: Address, key: &[u8]) -> Result<(), ExitError> {
		self.db_set(address, key, &[])
	}

	pub fn set_account(&mut self, address: Address, account: Account) -> Result<(), ExitError> {
		self.check_writable()?;
		self.accounts.insert(address, Some(account));
		Ok(())
	}

	pub fn set_nonce(&mut self, address: Address, nonce: u64) -> Result<(), ExitError> {
		let mut account = self.account(address);
		account.nonce = nonce;
		self.set_account(address, account)
	}

	pub fn add_balance(&mut self, address: Address, amount: U256) -> Result<(), ExitError> {
		if amount.is_zero() {
			return self.check_writable();
		}
		let mut account = self.account(address);
		account.balance = account.balance.wrapping_add(amount);
		self.set_account(address, account)
	}

	pub fn sub_balance(&mut self, address: Address, amount: U256) -> Result<(), ExitError> {
		if amount.is_zero() {
			return self.check_writable();
		}
		let mut account = self.account(address);
		if account.balance < amount {
			return Err(ExitError::InsufficientBalance);
		}
		account.balance = account.balance.wrapping_sub(amount);
		self.set_account(address, account)
	}

	pub fn set_code(&mut self, address: Address, code: Vec<u8>) -> Result<(), ExitError> {
		self.check_writable()?;
		self.code.insert(address, code);
		Ok(())
	}

	/// Tombstone an account, crediting its balance to the beneficiary.
	pub fn drop_account(
		&mut self,
		address: Address,
		beneficiary: Address,
	) -> Result<(), ExitError> {
		self.check_writable()?;
		let balance = self.account(address).balance;
		if address != beneficiary {
			self.add_balance(beneficiary, balance)?;
		}
		self.accounts.insert(address, None);
		self.storage.remove(&address);
		self.code.insert(address, Vec::new());
		Ok(())
	}

	fn check_writable(&self) -> Result<(), ExitError> {
		if self.is_static {
			Err(ExitError::StaticViolation)
		} else {
			Ok(())
		}
	}

	/// Fold the whole chain into the base trie and return the new state
	/// root. Dirty maps are collected parent-first so descendant writes
	/// win on collision. Empty accounts are removed; the base trie is
	/// never mutated.
	pub fn merge(self) -> H256 {
		let snapshot = self.snapshot.clone();
		let mut accounts: BTreeMap<Address, Option<Account>> = BTreeMap::new();
		let mut storage: BTreeMap<Address, BTreeMap<Vec<u8>, Vec<u8>>> = BTreeMap::new();
		let mut code: BTreeMap<Address, Vec<u8>> = BTreeMap::new();

		let mut chain = Vec::new();
		let mut frame = Some(Box::new(self));
		while let Some(mut f) = frame {
			frame = f.parent.take();
			chain.push(f);
		}
		for f in chain.into_iter().rev() {
			for (address, entry) in f.accounts {
				accounts.insert(address, entry);
			}
			for (address, delta) in f.storage {
				let slot = storage.entry(address).or_default();
				for (key, value) in delta {
					slot.insert(key, value);
				}
			}
			for (address, bytes) in f.code {
				code.insert(address, bytes);
			}
		}

		let mut touched: Vec<Address> = accounts.keys().cloned().collect();
		touched.extend(storage.keys().cloned());
		touched.extend(code.keys().cloned());
		touched.sort();
		touched.dedup();

		log::debug!("merging {} touched accounts", touched.len());

		let mut delta: BTreeMap<Address, Option<Account>> = BTreeMap::new();
		for address in touched {
			if let Some(None) = accounts.get(&address) {
				delta.insert(address, None);
				continue;
			}

			let mut account = accounts
				.get(&address)
				.cloned()
				.flatten()
				.or_else(|| snapshot.account(address))
				.unwrap_or_default();

			if let Some(storage_delta) = storage.get(&address) {
				account.storage_root =
					snapshot.commit_storage(account.storage_root, storage_delta);
			}
			if let Some(bytes) = code.get(&address) {
				account.code_hash = if bytes.is_empty() {
					empty_code_hash()
				} else {
					snapshot.commit_code(bytes.clone())
				};
			}

			if account.is_empty() {
				delta.insert(address, None);
			} else {
				delta.insert(address, Some(account));
			}
		}

		snapshot.commit_accounts(delta)
	}
}
