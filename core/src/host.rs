use crate::{ExitError, ExitFatal};
use florin_bigint::{Address, H256, U256};

/// Result of a nested call as seen by the calling frame. A failed call
/// is absorbed: `success` is false and `output` carries the revert
/// payload, if any.
#[derive(Clone, Debug)]
pub struct CallOutcome {
	pub success: bool,
	pub output: Vec<u8>,
}

impl CallOutcome {
	pub fn succeeded(output: Vec<u8>) -> CallOutcome {
		CallOutcome {
			success: true,
			output,
		}
	}

	pub fn failed(output: Vec<u8>) -> CallOutcome {
		CallOutcome {
			success: false,
			output,
		}
	}
}

/// Capability interface between the interpreter and the node. All
/// account, storage, code and sub-call effects go through here, which is
/// what makes the machine testable against an in-memory double.
///
/// Storage values cross this boundary as trimmed big-endian bytes; an
/// empty value deletes the entry.
pub trait Host {
	/// The 256-bit content digest in use by the chain.
	fn digest(&self, data: &[u8]) -> H256;

	/// Balance of an account, zero when absent.
	fn balance(&self, address: Address) -> U256;

	/// Size of the code stored at an account.
	fn code_size(&self, address: Address) -> usize;

	/// Code stored at an account, empty when absent.
	fn code(&self, address: Address) -> Vec<u8>;

	/// Read a storage entry. Missing entries read as empty.
	fn storage(&self, address: Address, key: &[u8]) -> Vec<u8>;

	/// Write a storage entry; an empty value deletes it. Fails under a
	/// static frame.
	fn set_storage(&mut self, address: Address, key: &[u8], value: &[u8])
		-> Result<(), ExitError>;

	/// Append a log record. Fails under a static frame.
	fn log(&mut self, address: Address, data: Vec<u8>, topics: Vec<H256>) -> Result<(), ExitError>;

	/// Tombstone an account, crediting its balance to the beneficiary.
	fn drop_account(&mut self, address: Address, beneficiary: Address) -> Result<(), ExitError>;

	/// Run a nested message call. Frame-local failures are absorbed into
	/// the outcome; only tree-fatal conditions surface as `Err`.
	fn call(
		&mut self,
		caller: Address,
		receiver: Address,
		value: U256,
		input: Vec<u8>,
		is_static: bool,
	) -> Result<CallOutcome, ExitFatal>;

	/// Run a nested call executing `code_address`'s code in the storage
	/// context of `receiver`, preserving `caller` and apparent value.
	fn delegate(
		&mut self,
		caller: Address,
		receiver: Address,
		code_address: Address,
		apparent_value: U256,
		input: Vec<u8>,
	) -> Result<CallOutcome, ExitFatal>;

	/// Deploy a contract from init code. A failed deployment aborts the
	/// transaction, so only the address of the new contract comes back.
	fn create(
		&mut self,
		caller: Address,
		value: U256,
		init_code: Vec<u8>,
	) -> Result<Address, ExitFatal>;

	/// Remaining gas estimate of the shared limiter.
	fn gas_left(&self) -> u64;

	/// Tick the shared gas/step limiter. Called once per dispatched
	/// opcode.
	fn record_step(&mut self) -> Result<(), ExitFatal>;
}
