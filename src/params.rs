use florin_bigint::{Address, H256, U256};
use florin_core::ExitReason;

/// The four ways a message call can enter the executor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CallKind {
	/// Unconditional block-reward credit to the receiver. No nonce
	/// check, no intrinsic gas, no code runs.
	Coinbase,
	/// Contract deployment; the receiver is rewritten to the derived
	/// contract address.
	Create,
	/// Ordinary message call.
	Call,
	/// Run the target's code in the receiver's storage context,
	/// preserving caller and apparent value.
	Delegate,
}

/// One message call as fed to the executor, top-level or nested.
#[derive(Clone, Debug)]
pub struct CallData {
	pub kind: CallKind,
	pub caller: Address,
	pub receiver: Address,
	/// Code owner for `Delegate` frames.
	pub delegate_target: Option<Address>,
	pub value: U256,
	pub payload: Vec<u8>,
	/// Expected sender nonce, checked at the top level.
	pub nonce: u64,
	pub is_static: bool,
}

impl CallData {
	pub fn call(caller: Address, receiver: Address, value: U256, payload: Vec<u8>) -> CallData {
		CallData {
			kind: CallKind::Call,
			caller,
			receiver,
			delegate_target: None,
			value,
			payload,
			nonce: 0,
			is_static: false,
		}
	}

	pub fn create(caller: Address, value: U256, payload: Vec<u8>) -> CallData {
		CallData {
			kind: CallKind::Create,
			caller,
			// rewritten to the derived address by the executor
			receiver: Address::zero(),
			delegate_target: None,
			value,
			payload,
			nonce: 0,
			is_static: false,
		}
	}

	pub fn coinbase(receiver: Address, value: U256) -> CallData {
		CallData {
			kind: CallKind::Coinbase,
			caller: Address::zero(),
			receiver,
			delegate_target: None,
			value,
			payload: Vec::new(),
			nonce: 0,
			is_static: false,
		}
	}

	pub fn with_nonce(mut self, nonce: u64) -> CallData {
		self.nonce = nonce;
		self
	}

	pub fn read_only(mut self) -> CallData {
		self.is_static = true;
		self
	}
}

/// Log record accumulated across a call tree. Records of rolled-back
/// frames are discarded with the frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogEntry {
	pub address: Address,
	pub topics: Vec<H256>,
	pub data: Vec<u8>,
}

/// Outcome of one top-level execution.
#[derive(Clone, Debug)]
pub struct VmResult {
	pub reason: ExitReason,
	/// RETURN data on success, revert payload on revert, empty otherwise.
	pub output: Vec<u8>,
	pub gas_used: u64,
	/// Amount debited from the origin, `gas_used * gas_price` capped at
	/// the origin's balance.
	pub fee: U256,
	pub logs: Vec<LogEntry>,
	/// Address of the deployed contract for a successful `Create`.
	pub created: Option<Address>,
}

impl VmResult {
	pub fn is_success(&self) -> bool {
		self.reason.is_succeed()
	}
}
