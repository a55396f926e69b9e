//! The executor doubling as the interpreter's host: every account,
//! storage, code and sub-call effect an opcode raises lands here and is
//! routed to the overlay chain or back into the executor.

use crate::executor::Executor;
use crate::params::{CallData, CallKind, LogEntry};
use crate::util::{derive_create_address, keccak256};
use florin_bigint::{Address, H256, U256};
use florin_core::{CallOutcome, ExitError, ExitFatal, Host};

impl Host for Executor {
	fn digest(&self, data: &[u8]) -> H256 {
		keccak256(data)
	}

	fn balance(&self, address: Address) -> U256 {
		self.overlay.account(address).balance
	}

	fn code_size(&self, address: Address) -> usize {
		self.overlay.code(address).len()
	}

	fn code(&self, address: Address) -> Vec<u8> {
		self.overlay.code(address)
	}

	fn storage(&self, address: Address, key: &[u8]) -> Vec<u8> {
		self.overlay.db_get(address, key)
	}

	fn set_storage(&mut self, address: Address, key: &[u8], value: &[u8]) -> Result<(), ExitError> {
		if value.is_empty() {
			self.overlay.db_remove(address, key)
		} else {
			self.overlay.db_set(address, key, value)
		}
	}

	fn log(&mut self, address: Address, data: Vec<u8>, topics: Vec<H256>) -> Result<(), ExitError> {
		if self.overlay.is_static() {
			return Err(ExitError::StaticViolation);
		}
		self.logs.push(LogEntry {
			address,
			topics,
			data,
		});
		Ok(())
	}

	fn drop_account(&mut self, address: Address, beneficiary: Address) -> Result<(), ExitError> {
		self.overlay.drop_account(address, beneficiary)
	}

	fn call(
		&mut self,
		caller: Address,
		receiver: Address,
		value: U256,
		input: Vec<u8>,
		is_static: bool,
	) -> Result<CallOutcome, ExitFatal> {
		let call = CallData {
			kind: CallKind::Call,
			caller,
			receiver,
			delegate_target: None,
			value,
			payload: input,
			nonce: 0,
			is_static,
		};
		let (reason, output) = self.nested(call)?;
		Ok(if reason.is_succeed() {
			CallOutcome::succeeded(output)
		} else {
			CallOutcome::failed(output)
		})
	}

	fn delegate(
		&mut self,
		caller: Address,
		receiver: Address,
		code_address: Address,
		apparent_value: U256,
		input: Vec<u8>,
	) -> Result<CallOutcome, ExitFatal> {
		let call = CallData {
			kind: CallKind::Delegate,
			caller,
			receiver,
			delegate_target: Some(code_address),
			value: apparent_value,
			payload: input,
			nonce: 0,
			is_static: false,
		};
		let (reason, output) = self.nested(call)?;
		Ok(if reason.is_succeed() {
			CallOutcome::succeeded(output)
		} else {
			CallOutcome::failed(output)
		})
	}

	fn create(
		&mut self,
		caller: Address,
		value: U256,
		init_code: Vec<u8>,
	) -> Result<Address, ExitFatal> {
		let nonce = self.overlay.account(caller).nonce;
		if self.overlay.set_nonce(caller, nonce + 1).is_err() {
			return Err(ExitFatal::Other("create in a static frame"));
		}
		let receiver = derive_create_address(caller, nonce);

		let call = CallData {
			kind: CallKind::Create,
			caller,
			receiver,
			delegate_target: None,
			value,
			payload: init_code,
			nonce: 0,
			is_static: false,
		};
		let (reason, _) = self.nested(call)?;
		if reason.is_succeed() {
			Ok(receiver)
		} else {
			// a deployment that cannot complete poisons the whole tree
			Err(ExitFatal::Other("nested create failed"))
		}
	}

	fn gas_left(&self) -> u64 {
		self.limit.borrow().gas_left()
	}

	fn record_step(&mut self) -> Result<(), ExitFatal> {
		self.limit.borrow_mut().record_step()
	}
}
