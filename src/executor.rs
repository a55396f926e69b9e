use crate::backend::{Overlay, Snapshot};
use crate::builtin::BuiltinContext;
use crate::cache::CodeCache;
use crate::foreign::{is_foreign, ForeignDialect};
use crate::gas::{intrinsic_gas, GasSchedule, Limit};
use crate::params::{CallData, CallKind, LogEntry, VmResult};
use crate::util::derive_create_address;
use florin_bigint::{Address, U256};
use florin_core::{Context, ExitError, ExitFatal, ExitReason, ExitSucceed, Machine, TxContext};
use std::cell::RefCell;
use std::cmp::min;
use std::error;
use std::fmt;
use std::mem;
use std::rc::Rc;
use std::sync::Arc;

/// Pre-state validation failures. Anything that happens once execution
/// has started is reported through `VmResult::reason` instead.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExecutorError {
	InvalidNonce { expected: u64, got: u64 },
}

impl fmt::Display for ExecutorError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			ExecutorError::InvalidNonce { expected, got } => {
				write!(f, "invalid nonce: expected {}, got {}", expected, got)
			}
		}
	}
}

impl error::Error for ExecutorError {}

/// Drives one top-level message call to completion: validation,
/// intrinsic gas, code resolution, dispatch, nested calls and fee
/// settlement. One executor per call tree; only the code cache is shared
/// wider than that.
pub struct Executor {
	pub(crate) overlay: Overlay,
	snapshot: Rc<Snapshot>,
	pub(crate) schedule: GasSchedule,
	pub(crate) limit: Rc<RefCell<Limit>>,
	cache: Arc<CodeCache>,
	pub(crate) tx_context: Rc<TxContext>,
	pub(crate) logs: Vec<LogEntry>,
	pub(crate) depth: usize,
	dialect: Option<Rc<dyn ForeignDialect>>,
}

impl Executor {
	pub fn new(
		overlay: Overlay,
		schedule: GasSchedule,
		cache: Arc<CodeCache>,
		tx_context: TxContext,
		gas_limit: u64,
	) -> Executor {
		let snapshot = overlay.snapshot();
		Executor {
			overlay,
			snapshot,
			schedule,
			limit: Rc::new(RefCell::new(Limit::new(gas_limit))),
			cache,
			tx_context: Rc::new(tx_context),
			logs: Vec::new(),
			depth: 0,
			dialect: None,
		}
	}

	pub fn with_dialect(mut self, dialect: Rc<dyn ForeignDialect>) -> Executor {
		self.dialect = Some(dialect);
		self
	}

	/// Run a top-level call to completion. The fee is debited from the
	/// origin regardless of outcome; failed calls leave no other state
	/// behind. The overlay comes back for merging into a new state root.
	pub fn execute(mut self, call: CallData) -> Result<(VmResult, Overlay), ExecutorError> {
		let origin = call.caller;

		log::debug!(
			"executing {:?} from {} to {} at height {}",
			call.kind,
			call.caller,
			call.receiver,
			self.overlay.height()
		);

		if call.kind == CallKind::Coinbase {
			let reason = match self.overlay.add_balance(call.receiver, call.value) {
				Ok(()) => ExitSucceed::Stopped.into(),
				Err(e) => e.into(),
			};
			let logs = mem::take(&mut self.logs);
			return Ok((
				VmResult {
					reason,
					output: Vec::new(),
					gas_used: 0,
					fee: U256::zero(),
					logs,
					created: None,
				},
				self.overlay,
			));
		}

		if !call.is_static {
			let account = self.overlay.account(origin);
			if account.nonce != call.nonce {
				return Err(ExecutorError::InvalidNonce {
					expected: account.nonce,
					got: call.nonce,
				});
			}
			if matches!(call.kind, CallKind::Call | CallKind::Create)
				&& self.overlay.set_nonce(origin, account.nonce + 1).is_err()
			{
				// the top frame is never static; unreachable in practice
				return Err(ExecutorError::InvalidNonce {
					expected: account.nonce,
					got: call.nonce,
				});
			}
		}

		let (reason, output, created) = self.run_top(call);

		let gas_used = {
			let limit = self.limit.borrow();
			min(limit.gas(), limit.gas_limit())
		};
		let mut fee = self.tx_context.gas_price.wrapping_mul(U256::from(gas_used));
		let balance = self.overlay.account(origin).balance;
		if fee > balance {
			fee = balance;
		}
		if !fee.is_zero() && self.overlay.sub_balance(origin, fee).is_err() {
			fee = U256::zero();
		}

		log::debug!(
			"finished with {:?}, gas used {}, fee 0x{:x}",
			reason,
			gas_used,
			fee
		);

		let logs = mem::take(&mut self.logs);
		Ok((
			VmResult {
				reason,
				output,
				gas_used,
				fee,
				logs,
				created,
			},
			self.overlay,
		))
	}

	fn run_top(&mut self, mut call: CallData) -> (ExitReason, Vec<u8>, Option<Address>) {
		let mut created = None;
		if call.kind == CallKind::Create {
			call.receiver = derive_create_address(call.caller, call.nonce);
			created = Some(call.receiver);
		}

		let intrinsic = intrinsic_gas(&self.schedule, call.kind == CallKind::Create, &call.payload);
		if let Err(fatal) = self.limit.borrow_mut().charge_intrinsic(intrinsic) {
			return (fatal.into(), Vec::new(), None);
		}

		match self.run_call(call) {
			Ok((reason, output)) => {
				let created = if reason.is_succeed() { created } else { None };
				(reason, output, created)
			}
			Err(fatal) => (fatal.into(), Vec::new(), None),
		}
	}

	/// Nested entry used by the interpreter's CALL family. Depth above
	/// the ceiling aborts the whole tree.
	pub(crate) fn nested(&mut self, call: CallData) -> Result<(ExitReason, Vec<u8>), ExitFatal> {
		if self.depth + 1 > self.schedule.max_call_depth {
			return Err(ExitFatal::CallDepthExceeded);
		}
		self.depth += 1;
		let result = self.run_call(call);
		self.depth -= 1;
		result
	}

	/// Run one call in its own overlay frame: commit on success, roll
	/// back (dropping the frame's logs) on anything else.
	fn run_call(&mut self, call: CallData) -> Result<(ExitReason, Vec<u8>), ExitFatal> {
		self.push_frame(call.is_static);
		let log_mark = self.logs.len();

		match self.call_body(&call) {
			Ok((reason, output)) => {
				if reason.is_succeed() {
					self.pop_commit();
				} else {
					self.pop_rollback();
					self.logs.truncate(log_mark);
				}
				Ok((reason, output))
			}
			Err(fatal) => {
				self.pop_rollback();
				self.logs.truncate(log_mark);
				Err(fatal)
			}
		}
	}

	fn call_body(&mut self, call: &CallData) -> Result<(ExitReason, Vec<u8>), ExitFatal> {
		// value moves for ordinary calls and deployments; delegate
		// frames only appear to carry it
		if call.kind != CallKind::Delegate && !call.value.is_zero() {
			if let Err(e) = self.overlay.sub_balance(call.caller, call.value) {
				return Ok((e.into(), Vec::new()));
			}
			if let Err(e) = self.overlay.add_balance(call.receiver, call.value) {
				return Ok((e.into(), Vec::new()));
			}
		}

		if call.kind != CallKind::Create {
			if let Some(builtin) = self.overlay.builtin(call.receiver) {
				let context = BuiltinContext {
					caller: call.caller,
					address: call.receiver,
					value: call.value,
				};
				return Ok(
					match builtin.call(&mut self.overlay, &context, &call.payload) {
						Ok(output) => (ExitSucceed::Returned.into(), output),
						Err(e) => (e.into(), Vec::new()),
					},
				);
			}
		}

		match call.kind {
			CallKind::Create => self.run_create(call),
			CallKind::Call | CallKind::Delegate => self.run_message(call),
			// handled before any frame is pushed
			CallKind::Coinbase => Ok((ExitSucceed::Stopped.into(), Vec::new())),
		}
	}

	fn run_create(&mut self, call: &CallData) -> Result<(ExitReason, Vec<u8>), ExitFatal> {
		let existing = self.overlay.account(call.receiver);
		if existing.nonce != 0 || existing.has_code() {
			return Ok((ExitError::CreateCollision.into(), Vec::new()));
		}

		if is_foreign(&call.payload) {
			let dialect = match self.dialect.clone() {
				Some(dialect) => dialect,
				None => {
					return Ok((
						ExitError::Other("no foreign dialect registered").into(),
						Vec::new(),
					))
				}
			};
			let code = match dialect.strip_init(&call.payload) {
				Ok(code) => code,
				Err(e) => return Ok((e.into(), Vec::new())),
			};
			if let Err(e) = self.overlay.set_code(call.receiver, code) {
				return Ok((e.into(), Vec::new()));
			}
			return Ok((ExitSucceed::Returned.into(), Vec::new()));
		}

		// init code runs; whatever it returns is the deployed code
		let context = Context {
			address: call.receiver,
			caller: call.caller,
			apparent_value: call.value,
		};
		let (reason, output) = self.run_machine(call.payload.clone(), Vec::new(), context)?;
		if !reason.is_succeed() {
			return Ok((reason, output));
		}
		if let Err(e) = self.overlay.set_code(call.receiver, output) {
			return Ok((e.into(), Vec::new()));
		}
		Ok((reason, Vec::new()))
	}

	fn run_message(&mut self, call: &CallData) -> Result<(ExitReason, Vec<u8>), ExitFatal> {
		let code_address = match call.kind {
			CallKind::Delegate => call.delegate_target.unwrap_or(call.receiver),
			_ => call.receiver,
		};
		let code = match self.load_code(code_address) {
			Ok(code) => code,
			Err(e) => return Ok((e.into(), Vec::new())),
		};

		if code.is_empty() {
			// pure transfer; a payload to a codeless account is a
			// mistake the sender should hear about
			return Ok(if call.payload.is_empty() {
				(ExitSucceed::Stopped.into(), Vec::new())
			} else {
				(ExitError::NotContract.into(), Vec::new())
			});
		}

		let context = Context {
			address: call.receiver,
			caller: call.caller,
			apparent_value: call.value,
		};

		if is_foreign(&code) {
			let dialect = match self.dialect.clone() {
				Some(dialect) => dialect,
				None => {
					return Ok((
						ExitError::Other("no foreign dialect registered").into(),
						Vec::new(),
					))
				}
			};
			return Ok(
				match dialect.execute(&mut self.overlay, &context, &code, &call.payload) {
					Ok(output) => (ExitSucceed::Returned.into(), output),
					Err(e) => (e.into(), Vec::new()),
				},
			);
		}

		self.run_machine((*code).clone(), call.payload.clone(), context)
	}

	/// Settled code is fetched by content hash through the shared cache;
	/// code deployed earlier in this same tree is still dirty and read
	/// straight from the overlay.
	fn load_code(&self, address: Address) -> Result<Arc<Vec<u8>>, ExitError> {
		let account = self.overlay.account(address);
		if account.has_code() {
			let snapshot = self.snapshot.clone();
			let hash = account.code_hash;
			self.cache.get_or_load(hash, || {
				snapshot
					.code(hash)
					.ok_or(ExitError::Other("code missing for content hash"))
			})
		} else {
			Ok(Arc::new(self.overlay.code(address)))
		}
	}

	fn run_machine(
		&mut self,
		code: Vec<u8>,
		input: Vec<u8>,
		context: Context,
	) -> Result<(ExitReason, Vec<u8>), ExitFatal> {
		let mut machine = Machine::new(
			Rc::new(code),
			Rc::new(input),
			self.schedule.stack_limit,
			self.schedule.frame_memory_limit,
			context,
			self.tx_context.clone(),
		);
		let reason = machine.run(self);
		if let ExitReason::Fatal(fatal) = reason {
			return Err(fatal);
		}
		let output = match reason {
			ExitReason::Succeed(_) | ExitReason::Revert(_) => machine.return_value(),
			_ => Vec::new(),
		};
		Ok((reason, output))
	}

	fn push_frame(&mut self, is_static: bool) {
		let overlay = mem::replace(&mut self.overlay, Overlay::new(self.snapshot.clone()));
		self.overlay = overlay.begin(is_static);
	}

	fn pop_commit(&mut self) {
		let overlay = mem::replace(&mut self.overlay, Overlay::new(self.snapshot.clone()));
		self.overlay = overlay.commit();
	}

	fn pop_rollback(&mut self) {
		let overlay = mem::replace(&mut self.overlay, Overlay::new(self.snapshot.clone()));
		self.overlay = overlay.rollback();
	}
}
