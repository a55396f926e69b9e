//! Interpreter core of the Florin VM: operand stack, linear memory,
//! opcode table and the fetch-decode-execute machine. All world-state
//! effects go through the [`Host`] trait, so the machine itself has no
//! notion of accounts or tries.

mod context;
mod error;
mod eval;
mod host;
mod memory;
mod opcode;
mod stack;
mod valids;

pub use crate::context::{Context, TxContext};
pub use crate::error::{ExitError, ExitFatal, ExitReason, ExitRevert, ExitSucceed};
pub use crate::host::{CallOutcome, Host};
pub use crate::memory::Memory;
pub use crate::opcode::Opcode;
pub use crate::stack::Stack;
pub use crate::valids::Valids;

use crate::eval::{eval, Control};
use core::ops::Range;
use std::rc::Rc;

/// Core execution layer: one machine per bytecode invocation, never
/// reused.
pub struct Machine {
	/// Program input data.
	pub(crate) data: Rc<Vec<u8>>,
	/// Program code.
	pub(crate) code: Rc<Vec<u8>>,
	/// Program counter.
	position: Result<usize, ExitReason>,
	/// Output slice of memory, set by RETURN and REVERT.
	pub(crate) return_range: Range<usize>,
	/// Code validity map for jump destinations.
	valids: Valids,
	/// Memory.
	pub(crate) memory: Memory,
	/// Stack.
	pub(crate) stack: Stack,
	/// Depth ceiling of the stack, checked after each opcode.
	stack_limit: usize,
	/// Frame scope.
	pub(crate) context: Context,
	/// Transaction scope, shared across the call tree.
	pub(crate) tx_context: Rc<TxContext>,
}

impl Machine {
	pub fn new(
		code: Rc<Vec<u8>>,
		data: Rc<Vec<u8>>,
		stack_limit: usize,
		memory_limit: usize,
		context: Context,
		tx_context: Rc<TxContext>,
	) -> Self {
		let valids = Valids::new(&code[..]);

		Self {
			data,
			code,
			position: Ok(0),
			return_range: 0..0,
			valids,
			memory: Memory::new(memory_limit),
			stack: Stack::new(),
			stack_limit,
			context,
			tx_context,
		}
	}

	pub fn stack(&self) -> &Stack {
		&self.stack
	}

	pub fn stack_mut(&mut self) -> &mut Stack {
		&mut self.stack
	}

	pub fn memory(&self) -> &Memory {
		&self.memory
	}

	pub fn memory_mut(&mut self) -> &mut Memory {
		&mut self.memory
	}

	pub fn context(&self) -> &Context {
		&self.context
	}

	/// Explicitly stop the machine with the given reason.
	pub fn exit(&mut self, reason: ExitReason) {
		self.position = Err(reason);
	}

	/// The output produced by RETURN or REVERT, empty otherwise.
	pub fn return_value(&self) -> Vec<u8> {
		self.memory.get(
			self.return_range.start,
			self.return_range.end - self.return_range.start,
		)
	}

	/// Run until the machine halts, one way or another.
	pub fn run<H: Host>(&mut self, host: &mut H) -> ExitReason {
		loop {
			match self.step(host) {
				Ok(()) => (),
				Err(reason) => return reason,
			}
		}
	}

	/// Execute a single opcode.
	pub fn step<H: Host>(&mut self, host: &mut H) -> Result<(), ExitReason> {
		let position = self.position?;

		let opcode = match self.code.get(position) {
			Some(v) => Opcode(*v),
			None => {
				// falling off the end of code is a plain stop
				self.position = Err(ExitSucceed::Stopped.into());
				return Err(ExitSucceed::Stopped.into());
			}
		};

		if let Err(e) = host.record_step() {
			let reason: ExitReason = e.into();
			self.position = Err(reason);
			return Err(reason);
		}

		log::trace!(
			"pc {:>5} op 0x{:02x} stack depth {}",
			position,
			opcode.as_u8(),
			self.stack.len()
		);

		match eval(self, opcode, position, host) {
			Control::Continue(p) => {
				self.position = Ok(position + p);
			}
			Control::Exit(e) => {
				self.position = Err(e);
				return Err(e);
			}
			Control::Jump(p) => {
				if self.valids.is_valid(p) {
					self.position = Ok(p);
				} else {
					self.position = Err(ExitError::InvalidJump.into());
					return Err(ExitError::InvalidJump.into());
				}
			}
		}

		if self.stack.len() > self.stack_limit {
			self.position = Err(ExitError::StackOverflow.into());
			return Err(ExitError::StackOverflow.into());
		}

		Ok(())
	}
}
