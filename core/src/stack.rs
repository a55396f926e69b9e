use crate::ExitError;
use florin_bigint::U256;

/// Operand stack backed by a `Vec`. The depth ceiling is enforced by the
/// machine after each dispatched opcode, so `push` never fails here.
#[derive(Clone, Debug)]
pub struct Stack {
	data: Vec<U256>,
}

impl Stack {
	/// Create a new, empty stack.
	pub fn new() -> Self {
		Self { data: Vec::new() }
	}

	/// Stack length.
	#[inline]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Whether the stack is empty.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Stack data.
	#[inline]
	pub fn data(&self) -> &Vec<U256> {
		&self.data
	}

	/// Pop a value from the stack. If the stack is already empty, returns
	/// the `StackUnderflow` error.
	#[inline]
	pub fn pop(&mut self) -> Result<U256, ExitError> {
		self.data.pop().ok_or(ExitError::StackUnderflow)
	}

	/// Pop a value as a fixed 32-byte big-endian slot.
	#[inline]
	pub fn pop_slot(&mut self) -> Result<[u8; 32], ExitError> {
		self.pop().map(Into::into)
	}

	/// Push a new value onto the stack.
	#[inline]
	pub fn push(&mut self, value: U256) {
		self.data.push(value);
	}

	/// Peek a value at given index for the stack, where the top of
	/// the stack is at index `0`. If the index is too large,
	/// `StackUnderflow` is returned.
	#[inline]
	pub fn peek(&self, no_from_top: usize) -> Result<U256, ExitError> {
		if self.data.len() > no_from_top {
			Ok(self.data[self.data.len() - no_from_top - 1])
		} else {
			Err(ExitError::StackUnderflow)
		}
	}

	/// Set a value at given index for the stack, where the top of the
	/// stack is at index `0`. If the index is too large,
	/// `StackUnderflow` is returned.
	#[inline]
	pub fn set(&mut self, no_from_top: usize, val: U256) -> Result<(), ExitError> {
		if self.data.len() > no_from_top {
			let len = self.data.len();
			self.data[len - no_from_top - 1] = val;
			Ok(())
		} else {
			Err(ExitError::StackUnderflow)
		}
	}
}

impl Default for Stack {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::Stack;
	use crate::ExitError;
	use florin_bigint::U256;

	#[test]
	fn lifo_order() {
		let mut stack = Stack::new();
		stack.push(U256::from(1u64));
		stack.push(U256::from(2u64));
		stack.push(U256::from(3u64));
		assert_eq!(stack.pop(), Ok(U256::from(3u64)));
		assert_eq!(stack.pop(), Ok(U256::from(2u64)));
		assert_eq!(stack.pop(), Ok(U256::from(1u64)));
		assert_eq!(stack.pop(), Err(ExitError::StackUnderflow));
	}

	#[test]
	fn peek_is_from_top() {
		let mut stack = Stack::new();
		stack.push(U256::from(10u64));
		stack.push(U256::from(20u64));
		assert_eq!(stack.peek(0), Ok(U256::from(20u64)));
		assert_eq!(stack.peek(1), Ok(U256::from(10u64)));
		assert_eq!(stack.peek(2), Err(ExitError::StackUnderflow));
	}

	#[test]
	fn set_from_top() {
		let mut stack = Stack::new();
		stack.push(U256::from(10u64));
		stack.push(U256::from(20u64));
		stack.set(1, U256::from(99u64)).unwrap();
		assert_eq!(stack.peek(1), Ok(U256::from(99u64)));
		assert_eq!(stack.peek(0), Ok(U256::from(20u64)));
	}

	#[test]
	fn pop_slot_is_big_endian() {
		let mut stack = Stack::new();
		stack.push(U256::from(0x0102u64));
		let slot = stack.pop_slot().unwrap();
		assert_eq!(slot[30], 0x01);
		assert_eq!(slot[31], 0x02);
		assert!(slot[..30].iter().all(|b| *b == 0));
	}
}
