use super::Control;
use crate::{ExitError, ExitRevert, ExitSucceed, Machine};
use core::cmp::min;
use florin_bigint::U256;

pub fn codesize(state: &mut Machine) -> Control {
	let size = U256::from(state.code.len());
	push_u256!(state, size);
	Control::Continue(1)
}

pub fn codecopy(state: &mut Machine) -> Control {
	pop_u256!(state, memory_offset, code_offset, len);

	let code = state.code.clone();
	match state.memory.copy_large(memory_offset, code_offset, len, &code) {
		Ok(()) => Control::Continue(1),
		Err(e) => Control::Exit(e.into()),
	}
}

pub fn calldataload(state: &mut Machine) -> Control {
	pop_u256!(state, index);

	let mut load = [0u8; 32];
	for i in 0..32 {
		if let Some(p) = index.low_u64().checked_add(i as u64) {
			if index.bits() <= 64 && (p as usize) < state.data.len() {
				load[i] = state.data[p as usize];
			}
		}
	}

	push_u256!(state, U256::from(load));
	Control::Continue(1)
}

pub fn calldatasize(state: &mut Machine) -> Control {
	push_u256!(state, U256::from(state.data.len()));
	Control::Continue(1)
}

pub fn calldatacopy(state: &mut Machine) -> Control {
	pop_u256!(state, memory_offset, data_offset, len);

	let data = state.data.clone();
	match state.memory.copy_large(memory_offset, data_offset, len, &data) {
		Ok(()) => Control::Continue(1),
		Err(e) => Control::Exit(e.into()),
	}
}

pub fn pop(state: &mut Machine) -> Control {
	pop_u256!(state, _any);
	Control::Continue(1)
}

pub fn mload(state: &mut Machine) -> Control {
	pop_u256!(state, index);
	let index = as_usize_or_fail!(index);
	try_or_fail!(state.memory.check_range(index, 32));
	let value = U256::from(&state.memory.get(index, 32)[..]);
	push_u256!(state, value);
	Control::Continue(1)
}

pub fn mstore(state: &mut Machine) -> Control {
	pop_u256!(state, index, value);
	let index = as_usize_or_fail!(index);
	let slot: [u8; 32] = value.into();
	match state.memory.set(index, &slot, Some(32)) {
		Ok(()) => Control::Continue(1),
		Err(e) => Control::Exit(e.into()),
	}
}

pub fn mstore8(state: &mut Machine) -> Control {
	pop_u256!(state, index, value);
	let index = as_usize_or_fail!(index);
	let value = value.byte(0);
	match state.memory.set(index, &[value], Some(1)) {
		Ok(()) => Control::Continue(1),
		Err(e) => Control::Exit(e.into()),
	}
}

pub fn jump(state: &mut Machine) -> Control {
	pop_u256!(state, dest);
	let dest = as_usize_or_fail!(dest, ExitError::InvalidJump);
	Control::Jump(dest)
}

pub fn jumpi(state: &mut Machine) -> Control {
	pop_u256!(state, dest, value);
	let dest = as_usize_or_fail!(dest, ExitError::InvalidJump);
	if !value.is_zero() {
		Control::Jump(dest)
	} else {
		Control::Continue(1)
	}
}

pub fn pc(state: &mut Machine, position: usize) -> Control {
	push_u256!(state, U256::from(position));
	Control::Continue(1)
}

pub fn msize(state: &mut Machine) -> Control {
	push_u256!(state, U256::from(state.memory.len()));
	Control::Continue(1)
}

/// Pushes `n` immediate bytes. Immediates past the end of code read as
/// zero.
pub fn push(state: &mut Machine, n: usize, position: usize) -> Control {
	let start = min(position + 1, state.code.len());
	let end = min(position + 1 + n, state.code.len());

	let mut raw = state.code[start..end].to_vec();
	raw.resize(n, 0);

	push_u256!(state, U256::from(&raw[..]));
	Control::Continue(1 + n)
}

/// `DUPn` duplicates the n-th slot from the top; `n` is 1 for the top
/// itself.
pub fn dup(state: &mut Machine, n: usize) -> Control {
	let value = match state.stack.peek(n - 1) {
		Ok(value) => value,
		Err(e) => return Control::Exit(e.into()),
	};
	push_u256!(state, value);
	Control::Continue(1)
}

/// `SWAPn` exchanges the top with the slot `n` below it.
pub fn swap(state: &mut Machine, n: usize) -> Control {
	let val1 = match state.stack.peek(0) {
		Ok(value) => value,
		Err(e) => return Control::Exit(e.into()),
	};
	let val2 = match state.stack.peek(n) {
		Ok(value) => value,
		Err(e) => return Control::Exit(e.into()),
	};
	match state.stack.set(0, val2) {
		Ok(()) => (),
		Err(e) => return Control::Exit(e.into()),
	}
	match state.stack.set(n, val1) {
		Ok(()) => (),
		Err(e) => return Control::Exit(e.into()),
	}
	Control::Continue(1)
}

pub fn ret(state: &mut Machine) -> Control {
	pop_u256!(state, start, len);
	let start = as_usize_or_fail!(start, ExitError::InvalidRange);
	let len = as_usize_or_fail!(len, ExitError::InvalidRange);
	try_or_fail!(state.memory.check_range(start, len));
	state.return_range = start..(start + len);
	Control::Exit(ExitSucceed::Returned.into())
}

pub fn revert(state: &mut Machine) -> Control {
	pop_u256!(state, start, len);
	let start = as_usize_or_fail!(start, ExitError::InvalidRange);
	let len = as_usize_or_fail!(len, ExitError::InvalidRange);
	try_or_fail!(state.memory.check_range(start, len));
	state.return_range = start..(start + len);
	Control::Exit(ExitRevert::Reverted.into())
}
