use super::Control;
use crate::{ExitSucceed, Host, Machine};
use core::cmp::min;
use florin_bigint::{Address, H256, U256};

pub fn address(state: &mut Machine) -> Control {
	push_u256!(state, state.context.address.into());
	Control::Continue(1)
}

pub fn origin(state: &mut Machine) -> Control {
	push_u256!(state, state.tx_context.origin.into());
	Control::Continue(1)
}

pub fn caller(state: &mut Machine) -> Control {
	push_u256!(state, state.context.caller.into());
	Control::Continue(1)
}

pub fn callvalue(state: &mut Machine) -> Control {
	push_u256!(state, state.context.apparent_value);
	Control::Continue(1)
}

pub fn gasprice(state: &mut Machine) -> Control {
	push_u256!(state, state.tx_context.gas_price);
	Control::Continue(1)
}

pub fn timestamp(state: &mut Machine) -> Control {
	push_u256!(state, U256::from(state.tx_context.timestamp));
	Control::Continue(1)
}

pub fn number(state: &mut Machine) -> Control {
	push_u256!(state, U256::from(state.tx_context.block_number));
	Control::Continue(1)
}

pub fn difficulty(state: &mut Machine) -> Control {
	push_u256!(state, state.tx_context.difficulty);
	Control::Continue(1)
}

pub fn gaslimit(state: &mut Machine) -> Control {
	push_u256!(state, U256::from(state.tx_context.block_gas_limit));
	Control::Continue(1)
}

pub fn chainid(state: &mut Machine) -> Control {
	push_u256!(state, U256::from(state.tx_context.chain_id));
	Control::Continue(1)
}

pub fn balance<H: Host>(state: &mut Machine, host: &mut H) -> Control {
	pop_u256!(state, addr);
	push_u256!(state, host.balance(Address::from(addr)));
	Control::Continue(1)
}

pub fn selfbalance<H: Host>(state: &mut Machine, host: &mut H) -> Control {
	push_u256!(state, host.balance(state.context.address));
	Control::Continue(1)
}

pub fn extcodesize<H: Host>(state: &mut Machine, host: &mut H) -> Control {
	pop_u256!(state, addr);
	push_u256!(state, U256::from(host.code_size(Address::from(addr))));
	Control::Continue(1)
}

pub fn extcodecopy<H: Host>(state: &mut Machine, host: &mut H) -> Control {
	pop_u256!(state, addr, memory_offset, code_offset, len);

	let code = host.code(Address::from(addr));
	match state.memory.copy_large(memory_offset, code_offset, len, &code) {
		Ok(()) => Control::Continue(1),
		Err(e) => Control::Exit(e.into()),
	}
}

pub fn sha3<H: Host>(state: &mut Machine, host: &mut H) -> Control {
	pop_u256!(state, offset, len);
	let offset = as_usize_or_fail!(offset);
	let len = as_usize_or_fail!(len);
	try_or_fail!(state.memory.check_range(offset, len));

	let data = state.memory.get(offset, len);
	let hash = host.digest(&data);
	push_u256!(state, hash.into());
	Control::Continue(1)
}

pub fn sload<H: Host>(state: &mut Machine, host: &mut H) -> Control {
	pop_u256!(state, key);
	let key: [u8; 32] = key.into();
	let value = host.storage(state.context.address, &key);
	push_u256!(state, U256::from(&value[..]));
	Control::Continue(1)
}

pub fn sstore<H: Host>(state: &mut Machine, host: &mut H) -> Control {
	pop_u256!(state, key, value);
	let key: [u8; 32] = key.into();
	// zero stores as an empty value, deleting the entry
	try_or_fail!(host.set_storage(state.context.address, &key, &value.to_bytes_trimmed()));
	Control::Continue(1)
}

pub fn gas<H: Host>(state: &mut Machine, host: &mut H) -> Control {
	push_u256!(state, U256::from(host.gas_left()));
	Control::Continue(1)
}

pub fn log<H: Host>(state: &mut Machine, n: usize, host: &mut H) -> Control {
	pop_u256!(state, offset, len);
	let offset = as_usize_or_fail!(offset);
	let len = as_usize_or_fail!(len);
	try_or_fail!(state.memory.check_range(offset, len));
	let data = state.memory.get(offset, len);

	let mut topics = Vec::with_capacity(n);
	for _ in 0..n {
		pop_u256!(state, topic);
		topics.push(H256::from(topic));
	}

	try_or_fail!(host.log(state.context.address, data, topics));
	Control::Continue(1)
}

pub fn call<H: Host>(state: &mut Machine, is_static: bool, host: &mut H) -> Control {
	pop_u256!(state, _gas, to);

	let value = if is_static {
		U256::zero()
	} else {
		match state.stack.pop() {
			Ok(value) => value,
			Err(e) => return Control::Exit(e.into()),
		}
	};

	pop_u256!(state, in_offset, in_len, out_offset, out_len);
	let in_offset = as_usize_or_fail!(in_offset);
	let in_len = as_usize_or_fail!(in_len);
	let out_offset = as_usize_or_fail!(out_offset);
	let out_len = as_usize_or_fail!(out_len);
	try_or_fail!(state.memory.check_range(in_offset, in_len));
	try_or_fail!(state.memory.check_range(out_offset, out_len));

	let input = state.memory.get(in_offset, in_len);
	let outcome = match host.call(
		state.context.address,
		Address::from(to),
		value,
		input,
		is_static,
	) {
		Ok(outcome) => outcome,
		Err(e) => return Control::Exit(e.into()),
	};

	let copy = min(out_len, outcome.output.len());
	if copy > 0 {
		try_or_fail!(state
			.memory
			.set(out_offset, &outcome.output[..copy], Some(copy)));
	}
	push_u256!(state, outcome.success.into());
	Control::Continue(1)
}

pub fn delegatecall<H: Host>(state: &mut Machine, host: &mut H) -> Control {
	pop_u256!(state, _gas, to, in_offset, in_len, out_offset, out_len);
	let in_offset = as_usize_or_fail!(in_offset);
	let in_len = as_usize_or_fail!(in_len);
	let out_offset = as_usize_or_fail!(out_offset);
	let out_len = as_usize_or_fail!(out_len);
	try_or_fail!(state.memory.check_range(in_offset, in_len));
	try_or_fail!(state.memory.check_range(out_offset, out_len));

	let input = state.memory.get(in_offset, in_len);
	let outcome = match host.delegate(
		state.context.caller,
		state.context.address,
		Address::from(to),
		state.context.apparent_value,
		input,
	) {
		Ok(outcome) => outcome,
		Err(e) => return Control::Exit(e.into()),
	};

	let copy = min(out_len, outcome.output.len());
	if copy > 0 {
		try_or_fail!(state
			.memory
			.set(out_offset, &outcome.output[..copy], Some(copy)));
	}
	push_u256!(state, outcome.success.into());
	Control::Continue(1)
}

pub fn create<H: Host>(state: &mut Machine, host: &mut H) -> Control {
	pop_u256!(state, value, offset, len);
	let offset = as_usize_or_fail!(offset);
	let len = as_usize_or_fail!(len);
	try_or_fail!(state.memory.check_range(offset, len));

	let init_code = state.memory.get(offset, len);
	match host.create(state.context.address, value, init_code) {
		Ok(address) => {
			push_u256!(state, address.into());
			Control::Continue(1)
		}
		Err(e) => Control::Exit(e.into()),
	}
}

pub fn selfdestruct<H: Host>(state: &mut Machine, host: &mut H) -> Control {
	pop_u256!(state, beneficiary);
	try_or_fail!(host.drop_account(state.context.address, Address::from(beneficiary)));
	Control::Exit(ExitSucceed::Dropped.into())
}
