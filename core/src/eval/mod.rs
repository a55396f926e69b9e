#[macro_use]
mod macros;
mod arithmetic;
mod bitwise;
mod misc;
mod system;

use crate::{ExitError, ExitReason, ExitSucceed, Host, Machine, Opcode};
use core::ops::{BitAnd, BitOr, BitXor};

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Control {
	Continue(usize),
	Exit(ExitReason),
	Jump(usize),
}

/// Single-opcode dispatch. A dense match over the closed byte-coded set;
/// anything outside it faults as an invalid opcode.
pub fn eval<H: Host>(
	state: &mut Machine,
	opcode: Opcode,
	position: usize,
	host: &mut H,
) -> Control {
	match opcode {
		Opcode::STOP => Control::Exit(ExitSucceed::Stopped.into()),
		Opcode::ADD => op2_u256_tuple!(state, overflowing_add),
		Opcode::MUL => op2_u256_tuple!(state, overflowing_mul),
		Opcode::SUB => op2_u256_tuple!(state, underflowing_sub),
		Opcode::DIV => op2_u256_fn!(state, self::arithmetic::div),
		Opcode::SDIV => op2_u256_fn!(state, self::arithmetic::sdiv),
		Opcode::MOD => op2_u256_fn!(state, self::arithmetic::rem),
		Opcode::SMOD => op2_u256_fn!(state, self::arithmetic::srem),
		Opcode::ADDMOD => op3_u256_fn!(state, self::arithmetic::addmod),
		Opcode::MULMOD => op3_u256_fn!(state, self::arithmetic::mulmod),
		Opcode::EXP => op2_u256_fn!(state, self::arithmetic::exp),
		Opcode::SIGNEXTEND => op2_u256_fn!(state, self::arithmetic::signextend),

		Opcode::LT => op2_u256_bool_ref!(state, lt),
		Opcode::GT => op2_u256_bool_ref!(state, gt),
		Opcode::SLT => op2_u256_fn!(state, self::bitwise::slt),
		Opcode::SGT => op2_u256_fn!(state, self::bitwise::sgt),
		Opcode::EQ => op2_u256_bool_ref!(state, eq),
		Opcode::ISZERO => op1_u256_fn!(state, self::bitwise::iszero),
		Opcode::AND => op2_u256!(state, bitand),
		Opcode::OR => op2_u256!(state, bitor),
		Opcode::XOR => op2_u256!(state, bitxor),
		Opcode::NOT => op1_u256_fn!(state, self::bitwise::not),
		Opcode::BYTE => op2_u256_fn!(state, self::bitwise::byte),
		Opcode::SHL => op2_u256_fn!(state, self::bitwise::shl),
		Opcode::SHR => op2_u256_fn!(state, self::bitwise::shr),
		Opcode::SAR => op2_u256_fn!(state, self::bitwise::sar),

		Opcode::SHA3 => self::system::sha3(state, host),

		Opcode::ADDRESS => self::system::address(state),
		Opcode::BALANCE => self::system::balance(state, host),
		Opcode::ORIGIN => self::system::origin(state),
		Opcode::CALLER => self::system::caller(state),
		Opcode::CALLVALUE => self::system::callvalue(state),
		Opcode::CALLDATALOAD => self::misc::calldataload(state),
		Opcode::CALLDATASIZE => self::misc::calldatasize(state),
		Opcode::CALLDATACOPY => self::misc::calldatacopy(state),
		Opcode::CODESIZE => self::misc::codesize(state),
		Opcode::CODECOPY => self::misc::codecopy(state),
		Opcode::GASPRICE => self::system::gasprice(state),
		Opcode::EXTCODESIZE => self::system::extcodesize(state, host),
		Opcode::EXTCODECOPY => self::system::extcodecopy(state, host),

		Opcode::TIMESTAMP => self::system::timestamp(state),
		Opcode::NUMBER => self::system::number(state),
		Opcode::DIFFICULTY => self::system::difficulty(state),
		Opcode::GASLIMIT => self::system::gaslimit(state),
		Opcode::CHAINID => self::system::chainid(state),
		Opcode::SELFBALANCE => self::system::selfbalance(state, host),

		Opcode::POP => self::misc::pop(state),
		Opcode::MLOAD => self::misc::mload(state),
		Opcode::MSTORE => self::misc::mstore(state),
		Opcode::MSTORE8 => self::misc::mstore8(state),
		Opcode::SLOAD => self::system::sload(state, host),
		Opcode::SSTORE => self::system::sstore(state, host),
		Opcode::JUMP => self::misc::jump(state),
		Opcode::JUMPI => self::misc::jumpi(state),
		Opcode::PC => self::misc::pc(state, position),
		Opcode::MSIZE => self::misc::msize(state),
		Opcode::GAS => self::system::gas(state, host),
		Opcode::JUMPDEST => Control::Continue(1),

		Opcode::CREATE => self::system::create(state, host),
		Opcode::CALL => self::system::call(state, false, host),
		Opcode::RETURN => self::misc::ret(state),
		Opcode::DELEGATECALL => self::system::delegatecall(state, host),
		Opcode::STATICCALL => self::system::call(state, true, host),
		Opcode::REVERT => self::misc::revert(state),
		Opcode::SELFDESTRUCT => self::system::selfdestruct(state, host),

		op if op >= Opcode::PUSH1 && op <= Opcode::PUSH32 => {
			let n = (op.as_u8() - Opcode::PUSH1.as_u8()) as usize + 1;
			self::misc::push(state, n, position)
		}
		op if op >= Opcode::DUP1 && op <= Opcode::DUP16 => {
			let n = (op.as_u8() - Opcode::DUP1.as_u8()) as usize + 1;
			self::misc::dup(state, n)
		}
		op if op >= Opcode::SWAP1 && op <= Opcode::SWAP16 => {
			let n = (op.as_u8() - Opcode::SWAP1.as_u8()) as usize + 1;
			self::misc::swap(state, n)
		}
		op if op >= Opcode::LOG0 && op <= Opcode::LOG4 => {
			let n = (op.as_u8() - Opcode::LOG0.as_u8()) as usize;
			self::system::log(state, n, host)
		}

		_ => Control::Exit(ExitError::InvalidOpcode.into()),
	}
}
