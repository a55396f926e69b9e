use florin_bigint::{I256, U256};

#[inline]
pub fn slt(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();
	(op1 < op2).into()
}

#[inline]
pub fn sgt(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();
	(op1 > op2).into()
}

#[inline]
pub fn iszero(op1: U256) -> U256 {
	op1.is_zero().into()
}

#[inline]
pub fn not(op1: U256) -> U256 {
	!op1
}

/// `op1`-th byte of `op2`, counted from the most significant. An index of
/// 32 or above yields zero.
#[inline]
pub fn byte(op1: U256, op2: U256) -> U256 {
	if op1 >= U256::from(32u64) {
		return U256::zero();
	}

	let index = op1.low_u64() as usize;
	U256::from(op2.byte(31 - index) as u64)
}

#[inline]
pub fn shl(shift: U256, value: U256) -> U256 {
	if shift >= U256::from(256u64) {
		U256::zero()
	} else {
		value << (shift.low_u64() as usize)
	}
}

#[inline]
pub fn shr(shift: U256, value: U256) -> U256 {
	if shift >= U256::from(256u64) {
		U256::zero()
	} else {
		value >> (shift.low_u64() as usize)
	}
}

/// Arithmetic shift right: the sign bit backfills vacated positions.
#[inline]
pub fn sar(shift: U256, value: U256) -> U256 {
	let negative = value.bit(255);

	if shift >= U256::from(256u64) {
		return if negative {
			U256::max_value()
		} else {
			U256::zero()
		};
	}

	let shift = shift.low_u64() as usize;
	let mut ret = value >> shift;
	if negative && shift > 0 {
		ret = ret | (U256::max_value() << (256 - shift));
	}
	ret
}
