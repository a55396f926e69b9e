use florin_bigint::{I256, U256};

#[inline]
pub fn div(op1: U256, op2: U256) -> U256 {
	// divisor zero yields zero inside div_rem
	op1 / op2
}

#[inline]
pub fn sdiv(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();
	(op1 / op2).into()
}

#[inline]
pub fn rem(op1: U256, op2: U256) -> U256 {
	op1 % op2
}

#[inline]
pub fn srem(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();
	(op1 % op2).into()
}

#[inline]
pub fn addmod(op1: U256, op2: U256, op3: U256) -> U256 {
	op1.add_mod(op2, op3)
}

#[inline]
pub fn mulmod(op1: U256, op2: U256, op3: U256) -> U256 {
	op1.mul_mod(op2, op3)
}

#[inline]
pub fn exp(op1: U256, op2: U256) -> U256 {
	op1.pow(op2)
}

/// Extends the sign of a value that is `op1 + 1` bytes wide into the full
/// word. `op1` at 31 or above leaves the value unchanged.
#[inline]
pub fn signextend(op1: U256, op2: U256) -> U256 {
	if op1 > U256::from(31u64) {
		return op2;
	}

	let bit_index = 8 * op1.low_u64() as usize + 7;
	if op2.bit(bit_index) {
		op2 | (U256::max_value() << (bit_index + 1))
	} else {
		op2 & (U256::max_value() >> (255 - bit_index))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn signextend_negative_byte() {
		// 0xff as a signed byte is -1
		let v = signextend(U256::zero(), U256::from(0xffu64));
		assert_eq!(v, U256::max_value());
	}

	#[test]
	fn signextend_positive_byte() {
		let v = signextend(U256::zero(), U256::from(0x17fu64));
		assert_eq!(v, U256::from(0x7fu64));
	}

	#[test]
	fn signextend_out_of_range_is_identity() {
		let v = U256::from(0xdeadbeefu64);
		assert_eq!(signextend(U256::from(32u64), v), v);
		assert_eq!(signextend(U256::max_value(), v), v);
	}
}
