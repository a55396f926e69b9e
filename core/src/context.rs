use florin_bigint::{Address, U256};

/// Per-frame call scope: whose code runs, who called it, and the value
/// it sees. For delegate frames the address and caller come from the
/// calling frame, not the code owner.
#[derive(Clone, Debug)]
pub struct Context {
	/// The account whose storage and balance the frame operates on.
	pub address: Address,
	/// Immediate caller of the frame.
	pub caller: Address,
	/// Value apparent to the frame. Not re-transferred for delegate
	/// frames.
	pub apparent_value: U256,
}

/// Transaction-wide scope, shared by every frame of one call tree.
#[derive(Clone, Debug)]
pub struct TxContext {
	/// Signer of the transaction.
	pub origin: Address,
	/// Price per gas unit, settled at the top level.
	pub gas_price: U256,
	/// Chain identifier.
	pub chain_id: u64,
	/// Height of the block being built.
	pub block_number: u64,
	/// Timestamp of the block being built, seconds.
	pub timestamp: u64,
	/// Difficulty of the block being built.
	pub difficulty: U256,
	/// Gas ceiling of the block being built.
	pub block_gas_limit: u64,
}

impl Default for TxContext {
	fn default() -> TxContext {
		TxContext {
			origin: Address::zero(),
			gas_price: U256::zero(),
			chain_id: 0,
			block_number: 0,
			timestamp: 0,
			difficulty: U256::zero(),
			block_gas_limit: 0,
		}
	}
}
