use crate::backend::Overlay;
use florin_bigint::{Address, U256};
use florin_core::ExitError;

/// Call scope handed to a builtin invocation.
#[derive(Clone, Debug)]
pub struct BuiltinContext {
	pub caller: Address,
	pub address: Address,
	pub value: U256,
}

/// Native contract pinned at a fixed address. When the executor resolves
/// a receiver to a registered builtin, the builtin runs instead of any
/// bytecode.
pub trait Builtin {
	fn call(
		&self,
		backend: &mut Overlay,
		context: &BuiltinContext,
		input: &[u8],
	) -> Result<Vec<u8>, ExitError>;
}
