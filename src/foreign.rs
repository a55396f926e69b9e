use crate::backend::Overlay;
use florin_core::{Context, ExitError};

/// Leading bytes of a foreign-dialect module.
pub const FOREIGN_MAGIC: [u8; 4] = *b"\0asm";

/// Code dispatches on its first four bytes: modules carrying the magic
/// run through the foreign dialect, everything else through the 256-bit
/// machine.
pub fn is_foreign(code: &[u8]) -> bool {
	code.len() >= FOREIGN_MAGIC.len() && code[..FOREIGN_MAGIC.len()] == FOREIGN_MAGIC
}

/// Seam for the alternate, non-256-bit bytecode dialect. The host
/// function bridge behind it lives outside this crate; executing foreign
/// code without a registered dialect is an error.
pub trait ForeignDialect {
	/// Split the deployable module out of an init payload.
	fn strip_init(&self, payload: &[u8]) -> Result<Vec<u8>, ExitError>;

	/// Run a foreign module against the backend.
	fn execute(
		&self,
		backend: &mut Overlay,
		context: &Context,
		code: &[u8],
		input: &[u8],
	) -> Result<Vec<u8>, ExitError>;
}
