//! Florin VM: a blockchain node's contract execution core.
//!
//! Three layers stack up here. `florin-bigint` supplies wrapping 256-bit
//! arithmetic; `florin-core` runs the stack-machine interpreter over it,
//! reaching the outside world only through its `Host` trait; and this
//! crate implements that world: a copy-on-write overlay over an
//! in-memory snapshot of the state trie, a shared content-hash code
//! cache, a step-metered gas limiter and the call executor that ties a
//! whole call tree together.
//!
//! ```no_run
//! use std::rc::Rc;
//! use std::sync::Arc;
//! use florin_vm::{
//!     CallData, CodeCache, Executor, GasSchedule, Overlay, Snapshot, TxContext,
//! };
//! use florin_vm::bigint::{Address, H256, U256};
//!
//! let snapshot = Rc::new(Snapshot::new(0, H256::zero()));
//! let overlay = Overlay::new(snapshot);
//! let executor = Executor::new(
//!     overlay,
//!     GasSchedule::default(),
//!     Arc::new(CodeCache::default()),
//!     TxContext::default(),
//!     10_000_000,
//! );
//! let sender = Address::zero();
//! let call = CallData::create(sender, U256::zero(), vec![0x60, 0x00, 0x60, 0x00, 0xf3]);
//! let (result, overlay) = executor.execute(call).unwrap();
//! let new_root = overlay.merge();
//! # let _ = (result, new_root);
//! ```

mod account;
mod backend;
mod builtin;
mod cache;
mod executor;
mod foreign;
mod gas;
mod host;
mod params;
mod util;

pub use crate::account::{empty_code_hash, Account};
pub use crate::backend::{Overlay, Snapshot};
pub use crate::builtin::{Builtin, BuiltinContext};
pub use crate::cache::{CodeCache, DEFAULT_CACHE_BUDGET};
pub use crate::executor::{Executor, ExecutorError};
pub use crate::foreign::{is_foreign, ForeignDialect, FOREIGN_MAGIC};
pub use crate::gas::{intrinsic_gas, GasSchedule, Limit};
pub use crate::params::{CallData, CallKind, LogEntry, VmResult};
pub use crate::util::{derive_create_address, keccak256};

pub use florin_bigint as bigint;
pub use florin_core::{
	CallOutcome, Context, ExitError, ExitFatal, ExitReason, ExitRevert, ExitSucceed, Host,
	Machine, Memory, Opcode, Stack, TxContext, Valids,
};
