use florin_vm::bigint::{Address, H256, U256};
use florin_vm::{
	Builtin, BuiltinContext, CallData, CodeCache, Context, Executor, ExitError, ExitReason,
	ExitSucceed, ForeignDialect, GasSchedule, Overlay, Snapshot, TxContext,
};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

fn addr(n: u8) -> Address {
	Address::from_slice(&[n; 20])
}

fn executor_for(overlay: Overlay) -> Executor {
	Executor::new(
		overlay,
		GasSchedule::default(),
		Arc::new(CodeCache::default()),
		TxContext::default(),
		10_000_000,
	)
}

/// Test dialect: init payloads carry an 8-byte header, execution echoes
/// the input back reversed.
struct EchoDialect;

impl ForeignDialect for EchoDialect {
	fn strip_init(&self, payload: &[u8]) -> Result<Vec<u8>, ExitError> {
		if payload.len() < 8 {
			return Err(ExitError::Other("short foreign payload"));
		}
		let mut code = payload[..4].to_vec();
		code.extend_from_slice(&payload[8..]);
		Ok(code)
	}

	fn execute(
		&self,
		_backend: &mut Overlay,
		_context: &Context,
		_code: &[u8],
		input: &[u8],
	) -> Result<Vec<u8>, ExitError> {
		Ok(input.iter().rev().cloned().collect())
	}
}

fn foreign_module(body: &[u8]) -> Vec<u8> {
	let mut module = b"\0asm\x01\x00\x00\x00".to_vec();
	module.extend_from_slice(body);
	module
}

#[test]
fn foreign_code_without_dialect_is_an_error() {
	let snapshot = Rc::new(Snapshot::new(0, H256::zero()));
	let contract = addr(0xc0);
	let mut overlay = Overlay::new(snapshot);
	overlay.set_code(contract, foreign_module(&[1, 2])).unwrap();

	let (result, _) = executor_for(overlay)
		.execute(CallData::call(addr(1), contract, U256::zero(), Vec::new()))
		.unwrap();
	assert!(matches!(
		result.reason,
		ExitReason::Error(ExitError::Other(_))
	));
}

#[test]
fn foreign_code_routes_through_the_dialect() {
	let snapshot = Rc::new(Snapshot::new(0, H256::zero()));
	let contract = addr(0xc0);
	let mut overlay = Overlay::new(snapshot);
	overlay.set_code(contract, foreign_module(&[1, 2])).unwrap();

	let (result, _) = executor_for(overlay)
		.with_dialect(Rc::new(EchoDialect))
		.execute(CallData::call(
			addr(1),
			contract,
			U256::zero(),
			vec![1, 2, 3],
		))
		.unwrap();
	assert_eq!(result.reason, ExitReason::Succeed(ExitSucceed::Returned));
	assert_eq!(result.output, vec![3, 2, 1]);
}

#[test]
fn foreign_create_strips_the_init_section() {
	let snapshot = Rc::new(Snapshot::new(0, H256::zero()));
	let overlay = Overlay::new(snapshot);

	let (result, overlay) = executor_for(overlay)
		.with_dialect(Rc::new(EchoDialect))
		.execute(CallData::create(
			addr(1),
			U256::zero(),
			foreign_module(&[7, 8, 9]),
		))
		.unwrap();

	assert!(result.is_success());
	let created = result.created.unwrap();
	// header dropped, magic kept
	let mut expected = b"\0asm".to_vec();
	expected.extend_from_slice(&[7, 8, 9]);
	assert_eq!(overlay.code(created), expected);
}

/// Builtin that stores its input under a fixed key and echoes it.
struct Recorder;

impl Builtin for Recorder {
	fn call(
		&self,
		backend: &mut Overlay,
		context: &BuiltinContext,
		input: &[u8],
	) -> Result<Vec<u8>, ExitError> {
		backend.db_set(context.address, b"last", input)?;
		Ok(input.to_vec())
	}
}

#[test]
fn builtin_runs_instead_of_bytecode() {
	let snapshot = Rc::new(Snapshot::new(0, H256::zero()));
	let builtin_addr = addr(0x09);
	let mut builtins: BTreeMap<Address, Rc<dyn Builtin>> = BTreeMap::new();
	builtins.insert(builtin_addr, Rc::new(Recorder));
	let overlay = Overlay::with_builtins(snapshot, Rc::new(builtins));

	let (result, overlay) = executor_for(overlay)
		.execute(CallData::call(
			addr(1),
			builtin_addr,
			U256::zero(),
			vec![5, 6],
		))
		.unwrap();

	assert_eq!(result.reason, ExitReason::Succeed(ExitSucceed::Returned));
	assert_eq!(result.output, vec![5, 6]);
	assert_eq!(overlay.db_get(builtin_addr, b"last"), vec![5, 6]);
}
