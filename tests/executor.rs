use florin_vm::bigint::{Address, H256, U256};
use florin_vm::{
	derive_create_address, CallData, CodeCache, Executor, ExecutorError, ExitError, ExitFatal,
	ExitReason, ExitRevert, ExitSucceed, GasSchedule, Overlay, Snapshot, TxContext,
};
use std::rc::Rc;
use std::sync::Arc;

fn addr(n: u8) -> Address {
	Address::from_slice(&[n; 20])
}

fn storage_key(n: u8) -> [u8; 32] {
	let mut key = [0u8; 32];
	key[31] = n;
	key
}

/// Settled state with the given contracts and balances in place.
fn state_with(contracts: &[(Address, Vec<u8>)], balances: &[(Address, u64)]) -> Rc<Snapshot> {
	let snapshot = Rc::new(Snapshot::new(1, H256::zero()));
	let mut overlay = Overlay::new(snapshot.clone());
	for (address, code) in contracts {
		overlay.set_code(*address, code.clone()).unwrap();
	}
	for (address, balance) in balances {
		overlay.add_balance(*address, U256::from(*balance)).unwrap();
	}
	let root = overlay.merge();
	Rc::new(snapshot.at_root(root, 2, H256::zero()))
}

fn executor(snapshot: Rc<Snapshot>) -> Executor {
	executor_with_price(snapshot, 0)
}

fn executor_with_price(snapshot: Rc<Snapshot>, gas_price: u64) -> Executor {
	Executor::new(
		Overlay::new(snapshot),
		GasSchedule::default(),
		Arc::new(CodeCache::default()),
		TxContext {
			gas_price: U256::from(gas_price),
			..TxContext::default()
		},
		10_000_000,
	)
}

/// PUSH1 0x2a, PUSH1 0, MSTORE, PUSH1 32, PUSH1 0, RETURN
fn returner_code() -> Vec<u8> {
	hex::decode("602a60005260206000f3").unwrap()
}

/// PUSH1 7, PUSH1 1, SSTORE, STOP
fn storer_code() -> Vec<u8> {
	vec![0x60, 0x07, 0x60, 0x01, 0x55, 0x00]
}

/// Init code whose RETURN value is `payload`, via CODECOPY.
fn init_code_for(payload: &[u8]) -> Vec<u8> {
	let len = payload.len() as u8;
	let mut code = vec![
		0x60, len, 0x60, 0x0c, 0x60, 0x00, 0x39, 0x60, len, 0x60, 0x00, 0xf3,
	];
	code.extend_from_slice(payload);
	code
}

#[test]
fn call_runs_contract_and_returns_output() {
	let contract = addr(0xc0);
	let snapshot = state_with(&[(contract, returner_code())], &[]);
	let (result, _) = executor(snapshot)
		.execute(CallData::call(addr(1), contract, U256::zero(), Vec::new()))
		.unwrap();

	assert_eq!(result.reason, ExitReason::Succeed(ExitSucceed::Returned));
	assert_eq!(result.output.len(), 32);
	assert_eq!(U256::from(&result.output[..]), U256::from(42u64));
	assert!(result.gas_used >= 21_000);
}

#[test]
fn call_bumps_sender_nonce() {
	let contract = addr(0xc0);
	let snapshot = state_with(&[(contract, returner_code())], &[]);
	let (_, overlay) = executor(snapshot)
		.execute(CallData::call(addr(1), contract, U256::zero(), Vec::new()))
		.unwrap();
	assert_eq!(overlay.account(addr(1)).nonce, 1);
}

#[test]
fn stale_nonce_is_rejected_up_front() {
	let snapshot = state_with(&[], &[]);
	let err = executor(snapshot)
		.execute(CallData::call(addr(1), addr(2), U256::zero(), Vec::new()).with_nonce(5))
		.unwrap_err();
	assert_eq!(
		err,
		ExecutorError::InvalidNonce {
			expected: 0,
			got: 5
		}
	);
}

#[test]
fn pure_transfer_moves_value() {
	let snapshot = state_with(&[], &[(addr(1), 100)]);
	let (result, overlay) = executor(snapshot)
		.execute(CallData::call(addr(1), addr(2), U256::from(40u64), Vec::new()))
		.unwrap();

	assert_eq!(result.reason, ExitReason::Succeed(ExitSucceed::Stopped));
	assert_eq!(overlay.account(addr(1)).balance, U256::from(60u64));
	assert_eq!(overlay.account(addr(2)).balance, U256::from(40u64));
}

#[test]
fn payload_to_codeless_account_is_an_error() {
	let snapshot = state_with(&[], &[(addr(1), 100)]);
	let (result, overlay) = executor(snapshot)
		.execute(CallData::call(addr(1), addr(2), U256::from(40u64), vec![1, 2, 3]))
		.unwrap();

	assert_eq!(result.reason, ExitReason::Error(ExitError::NotContract));
	// the frame rolled back, value included
	assert_eq!(overlay.account(addr(2)).balance, U256::zero());
}

#[test]
fn insufficient_balance_fails_the_frame() {
	let snapshot = state_with(&[], &[(addr(1), 10)]);
	let (result, _) = executor(snapshot)
		.execute(CallData::call(addr(1), addr(2), U256::from(40u64), Vec::new()))
		.unwrap();
	assert_eq!(
		result.reason,
		ExitReason::Error(ExitError::InsufficientBalance)
	);
}

#[test]
fn create_deploys_and_call_reaches_it() {
	let sender = addr(1);
	let snapshot = state_with(&[], &[]);

	let (result, overlay) = executor(snapshot.clone())
		.execute(CallData::create(
			sender,
			U256::zero(),
			init_code_for(&returner_code()),
		))
		.unwrap();

	let expected = derive_create_address(sender, 0);
	assert_eq!(result.reason, ExitReason::Succeed(ExitSucceed::Returned));
	assert_eq!(result.created, Some(expected));
	assert!(result.output.is_empty());

	let root = overlay.merge();
	let advanced = Rc::new(snapshot.at_root(root, 3, H256::zero()));
	assert_eq!(
		Overlay::new(advanced.clone()).code(expected),
		returner_code()
	);

	let (result, _) = executor(advanced)
		.execute(CallData::call(addr(2), expected, U256::zero(), Vec::new()))
		.unwrap();
	assert_eq!(U256::from(&result.output[..]), U256::from(42u64));
}

#[test]
fn create_bumps_sender_nonce() {
	let sender = addr(1);
	let snapshot = state_with(&[], &[]);

	let (result, overlay) = executor(snapshot.clone())
		.execute(CallData::create(
			sender,
			U256::zero(),
			init_code_for(&returner_code()),
		))
		.unwrap();
	assert_eq!(result.created, Some(derive_create_address(sender, 0)));
	assert_eq!(overlay.account(sender).nonce, 1);

	// the next deployment lands at a fresh address
	let root = overlay.merge();
	let advanced = Rc::new(snapshot.at_root(root, 3, H256::zero()));
	let (result, overlay) = executor(advanced)
		.execute(
			CallData::create(sender, U256::zero(), init_code_for(&storer_code())).with_nonce(1),
		)
		.unwrap();
	assert_eq!(result.reason, ExitReason::Succeed(ExitSucceed::Returned));
	assert_eq!(result.created, Some(derive_create_address(sender, 1)));
	assert_eq!(overlay.account(sender).nonce, 2);
}

#[test]
fn create_collision_is_an_error() {
	let sender = addr(1);
	let taken = derive_create_address(sender, 0);
	let snapshot = state_with(&[(taken, storer_code())], &[]);

	let (result, _) = executor(snapshot)
		.execute(CallData::create(
			sender,
			U256::zero(),
			init_code_for(&returner_code()),
		))
		.unwrap();
	assert_eq!(result.reason, ExitReason::Error(ExitError::CreateCollision));
	assert_eq!(result.created, None);
}

#[test]
fn revert_rolls_back_and_delivers_payload() {
	// SSTORE 7 at 1, then write 0xaa to memory and REVERT it
	let code = vec![
		0x60, 0x07, 0x60, 0x01, 0x55, 0x60, 0xaa, 0x60, 0x00, 0x53, 0x60, 0x01, 0x60, 0x00, 0xfd,
	];
	let contract = addr(0xc0);
	let snapshot = state_with(&[(contract, code)], &[]);

	let (result, overlay) = executor(snapshot)
		.execute(CallData::call(addr(1), contract, U256::zero(), Vec::new()))
		.unwrap();

	assert_eq!(result.reason, ExitReason::Revert(ExitRevert::Reverted));
	assert_eq!(result.output, vec![0xaa]);
	assert_eq!(overlay.db_get(contract, &storage_key(1)), Vec::<u8>::new());
	// the nonce bump from the top level survives the rollback
	assert_eq!(overlay.account(addr(1)).nonce, 1);
}

#[test]
fn storage_write_lands_in_state() {
	let contract = addr(0xc0);
	let snapshot = state_with(&[(contract, storer_code())], &[]);

	let (result, overlay) = executor(snapshot.clone())
		.execute(CallData::call(addr(1), contract, U256::zero(), Vec::new()))
		.unwrap();
	assert!(result.is_success());
	assert_eq!(overlay.db_get(contract, &storage_key(1)), vec![0x07]);

	let root = overlay.merge();
	let advanced = Rc::new(snapshot.at_root(root, 3, H256::zero()));
	assert_eq!(
		Overlay::new(advanced).db_get(contract, &storage_key(1)),
		vec![0x07]
	);
}

#[test]
fn static_call_rejects_writes() {
	let contract = addr(0xc0);
	let snapshot = state_with(&[(contract, storer_code())], &[]);

	let (result, overlay) = executor(snapshot)
		.execute(CallData::call(addr(1), contract, U256::zero(), Vec::new()).read_only())
		.unwrap();
	assert_eq!(result.reason, ExitReason::Error(ExitError::StaticViolation));
	assert_eq!(overlay.db_get(contract, &storage_key(1)), Vec::<u8>::new());
	// read-only calls skip the nonce bump
	assert_eq!(overlay.account(addr(1)).nonce, 0);
}

#[test]
fn delegate_writes_into_the_proxy_storage() {
	let target = addr(0xdd);
	let proxy = addr(0xc0);
	// PUSH1 0 x4, PUSH20 target, PUSH1 0, DELEGATECALL, STOP
	let mut proxy_code = vec![0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x73];
	proxy_code.extend_from_slice(target.as_bytes());
	proxy_code.extend_from_slice(&[0x60, 0x00, 0xf4, 0x00]);

	let snapshot = state_with(&[(target, storer_code()), (proxy, proxy_code)], &[]);
	let (result, overlay) = executor(snapshot)
		.execute(CallData::call(addr(1), proxy, U256::zero(), Vec::new()))
		.unwrap();

	assert!(result.is_success());
	assert_eq!(overlay.db_get(proxy, &storage_key(1)), vec![0x07]);
	assert_eq!(overlay.db_get(target, &storage_key(1)), Vec::<u8>::new());
}

#[test]
fn nested_call_failure_is_absorbed() {
	let target = addr(0xdd);
	let proxy = addr(0xc0);
	// proxy calls the reverting target, then stores the success flag at
	// key 1: PUSH1 0 x4 (out/in regions), PUSH1 0 (value), PUSH20
	// target, PUSH1 0 (gas), CALL, PUSH1 1, SSTORE, STOP
	let reverter = vec![0x60, 0x00, 0x60, 0x00, 0xfd];
	let mut proxy_code = vec![
		0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x73,
	];
	proxy_code.extend_from_slice(target.as_bytes());
	// flag + 1 goes to storage, so an absorbed failure stores 1
	proxy_code.extend_from_slice(&[0x60, 0x00, 0xf1, 0x60, 0x01, 0x01, 0x60, 0x01, 0x55, 0x00]);

	let snapshot = state_with(&[(target, reverter), (proxy, proxy_code)], &[]);
	let (result, overlay) = executor(snapshot)
		.execute(CallData::call(addr(1), proxy, U256::zero(), Vec::new()))
		.unwrap();

	assert_eq!(result.reason, ExitReason::Succeed(ExitSucceed::Stopped));
	assert_eq!(overlay.db_get(proxy, &storage_key(1)), vec![0x01]);
}

#[test]
fn call_depth_ceiling_aborts_the_tree() {
	let contract = addr(0xc0);
	// calls itself forever: PUSH1 0 x4, PUSH1 0 (value), ADDRESS,
	// PUSH1 0 (gas), CALL, STOP
	let code = vec![
		0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x30, 0x60, 0x00, 0xf1, 0x00,
	];
	let snapshot = state_with(&[(contract, code)], &[]);
	let (result, _) = executor(snapshot)
		.execute(CallData::call(addr(1), contract, U256::zero(), Vec::new()))
		.unwrap();
	assert_eq!(
		result.reason,
		ExitReason::Fatal(ExitFatal::CallDepthExceeded)
	);
}

#[test]
fn coinbase_credits_without_gas() {
	let snapshot = state_with(&[], &[]);
	let (result, overlay) = executor(snapshot)
		.execute(CallData::coinbase(addr(9), U256::from(50u64)))
		.unwrap();

	assert!(result.is_success());
	assert_eq!(result.gas_used, 0);
	assert_eq!(result.fee, U256::zero());
	assert_eq!(overlay.account(addr(9)).balance, U256::from(50u64));
}

#[test]
fn fee_is_debited_even_on_failure() {
	let sender = addr(1);
	let snapshot = state_with(&[], &[(sender, 1_000_000)]);

	// payload to a codeless account fails, the fee still settles
	let (result, overlay) = executor_with_price(snapshot, 1)
		.execute(CallData::call(sender, addr(2), U256::zero(), vec![0xff]))
		.unwrap();

	assert_eq!(result.reason, ExitReason::Error(ExitError::NotContract));
	let expected_fee = U256::from(result.gas_used);
	assert_eq!(result.fee, expected_fee);
	assert_eq!(
		overlay.account(sender).balance,
		U256::from(1_000_000u64).wrapping_sub(expected_fee)
	);
}

#[test]
fn fee_is_capped_by_the_origin_balance() {
	let sender = addr(1);
	let snapshot = state_with(&[], &[(sender, 100)]);

	let (result, overlay) = executor_with_price(snapshot, 1)
		.execute(CallData::call(sender, addr(2), U256::zero(), Vec::new()))
		.unwrap();

	assert!(result.gas_used >= 21_000);
	assert_eq!(result.fee, U256::from(100u64));
	assert!(overlay.account(sender).balance.is_zero());
}

#[test]
fn gas_limit_below_intrinsic_is_fatal() {
	let sender = addr(1);
	let snapshot = state_with(&[], &[]);
	let executor = Executor::new(
		Overlay::new(snapshot),
		GasSchedule::default(),
		Arc::new(CodeCache::default()),
		TxContext::default(),
		20_000,
	);
	let (result, _) = executor
		.execute(CallData::call(sender, addr(2), U256::zero(), Vec::new()))
		.unwrap();
	assert_eq!(result.reason, ExitReason::Fatal(ExitFatal::OutOfGas));
}

#[test]
fn logs_survive_success_and_die_with_reverts() {
	let contract = addr(0xc0);
	// LOG0 over one memory byte, then STOP
	let logger = vec![
		0x60, 0xaa, 0x60, 0x00, 0x53, 0x60, 0x01, 0x60, 0x00, 0xa0, 0x00,
	];
	let snapshot = state_with(&[(contract, logger)], &[]);
	let (result, _) = executor(snapshot)
		.execute(CallData::call(addr(1), contract, U256::zero(), Vec::new()))
		.unwrap();
	assert_eq!(result.logs.len(), 1);
	assert_eq!(result.logs[0].address, contract);
	assert_eq!(result.logs[0].data, vec![0xaa]);

	// same contract, but revert after logging
	let mut reverting = vec![0x60, 0xaa, 0x60, 0x00, 0x53, 0x60, 0x01, 0x60, 0x00, 0xa0];
	reverting.extend_from_slice(&[0x60, 0x00, 0x60, 0x00, 0xfd]);
	let snapshot = state_with(&[(contract, reverting)], &[]);
	let (result, _) = executor(snapshot)
		.execute(CallData::call(addr(1), contract, U256::zero(), Vec::new()))
		.unwrap();
	assert!(result.reason.is_revert());
	assert!(result.logs.is_empty());
}
