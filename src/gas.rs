use florin_core::ExitFatal;

/// Deployment-level metering constants.
#[derive(Clone, Debug)]
pub struct GasSchedule {
	/// Intrinsic charge of an ordinary call.
	pub tx_base: u64,
	/// Intrinsic charge of a contract deployment.
	pub create_base: u64,
	/// Per zero byte of payload.
	pub zero_byte: u64,
	/// Per nonzero byte of payload.
	pub nonzero_byte: u64,
	/// Nested calls beyond this depth fatally abort the tree.
	pub max_call_depth: usize,
	/// Operand stack ceiling per frame.
	pub stack_limit: usize,
	/// Linear memory ceiling per frame, bytes.
	pub frame_memory_limit: usize,
}

impl Default for GasSchedule {
	fn default() -> GasSchedule {
		GasSchedule {
			tx_base: 21_000,
			create_base: 53_000,
			zero_byte: 4,
			nonzero_byte: 68,
			max_call_depth: 8,
			stack_limit: 1024,
			frame_memory_limit: 8 * 1024 * 1024,
		}
	}
}

/// Intrinsic charge of a payload: base by kind plus per-byte rates.
pub fn intrinsic_gas(schedule: &GasSchedule, create: bool, payload: &[u8]) -> u64 {
	let base = if create {
		schedule.create_base
	} else {
		schedule.tx_base
	};
	payload.iter().fold(base, |acc, b| {
		acc + if *b == 0 {
			schedule.zero_byte
		} else {
			schedule.nonzero_byte
		}
	})
}

/// Per-transaction limiter shared by every frame of a call tree. Gas
/// used is the intrinsic charge plus one unit per 1024 interpreter
/// steps.
#[derive(Clone, Debug)]
pub struct Limit {
	gas_limit: u64,
	intrinsic: u64,
	steps: u64,
}

impl Limit {
	pub fn new(gas_limit: u64) -> Limit {
		Limit {
			gas_limit,
			intrinsic: 0,
			steps: 0,
		}
	}

	pub fn charge_intrinsic(&mut self, amount: u64) -> Result<(), ExitFatal> {
		self.intrinsic = self.intrinsic.saturating_add(amount);
		self.check()
	}

	/// Ticked once per dispatched opcode.
	pub fn record_step(&mut self) -> Result<(), ExitFatal> {
		self.steps += 1;
		self.check()
	}

	pub fn gas_limit(&self) -> u64 {
		self.gas_limit
	}

	pub fn gas(&self) -> u64 {
		self.intrinsic.saturating_add(self.steps / 1024)
	}

	pub fn gas_left(&self) -> u64 {
		self.gas_limit.saturating_sub(self.gas())
	}

	fn check(&self) -> Result<(), ExitFatal> {
		if self.gas() > self.gas_limit {
			Err(ExitFatal::OutOfGas)
		} else {
			Ok(())
		}
	}
}
