/// Exit reason of a single machine invocation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitReason {
	Succeed(ExitSucceed),
	Revert(ExitRevert),
	Error(ExitError),
	Fatal(ExitFatal),
}

impl ExitReason {
	pub fn is_succeed(&self) -> bool {
		matches!(self, ExitReason::Succeed(_))
	}

	pub fn is_revert(&self) -> bool {
		matches!(self, ExitReason::Revert(_))
	}

	pub fn is_error(&self) -> bool {
		matches!(self, ExitReason::Error(_))
	}

	/// Fatal reasons abort the whole call tree, not just the current frame.
	pub fn is_fatal(&self) -> bool {
		matches!(self, ExitReason::Fatal(_))
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitSucceed {
	Stopped,
	Returned,
	Dropped,
}

impl From<ExitSucceed> for ExitReason {
	fn from(exit: ExitSucceed) -> ExitReason {
		ExitReason::Succeed(exit)
	}
}

/// Controlled halt: state of the frame is discarded but the output range
/// is delivered to the caller as the revert payload.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitRevert {
	Reverted,
}

impl From<ExitRevert> for ExitReason {
	fn from(exit: ExitRevert) -> ExitReason {
		ExitReason::Revert(exit)
	}
}

/// Errors local to one frame. A nested call that exits with one of these
/// is rolled back and absorbed by its caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitError {
	StackUnderflow,
	StackOverflow,
	InvalidJump,
	InvalidRange,
	OutOfBounds,
	InvalidOpcode,
	InsufficientBalance,
	StaticViolation,
	NotContract,
	CreateCollision,
	Other(&'static str),
}

impl From<ExitError> for ExitReason {
	fn from(exit: ExitError) -> ExitReason {
		ExitReason::Error(exit)
	}
}

/// Conditions that abort the entire call tree without merging.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitFatal {
	OutOfGas,
	CallDepthExceeded,
	Other(&'static str),
}

impl From<ExitFatal> for ExitReason {
	fn from(exit: ExitFatal) -> ExitReason {
		ExitReason::Fatal(exit)
	}
}
