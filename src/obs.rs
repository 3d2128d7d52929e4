//! Optional observability helpers for document submissions.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `crpt_throttle.submit` with the `endpoint`
//!   and `stage` fields, plus events for timeouts, transport failures, and scheduler lifecycle.
//! - Enable `metrics` to increment the `crpt_throttle_submit_total` counter for every
//!   attempt/success/rejected/timeout/failure, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmitOutcome {
	/// Entry to [`Submitter::submit`](crate::submit::Submitter::submit).
	Attempt,
	/// The transport returned a response.
	Success,
	/// Input validation failed before a permit was requested.
	Rejected,
	/// No permit became available in time.
	Timeout,
	/// Serialization or transport failure after a permit was granted.
	Failure,
}
impl SubmitOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SubmitOutcome::Attempt => "attempt",
			SubmitOutcome::Success => "success",
			SubmitOutcome::Rejected => "rejected",
			SubmitOutcome::Timeout => "timeout",
			SubmitOutcome::Failure => "failure",
		}
	}

	/// Classifies a finished call.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => SubmitOutcome::Success,
			Err(Error::InvalidInput) => SubmitOutcome::Rejected,
			Err(Error::ThrottleTimeout { .. }) => SubmitOutcome::Timeout,
			Err(_) => SubmitOutcome::Failure,
		}
	}
}
impl Display for SubmitOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
