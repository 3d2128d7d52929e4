// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::SubmitOutcome;

/// Thread-safe counters for document submissions.
#[derive(Debug, Default)]
pub struct SubmitMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	rejected: AtomicU64,
	timeout: AtomicU64,
	failure: AtomicU64,
}
impl SubmitMetrics {
	/// Returns the total number of submit calls.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that received a response.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of calls rejected by input validation.
	pub fn rejections(&self) -> u64 {
		self.rejected.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that gave up waiting for a permit.
	pub fn timeouts(&self) -> u64 {
		self.timeout.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that failed after a permit was granted.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record(&self, outcome: SubmitOutcome) {
		let counter = match outcome {
			SubmitOutcome::Attempt => &self.attempts,
			SubmitOutcome::Success => &self.success,
			SubmitOutcome::Rejected => &self.rejected,
			SubmitOutcome::Timeout => &self.timeout,
			SubmitOutcome::Failure => &self.failure,
		};

		counter.fetch_add(1, Ordering::Relaxed);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_routes_to_matching_counter() {
		let metrics = SubmitMetrics::default();

		metrics.record(SubmitOutcome::Attempt);
		metrics.record(SubmitOutcome::Attempt);
		metrics.record(SubmitOutcome::Timeout);
		metrics.record(SubmitOutcome::Success);

		assert_eq!(metrics.attempts(), 2);
		assert_eq!(metrics.timeouts(), 1);
		assert_eq!(metrics.successes(), 1);
		assert_eq!(metrics.rejections(), 0);
		assert_eq!(metrics.failures(), 0);
	}
}
