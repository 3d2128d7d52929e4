//! Background task that refills a [`PermitPool`] once per window.

// std
use std::{panic, time::Duration};
// crates.io
use tokio::{
	runtime::Handle,
	task::JoinHandle,
	time::{self, MissedTickBehavior},
};
// self
use crate::{_prelude::*, error::ConfigError, throttle::PermitPool};

/// Periodic replenishment driver.
///
/// The first tick fires immediately, then once per `window`. Ticks missed while the
/// runtime was busy are skipped instead of replayed in a burst; replenishment is
/// clamped at capacity either way. The task stops on [`WindowScheduler::shutdown`] or
/// when the scheduler is dropped.
pub struct WindowScheduler {
	window: Duration,
	task: Mutex<Option<JoinHandle<()>>>,
}
impl WindowScheduler {
	/// Spawns the replenishment task on the current tokio runtime.
	pub fn start(pool: Arc<dyn PermitPool>, window: Duration) -> Result<Self, ConfigError> {
		let runtime = Handle::try_current().map_err(|_| ConfigError::MissingRuntime)?;
		let task = runtime.spawn(run(pool, window));

		#[cfg(feature = "tracing")]
		tracing::debug!(window_ms = window.as_millis() as u64, "Window scheduler started.");

		Ok(Self { window, task: Mutex::new(Some(task)) })
	}

	/// Replenishment cadence.
	pub fn window(&self) -> Duration {
		self.window
	}

	/// Returns true while the replenishment task is alive.
	pub fn is_running(&self) -> bool {
		self.task.lock().as_ref().is_some_and(|task| !task.is_finished())
	}

	/// Stops periodic replenishment. Sends already holding a permit are unaffected.
	///
	/// # Panics
	///
	/// Re-raises a panic that escaped the replenishment task; a broken scheduler is a
	/// process-level fault, not a per-call error.
	pub async fn shutdown(&self) {
		let Some(task) = self.task.lock().take() else {
			return;
		};

		task.abort();

		match task.await {
			Err(e) if e.is_panic() => panic::resume_unwind(e.into_panic()),
			_ => {
				#[cfg(feature = "tracing")]
				tracing::debug!("Window scheduler stopped.");
			},
		}
	}
}
impl Debug for WindowScheduler {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("WindowScheduler")
			.field("window", &self.window)
			.field("running", &self.is_running())
			.finish()
	}
}
impl Drop for WindowScheduler {
	fn drop(&mut self) {
		if let Some(task) = self.task.get_mut().take() {
			task.abort();
		}
	}
}

async fn run(pool: Arc<dyn PermitPool>, window: Duration) {
	let mut ticker = time::interval(window);

	ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

	loop {
		ticker.tick().await;
		pool.replenish();
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::throttle::WindowPermitPool;

	#[test]
	fn start_requires_a_runtime() {
		let pool: Arc<dyn PermitPool> = Arc::new(WindowPermitPool::new(1));
		let err = WindowScheduler::start(pool, Duration::from_secs(1))
			.expect_err("Starting outside a runtime must fail.");

		assert!(matches!(err, ConfigError::MissingRuntime));
	}

	#[tokio::test(start_paused = true)]
	async fn shutdown_stops_replenishment() {
		let pool = Arc::new(WindowPermitPool::new(1));
		let scheduler = WindowScheduler::start(pool.clone(), Duration::from_secs(1))
			.expect("Scheduler should start inside a runtime.");

		assert!(scheduler.is_running());

		scheduler.shutdown().await;

		assert!(!scheduler.is_running());
		assert!(pool.try_acquire().is_some());

		time::sleep(Duration::from_secs(3)).await;

		assert_eq!(pool.available(), 0, "A stopped scheduler must not refill the pool.");

		// Second shutdown is a no-op.
		scheduler.shutdown().await;
	}

	#[tokio::test(start_paused = true)]
	async fn refills_once_per_window() {
		let pool = Arc::new(WindowPermitPool::new(2));
		let scheduler = WindowScheduler::start(pool.clone(), Duration::from_secs(1))
			.expect("Scheduler should start inside a runtime.");

		// Let the immediate first tick run.
		tokio::task::yield_now().await;

		assert!(pool.try_acquire().is_some());
		assert!(pool.try_acquire().is_some());
		assert!(pool.try_acquire().is_none());

		time::sleep(Duration::from_millis(500)).await;

		assert_eq!(pool.available(), 0);

		time::sleep(Duration::from_millis(600)).await;

		assert_eq!(pool.available(), 2);
		assert_eq!(scheduler.window(), Duration::from_secs(1));
	}
}
