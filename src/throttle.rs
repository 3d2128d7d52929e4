//! Windowed throttle: a [`PermitPool`] refilled by a [`WindowScheduler`].
//!
//! The pool bounds how many sends may start, the scheduler restores capacity once per
//! window, and [`PermitGuard`] hands each granted permit back when the send finishes.
//! Together they enforce "at most N sends per window" for every caller that shares a
//! [`Throttle`].

pub mod permit;
pub mod scheduler;

pub use permit::*;
pub use scheduler::*;

// std
use std::time::Duration;
// self
use crate::{_prelude::*, config::ThrottleConfig};

/// Permit pool plus the scheduler that refills it.
#[derive(Debug)]
pub struct Throttle {
	pool: Arc<dyn PermitPool>,
	scheduler: WindowScheduler,
}
impl Throttle {
	/// Starts replenishing `pool` once per `window`.
	///
	/// Must be called from within a tokio runtime.
	pub fn start(pool: Arc<dyn PermitPool>, window: Duration) -> Result<Self> {
		let scheduler = WindowScheduler::start(Arc::clone(&pool), window)?;

		Ok(Self { pool, scheduler })
	}

	/// Builds a [`WindowPermitPool`] sized by `config.request_limit` and starts it.
	pub fn from_config(config: &ThrottleConfig) -> Result<Self> {
		let capacity = usize::try_from(config.request_limit).unwrap_or(usize::MAX);

		Self::start(Arc::new(WindowPermitPool::new(capacity)), config.window())
	}

	/// Waits up to `timeout` for a scoped permit.
	pub async fn acquire(&self, timeout: Duration) -> Option<PermitGuard<'_>> {
		PermitGuard::acquire(self.pool.as_ref(), timeout).await
	}

	/// Shared permit pool.
	pub fn pool(&self) -> &Arc<dyn PermitPool> {
		&self.pool
	}

	/// Replenishment driver.
	pub fn scheduler(&self) -> &WindowScheduler {
		&self.scheduler
	}

	/// Stops replenishment; see [`WindowScheduler::shutdown`].
	pub async fn shutdown(&self) {
		self.scheduler.shutdown().await;
	}
}
