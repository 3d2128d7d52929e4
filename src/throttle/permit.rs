//! Bounded counting-permit pool with timed acquisition and per-window accounting.

// std
use std::time::Duration;
// crates.io
use tokio::{
	sync::Semaphore,
	time::{self, Instant},
};
// self
use crate::_prelude::*;

/// Boxed future returned by [`PermitPool::acquire`].
pub type AcquireFuture<'a> = Pin<Box<dyn Future<Output = Option<Permit>> + 'a + Send>>;

/// Receipt for a granted permit, tagged with the window it was granted in.
///
/// A refill hands every permit of the previous window back to the pool, so a receipt
/// from an older window must not restore anything when it is released.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Permit {
	epoch: u64,
}
impl Permit {
	/// Creates a receipt for window `epoch`.
	pub const fn new(epoch: u64) -> Self {
		Self { epoch }
	}

	/// Window the permit was granted in.
	pub const fn epoch(self) -> u64 {
		self.epoch
	}
}

/// Counting-permit primitive consulted before every outbound send.
///
/// Implementations must keep the available count within `[0, capacity]` no matter how
/// `release` and `replenish` interleave, and must ignore releases of permits granted
/// before the latest refill.
pub trait PermitPool
where
	Self: Send + Sync,
{
	/// Waits up to `timeout` for a permit; resolves to `None` when none was granted.
	///
	/// A granted permit must eventually be handed back through [`PermitPool::release`].
	fn acquire(&self, timeout: Duration) -> AcquireFuture<'_>;

	/// Returns `permit` to the pool, clamped at capacity.
	fn release(&self, permit: Permit);

	/// Starts a new window with every permit available; driven by the window scheduler.
	fn replenish(&self);

	/// Number of permits that can be acquired right now.
	fn available(&self) -> usize;

	/// Upper bound on available permits.
	fn capacity(&self) -> usize;
}

impl Debug for dyn PermitPool {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PermitPool")
			.field("available", &self.available())
			.field("capacity", &self.capacity())
			.finish()
	}
}

#[derive(Debug)]
struct Generation {
	epoch: u64,
	semaphore: Semaphore,
}
impl Generation {
	fn new(epoch: u64, capacity: usize) -> Arc<Self> {
		Arc::new(Self { epoch, semaphore: Semaphore::new(capacity) })
	}
}

/// Default [`PermitPool`] backed by one fair [`Semaphore`] per window.
///
/// A refill swaps in a full semaphore for the next window and closes the old one, so
/// callers still waiting move over to the new window. Permits granted from a closed
/// semaphore are already accounted for by the refill and their release is dropped.
/// Releases of current-window permits are serialized behind the generation lock and
/// clamped at capacity.
#[derive(Debug)]
pub struct WindowPermitPool {
	capacity: usize,
	current: Mutex<Arc<Generation>>,
}
impl WindowPermitPool {
	/// Creates a full pool holding `capacity` permits.
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.min(Semaphore::MAX_PERMITS);

		Self { capacity, current: Mutex::new(Generation::new(0, capacity)) }
	}

	/// Takes a permit without waiting.
	pub fn try_acquire(&self) -> Option<Permit> {
		let generation = self.generation();
		let permit = generation.semaphore.try_acquire().ok()?;

		permit.forget();

		Some(Permit::new(generation.epoch))
	}

	/// Current window number; bumped by every refill.
	pub fn epoch(&self) -> u64 {
		self.current.lock().epoch
	}

	fn generation(&self) -> Arc<Generation> {
		Arc::clone(&self.current.lock())
	}
}
impl PermitPool for WindowPermitPool {
	fn acquire(&self, timeout: Duration) -> AcquireFuture<'_> {
		Box::pin(async move {
			let deadline = Instant::now() + timeout;

			loop {
				let generation = self.generation();

				match time::timeout_at(deadline, generation.semaphore.acquire()).await {
					Ok(Ok(permit)) => {
						permit.forget();

						return Some(Permit::new(generation.epoch));
					},
					// Closed by a refill; wait on the new window instead.
					Ok(Err(_)) => continue,
					Err(_) => return None,
				}
			}
		})
	}

	fn release(&self, permit: Permit) {
		let current = self.current.lock();

		if permit.epoch != current.epoch {
			return;
		}
		if current.semaphore.available_permits() < self.capacity {
			current.semaphore.add_permits(1);
		}
	}

	fn replenish(&self) {
		let previous = {
			let mut current = self.current.lock();
			let next = Generation::new(current.epoch.wrapping_add(1), self.capacity);

			std::mem::replace(&mut *current, next)
		};

		previous.semaphore.close();
	}

	fn available(&self) -> usize {
		self.generation().semaphore.available_permits()
	}

	fn capacity(&self) -> usize {
		self.capacity
	}
}

/// Scoped permit that returns itself to the pool exactly once when dropped.
///
/// Dropping happens on every exit path of the holder: normal return, early `?` return,
/// or cancellation of the enclosing future.
#[must_use = "dropping the guard releases the permit immediately"]
pub struct PermitGuard<'a> {
	pool: &'a dyn PermitPool,
	permit: Permit,
}
impl<'a> PermitGuard<'a> {
	/// Waits up to `timeout` for a permit from `pool`.
	pub async fn acquire(pool: &'a dyn PermitPool, timeout: Duration) -> Option<Self> {
		let permit = pool.acquire(timeout).await?;

		Some(Self { pool, permit })
	}

	/// Receipt held by this guard.
	pub fn permit(&self) -> Permit {
		self.permit
	}
}
impl Debug for PermitGuard<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("PermitGuard").field(&self.permit).finish()
	}
}
impl Drop for PermitGuard<'_> {
	fn drop(&mut self) {
		self.pool.release(self.permit);
	}
}
