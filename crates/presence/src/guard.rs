use std::fmt;
use std::time::Duration;

use veneer_timer::{TimerQueue, TimerSlot, Timestamp};

#[cfg(test)]
mod tests;

/// Default cooldown between two effective invocations.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(300);

/// Suppresses repeated invocations of an action within a cooldown window.
///
/// The first [`call`](Self::call) while unlocked runs the action
/// synchronously and locks the guard; calls made while locked are discarded
/// without extending the lock. Multi-argument actions take a tuple.
pub struct ActionGuard<A> {
	action: Box<dyn FnMut(A) + Send>,
	cooldown: Duration,
	now: Timestamp,
	/// When the current lock started.
	locked_at: Option<Timestamp>,
	timers: TimerQueue<()>,
	release: TimerSlot,
	invocations: u64,
	suppressed: u64,
}

impl<A> fmt::Debug for ActionGuard<A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActionGuard")
			.field("cooldown", &self.cooldown)
			.field("now", &self.now)
			.field("locked_at", &self.locked_at)
			.field("invocations", &self.invocations)
			.field("suppressed", &self.suppressed)
			.finish_non_exhaustive()
	}
}

impl<A> ActionGuard<A> {
	/// Wraps `action` with the given cooldown.
	pub fn new(action: impl FnMut(A) + Send + 'static, cooldown: Duration) -> Self {
		Self {
			action: Box::new(action),
			cooldown,
			now: Timestamp::ZERO,
			locked_at: None,
			timers: TimerQueue::new(),
			release: TimerSlot::new(),
			invocations: 0,
			suppressed: 0,
		}
	}

	/// Wraps `action` with [`DEFAULT_COOLDOWN`].
	pub fn with_default_cooldown(action: impl FnMut(A) + Send + 'static) -> Self {
		Self::new(action, DEFAULT_COOLDOWN)
	}

	/// Invokes the action unless the guard is locked.
	///
	/// Returns true if the action ran.
	pub fn call(&mut self, args: A) -> bool {
		if self.locked_at.is_some() {
			self.suppressed += 1;
			tracing::trace!(at = %self.now, suppressed = self.suppressed, "guard.suppressed");
			return false;
		}

		self.locked_at = Some(self.now);
		self.release.arm(&mut self.timers, self.now, self.cooldown, ());
		self.invocations += 1;
		tracing::trace!(at = %self.now, cooldown = ?self.cooldown, "guard.invoke");
		(self.action)(args);
		true
	}

	/// Replaces the wrapped action and cooldown.
	pub fn reconfigure(&mut self, action: impl FnMut(A) + Send + 'static, cooldown: Duration) {
		self.action = Box::new(action);
		self.set_cooldown(cooldown);
	}

	/// Changes the cooldown.
	///
	/// A pending unlock is rescheduled against the new cooldown, measured from
	/// the instant the current lock started. If that instant is already past,
	/// the guard unlocks immediately.
	pub fn set_cooldown(&mut self, cooldown: Duration) {
		self.cooldown = cooldown;
		let Some(locked_at) = self.locked_at else {
			return;
		};

		let release_at = locked_at + cooldown;
		if release_at <= self.now {
			self.release.disarm(&mut self.timers);
			self.unlock();
		} else {
			let remaining = release_at.saturating_since(self.now);
			self.release.arm(&mut self.timers, self.now, remaining, ());
		}
	}

	/// Advances logical time by `delta`.
	pub fn tick(&mut self, delta: Duration) {
		self.advance_to(self.now + delta);
	}

	/// Advances logical time to `target`, releasing the lock when due.
	pub fn advance_to(&mut self, target: Timestamp) {
		if target < self.now {
			return;
		}
		while let Some((_, at, ())) = self.timers.pop_due(target) {
			self.now = at;
			self.release.release();
			self.unlock();
		}
		self.now = target;
	}

	/// Returns true while calls are being discarded.
	pub fn is_locked(&self) -> bool {
		self.locked_at.is_some()
	}

	pub fn cooldown(&self) -> Duration {
		self.cooldown
	}

	/// Returns the number of times the action actually ran.
	pub fn invocations(&self) -> u64 {
		self.invocations
	}

	/// Returns the number of discarded calls.
	pub fn suppressed(&self) -> u64 {
		self.suppressed
	}

	pub fn now(&self) -> Timestamp {
		self.now
	}

	/// Returns true if an unlock is pending.
	pub fn is_release_pending(&self) -> bool {
		self.release.is_armed(&self.timers)
	}

	/// Cancels the pending unlock, leaving the guard unlocked.
	pub fn teardown(&mut self) {
		self.release.release();
		self.timers.clear();
		self.locked_at = None;
	}

	fn unlock(&mut self) {
		self.locked_at = None;
		tracing::trace!(at = %self.now, "guard.unlock");
	}
}

impl<A> Drop for ActionGuard<A> {
	fn drop(&mut self) {
		self.teardown();
	}
}
