use std::time::Duration;

use crate::queue::{TimerHandle, TimerQueue};
use crate::timestamp::Timestamp;

/// Holds at most one pending timer for a single purpose.
///
/// Arming a slot cancels whatever it previously held, so two timers for the
/// same purpose can never both be pending.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimerSlot {
	handle: Option<TimerHandle>,
}

impl TimerSlot {
	/// Creates an empty slot.
	pub const fn new() -> Self {
		Self { handle: None }
	}

	/// Returns the held handle.
	pub const fn handle(&self) -> Option<TimerHandle> {
		self.handle
	}

	/// Returns true if the slot holds a handle that is still pending on `queue`.
	pub fn is_armed<E>(&self, queue: &TimerQueue<E>) -> bool {
		self.handle.is_some_and(|h| queue.is_pending(h))
	}

	/// Returns true if `handle` is the one held by this slot.
	pub fn holds(&self, handle: TimerHandle) -> bool {
		self.handle == Some(handle)
	}

	/// Cancels the held timer (if any) and schedules a replacement.
	///
	/// Returns the superseded payload when one was still pending.
	pub fn arm<E>(&mut self, queue: &mut TimerQueue<E>, now: Timestamp, delay: Duration, payload: E) -> Option<E> {
		let superseded = self.disarm(queue);
		self.handle = Some(queue.schedule(now, delay, payload));
		superseded
	}

	/// Cancels the held timer, if any, and empties the slot.
	pub fn disarm<E>(&mut self, queue: &mut TimerQueue<E>) -> Option<E> {
		self.handle.take().and_then(|h| queue.cancel(h))
	}

	/// Empties the slot without touching the queue.
	///
	/// Used once the held timer has fired.
	pub fn release(&mut self) -> Option<TimerHandle> {
		self.handle.take()
	}
}
