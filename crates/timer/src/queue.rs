use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::timestamp::Timestamp;

#[cfg(test)]
mod tests;

/// Handle to a timer scheduled on a [`TimerQueue`].
///
/// Handles are unique for the lifetime of the queue that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
	generation: u64,
}

impl TimerHandle {
	/// Returns the generation this handle was issued in.
	pub const fn generation(self) -> u64 {
		self.generation
	}
}

/// Monotonic generation counter for timer handles.
#[derive(Debug, Default)]
struct GenerationClock {
	next: u64,
}

impl GenerationClock {
	fn next(&mut self) -> u64 {
		self.next = self.next.wrapping_add(1);
		self.next
	}
}

/// Pending timers for one owner, ordered by deadline.
///
/// Timers with equal deadlines fire in the order they were scheduled.
#[derive(Debug)]
pub struct TimerQueue<E> {
	/// Pending payloads keyed by `(deadline, generation)`.
	pending: BTreeMap<(Timestamp, u64), E>,
	/// Deadline lookup for cancellation.
	deadlines: HashMap<u64, Timestamp>,
	generations: GenerationClock,
}

impl<E> Default for TimerQueue<E> {
	fn default() -> Self {
		Self::new()
	}
}

impl<E> TimerQueue<E> {
	/// Creates an empty queue.
	pub fn new() -> Self {
		Self {
			pending: BTreeMap::new(),
			deadlines: HashMap::new(),
			generations: GenerationClock::default(),
		}
	}

	/// Schedules `payload` to fire `delay` after `now`.
	pub fn schedule(&mut self, now: Timestamp, delay: Duration, payload: E) -> TimerHandle {
		let generation = self.generations.next();
		let deadline = now + delay;
		self.pending.insert((deadline, generation), payload);
		self.deadlines.insert(generation, deadline);
		TimerHandle { generation }
	}

	/// Cancels a pending timer, returning its payload.
	///
	/// Returns `None` if the timer already fired or was cancelled.
	pub fn cancel(&mut self, handle: TimerHandle) -> Option<E> {
		let deadline = self.deadlines.remove(&handle.generation)?;
		self.pending.remove(&(deadline, handle.generation))
	}

	/// Returns true if the timer is still pending.
	pub fn is_pending(&self, handle: TimerHandle) -> bool {
		self.deadlines.contains_key(&handle.generation)
	}

	/// Returns the deadline of a pending timer.
	pub fn deadline(&self, handle: TimerHandle) -> Option<Timestamp> {
		self.deadlines.get(&handle.generation).copied()
	}

	/// Removes and returns the earliest timer due at or before `until`.
	pub fn pop_due(&mut self, until: Timestamp) -> Option<(TimerHandle, Timestamp, E)> {
		let (&(deadline, generation), _) = self.pending.first_key_value()?;
		if deadline > until {
			return None;
		}
		let payload = self.pending.remove(&(deadline, generation))?;
		self.deadlines.remove(&generation);
		Some((TimerHandle { generation }, deadline, payload))
	}

	/// Returns the earliest pending deadline.
	pub fn next_deadline(&self) -> Option<Timestamp> {
		self.pending.first_key_value().map(|(&(deadline, _), _)| deadline)
	}

	/// Returns the number of pending timers.
	pub fn len(&self) -> usize {
		self.pending.len()
	}

	/// Returns true if no timers are pending.
	pub fn is_empty(&self) -> bool {
		self.pending.is_empty()
	}

	/// Cancels every pending timer. Returns how many were cancelled.
	pub fn clear(&mut self) -> usize {
		let cancelled = self.pending.len();
		self.pending.clear();
		self.deadlines.clear();
		cancelled
	}
}
