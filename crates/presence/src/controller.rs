use std::fmt;
use std::time::Duration;

use veneer_timer::{TimerHandle, TimerQueue, TimerSlot, Timestamp};

use crate::config::PresenceConfig;
use crate::phase::{Phase, PresenceState, Transition, TransitionCause};


/// Callback invoked when the controller requests a change of the open intent.
///
/// Only synthetic closes call it, with `false`.
pub type OpenChangeFn = Box<dyn FnMut(bool) + Send>;

/// Timer payloads owned by a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PresenceTimer {
	/// Enter delay elapsed; reveal the element.
	Reveal,
	/// Exit animation finished; unmount the element.
	Unmount,
	/// Auto-dismiss timeout; synthesize a close.
	Dismiss,
}

/// Drives the two-stage mount/reveal and hide/unmount lifecycle of one overlay.
///
/// The consumer sets the open intent with [`Self::set_open`] and advances
/// logical time with [`Self::tick`] or [`Self::advance_to`]. While
/// [`Self::should_render`] is false the consumer renders nothing; otherwise
/// [`Self::is_visible`] selects the animation class.
///
/// At most one phase timer and one auto-dismiss timer are pending at any
/// time. Every intent change cancels the timer it supersedes, and teardown
/// (explicit or on drop) cancels both.
pub struct PresenceController {
	config: PresenceConfig,
	phase: Phase,
	/// Last open intent received, including synthetic closes.
	open: bool,
	now: Timestamp,
	timers: TimerQueue<PresenceTimer>,
	/// Pending reveal or unmount.
	phase_timer: TimerSlot,
	/// Pending auto-dismiss.
	dismiss_timer: TimerSlot,
	on_open_change: Option<OpenChangeFn>,
	disposed: bool,
}

impl fmt::Debug for PresenceController {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PresenceController")
			.field("config", &self.config)
			.field("phase", &self.phase)
			.field("open", &self.open)
			.field("now", &self.now)
			.field("pending_timers", &self.timers.len())
			.field("disposed", &self.disposed)
			.finish_non_exhaustive()
	}
}

impl PresenceController {
	/// Creates a closed controller.
	pub fn new(config: PresenceConfig) -> Self {
		Self {
			config,
			phase: Phase::Closed,
			open: false,
			now: Timestamp::ZERO,
			timers: TimerQueue::new(),
			phase_timer: TimerSlot::new(),
			dismiss_timer: TimerSlot::new(),
			on_open_change: None,
			disposed: false,
		}
	}

	/// Creates a controller that starts opening immediately.
	///
	/// The enter delay still applies, so the entrance animation is observable.
	pub fn open_immediately(config: PresenceConfig) -> Self {
		let mut controller = Self::new(config);
		controller.set_open(true);
		controller
	}

	/// Sets the callback used to report synthetic closes to the intent owner.
	#[must_use]
	pub fn with_open_change(mut self, on_open_change: impl FnMut(bool) + Send + 'static) -> Self {
		self.on_open_change = Some(Box::new(on_open_change));
		self
	}

	/// Replaces the timing configuration.
	///
	/// Applies to transitions started after this call; pending timers keep
	/// their deadlines.
	pub fn set_config(&mut self, config: PresenceConfig) {
		self.config = config;
	}

	/// Sets the open intent.
	///
	/// Returns the immediate phase change, if any. Setting the current intent
	/// again is a no-op and leaves pending timers untouched.
	pub fn set_open(&mut self, open: bool) -> Option<Transition> {
		if self.disposed {
			tracing::debug!(open, "presence.set_open.disposed");
			return None;
		}
		self.request(open, TransitionCause::Intent)
	}

	/// Advances logical time by `delta`, firing due timers.
	pub fn tick(&mut self, delta: Duration) -> Vec<Transition> {
		self.advance_to(self.now + delta)
	}

	/// Advances logical time to `target`, firing due timers in deadline order.
	///
	/// Timers scheduled by a firing timer are processed in the same call when
	/// their deadline falls at or before `target`. Targets in the past are
	/// ignored.
	pub fn advance_to(&mut self, target: Timestamp) -> Vec<Transition> {
		let mut transitions = Vec::new();
		if self.disposed || target < self.now {
			return transitions;
		}

		while let Some((handle, at, timer)) = self.timers.pop_due(target) {
			self.now = at;
			if let Some(transition) = self.fire(handle, timer) {
				transitions.push(transition);
			}
		}
		self.now = target;
		transitions
	}

	/// Returns the current phase.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Returns the render/visibility flags.
	pub fn state(&self) -> PresenceState {
		self.phase.presence()
	}

	/// Returns true if the consumer should render the element.
	pub fn should_render(&self) -> bool {
		self.state().should_render
	}

	/// Returns true if the element should carry its visible animation class.
	pub fn is_visible(&self) -> bool {
		self.state().is_visible
	}

	/// Returns the current open intent.
	pub fn is_open(&self) -> bool {
		self.open
	}

	/// Returns the current logical time.
	pub fn now(&self) -> Timestamp {
		self.now
	}

	pub fn config(&self) -> &PresenceConfig {
		&self.config
	}

	/// Returns the number of pending timers.
	pub fn pending_timers(&self) -> usize {
		self.timers.len()
	}

	/// Returns the deadline of the next pending timer.
	pub fn next_deadline(&self) -> Option<Timestamp> {
		self.timers.next_deadline()
	}

	/// Returns true if an auto-dismiss is pending.
	pub fn is_dismiss_pending(&self) -> bool {
		self.dismiss_timer.is_armed(&self.timers)
	}

	/// Returns true once the controller has been torn down.
	pub fn is_disposed(&self) -> bool {
		self.disposed
	}

	/// Cancels every pending timer and stops reacting to further input.
	pub fn teardown(&mut self) {
		if self.disposed {
			return;
		}
		self.phase_timer.release();
		self.dismiss_timer.release();
		let cancelled = self.timers.clear();
		self.on_open_change = None;
		self.disposed = true;
		tracing::trace!(phase = %self.phase, cancelled, "presence.teardown");
	}

	fn request(&mut self, open: bool, cause: TransitionCause) -> Option<Transition> {
		if self.open == open {
			return None;
		}
		self.open = open;

		if open {
			if let Some(timeout) = self.config.auto_dismiss.timeout() {
				self.dismiss_timer
					.arm(&mut self.timers, self.now, timeout, PresenceTimer::Dismiss);
			}
			self.phase_timer
				.arm(&mut self.timers, self.now, self.config.enter_delay, PresenceTimer::Reveal);
			self.enter(Phase::Opening, cause)
		} else {
			self.dismiss_timer.disarm(&mut self.timers);
			self.phase_timer
				.arm(&mut self.timers, self.now, self.config.exit_duration, PresenceTimer::Unmount);
			self.enter(Phase::Closing, cause)
		}
	}

	fn fire(&mut self, handle: TimerHandle, timer: PresenceTimer) -> Option<Transition> {
		match timer {
			PresenceTimer::Reveal => {
				debug_assert!(self.phase_timer.holds(handle), "stale reveal timer fired");
				self.phase_timer.release();
				self.enter(Phase::Open, TransitionCause::RevealElapsed)
			}
			PresenceTimer::Unmount => {
				debug_assert!(self.phase_timer.holds(handle), "stale unmount timer fired");
				self.phase_timer.release();
				self.enter(Phase::Closed, TransitionCause::ExitElapsed)
			}
			PresenceTimer::Dismiss => {
				debug_assert!(self.dismiss_timer.holds(handle), "stale dismiss timer fired");
				self.dismiss_timer.release();
				tracing::debug!(at = %self.now, "presence.auto_dismiss");
				if let Some(on_open_change) = self.on_open_change.as_mut() {
					on_open_change(false);
				}
				self.request(false, TransitionCause::AutoDismiss)
			}
		}
	}

	fn enter(&mut self, to: Phase, cause: TransitionCause) -> Option<Transition> {
		let from = self.phase;
		if from == to {
			return None;
		}
		self.phase = to;
		debug_assert!(self.state().is_consistent());
		tracing::trace!(%from, %to, ?cause, at = %self.now, "presence.transition");
		Some(Transition {
			at: self.now,
			from,
			to,
			cause,
		})
	}
}

impl Drop for PresenceController {
	fn drop(&mut self) {
		self.teardown();
	}
}
