use std::time::Duration;

/// Delay between mounting an element and revealing it, enough for one paint.
pub const DEFAULT_ENTER_DELAY: Duration = Duration::from_millis(10);
/// Default exit animation duration.
pub const DEFAULT_EXIT_DURATION: Duration = Duration::from_millis(300);

/// Controls automatic dismissal of an open overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoDismiss {
	/// Stay open until closed by the consumer.
	#[default]
	Never,
	/// Synthesize a close this long after opening begins.
	After(Duration),
}

impl AutoDismiss {
	/// Returns the timeout, if any.
	pub const fn timeout(self) -> Option<Duration> {
		match self {
			Self::Never => None,
			Self::After(d) => Some(d),
		}
	}
}

/// Timing parameters of a presence controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceConfig {
	/// Time spent in [`Phase::Opening`](crate::Phase::Opening) before revealing.
	pub enter_delay: Duration,
	/// Length of the exit animation; the element unmounts when it elapses.
	pub exit_duration: Duration,
	pub auto_dismiss: AutoDismiss,
}

impl Default for PresenceConfig {
	fn default() -> Self {
		Self {
			enter_delay: DEFAULT_ENTER_DELAY,
			exit_duration: DEFAULT_EXIT_DURATION,
			auto_dismiss: AutoDismiss::Never,
		}
	}
}

impl PresenceConfig {
	/// Sets the enter delay.
	#[must_use]
	pub fn enter_delay(mut self, delay: Duration) -> Self {
		self.enter_delay = delay;
		self
	}

	/// Sets the exit animation duration.
	#[must_use]
	pub fn exit_duration(mut self, duration: Duration) -> Self {
		self.exit_duration = duration;
		self
	}

	/// Sets the auto-dismiss behavior.
	#[must_use]
	pub fn auto_dismiss(mut self, auto_dismiss: AutoDismiss) -> Self {
		self.auto_dismiss = auto_dismiss;
		self
	}
}
