use core::fmt;

use veneer_timer::Timestamp;

/// Lifecycle phase shared by every overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
	/// Not in the render tree.
	#[default]
	Closed,
	/// Rendered in its resting pre-animation state, waiting for first paint.
	Opening,
	/// Rendered and visible.
	Open,
	/// Rendered while the exit animation runs.
	Closing,
}

impl Phase {
	/// Returns the render/visibility flags for this phase.
	pub const fn presence(self) -> PresenceState {
		match self {
			Self::Closed => PresenceState {
				should_render: false,
				is_visible: false,
			},
			Self::Opening | Self::Closing => PresenceState {
				should_render: true,
				is_visible: false,
			},
			Self::Open => PresenceState {
				should_render: true,
				is_visible: true,
			},
		}
	}

	/// Returns true for phases reached from an open intent.
	pub const fn is_opening_or_open(self) -> bool {
		matches!(self, Self::Opening | Self::Open)
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Closed => "closed",
			Self::Opening => "opening",
			Self::Open => "open",
			Self::Closing => "closing",
		}
	}
}

impl fmt::Display for Phase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Render flags observed by the consumer of a presence controller.
///
/// Derived from [`Phase`], so `is_visible` implies `should_render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PresenceState {
	/// Whether the element is in the render tree.
	pub should_render: bool,
	/// Whether the element carries its visible animation class.
	pub is_visible: bool,
}

impl PresenceState {
	/// Returns true if the visibility flag never outruns the render flag.
	pub const fn is_consistent(self) -> bool {
		!self.is_visible || self.should_render
	}
}

/// What caused a phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionCause {
	/// The consumer changed the open intent.
	Intent,
	/// The enter delay elapsed.
	RevealElapsed,
	/// The exit animation finished.
	ExitElapsed,
	/// The auto-dismiss timeout synthesized a close.
	AutoDismiss,
}

/// A single phase change reported by a presence controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
	/// Logical instant at which the change happened.
	pub at: Timestamp,
	pub from: Phase,
	pub to: Phase,
	pub cause: TransitionCause,
}
