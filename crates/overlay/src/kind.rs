use core::fmt;
use core::str::FromStr;
use std::time::Duration;

use veneer_presence::{AutoDismiss, DEFAULT_COOLDOWN, DEFAULT_ENTER_DELAY};

use crate::timing::OverlayTiming;

const MODAL_EXIT: Duration = Duration::from_millis(300);
const TOAST_EXIT: Duration = Duration::from_millis(200);
const SPLASH_DISMISS: Duration = Duration::from_millis(2_500);
const WELCOME_DISMISS: Duration = Duration::from_millis(8_000);
const TOAST_DISMISS: Duration = Duration::from_millis(3_000);

/// The overlays of the storefront UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OverlayKind {
	/// Full-screen launch screen, dismissed automatically.
	Splash,
	/// Greeting dialog showing the remote notice; auto-dismisses.
	Welcome,
	/// Password change form.
	ChangePassword,
	/// Reward claim confirmation.
	RewardClaim,
	/// Informational dialog about BP.
	AboutBp,
	/// Transient status message.
	Toast,
}

/// Animation classes selected by the visibility flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualStyle {
	/// Class while visible.
	pub shown: &'static str,
	/// Class while mounted but hidden (before reveal and during exit).
	pub hidden: &'static str,
}

impl OverlayKind {
	pub const ALL: [Self; 6] = [
		Self::Splash,
		Self::Welcome,
		Self::ChangePassword,
		Self::RewardClaim,
		Self::AboutBp,
		Self::Toast,
	];

	/// Returns the configuration key of this kind.
	pub const fn name(self) -> &'static str {
		match self {
			Self::Splash => "splash",
			Self::Welcome => "welcome",
			Self::ChangePassword => "change_password",
			Self::RewardClaim => "reward_claim",
			Self::AboutBp => "about_bp",
			Self::Toast => "toast",
		}
	}

	/// Returns every configuration key.
	pub fn names() -> [&'static str; 6] {
		Self::ALL.map(Self::name)
	}

	/// Returns the built-in timing of this kind.
	pub const fn default_timing(self) -> OverlayTiming {
		let (exit_duration, auto_dismiss, cooldown) = match self {
			Self::Splash => (MODAL_EXIT, AutoDismiss::After(SPLASH_DISMISS), None),
			Self::Welcome => (MODAL_EXIT, AutoDismiss::After(WELCOME_DISMISS), Some(DEFAULT_COOLDOWN)),
			Self::ChangePassword | Self::RewardClaim => (MODAL_EXIT, AutoDismiss::Never, Some(DEFAULT_COOLDOWN)),
			Self::AboutBp => (MODAL_EXIT, AutoDismiss::Never, None),
			Self::Toast => (TOAST_EXIT, AutoDismiss::After(TOAST_DISMISS), None),
		};
		OverlayTiming {
			enter_delay: DEFAULT_ENTER_DELAY,
			exit_duration,
			auto_dismiss,
			cooldown,
		}
	}

	/// Returns true if the overlay has a guarded submit action.
	pub const fn is_submittable(self) -> bool {
		matches!(self, Self::Welcome | Self::ChangePassword | Self::RewardClaim)
	}

	/// Returns the animation classes of this kind.
	pub const fn visual(self) -> VisualStyle {
		match self {
			Self::Splash => VisualStyle {
				shown: "opacity-100",
				hidden: "opacity-0",
			},
			Self::Welcome | Self::AboutBp => VisualStyle {
				shown: "opacity-100 scale-100",
				hidden: "opacity-0 scale-95",
			},
			Self::ChangePassword | Self::RewardClaim => VisualStyle {
				shown: "translate-y-0",
				hidden: "translate-y-full",
			},
			Self::Toast => VisualStyle {
				shown: "translate-y-0 opacity-100",
				hidden: "-translate-y-full opacity-0",
			},
		}
	}
}

impl fmt::Display for OverlayKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.pad(self.name())
	}
}

/// Error returned when parsing an unknown overlay name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown overlay kind: {0}")]
pub struct ParseKindError(pub String);

impl FromStr for OverlayKind {
	type Err = ParseKindError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
		Self::ALL
			.into_iter()
			.find(|kind| kind.name() == normalized)
			.ok_or_else(|| ParseKindError(s.to_string()))
	}
}
