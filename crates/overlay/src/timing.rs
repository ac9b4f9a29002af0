use std::collections::BTreeMap;
use std::time::Duration;

use veneer_config::{Config, ConfigError};
use veneer_presence::{AutoDismiss, PresenceConfig};

use crate::kind::OverlayKind;

/// Resolved timing of one overlay kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTiming {
	pub enter_delay: Duration,
	pub exit_duration: Duration,
	pub auto_dismiss: AutoDismiss,
	/// Submit cooldown; `None` for overlays without a submit action.
	pub cooldown: Option<Duration>,
}

impl OverlayTiming {
	/// Returns the presence controller configuration.
	pub fn presence(&self) -> PresenceConfig {
		PresenceConfig {
			enter_delay: self.enter_delay,
			exit_duration: self.exit_duration,
			auto_dismiss: self.auto_dismiss,
		}
	}
}

/// Timings for every overlay kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingTable {
	timings: BTreeMap<OverlayKind, OverlayTiming>,
}

impl Default for TimingTable {
	fn default() -> Self {
		Self {
			timings: OverlayKind::ALL.into_iter().map(|k| (k, k.default_timing())).collect(),
		}
	}
}

impl TimingTable {
	/// Resolves timings from configuration.
	///
	/// Per-overlay values win over `[defaults]`, which win over built-in
	/// timings. Auto-dismiss can only be set per overlay; `0` disables it.
	/// Cooldowns only apply to overlays with a submit action.
	pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
		config.check_overlays(&OverlayKind::names())?;

		let ms = Duration::from_millis;
		let defaults = &config.defaults;
		let mut table = Self::default();

		for (kind, timing) in &mut table.timings {
			let overrides = config.overlay(kind.name()).copied().unwrap_or_default();

			if let Some(delay) = overrides.enter_delay_ms.or(defaults.enter_delay_ms) {
				timing.enter_delay = ms(delay);
			}
			if let Some(exit) = overrides.exit_duration_ms.or(defaults.exit_duration_ms) {
				timing.exit_duration = ms(exit);
			}
			match overrides.auto_dismiss_ms {
				Some(0) => timing.auto_dismiss = AutoDismiss::Never,
				Some(after) => timing.auto_dismiss = AutoDismiss::After(ms(after)),
				None => {}
			}
			if kind.is_submittable()
				&& let Some(cooldown) = overrides.cooldown_ms.or(defaults.cooldown_ms)
			{
				timing.cooldown = Some(ms(cooldown));
			}
		}

		tracing::debug!(overrides = config.overlay.len(), "timing.resolve");
		Ok(table)
	}

	/// Returns the timing of `kind`.
	pub fn get(&self, kind: OverlayKind) -> OverlayTiming {
		self.timings.get(&kind).copied().unwrap_or_else(|| kind.default_timing())
	}

	/// Overrides the timing of `kind`.
	pub fn set(&mut self, kind: OverlayKind, timing: OverlayTiming) {
		self.timings.insert(kind, timing);
	}

	/// Iterates over every kind and its timing.
	pub fn iter(&self) -> impl Iterator<Item = (OverlayKind, OverlayTiming)> + '_ {
		self.timings.iter().map(|(&k, &t)| (k, t))
	}
}
