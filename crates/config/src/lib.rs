//! Configuration for overlay timings and host limits.
//!
//! Configuration is written in TOML. Every value is optional; anything left
//! out falls back to the built-in timing of the overlay it belongs to.
//!
//! ```toml
//! [defaults]
//! enter_delay_ms = 10
//! cooldown_ms = 300
//!
//! [overlay.welcome]
//! auto_dismiss_ms = 8000
//! exit_duration_ms = 300
//!
//! [overlay.toast]
//! auto_dismiss_ms = 0   # never
//!
//! [host]
//! max_toasts = 3
//! overflow = "drop-oldest"
//! frame_interval_ms = 16
//! ```
//!
//! The default file lives at `$XDG_CONFIG_HOME/veneer/config.toml`.

mod error;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::{ConfigError, Result};
use serde::Deserialize;

/// Longest accepted enter delay. The delay only has to cover one paint.
pub const MAX_ENTER_DELAY_MS: u64 = 1_000;

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Timings applied to every overlay unless overridden.
	pub defaults: Defaults,
	/// Per-overlay overrides keyed by overlay name.
	pub overlay: BTreeMap<String, OverlayTiming>,
	pub host: HostSection,
}

/// Workspace-wide timing defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
	pub enter_delay_ms: Option<u64>,
	pub exit_duration_ms: Option<u64>,
	pub cooldown_ms: Option<u64>,
}

/// Timing overrides for one overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayTiming {
	pub enter_delay_ms: Option<u64>,
	pub exit_duration_ms: Option<u64>,
	/// Auto-dismiss timeout; `0` disables auto-dismiss.
	pub auto_dismiss_ms: Option<u64>,
	pub cooldown_ms: Option<u64>,
}

/// Behavior when the toast limit is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowSetting {
	#[default]
	DropOldest,
	DropNewest,
}

/// Overlay host limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostSection {
	/// Maximum number of toasts open at once; closing toasts do not count.
	pub max_toasts: Option<usize>,
	pub overflow: OverflowSetting,
	/// Real-time frame interval of the event loop.
	pub frame_interval_ms: Option<u64>,
}

impl Config {
	/// Parses and validates configuration from TOML text.
	pub fn parse(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses a configuration file.
	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::parse(&input)?;
		tracing::debug!(path = %path.display(), overlays = config.overlay.len(), "config.load");
		Ok(config)
	}

	/// Loads the default configuration file if it exists.
	pub fn load_default() -> Result<Option<Self>> {
		let Some(path) = default_path() else {
			return Ok(None);
		};
		if !path.exists() {
			tracing::trace!(path = %path.display(), "config.default.missing");
			return Ok(None);
		}
		Self::load(&path).map(Some)
	}

	/// Loads `path` if given, otherwise the default file, otherwise defaults.
	pub fn resolve(path: Option<&Path>) -> Result<Self> {
		match path {
			Some(path) => Self::load(path),
			None => Ok(Self::load_default()?.unwrap_or_default()),
		}
	}

	/// Rejects `[overlay.*]` tables whose names are not in `known`.
	pub fn check_overlays(&self, known: &[&str]) -> Result<()> {
		match self.overlay.keys().find(|name| !known.contains(&name.as_str())) {
			Some(name) => Err(ConfigError::UnknownOverlay(name.clone())),
			None => Ok(()),
		}
	}

	/// Returns the overrides for `name`, if any.
	pub fn overlay(&self, name: &str) -> Option<&OverlayTiming> {
		self.overlay.get(name)
	}

	/// Returns the frame interval of the event loop, if configured.
	pub fn frame_interval(&self) -> Option<Duration> {
		self.host.frame_interval_ms.map(Duration::from_millis)
	}

	fn validate(&self) -> Result<()> {
		check_enter_delay("defaults.enter_delay_ms", self.defaults.enter_delay_ms)?;
		for (name, timing) in &self.overlay {
			check_enter_delay(&format!("overlay.{name}.enter_delay_ms"), timing.enter_delay_ms)?;
		}
		if self.host.max_toasts == Some(0) {
			return Err(ConfigError::InvalidValue {
				key: "host.max_toasts".into(),
				value: 0,
				reason: "must be positive; omit it for no limit",
			});
		}
		if self.host.frame_interval_ms == Some(0) {
			return Err(ConfigError::InvalidValue {
				key: "host.frame_interval_ms".into(),
				value: 0,
				reason: "must be positive",
			});
		}
		Ok(())
	}
}

fn check_enter_delay(key: &str, value: Option<u64>) -> Result<()> {
	match value {
		Some(ms) if ms > MAX_ENTER_DELAY_MS => Err(ConfigError::InvalidValue {
			key: key.to_string(),
			value: ms,
			reason: "enter delay must not exceed 1000 ms",
		}),
		_ => Ok(()),
	}
}

/// Returns the default configuration file path.
pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("veneer").join("config.toml"))
}
