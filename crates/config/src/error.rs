//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A value is outside its accepted range.
	#[error("invalid value for {key}: {value} ({reason})")]
	InvalidValue {
		/// Dotted key of the offending value.
		key: String,
		value: u64,
		reason: &'static str,
	},

	/// An `[overlay.*]` table names an overlay that does not exist.
	#[error("unknown overlay: {0}")]
	UnknownOverlay(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
