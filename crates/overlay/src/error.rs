use thiserror::Error;
use veneer_config::ConfigError;

use crate::kind::OverlayKind;
use crate::overlay::OverlayId;

/// Failure of the remote notice request.
#[derive(Debug, Error)]
pub enum NoticeError {
	/// No notice service is reachable.
	#[error("notice service unavailable")]
	Unavailable,
}

/// Errors reported by the overlay host.
#[derive(Debug, Error)]
pub enum OverlayError {
	#[error("no overlay with id {0}")]
	UnknownOverlay(OverlayId),

	/// The overlay has no submit action.
	#[error("{0} overlays have no submit action")]
	NotSubmittable(OverlayKind),

	/// A toast was rejected because the toast limit is reached.
	#[error("toast limit of {max} reached")]
	ToastLimit { max: usize },

	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Result type for overlay host operations.
pub type Result<T> = std::result::Result<T, OverlayError>;
