//! Real-time driver for the overlay host.
//!
//! [`EventLoop`] owns an [`OverlayHost`](veneer_overlay::OverlayHost) on a single task. Commands arrive
//! over a channel, elapsed wall time is converted into logical ticks once per
//! frame, and every [`HostEvent`](veneer_overlay::HostEvent) is broadcast to subscribers. Shutdown goes
//! through a [`CancellationToken`] and tears the host down, cancelling every
//! pending overlay timer.

mod event_loop;

pub use event_loop::{DEFAULT_FRAME_INTERVAL, EventLoop, EventLoopHandle, HostCommand};
use thiserror::Error;
pub use tokio_util::sync::CancellationToken;
use veneer_overlay::OverlayError;

/// Errors reported by the event loop handle.
#[derive(Debug, Error)]
pub enum RuntimeError {
	/// The event loop is no longer running.
	#[error("event loop stopped")]
	Closed,

	#[error(transparent)]
	Overlay(#[from] OverlayError),

	#[error("event loop task failed: {0}")]
	Join(#[from] tokio::task::JoinError),
}

/// Result type for event loop operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
