//! Presence lifecycle and action guarding for animated overlays.
//!
//! [`PresenceController`] turns an open/closed intent into the four-phase
//! lifecycle every overlay shares, so entry and exit animations finish before
//! the element leaves the render tree. [`ActionGuard`] suppresses repeated
//! invocations of a user action within a cooldown window.
//!
//! Both are driven by logical time: callers advance them with `tick` or
//! `advance_to`, and every pending timer is owned by the instance that
//! scheduled it.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use veneer_presence::{Phase, PresenceConfig, PresenceController};
//!
//! let mut modal = PresenceController::new(PresenceConfig::default());
//! modal.set_open(true);
//! assert!(modal.should_render() && !modal.is_visible());
//!
//! modal.tick(Duration::from_millis(10));
//! assert_eq!(modal.phase(), Phase::Open);
//! ```

mod config;
mod controller;
mod guard;
mod phase;

pub use config::{AutoDismiss, DEFAULT_ENTER_DELAY, DEFAULT_EXIT_DURATION, PresenceConfig};
pub use controller::{OpenChangeFn, PresenceController};
pub use guard::{ActionGuard, DEFAULT_COOLDOWN};
pub use phase::{Phase, PresenceState, Transition, TransitionCause};
pub use veneer_timer::Timestamp;
