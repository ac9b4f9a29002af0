//! Logical time and cancellable timers for single-threaded state machines.
//!
//! Every stateful instance owns its own [`TimerQueue`] and advances it against
//! its own logical clock. Pending timers are addressed by [`TimerHandle`]s
//! that carry a generation, so a stale handle can never cancel a newer timer.
//! [`TimerSlot`] holds the one pending handle for a given purpose and makes
//! supersession explicit.

/// Cancellable timer queue.
pub mod queue;
/// Single pending-timer ownership.
pub mod slot;
/// Logical instants.
pub mod timestamp;

pub use queue::{TimerHandle, TimerQueue};
pub use slot::TimerSlot;
pub use timestamp::Timestamp;
