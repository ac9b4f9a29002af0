//! Overlays of the storefront UI and the host that drives them.
//!
//! Every overlay (splash screen, welcome dialog, change-password and
//! reward-claim modals, about dialog, toasts) is an [`Overlay`]: a kind, a
//! [`PresenceController`](veneer_presence::PresenceController) and, for
//! overlays with a submit button, an [`ActionGuard`](veneer_presence::ActionGuard).
//! [`OverlayHost`] owns the instances, advances their clocks together and
//! reports lifecycle changes as [`HostEvent`]s.

mod error;
mod host;
mod kind;
mod notice;
mod overlay;
mod timing;

pub use error::{NoticeError, OverlayError, Result};
pub use host::{CloseReason, HostEvent, OverlayHost, Overflow, RenderedOverlay};
pub use kind::{OverlayKind, ParseKindError, VisualStyle};
pub use notice::{Destination, Navigator, Notice, NoticeSource, StaticNotice};
pub use overlay::{Overlay, OverlayId, SubmitPayload};
pub use timing::{OverlayTiming, TimingTable};
