use core::fmt;

use tokio::sync::mpsc::UnboundedSender;
use veneer_presence::{ActionGuard, Phase, PresenceController, PresenceState, Timestamp, Transition};

use crate::error::{OverlayError, Result};
use crate::host::CloseReason;
use crate::kind::OverlayKind;
use crate::notice::Notice;
use crate::timing::OverlayTiming;

/// Identifier of an overlay instance, unique per host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub u64);

impl fmt::Display for OverlayId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Form data carried by a submit action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitPayload {
	pub value: Option<String>,
}

impl SubmitPayload {
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn new(value: impl Into<String>) -> Self {
		Self {
			value: Some(value.into()),
		}
	}
}

/// Callback traffic from controllers and guards back to the host.
#[derive(Debug)]
pub(crate) enum Signal {
	/// The auto-dismiss timeout closed the overlay.
	Dismissed(OverlayId),
	/// The guarded submit action ran.
	Submitted(OverlayId, SubmitPayload),
}

/// One overlay instance.
#[derive(Debug)]
pub struct Overlay {
	id: OverlayId,
	kind: OverlayKind,
	presence: PresenceController,
	submit: Option<ActionGuard<SubmitPayload>>,
	notice: Option<Notice>,
	last_close: Option<CloseReason>,
}

impl Overlay {
	pub(crate) fn new(
		id: OverlayId,
		kind: OverlayKind,
		timing: OverlayTiming,
		now: Timestamp,
		signals: &UnboundedSender<Signal>,
	) -> Self {
		let dismissed = signals.clone();
		let mut presence = PresenceController::new(timing.presence()).with_open_change(move |open| {
			if !open {
				// The host outlives its overlays unless it is being dropped.
				let _ = dismissed.send(Signal::Dismissed(id));
			}
		});
		presence.advance_to(now);

		let submit = timing.cooldown.filter(|_| kind.is_submittable()).map(|cooldown| {
			let submitted = signals.clone();
			let mut guard = ActionGuard::new(
				move |payload| {
					let _ = submitted.send(Signal::Submitted(id, payload));
				},
				cooldown,
			);
			guard.advance_to(now);
			guard
		});

		Self {
			id,
			kind,
			presence,
			submit,
			notice: None,
			last_close: None,
		}
	}

	pub fn id(&self) -> OverlayId {
		self.id
	}

	pub fn kind(&self) -> OverlayKind {
		self.kind
	}

	pub fn phase(&self) -> Phase {
		self.presence.phase()
	}

	pub fn state(&self) -> PresenceState {
		self.presence.state()
	}

	pub fn should_render(&self) -> bool {
		self.presence.should_render()
	}

	pub fn is_visible(&self) -> bool {
		self.presence.is_visible()
	}

	/// Returns true if the open intent is set.
	pub fn is_open(&self) -> bool {
		self.presence.is_open()
	}

	/// Returns the animation class to render with, or `None` when unrendered.
	pub fn visual_class(&self) -> Option<&'static str> {
		let style = self.kind.visual();
		let state = self.state();
		state
			.should_render
			.then_some(if state.is_visible { style.shown } else { style.hidden })
	}

	/// Returns the notice fetched at mount time (welcome overlays only).
	pub fn notice(&self) -> Option<&Notice> {
		self.notice.as_ref()
	}

	/// Returns true while the submit action is cooling down.
	pub fn is_submit_locked(&self) -> bool {
		self.submit.as_ref().is_some_and(ActionGuard::is_locked)
	}

	/// Returns why the overlay was last closed.
	pub fn last_close_reason(&self) -> Option<CloseReason> {
		self.last_close
	}

	pub fn is_auto_dismiss_pending(&self) -> bool {
		self.presence.is_dismiss_pending()
	}

	pub(crate) fn set_notice(&mut self, notice: Notice) {
		self.notice = Some(notice);
	}

	pub(crate) fn set_open(&mut self, open: bool) -> Option<Transition> {
		self.presence.set_open(open)
	}

	pub(crate) fn mark_closed(&mut self, reason: CloseReason) {
		self.last_close = Some(reason);
	}

	pub(crate) fn advance_to(&mut self, target: Timestamp) -> Vec<Transition> {
		if let Some(guard) = self.submit.as_mut() {
			guard.advance_to(target);
		}
		self.presence.advance_to(target)
	}

	/// Runs the guarded submit action. Returns true if it ran.
	pub(crate) fn submit(&mut self, payload: SubmitPayload) -> Result<bool> {
		let Some(guard) = self.submit.as_mut() else {
			return Err(OverlayError::NotSubmittable(self.kind));
		};
		if !self.presence.is_visible() {
			tracing::debug!(id = %self.id, kind = %self.kind, phase = %self.presence.phase(), "overlay.submit.hidden");
			return Ok(false);
		}
		Ok(guard.call(payload))
	}

	pub(crate) fn teardown(&mut self) {
		self.presence.teardown();
		if let Some(guard) = self.submit.as_mut() {
			guard.teardown();
		}
	}
}
