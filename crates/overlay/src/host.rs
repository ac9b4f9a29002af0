//! Overlay host managing instances, their clocks and their events.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use veneer_config::{Config, OverflowSetting};
use veneer_presence::{Phase, Timestamp, Transition, TransitionCause};

use crate::error::{OverlayError, Result};
use crate::kind::OverlayKind;
use crate::notice::{Destination, Navigator, Notice, NoticeSource};
use crate::overlay::{Overlay, OverlayId, Signal, SubmitPayload};
use crate::timing::TimingTable;

#[cfg(test)]
mod tests;

/// Why an overlay was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
	/// Dismissed by the user.
	Cancel,
	/// Closed after its action completed.
	Commit,
	/// Closed by its auto-dismiss timeout.
	Timeout,
	/// Pushed out by a newer toast.
	Overflow,
	/// Closed by the application.
	Forced,
}

/// Behavior when the toast limit is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Overflow {
	/// Close the oldest open toast to make room.
	#[default]
	DropOldest,
	/// Reject the new toast.
	DropNewest,
}

/// Something the host observed while handling input or advancing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
	/// An overlay changed phase.
	Transition {
		id: OverlayId,
		kind: OverlayKind,
		transition: Transition,
	},
	/// An overlay closed itself after its auto-dismiss timeout.
	Dismissed { id: OverlayId, kind: OverlayKind },
	/// A guarded submit action ran.
	Submitted {
		id: OverlayId,
		kind: OverlayKind,
		payload: SubmitPayload,
	},
	/// A submit action navigated the host application.
	Navigated { id: OverlayId, destination: Destination },
	/// A toast finished its exit animation and was removed.
	Removed { id: OverlayId, kind: OverlayKind },
}

/// An overlay the consumer must draw this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedOverlay {
	pub id: OverlayId,
	pub kind: OverlayKind,
	pub visible: bool,
	/// Animation class selected by `visible`.
	pub class: &'static str,
}

/// Owns overlay instances and advances them on a shared logical clock.
///
/// Toasts are removed once their exit animation finishes; every other
/// overlay stays mounted until [`dispose`](Self::dispose)d, so it can be
/// reopened.
pub struct OverlayHost {
	overlays: BTreeMap<OverlayId, Overlay>,
	next_id: u64,
	now: Timestamp,
	timings: TimingTable,
	notices: Option<Box<dyn NoticeSource>>,
	navigator: Option<Box<dyn Navigator>>,
	max_toasts: Option<usize>,
	overflow: Overflow,
	signals_tx: UnboundedSender<Signal>,
	signals_rx: UnboundedReceiver<Signal>,
	events: Vec<HostEvent>,
}

impl fmt::Debug for OverlayHost {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("OverlayHost")
			.field("overlays", &self.overlays)
			.field("now", &self.now)
			.field("max_toasts", &self.max_toasts)
			.field("overflow", &self.overflow)
			.field("pending_events", &self.events.len())
			.finish_non_exhaustive()
	}
}

impl Default for OverlayHost {
	fn default() -> Self {
		Self::new(TimingTable::default())
	}
}

impl OverlayHost {
	/// Creates an empty host.
	pub fn new(timings: TimingTable) -> Self {
		let (signals_tx, signals_rx) = unbounded_channel();
		Self {
			overlays: BTreeMap::new(),
			next_id: 0,
			now: Timestamp::ZERO,
			timings,
			notices: None,
			navigator: None,
			max_toasts: None,
			overflow: Overflow::default(),
			signals_tx,
			signals_rx,
			events: Vec::new(),
		}
	}

	/// Creates an empty host with timings and toast limits from `config`.
	pub fn from_config(config: &Config) -> Result<Self> {
		let overflow = match config.host.overflow {
			OverflowSetting::DropOldest => Overflow::DropOldest,
			OverflowSetting::DropNewest => Overflow::DropNewest,
		};
		Ok(Self::new(TimingTable::from_config(config)?).with_toast_limit(config.host.max_toasts, overflow))
	}

	/// Sets the remote notice source read by welcome overlays.
	#[must_use]
	pub fn with_notice_source(mut self, source: impl NoticeSource + 'static) -> Self {
		self.notices = Some(Box::new(source));
		self
	}

	/// Sets the host application navigator.
	#[must_use]
	pub fn with_navigator(mut self, navigator: impl Navigator + 'static) -> Self {
		self.navigator = Some(Box::new(navigator));
		self
	}

	/// Limits the number of open toasts.
	///
	/// A limit of zero rejects every toast regardless of `overflow`.
	#[must_use]
	pub fn with_toast_limit(mut self, max: Option<usize>, overflow: Overflow) -> Self {
		self.max_toasts = max;
		self.overflow = overflow;
		self
	}

	/// Mounts a closed overlay and returns its id.
	pub fn mount(&mut self, kind: OverlayKind) -> OverlayId {
		let id = OverlayId(self.next_id);
		self.next_id = self.next_id.wrapping_add(1);

		let mut overlay = Overlay::new(id, kind, self.timings.get(kind), self.now, &self.signals_tx);
		if kind == OverlayKind::Welcome
			&& let Some(source) = self.notices.as_mut()
		{
			let notice = source.fetch_notice().unwrap_or_else(|error| {
				tracing::warn!(%id, %error, "host.notice.failed");
				Notice::default()
			});
			overlay.set_notice(notice);
		}

		tracing::debug!(%id, %kind, at = %self.now, "host.mount");
		self.overlays.insert(id, overlay);
		id
	}

	/// Mounts and opens an overlay.
	///
	/// A toast rejected by the toast limit is not left mounted.
	pub fn show(&mut self, kind: OverlayKind) -> Result<OverlayId> {
		let id = self.mount(kind);
		if let Err(error) = self.open(id) {
			if let Some(mut overlay) = self.overlays.remove(&id) {
				overlay.teardown();
			}
			return Err(error);
		}
		Ok(id)
	}

	/// Sets the open intent of an overlay.
	///
	/// Opening a closed toast respects the toast limit.
	pub fn open(&mut self, id: OverlayId) -> Result<()> {
		let overlay = self.overlays.get(&id).ok_or(OverlayError::UnknownOverlay(id))?;
		if overlay.kind() == OverlayKind::Toast && !overlay.is_open() {
			self.make_room_for_toast()?;
		}

		let overlay = self.overlays.get_mut(&id).ok_or(OverlayError::UnknownOverlay(id))?;
		let kind = overlay.kind();
		if let Some(transition) = overlay.set_open(true) {
			self.events.push(HostEvent::Transition { id, kind, transition });
		}
		Ok(())
	}

	/// Clears the open intent of an overlay.
	pub fn close(&mut self, id: OverlayId, reason: CloseReason) -> Result<()> {
		let overlay = self.overlays.get_mut(&id).ok_or(OverlayError::UnknownOverlay(id))?;
		let kind = overlay.kind();
		if let Some(transition) = overlay.set_open(false) {
			overlay.mark_closed(reason);
			tracing::debug!(%id, %kind, ?reason, "host.close");
			self.events.push(HostEvent::Transition { id, kind, transition });
		}
		Ok(())
	}

	/// Runs the guarded submit action of an overlay.
	///
	/// Returns true if the action ran; repeated submits within the cooldown
	/// and submits on hidden overlays return false.
	pub fn submit(&mut self, id: OverlayId, payload: SubmitPayload) -> Result<bool> {
		let overlay = self.overlays.get_mut(&id).ok_or(OverlayError::UnknownOverlay(id))?;
		let ran = overlay.submit(payload)?;
		self.drain_signals();
		Ok(ran)
	}

	/// Advances every overlay by `delta` and returns the accumulated events.
	pub fn tick(&mut self, delta: Duration) -> Vec<HostEvent> {
		self.advance_to(self.now + delta)
	}

	/// Advances every overlay to `target` and returns the accumulated events.
	///
	/// Events include those produced by calls made since the last advance.
	pub fn advance_to(&mut self, target: Timestamp) -> Vec<HostEvent> {
		if target >= self.now {
			let mut fired = Vec::new();
			let mut dismissed_at = BTreeMap::new();
			let mut finished_toasts = Vec::new();
			for (&id, overlay) in &mut self.overlays {
				let kind = overlay.kind();
				for transition in overlay.advance_to(target) {
					if transition.cause == TransitionCause::AutoDismiss {
						dismissed_at.insert(id, transition.at);
					}
					if kind == OverlayKind::Toast && transition.to == Phase::Closed {
						finished_toasts.push(id);
					}
					fired.push((transition.at, HostEvent::Transition { id, kind, transition }));
				}
			}
			self.now = target;
			fired.extend(self.take_signals(&dismissed_at));
			// Stable, so a dismissal stays right after the transition it caused.
			fired.sort_by_key(|(at, _)| *at);
			self.events.extend(fired.into_iter().map(|(_, event)| event));

			for id in finished_toasts {
				if let Some(mut toast) = self.overlays.remove(&id) {
					toast.teardown();
					self.events.push(HostEvent::Removed { id, kind: toast.kind() });
				}
			}
		}
		self.take_events()
	}

	/// Takes events produced since the last call.
	pub fn take_events(&mut self) -> Vec<HostEvent> {
		std::mem::take(&mut self.events)
	}

	/// Returns the overlays to draw, in mount order.
	pub fn rendered(&self) -> Vec<RenderedOverlay> {
		self.overlays
			.values()
			.filter_map(|overlay| {
				overlay.visual_class().map(|class| RenderedOverlay {
					id: overlay.id(),
					kind: overlay.kind(),
					visible: overlay.is_visible(),
					class,
				})
			})
			.collect()
	}

	pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
		self.overlays.get(&id)
	}

	/// Finds the first mounted overlay of `kind`.
	pub fn find(&self, kind: OverlayKind) -> Option<&Overlay> {
		self.overlays.values().find(|o| o.kind() == kind)
	}

	/// Tears down and removes an overlay, cancelling its timers.
	pub fn dispose(&mut self, id: OverlayId) -> Result<()> {
		let mut overlay = self.overlays.remove(&id).ok_or(OverlayError::UnknownOverlay(id))?;
		overlay.teardown();
		tracing::debug!(%id, kind = %overlay.kind(), "host.dispose");
		Ok(())
	}

	/// Tears down every overlay.
	pub fn teardown(&mut self) {
		let count = self.overlays.len();
		for overlay in self.overlays.values_mut() {
			overlay.teardown();
		}
		self.overlays.clear();
		self.events.clear();
		while self.signals_rx.try_recv().is_ok() {}
		tracing::debug!(count, "host.teardown");
	}

	pub fn now(&self) -> Timestamp {
		self.now
	}

	pub fn timings(&self) -> &TimingTable {
		&self.timings
	}

	/// Returns the number of mounted overlays.
	pub fn len(&self) -> usize {
		self.overlays.len()
	}

	pub fn is_empty(&self) -> bool {
		self.overlays.is_empty()
	}

	fn make_room_for_toast(&mut self) -> Result<()> {
		let Some(max) = self.max_toasts else {
			return Ok(());
		};
		if max == 0 {
			tracing::debug!(max, "host.toast.rejected");
			return Err(OverlayError::ToastLimit { max });
		}
		let open: Vec<OverlayId> = self
			.overlays
			.values()
			.filter(|o| o.kind() == OverlayKind::Toast && o.is_open())
			.map(Overlay::id)
			.collect();
		if open.len() < max {
			return Ok(());
		}

		match self.overflow {
			Overflow::DropNewest => {
				tracing::debug!(max, "host.toast.rejected");
				Err(OverlayError::ToastLimit { max })
			}
			Overflow::DropOldest => {
				let excess = open.len() + 1 - max;
				for id in open.into_iter().take(excess) {
					self.close(id, CloseReason::Overflow)?;
				}
				Ok(())
			}
		}
	}

	fn drain_signals(&mut self) {
		let signals = self.take_signals(&BTreeMap::new());
		self.events.extend(signals.into_iter().map(|(_, event)| event));
	}

	/// Turns pending callback signals into timestamped events.
	///
	/// Dismissals are stamped with the time found in `dismissed_at`; every
	/// other signal happened now.
	fn take_signals(&mut self, dismissed_at: &BTreeMap<OverlayId, Timestamp>) -> Vec<(Timestamp, HostEvent)> {
		let mut events = Vec::new();
		while let Ok(signal) = self.signals_rx.try_recv() {
			match signal {
				Signal::Dismissed(id) => {
					let Some(overlay) = self.overlays.get_mut(&id) else {
						continue;
					};
					overlay.mark_closed(CloseReason::Timeout);
					let at = dismissed_at.get(&id).copied().unwrap_or(self.now);
					events.push((at, HostEvent::Dismissed { id, kind: overlay.kind() }));
				}
				Signal::Submitted(id, payload) => {
					let Some(overlay) = self.overlays.get(&id) else {
						continue;
					};
					let kind = overlay.kind();
					let link = overlay.notice().and_then(|n| n.link.clone());
					tracing::debug!(%id, %kind, "host.submit");
					events.push((self.now, HostEvent::Submitted { id, kind, payload }));

					if kind == OverlayKind::Welcome
						&& let Some(link) = link
					{
						let destination = Destination::new(link);
						if let Some(navigator) = self.navigator.as_mut() {
							navigator.navigate(&destination);
						}
						events.push((self.now, HostEvent::Navigated { id, destination }));
					}
				}
			}
		}
		events
	}
}

impl Drop for OverlayHost {
	fn drop(&mut self) {
		for overlay in self.overlays.values_mut() {
			overlay.teardown();
		}
	}
}
