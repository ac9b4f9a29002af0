use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;

use veneer_config::ConfigError;

use super::*;
use crate::error::NoticeError;
use crate::notice::StaticNotice;

fn ms(n: u64) -> Duration {
	Duration::from_millis(n)
}

fn transitions(events: &[HostEvent]) -> Vec<(OverlayId, Phase)> {
	events
		.iter()
		.filter_map(|e| match e {
			HostEvent::Transition { id, transition, .. } => Some((*id, transition.to)),
			_ => None,
		})
		.collect()
}

#[derive(Clone, Default)]
struct RecordingNavigator(Arc<Mutex<Vec<Destination>>>);

impl Navigator for RecordingNavigator {
	fn navigate(&mut self, destination: &Destination) {
		self.0.lock().unwrap().push(destination.clone());
	}
}

struct FailingNotice;

impl NoticeSource for FailingNotice {
	fn fetch_notice(&mut self) -> std::result::Result<Notice, NoticeError> {
		Err(NoticeError::Unavailable)
	}
}

#[test]
fn test_show_reports_opening_then_open() {
	let mut host = OverlayHost::default();
	let id = host.show(OverlayKind::AboutBp).unwrap();

	let events = host.tick(ms(10));
	assert_eq!(transitions(&events), vec![(id, Phase::Opening), (id, Phase::Open)]);

	let rendered = host.rendered();
	assert_eq!(
		rendered,
		vec![RenderedOverlay {
			id,
			kind: OverlayKind::AboutBp,
			visible: true,
			class: "opacity-100 scale-100",
		}]
	);
}

#[test]
fn test_mounted_closed_overlay_is_not_rendered() {
	let mut host = OverlayHost::default();
	let id = host.mount(OverlayKind::ChangePassword);
	assert!(host.rendered().is_empty());
	assert_eq!(host.get(id).unwrap().visual_class(), None);
}

#[test]
fn test_close_keeps_modal_mounted_for_reopen() {
	let mut host = OverlayHost::default();
	let id = host.show(OverlayKind::RewardClaim).unwrap();
	host.tick(ms(10));

	host.close(id, CloseReason::Cancel).unwrap();
	assert_eq!(host.rendered()[0].class, "translate-y-full");
	host.tick(ms(300));

	assert!(host.rendered().is_empty());
	assert_eq!(host.len(), 1);
	assert_eq!(host.get(id).unwrap().last_close_reason(), Some(CloseReason::Cancel));

	host.open(id).unwrap();
	host.tick(ms(10));
	assert!(host.get(id).unwrap().is_visible());
}

#[test]
fn test_toast_is_removed_after_exit() {
	let mut host = OverlayHost::default();
	let id = host.show(OverlayKind::Toast).unwrap();

	let events = host.advance_to(Timestamp::from_millis(3_200));
	assert!(events.contains(&HostEvent::Dismissed {
		id,
		kind: OverlayKind::Toast
	}));
	assert_eq!(
		events.last(),
		Some(&HostEvent::Removed {
			id,
			kind: OverlayKind::Toast
		})
	);
	assert!(host.is_empty());
}

#[test]
fn test_welcome_auto_dismisses_with_timeout_reason() {
	let mut host = OverlayHost::default();
	let id = host.show(OverlayKind::Welcome).unwrap();

	host.advance_to(Timestamp::from_millis(7_999));
	assert!(host.get(id).unwrap().is_visible());

	let events = host.advance_to(Timestamp::from_millis(8_000));
	assert_eq!(transitions(&events), vec![(id, Phase::Closing)]);
	assert_eq!(host.get(id).unwrap().last_close_reason(), Some(CloseReason::Timeout));

	host.advance_to(Timestamp::from_millis(8_300));
	assert_eq!(host.get(id).unwrap().phase(), Phase::Closed);
}

#[test]
fn test_manual_close_then_reopen_does_not_refire_old_dismiss() {
	let mut host = OverlayHost::default();
	let id = host.show(OverlayKind::Welcome).unwrap();
	host.advance_to(Timestamp::from_millis(2_000));
	host.close(id, CloseReason::Cancel).unwrap();
	host.advance_to(Timestamp::from_millis(3_000));
	host.open(id).unwrap();

	let events = host.advance_to(Timestamp::from_millis(10_999));
	assert!(!events.iter().any(|e| matches!(e, HostEvent::Dismissed { .. })));
	assert!(host.get(id).unwrap().is_visible());

	let events = host.advance_to(Timestamp::from_millis(11_000));
	assert!(events.iter().any(|e| matches!(e, HostEvent::Dismissed { .. })));
}

#[test]
fn test_submit_is_guarded() {
	let mut host = OverlayHost::default();
	let id = host.show(OverlayKind::ChangePassword).unwrap();
	host.tick(ms(10));

	assert!(host.submit(id, SubmitPayload::new("hunter2")).unwrap());
	assert!(!host.submit(id, SubmitPayload::new("hunter2")).unwrap());
	assert!(host.get(id).unwrap().is_submit_locked());

	let submitted: Vec<_> = host
		.take_events()
		.into_iter()
		.filter(|e| matches!(e, HostEvent::Submitted { .. }))
		.collect();
	assert_eq!(submitted.len(), 1);

	host.tick(ms(300));
	assert!(host.submit(id, SubmitPayload::empty()).unwrap());
}

#[test]
fn test_submit_on_hidden_overlay_is_ignored() {
	let mut host = OverlayHost::default();
	let id = host.show(OverlayKind::RewardClaim).unwrap();
	assert!(!host.submit(id, SubmitPayload::empty()).unwrap());
}

#[test]
fn test_submit_without_action_is_an_error() {
	let mut host = OverlayHost::default();
	let id = host.show(OverlayKind::AboutBp).unwrap();
	host.tick(ms(10));
	let err = host.submit(id, SubmitPayload::empty()).unwrap_err();
	assert!(matches!(err, OverlayError::NotSubmittable(OverlayKind::AboutBp)));
}

#[test]
fn test_welcome_submit_follows_notice_link() {
	let navigator = RecordingNavigator::default();
	let visited = navigator.0.clone();
	let notice = Notice {
		link: Some("/rewards".into()),
		message: Some("Claim your bonus".into()),
	};
	let mut host = OverlayHost::default()
		.with_notice_source(StaticNotice(notice.clone()))
		.with_navigator(navigator);

	let id = host.show(OverlayKind::Welcome).unwrap();
	assert_eq!(host.get(id).unwrap().notice(), Some(&notice));
	host.tick(ms(10));
	host.take_events();

	host.submit(id, SubmitPayload::empty()).unwrap();
	host.submit(id, SubmitPayload::empty()).unwrap();

	assert_eq!(*visited.lock().unwrap(), vec![Destination::new("/rewards")]);
	let events = host.take_events();
	assert_eq!(
		events.last(),
		Some(&HostEvent::Navigated {
			id,
			destination: Destination::new("/rewards")
		})
	);
}

#[test]
fn test_failed_notice_falls_back_to_empty() {
	let mut host = OverlayHost::default().with_notice_source(FailingNotice);
	let id = host.show(OverlayKind::Welcome).unwrap();
	assert_eq!(host.get(id).unwrap().notice(), Some(&Notice::default()));
}

#[test]
fn test_toast_limit_drops_oldest() {
	let mut host = OverlayHost::default().with_toast_limit(Some(2), Overflow::DropOldest);
	let first = host.show(OverlayKind::Toast).unwrap();
	let second = host.show(OverlayKind::Toast).unwrap();
	host.tick(ms(10));

	let third = host.show(OverlayKind::Toast).unwrap();
	let oldest = host.get(first).unwrap();
	assert!(!oldest.is_open());
	assert_eq!(oldest.last_close_reason(), Some(CloseReason::Overflow));
	assert!(host.get(second).unwrap().is_open());
	assert!(host.get(third).unwrap().is_open());

	host.tick(ms(200));
	assert!(host.get(first).is_none());
}

#[test]
fn test_toast_limit_drops_newest() {
	let mut host = OverlayHost::default().with_toast_limit(Some(1), Overflow::DropNewest);
	host.show(OverlayKind::Toast).unwrap();
	let err = host.show(OverlayKind::Toast).unwrap_err();
	assert!(matches!(err, OverlayError::ToastLimit { max: 1 }));
	assert_eq!(host.len(), 1);
}

#[test]
fn test_dispose_and_unknown_ids() {
	let mut host = OverlayHost::default();
	let id = host.show(OverlayKind::Splash).unwrap();
	host.take_events();
	host.dispose(id).unwrap();

	assert!(matches!(host.open(id), Err(OverlayError::UnknownOverlay(_))));
	assert!(matches!(host.dispose(id), Err(OverlayError::UnknownOverlay(_))));
	assert!(host.tick(ms(5_000)).is_empty());
}

#[test]
fn test_teardown_cancels_everything() {
	let mut host = OverlayHost::default();
	host.show(OverlayKind::Splash).unwrap();
	host.show(OverlayKind::Toast).unwrap();
	host.teardown();

	assert!(host.is_empty());
	assert!(host.tick(ms(10_000)).is_empty());
}

#[test]
fn test_mount_then_open_respects_drop_newest() {
	let mut host = OverlayHost::default().with_toast_limit(Some(1), Overflow::DropNewest);
	host.show(OverlayKind::Toast).unwrap();
	let id = host.mount(OverlayKind::Toast);

	let err = host.open(id).unwrap_err();
	assert!(matches!(err, OverlayError::ToastLimit { max: 1 }));
	assert!(!host.get(id).unwrap().is_open());

	host.tick(ms(20));
	assert_eq!(host.rendered().len(), 1);
}

#[test]
fn test_mount_then_open_respects_drop_oldest() {
	let mut host = OverlayHost::default().with_toast_limit(Some(1), Overflow::DropOldest);
	let first = host.show(OverlayKind::Toast).unwrap();
	host.tick(ms(10));
	let second = host.mount(OverlayKind::Toast);

	host.open(second).unwrap();
	let oldest = host.get(first).unwrap();
	assert!(!oldest.is_open());
	assert_eq!(oldest.last_close_reason(), Some(CloseReason::Overflow));
	assert!(host.get(second).unwrap().is_open());
}

#[test]
fn test_reopening_an_open_toast_does_not_evict() {
	let mut host = OverlayHost::default().with_toast_limit(Some(1), Overflow::DropOldest);
	let id = host.show(OverlayKind::Toast).unwrap();
	host.open(id).unwrap();
	assert!(host.get(id).unwrap().is_open());
	assert_eq!(host.get(id).unwrap().last_close_reason(), None);
}

#[test]
fn test_zero_toast_limit_rejects_under_both_policies() {
	for overflow in [Overflow::DropOldest, Overflow::DropNewest] {
		let mut host = OverlayHost::default().with_toast_limit(Some(0), overflow);
		let err = host.show(OverlayKind::Toast).unwrap_err();
		assert!(matches!(err, OverlayError::ToastLimit { max: 0 }), "{overflow:?}");
		assert!(host.is_empty());
		assert!(host.rendered().is_empty());
	}
}

#[test]
fn test_dismissal_is_reported_in_time_order() {
	let mut host = OverlayHost::default();
	let id = host.show(OverlayKind::Toast).unwrap();
	host.take_events();

	let events = host.advance_to(Timestamp::from_millis(3_300));
	let kind = OverlayKind::Toast;
	let order: Vec<String> = events
		.iter()
		.map(|e| match e {
			HostEvent::Transition { transition, .. } => format!("{}@{}", transition.to, transition.at),
			HostEvent::Dismissed { .. } => "dismissed".to_string(),
			HostEvent::Removed { .. } => "removed".to_string(),
			other => format!("{other:?}"),
		})
		.collect();
	assert_eq!(
		order,
		vec!["open@t+10ms", "closing@t+3000ms", "dismissed", "closed@t+3200ms", "removed"]
	);
	assert!(events.contains(&HostEvent::Dismissed { id, kind }));
}

#[test]
fn test_from_config_applies_host_section() {
	let config = Config::parse("[host]\nmax_toasts = 1\noverflow = \"drop-newest\"\n").unwrap();
	let mut host = OverlayHost::from_config(&config).unwrap();
	host.show(OverlayKind::Toast).unwrap();
	assert!(matches!(
		host.show(OverlayKind::Toast),
		Err(OverlayError::ToastLimit { max: 1 })
	));
}

#[test]
fn test_from_config_reports_unknown_overlay() {
	let config = Config::parse("[overlay.popup]\nexit_duration_ms = 100\n").unwrap();
	let err = OverlayHost::from_config(&config).unwrap_err();
	assert!(matches!(err, OverlayError::Config(ConfigError::UnknownOverlay(name)) if name == "popup"));
}
