use proptest::prelude::*;

use super::*;

fn ms(n: u64) -> Duration {
	Duration::from_millis(n)
}

#[test]
fn test_fires_in_deadline_order() {
	let mut q = TimerQueue::new();
	q.schedule(Timestamp::ZERO, ms(300), "exit");
	q.schedule(Timestamp::ZERO, ms(10), "reveal");

	assert_eq!(q.next_deadline(), Some(Timestamp::from_millis(10)));
	assert!(q.pop_due(Timestamp::from_millis(9)).is_none());

	let (_, at, payload) = q.pop_due(Timestamp::from_millis(500)).unwrap();
	assert_eq!((at, payload), (Timestamp::from_millis(10), "reveal"));
	let (_, at, payload) = q.pop_due(Timestamp::from_millis(500)).unwrap();
	assert_eq!((at, payload), (Timestamp::from_millis(300), "exit"));
	assert!(q.is_empty());
}

#[test]
fn test_equal_deadlines_fire_in_schedule_order() {
	let mut q = TimerQueue::new();
	q.schedule(Timestamp::ZERO, ms(50), 1);
	q.schedule(Timestamp::from_millis(20), ms(30), 2);
	q.schedule(Timestamp::from_millis(40), ms(10), 3);

	let order: Vec<_> = std::iter::from_fn(|| q.pop_due(Timestamp::from_millis(50)))
		.map(|(_, _, p)| p)
		.collect();
	assert_eq!(order, vec![1, 2, 3]);
}

#[test]
fn test_cancel_removes_pending_timer() {
	let mut q = TimerQueue::new();
	let a = q.schedule(Timestamp::ZERO, ms(10), 'a');
	let b = q.schedule(Timestamp::ZERO, ms(20), 'b');

	assert_eq!(q.cancel(a), Some('a'));
	assert_eq!(q.cancel(a), None);
	assert!(!q.is_pending(a));
	assert!(q.is_pending(b));
	assert_eq!(q.deadline(b), Some(Timestamp::from_millis(20)));

	let (handle, _, payload) = q.pop_due(Timestamp::from_millis(100)).unwrap();
	assert_eq!((handle, payload), (b, 'b'));
}

#[test]
fn test_fired_handle_cannot_cancel_newer_timer() {
	let mut q = TimerQueue::new();
	let old = q.schedule(Timestamp::ZERO, ms(10), "old");
	q.pop_due(Timestamp::from_millis(10)).unwrap();
	let new = q.schedule(Timestamp::from_millis(10), ms(10), "new");

	assert_ne!(old, new);
	assert_eq!(q.cancel(old), None);
	assert!(q.is_pending(new));
}

#[test]
fn test_clear_cancels_everything() {
	let mut q = TimerQueue::new();
	let a = q.schedule(Timestamp::ZERO, ms(10), ());
	q.schedule(Timestamp::ZERO, ms(20), ());

	assert_eq!(q.clear(), 2);
	assert!(q.is_empty());
	assert!(!q.is_pending(a));
	assert!(q.pop_due(Timestamp::from_millis(1_000)).is_none());
}

proptest! {
	#[test]
	fn prop_pop_order_is_non_decreasing(delays in proptest::collection::vec(0u64..500, 1..40)) {
		let mut q = TimerQueue::new();
		for (i, d) in delays.iter().enumerate() {
			q.schedule(Timestamp::ZERO, ms(*d), i);
		}

		let mut last = Timestamp::ZERO;
		let mut fired = 0;
		while let Some((_, at, _)) = q.pop_due(Timestamp::from_millis(500)) {
			prop_assert!(at >= last);
			last = at;
			fired += 1;
		}
		prop_assert_eq!(fired, delays.len());
	}
}
