use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rstest::rstest;

use super::*;

fn ms(n: u64) -> Duration {
	Duration::from_millis(n)
}

fn counting_guard(cooldown: Duration) -> (ActionGuard<()>, Arc<AtomicUsize>) {
	let count = Arc::new(AtomicUsize::new(0));
	let seen = count.clone();
	let guard = ActionGuard::new(
		move |()| {
			seen.fetch_add(1, Ordering::SeqCst);
		},
		cooldown,
	);
	(guard, count)
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(10)]
fn test_calls_within_window_invoke_once(#[case] calls: usize) {
	let (mut guard, count) = counting_guard(DEFAULT_COOLDOWN);
	for _ in 0..calls {
		guard.call(());
		guard.tick(ms(20));
	}
	assert_eq!(count.load(Ordering::SeqCst), 1);
	assert_eq!(guard.invocations(), 1);
	assert_eq!(guard.suppressed(), calls as u64 - 1);
}

#[test]
fn test_call_after_cooldown_invokes_again() {
	let (mut guard, count) = counting_guard(DEFAULT_COOLDOWN);
	assert!(guard.call(()));
	guard.tick(ms(301));
	assert!(!guard.is_locked());
	assert!(guard.call(()));
	assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_suppressed_call_does_not_extend_lock() {
	let (mut guard, _) = counting_guard(ms(300));
	guard.call(());
	guard.tick(ms(250));
	assert!(!guard.call(()));
	guard.tick(ms(50));
	assert!(!guard.is_locked());
}

#[test]
fn test_action_receives_arguments() {
	let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
	let sink = seen.clone();
	let mut guard = ActionGuard::with_default_cooldown(move |(code, amount): (&'static str, u32)| {
		sink.lock().unwrap().push((code, amount));
	});

	guard.call(("claim", 5));
	guard.call(("claim", 6));
	assert_eq!(*seen.lock().unwrap(), vec![("claim", 5)]);
}

#[test]
fn test_shorter_cooldown_mid_lock_reschedules_unlock() {
	let (mut guard, count) = counting_guard(ms(300));
	guard.call(());
	guard.tick(ms(50));

	guard.set_cooldown(ms(100));
	assert!(guard.is_release_pending());
	guard.tick(ms(49));
	assert!(guard.is_locked());
	guard.tick(ms(1));
	assert!(!guard.is_locked());
	assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_elapsed_cooldown_mid_lock_unlocks_immediately() {
	let (mut guard, _) = counting_guard(ms(300));
	guard.call(());
	guard.tick(ms(200));

	guard.set_cooldown(ms(100));
	assert!(!guard.is_locked());
	assert!(!guard.is_release_pending());
}

#[test]
fn test_reconfigure_mid_lock_never_double_invokes() {
	let (mut guard, old_count) = counting_guard(ms(300));
	let new_count = Arc::new(AtomicUsize::new(0));
	let seen = new_count.clone();

	guard.call(());
	guard.reconfigure(
		move |()| {
			seen.fetch_add(1, Ordering::SeqCst);
		},
		ms(500),
	);
	guard.call(());
	guard.tick(ms(499));
	guard.call(());

	assert_eq!(old_count.load(Ordering::SeqCst), 1);
	assert_eq!(new_count.load(Ordering::SeqCst), 0);

	// Only one unlock timer exists; it uses the new cooldown.
	guard.tick(ms(1));
	assert!(!guard.is_locked());
	assert!(guard.call(()));
	assert_eq!(new_count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_teardown_cancels_pending_unlock() {
	let (mut guard, _) = counting_guard(ms(300));
	guard.call(());
	guard.teardown();
	assert!(!guard.is_release_pending());
	assert!(!guard.is_locked());
}
