//! Human-readable rendering of host events and timing tables.

use std::time::Duration;

use veneer_overlay::{HostEvent, TimingTable};
use veneer_presence::{AutoDismiss, TransitionCause};

fn cause_label(cause: TransitionCause) -> &'static str {
	match cause {
		TransitionCause::Intent => "intent",
		TransitionCause::RevealElapsed => "enter delay elapsed",
		TransitionCause::ExitElapsed => "exit finished",
		TransitionCause::AutoDismiss => "auto-dismiss",
	}
}

/// Renders one event as a single line.
pub fn describe(event: &HostEvent) -> String {
	match event {
		HostEvent::Transition { id, kind, transition } => format!(
			"{:>10}  {id} {kind:<16} {} -> {} ({})",
			transition.at.to_string(),
			transition.from,
			transition.to,
			cause_label(transition.cause)
		),
		HostEvent::Dismissed { id, kind } => format!("{:>10}  {id} {kind:<16} dismissed by timeout", ""),
		HostEvent::Submitted { id, kind, payload } => match &payload.value {
			Some(value) => format!("{:>10}  {id} {kind:<16} submitted {value:?}", ""),
			None => format!("{:>10}  {id} {kind:<16} submitted", ""),
		},
		HostEvent::Navigated { id, destination } => format!("{:>10}  {id} navigate -> {destination}", ""),
		HostEvent::Removed { id, kind } => format!("{:>10}  {id} {kind:<16} removed", ""),
	}
}

/// Renders every event, one line each.
pub fn describe_all(events: &[HostEvent]) -> Vec<String> {
	events.iter().map(describe).collect()
}

fn millis(d: Duration) -> String {
	format!("{}ms", d.as_millis())
}

/// Renders the timing table with a header row.
pub fn timing_table(table: &TimingTable) -> Vec<String> {
	let mut lines = vec![format!(
		"{:<16} {:>8} {:>8} {:>10} {:>9}",
		"overlay", "enter", "exit", "dismiss", "cooldown"
	)];
	for (kind, timing) in table.iter() {
		let dismiss = match timing.auto_dismiss {
			AutoDismiss::Never => "never".to_string(),
			AutoDismiss::After(d) => millis(d),
		};
		let cooldown = timing.cooldown.map_or_else(|| "-".to_string(), millis);
		lines.push(format!(
			"{:<16} {:>8} {:>8} {:>10} {:>9}",
			kind.name(),
			millis(timing.enter_delay),
			millis(timing.exit_duration),
			dismiss,
			cooldown
		));
	}
	lines
}
