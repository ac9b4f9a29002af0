//! Scripted overlay simulations on logical or real time.

use std::time::Duration;

use anyhow::Context as _;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use veneer_config::Config;
use veneer_overlay::{
	CloseReason, Destination, HostEvent, Navigator, Notice, OverlayHost, OverlayId, StaticNotice, SubmitPayload,
	TimingTable,
};
use veneer_presence::Timestamp;
use veneer_runtime::{DEFAULT_FRAME_INTERVAL, EventLoop, EventLoopHandle};

use crate::cli::SimulateArgs;

/// Extra time simulated after the last scheduled change.
const SETTLE_MARGIN: Duration = Duration::from_millis(100);

/// Scripted input. Submits sort before closes scheduled at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Step {
	Submit,
	Close,
}

/// Navigator that only logs where the application would go.
struct LogNavigator;

impl Navigator for LogNavigator {
	fn navigate(&mut self, destination: &Destination) {
		tracing::info!(%destination, "simulate.navigate");
	}
}

fn ms(n: u64) -> Duration {
	Duration::from_millis(n)
}

fn build_host(config: &Config, args: &SimulateArgs) -> anyhow::Result<OverlayHost> {
	let notice = Notice {
		link: args.notice_link.clone(),
		message: args.notice_message.clone(),
	};
	let host = OverlayHost::from_config(config).context("invalid overlay configuration")?;
	Ok(host.with_notice_source(StaticNotice(notice)).with_navigator(LogNavigator))
}

/// Returns the scripted steps within `run_for`, in time order.
fn script(args: &SimulateArgs, run_for: Duration) -> Vec<(u64, Step)> {
	let mut steps: Vec<(u64, Step)> = args
		.submit_at
		.iter()
		.map(|&at| (at, Step::Submit))
		.chain(args.close_after.map(|at| (at, Step::Close)))
		.filter(|&(at, _)| ms(at) <= run_for)
		.collect();
	steps.sort();
	steps
}

/// Returns how long to simulate when `--run-for` is not given.
///
/// Long enough for the overlay to close (manually or by timeout) and finish
/// its exit animation, or to settle open if it never closes.
fn run_duration(timings: &TimingTable, args: &SimulateArgs) -> Duration {
	if let Some(run_for) = args.run_for {
		return ms(run_for);
	}
	let timing = timings.get(args.kind);
	let last_submit = args.submit_at.iter().copied().max().map_or(Duration::ZERO, ms);
	let settled = match args.close_after.map(ms).or(timing.auto_dismiss.timeout()) {
		Some(close_at) => close_at + timing.exit_duration,
		None => timing.enter_delay,
	};
	settled.max(last_submit) + SETTLE_MARGIN
}

/// Runs the simulation by advancing the host's logical clock directly.
pub fn run_logical(config: &Config, args: &SimulateArgs) -> anyhow::Result<Vec<HostEvent>> {
	let mut host = build_host(config, args)?;
	let run_for = run_duration(host.timings(), args);
	let id = host.show(args.kind)?;
	let mut events = host.take_events();

	for (at, step) in script(args, run_for) {
		events.extend(host.advance_to(Timestamp::from_millis(at)));
		if host.get(id).is_none() {
			tracing::debug!(%id, at, "simulate.step.removed");
			continue;
		}
		match step {
			Step::Submit => {
				host.submit(id, SubmitPayload::empty())
					.with_context(|| format!("submit at {at}ms"))?;
			}
			Step::Close => host.close(id, CloseReason::Cancel)?,
		}
		events.extend(host.take_events());
	}

	events.extend(host.advance_to(Timestamp::new(run_for)));
	host.teardown();
	Ok(events)
}

/// Runs the simulation on the real-time event loop.
pub async fn run_realtime(config: &Config, args: &SimulateArgs) -> anyhow::Result<Vec<HostEvent>> {
	let host = build_host(config, args)?;
	let run_for = run_duration(host.timings(), args);
	let frame_interval = config.frame_interval().unwrap_or(DEFAULT_FRAME_INTERVAL);

	let mut handle = EventLoop::spawn(host, frame_interval);
	let mut updates = handle.subscribe();
	let start = Instant::now();
	let deadline = start + run_for;
	let id = handle.show(args.kind).await?;

	let mut events = Vec::new();
	let mut steps = script(args, run_for).into_iter().peekable();
	loop {
		let next_step = steps.peek().map(|&(at, _)| start + ms(at));
		tokio::select! {
			update = updates.recv() => match update {
				Ok(event) => events.push(event),
				Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "simulate.events.lagged"),
				Err(RecvError::Closed) => break,
			},
			_ = tokio::time::sleep_until(next_step.unwrap_or(deadline)) => match steps.next() {
				Some((at, step)) => apply_realtime(&handle, id, at, step).await?,
				None => break,
			},
		}
	}

	handle.shutdown().await?;
	while let Ok(event) = updates.try_recv() {
		events.push(event);
	}
	Ok(events)
}

async fn apply_realtime(handle: &EventLoopHandle, id: OverlayId, at: u64, step: Step) -> anyhow::Result<()> {
	match step {
		Step::Submit => {
			handle
				.submit(id, SubmitPayload::empty())
				.await
				.with_context(|| format!("submit at {at}ms"))?;
		}
		Step::Close => handle.close(id, CloseReason::Cancel).await?,
	}
	Ok(())
}
