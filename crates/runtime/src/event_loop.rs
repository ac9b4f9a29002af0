use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use veneer_overlay::{
	CloseReason, HostEvent, OverlayHost, OverlayId, OverlayKind, RenderedOverlay, SubmitPayload,
};

use crate::{Result, RuntimeError};


/// Default frame interval, roughly 60 frames per second.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Capacity of the command queue.
const COMMAND_CAPACITY: usize = 64;
/// Capacity of the event broadcast buffer per subscriber.
const EVENT_CAPACITY: usize = 256;

/// Requests handled by the event loop.
#[derive(Debug)]
pub enum HostCommand {
	/// Mount and open an overlay, replying with its id.
	Show {
		kind: OverlayKind,
		reply: oneshot::Sender<veneer_overlay::Result<OverlayId>>,
	},
	Open(OverlayId),
	Close(OverlayId, CloseReason),
	/// Run a guarded submit, replying with whether it ran.
	Submit {
		id: OverlayId,
		payload: SubmitPayload,
		reply: oneshot::Sender<veneer_overlay::Result<bool>>,
	},
	Dispose(OverlayId),
	/// Reply with the overlays to draw.
	Snapshot(oneshot::Sender<Vec<RenderedOverlay>>),
}

/// Drives one [`OverlayHost`] in real time.
#[derive(Debug)]
pub struct EventLoop {
	host: OverlayHost,
	frame_interval: Duration,
	commands: mpsc::Receiver<HostCommand>,
	events: broadcast::Sender<HostEvent>,
	cancel: CancellationToken,
	last_frame: Instant,
}

impl EventLoop {
	/// Creates an event loop and the handle used to talk to it.
	///
	/// The loop does nothing until [`Self::run`] is awaited.
	pub fn new(host: OverlayHost, frame_interval: Duration) -> (Self, EventLoopHandle) {
		let (commands_tx, commands) = mpsc::channel(COMMAND_CAPACITY);
		let (events, _) = broadcast::channel(EVENT_CAPACITY);
		let cancel = CancellationToken::new();

		let handle = EventLoopHandle {
			commands: commands_tx,
			events: events.clone(),
			cancel: cancel.clone(),
			task: None,
		};
		let event_loop = Self {
			host,
			frame_interval,
			commands,
			events,
			cancel,
			last_frame: Instant::now(),
		};
		(event_loop, handle)
	}

	/// Spawns the event loop on the current tokio runtime.
	pub fn spawn(host: OverlayHost, frame_interval: Duration) -> EventLoopHandle {
		let (event_loop, mut handle) = Self::new(host, frame_interval);
		handle.task = Some(tokio::spawn(event_loop.run()));
		handle
	}

	/// Runs until cancelled or every handle is dropped, then tears the host down.
	pub async fn run(mut self) {
		let mut frames = tokio::time::interval(self.frame_interval);
		frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
		self.last_frame = Instant::now();
		tracing::debug!(frame_interval = ?self.frame_interval, "runtime.start");

		loop {
			tokio::select! {
				biased;
				_ = self.cancel.cancelled() => break,
				command = self.commands.recv() => match command {
					Some(command) => {
						self.catch_up();
						self.apply(command);
					}
					None => break,
				},
				_ = frames.tick() => self.catch_up(),
			}
		}

		self.host.teardown();
		tracing::debug!(at = %self.host.now(), "runtime.stop");
	}

	/// Advances the host to the current wall time and publishes its events.
	fn catch_up(&mut self) {
		let now = Instant::now();
		let delta = now.saturating_duration_since(self.last_frame);
		self.last_frame = now;
		let events = self.host.tick(delta);
		self.publish(events);
	}

	fn apply(&mut self, command: HostCommand) {
		tracing::trace!(?command, "runtime.command");
		match command {
			HostCommand::Show { kind, reply } => {
				let _ = reply.send(self.host.show(kind));
			}
			HostCommand::Open(id) => {
				if let Err(error) = self.host.open(id) {
					tracing::warn!(%error, "runtime.open.failed");
				}
			}
			HostCommand::Close(id, reason) => {
				if let Err(error) = self.host.close(id, reason) {
					tracing::warn!(%error, "runtime.close.failed");
				}
			}
			HostCommand::Submit { id, payload, reply } => {
				let _ = reply.send(self.host.submit(id, payload));
			}
			HostCommand::Dispose(id) => {
				if let Err(error) = self.host.dispose(id) {
					tracing::warn!(%error, "runtime.dispose.failed");
				}
			}
			HostCommand::Snapshot(reply) => {
				let _ = reply.send(self.host.rendered());
			}
		}
		let events = self.host.take_events();
		self.publish(events);
	}

	fn publish(&self, events: Vec<HostEvent>) {
		for event in events {
			// No subscribers is fine; events are advisory.
			let _ = self.events.send(event);
		}
	}
}

/// Handle for sending commands to a running [`EventLoop`].
#[derive(Debug)]
pub struct EventLoopHandle {
	commands: mpsc::Sender<HostCommand>,
	events: broadcast::Sender<HostEvent>,
	cancel: CancellationToken,
	task: Option<JoinHandle<()>>,
}

impl EventLoopHandle {
	/// Subscribes to host events published after this call.
	pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
		self.events.subscribe()
	}

	/// Mounts and opens an overlay.
	pub async fn show(&self, kind: OverlayKind) -> Result<OverlayId> {
		let (reply, rx) = oneshot::channel();
		self.send(HostCommand::Show { kind, reply }).await?;
		Ok(rx.await.map_err(|_| RuntimeError::Closed)??)
	}

	pub async fn open(&self, id: OverlayId) -> Result<()> {
		self.send(HostCommand::Open(id)).await
	}

	pub async fn close(&self, id: OverlayId, reason: CloseReason) -> Result<()> {
		self.send(HostCommand::Close(id, reason)).await
	}

	/// Runs a guarded submit. Returns true if the action ran.
	pub async fn submit(&self, id: OverlayId, payload: SubmitPayload) -> Result<bool> {
		let (reply, rx) = oneshot::channel();
		self.send(HostCommand::Submit { id, payload, reply }).await?;
		Ok(rx.await.map_err(|_| RuntimeError::Closed)??)
	}

	pub async fn dispose(&self, id: OverlayId) -> Result<()> {
		self.send(HostCommand::Dispose(id)).await
	}

	/// Returns the overlays to draw right now.
	pub async fn snapshot(&self) -> Result<Vec<RenderedOverlay>> {
		let (reply, rx) = oneshot::channel();
		self.send(HostCommand::Snapshot(reply)).await?;
		rx.await.map_err(|_| RuntimeError::Closed)
	}

	/// Returns the token that stops the loop when cancelled.
	pub fn cancellation_token(&self) -> CancellationToken {
		self.cancel.clone()
	}

	/// Stops the loop and waits for the host to be torn down.
	pub async fn shutdown(&mut self) -> Result<()> {
		self.cancel.cancel();
		if let Some(task) = self.task.take() {
			task.await?;
		}
		Ok(())
	}

	async fn send(&self, command: HostCommand) -> Result<()> {
		self.commands.send(command).await.map_err(|_| RuntimeError::Closed)
	}
}
