use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use veneer_overlay::OverlayKind;

#[derive(Parser, Debug)]
#[command(name = "veneer")]
#[command(about = "Simulate overlay presence lifecycles")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (defaults to $XDG_CONFIG_HOME/veneer/config.toml)
	#[arg(long, short = 'c', global = true)]
	pub config: Option<PathBuf>,

	/// Log output format
	#[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
	pub log_format: LogFormat,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
	Text,
	Json,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Run one overlay through its lifecycle and print every event
	Simulate(SimulateArgs),
	/// Print the resolved timing of every overlay
	Timings,
}

/// Arguments of `veneer simulate`.
#[derive(clap::Args, Debug, Clone)]
pub struct SimulateArgs {
	/// Overlay to show (splash, welcome, change-password, reward-claim, about-bp, toast)
	#[arg(value_parser = parse_kind)]
	pub kind: OverlayKind,

	/// Close the overlay manually after this many milliseconds
	#[arg(long, value_name = "MS")]
	pub close_after: Option<u64>,

	/// Submit the overlay's action at these offsets (repeatable)
	#[arg(long = "submit-at", value_name = "MS")]
	pub submit_at: Vec<u64>,

	/// Stop the simulation after this many milliseconds
	#[arg(long, value_name = "MS")]
	pub run_for: Option<u64>,

	/// Drive the overlay with the real-time event loop instead of logical time
	#[arg(long)]
	pub realtime: bool,

	/// Link served by the notice source to welcome overlays
	#[arg(long)]
	pub notice_link: Option<String>,

	/// Message served by the notice source to welcome overlays
	#[arg(long)]
	pub notice_message: Option<String>,
}

fn parse_kind(value: &str) -> Result<OverlayKind, String> {
	value.parse().map_err(|e: veneer_overlay::ParseKindError| e.to_string())
}
