mod cli;
mod report;
mod simulate;

use clap::Parser;
use cli::{Cli, Command, LogFormat};
use tracing_subscriber::EnvFilter;
use veneer_config::Config;
use veneer_overlay::TimingTable;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.log_format);

	let config = Config::resolve(cli.config.as_deref())?;
	match cli.command {
		Command::Simulate(args) => {
			let events = if args.realtime {
				simulate::run_realtime(&config, &args).await?
			} else {
				simulate::run_logical(&config, &args)?
			};
			for line in report::describe_all(&events) {
				println!("{line}");
			}
		}
		Command::Timings => {
			let table = TimingTable::from_config(&config)?;
			for line in report::timing_table(&table) {
				println!("{line}");
			}
		}
	}
	Ok(())
}

fn init_tracing(format: LogFormat) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
	match format {
		LogFormat::Text => builder.init(),
		LogFormat::Json => builder.json().init(),
	}
}
