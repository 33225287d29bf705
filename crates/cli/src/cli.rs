use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rc_protocol::BrowserType;

use crate::styles::cli_styles;

/// Root CLI for rc.
#[derive(Parser, Debug)]
#[command(name = "rc")]
#[command(about = "Record a batch of browser commands and replay it on each target")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run a batch of command descriptors (JSON array or NDJSON).
	Run(RunArgs),
	/// List registered commands and their argument shapes.
	Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
	/// Descriptor file. Reads stdin when omitted or `-`.
	#[arg(value_name = "FILE")]
	pub file: Option<PathBuf>,

	/// JSON file holding orchestrator settings.
	#[arg(long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Browser to replay on when the batch has no `Use` command.
	#[arg(long, value_name = "BROWSER", value_parser = parse_browser)]
	pub default_target: Option<BrowserType>,

	/// Stop replaying after the first failing target.
	#[arg(long)]
	pub stop_on_replay_failure: bool,
}

fn parse_browser(raw: &str) -> Result<BrowserType, String> {
	BrowserType::from_name(raw)
		.ok_or_else(|| format!("unknown browser `{raw}` (expected one of: {})", BrowserType::VARIANTS.join(", ")))
}
