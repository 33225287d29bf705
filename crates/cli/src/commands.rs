use std::path::Path;

use rc::{CommandRegistry, Orchestrator, OrchestratorConfig};
use tracing::info;

use crate::cli::{Cli, Commands, RunArgs};
use crate::dry_run::DryRunSession;
use crate::error::{CliError, Result};
use crate::input;
use crate::output::Envelope;

pub fn dispatch(cli: Cli) -> Result<Envelope> {
	match cli.command {
		Commands::Run(args) => run(&args),
		Commands::Commands => Ok(Envelope::commands(&CommandRegistry::builtin())),
	}
}

/// Reads a batch and runs it against a [`DryRunSession`].
pub fn run(args: &RunArgs) -> Result<Envelope> {
	let config = load_config(args)?;
	let batch = input::read_batch(args.file.as_deref())?;
	info!(target = "rc.cli", descriptors = batch.len(), default_target = %config.default_target, "running batch");

	let orchestrator = Orchestrator::with_config(config);
	let mut session = DryRunSession::new();
	let report = orchestrator.execute(&mut session, &batch)?;
	Ok(Envelope::report(report))
}

/// Settings from `--config`, then overridden by explicit flags.
pub fn load_config(args: &RunArgs) -> Result<OrchestratorConfig> {
	let mut config = match &args.config {
		Some(path) => read_config(path)?,
		None => OrchestratorConfig::default(),
	};
	if let Some(target) = args.default_target {
		config.default_target = target;
	}
	if args.stop_on_replay_failure {
		config.stop_on_replay_failure = true;
	}
	Ok(config)
}

fn read_config(path: &Path) -> Result<OrchestratorConfig> {
	let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
		path: path.to_path_buf(),
		source,
	})?;
	serde_json::from_str(&text).map_err(|source| CliError::Config {
		path: path.to_path_buf(),
		source,
	})
}
