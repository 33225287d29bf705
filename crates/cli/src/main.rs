use clap::Parser;
use rc_cli::{
	cli::Cli,
	commands, logging,
	output::{self, Envelope},
};
use tracing::error;

fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	match commands::dispatch(cli) {
		Ok(envelope) => output::print_envelope(&envelope),
		Err(err) => {
			error!(target = "rc.cli", code = err.code(), "{}", err.message());
			output::print_envelope(&Envelope::failure(&err));
			std::process::exit(1);
		}
	}
}
