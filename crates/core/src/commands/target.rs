//! `Use`: names the browsers the batch replays on.

use rc_protocol::BrowserType;

use super::{CommandDef, SelectTargets};
use crate::error::{Error, Result};

crate::command_arguments! {
	pub struct UseArguments {
		pub browser_type: Vec<BrowserType> = "browserType",
	}
}

pub struct UseCommand;

impl CommandDef for UseCommand {
	const NAME: &'static str = "Use";

	type Args = UseArguments;
}

impl SelectTargets for UseCommand {
	fn targets(args: UseArguments) -> Result<Vec<BrowserType>> {
		if args.browser_type.is_empty() {
			return Err(Error::validation(Self::NAME, "`browserType` must name at least one browser"));
		}
		Ok(args.browser_type)
	}
}
