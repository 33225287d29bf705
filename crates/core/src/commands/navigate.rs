//! Page-level commands: `Navigate` and `Resize`.

use rc_protocol::{NavigateDirection, Size};
use tracing::debug;

use super::{CommandDef, QueueCommand};
use crate::error::{Error, Result};
use crate::session::{Action, AutomationSession, Navigation};

crate::command_arguments! {
	pub struct NavigateArguments {
		pub url: Option<String> = "url",
		pub direction: Option<NavigateDirection> = "direction",
	}
}

pub struct NavigateCommand;

impl CommandDef for NavigateCommand {
	const NAME: &'static str = "Navigate";
	const ALIASES: &'static [&'static str] = &["Open"];

	type Args = NavigateArguments;
}

impl QueueCommand for NavigateCommand {
	fn execute(args: NavigateArguments, session: &mut dyn AutomationSession) -> Result<()> {
		let navigation = match (args.url, args.direction) {
			(Some(url), None) if !url.trim().is_empty() => Navigation::Url(url),
			(None, Some(direction)) => Navigation::Direction(direction),
			(Some(_), Some(_)) => {
				return Err(Error::validation(Self::NAME, "`url` and `direction` are mutually exclusive"));
			}
			_ => return Err(Error::validation(Self::NAME, "either `url` or `direction` is required")),
		};
		debug!(target = "rc.commands", ?navigation, "queue navigate");
		session.execute(Action::Navigate(navigation))?;
		Ok(())
	}
}

crate::command_arguments! {
	pub struct ResizeArguments {
		pub size: Option<Size> = "size",
	}
}

pub struct ResizeCommand;

impl CommandDef for ResizeCommand {
	const NAME: &'static str = "Resize";

	type Args = ResizeArguments;
}

impl QueueCommand for ResizeCommand {
	fn execute(args: ResizeArguments, session: &mut dyn AutomationSession) -> Result<()> {
		let size = args
			.size
			.ok_or_else(|| Error::validation(Self::NAME, "`size` is required"))?;
		if size.width <= 0 || size.height <= 0 {
			return Err(Error::validation(
				Self::NAME,
				format!("`size` must be positive, got {}x{}", size.width, size.height),
			));
		}
		session.execute(Action::Resize(size))?;
		Ok(())
	}
}
