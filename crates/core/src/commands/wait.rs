use std::time::Duration;

use super::{CommandDef, QueueCommand, required};
use crate::error::{Error, Result};
use crate::session::{Action, AutomationSession, WaitFor};

crate::command_arguments! {
	pub struct WaitArguments {
		pub milliseconds: Option<i32> = "milliseconds",
		pub seconds: Option<i32> = "seconds",
		/// Waits until an element matches instead of sleeping.
		pub selector: Option<String> = "selector",
	}
}

pub struct WaitCommand;

impl CommandDef for WaitCommand {
	const NAME: &'static str = "Wait";

	type Args = WaitArguments;
}

impl QueueCommand for WaitCommand {
	fn execute(args: WaitArguments, session: &mut dyn AutomationSession) -> Result<()> {
		let wait = match (args.milliseconds, args.seconds, args.selector) {
			(Some(ms), None, None) => WaitFor::Duration(Duration::from_millis(non_negative(ms, "milliseconds")?)),
			(None, Some(s), None) => WaitFor::Duration(Duration::from_secs(non_negative(s, "seconds")?)),
			(None, None, Some(selector)) => WaitFor::Element(required(Self::NAME, "selector", Some(selector))?),
			(None, None, None) => {
				return Err(Error::validation(
					Self::NAME,
					"one of `milliseconds`, `seconds` or `selector` is required",
				));
			}
			_ => {
				return Err(Error::validation(
					Self::NAME,
					"`milliseconds`, `seconds` and `selector` are mutually exclusive",
				));
			}
		};
		session.execute(Action::Wait(wait))?;
		Ok(())
	}
}

fn non_negative(value: i32, field: &str) -> Result<u64> {
	u64::try_from(value).map_err(|_| Error::validation(WaitCommand::NAME, format!("`{field}` must not be negative")))
}
