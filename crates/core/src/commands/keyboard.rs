//! Keyboard and focus commands.

use rc_protocol::SpecialKey;

use super::{CommandDef, QueueCommand, required};
use crate::error::{Error, Result};
use crate::session::{Action, AutomationSession};

crate::command_arguments! {
	pub struct FocusArguments {
		pub selector: Option<String> = "selector",
	}
}

pub struct FocusCommand;

impl CommandDef for FocusCommand {
	const NAME: &'static str = "Focus";

	type Args = FocusArguments;
}

impl QueueCommand for FocusCommand {
	fn execute(args: FocusArguments, session: &mut dyn AutomationSession) -> Result<()> {
		let selector = required(Self::NAME, "selector", args.selector)?;
		session.execute(Action::Focus(selector))?;
		Ok(())
	}
}

crate::command_arguments! {
	pub struct EnterArguments {
		pub text: Option<String> = "text",
		/// Types into the focused element when absent.
		pub selector: Option<String> = "selector",
		/// Sets the value at once instead of typing key by key.
		pub quickly: bool = "quickly",
	}
}

pub struct EnterCommand;

impl CommandDef for EnterCommand {
	const NAME: &'static str = "Enter";
	const ALIASES: &'static [&'static str] = &["Type"];

	type Args = EnterArguments;
}

impl QueueCommand for EnterCommand {
	fn execute(args: EnterArguments, session: &mut dyn AutomationSession) -> Result<()> {
		// empty text is a legitimate way to clear a field
		let text = args
			.text
			.ok_or_else(|| Error::validation(Self::NAME, "`text` is required"))?;
		session.execute(Action::Enter {
			text,
			selector: args.selector,
			quickly: args.quickly,
		})?;
		Ok(())
	}
}

crate::command_arguments! {
	pub struct PressArguments {
		pub keys: Vec<SpecialKey> = "keys",
	}
}

pub struct PressCommand;

impl CommandDef for PressCommand {
	const NAME: &'static str = "Press";

	type Args = PressArguments;
}

impl QueueCommand for PressCommand {
	fn execute(args: PressArguments, session: &mut dyn AutomationSession) -> Result<()> {
		if args.keys.is_empty() {
			return Err(Error::validation(Self::NAME, "`keys` must name at least one key"));
		}
		session.execute(Action::Press(args.keys))?;
		Ok(())
	}
}
