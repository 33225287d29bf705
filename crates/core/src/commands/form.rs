//! Form commands: `Select` and `Upload`.

use rc_protocol::{Point, SelectMode};

use super::{CommandDef, QueueCommand, required};
use crate::error::{Error, Result};
use crate::session::{Action, AutomationSession};

crate::command_arguments! {
	pub struct SelectArguments {
		pub selector: Option<String> = "selector",
		pub values: Vec<String> = "values",
		pub mode: SelectMode = "mode",
	}
}

pub struct SelectCommand;

impl CommandDef for SelectCommand {
	const NAME: &'static str = "Select";

	type Args = SelectArguments;
}

impl QueueCommand for SelectCommand {
	fn execute(args: SelectArguments, session: &mut dyn AutomationSession) -> Result<()> {
		let selector = required(Self::NAME, "selector", args.selector)?;
		if args.values.is_empty() {
			return Err(Error::validation(Self::NAME, "`values` must name at least one option"));
		}
		if args.mode == SelectMode::Index {
			if let Some(bad) = args.values.iter().find(|value| value.trim().parse::<u32>().is_err()) {
				return Err(Error::validation(
					Self::NAME,
					format!("option index `{bad}` is not a non-negative integer"),
				));
			}
		}
		session.execute(Action::Select {
			selector,
			values: args.values,
			mode: args.mode,
		})?;
		Ok(())
	}
}

crate::command_arguments! {
	pub struct UploadArguments {
		pub selector: Option<String> = "selector",
		pub file_name: Option<String> = "fileName",
		pub offset: Option<Point> = "offset",
	}
}

pub struct UploadCommand;

impl CommandDef for UploadCommand {
	const NAME: &'static str = "Upload";

	type Args = UploadArguments;
}

impl QueueCommand for UploadCommand {
	fn execute(args: UploadArguments, session: &mut dyn AutomationSession) -> Result<()> {
		let selector = required(Self::NAME, "selector", args.selector)?;
		let file_name = required(Self::NAME, "fileName", args.file_name)?;
		session.execute(Action::Upload {
			selector,
			file_name,
			offset: args.offset,
		})?;
		Ok(())
	}
}
