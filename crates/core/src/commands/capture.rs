use super::{CommandDef, QueueCommand, required};
use crate::error::Result;
use crate::session::{Action, AutomationSession};

crate::command_arguments! {
	pub struct TakeScreenshotArguments {
		pub file_name: Option<String> = "fileName",
	}
}

pub struct TakeScreenshotCommand;

impl CommandDef for TakeScreenshotCommand {
	const NAME: &'static str = "TakeScreenshot";
	const ALIASES: &'static [&'static str] = &["Screenshot"];

	type Args = TakeScreenshotArguments;
}

impl QueueCommand for TakeScreenshotCommand {
	fn execute(args: TakeScreenshotArguments, session: &mut dyn AutomationSession) -> Result<()> {
		let file_name = required(Self::NAME, "fileName", args.file_name)?;
		session.execute(Action::TakeScreenshot { file_name })?;
		Ok(())
	}
}
