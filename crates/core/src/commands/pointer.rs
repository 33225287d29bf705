//! Mouse commands. Each accepts a `selector`, a `point`, or both (a point
//! offset inside the element).

use rc_protocol::{MouseButton, Point};

use super::{CommandDef, QueueCommand, locate};
use crate::error::{Error, Result};
use crate::session::{Action, AutomationSession};

crate::command_arguments! {
	pub struct ClickArguments {
		pub selector: Option<String> = "selector",
		pub point: Option<Point> = "point",
		pub button: MouseButton = "button",
	}
}

pub struct ClickCommand;

impl CommandDef for ClickCommand {
	const NAME: &'static str = "Click";

	type Args = ClickArguments;
}

impl QueueCommand for ClickCommand {
	fn execute(args: ClickArguments, session: &mut dyn AutomationSession) -> Result<()> {
		let at = locate(Self::NAME, args.selector, args.point)?;
		session.execute(Action::Click { at, button: args.button })?;
		Ok(())
	}
}

crate::command_arguments! {
	/// Shared by `DoubleClick` and `Hover`.
	pub struct PointerArguments {
		pub selector: Option<String> = "selector",
		pub point: Option<Point> = "point",
	}
}

pub struct DoubleClickCommand;

impl CommandDef for DoubleClickCommand {
	const NAME: &'static str = "DoubleClick";

	type Args = PointerArguments;
}

impl QueueCommand for DoubleClickCommand {
	fn execute(args: PointerArguments, session: &mut dyn AutomationSession) -> Result<()> {
		let at = locate(Self::NAME, args.selector, args.point)?;
		session.execute(Action::DoubleClick(at))?;
		Ok(())
	}
}

pub struct HoverCommand;

impl CommandDef for HoverCommand {
	const NAME: &'static str = "Hover";

	type Args = PointerArguments;
}

impl QueueCommand for HoverCommand {
	fn execute(args: PointerArguments, session: &mut dyn AutomationSession) -> Result<()> {
		let at = locate(Self::NAME, args.selector, args.point)?;
		session.execute(Action::Hover(at))?;
		Ok(())
	}
}

crate::command_arguments! {
	pub struct DragArguments {
		pub from: Option<String> = "from",
		pub from_point: Option<Point> = "fromPoint",
		pub to: Option<String> = "to",
		pub to_point: Option<Point> = "toPoint",
	}
}

pub struct DragCommand;

impl CommandDef for DragCommand {
	const NAME: &'static str = "Drag";

	type Args = DragArguments;
}

impl QueueCommand for DragCommand {
	fn execute(args: DragArguments, session: &mut dyn AutomationSession) -> Result<()> {
		let from = locate(Self::NAME, args.from, args.from_point)
			.map_err(|_| Error::validation(Self::NAME, "either `from` or `fromPoint` is required"))?;
		let to = locate(Self::NAME, args.to, args.to_point)
			.map_err(|_| Error::validation(Self::NAME, "either `to` or `toPoint` is required"))?;
		session.execute(Action::Drag { from, to })?;
		Ok(())
	}
}
