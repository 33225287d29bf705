//! Built-in commands.
//!
//! Each command is `pub struct XxxCommand;` with a [`CommandDef`] impl naming
//! it and its argument struct, plus either [`QueueCommand`] (records one
//! [`Action`](crate::session::Action)) or [`SelectTargets`] (`Use`, which only
//! names browsers).

pub mod capture;
pub mod expect;
pub mod form;
pub mod keyboard;
pub mod navigate;
pub mod pointer;
pub mod target;
pub mod wait;

use rc_protocol::{BrowserType, Point};

use crate::error::{Error, Result};
use crate::session::{AutomationSession, Locator};
use crate::shape::Arguments;

/// Canonical command trait.
pub trait CommandDef: 'static {
	const NAME: &'static str;
	const ALIASES: &'static [&'static str] = &[];

	type Args: Arguments;
}

/// A command that queues exactly one action on a recording session.
pub trait QueueCommand: CommandDef {
	fn execute(args: Self::Args, session: &mut dyn AutomationSession) -> Result<()>;
}

/// The target-selection command: contributes browsers, queues nothing.
pub trait SelectTargets: CommandDef {
	fn targets(args: Self::Args) -> Result<Vec<BrowserType>>;
}

/// What dispatching one descriptor contributed to the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
	Queued,
	Targets(Vec<BrowserType>),
}

/// Combines the optional `selector` and `point` arguments shared by pointer
/// commands. With both present the point is an offset into the element.
pub(crate) fn locate(command: &str, selector: Option<String>, point: Option<Point>) -> Result<Locator> {
	match (selector, point) {
		(Some(selector), Some(offset)) => Ok(Locator::Within { selector, offset }),
		(Some(selector), None) => Ok(Locator::Selector(selector)),
		(None, Some(point)) => Ok(Locator::Point(point)),
		(None, None) => Err(Error::validation(command, "either `selector` or `point` is required")),
	}
}

/// Rejects a missing or blank text argument.
pub(crate) fn required(command: &str, field: &str, value: Option<String>) -> Result<String> {
	match value {
		Some(value) if !value.trim().is_empty() => Ok(value),
		_ => Err(Error::validation(command, format!("`{field}` is required"))),
	}
}
