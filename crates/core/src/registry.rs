//! Command registry and generated dispatch glue.
//!
//! `command_registry!` turns the list of built-in commands into the closed
//! [`CommandId`] enum and [`dispatch`], the only place that builds typed
//! arguments and runs a command. [`CommandRegistry`] maps names (canonical and
//! aliases) to ids and holds each id's [`ArgumentShape`].

use std::collections::HashMap;

use tracing::debug;

use crate::binder::BoundArguments;
use crate::commands::Dispatched;
use crate::error::{Error, Result};
use crate::session::AutomationSession;
use crate::shape::ArgumentShape;

/// Generates `CommandId`, its metadata accessors and `dispatch`.
///
/// The first entry after `select` is the target-selection command; every
/// other entry queues one action.
macro_rules! command_registry {
	(
		select $select_id:ident => $select_ty:path;
		$( $id:ident => $ty:path ),+ $(,)?
	) => {
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		pub enum CommandId {
			$select_id,
			$($id),+
		}

		impl CommandId {
			pub const ALL: &'static [CommandId] = &[CommandId::$select_id, $(CommandId::$id),+];

			/// Canonical command name.
			pub fn name(self) -> &'static str {
				match self {
					CommandId::$select_id => <$select_ty as $crate::commands::CommandDef>::NAME,
					$(CommandId::$id => <$ty as $crate::commands::CommandDef>::NAME,)+
				}
			}

			pub fn aliases(self) -> &'static [&'static str] {
				match self {
					CommandId::$select_id => <$select_ty as $crate::commands::CommandDef>::ALIASES,
					$(CommandId::$id => <$ty as $crate::commands::CommandDef>::ALIASES,)+
				}
			}

			/// Argument shape derived from the command's argument struct.
			pub fn shape(self) -> ArgumentShape {
				match self {
					CommandId::$select_id => <<$select_ty as $crate::commands::CommandDef>::Args as $crate::shape::Arguments>::shape(),
					$(CommandId::$id => <<$ty as $crate::commands::CommandDef>::Args as $crate::shape::Arguments>::shape(),)+
				}
			}

			/// Whether this is the command that names replay targets.
			pub fn selects_targets(self) -> bool {
				matches!(self, CommandId::$select_id)
			}
		}

		/// Builds the command's typed arguments from `bound` and runs it.
		///
		/// This function is the *only* place that:
		/// - moves bound values into a typed argument struct
		/// - calls `targets(...)` or `execute(...)`
		pub fn dispatch(
			id: CommandId,
			bound: BoundArguments,
			session: &mut dyn AutomationSession,
		) -> Result<Dispatched> {
			match id {
				CommandId::$select_id => {
					type Cmd = $select_ty;
					let args = <<Cmd as $crate::commands::CommandDef>::Args as $crate::shape::Arguments>::from_bound(bound)
						.map_err(|err| Error::conversion(id.name(), err))?;
					let targets = <Cmd as $crate::commands::SelectTargets>::targets(args)?;
					Ok(Dispatched::Targets(targets))
				}
				$(
					CommandId::$id => {
						type Cmd = $ty;
						let args = <<Cmd as $crate::commands::CommandDef>::Args as $crate::shape::Arguments>::from_bound(bound)
							.map_err(|err| Error::conversion(id.name(), err))?;
						<Cmd as $crate::commands::QueueCommand>::execute(args, session)?;
						Ok(Dispatched::Queued)
					}
				)+
			}
		}
	};
}

command_registry! {
	select Use => crate::commands::target::UseCommand;
	Navigate => crate::commands::navigate::NavigateCommand,
	Resize => crate::commands::navigate::ResizeCommand,
	Click => crate::commands::pointer::ClickCommand,
	DoubleClick => crate::commands::pointer::DoubleClickCommand,
	Hover => crate::commands::pointer::HoverCommand,
	Drag => crate::commands::pointer::DragCommand,
	Focus => crate::commands::keyboard::FocusCommand,
	Enter => crate::commands::keyboard::EnterCommand,
	Press => crate::commands::keyboard::PressCommand,
	Select => crate::commands::form::SelectCommand,
	Upload => crate::commands::form::UploadCommand,
	Wait => crate::commands::wait::WaitCommand,
	TakeScreenshot => crate::commands::capture::TakeScreenshotCommand,
	Expect => crate::commands::expect::ExpectCommand,
}

/// Argument shape per command id.
#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
	shapes: HashMap<CommandId, ArgumentShape>,
}

impl ShapeRegistry {
	pub fn insert(&mut self, id: CommandId, shape: ArgumentShape) {
		self.shapes.insert(id, shape);
	}

	pub fn get(&self, id: CommandId) -> Option<&ArgumentShape> {
		self.shapes.get(&id)
	}

	pub fn len(&self) -> usize {
		self.shapes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.shapes.is_empty()
	}
}

/// A name resolved to its command and argument shape.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedCommand<'a> {
	pub id: CommandId,
	pub shape: &'a ArgumentShape,
}

impl ResolvedCommand<'_> {
	pub fn name(&self) -> &'static str {
		self.id.name()
	}
}

/// Name to command lookup, built once at startup.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
	names: HashMap<&'static str, CommandId>,
	order: Vec<CommandId>,
	shapes: ShapeRegistry,
}

impl CommandRegistry {
	/// Every built-in command, registered under its name and aliases.
	pub fn builtin() -> Self {
		CommandId::ALL
			.iter()
			.fold(RegistryBuilder::new(), |builder, id| builder.command(*id))
			.build()
	}

	pub fn builder() -> RegistryBuilder {
		RegistryBuilder::new()
	}

	/// Resolves a command name. Names match exactly.
	pub fn resolve(&self, name: &str) -> Result<ResolvedCommand<'_>> {
		let id = *self
			.names
			.get(name)
			.ok_or_else(|| Error::UnknownCommand(name.to_string()))?;
		let shape = self
			.shapes
			.get(id)
			.ok_or_else(|| Error::MissingArgumentShape(name.to_string()))?;
		debug!(target = "rc.registry", name, command = id.name(), "resolved command");
		Ok(ResolvedCommand { id, shape })
	}

	/// Canonical names, in registration order.
	pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.order.iter().map(|id| id.name())
	}

	pub fn commands(&self) -> impl Iterator<Item = (CommandId, Option<&ArgumentShape>)> + '_ {
		self.order.iter().map(|id| (*id, self.shapes.get(*id)))
	}

	pub fn shapes(&self) -> &ShapeRegistry {
		&self.shapes
	}
}

impl Default for CommandRegistry {
	fn default() -> Self {
		Self::builtin()
	}
}

/// Assembles a [`CommandRegistry`] from a subset of the built-in commands.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
	names: HashMap<&'static str, CommandId>,
	order: Vec<CommandId>,
	shapes: ShapeRegistry,
}

impl RegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `id` under its name and aliases, with its derived shape.
	pub fn command(self, id: CommandId) -> Self {
		let shape = id.shape();
		self.command_with_shape(id, shape)
	}

	/// Registers `id` with an explicit shape.
	pub fn command_with_shape(mut self, id: CommandId, shape: ArgumentShape) -> Self {
		self = self.names_only(id);
		self.shapes.insert(id, shape);
		self
	}

	/// Registers `id`'s names without any shape. Resolving such a name fails
	/// with [`Error::MissingArgumentShape`].
	pub fn names_only(mut self, id: CommandId) -> Self {
		self.names.insert(id.name(), id);
		for alias in id.aliases() {
			self.names.insert(*alias, id);
		}
		if !self.order.contains(&id) {
			self.order.push(id);
		}
		self
	}

	pub fn build(self) -> CommandRegistry {
		CommandRegistry {
			names: self.names,
			order: self.order,
			shapes: self.shapes,
		}
	}
}
