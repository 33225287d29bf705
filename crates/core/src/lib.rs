//! Bind and replay remote automation command batches.
//!
//! A batch arrives as a list of [`CommandDescriptor`]s: a command name plus
//! untyped JSON arguments. The [`Orchestrator`] resolves each name through the
//! [`CommandRegistry`], converts the raw arguments into the command's typed
//! argument struct with the [`binder`], and queues one [`Action`] per command on
//! an [`AutomationSession`] in recording mode. The `Use` command is the
//! exception: it only names the browsers the recorded actions are replayed
//! against once every descriptor has been consumed.
//!
//! ```ignore
//! let orchestrator = Orchestrator::default();
//! let report = orchestrator.execute(&mut session, &descriptors)?;
//! ```
//!
//! [`CommandDescriptor`]: rc_protocol::CommandDescriptor

pub mod binder;
pub mod commands;
pub mod error;
pub mod orchestrator;
pub mod predicate;
pub mod registry;
pub mod session;
pub mod shape;

pub use binder::{BindError, BoundArguments, BoundValue, ConversionError, bind};
pub use error::{Error, Result};
pub use orchestrator::{BatchReport, Orchestrator, OrchestratorConfig};
pub use predicate::{EvalError, Predicate, PredicateError};
pub use registry::{CommandId, CommandRegistry, RegistryBuilder, ResolvedCommand, ShapeRegistry};
pub use session::{Action, AssertionError, AutomationSession, SessionError, SessionGuard};
pub use shape::{ArgumentShape, Arguments, Field, FieldShape, Kind, Scalar, TypeTag};
