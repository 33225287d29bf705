use thiserror::Error;

use crate::binder::{BindError, ConversionError};
use crate::session::{AssertionError, SessionError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	#[error("unable to locate available command: {0}")]
	UnknownCommand(String),

	/// The registry knows the command but holds no argument shape for it.
	#[error("unable to locate command arguments handler for command: {0}")]
	MissingArgumentShape(String),

	#[error("invalid arguments for command {command}: argument `{field}`: {source}")]
	ArgumentConversion {
		command: String,
		field: String,
		#[source]
		source: ConversionError,
	},

	#[error("invalid arguments for command {command}: {message}")]
	ArgumentValidation { command: String, message: String },

	#[error(transparent)]
	Assertion(#[from] AssertionError),

	#[error("an error occurred while executing the specified commands")]
	Execution {
		#[source]
		source: anyhow::Error,
	},
}

impl Error {
	pub fn conversion(command: &str, err: BindError) -> Self {
		Error::ArgumentConversion {
			command: command.to_string(),
			field: err.field,
			source: err.source,
		}
	}

	pub fn validation(command: &str, message: impl Into<String>) -> Self {
		Error::ArgumentValidation {
			command: command.to_string(),
			message: message.into(),
		}
	}

	/// Stable machine-readable code for structured output.
	pub fn code(&self) -> &'static str {
		match self {
			Error::UnknownCommand(_) => "UNKNOWN_COMMAND",
			Error::MissingArgumentShape(_) => "MISSING_ARGUMENT_SHAPE",
			Error::ArgumentConversion { .. } => "INVALID_ARGUMENT",
			Error::ArgumentValidation { .. } => "ARGUMENT_VALIDATION",
			Error::Assertion(_) => "ASSERTION_FAILED",
			Error::Execution { .. } => "EXECUTION_FAILED",
		}
	}

	/// Whether this error is an argument or registry error rather than a
	/// failure raised while driving the session.
	pub fn is_argument_error(&self) -> bool {
		matches!(
			self,
			Error::UnknownCommand(_)
				| Error::MissingArgumentShape(_)
				| Error::ArgumentConversion { .. }
				| Error::ArgumentValidation { .. }
		)
	}
}

impl From<SessionError> for Error {
	fn from(err: SessionError) -> Self {
		match err {
			SessionError::Assertion(assertion) => Error::Assertion(assertion),
			SessionError::Driver(source) => Error::Execution { source },
		}
	}
}

#[cfg(test)]
mod tests {
	use std::error::Error as _;

	use super::*;

	#[test]
	fn assertion_passes_through_unchanged() {
		let err: Error = SessionError::Assertion(AssertionError::new("expected 3 rows, found 2")).into();
		match &err {
			Error::Assertion(inner) => assert_eq!(inner.message, "expected 3 rows, found 2"),
			other => panic!("unexpected error: {other:?}"),
		}
		assert_eq!(err.to_string(), "assertion failed: expected 3 rows, found 2");
		assert_eq!(err.code(), "ASSERTION_FAILED");
	}

	#[test]
	fn driver_failure_is_wrapped_with_cause() {
		let err: Error = SessionError::Driver(anyhow::anyhow!("browser crashed")).into();
		assert_eq!(err.to_string(), "an error occurred while executing the specified commands");
		assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("browser crashed"));
		assert!(!err.is_argument_error());
	}

	#[test]
	fn conversion_error_names_command_and_field() {
		let err = Error::conversion(
			"Click",
			BindError {
				field: "point".into(),
				source: ConversionError::ExpectedText { found: "number" },
			},
		);
		assert_eq!(err.to_string(), "invalid arguments for command Click: argument `point`: expected a string, found number");
		assert_eq!(err.code(), "INVALID_ARGUMENT");
		assert!(err.is_argument_error());
	}
}
