use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("failed to read {}: {source}", path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to read stdin: {0}")]
	Stdin(#[source] std::io::Error),

	/// An NDJSON line that is not a descriptor. Lines count from 1.
	#[error("invalid descriptor on line {line}: {source}")]
	InvalidLine {
		line: usize,
		#[source]
		source: serde_json::Error,
	},

	#[error("invalid descriptor batch: {0}")]
	InvalidBatch(#[source] serde_json::Error),

	#[error("invalid config {}: {source}", path.display())]
	Config {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error(transparent)]
	Batch(#[from] rc::Error),
}

impl CliError {
	/// Code for the `error.code` field of the output envelope.
	pub fn code(&self) -> &'static str {
		match self {
			CliError::Read { .. } | CliError::Stdin(_) => "IO_ERROR",
			CliError::InvalidLine { .. } | CliError::InvalidBatch(_) => "INVALID_INPUT",
			CliError::Config { .. } => "INVALID_CONFIG",
			CliError::Batch(err) => err.code(),
		}
	}

	/// Message for the envelope. Execution failures carry their driver cause,
	/// which the top-level message leaves out.
	pub fn message(&self) -> String {
		match self {
			CliError::Batch(rc::Error::Execution { source }) => format!("{self}: {source:#}"),
			_ => self.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn batch_errors_keep_their_code() {
		let err = CliError::from(rc::Error::UnknownCommand("Teleport".into()));
		assert_eq!(err.code(), "UNKNOWN_COMMAND");
		assert_eq!(err.message(), "unable to locate available command: Teleport");
	}

	#[test]
	fn execution_message_includes_the_cause() {
		let err = CliError::from(rc::Error::Execution {
			source: anyhow::anyhow!("Chrome crashed"),
		});
		assert_eq!(err.code(), "EXECUTION_FAILED");
		assert_eq!(
			err.message(),
			"an error occurred while executing the specified commands: Chrome crashed"
		);
	}

	#[test]
	fn input_errors_name_the_line() {
		let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let err = CliError::InvalidLine { line: 3, source };
		assert_eq!(err.code(), "INVALID_INPUT");
		assert!(err.message().starts_with("invalid descriptor on line 3: "));
	}
}
