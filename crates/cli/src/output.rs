//! Result envelope written to stdout.
//!
//! Every invocation prints exactly one JSON line:
//!
//! ```json
//! {"ok":true,"queued":2,"targets":["Chrome","Firefox"]}
//! {"ok":false,"error":{"code":"UNKNOWN_COMMAND","message":"unable to locate available command: Teleport"}}
//! ```
//!
//! `rc commands` succeeds with a `commands` list in place of the report.

use std::io::Write;

use rc::{BatchReport, CommandRegistry};
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct Envelope {
	pub ok: bool,
	#[serde(flatten)]
	pub report: Option<BatchReport>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub commands: Option<Vec<CommandInfo>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
	pub code: &'static str,
	pub message: String,
}

/// One registered command as listed by `rc commands`.
#[derive(Debug, Serialize)]
pub struct CommandInfo {
	pub name: &'static str,
	pub aliases: &'static [&'static str],
	pub arguments: Vec<ArgumentInfo>,
}

#[derive(Debug, Serialize)]
pub struct ArgumentInfo {
	pub name: &'static str,
	#[serde(rename = "type")]
	pub ty: String,
}

impl Envelope {
	pub fn report(report: BatchReport) -> Self {
		Self {
			ok: true,
			report: Some(report),
			commands: None,
			error: None,
		}
	}

	pub fn commands(registry: &CommandRegistry) -> Self {
		let commands = registry
			.commands()
			.map(|(id, shape)| CommandInfo {
				name: id.name(),
				aliases: id.aliases(),
				arguments: shape
					.map(|shape| {
						shape
							.fields()
							.iter()
							.map(|field| ArgumentInfo {
								name: field.name,
								ty: field.tag.to_string(),
							})
							.collect()
					})
					.unwrap_or_default(),
			})
			.collect();
		Self {
			ok: true,
			report: None,
			commands: Some(commands),
			error: None,
		}
	}

	pub fn failure(err: &CliError) -> Self {
		Self {
			ok: false,
			report: None,
			commands: None,
			error: Some(ErrorBody {
				code: err.code(),
				message: err.message(),
			}),
		}
	}
}

/// Writes `envelope` as one line on stdout.
pub fn print_envelope(envelope: &Envelope) {
	let mut stdout = std::io::stdout().lock();
	match serde_json::to_string(envelope) {
		Ok(line) => {
			let _ = writeln!(stdout, "{line}");
		}
		Err(err) => {
			let _ = writeln!(
				stdout,
				r#"{{"ok":false,"error":{{"code":"INTERNAL_ERROR","message":"failed to serialize output: {err}"}}}}"#
			);
		}
	}
	let _ = stdout.flush();
}

#[cfg(test)]
mod tests {
	use rc_protocol::BrowserType;
	use serde_json::json;

	use super::*;

	#[test]
	fn success_flattens_the_report() {
		let envelope = Envelope::report(BatchReport {
			queued: 2,
			targets: vec![BrowserType::Chrome, BrowserType::Firefox],
		});
		assert_eq!(
			serde_json::to_value(&envelope).unwrap(),
			json!({ "ok": true, "queued": 2, "targets": ["Chrome", "Firefox"] })
		);
	}

	#[test]
	fn failure_carries_code_and_message() {
		let envelope = Envelope::failure(&CliError::from(rc::Error::UnknownCommand("Teleport".into())));
		assert_eq!(
			serde_json::to_value(&envelope).unwrap(),
			json!({
				"ok": false,
				"error": {
					"code": "UNKNOWN_COMMAND",
					"message": "unable to locate available command: Teleport"
				}
			})
		);
	}

	#[test]
	fn commands_list_names_aliases_and_types() {
		let value = serde_json::to_value(Envelope::commands(&CommandRegistry::builtin())).unwrap();
		let commands = value["commands"].as_array().unwrap();
		assert_eq!(commands[0]["name"], "Use");
		assert_eq!(commands[0]["arguments"], json!([{ "name": "browserType", "type": "[BrowserType]" }]));

		let screenshot = commands.iter().find(|command| command["name"] == "TakeScreenshot").unwrap();
		assert_eq!(screenshot["aliases"], json!(["Screenshot"]));
		assert!(commands.iter().all(|command| command["name"] != "Screenshot"));
	}
}
