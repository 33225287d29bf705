//! Command descriptors as they arrive from a transport.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped argument value as produced by the JSON decoder.
pub type RawValue = Value;

/// One unit of batch input: a command name plus its untyped arguments.
///
/// # Wire Format
///
/// ```json
/// {"name": "Click", "arguments": {"selector": "#go"}}
/// {"command": "Use", "args": {"browserType": ["Chrome", "Firefox"]}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDescriptor {
	/// Command name, matched against the registry.
	#[serde(alias = "command")]
	pub name: String,

	/// Argument name to raw value. Missing means no arguments.
	#[serde(default, alias = "args")]
	pub arguments: Map<String, RawValue>,
}

impl CommandDescriptor {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			arguments: Map::new(),
		}
	}

	/// Adds one argument, replacing any previous value under the same key.
	pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
		self.arguments.insert(key.into(), value.into());
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn descriptor_accepts_canonical_keys() {
		let desc: CommandDescriptor = serde_json::from_value(json!({
			"name": "Navigate",
			"arguments": { "url": "http://x" }
		}))
		.unwrap();

		assert_eq!(desc.name, "Navigate");
		assert_eq!(desc.arguments.get("url"), Some(&json!("http://x")));
	}

	#[test]
	fn descriptor_accepts_short_aliases() {
		let desc: CommandDescriptor = serde_json::from_value(json!({
			"command": "Use",
			"args": { "browserType": ["Chrome"] }
		}))
		.unwrap();

		assert_eq!(desc.name, "Use");
		assert_eq!(desc.arguments.len(), 1);
	}

	#[test]
	fn descriptor_without_arguments_is_empty() {
		let desc: CommandDescriptor = serde_json::from_str(r#"{"name":"Wait"}"#).unwrap();
		assert!(desc.arguments.is_empty());
	}

	#[test]
	fn builder_inserts_arguments() {
		let desc = CommandDescriptor::new("Click").with_argument("selector", "#go").with_argument("point", "1,2");
		assert_eq!(desc.arguments.get("selector"), Some(&json!("#go")));
		assert_eq!(desc.arguments.get("point"), Some(&json!("1,2")));
	}
}
