//! Descriptor batch input.
//!
//! A batch is either one JSON array of descriptors or NDJSON with one
//! descriptor per line. Blank lines are skipped.

use std::io::Read;
use std::path::Path;

use rc_protocol::CommandDescriptor;
use tracing::debug;

use crate::error::{CliError, Result};

/// Reads a batch from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_batch(path: Option<&Path>) -> Result<Vec<CommandDescriptor>> {
	let text = match path {
		Some(path) if path != Path::new("-") => std::fs::read_to_string(path).map_err(|source| CliError::Read {
			path: path.to_path_buf(),
			source,
		})?,
		_ => {
			let mut text = String::new();
			std::io::stdin().read_to_string(&mut text).map_err(CliError::Stdin)?;
			text
		}
	};
	parse_batch(&text)
}

pub fn parse_batch(text: &str) -> Result<Vec<CommandDescriptor>> {
	if text.trim_start().starts_with('[') {
		let batch: Vec<CommandDescriptor> = serde_json::from_str(text).map_err(CliError::InvalidBatch)?;
		debug!(target = "rc.input", descriptors = batch.len(), "parsed JSON array");
		return Ok(batch);
	}

	let mut batch = Vec::new();
	for (index, line) in text.lines().enumerate() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}
		let descriptor = serde_json::from_str(line).map_err(|source| CliError::InvalidLine {
			line: index + 1,
			source,
		})?;
		batch.push(descriptor);
	}
	debug!(target = "rc.input", descriptors = batch.len(), "parsed NDJSON");
	Ok(batch)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_json_array() {
		let batch = parse_batch(
			r##"
			[
				{"name": "Navigate", "arguments": {"url": "http://example.test"}},
				{"command": "Click", "args": {"selector": "#go"}}
			]"##,
		)
		.unwrap();
		assert_eq!(batch.len(), 2);
		assert_eq!(batch[0].name, "Navigate");
		assert_eq!(batch[1].name, "Click");
	}

	#[test]
	fn parses_ndjson_skipping_blank_lines() {
		let batch = parse_batch("{\"name\":\"Navigate\"}\n\n   \n{\"name\":\"Wait\",\"arguments\":{\"seconds\":1}}\n").unwrap();
		let names: Vec<_> = batch.iter().map(|descriptor| descriptor.name.as_str()).collect();
		assert_eq!(names, ["Navigate", "Wait"]);
	}

	#[test]
	fn empty_input_is_an_empty_batch() {
		assert!(parse_batch("").unwrap().is_empty());
		assert!(parse_batch("[]").unwrap().is_empty());
	}

	#[test]
	fn bad_ndjson_line_is_reported_by_number() {
		let err = parse_batch("{\"name\":\"Navigate\"}\n\n{\"arguments\":{}}\n").unwrap_err();
		assert!(matches!(err, CliError::InvalidLine { line: 3, .. }), "{err:?}");
	}

	#[test]
	fn reads_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("batch.json");
		std::fs::write(&path, r#"[{"name":"Use","arguments":{"browserType":["Safari"]}}]"#).unwrap();
		let batch = read_batch(Some(&path)).unwrap();
		assert_eq!(batch[0].name, "Use");

		let missing = dir.path().join("missing.json");
		assert!(matches!(read_batch(Some(&missing)), Err(CliError::Read { .. })));
	}
}
