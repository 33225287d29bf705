//! End-to-end runs of the `rc` binary.

use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::{Value, json};

struct Outcome {
	success: bool,
	envelope: Value,
	stderr: String,
}

fn rc(args: &[&str], stdin: &str) -> Outcome {
	let mut child = Command::new(env!("CARGO_BIN_EXE_rc"))
		.args(args)
		.env_remove("RC_LOG")
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("failed to spawn rc");
	child
		.stdin
		.take()
		.expect("stdin is piped")
		.write_all(stdin.as_bytes())
		.expect("failed to write stdin");
	let output = child.wait_with_output().expect("failed to wait for rc");

	let stdout = String::from_utf8_lossy(&output.stdout).to_string();
	let stderr = String::from_utf8_lossy(&output.stderr).to_string();
	assert_eq!(stdout.lines().count(), 1, "expected one envelope line, got: {stdout}");
	let envelope = serde_json::from_str(&stdout).unwrap_or_else(|_| json!({ "raw": stdout }));
	Outcome {
		success: output.status.success(),
		envelope,
		stderr,
	}
}

#[test]
fn ndjson_batch_from_stdin() {
	let batch = concat!(
		r#"{"name":"Navigate","arguments":{"url":"http://example.test"}}"#,
		"\n\n",
		r#"{"name":"Use","arguments":{"browserType":["Chrome","Firefox"]}}"#,
		"\n",
		r##"{"command":"Click","args":{"selector":"#submit"}}"##,
		"\n",
	);

	let out = rc(&["run"], batch);

	assert!(out.success, "rc run failed: {}", out.stderr);
	assert_eq!(
		out.envelope,
		json!({ "ok": true, "queued": 2, "targets": ["Chrome", "Firefox"] })
	);
}

#[test]
fn json_array_from_file_with_default_target() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("batch.json");
	std::fs::write(
		&path,
		r#"[
			{"name": "Navigate", "arguments": {"url": "http://example.test"}},
			{"name": "Expect", "arguments": {"selector": "li", "countWhere": "(n) => n >= 3"}}
		]"#,
	)
	.unwrap();

	let out = rc(&["run", path.to_str().unwrap(), "--default-target", "safari"], "");

	assert!(out.success, "rc run failed: {}", out.stderr);
	assert_eq!(out.envelope["queued"], 2);
	assert_eq!(out.envelope["targets"], json!(["Safari"]));
}

#[test]
fn unknown_command_fails_with_code() {
	let out = rc(&["run", "-"], r#"{"name":"Teleport"}"#);

	assert!(!out.success);
	assert_eq!(out.envelope["ok"], false);
	assert_eq!(out.envelope["error"]["code"], "UNKNOWN_COMMAND");
	assert_eq!(
		out.envelope["error"]["message"],
		"unable to locate available command: Teleport"
	);
}

#[test]
fn conversion_failure_names_command_and_field() {
	let out = rc(&["run"], r#"{"name":"Click","arguments":{"point":"10"}}"#);

	assert!(!out.success);
	assert_eq!(out.envelope["error"]["code"], "INVALID_ARGUMENT");
	let message = out.envelope["error"]["message"].as_str().unwrap();
	assert!(message.contains("Click"), "{message}");
	assert!(message.contains("`point`"), "{message}");
}

#[test]
fn malformed_input_is_reported_by_line() {
	let out = rc(&["run"], "{\"name\":\"Navigate\"}\nnot json\n");

	assert!(!out.success);
	assert_eq!(out.envelope["error"]["code"], "INVALID_INPUT");
	assert!(
		out.envelope["error"]["message"].as_str().unwrap().contains("line 2"),
		"{}",
		out.envelope
	);
}

#[test]
fn missing_file_is_an_io_error() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("absent.json");

	let out = rc(&["run", path.to_str().unwrap()], "");

	assert!(!out.success);
	assert_eq!(out.envelope["error"]["code"], "IO_ERROR");
}

#[test]
fn empty_batch_replays_on_default_target() {
	let out = rc(&["run"], "");

	assert!(out.success, "rc run failed: {}", out.stderr);
	assert_eq!(out.envelope, json!({ "ok": true, "queued": 0, "targets": ["Chrome"] }));
}

#[test]
fn verbose_run_logs_replayed_actions() {
	let out = rc(
		&["-v", "run"],
		r#"[{"name":"Use","arguments":{"browserType":["Firefox"]}},{"name":"Press","arguments":{"keys":["Tab","Enter"]}}]"#,
	);

	assert!(out.success, "rc run failed: {}", out.stderr);
	assert!(out.stderr.contains("replay"), "{}", out.stderr);
	assert!(out.stderr.contains("Press Tab Enter"), "{}", out.stderr);
	assert!(out.stderr.contains("Firefox"), "{}", out.stderr);
}

#[test]
fn commands_lists_the_registry() {
	let out = rc(&["commands"], "");

	assert!(out.success, "rc commands failed: {}", out.stderr);
	let names: Vec<&str> = out.envelope["commands"]
		.as_array()
		.unwrap()
		.iter()
		.map(|command| command["name"].as_str().unwrap())
		.collect();
	assert_eq!(names.first(), Some(&"Use"));
	for name in ["Navigate", "Click", "Enter", "Expect", "TakeScreenshot", "Wait"] {
		assert!(names.contains(&name), "missing {name} in {names:?}");
	}
}
