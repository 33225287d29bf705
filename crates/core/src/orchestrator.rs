//! Batch execution: bind every descriptor, record the actions, replay them on
//! each target.
//!
//! A batch moves through three states. While *recording*, descriptors are
//! resolved and bound one at a time, in input order; `Use` contributes
//! targets and every other command queues one action. *Finalizing* replays
//! the queue once per target. *Cleaned up* is reached on every exit path,
//! because the session is only touched through a [`SessionGuard`].

use rc_protocol::{BrowserType, CommandDescriptor};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::binder;
use crate::commands::Dispatched;
use crate::error::{Error, Result};
use crate::registry::{CommandRegistry, dispatch};
use crate::session::{AutomationSession, SessionGuard};

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrchestratorConfig {
	/// Replay target when the batch names none.
	pub default_target: BrowserType,
	/// Stop replaying after the first failing target instead of trying the rest.
	pub stop_on_replay_failure: bool,
}

impl Default for OrchestratorConfig {
	fn default() -> Self {
		Self {
			default_target: BrowserType::Chrome,
			stop_on_replay_failure: false,
		}
	}
}

/// What a successful batch did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
	/// Number of actions recorded.
	pub queued: usize,
	/// Targets replayed, in order.
	pub targets: Vec<BrowserType>,
}

#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
	registry: CommandRegistry,
	config: OrchestratorConfig,
}

impl Orchestrator {
	pub fn new(registry: CommandRegistry, config: OrchestratorConfig) -> Self {
		Self { registry, config }
	}

	pub fn with_config(config: OrchestratorConfig) -> Self {
		Self::new(CommandRegistry::builtin(), config)
	}

	pub fn registry(&self) -> &CommandRegistry {
		&self.registry
	}

	pub fn config(&self) -> &OrchestratorConfig {
		&self.config
	}

	/// Runs one batch against `session`.
	///
	/// Resolution, binding and validation errors abort the batch before any
	/// replay. Assertion errors raised during replay pass through unchanged;
	/// other session failures become [`Error::Execution`]. The session is
	/// cleaned up exactly once whatever the outcome. A failing cleanup fails
	/// an otherwise successful batch; after an earlier error it is logged and
	/// the earlier error is returned.
	pub fn execute(&self, session: &mut dyn AutomationSession, descriptors: &[CommandDescriptor]) -> Result<BatchReport> {
		let mut session = SessionGuard::new(session);
		let outcome = self.record_and_replay(&mut *session, descriptors);

		match (outcome, session.finish()) {
			(Ok(report), Ok(())) => Ok(report),
			(Ok(_), Err(cleanup)) => Err(cleanup.into()),
			(Err(err), Ok(())) => Err(err),
			(Err(err), Err(cleanup)) => {
				warn!(target = "rc.orchestrator", error = %cleanup, "session cleanup failed after batch error");
				Err(err)
			}
		}
	}

	fn record_and_replay(
		&self,
		session: &mut dyn AutomationSession,
		descriptors: &[CommandDescriptor],
	) -> Result<BatchReport> {
		session.set_remote_execution(false);
		session.record()?;

		let mut queued = 0;
		let mut targets: Vec<BrowserType> = Vec::new();

		for (index, descriptor) in descriptors.iter().enumerate() {
			let resolved = self.registry.resolve(&descriptor.name)?;
			let bound = binder::bind(resolved.shape, &descriptor.arguments)
				.map_err(|err| Error::conversion(resolved.name(), err))?;

			match dispatch(resolved.id, bound, session)? {
				Dispatched::Queued => {
					queued += 1;
					debug!(target = "rc.orchestrator", index, command = resolved.name(), "queued action");
				}
				Dispatched::Targets(selected) => {
					debug!(target = "rc.orchestrator", index, targets = ?selected, "selected targets");
					targets.extend(selected);
				}
			}
		}

		if targets.is_empty() {
			targets.push(self.config.default_target);
		}

		info!(target = "rc.orchestrator", queued, targets = ?targets, "replaying batch");
		let mut first_failure: Option<Error> = None;
		for target in &targets {
			match session.run_on(*target) {
				Ok(()) => debug!(target = "rc.orchestrator", browser = %target, "replay finished"),
				Err(err) => {
					let err = Error::from(err);
					warn!(target = "rc.orchestrator", browser = %target, error = %err, "replay failed");
					if first_failure.is_none() {
						first_failure = Some(err);
					}
					if self.config.stop_on_replay_failure {
						break;
					}
				}
			}
		}

		match first_failure {
			Some(err) => Err(err),
			None => Ok(BatchReport { queued, targets }),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn config_defaults_and_deserializes_partially() {
		let config: OrchestratorConfig = serde_json::from_str("{}").unwrap();
		assert_eq!(config, OrchestratorConfig::default());
		assert_eq!(config.default_target, BrowserType::Chrome);

		let config: OrchestratorConfig =
			serde_json::from_str(r#"{"defaultTarget":"Firefox","stopOnReplayFailure":true}"#).unwrap();
		assert_eq!(config.default_target, BrowserType::Firefox);
		assert!(config.stop_on_replay_failure);
	}

	#[test]
	fn report_serializes_camel_case() {
		let report = BatchReport {
			queued: 2,
			targets: vec![BrowserType::Chrome],
		};
		assert_eq!(
			serde_json::to_value(&report).unwrap(),
			serde_json::json!({"queued": 2, "targets": ["Chrome"]})
		);
	}
}
