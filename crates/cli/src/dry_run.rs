//! A session that drives no browser.
//!
//! Replaying logs every queued action against the target on `rc.session`, so
//! `rc -v run` shows exactly what a real driver would have been asked to do.

use anyhow::anyhow;
use rc::{Action, AutomationSession, SessionError};
use rc_protocol::BrowserType;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct DryRunSession {
	recording: bool,
	remote_execution: bool,
	cleaned_up: bool,
	queue: Vec<Action>,
	replayed_on: Vec<BrowserType>,
}

impl DryRunSession {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn queued(&self) -> &[Action] {
		&self.queue
	}

	pub fn replayed_on(&self) -> &[BrowserType] {
		&self.replayed_on
	}

	pub fn remote_execution(&self) -> bool {
		self.remote_execution
	}

	pub fn is_cleaned_up(&self) -> bool {
		self.cleaned_up
	}
}

impl AutomationSession for DryRunSession {
	fn set_remote_execution(&mut self, enabled: bool) {
		debug!(target = "rc.session", enabled, "remote execution");
		self.remote_execution = enabled;
	}

	fn record(&mut self) -> Result<(), SessionError> {
		if self.cleaned_up {
			return Err(anyhow!("session already cleaned up").into());
		}
		self.recording = true;
		debug!(target = "rc.session", "recording");
		Ok(())
	}

	fn execute(&mut self, action: Action) -> Result<(), SessionError> {
		if !self.recording {
			return Err(anyhow!("cannot queue {} outside recording mode", action.name()).into());
		}
		debug!(target = "rc.session", action = %action, "queued");
		self.queue.push(action);
		Ok(())
	}

	fn run_on(&mut self, target: BrowserType) -> Result<(), SessionError> {
		if self.cleaned_up {
			return Err(anyhow!("session already cleaned up").into());
		}
		// The queue is fixed once replay starts.
		self.recording = false;
		for (step, action) in self.queue.iter().enumerate() {
			info!(target = "rc.session", browser = %target, step = step + 1, action = %action, "replay");
		}
		self.replayed_on.push(target);
		Ok(())
	}

	fn cleanup(&mut self) -> Result<(), SessionError> {
		self.recording = false;
		self.cleaned_up = true;
		debug!(target = "rc.session", queued = self.queue.len(), replays = self.replayed_on.len(), "cleaned up");
		Ok(())
	}
}
