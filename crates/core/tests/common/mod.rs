//! Recording session double shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use rc::session::{Expectation, Locator, Navigation};
use rc::{Action, AssertionError, AutomationSession, Scalar, SessionError};
use rc_protocol::{BrowserType, CommandDescriptor};
use serde_json::Value;

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

pub fn descriptor(name: &str, arguments: Value) -> CommandDescriptor {
	let mut descriptor = CommandDescriptor::new(name);
	if let Value::Object(map) = arguments {
		descriptor.arguments = map;
	}
	descriptor
}

/// Everything the orchestrator did to the session, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
	RemoteExecution(bool),
	Record,
	Queue(Action),
	RunOn(BrowserType),
	Cleanup,
}

#[derive(Debug, Clone, Copy)]
pub enum Failure {
	Driver,
	Assertion,
}

/// A session that keeps an event log and replays `Expect` text checks
/// against a fixed map of selector to element text.
#[derive(Debug, Default)]
pub struct MockSession {
	pub events: Vec<Event>,
	queue: Vec<Action>,
	page_text: HashMap<String, String>,
	failing: HashMap<BrowserType, Failure>,
	fail_record: bool,
	fail_cleanup: bool,
	/// Fails the queue attempt with this zero-based index.
	fail_execute_at: Option<usize>,
}

impl MockSession {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_text(mut self, selector: &str, text: &str) -> Self {
		self.page_text.insert(selector.to_string(), text.to_string());
		self
	}

	pub fn failing_on(mut self, target: BrowserType, failure: Failure) -> Self {
		self.failing.insert(target, failure);
		self
	}

	pub fn failing_record(mut self) -> Self {
		self.fail_record = true;
		self
	}

	pub fn failing_cleanup(mut self) -> Self {
		self.fail_cleanup = true;
		self
	}

	pub fn failing_execute_at(mut self, index: usize) -> Self {
		self.fail_execute_at = Some(index);
		self
	}

	pub fn queued(&self) -> Vec<&Action> {
		self.events
			.iter()
			.filter_map(|event| match event {
				Event::Queue(action) => Some(action),
				_ => None,
			})
			.collect()
	}

	pub fn queued_names(&self) -> Vec<&'static str> {
		self.queued().into_iter().map(Action::name).collect()
	}

	pub fn replayed_on(&self) -> Vec<BrowserType> {
		self.events
			.iter()
			.filter_map(|event| match event {
				Event::RunOn(target) => Some(*target),
				_ => None,
			})
			.collect()
	}

	pub fn cleanups(&self) -> usize {
		self.events.iter().filter(|event| **event == Event::Cleanup).count()
	}

	fn check(&self, expectation: &Expectation) -> Result<(), SessionError> {
		let Expectation::Text { selector, matcher } = expectation else {
			return Ok(());
		};
		let Some(text) = self.page_text.get(selector) else {
			return Err(AssertionError::new(format!("no element matches {selector}")).into());
		};
		let matched = matcher
			.matches(&Scalar::Text(text.clone()))
			.map_err(anyhow::Error::from)?;
		if matched {
			Ok(())
		} else {
			Err(AssertionError::new(format!("text of {selector} was {text:?}, expected {matcher}")).into())
		}
	}
}

impl AutomationSession for MockSession {
	fn set_remote_execution(&mut self, enabled: bool) {
		self.events.push(Event::RemoteExecution(enabled));
	}

	fn record(&mut self) -> Result<(), SessionError> {
		self.events.push(Event::Record);
		if self.fail_record {
			return Err(anyhow::anyhow!("driver unavailable").into());
		}
		Ok(())
	}

	fn execute(&mut self, action: Action) -> Result<(), SessionError> {
		if self.fail_execute_at == Some(self.queue.len()) {
			return Err(anyhow::anyhow!("cannot queue {}", action.name()).into());
		}
		self.events.push(Event::Queue(action.clone()));
		self.queue.push(action);
		Ok(())
	}

	fn run_on(&mut self, target: BrowserType) -> Result<(), SessionError> {
		self.events.push(Event::RunOn(target));
		match self.failing.get(&target) {
			Some(Failure::Driver) => return Err(anyhow::anyhow!("{target} crashed").into()),
			Some(Failure::Assertion) => return Err(AssertionError::new(format!("{target} rejected the page")).into()),
			None => {}
		}
		for action in &self.queue {
			if let Action::Expect(expectation) = action {
				self.check(expectation)?;
			}
		}
		Ok(())
	}

	fn cleanup(&mut self) -> Result<(), SessionError> {
		self.events.push(Event::Cleanup);
		if self.fail_cleanup {
			return Err(anyhow::anyhow!("browser process leaked").into());
		}
		Ok(())
	}
}

pub fn navigate(url: &str) -> Action {
	Action::Navigate(Navigation::Url(url.to_string()))
}

pub fn click(selector: &str) -> Action {
	Action::Click {
		at: Locator::Selector(selector.to_string()),
		button: Default::default(),
	}
}
