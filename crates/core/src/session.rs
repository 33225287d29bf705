//! The automation session contract and the action vocabulary it records.
//!
//! A session is driven in three phases: [`AutomationSession::record`] puts
//! it in recording mode, each ordinary command queues one [`Action`] through
//! [`AutomationSession::execute`], and [`AutomationSession::run_on`] replays
//! the queue against one browser. [`SessionGuard`] owns the final
//! [`AutomationSession::cleanup`] call.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use rc_protocol::{BrowserType, MouseButton, NavigateDirection, Point, SelectMode, Size, SpecialKey};
use thiserror::Error;
use tracing::{debug, warn};

use crate::predicate::{EvalError, Predicate};
use crate::shape::Scalar;

/// A domain assertion raised by the session while replaying an `Expect`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("assertion failed: {message}")]
pub struct AssertionError {
	pub message: String,
}

impl AssertionError {
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}

/// Errors a session implementation reports back to the orchestrator.
#[derive(Debug, Error)]
pub enum SessionError {
	#[error(transparent)]
	Assertion(#[from] AssertionError),

	/// Anything the driver could not do; wrapped as an execution failure.
	#[error(transparent)]
	Driver(#[from] anyhow::Error),
}

/// Where a pointer or keyboard action lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
	Selector(String),
	Point(Point),
	/// A point relative to the matched element's origin.
	Within { selector: String, offset: Point },
}

impl fmt::Display for Locator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Locator::Selector(selector) => write!(f, "{selector}"),
			Locator::Point(point) => write!(f, "({}, {})", point.x, point.y),
			Locator::Within { selector, offset } => write!(f, "{selector} @ ({}, {})", offset.x, offset.y),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
	Url(String),
	Direction(NavigateDirection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitFor {
	Duration(Duration),
	Element(String),
}

/// An expected value: either a literal or a compiled predicate over the
/// observed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
	Equals(Scalar),
	Satisfies(Predicate),
}

impl Matcher {
	/// Checks an observed value. Integer and float literals compare numerically.
	pub fn matches(&self, actual: &Scalar) -> Result<bool, EvalError> {
		match self {
			Matcher::Equals(expected) => Ok(match (expected.as_f64(), actual.as_f64()) {
				(Some(expected), Some(actual)) => expected == actual,
				_ => expected == actual,
			}),
			Matcher::Satisfies(predicate) => predicate.test(std::slice::from_ref(actual)),
		}
	}
}

impl fmt::Display for Matcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Matcher::Equals(Scalar::Text(text)) => write!(f, "{text:?}"),
			Matcher::Equals(value) => write!(f, "{value}"),
			Matcher::Satisfies(predicate) => write!(f, "{predicate}"),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
	Text { selector: String, matcher: Matcher },
	Value { selector: String, matcher: Matcher },
	Url(Matcher),
	Class { selector: String, class: String },
	Count { selector: String, matcher: Matcher },
}

/// One recorded unit of work. Queued in descriptor order, replayed per target.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
	Navigate(Navigation),
	Click { at: Locator, button: MouseButton },
	DoubleClick(Locator),
	Hover(Locator),
	Focus(String),
	Enter { text: String, selector: Option<String>, quickly: bool },
	Press(Vec<SpecialKey>),
	Select { selector: String, values: Vec<String>, mode: SelectMode },
	Drag { from: Locator, to: Locator },
	Wait(WaitFor),
	Resize(Size),
	Upload { selector: String, file_name: String, offset: Option<Point> },
	TakeScreenshot { file_name: String },
	Expect(Expectation),
}

impl Action {
	pub fn name(&self) -> &'static str {
		match self {
			Action::Navigate(_) => "Navigate",
			Action::Click { .. } => "Click",
			Action::DoubleClick(_) => "DoubleClick",
			Action::Hover(_) => "Hover",
			Action::Focus(_) => "Focus",
			Action::Enter { .. } => "Enter",
			Action::Press(_) => "Press",
			Action::Select { .. } => "Select",
			Action::Drag { .. } => "Drag",
			Action::Wait(_) => "Wait",
			Action::Resize(_) => "Resize",
			Action::Upload { .. } => "Upload",
			Action::TakeScreenshot { .. } => "TakeScreenshot",
			Action::Expect(_) => "Expect",
		}
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.name())?;
		match self {
			Action::Navigate(Navigation::Url(url)) => write!(f, " {url}"),
			Action::Navigate(Navigation::Direction(direction)) => write!(f, " {direction}"),
			Action::Click { at, button } => write!(f, " {at} ({button})"),
			Action::DoubleClick(at) | Action::Hover(at) => write!(f, " {at}"),
			Action::Focus(selector) => write!(f, " {selector}"),
			Action::Enter { text, selector, .. } => match selector {
				Some(selector) => write!(f, " {text:?} into {selector}"),
				None => write!(f, " {text:?}"),
			},
			Action::Press(keys) => {
				for key in keys {
					write!(f, " {key}")?;
				}
				Ok(())
			}
			Action::Select { selector, values, mode } => write!(f, " {values:?} by {mode} in {selector}"),
			Action::Drag { from, to } => write!(f, " {from} -> {to}"),
			Action::Wait(WaitFor::Duration(duration)) => write!(f, " {}ms", duration.as_millis()),
			Action::Wait(WaitFor::Element(selector)) => write!(f, " for {selector}"),
			Action::Resize(size) => write!(f, " {}x{}", size.width, size.height),
			Action::Upload { selector, file_name, .. } => write!(f, " {file_name} to {selector}"),
			Action::TakeScreenshot { file_name } => write!(f, " {file_name}"),
			Action::Expect(Expectation::Text { selector, matcher }) => write!(f, " text of {selector} {matcher}"),
			Action::Expect(Expectation::Value { selector, matcher }) => write!(f, " value of {selector} {matcher}"),
			Action::Expect(Expectation::Url(matcher)) => write!(f, " url {matcher}"),
			Action::Expect(Expectation::Class { selector, class }) => write!(f, " {selector} has class {class}"),
			Action::Expect(Expectation::Count { selector, matcher }) => write!(f, " count of {selector} {matcher}"),
		}
	}
}

/// The collaborator that records and replays actions against a browser.
///
/// Implementations queue actions while recording and replay the whole queue
/// on every [`run_on`](Self::run_on) call; replaying must not consume the
/// queue.
pub trait AutomationSession {
	/// Enables or disables commands that would start a nested batch.
	fn set_remote_execution(&mut self, enabled: bool);

	fn record(&mut self) -> Result<(), SessionError>;

	/// Queues one action. Nothing runs until [`run_on`](Self::run_on).
	fn execute(&mut self, action: Action) -> Result<(), SessionError>;

	/// Replays every queued action against `target`.
	fn run_on(&mut self, target: BrowserType) -> Result<(), SessionError>;

	fn cleanup(&mut self) -> Result<(), SessionError>;
}

/// Scoped session acquisition: cleanup runs exactly once, either through
/// [`finish`](Self::finish) or when the guard drops.
pub struct SessionGuard<'a> {
	session: &'a mut dyn AutomationSession,
	armed: bool,
}

impl<'a> SessionGuard<'a> {
	pub fn new(session: &'a mut dyn AutomationSession) -> Self {
		debug!(target = "rc.session", "session acquired");
		Self { session, armed: true }
	}

	/// Cleans up now and reports the result. Dropping the guard afterwards
	/// does nothing.
	pub fn finish(mut self) -> Result<(), SessionError> {
		self.armed = false;
		let result = self.session.cleanup();
		if result.is_ok() {
			debug!(target = "rc.session", "session cleaned up");
		}
		result
	}
}

impl<'a> Deref for SessionGuard<'a> {
	type Target = dyn AutomationSession + 'a;

	fn deref(&self) -> &Self::Target {
		&*self.session
	}
}

impl DerefMut for SessionGuard<'_> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut *self.session
	}
}

impl Drop for SessionGuard<'_> {
	fn drop(&mut self) {
		if !self.armed {
			return;
		}
		match self.session.cleanup() {
			Ok(()) => debug!(target = "rc.session", "session cleaned up"),
			Err(err) => warn!(target = "rc.session", error = %err, "session cleanup failed"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::shape::{INTEGER_TEST, TEXT_TEST};

	#[derive(Default)]
	struct Counting {
		cleanups: usize,
		fail_cleanup: bool,
	}

	impl AutomationSession for Counting {
		fn set_remote_execution(&mut self, _enabled: bool) {}

		fn record(&mut self) -> Result<(), SessionError> {
			Ok(())
		}

		fn execute(&mut self, _action: Action) -> Result<(), SessionError> {
			Ok(())
		}

		fn run_on(&mut self, _target: BrowserType) -> Result<(), SessionError> {
			Err(anyhow::anyhow!("no browser").into())
		}

		fn cleanup(&mut self) -> Result<(), SessionError> {
			self.cleanups += 1;
			if self.fail_cleanup {
				return Err(anyhow::anyhow!("browser process leaked").into());
			}
			Ok(())
		}
	}

	#[test]
	fn guard_cleans_up_once_on_drop() {
		let mut session = Counting::default();
		{
			let mut guard = SessionGuard::new(&mut session);
			guard.record().unwrap();
			assert!(guard.run_on(BrowserType::Chrome).is_err());
		}
		assert_eq!(session.cleanups, 1);
	}

	#[test]
	fn finish_reports_cleanup_and_disarms_drop() {
		let mut session = Counting::default();
		SessionGuard::new(&mut session).finish().unwrap();
		assert_eq!(session.cleanups, 1);

		let mut session = Counting {
			fail_cleanup: true,
			..Default::default()
		};
		let err = SessionGuard::new(&mut session).finish().unwrap_err();
		assert_eq!(err.to_string(), "browser process leaked");
		assert_eq!(session.cleanups, 1);
	}

	#[test]
	fn failing_cleanup_on_drop_is_not_retried() {
		let mut session = Counting {
			fail_cleanup: true,
			..Default::default()
		};
		drop(SessionGuard::new(&mut session));
		assert_eq!(session.cleanups, 1);
	}

	#[test]
	fn matcher_compares_literals_and_predicates() {
		assert!(Matcher::Equals(Scalar::from("ok")).matches(&Scalar::from("ok")).unwrap());
		assert!(!Matcher::Equals(Scalar::from("ok")).matches(&Scalar::from("OK")).unwrap());
		assert!(Matcher::Equals(Scalar::Integer(3)).matches(&Scalar::Float(3.0)).unwrap());

		let long = Predicate::compile("(x) => x.Length > 3", TEXT_TEST).unwrap();
		assert!(Matcher::Satisfies(long.clone()).matches(&Scalar::from("long")).unwrap());
		assert!(!Matcher::Satisfies(long).matches(&Scalar::from("no")).unwrap());

		let even = Predicate::compile("(n) => n % 2 == 0", INTEGER_TEST).unwrap();
		assert!(Matcher::Satisfies(even).matches(&Scalar::Integer(4)).unwrap());
	}

	#[test]
	fn display_forms() {
		assert_eq!(Locator::Point(Point::new(3, 4)).to_string(), "(3, 4)");
		assert_eq!(
			Locator::Within {
				selector: "#box".into(),
				offset: Point::new(1, 2),
			}
			.to_string(),
			"#box @ (1, 2)"
		);
		assert_eq!(Matcher::Equals(Scalar::from("hi")).to_string(), "\"hi\"");
		assert_eq!(Action::TakeScreenshot { file_name: "a.png".into() }.name(), "TakeScreenshot");
		assert_eq!(
			Action::Click {
				at: Locator::Selector("#go".into()),
				button: MouseButton::Right,
			}
			.to_string(),
			"Click #go (Right)"
		);
		assert_eq!(
			Action::Press(vec![SpecialKey::Tab, SpecialKey::Enter]).to_string(),
			"Press Tab Enter"
		);
		assert_eq!(
			Action::Wait(WaitFor::Duration(Duration::from_millis(250))).to_string(),
			"Wait 250ms"
		);
	}
}
