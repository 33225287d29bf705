//! `Expect`: queues one assertion, checked when the batch replays.
//!
//! Exactly one check may be given. Text, value and URL checks take either a
//! literal (`text`) or a `(string) => bool` predicate (`textWhere`); count
//! checks take an integer or an `(int) => bool` predicate.

use super::{CommandDef, QueueCommand, required};
use crate::error::{Error, Result};
use crate::predicate::Predicate;
use crate::session::{Action, AutomationSession, Expectation, Matcher};
use crate::shape::{INTEGER_TEST, Scalar, TypeTag};

crate::command_arguments! {
	pub struct ExpectArguments {
		pub selector: Option<String> = "selector",
		pub text: Option<String> = "text",
		pub text_where: Option<Predicate> = "textWhere",
		pub value: Option<String> = "value",
		pub value_where: Option<Predicate> = "valueWhere",
		pub url: Option<String> = "url",
		pub url_where: Option<Predicate> = "urlWhere",
		pub class: Option<String> = "class",
		pub count: Option<i32> = "count",
		pub count_where: Option<Predicate> = "countWhere" as TypeTag::Predicate(INTEGER_TEST),
	}
}

pub struct ExpectCommand;

impl CommandDef for ExpectCommand {
	const NAME: &'static str = "Expect";
	const ALIASES: &'static [&'static str] = &["Assert"];

	type Args = ExpectArguments;
}

enum Check {
	Text(Matcher),
	Value(Matcher),
	Url(Matcher),
	Class(String),
	Count(Matcher),
}

impl QueueCommand for ExpectCommand {
	fn execute(args: ExpectArguments, session: &mut dyn AutomationSession) -> Result<()> {
		let text = |literal: Option<String>, predicate: Option<Predicate>| {
			literal
				.map(|v| Matcher::Equals(Scalar::Text(v)))
				.into_iter()
				.chain(predicate.map(Matcher::Satisfies))
		};

		let mut checks: Vec<Check> = Vec::new();
		checks.extend(text(args.text, args.text_where).map(Check::Text));
		checks.extend(text(args.value, args.value_where).map(Check::Value));
		checks.extend(text(args.url, args.url_where).map(Check::Url));
		checks.extend(args.class.map(Check::Class));
		checks.extend(args.count.map(|n| Check::Count(Matcher::Equals(Scalar::Integer(n.into())))));
		checks.extend(args.count_where.map(|p| Check::Count(Matcher::Satisfies(p))));

		let [check] = <[Check; 1]>::try_from(checks).map_err(|checks| {
			Error::validation(Self::NAME, format!("expected exactly one check, got {}", checks.len()))
		})?;

		let selector = args.selector;
		let expectation = match check {
			Check::Url(matcher) => Expectation::Url(matcher),
			Check::Text(matcher) => Expectation::Text {
				selector: required(Self::NAME, "selector", selector)?,
				matcher,
			},
			Check::Value(matcher) => Expectation::Value {
				selector: required(Self::NAME, "selector", selector)?,
				matcher,
			},
			Check::Class(class) => Expectation::Class {
				selector: required(Self::NAME, "selector", selector)?,
				class,
			},
			Check::Count(matcher) => Expectation::Count {
				selector: required(Self::NAME, "selector", selector)?,
				matcher,
			},
		};
		session.execute(Action::Expect(expectation))?;
		Ok(())
	}
}
