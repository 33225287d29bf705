//! Predicate expressions: `(x) => x.Length > 0`.
//!
//! Text is compiled once at bind time (lexed, parsed, names resolved to
//! parameter slots and the body type-checked against a
//! [`PredicateSignature`]) and the resulting tree is evaluated later, as
//! often as needed, against concrete [`Scalar`] arguments.

mod ast;
mod check;
mod eval;
mod lexer;
mod parser;

use std::fmt;

use thiserror::Error;

use self::ast::Expr;
use crate::shape::{Kind, PredicateSignature, Scalar};

/// Failure to compile predicate text. Positions are byte offsets into the
/// body (the text after `=>`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredicateError {
	#[error("expected `(params) => body`, found no `=>`")]
	MissingArrow,

	#[error("invalid parameter name `{name}`")]
	InvalidParameter { name: String },

	#[error("parameter `{name}` is declared twice")]
	DuplicateParameter { name: String },

	#[error("expected {declared} parameter(s), found {found}")]
	ArityMismatch { declared: usize, found: usize },

	#[error("unexpected character `{ch}` at {pos}")]
	UnexpectedChar { ch: char, pos: usize },

	#[error("unterminated string starting at {pos}")]
	UnterminatedString { pos: usize },

	#[error("invalid number `{text}` at {pos}")]
	InvalidNumber { text: String, pos: usize },

	#[error("expression nests too deeply at {pos}")]
	TooDeep { pos: usize },

	#[error("predicate body is empty")]
	EmptyBody,

	#[error("unexpected {found} at {pos}, expected {expected}")]
	UnexpectedToken {
		found: String,
		expected: &'static str,
		pos: usize,
	},

	#[error("unknown identifier `{name}` at {pos}")]
	UnknownIdentifier { name: String, pos: usize },

	#[error("{kind} has no member `{name}` (at {pos})")]
	UnknownMember { kind: Kind, name: String, pos: usize },

	#[error("`{name}` takes ({expected}), got ({found}) at {pos}")]
	MethodArguments {
		name: String,
		expected: String,
		found: String,
		pos: usize,
	},

	#[error("operator `{op}` cannot be applied to {found} at {pos}")]
	OperandType { op: &'static str, found: Kind, pos: usize },

	#[error("operator `{op}` cannot be applied to {lhs} and {rhs} at {pos}")]
	TypeMismatch {
		op: &'static str,
		lhs: Kind,
		rhs: Kind,
		pos: usize,
	},

	#[error("body evaluates to {found}, expected {expected}")]
	ReturnType { expected: Kind, found: Kind },
}

/// Failure while evaluating a compiled predicate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
	#[error("expected {expected} argument(s), got {found}")]
	Arity { expected: usize, found: usize },

	#[error("argument {index} must be {expected}, got {found}")]
	ArgumentKind { index: usize, expected: Kind, found: Kind },

	#[error("division by zero")]
	DivisionByZero,

	#[error("integer overflow in `{op}`")]
	Overflow { op: &'static str },

	#[error("expected a bool result, got {found}")]
	NotBoolean { found: Kind },

	#[error("unresolved name `{name}`")]
	Unresolved { name: String },

	#[error("type mismatch: {context}")]
	TypeMismatch { context: String },
}

/// A named, typed predicate parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
	pub name: String,
	pub kind: Kind,
}

/// A compiled predicate expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
	source: String,
	params: Vec<Param>,
	returns: Kind,
	body: Expr,
}

impl Predicate {
	/// Compiles `"(p1, p2) => body"` against `signature`.
	///
	/// The text is split at the first `=>`. Parameter names bind in order to
	/// the signature's parameter kinds. An integer body satisfies a float
	/// return kind.
	pub fn compile(text: &str, signature: PredicateSignature) -> Result<Self, PredicateError> {
		let (head, body) = text.split_once("=>").ok_or(PredicateError::MissingArrow)?;

		let names: Vec<&str> = head
			.trim_matches(|c: char| c == '(' || c == ')' || c.is_whitespace())
			.split(',')
			.map(str::trim)
			.filter(|name| !name.is_empty())
			.collect();

		let mut params: Vec<Param> = Vec::with_capacity(names.len());
		for name in &names {
			if !is_identifier(name) {
				return Err(PredicateError::InvalidParameter { name: name.to_string() });
			}
			if params.iter().any(|param| param.name == *name) {
				return Err(PredicateError::DuplicateParameter { name: name.to_string() });
			}
			params.push(Param {
				name: name.to_string(),
				kind: Kind::Text,
			});
		}

		if params.len() != signature.params.len() {
			return Err(PredicateError::ArityMismatch {
				declared: signature.params.len(),
				found: params.len(),
			});
		}
		for (param, kind) in params.iter_mut().zip(signature.params) {
			param.kind = *kind;
		}

		let (body, found) = check::resolve(parser::parse(body)?, &params)?;
		if !returns_as(found, signature.returns) {
			return Err(PredicateError::ReturnType {
				expected: signature.returns,
				found,
			});
		}

		Ok(Self {
			source: text.trim().to_string(),
			params,
			returns: signature.returns,
			body,
		})
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn params(&self) -> &[Param] {
		&self.params
	}

	pub fn returns(&self) -> Kind {
		self.returns
	}

	/// Evaluates the body with `args` bound to the parameters in order.
	/// Integer arguments are accepted for float parameters.
	pub fn evaluate(&self, args: &[Scalar]) -> Result<Scalar, EvalError> {
		if args.len() != self.params.len() {
			return Err(EvalError::Arity {
				expected: self.params.len(),
				found: args.len(),
			});
		}

		let mut bound = Vec::with_capacity(args.len());
		for (index, (arg, param)) in args.iter().zip(&self.params).enumerate() {
			match (arg, param.kind) {
				(Scalar::Integer(v), Kind::Float) => bound.push(Scalar::Float(*v as f64)),
				(arg, kind) if arg.kind() == kind => bound.push(arg.clone()),
				(arg, kind) => {
					return Err(EvalError::ArgumentKind {
						index,
						expected: kind,
						found: arg.kind(),
					});
				}
			}
		}

		match eval::eval(&self.body, &bound)? {
			Scalar::Integer(v) if self.returns == Kind::Float => Ok(Scalar::Float(v as f64)),
			value => Ok(value),
		}
	}

	/// Evaluates a boolean predicate.
	pub fn test(&self, args: &[Scalar]) -> Result<bool, EvalError> {
		eval::truth(self.evaluate(args)?)
	}
}

impl fmt::Display for Predicate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.source)
	}
}

fn returns_as(found: Kind, expected: Kind) -> bool {
	found == expected || (found == Kind::Integer && expected == Kind::Float)
}

fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	let starts_well = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_');
	let reserved = ["true", "false", "and", "or", "not"]
		.iter()
		.any(|word| word.eq_ignore_ascii_case(name));
	starts_well && !reserved && chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::shape::{INTEGER_TEST, TEXT_TEST};

	const TWO_TEXTS: PredicateSignature = PredicateSignature {
		params: &[Kind::Text, Kind::Text],
		returns: Kind::Boolean,
	};

	const TO_FLOAT: PredicateSignature = PredicateSignature {
		params: &[Kind::Integer],
		returns: Kind::Float,
	};

	fn text(v: &str) -> Scalar {
		Scalar::Text(v.into())
	}

	#[test]
	fn length_predicate_tests_text() {
		let predicate = Predicate::compile("(x) => x.Length > 0", TEXT_TEST).unwrap();
		assert_eq!(
			predicate.params(),
			&[Param {
				name: "x".into(),
				kind: Kind::Text
			}]
		);
		assert_eq!(predicate.returns(), Kind::Boolean);
		assert_eq!(predicate.source(), "(x) => x.Length > 0");
		assert!(predicate.test(&[text("abc")]).unwrap());
		assert!(!predicate.test(&[text("")]).unwrap());
	}

	#[test]
	fn parameter_lists_tolerate_spacing_and_parentheses() {
		assert!(Predicate::compile("x => x == \"a\"", TEXT_TEST).is_ok());
		assert!(Predicate::compile("( x )=>x == 'a'", TEXT_TEST).is_ok());

		let predicate = Predicate::compile("(a, b) => a.StartsWith(b)", TWO_TEXTS).unwrap();
		assert!(predicate.test(&[text("golang"), text("go")]).unwrap());
		assert!(!predicate.test(&[text("rust"), text("go")]).unwrap());
	}

	#[test]
	fn only_the_first_arrow_splits() {
		let predicate = Predicate::compile("(x) => x == \"=>\"", TEXT_TEST).unwrap();
		assert!(predicate.test(&[text("=>")]).unwrap());
	}

	#[test]
	fn header_errors() {
		assert_eq!(Predicate::compile("x.Length > 0", TEXT_TEST), Err(PredicateError::MissingArrow));
		assert_eq!(
			Predicate::compile("(a, b) => true", TEXT_TEST),
			Err(PredicateError::ArityMismatch { declared: 1, found: 2 })
		);
		assert_eq!(
			Predicate::compile("() => true", TEXT_TEST),
			Err(PredicateError::ArityMismatch { declared: 1, found: 0 })
		);
		assert_eq!(
			Predicate::compile("(1x) => true", TEXT_TEST),
			Err(PredicateError::InvalidParameter { name: "1x".into() })
		);
		assert_eq!(
			Predicate::compile("(a, a) => true", TWO_TEXTS),
			Err(PredicateError::DuplicateParameter { name: "a".into() })
		);
	}

	#[test]
	fn body_must_produce_the_declared_kind() {
		assert_eq!(
			Predicate::compile("(x) => x.Length", TEXT_TEST),
			Err(PredicateError::ReturnType {
				expected: Kind::Boolean,
				found: Kind::Integer,
			})
		);
		assert!(matches!(
			Predicate::compile("(x) => y", TEXT_TEST),
			Err(PredicateError::UnknownIdentifier { .. })
		));
	}

	#[test]
	fn integer_predicates() {
		let predicate = Predicate::compile("(n) => n % 2 == 0 and n >= 4", INTEGER_TEST).unwrap();
		assert!(predicate.test(&[Scalar::Integer(6)]).unwrap());
		assert!(!predicate.test(&[Scalar::Integer(2)]).unwrap());

		let predicate = Predicate::compile("(n) => 10 / n > 1", INTEGER_TEST).unwrap();
		assert_eq!(predicate.test(&[Scalar::Integer(0)]), Err(EvalError::DivisionByZero));
	}

	#[test]
	fn integer_bodies_widen_to_float_returns() {
		let predicate = Predicate::compile("(n) => n * 2", TO_FLOAT).unwrap();
		assert_eq!(predicate.evaluate(&[Scalar::Integer(3)]), Ok(Scalar::Float(6.0)));
		assert_eq!(
			predicate.test(&[Scalar::Integer(3)]),
			Err(EvalError::NotBoolean { found: Kind::Float })
		);
	}

	#[test]
	fn evaluate_checks_arguments() {
		let predicate = Predicate::compile("(x) => x.Contains(\"a\")", TEXT_TEST).unwrap();
		assert_eq!(predicate.test(&[]), Err(EvalError::Arity { expected: 1, found: 0 }));
		assert_eq!(
			predicate.test(&[Scalar::Integer(1)]),
			Err(EvalError::ArgumentKind {
				index: 0,
				expected: Kind::Text,
				found: Kind::Integer,
			})
		);
	}

	#[test]
	fn nesting_is_capped() {
		let deep = format!("(x) => {}x.Length > 0{}", "(".repeat(50_000), ")".repeat(50_000));
		assert!(matches!(
			Predicate::compile(&deep, TEXT_TEST),
			Err(PredicateError::TooDeep { .. })
		));

		let nested = format!("(x) => {}x{} == \"a\"", "(".repeat(100), ")".repeat(100));
		let predicate = Predicate::compile(&nested, TEXT_TEST).unwrap();
		assert!(predicate.test(&[Scalar::from("a")]).unwrap());
	}
}
