//! Recursive-descent parser for predicate bodies.
//!
//! Precedence, loosest first: `||`, `&&`, equality, relational, additive,
//! multiplicative, unary, postfix (`.Member`, `.Method(args)`).
//!
//! Both parser recursion and the height of the built tree are capped at
//! [`MAX_DEPTH`], so later passes over the tree stay within bounded stack.

use super::PredicateError;
use super::ast::{BinaryOp, Expr, UnaryOp};
use super::lexer::{Spanned, Token, tokenize};
use crate::shape::Scalar;

/// Deepest nesting a predicate body may reach.
pub(crate) const MAX_DEPTH: usize = 128;

pub(crate) fn parse(src: &str) -> Result<Expr, PredicateError> {
	let tokens = tokenize(src)?;
	if tokens.first().is_some_and(|s| s.token == Token::Eof) {
		return Err(PredicateError::EmptyBody);
	}

	let mut parser = Parser {
		tokens,
		index: 0,
		depth: 0,
	};
	let expr = parser.or()?;
	parser.expect(Token::Eof, "operator or end of expression")?;
	Ok(expr)
}

struct Parser {
	tokens: Vec<Spanned>,
	index: usize,
	/// Current count of nested `unary`, parenthesised and argument parses.
	depth: usize,
}

impl Parser {
	fn current(&self) -> &Spanned {
		// tokenize always ends with Eof, and Eof is never consumed past
		&self.tokens[self.index.min(self.tokens.len() - 1)]
	}

	fn advance(&mut self) -> Spanned {
		let spanned = self.current().clone();
		if spanned.token != Token::Eof {
			self.index += 1;
		}
		spanned
	}

	fn eat(&mut self, token: &Token) -> bool {
		if &self.current().token == token {
			self.advance();
			true
		} else {
			false
		}
	}

	fn expect(&mut self, token: Token, expected: &'static str) -> Result<Spanned, PredicateError> {
		if self.current().token == token {
			Ok(self.advance())
		} else {
			Err(self.unexpected(expected))
		}
	}

	fn unexpected(&self, expected: &'static str) -> PredicateError {
		let current = self.current();
		PredicateError::UnexpectedToken {
			found: current.token.describe(),
			expected,
			pos: current.pos,
		}
	}

	/// Runs `parse` one nesting level deeper.
	fn nested(
		&mut self,
		pos: usize,
		parse: impl FnOnce(&mut Self) -> Result<Expr, PredicateError>,
	) -> Result<Expr, PredicateError> {
		if self.depth >= MAX_DEPTH {
			return Err(PredicateError::TooDeep { pos });
		}
		self.depth += 1;
		let result = parse(self);
		self.depth -= 1;
		result
	}

	/// Accepts a freshly built node unless it makes the tree too tall.
	fn node(expr: Expr, pos: usize) -> Result<Expr, PredicateError> {
		if expr.depth() > MAX_DEPTH {
			return Err(PredicateError::TooDeep { pos });
		}
		Ok(expr)
	}

	fn binary_level(
		&mut self,
		next: fn(&mut Self) -> Result<Expr, PredicateError>,
		ops: &[(Token, BinaryOp)],
	) -> Result<Expr, PredicateError> {
		let mut lhs = next(self)?;
		'outer: loop {
			for (token, op) in ops {
				if self.current().token == *token {
					let pos = self.advance().pos;
					let rhs = next(self)?;
					lhs = Self::node(
						Expr::Binary {
							op: *op,
							lhs: Box::new(lhs),
							rhs: Box::new(rhs),
							pos,
						},
						pos,
					)?;
					continue 'outer;
				}
			}
			return Ok(lhs);
		}
	}

	fn or(&mut self) -> Result<Expr, PredicateError> {
		self.binary_level(Self::and, &[(Token::Or, BinaryOp::Or)])
	}

	fn and(&mut self) -> Result<Expr, PredicateError> {
		self.binary_level(Self::equality, &[(Token::And, BinaryOp::And)])
	}

	fn equality(&mut self) -> Result<Expr, PredicateError> {
		self.binary_level(Self::relational, &[(Token::Eq, BinaryOp::Eq), (Token::Ne, BinaryOp::Ne)])
	}

	fn relational(&mut self) -> Result<Expr, PredicateError> {
		self.binary_level(
			Self::additive,
			&[
				(Token::Lt, BinaryOp::Lt),
				(Token::Le, BinaryOp::Le),
				(Token::Gt, BinaryOp::Gt),
				(Token::Ge, BinaryOp::Ge),
			],
		)
	}

	fn additive(&mut self) -> Result<Expr, PredicateError> {
		self.binary_level(Self::multiplicative, &[(Token::Plus, BinaryOp::Add), (Token::Minus, BinaryOp::Sub)])
	}

	fn multiplicative(&mut self) -> Result<Expr, PredicateError> {
		self.binary_level(
			Self::unary,
			&[
				(Token::Star, BinaryOp::Mul),
				(Token::Slash, BinaryOp::Div),
				(Token::Percent, BinaryOp::Rem),
			],
		)
	}

	fn unary(&mut self) -> Result<Expr, PredicateError> {
		let op = match self.current().token {
			Token::Bang => UnaryOp::Not,
			Token::Minus => UnaryOp::Neg,
			_ => return self.postfix(),
		};
		let pos = self.advance().pos;
		let operand = self.nested(pos, Self::unary)?;
		Self::node(
			Expr::Unary {
				op,
				operand: Box::new(operand),
				pos,
			},
			pos,
		)
	}

	fn postfix(&mut self) -> Result<Expr, PredicateError> {
		let mut expr = self.primary()?;
		while self.eat(&Token::Dot) {
			let Spanned {
				token: Token::Ident(name),
				pos,
			} = self.current().clone()
			else {
				return Err(self.unexpected("member name"));
			};
			self.advance();

			if self.eat(&Token::LParen) {
				let mut args = Vec::new();
				if !self.eat(&Token::RParen) {
					loop {
						let arg_pos = self.current().pos;
						args.push(self.nested(arg_pos, Self::or)?);
						if self.eat(&Token::RParen) {
							break;
						}
						self.expect(Token::Comma, "`,` or `)`")?;
					}
				}
				expr = Self::node(
					Expr::Call {
						target: Box::new(expr),
						name,
						args,
						pos,
					},
					pos,
				)?;
			} else {
				expr = Self::node(
					Expr::Member {
						target: Box::new(expr),
						name,
						pos,
					},
					pos,
				)?;
			}
		}
		Ok(expr)
	}

	fn primary(&mut self) -> Result<Expr, PredicateError> {
		let current = self.current().clone();
		let expr = match current.token {
			Token::Integer(v) => Expr::Literal(Scalar::Integer(v)),
			Token::Float(v) => Expr::Literal(Scalar::Float(v)),
			Token::Text(v) => Expr::Literal(Scalar::Text(v)),
			Token::True => Expr::Literal(Scalar::Boolean(true)),
			Token::False => Expr::Literal(Scalar::Boolean(false)),
			Token::Ident(name) => Expr::Ident { name, pos: current.pos },
			Token::LParen => {
				self.advance();
				let inner = self.nested(current.pos, Self::or)?;
				self.expect(Token::RParen, "`)`")?;
				return Ok(inner);
			}
			_ => return Err(self.unexpected("a value")),
		};
		self.advance();
		Ok(expr)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ident(name: &str, pos: usize) -> Expr {
		Expr::Ident { name: name.into(), pos }
	}

	#[test]
	fn multiplication_binds_tighter_than_addition() {
		let expr = parse("a + b * 2").unwrap();
		let Expr::Binary { op: BinaryOp::Add, lhs, rhs, .. } = expr else {
			panic!("expected addition at the root");
		};
		assert_eq!(*lhs, ident("a", 0));
		assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::Mul, .. }));
	}

	#[test]
	fn logical_operators_are_left_associative_and_ordered() {
		let expr = parse("a || b && c").unwrap();
		let Expr::Binary { op: BinaryOp::Or, rhs, .. } = expr else {
			panic!("expected `||` at the root");
		};
		assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::And, .. }));
	}

	#[test]
	fn member_and_method_chains() {
		let expr = parse("x.Trim().Contains(\"go\")").unwrap();
		let Expr::Call { target, name, args, .. } = expr else {
			panic!("expected call");
		};
		assert_eq!(name, "Contains");
		assert_eq!(args, vec![Expr::Literal(Scalar::Text("go".into()))]);
		assert!(matches!(*target, Expr::Call { ref name, .. } if name == "Trim"));

		let expr = parse("x.Length").unwrap();
		assert!(matches!(expr, Expr::Member { ref name, .. } if name == "Length"));
	}

	#[test]
	fn parentheses_override_precedence() {
		let expr = parse("(a + b) * 2").unwrap();
		assert!(matches!(expr, Expr::Binary { op: BinaryOp::Mul, .. }));
	}

	#[test]
	fn unary_operators_nest() {
		let expr = parse("!!flag").unwrap();
		let Expr::Unary { op: UnaryOp::Not, operand, .. } = expr else {
			panic!("expected negation");
		};
		assert!(matches!(*operand, Expr::Unary { op: UnaryOp::Not, .. }));
	}

	#[test]
	fn syntax_errors_carry_positions() {
		assert_eq!(parse("   ").unwrap_err(), PredicateError::EmptyBody);
		assert_eq!(
			parse("a +").unwrap_err(),
			PredicateError::UnexpectedToken {
				found: "end of expression".into(),
				expected: "a value",
				pos: 3,
			}
		);
		assert!(matches!(parse("(a"), Err(PredicateError::UnexpectedToken { expected: "`)`", .. })));
		assert!(matches!(parse("a b"), Err(PredicateError::UnexpectedToken { pos: 2, .. })));
		assert!(matches!(parse("x.5"), Err(PredicateError::UnexpectedToken { expected: "member name", .. })));
	}

	#[test]
	fn deep_nesting_is_rejected_without_recursing_further() {
		let bangs = format!("{}true", "!".repeat(200_000));
		assert!(matches!(parse(&bangs), Err(PredicateError::TooDeep { .. })));

		let parens = format!("{}x{}", "(".repeat(50_000), ")".repeat(50_000));
		assert_eq!(parse(&parens).unwrap_err(), PredicateError::TooDeep { pos: MAX_DEPTH });

		let args = format!("{}x{}", "x.Contains(".repeat(10_000), ")".repeat(10_000));
		assert!(matches!(parse(&args), Err(PredicateError::TooDeep { .. })));
	}

	#[test]
	fn long_chains_are_bounded_by_tree_height() {
		let sum = vec!["1"; 1_000].join(" + ");
		assert!(matches!(parse(&sum), Err(PredicateError::TooDeep { .. })));

		let trims = format!("x{}", ".Trim()".repeat(1_000));
		assert!(matches!(parse(&trims), Err(PredicateError::TooDeep { .. })));
	}

	#[test]
	fn nesting_within_the_limit_parses() {
		let parens = format!("{}x{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
		assert_eq!(parse(&parens).unwrap(), ident("x", MAX_DEPTH));

		let sum = vec!["1"; 100].join(" + ");
		assert_eq!(parse(&sum).unwrap().depth(), 100);
	}
}
