//! Tree-walking evaluation of resolved predicate bodies.

use std::cmp::Ordering;

use super::EvalError;
use super::ast::{BinaryOp, Expr, Method, UnaryOp};
use crate::shape::Scalar;

pub(crate) fn eval(expr: &Expr, args: &[Scalar]) -> Result<Scalar, EvalError> {
	match expr {
		Expr::Literal(value) => Ok(value.clone()),
		Expr::Param(index) => args.get(*index).cloned().ok_or(EvalError::Unresolved {
			name: format!("#{index}"),
		}),
		Expr::Ident { name, .. } | Expr::Member { name, .. } | Expr::Call { name, .. } => {
			Err(EvalError::Unresolved { name: name.clone() })
		}
		Expr::Unary { op, operand, .. } => unary(*op, eval(operand, args)?),
		Expr::Binary { op: BinaryOp::And, lhs, rhs, .. } => {
			if !truth(eval(lhs, args)?)? {
				return Ok(Scalar::Boolean(false));
			}
			Ok(Scalar::Boolean(truth(eval(rhs, args)?)?))
		}
		Expr::Binary { op: BinaryOp::Or, lhs, rhs, .. } => {
			if truth(eval(lhs, args)?)? {
				return Ok(Scalar::Boolean(true));
			}
			Ok(Scalar::Boolean(truth(eval(rhs, args)?)?))
		}
		Expr::Binary { op, lhs, rhs, .. } => binary(*op, eval(lhs, args)?, eval(rhs, args)?),
		Expr::Method { target, method, args: call_args } => {
			let target = eval(target, args)?;
			let call_args = call_args.iter().map(|arg| eval(arg, args)).collect::<Result<Vec<_>, _>>()?;
			method_call(*method, target, &call_args)
		}
	}
}

pub(crate) fn truth(value: Scalar) -> Result<bool, EvalError> {
	match value {
		Scalar::Boolean(v) => Ok(v),
		other => Err(EvalError::NotBoolean { found: other.kind() }),
	}
}

fn unary(op: UnaryOp, value: Scalar) -> Result<Scalar, EvalError> {
	match (op, value) {
		(UnaryOp::Not, Scalar::Boolean(v)) => Ok(Scalar::Boolean(!v)),
		(UnaryOp::Neg, Scalar::Integer(v)) => v.checked_neg().map(Scalar::Integer).ok_or(EvalError::Overflow { op: "-" }),
		(UnaryOp::Neg, Scalar::Float(v)) => Ok(Scalar::Float(-v)),
		(op, value) => Err(EvalError::TypeMismatch {
			context: format!(
				"{}{}",
				match op {
					UnaryOp::Not => "!",
					UnaryOp::Neg => "-",
				},
				value.kind()
			),
		}),
	}
}

fn binary(op: BinaryOp, lhs: Scalar, rhs: Scalar) -> Result<Scalar, EvalError> {
	let mismatch = |lhs: &Scalar, rhs: &Scalar| EvalError::TypeMismatch {
		context: format!("{} {op} {}", lhs.kind(), rhs.kind()),
	};

	match op {
		BinaryOp::Eq => Ok(Scalar::Boolean(equals(&lhs, &rhs))),
		BinaryOp::Ne => Ok(Scalar::Boolean(!equals(&lhs, &rhs))),
		BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
			let ordering = compare(&lhs, &rhs).ok_or_else(|| mismatch(&lhs, &rhs));
			let result = match (ordering, &lhs, &rhs) {
				// NaN compares false against everything
				(Err(_), Scalar::Float(_) | Scalar::Integer(_), Scalar::Float(_) | Scalar::Integer(_)) => false,
				(Err(err), ..) => return Err(err),
				(Ok(ordering), ..) => match op {
					BinaryOp::Lt => ordering == Ordering::Less,
					BinaryOp::Le => ordering != Ordering::Greater,
					BinaryOp::Gt => ordering == Ordering::Greater,
					_ => ordering != Ordering::Less,
				},
			};
			Ok(Scalar::Boolean(result))
		}
		BinaryOp::Add if matches!(lhs, Scalar::Text(_)) || matches!(rhs, Scalar::Text(_)) => {
			Ok(Scalar::Text(format!("{lhs}{rhs}")))
		}
		BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => match (&lhs, &rhs) {
			(Scalar::Integer(a), Scalar::Integer(b)) => integer_arithmetic(op, *a, *b).map(Scalar::Integer),
			_ => {
				let (Some(a), Some(b)) = (lhs.as_f64(), rhs.as_f64()) else {
					return Err(mismatch(&lhs, &rhs));
				};
				Ok(Scalar::Float(match op {
					BinaryOp::Add => a + b,
					BinaryOp::Sub => a - b,
					BinaryOp::Mul => a * b,
					BinaryOp::Div => a / b,
					_ => a % b,
				}))
			}
		},
		BinaryOp::And | BinaryOp::Or => Ok(Scalar::Boolean(truth(lhs)? && truth(rhs)?)),
	}
}

fn integer_arithmetic(op: BinaryOp, a: i64, b: i64) -> Result<i64, EvalError> {
	if matches!(op, BinaryOp::Div | BinaryOp::Rem) && b == 0 {
		return Err(EvalError::DivisionByZero);
	}
	let result = match op {
		BinaryOp::Add => a.checked_add(b),
		BinaryOp::Sub => a.checked_sub(b),
		BinaryOp::Mul => a.checked_mul(b),
		BinaryOp::Div => a.checked_div(b),
		_ => a.checked_rem(b),
	};
	result.ok_or(EvalError::Overflow { op: op.symbol() })
}

/// Equality with integer/float widening; other kinds compare only to themselves.
fn equals(lhs: &Scalar, rhs: &Scalar) -> bool {
	match (lhs, rhs) {
		(Scalar::Integer(a), Scalar::Integer(b)) => a == b,
		(Scalar::Integer(_) | Scalar::Float(_), Scalar::Integer(_) | Scalar::Float(_)) => lhs.as_f64() == rhs.as_f64(),
		_ => lhs == rhs,
	}
}

fn compare(lhs: &Scalar, rhs: &Scalar) -> Option<Ordering> {
	match (lhs, rhs) {
		(Scalar::Integer(a), Scalar::Integer(b)) => Some(a.cmp(b)),
		(Scalar::Text(a), Scalar::Text(b)) => Some(a.cmp(b)),
		_ => lhs.as_f64()?.partial_cmp(&rhs.as_f64()?),
	}
}

fn method_call(method: Method, target: Scalar, args: &[Scalar]) -> Result<Scalar, EvalError> {
	if method == Method::ToString {
		return Ok(Scalar::Text(target.to_string()));
	}

	let Scalar::Text(text) = target else {
		return Err(EvalError::TypeMismatch {
			context: format!("{method:?} on {}", target.kind()),
		});
	};
	let needle = || match args {
		[Scalar::Text(needle)] => Ok(needle.as_str()),
		_ => Err(EvalError::TypeMismatch {
			context: format!("{method:?} arguments"),
		}),
	};

	Ok(match method {
		Method::Length => Scalar::Integer(char_count(&text)),
		Method::Contains => Scalar::Boolean(text.contains(needle()?)),
		Method::StartsWith => Scalar::Boolean(text.starts_with(needle()?)),
		Method::EndsWith => Scalar::Boolean(text.ends_with(needle()?)),
		Method::Equals => Scalar::Boolean(text == needle()?),
		Method::IndexOf => Scalar::Integer(match text.find(needle()?) {
			Some(byte) => char_count(&text[..byte]),
			None => -1,
		}),
		Method::ToLower => Scalar::Text(text.to_lowercase()),
		Method::ToUpper => Scalar::Text(text.to_uppercase()),
		Method::Trim => Scalar::Text(text.trim().to_string()),
		Method::ToString => Scalar::Text(text),
	})
}

fn char_count(text: &str) -> i64 {
	// a str cannot hold more than isize::MAX bytes
	text.chars().count() as i64
}
