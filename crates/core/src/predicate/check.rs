//! Name resolution and static typing of parsed predicate bodies.

use super::ast::{BinaryOp, Expr, Method, UnaryOp};
use super::{Param, PredicateError};
use crate::shape::Kind;

/// Rewrites identifiers to parameter slots and members to [`Method`]s,
/// returning the resolved tree and its result kind.
pub(crate) fn resolve(expr: Expr, params: &[Param]) -> Result<(Expr, Kind), PredicateError> {
	match expr {
		Expr::Literal(value) => {
			let kind = value.kind();
			Ok((Expr::Literal(value), kind))
		}
		Expr::Ident { name, pos } => match params.iter().position(|param| param.name == name) {
			Some(index) => Ok((Expr::Param(index), params[index].kind)),
			None => Err(PredicateError::UnknownIdentifier { name, pos }),
		},
		Expr::Param(index) => {
			let kind = params.get(index).map(|param| param.kind).ok_or(PredicateError::UnknownIdentifier {
				name: format!("#{index}"),
				pos: 0,
			})?;
			Ok((Expr::Param(index), kind))
		}
		Expr::Unary { op, operand, pos } => {
			let (operand, kind) = resolve(*operand, params)?;
			let ok = match op {
				UnaryOp::Not => kind == Kind::Boolean,
				UnaryOp::Neg => kind.is_numeric(),
			};
			if !ok {
				return Err(PredicateError::OperandType {
					op: match op {
						UnaryOp::Not => "!",
						UnaryOp::Neg => "-",
					},
					found: kind,
					pos,
				});
			}
			Ok((
				Expr::Unary {
					op,
					operand: Box::new(operand),
					pos,
				},
				kind,
			))
		}
		Expr::Binary { op, lhs, rhs, pos } => {
			let (lhs, lhs_kind) = resolve(*lhs, params)?;
			let (rhs, rhs_kind) = resolve(*rhs, params)?;
			let kind = binary_kind(op, lhs_kind, rhs_kind).ok_or(PredicateError::TypeMismatch {
				op: op.symbol(),
				lhs: lhs_kind,
				rhs: rhs_kind,
				pos,
			})?;
			Ok((
				Expr::Binary {
					op,
					lhs: Box::new(lhs),
					rhs: Box::new(rhs),
					pos,
				},
				kind,
			))
		}
		Expr::Member { target, name, pos } => {
			let (target, target_kind) = resolve(*target, params)?;
			let method = Method::lookup(&name)
				.filter(|method| method.is_property())
				.ok_or_else(|| PredicateError::UnknownMember {
					kind: target_kind,
					name: name.clone(),
					pos,
				})?;
			let kind = method_kind(method, target_kind, &[], &name, pos)?;
			Ok((
				Expr::Method {
					target: Box::new(target),
					method,
					args: Vec::new(),
				},
				kind,
			))
		}
		Expr::Call { target, name, args, pos } => {
			let (target, target_kind) = resolve(*target, params)?;
			let method = Method::lookup(&name)
				.filter(|method| !method.is_property())
				.ok_or_else(|| PredicateError::UnknownMember {
					kind: target_kind,
					name: name.clone(),
					pos,
				})?;
			let (args, arg_kinds): (Vec<_>, Vec<_>) = args
				.into_iter()
				.map(|arg| resolve(arg, params))
				.collect::<Result<Vec<_>, _>>()?
				.into_iter()
				.unzip();
			let kind = method_kind(method, target_kind, &arg_kinds, &name, pos)?;
			Ok((
				Expr::Method {
					target: Box::new(target),
					method,
					args,
				},
				kind,
			))
		}
		Expr::Method { target, method, args } => {
			let (target, target_kind) = resolve(*target, params)?;
			let (args, arg_kinds): (Vec<_>, Vec<_>) = args
				.into_iter()
				.map(|arg| resolve(arg, params))
				.collect::<Result<Vec<_>, _>>()?
				.into_iter()
				.unzip();
			let kind = method_kind(method, target_kind, &arg_kinds, &format!("{method:?}"), 0)?;
			Ok((
				Expr::Method {
					target: Box::new(target),
					method,
					args,
				},
				kind,
			))
		}
	}
}

/// Result kind of `lhs op rhs`, or `None` when the operands do not fit.
pub(crate) fn binary_kind(op: BinaryOp, lhs: Kind, rhs: Kind) -> Option<Kind> {
	let numeric = lhs.is_numeric() && rhs.is_numeric();
	let arithmetic = || {
		if lhs == Kind::Integer && rhs == Kind::Integer {
			Kind::Integer
		} else {
			Kind::Float
		}
	};

	match op {
		BinaryOp::Or | BinaryOp::And => (lhs == Kind::Boolean && rhs == Kind::Boolean).then_some(Kind::Boolean),
		BinaryOp::Eq | BinaryOp::Ne => (numeric || lhs == rhs).then_some(Kind::Boolean),
		BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
			(numeric || (lhs == Kind::Text && rhs == Kind::Text)).then_some(Kind::Boolean)
		}
		BinaryOp::Add if lhs == Kind::Text || rhs == Kind::Text => Some(Kind::Text),
		BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => numeric.then(arithmetic),
	}
}

fn method_kind(method: Method, target: Kind, args: &[Kind], name: &str, pos: usize) -> Result<Kind, PredicateError> {
	let (expected_args, result): (&[Kind], Kind) = match method {
		Method::ToString => (&[], Kind::Text),
		_ if target != Kind::Text => {
			return Err(PredicateError::UnknownMember {
				kind: target,
				name: name.to_string(),
				pos,
			});
		}
		Method::Length => (&[], Kind::Integer),
		Method::Contains | Method::StartsWith | Method::EndsWith | Method::Equals => (&[Kind::Text], Kind::Boolean),
		Method::IndexOf => (&[Kind::Text], Kind::Integer),
		Method::ToLower | Method::ToUpper | Method::Trim => (&[], Kind::Text),
	};

	if args != expected_args {
		return Err(PredicateError::MethodArguments {
			name: name.to_string(),
			expected: expected_args.iter().map(|kind| kind.name()).collect::<Vec<_>>().join(", "),
			found: args.iter().map(|kind| kind.name()).collect::<Vec<_>>().join(", "),
			pos,
		});
	}
	Ok(result)
}
