use std::fmt;

use crate::shape::Scalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
	Not,
	Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
	Or,
	And,
	Eq,
	Ne,
	Lt,
	Le,
	Gt,
	Ge,
	Add,
	Sub,
	Mul,
	Div,
	Rem,
}

impl BinaryOp {
	pub fn symbol(self) -> &'static str {
		match self {
			BinaryOp::Or => "||",
			BinaryOp::And => "&&",
			BinaryOp::Eq => "==",
			BinaryOp::Ne => "!=",
			BinaryOp::Lt => "<",
			BinaryOp::Le => "<=",
			BinaryOp::Gt => ">",
			BinaryOp::Ge => ">=",
			BinaryOp::Add => "+",
			BinaryOp::Sub => "-",
			BinaryOp::Mul => "*",
			BinaryOp::Div => "/",
			BinaryOp::Rem => "%",
		}
	}
}

impl fmt::Display for BinaryOp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.symbol())
	}
}

/// Members callable on a value inside a predicate body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
	Length,
	Contains,
	StartsWith,
	EndsWith,
	Equals,
	IndexOf,
	ToLower,
	ToUpper,
	Trim,
	ToString,
}

impl Method {
	/// Resolves a member name, ignoring ASCII case.
	pub fn lookup(name: &str) -> Option<Self> {
		const ALL: &[(&str, Method)] = &[
			("Length", Method::Length),
			("Contains", Method::Contains),
			("StartsWith", Method::StartsWith),
			("EndsWith", Method::EndsWith),
			("Equals", Method::Equals),
			("IndexOf", Method::IndexOf),
			("ToLower", Method::ToLower),
			("ToUpper", Method::ToUpper),
			("Trim", Method::Trim),
			("ToString", Method::ToString),
		];
		ALL.iter().find(|(candidate, _)| candidate.eq_ignore_ascii_case(name)).map(|(_, method)| *method)
	}

	/// Whether the member is read as a property (`x.Length`) rather than called.
	pub fn is_property(self) -> bool {
		matches!(self, Method::Length)
	}
}

/// Expression tree of a predicate body.
///
/// The parser produces `Ident`, `Member` and `Call` nodes; name resolution
/// rewrites them to `Param` and `Method` before the tree is stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	Literal(Scalar),
	Ident {
		name: String,
		pos: usize,
	},
	Param(usize),
	Unary {
		op: UnaryOp,
		operand: Box<Expr>,
		pos: usize,
	},
	Binary {
		op: BinaryOp,
		lhs: Box<Expr>,
		rhs: Box<Expr>,
		pos: usize,
	},
	Member {
		target: Box<Expr>,
		name: String,
		pos: usize,
	},
	Call {
		target: Box<Expr>,
		name: String,
		args: Vec<Expr>,
		pos: usize,
	},
	Method {
		target: Box<Expr>,
		method: Method,
		args: Vec<Expr>,
	},
}

impl Expr {
	/// Height of the tree; a leaf is 1.
	pub fn depth(&self) -> usize {
		match self {
			Expr::Literal(_) | Expr::Ident { .. } | Expr::Param(_) => 1,
			Expr::Unary { operand, .. } => 1 + operand.depth(),
			Expr::Binary { lhs, rhs, .. } => 1 + lhs.depth().max(rhs.depth()),
			Expr::Member { target, .. } => 1 + target.depth(),
			Expr::Call { target, args, .. } | Expr::Method { target, args, .. } => {
				1 + args.iter().map(Expr::depth).fold(target.depth(), usize::max)
			}
		}
	}
}
