//! Type-directed conversion of untyped arguments.
//!
//! [`bind`] walks a command's [`ArgumentShape`] and converts the matching raw
//! JSON value of every declared field with [`convert`]. The result is a bag of
//! [`BoundValue`]s keyed by field name, which the argument struct's
//! [`Arguments::from_bound`] then moves into its typed fields.
//!
//! [`Arguments::from_bound`]: crate::shape::Arguments::from_bound

use std::collections::HashMap;

use rc_protocol::{Point, RawValue, Size};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, trace};

use crate::predicate::{Predicate, PredicateError};
use crate::shape::{ArgumentShape, EnumSpec, Field, GeometryKind, Kind, Scalar, TypeTag};

/// Failure to convert one raw value to its declared type.
#[derive(Debug, Error)]
pub enum ConversionError {
	#[error("cannot convert {found} `{value}` to {kind}")]
	InvalidScalar {
		kind: Kind,
		found: &'static str,
		value: String,
	},

	#[error("null is not a valid {expected}")]
	UnexpectedNull { expected: String },

	#[error("`{value}` is not a valid {enum_name} (expected one of: {})", .variants.join(", "))]
	UnknownVariant {
		enum_name: &'static str,
		value: String,
		variants: &'static [&'static str],
	},

	#[error("malformed {kind} `{value}`: {reason}")]
	MalformedGeometry {
		kind: GeometryKind,
		value: String,
		reason: String,
	},

	#[error("expected a string, found {found}")]
	ExpectedText { found: &'static str },

	#[error("expected a list, found {found}")]
	ExpectedList { found: &'static str },

	#[error("element {index}: {source}")]
	Element {
		index: usize,
		#[source]
		source: Box<ConversionError>,
	},

	#[error(transparent)]
	Predicate(#[from] PredicateError),

	/// The bound value does not fit the Rust field type; the shape and the
	/// argument struct disagree.
	#[error("bound value does not match field type {expected}")]
	ShapeMismatch { expected: String },
}

/// Binding failure of one argument field.
#[derive(Debug, Error)]
#[error("argument `{field}`: {source}")]
pub struct BindError {
	pub field: String,
	#[source]
	pub source: ConversionError,
}

/// A converted field value.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
	/// Explicit `null` for an optional field.
	Null,
	Scalar(Scalar),
	Enum { spec: &'static EnumSpec, index: usize },
	Point(Point),
	Size(Size),
	Predicate(Predicate),
	List(Vec<BoundValue>),
}

/// Converted values of one command's arguments, keyed by declared field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
	values: HashMap<&'static str, BoundValue>,
}

impl BoundArguments {
	pub fn insert(&mut self, field: &'static str, value: BoundValue) {
		self.values.insert(field, value);
	}

	pub fn get(&self, field: &str) -> Option<&BoundValue> {
		self.values.get(field)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Removes a field and unpacks it as `T`; absent fields yield `T::default()`.
	pub fn take<T: Field + Default>(&mut self, field: &'static str) -> Result<T, BindError> {
		match self.values.remove(field) {
			Some(value) => T::from_bound(value).map_err(|source| BindError {
				field: field.to_string(),
				source,
			}),
			None => Ok(T::default()),
		}
	}
}

/// Converts raw arguments into bound values according to `shape`.
///
/// Keys are matched case-insensitively; keys the shape does not declare are
/// ignored. Every declared field is attempted, and the first failure in shape
/// order is returned.
pub fn bind(shape: &ArgumentShape, raw: &Map<String, RawValue>) -> Result<BoundArguments, BindError> {
	let mut bound = BoundArguments::default();
	let mut first_error = None;

	for field in shape.fields() {
		let Some(value) = lookup(raw, field.name) else {
			continue;
		};

		match convert(field.tag, value) {
			Ok(converted) => {
				trace!(target = "rc.binder", field = field.name, tag = %field.tag, "bound argument");
				bound.insert(field.name, converted);
			}
			Err(source) => {
				debug!(target = "rc.binder", field = field.name, tag = %field.tag, error = %source, "argument conversion failed");
				if first_error.is_none() {
					first_error = Some(BindError {
						field: field.name.to_string(),
						source,
					});
				}
			}
		}
	}

	for key in raw.keys() {
		if shape.field(key).is_none() {
			debug!(target = "rc.binder", argument = %key, "ignoring undeclared argument");
		}
	}

	match first_error {
		Some(err) => Err(err),
		None => Ok(bound),
	}
}

fn lookup<'a>(raw: &'a Map<String, RawValue>, name: &str) -> Option<&'a RawValue> {
	raw.get(name)
		.or_else(|| raw.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value))
}

/// Converts one raw value according to `tag`.
pub fn convert(tag: TypeTag, value: &Value) -> Result<BoundValue, ConversionError> {
	match tag {
		TypeTag::Scalar(kind) => coerce_scalar(kind, value).map(BoundValue::Scalar),
		TypeTag::OptionalScalar(kind) => match value {
			Value::Null => Ok(BoundValue::Null),
			_ => coerce_scalar(kind, value).map(BoundValue::Scalar),
		},
		TypeTag::Enum(spec) => parse_enum(spec, value),
		TypeTag::OptionalEnum(spec) => match value {
			Value::Null => Ok(BoundValue::Null),
			_ => parse_enum(spec, value),
		},
		TypeTag::Geometry(kind) => match value {
			Value::Null => Ok(BoundValue::Null),
			_ => parse_geometry(kind, value),
		},
		TypeTag::Predicate(signature) => match value {
			Value::Null => Ok(BoundValue::Null),
			_ => {
				let text = expect_text(value)?;
				Ok(BoundValue::Predicate(Predicate::compile(text, signature)?))
			}
		},
		TypeTag::Sequence(element) => {
			let items = value.as_array().ok_or(ConversionError::ExpectedList { found: describe(value) })?;
			items
				.iter()
				.enumerate()
				.map(|(index, item)| {
					convert(element.as_tag(), item).map_err(|source| ConversionError::Element {
						index,
						source: Box::new(source),
					})
				})
				.collect::<Result<Vec<_>, _>>()
				.map(BoundValue::List)
		}
	}
}

/// Coerces a raw value to a scalar of `kind`.
pub fn coerce_scalar(kind: Kind, value: &Value) -> Result<Scalar, ConversionError> {
	let invalid = || ConversionError::InvalidScalar {
		kind,
		found: describe(value),
		value: preview(value),
	};

	match (kind, value) {
		(_, Value::Null) => Err(ConversionError::UnexpectedNull { expected: kind.to_string() }),
		(Kind::Integer, Value::Number(n)) => n
			.as_i64()
			.and_then(|v| i32::try_from(v).ok())
			.map(|v| Scalar::Integer(v.into()))
			.ok_or_else(invalid),
		(Kind::Integer, Value::String(s)) => s.trim().parse::<i32>().map(|v| Scalar::Integer(v.into())).map_err(|_| invalid()),
		(Kind::Integer, Value::Bool(b)) => Ok(Scalar::Integer(i64::from(*b))),
		(Kind::Float, Value::Number(n)) => n.as_f64().map(Scalar::Float).ok_or_else(invalid),
		(Kind::Float, Value::String(s)) => s.trim().parse::<f64>().map(Scalar::Float).map_err(|_| invalid()),
		(Kind::Boolean, Value::Bool(b)) => Ok(Scalar::Boolean(*b)),
		(Kind::Boolean, Value::String(s)) => {
			let s = s.trim();
			if s.eq_ignore_ascii_case("true") {
				Ok(Scalar::Boolean(true))
			} else if s.eq_ignore_ascii_case("false") {
				Ok(Scalar::Boolean(false))
			} else {
				Err(invalid())
			}
		}
		(Kind::Boolean, Value::Number(n)) => n.as_f64().map(|v| Scalar::Boolean(v != 0.0)).ok_or_else(invalid),
		(Kind::Text, Value::String(s)) => Ok(Scalar::Text(s.clone())),
		(Kind::Text, Value::Number(n)) => Ok(Scalar::Text(n.to_string())),
		(Kind::Text, Value::Bool(b)) => Ok(Scalar::Text(b.to_string())),
		_ => Err(invalid()),
	}
}

fn parse_enum(spec: &'static EnumSpec, value: &Value) -> Result<BoundValue, ConversionError> {
	if value.is_null() {
		return Err(ConversionError::UnexpectedNull {
			expected: spec.name.to_string(),
		});
	}
	let text = expect_text(value)?;
	spec.parse(text.trim())
		.map(|index| BoundValue::Enum { spec, index })
		.ok_or_else(|| ConversionError::UnknownVariant {
			enum_name: spec.name,
			value: text.to_string(),
			variants: spec.variants,
		})
}

/// Parses `"X,Y"` / `"W,H"`: split on the first comma, both halves as `i32`.
fn parse_geometry(kind: GeometryKind, value: &Value) -> Result<BoundValue, ConversionError> {
	let text = expect_text(value)?;
	let malformed = |reason: String| ConversionError::MalformedGeometry {
		kind,
		value: text.to_string(),
		reason,
	};

	let (first, second) = text
		.split_once(',')
		.ok_or_else(|| malformed("expected two comma-separated integers".into()))?;
	let first = first
		.trim()
		.parse::<i32>()
		.map_err(|err| malformed(format!("first component: {err}")))?;
	let second = second
		.trim()
		.parse::<i32>()
		.map_err(|err| malformed(format!("second component: {err}")))?;

	Ok(match kind {
		GeometryKind::Point => BoundValue::Point(Point::new(first, second)),
		GeometryKind::Size => BoundValue::Size(Size::new(first, second)),
	})
}

fn expect_text(value: &Value) -> Result<&str, ConversionError> {
	value.as_str().ok_or(ConversionError::ExpectedText { found: describe(value) })
}

fn describe(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

fn preview(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}
