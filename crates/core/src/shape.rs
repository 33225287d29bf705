//! Argument shapes: the typed schema a command's raw arguments bind into.
//!
//! Each argument struct is declared with [`command_arguments!`], which derives
//! the struct's [`ArgumentShape`] from its field types. Every supported field
//! type implements [`Field`], naming the closed [`TypeTag`] the binder converts
//! raw values with and unpacking the resulting [`BoundValue`].
//!
//! | Rust field type | Tag |
//! |-----------------|-----|
//! | `i32`, `f64`, `bool`, `String` | `Scalar` |
//! | `Option<i32>`, ... | `OptionalScalar` |
//! | `BrowserType`, `MouseButton`, ... | `Enum` |
//! | `Option<BrowserType>`, ... | `OptionalEnum` |
//! | `Option<Point>`, `Option<Size>` | `Geometry` |
//! | `Option<Predicate>` | `Predicate` (defaults to `(string) => bool`) |
//! | `Vec<i32>`, `Vec<BrowserType>`, ... | `Sequence` |
//!
//! [`command_arguments!`]: crate::command_arguments

use std::fmt;

use rc_protocol::{BrowserType, MouseButton, NavigateDirection, Point, SelectMode, Size, SpecialKey};

use crate::binder::{BindError, BoundArguments, BoundValue, ConversionError};
use crate::predicate::Predicate;

/// Scalar kinds an argument or predicate parameter can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	Integer,
	Float,
	Boolean,
	Text,
}

impl Kind {
	pub fn name(self) -> &'static str {
		match self {
			Kind::Integer => "int",
			Kind::Float => "float",
			Kind::Boolean => "bool",
			Kind::Text => "string",
		}
	}

	pub fn is_numeric(self) -> bool {
		matches!(self, Kind::Integer | Kind::Float)
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A typed scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
	Integer(i64),
	Float(f64),
	Boolean(bool),
	Text(String),
}

impl Scalar {
	pub fn kind(&self) -> Kind {
		match self {
			Scalar::Integer(_) => Kind::Integer,
			Scalar::Float(_) => Kind::Float,
			Scalar::Boolean(_) => Kind::Boolean,
			Scalar::Text(_) => Kind::Text,
		}
	}

	/// Numeric value widened to `f64`.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Scalar::Integer(v) => Some(*v as f64),
			Scalar::Float(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Scalar::Boolean(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Scalar::Text(v) => Some(v),
			_ => None,
		}
	}
}

impl fmt::Display for Scalar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Scalar::Integer(v) => write!(f, "{v}"),
			Scalar::Float(v) => write!(f, "{v}"),
			Scalar::Boolean(v) => write!(f, "{v}"),
			Scalar::Text(v) => f.write_str(v),
		}
	}
}

impl From<i64> for Scalar {
	fn from(value: i64) -> Self {
		Scalar::Integer(value)
	}
}

impl From<i32> for Scalar {
	fn from(value: i32) -> Self {
		Scalar::Integer(value.into())
	}
}

impl From<f64> for Scalar {
	fn from(value: f64) -> Self {
		Scalar::Float(value)
	}
}

impl From<bool> for Scalar {
	fn from(value: bool) -> Self {
		Scalar::Boolean(value)
	}
}

impl From<&str> for Scalar {
	fn from(value: &str) -> Self {
		Scalar::Text(value.to_string())
	}
}

impl From<String> for Scalar {
	fn from(value: String) -> Self {
		Scalar::Text(value)
	}
}

/// Static description of an enumeration argument type.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumSpec {
	pub name: &'static str,
	pub variants: &'static [&'static str],
}

impl EnumSpec {
	/// Index of the named variant, ignoring ASCII case.
	pub fn parse(&self, raw: &str) -> Option<usize> {
		self.variants.iter().position(|variant| variant.eq_ignore_ascii_case(raw))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
	Point,
	Size,
}

impl fmt::Display for GeometryKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GeometryKind::Point => f.write_str("Point"),
			GeometryKind::Size => f.write_str("Size"),
		}
	}
}

/// Parameter kinds and return kind of a predicate expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredicateSignature {
	pub params: &'static [Kind],
	pub returns: Kind,
}

impl fmt::Display for PredicateSignature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("(")?;
		for (i, kind) in self.params.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{kind}")?;
		}
		write!(f, ") => {}", self.returns)
	}
}

/// `(string) => bool`, the signature of text expectations.
pub const TEXT_TEST: PredicateSignature = PredicateSignature {
	params: &[Kind::Text],
	returns: Kind::Boolean,
};

/// `(int) => bool`, the signature of count expectations.
pub const INTEGER_TEST: PredicateSignature = PredicateSignature {
	params: &[Kind::Integer],
	returns: Kind::Boolean,
};

/// Element conversion rule of a sequence field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementTag {
	Scalar(Kind),
	Enum(&'static EnumSpec),
}

impl ElementTag {
	pub fn as_tag(self) -> TypeTag {
		match self {
			ElementTag::Scalar(kind) => TypeTag::Scalar(kind),
			ElementTag::Enum(spec) => TypeTag::Enum(spec),
		}
	}
}

/// Closed set of argument field types the binder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
	Scalar(Kind),
	OptionalScalar(Kind),
	Enum(&'static EnumSpec),
	OptionalEnum(&'static EnumSpec),
	Geometry(GeometryKind),
	Predicate(PredicateSignature),
	Sequence(ElementTag),
}

impl fmt::Display for TypeTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TypeTag::Scalar(kind) => write!(f, "{kind}"),
			TypeTag::OptionalScalar(kind) => write!(f, "{kind}?"),
			TypeTag::Enum(spec) => f.write_str(spec.name),
			TypeTag::OptionalEnum(spec) => write!(f, "{}?", spec.name),
			TypeTag::Geometry(kind) => write!(f, "{kind}"),
			TypeTag::Predicate(signature) => write!(f, "{signature}"),
			TypeTag::Sequence(element) => write!(f, "[{}]", element.as_tag()),
		}
	}
}

/// One declared argument field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldShape {
	pub name: &'static str,
	pub tag: TypeTag,
}

impl FieldShape {
	pub const fn new(name: &'static str, tag: TypeTag) -> Self {
		Self { name, tag }
	}
}

/// Ordered field declarations of one command's argument struct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentShape {
	fields: Vec<FieldShape>,
}

impl ArgumentShape {
	pub fn new(fields: Vec<FieldShape>) -> Self {
		Self { fields }
	}

	pub fn fields(&self) -> &[FieldShape] {
		&self.fields
	}

	/// Looks up a field by name, ignoring ASCII case.
	pub fn field(&self, name: &str) -> Option<&FieldShape> {
		self.fields.iter().find(|field| field.name.eq_ignore_ascii_case(name))
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

impl fmt::Display for ArgumentShape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("{")?;
		for (i, field) in self.fields.iter().enumerate() {
			if i > 0 {
				f.write_str(",")?;
			}
			write!(f, " {}: {}", field.name, field.tag)?;
		}
		if !self.fields.is_empty() {
			f.write_str(" ")?;
		}
		f.write_str("}")
	}
}

/// A Rust type an argument field can be declared as.
pub trait Field: Sized {
	const TAG: TypeTag;

	/// Unpacks the binder's output for this field.
	fn from_bound(value: BoundValue) -> Result<Self, ConversionError>;
}

/// A typed argument struct with a declared shape.
pub trait Arguments: Sized {
	fn shape() -> ArgumentShape;

	/// Moves bound field values into the struct. Fields absent from `bound`
	/// keep their `Default` value.
	fn from_bound(bound: BoundArguments) -> Result<Self, BindError>;
}

fn mismatch<T>(tag: TypeTag) -> Result<T, ConversionError> {
	Err(ConversionError::ShapeMismatch { expected: tag.to_string() })
}

macro_rules! scalar_fields {
	($($ty:ty => $kind:ident, |$scalar:ident| $extract:expr;)+) => {
		$(
			impl Field for $ty {
				const TAG: TypeTag = TypeTag::Scalar(Kind::$kind);

				fn from_bound(value: BoundValue) -> Result<Self, ConversionError> {
					match value {
						BoundValue::Scalar($scalar) => match $extract {
							Some(v) => Ok(v),
							None => mismatch(Self::TAG),
						},
						_ => mismatch(Self::TAG),
					}
				}
			}

			impl Field for Option<$ty> {
				const TAG: TypeTag = TypeTag::OptionalScalar(Kind::$kind);

				fn from_bound(value: BoundValue) -> Result<Self, ConversionError> {
					match value {
						BoundValue::Null => Ok(None),
						other => <$ty as Field>::from_bound(other).map(Some),
					}
				}
			}

			impl Field for Vec<$ty> {
				const TAG: TypeTag = TypeTag::Sequence(ElementTag::Scalar(Kind::$kind));

				fn from_bound(value: BoundValue) -> Result<Self, ConversionError> {
					match value {
						BoundValue::List(items) => items.into_iter().map(<$ty as Field>::from_bound).collect(),
						_ => mismatch(Self::TAG),
					}
				}
			}
		)+
	};
}

scalar_fields! {
	i32 => Integer, |scalar| match scalar {
		Scalar::Integer(v) => i32::try_from(v).ok(),
		_ => None,
	};
	f64 => Float, |scalar| scalar.as_f64();
	bool => Boolean, |scalar| scalar.as_bool();
	String => Text, |scalar| match scalar {
		Scalar::Text(v) => Some(v),
		_ => None,
	};
}

macro_rules! enum_fields {
	($($ty:ident => $spec:ident),+ $(,)?) => {
		$(
			#[doc = concat!("Variants of [`", stringify!($ty), "`].")]
			pub const $spec: EnumSpec = EnumSpec {
				name: $ty::TYPE_NAME,
				variants: $ty::VARIANTS,
			};

			impl Field for $ty {
				const TAG: TypeTag = TypeTag::Enum(&$spec);

				fn from_bound(value: BoundValue) -> Result<Self, ConversionError> {
					match value {
						BoundValue::Enum { spec, index } if spec.name == $spec.name => match $ty::ALL.get(index) {
							Some(variant) => Ok(*variant),
							None => mismatch(Self::TAG),
						},
						_ => mismatch(Self::TAG),
					}
				}
			}

			impl Field for Option<$ty> {
				const TAG: TypeTag = TypeTag::OptionalEnum(&$spec);

				fn from_bound(value: BoundValue) -> Result<Self, ConversionError> {
					match value {
						BoundValue::Null => Ok(None),
						other => <$ty as Field>::from_bound(other).map(Some),
					}
				}
			}

			impl Field for Vec<$ty> {
				const TAG: TypeTag = TypeTag::Sequence(ElementTag::Enum(&$spec));

				fn from_bound(value: BoundValue) -> Result<Self, ConversionError> {
					match value {
						BoundValue::List(items) => items.into_iter().map(<$ty as Field>::from_bound).collect(),
						_ => mismatch(Self::TAG),
					}
				}
			}
		)+
	};
}

enum_fields! {
	BrowserType => BROWSER_TYPE,
	MouseButton => MOUSE_BUTTON,
	SelectMode => SELECT_MODE,
	NavigateDirection => NAVIGATE_DIRECTION,
	SpecialKey => SPECIAL_KEY,
}

impl Field for Option<Point> {
	const TAG: TypeTag = TypeTag::Geometry(GeometryKind::Point);

	fn from_bound(value: BoundValue) -> Result<Self, ConversionError> {
		match value {
			BoundValue::Null => Ok(None),
			BoundValue::Point(point) => Ok(Some(point)),
			_ => mismatch(Self::TAG),
		}
	}
}

impl Field for Option<Size> {
	const TAG: TypeTag = TypeTag::Geometry(GeometryKind::Size);

	fn from_bound(value: BoundValue) -> Result<Self, ConversionError> {
		match value {
			BoundValue::Null => Ok(None),
			BoundValue::Size(size) => Ok(Some(size)),
			_ => mismatch(Self::TAG),
		}
	}
}

impl Field for Option<Predicate> {
	const TAG: TypeTag = TypeTag::Predicate(TEXT_TEST);

	fn from_bound(value: BoundValue) -> Result<Self, ConversionError> {
		match value {
			BoundValue::Null => Ok(None),
			BoundValue::Predicate(predicate) => Ok(Some(predicate)),
			_ => mismatch(Self::TAG),
		}
	}
}

/// Declares an argument struct together with its [`Arguments`] impl.
///
/// Each field names its wire key; lookup of that key in the raw arguments is
/// case-insensitive. A field may override the tag derived from its type with
/// `as <TypeTag>`, which is how predicate fields pick a signature other than
/// `(string) => bool`.
///
/// ```ignore
/// command_arguments! {
/// 	pub struct ExpectArguments {
/// 		pub selector: Option<String> = "selector",
/// 		pub count_where: Option<Predicate> = "countWhere" as TypeTag::Predicate(INTEGER_TEST),
/// 	}
/// }
/// ```
#[macro_export]
macro_rules! command_arguments {
	(
		$(#[$meta:meta])*
		$vis:vis struct $name:ident {
			$(
				$(#[$fmeta:meta])*
				$fvis:vis $field:ident : $ty:ty = $wire:literal $(as $tag:expr)?
			),* $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Default, PartialEq)]
		$vis struct $name {
			$(
				$(#[$fmeta])*
				$fvis $field: $ty,
			)*
		}

		impl $crate::shape::Arguments for $name {
			fn shape() -> $crate::shape::ArgumentShape {
				$crate::shape::ArgumentShape::new(vec![
					$($crate::shape::FieldShape::new($wire, $crate::__field_tag!($ty $(, $tag)?)),)*
				])
			}

			#[allow(unused_mut, unused_variables)]
			fn from_bound(
				mut bound: $crate::binder::BoundArguments,
			) -> ::std::result::Result<Self, $crate::binder::BindError> {
				Ok(Self {
					$($field: bound.take::<$ty>($wire)?,)*
				})
			}
		}
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_tag {
	($ty:ty) => {
		<$ty as $crate::shape::Field>::TAG
	};
	($ty:ty, $tag:expr) => {
		$tag
	};
}
