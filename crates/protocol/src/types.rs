//! Value types shared by commands and sessions.
//!
//! Enums carry their variant names as data (`VARIANTS`, [`name`], `from_name`)
//! so argument binding can parse them without serde.
//!
//! [`name`]: BrowserType::name

use serde::{Deserialize, Serialize};

macro_rules! named_enum {
	(
		$(#[$meta:meta])*
		pub enum $name:ident {
			$(
				$(#[$vmeta:meta])*
				$variant:ident
			),+ $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		pub enum $name {
			$(
				$(#[$vmeta])*
				$variant,
			)+
		}

		impl $name {
			/// Enum name used in diagnostics.
			pub const TYPE_NAME: &'static str = stringify!($name);

			/// Variant names in declaration order.
			pub const VARIANTS: &'static [&'static str] = &[$(stringify!($variant)),+];

			/// Every variant in declaration order.
			pub const ALL: &'static [$name] = &[$($name::$variant),+];

			pub fn name(self) -> &'static str {
				match self {
					$($name::$variant => stringify!($variant),)+
				}
			}

			/// Parses a variant name, ignoring ASCII case.
			pub fn from_name(name: &str) -> Option<Self> {
				Self::ALL.iter().copied().find(|variant| variant.name().eq_ignore_ascii_case(name))
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str(self.name())
			}
		}
	};
}

named_enum! {
	/// Browser a recorded batch is replayed against.
	#[derive(Default)]
	pub enum BrowserType {
		/// Google Chrome (baseline target)
		#[default]
		Chrome,
		/// Mozilla Firefox
		Firefox,
		/// Internet Explorer
		InternetExplorer,
		/// Apple Safari
		Safari,
	}
}

named_enum! {
	/// Mouse button for click actions.
	#[derive(Default)]
	pub enum MouseButton {
		/// Left mouse button (default)
		#[default]
		Left,
		/// Right mouse button
		Right,
		/// Middle mouse button
		Middle,
	}
}

named_enum! {
	/// How a `<select>` option is matched.
	#[derive(Default)]
	pub enum SelectMode {
		/// Visible option text
		#[default]
		Text,
		/// Option `value` attribute
		Value,
		/// Zero-based option index
		Index,
	}
}

named_enum! {
	/// History navigation direction.
	pub enum NavigateDirection {
		Back,
		Forward,
		Refresh,
	}
}

named_enum! {
	/// Keys that cannot be typed as text.
	pub enum SpecialKey {
		Enter,
		Tab,
		Escape,
		Backspace,
		Delete,
		ArrowUp,
		ArrowDown,
		ArrowLeft,
		ArrowRight,
		Home,
		End,
		PageUp,
		PageDown,
	}
}

/// Screen position in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
	pub x: i32,
	pub y: i32,
}

impl Point {
	pub fn new(x: i32, y: i32) -> Self {
		Self { x, y }
	}
}

/// Window or element dimensions in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
	pub width: i32,
	pub height: i32,
}

impl Size {
	pub fn new(width: i32, height: i32) -> Self {
		Self { width, height }
	}
}
