use std::fmt;

use serde::Serialize;

/// Coarse type classifier used for structural compatibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
	/// One-byte boolean.
	Bool,
	/// Signed or unsigned fixed-width integer.
	Int,
	/// IEEE-754 float.
	Float,
	/// Pair of floats (real, imaginary).
	Complex,
	/// Fixed-length inline array.
	Array,
	/// Nested record with named fields.
	Aggregate,
	/// Address of another value.
	Pointer,
	/// Pointer/length/capacity view of a sequence.
	Slice,
	/// Pointer/length text descriptor.
	String,
	/// Associative map handle.
	Map,
	/// Channel or queue handle.
	Chan,
	/// Function reference.
	Func,
	/// Dynamic-type descriptor plus data word.
	Interface,
}

impl TypeKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Float => "float",
			Self::Complex => "complex",
			Self::Array => "array",
			Self::Aggregate => "aggregate",
			Self::Pointer => "pointer",
			Self::Slice => "slice",
			Self::String => "string",
			Self::Map => "map",
			Self::Chan => "chan",
			Self::Func => "func",
			Self::Interface => "interface",
		}
	}
}

impl fmt::Display for TypeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Handle-bearing or dynamic-size kinds whose bytes are descriptors, not payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
	/// `*T`
	Pointer,
	/// `[]T`
	Slice,
	/// `string`
	String,
	/// `map[K]V`
	Map,
	/// `chan T`
	Chan,
	/// `func(...)`
	Func,
	/// `interface{}` / `any`
	Interface,
}

impl HandleKind {
	/// Number of machine words occupied by the descriptor.
	pub fn words(self) -> usize {
		match self {
			Self::Pointer | Self::Map | Self::Chan | Self::Func => 1,
			Self::String | Self::Interface => 2,
			Self::Slice => 3,
		}
	}

	/// Coarse kind of this handle.
	pub fn kind(self) -> TypeKind {
		match self {
			Self::Pointer => TypeKind::Pointer,
			Self::Slice => TypeKind::Slice,
			Self::String => TypeKind::String,
			Self::Map => TypeKind::Map,
			Self::Chan => TypeKind::Chan,
			Self::Func => TypeKind::Func,
			Self::Interface => TypeKind::Interface,
		}
	}
}
