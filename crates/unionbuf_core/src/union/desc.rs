use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::union::decl::parse_type_expr;
use crate::union::{HandleKind, Result, TypeKind, UnionError};

/// Declared type of a union field or of the union source itself.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDesc {
	/// One-byte boolean.
	Bool,
	/// Fixed-width integer.
	Int {
		/// Width in bits (8, 16, 32, 64).
		bits: u8,
		/// Two's-complement signed when true.
		signed: bool,
	},
	/// IEEE-754 float.
	Float {
		/// Width in bits (32, 64).
		bits: u8,
	},
	/// Complex number stored as two floats.
	Complex {
		/// Total width in bits (64, 128).
		bits: u8,
	},
	/// Fixed-length inline array.
	Array {
		/// Element type.
		elem: Box<TypeDesc>,
		/// Element count.
		len: usize,
	},
	/// Nested record.
	Aggregate(AggregateDesc),
	/// Handle or dynamic-size kind.
	Handle {
		/// Which handle kind.
		kind: HandleKind,
		/// Source expression text, kept for rendering.
		expr: String,
	},
}

impl TypeDesc {
	/// `bool`
	pub const BOOL: Self = Self::Bool;
	/// `i8`
	pub const I8: Self = Self::Int { bits: 8, signed: true };
	/// `i16`
	pub const I16: Self = Self::Int { bits: 16, signed: true };
	/// `i32`
	pub const I32: Self = Self::Int { bits: 32, signed: true };
	/// `i64`
	pub const I64: Self = Self::Int { bits: 64, signed: true };
	/// `u8`
	pub const U8: Self = Self::Int { bits: 8, signed: false };
	/// `u16`
	pub const U16: Self = Self::Int { bits: 16, signed: false };
	/// `u32`
	pub const U32: Self = Self::Int { bits: 32, signed: false };
	/// `u64`
	pub const U64: Self = Self::Int { bits: 64, signed: false };
	/// `f32`
	pub const F32: Self = Self::Float { bits: 32 };
	/// `f64`
	pub const F64: Self = Self::Float { bits: 64 };
	/// `c64`
	pub const C64: Self = Self::Complex { bits: 64 };
	/// `c128`
	pub const C128: Self = Self::Complex { bits: 128 };

	/// Fixed-length array of `elem`.
	pub fn array(elem: TypeDesc, len: usize) -> Self {
		Self::Array { elem: Box::new(elem), len }
	}

	/// Handle kind with a canonical expression label.
	pub fn handle(kind: HandleKind) -> Self {
		let expr = match kind {
			HandleKind::Pointer => "*void",
			HandleKind::Slice => "[]u8",
			HandleKind::String => "string",
			HandleKind::Map => "map",
			HandleKind::Chan => "chan",
			HandleKind::Func => "func()",
			HandleKind::Interface => "interface{}",
		};
		Self::Handle { kind, expr: expr.to_owned() }
	}

	/// Parse a type expression such as `i64`, `[4]f32`, or `*Node`.
	pub fn parse(expr: &str) -> Result<Self> {
		parse_type_expr(expr)
	}

	/// Coarse kind of this type.
	pub fn kind(&self) -> TypeKind {
		match self {
			Self::Bool => TypeKind::Bool,
			Self::Int { .. } => TypeKind::Int,
			Self::Float { .. } => TypeKind::Float,
			Self::Complex { .. } => TypeKind::Complex,
			Self::Array { .. } => TypeKind::Array,
			Self::Aggregate(_) => TypeKind::Aggregate,
			Self::Handle { kind, .. } => kind.kind(),
		}
	}

	/// First handle kind reachable inside this type, with the dotted path leading to it.
	pub(crate) fn find_handle(&self) -> Option<(String, TypeKind)> {
		match self {
			Self::Handle { kind, .. } => Some((String::new(), kind.kind())),
			Self::Array { elem, .. } => elem.find_handle(),
			Self::Aggregate(aggregate) => aggregate.fields.iter().find_map(|field| {
				field.ty.find_handle().map(|(rest, kind)| {
					let path = if rest.is_empty() { field.name.clone() } else { format!("{}.{rest}", field.name) };
					(path, kind)
				})
			}),
			_ => None,
		}
	}
}

impl fmt::Display for TypeDesc {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool => f.write_str("bool"),
			Self::Int { bits, signed: true } => write!(f, "i{bits}"),
			Self::Int { bits, signed: false } => write!(f, "u{bits}"),
			Self::Float { bits } => write!(f, "f{bits}"),
			Self::Complex { bits } => write!(f, "c{bits}"),
			Self::Array { elem, len } => write!(f, "[{len}]{elem}"),
			Self::Aggregate(aggregate) => match &aggregate.name {
				Some(name) => write!(f, "struct {name}"),
				None => {
					f.write_str("struct {")?;
					for (idx, field) in aggregate.fields.iter().enumerate() {
						let sep = if idx == 0 { " " } else { "; " };
						write!(f, "{sep}{} {}", field.name, field.ty)?;
					}
					f.write_str(" }")
				}
			},
			Self::Handle { expr, .. } => f.write_str(expr),
		}
	}
}

/// Aggregate (record) description: named fields in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateDesc {
	/// Optional type name.
	pub name: Option<String>,
	/// Fields in declaration order.
	pub fields: Vec<FieldDesc>,
}

impl AggregateDesc {
	/// Empty named aggregate.
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: Some(name.into()),
			fields: Vec::new(),
		}
	}

	/// Empty anonymous aggregate.
	pub fn anonymous() -> Self {
		Self::default()
	}

	/// Append a field.
	pub fn field(mut self, field: FieldDesc) -> Self {
		self.fields.push(field);
		self
	}

	/// Append a field with visibility derived from its name.
	pub fn with(self, name: impl Into<String>, ty: TypeDesc) -> Self {
		self.field(FieldDesc::new(name, ty))
	}

	/// Label used in diagnostics.
	pub(crate) fn label(&self) -> &str {
		self.name.as_deref().unwrap_or("<anonymous>")
	}
}

impl From<AggregateDesc> for TypeDesc {
	fn from(value: AggregateDesc) -> Self {
		Self::Aggregate(value)
	}
}

/// One declared field of an aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDesc {
	/// Field identifier, matched case-sensitively.
	pub name: String,
	/// Declared type.
	pub ty: TypeDesc,
	/// Whether external code may write this field.
	pub exported: bool,
}

impl FieldDesc {
	/// Field whose visibility follows the upper-case-first naming rule.
	pub fn new(name: impl Into<String>, ty: TypeDesc) -> Self {
		let name = name.into();
		let exported = is_exported_name(&name);
		Self { name, ty, exported }
	}

	/// Override the derived visibility.
	pub fn exported(mut self, exported: bool) -> Self {
		self.exported = exported;
		self
	}
}

/// Names starting with an upper-case letter are exported.
pub fn is_exported_name(name: &str) -> bool {
	name.chars().next().is_some_and(char::is_uppercase)
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAggregate {
	#[serde(default)]
	name: Option<String>,
	fields: Vec<RawField>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
	name: String,
	#[serde(rename = "type")]
	ty: RawType,
	#[serde(default)]
	exported: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawType {
	Expr(String),
	Aggregate(RawAggregate),
}

/// Parse a JSON type description.
///
/// Objects describe aggregates and strings are type expressions. Any other JSON value
/// can never be a union source and fails with [`UnionError::NotAnAggregate`].
pub fn parse_description(text: &str) -> Result<TypeDesc> {
	let value: serde_json::Value = serde_json::from_str(text)?;
	let found = match &value {
		serde_json::Value::Object(_) => {
			let raw: RawAggregate = serde_json::from_value(value)?;
			return Ok(TypeDesc::Aggregate(convert_aggregate(raw)?));
		}
		serde_json::Value::String(expr) => return parse_type_expr(expr),
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "bool",
		serde_json::Value::Number(_) => "number",
		serde_json::Value::Array(_) => "list",
	};
	Err(UnionError::NotAnAggregate { found: found.to_owned() })
}

/// Read and parse a JSON type description from disk.
pub fn read_description(path: impl AsRef<Path>) -> Result<TypeDesc> {
	let text = fs::read_to_string(path)?;
	parse_description(&text)
}

fn convert_aggregate(raw: RawAggregate) -> Result<AggregateDesc> {
	if raw.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
		return Err(UnionError::InvalidDescription {
			reason: "aggregate name must not be empty".to_owned(),
		});
	}
	let mut fields = Vec::with_capacity(raw.fields.len());
	for field in raw.fields {
		let ty = match field.ty {
			RawType::Expr(expr) => parse_type_expr(&expr)?,
			RawType::Aggregate(nested) => TypeDesc::Aggregate(convert_aggregate(nested)?),
		};
		let exported = field.exported.unwrap_or_else(|| is_exported_name(&field.name));
		fields.push(FieldDesc {
			name: field.name,
			ty,
			exported,
		});
	}
	Ok(AggregateDesc { name: raw.name, fields })
}
