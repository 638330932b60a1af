use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::union::layout::{Layout, WORD_SIZE, aggregate_layout, layout_of, struct_layout};
use crate::union::plain::{Plain, reinterpret};
use crate::union::{Complex64, Complex128, HandleKind, Result, TypeDesc, TypeKind, UnionError};

/// Runtime value read from or written to a union field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
	/// Boolean.
	Bool(bool),
	/// 8-bit signed integer.
	I8(i8),
	/// 16-bit signed integer.
	I16(i16),
	/// 32-bit signed integer.
	I32(i32),
	/// 64-bit signed integer.
	I64(i64),
	/// 8-bit unsigned integer.
	U8(u8),
	/// 16-bit unsigned integer.
	U16(u16),
	/// 32-bit unsigned integer.
	U32(u32),
	/// 64-bit unsigned integer.
	U64(u64),
	/// 32-bit float.
	F32(f32),
	/// 64-bit float.
	F64(f64),
	/// Complex of two `f32`.
	C64(Complex64),
	/// Complex of two `f64`.
	C128(Complex128),
	/// Fixed-length array.
	Array(Vec<Value>),
	/// Nested aggregate.
	Struct(StructValue),
	/// Raw descriptor words of a handle kind.
	Handle(HandleValue),
}

/// Aggregate value with field names preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
	/// Aggregate type name, when declared.
	pub type_name: Option<Box<str>>,
	/// Field values in declaration order.
	pub fields: Vec<FieldValue>,
}

/// Named field value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Field identifier.
	pub name: Box<str>,
	/// Field payload.
	pub value: Value,
}

/// Raw descriptor of a handle kind, as machine words.
///
/// Words are opaque: they may hold addresses, lengths, or type descriptors and carry no
/// guarantee of pointing anywhere valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandleValue {
	/// Handle kind the words describe.
	pub kind: HandleKind,
	/// Descriptor words in memory order.
	pub words: Vec<u64>,
}

impl Serialize for StructValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.fields.len()))?;
		for field in &self.fields {
			map.serialize_entry(field.name.as_ref(), &field.value)?;
		}
		map.end()
	}
}

impl Value {
	/// Coarse kind used for structural matching.
	pub fn kind(&self) -> TypeKind {
		match self {
			Self::Bool(_) => TypeKind::Bool,
			Self::I8(_) | Self::I16(_) | Self::I32(_) | Self::I64(_) => TypeKind::Int,
			Self::U8(_) | Self::U16(_) | Self::U32(_) | Self::U64(_) => TypeKind::Int,
			Self::F32(_) | Self::F64(_) => TypeKind::Float,
			Self::C64(_) | Self::C128(_) => TypeKind::Complex,
			Self::Array(_) => TypeKind::Array,
			Self::Struct(_) => TypeKind::Aggregate,
			Self::Handle(item) => item.kind.kind(),
		}
	}

	/// Size and alignment of this value's byte representation.
	pub fn layout(&self) -> Layout {
		match self {
			Self::Bool(_) | Self::I8(_) | Self::U8(_) => layout_of(&TypeDesc::U8),
			Self::I16(_) | Self::U16(_) => layout_of(&TypeDesc::U16),
			Self::I32(_) | Self::U32(_) | Self::F32(_) => layout_of(&TypeDesc::U32),
			Self::I64(_) | Self::U64(_) | Self::F64(_) => layout_of(&TypeDesc::U64),
			Self::C64(_) => layout_of(&TypeDesc::C64),
			Self::C128(_) => layout_of(&TypeDesc::C128),
			Self::Array(items) => items.iter().map(Value::layout).fold(Layout::EMPTY, |acc, item| Layout {
				size: acc.size.saturating_add(item.size),
				align: acc.align.max(item.align),
			}),
			Self::Struct(item) => struct_layout(item.fields.iter().map(|field| field.value.layout())).1,
			Self::Handle(item) => Layout {
				size: WORD_SIZE * item.words.len(),
				align: WORD_SIZE,
			},
		}
	}

	/// Append this value's native-endian bytes, zero-filling struct padding.
	pub fn encode_into(&self, out: &mut Vec<u8>) {
		match self {
			Self::Bool(v) => v.write_plain(out),
			Self::I8(v) => v.write_plain(out),
			Self::I16(v) => v.write_plain(out),
			Self::I32(v) => v.write_plain(out),
			Self::I64(v) => v.write_plain(out),
			Self::U8(v) => v.write_plain(out),
			Self::U16(v) => v.write_plain(out),
			Self::U32(v) => v.write_plain(out),
			Self::U64(v) => v.write_plain(out),
			Self::F32(v) => v.write_plain(out),
			Self::F64(v) => v.write_plain(out),
			Self::C64(v) => v.write_plain(out),
			Self::C128(v) => v.write_plain(out),
			Self::Array(items) => {
				for item in items {
					item.encode_into(out);
				}
			}
			Self::Struct(item) => {
				let start = out.len();
				let (offsets, layout) = struct_layout(item.fields.iter().map(|field| field.value.layout()));
				for (field, offset) in item.fields.iter().zip(offsets) {
					out.resize(start + offset, 0);
					field.value.encode_into(out);
				}
				out.resize(start + layout.size, 0);
			}
			Self::Handle(item) => {
				for word in &item.words {
					word.write_plain(out);
				}
			}
		}
	}

	/// Reinterpret `bytes` as a value of the declared type.
	///
	/// Missing trailing bytes read as zero.
	pub fn decode(ty: &TypeDesc, bytes: &[u8]) -> Self {
		match ty {
			TypeDesc::Bool => Self::Bool(bool::read_plain(bytes)),
			TypeDesc::Int { bits: 8, signed: true } => Self::I8(i8::read_plain(bytes)),
			TypeDesc::Int { bits: 16, signed: true } => Self::I16(i16::read_plain(bytes)),
			TypeDesc::Int { bits: 32, signed: true } => Self::I32(i32::read_plain(bytes)),
			TypeDesc::Int { signed: true, .. } => Self::I64(i64::read_plain(bytes)),
			TypeDesc::Int { bits: 8, signed: false } => Self::U8(u8::read_plain(bytes)),
			TypeDesc::Int { bits: 16, signed: false } => Self::U16(u16::read_plain(bytes)),
			TypeDesc::Int { bits: 32, signed: false } => Self::U32(u32::read_plain(bytes)),
			TypeDesc::Int { signed: false, .. } => Self::U64(u64::read_plain(bytes)),
			TypeDesc::Float { bits: 32 } => Self::F32(f32::read_plain(bytes)),
			TypeDesc::Float { .. } => Self::F64(f64::read_plain(bytes)),
			TypeDesc::Complex { bits: 64 } => Self::C64(Complex64::read_plain(bytes)),
			TypeDesc::Complex { .. } => Self::C128(Complex128::read_plain(bytes)),
			TypeDesc::Array { elem, len } => {
				let size = layout_of(elem).size;
				let items = (0..*len)
					.map(|idx| Self::decode(elem, tail(bytes, idx.saturating_mul(size))))
					.collect();
				Self::Array(items)
			}
			TypeDesc::Aggregate(aggregate) => {
				let (offsets, _) = aggregate_layout(aggregate);
				let fields = aggregate
					.fields
					.iter()
					.zip(offsets)
					.map(|(field, offset)| FieldValue {
						name: field.name.clone().into_boxed_str(),
						value: Self::decode(&field.ty, tail(bytes, offset)),
					})
					.collect();
				Self::Struct(StructValue {
					type_name: aggregate.name.clone().map(String::into_boxed_str),
					fields,
				})
			}
			TypeDesc::Handle { kind, .. } => {
				let words = (0..kind.words()).map(|idx| reinterpret::<u64>(tail(bytes, idx * WORD_SIZE))).collect();
				Self::Handle(HandleValue { kind: *kind, words })
			}
		}
	}

	/// Interpret a JSON literal as a value of the declared type.
	///
	/// Numbers must fit the declared width; complex values are `[re, im]` or
	/// `{"re": .., "im": ..}`; arrays and aggregates recurse (aggregates take an object keyed
	/// by field name, missing fields are zero).
	pub fn from_json(ty: &TypeDesc, json: &serde_json::Value) -> Result<Self> {
		let invalid = |reason: &str| UnionError::InvalidValue {
			expected: ty.to_string(),
			reason: reason.to_owned(),
		};

		match ty {
			TypeDesc::Bool => json.as_bool().map(Self::Bool).ok_or_else(|| invalid("expected true or false")),
			TypeDesc::Int { bits, signed: true } => {
				let raw = json.as_i64().ok_or_else(|| invalid("expected a signed integer"))?;
				let out_of_range = || invalid("integer out of range");
				Ok(match bits {
					8 => Self::I8(i8::try_from(raw).map_err(|_| out_of_range())?),
					16 => Self::I16(i16::try_from(raw).map_err(|_| out_of_range())?),
					32 => Self::I32(i32::try_from(raw).map_err(|_| out_of_range())?),
					_ => Self::I64(raw),
				})
			}
			TypeDesc::Int { bits, signed: false } => {
				let raw = json.as_u64().ok_or_else(|| invalid("expected an unsigned integer"))?;
				let out_of_range = || invalid("integer out of range");
				Ok(match bits {
					8 => Self::U8(u8::try_from(raw).map_err(|_| out_of_range())?),
					16 => Self::U16(u16::try_from(raw).map_err(|_| out_of_range())?),
					32 => Self::U32(u32::try_from(raw).map_err(|_| out_of_range())?),
					_ => Self::U64(raw),
				})
			}
			TypeDesc::Float { bits } => {
				let raw = json.as_f64().ok_or_else(|| invalid("expected a number"))?;
				Ok(if *bits == 32 { Self::F32(raw as f32) } else { Self::F64(raw) })
			}
			TypeDesc::Complex { bits } => {
				let (re, im) = complex_parts(json).ok_or_else(|| invalid("expected [re, im] or {\"re\", \"im\"}"))?;
				Ok(if *bits == 64 {
					Self::C64(Complex64 {
						re: re as f32,
						im: im as f32,
					})
				} else {
					Self::C128(Complex128 { re, im })
				})
			}
			TypeDesc::Array { elem, len } => {
				let items = json.as_array().ok_or_else(|| invalid("expected a list"))?;
				if items.len() != *len {
					return Err(invalid(&format!("expected {len} items, got {}", items.len())));
				}
				let values = items.iter().map(|item| Self::from_json(elem, item)).collect::<Result<Vec<_>>>()?;
				Ok(Self::Array(values))
			}
			TypeDesc::Aggregate(aggregate) => {
				let object = json.as_object().ok_or_else(|| invalid("expected an object"))?;
				if let Some(unknown) = object.keys().find(|key| !aggregate.fields.iter().any(|field| &field.name == *key)) {
					return Err(invalid(&format!("unknown field {unknown}")));
				}
				let mut fields = Vec::with_capacity(aggregate.fields.len());
				for field in &aggregate.fields {
					let value = match object.get(&field.name) {
						Some(item) => Self::from_json(&field.ty, item)?,
						None => Self::decode(&field.ty, &[]),
					};
					fields.push(FieldValue {
						name: field.name.clone().into_boxed_str(),
						value,
					});
				}
				Ok(Self::Struct(StructValue {
					type_name: aggregate.name.clone().map(String::into_boxed_str),
					fields,
				}))
			}
			TypeDesc::Handle { kind, .. } => {
				let items = json.as_array().ok_or_else(|| invalid("expected a list of descriptor words"))?;
				if items.len() != kind.words() {
					return Err(invalid(&format!("expected {} words", kind.words())));
				}
				let words = items
					.iter()
					.map(|item| item.as_u64().ok_or_else(|| invalid("descriptor words must be unsigned integers")))
					.collect::<Result<Vec<_>>>()?;
				Ok(Self::Handle(HandleValue { kind: *kind, words }))
			}
		}
	}
}

fn tail(bytes: &[u8], offset: usize) -> &[u8] {
	bytes.get(offset..).unwrap_or_default()
}

fn complex_parts(json: &serde_json::Value) -> Option<(f64, f64)> {
	match json {
		serde_json::Value::Array(items) if items.len() == 2 => Some((items[0].as_f64()?, items[1].as_f64()?)),
		serde_json::Value::Object(map) => Some((map.get("re")?.as_f64()?, map.get("im")?.as_f64()?)),
		_ => None,
	}
}

macro_rules! impl_from_scalar {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Self::$variant(value)
				}
			}
		)*
	};
}

impl_from_scalar! {
	bool => Bool,
	i8 => I8,
	i16 => I16,
	i32 => I32,
	i64 => I64,
	u8 => U8,
	u16 => U16,
	u32 => U32,
	u64 => U64,
	f32 => F32,
	f64 => F64,
	Complex64 => C64,
	Complex128 => C128,
	StructValue => Struct,
	HandleValue => Handle,
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
	fn from(value: [T; N]) -> Self {
		Self::Array(value.into_iter().map(Into::into).collect())
	}
}
