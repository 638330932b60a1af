use std::sync::Arc;

use log::{debug, trace};

use crate::union::layout::layout_of;
use crate::union::{FieldDescriptor, Plain, Result, Schema, TypeDesc, TypeKind, UnionError, Value};

/// Whether writes to unexported fields are refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
	/// Writes to unexported fields fail with [`UnionError::Unsettable`].
	#[default]
	Enforce,
	/// Unexported fields are writable like exported ones.
	Ignore,
}

/// Runtime behavior switches for a [`UnionStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
	/// Unexported-field write policy.
	pub visibility: Visibility,
	/// Zero the buffer tail past each written value.
	pub zero_fill: bool,
}

impl Default for StoreOptions {
	fn default() -> Self {
		Self {
			visibility: Visibility::Enforce,
			zero_fill: true,
		}
	}
}

impl StoreOptions {
	/// Preset allowing writes to unexported fields.
	pub fn permissive() -> Self {
		Self {
			visibility: Visibility::Ignore,
			..Self::default()
		}
	}

	/// Preset leaving the buffer tail untouched on short writes.
	pub fn legacy() -> Self {
		Self {
			zero_fill: false,
			..Self::default()
		}
	}
}

/// Fixed-size byte buffer shared by every field of a schema, each aliased at offset 0.
///
/// The store does not remember which field was written last; reading a different field
/// reinterprets the same bytes as that field's type. `set` takes `&mut self`, so
/// concurrent writers must go through the caller's own synchronization.
#[derive(Debug, Clone)]
pub struct UnionStore {
	buffer: Box<[u8]>,
	schema: Arc<Schema>,
	options: StoreOptions,
}

impl UnionStore {
	/// Zero-initialized store with default options.
	pub fn new(schema: Arc<Schema>) -> Self {
		Self::with_options(schema, StoreOptions::default())
	}

	/// Zero-initialized store with explicit options.
	pub fn with_options(schema: Arc<Schema>, options: StoreOptions) -> Self {
		let buffer = vec![0_u8; schema.buffer_size()].into_boxed_slice();
		Self { buffer, schema, options }
	}

	/// Build a strict schema from `desc` and wrap it in a fresh store.
	pub fn from_desc(desc: &TypeDesc) -> Result<Self> {
		Ok(Self::new(Arc::new(Schema::build(desc)?)))
	}

	/// Shared schema.
	pub fn schema(&self) -> &Arc<Schema> {
		&self.schema
	}

	/// Active options.
	pub fn options(&self) -> &StoreOptions {
		&self.options
	}

	/// Read-only view of the raw buffer.
	pub fn bytes(&self) -> &[u8] {
		&self.buffer
	}

	/// Buffer length in bytes.
	pub fn len(&self) -> usize {
		self.buffer.len()
	}

	/// Whether the buffer is zero-sized.
	pub fn is_empty(&self) -> bool {
		self.buffer.is_empty()
	}

	/// Zero the whole buffer.
	pub fn reset(&mut self) {
		self.buffer.fill(0);
	}

	/// Read `name` as its declared type, or `None` when the schema has no such field.
	pub fn get(&self, name: &str) -> Option<Value> {
		let Some(field) = self.schema.field(name) else {
			trace!("get {name}: no such field");
			return None;
		};
		trace!("get {name}: {} bytes as {}", field.byte_size, field.ty);
		Some(Value::decode(&field.ty, &self.buffer[..field.byte_size]))
	}

	/// Read `name` as the Rust type `T`.
	///
	/// Returns `Ok(None)` for unknown fields and [`UnionError::TypeMismatch`] when `T` does
	/// not structurally match the declared type.
	pub fn get_as<T: Plain>(&self, name: &str) -> Result<Option<T>> {
		let Some(field) = self.schema.field(name) else {
			return Ok(None);
		};
		check_shape(field, Shape::Type(&T::type_desc()))?;
		Ok(Some(T::read_plain(&self.buffer[..field.byte_size])))
	}

	/// Write `value` into `name`.
	///
	/// Fails without touching the buffer when the field is unknown, the value's kind or
	/// size differs from the field's, or the field is unexported under
	/// [`Visibility::Enforce`].
	pub fn set(&mut self, name: &str, value: &Value) -> Result<()> {
		self.check_writable(name, Shape::Value(value))?;

		let mut bytes = Vec::with_capacity(value.layout().size);
		value.encode_into(&mut bytes);
		self.commit(name, &bytes);
		Ok(())
	}

	/// Write a typed value into `name` under the same rules as [`UnionStore::set`].
	pub fn set_as<T: Plain>(&mut self, name: &str, value: T) -> Result<()> {
		self.check_writable(name, Shape::Type(&T::type_desc()))?;

		let mut bytes = Vec::with_capacity(std::mem::size_of::<T>());
		value.write_plain(&mut bytes);
		self.commit(name, &bytes);
		Ok(())
	}

	fn check_writable(&self, name: &str, shape: Shape<'_>) -> Result<()> {
		let field = self.schema.field(name).ok_or_else(|| UnionError::FieldNotFound { name: name.to_owned() })?;
		check_shape(field, shape)?;
		if !field.exported && self.options.visibility == Visibility::Enforce {
			debug!("refused write to unexported field {name}");
			return Err(UnionError::Unsettable { name: name.to_owned() });
		}
		Ok(())
	}

	fn commit(&mut self, name: &str, bytes: &[u8]) {
		self.buffer[..bytes.len()].copy_from_slice(bytes);
		if self.options.zero_fill {
			self.buffer[bytes.len()..].fill(0);
		}
		trace!("set {name}: wrote {} of {} bytes", bytes.len(), self.buffer.len());
	}
}

/// Value or type offered for a field.
#[derive(Clone, Copy)]
enum Shape<'a> {
	Value(&'a Value),
	Type(&'a TypeDesc),
}

impl Shape<'_> {
	fn kind(self) -> TypeKind {
		match self {
			Self::Value(value) => value.kind(),
			Self::Type(ty) => ty.kind(),
		}
	}

	fn size(self) -> usize {
		match self {
			Self::Value(value) => value.layout().size,
			Self::Type(ty) => layout_of(ty).size,
		}
	}

	fn fits(self, declared: &TypeDesc) -> bool {
		match self {
			Self::Value(value) => value_fits(declared, value),
			Self::Type(ty) => type_fits(declared, ty),
		}
	}
}

fn check_shape(field: &FieldDescriptor, shape: Shape<'_>) -> Result<()> {
	if !shape.fits(&field.ty) {
		let (kind, size) = (shape.kind(), shape.size());
		debug!("type mismatch on {}: {} ({} bytes) vs {kind} ({size} bytes)", field.name, field.ty, field.byte_size);
		return Err(UnionError::TypeMismatch {
			name: field.name.clone(),
			declared: field.ty.to_string(),
			expected: field.kind,
			expected_size: field.byte_size,
			got: kind,
			got_size: size,
		});
	}
	Ok(())
}

/// Same coarse kind and width at every level; signedness and names are ignored.
fn type_fits(declared: &TypeDesc, offered: &TypeDesc) -> bool {
	match (declared, offered) {
		(TypeDesc::Bool, TypeDesc::Bool) => true,
		(TypeDesc::Int { bits: a, .. }, TypeDesc::Int { bits: b, .. }) => a == b,
		(TypeDesc::Float { bits: a }, TypeDesc::Float { bits: b }) | (TypeDesc::Complex { bits: a }, TypeDesc::Complex { bits: b }) => a == b,
		(TypeDesc::Array { elem: a, len: n }, TypeDesc::Array { elem: b, len: m }) => n == m && type_fits(a, b),
		(TypeDesc::Aggregate(a), TypeDesc::Aggregate(b)) => {
			a.fields.len() == b.fields.len() && a.fields.iter().zip(&b.fields).all(|(x, y)| type_fits(&x.ty, &y.ty))
		}
		(TypeDesc::Handle { kind: a, .. }, TypeDesc::Handle { kind: b, .. }) => a == b,
		_ => false,
	}
}

/// Value counterpart of [`type_fits`]: arrays and aggregates are checked member by member.
fn value_fits(declared: &TypeDesc, value: &Value) -> bool {
	match (declared, value) {
		(TypeDesc::Array { elem, len }, Value::Array(items)) => items.len() == *len && items.iter().all(|item| value_fits(elem, item)),
		(TypeDesc::Aggregate(aggregate), Value::Struct(item)) => {
			aggregate.fields.len() == item.fields.len()
				&& aggregate.fields.iter().zip(&item.fields).all(|(field, member)| value_fits(&field.ty, &member.value))
		}
		(TypeDesc::Handle { kind, .. }, Value::Handle(item)) => item.kind == *kind && item.words.len() == kind.words(),
		(TypeDesc::Array { .. } | TypeDesc::Aggregate(_) | TypeDesc::Handle { .. }, _) => false,
		(_, Value::Array(_) | Value::Struct(_) | Value::Handle(_)) => false,
		_ => value.kind() == declared.kind() && value.layout().size == layout_of(declared).size,
	}
}

#[cfg(test)]
mod tests;
