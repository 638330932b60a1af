use thiserror::Error;

use crate::union::TypeKind;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, UnionError>;

/// Errors produced while describing, building, and accessing unions.
#[derive(Debug, Error)]
pub enum UnionError {
	/// Filesystem IO failure while reading a description.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Description text was not valid JSON or did not match the description shape.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Union construction was given something other than an aggregate.
	#[error("union source is not an aggregate (found {found})")]
	NotAnAggregate {
		/// Short label of what was supplied instead.
		found: String,
	},
	/// Strict policy rejected a handle or dynamic-size field.
	#[error("field {field} has unsupported kind {kind} (handle/dynamic kinds cannot be reinterpreted safely)")]
	UnsupportedFieldKind {
		/// Dotted path of the offending field.
		field: String,
		/// Offending coarse kind.
		kind: TypeKind,
	},
	/// Field size exceeds the configured construction limit.
	#[error("field {name} is {size} bytes (max={max})")]
	FieldTooLarge {
		/// Offending field name.
		name: String,
		/// Computed byte size.
		size: usize,
		/// Configured ceiling.
		max: usize,
	},
	/// Array with a non-zero count of zero-sized elements.
	#[error("field {field} repeats a zero-sized element {len} times")]
	ZeroSizedArray {
		/// Dotted path of the offending array.
		field: String,
		/// Declared element count.
		len: usize,
	},
	/// Write targeted a field name absent from the schema.
	#[error("field not found: {name}")]
	FieldNotFound {
		/// Requested field name.
		name: String,
	},
	/// Written value does not structurally match the field type.
	#[error("type mismatch on field {name}: expected {declared} ({expected}, {expected_size} bytes), got {got} ({got_size} bytes)")]
	TypeMismatch {
		/// Target field name.
		name: String,
		/// Declared type rendered as a type expression.
		declared: String,
		/// Declared coarse kind.
		expected: TypeKind,
		/// Declared byte size.
		expected_size: usize,
		/// Coarse kind of the supplied value.
		got: TypeKind,
		/// Byte size of the supplied value.
		got_size: usize,
	},
	/// Write targeted an unexported field while visibility is enforced.
	#[error("field {name} is not exported and cannot be set")]
	Unsettable {
		/// Target field name.
		name: String,
	},
	/// Type expression text could not be parsed.
	#[error("invalid type expression: {expr}")]
	InvalidTypeExpr {
		/// Original expression text.
		expr: String,
	},
	/// Field name is not a valid identifier.
	#[error("invalid field name: {name:?}")]
	InvalidFieldName {
		/// Offending name.
		name: String,
	},
	/// Two fields at one aggregate level share a name.
	#[error("duplicate field {name} in {aggregate}")]
	DuplicateField {
		/// Aggregate label (name or `<anonymous>`).
		aggregate: String,
		/// Duplicated field name.
		name: String,
	},
	/// Structurally invalid description content.
	#[error("invalid description: {reason}")]
	InvalidDescription {
		/// Human-readable explanation.
		reason: String,
	},
	/// A value literal could not be interpreted as the declared type.
	#[error("invalid value for {expected}: {reason}")]
	InvalidValue {
		/// Declared type rendered as a type expression.
		expected: String,
		/// Human-readable explanation.
		reason: String,
	},
}
