use std::collections::HashSet;
use std::path::Path;

use log::debug;
use serde::{Serialize, Serializer};

use crate::union::desc::{parse_description, read_description};
use crate::union::layout::layout_of;
use crate::union::{AggregateDesc, Result, TypeDesc, TypeKind, UnionError};

/// How handle and dynamic-size field kinds are treated at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildPolicy {
	/// Reject handle/dynamic kinds anywhere in a field's type.
	#[default]
	Strict,
	/// Accept handle/dynamic kinds as opaque descriptor words.
	///
	/// Reinterpreting those words across fields is meaningless; this mode exists for
	/// inspection only and is outside the conformance contract.
	Permissive,
}

/// Limits and policy switches for schema construction.
#[derive(Debug, Clone)]
pub struct BuildOptions {
	/// Handle-kind policy.
	pub policy: BuildPolicy,
	/// Largest accepted field size in bytes.
	pub max_field_size: usize,
}

impl Default for BuildOptions {
	fn default() -> Self {
		Self {
			policy: BuildPolicy::Strict,
			max_field_size: 1 << 20,
		}
	}
}

impl BuildOptions {
	/// Preset accepting handle kinds.
	pub fn permissive() -> Self {
		Self {
			policy: BuildPolicy::Permissive,
			..Self::default()
		}
	}
}

/// One union member as seen by the store and the accessor generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
	/// Declared field name.
	pub name: String,
	/// Coarse kind.
	pub kind: TypeKind,
	/// Bytes occupied from offset 0.
	pub byte_size: usize,
	/// Alignment under C layout rules.
	pub align: usize,
	/// Whether external code may write the field.
	pub exported: bool,
	/// Full declared type.
	#[serde(rename = "type", serialize_with = "serialize_display")]
	pub ty: TypeDesc,
}

/// Ordered, immutable field list of a union plus its buffer size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
	name: Option<String>,
	fields: Vec<FieldDescriptor>,
	buffer_size: usize,
}

impl Schema {
	/// Build a schema with the strict policy.
	pub fn build(desc: &TypeDesc) -> Result<Self> {
		Self::build_with(desc, &BuildOptions::default())
	}

	/// Build a schema from an aggregate description.
	pub fn build_with(desc: &TypeDesc, opt: &BuildOptions) -> Result<Self> {
		let TypeDesc::Aggregate(aggregate) = desc else {
			return Err(UnionError::NotAnAggregate { found: desc.to_string() });
		};

		validate_aggregate(aggregate)?;

		let mut fields = Vec::with_capacity(aggregate.fields.len());
		for field in &aggregate.fields {
			if opt.policy == BuildPolicy::Strict {
				if let Some((rest, kind)) = field.ty.find_handle() {
					return Err(UnionError::UnsupportedFieldKind {
						field: join_path(&field.name, &rest),
						kind,
					});
				}
			}

			if let Some((rest, len)) = find_zero_sized_array(&field.ty) {
				return Err(UnionError::ZeroSizedArray {
					field: join_path(&field.name, &rest),
					len,
				});
			}

			let layout = layout_of(&field.ty);
			if layout.size > opt.max_field_size {
				return Err(UnionError::FieldTooLarge {
					name: field.name.clone(),
					size: layout.size,
					max: opt.max_field_size,
				});
			}

			fields.push(FieldDescriptor {
				name: field.name.clone(),
				kind: field.ty.kind(),
				byte_size: layout.size,
				align: layout.align,
				exported: field.exported,
				ty: field.ty.clone(),
			});
		}

		let buffer_size = fields.iter().map(|field| field.byte_size).max().unwrap_or(0);
		debug!(
			"built union schema {}: {} fields, buffer_size={buffer_size}, policy={:?}",
			aggregate.label(),
			fields.len(),
			opt.policy
		);

		Ok(Self {
			name: aggregate.name.clone(),
			fields,
			buffer_size,
		})
	}

	/// Parse a JSON description and build a schema from it.
	pub fn from_json(text: &str, opt: &BuildOptions) -> Result<Self> {
		Self::build_with(&parse_description(text)?, opt)
	}

	/// Read a JSON description from disk and build a schema from it.
	pub fn from_path(path: impl AsRef<Path>, opt: &BuildOptions) -> Result<Self> {
		Self::build_with(&read_description(path)?, opt)
	}

	/// Aggregate name, when the description declared one.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Fields in declaration order.
	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	/// Buffer length required by the largest field.
	pub fn buffer_size(&self) -> usize {
		self.buffer_size
	}

	/// Look up a field by exact, case-sensitive name.
	pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|field| field.name == name)
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether the schema has no fields.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

fn validate_aggregate(aggregate: &AggregateDesc) -> Result<()> {
	let mut seen = HashSet::with_capacity(aggregate.fields.len());
	for field in &aggregate.fields {
		if !is_identifier(&field.name) {
			return Err(UnionError::InvalidFieldName { name: field.name.clone() });
		}
		if !seen.insert(field.name.as_str()) {
			return Err(UnionError::DuplicateField {
				aggregate: aggregate.label().to_owned(),
				name: field.name.clone(),
			});
		}
		validate_nested(&field.ty)?;
	}
	Ok(())
}

fn validate_nested(ty: &TypeDesc) -> Result<()> {
	match ty {
		TypeDesc::Aggregate(nested) => validate_aggregate(nested),
		TypeDesc::Array { elem, .. } => validate_nested(elem),
		_ => Ok(()),
	}
}

/// Array nested anywhere in `ty` that repeats a zero-sized element, with its dotted path.
///
/// Byte limits cannot bound such arrays, and decoding one allocates per element.
fn find_zero_sized_array(ty: &TypeDesc) -> Option<(String, usize)> {
	match ty {
		TypeDesc::Array { elem, len } if *len > 0 && layout_of(elem).size == 0 => Some((String::new(), *len)),
		TypeDesc::Array { elem, .. } => find_zero_sized_array(elem),
		TypeDesc::Aggregate(aggregate) => aggregate
			.fields
			.iter()
			.find_map(|field| find_zero_sized_array(&field.ty).map(|(rest, len)| (join_path(&field.name, &rest), len))),
		_ => None,
	}
}

fn join_path(head: &str, rest: &str) -> String {
	if rest.is_empty() { head.to_owned() } else { format!("{head}.{rest}") }
}

fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	chars.next().is_some_and(|first| first.is_ascii_alphabetic() || first == '_') && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn serialize_display<S: Serializer>(value: &TypeDesc, serializer: S) -> std::result::Result<S::Ok, S::Error> {
	serializer.collect_str(value)
}
