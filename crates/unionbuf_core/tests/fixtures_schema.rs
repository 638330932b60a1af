#![allow(missing_docs)]

use std::sync::Arc;

use unionbuf::union::{BuildOptions, Schema, TypeKind, UnionError, UnionStore, Value};
use unionbuf_testkit::{fixture_json, fixture_path};

#[test]
fn sample_fixture_sizes_buffer_to_largest_field() {
	let schema = Schema::from_path(fixture_path("sample.json"), &BuildOptions::default()).expect("schema builds");
	assert_eq!(schema.buffer_size(), 8);
	assert_eq!(schema.len(), 3);
}

#[test]
fn nested_fixture_uses_c_layout_for_inner_aggregate() {
	let schema = Schema::from_path(fixture_path("nested.json"), &BuildOptions::default()).expect("schema builds");
	assert_eq!(schema.buffer_size(), 40);

	let big = schema.field("s").expect("s exists");
	assert_eq!(big.kind, TypeKind::Aggregate);
	assert_eq!(big.byte_size, 40);
	assert!(!big.exported);
	assert_eq!(schema.field("Raw").map(|field| field.byte_size), Some(8));
}

#[test]
fn nested_fixture_writes_are_visible_through_every_view() {
	let schema = Arc::new(Schema::from_path(fixture_path("nested.json"), &BuildOptions::default()).expect("schema builds"));
	let mut store = UnionStore::new(schema);
	store.set("I", &Value::I64(456)).expect("exported field is writable");

	let Some(Value::F64(f)) = store.get("f") else {
		panic!("f should read as f64");
	};
	assert_eq!(f.to_bits(), 456);

	let Some(Value::Array(raw)) = store.get("Raw") else {
		panic!("Raw should read as array");
	};
	let halves: Vec<_> = 456_i64.to_ne_bytes().chunks(2).map(|pair| Value::U16(u16::from_ne_bytes([pair[0], pair[1]]))).collect();
	assert_eq!(raw, halves);
}

#[test]
fn handle_fixture_needs_permissive_policy() {
	let err = Schema::from_path(fixture_path("handles.json"), &BuildOptions::default()).expect_err("strict build should fail");
	assert!(matches!(err, UnionError::UnsupportedFieldKind { ref field, kind: TypeKind::String } if field == "Name"));

	let schema = Schema::from_path(fixture_path("handles.json"), &BuildOptions::permissive()).expect("permissive build succeeds");
	assert_eq!(schema.buffer_size(), 24);
}

#[test]
fn list_fixture_is_not_an_aggregate() {
	assert!(fixture_json("not_aggregate.json").is_array());
	let err = Schema::from_path(fixture_path("not_aggregate.json"), &BuildOptions::default()).expect_err("list should fail");
	assert!(matches!(err, UnionError::NotAnAggregate { ref found } if found == "list"));
}

#[test]
fn missing_fixture_is_an_io_error() {
	let err = Schema::from_path(fixture_path("does_not_exist.json"), &BuildOptions::default()).expect_err("missing file should fail");
	assert!(matches!(err, UnionError::Io(_)));
}
