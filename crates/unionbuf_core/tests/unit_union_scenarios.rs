#![allow(missing_docs)]

use std::sync::Arc;

use unionbuf::union::{BuildOptions, RenderOptions, Schema, UnionError, UnionStore, Value, generate, render};
use unionbuf_testkit::fixture_text;

fn store_for(name: &str) -> UnionStore {
	let schema = Schema::from_json(&fixture_text(name), &BuildOptions::default()).expect("schema builds");
	UnionStore::new(Arc::new(schema))
}

#[test]
fn integer_write_reinterpreted_as_bool_and_float() {
	let mut store = store_for("sample.json");
	assert_eq!(store.len(), 8);

	store.set("I", &Value::I64(21324569978)).expect("set succeeds");
	let raw = 21324569978_i64.to_ne_bytes();
	assert_eq!(store.get("B"), Some(Value::Bool(raw[0] != 0)));
	assert_eq!(store.get("F"), Some(Value::F32(f32::from_ne_bytes([raw[0], raw[1], raw[2], raw[3]]))));
}

#[test]
fn failed_writes_leave_every_view_unchanged() {
	let mut store = store_for("sample.json");
	store.set("F", &Value::F32(1.5)).expect("set succeeds");
	let before = (store.get("B"), store.get("I"), store.get("F"));

	assert!(matches!(store.set("doesNotExist", &Value::I64(9)), Err(UnionError::FieldNotFound { .. })));
	assert!(matches!(store.set("I", &Value::F32(9.0)), Err(UnionError::TypeMismatch { .. })));

	assert_eq!((store.get("B"), store.get("I"), store.get("F")), before);
}

#[test]
fn generated_wrapper_exposes_setter_only_for_exported_field() {
	let schema = Schema::from_json(&fixture_text("pair.json"), &BuildOptions::default()).expect("schema builds");
	let decl = generate(&schema, "PairUnion");

	let getters: Vec<_> = decl.getters.iter().map(|item| item.ident.as_str()).collect();
	let setters: Vec<_> = decl.setters.iter().map(|item| item.ident.as_str()).collect();
	assert_eq!(getters, ["X", "y"]);
	assert_eq!(setters, ["set_X"]);

	let source = render(&decl, &RenderOptions::default());
	assert!(source.contains("pub fn X(&self) -> i32"));
	assert!(source.contains("pub(crate) fn y(&self) -> i32"));
	assert!(source.contains("pub fn set_X(&mut self, value: i32)"));
	assert!(!source.contains("fn set_y"));
}
