use std::sync::Arc;

use crate::union::{
	AggregateDesc, BuildOptions, Complex64, FieldDesc, FieldValue, HandleKind, HandleValue, Schema, StoreOptions, StructValue, TypeDesc, TypeKind,
	UnionError, UnionStore, Value,
};

fn sample_store() -> UnionStore {
	let desc = AggregateDesc::named("Sample")
		.with("B", TypeDesc::BOOL)
		.with("I", TypeDesc::I64)
		.with("F", TypeDesc::F32)
		.with("small", TypeDesc::U8);
	UnionStore::from_desc(&desc.into()).expect("store builds")
}

#[test]
fn fresh_store_is_zeroed() {
	let store = sample_store();
	assert_eq!(store.len(), 8);
	assert!(store.bytes().iter().all(|byte| *byte == 0));
	assert_eq!(store.get("I"), Some(Value::I64(0)));
	assert_eq!(store.get("B"), Some(Value::Bool(false)));
}

#[test]
fn integer_write_is_visible_through_narrower_fields() {
	let mut store = sample_store();
	let value = 21324569978_i64;
	store.set("I", &Value::I64(value)).expect("set succeeds");

	let raw = value.to_ne_bytes();
	assert_eq!(store.bytes(), &raw);
	assert_eq!(store.get("B"), Some(Value::Bool(raw[0] != 0)));
	assert_eq!(store.get("F"), Some(Value::F32(f32::from_ne_bytes([raw[0], raw[1], raw[2], raw[3]]))));
	assert_eq!(store.get("I"), Some(Value::I64(value)));
}

#[test]
fn round_trip_for_every_field() {
	let mut store = sample_store();
	for (name, value) in [("B", Value::Bool(true)), ("I", Value::I64(-7)), ("F", Value::F32(3.25)), ("I", Value::U64(u64::MAX))] {
		let expected = match (name, &value) {
			("I", Value::U64(raw)) => Value::I64(*raw as i64),
			_ => value.clone(),
		};
		store.set(name, &value).expect("set succeeds");
		assert_eq!(store.get(name), Some(expected), "{name}");
	}
}

#[test]
fn short_write_zero_fills_the_tail() {
	let mut store = sample_store();
	store.set("I", &Value::I64(-1)).expect("set succeeds");
	store.set("B", &Value::Bool(true)).expect("set succeeds");

	assert_eq!(store.bytes()[0], 1);
	assert!(store.bytes()[1..].iter().all(|byte| *byte == 0));
	assert_eq!(store.get("I"), Some(Value::I64(i64::from_ne_bytes([1, 0, 0, 0, 0, 0, 0, 0]))));
}

#[test]
fn legacy_options_keep_stale_tail() {
	let schema = Arc::clone(sample_store().schema());
	let mut store = UnionStore::with_options(schema, StoreOptions::legacy());
	store.set("I", &Value::I64(-1)).expect("set succeeds");
	store.set("B", &Value::Bool(false)).expect("set succeeds");

	assert_eq!(store.bytes()[0], 0);
	assert!(store.bytes()[1..].iter().all(|byte| *byte == 0xff));
}

#[test]
fn unknown_field_reads_none_and_write_fails_without_mutation() {
	let mut store = sample_store();
	store.set("I", &Value::I64(42)).expect("set succeeds");
	let before = store.bytes().to_vec();

	assert_eq!(store.get("doesNotExist"), None);
	let err = store.set("doesNotExist", &Value::I64(1)).expect_err("unknown field should fail");
	assert!(matches!(err, UnionError::FieldNotFound { ref name } if name == "doesNotExist"));
	assert_eq!(store.bytes(), before.as_slice());
	assert_eq!(store.get("I"), Some(Value::I64(42)));
}

#[test]
fn wrong_kind_or_size_fails_without_mutation() {
	let mut store = sample_store();
	store.set("I", &Value::I64(42)).expect("set succeeds");
	let before = store.bytes().to_vec();

	let err = store.set("I", &Value::F64(1.0)).expect_err("float into int should fail");
	assert!(matches!(
		err,
		UnionError::TypeMismatch {
			expected: TypeKind::Int,
			got: TypeKind::Float,
			..
		}
	));
	let err = store.set("I", &Value::I32(1)).expect_err("narrow int should fail");
	assert!(matches!(err, UnionError::TypeMismatch { expected_size: 8, got_size: 4, .. }));
	assert_eq!(store.bytes(), before.as_slice());
}

#[test]
fn unexported_fields_are_unsettable_unless_ignored() {
	let mut store = sample_store();
	let err = store.set("small", &Value::U8(9)).expect_err("unexported write should fail");
	assert!(matches!(err, UnionError::Unsettable { ref name } if name == "small"));
	assert!(store.bytes().iter().all(|byte| *byte == 0));
	assert_eq!(store.get("small"), Some(Value::U8(0)));

	let mut open = UnionStore::with_options(Arc::clone(store.schema()), StoreOptions::permissive());
	open.set("small", &Value::U8(9)).expect("write allowed when visibility is ignored");
	assert_eq!(open.get("small"), Some(Value::U8(9)));
}

#[test]
fn type_mismatch_is_reported_before_visibility() {
	let mut store = sample_store();
	let err = store.set("small", &Value::I64(1)).expect_err("should fail");
	assert!(matches!(err, UnionError::TypeMismatch { .. }));
}

#[test]
fn typed_access_matches_dynamic_access() {
	let mut store = sample_store();
	store.set_as("I", 21324569978_i64).expect("set succeeds");
	assert_eq!(store.get_as::<i64>("I").expect("shape matches"), Some(21324569978));
	assert_eq!(store.get_as::<u64>("I").expect("same width integer matches"), Some(21324569978));
	assert_eq!(store.get_as::<bool>("nope").expect("unknown is not an error"), None);

	let err = store.get_as::<f64>("I").expect_err("float view of int field should fail");
	assert!(matches!(err, UnionError::TypeMismatch { .. }));
	let err = store.set_as("F", 1.0_f64).expect_err("f64 into f32 should fail");
	assert!(matches!(err, UnionError::TypeMismatch { .. }));
}

#[test]
fn schema_is_shared_between_stores() {
	let first = sample_store();
	let mut second = UnionStore::new(Arc::clone(first.schema()));
	second.set("I", &Value::I64(5)).expect("set succeeds");
	assert!(Arc::ptr_eq(first.schema(), second.schema()));
	assert_eq!(first.get("I"), Some(Value::I64(0)));
}

#[test]
fn nested_aggregates_and_arrays_round_trip() {
	let point = AggregateDesc::named("Point").with("X", TypeDesc::I32).with("Y", TypeDesc::I32);
	let desc = AggregateDesc::named("Shape")
		.with("P", point.into())
		.with("Raw", TypeDesc::array(TypeDesc::U8, 8))
		.with("Z", TypeDesc::C64);
	let mut store = UnionStore::from_desc(&desc.into()).expect("store builds");
	assert_eq!(store.len(), 8);

	let point = Value::Struct(StructValue {
		type_name: Some("Point".into()),
		fields: vec![
			FieldValue {
				name: "X".into(),
				value: Value::I32(1),
			},
			FieldValue {
				name: "Y".into(),
				value: Value::I32(-1),
			},
		],
	});
	store.set("P", &point).expect("set succeeds");
	assert_eq!(store.get("P"), Some(point));

	let Some(Value::Array(raw)) = store.get("Raw") else {
		panic!("expected byte array");
	};
	assert_eq!(raw.len(), 8);
	assert!(raw[4..].iter().all(|item| *item == Value::U8(0xff)));

	store.set("Raw", &Value::from([1_u8, 2, 3, 4, 5, 6, 7, 8])).expect("set succeeds");
	assert_eq!(store.get_as::<[u8; 8]>("Raw").expect("shape matches"), Some([1, 2, 3, 4, 5, 6, 7, 8]));

	let err = store.set("Raw", &Value::from([1_u16, 2, 3, 4])).expect_err("element width differs");
	assert!(matches!(err, UnionError::TypeMismatch { expected_size: 8, got_size: 8, .. }));
	assert!(matches!(store.get_as::<[u16; 4]>("Raw"), Err(UnionError::TypeMismatch { .. })));
}

#[test]
fn array_elements_must_each_match_the_declared_element() {
	let desc = AggregateDesc::anonymous()
		.with("Raw", TypeDesc::array(TypeDesc::U8, 2))
		.with("Wide", TypeDesc::array(TypeDesc::I64, 2));
	let mut store = UnionStore::from_desc(&desc.into()).expect("store builds");
	store.set("Raw", &Value::from([7_u8, 9])).expect("set succeeds");
	let before = store.bytes().to_vec();

	let mixed = Value::Array(vec![Value::Bool(true), Value::I8(-1)]);
	let err = store.set("Raw", &mixed).expect_err("bool element in byte array should fail");
	assert!(matches!(err, UnionError::TypeMismatch { ref declared, .. } if declared == "[2]u8"), "{err}");

	let ragged = Value::Array(vec![Value::I32(1), Value::I64(2), Value::I32(3)]);
	assert!(matches!(store.set("Wide", &ragged), Err(UnionError::TypeMismatch { .. })));
	assert_eq!(store.bytes(), before.as_slice());

	store.set("Raw", &Value::from([-1_i8, 1])).expect("signedness is not part of the shape");
	assert_eq!(store.get("Raw"), Some(Value::from([0xff_u8, 1])));
}

#[test]
fn handles_inside_values_are_refused_by_strict_schemas() {
	let pair = AggregateDesc::named("Pair").with("A", TypeDesc::U64).with("B", TypeDesc::U64);
	let desc = AggregateDesc::anonymous().with("P", pair.into()).with("Words", TypeDesc::array(TypeDesc::U64, 2));
	let mut store = UnionStore::from_desc(&desc.into()).expect("store builds");

	let smuggled = Value::Struct(StructValue {
		type_name: Some("Pair".into()),
		fields: vec![
			FieldValue {
				name: "A".into(),
				value: Value::Handle(HandleValue {
					kind: HandleKind::Pointer,
					words: vec![0x1000],
				}),
			},
			FieldValue {
				name: "B".into(),
				value: Value::U64(1),
			},
		],
	});
	assert!(matches!(store.set("P", &smuggled), Err(UnionError::TypeMismatch { .. })));

	let words = Value::Array(vec![Value::Handle(HandleValue {
		kind: HandleKind::String,
		words: vec![0x1000, 5],
	})]);
	assert!(matches!(store.set("Words", &words), Err(UnionError::TypeMismatch { .. })));
	assert!(store.bytes().iter().all(|byte| *byte == 0));
}

#[test]
fn complex_values_use_two_float_halves() {
	let desc = AggregateDesc::anonymous().with("Z", TypeDesc::C64).with("Halves", TypeDesc::array(TypeDesc::F32, 2));
	let mut store = UnionStore::from_desc(&desc.into()).expect("store builds");
	store.set_as("Z", Complex64 { re: 2.0, im: -3.0 }).expect("set succeeds");
	assert_eq!(store.get_as::<[f32; 2]>("Halves").expect("shape matches"), Some([2.0, -3.0]));
}

#[test]
fn padding_in_nested_aggregates_is_zeroed() {
	let inner = AggregateDesc::named("Inner").with("A", TypeDesc::U8).with("B", TypeDesc::U32);
	let desc = AggregateDesc::anonymous().field(FieldDesc::new("In", inner.into())).with("W", TypeDesc::U64);
	let mut store = UnionStore::from_desc(&desc.into()).expect("store builds");
	store.set("W", &Value::U64(u64::MAX)).expect("set succeeds");

	let value = Value::from_json(&store.schema().fields()[0].ty, &serde_json::json!({ "A": 7, "B": 9 })).expect("literal parses");
	store.set("In", &value).expect("set succeeds");
	assert_eq!(&store.bytes()[1..4], &[0, 0, 0]);
	assert_eq!(store.get("In"), Some(value));
}

#[test]
fn permissive_handles_read_back_as_words() {
	let desc = AggregateDesc::anonymous()
		.with("S", TypeDesc::handle(HandleKind::String))
		.with("N", TypeDesc::array(TypeDesc::U64, 2));
	let schema = Schema::build_with(&desc.into(), &BuildOptions::permissive()).expect("permissive build succeeds");
	let mut store = UnionStore::new(Arc::new(schema));

	store.set("N", &Value::from([0x1000_u64, 5])).expect("set succeeds");
	assert_eq!(
		store.get("S"),
		Some(Value::Handle(HandleValue {
			kind: HandleKind::String,
			words: vec![0x1000, 5],
		}))
	);
}

#[test]
fn reset_zeroes_buffer() {
	let mut store = sample_store();
	store.set("I", &Value::I64(-1)).expect("set succeeds");
	store.reset();
	assert!(store.bytes().iter().all(|byte| *byte == 0));
}
