use std::sync::Arc;

use serde::Serialize;
use unionbuf::union::{Result, StoreOptions, TypeDesc, UnionError, UnionStore, Value, Visibility};

use crate::cmd::util::{DescArgs, hex};

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub desc: DescArgs,
	/// Write `NAME=JSON` or `NAME:TYPE=JSON`, applied in order.
	#[arg(long = "set", value_name = "NAME[:TYPE]=JSON")]
	pub sets: Vec<String>,
	/// Field to read after all writes; defaults to every field.
	#[arg(long = "get", value_name = "NAME")]
	pub gets: Vec<String>,
	/// Allow writes to unexported fields.
	#[arg(long)]
	pub ignore_visibility: bool,
	/// Leave the buffer tail untouched on short writes.
	#[arg(long)]
	pub no_zero_fill: bool,
	/// Emit JSON instead of text.
	#[arg(long)]
	pub json: bool,
}

/// One parsed `--set` argument.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WriteArg {
	pub field: String,
	pub ty: Option<TypeDesc>,
	pub literal: serde_json::Value,
}

#[derive(Serialize)]
struct Report {
	buffer_size: usize,
	writes: Vec<Access>,
	reads: Vec<Access>,
	buffer: String,
}

#[derive(Serialize)]
struct Access {
	field: String,
	value: Option<Value>,
}

/// Apply writes to a fresh union and print the requested reads.
pub fn run(args: Args) -> Result<()> {
	let Args {
		desc,
		sets,
		gets,
		ignore_visibility,
		no_zero_fill,
		json,
	} = args;

	let schema = Arc::new(desc.load()?);
	let options = StoreOptions {
		visibility: if ignore_visibility { Visibility::Ignore } else { Visibility::Enforce },
		zero_fill: !no_zero_fill,
	};
	let mut store = UnionStore::with_options(schema, options);

	let mut writes = Vec::with_capacity(sets.len());
	for raw in &sets {
		let write = parse_write(raw)?;
		let value = resolve_value(&store, &write)?;
		store.set(&write.field, &value)?;
		writes.push(Access {
			field: write.field,
			value: Some(value),
		});
	}

	let names: Vec<String> = if gets.is_empty() {
		store.schema().fields().iter().map(|field| field.name.clone()).collect()
	} else {
		gets
	};
	let reads: Vec<Access> = names
		.into_iter()
		.map(|field| Access {
			value: store.get(&field),
			field,
		})
		.collect();

	let report = Report {
		buffer_size: store.len(),
		writes,
		reads,
		buffer: hex(store.bytes()),
	};

	if json {
		println!("{}", serde_json::to_string_pretty(&report)?);
		return Ok(());
	}

	println!("buffer_size: {}", report.buffer_size);
	for item in &report.writes {
		println!("set {} = {}", item.field, render_value(item.value.as_ref())?);
	}
	for item in &report.reads {
		println!("get {} = {}", item.field, render_value(item.value.as_ref())?);
	}
	println!("buffer: {}", report.buffer);

	Ok(())
}

/// Parse `NAME=JSON` or `NAME:TYPE=JSON`.
pub(crate) fn parse_write(raw: &str) -> Result<WriteArg> {
	let invalid = |reason: &str| UnionError::InvalidValue {
		expected: "NAME[:TYPE]=JSON".to_owned(),
		reason: format!("{reason}: {raw}"),
	};

	let (target, literal) = raw.split_once('=').ok_or_else(|| invalid("missing '='"))?;
	let (field, ty) = match target.split_once(':') {
		Some((field, ty)) => (field.trim(), Some(TypeDesc::parse(ty)?)),
		None => (target.trim(), None),
	};
	if field.is_empty() {
		return Err(invalid("missing field name"));
	}

	let literal = serde_json::from_str(literal.trim()).map_err(|_| invalid("value is not a JSON literal"))?;
	Ok(WriteArg {
		field: field.to_owned(),
		ty,
		literal,
	})
}

fn resolve_value(store: &UnionStore, write: &WriteArg) -> Result<Value> {
	let ty = match &write.ty {
		Some(ty) => ty,
		None => {
			let field = store
				.schema()
				.field(&write.field)
				.ok_or_else(|| UnionError::FieldNotFound { name: write.field.clone() })?;
			&field.ty
		}
	};
	Value::from_json(ty, &write.literal)
}

fn render_value(value: Option<&Value>) -> Result<String> {
	match value {
		Some(item) => Ok(serde_json::to_string(item)?),
		None => Ok("absent".to_owned()),
	}
}
