use std::collections::HashSet;

use crate::union::{Schema, TypeDesc};

/// Visibility of a generated accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorVis {
	/// `pub`
	Public,
	/// `pub(crate)`
	Crate,
}

impl AccessorVis {
	fn keyword(self) -> &'static str {
		match self {
			Self::Public => "pub",
			Self::Crate => "pub(crate)",
		}
	}
}

/// How a generated accessor reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
	/// `get_as`/`set_as` with a concrete Rust type.
	Typed {
		/// Rust type; `$crate` stands for the crate path chosen at render time.
		rust_type: String,
	},
	/// `get`/`set` through the dynamic value type.
	Dynamic,
}

/// One generated getter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetterDecl {
	/// Method identifier (raw-escaped when needed).
	pub ident: String,
	/// Schema field the getter reads.
	pub field: String,
	/// Method visibility.
	pub vis: AccessorVis,
	/// Store access path.
	pub access: Access,
}

/// One generated setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetterDecl {
	/// Method identifier.
	pub ident: String,
	/// Schema field the setter writes.
	pub field: String,
	/// Store access path.
	pub access: Access,
}

/// Wrapper type declaration derived from a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperDecl {
	/// Wrapper type identifier.
	pub type_name: String,
	/// Name of the aggregate the schema came from.
	pub source: Option<String>,
	/// Getters in schema order.
	pub getters: Vec<GetterDecl>,
	/// Setters in schema order, exported fields only.
	pub setters: Vec<SetterDecl>,
}

/// Knobs for rendering a [`WrapperDecl`] as Rust source.
#[derive(Debug, Clone)]
pub struct RenderOptions {
	/// Path the generated code uses to reach this crate.
	pub crate_path: String,
	/// Emit the leading "generated" banner comment.
	pub banner: bool,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			crate_path: "::unionbuf".to_owned(),
			banner: true,
		}
	}
}

/// Append one formatted line of generated source.
macro_rules! emit {
	($out:expr, $($arg:tt)*) => {{
		$out.push_str(&format!($($arg)*));
		$out.push('\n');
	}};
}

const RESERVED_METHODS: [&str; 3] = ["new", "store", "into_store"];

/// Derive wrapper declarations from a schema.
///
/// Every field gets a getter named after it; unexported fields get a lower-cased alias
/// with crate visibility. Only exported fields get a `set_<Field>` setter. Identifiers
/// that would collide are suffixed with `_` until unique.
pub fn generate(schema: &Schema, type_name: &str) -> WrapperDecl {
	let mut taken: HashSet<String> = RESERVED_METHODS.iter().map(|item| (*item).to_owned()).collect();
	let mut getters = Vec::with_capacity(schema.len());
	let mut setters = Vec::new();

	for field in schema.fields() {
		let access = match rust_type(&field.ty) {
			Some(rust_type) => Access::Typed { rust_type },
			None => Access::Dynamic,
		};

		let (base, vis) = if field.exported {
			(field.name.clone(), AccessorVis::Public)
		} else {
			(lower_first(&field.name), AccessorVis::Crate)
		};
		getters.push(GetterDecl {
			ident: unique_ident(&mut taken, &base),
			field: field.name.clone(),
			vis,
			access: access.clone(),
		});

		if field.exported {
			setters.push(SetterDecl {
				ident: unique_ident(&mut taken, &format!("set_{}", field.name)),
				field: field.name.clone(),
				access,
			});
		}
	}

	WrapperDecl {
		type_name: type_name.to_owned(),
		source: schema.name().map(str::to_owned),
		getters,
		setters,
	}
}

/// Render declarations as Rust source for the caller to check in.
pub fn render(decl: &WrapperDecl, opt: &RenderOptions) -> String {
	let krate = opt.crate_path.as_str();
	let name = decl.type_name.as_str();
	let source = decl.source.as_deref().unwrap_or(name);
	let mut out = String::new();

	if opt.banner {
		emit!(out, "// Generated by unionbuf from `{source}`. Do not edit.");
		out.push('\n');
	}

	emit!(out, "/// Typed accessors over a union store holding `{source}`.");
	emit!(out, "#[derive(Debug, Clone)]");
	emit!(out, "pub struct {name} {{");
	emit!(out, "\tstore: {krate}::union::UnionStore,");
	emit!(out, "}}");
	out.push('\n');

	emit!(out, "#[allow(non_snake_case, dead_code)]");
	emit!(out, "impl {name} {{");
	emit!(out, "\t/// Wrap a store built from the `{source}` description.");
	emit!(out, "\tpub fn new(store: {krate}::union::UnionStore) -> Self {{");
	emit!(out, "\t\tSelf {{ store }}");
	emit!(out, "\t}}");
	out.push('\n');
	emit!(out, "\t/// Borrow the underlying store.");
	emit!(out, "\tpub fn store(&self) -> &{krate}::union::UnionStore {{");
	emit!(out, "\t\t&self.store");
	emit!(out, "\t}}");
	out.push('\n');
	emit!(out, "\t/// Unwrap into the underlying store.");
	emit!(out, "\tpub fn into_store(self) -> {krate}::union::UnionStore {{");
	emit!(out, "\t\tself.store");
	emit!(out, "\t}}");

	for getter in &decl.getters {
		out.push('\n');
		render_getter(&mut out, krate, getter);
	}
	for setter in &decl.setters {
		out.push('\n');
		render_setter(&mut out, krate, setter);
	}

	emit!(out, "}}");
	out
}

fn render_getter(out: &mut String, krate: &str, getter: &GetterDecl) {
	let vis = getter.vis.keyword();
	let ident = &getter.ident;
	let field = &getter.field;
	match &getter.access {
		Access::Typed { rust_type } => {
			let rust_type = qualify(rust_type, krate);
			emit!(out, "\t{vis} fn {ident}(&self) -> {rust_type} {{");
			emit!(out, "\t\tmatch self.store.get_as::<{rust_type}>({field:?}) {{");
			emit!(out, "\t\t\tOk(Some(value)) => value,");
		}
		Access::Dynamic => {
			emit!(out, "\t{vis} fn {ident}(&self) -> {krate}::union::Value {{");
			emit!(out, "\t\tmatch self.store.get({field:?}) {{");
			emit!(out, "\t\t\tSome(value) => value,");
		}
	}
	emit!(out, "\t\t\t_ => unreachable!(\"field `{field}` is declared by the schema\"),");
	emit!(out, "\t\t}}");
	emit!(out, "\t}}");
}

fn render_setter(out: &mut String, krate: &str, setter: &SetterDecl) {
	let ident = &setter.ident;
	let field = &setter.field;
	match &setter.access {
		Access::Typed { rust_type } => {
			let rust_type = qualify(rust_type, krate);
			emit!(out, "\tpub fn {ident}(&mut self, value: {rust_type}) -> {krate}::union::Result<()> {{");
			emit!(out, "\t\tself.store.set_as({field:?}, value)");
		}
		Access::Dynamic => {
			emit!(out, "\tpub fn {ident}(&mut self, value: &{krate}::union::Value) -> {krate}::union::Result<()> {{");
			emit!(out, "\t\tself.store.set({field:?}, value)");
		}
	}
	emit!(out, "\t}}");
}

/// Rust type for plain-value declared types; `None` for aggregates and handles.
fn rust_type(ty: &TypeDesc) -> Option<String> {
	let name = match ty {
		TypeDesc::Bool => "bool".to_owned(),
		TypeDesc::Int { .. } | TypeDesc::Float { .. } => ty.to_string(),
		TypeDesc::Complex { bits: 64 } => "$crate::union::Complex64".to_owned(),
		TypeDesc::Complex { .. } => "$crate::union::Complex128".to_owned(),
		TypeDesc::Array { elem, len } => format!("[{}; {len}]", rust_type(elem)?),
		TypeDesc::Aggregate(_) | TypeDesc::Handle { .. } => return None,
	};
	Some(name)
}

fn qualify(rust_type: &str, krate: &str) -> String {
	rust_type.replace("$crate", krate)
}

fn lower_first(name: &str) -> String {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) => first.to_lowercase().chain(chars).collect(),
		None => String::new(),
	}
}

fn unique_ident(taken: &mut HashSet<String>, base: &str) -> String {
	let mut ident = escape_keyword(base);
	while taken.contains(&ident) {
		ident.push('_');
	}
	taken.insert(ident.clone());
	ident
}

fn escape_keyword(ident: &str) -> String {
	const RAW_OK: [&str; 45] = [
		"as", "break", "const", "continue", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
		"pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "abstract",
		"become", "box", "do", "final", "macro", "override", "priv", "typeof", "unsized", "virtual",
	];
	const NO_RAW: [&str; 4] = ["self", "Self", "super", "crate"];

	if NO_RAW.contains(&ident) {
		format!("{ident}_")
	} else if RAW_OK.contains(&ident) || matches!(ident, "yield" | "try" | "gen") {
		format!("r#{ident}")
	} else {
		ident.to_owned()
	}
}
