use crate::union::{HandleKind, Result, TypeDesc, UnionError};

/// Parse type expression text into a declared type.
///
/// Accepts primitive names (Rust and Go spellings), `[N]T` arrays, and handle forms
/// (`*T`, `[]T`, `string`, `map[K]V`, `chan T`, `func...`, `interface{}`, `any`).
pub(crate) fn parse_type_expr(raw: &str) -> Result<TypeDesc> {
	let expr = raw.trim();
	let invalid = || UnionError::InvalidTypeExpr { expr: raw.to_owned() };

	if expr.is_empty() {
		return Err(invalid());
	}

	if let Some(primitive) = primitive(expr) {
		return Ok(primitive);
	}

	if let Some(kind) = handle_kind(expr) {
		if !handle_is_well_formed(kind, expr) {
			return Err(invalid());
		}
		return Ok(TypeDesc::Handle {
			kind,
			expr: expr.to_owned(),
		});
	}

	if let Some(rest) = expr.strip_prefix('[') {
		let close = rest.find(']').ok_or_else(invalid)?;
		let len = rest[..close].trim().parse::<usize>().map_err(|_| invalid())?;
		let elem = &rest[close + 1..];
		if elem.trim().is_empty() {
			return Err(invalid());
		}
		let elem = parse_type_expr(elem).map_err(|_| invalid())?;
		return Ok(TypeDesc::array(elem, len));
	}

	Err(invalid())
}

fn primitive(expr: &str) -> Option<TypeDesc> {
	let ty = match expr {
		"bool" => TypeDesc::BOOL,
		"i8" | "int8" => TypeDesc::I8,
		"i16" | "int16" => TypeDesc::I16,
		"i32" | "int32" | "rune" => TypeDesc::I32,
		"i64" | "int64" | "int" | "isize" => TypeDesc::I64,
		"u8" | "uint8" | "byte" => TypeDesc::U8,
		"u16" | "uint16" => TypeDesc::U16,
		"u32" | "uint32" => TypeDesc::U32,
		"u64" | "uint64" | "uint" | "uintptr" | "usize" => TypeDesc::U64,
		"f32" | "float32" => TypeDesc::F32,
		"f64" | "float64" => TypeDesc::F64,
		"c64" | "complex64" => TypeDesc::C64,
		"c128" | "complex128" => TypeDesc::C128,
		_ => return None,
	};
	Some(ty)
}

fn handle_kind(expr: &str) -> Option<HandleKind> {
	if expr.starts_with('*') {
		Some(HandleKind::Pointer)
	} else if expr.starts_with("[]") {
		Some(HandleKind::Slice)
	} else if expr == "string" || expr == "str" {
		Some(HandleKind::String)
	} else if expr.starts_with("map[") {
		Some(HandleKind::Map)
	} else if expr == "chan" || expr.starts_with("chan ") || expr.starts_with("chan<-") || expr.starts_with("<-chan") {
		Some(HandleKind::Chan)
	} else if expr.starts_with("func") {
		Some(HandleKind::Func)
	} else if expr == "any" || expr.starts_with("interface") {
		Some(HandleKind::Interface)
	} else {
		None
	}
}

fn handle_is_well_formed(kind: HandleKind, expr: &str) -> bool {
	match kind {
		HandleKind::Pointer => !expr.trim_start_matches('*').trim().is_empty(),
		HandleKind::Slice => !expr[2..].trim().is_empty(),
		HandleKind::Map => expr[4..].find(']').is_some_and(|close| close > 0 && !expr[4 + close + 1..].trim().is_empty()),
		_ => true,
	}
}
