use serde::Serialize;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::union::TypeDesc;
use crate::union::layout::layout_of;

/// Complex number of two `f32` halves.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct Complex64 {
	/// Real part.
	pub re: f32,
	/// Imaginary part.
	pub im: f32,
}

/// Complex number of two `f64` halves.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct Complex128 {
	/// Real part.
	pub re: f64,
	/// Imaginary part.
	pub im: f64,
}

/// Plain-value Rust types that may be stored in and reinterpreted from a union buffer.
///
/// Implemented for `bool`, fixed-width integers, floats, [`Complex64`], [`Complex128`],
/// and fixed arrays of those. Handle-bearing types cannot implement it, so typed access
/// never reinterprets pointer or length metadata.
pub trait Plain: Copy + 'static {
	/// Declared type matching this Rust type.
	fn type_desc() -> TypeDesc;

	/// Read a value from the leading bytes of `bytes`.
	///
	/// Bytes past the end of `bytes` read as zero.
	fn read_plain(bytes: &[u8]) -> Self;

	/// Append this value's native-endian bytes.
	fn write_plain(&self, out: &mut Vec<u8>);
}

/// Reinterpret the leading bytes as `T`, zero-extending short input.
///
/// The only place in the crate where raw bytes become a typed value.
pub(crate) fn reinterpret<T: FromBytes + IntoBytes>(bytes: &[u8]) -> T {
	let mut out = T::new_zeroed();
	let dst = out.as_mut_bytes();
	let n = dst.len().min(bytes.len());
	dst[..n].copy_from_slice(&bytes[..n]);
	out
}

macro_rules! impl_plain {
	($($ty:ty => $desc:expr),* $(,)?) => {
		$(
			impl Plain for $ty {
				fn type_desc() -> TypeDesc {
					$desc
				}

				fn read_plain(bytes: &[u8]) -> Self {
					reinterpret(bytes)
				}

				fn write_plain(&self, out: &mut Vec<u8>) {
					out.extend_from_slice(self.as_bytes());
				}
			}
		)*
	};
}

impl_plain! {
	i8 => TypeDesc::I8,
	i16 => TypeDesc::I16,
	i32 => TypeDesc::I32,
	i64 => TypeDesc::I64,
	u8 => TypeDesc::U8,
	u16 => TypeDesc::U16,
	u32 => TypeDesc::U32,
	u64 => TypeDesc::U64,
	f32 => TypeDesc::F32,
	f64 => TypeDesc::F64,
	Complex64 => TypeDesc::C64,
	Complex128 => TypeDesc::C128,
}

// `bool` has invalid bit patterns, so it reads through `u8`: any non-zero byte is true.
impl Plain for bool {
	fn type_desc() -> TypeDesc {
		TypeDesc::BOOL
	}

	fn read_plain(bytes: &[u8]) -> Self {
		reinterpret::<u8>(bytes) != 0
	}

	fn write_plain(&self, out: &mut Vec<u8>) {
		out.push(u8::from(*self));
	}
}

impl<T: Plain, const N: usize> Plain for [T; N] {
	fn type_desc() -> TypeDesc {
		TypeDesc::array(T::type_desc(), N)
	}

	fn read_plain(bytes: &[u8]) -> Self {
		let size = layout_of(&T::type_desc()).size;
		std::array::from_fn(|idx| T::read_plain(bytes.get(idx * size..).unwrap_or_default()))
	}

	fn write_plain(&self, out: &mut Vec<u8>) {
		for item in self {
			item.write_plain(out);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{Complex64, Plain};
	use crate::union::TypeDesc;

	#[test]
	fn short_input_zero_extends() {
		assert_eq!(u32::read_plain(&[0x01]), u32::from_ne_bytes([0x01, 0, 0, 0]));
		assert_eq!(i64::read_plain(&[]), 0);
	}

	#[test]
	fn bool_reads_any_nonzero_byte_as_true() {
		assert!(bool::read_plain(&[0x7a]));
		assert!(!bool::read_plain(&[0x00, 0xff]));
	}

	#[test]
	fn arrays_read_elementwise() {
		let mut bytes = Vec::new();
		[1_i16, -2, 3].write_plain(&mut bytes);
		assert_eq!(bytes.len(), 6);
		assert_eq!(<[i16; 3]>::read_plain(&bytes), [1, -2, 3]);
		assert_eq!(<[i16; 4]>::read_plain(&bytes), [1, -2, 3, 0]);
		assert_eq!(<[u8; 2] as Plain>::type_desc(), TypeDesc::array(TypeDesc::U8, 2));
	}

	#[test]
	fn complex_round_trips() {
		let value = Complex64 { re: 1.5, im: -0.25 };
		let mut bytes = Vec::new();
		value.write_plain(&mut bytes);
		assert_eq!(Complex64::read_plain(&bytes), value);
	}
}
