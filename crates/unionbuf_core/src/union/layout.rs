use crate::union::{AggregateDesc, TypeDesc};

/// Size of one handle descriptor word.
pub(crate) const WORD_SIZE: usize = 8;

/// Byte size and alignment of a type under C layout rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
	/// Total size in bytes, including trailing padding.
	pub size: usize,
	/// Required alignment in bytes.
	pub align: usize,
}

impl Layout {
	/// Zero-sized, byte-aligned layout.
	pub const EMPTY: Self = Self { size: 0, align: 1 };

	fn scalar(size: usize) -> Self {
		Self { size, align: size }
	}
}

/// Layout of a declared type. Sizes saturate instead of overflowing.
pub fn layout_of(ty: &TypeDesc) -> Layout {
	match ty {
		TypeDesc::Bool => Layout::scalar(1),
		TypeDesc::Int { bits, .. } | TypeDesc::Float { bits } => Layout::scalar(usize::from(*bits) / 8),
		TypeDesc::Complex { bits } => Layout {
			size: usize::from(*bits) / 8,
			align: usize::from(*bits) / 16,
		},
		TypeDesc::Array { elem, len } => {
			let elem = layout_of(elem);
			Layout {
				size: elem.size.saturating_mul(*len),
				align: elem.align,
			}
		}
		TypeDesc::Aggregate(aggregate) => aggregate_layout(aggregate).1,
		TypeDesc::Handle { kind, .. } => Layout {
			size: WORD_SIZE * kind.words(),
			align: WORD_SIZE,
		},
	}
}

/// Field offsets and overall layout of an aggregate laid out as a C struct.
pub fn aggregate_layout(aggregate: &AggregateDesc) -> (Vec<usize>, Layout) {
	struct_layout(aggregate.fields.iter().map(|field| layout_of(&field.ty)))
}

/// Lay out a sequence of members in order, aligning each and rounding the total.
pub(crate) fn struct_layout(members: impl Iterator<Item = Layout>) -> (Vec<usize>, Layout) {
	let mut offsets = Vec::new();
	let mut end = 0_usize;
	let mut align = 1_usize;

	for member in members {
		let offset = align_up(end, member.align);
		offsets.push(offset);
		end = offset.saturating_add(member.size);
		align = align.max(member.align);
	}

	(
		offsets,
		Layout {
			size: align_up(end, align),
			align,
		},
	)
}

fn align_up(value: usize, align: usize) -> usize {
	if align <= 1 {
		return value;
	}
	match value % align {
		0 => value,
		rem => value.saturating_add(align - rem),
	}
}

#[cfg(test)]
mod tests {
	use super::{Layout, layout_of};
	use crate::union::{AggregateDesc, HandleKind, TypeDesc};

	#[test]
	fn nested_aggregate_is_padded_like_c() {
		let big = AggregateDesc::named("Big")
			.with("c1", TypeDesc::C128)
			.with("b", TypeDesc::BOOL)
			.with("c2", TypeDesc::C128);
		assert_eq!(layout_of(&big.into()), Layout { size: 40, align: 8 });
	}

	#[test]
	fn trailing_padding_rounds_to_alignment() {
		let item = AggregateDesc::anonymous().with("a", TypeDesc::I32).with("b", TypeDesc::U8);
		assert_eq!(layout_of(&item.into()), Layout { size: 8, align: 4 });
	}

	#[test]
	fn empty_aggregate_and_zero_length_array_are_zero_sized() {
		assert_eq!(layout_of(&AggregateDesc::anonymous().into()), Layout::EMPTY);
		assert_eq!(layout_of(&TypeDesc::array(TypeDesc::I64, 0)).size, 0);
	}

	#[test]
	fn handle_words_are_eight_bytes() {
		assert_eq!(layout_of(&TypeDesc::handle(HandleKind::Slice)).size, 24);
		assert_eq!(layout_of(&TypeDesc::handle(HandleKind::String)).size, 16);
		assert_eq!(layout_of(&TypeDesc::handle(HandleKind::Pointer)).size, 8);
	}

	#[test]
	fn huge_arrays_saturate() {
		let ty = TypeDesc::array(TypeDesc::I64, usize::MAX / 2);
		assert_eq!(layout_of(&ty).size, usize::MAX);
	}
}
