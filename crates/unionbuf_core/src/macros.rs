/// Declare a union wrapper type with typed accessors and a lazily built shared schema.
///
/// Each member is `name [setter]: Type`, where `Type` implements
/// [`Plain`](crate::union::Plain). Members listed with a setter identifier are exported;
/// members without one are read-only through the wrapper.
///
/// ```
/// unionbuf::declare_union! {
/// 	pub union Sample {
/// 		B: bool,
/// 		I set_i: i64,
/// 		F set_f: f32,
/// 	}
/// }
///
/// let mut sample = Sample::new().expect("plain members always build");
/// sample.set_i(21324569978).expect("exported member");
/// assert_eq!(sample.I(), 21324569978);
/// assert_eq!(sample.B(), 21324569978_i64.to_ne_bytes()[0] != 0);
/// ```
#[macro_export]
macro_rules! declare_union {
	(
		$(#[$meta:meta])*
		$vis:vis union $name:ident {
			$($field:ident $($setter:ident)?: $ty:ty),* $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone)]
		$vis struct $name {
			store: $crate::union::UnionStore,
		}

		#[allow(non_snake_case, dead_code)]
		impl $name {
			/// Schema shared by every instance of this union.
			pub fn schema() -> $crate::union::Result<::std::sync::Arc<$crate::union::Schema>> {
				static SCHEMA: ::std::sync::OnceLock<::std::sync::Arc<$crate::union::Schema>> = ::std::sync::OnceLock::new();
				if let Some(schema) = SCHEMA.get() {
					return Ok(::std::sync::Arc::clone(schema));
				}
				let desc = $crate::union::AggregateDesc::named(stringify!($name))
					$(.field(
						$crate::union::FieldDesc::new(stringify!($field), <$ty as $crate::union::Plain>::type_desc())
							.exported($crate::__union_exported!($($setter)?)),
					))*;
				let schema = ::std::sync::Arc::new($crate::union::Schema::build(&desc.into())?);
				Ok(::std::sync::Arc::clone(SCHEMA.get_or_init(|| schema)))
			}

			/// Zero-initialized union.
			pub fn new() -> $crate::union::Result<Self> {
				Ok(Self {
					store: $crate::union::UnionStore::new(Self::schema()?),
				})
			}

			/// Borrow the underlying store.
			pub fn store(&self) -> &$crate::union::UnionStore {
				&self.store
			}

			$(
				#[doc = concat!("Read `", stringify!($field), "`.")]
				pub fn $field(&self) -> $ty {
					match self.store.get_as::<$ty>(stringify!($field)) {
						Ok(Some(value)) => value,
						_ => unreachable!(concat!("field `", stringify!($field), "` is declared by ", stringify!($name))),
					}
				}

				$(
					#[doc = concat!("Write `", stringify!($field), "`.")]
					pub fn $setter(&mut self, value: $ty) -> $crate::union::Result<()> {
						self.store.set_as(stringify!($field), value)
					}
				)?
			)*
		}
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __union_exported {
	() => {
		false
	};
	($setter:ident) => {
		true
	};
}
