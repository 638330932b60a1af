mod accessor;
mod decl;
mod desc;
mod error;
mod kind;
mod layout;
mod plain;
mod schema;
mod store;
mod value;

/// Accessor generation and rendering.
pub use accessor::{Access, AccessorVis, GetterDecl, RenderOptions, SetterDecl, WrapperDecl, generate, render};
/// Declared types and description parsing.
pub use desc::{AggregateDesc, FieldDesc, TypeDesc, is_exported_name, parse_description, read_description};
/// Error and result aliases.
pub use error::{Result, UnionError};
/// Coarse kind classifiers.
pub use kind::{HandleKind, TypeKind};
/// C layout computation.
pub use layout::{Layout, aggregate_layout, layout_of};
/// Typed reinterpretation trait and complex value types.
pub use plain::{Complex64, Complex128, Plain};
/// Schema construction types.
pub use schema::{BuildOptions, BuildPolicy, FieldDescriptor, Schema};
/// Union storage and options.
pub use store::{StoreOptions, UnionStore, Visibility};
/// Runtime values.
pub use value::{FieldValue, HandleValue, StructValue, Value};
