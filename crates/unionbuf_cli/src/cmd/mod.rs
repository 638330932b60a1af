/// Schema inspection command.
pub mod schema;
/// Read/write session command.
pub mod poke;
/// Accessor generation command.
pub mod wrap;

pub(crate) mod util;
