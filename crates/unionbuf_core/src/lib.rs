//! C-style overlapping unions backed by one shared byte buffer.

/// Schema building, union storage, and accessor generation.
pub mod union;

mod macros;
