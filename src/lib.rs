//! WASM MVP binary-module decoder and module-instance allocator.
//!
//! [`decode`] turns a complete byte stream into a [`Module`]; decoding is a
//! pure function of the bytes, fails fast on the first malformation, and
//! never yields a partial module. [`runtime::Store::allocate`] turns a
//! decoded module plus host-supplied external addresses into a module
//! instance whose exports are resolved store addresses. Validation,
//! execution, and host import policy are external collaborators consuming
//! the same data model.

pub mod binary;
pub mod error;
pub mod host;
pub mod model;
pub mod runtime;

pub use binary::DecodeError;
pub use model::{Module, ValType, Value};

/// Decode a WASM binary module (public API). Low-level binary errors are
/// translated into the crate-level ParseError via the From impl.
pub fn decode(bytes: &[u8]) -> Result<Module, error::ParseError> {
    let module = binary::sections::parse_module_from_bytes(bytes)?;
    Ok(module)
}
