//! Crate-level error types.

use thiserror::Error;

/// Failure while decoding a module from bytes. Decoding stops at the first
/// error; no partial module is produced.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Binary(#[from] crate::binary::DecodeError),
}

/// Failure while allocating a module instance into a store.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("export `{name}` refers to {kind} index {index}, which is out of bounds")]
    ExportIndexOutOfBounds {
        name: String,
        kind: &'static str,
        index: u32,
    },

    #[error("external {kind} address {address} does not exist in the store")]
    DanglingExternal { kind: &'static str, address: u32 },
}

/// Runtime fault raised by host functions (the engine's trap surface; only the
/// host-callable seam lives in this crate).
#[derive(Debug, Error)]
pub enum Trap {
    #[error("host function trapped: {0}")]
    Host(&'static str),
}
