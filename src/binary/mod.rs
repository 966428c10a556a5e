//! Binary decoding for WASM MVP modules: cursor, LEB128, primitive readers,
//! tag decoders, the instruction/expression decoder, and the section framer.
//! All layers report errors through [`DecodeError`] with the stream offset at
//! the point of failure.

pub mod cursor;
pub mod instr;
pub mod leb128;
pub mod reader;
pub mod sections;
pub mod types;

use thiserror::Error;

/// Result alias for binary decoding operations.
pub type Result<T> = core::result::Result<T, DecodeError>;

/// Errors that can occur while decoding a WASM binary stream. All decode
/// errors are fatal for the current module; no recovery or backtracking.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Stream exhausted before a required byte.
    #[error("unexpected end of stream at offset {offset}")]
    UnexpectedEnd { offset: usize },

    /// A tag or opcode byte outside the allowed set. `expected` names the
    /// allowed set ("0x60 (functype)", "opcode", ...).
    #[error("unexpected byte 0x{found:02x} at offset {offset}, expected {expected}")]
    Unexpected {
        found: u8,
        expected: &'static str,
        offset: usize,
    },

    /// A name failed UTF-8 decoding. Carries the offending bytes.
    #[error("invalid UTF-8 in name at offset {offset}")]
    InvalidUnicode { bytes: Vec<u8>, offset: usize },

    /// Declared section size disagrees with the bytes actually consumed.
    #[error(
        "section size mismatch at offset {position}: declared {declared} bytes, consumed {actual}"
    )]
    InvalidSectionSize {
        declared: u32,
        actual: u32,
        position: usize,
    },

    /// A vector length exceeds the bytes available to satisfy it.
    #[error("vector length exceeds remaining input at offset {position}")]
    InvalidVectorLength { position: usize },

    /// Standard section ids must be strictly increasing.
    #[error("section id {current} at offset {offset} does not follow section id {seen}")]
    SectionOrder { seen: u8, current: u8, offset: usize },

    /// Function-section and code-section lengths differ.
    #[error("function section declares {funcs} functions but code section has {codes} bodies")]
    FunctionCodeMismatch { funcs: usize, codes: usize },
}
