//! Public model/IR surface.

pub mod instr;
pub mod module;
pub mod types;

pub use instr::{BlockType, Expr, Instruction, MemArg};
pub use module::{CustomSection, DataSegment, ElementSegment, Function, Global, Module};
pub use types::{
    Export, ExportDesc, FuncIdx, FuncType, GlobalIdx, GlobalType, Import, ImportDesc, LabelIdx,
    Limits, LocalIdx, MemIdx, MemoryType, RefType, TableIdx, TableType, TypeIdx, ValType, Value,
};
