//! Module-level IR for WASM MVP: module structure, functions, segments.

use super::instr::Expr;
use super::types::{
    Export, FuncIdx, FuncType, GlobalType, Import, MemIdx, MemoryType, TableIdx, TableType,
    TypeIdx, ValType,
};

/// A defined function: the zip of one function-section entry with its code
/// body. Locals are the expanded list (run-length groups already unrolled).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Function {
    pub type_idx: TypeIdx,
    pub locals: Vec<ValType>,
    pub body: Expr,
}

/// Global with type and initializer expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub ty: GlobalType,
    pub init: Expr,
}

/// Active element segment (MVP): initializes table elements with function indices at offset expr.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementSegment {
    pub table: TableIdx,
    pub offset: Expr,
    pub init: Vec<FuncIdx>,
}

/// Active data segment (MVP): initializes memory with bytes at offset expr.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSegment {
    pub memory: MemIdx,
    pub offset: Expr,
    pub init: Vec<u8>,
}

/// A custom section carried through verbatim: name plus opaque payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomSection {
    pub name: String,
    pub data: Vec<u8>,
}

/// The decoded module (pre-validation, pre-instantiation).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub types: Vec<FuncType>,
    pub imports: Vec<Import>,
    /// Defined (non-imported) functions, in module order.
    pub funcs: Vec<Function>,
    pub tables: Vec<TableType>,
    pub memories: Vec<MemoryType>,
    pub globals: Vec<Global>,

    pub exports: Vec<Export>,
    pub start: Option<FuncIdx>,

    pub elements: Vec<ElementSegment>,
    pub data: Vec<DataSegment>,

    /// Custom sections in order of appearance.
    pub customs: Vec<CustomSection>,

    // Precomputed import counts for index space arithmetic.
    pub imported_funcs: u32,
    pub imported_tables: u32,
    pub imported_memories: u32,
    pub imported_globals: u32,
}

impl Module {
    /// Total counts including imports for each index space.
    pub fn total_funcs(&self) -> u32 {
        self.imported_funcs + (self.funcs.len() as u32)
    }
    pub fn total_tables(&self) -> u32 {
        self.imported_tables + (self.tables.len() as u32)
    }
    pub fn total_memories(&self) -> u32 {
        self.imported_memories + (self.memories.len() as u32)
    }
    pub fn total_globals(&self) -> u32 {
        self.imported_globals + (self.globals.len() as u32)
    }
}
