//! Instance records for functions and modules, plus the typed external-value
//! and export-instance types the allocator traffics in.

use std::collections::HashMap;
use std::sync::Arc;

use super::{FuncAddr, GlobalAddr, InstanceHandle, MemAddr, TableAddr};
use crate::host::HostFunc;
use crate::model::{FuncType, Function, Module, TypeIdx};

/// A function instance: either WASM-defined (points into a module instance's
/// defined functions) or host-provided.
#[derive(Clone)]
pub enum FuncInstance {
    /// WASM-defined function: its type index and definition index (into
    /// `Module::funcs`, imports excluded), with a back-reference to the owning
    /// module instance.
    Wasm {
        type_idx: TypeIdx,
        def_index: usize,
        module: InstanceHandle,
    },
    /// Host function: external callable with a known signature. Hosts allocate
    /// these into a store to mint function addresses usable as externals.
    Host { ty: FuncType, f: Arc<HostFunc> },
}

impl std::fmt::Debug for FuncInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FuncInstance::Wasm {
                type_idx,
                def_index,
                module,
            } => f
                .debug_struct("Wasm")
                .field("type_idx", type_idx)
                .field("def_index", def_index)
                .field("module", module)
                .finish(),
            FuncInstance::Host { ty, .. } => f.debug_struct("Host").field("ty", ty).finish(),
        }
    }
}

/// A host-supplied or export-resolved address, typed by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalValue {
    Func(FuncAddr),
    Table(TableAddr),
    Memory(MemAddr),
    Global(GlobalAddr),
}

/// A resolved export: name bound to a store address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportInstance {
    pub name: String,
    pub value: ExternalValue,
}

/// A module instance: the addresses of its imported and defined items
/// (imports first in each index space) and its resolved exports.
#[derive(Debug, Clone, Default)]
pub struct ModuleInstance {
    pub types: Vec<FuncType>,
    pub funcs: Vec<FuncAddr>,
    pub tables: Vec<TableAddr>,
    pub memories: Vec<MemAddr>,
    pub globals: Vec<GlobalAddr>,

    /// Exports in module order.
    pub exports: Vec<ExportInstance>,
    /// Name -> position in `exports` for lookup.
    export_index: HashMap<String, usize>,

    /// Decoded module the instance was allocated from, for access to function
    /// bodies and types at runtime.
    pub module: Arc<Module>,
}

impl ModuleInstance {
    pub(crate) fn new(module: Arc<Module>) -> Self {
        Self {
            types: module.types.clone(),
            module,
            ..Self::default()
        }
    }

    pub(crate) fn set_exports(&mut self, exports: Vec<ExportInstance>) {
        self.export_index = exports
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        self.exports = exports;
    }

    /// Resolve an export name to its address.
    pub fn resolve_export(&self, name: &str) -> Option<ExternalValue> {
        self.export_index.get(name).map(|&i| self.exports[i].value)
    }

    /// Fetch a defined function by definition index (into `Module::funcs`).
    pub fn function(&self, def_index: usize) -> Option<&Function> {
        self.module.funcs.get(def_index)
    }

    /// Fetch a function type by type index.
    pub fn func_type(&self, type_idx: TypeIdx) -> Option<&FuncType> {
        self.types.get(type_idx as usize)
    }
}
