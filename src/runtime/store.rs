//! Central store owning all runtime instances, and the allocator that turns a
//! decoded module plus host-supplied externals into a module instance.
//!
//! Store vectors grow monotonically; addresses are never reused or reordered.
//! Allocation is not transactional: addresses appended before a failure stay
//! in the store, and callers treat allocation failure as fatal for the store.

use std::sync::Arc;

use super::{
    global::GlobalInstance,
    instances::{ExportInstance, ExternalValue, FuncInstance, ModuleInstance},
    memory::MemoryInstance,
    table::TableInstance,
    FuncAddr, GlobalAddr, InstanceHandle, MemAddr, TableAddr,
};
use crate::error::LinkError;
use crate::model::{ExportDesc, Module};

#[derive(Debug, Default)]
pub struct Store {
    pub funcs: Vec<FuncInstance>,
    pub tables: Vec<TableInstance>,
    pub mems: Vec<MemoryInstance>,
    pub globals: Vec<GlobalInstance>,
    pub modules: Vec<ModuleInstance>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_func(&mut self, f: FuncInstance) -> FuncAddr {
        let addr = FuncAddr(self.funcs.len() as u32);
        self.funcs.push(f);
        addr
    }

    pub fn alloc_table(&mut self, t: TableInstance) -> TableAddr {
        let addr = TableAddr(self.tables.len() as u32);
        self.tables.push(t);
        addr
    }

    pub fn alloc_memory(&mut self, m: MemoryInstance) -> MemAddr {
        let addr = MemAddr(self.mems.len() as u32);
        self.mems.push(m);
        addr
    }

    pub fn alloc_global(&mut self, g: GlobalInstance) -> GlobalAddr {
        let addr = GlobalAddr(self.globals.len() as u32);
        self.globals.push(g);
        addr
    }

    pub fn get_func(&self, addr: FuncAddr) -> Option<&FuncInstance> {
        self.funcs.get(addr.index())
    }

    pub fn get_table(&self, addr: TableAddr) -> Option<&TableInstance> {
        self.tables.get(addr.index())
    }

    pub fn get_table_mut(&mut self, addr: TableAddr) -> Option<&mut TableInstance> {
        self.tables.get_mut(addr.index())
    }

    pub fn get_memory(&self, addr: MemAddr) -> Option<&MemoryInstance> {
        self.mems.get(addr.index())
    }

    pub fn get_memory_mut(&mut self, addr: MemAddr) -> Option<&mut MemoryInstance> {
        self.mems.get_mut(addr.index())
    }

    pub fn get_global(&self, addr: GlobalAddr) -> Option<&GlobalInstance> {
        self.globals.get(addr.index())
    }

    pub fn get_global_mut(&mut self, addr: GlobalAddr) -> Option<&mut GlobalInstance> {
        self.globals.get_mut(addr.index())
    }

    pub fn get_module(&self, handle: InstanceHandle) -> Option<&ModuleInstance> {
        self.modules.get(handle.0)
    }

    pub fn get_module_mut(&mut self, handle: InstanceHandle) -> Option<&mut ModuleInstance> {
        self.modules.get_mut(handle.0)
    }

    /// Allocate a module instance: copy types, place externals at the front of
    /// each index space (input order), allocate module-defined items behind
    /// them, and resolve exports to addresses.
    ///
    /// Globals receive a zero placeholder of their declared type; global
    /// initializers and element/data segment commits are evaluated by the
    /// execution engine against the returned instance.
    pub fn allocate(
        &mut self,
        module: Arc<Module>,
        externals: &[ExternalValue],
    ) -> Result<InstanceHandle, LinkError> {
        let handle = InstanceHandle(self.modules.len());
        self.modules.push(ModuleInstance::new(module.clone()));

        let mut funcs: Vec<FuncAddr> = Vec::with_capacity(module.total_funcs() as usize);
        let mut tables: Vec<TableAddr> = Vec::with_capacity(module.total_tables() as usize);
        let mut memories: Vec<MemAddr> = Vec::with_capacity(module.total_memories() as usize);
        let mut globals: Vec<GlobalAddr> = Vec::with_capacity(module.total_globals() as usize);

        // Imports occupy the front of each index space.
        for ext in externals {
            match *ext {
                ExternalValue::Func(addr) => {
                    self.get_func(addr).ok_or(LinkError::DanglingExternal {
                        kind: "function",
                        address: addr.0,
                    })?;
                    funcs.push(addr);
                }
                ExternalValue::Table(addr) => {
                    self.get_table(addr).ok_or(LinkError::DanglingExternal {
                        kind: "table",
                        address: addr.0,
                    })?;
                    tables.push(addr);
                }
                ExternalValue::Memory(addr) => {
                    self.get_memory(addr).ok_or(LinkError::DanglingExternal {
                        kind: "memory",
                        address: addr.0,
                    })?;
                    memories.push(addr);
                }
                ExternalValue::Global(addr) => {
                    self.get_global(addr).ok_or(LinkError::DanglingExternal {
                        kind: "global",
                        address: addr.0,
                    })?;
                    globals.push(addr);
                }
            }
        }

        // Module-defined items, in declaration order.
        for (def_index, func) in module.funcs.iter().enumerate() {
            let addr = self.alloc_func(FuncInstance::Wasm {
                type_idx: func.type_idx,
                def_index,
                module: handle,
            });
            funcs.push(addr);
        }
        for tt in &module.tables {
            tables.push(self.alloc_table(TableInstance::new(tt)));
        }
        for mt in &module.memories {
            memories.push(self.alloc_memory(MemoryInstance::new(mt)));
        }
        for glob in &module.globals {
            globals.push(self.alloc_global(GlobalInstance::uninit(glob.ty.clone())));
        }

        // Resolve exports through the assembled index spaces.
        let mut exports = Vec::with_capacity(module.exports.len());
        for ex in &module.exports {
            let resolve_err = |kind: &'static str, index: u32| LinkError::ExportIndexOutOfBounds {
                name: ex.name.clone(),
                kind,
                index,
            };
            let value = match ex.desc {
                ExportDesc::Func(idx) => ExternalValue::Func(
                    *funcs
                        .get(idx as usize)
                        .ok_or_else(|| resolve_err("function", idx))?,
                ),
                ExportDesc::Table(idx) => ExternalValue::Table(
                    *tables
                        .get(idx as usize)
                        .ok_or_else(|| resolve_err("table", idx))?,
                ),
                ExportDesc::Memory(idx) => ExternalValue::Memory(
                    *memories
                        .get(idx as usize)
                        .ok_or_else(|| resolve_err("memory", idx))?,
                ),
                ExportDesc::Global(idx) => ExternalValue::Global(
                    *globals
                        .get(idx as usize)
                        .ok_or_else(|| resolve_err("global", idx))?,
                ),
            };
            exports.push(ExportInstance {
                name: ex.name.clone(),
                value,
            });
        }

        let inst = self
            .get_module_mut(handle)
            .expect("module instance just allocated");
        inst.funcs = funcs;
        inst.tables = tables;
        inst.memories = memories;
        inst.globals = globals;
        inst.set_exports(exports);

        Ok(handle)
    }
}
