//! Table instance for funcref (MVP only). Slots hold optional function
//! addresses into the owning store.

use super::FuncAddr;
use crate::model::TableType;

#[derive(Debug, Clone)]
pub struct TableInstance {
    elems: Vec<Option<FuncAddr>>,
    max: Option<u32>,
}

impl TableInstance {
    /// Create a table sized to its declared minimum, all slots empty. The
    /// allocator never fills slots; element-segment commits belong to the
    /// execution engine.
    pub fn new(ty: &TableType) -> Self {
        Self {
            elems: vec![None; ty.limits.min as usize],
            max: ty.limits.max,
        }
    }

    pub fn size(&self) -> u32 {
        self.elems.len() as u32
    }

    pub fn get(&self, idx: u32) -> Option<Option<FuncAddr>> {
        self.elems.get(idx as usize).copied()
    }

    pub fn set(&mut self, idx: u32, val: Option<FuncAddr>) -> Result<(), ()> {
        match self.elems.get_mut(idx as usize) {
            Some(slot) => {
                *slot = val;
                Ok(())
            }
            None => Err(()),
        }
    }

    /// Grow by delta elements. Returns previous size, or None past the max.
    pub fn grow(&mut self, delta: u32) -> Option<u32> {
        let prev = self.size();
        let new = prev.saturating_add(delta);
        if let Some(max) = self.max {
            if new > max {
                return None;
            }
        }
        self.elems.resize(new as usize, None);
        Some(prev)
    }
}
