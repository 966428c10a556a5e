//! Global instance: declared type plus the current value. The allocator
//! records the type and a zero placeholder; the execution engine sets the real
//! initial value after evaluating the initializer expression.

use crate::model::{GlobalType, Value};

#[derive(Debug, Clone)]
pub struct GlobalInstance {
    ty: GlobalType,
    val: Value,
}

impl GlobalInstance {
    /// A global of the declared type holding that type's zero value.
    pub fn uninit(ty: GlobalType) -> Self {
        let val = Value::zero_of(ty.val_type);
        Self { ty, val }
    }

    pub fn new(ty: GlobalType, init: Value) -> Self {
        Self { ty, val: init }
    }

    pub fn get(&self) -> Value {
        self.val
    }

    /// Overwrite the value; rejected for immutable globals. Value-type checks
    /// are the validator's business.
    pub fn set(&mut self, v: Value) -> Result<(), ()> {
        if self.ty.mutable {
            self.val = v;
            Ok(())
        } else {
            Err(())
        }
    }

    /// Engine-side write of the evaluated initializer; ignores mutability.
    pub fn init(&mut self, v: Value) {
        self.val = v;
    }

    pub fn ty(&self) -> &GlobalType {
        &self.ty
    }
}
