//! One-byte-tag decoders for the type grammar: value types, block result
//! types, limits, function/table/memory/global types.

use super::{cursor::Cursor, leb128, reader::read_vec, DecodeError, Result};
use crate::model::{BlockType, FuncType, GlobalType, Limits, MemoryType, RefType, TableType, ValType};

pub fn read_val_type(cur: &mut Cursor) -> Result<ValType> {
    let offset = cur.offset();
    match cur.read_u8()? {
        0x7F => Ok(ValType::I32),
        0x7E => Ok(ValType::I64),
        0x7D => Ok(ValType::F32),
        0x7C => Ok(ValType::F64),
        found => Err(DecodeError::Unexpected {
            found,
            expected: "valtype (0x7f..0x7c)",
            offset,
        }),
    }
}

/// Block result type: 0x40 for empty, otherwise a single valtype.
pub fn read_block_type(cur: &mut Cursor) -> Result<BlockType> {
    let offset = cur.offset();
    match cur.read_u8()? {
        0x40 => Ok(BlockType::Empty),
        0x7F => Ok(BlockType::Value(ValType::I32)),
        0x7E => Ok(BlockType::Value(ValType::I64)),
        0x7D => Ok(BlockType::Value(ValType::F32)),
        0x7C => Ok(BlockType::Value(ValType::F64)),
        found => Err(DecodeError::Unexpected {
            found,
            expected: "blocktype (0x40 or valtype)",
            offset,
        }),
    }
}

pub fn read_ref_type(cur: &mut Cursor) -> Result<RefType> {
    cur.expect_u8(0x70, "0x70 (funcref)")?;
    Ok(RefType::FuncRef)
}

pub fn read_limits(cur: &mut Cursor) -> Result<Limits> {
    let tag = cur.read_one_of(&[0x00, 0x01], "limits tag (0x00 or 0x01)")?;
    let min = leb128::read_uleb_u32(cur)?;
    let max = if tag == 0x01 {
        Some(leb128::read_uleb_u32(cur)?)
    } else {
        None
    };
    Ok(Limits { min, max })
}

pub fn read_func_type(cur: &mut Cursor) -> Result<FuncType> {
    cur.expect_u8(0x60, "0x60 (functype)")?;
    let params = read_vec(cur, read_val_type)?;
    let results = read_vec(cur, read_val_type)?;
    Ok(FuncType { params, results })
}

pub fn read_table_type(cur: &mut Cursor) -> Result<TableType> {
    let elem = read_ref_type(cur)?;
    let limits = read_limits(cur)?;
    Ok(TableType { elem, limits })
}

pub fn read_memory_type(cur: &mut Cursor) -> Result<MemoryType> {
    let limits = read_limits(cur)?;
    Ok(MemoryType { limits })
}

pub fn read_global_type(cur: &mut Cursor) -> Result<GlobalType> {
    let val_type = read_val_type(cur)?;
    let mutable = cur.read_one_of(&[0x00, 0x01], "mutability (0x00 or 0x01)")? == 0x01;
    Ok(GlobalType { val_type, mutable })
}
