//! Instruction and expression decoding: a flat opcode table over the first
//! byte, each entry reading its immediate operand sequence.
//!
//! `end` (0x0B) and `else` (0x05) are structural terminators. The expression
//! decoder consumes them; they are never emitted into the instruction stream.

use super::{
    cursor::Cursor,
    leb128,
    reader::{read_f32_bits, read_f64_bits, read_vec},
    types::read_block_type,
    DecodeError, Result,
};
use crate::model::{Expr, Instruction, MemArg};

/// MVP opcode bytes.
pub(crate) mod op {
    pub const UNREACHABLE: u8 = 0x00;
    pub const NOP: u8 = 0x01;
    pub const BLOCK: u8 = 0x02;
    pub const LOOP: u8 = 0x03;
    pub const IF: u8 = 0x04;
    pub const ELSE: u8 = 0x05;
    pub const END: u8 = 0x0B;
    pub const BR: u8 = 0x0C;
    pub const BR_IF: u8 = 0x0D;
    pub const BR_TABLE: u8 = 0x0E;
    pub const RETURN: u8 = 0x0F;
    pub const CALL: u8 = 0x10;
    pub const CALL_INDIRECT: u8 = 0x11;

    pub const DROP: u8 = 0x1A;
    pub const SELECT: u8 = 0x1B;

    pub const LOCAL_GET: u8 = 0x20;
    pub const LOCAL_SET: u8 = 0x21;
    pub const LOCAL_TEE: u8 = 0x22;
    pub const GLOBAL_GET: u8 = 0x23;
    pub const GLOBAL_SET: u8 = 0x24;

    pub const MEMORY_SIZE: u8 = 0x3F;
    pub const MEMORY_GROW: u8 = 0x40;

    pub const I32_CONST: u8 = 0x41;
    pub const I64_CONST: u8 = 0x42;
    pub const F32_CONST: u8 = 0x43;
    pub const F64_CONST: u8 = 0x44;
}

fn read_mem_arg(cur: &mut Cursor) -> Result<MemArg> {
    let align = leb128::read_uleb_u32(cur)?;
    let offset = leb128::read_uleb_u32(cur)?;
    Ok(MemArg { align, offset })
}

/// How an instruction sequence was terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    End,
    Else,
}

/// Read instructions until `end` (or `else`, when decoding an if-then body).
fn read_instr_seq(cur: &mut Cursor, stop_on_else: bool) -> Result<(Vec<Instruction>, Terminator)> {
    let mut instrs = Vec::new();
    loop {
        let offset = cur.offset();
        let opcode = cur.read_u8()?;
        match opcode {
            op::END => return Ok((instrs, Terminator::End)),
            op::ELSE if stop_on_else => return Ok((instrs, Terminator::Else)),
            op::ELSE => {
                return Err(DecodeError::Unexpected {
                    found: opcode,
                    expected: "opcode (else outside if)",
                    offset,
                })
            }
            _ => instrs.push(read_instruction(cur, opcode, offset)?),
        }
    }
}

/// Top-level expression: instructions terminated by `end` (consumed, excluded).
pub fn read_expr(cur: &mut Cursor) -> Result<Expr> {
    let (instrs, _) = read_instr_seq(cur, false)?;
    Ok(Expr::new(instrs))
}

/// The two bodies of an `if`: the then-body runs to `else` or directly to
/// `end` (empty else-body in that case).
fn read_if_bodies(cur: &mut Cursor) -> Result<(Expr, Expr)> {
    let (then, term) = read_instr_seq(cur, true)?;
    let else_ = match term {
        Terminator::Else => read_expr(cur)?,
        Terminator::End => Expr::default(),
    };
    Ok((Expr::new(then), else_))
}

/// Decode the instruction introduced by `opcode` (already consumed at
/// `offset`), reading its immediates.
fn read_instruction(cur: &mut Cursor, opcode: u8, offset: usize) -> Result<Instruction> {
    use Instruction::*;

    Ok(match opcode {
        op::UNREACHABLE => Unreachable,
        op::NOP => Nop,
        op::BLOCK => {
            let ty = read_block_type(cur)?;
            let body = read_expr(cur)?;
            Block { ty, body }
        }
        op::LOOP => {
            let ty = read_block_type(cur)?;
            let body = read_expr(cur)?;
            Loop { ty, body }
        }
        op::IF => {
            let ty = read_block_type(cur)?;
            let (then, else_) = read_if_bodies(cur)?;
            If { ty, then, else_ }
        }
        op::BR => Br(leb128::read_uleb_u32(cur)?),
        op::BR_IF => BrIf(leb128::read_uleb_u32(cur)?),
        op::BR_TABLE => {
            let targets = read_vec(cur, leb128::read_uleb_u32)?;
            let default = leb128::read_uleb_u32(cur)?;
            BrTable { targets, default }
        }
        op::RETURN => Return,
        op::CALL => Call(leb128::read_uleb_u32(cur)?),
        op::CALL_INDIRECT => {
            let type_idx = leb128::read_uleb_u32(cur)?;
            cur.expect_u8(0x00, "0x00 (call_indirect reserved byte)")?;
            CallIndirect(type_idx)
        }

        op::DROP => Drop,
        op::SELECT => Select,

        op::LOCAL_GET => LocalGet(leb128::read_uleb_u32(cur)?),
        op::LOCAL_SET => LocalSet(leb128::read_uleb_u32(cur)?),
        op::LOCAL_TEE => LocalTee(leb128::read_uleb_u32(cur)?),
        op::GLOBAL_GET => GlobalGet(leb128::read_uleb_u32(cur)?),
        op::GLOBAL_SET => GlobalSet(leb128::read_uleb_u32(cur)?),

        0x28 => I32Load(read_mem_arg(cur)?),
        0x29 => I64Load(read_mem_arg(cur)?),
        0x2A => F32Load(read_mem_arg(cur)?),
        0x2B => F64Load(read_mem_arg(cur)?),
        0x2C => I32Load8S(read_mem_arg(cur)?),
        0x2D => I32Load8U(read_mem_arg(cur)?),
        0x2E => I32Load16S(read_mem_arg(cur)?),
        0x2F => I32Load16U(read_mem_arg(cur)?),
        0x30 => I64Load8S(read_mem_arg(cur)?),
        0x31 => I64Load8U(read_mem_arg(cur)?),
        0x32 => I64Load16S(read_mem_arg(cur)?),
        0x33 => I64Load16U(read_mem_arg(cur)?),
        0x34 => I64Load32S(read_mem_arg(cur)?),
        0x35 => I64Load32U(read_mem_arg(cur)?),
        0x36 => I32Store(read_mem_arg(cur)?),
        0x37 => I64Store(read_mem_arg(cur)?),
        0x38 => F32Store(read_mem_arg(cur)?),
        0x39 => F64Store(read_mem_arg(cur)?),
        0x3A => I32Store8(read_mem_arg(cur)?),
        0x3B => I32Store16(read_mem_arg(cur)?),
        0x3C => I64Store8(read_mem_arg(cur)?),
        0x3D => I64Store16(read_mem_arg(cur)?),
        0x3E => I64Store32(read_mem_arg(cur)?),
        op::MEMORY_SIZE => {
            cur.expect_u8(0x00, "0x00 (memory.size reserved byte)")?;
            MemorySize
        }
        op::MEMORY_GROW => {
            cur.expect_u8(0x00, "0x00 (memory.grow reserved byte)")?;
            MemoryGrow
        }

        op::I32_CONST => I32Const(leb128::read_sleb_i32(cur)?),
        op::I64_CONST => I64Const(leb128::read_sleb_i64(cur)?),
        op::F32_CONST => F32Const(read_f32_bits(cur)?),
        op::F64_CONST => F64Const(read_f64_bits(cur)?),

        0x45 => I32Eqz,
        0x46 => I32Eq,
        0x47 => I32Ne,
        0x48 => I32LtS,
        0x49 => I32LtU,
        0x4A => I32GtS,
        0x4B => I32GtU,
        0x4C => I32LeS,
        0x4D => I32LeU,
        0x4E => I32GeS,
        0x4F => I32GeU,

        0x50 => I64Eqz,
        0x51 => I64Eq,
        0x52 => I64Ne,
        0x53 => I64LtS,
        0x54 => I64LtU,
        0x55 => I64GtS,
        0x56 => I64GtU,
        0x57 => I64LeS,
        0x58 => I64LeU,
        0x59 => I64GeS,
        0x5A => I64GeU,

        0x5B => F32Eq,
        0x5C => F32Ne,
        0x5D => F32Lt,
        0x5E => F32Gt,
        0x5F => F32Le,
        0x60 => F32Ge,

        0x61 => F64Eq,
        0x62 => F64Ne,
        0x63 => F64Lt,
        0x64 => F64Gt,
        0x65 => F64Le,
        0x66 => F64Ge,

        0x67 => I32Clz,
        0x68 => I32Ctz,
        0x69 => I32Popcnt,
        0x6A => I32Add,
        0x6B => I32Sub,
        0x6C => I32Mul,
        0x6D => I32DivS,
        0x6E => I32DivU,
        0x6F => I32RemS,
        0x70 => I32RemU,
        0x71 => I32And,
        0x72 => I32Or,
        0x73 => I32Xor,
        0x74 => I32Shl,
        0x75 => I32ShrS,
        0x76 => I32ShrU,
        0x77 => I32Rotl,
        0x78 => I32Rotr,

        0x79 => I64Clz,
        0x7A => I64Ctz,
        0x7B => I64Popcnt,
        0x7C => I64Add,
        0x7D => I64Sub,
        0x7E => I64Mul,
        0x7F => I64DivS,
        0x80 => I64DivU,
        0x81 => I64RemS,
        0x82 => I64RemU,
        0x83 => I64And,
        0x84 => I64Or,
        0x85 => I64Xor,
        0x86 => I64Shl,
        0x87 => I64ShrS,
        0x88 => I64ShrU,
        0x89 => I64Rotl,
        0x8A => I64Rotr,

        0x8B => F32Abs,
        0x8C => F32Neg,
        0x8D => F32Ceil,
        0x8E => F32Floor,
        0x8F => F32Trunc,
        0x90 => F32Nearest,
        0x91 => F32Sqrt,
        0x92 => F32Add,
        0x93 => F32Sub,
        0x94 => F32Mul,
        0x95 => F32Div,
        0x96 => F32Min,
        0x97 => F32Max,
        0x98 => F32Copysign,

        0x99 => F64Abs,
        0x9A => F64Neg,
        0x9B => F64Ceil,
        0x9C => F64Floor,
        0x9D => F64Trunc,
        0x9E => F64Nearest,
        0x9F => F64Sqrt,
        0xA0 => F64Add,
        0xA1 => F64Sub,
        0xA2 => F64Mul,
        0xA3 => F64Div,
        0xA4 => F64Min,
        0xA5 => F64Max,
        0xA6 => F64Copysign,

        0xA7 => I32WrapI64,
        0xA8 => I32TruncF32S,
        0xA9 => I32TruncF32U,
        0xAA => I32TruncF64S,
        0xAB => I32TruncF64U,
        0xAC => I64ExtendI32S,
        0xAD => I64ExtendI32U,
        0xAE => I64TruncF32S,
        0xAF => I64TruncF32U,
        0xB0 => I64TruncF64S,
        0xB1 => I64TruncF64U,
        0xB2 => F32ConvertI32S,
        0xB3 => F32ConvertI32U,
        0xB4 => F32ConvertI64S,
        0xB5 => F32ConvertI64U,
        0xB6 => F32DemoteF64,
        0xB7 => F64ConvertI32S,
        0xB8 => F64ConvertI32U,
        0xB9 => F64ConvertI64S,
        0xBA => F64ConvertI64U,
        0xBB => F64PromoteF32,
        0xBC => I32ReinterpretF32,
        0xBD => I64ReinterpretF64,
        0xBE => F32ReinterpretI32,
        0xBF => F64ReinterpretI64,

        found => {
            return Err(DecodeError::Unexpected {
                found,
                expected: "opcode",
                offset,
            })
        }
    })
}
