//! Section framing and the top-level module parser: per-section id + size
//! envelopes, strict ordering of standard sections, custom-section
//! passthrough, and the function/code zip.

use super::{
    cursor::Cursor,
    instr::read_expr,
    leb128,
    reader::{read_len_prefixed_bytes, read_name, read_vec},
    types::{read_func_type, read_global_type, read_memory_type, read_table_type, read_val_type},
    DecodeError, Result,
};
use crate::model::{
    CustomSection, DataSegment, ElementSegment, Export, ExportDesc, Expr, FuncIdx, FuncType,
    Function, Global, Import, ImportDesc, Module, TypeIdx, ValType,
};

/// Standard section identifiers in the WASM binary format (MVP).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
    Custom = 0,
    Type = 1,
    Import = 2,
    Function = 3,
    Table = 4,
    Memory = 5,
    Global = 6,
    Export = 7,
    Start = 8,
    Element = 9,
    Code = 10,
    Data = 11,
}

impl SectionId {
    pub fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            0 => SectionId::Custom,
            1 => SectionId::Type,
            2 => SectionId::Import,
            3 => SectionId::Function,
            4 => SectionId::Table,
            5 => SectionId::Memory,
            6 => SectionId::Global,
            7 => SectionId::Export,
            8 => SectionId::Start,
            9 => SectionId::Element,
            10 => SectionId::Code,
            11 => SectionId::Data,
            _ => return None,
        })
    }
}

/// Header describing a section's id, payload length, and the payload start offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub id: SectionId,
    pub payload_len: u32,
    pub payload_offset: usize,
}

/// Read a section header: id (u8) + payload_len (ULEB128).
pub fn read_section_header(cur: &mut Cursor) -> Result<SectionHeader> {
    let id_offset = cur.offset();
    let id_byte = cur.read_u8()?;
    let id = SectionId::from_byte(id_byte).ok_or(DecodeError::Unexpected {
        found: id_byte,
        expected: "section id (0..=11)",
        offset: id_offset,
    })?;
    let payload_len = leb128::read_uleb_u32(cur)?;
    let payload_offset = cur.offset();
    Ok(SectionHeader {
        id,
        payload_len,
        payload_offset,
    })
}

/* ---------- Section payload readers ---------- */

fn read_type_section(cur: &mut Cursor) -> Result<Vec<FuncType>> {
    read_vec(cur, read_func_type)
}

fn read_import_section(cur: &mut Cursor) -> Result<(Vec<Import>, u32, u32, u32, u32)> {
    let mut funcs = 0u32;
    let mut tables = 0u32;
    let mut mems = 0u32;
    let mut globals = 0u32;

    let imports = read_vec(cur, |c| {
        let module = read_name(c)?;
        let name = read_name(c)?;
        let kind_offset = c.offset();
        let desc = match c.read_u8()? {
            0x00 => {
                funcs += 1;
                ImportDesc::Func(leb128::read_uleb_u32(c)?)
            }
            0x01 => {
                tables += 1;
                ImportDesc::Table(read_table_type(c)?)
            }
            0x02 => {
                mems += 1;
                ImportDesc::Memory(read_memory_type(c)?)
            }
            0x03 => {
                globals += 1;
                ImportDesc::Global(read_global_type(c)?)
            }
            found => {
                return Err(DecodeError::Unexpected {
                    found,
                    expected: "import desc tag (0x00..=0x03)",
                    offset: kind_offset,
                })
            }
        };
        Ok(Import { module, name, desc })
    })?;
    Ok((imports, funcs, tables, mems, globals))
}

fn read_function_section(cur: &mut Cursor) -> Result<Vec<TypeIdx>> {
    read_vec(cur, leb128::read_uleb_u32)
}

fn read_global_section(cur: &mut Cursor) -> Result<Vec<Global>> {
    read_vec(cur, |c| {
        let ty = read_global_type(c)?;
        let init = read_expr(c)?;
        Ok(Global { ty, init })
    })
}

fn read_export_section(cur: &mut Cursor) -> Result<Vec<Export>> {
    read_vec(cur, |c| {
        let name = read_name(c)?;
        let kind_offset = c.offset();
        let desc = match c.read_u8()? {
            0x00 => ExportDesc::Func(leb128::read_uleb_u32(c)?),
            0x01 => ExportDesc::Table(leb128::read_uleb_u32(c)?),
            0x02 => ExportDesc::Memory(leb128::read_uleb_u32(c)?),
            0x03 => ExportDesc::Global(leb128::read_uleb_u32(c)?),
            found => {
                return Err(DecodeError::Unexpected {
                    found,
                    expected: "export desc tag (0x00..=0x03)",
                    offset: kind_offset,
                })
            }
        };
        Ok(Export { name, desc })
    })
}

fn read_element_section(cur: &mut Cursor) -> Result<Vec<ElementSegment>> {
    read_vec(cur, |c| {
        let table = leb128::read_uleb_u32(c)?;
        let offset = read_expr(c)?;
        let init = read_vec(c, leb128::read_uleb_u32)?;
        Ok(ElementSegment { table, offset, init })
    })
}

/// One decoded code entry: expanded locals plus the body expression.
#[derive(Debug)]
struct CodeEntry {
    locals: Vec<ValType>,
    body: Expr,
}

fn read_code_section(cur: &mut Cursor) -> Result<Vec<CodeEntry>> {
    read_vec(cur, |c| {
        let declared = leb128::read_uleb_u32(c)?;
        let entry_offset = c.offset();
        let body_bytes = c.read_bytes(declared as usize)?;
        let mut sub = Cursor::new(body_bytes);

        // locals: vec of (count, valtype) groups, expanded in order
        let groups = read_vec(&mut sub, |s| {
            let count = leb128::read_uleb_u32(s)?;
            let val_type = read_val_type(s)?;
            Ok((count, val_type))
        })?;
        let mut locals = Vec::new();
        for (count, val_type) in groups {
            locals.extend(std::iter::repeat(val_type).take(count as usize));
        }

        let body = read_expr(&mut sub)?;
        if !sub.is_eof() {
            return Err(DecodeError::InvalidSectionSize {
                declared,
                actual: sub.offset() as u32,
                position: entry_offset,
            });
        }
        Ok(CodeEntry { locals, body })
    })
}

fn read_data_section(cur: &mut Cursor) -> Result<Vec<DataSegment>> {
    read_vec(cur, |c| {
        let memory = leb128::read_uleb_u32(c)?;
        let offset = read_expr(c)?;
        let init = read_len_prefixed_bytes(c)?;
        Ok(DataSegment { memory, offset, init })
    })
}

/// Custom section body: name then opaque bytes. A payload whose name does not
/// decode is discarded whole; the envelope size has already bounded it.
fn read_custom_section(payload: &[u8]) -> Option<CustomSection> {
    let mut cur = Cursor::new(payload);
    let name = read_name(&mut cur).ok()?;
    let data = payload[cur.offset()..].to_vec();
    Some(CustomSection { name, data })
}

/* ---------- Top-level module parser ---------- */

/// Parse a complete module from raw bytes. The stream must contain exactly one
/// module: preamble, then sections in strictly increasing id order (custom
/// sections may appear anywhere).
pub fn parse_module_from_bytes(bytes: &[u8]) -> Result<Module> {
    let mut cur = Cursor::new(bytes);

    // Magic "\0asm" and version 1, byte-for-byte.
    for b in [0x00u8, 0x61, 0x73, 0x6D] {
        cur.expect_u8(b, "magic preamble \\0asm")?;
    }
    for b in [0x01u8, 0x00, 0x00, 0x00] {
        cur.expect_u8(b, "version 1")?;
    }

    let mut module = Module::default();
    let mut func_type_indices: Vec<TypeIdx> = Vec::new();
    let mut codes: Vec<CodeEntry> = Vec::new();
    let mut has_function_section = false;
    let mut has_code_section = false;
    let mut last_id: u8 = 0;

    while !cur.is_eof() {
        let header_offset = cur.offset();
        let header = read_section_header(&mut cur)?;
        let payload = cur.read_bytes(header.payload_len as usize)?;

        if header.id == SectionId::Custom {
            if let Some(custom) = read_custom_section(payload) {
                module.customs.push(custom);
            }
            continue;
        }

        // Standard sections: strictly increasing ids (subsumes the
        // at-most-once rule).
        let id = header.id as u8;
        if id <= last_id {
            return Err(DecodeError::SectionOrder {
                seen: last_id,
                current: id,
                offset: header_offset,
            });
        }
        last_id = id;

        let mut pcur = Cursor::new(payload);
        match header.id {
            SectionId::Custom => unreachable!("handled above"),
            SectionId::Type => module.types = read_type_section(&mut pcur)?,
            SectionId::Import => {
                let (imports, f, t, m, g) = read_import_section(&mut pcur)?;
                module.imports = imports;
                module.imported_funcs = f;
                module.imported_tables = t;
                module.imported_memories = m;
                module.imported_globals = g;
            }
            SectionId::Function => {
                func_type_indices = read_function_section(&mut pcur)?;
                has_function_section = true;
            }
            SectionId::Table => module.tables = read_vec(&mut pcur, read_table_type)?,
            SectionId::Memory => module.memories = read_vec(&mut pcur, read_memory_type)?,
            SectionId::Global => module.globals = read_global_section(&mut pcur)?,
            SectionId::Export => module.exports = read_export_section(&mut pcur)?,
            SectionId::Start => module.start = Some(leb128::read_uleb_u32(&mut pcur)? as FuncIdx),
            SectionId::Element => module.elements = read_element_section(&mut pcur)?,
            SectionId::Code => {
                codes = read_code_section(&mut pcur)?;
                has_code_section = true;
            }
            SectionId::Data => module.data = read_data_section(&mut pcur)?,
        }

        // Declared size must equal the bytes the body actually consumed.
        if pcur.offset() != payload.len() {
            return Err(DecodeError::InvalidSectionSize {
                declared: header.payload_len,
                actual: pcur.offset() as u32,
                position: header.payload_offset,
            });
        }
    }

    // Zip function-section type indices with code-section bodies.
    if has_function_section != has_code_section || func_type_indices.len() != codes.len() {
        return Err(DecodeError::FunctionCodeMismatch {
            funcs: func_type_indices.len(),
            codes: codes.len(),
        });
    }
    module.funcs = func_type_indices
        .into_iter()
        .zip(codes)
        .map(|(type_idx, entry)| Function {
            type_idx,
            locals: entry.locals,
            body: entry.body,
        })
        .collect();

    Ok(module)
}
