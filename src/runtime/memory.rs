//! Linear memory instance (MVP, 32-bit index space): page-based growth and
//! bounds-checked little-endian access for the execution engine.

use crate::model::MemoryType;

/// WASM page size in bytes (64 KiB).
pub const PAGE_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct MemoryInstance {
    buf: Vec<u8>,
    max: Option<u32>, // pages
}

impl MemoryInstance {
    /// Create a memory of `limits.min` pages, zero-filled. The allocator
    /// never writes contents; data-segment commits belong to the engine.
    pub fn new(ty: &MemoryType) -> Self {
        Self {
            buf: vec![0; ty.limits.min as usize * PAGE_SIZE],
            max: ty.limits.max,
        }
    }

    /// Current size in pages.
    pub fn size_pages(&self) -> u32 {
        (self.buf.len() / PAGE_SIZE) as u32
    }

    /// Grow by delta pages. Returns previous size, or None past the max.
    pub fn grow(&mut self, delta_pages: u32) -> Option<u32> {
        let prev = self.size_pages();
        let new = prev.saturating_add(delta_pages);
        if let Some(max) = self.max {
            if new > max {
                return None;
            }
        }
        self.buf.resize(new as usize * PAGE_SIZE, 0);
        Some(prev)
    }

    pub fn data(&self) -> &[u8] {
        &self.buf
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /* ===== Bounds-checked little-endian access ===== */

    fn load<const N: usize>(&self, addr: u32) -> Result<[u8; N], ()> {
        let start = addr as usize;
        let end = start.checked_add(N).ok_or(())?;
        let bytes = self.buf.get(start..end).ok_or(())?;
        Ok(bytes.try_into().expect("slice length equals N"))
    }

    fn store<const N: usize>(&mut self, addr: u32, bytes: [u8; N]) -> Result<(), ()> {
        let start = addr as usize;
        let end = start.checked_add(N).ok_or(())?;
        self.buf
            .get_mut(start..end)
            .ok_or(())?
            .copy_from_slice(&bytes);
        Ok(())
    }

    pub fn load_u8(&self, addr: u32) -> Result<u8, ()> {
        self.load::<1>(addr).map(|b| b[0])
    }
    pub fn load_u16(&self, addr: u32) -> Result<u16, ()> {
        self.load(addr).map(u16::from_le_bytes)
    }
    pub fn load_u32(&self, addr: u32) -> Result<u32, ()> {
        self.load(addr).map(u32::from_le_bytes)
    }
    pub fn load_u64(&self, addr: u32) -> Result<u64, ()> {
        self.load(addr).map(u64::from_le_bytes)
    }
    pub fn load_i8(&self, addr: u32) -> Result<i8, ()> {
        self.load_u8(addr).map(|v| v as i8)
    }
    pub fn load_i16(&self, addr: u32) -> Result<i16, ()> {
        self.load_u16(addr).map(|v| v as i16)
    }
    pub fn load_i32(&self, addr: u32) -> Result<i32, ()> {
        self.load_u32(addr).map(|v| v as i32)
    }
    pub fn load_i64(&self, addr: u32) -> Result<i64, ()> {
        self.load_u64(addr).map(|v| v as i64)
    }

    pub fn store_u8(&mut self, addr: u32, v: u8) -> Result<(), ()> {
        self.store(addr, [v])
    }
    pub fn store_u16(&mut self, addr: u32, v: u16) -> Result<(), ()> {
        self.store(addr, v.to_le_bytes())
    }
    pub fn store_u32(&mut self, addr: u32, v: u32) -> Result<(), ()> {
        self.store(addr, v.to_le_bytes())
    }
    pub fn store_u64(&mut self, addr: u32, v: u64) -> Result<(), ()> {
        self.store(addr, v.to_le_bytes())
    }

    // Floating-point access works on raw bit patterns (NaN payloads preserved).
    pub fn load_f32_bits(&self, addr: u32) -> Result<u32, ()> {
        self.load_u32(addr)
    }
    pub fn store_f32_bits(&mut self, addr: u32, bits: u32) -> Result<(), ()> {
        self.store_u32(addr, bits)
    }
    pub fn load_f64_bits(&self, addr: u32) -> Result<u64, ()> {
        self.load_u64(addr)
    }
    pub fn store_f64_bits(&mut self, addr: u32, bits: u64) -> Result<(), ()> {
        self.store_u64(addr, bits)
    }
}
