//! Sized loads and stores over linear memory, one per WebAssembly opcode.
//!
//! Integer ops move value bits: `u32`/`u64` carry the `i32`/`i64` value
//! types, and the narrow `_s`/`_u` forms sign- or zero-extend into them.
//! Float loads rebuild the value with `from_bits`, which is a bitwise
//! transmute, so stored NaN payloads (signalling ones included) come back
//! identical.

use super::LinearMemory;
use crate::trap::TrapReason;

impl LinearMemory {
    /// Read `N` little-endian bytes at `addr`.
    ///
    /// Under the default checking mode the access is range-checked and
    /// fails with [`TrapReason::OutOfBounds`]. Under `unchecked-memory` or
    /// `guard-pages` the explicit check is elided; an out-of-range access
    /// then surfaces as the host fault, whose conversion to a trap is the
    /// embedder's.
    #[inline]
    fn read_bytes<const N: usize>(&self, addr: u64) -> Result<[u8; N], TrapReason> {
        #[cfg(not(any(feature = "unchecked-memory", feature = "guard-pages")))]
        self.range_check(addr, N as u64)?;

        let at = self.le_offset(addr as usize, N);
        let mut value = [0u8; N];
        value.copy_from_slice(&self.data[at..at + N]);
        Ok(value)
    }

    /// Write `N` little-endian bytes at `addr`. Checking as in `read_bytes`.
    #[inline]
    fn write_bytes<const N: usize>(&mut self, addr: u64, value: [u8; N]) -> Result<(), TrapReason> {
        #[cfg(not(any(feature = "unchecked-memory", feature = "guard-pages")))]
        self.range_check(addr, N as u64)?;

        let at = self.le_offset(addr as usize, N);
        self.data[at..at + N].copy_from_slice(&value);
        Ok(())
    }

    pub fn i32_load(&self, addr: u64) -> Result<u32, TrapReason> {
        Ok(u32::from_ne_bytes(self.read_bytes(addr)?))
    }

    pub fn i64_load(&self, addr: u64) -> Result<u64, TrapReason> {
        Ok(u64::from_ne_bytes(self.read_bytes(addr)?))
    }

    pub fn f32_load(&self, addr: u64) -> Result<f32, TrapReason> {
        Ok(f32::from_bits(u32::from_ne_bytes(self.read_bytes(addr)?)))
    }

    pub fn f64_load(&self, addr: u64) -> Result<f64, TrapReason> {
        Ok(f64::from_bits(u64::from_ne_bytes(self.read_bytes(addr)?)))
    }

    pub fn i32_load8_s(&self, addr: u64) -> Result<u32, TrapReason> {
        Ok(self.read_bytes::<1>(addr)?[0] as i8 as i32 as u32)
    }

    pub fn i32_load8_u(&self, addr: u64) -> Result<u32, TrapReason> {
        Ok(self.read_bytes::<1>(addr)?[0] as u32)
    }

    pub fn i32_load16_s(&self, addr: u64) -> Result<u32, TrapReason> {
        Ok(u16::from_ne_bytes(self.read_bytes(addr)?) as i16 as i32 as u32)
    }

    pub fn i32_load16_u(&self, addr: u64) -> Result<u32, TrapReason> {
        Ok(u16::from_ne_bytes(self.read_bytes(addr)?) as u32)
    }

    pub fn i64_load8_s(&self, addr: u64) -> Result<u64, TrapReason> {
        Ok(self.read_bytes::<1>(addr)?[0] as i8 as i64 as u64)
    }

    pub fn i64_load8_u(&self, addr: u64) -> Result<u64, TrapReason> {
        Ok(self.read_bytes::<1>(addr)?[0] as u64)
    }

    pub fn i64_load16_s(&self, addr: u64) -> Result<u64, TrapReason> {
        Ok(u16::from_ne_bytes(self.read_bytes(addr)?) as i16 as i64 as u64)
    }

    pub fn i64_load16_u(&self, addr: u64) -> Result<u64, TrapReason> {
        Ok(u16::from_ne_bytes(self.read_bytes(addr)?) as u64)
    }

    pub fn i64_load32_s(&self, addr: u64) -> Result<u64, TrapReason> {
        Ok(u32::from_ne_bytes(self.read_bytes(addr)?) as i32 as i64 as u64)
    }

    pub fn i64_load32_u(&self, addr: u64) -> Result<u64, TrapReason> {
        Ok(u32::from_ne_bytes(self.read_bytes(addr)?) as u64)
    }

    pub fn i32_store(&mut self, addr: u64, value: u32) -> Result<(), TrapReason> {
        self.write_bytes(addr, value.to_ne_bytes())
    }

    pub fn i64_store(&mut self, addr: u64, value: u64) -> Result<(), TrapReason> {
        self.write_bytes(addr, value.to_ne_bytes())
    }

    pub fn f32_store(&mut self, addr: u64, value: f32) -> Result<(), TrapReason> {
        self.write_bytes(addr, value.to_bits().to_ne_bytes())
    }

    pub fn f64_store(&mut self, addr: u64, value: f64) -> Result<(), TrapReason> {
        self.write_bytes(addr, value.to_bits().to_ne_bytes())
    }

    pub fn i32_store8(&mut self, addr: u64, value: u32) -> Result<(), TrapReason> {
        self.write_bytes(addr, [value as u8])
    }

    pub fn i32_store16(&mut self, addr: u64, value: u32) -> Result<(), TrapReason> {
        self.write_bytes(addr, (value as u16).to_ne_bytes())
    }

    pub fn i64_store8(&mut self, addr: u64, value: u64) -> Result<(), TrapReason> {
        self.write_bytes(addr, [value as u8])
    }

    pub fn i64_store16(&mut self, addr: u64, value: u64) -> Result<(), TrapReason> {
        self.write_bytes(addr, (value as u16).to_ne_bytes())
    }

    pub fn i64_store32(&mut self, addr: u64, value: u64) -> Result<(), TrapReason> {
        self.write_bytes(addr, (value as u32).to_ne_bytes())
    }
}

#[cfg(test)]
mod tests {
    use crate::memory::LinearMemory;

    #[test]
    fn narrow_loads_extend_per_signedness() {
        let mut mem = LinearMemory::new(16, 16);

        mem.i32_store8(0, 0xff).unwrap();
        assert_eq!(mem.i32_load8_s(0).unwrap(), 0xffff_ffff);
        assert_eq!(mem.i32_load8_u(0).unwrap(), 0xff);

        mem.i32_store16(4, 0x8000).unwrap();
        assert_eq!(mem.i32_load16_s(4).unwrap(), 0xffff_8000);
        assert_eq!(mem.i32_load16_u(4).unwrap(), 0x8000);

        mem.i64_store32(8, 0x8000_0000).unwrap();
        assert_eq!(mem.i64_load32_s(8).unwrap(), 0xffff_ffff_8000_0000);
        assert_eq!(mem.i64_load32_u(8).unwrap(), 0x8000_0000);
    }

    #[test]
    fn stores_truncate_to_access_width() {
        let mut mem = LinearMemory::new(16, 16);

        mem.i32_store(0, 0xdead_beef).unwrap();
        mem.i32_store8(0, 0x1234_5601).unwrap();
        assert_eq!(mem.i32_load(0).unwrap(), 0xdead_be01);

        mem.i64_store(8, u64::MAX).unwrap();
        mem.i64_store16(8, 0xabcd_0000).unwrap();
        assert_eq!(mem.i64_load(8).unwrap(), 0xffff_ffff_ffff_0000);
    }

    #[cfg(not(any(feature = "unchecked-memory", feature = "guard-pages")))]
    #[test]
    fn access_straddling_the_end_traps() {
        use crate::trap::TrapReason;

        let mem = LinearMemory::new(8, 8);
        assert_eq!(mem.i32_load16_u(7), Err(TrapReason::OutOfBounds));
        assert_eq!(mem.i64_load(1), Err(TrapReason::OutOfBounds));
    }
}
