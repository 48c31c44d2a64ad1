//! Bulk memory operations: fill, copy and data-segment initialisation.
//!
//! These always range-check, in every memory checking mode: the accessed
//! span is attacker-sized, so guard pages don't cover it. Checks run fully
//! before any byte moves; a trapping operation leaves the memory untouched.

use super::LinearMemory;
use crate::trap::TrapReason;

impl LinearMemory {
    /// `memory.fill`: write `n` copies of the byte `val` at `d`.
    pub fn fill(&mut self, d: u64, val: u8, n: u64) -> Result<(), TrapReason> {
        self.range_check(d, n)?;

        // Byte writes are orientation-invariant; only the region flips.
        let range = self.le_range(d as usize, n as usize);
        self.data[range].fill(val);
        Ok(())
    }

    /// `memory.copy` within one memory. Overlap-safe.
    pub fn copy_within(&mut self, d: u64, s: u64, n: u64) -> Result<(), TrapReason> {
        self.range_check(d, n)?;
        self.range_check(s, n)?;

        let dst = self.le_range(d as usize, n as usize);
        let src = self.le_range(s as usize, n as usize);
        self.data.copy_within(src, dst.start);
        Ok(())
    }

    /// `memory.copy` between two distinct memories.
    pub fn copy_from(&mut self, src: &LinearMemory, d: u64, s: u64, n: u64) -> Result<(), TrapReason> {
        self.range_check(d, n)?;
        src.range_check(s, n)?;

        let dst_range = self.le_range(d as usize, n as usize);
        let src_range = src.le_range(s as usize, n as usize);
        self.data[dst_range].copy_from_slice(&src.data[src_range]);
        Ok(())
    }

    /// `memory.init`: copy `segment[s..s + n]` to `d`.
    ///
    /// On big-endian hosts the payload is written byte-reversed so that
    /// subsequent little-endian reads yield the original values.
    pub fn init(&mut self, segment: &[u8], d: u64, s: u32, n: u32) -> Result<(), TrapReason> {
        let seg_end = s as u64 + n as u64;
        if seg_end > segment.len() as u64 {
            return Err(TrapReason::OutOfBounds);
        }
        self.range_check(d, n as u64)?;

        let src = &segment[s as usize..s as usize + n as usize];
        let dst_range = self.le_range(d as usize, n as usize);
        if cfg!(target_endian = "big") {
            for (dst, byte) in self.data[dst_range].iter_mut().zip(src.iter().rev()) {
                *dst = *byte;
            }
        } else {
            self.data[dst_range].copy_from_slice(src);
        }
        Ok(())
    }
}
