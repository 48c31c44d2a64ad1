//! Segmented-memory fast path: one distinguished linear memory addressed
//! through the `gs` segment base.
//!
//! When the enabling conditions hold (single unshared memory, little-endian
//! x86-64 host, OS preserving the segment base across context switches),
//! the memory's data pointer is programmed into `gs` once and generated
//! code addresses `gs:[addr]` instead of reloading the base per access.
//! Bounds and endian invariants are unchanged; switching this on changes
//! performance only.

use crate::memory::LinearMemory;

use core::arch::asm;
use core::sync::atomic::{AtomicBool, Ordering};

/// Whether the host CPU and kernel expose the `wrgsbase`/`rdgsbase`
/// instructions to user space. Set once by the embedder at startup; when
/// false, the syscall shims are used instead.
pub static FSGSBASE_INST_SUPPORTED: AtomicBool = AtomicBool::new(false);

extern "C" {
    fn set_segue_base(base: *mut u8);
    fn get_segue_base() -> *mut u8;
}

/// Program the `gs` base with the distinguished memory's data pointer.
///
/// # Safety
///
/// The caller owns the `gs` register for the lifetime of the installation;
/// nothing else on this thread may repurpose it.
pub unsafe fn install_base(base: *mut u8) {
    if FSGSBASE_INST_SUPPORTED.load(Ordering::Relaxed) {
        asm!("wrgsbase {0}", in(reg) base, options(nostack, preserves_flags));
    } else {
        set_segue_base(base);
    }
    tracing::debug!(?base, "segment base installed");
}

/// Read back the programmed `gs` base.
///
/// # Safety
///
/// `install_base` must have run on this thread.
pub unsafe fn read_base() -> *mut u8 {
    if FSGSBASE_INST_SUPPORTED.load(Ordering::Relaxed) {
        let base: *mut u8;
        asm!("rdgsbase {0}", out(reg) base, options(nostack, preserves_flags));
        base
    } else {
        get_segue_base()
    }
}

/// Verify the programmed base still matches the memory it was taken from.
#[cfg(feature = "sanity-checks")]
pub unsafe fn assert_base(memory: &LinearMemory) {
    assert_eq!(read_base() as *const u8, memory.as_ptr());
}

/// Sanity checks disabled.
#[cfg(not(feature = "sanity-checks"))]
#[inline(always)]
pub unsafe fn assert_base(_memory: &LinearMemory) {}

// Scalar accessors relative to the installed base. The caller upholds the
// bounds contract (guard pages or prior range checks), exactly as for the
// explicit-pointer access primitives.

#[inline(always)]
pub unsafe fn load8(addr: u64) -> u8 {
    let value: u8;
    asm!("mov {v}, gs:[{a}]", v = out(reg_byte) value, a = in(reg) addr,
         options(nostack, preserves_flags, readonly));
    value
}

#[inline(always)]
pub unsafe fn load16(addr: u64) -> u16 {
    let value: u16;
    asm!("mov {v:x}, gs:[{a}]", v = out(reg) value, a = in(reg) addr,
         options(nostack, preserves_flags, readonly));
    value
}

#[inline(always)]
pub unsafe fn load32(addr: u64) -> u32 {
    let value: u32;
    asm!("mov {v:e}, gs:[{a}]", v = out(reg) value, a = in(reg) addr,
         options(nostack, preserves_flags, readonly));
    value
}

#[inline(always)]
pub unsafe fn load64(addr: u64) -> u64 {
    let value: u64;
    asm!("mov {v}, gs:[{a}]", v = out(reg) value, a = in(reg) addr,
         options(nostack, preserves_flags, readonly));
    value
}

#[inline(always)]
pub unsafe fn store8(addr: u64, value: u8) {
    asm!("mov gs:[{a}], {v}", a = in(reg) addr, v = in(reg_byte) value,
         options(nostack, preserves_flags));
}

#[inline(always)]
pub unsafe fn store16(addr: u64, value: u16) {
    asm!("mov gs:[{a}], {v:x}", a = in(reg) addr, v = in(reg) value,
         options(nostack, preserves_flags));
}

#[inline(always)]
pub unsafe fn store32(addr: u64, value: u32) {
    asm!("mov gs:[{a}], {v:e}", a = in(reg) addr, v = in(reg) value,
         options(nostack, preserves_flags));
}

#[inline(always)]
pub unsafe fn store64(addr: u64, value: u64) {
    asm!("mov gs:[{a}], {v}", a = in(reg) addr, v = in(reg) value,
         options(nostack, preserves_flags));
}

// Floats ride the integer accessors' bits.

#[inline(always)]
pub unsafe fn load_f32(addr: u64) -> f32 {
    f32::from_bits(load32(addr))
}

#[inline(always)]
pub unsafe fn load_f64(addr: u64) -> f64 {
    f64::from_bits(load64(addr))
}

#[inline(always)]
pub unsafe fn store_f32(addr: u64, value: f32) {
    store32(addr, value.to_bits());
}

#[inline(always)]
pub unsafe fn store_f64(addr: u64, value: f64) {
    store64(addr, value.to_bits());
}
