//! Indirect call checking and dispatch.

use crate::reference::{FuncRef, FuncTypeId, RawFunc};
use crate::table::FuncRefTable;
use crate::trap::TrapReason;

use core::mem;

/// Function-type descriptor equality: pointer identity, or bytewise
/// equality of two non-null descriptors.
#[inline]
pub fn func_types_eq(a: FuncTypeId, b: FuncTypeId) -> bool {
    a.matches(b)
}

/// The `call_indirect` check: traps with
/// [`TrapReason::IndirectCallMismatch`] when `idx` is out of range, the
/// entry is null, or its type doesn't match `expected`. On success the
/// entry is ready for dispatch.
#[inline]
pub fn checked_funcref(
    table: &FuncRefTable,
    expected: FuncTypeId,
    idx: u32,
) -> Result<&FuncRef, TrapReason> {
    let entry = table
        .entries()
        .get(idx as usize)
        .ok_or(TrapReason::IndirectCallMismatch)?;
    if entry.is_null() || !func_types_eq(expected, entry.func_type) {
        return Err(TrapReason::IndirectCallMismatch);
    }
    Ok(entry)
}

/// `call_indirect`: check the entry and cast its entry point to the
/// concrete function-pointer type `F`, returning it with the callee's
/// instance record for the caller to invoke.
///
/// # Safety
///
/// `F` must be the function-pointer type the ahead-of-time translator
/// derived from `expected`; a matching descriptor guarantees the stored
/// entry point has that signature.
#[inline]
pub unsafe fn call_indirect<F: Copy>(
    table: &FuncRefTable,
    expected: FuncTypeId,
    idx: u32,
) -> Result<(F, *mut u8), TrapReason> {
    assert!(mem::size_of::<F>() == mem::size_of::<RawFunc>());

    let entry = checked_funcref(table, expected, idx)?;
    let func = mem::transmute_copy::<RawFunc, F>(&entry.func);
    Ok((func, entry.instance))
}
