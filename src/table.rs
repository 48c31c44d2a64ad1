//! Function-reference and extern-reference tables, and the element
//! segments that initialise them.
//!
//! All operations range-check with [`TrapReason::OutOfBounds`] and validate
//! fully before mutating, so a trapping operation leaves the table intact.

use crate::reference::{ExternRef, FuncRef, FuncTypeId, RawFunc};
use crate::trap::TrapReason;

use core::ptr;

/// One element-segment expression, evaluated at instantiation.
///
/// `instance_offset` is the byte offset into the owning module's instance
/// record where the relevant value lives: for `RefFunc` the defining
/// module's instance pointer, for `GlobalGet` the source funcref global.
#[derive(Debug, Clone, Copy)]
pub enum ElemExpr {
    /// A reference to a statically known function.
    RefFunc {
        /// Interned type descriptor of the referenced function.
        func_type: FuncTypeId,
        /// Entry point.
        func: RawFunc,
        /// Tail-call entry point.
        tail_callee: RawFunc,
        /// Offset of the defining module's instance within the record.
        instance_offset: usize,
    },
    /// The null funcref.
    RefNull,
    /// The current value of a funcref global.
    GlobalGet {
        /// Offset of the global within the instance record.
        instance_offset: usize,
    },
}

/// A table of function references.
#[derive(Debug, Clone)]
pub struct FuncRefTable {
    data: Vec<FuncRef>,
    max_size: u32,
}

/// A table of opaque external references.
#[derive(Debug, Clone)]
pub struct ExternRefTable {
    data: Vec<ExternRef>,
    max_size: u32,
}

/// `i ≥ size` or `d + n > size` style checks, shared by both table kinds.
#[inline]
fn table_range_check(size: usize, d: u32, n: u32) -> Result<(), TrapReason> {
    if d as u64 + n as u64 > size as u64 {
        return Err(TrapReason::OutOfBounds);
    }
    Ok(())
}

impl FuncRefTable {
    /// Create a table of `size` null entries, capped at `max_size`.
    pub fn new(size: u32, max_size: u32) -> Self {
        Self {
            data: vec![FuncRef::NULL; size as usize],
            max_size,
        }
    }

    /// Current element count.
    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }

    /// Maximum element count the allocator may grow this table to.
    pub const fn max_size(&self) -> u32 {
        self.max_size
    }

    /// All entries, for dispatch and introspection.
    pub fn entries(&self) -> &[FuncRef] {
        self.data.as_slice()
    }

    /// `table.get`
    pub fn get(&self, idx: u32) -> Result<FuncRef, TrapReason> {
        self.data
            .get(idx as usize)
            .copied()
            .ok_or(TrapReason::OutOfBounds)
    }

    /// `table.set`
    pub fn set(&mut self, idx: u32, value: FuncRef) -> Result<(), TrapReason> {
        *self.data.get_mut(idx as usize).ok_or(TrapReason::OutOfBounds)? = value;
        Ok(())
    }

    /// `table.fill`
    pub fn fill(&mut self, d: u32, value: FuncRef, n: u32) -> Result<(), TrapReason> {
        table_range_check(self.data.len(), d, n)?;
        self.data[d as usize..d as usize + n as usize].fill(value);
        Ok(())
    }

    /// `table.copy` within one table. Overlap-safe.
    pub fn copy_within(&mut self, d: u32, s: u32, n: u32) -> Result<(), TrapReason> {
        table_range_check(self.data.len(), d, n)?;
        table_range_check(self.data.len(), s, n)?;
        self.data
            .copy_within(s as usize..s as usize + n as usize, d as usize);
        Ok(())
    }

    /// `table.copy` between two distinct tables.
    pub fn copy_from(&mut self, src: &FuncRefTable, d: u32, s: u32, n: u32) -> Result<(), TrapReason> {
        table_range_check(self.data.len(), d, n)?;
        table_range_check(src.data.len(), s, n)?;
        self.data[d as usize..d as usize + n as usize]
            .copy_from_slice(&src.data[s as usize..s as usize + n as usize]);
        Ok(())
    }

    /// `table.init`: evaluate `exprs[s..s + n]` into the table at `d`.
    ///
    /// # Safety
    ///
    /// `instance` must point at the instance record the segment's offsets
    /// were computed against: every `RefFunc.instance_offset` stays within
    /// the record, and every `GlobalGet.instance_offset` addresses an
    /// initialised funcref global.
    pub unsafe fn init(
        &mut self,
        exprs: &[ElemExpr],
        d: u32,
        s: u32,
        n: u32,
        instance: *mut u8,
    ) -> Result<(), TrapReason> {
        if s as u64 + n as u64 > exprs.len() as u64 {
            return Err(TrapReason::OutOfBounds);
        }
        table_range_check(self.data.len(), d, n)?;

        let src = &exprs[s as usize..s as usize + n as usize];
        for (slot, expr) in self.data[d as usize..d as usize + n as usize]
            .iter_mut()
            .zip(src)
        {
            *slot = match *expr {
                ElemExpr::RefNull => FuncRef::NULL,
                ElemExpr::RefFunc {
                    func_type,
                    func,
                    tail_callee,
                    instance_offset,
                } => FuncRef {
                    func_type,
                    func,
                    tail_callee,
                    instance: instance.add(instance_offset),
                },
                ElemExpr::GlobalGet { instance_offset } => {
                    ptr::read(instance.add(instance_offset) as *const FuncRef)
                }
            };
        }

        tracing::trace!(d, s, n, "funcref table initialised from element segment");
        Ok(())
    }
}

impl ExternRefTable {
    /// Create a table of `size` null entries, capped at `max_size`.
    pub fn new(size: u32, max_size: u32) -> Self {
        Self {
            data: vec![ExternRef::NULL; size as usize],
            max_size,
        }
    }

    /// Current element count.
    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }

    /// Maximum element count the allocator may grow this table to.
    pub const fn max_size(&self) -> u32 {
        self.max_size
    }

    /// `table.get`
    pub fn get(&self, idx: u32) -> Result<ExternRef, TrapReason> {
        self.data
            .get(idx as usize)
            .copied()
            .ok_or(TrapReason::OutOfBounds)
    }

    /// `table.set`
    pub fn set(&mut self, idx: u32, value: ExternRef) -> Result<(), TrapReason> {
        *self.data.get_mut(idx as usize).ok_or(TrapReason::OutOfBounds)? = value;
        Ok(())
    }

    /// `table.fill`
    pub fn fill(&mut self, d: u32, value: ExternRef, n: u32) -> Result<(), TrapReason> {
        table_range_check(self.data.len(), d, n)?;
        self.data[d as usize..d as usize + n as usize].fill(value);
        Ok(())
    }

    /// `table.copy` within one table. Overlap-safe.
    pub fn copy_within(&mut self, d: u32, s: u32, n: u32) -> Result<(), TrapReason> {
        table_range_check(self.data.len(), d, n)?;
        table_range_check(self.data.len(), s, n)?;
        self.data
            .copy_within(s as usize..s as usize + n as usize, d as usize);
        Ok(())
    }

    /// `table.copy` between two distinct tables.
    pub fn copy_from(&mut self, src: &ExternRefTable, d: u32, s: u32, n: u32) -> Result<(), TrapReason> {
        table_range_check(self.data.len(), d, n)?;
        table_range_check(src.data.len(), s, n)?;
        self.data[d as usize..d as usize + n as usize]
            .copy_from_slice(&src.data[s as usize..s as usize + n as usize]);
        Ok(())
    }

    /// `table.init`: externref segments only carry null expressions in this
    /// runtime, so initialisation writes nulls.
    pub fn init(&mut self, seg_len: u32, d: u32, s: u32, n: u32) -> Result<(), TrapReason> {
        if s as u64 + n as u64 > seg_len as u64 {
            return Err(TrapReason::OutOfBounds);
        }
        table_range_check(self.data.len(), d, n)?;

        self.data[d as usize..d as usize + n as usize].fill(ExternRef::NULL);
        Ok(())
    }
}
