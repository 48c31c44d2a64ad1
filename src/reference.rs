//! Reference values: funcrefs, externrefs and function-type descriptors.

use crate::consts::FUNC_TYPE_ID_SIZE;

use core::ffi::c_void;
use core::ptr;

/// Untyped pointer to a generated function's entry point.
///
/// The ahead-of-time translator knows the concrete signature; the runtime
/// core moves the pointer around and casts it back at the indirect-call
/// boundary.
pub type RawFunc = *const c_void;

/// Handle to a globally interned function-type descriptor.
///
/// Interned descriptors live in `static` pools emitted per module. Two
/// handles are equal iff they point at the same descriptor *or* both are
/// non-null and the descriptor bytes compare equal, which lets indirect
/// calls match across modules linked against distinct pools.
#[derive(Debug, Clone, Copy, Hash)]
pub struct FuncTypeId(Option<&'static [u8; FUNC_TYPE_ID_SIZE]>);

impl FuncTypeId {
    /// The null descriptor handle.
    pub const NULL: Self = Self(None);

    /// Wrap an interned descriptor.
    pub const fn new(id: &'static [u8; FUNC_TYPE_ID_SIZE]) -> Self {
        Self(Some(id))
    }

    /// Whether this is the null handle.
    pub const fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Descriptor equality: pointer identity, or bytewise equality of two
    /// non-null descriptors.
    pub fn matches(self, other: Self) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => ptr::eq(a, b) || a == b,
            (None, None) => true,
            _ => false,
        }
    }
}

impl PartialEq for FuncTypeId {
    fn eq(&self, other: &Self) -> bool {
        self.matches(*other)
    }
}

impl Eq for FuncTypeId {}

/// A function-reference table entry.
#[derive(Debug, Clone, Copy)]
pub struct FuncRef {
    /// Interned type descriptor of the referenced function.
    pub func_type: FuncTypeId,
    /// Entry point; null marks the null funcref.
    pub func: RawFunc,
    /// Tail-call entry point of the same function.
    pub tail_callee: RawFunc,
    /// Instance record of the module that owns the function.
    pub instance: *mut u8,
}

impl FuncRef {
    /// The canonical null funcref.
    pub const NULL: Self = Self {
        func_type: FuncTypeId::NULL,
        func: ptr::null(),
        tail_callee: ptr::null(),
        instance: ptr::null_mut(),
    };

    /// Whether this entry is the null funcref.
    pub fn is_null(&self) -> bool {
        self.func.is_null()
    }
}

/// An opaque external reference.
///
/// Null is the all-zero bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternRef(*mut c_void);

impl ExternRef {
    /// The null externref.
    pub const NULL: Self = Self(ptr::null_mut());

    /// Wrap a host value.
    pub const fn new(value: *mut c_void) -> Self {
        Self(value)
    }

    /// Whether this is the null externref.
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// The wrapped host value.
    pub const fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TYPE_A: [u8; FUNC_TYPE_ID_SIZE] = [0xab; FUNC_TYPE_ID_SIZE];
    static TYPE_A2: [u8; FUNC_TYPE_ID_SIZE] = [0xab; FUNC_TYPE_ID_SIZE];
    static TYPE_B: [u8; FUNC_TYPE_ID_SIZE] = [0xcd; FUNC_TYPE_ID_SIZE];

    #[test]
    fn type_equality_crosses_interned_pools() {
        let a = FuncTypeId::new(&TYPE_A);
        let a2 = FuncTypeId::new(&TYPE_A2);
        let b = FuncTypeId::new(&TYPE_B);

        assert_eq!(a, a);
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_ne!(a, FuncTypeId::NULL);
        assert_eq!(FuncTypeId::NULL, FuncTypeId::NULL);
    }

    #[test]
    fn null_funcref_has_null_entry_point() {
        assert!(FuncRef::NULL.is_null());
        assert!(ExternRef::NULL.is_null());
    }
}
