//! Runtime support core for ahead-of-time translated WebAssembly modules.
//!
//! The translator emits straight-line calls into the primitives here:
//! linear-memory and table access, numeric operators with trap semantics,
//! and segment initialisation. Fallible primitives return
//! `Result<_, TrapReason>`; generated code threads the result outward with
//! `?` and the embedder recovers at the outermost frame.

#[cfg(all(feature = "unchecked-memory", feature = "guard-pages"))]
compile_error!("unchecked-memory and guard-pages select conflicting memory check modes");

pub mod alu;
pub mod bits;
pub mod call;
pub mod consts;
pub mod float;
pub mod memory;
pub mod reference;
pub mod table;
pub mod trap;

#[cfg(all(feature = "segue", target_arch = "x86_64"))]
pub mod segue;

pub mod prelude {
    //! Everything generated code and embedders import.

    pub use crate::call::{call_indirect, checked_funcref, func_types_eq};
    pub use crate::memory::LinearMemory;
    pub use crate::reference::{ExternRef, FuncRef, FuncTypeId, RawFunc};
    pub use crate::table::{ElemExpr, ExternRefTable, FuncRefTable};
    pub use crate::trap::{enter_function, exit_function, TrapReason};
}
