//! Trap taxonomy and call-depth accounting.
//!
//! A trap is an immediate non-local exit from generated code. Primitives
//! signal it by returning `Err(TrapReason)`; generated functions thread the
//! result outward with `?` and the embedder is the only recovery boundary.
//! No primitive catches or translates a trap.

use thiserror::Error;

#[cfg(feature = "stack-depth-limit")]
use std::cell::Cell;
#[cfg(feature = "stack-depth-limit")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "stack-depth-limit")]
use crate::consts::DEFAULT_MAX_CALL_DEPTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
/// Trap kind representation for the runtime core.
///
/// The discriminant is the stable embedder-level identifier; the message is
/// informational only.
pub enum TrapReason {
    /// The byte can't be mapped to any known `TrapReason`.
    #[error("unknown trap reason")]
    UnknownTrapReason = 0x00,
    /// Attempt to access a linear memory or table outside its bounds.
    #[error("out of bounds memory or table access")]
    OutOfBounds = 0x01,
    /// Overflow while executing an arithmetic operation or a trapping
    /// float-to-integer conversion.
    #[error("integer overflow")]
    IntegerOverflow = 0x02,
    /// Integer division or remainder with a zero divisor.
    #[error("integer division by zero")]
    DivisionByZero = 0x03,
    /// Float-to-integer conversion of a NaN.
    #[error("invalid conversion to integer")]
    InvalidConversion = 0x04,
    /// Found `unreachable` instruction.
    #[error("unreachable code executed")]
    Unreachable = 0x05,
    /// Indirect call through a null or type-incompatible table entry.
    #[error("indirect call type mismatch")]
    IndirectCallMismatch = 0x06,
    /// The generated-function call depth exceeded its ceiling.
    #[error("call stack exhausted")]
    CallStackExhausted = 0x07,
}

impl From<u8> for TrapReason {
    /// Converts the `u8` into a `TrapReason`.
    fn from(b: u8) -> Self {
        use TrapReason::*;
        match b {
            0x01 => OutOfBounds,
            0x02 => IntegerOverflow,
            0x03 => DivisionByZero,
            0x04 => InvalidConversion,
            0x05 => Unreachable,
            0x06 => IndirectCallMismatch,
            0x07 => CallStackExhausted,
            _ => UnknownTrapReason,
        }
    }
}

/// The `unreachable` opcode.
#[inline(always)]
pub fn unreachable<T>() -> Result<T, TrapReason> {
    Err(TrapReason::Unreachable)
}

#[cfg(feature = "stack-depth-limit")]
static MAX_CALL_DEPTH: AtomicU32 = AtomicU32::new(DEFAULT_MAX_CALL_DEPTH);

#[cfg(feature = "stack-depth-limit")]
thread_local! {
    static CALL_DEPTH: Cell<u32> = Cell::new(0);
}

/// Account one generated-function entry.
///
/// Traps with [`TrapReason::CallStackExhausted`] when the per-thread depth
/// would exceed the configured ceiling. Every generated function calls this
/// on entry and [`exit_function`] on exit; after any successful call the
/// counter equals its pre-call value.
#[cfg(feature = "stack-depth-limit")]
#[inline]
pub fn enter_function() -> Result<(), TrapReason> {
    CALL_DEPTH.with(|depth| {
        let next = depth.get().saturating_add(1);
        if next > MAX_CALL_DEPTH.load(Ordering::Relaxed) {
            return Err(TrapReason::CallStackExhausted);
        }
        depth.set(next);
        Ok(())
    })
}

/// Account one generated-function exit.
#[cfg(feature = "stack-depth-limit")]
#[inline]
pub fn exit_function() {
    CALL_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
}

/// Current per-thread call depth.
#[cfg(feature = "stack-depth-limit")]
pub fn call_depth() -> u32 {
    CALL_DEPTH.with(Cell::get)
}

/// Reset the per-thread call depth to zero.
///
/// A trap unwinds past the `exit_function` calls of the abandoned frames, so
/// the embedder resets the counter after catching one.
#[cfg(feature = "stack-depth-limit")]
pub fn reset_call_depth() {
    CALL_DEPTH.with(|depth| depth.set(0));
}

/// Configure the process-wide call-depth ceiling.
#[cfg(feature = "stack-depth-limit")]
pub fn set_max_call_depth(limit: u32) {
    MAX_CALL_DEPTH.store(limit, Ordering::Relaxed);
}

/// The configured call-depth ceiling.
#[cfg(feature = "stack-depth-limit")]
pub fn max_call_depth() -> u32 {
    MAX_CALL_DEPTH.load(Ordering::Relaxed)
}

/// Depth accounting disabled: entry always succeeds.
#[cfg(not(feature = "stack-depth-limit"))]
#[inline(always)]
pub fn enter_function() -> Result<(), TrapReason> {
    Ok(())
}

/// Depth accounting disabled.
#[cfg(not(feature = "stack-depth-limit"))]
#[inline(always)]
pub fn exit_function() {}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn trap_reason_byte_round_trip() {
        let last_known_reason: u8 = TrapReason::iter().last().unwrap() as u8 + 1;
        let reason = TrapReason::from(0);
        assert_eq!(reason, TrapReason::UnknownTrapReason);

        for i in 1..last_known_reason {
            let reason = TrapReason::from(i);
            let i2 = reason as u8;
            assert_eq!(i, i2);
        }
        for i in last_known_reason..=255 {
            let reason = TrapReason::from(i);
            let i2 = reason as u8;
            assert_eq!(TrapReason::UnknownTrapReason as u8, i2);
        }
    }

    #[cfg(feature = "stack-depth-limit")]
    #[test]
    fn depth_is_balanced_on_success() {
        let before = call_depth();
        enter_function().expect("entry under the ceiling");
        exit_function();
        assert_eq!(before, call_depth());
    }
}
