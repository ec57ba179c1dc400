//! Calling convention shared by the host and the native engine
//!
//! Every native entry point receives raw positional arguments and returns
//! either a produced value or a `NativeError`. Stateful entry points
//! additionally receive a pointer to an opaque engine state block whose
//! layout is known only to the engine and negotiated at runtime.

use crate::error::{NativeError, NativeResult};
use crate::value::Value;

/// Opaque handle to native engine state.
///
/// The host never reads through this pointer; it only allocates a block of
/// the negotiated layout and passes the pointer back to the engine.
#[repr(C)]
pub struct EngineState {
    _private: [u8; 0],
}

/// Size and alignment of an engine state block, reported by the engine's
/// one-time layout query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateLayout {
    /// Size in bytes
    pub size: usize,
    /// Required alignment in bytes
    pub align: usize,
}

impl StateLayout {
    /// Layout of a concrete type (used by engines to answer the query)
    pub fn of<T>() -> Self {
        Self {
            size: std::mem::size_of::<T>(),
            align: std::mem::align_of::<T>(),
        }
    }

    /// Convert to an allocator layout
    pub fn to_alloc(self) -> Result<std::alloc::Layout, NativeError> {
        std::alloc::Layout::from_size_align(self.size, self.align).map_err(|e| {
            NativeError::ConstructFailed(format!("invalid state layout: {}", e))
        })
    }
}

/// Module-level function entry point: raw positional arguments in, one
/// value (or a failure signal) out.
pub type NativeFn = fn(&[Value]) -> NativeResult;

/// Method entry point: opaque engine state plus raw positional arguments.
///
/// # Safety
///
/// Callers must pass a pointer to a live state block that was initialized
/// by the engine's init hook and has not yet been torn down.
pub type NativeMethodFn = unsafe fn(*mut EngineState, &[Value]) -> NativeResult;

/// Native initialization hook, run once on a freshly allocated state block.
///
/// # Safety
///
/// The pointer must reference an allocation of the negotiated layout.
pub type InitFn = unsafe fn(*mut EngineState) -> Result<(), NativeError>;

/// Native teardown hook, run exactly once before the block is released.
///
/// # Safety
///
/// The pointer must reference a block previously initialized by the
/// matching init hook.
pub type TeardownFn = unsafe fn(*mut EngineState);
