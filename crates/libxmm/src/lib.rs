//! libxmm: the XMM engine bound into the host module system
//!
//! One importable module named `libxmm`, exposing:
//!
//! - class `FrameStack`: zero-argument construction; methods `push`,
//!   `pop`, `lookup_v`, `add_v`, `lookup_d`, `add_d`, `dbg`, all
//!   positional-only;
//! - function `apply_subst(term, substitution)`.
//!
//! [`init`] runs the bootstrap at most once per process: it fires the
//! engine startup probe, negotiates the instance layout, readies the
//! class descriptor, builds the module and registers the exposed surface.
//! Every step before the module handle is cached works on plain owned
//! values, so an early exit on failure drops whatever was built so far;
//! a half-initialized module can never escape.
//!
//! The bridge adds no locking and no semantic validation of its own:
//! engine failures are returned to the caller unchanged, and `FrameStack`
//! instances are not shareable across threads.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use xmm_sdk::{ClassError, ModuleError};

mod dispatch;
mod frame_stack;
mod functions;

pub use dispatch::{FunctionSpec, MethodSpec};
pub use frame_stack::{negotiated_layout, CLASS_NAME, FRAME_STACK_METHODS};
pub use functions::MODULE_FUNCTIONS;
pub use xmm_sdk::{InstanceRef, Module, NativeError, NativeResult, Value};

/// Exposed module name.
pub const MODULE_NAME: &str = "libxmm";

// ============================================================================
// Errors
// ============================================================================

/// Errors that abort module bootstrap. No module is produced when any of
/// these surfaces.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// An exposed name declares a native symbol the engine does not
    /// register
    #[error("Unresolved native symbol: {symbol} (required by {name})")]
    UnresolvedSymbol {
        /// Exposed name requiring the symbol
        name: String,
        /// Symbolic name that failed to resolve
        symbol: String,
    },

    /// Two table entries expose the same name
    #[error("Duplicate exposed name: {name}")]
    DuplicateName {
        /// The duplicated name
        name: String,
    },

    /// Class descriptor finalization or readying failed
    #[error("Class setup failed: {0}")]
    Class(#[from] ClassError),

    /// Module registration failed
    #[error("Module setup failed: {0}")]
    Module(#[from] ModuleError),
}

// ============================================================================
// Module bootstrap
// ============================================================================

static MODULE: OnceCell<Arc<Module>> = OnceCell::new();

/// Initialize the `libxmm` module.
///
/// The bootstrap runs at most once per process; later calls return the
/// same shared module. A failed bootstrap leaves nothing cached, so a
/// later call may retry.
pub fn init() -> Result<Arc<Module>, InitError> {
    MODULE.get_or_try_init(build_module).cloned()
}

fn build_module() -> Result<Arc<Module>, InitError> {
    build_module_from(FRAME_STACK_METHODS, MODULE_FUNCTIONS)
}

fn build_module_from(
    methods: &[MethodSpec],
    function_table: &[FunctionSpec],
) -> Result<Arc<Module>, InitError> {
    // Fire-and-forget; failure here is unobservable by design.
    xmm_engine::startup();

    let class = frame_stack::class_def_from(methods)?;

    let mut module = Module::new(MODULE_NAME);
    module.register_class(class)?;
    for func in functions::function_defs_from(function_table)? {
        module.register_function(func)?;
    }

    log::debug!(
        "module {} initialized: {} class(es), {} function(s)",
        MODULE_NAME,
        module.class_count(),
        module.function_count()
    );

    Ok(Arc::new(module))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_returns_one_shared_module() {
        let first = init().unwrap();
        let second = init().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), MODULE_NAME);
    }

    #[test]
    fn test_bootstrap_failure_yields_no_module() {
        let broken = &[MethodSpec {
            name: "push",
            symbol: "stack.gone",
            arity: 0,
        }];
        let err = build_module_from(broken, MODULE_FUNCTIONS).unwrap_err();
        assert!(matches!(err, InitError::UnresolvedSymbol { .. }));
        // The failed build leaves nothing behind; the real bootstrap
        // still succeeds afterwards.
        let module = init().unwrap();
        assert_eq!(module.class_count(), 1);
        assert_eq!(module.function_count(), 1);
    }

    #[test]
    fn test_registration_failure_drops_partial_module() {
        // The colliding table fails the link step after the class is
        // already registered; the early exit drops the partial module.
        let colliding = &[
            FunctionSpec { name: "apply_subst", symbol: "subst.apply", arity: 2 },
            FunctionSpec { name: "apply_subst", symbol: "subst.apply", arity: 2 },
        ];
        let err = build_module_from(FRAME_STACK_METHODS, colliding).unwrap_err();
        assert!(matches!(err, InitError::DuplicateName { .. }));
    }
}
