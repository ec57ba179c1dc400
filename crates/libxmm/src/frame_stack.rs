//! The `FrameStack` class binding
//!
//! Adapts the engine's opaque, runtime-sized state into a managed class:
//! the state layout is queried once per process and cached, the class
//! descriptor is finalized with it, the engine's lifecycle hooks become
//! the class constructor/destructor, and the method surface comes from the
//! linked dispatch table.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use xmm_sdk::{ClassDef, ClassSpec, StateLayout};

use crate::dispatch::{self, MethodSpec};
use crate::InitError;

/// Exposed class name.
pub const CLASS_NAME: &str = "FrameStack";

/// The `FrameStack` method surface: the one authoritative list its
/// exposed names and required native symbols both come from.
pub const FRAME_STACK_METHODS: &[MethodSpec] = &[
    MethodSpec { name: "push", symbol: "stack.push", arity: 0 },
    MethodSpec { name: "pop", symbol: "stack.pop", arity: 0 },
    MethodSpec { name: "lookup_v", symbol: "stack.lookup_v", arity: 1 },
    MethodSpec { name: "add_v", symbol: "stack.add_v", arity: 2 },
    MethodSpec { name: "lookup_d", symbol: "stack.lookup_d", arity: 1 },
    MethodSpec { name: "add_d", symbol: "stack.add_d", arity: 2 },
    MethodSpec { name: "dbg", symbol: "stack.dbg", arity: 0 },
];

static STATE_LAYOUT: OnceCell<StateLayout> = OnceCell::new();

/// The engine state layout, queried from the engine exactly once per
/// process and cached for its remaining lifetime.
pub fn negotiated_layout() -> StateLayout {
    *STATE_LAYOUT.get_or_init(|| {
        let layout = xmm_engine::state_layout();
        log::debug!(
            "negotiated {} state layout: {} bytes, align {}",
            CLASS_NAME,
            layout.size,
            layout.align
        );
        layout
    })
}

/// Build and ready the `FrameStack` class descriptor from a method table
/// (the real table in production; failure-injection tables in tests).
pub(crate) fn class_def_from(table: &[MethodSpec]) -> Result<Arc<ClassDef>, InitError> {
    let mut spec = ClassSpec::new(
        CLASS_NAME,
        xmm_engine::init_state,
        xmm_engine::teardown_state,
    );
    for method in dispatch::link_methods(table)? {
        spec = spec.with_method(method);
    }
    spec.finalize_layout(negotiated_layout())?;
    Ok(spec.ready()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_query_is_cached() {
        let first = negotiated_layout();
        assert!(first.size > 0);
        assert_eq!(first, negotiated_layout());
        assert_eq!(first, xmm_engine::state_layout());
    }

    #[test]
    fn test_class_def_surface() {
        let class = class_def_from(FRAME_STACK_METHODS).unwrap();
        assert_eq!(class.name(), CLASS_NAME);
        assert_eq!(class.method_count(), FRAME_STACK_METHODS.len());
        for spec in FRAME_STACK_METHODS {
            let method = class.method(spec.name).unwrap();
            assert_eq!(method.arity(), spec.arity);
        }
        assert_eq!(class.instance_layout(), negotiated_layout());
    }

    #[test]
    fn test_unfinalized_spec_cannot_ready() {
        let spec = ClassSpec::new(
            CLASS_NAME,
            xmm_engine::init_state,
            xmm_engine::teardown_state,
        );
        assert!(spec.ready().is_err());
    }
}
