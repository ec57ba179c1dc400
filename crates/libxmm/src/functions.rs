//! Module-level function bindings
//!
//! The substitution transform has no object identity: it is exposed as a
//! plain callable, linked from the same table mechanism as the class
//! methods. Arity is checked by the host before forwarding; everything
//! else is the engine's, and its failures pass through unchanged.

use xmm_sdk::FunctionDef;

use crate::dispatch::{self, FunctionSpec};
use crate::InitError;

/// The module-level function surface.
pub const MODULE_FUNCTIONS: &[FunctionSpec] = &[FunctionSpec {
    name: "apply_subst",
    symbol: "subst.apply",
    arity: 2,
}];

/// Link an explicit function table (the real table in production;
/// failure-injection tables in tests).
pub(crate) fn function_defs_from(table: &[FunctionSpec]) -> Result<Vec<FunctionDef>, InitError> {
    dispatch::link_functions(table)
}
