//! Dispatch-table linking
//!
//! Each binding declares one table pairing every exposed name with the
//! native symbol backing it, so the set of exposed names and the set of
//! required symbols are generated from the same place and cannot drift
//! apart. The link step here resolves every symbol against the engine
//! registry; a miss or a duplicated exposed name aborts bootstrap.

use xmm_sdk::{FunctionDef, MethodDef};

use crate::InitError;

/// One exposed method: name, backing native symbol, positional arity.
#[derive(Debug, Clone, Copy)]
pub struct MethodSpec {
    /// Name the host sees
    pub name: &'static str,
    /// Symbolic name of the native entry point
    pub symbol: &'static str,
    /// Declared positional arity
    pub arity: usize,
}

/// One exposed module-level function.
#[derive(Debug, Clone, Copy)]
pub struct FunctionSpec {
    /// Name the host sees
    pub name: &'static str,
    /// Symbolic name of the native entry point
    pub symbol: &'static str,
    /// Declared positional arity
    pub arity: usize,
}

fn check_unique(names: impl Iterator<Item = &'static str>) -> Result<(), InitError> {
    let mut seen: Vec<&str> = Vec::new();
    for name in names {
        if seen.contains(&name) {
            return Err(InitError::DuplicateName {
                name: name.to_string(),
            });
        }
        seen.push(name);
    }
    Ok(())
}

/// Resolve a method table against the engine registry.
pub(crate) fn link_methods(table: &[MethodSpec]) -> Result<Vec<MethodDef>, InitError> {
    check_unique(table.iter().map(|spec| spec.name))?;
    table
        .iter()
        .map(|spec| {
            let native = xmm_engine::resolve_method(spec.symbol).ok_or_else(|| {
                InitError::UnresolvedSymbol {
                    name: spec.name.to_string(),
                    symbol: spec.symbol.to_string(),
                }
            })?;
            Ok(MethodDef::new(spec.name, spec.arity, native))
        })
        .collect()
}

/// Resolve a function table against the engine registry.
pub(crate) fn link_functions(table: &[FunctionSpec]) -> Result<Vec<FunctionDef>, InitError> {
    check_unique(table.iter().map(|spec| spec.name))?;
    table
        .iter()
        .map(|spec| {
            let native = xmm_engine::resolve_function(spec.symbol).ok_or_else(|| {
                InitError::UnresolvedSymbol {
                    name: spec.name.to_string(),
                    symbol: spec.symbol.to_string(),
                }
            })?;
            Ok(FunctionDef::new(spec.name, spec.arity, native))
        })
        .collect()
}
