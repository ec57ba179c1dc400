//! Native entry points
//!
//! Every entry point follows the one calling convention: raw positional
//! arguments in, a produced value or a `NativeError` out. Stateful entry
//! points receive an opaque `*mut EngineState`; only this crate knows the
//! real layout behind it, which hosts obtain via `state_layout()` at
//! runtime.

use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use xmm_sdk::{
    EngineState, FromValue, Namespace, NativeError, NativeFn, NativeMethodFn, NativeResult,
    StateLayout, Substitution, Term, Value,
};

use crate::scope::ScopeStack;
use crate::subst;

// ============================================================================
// Lifecycle
// ============================================================================

/// Live state blocks, for leak checks in tests.
static LIVE_STATES: AtomicUsize = AtomicUsize::new(0);

/// Report the size and alignment a host must allocate per state block.
///
/// The answer is constant for the lifetime of the process; hosts are
/// expected to query it once and cache it.
pub fn state_layout() -> StateLayout {
    StateLayout::of::<ScopeStack>()
}

/// Process-wide startup probe. Fire-and-forget: no return value, no
/// failure channel.
pub fn startup() {
    let layout = state_layout();
    log::debug!(
        "xmm engine startup probe: state layout {}x{}",
        layout.size,
        layout.align
    );
}

/// Initialize a freshly allocated state block in place.
///
/// # Safety
///
/// `state` must point to an uninitialized allocation of the layout
/// reported by [`state_layout`].
pub unsafe fn init_state(state: *mut EngineState) -> Result<(), NativeError> {
    ptr::write(state as *mut ScopeStack, ScopeStack::new());
    LIVE_STATES.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

/// Tear down a state block in place. Must be called exactly once per
/// successful [`init_state`], before the allocation is released.
///
/// # Safety
///
/// `state` must point to a block initialized by [`init_state`] that has
/// not been torn down yet.
pub unsafe fn teardown_state(state: *mut EngineState) {
    ptr::drop_in_place(state as *mut ScopeStack);
    LIVE_STATES.fetch_sub(1, Ordering::SeqCst);
}

/// Number of initialized state blocks not yet torn down.
pub fn live_state_count() -> usize {
    LIVE_STATES.load(Ordering::SeqCst)
}

unsafe fn stack_mut<'a>(state: *mut EngineState) -> &'a mut ScopeStack {
    &mut *(state as *mut ScopeStack)
}

// ============================================================================
// Method entry points
// ============================================================================

fn arg<'a>(args: &'a [Value], index: usize, callable: &str) -> Result<&'a Value, NativeError> {
    args.get(index).ok_or_else(|| NativeError::Arity {
        callable: callable.to_string(),
        expected: index + 1,
        got: args.len(),
    })
}

unsafe fn stack_push(state: *mut EngineState, _args: &[Value]) -> NativeResult {
    stack_mut(state).push();
    Ok(Value::Null)
}

unsafe fn stack_pop(state: *mut EngineState, _args: &[Value]) -> NativeResult {
    stack_mut(state).pop().map(|_| Value::Null)
}

unsafe fn stack_lookup_v(state: *mut EngineState, args: &[Value]) -> NativeResult {
    let name = Arc::<str>::from_value(arg(args, 0, "stack.lookup_v")?)?;
    stack_mut(state).lookup(Namespace::Values, &name)
}

unsafe fn stack_add_v(state: *mut EngineState, args: &[Value]) -> NativeResult {
    let name = Arc::<str>::from_value(arg(args, 0, "stack.add_v")?)?;
    let value = arg(args, 1, "stack.add_v")?.clone();
    stack_mut(state).add(Namespace::Values, name, value);
    Ok(Value::Null)
}

unsafe fn stack_lookup_d(state: *mut EngineState, args: &[Value]) -> NativeResult {
    let name = Arc::<str>::from_value(arg(args, 0, "stack.lookup_d")?)?;
    stack_mut(state).lookup(Namespace::Definitions, &name)
}

unsafe fn stack_add_d(state: *mut EngineState, args: &[Value]) -> NativeResult {
    let name = Arc::<str>::from_value(arg(args, 0, "stack.add_d")?)?;
    let value = arg(args, 1, "stack.add_d")?.clone();
    stack_mut(state).add(Namespace::Definitions, name, value);
    Ok(Value::Null)
}

unsafe fn stack_dbg(state: *mut EngineState, _args: &[Value]) -> NativeResult {
    Ok(Value::str(stack_mut(state).snapshot()))
}

// ============================================================================
// Function entry points
// ============================================================================

fn apply_subst(args: &[Value]) -> NativeResult {
    let term = Arc::<Term>::from_value(arg(args, 0, "subst.apply")?)?;
    let mapping = Arc::<Substitution>::from_value(arg(args, 1, "subst.apply")?)?;
    subst::validate(&term)?;
    for (_, replacement) in mapping.iter() {
        subst::validate(replacement)?;
    }
    Ok(Value::Term(Arc::new(subst::apply(&term, &mapping))))
}

// ============================================================================
// Entry point registry
// ============================================================================

// The one authoritative table per surface. Hosts resolve symbolic names
// against these at link time; an unknown name is a link failure there.
static METHOD_ENTRY_POINTS: &[(&str, NativeMethodFn)] = &[
    ("stack.push", stack_push),
    ("stack.pop", stack_pop),
    ("stack.lookup_v", stack_lookup_v),
    ("stack.add_v", stack_add_v),
    ("stack.lookup_d", stack_lookup_d),
    ("stack.add_d", stack_add_d),
    ("stack.dbg", stack_dbg),
];

static FUNCTION_ENTRY_POINTS: &[(&str, NativeFn)] = &[("subst.apply", apply_subst)];

/// Resolve a stateful method entry point by symbolic name.
pub fn resolve_method(symbol: &str) -> Option<NativeMethodFn> {
    METHOD_ENTRY_POINTS
        .iter()
        .find(|(name, _)| *name == symbol)
        .map(|(_, f)| *f)
}

/// Resolve a stateless function entry point by symbolic name.
pub fn resolve_function(symbol: &str) -> Option<NativeFn> {
    FUNCTION_ENTRY_POINTS
        .iter()
        .find(|(name, _)| *name == symbol)
        .map(|(_, f)| *f)
}

/// All registered method symbols.
pub fn method_symbols() -> Vec<&'static str> {
    METHOD_ENTRY_POINTS.iter().map(|(name, _)| *name).collect()
}

/// All registered function symbols.
pub fn function_symbols() -> Vec<&'static str> {
    FUNCTION_ENTRY_POINTS.iter().map(|(name, _)| *name).collect()
}

// ============================================================================
// Tests
// ============================================================================
