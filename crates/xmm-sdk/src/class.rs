//! Class descriptors and managed instances
//!
//! A class wrapping native state is described by a `ClassSpec`, which must
//! have its instance layout finalized (exactly once) before `ready()`
//! validates it into an immutable `ClassDef`. Instances own a separately
//! heap-allocated state block of the negotiated layout; the native teardown
//! hook runs exactly once, when the last host reference drops.

use std::collections::HashMap;
use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::abi::{EngineState, InitFn, NativeMethodFn, StateLayout, TeardownFn};
use crate::error::{NativeError, NativeResult};
use crate::value::Value;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while building or readying a class descriptor
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassError {
    /// `finalize_layout` was called twice
    #[error("Class {class}: instance layout already finalized")]
    LayoutAlreadyFinalized {
        /// Class name
        class: String,
    },

    /// `ready()` was called before the instance layout was finalized
    #[error("Class {class}: cannot ready with an unfinalized instance layout")]
    LayoutNotFinalized {
        /// Class name
        class: String,
    },

    /// The finalized instance size is zero
    #[error("Class {class}: instance size must be non-zero")]
    ZeroInstanceSize {
        /// Class name
        class: String,
    },

    /// Two methods share one exposed name
    #[error("Class {class}: duplicate method name {method}")]
    DuplicateMethod {
        /// Class name
        class: String,
        /// Duplicated method name
        method: String,
    },
}

// ============================================================================
// Method descriptor
// ============================================================================

/// One entry of a class dispatch table: exposed name, positional arity,
/// native entry point.
#[derive(Debug)]
pub struct MethodDef {
    name: String,
    arity: usize,
    native: NativeMethodFn,
}

impl MethodDef {
    /// Create a method descriptor
    pub fn new(name: impl Into<String>, arity: usize, native: NativeMethodFn) -> Self {
        Self {
            name: name.into(),
            arity,
            native,
        }
    }

    /// Exposed method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared positional arity
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Native entry point backing this method
    pub fn native(&self) -> NativeMethodFn {
        self.native
    }
}

// ============================================================================
// ClassSpec: descriptor under construction
// ============================================================================

/// A class descriptor under construction.
///
/// The instance layout is unknown until the native size query runs, so the
/// spec starts without one; `finalize_layout` records it exactly once, and
/// `ready()` refuses to validate a spec whose layout was never finalized.
#[derive(Debug)]
pub struct ClassSpec {
    name: String,
    layout: OnceCell<StateLayout>,
    init: InitFn,
    teardown: TeardownFn,
    methods: Vec<MethodDef>,
}

impl ClassSpec {
    /// Create a spec with the given name and native lifecycle hooks
    pub fn new(name: impl Into<String>, init: InitFn, teardown: TeardownFn) -> Self {
        Self {
            name: name.into(),
            layout: OnceCell::new(),
            init,
            teardown,
            methods: Vec::new(),
        }
    }

    /// Append a method descriptor
    pub fn method(self, name: impl Into<String>, arity: usize, native: NativeMethodFn) -> Self {
        self.with_method(MethodDef::new(name, arity, native))
    }

    /// Append an already-built method descriptor
    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// Record the negotiated instance layout. Errors on a second call.
    pub fn finalize_layout(&self, layout: StateLayout) -> Result<(), ClassError> {
        self.layout
            .set(layout)
            .map_err(|_| ClassError::LayoutAlreadyFinalized {
                class: self.name.clone(),
            })
    }

    /// The finalized layout, if any
    pub fn layout(&self) -> Option<StateLayout> {
        self.layout.get().copied()
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate the descriptor into an immutable, instantiable class.
    ///
    /// Requires a finalized non-zero layout and unique method names.
    pub fn ready(self) -> Result<Arc<ClassDef>, ClassError> {
        let layout = self
            .layout
            .get()
            .copied()
            .ok_or_else(|| ClassError::LayoutNotFinalized {
                class: self.name.clone(),
            })?;
        if layout.size == 0 {
            return Err(ClassError::ZeroInstanceSize { class: self.name });
        }

        let mut methods = HashMap::with_capacity(self.methods.len());
        for m in self.methods {
            if methods.contains_key(m.name()) {
                return Err(ClassError::DuplicateMethod {
                    class: self.name,
                    method: m.name,
                });
            }
            methods.insert(m.name.clone(), m);
        }

        log::debug!(
            "class {} ready: {} methods, instance size {}",
            self.name,
            methods.len(),
            layout.size
        );

        Ok(Arc::new(ClassDef {
            name: self.name,
            layout,
            init: self.init,
            teardown: self.teardown,
            methods,
        }))
    }
}

// ============================================================================
// ClassDef: readied class
// ============================================================================

/// A validated class descriptor. Immutable; instances can only be created
/// from a readied class.
#[derive(Debug)]
pub struct ClassDef {
    name: String,
    layout: StateLayout,
    init: InitFn,
    teardown: TeardownFn,
    methods: HashMap<String, MethodDef>,
}

impl ClassDef {
    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The finalized instance layout
    pub fn instance_layout(&self) -> StateLayout {
        self.layout
    }

    /// Look up a method descriptor by exposed name
    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.get(name)
    }

    /// All exposed method names
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(|s| s.as_str()).collect()
    }

    /// Number of exposed methods
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Construct a managed instance of `class`.
    ///
    /// Construction is zero-arity: any argument is rejected. A fresh state
    /// block of the finalized layout is allocated and handed to the native
    /// init hook; if the hook fails, the block is released immediately
    /// (without running teardown) and no instance is returned.
    pub fn construct(class: &Arc<Self>, args: &[Value]) -> Result<InstanceRef, NativeError> {
        if !args.is_empty() {
            return Err(NativeError::Arity {
                callable: format!("{}()", class.name),
                expected: 0,
                got: args.len(),
            });
        }

        let block = StateBlock::alloc(class.layout)?;
        unsafe { (class.init)(block.as_state())? };

        log::trace!("constructed {} instance", class.name);

        Ok(Arc::new(Instance {
            class: Arc::clone(class),
            block,
        }))
    }
}

// ============================================================================
// State block
// ============================================================================

/// Heap allocation holding opaque engine state. Releases the memory on
/// drop; running the teardown hook first is the `Instance`'s job.
struct StateBlock {
    ptr: NonNull<u8>,
    layout: std::alloc::Layout,
}

impl StateBlock {
    fn alloc(layout: StateLayout) -> Result<Self, NativeError> {
        let layout = layout.to_alloc()?;
        let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr).unwrap_or_else(|| std::alloc::handle_alloc_error(layout));
        Ok(Self { ptr, layout })
    }

    fn as_state(&self) -> *mut EngineState {
        self.ptr.as_ptr() as *mut EngineState
    }
}

impl Drop for StateBlock {
    fn drop(&mut self) {
        unsafe { std::alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

// ============================================================================
// Instance
// ============================================================================

/// Shared handle to a managed instance. Teardown runs when the last
/// reference drops.
pub type InstanceRef = Arc<Instance>;

/// A managed instance: a class handle plus an owned state block.
///
/// The state block is unsynchronized and `Instance` is intentionally
/// neither `Send` nor `Sync`: concurrent access is caller-managed, and no
/// internal lock is added here.
pub struct Instance {
    class: Arc<ClassDef>,
    block: StateBlock,
}

impl Instance {
    /// The instance's class
    pub fn class(&self) -> &Arc<ClassDef> {
        &self.class
    }

    /// Invoke a method by exposed name with raw positional arguments.
    ///
    /// Only the declared arity is checked here; semantic validation
    /// belongs to the native entry point, and its failures are returned
    /// unchanged.
    pub fn call(&self, method: &str, args: &[Value]) -> NativeResult {
        let m = self
            .class
            .method(method)
            .ok_or_else(|| NativeError::UnknownMethod {
                class: self.class.name().to_string(),
                method: method.to_string(),
            })?;
        if args.len() != m.arity() {
            return Err(NativeError::Arity {
                callable: format!("{}.{}", self.class.name(), m.name()),
                expected: m.arity(),
                got: args.len(),
            });
        }
        unsafe { (m.native)(self.block.as_state(), args) }
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        // Exactly once, before the block is released.
        unsafe { (self.class.teardown)(self.block.as_state()) }
        log::trace!("destroyed {} instance", self.class.name());
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .field("state", &self.block.ptr)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
