//! XMM SDK - host runtime machinery for native bindings
//!
//! This crate provides the object and module system a native binding layer
//! programs against: the host value model, the calling convention for
//! native entry points, class descriptors with runtime-negotiated instance
//! layouts, reference-counted instances with exactly-once native teardown,
//! and module descriptors. It knows nothing about any particular engine.
//!
//! # Example
//!
//! ```ignore
//! use xmm_sdk::{ClassSpec, Module, StateLayout, Value};
//!
//! let spec = ClassSpec::new("Counter", counter_init, counter_teardown)
//!     .method("get", 0, counter_get);
//! spec.finalize_layout(StateLayout::of::<u64>())?;
//! let class = spec.ready()?;
//!
//! let mut module = Module::new("counters");
//! module.register_class(class)?;
//! let instance = module.construct("Counter", &[])?;
//! instance.call("get", &[])?;
//! ```

#![warn(missing_docs)]

mod abi;
mod class;
mod convert;
mod error;
mod module;
mod value;

pub use abi::{EngineState, InitFn, NativeFn, NativeMethodFn, StateLayout, TeardownFn};
pub use class::{ClassDef, ClassError, ClassSpec, Instance, InstanceRef, MethodDef};
pub use convert::{FromValue, ToValue};
pub use error::{NativeError, NativeResult};
pub use module::{FunctionDef, Module, ModuleError};
pub use value::{Namespace, Substitution, Term, Value};
