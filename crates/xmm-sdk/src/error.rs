//! Error types for the host ABI
//!
//! `NativeError` is the host's error-propagation mechanism: every native
//! entry point reports failure through it, and the binding layer forwards
//! such failures verbatim without reinterpreting them.

use crate::value::Namespace;

/// Result type for native calls
pub type NativeResult<T = crate::value::Value> = Result<T, NativeError>;

/// Per-call error taxonomy shared by the host and the native engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NativeError {
    /// Wrong number of positional arguments
    #[error("{callable} expects {expected} argument(s), got {got}")]
    Arity {
        /// The callable that rejected the call
        callable: String,
        /// Declared positional arity
        expected: usize,
        /// Number of arguments received
        got: usize,
    },

    /// Type mismatch during argument conversion
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Attempt to close the base scope
    #[error("Cannot pop the base scope")]
    ScopeUnderflow,

    /// Lookup miss in one of the two namespaces
    #[error("Name not found in {namespace} namespace: {name}")]
    NameNotFound {
        /// Namespace that was searched
        namespace: Namespace,
        /// Name that was not found
        name: String,
    },

    /// Method name not present in the class dispatch table
    #[error("Unknown method {class}.{method}")]
    UnknownMethod {
        /// Class name
        class: String,
        /// Requested method name
        method: String,
    },

    /// Function name not present in the module namespace
    #[error("Unknown function: {name}")]
    UnknownFunction {
        /// Requested function name
        name: String,
    },

    /// Class name not present in the module namespace
    #[error("Unknown class: {name}")]
    UnknownClass {
        /// Requested class name
        name: String,
    },

    /// Native initialization rejected a fresh instance
    #[error("Native initialization failed: {0}")]
    ConstructFailed(String),

    /// A term (or a bound replacement) is structurally invalid
    #[error("Malformed term: {0}")]
    MalformedTerm(String),
}
