//! Module descriptors
//!
//! A `Module` names a set of exposed functions and classes. Registration
//! stores shared handles; a module that fails mid-registration is simply
//! dropped by its builder, releasing everything registered so far.

use std::collections::HashMap;
use std::sync::Arc;

use crate::abi::NativeFn;
use crate::class::{ClassDef, InstanceRef};
use crate::error::{NativeError, NativeResult};
use crate::value::Value;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised during module registration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModuleError {
    /// A function with this name is already registered
    #[error("Module {module}: duplicate function {name}")]
    DuplicateFunction {
        /// Module name
        module: String,
        /// Duplicated function name
        name: String,
    },

    /// A class with this name is already registered
    #[error("Module {module}: duplicate class {name}")]
    DuplicateClass {
        /// Module name
        module: String,
        /// Duplicated class name
        name: String,
    },
}

// ============================================================================
// Function descriptor
// ============================================================================

/// A module-level function: exposed name, positional arity, native entry
/// point.
#[derive(Debug)]
pub struct FunctionDef {
    name: String,
    arity: usize,
    native: NativeFn,
}

impl FunctionDef {
    /// Create a function descriptor
    pub fn new(name: impl Into<String>, arity: usize, native: NativeFn) -> Self {
        Self {
            name: name.into(),
            arity,
            native,
        }
    }

    /// Exposed function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared positional arity
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invoke the function with raw positional arguments.
    ///
    /// Checks arity, then forwards; native failures are returned unchanged.
    pub fn call(&self, args: &[Value]) -> NativeResult {
        if args.len() != self.arity {
            return Err(NativeError::Arity {
                callable: self.name.clone(),
                expected: self.arity,
                got: args.len(),
            });
        }
        (self.native)(args)
    }
}

// ============================================================================
// Module
// ============================================================================

/// A module descriptor: name plus exposed functions and classes.
#[derive(Debug)]
pub struct Module {
    name: String,
    functions: HashMap<String, FunctionDef>,
    classes: HashMap<String, Arc<ClassDef>>,
}

impl Module {
    /// Create an empty module
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: HashMap::new(),
            classes: HashMap::new(),
        }
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a function. Duplicate names are rejected.
    pub fn register_function(&mut self, func: FunctionDef) -> Result<(), ModuleError> {
        if self.functions.contains_key(func.name()) {
            return Err(ModuleError::DuplicateFunction {
                module: self.name.clone(),
                name: func.name().to_string(),
            });
        }
        self.functions.insert(func.name().to_string(), func);
        Ok(())
    }

    /// Register a class. Takes a new shared reference; duplicate names are
    /// rejected.
    pub fn register_class(&mut self, class: Arc<ClassDef>) -> Result<(), ModuleError> {
        if self.classes.contains_key(class.name()) {
            return Err(ModuleError::DuplicateClass {
                module: self.name.clone(),
                name: class.name().to_string(),
            });
        }
        self.classes.insert(class.name().to_string(), class);
        Ok(())
    }

    /// Get a function by exposed name
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    /// Get a class by exposed name
    pub fn class(&self, name: &str) -> Option<&Arc<ClassDef>> {
        self.classes.get(name)
    }

    /// All exposed function names
    pub fn function_names(&self) -> Vec<&str> {
        self.functions.keys().map(|s| s.as_str()).collect()
    }

    /// All exposed class names
    pub fn class_names(&self) -> Vec<&str> {
        self.classes.keys().map(|s| s.as_str()).collect()
    }

    /// Number of registered functions
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Number of registered classes
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Call a module-level function by name
    pub fn call(&self, name: &str, args: &[Value]) -> NativeResult {
        let func = self.function(name).ok_or_else(|| NativeError::UnknownFunction {
            name: name.to_string(),
        })?;
        func.call(args)
    }

    /// Construct an instance of a registered class by name
    pub fn construct(&self, class: &str, args: &[Value]) -> Result<InstanceRef, NativeError> {
        let class_def = self.class(class).ok_or_else(|| NativeError::UnknownClass {
            name: class.to_string(),
        })?;
        ClassDef::construct(class_def, args)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn nop(_args: &[Value]) -> NativeResult {
        Ok(Value::Null)
    }

    fn first(args: &[Value]) -> NativeResult {
        Ok(args[0].clone())
    }

    #[test]
    fn test_register_and_call_function() {
        let mut module = Module::new("test");
        module
            .register_function(FunctionDef::new("first", 1, first))
            .unwrap();

        assert_eq!(module.function_count(), 1);
        assert_eq!(module.call("first", &[Value::Int(9)]).unwrap(), Value::Int(9));
    }

    #[test]
    fn test_duplicate_function_rejected() {
        let mut module = Module::new("test");
        module.register_function(FunctionDef::new("f", 0, nop)).unwrap();
        let err = module
            .register_function(FunctionDef::new("f", 0, nop))
            .unwrap_err();
        assert_eq!(
            err,
            ModuleError::DuplicateFunction {
                module: "test".to_string(),
                name: "f".to_string()
            }
        );
    }

    #[test]
    fn test_function_arity_checked() {
        let func = FunctionDef::new("f", 2, nop);
        let err = func.call(&[Value::Null]).unwrap_err();
        assert_eq!(
            err,
            NativeError::Arity {
                callable: "f".to_string(),
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_unknown_function() {
        let module = Module::new("test");
        assert_eq!(
            module.call("missing", &[]).unwrap_err(),
            NativeError::UnknownFunction {
                name: "missing".to_string()
            }
        );
    }
}
