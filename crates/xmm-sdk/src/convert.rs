//! Value conversion traits
//!
//! Implement `FromValue` to receive a type as a positional argument and
//! `ToValue` to return one from a native entry point.

use std::sync::Arc;

use crate::error::NativeError;
use crate::value::{Substitution, Term, Value};

/// Convert from a host value to a Rust type.
pub trait FromValue: Sized {
    /// Convert from a value, returning a type mismatch if the kind differs.
    fn from_value(value: &Value) -> Result<Self, NativeError>;
}

/// Convert from a Rust type to a host value.
pub trait ToValue {
    /// Convert to a value.
    fn to_value(self) -> Value;
}

fn mismatch(expected: &str, got: &Value) -> NativeError {
    NativeError::TypeMismatch {
        expected: expected.to_string(),
        got: got.type_name().to_string(),
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, NativeError> {
        value.as_int().ok_or_else(|| mismatch("int", value))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, NativeError> {
        value.as_float().ok_or_else(|| mismatch("float", value))
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, NativeError> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl FromValue for Arc<str> {
    fn from_value(value: &Value) -> Result<Self, NativeError> {
        match value {
            Value::Str(s) => Ok(Arc::clone(s)),
            other => Err(mismatch("string", other)),
        }
    }
}

impl FromValue for Arc<Term> {
    fn from_value(value: &Value) -> Result<Self, NativeError> {
        match value {
            Value::Term(t) => Ok(Arc::clone(t)),
            other => Err(mismatch("term", other)),
        }
    }
}

impl FromValue for Arc<Substitution> {
    fn from_value(value: &Value) -> Result<Self, NativeError> {
        match value {
            Value::Subst(s) => Ok(Arc::clone(s)),
            other => Err(mismatch("substitution", other)),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, NativeError> {
        Ok(value.clone())
    }
}

impl ToValue for i64 {
    fn to_value(self) -> Value {
        Value::Int(self)
    }
}

impl ToValue for f64 {
    fn to_value(self) -> Value {
        Value::Float(self)
    }
}

impl ToValue for bool {
    fn to_value(self) -> Value {
        Value::Bool(self)
    }
}

impl ToValue for String {
    fn to_value(self) -> Value {
        Value::Str(self.into())
    }
}

impl ToValue for Term {
    fn to_value(self) -> Value {
        Value::Term(Arc::new(self))
    }
}

impl ToValue for () {
    fn to_value(self) -> Value {
        Value::Null
    }
}

impl ToValue for Value {
    fn to_value(self) -> Value {
        self
    }
}
