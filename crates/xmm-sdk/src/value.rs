//! Host value model
//!
//! Values are cheap to clone: primitives are stored inline, heap values
//! (strings, terms, substitutions) are reference-counted via `Arc`.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

// ============================================================================
// Namespace
// ============================================================================

/// One of the two independent binding spaces held by every scope frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// The "values" namespace (`lookup_v` / `add_v`).
    Values,
    /// The "definitions" namespace (`lookup_d` / `add_d`).
    Definitions,
}

impl Namespace {
    /// Short tag used in diagnostic snapshots
    pub fn short(self) -> &'static str {
        match self {
            Namespace::Values => "v",
            Namespace::Definitions => "d",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Values => write!(f, "values"),
            Namespace::Definitions => write!(f, "definitions"),
        }
    }
}

// ============================================================================
// Value
// ============================================================================

/// A host runtime value.
///
/// # Memory Management
///
/// - Primitive values (null, bool, int, float) are stored inline
/// - Heap values (strings, terms, substitutions) are reference-counted
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null value
    Null,
    /// A boolean
    Bool(bool),
    /// A 64-bit signed integer
    Int(i64),
    /// A 64-bit float
    Float(f64),
    /// An immutable string
    Str(Arc<str>),
    /// A term (opaque to the binding layer)
    Term(Arc<Term>),
    /// A substitution (opaque to the binding layer)
    Subst(Arc<Substitution>),
}

impl Value {
    /// Create a null value
    pub fn null() -> Self {
        Value::Null
    }

    /// Create a boolean value
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create an integer value
    pub fn int(i: i64) -> Self {
        Value::Int(i)
    }

    /// Create a float value
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    /// Create a string value
    pub fn str(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Create a term value
    pub fn term(t: Term) -> Self {
        Value::Term(Arc::new(t))
    }

    /// Create a substitution value
    pub fn subst(s: Substitution) -> Self {
        Value::Subst(Arc::new(s))
    }

    /// Check if this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as boolean if this is a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string slice if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the shared term if this is a term
    pub fn as_term(&self) -> Option<&Arc<Term>> {
        match self {
            Value::Term(t) => Some(t),
            _ => None,
        }
    }

    /// Get the shared substitution if this is a substitution
    pub fn as_subst(&self) -> Option<&Arc<Substitution>> {
        match self {
            Value::Subst(s) => Some(s),
            _ => None,
        }
    }

    /// Human-readable type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Term(_) => "term",
            Value::Subst(_) => "substitution",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Term(t) => write!(f, "{}", t),
            Value::Subst(s) => write!(f, "{}", s),
        }
    }
}

// ============================================================================
// Term
// ============================================================================

/// A term: an atom, a variable, or an application of subterms.
///
/// The binding layer never inspects terms; they exist so that values of
/// this shape can flow through it into the native substitution transform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A constant symbol
    Atom(Arc<str>),
    /// A substitutable variable
    Var(Arc<str>),
    /// An application of one or more subterms
    App(Vec<Term>),
}

impl Term {
    /// Create an atom
    pub fn atom(name: impl Into<Arc<str>>) -> Self {
        Term::Atom(name.into())
    }

    /// Create a variable
    pub fn var(name: impl Into<Arc<str>>) -> Self {
        Term::Var(name.into())
    }

    /// Create an application
    pub fn app(items: Vec<Term>) -> Self {
        Term::App(items)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) => write!(f, "{}", name),
            Term::Var(name) => write!(f, "${}", name),
            Term::App(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

// ============================================================================
// Substitution
// ============================================================================

/// A mapping from variable names to replacement terms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution {
    bindings: FxHashMap<Arc<str>, Term>,
}

impl Substitution {
    /// Create an empty substitution
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name to a replacement term, overwriting any previous binding
    pub fn bind(&mut self, name: impl Into<Arc<str>>, term: Term) {
        self.bindings.insert(name.into(), term);
    }

    /// Get the replacement term bound to a name
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings.get(name)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the substitution has no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate over bindings in an unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Term)> {
        self.bindings.iter()
    }
}

impl<S: Into<Arc<str>>> FromIterator<(S, Term)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (S, Term)>>(iter: I) -> Self {
        let mut subst = Substitution::new();
        for (name, term) in iter {
            subst.bind(name, term);
        }
        subst
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Sorted so the rendering is deterministic
        let mut names: Vec<&Arc<str>> = self.bindings.keys().collect();
        names.sort();
        write!(f, "{{")?;
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", name, self.bindings[*name])?;
        }
        write!(f, "}}")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_primitives() {
        assert!(Value::null().is_null());
        assert_eq!(Value::bool(true).as_bool(), Some(true));
        assert_eq!(Value::int(42).as_int(), Some(42));
        assert!((Value::float(3.5).as_float().unwrap() - 3.5).abs() < 1e-12);
        assert_eq!(Value::int(42).as_bool(), None);
    }

    #[test]
    fn test_value_heap_values_share() {
        let v = Value::str("hello");
        let w = v.clone();
        assert_eq!(v, w);
        assert_eq!(w.as_str(), Some("hello"));
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(Value::null().type_name(), "null");
        assert_eq!(Value::str("x").type_name(), "string");
        assert_eq!(Value::term(Term::atom("a")).type_name(), "term");
        assert_eq!(Value::subst(Substitution::new()).type_name(), "substitution");
    }

    #[test]
    fn test_term_display() {
        let t = Term::app(vec![Term::atom("f"), Term::var("x"), Term::atom("a")]);
        assert_eq!(t.to_string(), "(f $x a)");
    }

    #[test]
    fn test_substitution_bind_and_get() {
        let mut s = Substitution::new();
        s.bind("x", Term::atom("a"));
        s.bind("x", Term::atom("b"));
        assert_eq!(s.len(), 1);
        assert_eq!(s.get("x"), Some(&Term::atom("b")));
        assert_eq!(s.get("y"), None);
    }

    #[test]
    fn test_substitution_display_is_sorted() {
        let s: Substitution = vec![
            ("y", Term::atom("b")),
            ("x", Term::atom("a")),
        ]
        .into_iter()
        .collect();
        assert_eq!(s.to_string(), "{x -> a, y -> b}");
    }

    #[test]
    fn test_namespace_tags() {
        assert_eq!(Namespace::Values.short(), "v");
        assert_eq!(Namespace::Definitions.short(), "d");
        assert_eq!(Namespace::Values.to_string(), "values");
    }
}
