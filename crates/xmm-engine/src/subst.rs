//! Term substitution transform
//!
//! `apply` performs a simultaneous, single-pass substitution: variables
//! bound in the mapping are replaced by their replacement terms, unbound
//! variables are left untouched, and replacements are not re-substituted.

use xmm_sdk::{NativeError, Substitution, Term};

/// Reject structurally invalid terms before applying a substitution.
pub(crate) fn validate(term: &Term) -> Result<(), NativeError> {
    match term {
        Term::Atom(_) | Term::Var(_) => Ok(()),
        Term::App(items) => {
            if items.is_empty() {
                return Err(NativeError::MalformedTerm("empty application".to_string()));
            }
            for item in items {
                validate(item)?;
            }
            Ok(())
        }
    }
}

pub(crate) fn apply(term: &Term, subst: &Substitution) -> Term {
    match term {
        Term::Atom(_) => term.clone(),
        Term::Var(name) => subst.get(name).cloned().unwrap_or_else(|| term.clone()),
        Term::App(items) => Term::App(items.iter().map(|item| apply(item, subst)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subst_of(pairs: Vec<(&str, Term)>) -> Substitution {
        pairs.into_iter().collect()
    }

    #[test]
    fn test_atom_unchanged() {
        let term = Term::atom("a");
        let subst = subst_of(vec![("a", Term::atom("b"))]);
        // "a" is an atom, not a variable; the binding does not apply
        assert_eq!(apply(&term, &subst), Term::atom("a"));
    }

    #[test]
    fn test_var_replaced() {
        let term = Term::var("x");
        let subst = subst_of(vec![("x", Term::atom("a"))]);
        assert_eq!(apply(&term, &subst), Term::atom("a"));
    }

    #[test]
    fn test_unbound_var_untouched() {
        let term = Term::var("x");
        assert_eq!(apply(&term, &Substitution::new()), Term::var("x"));
    }

    #[test]
    fn test_nested_application() {
        let term = Term::app(vec![
            Term::atom("f"),
            Term::var("x"),
            Term::app(vec![Term::atom("g"), Term::var("y")]),
        ]);
        let subst = subst_of(vec![("x", Term::atom("a")), ("y", Term::var("x"))]);
        assert_eq!(
            apply(&term, &subst),
            Term::app(vec![
                Term::atom("f"),
                Term::atom("a"),
                Term::app(vec![Term::atom("g"), Term::var("x")]),
            ])
        );
    }

    #[test]
    fn test_substitution_is_simultaneous() {
        // x -> $y must not be rewritten again by y -> a
        let term = Term::app(vec![Term::atom("f"), Term::var("x")]);
        let subst = subst_of(vec![("x", Term::var("y")), ("y", Term::atom("a"))]);
        assert_eq!(
            apply(&term, &subst),
            Term::app(vec![Term::atom("f"), Term::var("y")])
        );
    }

    #[test]
    fn test_validate_rejects_empty_application() {
        let term = Term::app(vec![Term::atom("f"), Term::App(vec![])]);
        assert_eq!(
            validate(&term).unwrap_err(),
            NativeError::MalformedTerm("empty application".to_string())
        );
        assert!(validate(&Term::atom("a")).is_ok());
    }
}
