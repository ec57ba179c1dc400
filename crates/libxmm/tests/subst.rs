//! apply_subst through the bound module function

use std::sync::Arc;

use libxmm::init;
use xmm_sdk::{NativeError, Substitution, Term, Value};

fn sample_term() -> Term {
    Term::app(vec![
        Term::atom("f"),
        Term::var("x"),
        Term::app(vec![Term::atom("g"), Term::var("y"), Term::atom("c")]),
    ])
}

fn sample_subst() -> Substitution {
    vec![
        ("x", Term::atom("a")),
        ("y", Term::app(vec![Term::atom("h"), Term::var("z")])),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_apply_subst_rewrites_variables() {
    let module = init().unwrap();
    let result = module
        .call(
            "apply_subst",
            &[Value::term(sample_term()), Value::subst(sample_subst())],
        )
        .unwrap();

    let expected = Term::app(vec![
        Term::atom("f"),
        Term::atom("a"),
        Term::app(vec![
            Term::atom("g"),
            Term::app(vec![Term::atom("h"), Term::var("z")]),
            Term::atom("c"),
        ]),
    ]);
    assert_eq!(result, Value::term(expected));
}

#[test]
fn test_apply_subst_is_referentially_transparent() {
    let module = init().unwrap();
    let term = Value::term(sample_term());
    let mapping = Value::subst(sample_subst());

    let first = module
        .call("apply_subst", &[term.clone(), mapping.clone()])
        .unwrap();
    let second = module.call("apply_subst", &[term, mapping]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_apply_subst_does_not_mutate_inputs() {
    let module = init().unwrap();
    let term = Arc::new(sample_term());
    let mapping = Arc::new(sample_subst());

    module
        .call(
            "apply_subst",
            &[
                Value::Term(Arc::clone(&term)),
                Value::Subst(Arc::clone(&mapping)),
            ],
        )
        .unwrap();

    assert_eq!(*term, sample_term());
    assert_eq!(*mapping, sample_subst());
}

#[test]
fn test_unbound_variables_pass_through() {
    let module = init().unwrap();
    let term = Value::term(Term::var("unbound"));
    let result = module
        .call("apply_subst", &[term.clone(), Value::subst(Substitution::new())])
        .unwrap();
    assert_eq!(result, term);
}

#[test]
fn test_failures_are_forwarded_verbatim() {
    let module = init().unwrap();

    // Wrong argument count is rejected before forwarding
    assert_eq!(
        module.call("apply_subst", &[Value::Null]).unwrap_err(),
        NativeError::Arity {
            callable: "apply_subst".to_string(),
            expected: 2,
            got: 1
        }
    );

    // Non-term argument
    assert_eq!(
        module
            .call(
                "apply_subst",
                &[Value::Int(3), Value::subst(Substitution::new())]
            )
            .unwrap_err(),
        NativeError::TypeMismatch {
            expected: "term".to_string(),
            got: "int".to_string()
        }
    );

    // Structurally invalid term
    assert_eq!(
        module
            .call(
                "apply_subst",
                &[
                    Value::term(Term::App(vec![])),
                    Value::subst(Substitution::new())
                ]
            )
            .unwrap_err(),
        NativeError::MalformedTerm("empty application".to_string())
    );
}
