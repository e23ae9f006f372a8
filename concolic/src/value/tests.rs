use super::*;
use crate::{ConcolicConfig, ConcolicSolver, PathConstraint};
use std::collections::{HashMap, HashSet};
use z3::SatResult;
use z3::ast::BV;

fn solver_with(assertions: &[Bool]) -> ConcolicSolver {
    let mut solver = ConcolicSolver::new();
    for a in assertions {
        solver.assert(a);
    }
    assert_eq!(solver.check(), SatResult::Sat);
    solver
}

fn int_eq(v: &SymbolicValue, n: i64) -> Bool {
    v.expr()._eq(&Dynamic::from_ast(&Int::from_i64(n)))
}

#[test]
fn fresh_values() {
    let x = SymbolicValue::fresh("x", ValueSort::default());
    assert_eq!(x.sort(), Some(ValueSort::Int));
    assert_eq!(x.to_string(), "x");
    assert_eq!(x, SymbolicValue::int("x"));

    let p = SymbolicValue::bool("p");
    assert_eq!(p.sort(), Some(ValueSort::Bool));
}

#[test]
fn wrap_keeps_term() {
    let bound = Int::new_const("y");
    let y = SymbolicValue::wrap(&bound);
    assert_eq!(y.to_string(), "y");
    assert_eq!(y.sort(), Some(ValueSort::Int));
}

#[test]
fn integer_operators_serialize_structurally() {
    let x = SymbolicValue::int("x");
    let y = SymbolicValue::int("y");
    let cases = [
        (BinaryOp::Equals, "(= x y)"),
        (BinaryOp::NotEquals, "(not (= x y))"),
        (BinaryOp::Lt, "(< x y)"),
        (BinaryOp::Le, "(<= x y)"),
        (BinaryOp::Gt, "(> x y)"),
        (BinaryOp::Ge, "(>= x y)"),
        (BinaryOp::Add, "(+ x y)"),
        (BinaryOp::Sub, "(- x y)"),
        (BinaryOp::Mul, "(* x y)"),
        (BinaryOp::Div, "(div x y)"),
    ];
    for (op, expected) in cases {
        let built = x.apply(op, &y).unwrap();
        assert_eq!(built.value().unwrap().to_string(), expected, "{op}");
    }
}

#[test]
fn literal_operands() {
    let x = SymbolicValue::int("x");
    assert_eq!(x.add(3).unwrap().value().unwrap().to_string(), "(+ x 3)");
    assert_eq!(x.ge(-2).unwrap().value().unwrap().to_string(), "(>= x (- 2))");
}

#[test]
fn boolean_operators_serialize_structurally() {
    let p = SymbolicValue::bool("p");
    let q = SymbolicValue::bool("q");
    assert_eq!(p.and(&q).unwrap().value().unwrap().to_string(), "(and p q)");
    assert_eq!(p.or(&q).unwrap().value().unwrap().to_string(), "(or p q)");
    assert_eq!(p.not().value().unwrap().to_string(), "(not p)");
}

#[test]
fn mismatched_sorts_yield_sentinel() {
    let x = SymbolicValue::int("x");
    let p = SymbolicValue::bool("p");
    for op in BinaryOp::ALL.iter().filter(|op| op.is_implemented()) {
        let built = x.apply(*op, &p).unwrap();
        assert!(built.is_mismatch(), "{op}");
        assert!(!built.is_truthy());
        let built = p.apply(*op, 4).unwrap();
        assert!(built.is_mismatch(), "{op}");
    }
}

#[test]
fn strict_mismatch_is_an_error() {
    let x = SymbolicValue::int("x");
    let p = SymbolicValue::bool("p");
    let err = x.apply_strict(BinaryOp::Equals, &p).unwrap_err();
    assert!(matches!(
        err,
        ConcolicError::SortMismatch {
            op: Operator::Binary(BinaryOp::Equals),
            ..
        }
    ));
    assert!(x.apply_strict(BinaryOp::Add, 1).is_ok());
}

#[test]
fn unary_mismatch_yields_sentinel() {
    let x = SymbolicValue::int("x");
    assert!(x.not().is_mismatch());
    assert_eq!(x.neg().value().unwrap().to_string(), "(- x)");
    assert!(SymbolicValue::bool("p").neg().is_mismatch());
}

#[test]
fn operator_undefined_on_sort() {
    let x = SymbolicValue::int("x");
    let p = SymbolicValue::bool("p");
    assert!(matches!(
        x.and(1),
        Err(ConcolicError::InvalidOperandSort { .. })
    ));
    assert!(matches!(
        p.lt(&p),
        Err(ConcolicError::InvalidOperandSort { .. })
    ));
    assert!(matches!(
        p.equals(SymbolicValue::bool("q")),
        Err(ConcolicError::InvalidOperandSort { .. })
    ));
    assert!(matches!(
        p.not_equals(&p),
        Err(ConcolicError::InvalidOperandSort { .. })
    ));
}

#[test]
fn unimplemented_operators_always_fail() {
    let x = SymbolicValue::int("x");
    let p = SymbolicValue::bool("p");
    let results = [
        x.modulo(2),
        x.xor(&x),
        x.shl(1),
        x.shr(&p),
        p.modulo(&p),
        x.xor(u64::MAX),
    ];
    for result in results {
        assert!(matches!(result, Err(ConcolicError::NotYetImplemented(_))));
    }
}

#[test]
fn unsupported_operand_is_propagated() {
    let x = SymbolicValue::int("x");
    let bv = Dynamic::from_ast(&BV::new_const("b", 8));
    assert!(matches!(
        x.add(bv),
        Err(ConcolicError::UnsupportedOperandKind(_))
    ));
}

#[test]
fn wide_literal_operands() {
    let x = SymbolicValue::int("x");
    assert_eq!(
        x.add(u64::MAX).unwrap().value().unwrap().to_string(),
        "(+ x 18446744073709551615)"
    );
    assert_eq!(
        x.lt(u128::MAX).unwrap().value().unwrap().to_string(),
        "(< x 340282366920938463463374607431768211455)"
    );
    assert_eq!(
        x.ge(i128::MIN).unwrap().value().unwrap().to_string(),
        "(>= x (- 170141183460469231731687303715884105728))"
    );
}

#[test]
fn wide_literal_concretizes_exactly() {
    let x = SymbolicValue::int("x");
    let solver = solver_with(&[int_eq(&x, 1)]);
    let ctx = ConcolicContext::new().with_solver(&solver);
    let sum = x.add(u64::MAX).unwrap().into_value().unwrap();
    assert_eq!(
        sum.concrete_value(&ctx).unwrap(),
        ConcreteValue::int(u64::MAX as u128 + 1)
    );
}

#[test]
fn unassigned_variable_without_model_completion() {
    let x = SymbolicValue::int("x");
    let p = SymbolicValue::bool("p");
    let solver = solver_with(&[int_eq(&x, 1)]);
    let config = ConcolicConfig {
        model_completion: false,
        ..Default::default()
    };
    let mut path = PathConstraint::new();
    let mut ctx = ConcolicContext::with_config(config)
        .with_solver(&solver)
        .with_oracle(&mut path);

    assert_eq!(x.concrete_value(&ctx).unwrap(), ConcreteValue::int(1));
    assert!(matches!(
        p.concretize(&ctx),
        Err(ConcolicError::EvaluationFailed(_))
    ));
    let mixed = p.or(&p).unwrap().into_value().unwrap();
    assert!(matches!(
        mixed.decide(&mut ctx),
        Err(ConcolicError::EvaluationFailed(_))
    ));
    drop(ctx);
    assert!(path.is_empty());
}

#[test]
fn structural_equality_and_hash() {
    let x = SymbolicValue::int("x");
    let a = x.add(1).unwrap().into_value().unwrap();
    let b = SymbolicValue::int("x").add(1).unwrap().into_value().unwrap();
    let c = x.add(2).unwrap().into_value().unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);

    let set: HashSet<SymbolicValue> = [a.clone(), b.clone(), c.clone()].into_iter().collect();
    assert_eq!(set.len(), 2);

    let mut seen = HashMap::new();
    seen.insert(a, "first");
    assert_eq!(seen.get(&b), Some(&"first"));
    assert_eq!(seen.get(&c), None);
}

#[test]
fn concretize_preconditions() {
    let x = SymbolicValue::int("x");
    let ctx = ConcolicContext::new();
    assert!(matches!(
        x.concretize(&ctx),
        Err(ConcolicError::NoSolverInstalled)
    ));

    let solver = ConcolicSolver::new();
    let ctx = ConcolicContext::new().with_solver(&solver);
    assert!(matches!(
        x.concretize(&ctx),
        Err(ConcolicError::NoModelAvailable)
    ));
}

#[test]
fn concretize_is_not_cached() {
    let x = SymbolicValue::int("x");
    let first = solver_with(&[int_eq(&x, 1)]);
    let second = solver_with(&[int_eq(&x, 2)]);

    let mut ctx = ConcolicContext::new().with_solver(&first);
    assert_eq!(x.concrete_value(&ctx).unwrap(), ConcreteValue::int(1));
    ctx.install_solver(&second);
    assert_eq!(x.concrete_value(&ctx).unwrap(), ConcreteValue::int(2));
}

#[test]
fn decide_rejects_integers_even_when_zero_or_one() {
    let x = SymbolicValue::int("x");
    for n in [0, 1] {
        let solver = solver_with(&[int_eq(&x, n)]);
        let mut path = PathConstraint::new();
        let mut ctx = ConcolicContext::new()
            .with_solver(&solver)
            .with_oracle(&mut path);
        assert!(matches!(
            x.decide(&mut ctx),
            Err(ConcolicError::NotABoolean(_))
        ));
        drop(ctx);
        assert!(path.is_empty());
    }
}

#[test]
fn decide_without_oracle() {
    let x = SymbolicValue::int("x");
    let solver = solver_with(&[int_eq(&x, 4)]);
    let mut ctx = ConcolicContext::new().with_solver(&solver);
    let even = x.equals(4).unwrap().into_value().unwrap();
    assert!(even.decide(&mut ctx).unwrap());
}

#[test]
fn decide_bare_model() {
    let p = SymbolicValue::bool("p");
    let solver = solver_with(&[p.expr().as_bool().unwrap()]);
    let model = solver.model().unwrap();
    let mut ctx = ConcolicContext::new().with_solver(model);
    assert!(p.decide(&mut ctx).unwrap());
    assert!(!p.not().value().unwrap().decide(&mut ctx).unwrap());
}

#[test]
fn free_variables_in_first_occurrence_order() {
    let x = SymbolicValue::int("x");
    let y = SymbolicValue::int("y");
    let sum = x.add(&y).unwrap().into_value().unwrap();
    let expr = sum.mul(&x).unwrap().into_value().unwrap();
    let pred = expr.gt(7).unwrap().into_value().unwrap();

    assert_eq!(pred.free_variables(), vec![x.clone(), y.clone()]);
    assert_eq!(pred.free_variable_names(), vec!["x", "y"]);
    assert!(SymbolicValue::wrap(&Int::from_i64(3)).free_variables().is_empty());
}
