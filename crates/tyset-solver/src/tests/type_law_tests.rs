//! Type system law tests.
//!
//! The universal laws the algebra and the decision procedures must satisfy:
//! reflexivity, top/bottom, union absorption, De Morgan, double negation,
//! excluded middle, canonicity of interning, and the arrow/tuple/recursion
//! behavior of semantic subtyping.

use crate::{SubtypeChecker, TypeId, TypeStore};

fn sample_types(store: &TypeStore) -> Vec<TypeId> {
    let a = store.type_var("a");
    vec![
        TypeId::EMPTY,
        TypeId::ANY,
        store.int_any(),
        store.int_value(5),
        store.int_range(Some(0), Some(255)),
        store.atom_any(),
        store.atom_lit("ok"),
        store.boolean(),
        store.bits_any(),
        store.bits(0, 8),
        store.tuple(vec![store.int_any(), store.atom_any()]),
        store.tuple(vec![]),
        store.fun(vec![store.int_any()], store.int_any()),
        store.record("point", vec![store.int_any(), store.int_any()]),
        store.map(store.atom_any(), store.int_any()),
        store.list(store.int_any()),
        store.var(a),
        store.intersect(store.var(a), store.int_any()),
    ]
}

// =============================================================================
// Reflexivity, top, bottom
// =============================================================================

#[test]
fn law_reflexivity() {
    super::init_tracing();
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    for t in sample_types(&store) {
        assert!(
            checker.is_subtype_of(t, t).unwrap(),
            "reflexivity failed for {}",
            store.display(t)
        );
    }
}

#[test]
fn law_top_and_bottom() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    for t in sample_types(&store) {
        assert!(
            checker.is_subtype_of(t, TypeId::ANY).unwrap(),
            "{} ≤ any failed",
            store.display(t)
        );
        assert!(
            checker.is_subtype_of(TypeId::EMPTY, t).unwrap(),
            "none ≤ {} failed",
            store.display(t)
        );
    }
}

// =============================================================================
// Boolean structure
// =============================================================================

#[test]
fn law_union_absorption() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    let samples = sample_types(&store);
    for &x in &samples {
        for &y in &samples {
            let u = store.union(x, y);
            assert!(checker.is_subtype_of(x, u).unwrap());
            let i = store.intersect(x, y);
            assert!(checker.is_subtype_of(i, x).unwrap());
        }
    }
}

#[test]
fn law_de_morgan_structural() {
    let store = TypeStore::new();
    let samples = sample_types(&store);
    for &x in &samples {
        for &y in &samples {
            assert_eq!(
                store.negate(store.union(x, y)),
                store.intersect(store.negate(x), store.negate(y))
            );
            assert_eq!(
                store.negate(store.intersect(x, y)),
                store.union(store.negate(x), store.negate(y))
            );
        }
    }
}

#[test]
fn law_double_negation_structural() {
    let store = TypeStore::new();
    for t in sample_types(&store) {
        assert_eq!(store.negate(store.negate(t)), t);
    }
}

#[test]
fn law_excluded_middle() {
    let store = TypeStore::new();
    for t in sample_types(&store) {
        assert_eq!(store.union(t, store.negate(t)), TypeId::ANY);
        assert_eq!(store.intersect(t, store.negate(t)), TypeId::EMPTY);
    }
}

#[test]
fn law_canonicity() {
    let store = TypeStore::new();
    let samples = sample_types(&store);
    for &x in &samples {
        for &y in &samples {
            assert_eq!(store.union(x, y), store.union(y, x));
            assert_eq!(store.intersect(x, y), store.intersect(y, x));
        }
        assert_eq!(store.union(x, x), x);
        assert_eq!(store.intersect(x, x), x);
    }
}

#[test]
fn law_antisymmetry() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    // Structurally different, semantically equal: (int → int) ∧ (any → int)
    // is exactly (any → int) by arrow contravariance.
    let int = store.int_any();
    let a = store.intersect(
        store.fun(vec![int], int),
        store.fun(vec![TypeId::ANY], int),
    );
    let b = store.fun(vec![TypeId::ANY], int);
    assert!(checker.is_subtype_of(a, b).unwrap());
    assert!(checker.is_subtype_of(b, a).unwrap());
    assert!(checker.is_empty(store.diff(a, b)).unwrap());
    assert!(checker.is_empty(store.diff(b, a)).unwrap());
}

// =============================================================================
// Constructor subtyping
// =============================================================================

#[test]
fn primitive_subtyping() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    assert!(checker.is_subtype_of(store.int_value(5), store.int_any()).unwrap());
    assert!(!checker.is_subtype_of(store.int_any(), store.int_value(5)).unwrap());
    assert!(
        checker
            .is_subtype_of(store.int_range(Some(0), Some(9)), store.int_range(Some(0), None))
            .unwrap()
    );
    assert!(checker.is_subtype_of(store.atom_lit("ok"), store.atom_any()).unwrap());
    assert!(!checker.is_subtype_of(store.atom_lit("ok"), store.atom_lit("error")).unwrap());
    // Distinct constructors are disjoint.
    assert!(checker.is_empty(store.intersect(store.int_any(), store.atom_any())).unwrap());
}

#[test]
fn tuple_subtyping_is_componentwise() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    let narrow = store.tuple(vec![store.int_value(1), store.atom_lit("ok")]);
    let wide = store.tuple(vec![store.int_any(), store.atom_any()]);
    assert!(checker.is_subtype_of(narrow, wide).unwrap());
    assert!(!checker.is_subtype_of(wide, narrow).unwrap());
}

#[test]
fn tuples_of_different_arity_are_disjoint() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    let one = store.tuple(vec![store.int_any()]);
    let two = store.tuple(vec![store.int_any(), store.int_any()]);
    assert!(checker.is_empty(store.intersect(one, two)).unwrap());
    assert!(!checker.is_subtype_of(one, two).unwrap());
}

#[test]
fn unary_tuple_distributes_over_union() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    let both = store.tuple(vec![store.union(store.int_any(), store.atom_any())]);
    let split = store.union(
        store.tuple(vec![store.int_any()]),
        store.tuple(vec![store.atom_any()]),
    );
    assert!(checker.is_subtype_of(both, split).unwrap());
    assert!(checker.is_subtype_of(split, both).unwrap());
}

#[test]
fn binary_tuple_does_not_distribute_over_union() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    let mixed = store.union(store.int_any(), store.atom_any());
    let square = store.tuple(vec![mixed, mixed]);
    let diagonal = store.union(
        store.tuple(vec![store.int_any(), store.int_any()]),
        store.tuple(vec![store.atom_any(), store.atom_any()]),
    );
    assert!(checker.is_subtype_of(diagonal, square).unwrap());
    // (int ∨ atom)² contains the mixed pairs the diagonal misses.
    assert!(!checker.is_subtype_of(square, diagonal).unwrap());
}

#[test]
fn arrow_contravariance_and_covariance() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    let int = store.int_any();
    // Wider domain is stronger.
    assert!(
        checker
            .is_subtype_of(store.fun(vec![TypeId::ANY], int), store.fun(vec![int], int))
            .unwrap()
    );
    assert!(
        !checker
            .is_subtype_of(store.fun(vec![int], int), store.fun(vec![TypeId::ANY], int))
            .unwrap()
    );
    // Narrower codomain is stronger.
    assert!(
        checker
            .is_subtype_of(store.fun(vec![int], int), store.fun(vec![int], TypeId::ANY))
            .unwrap()
    );
    assert!(
        !checker
            .is_subtype_of(store.fun(vec![int], TypeId::ANY), store.fun(vec![int], int))
            .unwrap()
    );
}

#[test]
fn arrows_of_different_arity_are_disjoint() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    let int = store.int_any();
    let unary = store.fun(vec![int], int);
    let binary = store.fun(vec![int, int], int);
    assert!(checker.is_empty(store.intersect(unary, binary)).unwrap());
}

#[test]
fn arrow_codomain_union_is_not_an_arrow_union() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    let int = store.int_any();
    let atom = store.atom_any();
    let lhs = store.fun(vec![int], store.union(int, atom));
    let rhs = store.union(store.fun(vec![int], int), store.fun(vec![int], atom));
    // The union of arrows is strictly smaller: a function may answer int for
    // some arguments and atom for others.
    assert!(!checker.is_subtype_of(lhs, rhs).unwrap());
    assert!(checker.is_subtype_of(rhs, lhs).unwrap());
}

// =============================================================================
// Recursive types
// =============================================================================

#[test]
fn recursive_union_with_base_case_is_inhabited() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    let t = store.fresh_recursive(|this| {
        let pair = store.tuple(vec![this, this]);
        (*store.resolve(store.union(store.int_any(), pair))).clone()
    });
    assert!(!checker.is_empty(t).unwrap());
}

#[test]
fn recursive_type_without_base_case_is_empty() {
    // rec X. (any, X) has no finite inhabitant; the coinductive protocol
    // settles it empty.
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    let t = store.fresh_recursive(|this| {
        (*store.resolve(store.tuple(vec![TypeId::ANY, this]))).clone()
    });
    assert!(checker.is_empty(t).unwrap());
}

#[test]
fn recursive_subtyping_uses_the_coinductive_hypothesis() {
    super::init_tracing();
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    let narrow = store.fresh_recursive(|this| {
        (*store.resolve(store.tuple(vec![store.int_any(), this]))).clone()
    });
    let wide = store.fresh_recursive(|this| {
        (*store.resolve(store.tuple(vec![TypeId::ANY, this]))).clone()
    });
    assert!(checker.is_subtype_of(narrow, wide).unwrap());
}

#[test]
fn recursive_lists_subtyping() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    let ints = store.list(store.int_any());
    let mixed = store.list(store.union(store.int_any(), store.atom_any()));
    assert!(checker.is_subtype_of(ints, mixed).unwrap());
    assert!(!checker.is_subtype_of(mixed, ints).unwrap());
}

// =============================================================================
// Variables
// =============================================================================

#[test]
fn variable_subtyping_is_structural() {
    let store = TypeStore::new();
    let checker = SubtypeChecker::new(&store);
    let a = store.var(store.type_var("a"));
    let b = store.var(store.type_var("b"));
    let int = store.int_any();
    assert!(checker.is_subtype_of(a, a).unwrap());
    assert!(!checker.is_subtype_of(a, b).unwrap());
    // α ∧ int ≤ int holds for every assignment; int ≤ α for none in general.
    assert!(checker.is_subtype_of(store.intersect(a, int), int).unwrap());
    assert!(!checker.is_subtype_of(int, a).unwrap());
    assert!(!checker.is_subtype_of(a, int).unwrap());
}
