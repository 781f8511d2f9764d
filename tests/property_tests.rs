//! Property-based tests for the C backend
//!
//! These tests use proptest to verify invariants across many randomly
//! generated syntax trees, catching edge cases that hand-written tests might miss.

mod common;

use std::collections::HashSet;

use common::*;
use kiln::ast::Node;
use kiln::backend::CGenerator;
use proptest::prelude::*;

const BINARY_OPS: &[&str] = &["add", "sub", "mul", "div", "mod", "band", "bor", "shl", "lt", "eq", "and"];

/// Operator trees over small integer literals and identifiers.
fn arb_expr() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![(0u32..1000).prop_map(|n| int(&n.to_string())), "[a-z]{1,3}x".prop_map(|s| id(&s)),];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (prop::sample::select(BINARY_OPS), inner.clone(), inner.clone())
                .prop_map(|(op, l, r)| binop(op, l, r)),
            inner.clone().prop_map(|e| unop("neg", e)),
            inner.prop_map(paren),
        ]
    })
}

/// Count the operator nodes whose direct parent is also an operator.
fn nested_operators(node: &Node, parent_is_operator: bool) -> usize {
    use kiln::ast::NodeKind;
    let is_op = node.tag().is_operator();
    let here = usize::from(is_op && parent_is_operator);
    here + match &node.kind {
        NodeKind::BinaryOp { lhs, rhs, .. } => nested_operators(lhs, true) + nested_operators(rhs, true),
        NodeKind::UnaryOp { expr, .. } => nested_operators(expr, true),
        NodeKind::Paren { expr } => nested_operators(expr, false),
        _ => 0,
    }
}

fn count_parens(node: &Node) -> usize {
    use kiln::ast::NodeKind;
    match &node.kind {
        NodeKind::BinaryOp { lhs, rhs, .. } => count_parens(lhs) + count_parens(rhs),
        NodeKind::UnaryOp { expr, .. } => count_parens(expr),
        NodeKind::Paren { expr } => 1 + count_parens(expr),
        _ => 0,
    }
}

proptest! {
    /// Property: the same tree always lowers to the same text.
    #[test]
    fn generation_is_deterministic(expr in arb_expr()) {
        let program = block(vec![expr]);
        let generator = CGenerator::new();
        let first = generator.generate(&program).unwrap();
        let second = generator.generate(&program).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: every operator nested directly in an operator is wrapped once; nothing else adds parentheses.
    #[test]
    fn operators_nested_in_operators_are_parenthesized(expr in arb_expr()) {
        let expected = nested_operators(&expr, false) + count_parens(&expr);
        let code = CGenerator::new().generate(&block(vec![expr])).unwrap();
        let line = main_body(&code).remove(0);
        prop_assert_eq!(line.matches('(').count(), expected);
        prop_assert_eq!(line.matches(')').count(), expected);
    }

    /// Property: distinct literal positions yield distinct string records, one per literal.
    #[test]
    fn string_literal_names_are_unique(
        positions in prop::collection::hash_set(0usize..10_000, 1..20),
        value in "[a-z ]{0,12}",
    ) {
        let statements: Vec<Node> = positions.iter().map(|p| string(&value, *p)).collect();
        let code = CGenerator::new().generate(&block(statements)).unwrap();
        let names: HashSet<&str> = code
            .lines()
            .filter(|l| l.starts_with("static const struct"))
            .filter_map(|l| l.split_whitespace().find(|w| w.starts_with("__strlit_")))
            .collect();
        prop_assert_eq!(names.len(), positions.len());
        prop_assert_eq!(code.matches("typedef struct nlstring").count(), 1);
    }

    /// Property: each include appears at most once, however many literals request it.
    #[test]
    fn includes_are_deduplicated(count in 1usize..30) {
        let statements: Vec<Node> = (0..count).map(|i| boolean(i % 2 == 0)).collect();
        let code = CGenerator::new().generate(&block(statements)).unwrap();
        prop_assert_eq!(code.matches("#include <stdbool.h>").count(), 1);
    }
}
