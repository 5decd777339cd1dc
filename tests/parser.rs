//! Parser front-end tests (component D): lifting source text into the closed
//! `Node` set, and the metadata bundle that comes along with a successful
//! parse.

use vexpr::{NodeKind, ParseCache};

fn parse(text: &str) -> vexpr::ParsedExpression {
    ParseCache::new(16).get_or_parse(text).expect("expected a successful parse")
}

#[test]
fn parses_a_member_chain_into_nested_member_nodes() {
    let parsed = parse("item.profile.name");
    match &parsed.ast.kind {
        NodeKind::Member { object, .. } => {
            assert!(matches!(object.kind, NodeKind::Member { .. }));
        }
        other => panic!("expected a Member node, got {other:?}"),
    }
}

#[test]
fn records_builtin_root_dependencies() {
    let parsed = parse("item.price + inputs.tax - outputs.total");
    assert!(parsed.dependencies.contains("item"));
    assert!(parsed.dependencies.contains("inputs"));
    assert!(parsed.dependencies.contains("outputs"));
    assert!(!parsed.dependencies.contains("node"));
}

#[test]
fn non_builtin_identifiers_are_not_recorded_as_dependencies() {
    let parsed = parse("true && false");
    assert!(parsed.dependencies.is_empty());
}

#[test]
fn records_bare_and_qualified_call_targets() {
    let parsed = parse("Math.round(item.price) + trim(item.name)");
    assert!(parsed.functions.contains("Math.round"));
    assert!(parsed.functions.contains("trim"));
}

#[test]
fn a_member_call_on_a_non_namespace_receiver_is_not_recorded_as_qualified() {
    let parsed = parse("item.name.toUpperCase()");
    assert!(!parsed.functions.iter().any(|f| f.contains("item")));
}

#[test]
fn is_simple_is_true_for_identifier_member_and_binary_only() {
    assert!(parse("item.price").is_simple);
    assert!(parse("item.price + 1").is_simple);
    assert!(!parse("item.price > 0 ? 1 : 0").is_simple);
    assert!(!parse("trim(item.name)").is_simple);
}

#[test]
fn depth_counts_nesting_of_a_conditional_inside_a_binary() {
    let shallow = parse("1 + 2");
    let deeper = parse("(1 > 0 ? 2 : 3) + 4");
    assert!(deeper.depth > shallow.depth);
}

#[test]
fn complexity_grows_with_richer_node_shapes() {
    let flat = parse("1 + 2");
    let richer = parse("item.list.filter(x => x.active).map(x => x.price)");
    assert!(richer.complexity > flat.complexity);
}

#[test]
fn rejects_multiple_statements() {
    let err = ParseCache::new(4).get_or_parse("1; 2").unwrap_err();
    assert!(!err.message.is_empty());
}

#[test]
fn rejects_assignment() {
    assert!(ParseCache::new(4).get_or_parse("item.x = 1").is_err());
}

#[test]
fn rejects_instanceof() {
    assert!(ParseCache::new(4).get_or_parse("item instanceof Array").is_err());
}

#[test]
fn rejects_delete_and_bitwise_operators() {
    assert!(ParseCache::new(4).get_or_parse("delete item.name").is_err());
    assert!(ParseCache::new(4).get_or_parse("item.flags & 1").is_err());
}

#[test]
fn rejects_template_literals_and_new() {
    assert!(ParseCache::new(4).get_or_parse("`hi ${item.name}`").is_err());
    assert!(ParseCache::new(4).get_or_parse("new Array()").is_err());
}

#[test]
fn array_literal_preserves_elisions_as_holes() {
    let parsed = parse("[1, , 3]");
    match &parsed.ast.kind {
        NodeKind::Array(elements) => {
            assert_eq!(elements.len(), 3);
            assert!(elements[1].is_none());
        }
        other => panic!("expected an Array node, got {other:?}"),
    }
}

#[test]
fn arrow_function_parses_as_a_single_expression_body() {
    let parsed = parse("item.list.map(x => x.price * 2)");
    match &parsed.ast.kind {
        NodeKind::Call { arguments, .. } => match &arguments[0].kind {
            NodeKind::Arrow { params, body } => {
                assert_eq!(params, &["x".to_owned()]);
                assert!(matches!(body.kind, NodeKind::Binary { .. }));
            }
            other => panic!("expected an Arrow node, got {other:?}"),
        },
        other => panic!("expected a Call node, got {other:?}"),
    }
}

#[test]
fn caches_negative_results_too() {
    let mut cache = ParseCache::new(4);
    let first = cache.get_or_parse("1;2");
    let second = cache.get_or_parse("1;2");
    assert!(first.is_err());
    assert_eq!(first, second);
}
