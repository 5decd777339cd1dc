//! The six worked scenarios used to validate the whole pipeline end to end.

use indexmap::IndexMap;
use vexpr::{ExpressionContext, Orchestrator, PropertyKind, Schema, SerializeStrategy, TypeEntry, Value, ViolationKind};

fn obj(pairs: &[(&str, Value)]) -> Value {
    let mut map = IndexMap::new();
    for (k, v) in pairs {
        map.insert((*k).to_owned(), v.clone());
    }
    Value::Object(map)
}

/// 1. `Math.round(item.price * 1.2)` with `{item:{price:10.99}}` → `13`.
#[test]
fn scenario_1_qualified_math_call_over_a_context_member() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with("item", obj(&[("price", Value::Number(10.99))]));
    let result = orchestrator.evaluate_direct("Math.round(item.price * 1.2)", &ctx).unwrap();
    assert_eq!(result, Value::Number(13.0));
}

/// 2. `items.filter(x => x.active).map(x => x.name)` → `["A"]`.
#[test]
fn scenario_2_chained_callback_methods() {
    let mut orchestrator = Orchestrator::new();
    let items = Value::Array(vec![
        obj(&[("active", Value::Bool(true)), ("name", Value::String("A".into()))]),
        obj(&[("active", Value::Bool(false)), ("name", Value::String("B".into()))]),
    ]);
    let ctx = ExpressionContext::new().with("items", items);
    let result = orchestrator.evaluate_direct("items.filter(x => x.active).map(x => x.name)", &ctx).unwrap();
    assert_eq!(result, Value::Array(vec![Value::String("A".into())]));
}

/// 3. `validate(eval("1+1"))` → not valid, `blocked_identifier` on `eval`.
#[test]
fn scenario_3_blocked_identifier_fails_validation() {
    let mut orchestrator = Orchestrator::new();
    let parsed = orchestrator.parse(r#"eval("1+1")"#).unwrap();
    let result = orchestrator.validate(&parsed);
    assert!(!result.is_valid());
    assert!(result.violations.iter().any(|v| v.kind == ViolationKind::BlockedIdentifier));
}

/// 4. Register `FileItem` (required `file_id, workspace_id, key, name`,
/// strategy `json`), evaluate `{"f":"{{item}}"}`, and recover the original
/// fields by parsing the outer JSON and then the embedded `f` field as JSON.
#[test]
fn scenario_4_registered_type_round_trips_through_a_template_hole() {
    let mut orchestrator = Orchestrator::new();
    orchestrator.register_type(TypeEntry {
        name: "FileItem".to_owned(),
        schema: Schema::new()
            .require("file_id")
            .require("workspace_id")
            .require("key")
            .require("name")
            .property("file_id", PropertyKind::String)
            .property("workspace_id", PropertyKind::String)
            .property("key", PropertyKind::String)
            .property("name", PropertyKind::String),
        strategy: SerializeStrategy::Json,
    });

    let file_item = obj(&[
        ("file_id", Value::String("f-1".into())),
        ("workspace_id", Value::String("w-1".into())),
        ("key", Value::String("uploads/f-1.png".into())),
        ("name", Value::String("photo.png".into())),
    ]);
    let ctx = ExpressionContext::new().with("item", file_item.clone());

    let result = orchestrator.evaluate_template(r#"{"f":"{{item}}"}"#, &ctx).unwrap();

    let outer: serde_json::Value = serde_json::from_str(&result.text).expect("outer text must be valid JSON");
    let inner_text = outer.get("f").and_then(serde_json::Value::as_str).expect("`f` must be a JSON string");
    let inner: serde_json::Value = serde_json::from_str(inner_text).expect("embedded field must itself be valid JSON");

    assert_eq!(inner.get("file_id").and_then(serde_json::Value::as_str), Some("f-1"));
    assert_eq!(inner.get("workspace_id").and_then(serde_json::Value::as_str), Some("w-1"));
    assert_eq!(inner.get("key").and_then(serde_json::Value::as_str), Some("uploads/f-1.png"));
    assert_eq!(inner.get("name").and_then(serde_json::Value::as_str), Some("photo.png"));
}

/// 5. `Hello {{item.name.toUpperCase()}}!` with `{item:{name:"world"}}` →
/// `"Hello WORLD!"`.
#[test]
fn scenario_5_template_with_a_string_method_call_in_its_hole() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with("item", obj(&[("name", Value::String("world".into()))]));
    let result = orchestrator.evaluate_template("Hello {{item.name.toUpperCase()}}!", &ctx).unwrap();
    assert_eq!(result.text, "Hello WORLD!");
}

/// 6. `[1,2,3].reduce((s,x) => s + x, 0)` → `6`; with no initial value and an
/// empty array, the callback body never runs and the result is `undefined`.
#[test]
fn scenario_6_reduce_with_and_without_an_initial_value() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new();

    let summed = orchestrator.evaluate_direct("[1,2,3].reduce((s,x) => s + x, 0)", &ctx).unwrap();
    assert_eq!(summed, Value::Number(6.0));

    let empty = orchestrator.evaluate_direct("[].reduce((s,x) => s + x)", &ctx).unwrap();
    assert_eq!(empty, Value::Undefined);
}
