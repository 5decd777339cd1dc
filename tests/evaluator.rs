//! Evaluator and orchestrator integration tests (components F/G): direct-mode
//! evaluation against a caller-supplied context, callback methods, equality
//! semantics, and template-hole splicing.

use vexpr::{ErrorKind, ExpressionContext, Orchestrator, Value};
use indexmap::IndexMap;

fn obj(pairs: &[(&str, Value)]) -> Value {
    let mut map = IndexMap::new();
    for (k, v) in pairs {
        map.insert((*k).to_owned(), v.clone());
    }
    Value::Object(map)
}

#[test]
fn evaluates_arithmetic_and_string_concatenation() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new();
    assert_eq!(orchestrator.evaluate_direct("1 + 2 * 3", &ctx).unwrap(), Value::Number(7.0));
    assert_eq!(
        orchestrator.evaluate_direct("'a' + 1", &ctx).unwrap(),
        Value::String("a1".into())
    );
}

#[test]
fn division_by_zero_yields_infinity_not_an_error() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new();
    assert_eq!(orchestrator.evaluate_direct("1 / 0", &ctx).unwrap(), Value::Number(f64::INFINITY));
    assert!(orchestrator.evaluate_direct("0 / 0", &ctx).unwrap().to_number().is_nan());
}

#[test]
fn member_access_reads_from_the_supplied_context() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with("item", obj(&[("price", Value::Number(9.5)), ("name", Value::String("Widget".into()))]));
    assert_eq!(orchestrator.evaluate_direct("item.price", &ctx).unwrap(), Value::Number(9.5));
    assert_eq!(
        orchestrator.evaluate_direct("item.name", &ctx).unwrap(),
        Value::String("Widget".into())
    );
}

#[test]
fn member_access_on_a_missing_property_is_undefined_not_an_error() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with("item", obj(&[("price", Value::Number(1.0))]));
    assert_eq!(orchestrator.evaluate_direct("item.missing", &ctx).unwrap(), Value::Undefined);
}

#[test]
fn nullish_member_chain_short_circuits_to_undefined() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with("item", Value::Null);
    assert_eq!(orchestrator.evaluate_direct("item.name", &ctx).unwrap(), Value::Undefined);
}

/// Calls to unregistered functions are flagged by the static validator
/// regardless of which branch would run at evaluation time, so short-circuit
/// is exercised here with strict validation switched off — the only way to
/// observe, in a side-effect-free language, that the untaken branch's runtime
/// error never actually fires.
fn non_strict() -> Orchestrator {
    let mut config = vexpr::OrchestratorConfig::default();
    config.strict = false;
    Orchestrator::with_config(config)
}

#[test]
fn conditional_short_circuits_the_untaken_branch() {
    let mut orchestrator = non_strict();
    let ctx = ExpressionContext::new();
    assert_eq!(
        orchestrator.evaluate_direct("true ? 'yes' : undefinedBoom()", &ctx).unwrap(),
        Value::String("yes".into())
    );
}

#[test]
fn logical_and_or_short_circuit() {
    let mut orchestrator = non_strict();
    let ctx = ExpressionContext::new();
    assert_eq!(orchestrator.evaluate_direct("false && undefinedBoom()", &ctx).unwrap(), Value::Bool(false));
    assert_eq!(orchestrator.evaluate_direct("true || undefinedBoom()", &ctx).unwrap(), Value::Bool(true));
}

#[test]
fn nullish_coalesce_only_triggers_on_null_or_undefined() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new();
    assert_eq!(orchestrator.evaluate_direct("null ?? 'fallback'", &ctx).unwrap(), Value::String("fallback".into()));
    assert_eq!(orchestrator.evaluate_direct("0 ?? 'fallback'", &ctx).unwrap(), Value::Number(0.0));
}

#[test]
fn strict_equality_does_not_coerce_and_rejects_nan() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new();
    assert_eq!(orchestrator.evaluate_direct("1 === '1'", &ctx).unwrap(), Value::Bool(false));
    assert_eq!(orchestrator.evaluate_direct("NaN === NaN", &ctx).unwrap(), Value::Bool(false));
}

#[test]
fn strict_equality_on_arrays_and_objects_is_structural() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new();
    assert_eq!(orchestrator.evaluate_direct("[1,2] === [1,2]", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(orchestrator.evaluate_direct("[1,2] === [1,3]", &ctx).unwrap(), Value::Bool(false));
}

#[test]
fn loose_equality_coerces_numbers_and_strings() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new();
    assert_eq!(orchestrator.evaluate_direct("1 == '1'", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(orchestrator.evaluate_direct("null == undefined", &ctx).unwrap(), Value::Bool(true));
}

#[test]
fn in_operator_checks_object_keys_and_array_indices() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with("item", obj(&[("name", Value::String("x".into()))]));
    assert_eq!(orchestrator.evaluate_direct("'name' in item", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(orchestrator.evaluate_direct("0 in [1,2,3]", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(orchestrator.evaluate_direct("5 in [1,2,3]", &ctx).unwrap(), Value::Bool(false));
}

#[test]
fn typeof_reports_the_surface_languages_type_names() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new();
    assert_eq!(
        orchestrator.evaluate_direct("typeof 1", &ctx).unwrap(),
        Value::String("number".into())
    );
    assert_eq!(
        orchestrator.evaluate_direct("typeof 'x'", &ctx).unwrap(),
        Value::String("string".into())
    );
    assert_eq!(
        orchestrator.evaluate_direct("typeof undefinedVar", &ctx).unwrap(),
        Value::String("undefined".into())
    );
}

#[test]
fn filter_map_find_some_every_operate_over_array_context_values() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with(
        "item",
        obj(&[(
            "list",
            Value::Array(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0), Value::Number(4.0)]),
        )]),
    );

    assert_eq!(
        orchestrator.evaluate_direct("item.list.filter(x => x > 2)", &ctx).unwrap(),
        Value::Array(vec![Value::Number(3.0), Value::Number(4.0)])
    );
    assert_eq!(
        orchestrator.evaluate_direct("item.list.map(x => x * 10)", &ctx).unwrap(),
        Value::Array(vec![Value::Number(10.0), Value::Number(20.0), Value::Number(30.0), Value::Number(40.0)])
    );
    assert_eq!(orchestrator.evaluate_direct("item.list.find(x => x > 2)", &ctx).unwrap(), Value::Number(3.0));
    assert_eq!(orchestrator.evaluate_direct("item.list.some(x => x > 3)", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(orchestrator.evaluate_direct("item.list.every(x => x > 0)", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(orchestrator.evaluate_direct("item.list.every(x => x > 1)", &ctx).unwrap(), Value::Bool(false));
}

#[test]
fn reduce_with_no_initial_value_seeds_the_accumulator_with_undefined() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with(
        "item",
        obj(&[("list", Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]))]),
    );
    // acc starts undefined, so acc + x on the first step is NaN + 1 = NaN, and
    // every subsequent step stays NaN.
    let result = orchestrator.evaluate_direct("item.list.reduce((acc, x) => acc + x)", &ctx).unwrap();
    assert!(result.to_number().is_nan());
}

#[test]
fn reduce_with_an_initial_value_accumulates_left_to_right() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with(
        "item",
        obj(&[("list", Value::Array(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]))]),
    );
    let result = orchestrator.evaluate_direct("item.list.reduce((acc, x) => acc + x, 0)", &ctx).unwrap();
    assert_eq!(result, Value::Number(6.0));
}

#[test]
fn callback_overlay_context_does_not_mutate_the_base_context() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with("item", obj(&[("list", Value::Array(vec![Value::Number(1.0)]))]));
    orchestrator.evaluate_direct("item.list.map(x => x + 1)", &ctx).unwrap();
    // `x` was only ever bound inside the callback's overlay; it must not leak.
    assert_eq!(orchestrator.evaluate_direct("typeof x", &ctx).unwrap(), Value::String("undefined".into()));
}

#[test]
fn a_qualified_static_namespace_call_evaluates_through_the_registry() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with("item", obj(&[("price", Value::Number(9.6))]));
    assert_eq!(orchestrator.evaluate_direct("Math.round(item.price)", &ctx).unwrap(), Value::Number(10.0));
}

#[test]
fn a_string_method_call_evaluates_through_the_registry() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with("item", obj(&[("name", Value::String("widget".into()))]));
    assert_eq!(
        orchestrator.evaluate_direct("item.name.toUpperCase()", &ctx).unwrap(),
        Value::String("WIDGET".into())
    );
}

#[test]
fn security_violations_surface_as_security_errors_in_strict_mode() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new();
    let err = orchestrator.evaluate_direct("eval('1')", &ctx).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Security);
}

#[test]
fn void_is_blocked_by_strict_validation_but_still_evaluates_in_non_strict_mode() {
    let mut strict = Orchestrator::new();
    let ctx = ExpressionContext::new();
    let err = strict.evaluate_direct("void 1", &ctx).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Security);

    let mut permissive = non_strict();
    assert_eq!(permissive.evaluate_direct("void 1", &ctx).unwrap(), Value::Undefined);
}

#[test]
fn calling_an_unregistered_function_is_a_runtime_error() {
    // Strict mode already rejects this at validate time with a security
    // error, so disable it to exercise the evaluator's own error path.
    let mut orchestrator = non_strict();
    let ctx = ExpressionContext::new();
    let err = orchestrator.evaluate_direct("notRegistered(1)", &ctx).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Runtime);
}

#[test]
fn template_mode_splices_every_hole_and_leaves_surrounding_text_untouched() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new().with("item", obj(&[("name", Value::String("Widget".into()))]));
    let result = orchestrator.evaluate_template("Hello {{ item.name }}, total is {{ 2 + 2 }}.", &ctx).unwrap();
    assert_eq!(result.text, "Hello Widget, total is 4.");
    assert_eq!(result.holes.len(), 2);
}

#[test]
fn empty_holes_pass_through_as_literal_text() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new();
    let result = orchestrator.evaluate_template("before {{ }} after", &ctx).unwrap();
    assert_eq!(result.text, "before {{ }} after");
}

#[test]
fn nullish_hole_results_render_as_empty_string() {
    let mut orchestrator = Orchestrator::new();
    let ctx = ExpressionContext::new();
    let result = orchestrator.evaluate_template("[{{ null }}]", &ctx).unwrap();
    assert_eq!(result.text, "[]");
}
