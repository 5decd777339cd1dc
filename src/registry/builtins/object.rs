//! Object builtins (§4.B "object").

use crate::value::Value;

use super::super::{ArgType, Category, FunctionRegistry, SafeFunction};

fn as_object(value: &Value) -> Result<&indexmap::IndexMap<String, Value>, String> {
    value.as_object().ok_or_else(|| format!("expected an object, got {}", value.type_name()))
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(
        SafeFunction::new("Object.keys", Category::Object, 1, Some(1), |args| {
            Ok(Value::Array(as_object(&args[0])?.keys().map(|k| Value::String(k.clone())).collect()))
        })
        .with_type_checks(vec![ArgType::Object]),
    );

    registry.register(
        SafeFunction::new("Object.values", Category::Object, 1, Some(1), |args| {
            Ok(Value::Array(as_object(&args[0])?.values().cloned().collect()))
        })
        .with_type_checks(vec![ArgType::Object]),
    );

    registry.register(
        SafeFunction::new("Object.entries", Category::Object, 1, Some(1), |args| {
            let pairs = as_object(&args[0])?
                .iter()
                .map(|(k, v)| Value::Array(vec![Value::String(k.clone()), v.clone()]))
                .collect();
            Ok(Value::Array(pairs))
        })
        .with_type_checks(vec![ArgType::Object]),
    );
}
