//! Utility builtins (§4.B "utility").

use crate::value::Value;

use super::super::{Category, FunctionRegistry, SafeFunction};

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(SafeFunction::new("isEmpty", Category::Utility, 1, Some(1), |args| {
        let empty = match &args[0] {
            Value::Undefined | Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        };
        Ok(Value::Bool(empty))
    }));

    registry.register(SafeFunction::new("hasField", Category::Utility, 2, Some(2), |args| {
        let name = args[1].as_str().ok_or_else(|| format!("expected a string, got {}", args[1].type_name()))?;
        let has = args[0].as_object().is_some_and(|map| map.contains_key(name));
        Ok(Value::Bool(has))
    }));
}
