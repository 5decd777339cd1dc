//! JSON builtins (§4.B "json"). Both directions are total: `parse` yields
//! `null` on malformed input and `stringify` yields the literal string
//! `"null"` on encode failure, rather than raising (§9 "resolved as
//! follows").

use crate::value::Value;

use super::super::{ArgType, Category, FunctionRegistry, SafeFunction};

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(
        SafeFunction::new("JSON.parse", Category::Json, 1, Some(1), |args| {
            let text = args[0].as_str().ok_or_else(|| format!("expected a string, got {}", args[0].type_name()))?;
            let parsed = serde_json::from_str::<serde_json::Value>(text).map(Value::from_json).unwrap_or(Value::Null);
            Ok(parsed)
        })
        .with_type_checks(vec![ArgType::String]),
    );

    registry.register(SafeFunction::new("JSON.stringify", Category::Json, 1, Some(1), |args| {
        let text = serde_json::to_string(&args[0].to_json()).unwrap_or_else(|_| "null".to_owned());
        Ok(Value::String(text))
    }));
}
