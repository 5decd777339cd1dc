//! Array builtins (§4.B "array").

use ahash::AHashSet;

use crate::value::{format_number, Value};

use super::super::{ArgType, Category, FunctionRegistry, SafeFunction};

fn as_array(value: &Value) -> Result<&[Value], String> {
    value.as_array().ok_or_else(|| format!("expected an array, got {}", value.type_name()))
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(
        SafeFunction::new("length", Category::Array, 1, Some(1), |args| {
            Ok(Value::Number(as_array(&args[0])?.len() as f64))
        })
        .with_type_checks(vec![ArgType::Array]),
    );

    registry.register(SafeFunction::new("join", Category::Array, 1, Some(2), |args| {
        let separator = args.get(1).map(|v| v.to_display_string()).unwrap_or_else(|| ",".to_owned());
        let joined = as_array(&args[0])?
            .iter()
            .map(|v| if v.is_nullish() { String::new() } else { v.to_display_string() })
            .collect::<Vec<_>>()
            .join(&separator);
        Ok(Value::String(joined))
    }));

    registry.register(
        SafeFunction::new("first", Category::Array, 1, Some(1), |args| {
            Ok(as_array(&args[0])?.first().cloned().unwrap_or(Value::Undefined))
        })
        .with_type_checks(vec![ArgType::Array]),
    );

    registry.register(
        SafeFunction::new("last", Category::Array, 1, Some(1), |args| {
            Ok(as_array(&args[0])?.last().cloned().unwrap_or(Value::Undefined))
        })
        .with_type_checks(vec![ArgType::Array]),
    );

    registry.register(
        SafeFunction::new("reverse", Category::Array, 1, Some(1), |args| {
            let mut items = as_array(&args[0])?.to_vec();
            items.reverse();
            Ok(Value::Array(items))
        })
        .with_type_checks(vec![ArgType::Array]),
    );

    registry.register(
        SafeFunction::new("flatten", Category::Array, 1, Some(1), |args| {
            let mut flat = Vec::new();
            for item in as_array(&args[0])? {
                match item {
                    Value::Array(inner) => flat.extend(inner.iter().cloned()),
                    other => flat.push(other.clone()),
                }
            }
            Ok(Value::Array(flat))
        })
        .with_type_checks(vec![ArgType::Array]),
    );

    registry.register(
        SafeFunction::new("unique", Category::Array, 1, Some(1), |args| {
            let mut seen: AHashSet<String> = AHashSet::new();
            let mut out = Vec::new();
            for item in as_array(&args[0])? {
                let key = dedup_key(item);
                if seen.insert(key) {
                    out.push(item.clone());
                }
            }
            Ok(Value::Array(out))
        })
        .with_type_checks(vec![ArgType::Array]),
    );

    registry.register(SafeFunction::new("chunk", Category::Array, 2, Some(2), |args| {
        let size = args[1].to_number();
        if !size.is_finite() || size < 1.0 {
            return Err("chunk size must be a positive number".to_owned());
        }
        let size = size as usize;
        let chunks = as_array(&args[0])?
            .chunks(size)
            .map(|chunk| Value::Array(chunk.to_vec()))
            .collect();
        Ok(Value::Array(chunks))
    }));
}

/// A string key distinguishing values for `unique`'s dedup set. `NaN` is
/// never equal to itself in this language, so two `NaN` entries are kept
/// distinct by tagging each with its position-independent discriminant only
/// (matching JS's `SameValueZero`, which treats all `NaN`s as equal to each
/// other — so unlike IEEE-754 equality, two `NaN`s here *do* dedup).
fn dedup_key(value: &Value) -> String {
    match value {
        Value::Undefined => "u".to_owned(),
        Value::Null => "n".to_owned(),
        Value::Bool(b) => format!("b{b}"),
        Value::Number(n) if n.is_nan() => "f:NaN".to_owned(),
        Value::Number(n) => format!("f{}", format_number(*n)),
        Value::String(s) => format!("s{s}"),
        Value::Array(_) | Value::Object(_) => format!("o{value:?}"),
    }
}
