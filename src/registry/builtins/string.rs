//! String builtins (§4.B "string").

use crate::value::Value;

use super::super::{ArgType, Category, FunctionRegistry, SafeFunction};

fn as_str(value: &Value) -> Result<&str, String> {
    value.as_str().ok_or_else(|| format!("expected a string, got {}", value.type_name()))
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(
        SafeFunction::new("trim", Category::String, 1, Some(1), |args| Ok(Value::String(as_str(&args[0])?.trim().to_owned())))
            .with_type_checks(vec![ArgType::String]),
    );

    registry.register(
        SafeFunction::new("toUpperCase", Category::String, 1, Some(1), |args| {
            Ok(Value::String(as_str(&args[0])?.to_uppercase()))
        })
        .with_type_checks(vec![ArgType::String]),
    );

    registry.register(
        SafeFunction::new("toLowerCase", Category::String, 1, Some(1), |args| {
            Ok(Value::String(as_str(&args[0])?.to_lowercase()))
        })
        .with_type_checks(vec![ArgType::String]),
    );

    registry.register(SafeFunction::new("slice", Category::String, 2, Some(3), |args| {
        let start = args[1].to_number();
        let end = args.get(2).map(Value::to_number);
        match &args[0] {
            Value::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                let (start, end) = slice_bounds(chars.len(), start, end);
                Ok(Value::String(chars[start..end].iter().collect()))
            }
            Value::Array(items) => {
                let (start, end) = slice_bounds(items.len(), start, end);
                Ok(Value::Array(items[start..end].to_vec()))
            }
            other => Err(format!("expected a string or array, got {}", other.type_name())),
        }
    }));

    registry.register(SafeFunction::new("includes", Category::String, 2, Some(2), |args| match &args[0] {
        Value::String(s) => Ok(Value::Bool(s.contains(as_str(&args[1])?))),
        Value::Array(items) => Ok(Value::Bool(items.contains(&args[1]))),
        other => Err(format!("expected a string or array, got {}", other.type_name())),
    }));

    registry.register(
        SafeFunction::new("startsWith", Category::String, 2, Some(2), |args| {
            Ok(Value::Bool(as_str(&args[0])?.starts_with(as_str(&args[1])?)))
        })
        .with_type_checks(vec![ArgType::String, ArgType::String]),
    );

    registry.register(
        SafeFunction::new("endsWith", Category::String, 2, Some(2), |args| {
            Ok(Value::Bool(as_str(&args[0])?.ends_with(as_str(&args[1])?)))
        })
        .with_type_checks(vec![ArgType::String, ArgType::String]),
    );

    registry.register(
        SafeFunction::new("replace", Category::String, 3, Some(3), |args| {
            Ok(Value::String(as_str(&args[0])?.replacen(as_str(&args[1])?, as_str(&args[2])?, 1)))
        })
        .with_type_checks(vec![ArgType::String, ArgType::String, ArgType::String]),
    );

    registry.register(
        SafeFunction::new("split", Category::String, 2, Some(2), |args| {
            let separator = as_str(&args[1])?;
            let parts = if separator.is_empty() {
                as_str(&args[0])?.chars().map(|c| Value::String(c.to_string())).collect()
            } else {
                as_str(&args[0])?.split(separator).map(|part| Value::String(part.to_owned())).collect()
            };
            Ok(Value::Array(parts))
        })
        .with_type_checks(vec![ArgType::String, ArgType::String]),
    );
}

/// Clamps a JS-style `slice(start, end)` pair (negative indices count from
/// the end) to a valid `start..end` range over a collection of length `len`.
fn slice_bounds(len: usize, start: f64, end: Option<f64>) -> (usize, usize) {
    let clamp = |n: f64| -> usize {
        if n.is_nan() {
            return 0;
        }
        let n = if n < 0.0 { (len as f64 + n).max(0.0) } else { n };
        (n as usize).min(len)
    };
    let start = clamp(start);
    let end = end.map(clamp).unwrap_or(len);
    if end < start {
        (start, start)
    } else {
        (start, end)
    }
}
