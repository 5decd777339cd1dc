//! Conditional builtins (§4.B "conditional"). These exist as ordinary
//! registered functions rather than `Conditional`/`Logical` node sugar so
//! that callers can express branching as data (e.g. inside a template
//! context) without it being parsed as the language's own `?:`/`&&`/`||`.

use crate::value::Value;

use super::super::{Category, FunctionRegistry, SafeFunction};

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(SafeFunction::new("$if", Category::Conditional, 3, Some(3), |args| {
        Ok(if args[0].is_truthy() { args[1].clone() } else { args[2].clone() })
    }));

    registry.register(SafeFunction::new("$and", Category::Conditional, 1, None, |args| {
        Ok(Value::Bool(args.iter().all(Value::is_truthy)))
    }));

    registry.register(SafeFunction::new("$or", Category::Conditional, 1, None, |args| {
        Ok(Value::Bool(args.iter().any(Value::is_truthy)))
    }));

    registry.register(SafeFunction::new("$not", Category::Conditional, 1, Some(1), |args| {
        Ok(Value::Bool(!args[0].is_truthy()))
    }));
}
