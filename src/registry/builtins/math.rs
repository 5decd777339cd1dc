//! Math builtins (§4.B "math"): the `Math` static namespace's usual members,
//! registered under their qualified `Math.*` names so `Math.round(x)` resolves
//! through the evaluator's static-namespace dispatch path rather than falling
//! through to a method call on an undefined `Math` receiver.

use crate::value::Value;

use super::super::{Category, FunctionRegistry, SafeFunction};

fn num(value: &Value) -> f64 {
    value.to_number()
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(SafeFunction::new("Math.sqrt", Category::Math, 1, Some(1), |args| {
        Ok(Value::Number(num(&args[0]).sqrt()))
    }));
    registry.register(SafeFunction::new("Math.abs", Category::Math, 1, Some(1), |args| {
        Ok(Value::Number(num(&args[0]).abs()))
    }));
    registry.register(SafeFunction::new("Math.round", Category::Math, 1, Some(1), |args| {
        Ok(Value::Number(num(&args[0]).round()))
    }));
    registry.register(SafeFunction::new("Math.floor", Category::Math, 1, Some(1), |args| {
        Ok(Value::Number(num(&args[0]).floor()))
    }));
    registry.register(SafeFunction::new("Math.ceil", Category::Math, 1, Some(1), |args| {
        Ok(Value::Number(num(&args[0]).ceil()))
    }));
    registry.register(SafeFunction::new("Math.pow", Category::Math, 2, Some(2), |args| {
        Ok(Value::Number(num(&args[0]).powf(num(&args[1]))))
    }));
    registry.register(SafeFunction::new("Math.min", Category::Math, 1, None, |args| {
        Ok(Value::Number(args.iter().map(num).fold(f64::INFINITY, f64::min)))
    }));
    registry.register(SafeFunction::new("Math.max", Category::Math, 1, None, |args| {
        Ok(Value::Number(args.iter().map(num).fold(f64::NEG_INFINITY, f64::max)))
    }));
    registry.register(SafeFunction::new("Math.PI", Category::Math, 0, Some(0), |_args| {
        Ok(Value::Number(std::f64::consts::PI))
    }));
    registry.register(SafeFunction::new("Math.E", Category::Math, 0, Some(0), |_args| {
        Ok(Value::Number(std::f64::consts::E))
    }));
}
