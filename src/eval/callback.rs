//! The callback engine driving `filter/map/find/some/every/reduce`
//! (§4.F "Callback engine").

use crate::context::ContextView;
use crate::node::Node;
use crate::value::Value;

use super::Evaluator;

/// Binds an Arrow's parameters positionally; params beyond the number of
/// supplied values bind to `undefined` (§4.F "excess Arrow parameters bind
/// to undefined").
fn bind(params: &[String], values: &[Value]) -> Vec<(String, Value)> {
    params
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), values.get(i).cloned().unwrap_or(Value::Undefined)))
        .collect()
}

/// Dispatches a single callback method call. `array` is the receiver's
/// element slice; `params`/`body` come from the first (Arrow) argument;
/// `initial` is `reduce`'s optional second argument.
pub fn run(
    evaluator: &Evaluator<'_>,
    method: &str,
    array: &[Value],
    params: &[String],
    body: &Node,
    base: &ContextView<'_>,
    initial: Option<Value>,
    depth: u32,
) -> super::EvalResult<Value> {
    let whole = Value::Array(array.to_vec());

    match method {
        "filter" => {
            let mut kept = Vec::new();
            for (index, element) in array.iter().enumerate() {
                let bindings = bind(params, &[element.clone(), Value::Number(index as f64), whole.clone()]);
                let overlay = ContextView::overlay(base, bindings);
                let truthy = evaluator.eval(body, &overlay, depth + 1).map(|v| v.is_truthy()).unwrap_or(false);
                if truthy {
                    kept.push(element.clone());
                }
            }
            Ok(Value::Array(kept))
        }
        "map" => {
            let mut mapped = Vec::with_capacity(array.len());
            for (index, element) in array.iter().enumerate() {
                let bindings = bind(params, &[element.clone(), Value::Number(index as f64), whole.clone()]);
                let overlay = ContextView::overlay(base, bindings);
                let value = evaluator.eval(body, &overlay, depth + 1).unwrap_or(Value::Undefined);
                mapped.push(value);
            }
            Ok(Value::Array(mapped))
        }
        "find" => {
            for (index, element) in array.iter().enumerate() {
                let bindings = bind(params, &[element.clone(), Value::Number(index as f64), whole.clone()]);
                let overlay = ContextView::overlay(base, bindings);
                let truthy = evaluator.eval(body, &overlay, depth + 1).map(|v| v.is_truthy()).unwrap_or(false);
                if truthy {
                    return Ok(element.clone());
                }
            }
            Ok(Value::Undefined)
        }
        "some" => {
            for (index, element) in array.iter().enumerate() {
                let bindings = bind(params, &[element.clone(), Value::Number(index as f64), whole.clone()]);
                let overlay = ContextView::overlay(base, bindings);
                let truthy = evaluator.eval(body, &overlay, depth + 1).map(|v| v.is_truthy()).unwrap_or(false);
                if truthy {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        "every" => {
            for (index, element) in array.iter().enumerate() {
                let bindings = bind(params, &[element.clone(), Value::Number(index as f64), whole.clone()]);
                let overlay = ContextView::overlay(base, bindings);
                let truthy = evaluator.eval(body, &overlay, depth + 1).map(|v| v.is_truthy()).unwrap_or(false);
                if !truthy {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }
        "reduce" => {
            // §9 "resolved as follows": no initial value seeds the
            // accumulator with `undefined`, never the first element.
            let mut accumulator = initial.unwrap_or(Value::Undefined);
            for (index, element) in array.iter().enumerate() {
                let bindings = bind(
                    params,
                    &[accumulator.clone(), element.clone(), Value::Number(index as f64), whole.clone()],
                );
                let overlay = ContextView::overlay(base, bindings);
                match evaluator.eval(body, &overlay, depth + 1) {
                    Ok(next) => accumulator = next,
                    Err(_) => {} // keep prior accumulator (§4.F "reduce keeps the prior accumulator")
                }
            }
            Ok(accumulator)
        }
        other => Err(super::EvalError::runtime(format!("unknown callback method '{other}'"))),
    }
}
