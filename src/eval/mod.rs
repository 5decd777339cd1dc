//! Tree-walking evaluator (component F, §4.F).

mod callback;
mod cache;
pub mod limits;

use std::cell::RefCell;

use crate::context::ContextView;
use crate::error::{EvalError, EvalResult};
use crate::node::{BinaryOp, LogicalOp, MemberProperty, Node, NodeKind, Scalar, UnaryOp};
use crate::parse::{CALLBACK_METHODS, STATIC_NAMESPACES};
use crate::registry::FunctionRegistry;
use crate::validate::is_blocked_property;
use crate::value::Value;

pub use cache::PropertyCache;
pub use limits::{Budget, ExecutionLimits};

/// Evaluates a single parsed expression tree against a function registry and
/// context. Constructed fresh per top-level `evaluate` call; the property
/// cache is borrowed from the orchestrator so it survives across calls.
pub struct Evaluator<'a> {
    registry: &'a FunctionRegistry,
    budget: &'a Budget,
    property_cache: RefCell<&'a mut PropertyCache>,
}

impl<'a> Evaluator<'a> {
    pub fn new(registry: &'a FunctionRegistry, budget: &'a Budget, property_cache: &'a mut PropertyCache) -> Self {
        Self {
            registry,
            budget,
            property_cache: RefCell::new(property_cache),
        }
    }

    pub fn eval(&self, node: &Node, ctx: &ContextView<'_>, depth: u32) -> EvalResult<Value> {
        if self.budget.timed_out() {
            return Err(EvalError::timeout("expression evaluation exceeded its time budget"));
        }
        if self.budget.depth_exceeded(depth) {
            return Err(EvalError::timeout("maximum evaluator recursion depth exceeded"));
        }

        match &node.kind {
            NodeKind::Literal(scalar) => Ok(scalar_to_value(scalar)),
            NodeKind::Identifier(name) => Ok(self.eval_identifier(name, ctx)),
            NodeKind::Member { object, property } => self.eval_member(object, property, ctx, depth),
            NodeKind::Call { callee, arguments } => self.eval_call(callee, arguments, ctx, depth),
            NodeKind::Unary { op, argument } => self.eval_unary(*op, argument, ctx, depth),
            NodeKind::Binary { op, left, right } => self.eval_binary(*op, left, right, ctx, depth),
            NodeKind::Logical { op, left, right } => self.eval_logical(*op, left, right, ctx, depth),
            NodeKind::Conditional { test, consequent, alternate } => {
                if self.eval(test, ctx, depth + 1)?.is_truthy() {
                    self.eval(consequent, ctx, depth + 1)
                } else {
                    self.eval(alternate, ctx, depth + 1)
                }
            }
            NodeKind::Array(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(match element {
                        Some(node) => self.eval(node, ctx, depth + 1)?,
                        None => Value::Undefined,
                    });
                }
                Ok(Value::Array(items))
            }
            NodeKind::Object(properties) => {
                let mut map = indexmap::IndexMap::new();
                for property in properties {
                    let key = match &property.key {
                        crate::node::PropertyKey::Identifier(name) => name.clone(),
                        crate::node::PropertyKey::String(s) => s.clone(),
                        crate::node::PropertyKey::Number(n) => crate::value::format_number(*n),
                    };
                    let value = self.eval(&property.value, ctx, depth + 1)?;
                    map.insert(key, value);
                }
                Ok(Value::Object(map))
            }
            NodeKind::Arrow { .. } => Err(EvalError::runtime(
                "arrow functions cannot be evaluated outside a callback method's first argument",
            )),
        }
    }

    fn eval_identifier(&self, name: &str, ctx: &ContextView<'_>) -> Value {
        match name {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "null" => Value::Null,
            "undefined" => Value::Undefined,
            "NaN" => Value::Number(f64::NAN),
            "Infinity" => Value::Number(f64::INFINITY),
            _ => ctx.lookup(name).unwrap_or(Value::Undefined),
        }
    }

    fn eval_member(&self, object: &Node, property: &MemberProperty, ctx: &ContextView<'_>, depth: u32) -> EvalResult<Value> {
        let receiver = self.eval(object, ctx, depth + 1)?;
        if receiver.is_nullish() {
            return Ok(Value::Undefined);
        }
        let key = match property {
            MemberProperty::Name(name) => name.clone(),
            MemberProperty::Computed(expr) => self.eval(expr, ctx, depth + 1)?.to_display_string(),
        };

        if let Some(cached) = self.property_cache.borrow_mut().get(&receiver, &key) {
            return Ok(cached);
        }
        let result = member_get(&receiver, &key)?;
        self.property_cache.borrow_mut().insert(&receiver, &key, result.clone());
        Ok(result)
    }

    fn eval_call(&self, callee: &Node, arguments: &[Node], ctx: &ContextView<'_>, depth: u32) -> EvalResult<Value> {
        match &callee.kind {
            NodeKind::Identifier(name) => {
                let args = self.eval_args(arguments, ctx, depth)?;
                self.registry.call(name, &args)
            }
            NodeKind::Member { object, property } => {
                let method = match property {
                    MemberProperty::Name(name) => name.as_str(),
                    MemberProperty::Computed(_) => {
                        return Err(EvalError::runtime("computed method names are not callable"));
                    }
                };

                if let NodeKind::Identifier(namespace) = &object.kind {
                    let qualified = format!("{namespace}.{method}");
                    if STATIC_NAMESPACES.contains(&namespace.as_str()) && self.registry.has(&qualified) {
                        let args = self.eval_args(arguments, ctx, depth)?;
                        return self.registry.call(&qualified, &args);
                    }
                }

                let receiver = self.eval(object, ctx, depth + 1)?;

                if CALLBACK_METHODS.contains(&method) && receiver.is_array() {
                    return self.eval_callback_call(method, receiver, arguments, ctx, depth);
                }

                let rest = self.eval_args(arguments, ctx, depth)?;
                self.registry.call_method(method, receiver, &rest)
            }
            _ => Err(EvalError::runtime("call target is not callable")),
        }
    }

    fn eval_callback_call(&self, method: &str, receiver: Value, arguments: &[Node], ctx: &ContextView<'_>, depth: u32) -> EvalResult<Value> {
        let (params, body) = match arguments.first().map(|n| &n.kind) {
            Some(NodeKind::Arrow { params, body }) => (params.as_slice(), body.as_ref()),
            _ => return Err(EvalError::runtime(format!("'{method}' requires an arrow function as its first argument"))),
        };
        let initial = if method == "reduce" {
            match arguments.get(1) {
                Some(node) => Some(self.eval(node, ctx, depth + 1)?),
                None => None,
            }
        } else {
            None
        };
        let array = receiver.as_array().unwrap_or(&[]);
        callback::run(self, method, array, params, body, ctx, initial, depth + 1)
    }

    fn eval_args(&self, arguments: &[Node], ctx: &ContextView<'_>, depth: u32) -> EvalResult<Vec<Value>> {
        arguments.iter().map(|arg| self.eval(arg, ctx, depth + 1)).collect()
    }

    fn eval_unary(&self, op: UnaryOp, argument: &Node, ctx: &ContextView<'_>, depth: u32) -> EvalResult<Value> {
        let value = self.eval(argument, ctx, depth + 1)?;
        Ok(match op {
            UnaryOp::Plus => Value::Number(value.to_number()),
            UnaryOp::Minus => Value::Number(-value.to_number()),
            UnaryOp::Not => Value::Bool(!value.is_truthy()),
            UnaryOp::TypeOf => Value::String(value.type_of().to_owned()),
            UnaryOp::Void => Value::Undefined,
        })
    }

    fn eval_binary(&self, op: BinaryOp, left: &Node, right: &Node, ctx: &ContextView<'_>, depth: u32) -> EvalResult<Value> {
        let l = self.eval(left, ctx, depth + 1)?;
        let r = self.eval(right, ctx, depth + 1)?;
        Ok(match op {
            BinaryOp::Add => add(&l, &r),
            BinaryOp::Sub => Value::Number(l.to_number() - r.to_number()),
            BinaryOp::Mul => Value::Number(l.to_number() * r.to_number()),
            BinaryOp::Div => Value::Number(l.to_number() / r.to_number()),
            BinaryOp::Mod => Value::Number(l.to_number() % r.to_number()),
            BinaryOp::Pow => Value::Number(l.to_number().powf(r.to_number())),
            BinaryOp::Eq => Value::Bool(loose_eq(&l, &r)),
            BinaryOp::Ne => Value::Bool(!loose_eq(&l, &r)),
            BinaryOp::StrictEq => Value::Bool(strict_eq(&l, &r)),
            BinaryOp::StrictNe => Value::Bool(!strict_eq(&l, &r)),
            BinaryOp::Lt => compare(&l, &r, |o| o == std::cmp::Ordering::Less),
            BinaryOp::Le => compare(&l, &r, |o| o != std::cmp::Ordering::Greater),
            BinaryOp::Gt => compare(&l, &r, |o| o == std::cmp::Ordering::Greater),
            BinaryOp::Ge => compare(&l, &r, |o| o != std::cmp::Ordering::Less),
            BinaryOp::In => Value::Bool(contains_key(&r, &l)),
        })
    }

    fn eval_logical(&self, op: LogicalOp, left: &Node, right: &Node, ctx: &ContextView<'_>, depth: u32) -> EvalResult<Value> {
        let l = self.eval(left, ctx, depth + 1)?;
        match op {
            LogicalOp::And => {
                if l.is_truthy() {
                    self.eval(right, ctx, depth + 1)
                } else {
                    Ok(l)
                }
            }
            LogicalOp::Or => {
                if l.is_truthy() {
                    Ok(l)
                } else {
                    self.eval(right, ctx, depth + 1)
                }
            }
            LogicalOp::NullishCoalesce => {
                if l.is_nullish() {
                    self.eval(right, ctx, depth + 1)
                } else {
                    Ok(l)
                }
            }
        }
    }
}

fn scalar_to_value(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Number(n) => Value::Number(*n),
        Scalar::String(s) => Value::String(s.clone()),
    }
}

/// Runtime-enforced property denylist plus array/string/object access rules
/// (§4.F "Member").
fn member_get(receiver: &Value, key: &str) -> EvalResult<Value> {
    if is_blocked_property(key) {
        return Err(EvalError::security(format!("access to blocked property '{key}' denied at runtime")));
    }
    Ok(match receiver {
        Value::Array(items) => {
            if key == "length" {
                Value::Number(items.len() as f64)
            } else {
                match key.parse::<usize>() {
                    Ok(index) => items.get(index).cloned().unwrap_or(Value::Undefined),
                    Err(_) => Value::Undefined,
                }
            }
        }
        Value::String(s) => {
            if key == "length" {
                Value::Number(s.chars().count() as f64)
            } else {
                Value::Undefined
            }
        }
        Value::Object(map) => map.get(key).cloned().unwrap_or(Value::Undefined),
        _ => Value::Undefined,
    })
}

/// `+` is the sole operator where string concatenation takes priority over
/// numeric coercion, matching the surface language's own `+` overload.
fn add(left: &Value, right: &Value) -> Value {
    if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
        Value::String(format!("{}{}", left.to_display_string(), right.to_display_string()))
    } else {
        Value::Number(left.to_number() + right.to_number())
    }
}

/// `===`/`!==`: no coercion; numbers compare by IEEE-754 equality (so `NaN
/// === NaN` is `false`, matching the surface language, not `SameValueZero`).
///
/// The surface language's `===` on objects/arrays is reference identity, but
/// every value flowing through this evaluator is an owned clone with no
/// tracked identity (§9 "Tree shapes and arenas" — there is no heap to take
/// an address in). Falling back to structural equality here is the closest
/// reachable approximation and keeps `x === x` true for the common case of
/// comparing a context value against itself.
fn strict_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined, Value::Undefined) => true,
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => left == right,
        _ => false,
    }
}

/// `==`/`!=`: numbers and booleans coerce to numbers; `null`/`undefined` are
/// mutually equal and equal only to each other; otherwise falls back to
/// strict equality.
fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Number(_), Value::Number(_))
        | (Value::String(_), Value::String(_))
        | (Value::Array(_), Value::Array(_))
        | (Value::Object(_), Value::Object(_)) => strict_eq(left, right),
        (Value::Bool(_), _) | (_, Value::Bool(_)) | (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            left.to_number() == right.to_number()
        }
        _ => false,
    }
}

fn compare(left: &Value, right: &Value, accept: impl Fn(std::cmp::Ordering) -> bool) -> Value {
    let ordering = if let (Value::String(a), Value::String(b)) = (left, right) {
        a.partial_cmp(b)
    } else {
        left.to_number().partial_cmp(&right.to_number())
    };
    match ordering {
        Some(order) => Value::Bool(accept(order)),
        None => Value::Bool(false), // NaN on either side: every relational comparison is false
    }
}

/// The `in` operator (§4.F "Binary"): `left in right`.
fn contains_key(right: &Value, left: &Value) -> bool {
    let key = left.to_display_string();
    match right {
        Value::Object(map) => map.contains_key(&key),
        Value::Array(items) => key.parse::<usize>().is_ok_and(|index| index < items.len()) || key == "length",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ExpressionContext;
    use crate::position::Position;

    fn lit(value: Scalar) -> Node {
        Node::new(Position::start(), NodeKind::Literal(value))
    }

    #[test]
    fn add_concatenates_when_either_side_is_a_string() {
        assert_eq!(add(&Value::String("a".into()), &Value::Number(1.0)), Value::String("a1".into()));
        assert_eq!(add(&Value::Number(1.0), &Value::Number(2.0)), Value::Number(3.0));
    }

    #[test]
    fn strict_eq_rejects_nan_equal_to_itself() {
        assert!(!strict_eq(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
    }

    #[test]
    fn evaluates_conditional_short_circuit() {
        let registry = FunctionRegistry::new();
        let budget = Budget::new(ExecutionLimits::default());
        let mut cache = PropertyCache::new(8);
        let evaluator = Evaluator::new(&registry, &budget, &mut cache);
        let ctx = ExpressionContext::new();
        let view = ContextView::base(&ctx);

        let node = Node::new(
            Position::start(),
            NodeKind::Conditional {
                test: Box::new(lit(Scalar::Bool(true))),
                consequent: Box::new(lit(Scalar::Number(1.0))),
                alternate: Box::new(lit(Scalar::Number(2.0))),
            },
        );
        assert_eq!(evaluator.eval(&node, &view, 0).unwrap(), Value::Number(1.0));
    }
}
