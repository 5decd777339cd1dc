//! `ExpressionContext` and the overlay mechanism used by callback evaluation
//! (§3 "ExpressionContext", §4.F "Callback engine").

use ahash::AHashMap;

use crate::value::Value;

/// The fixed set of recognized free-variable roots (§6). Any other
/// identifier is only bound if the caller added it to the context.
pub const BUILTIN_ROOTS: &[&str] = &["item", "inputs", "outputs", "node", "execution"];

/// A read-only mapping from name to value supplied by the caller.
///
/// Evaluating an expression never mutates its context (§3 invariant, §8
/// "Purity of context"): `Evaluator::eval` only ever takes `&Context`.
#[derive(Debug, Clone, Default)]
pub struct ExpressionContext {
    values: AHashMap<String, Value>,
}

impl ExpressionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// A stable, sorted snapshot of the context's keys — used as part of the
    /// template cache key (§4.G "cached under (template, sorted context
    /// keys)").
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// A context view used during evaluation: either the caller's base context,
/// or an overlay adding callback parameter bindings on top of a parent view
/// (§4.F "overlay context", GLOSSARY "Overlay context").
///
/// Overlays are pure additions — looking up a name checks the overlay's own
/// bindings first, then falls through to the parent. The base
/// `ExpressionContext` is never touched.
pub enum ContextView<'a> {
    Base(&'a ExpressionContext),
    Overlay {
        parent: &'a ContextView<'a>,
        bindings: Vec<(String, Value)>,
    },
}

impl<'a> ContextView<'a> {
    pub fn base(ctx: &'a ExpressionContext) -> Self {
        ContextView::Base(ctx)
    }

    pub fn overlay(parent: &'a ContextView<'a>, bindings: Vec<(String, Value)>) -> Self {
        ContextView::Overlay { parent, bindings }
    }

    /// Resolves a name to a value, or `None` if unbound anywhere in the
    /// chain (the caller treats `None` as `Value::Undefined`, §4.F
    /// "Identifier").
    pub fn lookup(&self, name: &str) -> Option<Value> {
        match self {
            ContextView::Base(ctx) => ctx.get(name).cloned(),
            ContextView::Overlay { parent, bindings } => bindings
                .iter()
                .rev()
                .find(|(bound, _)| bound == name)
                .map(|(_, v)| v.clone())
                .or_else(|| parent.lookup(name)),
        }
    }
}
