//! Function registry (component B, §4.B).

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;

use crate::error::EvalError;
use crate::value::Value;

/// The positional type checks a `SafeFunction` may declare (§3 "typeChecks").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Any,
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl ArgType {
    fn accepts(self, value: &Value) -> bool {
        match self {
            ArgType::Any => true,
            ArgType::String => matches!(value, Value::String(_)),
            ArgType::Number => matches!(value, Value::Number(_)),
            ArgType::Boolean => matches!(value, Value::Bool(_)),
            ArgType::Array => value.is_array(),
            ArgType::Object => value.is_plain_object(),
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgType::Any => "any",
            ArgType::String => "string",
            ArgType::Number => "number",
            ArgType::Boolean => "boolean",
            ArgType::Array => "array",
            ArgType::Object => "object",
        };
        f.write_str(name)
    }
}

/// The category a builtin belongs to, used by `FunctionRegistry::list` and
/// `stats` (§4.B "Default set (categories)").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, serde::Serialize, serde::Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    String,
    Array,
    Object,
    Math,
    Date,
    Json,
    Crypto,
    Conditional,
    Utility,
    Custom,
}

pub type FunctionImpl = Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

/// A named, arity- and type-checked safe callable (§3 "SafeFunction").
#[derive(Clone)]
pub struct SafeFunction {
    pub name: String,
    pub category: Category,
    pub min_args: usize,
    pub max_args: Option<usize>,
    pub type_checks: Option<Vec<ArgType>>,
    implementation: FunctionImpl,
}

impl fmt::Debug for SafeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeFunction")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish_non_exhaustive()
    }
}

impl SafeFunction {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        min_args: usize,
        max_args: Option<usize>,
        implementation: impl Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        let max_args = max_args;
        debug_assert!(max_args.is_none_or(|max| min_args <= max), "minArgs must be <= maxArgs");
        Self {
            name: name.into(),
            category,
            min_args,
            max_args,
            type_checks: None,
            implementation: Arc::new(implementation),
        }
    }

    pub fn with_type_checks(mut self, checks: Vec<ArgType>) -> Self {
        self.type_checks = Some(checks);
        self
    }

    /// Invokes the function, checking arity (adjusted for method-call
    /// receiver binding, §4.B "Call semantics") and positional type checks
    /// before delegating to the implementation.
    fn call(&self, args: &[Value], as_method: bool) -> Result<Value, EvalError> {
        let effective_min = if as_method { self.min_args.saturating_sub(1).max(0) } else { self.min_args };
        if args.len() < effective_min {
            return Err(EvalError::type_error(format!(
                "'{}' expects at least {effective_min} argument(s), got {}",
                self.name,
                args.len()
            )));
        }
        if let Some(max) = self.max_args {
            if args.len() > max {
                return Err(EvalError::type_error(format!(
                    "'{}' expects at most {max} argument(s), got {}",
                    self.name,
                    args.len()
                )));
            }
        }
        if let Some(checks) = &self.type_checks {
            for (i, check) in checks.iter().enumerate() {
                if let Some(arg) = args.get(i) {
                    if !check.accepts(arg) {
                        return Err(EvalError::type_error(format!(
                            "'{}' argument {} must be {check}, got {}",
                            self.name,
                            i + 1,
                            arg.type_name()
                        )));
                    }
                }
            }
        }
        (self.implementation)(args).map_err(|message| EvalError::runtime(format!("Error in function '{}': {message}", self.name)))
    }
}

/// Counts of registered functions by category, returned by `stats()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub total: usize,
    pub by_category: AHashMap<Category, usize>,
}

/// The function registry itself (§4.B). Owned per `Orchestrator` rather than
/// a process-wide global (§9, §10.3).
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: AHashMap<String, SafeFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any existing entry with the same name (§4.B "Contract of
    /// `register`").
    pub fn register(&mut self, function: SafeFunction) {
        self.functions.insert(function.name.clone(), function);
    }

    pub fn unregister(&mut self, name: &str) -> Option<SafeFunction> {
        self.functions.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&SafeFunction> {
        self.functions.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn list(&self, category: Option<Category>) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .functions
            .values()
            .filter(|f| category.is_none_or(|c| f.category == c))
            .map(|f| f.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn stats(&self) -> RegistryStats {
        let mut by_category: AHashMap<Category, usize> = AHashMap::new();
        for function in self.functions.values() {
            *by_category.entry(function.category).or_insert(0) += 1;
        }
        RegistryStats {
            total: self.functions.len(),
            by_category,
        }
    }

    /// Returns an owned snapshot of every registered name and category — the
    /// closest analog to the source's `export()` without serializing host
    /// closures.
    pub fn export(&self) -> Vec<(String, Category)> {
        let mut entries: Vec<_> = self.functions.values().map(|f| (f.name.clone(), f.category)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Merges another registry's entries into this one, same-name entries
    /// from `other` winning (mirrors `register`'s overwrite semantics).
    pub fn import(&mut self, other: &FunctionRegistry) {
        for function in other.functions.values() {
            self.functions.insert(function.name.clone(), function.clone());
        }
    }

    /// Invokes a bare call: `args` are the evaluated argument values, in
    /// order.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        let function = self
            .get(name)
            .ok_or_else(|| EvalError::runtime(format!("no such function '{name}'")))?;
        function.call(args, false)
    }

    /// Invokes a method call: `receiver` becomes the first argument and the
    /// effective minimum arity drops by one (§4.B).
    pub fn call_method(&self, name: &str, receiver: Value, rest: &[Value]) -> Result<Value, EvalError> {
        let function = self
            .get(name)
            .ok_or_else(|| EvalError::runtime(format!("no such function '{name}'")))?;
        let mut args = Vec::with_capacity(rest.len() + 1);
        args.push(receiver);
        args.extend_from_slice(rest);
        function.call(&args, true)
    }
}
