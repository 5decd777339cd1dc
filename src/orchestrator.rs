//! Orchestrator (component G, §4.G): sequences parse → validate → evaluate,
//! owns the registries and caches, and drives template-hole splicing.

use crate::cache::LruCache;
use crate::context::{ContextView, ExpressionContext};
use crate::error::{EvalError, EvalResult};
use crate::eval::{Budget, Evaluator, ExecutionLimits, PropertyCache};
use crate::parse::{self, ParseCache, ParsedExpression};
use crate::registry::{builtins, FunctionRegistry, TypeEntry, TypeRegistry};
use crate::validate::{self, ValidationCache};
use crate::value::Value;

/// Tunables mirroring §4.D/§4.E/§4.G's caps and cache sizes (§10.2). No
/// global mutable configuration: every `Orchestrator` is constructed with
/// its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrchestratorConfig {
    pub strict: bool,
    pub max_complexity: f64,
    pub max_depth: u32,
    pub parse_cache_size: usize,
    pub validation_cache_size: usize,
    pub template_cache_size: usize,
    pub property_cache_size: usize,
    pub execution_limits: ExecutionLimits,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            strict: true,
            max_complexity: 1000.0,
            max_depth: 50,
            parse_cache_size: 256,
            validation_cache_size: 256,
            template_cache_size: 128,
            property_cache_size: 512,
            execution_limits: ExecutionLimits::default(),
        }
    }
}

/// One evaluated hole's before/after, returned alongside a template result
/// for diagnostics (§4.G "Accumulate per-hole records").
#[derive(Debug, Clone, PartialEq)]
pub struct HoleRecord {
    pub original: String,
    pub evaluated: String,
    pub start_index: usize,
    pub end_index: usize,
}

/// The result of evaluating a template: the spliced text plus a per-hole
/// diagnostic trail in source order.
#[derive(Debug, Clone)]
pub struct TemplateResult {
    pub text: String,
    pub holes: Vec<HoleRecord>,
}

/// Glues every component together (§2 "Orchestrator"). Registries and caches
/// are owned here, not in process-wide statics (§9, §10.3) — two
/// `Orchestrator`s in the same process are fully independent unless the
/// caller shares state explicitly via `with_registries`.
pub struct Orchestrator {
    config: OrchestratorConfig,
    functions: FunctionRegistry,
    types: TypeRegistry,
    parse_cache: ParseCache,
    validation_cache: ValidationCache,
    property_cache: PropertyCache,
    template_cache: LruCache<(String, Vec<String>), String>,
}

impl Orchestrator {
    /// A fresh orchestrator with the default builtin function set installed
    /// and an empty type registry.
    pub fn new() -> Self {
        Self::with_config(OrchestratorConfig::default())
    }

    pub fn with_config(config: OrchestratorConfig) -> Self {
        let mut functions = FunctionRegistry::new();
        builtins::install_defaults(&mut functions);
        Self {
            parse_cache: ParseCache::new(config.parse_cache_size),
            validation_cache: ValidationCache::new(config.validation_cache_size),
            property_cache: PropertyCache::new(config.property_cache_size),
            template_cache: LruCache::new(config.template_cache_size),
            functions,
            types: TypeRegistry::new(),
            config,
        }
    }

    /// Builds an orchestrator around caller-supplied registries instead of
    /// the default builtin set (§10.3 "moved in via `with_registries`").
    pub fn with_registries(config: OrchestratorConfig, functions: FunctionRegistry, types: TypeRegistry) -> Self {
        Self {
            parse_cache: ParseCache::new(config.parse_cache_size),
            validation_cache: ValidationCache::new(config.validation_cache_size),
            property_cache: PropertyCache::new(config.property_cache_size),
            template_cache: LruCache::new(config.template_cache_size),
            functions,
            types,
            config,
        }
    }

    pub fn parse(&mut self, text: &str) -> Result<ParsedExpression, parse::ParseError> {
        self.parse_cache.get_or_parse(text)
    }

    pub fn validate(&mut self, parsed: &ParsedExpression) -> validate::ValidationResult {
        if let Some(cached) = self.validation_cache.get(&parsed.ast) {
            return cached;
        }
        let result = validate::validate(&parsed.ast, &self.functions);
        self.validation_cache.insert(&parsed.ast, &result);
        result
    }

    /// `extractDependencies` (§4.G): the set of context-root names an
    /// expression actually reads, without evaluating it.
    pub fn extract_dependencies(&mut self, text: &str) -> Result<std::collections::BTreeSet<String>, parse::ParseError> {
        self.parse(text).map(|parsed| parsed.dependencies)
    }

    pub fn add_function(&mut self, function: crate::registry::SafeFunction) {
        self.functions.register(function);
    }

    pub fn remove_function(&mut self, name: &str) -> bool {
        self.functions.unregister(name).is_some()
    }

    pub fn list_functions(&self, category: Option<crate::registry::Category>) -> Vec<&str> {
        self.functions.list(category)
    }

    pub fn register_type(&mut self, entry: TypeEntry) {
        self.types.register(entry);
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.has_type(name)
    }

    pub fn get_registered_types(&self) -> Vec<&str> {
        self.types.list()
    }

    pub fn reset_stats(&mut self) {
        // Function-call counters are not tracked per-call in this crate (no
        // mutable state threads through `FunctionRegistry::call`); this is a
        // no-op retained so callers migrating from a stats-tracking registry
        // have a stable method to call.
    }

    pub fn clear_caches(&mut self) {
        self.parse_cache.clear();
        self.validation_cache.clear();
        self.property_cache.clear();
        self.template_cache.clear();
    }

    /// `evaluate` (§4.G): dispatches to template or direct mode depending on
    /// whether `text` contains a hole.
    pub fn evaluate(&mut self, text: &str, ctx: &ExpressionContext) -> EvalResult<Value> {
        if parse::has_template_holes(text) {
            self.evaluate_template(text, ctx).map(|result| Value::String(result.text))
        } else {
            self.evaluate_direct(text, ctx)
        }
    }

    /// Direct mode: parse → enforce complexity/depth caps from metadata →
    /// (strict mode) validate → execute (§4.G step 2).
    pub fn evaluate_direct(&mut self, text: &str, ctx: &ExpressionContext) -> EvalResult<Value> {
        let parsed = self.parse(text).map_err(|e| EvalError::syntax(e.message))?;

        if parsed.complexity > self.config.max_complexity {
            return Err(EvalError::complexity(format!(
                "expression complexity {} exceeds the configured maximum {}",
                parsed.complexity, self.config.max_complexity
            )));
        }
        if parsed.depth > self.config.max_depth {
            return Err(EvalError::complexity(format!(
                "expression depth {} exceeds the configured maximum {}",
                parsed.depth, self.config.max_depth
            )));
        }

        if self.config.strict {
            let result = self.validate(&parsed);
            if let Some(violation) = result.first_error() {
                return Err(EvalError::security(violation.message.clone()));
            }
        }

        let budget = Budget::new(self.config.execution_limits);
        let evaluator = Evaluator::new(&self.functions, &budget, &mut self.property_cache);
        let view = ContextView::base(ctx);
        evaluator.eval(&parsed.ast, &view, 0)
    }

    /// Template mode (§4.G step 3): evaluates every hole in source order,
    /// stringifies by type-registry strategy when the value matches a
    /// registered type, and splices replacements back in reverse order so
    /// earlier byte offsets stay valid.
    pub fn evaluate_template(&mut self, text: &str, ctx: &ExpressionContext) -> EvalResult<TemplateResult> {
        let cache_key = (text.to_owned(), ctx.sorted_keys().into_iter().map(str::to_owned).collect::<Vec<_>>());
        if let Some(cached) = self.template_cache.get(&cache_key) {
            // The coarse cache only remembers the final spliced text; a cache
            // hit skips per-hole diagnostics (§4.G "cache granularity is
            // intentionally coarse").
            return Ok(TemplateResult {
                text: cached.clone(),
                holes: Vec::new(),
            });
        }

        let holes: Vec<_> = parse::extract_holes(text).collect();
        let mut records = Vec::with_capacity(holes.len());

        // Every hole is evaluated in source order (§5 "Per-hole template
        // evaluation is source-order") so a registered function with
        // cross-hole side effects observes calls in the order they appear in
        // the template, not back-to-front.
        for hole in &holes {
            let value = self.evaluate_direct(&hole.body, ctx)?;
            let (rendered, strategy) = self.stringify_for_template(&value);
            let escaped = if strategy == crate::registry::SerializeStrategy::Json {
                escape_for_json_embedding(&rendered)
            } else {
                rendered.clone()
            };
            records.push((hole, escaped, rendered));
        }

        // Splicing runs in reverse so earlier byte offsets stay valid as
        // later-in-text holes are replaced first.
        let mut output = text.to_owned();
        for (hole, escaped, _) in records.iter().rev() {
            output.replace_range(hole.start..hole.end, escaped);
        }

        let records = records
            .into_iter()
            .map(|(hole, _, rendered)| HoleRecord {
                original: hole.body.clone(),
                evaluated: rendered,
                start_index: hole.start,
                end_index: hole.end,
            })
            .collect();

        self.template_cache.insert(cache_key, output.clone());
        Ok(TemplateResult { text: output, holes: records })
    }

    /// Turns an evaluated hole's result into template text (§4.G step 3):
    /// null/undefined become the empty string; a detected type serializes by
    /// its registered strategy; everything else uses default string
    /// coercion.
    fn stringify_for_template(&self, value: &Value) -> (String, crate::registry::SerializeStrategy) {
        if value.is_nullish() {
            return (String::new(), crate::registry::SerializeStrategy::String);
        }
        if let Some(type_name) = self.types.detect_type(value) {
            if let Some(strategy) = self.types.strategy_of(type_name) {
                return (self.types.serialize(value, type_name), strategy);
            }
        }
        (value.to_display_string(), crate::registry::SerializeStrategy::String)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Escapes a JSON-strategy hole result so it embeds safely inside a
/// surrounding JSON-string literal in the template (§4.G "additionally
/// escape every backslash and double quote").
fn escape_for_json_embedding(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\\' || ch == '"' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

