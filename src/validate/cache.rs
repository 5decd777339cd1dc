//! Memoizes validation results under a node signature (§4.E "Validation
//! results are cached under a node signature").

use ahash::AHasher;
use std::hash::{Hash, Hasher};

use crate::cache::LruCache;
use crate::node::Node;
use crate::position::Position;

use super::ValidationResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ViolationRecord {
    kind_tag: &'static str,
    message: String,
    is_error: bool,
    line: u32,
    column: u32,
    suggestion: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidationCache {
    entries: LruCache<u64, Vec<ViolationRecord>>,
}

impl ValidationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Returns a cached result for `node`'s signature, if present.
    pub fn get(&mut self, node: &Node) -> Option<ValidationResult> {
        let key = signature(node);
        self.entries.get(&key).map(|records| ValidationResult {
            violations: records.iter().map(record_to_violation).collect(),
        })
    }

    pub fn insert(&mut self, node: &Node, result: &ValidationResult) {
        let key = signature(node);
        let records = result.violations.iter().map(violation_to_record).collect();
        self.entries.insert(key, records);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Hashes the `Debug` rendering of the node tree. This is not a structural
/// hash in the strict sense, but since `Node`'s `Debug` output is derived and
/// deterministic, two equal trees always hash equal.
fn signature(node: &Node) -> u64 {
    let mut hasher = AHasher::default();
    format!("{node:?}").hash(&mut hasher);
    hasher.finish()
}

fn violation_to_record(v: &super::Violation) -> ViolationRecord {
    ViolationRecord {
        kind_tag: kind_tag(&v.kind),
        message: v.message.clone(),
        is_error: v.severity == super::Severity::Error,
        line: v.position.line,
        column: v.position.column,
        suggestion: v.suggestion.clone(),
    }
}

fn record_to_violation(r: &ViolationRecord) -> super::Violation {
    super::Violation {
        kind: tag_kind(r.kind_tag),
        message: r.message.clone(),
        severity: if r.is_error { super::Severity::Error } else { super::Severity::Warning },
        position: Position::new(r.line, r.column),
        suggestion: r.suggestion.clone(),
    }
}

fn kind_tag(kind: &super::ViolationKind) -> &'static str {
    use super::ViolationKind::*;
    match kind {
        UnknownVariant => "unknown_variant",
        BlockedIdentifier => "blocked_identifier",
        BlockedProperty => "blocked_property",
        PrototypePollution => "prototype_pollution",
        UnresolvedCallTarget => "unresolved_call_target",
        InvalidCallbackArgument => "invalid_callback_argument",
        BlockedOperator => "blocked_operator",
        InvalidArrowParameter => "invalid_arrow_parameter",
        TooManyArrowParameters => "too_many_arrow_parameters",
        DangerousLiteral => "dangerous_literal",
        MemberChainTooLong => "member_chain_too_long",
        TooManyCallArguments => "too_many_call_arguments",
        StringLiteralTooLong => "string_literal_too_long",
        TooManyObjectProperties => "too_many_object_properties",
    }
}

fn tag_kind(tag: &str) -> super::ViolationKind {
    use super::ViolationKind::*;
    match tag {
        "blocked_identifier" => BlockedIdentifier,
        "blocked_property" => BlockedProperty,
        "prototype_pollution" => PrototypePollution,
        "unresolved_call_target" => UnresolvedCallTarget,
        "invalid_callback_argument" => InvalidCallbackArgument,
        "blocked_operator" => BlockedOperator,
        "invalid_arrow_parameter" => InvalidArrowParameter,
        "too_many_arrow_parameters" => TooManyArrowParameters,
        "dangerous_literal" => DangerousLiteral,
        "member_chain_too_long" => MemberChainTooLong,
        "too_many_call_arguments" => TooManyCallArguments,
        "string_literal_too_long" => StringLiteralTooLong,
        "too_many_object_properties" => TooManyObjectProperties,
        _ => UnknownVariant,
    }
}
