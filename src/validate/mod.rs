//! Security validator (component E, §4.E).
//!
//! A pre-order walk over the closed `Node` tree accumulating `Violation`s.
//! The tree is accepted iff no error-severity violation was produced;
//! warnings never block evaluation (§4.E).

mod cache;
mod denylist;

use crate::node::{MemberProperty, Node, NodeKind, Scalar};
use crate::parse::{CALLBACK_METHODS, STATIC_NAMESPACES};
use crate::position::Position;
use crate::registry::FunctionRegistry;

pub use cache::ValidationCache;
pub use denylist::{dangerous_pattern_in, is_blocked_identifier, is_blocked_property, IDENTIFIER_DENYLIST, PROPERTY_DENYLIST};

pub const MAX_MEMBER_CHAIN: usize = 10;
pub const MAX_CALL_ARGS: usize = 20;
pub const MAX_STRING_LITERAL_LEN: usize = 10_000;
pub const MAX_OBJECT_PROPERTIES: usize = 50;
pub const MAX_ARROW_PARAMS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    UnknownVariant,
    BlockedIdentifier,
    BlockedProperty,
    PrototypePollution,
    UnresolvedCallTarget,
    InvalidCallbackArgument,
    BlockedOperator,
    InvalidArrowParameter,
    TooManyArrowParameters,
    DangerousLiteral,
    MemberChainTooLong,
    TooManyCallArguments,
    StringLiteralTooLong,
    TooManyObjectProperties,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
    pub severity: Severity,
    /// The offending node's source position (§4.E's `node`/`position` field),
    /// so a caller can point back at the flagged slice of the expression.
    pub position: Position,
    pub suggestion: Option<String>,
}

impl Violation {
    fn error(position: Position, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            severity: Severity::Error,
            position,
            suggestion: None,
        }
    }

    fn warning(position: Position, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            severity: Severity::Warning,
            position,
            suggestion: None,
        }
    }

    fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// A validation outcome: the list of violations plus whether any of them is
/// error-severity.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        !self.violations.iter().any(|v| v.severity == Severity::Error)
    }

    pub fn first_error(&self) -> Option<&Violation> {
        self.violations.iter().find(|v| v.severity == Severity::Error)
    }
}

/// Runs every rule in §4.E over `root`, consulting `registry` for rule 5
/// (call-target resolution).
pub fn validate(root: &Node, registry: &FunctionRegistry) -> ValidationResult {
    let mut violations = Vec::new();
    walk(root, registry, 0, &mut violations);
    ValidationResult { violations }
}

fn walk(node: &Node, registry: &FunctionRegistry, member_chain_depth: usize, out: &mut Vec<Violation>) {
    match &node.kind {
        NodeKind::Literal(scalar) => check_literal(node.position, scalar, out),
        NodeKind::Identifier(name) => check_identifier(node.position, name, out),
        NodeKind::Member { object, property } => {
            check_member(node.position, object, property, registry, member_chain_depth, out);
        }
        NodeKind::Call { callee, arguments } => {
            check_call(node.position, callee, arguments, registry, out);
            walk(callee, registry, 0, out);
            for arg in arguments {
                walk(arg, registry, 0, out);
            }
            if arguments.len() > MAX_CALL_ARGS {
                out.push(Violation::warning(
                    node.position,
                    ViolationKind::TooManyCallArguments,
                    format!("call has {} arguments, exceeding the recommended {MAX_CALL_ARGS}", arguments.len()),
                ));
            }
        }
        NodeKind::Unary { op, argument } => {
            check_unary_op(node.position, *op, out);
            walk(argument, registry, 0, out);
        }
        NodeKind::Binary { left, right, .. } => {
            // `instanceof` has no corresponding `BinaryOp` variant (§9): the
            // adapter already rejects it during parsing, so there is
            // nothing left to flag here once a `Node` exists.
            walk(left, registry, 0, out);
            walk(right, registry, 0, out);
        }
        NodeKind::Logical { left, right, .. } => {
            walk(left, registry, 0, out);
            walk(right, registry, 0, out);
        }
        NodeKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            walk(test, registry, 0, out);
            walk(consequent, registry, 0, out);
            walk(alternate, registry, 0, out);
        }
        NodeKind::Array(elements) => {
            for element in elements.iter().flatten() {
                walk(element, registry, 0, out);
            }
        }
        NodeKind::Object(properties) => {
            if properties.len() > MAX_OBJECT_PROPERTIES {
                out.push(Violation::warning(
                    node.position,
                    ViolationKind::TooManyObjectProperties,
                    format!("object literal has {} properties, exceeding the recommended {MAX_OBJECT_PROPERTIES}", properties.len()),
                ));
            }
            for property in properties {
                walk(&property.value, registry, 0, out);
            }
        }
        NodeKind::Arrow { params, body } => {
            check_arrow_params(node.position, params, out);
            walk(body, registry, 0, out);
        }
    }
}

fn check_literal(position: Position, scalar: &Scalar, out: &mut Vec<Violation>) {
    if let Scalar::String(text) = scalar {
        if text.len() > MAX_STRING_LITERAL_LEN {
            out.push(Violation::warning(
                position,
                ViolationKind::StringLiteralTooLong,
                format!("string literal is {} characters, exceeding the recommended {MAX_STRING_LITERAL_LEN}", text.len()),
            ));
        }
        if let Some(pattern) = dangerous_pattern_in(text) {
            out.push(Violation::error(
                position,
                ViolationKind::DangerousLiteral,
                format!("string literal matches disallowed pattern `{pattern}`"),
            ));
        }
    }
}

fn check_identifier(position: Position, name: &str, out: &mut Vec<Violation>) {
    if is_blocked_identifier(name) {
        out.push(
            Violation::error(position, ViolationKind::BlockedIdentifier, format!("reference to blocked identifier `{name}`"))
                .with_suggestion("remove this reference; host globals are not reachable from sandboxed expressions"),
        );
    }
}

/// Rules 3 and 4: blocked properties, and the prototype-pollution pattern of
/// a denylisted property one level further up the member chain.
fn check_member(
    position: Position,
    object: &Node,
    property: &MemberProperty,
    registry: &FunctionRegistry,
    chain_depth: usize,
    out: &mut Vec<Violation>,
) {
    let depth = chain_depth + 1;
    if depth > MAX_MEMBER_CHAIN {
        out.push(Violation::warning(
            position,
            ViolationKind::MemberChainTooLong,
            format!("member chain is {depth} deep, exceeding the recommended {MAX_MEMBER_CHAIN}"),
        ));
    }

    if let Some(name) = property_literal_name(property) {
        if is_blocked_property(name) {
            out.push(Violation::error(
                position,
                ViolationKind::BlockedProperty,
                format!("access to blocked property `{name}`"),
            ));
        }
    }

    if let NodeKind::Member {
        property: outer_property, ..
    } = &object.kind
    {
        if let Some(name) = property_literal_name(outer_property) {
            if is_blocked_property(name) {
                out.push(Violation::error(
                    object.position,
                    ViolationKind::PrototypePollution,
                    format!("member chain walks through blocked property `{name}`"),
                ));
            }
        }
    }

    walk(object, registry, depth, out);
    if let MemberProperty::Computed(expr) = property {
        walk(expr, registry, 0, out);
    }
}

fn property_literal_name(property: &MemberProperty) -> Option<&str> {
    match property {
        MemberProperty::Name(name) => Some(name.as_str()),
        MemberProperty::Computed(node) => match &node.kind {
            NodeKind::Literal(Scalar::String(s)) => Some(s.as_str()),
            _ => None,
        },
    }
}

/// Rule 5: a bare call must resolve in the registry; a method call must
/// resolve as `Namespace.method`, then as bare `method`, with an exception
/// for callback methods taking an `Arrow` as their first argument.
fn check_call(position: Position, callee: &Node, arguments: &[Node], registry: &FunctionRegistry, out: &mut Vec<Violation>) {
    match &callee.kind {
        NodeKind::Identifier(name) => {
            if !registry.has(name) {
                out.push(Violation::error(
                    position,
                    ViolationKind::UnresolvedCallTarget,
                    format!("call to unregistered function `{name}`"),
                ));
            }
        }
        NodeKind::Member { object, property } => {
            let method = match property_literal_name(property) {
                Some(name) => name,
                None => return,
            };
            let qualified = if let NodeKind::Identifier(namespace) = &object.kind {
                if STATIC_NAMESPACES.contains(&namespace.as_str()) {
                    Some(format!("{namespace}.{method}"))
                } else {
                    None
                }
            } else {
                None
            };
            let resolves = qualified.as_deref().is_some_and(|q| registry.has(q)) || registry.has(method);
            if resolves {
                return;
            }
            if CALLBACK_METHODS.contains(&method) {
                match arguments.first() {
                    Some(first) if matches!(first.kind, NodeKind::Arrow { .. }) => {}
                    _ => out.push(Violation::error(
                        position,
                        ViolationKind::InvalidCallbackArgument,
                        format!("`{method}` requires an arrow function as its first argument"),
                    )),
                }
                return;
            }
            out.push(Violation::error(
                position,
                ViolationKind::UnresolvedCallTarget,
                format!("call to unregistered method `{method}`"),
            ));
        }
        _ => {}
    }
}

fn check_unary_op(position: Position, op: crate::node::UnaryOp, out: &mut Vec<Violation>) {
    use crate::node::UnaryOp;
    // `typeof` is intentionally absent here: the evaluator implements it and
    // this crate resolves the source's validator/evaluator conflict in its
    // favor (§9). `delete`/`new` never reach this point: the adapter rejects
    // them before a `Node` is even produced (no Unary/Call shape exists for
    // them). `void` has no such exemption and is blocked like any other
    // denied operator.
    if matches!(op, UnaryOp::Void) {
        out.push(Violation::error(
            position,
            ViolationKind::BlockedOperator,
            "`void` is not a permitted operator".to_owned(),
        ));
    }
}

fn check_arrow_params(position: Position, params: &[String], out: &mut Vec<Violation>) {
    if params.len() > MAX_ARROW_PARAMS {
        out.push(Violation::error(
            position,
            ViolationKind::TooManyArrowParameters,
            format!("arrow function has {} parameters, exceeding the maximum {MAX_ARROW_PARAMS}", params.len()),
        ));
    }
    for name in params {
        if is_blocked_identifier(name) {
            out.push(Violation::error(
                position,
                ViolationKind::InvalidArrowParameter,
                format!("arrow parameter `{name}` shadows a blocked identifier"),
            ));
        }
    }
}
