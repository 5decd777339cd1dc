//! Parser front-end (component D, §4.D).
//!
//! Lifts source text into a [`ParsedExpression`] by handing it to
//! `boa_parser`, adapting the resulting tree into this crate's closed
//! [`Node`](crate::node::Node) set (`adapt`), and then computing the
//! metadata bundle used by the orchestrator's complexity/depth caps
//! (`metadata`). Template hole splitting lives in `template`.

mod adapt;
mod cache;
mod metadata;
pub mod template;

use std::collections::BTreeSet;
use std::fmt;

use boa_interner::Interner;
use boa_parser::{Parser, Source};

use crate::node::Node;

pub use cache::ParseCache;
pub use metadata::{CALLBACK_METHODS, STATIC_NAMESPACES};
pub use template::{extract_holes, has_template_holes, Hole};

/// Why a piece of text could not be lifted into the closed `Node` set
/// (§4.D "Output: `ParsedExpression | null`").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// An immutable bundle produced by a successful parse (§3 "ParsedExpression").
#[derive(Debug, Clone)]
pub struct ParsedExpression {
    pub ast: Node,
    pub dependencies: BTreeSet<String>,
    pub functions: BTreeSet<String>,
    pub complexity: f64,
    pub depth: u32,
    pub is_simple: bool,
    pub has_templates: bool,
    pub memory_estimate: usize,
}

/// Parses a single expression (no template holes) into a `ParsedExpression`.
///
/// Per §4.D, the text is wrapped in parentheses so that it parses as a
/// single-statement program (`(expr)` as the whole script); anything that
/// does not reduce to "one expression statement" — multiple statements,
/// declarations, control flow — is a parse failure.
pub fn parse_expression(text: &str) -> Result<ParsedExpression, ParseError> {
    let wrapped = format!("({text}\n)");
    let mut interner = Interner::default();
    let script = Parser::new(Source::from_bytes(wrapped.as_bytes()))
        .parse_script(&mut interner)
        .map_err(|e| ParseError::new(format!("could not parse expression: {e}")))?;

    let mut statements = script.statements().iter();
    let only = statements
        .next()
        .ok_or_else(|| ParseError::new("expression produced no statement"))?;
    if statements.next().is_some() {
        return Err(ParseError::new("only a single expression is permitted"));
    }

    let expr = match only {
        boa_ast::StatementListItem::Statement(boa_ast::Statement::Expression(expr)) => expr,
        _ => return Err(ParseError::new("top-level input must be a single expression")),
    };

    let ast = adapt::adapt(expr, &interner).map_err(ParseError::new)?;
    let meta = metadata::extract(&ast);

    Ok(ParsedExpression {
        ast,
        dependencies: meta.dependencies,
        functions: meta.functions,
        complexity: meta.complexity,
        depth: meta.depth,
        is_simple: meta.is_simple,
        has_templates: false,
        memory_estimate: meta.memory_estimate,
    })
}
