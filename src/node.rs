//! The closed AST variant set (component A, §3, §4.A).
//!
//! This is the contract between the parser front-end and every later stage.
//! The parser adapts whatever tree `boa_parser` hands back into exactly this
//! shape; nothing past the parser ever sees a `boa_ast` type again. Adding a
//! new `Node` variant means touching this file, the validator's rule table,
//! the evaluator's dispatch, and the complexity weights in the same change
//! (§9 "Variant set as the trust boundary").

use crate::position::Position;

/// A literal scalar (§3 `Literal(scalar)`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

/// Binary operators recognized by the surface language (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, serde::Serialize, serde::Deserialize)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Mod,
    #[strum(serialize = "**")]
    Pow,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = "===")]
    StrictEq,
    #[strum(serialize = "!==")]
    StrictNe,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "in")]
    In,
}

/// Unary operators recognized by the surface language (§3). Note `typeof` is
/// here (the evaluator implements it, §9) even though `delete`/`new`/`void`
/// as *keywords* never reach this enum — only `void` and `typeof` are ever
/// produced by the adapter; `delete`/`new` have no expression-level Node
/// shape to land in and are rejected at adaptation time (§4.E rule 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, serde::Serialize, serde::Deserialize)]
pub enum UnaryOp {
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "!")]
    Not,
    #[strum(serialize = "typeof")]
    TypeOf,
    #[strum(serialize = "void")]
    Void,
}

/// Logical operators, which short-circuit (§4.F).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, serde::Serialize, serde::Deserialize)]
pub enum LogicalOp {
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "||")]
    Or,
    #[strum(serialize = "??")]
    NullishCoalesce,
}

/// The key of an `Object` property (§3: `Identifier` or `Literal(string|number)`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PropertyKey {
    Identifier(String),
    String(String),
    Number(f64),
}

impl PropertyKey {
    /// The string key actually used to index an object at evaluation time.
    pub fn as_key_string(&self) -> String {
        match self {
            PropertyKey::Identifier(name) => name.clone(),
            PropertyKey::String(s) => s.clone(),
            PropertyKey::Number(n) => crate::value::format_number(*n),
        }
    }
}

/// The property side of a `Member` expression (§3): either a static name
/// (`obj.name`) or a computed sub-expression (`obj[expr]`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum MemberProperty {
    Name(String),
    Computed(Box<Node>),
}

/// A node in the closed AST (§3). Every variant carries a `Position` inline
/// via `NodeKind`/`Node` pairing so validator and evaluator errors can always
/// point back into the caller's source text.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub position: Position,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(position: Position, kind: NodeKind) -> Self {
        Self { position, kind }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    Literal(Scalar),
    Identifier(String),
    Member {
        object: Box<Node>,
        property: MemberProperty,
    },
    Call {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    Unary {
        op: UnaryOp,
        argument: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Conditional {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    /// `Array` elements may contain holes (elided elements, e.g. `[1,,3]`).
    Array(Vec<Option<Node>>),
    Object(Vec<ObjectProperty>),
    Arrow {
        params: Vec<String>,
        body: Box<Node>,
    },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ObjectProperty {
    pub key: PropertyKey,
    pub value: Node,
    pub computed: bool,
}

impl Node {
    /// True for the variants `isSimple` metadata (§4.D) allows: identifier,
    /// member, literal, binary, logical — not call or conditional.
    pub fn is_simple_kind(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Identifier(_) | NodeKind::Member { .. } | NodeKind::Literal(_) | NodeKind::Binary { .. } | NodeKind::Logical { .. }
        )
    }
}
