//! Adapts `boa_ast`'s expression tree into this crate's closed `Node` set
//! (§1 "the external lexer/parser library that produces the raw node tree"
//! is out of scope — this module is the entire seam).
//!
//! Any `boa_ast::Expression` shape with no arm below (generators, classes,
//! template literals, `new`, `await`, assignment, …) is simply not part of
//! the surface language this crate accepts; it surfaces as a syntax error
//! from [`super::parse_expression`] rather than panicking here.

use boa_ast::expression::literal::Literal as BoaLiteral;
use boa_ast::expression::operator::binary::{BinaryOp as BoaBinaryOp, LogicalOp as BoaLogicalOp, RelationalOp};
use boa_ast::expression::operator::unary::UnaryOp as BoaUnaryOp;
use boa_ast::expression::Expression as BoaExpr;
use boa_ast::Spanned;
use boa_interner::Interner;

use crate::node::{BinaryOp, LogicalOp, MemberProperty, Node, NodeKind, ObjectProperty, PropertyKey, Scalar, UnaryOp};
use crate::position::Position;

/// Converts a parsed `boa_ast` expression into a `Node`, or a short message
/// describing why the shape falls outside the surface language. The node's
/// position is read straight from `boa_ast`'s own span (§4.E's `node`/
/// `position` field needs the real offending line/column, not a constant).
pub fn adapt(expr: &BoaExpr, interner: &Interner) -> Result<Node, String> {
    let position = to_position(expr.span());
    let kind = adapt_kind(expr, interner)?;
    Ok(Node::new(position, kind))
}

fn to_position(span: boa_ast::Span) -> Position {
    let start = span.start();
    Position::new(start.line_number(), start.column_number())
}

fn boxed(expr: &BoaExpr, interner: &Interner) -> Result<Box<Node>, String> {
    adapt(expr, interner).map(Box::new)
}

fn adapt_kind(expr: &BoaExpr, interner: &Interner) -> Result<NodeKind, String> {
    match expr {
        BoaExpr::Literal(lit) => Ok(NodeKind::Literal(adapt_literal(lit, interner))),
        BoaExpr::Identifier(ident) => {
            let name = interner
                .resolve(ident.sym())
                .map(|r| r.to_string())
                .ok_or_else(|| "unresolvable identifier".to_owned())?;
            Ok(NodeKind::Identifier(name))
        }
        BoaExpr::PropertyAccess(access) => adapt_property_access(access, interner),
        BoaExpr::Call(call) => {
            let callee = boxed(call.function(), interner)?;
            let arguments = call
                .args()
                .iter()
                .map(|arg| adapt(arg, interner))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(NodeKind::Call { callee, arguments })
        }
        BoaExpr::Unary(unary) => {
            let op = adapt_unary_op(unary.op())?;
            let argument = boxed(unary.target(), interner)?;
            Ok(NodeKind::Unary { op, argument })
        }
        BoaExpr::Binary(binary) => adapt_binary(binary, interner),
        BoaExpr::Conditional(cond) => Ok(NodeKind::Conditional {
            test: boxed(cond.condition(), interner)?,
            consequent: boxed(cond.if_true(), interner)?,
            alternate: boxed(cond.if_false(), interner)?,
        }),
        BoaExpr::ArrayLiteral(array) => {
            let elements = array
                .as_ref()
                .iter()
                .map(|el| el.as_ref().map(|e| adapt(e, interner)).transpose())
                .collect::<Result<Vec<_>, _>>()?;
            Ok(NodeKind::Array(elements))
        }
        BoaExpr::ObjectLiteral(object) => adapt_object(object, interner),
        BoaExpr::ArrowFunction(arrow) => adapt_arrow(arrow.parameters(), arrow.body(), interner),
        BoaExpr::Parenthesized(inner) => adapt_kind(inner.expression(), interner),
        other => Err(format!("unsupported expression shape: {other:?}")),
    }
}

fn adapt_literal(lit: &BoaLiteral, interner: &Interner) -> Scalar {
    match lit {
        BoaLiteral::Null => Scalar::Null,
        BoaLiteral::Undefined => Scalar::Null,
        BoaLiteral::Bool(b) => Scalar::Bool(*b),
        BoaLiteral::Num(n) => Scalar::Number(*n),
        BoaLiteral::Int(i) => Scalar::Number(f64::from(*i)),
        BoaLiteral::BigInt(_) => Scalar::Number(f64::NAN),
        BoaLiteral::String(sym) => Scalar::String(interner.resolve(*sym).map(|r| r.to_string()).unwrap_or_default()),
    }
}

fn adapt_unary_op(op: BoaUnaryOp) -> Result<UnaryOp, String> {
    match op {
        BoaUnaryOp::Plus => Ok(UnaryOp::Plus),
        BoaUnaryOp::Minus => Ok(UnaryOp::Minus),
        BoaUnaryOp::Not => Ok(UnaryOp::Not),
        BoaUnaryOp::TypeOf => Ok(UnaryOp::TypeOf),
        BoaUnaryOp::Void => Ok(UnaryOp::Void),
        BoaUnaryOp::Delete => Err("'delete' is not part of the surface language".to_owned()),
        BoaUnaryOp::Tilde => Err("bitwise '~' is not part of the surface language".to_owned()),
    }
}

fn adapt_binary(binary: &boa_ast::expression::operator::Binary, interner: &Interner) -> Result<NodeKind, String> {
    let left = boxed(binary.lhs(), interner)?;
    let right = boxed(binary.rhs(), interner)?;
    match binary.op() {
        BoaBinaryOp::Arithmetic(arith) => {
            use boa_ast::expression::operator::binary::ArithmeticOp;
            let op = match arith {
                ArithmeticOp::Add => BinaryOp::Add,
                ArithmeticOp::Sub => BinaryOp::Sub,
                ArithmeticOp::Mul => BinaryOp::Mul,
                ArithmeticOp::Div => BinaryOp::Div,
                ArithmeticOp::Mod => BinaryOp::Mod,
                ArithmeticOp::Exp => BinaryOp::Pow,
            };
            Ok(NodeKind::Binary { op, left, right })
        }
        BoaBinaryOp::Relational(rel) => adapt_relational(rel, left, right),
        BoaBinaryOp::Logical(logical) => {
            let op = match logical {
                BoaLogicalOp::And => LogicalOp::And,
                BoaLogicalOp::Or => LogicalOp::Or,
                BoaLogicalOp::Coalesce => LogicalOp::NullishCoalesce,
            };
            Ok(NodeKind::Logical { op, left, right })
        }
        BoaBinaryOp::Bitwise(_) => Err("bitwise operators are not part of the surface language".to_owned()),
        BoaBinaryOp::Comma => Err("the comma operator is not part of the surface language".to_owned()),
    }
}

fn adapt_relational(op: RelationalOp, left: Box<Node>, right: Box<Node>) -> Result<NodeKind, String> {
    let op = match op {
        RelationalOp::Equal => BinaryOp::Eq,
        RelationalOp::NotEqual => BinaryOp::Ne,
        RelationalOp::StrictEqual => BinaryOp::StrictEq,
        RelationalOp::StrictNotEqual => BinaryOp::StrictNe,
        RelationalOp::GreaterThan => BinaryOp::Gt,
        RelationalOp::GreaterThanOrEqual => BinaryOp::Ge,
        RelationalOp::LessThan => BinaryOp::Lt,
        RelationalOp::LessThanOrEqual => BinaryOp::Le,
        RelationalOp::In => BinaryOp::In,
        RelationalOp::InstanceOf => return Err("'instanceof' is not part of the surface language".to_owned()),
    };
    Ok(NodeKind::Binary { op, left, right })
}

fn adapt_property_access(access: &boa_ast::expression::access::PropertyAccess, interner: &Interner) -> Result<NodeKind, String> {
    use boa_ast::expression::access::{PropertyAccessField, SimplePropertyAccess};
    let simple: &SimplePropertyAccess = access
        .as_simple()
        .ok_or_else(|| "private field access is not part of the surface language".to_owned())?;
    let object = boxed(simple.target(), interner)?;
    let property = match simple.field() {
        PropertyAccessField::Const(sym) => MemberProperty::Name(interner.resolve(*sym).map(|r| r.to_string()).unwrap_or_default()),
        PropertyAccessField::Expr(expr) => MemberProperty::Computed(boxed(expr, interner)?),
    };
    Ok(NodeKind::Member { object, property })
}

fn adapt_object(object: &boa_ast::expression::ObjectLiteral, interner: &Interner) -> Result<NodeKind, String> {
    use boa_ast::property::{PropertyDefinition, PropertyName};
    let mut properties = Vec::new();
    for prop in object.properties() {
        match prop {
            PropertyDefinition::Property(name, value) => {
                let (key, computed) = match name {
                    PropertyName::Literal(sym) => (
                        PropertyKey::Identifier(interner.resolve(*sym).map(|r| r.to_string()).unwrap_or_default()),
                        false,
                    ),
                    PropertyName::Computed(expr) => {
                        let adapted = adapt(expr, interner)?;
                        let key = match adapted.kind {
                            NodeKind::Literal(Scalar::String(s)) => PropertyKey::String(s),
                            NodeKind::Literal(Scalar::Number(n)) => PropertyKey::Number(n),
                            _ => return Err("computed object keys must be string or number literals".to_owned()),
                        };
                        (key, true)
                    }
                };
                let value = adapt(value, interner)?;
                properties.push(ObjectProperty { key, value, computed });
            }
            _ => return Err("only plain key/value object properties are part of the surface language".to_owned()),
        }
    }
    Ok(NodeKind::Object(properties))
}

fn adapt_arrow(params: &boa_ast::function::FormalParameterList, body: &boa_ast::StatementList, interner: &Interner) -> Result<NodeKind, String> {
    let mut names = Vec::new();
    for param in params.as_ref() {
        let name = param
            .variable()
            .binding()
            .as_identifier()
            .and_then(|ident| interner.resolve(ident.sym()))
            .map(|r| r.to_string())
            .ok_or_else(|| "arrow parameters must be plain identifiers".to_owned())?;
        names.push(name);
    }
    let body_expr = single_expression_body(body, interner)?;
    Ok(NodeKind::Arrow {
        params: names,
        body: Box::new(body_expr),
    })
}

/// An arrow body in the surface language is always a single expression
/// (`x => x.name`), never a block with statements.
fn single_expression_body(body: &boa_ast::StatementList, interner: &Interner) -> Result<Node, String> {
    use boa_ast::Statement;
    use boa_ast::StatementListItem;

    let mut items = body.statements().iter();
    let only = items.next().ok_or_else(|| "arrow function body must be a single expression".to_owned())?;
    if items.next().is_some() {
        return Err("arrow function body must be a single expression".to_owned());
    }
    match only {
        StatementListItem::Statement(Statement::Return(ret)) => {
            let expr = ret.target().ok_or_else(|| "bare 'return;' is not part of the surface language".to_owned())?;
            adapt(expr, interner)
        }
        StatementListItem::Statement(Statement::Expression(expr)) => adapt(expr, interner),
        _ => Err("arrow function body must be a single expression".to_owned()),
    }
}
