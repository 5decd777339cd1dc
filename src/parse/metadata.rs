//! Metadata extraction over a closed `Node` tree (§4.D "Metadata extraction").

use std::collections::BTreeSet;

use crate::context::BUILTIN_ROOTS;
use crate::node::{MemberProperty, Node, NodeKind};

/// The static namespaces recognized for qualified `Namespace.method` call
/// names (§6 "Static-namespace set").
pub const STATIC_NAMESPACES: &[&str] = &["Object", "Math", "JSON", "Date", "Array", "Crypto", "String", "Number"];

/// Callback methods permitted without a registry entry (§4.E rule 5,
/// GLOSSARY "Callback method").
pub const CALLBACK_METHODS: &[&str] = &["filter", "map", "find", "some", "every", "reduce"];

#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub dependencies: BTreeSet<String>,
    pub functions: BTreeSet<String>,
    pub complexity: f64,
    pub depth: u32,
    pub is_simple: bool,
    pub memory_estimate: usize,
}

/// Computes all §4.D metadata fields in a single walk.
pub fn extract(root: &Node) -> Metadata {
    let mut deps = BTreeSet::new();
    let mut functions = BTreeSet::new();
    let mut complexity = 0.0;
    let mut memory = 0usize;
    let mut all_simple = true;

    let depth = walk(root, 1, &mut deps, &mut functions, &mut complexity, &mut memory, &mut all_simple);

    Metadata {
        dependencies: deps,
        functions,
        complexity: (complexity * 10.0).round() / 10.0,
        depth,
        is_simple: all_simple,
        memory_estimate: memory,
    }
}

/// Fixed per-variant byte weight for `memoryEstimate` (§4.D); not meant to be
/// an exact `size_of`, just a stable, comparable tally.
fn node_weight(kind: &NodeKind) -> usize {
    match kind {
        NodeKind::Literal(_) => 16,
        NodeKind::Identifier(_) => 24,
        NodeKind::Member { .. } => 32,
        NodeKind::Call { .. } => 48,
        NodeKind::Unary { .. } => 24,
        NodeKind::Binary { .. } => 40,
        NodeKind::Logical { .. } => 40,
        NodeKind::Conditional { .. } => 56,
        NodeKind::Array(_) => 32,
        NodeKind::Object(_) => 32,
        NodeKind::Arrow { .. } => 64,
    }
}

#[allow(clippy::too_many_arguments)]
fn walk(
    node: &Node,
    depth: u32,
    deps: &mut BTreeSet<String>,
    functions: &mut BTreeSet<String>,
    complexity: &mut f64,
    memory: &mut usize,
    all_simple: &mut bool,
) -> u32 {
    *memory += node_weight(&node.kind);
    if !node.is_simple_kind() {
        *all_simple = false;
    }

    let mut max_child_depth = depth;
    let mut descend = |child: &Node,
                        deps: &mut BTreeSet<String>,
                        functions: &mut BTreeSet<String>,
                        complexity: &mut f64,
                        memory: &mut usize,
                        all_simple: &mut bool|
     -> u32 { walk(child, depth + 1, deps, functions, complexity, memory, all_simple) };

    match &node.kind {
        NodeKind::Literal(s) => {
            *complexity += 0.5;
            if let crate::node::Scalar::String(text) = s {
                *memory += text.len() * 2;
            }
        }
        NodeKind::Identifier(name) => {
            *complexity += 0.5;
            if BUILTIN_ROOTS.contains(&name.as_str()) {
                deps.insert(name.clone());
            }
            *memory += name.len() * 2;
        }
        NodeKind::Member { object, property } => {
            *complexity += 1.0;
            max_child_depth = max_child_depth.max(descend(object, deps, functions, complexity, memory, all_simple));
            if let MemberProperty::Computed(expr) = property {
                max_child_depth = max_child_depth.max(descend(expr, deps, functions, complexity, memory, all_simple));
            }
        }
        NodeKind::Call { callee, arguments } => {
            *complexity += 3.0;
            record_call_target(callee, functions);
            max_child_depth = max_child_depth.max(descend(callee, deps, functions, complexity, memory, all_simple));
            for arg in arguments {
                max_child_depth = max_child_depth.max(descend(arg, deps, functions, complexity, memory, all_simple));
            }
        }
        NodeKind::Unary { argument, .. } => {
            *complexity += 0.5;
            max_child_depth = max_child_depth.max(descend(argument, deps, functions, complexity, memory, all_simple));
        }
        NodeKind::Binary { left, right, .. } => {
            *complexity += 1.0;
            max_child_depth = max_child_depth.max(descend(left, deps, functions, complexity, memory, all_simple));
            max_child_depth = max_child_depth.max(descend(right, deps, functions, complexity, memory, all_simple));
        }
        NodeKind::Logical { left, right, .. } => {
            *complexity += 1.0;
            max_child_depth = max_child_depth.max(descend(left, deps, functions, complexity, memory, all_simple));
            max_child_depth = max_child_depth.max(descend(right, deps, functions, complexity, memory, all_simple));
        }
        NodeKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            *complexity += 4.0;
            max_child_depth = max_child_depth.max(descend(test, deps, functions, complexity, memory, all_simple));
            max_child_depth = max_child_depth.max(descend(consequent, deps, functions, complexity, memory, all_simple));
            max_child_depth = max_child_depth.max(descend(alternate, deps, functions, complexity, memory, all_simple));
        }
        NodeKind::Array(elements) => {
            *complexity += 2.0 + 0.5 * elements.len() as f64;
            for element in elements.iter().flatten() {
                max_child_depth = max_child_depth.max(descend(element, deps, functions, complexity, memory, all_simple));
            }
        }
        NodeKind::Object(properties) => {
            *complexity += 2.0 + 0.5 * properties.len() as f64;
            for property in properties {
                max_child_depth = max_child_depth.max(descend(&property.value, deps, functions, complexity, memory, all_simple));
            }
        }
        NodeKind::Arrow { params, body } => {
            *complexity += 5.0;
            *memory += params.iter().map(|p| p.len() * 2).sum::<usize>();
            max_child_depth = max_child_depth.max(descend(body, deps, functions, complexity, memory, all_simple));
        }
    }

    max_child_depth
}

/// Records a call's target name into `functions`, following §4.D: bare
/// callee names are recorded directly; member callees are recorded only
/// when they resolve to a qualified `Namespace.method` form.
fn record_call_target(callee: &Node, functions: &mut BTreeSet<String>) {
    match &callee.kind {
        NodeKind::Identifier(name) => {
            functions.insert(name.clone());
        }
        NodeKind::Member { object, property } => {
            if let (NodeKind::Identifier(namespace), MemberProperty::Name(method)) = (&object.kind, property) {
                if STATIC_NAMESPACES.contains(&namespace.as_str()) {
                    functions.insert(format!("{namespace}.{method}"));
                }
            }
        }
        _ => {}
    }
}
