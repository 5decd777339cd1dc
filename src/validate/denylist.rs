//! The fixed denylists and dangerous-literal patterns (§6).

use once_cell::sync::Lazy;
use regex::Regex;

/// §6 "Identifier denylist" — hard error wherever referenced.
pub const IDENTIFIER_DENYLIST: &[&str] = &[
    "eval",
    "Function",
    "constructor",
    "prototype",
    "__proto__",
    "window",
    "document",
    "global",
    "globalThis",
    "self",
    "parent",
    "top",
    "frames",
    "process",
    "require",
    "module",
    "exports",
    "__dirname",
    "__filename",
    "Buffer",
    "setImmediate",
    "clearImmediate",
    "setInterval",
    "clearInterval",
    "alert",
    "confirm",
    "prompt",
    "console",
    "fetch",
    "XMLHttpRequest",
    "localStorage",
    "sessionStorage",
    "indexedDB",
    "location",
    "history",
    "navigator",
    "setTimeout",
    "clearTimeout",
    "Worker",
    "SharedWorker",
    "ServiceWorker",
    "importScripts",
    "import",
    "WebAssembly",
    "WebSocket",
    "EventSource",
    "FileReader",
    "Blob",
    "URL",
    "URLSearchParams",
    "postMessage",
    "MessageChannel",
    "BroadcastChannel",
    "Error",
    "SyntaxError",
    "ReferenceError",
    "TypeError",
];

/// §6 "Property denylist" — hard error on non-computed or literal-computed
/// member access.
pub const PROPERTY_DENYLIST: &[&str] = &[
    "constructor",
    "prototype",
    "__proto__",
    "__defineGetter__",
    "__defineSetter__",
    "__lookupGetter__",
    "__lookupSetter__",
    "valueOf",
    "toString",
    "hasOwnProperty",
    "isPrototypeOf",
    "propertyIsEnumerable",
    "__defineProperty__",
    "__getOwnPropertyDescriptor__",
    "__getPrototypeOf__",
    "__setPrototypeOf__",
    "apply",
    "call",
    "bind",
];

pub fn is_blocked_identifier(name: &str) -> bool {
    IDENTIFIER_DENYLIST.contains(&name)
}

pub fn is_blocked_property(name: &str) -> bool {
    PROPERTY_DENYLIST.contains(&name)
}

/// §6 "Dangerous-pattern regexes" scanned against string literal content
/// (§4.E rule 8).
static DANGEROUS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"javascript:",
        r"data:text/html",
        r"data:application/javascript",
        r"vbscript:",
        r"<script",
        r"on\w+\s*=",
        r"eval\(",
        r"Function\(",
        r"setTimeout\(",
        r"setInterval\(",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid dangerous pattern"))
    .collect()
});

/// Returns the first dangerous pattern matched inside `literal`, if any.
pub fn dangerous_pattern_in(literal: &str) -> Option<&'static str> {
    DANGEROUS_PATTERNS
        .iter()
        .zip(RAW_PATTERNS.iter())
        .find(|(re, _)| re.is_match(literal))
        .map(|(_, raw)| *raw)
}

const RAW_PATTERNS: &[&str] = &[
    "javascript:",
    "data:text/html",
    "data:application/javascript",
    "vbscript:",
    "<script",
    "on\\w+\\s*=",
    "eval(",
    "Function(",
    "setTimeout(",
    "setInterval(",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_known_denylisted_identifiers() {
        for name in IDENTIFIER_DENYLIST {
            assert!(is_blocked_identifier(name));
        }
        assert!(!is_blocked_identifier("item"));
    }

    #[test]
    fn detects_javascript_pseudo_scheme() {
        assert!(dangerous_pattern_in("javascript:alert(1)").is_some());
        assert!(dangerous_pattern_in("https://example.com").is_none());
    }
}
