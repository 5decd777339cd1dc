//! Type registry (component C, §4.C).

use crate::value::Value;

/// The declared shape a property must match for `detectType` (§3 "kind").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl PropertyKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            PropertyKind::String => matches!(value, Value::String(_)),
            PropertyKind::Number => matches!(value, Value::Number(n) if !n.is_nan()),
            PropertyKind::Boolean => matches!(value, Value::Bool(_)),
            PropertyKind::Object => value.is_plain_object(),
            PropertyKind::Array => value.is_array(),
        }
    }
}

/// How `TypeRegistry::serialize` turns a matched value into template text
/// (§3 "strategy").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializeStrategy {
    Json,
    String,
    Object,
}

/// `{ required: [Name], properties: Name -> { kind } }` (§3 "TypeEntry").
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub required: Vec<String>,
    pub properties: Vec<(String, PropertyKind)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    pub fn property(mut self, name: impl Into<String>, kind: PropertyKind) -> Self {
        self.properties.push((name.into(), kind));
        self
    }
}

#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub name: String,
    pub schema: Schema,
    pub strategy: SerializeStrategy,
}

/// Schema-keyed detection and serialization of context values (§4.C).
///
/// Entries are kept in *insertion-reversed* order: `register` removes any
/// existing same-named entry, then prepends the new one, so the most
/// recently registered entry is always checked first (§3, §9 — this is the
/// source ambiguity resolved in the source's actual favor: most-recent wins,
/// not first-registered).
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: Vec<TypeEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: TypeEntry) {
        self.entries.retain(|existing| existing.name != entry.name);
        self.entries.insert(0, entry);
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn list(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn strategy_of(&self, name: &str) -> Option<SerializeStrategy> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.strategy)
    }

    /// Returns the name of the first (most-recently-registered-first) entry
    /// whose schema accepts `value`, or `None` if `value` isn't a non-null,
    /// non-array object, or no entry matches (§4.C "detectType").
    pub fn detect_type(&self, value: &Value) -> Option<&str> {
        let object = value.as_object()?;
        self.entries
            .iter()
            .find(|entry| schema_matches(&entry.schema, object))
            .map(|entry| entry.name.as_str())
    }

    /// Resolves `value` through the named entry's strategy and hands back a
    /// `Value` (§4.C "serialize" — "returns the value itself for `object`").
    /// `Json`/`String` strategies resolve to a `Value::String`; `Object`
    /// hands back the value unchanged rather than coercing it to a display
    /// string, so callers that want the live object (not a textual stand-in
    /// like `[object Object]`) get it.
    pub fn serialize_value(&self, value: &Value, name: &str) -> Value {
        let Some(entry) = self.entries.iter().find(|e| e.name == name) else {
            return value.clone();
        };
        match entry.strategy {
            SerializeStrategy::Object => value.clone(),
            SerializeStrategy::Json => {
                Value::String(serde_json::to_string(&value.to_json()).unwrap_or_else(|_| value.to_display_string()))
            }
            SerializeStrategy::String => Value::String(value.to_display_string()),
        }
    }

    /// Serializes `value` using the named entry's strategy, as text (§4.C
    /// "serialize"). Delegates to `serialize_value`: `Json`/`String` results
    /// are already strings; an `Object` result is rendered as JSON rather
    /// than losing its shape to a display-string coercion, since template
    /// splicing only ever has a `String` to work with. JSON encoding failure
    /// falls back to the string coercion rather than raising — in practice
    /// this crate's `Value` can always be JSON-encoded, but the fallback is
    /// kept for parity with the source's defensive behavior around cyclic
    /// host objects.
    pub fn serialize(&self, value: &Value, name: &str) -> String {
        match self.serialize_value(value, name) {
            Value::String(s) => s,
            other => serde_json::to_string(&other.to_json()).unwrap_or_else(|_| other.to_display_string()),
        }
    }
}

fn schema_matches(schema: &Schema, object: &indexmap::IndexMap<String, Value>) -> bool {
    let has_required = schema.required.iter().all(|name| object.contains_key(name));
    if !has_required {
        return false;
    }
    schema.properties.iter().all(|(name, kind)| match object.get(name) {
        Some(value) => kind.matches(value),
        None => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn obj(pairs: &[(&str, Value)]) -> Value {
        let mut map = IndexMap::new();
        for (k, v) in pairs {
            map.insert((*k).to_owned(), v.clone());
        }
        Value::Object(map)
    }

    #[test]
    fn most_recently_registered_wins() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeEntry {
            name: "A".to_owned(),
            schema: Schema::new().require("id"),
            strategy: SerializeStrategy::Json,
        });
        registry.register(TypeEntry {
            name: "B".to_owned(),
            schema: Schema::new().require("id"),
            strategy: SerializeStrategy::Json,
        });

        let value = obj(&[("id", Value::Number(1.0))]);
        assert_eq!(registry.detect_type(&value), Some("B"));

        // Re-registering A moves it back to the front.
        registry.register(TypeEntry {
            name: "A".to_owned(),
            schema: Schema::new().require("id"),
            strategy: SerializeStrategy::Json,
        });
        assert_eq!(registry.detect_type(&value), Some("A"));
    }

    #[test]
    fn detect_type_rejects_arrays_and_non_objects() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.detect_type(&Value::Array(vec![])), None);
        assert_eq!(registry.detect_type(&Value::Number(1.0)), None);
    }
}
