//! Bounded memoization of parse results, including negative results
//! (§4.D "Caching").

use crate::cache::LruCache;

use super::{parse_expression, ParseError, ParsedExpression};

#[derive(Debug, Clone)]
pub struct ParseCache {
    entries: LruCache<String, Result<ParsedExpression, ParseError>>,
}

impl ParseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Parses `text`, reusing a cached result (success or failure) if present.
    pub fn get_or_parse(&mut self, text: &str) -> Result<ParsedExpression, ParseError> {
        if let Some(cached) = self.entries.get(&text.to_owned()) {
            return cached.clone();
        }
        let result = parse_expression(text);
        self.entries.insert(text.to_owned(), result.clone());
        result
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
