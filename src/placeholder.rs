//! Placeholder tokens and the one-shot placeholder pool
//!
//! The encoder replaces every non-string value with a token of the form
//! `__jsx_<name>_<n>__`. The translator later finds those tokens in
//! attribute values and text and claims the original value back from a
//! [`PlaceholderPool`]. A token can be claimed once per render.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Match, Regex};
use std::collections::HashSet;

use crate::value::Value;

static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"__jsx_[A-Za-z0-9_]*?_\d+__").expect("Invalid placeholder token regex")
});

static FULL_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^__jsx_[A-Za-z0-9_]*?_\d+__$").expect("Invalid placeholder token regex")
});

/// Build the token for the `index`-th placeholder of an encoding pass
///
/// The name is reduced to ASCII words joined by single underscores, so it
/// never contains the `__` terminator.
pub fn make_token(name: &str, index: usize) -> String {
    let words = name
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty());

    let mut token = String::with_capacity(name.len() + 16);
    token.push_str("__jsx_");
    let start = token.len();
    for word in words {
        if token.len() > start {
            token.push('_');
        }
        token.push_str(word);
    }
    if token.len() == start {
        token.push_str("value");
    }
    token.push('_');
    token.push_str(&index.to_string());
    token.push_str("__");
    token
}

/// True when the whole string is one placeholder token
pub fn is_token(s: &str) -> bool {
    FULL_TOKEN_REGEX.is_match(s)
}

/// True when the string contains at least one placeholder token
pub fn contains_token(s: &str) -> bool {
    TOKEN_REGEX.is_match(s)
}

/// Every token-shaped substring, in order
pub fn find_tokens(s: &str) -> impl Iterator<Item = Match<'_>> {
    TOKEN_REGEX.find_iter(s)
}

/// Token to value mapping produced by one encoding pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceholderMap {
    entries: IndexMap<String, Value>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: String, value: Value) {
        self.entries.insert(token, value);
    }

    pub fn get(&self, token: &str) -> Option<&Value> {
        self.entries.get(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fresh pool for a single render pass
    pub fn to_pool(&self) -> PlaceholderPool {
        PlaceholderPool {
            available: self.entries.clone(),
            claimed: HashSet::new(),
        }
    }
}

/// Outcome of claiming a token from a [`PlaceholderPool`]
#[derive(Debug, Clone, PartialEq)]
pub enum Claim {
    /// The value bound to the token; it is no longer in the pool
    Value(Value),
    /// The token was issued but has already been substituted this pass
    AlreadyClaimed,
    /// The token was never issued by the encoder
    Unknown,
}

/// Single-use registry of placeholder values for one render pass
#[derive(Debug, Default)]
pub struct PlaceholderPool {
    available: IndexMap<String, Value>,
    claimed: HashSet<String>,
}

impl PlaceholderPool {
    /// Take the value bound to `token` out of the pool
    pub fn claim(&mut self, token: &str) -> Claim {
        match self.available.swap_remove(token) {
            Some(value) => {
                self.claimed.insert(token.to_string());
                Claim::Value(value)
            }
            None if self.claimed.contains(token) => Claim::AlreadyClaimed,
            None => Claim::Unknown,
        }
    }

    /// Look at an unclaimed value without taking it
    pub fn peek(&self, token: &str) -> Option<&Value> {
        self.available.get(token)
    }

    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    /// Tokens never claimed during the pass
    pub fn unclaimed(&self) -> impl Iterator<Item = &str> {
        self.available.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_token() {
        assert_eq!(make_token("func", 0), "__jsx_func_0__");
        assert_eq!(make_token("on-click", 3), "__jsx_on_click_3__");
        assert_eq!(make_token("", 1), "__jsx_value_1__");
        assert_eq!(make_token("step_1__", 0), "__jsx_step_1_0__");
        assert_eq!(make_token("__private", 2), "__jsx_private_2__");
        assert_eq!(make_token("--", 4), "__jsx_value_4__");
    }

    #[test]
    fn test_underscored_names_found_in_text() {
        let token = make_token("step_1__", 0);
        let text = format!("Next: {} done", token);
        let found: Vec<&str> = find_tokens(&text).map(|m| m.as_str()).collect();
        assert_eq!(found, vec![token.as_str()]);
    }

    #[test]
    fn test_token_detection() {
        assert!(is_token("__jsx_number_0__"));
        assert!(is_token("__jsx_a_1_12__"));
        assert!(!is_token("x__jsx_number_0__"));
        assert!(!is_token("__jsx_number__"));
        assert!(contains_token("Cache Test __jsx_number_0__"));
        assert!(!contains_token("plain text"));
    }

    #[test]
    fn test_find_adjacent_tokens() {
        let text = "a __jsx_func_0____jsx_h1_handler_1__ b";
        let found: Vec<&str> = find_tokens(text).map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["__jsx_func_0__", "__jsx_h1_handler_1__"]);
    }

    #[test]
    fn test_pool_claims_once() {
        let mut map = PlaceholderMap::new();
        map.insert(make_token("number", 0), Value::from(2));

        let mut pool = map.to_pool();
        assert_eq!(pool.claim("__jsx_number_0__"), Claim::Value(Value::from(2)));
        assert_eq!(pool.claim("__jsx_number_0__"), Claim::AlreadyClaimed);
        assert_eq!(pool.claim("__jsx_number_9__"), Claim::Unknown);
        assert_eq!(pool.remaining(), 0);

        // The map itself is untouched, so the next pass starts full
        let mut second = map.to_pool();
        assert_eq!(second.remaining(), 1);
        assert!(matches!(second.claim("__jsx_number_0__"), Claim::Value(_)));
    }

    #[test]
    fn test_unclaimed_tokens() {
        let mut map = PlaceholderMap::new();
        map.insert(make_token("func", 0), Value::Null);
        map.insert(make_token("Object", 1), Value::Null);

        let mut pool = map.to_pool();
        pool.claim("__jsx_func_0__");
        let left: Vec<&str> = pool.unclaimed().collect();
        assert_eq!(left, vec!["__jsx_Object_1__"]);
    }
}
