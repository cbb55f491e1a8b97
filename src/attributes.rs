//! Attribute name normalization
//!
//! Parsed HTML attribute names are mapped to the prop names a React-like
//! host expects. Only `class` and `for` are renamed.

use indexmap::IndexMap;

/// Host prop name for a raw attribute name
pub fn normalize_name(name: &str) -> &str {
    match name {
        "class" => "className",
        "for" => "htmlFor",
        other => other,
    }
}

/// Normalize a parsed attribute list into an ordered prop map
///
/// Later duplicates win, so `class="a" className="b"` yields `className: "b"`.
pub fn normalize_attributes(attrs: &[(String, String)]) -> IndexMap<String, String> {
    if attrs.is_empty() {
        return IndexMap::new();
    }

    let mut props = IndexMap::with_capacity(attrs.len());
    for (name, value) in attrs {
        props.insert(normalize_name(name).to_string(), value.clone());
    }
    props
}
