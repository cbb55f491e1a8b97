//! Core template types and configuration
//!
//! # Key Types
//!
//! - [`JsxTemplate`] - the deferred render object returned by [`jsx`]
//! - [`JsxConfig`] - configuration options for template behavior
//! - [`ComponentMap`] - tag name to component lookup used while rendering
//! - [`CacheMode`] / [`ComponentReuse`] - configuration switches
//!
//! # Usage
//!
//! ```rust,ignore
//! use jsx_template::{jsx, ComponentMap, Value};
//! use jsx_template::vdom::Vdom;
//!
//! let template = jsx(&["<div>", "</div>"], &[Value::from("Test")]);
//! let node = template.render_root(&Vdom, ComponentMap::new())?;
//! ```

use std::rc::Rc;

use indexmap::IndexMap;

use crate::cache::{with_global_cache, CacheEntry, CacheStore, TemplateCache};
use crate::encoder::{EncodedTemplate, Encoder};
use crate::error::Result;
use crate::host::{Child, Host};
use crate::parser::ParserKind;
use crate::placeholder::PlaceholderMap;
use crate::translator::Translator;
use crate::value::Value;

/// Encode a template invocation against this thread's default cache
///
/// `fragments` are the literal pieces around the interpolated `values`; a
/// well-formed invocation has exactly one more fragment than values.
pub fn jsx<S: AsRef<str>>(fragments: &[S], values: &[Value]) -> JsxTemplate {
    JsxTemplate::new(fragments, values)
}

/// Encode a template invocation with an explicit cache and configuration
pub fn jsx_with<S: AsRef<str>, St: CacheStore>(
    cache: &TemplateCache<St>,
    config: JsxConfig,
    fragments: &[S],
    values: &[Value],
) -> JsxTemplate {
    JsxTemplate::with_cache(fragments, values, config, cache)
}

/// A template invocation ready to be rendered against a host
///
/// Rendering is deferred: nothing is parsed until the first call to
/// [`render`](JsxTemplate::render), and the parsed tree is then shared by
/// every template created from the same markup.
///
/// Each template carries the placeholder values of its own invocation, so
/// two calls that share a cache entry still substitute their own values:
///
/// ```rust,ignore
/// let first = jsx(&["<p>Cache Test ", "</p>"], &[Value::from(1)]);
/// let second = jsx(&["<p>Cache Test ", "</p>"], &[Value::from(2)]);
///
/// assert!(second.from_cache());
/// assert!(first.same_entry(&second));
/// ```
///
/// Rendering the same template more than once is fine; each render starts
/// from a fresh placeholder pool and component map.
#[derive(Debug, Clone)]
pub struct JsxTemplate {
    pub(crate) entry: Rc<CacheEntry>,
    pub(crate) placeholders: PlaceholderMap,
    pub(crate) config: JsxConfig,
    pub(crate) from_cache: bool,
}

impl JsxTemplate {
    /// Create a template with the default configuration
    pub fn new<S: AsRef<str>>(fragments: &[S], values: &[Value]) -> Self {
        Self::with_config(fragments, values, JsxConfig::default())
    }

    /// Create a template with custom configuration, using the default cache
    pub fn with_config<S: AsRef<str>>(fragments: &[S], values: &[Value], config: JsxConfig) -> Self {
        if config.cache_mode == CacheMode::None {
            return Self::uncached(Encoder::encode(fragments, values), config);
        }
        with_global_cache(|cache| Self::with_cache(fragments, values, config, cache))
    }

    /// Create a template using a custom cache
    pub fn with_cache<S: AsRef<str>, St: CacheStore>(
        fragments: &[S],
        values: &[Value],
        config: JsxConfig,
        cache: &TemplateCache<St>,
    ) -> Self {
        let encoded = Encoder::encode(fragments, values);
        if config.cache_mode == CacheMode::None {
            return Self::uncached(encoded, config);
        }

        let lookup = cache.get_or_insert(&encoded.html);
        Self {
            entry: lookup.entry,
            placeholders: encoded.placeholders,
            config,
            from_cache: lookup.from_cache,
        }
    }

    fn uncached(encoded: EncodedTemplate, config: JsxConfig) -> Self {
        Self {
            entry: Rc::new(CacheEntry::new(encoded.html)),
            placeholders: encoded.placeholders,
            config,
            from_cache: false,
        }
    }

    /// Render into the host, returning the top-level children in order
    pub fn render<H: Host>(
        &self,
        host: &H,
        components: ComponentMap<H::Component>,
    ) -> Result<Vec<Child<H::Node>>> {
        let tree = self.entry.tree(self.config.parser)?;
        let mut translator =
            Translator::new(host, self.placeholders.to_pool(), components, &self.config);
        let children = translator.translate_forest(&tree)?;
        translator.finish()?;
        Ok(children)
    }

    /// Render and return the first top-level element
    pub fn render_root<H: Host>(
        &self,
        host: &H,
        components: ComponentMap<H::Component>,
    ) -> Result<Option<H::Node>> {
        Ok(self
            .render(host, components)?
            .into_iter()
            .find_map(|child| match child {
                Child::Node(node) => Some(node),
                _ => None,
            }))
    }

    /// The encoded markup, placeholder tokens included
    pub fn html(&self) -> &str {
        self.entry.html()
    }

    /// Content hash of the encoded markup
    pub fn cache_key(&self) -> &str {
        self.entry.key()
    }

    pub fn placeholders(&self) -> &PlaceholderMap {
        &self.placeholders
    }

    /// Whether the cache entry had already been handed out before
    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    /// Whether both templates share one cache entry
    pub fn same_entry(&self, other: &JsxTemplate) -> bool {
        Rc::ptr_eq(&self.entry, &other.entry)
    }

    pub fn config(&self) -> &JsxConfig {
        &self.config
    }
}

/// Tag name to component lookup
///
/// Lookup tries the exact tag name first and falls back to an ASCII
/// case-insensitive match, so lower-cased names from the HTML5 backend
/// still find `ListItem`.
#[derive(Debug, Clone)]
pub struct ComponentMap<C> {
    entries: IndexMap<String, C>,
}

impl<C> ComponentMap<C> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, component: C) -> Self {
        self.insert(name, component);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, component: C) {
        self.entries.insert(name.into(), component);
    }

    pub fn get(&self, name: &str) -> Option<&C> {
        self.index_of(name)
            .and_then(|index| self.entries.get_index(index))
            .map(|(_, component)| component)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name).or_else(|| {
            self.entries
                .keys()
                .position(|key| key.eq_ignore_ascii_case(name))
        })
    }
}

impl<C: Clone> ComponentMap<C> {
    /// Resolve a tag to a component, honoring the reuse policy
    pub fn resolve(&mut self, tag: &str, reuse: ComponentReuse) -> Option<C> {
        let index = self.index_of(tag)?;
        match reuse {
            ComponentReuse::Reuse => self.entries.get_index(index).map(|(_, c)| c.clone()),
            ComponentReuse::Drain => self.entries.shift_remove_index(index).map(|(_, c)| c),
        }
    }
}

impl<C> Default for ComponentMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, C> FromIterator<(K, C)> for ComponentMap<C> {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, c)| (k.into(), c)).collect(),
        }
    }
}

impl<K: Into<String>, C, const N: usize> From<[(K, C); N]> for ComponentMap<C> {
    fn from(entries: [(K, C); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[derive(Debug, Clone)]
pub struct JsxConfig {
    pub(crate) cache_mode: CacheMode,
    pub(crate) component_reuse: ComponentReuse,
    pub(crate) strict_placeholders: bool,
    pub(crate) parser: ParserKind,
}

impl JsxConfig {
    /// Create a new template configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache mode
    pub fn with_cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    /// Set whether a component may back more than one element
    pub fn with_component_reuse(mut self, reuse: ComponentReuse) -> Self {
        self.component_reuse = reuse;
        self
    }

    /// Treat unmatched or leftover placeholders as errors
    pub fn with_strict_placeholders(mut self, enabled: bool) -> Self {
        self.strict_placeholders = enabled;
        self
    }

    /// Select the markup parser backend
    pub fn with_parser(mut self, parser: ParserKind) -> Self {
        self.parser = parser;
        self
    }

    /// Create configuration with no caching
    pub fn no_caching() -> Self {
        Self {
            cache_mode: CacheMode::None,
            ..Self::default()
        }
    }

    /// Create configuration that rejects placeholder mismatches
    pub fn strict() -> Self {
        Self {
            strict_placeholders: true,
            ..Self::default()
        }
    }

    // Accessors
    pub fn cache_mode(&self) -> CacheMode {
        self.cache_mode
    }
    pub fn component_reuse(&self) -> ComponentReuse {
        self.component_reuse
    }
    pub fn strict_placeholders(&self) -> bool {
        self.strict_placeholders
    }
    pub fn parser(&self) -> ParserKind {
        self.parser
    }
}

impl Default for JsxConfig {
    fn default() -> Self {
        Self {
            cache_mode: CacheMode::Normal,
            component_reuse: ComponentReuse::Reuse,
            strict_placeholders: false,
            parser: ParserKind::Markup,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    None,
    Normal,
}

/// What happens to a component once it has been matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentReuse {
    /// A component backs every element with its name
    #[default]
    Reuse,
    /// A component is removed after its first match; later elements keep
    /// the literal tag
    Drain,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TemplateCache;

    #[test]
    fn test_config_default() {
        let config = JsxConfig::default();
        assert_eq!(config.cache_mode(), CacheMode::Normal);
        assert_eq!(config.component_reuse(), ComponentReuse::Reuse);
        assert!(!config.strict_placeholders());
        assert_eq!(config.parser(), ParserKind::Markup);
    }

    #[test]
    fn test_config_presets() {
        assert_eq!(JsxConfig::no_caching().cache_mode(), CacheMode::None);
        assert!(JsxConfig::strict().strict_placeholders());

        let config = JsxConfig::new()
            .with_parser(ParserKind::Html5)
            .with_component_reuse(ComponentReuse::Drain);
        assert_eq!(config.parser(), ParserKind::Html5);
        assert_eq!(config.component_reuse(), ComponentReuse::Drain);
    }

    #[test]
    fn test_component_lookup() {
        let mut map: ComponentMap<u8> = [("ListItem", 1), ("Header", 2)].into();
        assert_eq!(map.get("ListItem"), Some(&1));
        assert_eq!(map.get("listitem"), Some(&1));
        assert!(!map.contains("Footer"));

        assert_eq!(map.resolve("header", ComponentReuse::Reuse), Some(2));
        assert_eq!(map.resolve("Header", ComponentReuse::Drain), Some(2));
        assert_eq!(map.resolve("Header", ComponentReuse::Drain), None);
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["ListItem"]);
    }

    #[test]
    fn test_exact_match_wins() {
        let map: ComponentMap<&str> = [("item", "lower"), ("Item", "upper")].into();
        assert_eq!(map.get("Item"), Some(&"upper"));
        assert_eq!(map.get("ITEM"), Some(&"lower"));
    }

    #[test]
    fn test_template_carries_its_own_values() {
        let cache = TemplateCache::new();
        let config = JsxConfig::default();
        let first = jsx_with(&cache, config.clone(), &["<p>Cache Test ", "</p>"], &[Value::from(1)]);
        let second = jsx_with(&cache, config, &["<p>Cache Test ", "</p>"], &[Value::from(2)]);

        assert!(!first.from_cache());
        assert!(second.from_cache());
        assert!(first.same_entry(&second));
        assert_eq!(first.html(), "<p>Cache Test __jsx_number_0__</p>");
        assert_eq!(
            second.placeholders().get("__jsx_number_0__"),
            Some(&Value::from(2))
        );
        assert_eq!(
            first.placeholders().get("__jsx_number_0__"),
            Some(&Value::from(1))
        );
    }

    #[test]
    fn test_no_caching_never_shares() {
        let cache = TemplateCache::new();
        let a = jsx_with(&cache, JsxConfig::no_caching(), &["<b></b>"], &[]);
        let b = jsx_with(&cache, JsxConfig::no_caching(), &["<b></b>"], &[]);
        assert!(!a.same_entry(&b));
        assert!(!b.from_cache());
        assert!(cache.is_empty());
    }
}
