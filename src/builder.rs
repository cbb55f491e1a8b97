//! Builder pattern API for template invocations
//!
//! Rust has no tagged template literals, so [`TemplateBuilder`] assembles
//! the fragments and values of one invocation piece by piece. It always
//! produces exactly one more fragment than values.

use crate::cache::{CacheStore, TemplateCache};
use crate::parser::ParserKind;
use crate::types::{CacheMode, ComponentReuse, JsxConfig, JsxTemplate};
use crate::value::Value;

/// The literal fragments and interpolated values of one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub fragments: Vec<String>,
    pub values: Vec<Value>,
}

impl Invocation {
    pub fn compile(&self, config: JsxConfig) -> JsxTemplate {
        JsxTemplate::with_config(&self.fragments, &self.values, config)
    }

    pub fn compile_with<S: CacheStore>(
        &self,
        config: JsxConfig,
        cache: &TemplateCache<S>,
    ) -> JsxTemplate {
        JsxTemplate::with_cache(&self.fragments, &self.values, config, cache)
    }
}

/// Fluent builder for a template invocation
///
/// # Examples
///
/// ```rust,ignore
/// use jsx_template::{Callback, TemplateBuilder};
///
/// let template = TemplateBuilder::new()
///     .text("<a id=\"link\" onClick=")
///     .value(Callback::new(|_| {}))
///     .text(">Click Me</a>")
///     .compile();
/// ```
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    fragments: Vec<String>,
    values: Vec<Value>,
    config: JsxConfig,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self {
            fragments: vec![String::new()],
            values: Vec::new(),
            config: JsxConfig::default(),
        }
    }

    /// Append literal markup
    pub fn text(mut self, markup: impl AsRef<str>) -> Self {
        if let Some(last) = self.fragments.last_mut() {
            last.push_str(markup.as_ref());
        }
        self
    }

    /// Interpolate a value
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self.fragments.push(String::new());
        self
    }

    /// Use a custom template configuration
    pub fn with_config(mut self, config: JsxConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the cache mode
    pub fn with_caching(mut self, mode: CacheMode) -> Self {
        self.config = self.config.with_cache_mode(mode);
        self
    }

    pub fn with_parser(mut self, parser: ParserKind) -> Self {
        self.config = self.config.with_parser(parser);
        self
    }

    pub fn with_component_reuse(mut self, reuse: ComponentReuse) -> Self {
        self.config = self.config.with_component_reuse(reuse);
        self
    }

    /// Reject placeholder mismatches at render time
    pub fn strict(mut self) -> Self {
        self.config = self.config.with_strict_placeholders(true);
        self
    }

    /// Configure for no caching
    pub fn no_caching(mut self) -> Self {
        self.config = self.config.with_cache_mode(CacheMode::None);
        self
    }

    pub fn build(self) -> Invocation {
        Invocation {
            fragments: self.fragments,
            values: self.values,
        }
    }

    /// Encode against this thread's default cache
    pub fn compile(self) -> JsxTemplate {
        JsxTemplate::with_config(&self.fragments, &self.values, self.config)
    }

    /// Encode against a custom cache
    pub fn compile_with<S: CacheStore>(self, cache: &TemplateCache<S>) -> JsxTemplate {
        JsxTemplate::with_cache(&self.fragments, &self.values, self.config, cache)
    }
}

impl Default for TemplateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
