//! Tree-to-element translation
//!
//! Walks a parsed tree depth-first and rebuilds it through a [`Host`]:
//! component tags are swapped for component references, placeholder tokens
//! in attributes and text are swapped back for the values they stand for,
//! and every element gets a `key`.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::attributes::normalize_attributes;
use crate::error::{Error, Result};
use crate::host::{Child, ElementType, Host, Props};
use crate::parser::ParsedNode;
use crate::placeholder::{contains_token, find_tokens, is_token, Claim, PlaceholderPool};
use crate::types::{ComponentMap, JsxConfig};
use crate::utils::normalize_text_segment;
use crate::value::Value;

static NEXT_KEY: AtomicU64 = AtomicU64::new(0);

/// Next value of the process-wide element key counter
pub fn next_key() -> String {
    NEXT_KEY.fetch_add(1, Ordering::Relaxed).to_string()
}

/// Single-pass translator; build one per render
pub struct Translator<'a, H: Host> {
    host: &'a H,
    placeholders: PlaceholderPool,
    components: ComponentMap<H::Component>,
    config: &'a JsxConfig,
}

impl<'a, H: Host> Translator<'a, H> {
    pub fn new(
        host: &'a H,
        placeholders: PlaceholderPool,
        components: ComponentMap<H::Component>,
        config: &'a JsxConfig,
    ) -> Self {
        Self {
            host,
            placeholders,
            components,
            config,
        }
    }

    /// Translate a forest, flattening text segments into the result
    pub fn translate_forest(&mut self, nodes: &[ParsedNode]) -> Result<Vec<Child<H::Node>>> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            out.extend(self.translate_node(node)?);
        }
        Ok(out)
    }

    pub fn translate_node(&mut self, node: &ParsedNode) -> Result<Vec<Child<H::Node>>> {
        match node {
            ParsedNode::Element {
                tag,
                attrs,
                children,
            } => Ok(vec![Child::Node(self.translate_element(tag, attrs, children)?)]),
            ParsedNode::Text(text) => self.translate_text(text),
        }
    }

    pub fn translate_element(
        &mut self,
        tag: &str,
        attrs: &[(String, String)],
        children: &[ParsedNode],
    ) -> Result<H::Node> {
        let element_type = match self.components.resolve(tag, self.config.component_reuse()) {
            Some(component) => ElementType::Component(component),
            None => {
                if tag.starts_with(|c: char| c.is_ascii_uppercase()) {
                    debug!(tag, "no component registered, using literal tag");
                }
                ElementType::Tag(tag.to_string())
            }
        };

        let normalized = normalize_attributes(attrs);
        let mut props = Props::with_capacity(normalized.len() + 1);
        for (name, raw) in normalized {
            let value = self.resolve_attribute(raw)?;
            props.insert(name, value);
        }
        if !props.contains_key("key") {
            props.insert("key".to_string(), Value::String(next_key()));
        }

        let mut translated = Vec::new();
        for child in children {
            translated.extend(self.translate_node(child)?);
        }
        let children = if translated.is_empty() {
            None
        } else {
            Some(translated)
        };

        debug!(tag, props = props.len(), "building element");
        Ok(self.host.create_element(element_type, props, children))
    }

    /// Split text on placeholder tokens and normalize the literal parts
    pub fn translate_text(&mut self, text: &str) -> Result<Vec<Child<H::Node>>> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for token in find_tokens(text) {
            literal.push_str(&text[last..token.start()]);
            last = token.end();
            match self.claim(token.as_str())? {
                Some(value) => {
                    flush_literal(&mut literal, &mut segments);
                    segments.push(Child::Value(value));
                }
                None => literal.push_str(token.as_str()),
            }
        }
        literal.push_str(&text[last..]);
        flush_literal(&mut literal, &mut segments);

        Ok(segments)
    }

    /// Check that every placeholder was substituted
    ///
    /// Only strict mode treats leftovers as an error.
    pub fn finish(self) -> Result<()> {
        if self.placeholders.remaining() == 0 {
            return Ok(());
        }
        let unclaimed: Vec<&str> = self.placeholders.unclaimed().collect();
        if self.config.strict_placeholders() {
            return Err(Error::placeholder_owned(format!(
                "placeholders never substituted: {}",
                unclaimed.join(", ")
            )));
        }
        debug!(?unclaimed, "placeholders never substituted");
        Ok(())
    }

    fn resolve_attribute(&mut self, raw: String) -> Result<Value> {
        if is_token(&raw) {
            return Ok(self.claim(&raw)?.unwrap_or(Value::String(raw)));
        }
        if !contains_token(&raw) {
            return Ok(Value::String(raw));
        }

        // Tokens inside a longer attribute string: splice scalar values in as text
        let mut out = String::with_capacity(raw.len());
        let mut last = 0;
        for token in find_tokens(&raw) {
            out.push_str(&raw[last..token.start()]);
            last = token.end();

            let is_scalar = self
                .placeholders
                .peek(token.as_str())
                .map(|value| value.as_text().is_some());
            match is_scalar {
                Some(true) => {
                    if let Some(value) = self.claim(token.as_str())? {
                        out.push_str(&value.as_text().unwrap_or_default());
                    }
                }
                Some(false) => {
                    self.mismatch(format!(
                        "placeholder {} holds a non-scalar value inside attribute text",
                        token.as_str()
                    ))?;
                    out.push_str(token.as_str());
                }
                None => {
                    // already substituted or never issued; claim reports which
                    self.claim(token.as_str())?;
                    out.push_str(token.as_str());
                }
            }
        }
        out.push_str(&raw[last..]);
        Ok(Value::String(out))
    }

    fn claim(&mut self, token: &str) -> Result<Option<Value>> {
        match self.placeholders.claim(token) {
            Claim::Value(value) => Ok(Some(value)),
            Claim::AlreadyClaimed => {
                self.mismatch(format!("placeholder {} was already substituted", token))?;
                Ok(None)
            }
            Claim::Unknown => {
                self.mismatch(format!("placeholder {} was never issued", token))?;
                Ok(None)
            }
        }
    }

    fn mismatch(&self, message: String) -> Result<()> {
        if self.config.strict_placeholders() {
            Err(Error::placeholder_owned(message))
        } else {
            debug!(%message, "leaving placeholder text in place");
            Ok(())
        }
    }
}

fn flush_literal<N>(literal: &mut String, segments: &mut Vec<Child<N>>) {
    if literal.is_empty() {
        return;
    }
    let normalized = normalize_text_segment(literal);
    if !normalized.is_empty() {
        segments.push(Child::Text(normalized.into_owned()));
    }
    literal.clear();
}
