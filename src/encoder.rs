//! Placeholder encoder
//!
//! Turns the literal fragments and interpolated values of one template call
//! into a single markup string. Strings are inlined; every other value is
//! swapped for a placeholder token and remembered in a [`PlaceholderMap`].
//!
//! A string whose text looks like a token is encoded as a placeholder too,
//! so it comes back verbatim instead of claiming another value's slot.

use tracing::trace;

use crate::placeholder::{contains_token, make_token, PlaceholderMap};
use crate::value::Value;

/// Output of one encoding pass
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedTemplate {
    pub html: String,
    pub placeholders: PlaceholderMap,
}

pub struct Encoder;

impl Encoder {
    /// Encode `fragments` interleaved with `values`
    ///
    /// Callers uphold `fragments.len() == values.len() + 1`; a missing
    /// fragment is treated as empty and surplus fragments are appended.
    pub fn encode<S: AsRef<str>>(fragments: &[S], values: &[Value]) -> EncodedTemplate {
        let capacity = fragments.iter().map(|f| f.as_ref().len()).sum::<usize>() + values.len() * 16;
        let mut html = String::with_capacity(capacity);
        let mut placeholders = PlaceholderMap::new();

        for (index, value) in values.iter().enumerate() {
            if let Some(fragment) = fragments.get(index) {
                html.push_str(fragment.as_ref());
            }

            if value.is_string_renderable() {
                let start = html.len();
                value.write_inline(&mut html);
                if !contains_token(&html[start..]) {
                    continue;
                }
                trace!("inlined text looks like a placeholder, encoding it instead");
                html.truncate(start);
            }

            let token = make_token(&value.descriptive_name(), placeholders.len());
            trace!(token = %token, "assigned placeholder");
            html.push_str(&token);
            placeholders.insert(token, value.clone());
        }

        for fragment in fragments.iter().skip(values.len()) {
            html.push_str(fragment.as_ref());
        }

        html.truncate(html.trim_end().len());

        EncodedTemplate { html, placeholders }
    }
}
