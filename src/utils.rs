//! Small string helpers shared by the translator and the reference host
//!
//! Each helper returns `Cow` and borrows its input when nothing changes.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

// HTML whitespace only; a decoded &nbsp; must survive collapsing
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\n\r\x0C]+").expect("Invalid whitespace regex"));

static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("Invalid uppercase regex"));

/// Normalize one literal text segment
///
/// Strips a single leading newline, then collapses every run of whitespace
/// to one space. The result may be empty, in which case callers drop it.
pub fn normalize_text_segment(segment: &str) -> Cow<'_, str> {
    let stripped = segment
        .strip_prefix("\r\n")
        .or_else(|| segment.strip_prefix('\n'))
        .unwrap_or(segment);
    WHITESPACE_RUN.replace_all(stripped, " ")
}

/// `backgroundColor` to `background-color`
pub fn camel_to_kebab(name: &str) -> Cow<'_, str> {
    if name.starts_with("--") {
        // CSS custom properties keep their spelling
        return Cow::Borrowed(name);
    }
    let kebab = UPPERCASE.replace_all(name, |caps: &regex::Captures| {
        format!("-{}", caps[0].to_ascii_lowercase())
    });
    match kebab {
        Cow::Owned(s) if s.starts_with("ms-") => Cow::Owned(format!("-{}", s)),
        other => other,
    }
}

/// Escape HTML entities efficiently
pub fn escape_html_cow(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + input.len() / 4);
    for ch in input.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(ch),
        }
    }

    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_segment() {
        assert_eq!(normalize_text_segment("Cache Test "), "Cache Test ");
        assert_eq!(normalize_text_segment("\nHello\n   world"), "Hello world");
        assert_eq!(normalize_text_segment("\n\n  x"), " x");
        assert_eq!(normalize_text_segment("\n"), "");
        assert_eq!(normalize_text_segment("a\u{a0}\u{a0}b"), "a\u{a0}\u{a0}b");
        assert!(matches!(normalize_text_segment("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_camel_to_kebab() {
        assert_eq!(camel_to_kebab("backgroundColor"), "background-color");
        assert_eq!(camel_to_kebab("color"), "color");
        assert_eq!(camel_to_kebab("msTransition"), "-ms-transition");
        assert_eq!(camel_to_kebab("--main-Color"), "--main-Color");
    }

    #[test]
    fn test_escape_html_cow() {
        let result = escape_html_cow("simple text");
        assert!(matches!(result, Cow::Borrowed(_)));

        let result = escape_html_cow("text with <tags> & \"quotes\"");
        assert_eq!(result, "text with &lt;tags&gt; &amp; &quot;quotes&quot;");
        assert!(matches!(result, Cow::Owned(_)));
    }
}
