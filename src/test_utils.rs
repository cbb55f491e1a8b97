//! Test utilities for rendered markup
//!
//! Helpers for rendering templates through the reference host and comparing
//! the resulting HTML structurally.

use dom_query::Document;

use crate::error::Result;
use crate::types::{ComponentMap, JsxTemplate};
use crate::vdom::{fragment, render_to_static_markup, FunctionComponent, Vdom};

/// Normalize HTML for comparison by parsing and re-serializing
///
/// ```
/// use jsx_template::test_utils::normalize_html;
///
/// let html1 = "<div  class=\"test\" ><p>Hello</p></div>";
/// let html2 = "<div class=\"test\"><p>Hello</p></div>";
///
/// assert_eq!(normalize_html(html1), normalize_html(html2));
/// ```
pub fn normalize_html(html: &str) -> String {
    let doc = Document::from(html);
    doc.html().trim().to_string()
}

/// Assert that two HTML strings are equivalent
///
/// Both sides are normalized through `dom_query` first, so differences in
/// tag spacing and self-closing syntax are ignored.
///
/// ```
/// use jsx_template::assert_html_eq;
///
/// assert_html_eq!("<img src=\"a.png\"/>", "<img src=\"a.png\">");
/// ```
#[macro_export]
macro_rules! assert_html_eq {
    ($left:expr, $right:expr) => {
        {
            let left_normalized = $crate::test_utils::normalize_html($left);
            let right_normalized = $crate::test_utils::normalize_html($right);

            if left_normalized != right_normalized {
                panic!(
                    "HTML assertion failed\n\nLeft (normalized):\n{}\n\nRight (normalized):\n{}\n\nOriginal left:\n{}\n\nOriginal right:\n{}",
                    left_normalized,
                    right_normalized,
                    $left,
                    $right
                );
            }
        }
    };
    ($left:expr, $right:expr, $($arg:tt)*) => {
        {
            let left_normalized = $crate::test_utils::normalize_html($left);
            let right_normalized = $crate::test_utils::normalize_html($right);

            if left_normalized != right_normalized {
                panic!(
                    "HTML assertion failed: {}\n\nLeft (normalized):\n{}\n\nRight (normalized):\n{}\n\nOriginal left:\n{}\n\nOriginal right:\n{}",
                    format!($($arg)*),
                    left_normalized,
                    right_normalized,
                    $left,
                    $right
                );
            }
        }
    };
}

/// Like `assert_html_eq!` but returns a bool instead of panicking
pub fn html_eq(html1: &str, html2: &str) -> bool {
    normalize_html(html1) == normalize_html(html2)
}

/// Render a template through [`Vdom`] and serialize every top-level node
pub fn render_markup(template: &JsxTemplate) -> Result<String> {
    render_markup_with(template, ComponentMap::new())
}

/// Like [`render_markup`] with components available to the template
pub fn render_markup_with(
    template: &JsxTemplate,
    components: ComponentMap<FunctionComponent>,
) -> Result<String> {
    let children = template.render(&Vdom, components)?;
    render_to_static_markup(&fragment(children))
}

/// Text content of some HTML with whitespace runs collapsed
pub fn extract_text(html: &str) -> String {
    let doc = Document::from(html);
    let body = doc.select("body");

    let text = if body.nodes().len() > 0 {
        body.text()
    } else {
        doc.text()
    };

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Count elements matching a selector
pub fn count_elements(html: &str, selector: &str) -> usize {
    let doc = Document::from(html);
    doc.select(selector).nodes().len()
}

pub fn has_element(html: &str, selector: &str) -> bool {
    count_elements(html, selector) > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::jsx;
    use crate::value::Value;

    #[test]
    fn test_normalize_html() {
        let html1 = r#"<div   class="test"  ><p>  Hello  </p></div>"#;
        let html2 = r#"<div class="test"><p>  Hello  </p></div>"#;

        assert_eq!(normalize_html(html1), normalize_html(html2));
    }

    #[test]
    fn test_html_eq() {
        assert!(html_eq(
            "<div class='a' id='b'><span>Text</span></div>",
            "<div class='a' id='b'><span>Text</span></div>"
        ));
        assert!(!html_eq(
            "<div><span>Text1</span></div>",
            "<div><span>Text2</span></div>"
        ));
    }

    #[test]
    fn test_render_markup() {
        let template = jsx(&["<ul><li>", "</li><li>two</li></ul>"], &[Value::from("one")]);
        let html = render_markup(&template).unwrap();

        assert_eq!(html, "<ul><li>one</li><li>two</li></ul>");
        assert_eq!(count_elements(&html, "li"), 2);
        assert_eq!(extract_text(&html), "onetwo");
        assert!(!has_element(&html, "p"));
    }

    #[test]
    fn test_assert_html_eq_macro() {
        assert_html_eq!("<br/>", "<br>");
    }

    #[test]
    #[should_panic(expected = "HTML assertion failed")]
    fn test_assert_html_eq_macro_panic() {
        assert_html_eq!("<div>Text1</div>", "<div>Text2</div>");
    }
}
