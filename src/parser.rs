//! Markup to node tree parsing
//!
//! The translator works on a plain owned tree of [`ParsedNode`]s with no
//! parent or sibling links. Two backends produce it:
//!
//! - [`MarkupParser`] - lenient and case-preserving. Tag and attribute names
//!   keep their case so `<ListItem>` and `onClick` survive, and `/>` closes
//!   any element. This is the default.
//! - [`Html5Parser`] - full HTML5 tree construction through `dom_query`.
//!   Names come back lower-cased, so component lookup relies on the
//!   case-insensitive fallback.
//!
//! Both drop whitespace-only text nodes, comments and doctypes.

use std::borrow::Cow;

use dom_query::Document;

use crate::error::{Error, Result};
use crate::node_ext::NodeExt;

/// A node of the parsed markup tree
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<ParsedNode>,
    },
    Text(String),
}

impl ParsedNode {
    pub fn element(tag: &str, attrs: &[(&str, &str)], children: Vec<ParsedNode>) -> Self {
        ParsedNode::Element {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            children,
        }
    }

    pub fn text(content: &str) -> Self {
        ParsedNode::Text(content.to_string())
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            ParsedNode::Element { tag, .. } => Some(tag),
            ParsedNode::Text(_) => None,
        }
    }
}

/// A markup parser producing a [`ParsedNode`] forest
pub trait TreeParser {
    fn parse(&self, html: &str) -> Result<Vec<ParsedNode>>;
}

/// Which built-in parser backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParserKind {
    #[default]
    Markup,
    Html5,
}

impl ParserKind {
    pub fn parse(self, html: &str) -> Result<Vec<ParsedNode>> {
        match self {
            ParserKind::Markup => MarkupParser.parse(html),
            ParserKind::Html5 => Html5Parser.parse(html),
        }
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Lenient, case-preserving markup parser
///
/// Void element names are matched case-sensitively, so `<Link>` is an
/// ordinary (component) element while `<link>` never takes children.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupParser;

struct OpenElement {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<ParsedNode>,
}

impl OpenElement {
    fn close(self) -> ParsedNode {
        ParsedNode::Element {
            tag: self.tag,
            attrs: self.attrs,
            children: self.children,
        }
    }
}

impl TreeParser for MarkupParser {
    fn parse(&self, html: &str) -> Result<Vec<ParsedNode>> {
        let bytes = html.as_bytes();
        let mut i = 0usize;
        let mut stack: Vec<OpenElement> = Vec::new();
        let mut roots: Vec<ParsedNode> = Vec::new();

        fn push_child(stack: &mut [OpenElement], roots: &mut Vec<ParsedNode>, node: ParsedNode) {
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => roots.push(node),
            }
        }

        while i < bytes.len() {
            if bytes[i] != b'<' {
                let start = i;
                while i < bytes.len() && bytes[i] != b'<' {
                    i += 1;
                }
                push_text(&mut stack, &mut roots, &html[start..i]);
                continue;
            }

            let rest = &html[i..];
            if rest.starts_with("<!--") {
                i = match rest[4..].find("-->") {
                    Some(end) => i + 4 + end + 3,
                    None => bytes.len(),
                };
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                i = skip_past(bytes, i, b'>');
                continue;
            }

            if rest.starts_with("</") {
                let mut j = i + 2;
                let tag = read_name(html, &mut j);
                i = skip_past(bytes, j, b'>');
                if tag.is_empty() {
                    continue;
                }
                if let Some(pos) = find_open(&stack, tag) {
                    while stack.len() > pos {
                        if let Some(open) = stack.pop() {
                            let node = open.close();
                            push_child(&mut stack, &mut roots, node);
                        }
                    }
                }
                continue;
            }

            // "<" not followed by a name is literal text
            if !bytes.get(i + 1).is_some_and(|b| b.is_ascii_alphabetic()) {
                push_text(&mut stack, &mut roots, "<");
                i += 1;
                continue;
            }

            let mut j = i + 1;
            let tag = read_name(html, &mut j).to_string();
            let (attrs, self_closing, end) = read_attributes(html, j);
            i = end;

            if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
                push_child(
                    &mut stack,
                    &mut roots,
                    ParsedNode::Element {
                        tag,
                        attrs,
                        children: Vec::new(),
                    },
                );
                continue;
            }

            if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                let close = format!("</{}", tag);
                let body_end = find_ignore_ascii_case(&html[i..], &close)
                    .map(|pos| i + pos)
                    .unwrap_or(bytes.len());
                let body = &html[i..body_end];
                let children = if body.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![ParsedNode::Text(body.to_string())]
                };
                i = if body_end < bytes.len() {
                    skip_past(bytes, body_end, b'>')
                } else {
                    body_end
                };
                push_child(
                    &mut stack,
                    &mut roots,
                    ParsedNode::Element {
                        tag,
                        attrs,
                        children,
                    },
                );
                continue;
            }

            stack.push(OpenElement {
                tag,
                attrs,
                children: Vec::new(),
            });
        }

        while let Some(open) = stack.pop() {
            let node = open.close();
            push_child(&mut stack, &mut roots, node);
        }

        Ok(roots)
    }
}

fn push_text(stack: &mut [OpenElement], roots: &mut Vec<ParsedNode>, raw: &str) {
    if raw.trim().is_empty() {
        return;
    }
    let text = decode_entities(raw).into_owned();

    // Merge with a preceding text node, e.g. around a literal "<"
    let siblings = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => roots,
    };
    if let Some(ParsedNode::Text(prev)) = siblings.last_mut() {
        prev.push_str(&text);
    } else {
        siblings.push(ParsedNode::Text(text));
    }
}

/// Position of the innermost open element matching `tag`, exact match first
fn find_open(stack: &[OpenElement], tag: &str) -> Option<usize> {
    stack
        .iter()
        .rposition(|open| open.tag == tag)
        .or_else(|| stack.iter().rposition(|open| open.tag.eq_ignore_ascii_case(tag)))
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

fn read_name<'a>(html: &'a str, i: &mut usize) -> &'a str {
    let bytes = html.as_bytes();
    let start = *i;
    while *i < bytes.len() && is_name_byte(bytes[*i]) {
        *i += 1;
    }
    &html[start..*i]
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

/// Index just past the next `target` byte at or after `from`
fn skip_past(bytes: &[u8], from: usize, target: u8) -> usize {
    let mut i = from;
    while i < bytes.len() && bytes[i] != target {
        i += 1;
    }
    (i + 1).min(bytes.len())
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.len() > h.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&start| h[start..start + n.len()].eq_ignore_ascii_case(n))
}

/// Parse attributes up to the end of a start tag
///
/// Returns the attributes, whether the tag was self-closing, and the index
/// just past the closing `>`. An unquoted value stops at whitespace, `>` or
/// `/>`.
fn read_attributes(html: &str, mut i: usize) -> (Vec<(String, String)>, bool, usize) {
    let bytes = html.as_bytes();
    let mut attrs = Vec::new();

    loop {
        skip_ws(bytes, &mut i);
        if i >= bytes.len() {
            return (attrs, false, i);
        }
        match bytes[i] {
            b'>' => return (attrs, false, i + 1),
            b'/' => {
                i += 1;
                skip_ws(bytes, &mut i);
                if i < bytes.len() && bytes[i] == b'>' {
                    return (attrs, true, i + 1);
                }
                continue;
            }
            _ => {}
        }

        let start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        if i == start {
            // stray byte such as a lone quote
            i += 1;
            continue;
        }
        let name = html[start..i].to_string();

        skip_ws(bytes, &mut i);
        if i >= bytes.len() || bytes[i] != b'=' {
            attrs.push((name, String::new()));
            continue;
        }
        i += 1;
        skip_ws(bytes, &mut i);

        let value = if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
            let quote = bytes[i];
            let value_start = i + 1;
            let mut end = value_start;
            while end < bytes.len() && bytes[end] != quote {
                end += 1;
            }
            let raw = &html[value_start..end];
            i = (end + 1).min(bytes.len());
            raw
        } else {
            let value_start = i;
            while i < bytes.len()
                && !bytes[i].is_ascii_whitespace()
                && bytes[i] != b'>'
                && !(bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'>'))
            {
                i += 1;
            }
            &html[value_start..i]
        };
        attrs.push((name, decode_entities(value).into_owned()));
    }
}

/// Decode the character references that commonly appear in templates
///
/// Unknown references are left as written.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&rest[1..semi]).map(|ch| (ch, semi)));

        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(reference: &str) -> Option<char> {
    match reference {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "copy" => Some('\u{a9}'),
        _ => {
            let number = reference.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// HTML5 parser backed by `dom_query`
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5Parser;

impl TreeParser for Html5Parser {
    fn parse(&self, html: &str) -> Result<Vec<ParsedNode>> {
        let document = Document::from(html);
        let body = document.select("body");
        let body_node = body
            .nodes()
            .first()
            .ok_or_else(|| Error::parse_static("Parsed document has no body"))?;

        Ok(body_node
            .children()
            .iter()
            .filter_map(|child| child.to_parsed_node())
            .collect())
    }
}
