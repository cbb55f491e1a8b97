//! A small reference virtual DOM
//!
//! [`Vdom`] implements [`Host`] so templates can be rendered and inspected
//! without an external library. Function components are expanded lazily,
//! when the tree is serialized or explicitly expanded, the way a React-style
//! library would mount them.
//!
//! [`render_to_static_markup`] follows React's static markup conventions so
//! output can be compared with trees built directly through [`h`].

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::host::{Child, ElementType, Host, Props};
use crate::utils::{camel_to_kebab, escape_html_cow};
use crate::value::{format_number, NodeRef, Object, Value};

const MAX_COMPONENT_DEPTH: usize = 256;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

// Style properties that take plain numbers without a `px` suffix
const UNITLESS_STYLES: &[&str] = &[
    "animationIterationCount",
    "borderImageOutset",
    "borderImageSlice",
    "borderImageWidth",
    "boxFlex",
    "boxFlexGroup",
    "boxOrdinalGroup",
    "columnCount",
    "columns",
    "flex",
    "flexGrow",
    "flexPositive",
    "flexShrink",
    "flexNegative",
    "flexOrder",
    "gridArea",
    "gridRow",
    "gridRowEnd",
    "gridRowSpan",
    "gridRowStart",
    "gridColumn",
    "gridColumnEnd",
    "gridColumnSpan",
    "gridColumnStart",
    "fontWeight",
    "lineClamp",
    "lineHeight",
    "opacity",
    "order",
    "orphans",
    "tabSize",
    "widows",
    "zIndex",
    "zoom",
    "fillOpacity",
    "floodOpacity",
    "stopOpacity",
    "strokeDasharray",
    "strokeDashoffset",
    "strokeMiterlimit",
    "strokeOpacity",
    "strokeWidth",
];

/// Props and children handed to a function component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentProps {
    pub props: Props,
    pub children: Vec<VNode>,
}

impl ComponentProps {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// The children as a value, ready to interpolate into another template
    pub fn children_value(&self) -> Value {
        Value::from(self.children.clone())
    }
}

type RenderFn = dyn Fn(&ComponentProps) -> Result<Option<VNode>>;

/// A named render function usable as an element type
#[derive(Clone)]
pub struct FunctionComponent {
    name: Rc<str>,
    func: Rc<RenderFn>,
}

impl FunctionComponent {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&ComponentProps) -> Result<Option<VNode>> + 'static,
    {
        let name: String = name.into();
        Self {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, props: &ComponentProps) -> Result<Option<VNode>> {
        (self.func)(props)
    }
}

impl PartialEq for FunctionComponent {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for FunctionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionComponent({})", self.name)
    }
}

impl From<FunctionComponent> for ElementType<FunctionComponent> {
    fn from(component: FunctionComponent) -> Self {
        ElementType::Component(component)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VElement {
    pub ty: ElementType<FunctionComponent>,
    pub key: Option<String>,
    pub props: Props,
    pub children: Vec<VNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    Element(VElement),
    Text(String),
    Fragment(Vec<VNode>),
}

impl VNode {
    pub fn as_element(&self) -> Option<&VElement> {
        match self {
            VNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<VNode> for Value {
    fn from(node: VNode) -> Self {
        Value::Node(NodeRef::new(node))
    }
}

/// Build an element directly, without a template
pub fn h<I, K, V>(
    ty: impl Into<ElementType<FunctionComponent>>,
    props: I,
    children: Vec<VNode>,
) -> VNode
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let mut props: Props = props
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    let key = take_key(&mut props);
    VNode::Element(VElement {
        ty: ty.into(),
        key,
        props,
        children,
    })
}

pub fn text(content: impl Into<String>) -> VNode {
    VNode::Text(content.into())
}

/// Wrap rendered template output in a fragment
pub fn fragment(children: Vec<Child<VNode>>) -> VNode {
    VNode::Fragment(children.into_iter().flat_map(child_to_vnodes).collect())
}

fn take_key(props: &mut Props) -> Option<String> {
    props
        .shift_remove("key")
        .and_then(|key| key.as_text().map(Cow::into_owned))
}

fn child_to_vnodes(child: Child<VNode>) -> Vec<VNode> {
    match child {
        Child::Node(node) => vec![node],
        Child::Text(content) => vec![VNode::Text(content)],
        Child::Value(value) => value_to_vnodes(&value),
    }
}

fn value_to_vnodes(value: &Value) -> Vec<VNode> {
    match value {
        Value::Null | Value::Bool(_) => Vec::new(),
        Value::Number(n) => vec![VNode::Text(format_number(*n))],
        Value::String(s) if s.is_empty() => Vec::new(),
        Value::String(s) => vec![VNode::Text(s.clone())],
        Value::Array(items) => items.iter().flat_map(value_to_vnodes).collect(),
        Value::Node(node) => {
            if let Some(vnode) = node.downcast_ref::<VNode>() {
                vec![vnode.clone()]
            } else if let Some(vnodes) = node.downcast_ref::<Vec<VNode>>() {
                vnodes.clone()
            } else {
                warn!("node value was not built by this host, skipping");
                Vec::new()
            }
        }
        Value::Callable(cb) => {
            warn!(callback = ?cb, "functions are not valid as a child, skipping");
            Vec::new()
        }
        Value::Object(_) => {
            warn!("objects are not valid as a child, skipping");
            Vec::new()
        }
    }
}

/// The reference host
#[derive(Debug, Clone, Copy, Default)]
pub struct Vdom;

impl Host for Vdom {
    type Node = VNode;
    type Component = FunctionComponent;

    fn create_element(
        &self,
        element_type: ElementType<FunctionComponent>,
        mut props: Props,
        children: Option<Vec<Child<VNode>>>,
    ) -> VNode {
        let key = take_key(&mut props);
        let children = children
            .map(|children| children.into_iter().flat_map(child_to_vnodes).collect())
            .unwrap_or_default();
        VNode::Element(VElement {
            ty: element_type,
            key,
            props,
            children,
        })
    }
}

impl Vdom {
    /// Replace every component element with what it renders
    pub fn expand(&self, node: &VNode) -> Result<VNode> {
        expand_node(node, 0)
    }

    /// Invoke the `on<Event>` handler of the element with `id`
    ///
    /// Returns false when no such element or handler exists. The tree must
    /// already be expanded if the element lives inside a component.
    pub fn dispatch(&self, root: &VNode, id: &str, event: &str, arg: &Value) -> bool {
        let Some(element) = find_by_id(root, id) else {
            return false;
        };
        let prop = handler_prop(event);
        match element.props.get(&prop).and_then(Value::as_callable) {
            Some(handler) => {
                trace!(id, event = %prop, "dispatching event");
                handler.call(arg);
                true
            }
            None => false,
        }
    }
}

fn handler_prop(event: &str) -> String {
    let mut chars = event.chars();
    match chars.next() {
        Some(first) => format!("on{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => "on".to_string(),
    }
}

fn expand_node(node: &VNode, depth: usize) -> Result<VNode> {
    if depth > MAX_COMPONENT_DEPTH {
        return Err(Error::component_static("component nesting too deep"));
    }
    match node {
        VNode::Text(_) => Ok(node.clone()),
        VNode::Fragment(children) => Ok(VNode::Fragment(
            children
                .iter()
                .map(|child| expand_node(child, depth))
                .collect::<Result<_>>()?,
        )),
        VNode::Element(element) => match &element.ty {
            ElementType::Tag(_) => Ok(VNode::Element(VElement {
                ty: element.ty.clone(),
                key: element.key.clone(),
                props: element.props.clone(),
                children: element
                    .children
                    .iter()
                    .map(|child| expand_node(child, depth))
                    .collect::<Result<_>>()?,
            })),
            ElementType::Component(component) => match call_component(component, element)? {
                Some(rendered) => expand_node(&rendered, depth + 1),
                None => Ok(VNode::Fragment(Vec::new())),
            },
        },
    }
}

fn call_component(component: &FunctionComponent, element: &VElement) -> Result<Option<VNode>> {
    trace!(component = component.name(), "rendering component");
    component.call(&ComponentProps {
        props: element.props.clone(),
        children: element.children.clone(),
    })
}

/// Find the first element whose `id` prop equals `id`
pub fn find_by_id<'a>(node: &'a VNode, id: &str) -> Option<&'a VElement> {
    match node {
        VNode::Text(_) => None,
        VNode::Fragment(children) => children.iter().find_map(|child| find_by_id(child, id)),
        VNode::Element(element) => {
            if element.props.get("id").and_then(Value::as_str) == Some(id) {
                return Some(element);
            }
            element
                .children
                .iter()
                .find_map(|child| find_by_id(child, id))
        }
    }
}

/// Serialize a tree to HTML, expanding components on the way
pub fn render_to_static_markup(node: &VNode) -> Result<String> {
    let mut out = String::with_capacity(256);
    write_node(&mut out, node, 0)?;
    Ok(out)
}

fn write_node(out: &mut String, node: &VNode, depth: usize) -> Result<()> {
    if depth > MAX_COMPONENT_DEPTH {
        return Err(Error::component_static("component nesting too deep"));
    }
    match node {
        VNode::Text(content) => out.push_str(&escape_html_cow(content)),
        VNode::Fragment(children) => {
            for child in children {
                write_node(out, child, depth)?;
            }
        }
        VNode::Element(element) => match &element.ty {
            ElementType::Tag(tag) => write_element(out, tag, element, depth)?,
            ElementType::Component(component) => {
                if let Some(rendered) = call_component(component, element)? {
                    write_node(out, &rendered, depth + 1)?;
                }
            }
        },
    }
    Ok(())
}

fn write_element(out: &mut String, tag: &str, element: &VElement, depth: usize) -> Result<()> {
    out.push('<');
    out.push_str(tag);

    for (name, value) in &element.props {
        if is_reserved_prop(name) || matches!(value, Value::Callable(_)) {
            continue;
        }
        let attr = match name.as_str() {
            "className" => "class",
            "htmlFor" => "for",
            other => other,
        };

        if name == "style" {
            if let Value::Object(style) = value {
                let css = style_to_css(style);
                if !css.is_empty() {
                    write_attr(out, attr, &css);
                }
                continue;
            }
        }

        match value {
            Value::Bool(true) => write_attr(out, attr, ""),
            Value::Bool(false) | Value::Null => {}
            other => match other.as_text() {
                Some(text) => write_attr(out, attr, &text),
                None => trace!(attr, "skipping non-scalar attribute"),
            },
        }
    }

    if VOID_ELEMENTS.contains(&tag) {
        out.push_str("/>");
        return Ok(());
    }
    out.push('>');

    for child in &element.children {
        write_node(out, child, depth)?;
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
    Ok(())
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_html_cow(value));
    out.push('"');
}

fn is_reserved_prop(name: &str) -> bool {
    matches!(name, "key" | "ref" | "children")
        || (name.len() > 2
            && name.starts_with("on")
            && name[2..].starts_with(|c: char| c.is_ascii_uppercase()))
}

/// `{ backgroundColor: "blue", width: 10 }` to `background-color:blue;width:10px`
pub fn style_to_css(style: &Object) -> String {
    let mut css = String::new();
    for (name, value) in style {
        let rendered = match value {
            Value::Number(n) if *n != 0.0 && !is_unitless(name) => {
                format!("{}px", format_number(*n))
            }
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.trim().to_string(),
            _ => continue,
        };
        if !css.is_empty() {
            css.push(';');
        }
        css.push_str(&camel_to_kebab(name));
        css.push(':');
        css.push_str(&rendered);
    }
    css
}

fn is_unitless(name: &str) -> bool {
    name.starts_with("--") || UNITLESS_STYLES.contains(&name)
}
