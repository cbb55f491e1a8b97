//! Interpolated values
//!
//! Every value interpolated into a template is converted once, at the call
//! site, into a [`Value`]. The encoder and the translator only ever match on
//! this enum; nothing downstream inspects runtime types.
//!
//! # Variants
//!
//! - [`Value::Null`] - renders as nothing
//! - [`Value::Bool`], [`Value::Number`] - passed to the host by value
//! - [`Value::String`] - inlined directly into the markup
//! - [`Value::Object`] - a plain ordered object, e.g. a `style` map
//! - [`Value::Callable`] - an event handler or other function, see [`Callback`]
//! - [`Value::Array`] - a list of values
//! - [`Value::Node`] - an already-built host node, see [`NodeRef`]
//!
//! # Conversions
//!
//! Most Rust primitives, `String`/`&str`, `Vec<T>`, `Option<T>`,
//! `serde_json::Value` and [`Object`] convert with `From`:
//!
//! ```rust,ignore
//! use jsx_template::{Callback, Value};
//!
//! let count = Value::from(2);
//! let style = Value::object([("backgroundColor", "blue")]);
//! let on_click = Value::from(Callback::named("onClick", |_| println!("clicked")));
//! ```
//!
//! Anything implementing `serde::Serialize` can become an object with
//! [`Value::from_serialize`].

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;

/// Ordered property map used for plain objects and element props
pub type Object = IndexMap<String, Value>;

/// A shareable function value, typically an event handler
///
/// Equality is identity: two callbacks are equal only when they wrap the
/// same allocation, which is what lets a handler survive a render pass and
/// still compare equal to the value that was interpolated.
#[derive(Clone)]
pub struct Callback {
    name: Option<Rc<str>>,
    func: Rc<dyn Fn(&Value)>,
}

impl Callback {
    /// Wrap an anonymous function
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Value) + 'static,
    {
        Self {
            name: None,
            func: Rc::new(func),
        }
    }

    /// Wrap a function with a descriptive name
    ///
    /// The name only feeds placeholder naming, which keeps encoded markup
    /// readable when debugging.
    pub fn named<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) + 'static,
    {
        let name: String = name.into();
        Self {
            name: Some(Rc::from(name)),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Invoke the wrapped function
    pub fn call(&self, arg: &Value) {
        (self.func)(arg)
    }

    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({})", self.name().unwrap_or("anonymous"))
    }
}

/// A type-erased handle to a node built by a host
///
/// Lets already-rendered children (for example a component's `children`)
/// travel through a template as an interpolated value. The host that built
/// the node is the one that knows how to downcast it back.
#[derive(Clone)]
pub struct NodeRef(Rc<dyn Any>);

impl NodeRef {
    pub fn new<T: Any>(node: T) -> Self {
        NodeRef(Rc::new(node))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NodeRef(..)")
    }
}

/// A value interpolated into a template
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(Object),
    Callable(Callback),
    Array(Vec<Value>),
    Node(NodeRef),
}

impl Value {
    /// Build an object value from key/value pairs
    ///
    /// ```rust,ignore
    /// let style = Value::object([("backgroundColor", "blue"), ("opacity", "0.5")]);
    /// ```
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Convert any serializable value through `serde_json`
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Value::from(serde_json::to_value(value)?))
    }

    /// Name used when generating a placeholder token for this value
    ///
    /// Callbacks use their own name (or `func`), objects and arrays their
    /// "constructor" name, primitives their type tag.
    pub fn descriptive_name(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed("null"),
            Value::Bool(_) => Cow::Borrowed("boolean"),
            Value::Number(_) => Cow::Borrowed("number"),
            Value::String(_) => Cow::Borrowed("string"),
            Value::Object(_) => Cow::Borrowed("Object"),
            Value::Callable(cb) => Cow::Borrowed(cb.name().unwrap_or("func")),
            Value::Array(_) => Cow::Borrowed("Array"),
            Value::Node(_) => Cow::Borrowed("element"),
        }
    }

    /// True for values the encoder inlines as text instead of a placeholder
    ///
    /// Strings, nulls, and arrays made only of those qualify.
    pub fn is_string_renderable(&self) -> bool {
        match self {
            Value::Null | Value::String(_) => true,
            Value::Array(items) => items.iter().all(Value::is_string_renderable),
            _ => false,
        }
    }

    /// Append the inline text form of a string-renderable value
    ///
    /// Non-renderable values contribute nothing; callers check
    /// [`Value::is_string_renderable`] first.
    pub fn write_inline(&self, out: &mut String) {
        match self {
            Value::String(s) => out.push_str(s),
            Value::Array(items) => {
                for item in items {
                    item.write_inline(out);
                }
            }
            _ => {}
        }
    }

    /// Text form of scalar values, used when a value lands inside a larger
    /// attribute string
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Number(n) => Some(Cow::Owned(format_number(*n))),
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callback> {
        match self {
            Value::Callable(cb) => Some(cb),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }
}

/// Format a number the way a JavaScript host would print it
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", format_number(*n)),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Object(o) => f.debug_map().entries(o.iter()).finish(),
            Value::Callable(cb) => fmt::Debug::fmt(cb, f),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Node(node) => fmt::Debug::fmt(node, f),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(s: Cow<'_, str>) -> Self {
        Value::String(s.into_owned())
    }
}

impl From<Callback> for Value {
    fn from(cb: Callback) -> Self {
        Value::Callable(cb)
    }
}

impl From<NodeRef> for Value {
    fn from(node: NodeRef) -> Self {
        Value::Node(node)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn test_descriptive_names() {
        assert_eq!(Value::from(2).descriptive_name(), "number");
        assert_eq!(Value::from(false).descriptive_name(), "boolean");
        assert_eq!(Value::object([("a", 1)]).descriptive_name(), "Object");
        assert_eq!(Value::from(vec![1, 2]).descriptive_name(), "Array");
        assert_eq!(Value::from(Callback::new(|_| {})).descriptive_name(), "func");
        assert_eq!(
            Value::from(Callback::named("onClick", |_| {})).descriptive_name(),
            "onClick"
        );
    }

    #[test]
    fn test_string_renderable() {
        assert!(Value::from("text").is_string_renderable());
        assert!(Value::Null.is_string_renderable());
        assert!(Value::from(vec!["a", "b"]).is_string_renderable());
        assert!(Value::Array(vec![Value::from("a"), Value::Array(vec![Value::Null])])
            .is_string_renderable());

        assert!(!Value::from(1).is_string_renderable());
        assert!(!Value::from(vec![Value::from("a"), Value::from(1)]).is_string_renderable());
        assert!(!Value::object([("a", "b")]).is_string_renderable());
    }

    #[test]
    fn test_write_inline_flattens_nested_arrays() {
        let value = Value::Array(vec![
            Value::from("<li>a</li>"),
            Value::Null,
            Value::Array(vec![Value::from("<li>b</li>")]),
        ]);
        let mut out = String::new();
        value.write_inline(&mut out);
        assert_eq!(out, "<li>a</li><li>b</li>");
    }

    #[test]
    fn test_callback_identity() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let cb = Callback::new(move |_| counter.set(counter.get() + 1));
        let same = cb.clone();
        let other = Callback::new(|_| {});

        assert_eq!(Value::from(cb.clone()), Value::from(same.clone()));
        assert_ne!(Value::from(cb.clone()), Value::from(other));

        same.call(&Value::Null);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_node_ref_downcast() {
        let node = NodeRef::new(String::from("built"));
        assert_eq!(node.downcast_ref::<String>().map(String::as_str), Some("built"));
        assert!(node.downcast_ref::<u32>().is_none());
        assert!(node.ptr_eq(&node.clone()));
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(Value::from(3).as_text().unwrap(), "3");
        assert_eq!(Value::from(true).as_text().unwrap(), "true");
        assert!(Value::object([("a", 1)]).as_text().is_none());
    }

    #[test]
    fn test_from_json_and_serialize() {
        let value = Value::from(json!({"backgroundColor": "blue", "zIndex": 3}));
        let object = value.as_object().unwrap();
        assert_eq!(object["backgroundColor"], Value::from("blue"));
        assert_eq!(object["zIndex"], Value::from(3));

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Style {
            background_color: &'static str,
        }
        let value = Value::from_serialize(&Style {
            background_color: "red",
        })
        .unwrap();
        assert_eq!(value, Value::object([("backgroundColor", "red")]));
    }

    #[test]
    fn test_option_and_unit() {
        assert!(Value::from(None::<i32>).is_null());
        assert_eq!(Value::from(Some("x")), Value::from("x"));
        assert!(Value::from(()).is_null());
    }
}
