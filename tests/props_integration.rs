//! Integration tests for props reaching components and elements
//!
//! Non-string values must arrive at the host unchanged: same number, same
//! boolean, the very same callback and an equal object.

use std::cell::RefCell;
use std::rc::Rc;

use jsx_template::test_utils::{render_markup, render_markup_with};
use jsx_template::vdom::{FunctionComponent, Vdom};
use jsx_template::{jsx, Callback, ComponentMap, Value};
use pretty_assertions::assert_eq;

/// A component that records the `test` prop it was called with
fn capturing_component() -> (FunctionComponent, Rc<RefCell<Option<Value>>>) {
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let component = FunctionComponent::new("Component", move |props| {
        *sink.borrow_mut() = props.get("test").cloned();
        Ok(None)
    });
    (component, seen)
}

fn render_with_test_prop(value: Value) -> Option<Value> {
    let (component, seen) = capturing_component();
    let parent = jsx(&["<Component test=", " />"], &[value]);

    let html = render_markup_with(&parent, ComponentMap::from([("Component", component)])).unwrap();
    assert_eq!(html, "");
    let captured = seen.borrow().clone();
    captured
}

#[test]
fn test_numeric_props() {
    assert_eq!(render_with_test_prop(Value::from(2)), Some(Value::from(2)));
}

#[test]
fn test_boolean_props() {
    assert_eq!(
        render_with_test_prop(Value::from(false)),
        Some(Value::from(false))
    );
}

#[test]
fn test_object_props() {
    let expected = Value::object([("backgroundColor", "blue")]);
    assert_eq!(render_with_test_prop(expected.clone()), Some(expected));
}

#[test]
fn test_callback_props_keep_identity() {
    let handler = Callback::named("onSelect", |_| {});
    let captured = render_with_test_prop(Value::from(handler.clone())).unwrap();

    let received = captured.as_callable().unwrap();
    assert!(received.ptr_eq(&handler));
}

#[test]
fn test_null_and_string_values_are_inlined() {
    let template = jsx(
        &["<p title=\"", "\">", "", "</p>"],
        &[Value::from("hi"), Value::Null, Value::from(vec!["a", "b"])],
    );
    assert_eq!(template.html(), "<p title=\"hi\">ab</p>");
    assert!(template.placeholders().is_empty());
    assert_eq!(render_markup(&template).unwrap(), "<p title=\"hi\">ab</p>");
}

#[test]
fn test_scalar_spliced_into_attribute() {
    let template = jsx(
        &["<div data-count=\"n-", "\" aria-hidden=", "></div>"],
        &[Value::from(3), Value::from(true)],
    );
    let node = template
        .render_root(&Vdom, ComponentMap::new())
        .unwrap()
        .unwrap();
    let element = node.as_element().unwrap();

    assert_eq!(element.props["data-count"], Value::from("n-3"));
    assert_eq!(element.props["aria-hidden"], Value::from(true));
}

#[test]
fn test_class_and_for_are_renamed() {
    let template = jsx(
        &["<label class=\"field\" for=\"name\" data-x=\"1\">Name</label>"],
        &[],
    );
    let node = template
        .render_root(&Vdom, ComponentMap::new())
        .unwrap()
        .unwrap();
    let names: Vec<&str> = node
        .as_element()
        .unwrap()
        .props
        .keys()
        .map(String::as_str)
        .collect();

    assert_eq!(names, vec!["className", "htmlFor", "data-x"]);
    assert_eq!(
        render_markup(&template).unwrap(),
        "<label class=\"field\" for=\"name\" data-x=\"1\">Name</label>"
    );
}

#[test]
fn test_explicit_key_is_kept() {
    let template = jsx(&["<li key=\"first\">a</li><li>b</li>"], &[]);
    let children = template.render(&Vdom, ComponentMap::new()).unwrap();

    let keys: Vec<Option<String>> = children
        .iter()
        .filter_map(|child| child.as_node())
        .map(|node| node.as_element().unwrap().key.clone())
        .collect();

    assert_eq!(keys[0].as_deref(), Some("first"));
    // synthesized keys are numeric and never collide with the literal one
    let synthesized = keys[1].as_deref().unwrap();
    assert!(synthesized.parse::<u64>().is_ok());
}
