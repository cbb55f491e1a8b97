#![cfg(feature = "macros")]

use std::cell::Cell;
use std::rc::Rc;

use jsx_template::test_utils::{render_markup, render_markup_with};
use jsx_template::vdom::{h, text, FunctionComponent, VNode, Vdom};
use jsx_template::{jsx, Callback, ComponentMap, Value};
use pretty_assertions::assert_eq;

#[test]
fn test_macro_plain_markup() {
    let template = jsx!("<div>Test</div>");
    assert_eq!(template.html(), "<div>Test</div>");
    assert!(template.placeholders().is_empty());
}

#[test]
fn test_macro_strings_are_inlined() {
    let name = "World";
    let template = jsx!("<h1>Hello {name}</h1>");

    assert_eq!(template.html(), "<h1>Hello World</h1>");
    assert_eq!(render_markup(&template).unwrap(), "<h1>Hello World</h1>");
}

#[test]
fn test_macro_expressions_become_placeholders() {
    let template = jsx!("<p>{1 + 1} of {props_count()}</p>");

    assert_eq!(template.html(), "<p>__jsx_number_0__ of __jsx_number_1__</p>");
    assert_eq!(render_markup(&template).unwrap(), "<p>2 of 3</p>");
}

fn props_count() -> u32 {
    3
}

#[test]
fn test_macro_event_handler() {
    let clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&clicks);
    let on_click = Callback::named("onClick", move |_| counter.set(counter.get() + 1));

    let template = jsx!("<a id=\"link\" onClick={on_click.clone()}>Click Me</a>");
    assert_eq!(
        template.html(),
        "<a id=\"link\" onClick=__jsx_onClick_0__>Click Me</a>"
    );

    let node = template
        .render_root(&Vdom, ComponentMap::new())
        .unwrap()
        .unwrap();
    Vdom.dispatch(&node, "link", "click", &Value::Null);
    Vdom.dispatch(&node, "link", "click", &Value::Null);
    assert_eq!(clicks.get(), 2);
}

#[test]
fn test_macro_escaped_braces() {
    let template = jsx!("<style>a {{ color: red }}</style>");
    assert_eq!(
        render_markup(&template).unwrap(),
        "<style>a { color: red }</style>"
    );
}

#[test]
fn test_macro_attribute_splicing() {
    let width = 40;
    let template = jsx!("<div width=\"{width}px\"></div>");
    assert_eq!(render_markup(&template).unwrap(), "<div width=\"40px\"></div>");
}

#[test]
fn test_macro_with_components_and_lists() {
    let items: Vec<VNode> = ["a", "b"]
        .iter()
        .map(|label| h("li", [("key", *label)], vec![text(*label)]))
        .collect();
    let list = FunctionComponent::new("List", |props| {
        let children = props.children_value();
        jsx!("<ul>{children}</ul>").render_root(&Vdom, ComponentMap::new())
    });

    let template = jsx!("<section><List>{items}</List></section>");
    let html = render_markup_with(&template, ComponentMap::from([("List", list)])).unwrap();

    assert_eq!(html, "<section><ul><li>a</li><li>b</li></ul></section>");
}
