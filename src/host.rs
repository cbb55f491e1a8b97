//! The host element-creation contract
//!
//! A host is any virtual-DOM library able to build an element from a type,
//! a prop map and an optional list of children. The translator only ever
//! talks to the host through [`Host::create_element`].

use crate::value::{Object, Value};

/// Props handed to the host, in markup order
pub type Props = Object;

/// The type of an element: a literal tag or a resolved component
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType<C> {
    Tag(String),
    Component(C),
}

impl<C> ElementType<C> {
    pub fn as_tag(&self) -> Option<&str> {
        match self {
            ElementType::Tag(tag) => Some(tag),
            ElementType::Component(_) => None,
        }
    }

    pub fn as_component(&self) -> Option<&C> {
        match self {
            ElementType::Component(c) => Some(c),
            ElementType::Tag(_) => None,
        }
    }
}

impl<C> From<&str> for ElementType<C> {
    fn from(tag: &str) -> Self {
        ElementType::Tag(tag.to_string())
    }
}

impl<C> From<String> for ElementType<C> {
    fn from(tag: String) -> Self {
        ElementType::Tag(tag)
    }
}

/// One child passed to the host
#[derive(Debug, Clone, PartialEq)]
pub enum Child<N> {
    /// An element built by the host
    Node(N),
    /// Literal text from the markup, already whitespace-normalized
    Text(String),
    /// An interpolated value spliced in as a child
    Value(Value),
}

impl<N> Child<N> {
    pub fn as_node(&self) -> Option<&N> {
        match self {
            Child::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Child::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Child::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// A virtual-DOM library's element-creation entry point
pub trait Host {
    /// The element type the host builds
    type Node;
    /// A component reference usable as an element type
    type Component: Clone;

    /// Build one element
    ///
    /// `children` is `None` when the element has no children, never an
    /// empty vector.
    fn create_element(
        &self,
        element_type: ElementType<Self::Component>,
        props: Props,
        children: Option<Vec<Child<Self::Node>>>,
    ) -> Self::Node;
}
