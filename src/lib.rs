//! HTML-like markup with interpolated values, rendered into any virtual DOM
//!
//! A template invocation is a list of literal markup fragments and the values
//! interpolated between them. Strings are spliced straight into the markup;
//! every other value (callbacks, numbers, objects, nodes) is swapped for a
//! placeholder token so the markup can go through an ordinary HTML parser.
//! Rendering walks the parsed tree, puts the original values back, resolves
//! component tags and hands every element to a [`Host`].
//!
//! Encoded markup is cached by content hash, so a template evaluated many
//! times is parsed once.
//!
//! # Examples
//!
//! ```rust,ignore
//! use jsx_template::{jsx, Callback, ComponentMap};
//! use jsx_template::vdom::{render_to_static_markup, Vdom};
//!
//! # fn example() -> jsx_template::Result<()> {
//! let on_click = Callback::new(|_| println!("clicked"));
//! let template = jsx!("<a id=\"link\" onClick={on_click}>Click Me</a>");
//!
//! let node = template.render_root(&Vdom, ComponentMap::new())?.unwrap();
//! assert_eq!(
//!     render_to_static_markup(&node)?,
//!     "<a id=\"link\">Click Me</a>"
//! );
//! # Ok(())
//! # }
//! ```

extern crate self as jsx_template;

pub mod attributes;
pub mod builder;
pub mod cache;
pub mod encoder;
pub mod error;
pub mod host;
pub mod node_ext;
pub mod parser;
pub mod placeholder;
pub mod test_utils;
pub mod translator;
pub mod types;
pub mod utils;
pub mod value;
pub mod vdom;

// Re-export commonly used types
pub use builder::{Invocation, TemplateBuilder};
pub use cache::{clear_global_cache, global_cache_stats, CacheStats, TemplateCache};
pub use error::{Error, Result};
pub use host::{Child, ElementType, Host, Props};
pub use parser::ParserKind;
pub use types::{jsx, jsx_with, CacheMode, ComponentMap, ComponentReuse, JsxConfig, JsxTemplate};
pub use value::{Callback, NodeRef, Object, Value};

#[cfg(feature = "macros")]
pub use jsx_template_macros::jsx;
