use dom_query::Node;

use crate::parser::ParsedNode;

/// Extension trait turning `dom_query` nodes into owned [`ParsedNode`]s
pub trait NodeExt {
    fn attr_pairs(&self) -> Vec<(String, String)>;
    fn to_parsed_node(&self) -> Option<ParsedNode>;
}

impl<'a> NodeExt for Node<'a> {
    fn attr_pairs(&self) -> Vec<(String, String)> {
        self.query(|node| {
            node.as_element()
                .map(|element| {
                    element
                        .attrs
                        .iter()
                        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })
        .unwrap_or_default()
    }

    fn to_parsed_node(&self) -> Option<ParsedNode> {
        if self.is_element() {
            let tag = self.node_name()?.to_string();
            let children = self
                .children()
                .iter()
                .filter_map(|child| child.to_parsed_node())
                .collect();
            Some(ParsedNode::Element {
                tag,
                attrs: self.attr_pairs(),
                children,
            })
        } else if self.is_text() {
            let text = self.text().to_string();
            if text.trim().is_empty() {
                None
            } else {
                Some(ParsedNode::Text(text))
            }
        } else {
            None
        }
    }
}
