//! Attribute whitelisting.

use super::tree::{Fragment, Node};

/// The only attributes that survive [`strip_attributes`]: the hyperlink
/// target and the resource source.
pub const ATTRIBUTE_WHITELIST: [&str; 2] = ["href", "src"];

/// Drops every attribute not in [`ATTRIBUTE_WHITELIST`] from every element
/// of the fragment, at every depth. Removed attributes are gone for good.
pub fn strip_attributes(fragment: &mut Fragment) {
    strip_nodes(&mut fragment.children);
}

fn strip_nodes(nodes: &mut [Node]) {
    for node in nodes {
        if let Node::Element(element) = node {
            strip_nodes(&mut element.children);
            element
                .attrs
                .retain(|(name, _)| ATTRIBUTE_WHITELIST.contains(&name.as_str()));
        }
    }
}
