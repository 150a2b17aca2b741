//! Removal of vacuous markup, heading demotion and preview extraction.

use blogarc_core::PREVIEW_MAX_CHARS;

use super::tree::{Fragment, Node};

/// Cleaned markup plus the preview derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHtml {
    pub content: String,
    pub preview: String,
}

/// Normalizes `fragment` in place and returns its preview.
///
/// Runs [`prune_empty`] then [`demote_top_headings`]; the preview is taken
/// from the cleaned tree.
pub fn normalize_fragment(fragment: &mut Fragment) -> String {
    prune_empty(fragment);
    demote_top_headings(fragment);
    preview_text(fragment)
}

/// Parses, normalizes and re-serializes stored article markup.
#[must_use]
pub fn normalize_html(html: &str) -> NormalizedHtml {
    let mut fragment = Fragment::parse(html);
    let preview = normalize_fragment(&mut fragment);
    NormalizedHtml {
        content: fragment.to_html(),
        preview,
    }
}

/// Detaches every element that carries no rendered information.
///
/// An element goes when all of its children are removable, its trimmed text
/// is empty and it has no attributes. Children are decided before their
/// parent, so one pass reaches the fixed point. Text and comment nodes are
/// never detached on their own; they only vote on their parent.
pub fn prune_empty(fragment: &mut Fragment) {
    prune_children(&mut fragment.children);
}

/// Returns `true` when every child was removable.
fn prune_children(children: &mut Vec<Node>) -> bool {
    let mut all_removable = true;
    children.retain_mut(|child| {
        let removable = is_removable(child);
        all_removable &= removable;
        !(removable && matches!(child, Node::Element(_)))
    });
    all_removable
}

fn is_removable(node: &mut Node) -> bool {
    match node {
        Node::Text(text) => text.trim().is_empty(),
        // Comments render nothing.
        Node::Comment(_) => true,
        Node::Element(element) => {
            let children_removable = prune_children(&mut element.children);
            children_removable
                && element.attrs.is_empty()
                && element.text_content().trim().is_empty()
        }
    }
}

/// Retags every `h1` as `h2`, at any depth. Content and attributes are kept.
pub fn demote_top_headings(fragment: &mut Fragment) {
    demote_in(&mut fragment.children);
}

fn demote_in(nodes: &mut [Node]) {
    for node in nodes {
        if let Node::Element(element) = node {
            if element.name == "h1" {
                "h2".clone_into(&mut element.name);
            }
            demote_in(&mut element.children);
        }
    }
}

/// First [`PREVIEW_MAX_CHARS`] characters of the fragment's trimmed text.
///
/// Text nodes are joined without separators and the cut ignores word
/// boundaries.
#[must_use]
pub fn preview_text(fragment: &Fragment) -> String {
    fragment
        .text()
        .trim()
        .chars()
        .take(PREVIEW_MAX_CHARS)
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
