//! Markup cleaning: an owned tree plus the passes that run over it.

mod attributes;
mod normalize;
mod tree;

pub use attributes::{strip_attributes, ATTRIBUTE_WHITELIST};
pub use normalize::{
    demote_top_headings, normalize_fragment, normalize_html, preview_text, prune_empty,
    NormalizedHtml,
};
pub use tree::{Element, Fragment, Node};
