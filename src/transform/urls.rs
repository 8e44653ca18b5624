//! Site URL rewriting over whole documents.
//!
//! Every node that declares URL fields (cards and links) is rewritten through
//! its own transform map; everything else is left as is.

use crate::nodes::{CardNode, DocNode, Document};
use crate::options::RenderOptions;
use crate::url::UrlDirection;

use super::Transform;

/// Rewrite site URLs to root-relative form (`https://site/x` → `/x`).
#[derive(Debug, Clone, Default)]
pub struct AbsoluteToRelative {
    options: RenderOptions,
}

impl AbsoluteToRelative {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Transform for AbsoluteToRelative {
    fn transform(self, mut doc: Document) -> Document {
        rewrite_nodes(doc.children_mut(), UrlDirection::ToRelative, &self.options);
        doc
    }
}

/// Rewrite root-relative URLs against the site URL (`/x` → `https://site/x`).
#[derive(Debug, Clone, Default)]
pub struct RelativeToAbsolute {
    options: RenderOptions,
}

impl RelativeToAbsolute {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Transform for RelativeToAbsolute {
    fn transform(self, mut doc: Document) -> Document {
        rewrite_nodes(doc.children_mut(), UrlDirection::ToAbsolute, &self.options);
        doc
    }
}

fn rewrite_nodes(nodes: &mut [DocNode], direction: UrlDirection, options: &RenderOptions) {
    if options.site_url().is_empty() {
        return;
    }
    for node in nodes {
        rewrite_node(node, direction, options);
    }
}

fn rewrite_node(node: &mut DocNode, direction: UrlDirection, options: &RenderOptions) {
    let to_relative = direction == UrlDirection::ToRelative;
    match node {
        DocNode::Image(card) => rewrite_card(card, to_relative, options),
        DocNode::Gallery(card) => rewrite_card(card, to_relative, options),
        DocNode::Embed(card) => rewrite_card(card, to_relative, options),
        DocNode::Link(link) => {
            let children = std::mem::take(&mut link.base.children);
            *link = if to_relative {
                link.absolute_to_relative(options)
            } else {
                link.relative_to_absolute(options)
            };
            link.base.children = children;
        }
        _ => {}
    }
    if let Some(base) = node.element_mut() {
        rewrite_nodes(&mut base.children, direction, options);
    }
}

fn rewrite_card<N: CardNode>(card: &mut N, to_relative: bool, options: &RenderOptions) {
    *card = if to_relative {
        card.absolute_to_relative(options)
    } else {
        card.relative_to_absolute(options)
    };
}
