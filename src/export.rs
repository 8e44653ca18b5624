//! Document → HTML export.
//!
//! Element nodes map to their natural tags, text formats nest in
//! [`TextFormat::TAGS`] order (outermost first) and cards go through their
//! own renderer. Empty cards and extension nodes produce no markup.

use crate::dom::{Dom, Exported, VDom};
use crate::nodes::{CardNode, DocNode, Document, ElementBase, LinkNode, ListType, TextNode};
use crate::options::RenderOptions;
use crate::render::element_to_html;

/// Export every top-level node of `doc`, in order.
pub fn export_document_html<D: Dom>(doc: &Document, dom: &mut D, options: &RenderOptions) -> Vec<D::Element> {
    doc.children()
        .iter()
        .filter_map(|node| export_node(node, dom, options))
        .collect()
}

/// Serialize `doc` as an HTML fragment.
pub fn document_to_html(doc: &Document, options: &RenderOptions) -> String {
    export_document_html(doc, &mut VDom, options)
        .iter()
        .map(element_to_html)
        .collect()
}

fn export_node<D: Dom>(node: &DocNode, dom: &mut D, options: &RenderOptions) -> Option<D::Element> {
    let element = match node {
        DocNode::Paragraph(n) => export_element(dom, "p", &n.base, options),
        DocNode::Heading(n) => export_element(dom, n.tag.as_str(), &n.base, options),
        DocNode::Quote(n) => export_element(dom, "blockquote", &n.base, options),
        DocNode::List(n) => {
            let mut list = export_element(dom, n.tag(), &n.base, options);
            if n.list_type == ListType::Number && n.start != 1 {
                dom.set_attribute(&mut list, "start", &n.start.to_string());
            }
            list
        }
        DocNode::ListItem(n) => export_element(dom, "li", &n.base, options),
        DocNode::Link(n) => export_link(dom, n, options),
        DocNode::LineBreak(_) => dom.create_element("br"),
        DocNode::Image(n) => return card(n, dom, options),
        DocNode::Gallery(n) => return card(n, dom, options),
        DocNode::Embed(n) => return card(n, dom, options),
        DocNode::Text(_) | DocNode::Extension(_) => return None,
    };
    Some(element)
}

fn card<N: CardNode, D: Dom>(node: &N, dom: &mut D, options: &RenderOptions) -> Option<D::Element> {
    match node.export_dom(dom, options) {
        Exported::Element(element) => Some(element),
        Exported::Empty => {
            tracing::trace!(node_type = N::TYPE, "card exported no markup");
            None
        }
    }
}

fn export_element<D: Dom>(dom: &mut D, tag: &str, base: &ElementBase, options: &RenderOptions) -> D::Element {
    let mut element = dom.create_element(tag);
    let align = base.format.as_str();
    if !align.is_empty() {
        dom.set_attribute(&mut element, "style", &format!("text-align: {align};"));
    }
    append_children(dom, &mut element, &base.children, options);
    element
}

fn export_link<D: Dom>(dom: &mut D, link: &LinkNode, options: &RenderOptions) -> D::Element {
    let mut element = dom.create_element("a");
    let payload = link.payload();
    dom.set_attribute(&mut element, "href", &payload.url);
    for (name, value) in [("rel", &payload.rel), ("target", &payload.target), ("title", &payload.title)] {
        if let Some(value) = value {
            dom.set_attribute(&mut element, name, value);
        }
    }
    append_children(dom, &mut element, &link.base.children, options);
    element
}

fn append_children<D: Dom>(dom: &mut D, parent: &mut D::Element, children: &[DocNode], options: &RenderOptions) {
    for child in children {
        if let DocNode::Text(text) = child {
            append_text(dom, parent, text);
        } else if let Some(element) = export_node(child, dom, options) {
            dom.append_child(parent, element);
        }
    }
}

/// Text wrapped in one tag per format.
fn append_text<D: Dom>(dom: &mut D, parent: &mut D::Element, text: &TextNode) {
    let mut tags = text.format.tags();
    let Some(innermost) = tags.pop() else {
        dom.append_text(parent, &text.text);
        return;
    };
    let mut wrapped = dom.create_element(innermost);
    dom.append_text(&mut wrapped, &text.text);
    while let Some(tag) = tags.pop() {
        let mut outer = dom.create_element(tag);
        dom.append_child(&mut outer, wrapped);
        wrapped = outer;
    }
    dom.append_child(parent, wrapped);
}
