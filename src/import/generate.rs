//! DOM walk: source elements to raw document nodes.
//!
//! The walk only recognizes nodes. It does not guarantee a valid document
//! shape; a paragraph may come back holding an image card, and inline runs
//! may sit next to blocks. [`super::insert`] fixes the shape afterwards.

use markup5ever_rcdom::{Handle, NodeData};

use crate::nodes::{DocNode, DomConversion, LineBreakNode, NodeRegistry, ParagraphNode, TextFormat, TextNode};

use super::SourceElement;

/// Elements dropped with their whole subtree
const SKIPPED_TAGS: &[&str] = &["script", "style", "head", "template", "noscript", "title", "meta", "link"];

/// Unrecognized elements that still start a new block
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "center", "dd", "details", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "header", "hgroup", "main", "nav", "pre", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
];

#[derive(Debug, Clone, Copy, Default)]
struct WalkState {
    format: TextFormat,
    preformatted: bool,
}

/// Walks a parsed body, consulting `registry` for every element.
pub(crate) struct DomWalker<'r> {
    registry: &'r NodeRegistry,
}

impl<'r> DomWalker<'r> {
    pub(crate) fn new(registry: &'r NodeRegistry) -> Self {
        Self { registry }
    }

    /// Raw nodes for the children of `body`.
    pub(crate) fn walk(&self, body: &SourceElement) -> Vec<DocNode> {
        let mut out = Vec::new();
        self.walk_children(body.handle(), WalkState::default(), &mut out);
        out
    }

    fn walk_children(&self, handle: &Handle, state: WalkState, out: &mut Vec<DocNode>) {
        for child in handle.children.borrow().iter() {
            match child.data {
                NodeData::Text { ref contents } => push_text(&contents.borrow(), state, out),
                NodeData::Element { .. } => {
                    if let Some(element) = SourceElement::new(child.clone()) {
                        self.walk_element(&element, state, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn walk_element(&self, element: &SourceElement, state: WalkState, out: &mut Vec<DocNode>) {
        let tag = element.tag();
        if SKIPPED_TAGS.contains(&tag) {
            return;
        }

        match self.registry.import_dom(element) {
            Some(DomConversion::Leaf(node)) => out.push(node),
            Some(DomConversion::Container(node)) => {
                let mut children = Vec::new();
                self.walk_children(element.handle(), state, &mut children);
                out.push(node.with_children(children));
            }
            Some(DomConversion::Format(format)) => {
                let inner = WalkState {
                    format: state.format | format,
                    ..state
                };
                self.walk_children(element.handle(), inner, out);
            }
            Some(DomConversion::Skip) => {
                tracing::trace!(tag, "skipping element subtree");
            }
            None => {
                let inner = WalkState {
                    preformatted: state.preformatted || tag == "pre",
                    ..state
                };
                let mut children = Vec::new();
                self.walk_children(element.handle(), inner, &mut children);
                if BLOCK_TAGS.contains(&tag) {
                    wrap_inline_runs(children, out);
                } else {
                    out.extend(children);
                }
            }
        }
    }
}

fn push_text(raw: &str, state: WalkState, out: &mut Vec<DocNode>) {
    if state.preformatted {
        for (index, line) in raw.split('\n').enumerate() {
            if index > 0 {
                out.push(LineBreakNode.into());
            }
            if !line.is_empty() {
                out.push(TextNode::new(keep_indent(line)).with_format(state.format).into());
            }
        }
        return;
    }

    let text = collapse_whitespace(raw);
    if !text.is_empty() {
        out.push(TextNode::new(text).with_format(state.format).into());
    }
}

/// Leading spaces of a preformatted line as non-breaking spaces, so line-edge
/// trimming leaves the indentation alone.
fn keep_indent(line: &str) -> String {
    let body = line.trim_start_matches(' ');
    let indent = line.len() - body.len();
    let mut out = String::with_capacity(line.len() + indent);
    out.extend(std::iter::repeat_n('\u{a0}', indent));
    out.push_str(body);
    out
}

/// Collapse ASCII whitespace runs to one space. Non-breaking spaces are content.
pub(crate) fn collapse_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Wrap every run of inline nodes into a paragraph so a block-level wrapper
/// keeps its text apart from its neighbours. Whitespace-only runs are dropped.
fn wrap_inline_runs(children: Vec<DocNode>, out: &mut Vec<DocNode>) {
    let mut run: Vec<DocNode> = Vec::new();
    for child in children {
        if child.is_inline() {
            run.push(child);
            continue;
        }
        flush_run(&mut run, out);
        out.push(child);
    }
    flush_run(&mut run, out);
}

fn flush_run(run: &mut Vec<DocNode>, out: &mut Vec<DocNode>) {
    if run.is_empty() {
        return;
    }
    let children = std::mem::take(run);
    if children.iter().all(is_blank_inline) {
        return;
    }
    out.push(ParagraphNode::new(children).into());
}

/// Whitespace-only text; line breaks and links are content.
pub(crate) fn is_blank_inline(node: &DocNode) -> bool {
    match node {
        DocNode::Text(text) => text.text.trim_matches(' ').is_empty(),
        _ => false,
    }
}
