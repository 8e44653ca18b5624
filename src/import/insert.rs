//! Insertion normalization.
//!
//! Turns the raw node sequence of a DOM walk into valid root blocks:
//!
//! - root children are text blocks, lists or decorators
//! - text blocks and list items hold inline nodes only, plus nested lists
//!   (each in its own list item)
//! - a block inside a text block, list item or link splits it
//! - nested text blocks are flattened with line breaks between them
//! - edge spaces are trimmed and adjacent same-format text is merged

use crate::nodes::{DocNode, LineBreakNode, LinkNode, ListItemNode, ListNode, ListType, ParagraphNode};

use super::generate::is_blank_inline;

/// Flattened content of an element.
#[derive(Debug)]
enum Piece {
    Inline(DocNode),
    /// Edge of a nested text block
    Boundary,
    Block(DocNode),
}

/// Normalize walked nodes into root children.
pub(crate) fn normalize_root(nodes: Vec<DocNode>) -> Vec<DocNode> {
    let mut out = Vec::new();
    let mut implicit = Segmenter::new(ParagraphNode::default().into(), false);

    for node in group_stray_items(nodes) {
        if node.is_text_block() {
            implicit.flush(&mut out);
            normalize_text_block(node, &mut out);
        } else if node.is_inline() {
            let mut pieces = Vec::new();
            flatten(vec![node], &mut pieces);
            for piece in pieces {
                match piece {
                    Piece::Inline(inline) => implicit.push_inline(inline),
                    Piece::Boundary => implicit.flush(&mut out),
                    Piece::Block(block) => {
                        implicit.flush(&mut out);
                        emit_block(block, &mut out);
                    }
                }
            }
        } else {
            implicit.flush(&mut out);
            emit_block(node, &mut out);
        }
    }
    implicit.flush(&mut out);
    out
}

/// Collect consecutive list items outside any list into bullet lists.
fn group_stray_items(nodes: Vec<DocNode>) -> Vec<DocNode> {
    let mut out: Vec<DocNode> = Vec::with_capacity(nodes.len());
    let mut stray: Vec<DocNode> = Vec::new();
    for node in nodes {
        if node.is_list_item() {
            stray.push(node);
            continue;
        }
        if !stray.is_empty() && is_blank_inline(&node) {
            continue;
        }
        if !stray.is_empty() {
            out.push(ListNode::new(ListType::Bullet, std::mem::take(&mut stray)).into());
        }
        out.push(node);
    }
    if !stray.is_empty() {
        out.push(ListNode::new(ListType::Bullet, stray).into());
    }
    out
}

fn emit_block(block: DocNode, out: &mut Vec<DocNode>) {
    match block {
        DocNode::List(list) => normalize_list(list, out),
        DocNode::ListItem(item) => {
            normalize_list(ListNode::new(ListType::Bullet, vec![item.into()]), out);
        }
        block if block.is_text_block() => normalize_text_block(block, out),
        block => out.push(block),
    }
}

// =============================================================================
// Flattening
// =============================================================================

fn flatten(nodes: Vec<DocNode>, out: &mut Vec<Piece>) {
    for node in nodes {
        match node {
            DocNode::Link(link) => flatten_link(link, out),
            node if node.is_inline() => out.push(Piece::Inline(node)),
            mut node if node.is_text_block() => {
                out.push(Piece::Boundary);
                flatten(node.take_children(), out);
                out.push(Piece::Boundary);
            }
            node => out.push(Piece::Block(node)),
        }
    }
}

/// Inline runs of a link stay wrapped in copies of the link; blocks inside it
/// split it. An image without its own href takes the link's url.
fn flatten_link(mut link: LinkNode, out: &mut Vec<Piece>) {
    let shell = link.shell();
    let mut inner = Vec::new();
    flatten(std::mem::take(&mut link.base.children), &mut inner);

    let mut run = Vec::new();
    for piece in inner {
        match piece {
            Piece::Inline(node) => run.push(node),
            Piece::Block(DocNode::Image(image)) if image.href().is_empty() => {
                flush_link_run(&shell, &mut run, out);
                out.push(Piece::Block(image.with_href(shell.url()).into()));
            }
            other => {
                flush_link_run(&shell, &mut run, out);
                out.push(other);
            }
        }
    }
    flush_link_run(&shell, &mut run, out);
}

fn flush_link_run(shell: &LinkNode, run: &mut Vec<DocNode>, out: &mut Vec<Piece>) {
    if run.is_empty() {
        return;
    }
    let mut link = shell.clone();
    link.base.children = std::mem::take(run);
    out.push(Piece::Inline(link.into()));
}

/// Whitespace next to a block edge carries no content.
fn drop_blank_around_edges(pieces: Vec<Piece>) -> Vec<Piece> {
    let is_inline = |piece: Option<&Piece>| matches!(piece, Some(Piece::Inline(_)));
    let dropped: Vec<bool> = (0..pieces.len())
        .map(|index| match &pieces[index] {
            Piece::Inline(node) => {
                let prev = index.checked_sub(1).and_then(|i| pieces.get(i));
                is_blank_inline(node) && !(is_inline(prev) && is_inline(pieces.get(index + 1)))
            }
            _ => false,
        })
        .collect();
    pieces
        .into_iter()
        .zip(dropped)
        .filter_map(|(piece, dropped)| (!dropped).then_some(piece))
        .collect()
}

// =============================================================================
// Segmenter
// =============================================================================

/// Collects inline content for one block template, emitting a copy of the
/// template for every contiguous segment.
struct Segmenter {
    template: DocNode,
    inlines: Vec<DocNode>,
    pending_break: bool,
    emitted: bool,
    was_split: bool,
    /// Came from a source element, so an empty one is kept
    explicit: bool,
}

impl Segmenter {
    fn new(template: DocNode, explicit: bool) -> Self {
        Self {
            template,
            inlines: Vec::new(),
            pending_break: false,
            emitted: false,
            was_split: false,
            explicit,
        }
    }

    fn push_inline(&mut self, node: DocNode) {
        if self.pending_break {
            self.inlines.push(LineBreakNode.into());
            self.pending_break = false;
        }
        self.inlines.push(node);
    }

    fn boundary(&mut self) {
        if !self.inlines.is_empty() {
            self.pending_break = true;
        }
    }

    /// Emit the current segment; a block is about to be placed after it.
    fn split(&mut self, out: &mut Vec<DocNode>) {
        self.flush(out);
        self.was_split = true;
    }

    fn flush(&mut self, out: &mut Vec<DocNode>) {
        self.pending_break = false;
        let cleaned = clean_inlines(std::mem::take(&mut self.inlines));
        if cleaned.is_empty() {
            return;
        }
        out.push(self.template.clone().with_children(cleaned));
        self.emitted = true;
    }

    fn finish(mut self, out: &mut Vec<DocNode>) {
        self.flush(out);
        if self.explicit && !self.emitted && !self.was_split {
            out.push(self.template);
        }
    }
}

fn normalize_text_block(mut block: DocNode, out: &mut Vec<DocNode>) {
    let mut pieces = Vec::new();
    flatten(block.take_children(), &mut pieces);

    let mut segmenter = Segmenter::new(block, true);
    for piece in drop_blank_around_edges(pieces) {
        match piece {
            Piece::Inline(node) => segmenter.push_inline(node),
            Piece::Boundary => segmenter.boundary(),
            Piece::Block(node) => {
                segmenter.split(out);
                emit_block(node, out);
            }
        }
    }
    segmenter.finish(out);
}

// =============================================================================
// Lists
// =============================================================================

/// Items of one list; decorators escape by closing it and starting another.
struct ListBuilder<'o> {
    template: ListNode,
    items: Vec<DocNode>,
    out: &'o mut Vec<DocNode>,
}

impl<'o> ListBuilder<'o> {
    fn new(template: ListNode, out: &'o mut Vec<DocNode>) -> Self {
        Self {
            template,
            items: Vec::new(),
            out,
        }
    }

    fn escape(&mut self, block: DocNode) {
        self.close();
        self.out.push(block);
    }

    /// Nested list output: lists go into their own item, anything else escapes.
    fn push_nested(&mut self, nested: Vec<DocNode>) {
        for node in nested {
            if node.is_list() {
                self.items.push(ListItemNode::new(vec![node]).into());
            } else {
                self.escape(node);
            }
        }
    }

    fn close(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let mut list = self.template.clone();
        list.base.children = std::mem::take(&mut self.items);
        list.renumber();
        self.out.push(list.into());
    }
}

fn normalize_list(mut list: ListNode, out: &mut Vec<DocNode>) {
    let children = std::mem::take(&mut list.base.children);
    let mut builder = ListBuilder::new(list, out);
    let mut loose = Segmenter::new(ListItemNode::default().into(), false);

    for child in children {
        match child {
            DocNode::ListItem(item) => {
                loose.flush(&mut builder.items);
                normalize_list_item(item.into(), &mut builder);
            }
            DocNode::List(nested) => {
                loose.flush(&mut builder.items);
                let mut nested_out = Vec::new();
                normalize_list(nested, &mut nested_out);
                builder.push_nested(nested_out);
            }
            mut child if child.is_text_block() => {
                loose.flush(&mut builder.items);
                let item = ListItemNode::new(child.take_children());
                normalize_list_item(item.into(), &mut builder);
            }
            DocNode::Link(link) => {
                let mut pieces = Vec::new();
                flatten_link(link, &mut pieces);
                for piece in pieces {
                    match piece {
                        Piece::Inline(node) => loose.push_inline(node),
                        Piece::Boundary => loose.flush(&mut builder.items),
                        Piece::Block(node) => {
                            loose.flush(&mut builder.items);
                            builder.escape(node);
                        }
                    }
                }
            }
            child if child.is_inline() => loose.push_inline(child),
            decorator => {
                loose.flush(&mut builder.items);
                builder.escape(decorator);
            }
        }
    }
    loose.flush(&mut builder.items);
    builder.close();
}

fn normalize_list_item(mut item: DocNode, builder: &mut ListBuilder<'_>) {
    let mut pieces = Vec::new();
    flatten(item.take_children(), &mut pieces);

    let mut segmenter = Segmenter::new(item, true);
    for piece in drop_blank_around_edges(pieces) {
        match piece {
            Piece::Inline(node) => segmenter.push_inline(node),
            Piece::Boundary => segmenter.boundary(),
            Piece::Block(DocNode::List(nested)) => {
                segmenter.split(&mut builder.items);
                let mut nested_out = Vec::new();
                normalize_list(nested, &mut nested_out);
                builder.push_nested(nested_out);
            }
            Piece::Block(DocNode::ListItem(stray)) => {
                segmenter.split(&mut builder.items);
                normalize_list_item(stray.into(), builder);
            }
            Piece::Block(block) => {
                segmenter.split(&mut builder.items);
                builder.escape(block);
            }
        }
    }
    segmenter.finish(&mut builder.items);
}

// =============================================================================
// Inline cleanup
// =============================================================================

/// Trim spaces at line edges, drop empty text and links, merge adjacent text.
fn clean_inlines(mut nodes: Vec<DocNode>) -> Vec<DocNode> {
    let mut after_space = true;
    trim_leading(&mut nodes, &mut after_space);
    let mut at_line_end = true;
    trim_trailing(&mut nodes, &mut at_line_end);
    prune_and_merge(nodes)
}

fn trim_leading(nodes: &mut [DocNode], after_space: &mut bool) {
    for node in nodes {
        match node {
            DocNode::Text(text) => {
                if *after_space {
                    let trimmed = text.text.trim_start_matches(' ');
                    if trimmed.len() != text.text.len() {
                        text.text = trimmed.to_owned();
                    }
                }
                if !text.text.is_empty() {
                    *after_space = text.text.ends_with(' ');
                }
            }
            DocNode::LineBreak(_) => *after_space = true,
            DocNode::Link(link) => trim_leading(&mut link.base.children, after_space),
            _ => *after_space = false,
        }
    }
}

fn trim_trailing(nodes: &mut [DocNode], at_line_end: &mut bool) {
    for node in nodes.iter_mut().rev() {
        match node {
            DocNode::Text(text) => {
                if *at_line_end {
                    let trimmed = text.text.trim_end_matches(' ');
                    if trimmed.len() != text.text.len() {
                        text.text = trimmed.to_owned();
                    }
                }
                if !text.text.is_empty() {
                    *at_line_end = false;
                }
            }
            DocNode::LineBreak(_) => *at_line_end = true,
            DocNode::Link(link) => trim_trailing(&mut link.base.children, at_line_end),
            _ => *at_line_end = false,
        }
    }
}

fn prune_and_merge(nodes: Vec<DocNode>) -> Vec<DocNode> {
    let mut out: Vec<DocNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let node = match node {
            DocNode::Text(text) if text.is_empty() => continue,
            DocNode::Link(mut link) => {
                link.base.children = prune_and_merge(std::mem::take(&mut link.base.children));
                if link.base.children.is_empty() {
                    continue;
                }
                DocNode::Link(link)
            }
            node => node,
        };
        if let (Some(DocNode::Text(last)), DocNode::Text(next)) = (out.last_mut(), &node) {
            if last.can_merge_with(next) {
                last.text.push_str(&next.text);
                continue;
            }
        }
        out.push(node);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{HeadingNode, HeadingTag, ImageNode, QuoteNode, TextFormat, TextNode};

    fn text(value: &str) -> DocNode {
        TextNode::new(value).into()
    }

    fn types(nodes: &[DocNode]) -> Vec<&str> {
        nodes.iter().map(DocNode::node_type).collect()
    }

    #[test]
    fn test_root_inline_runs_become_paragraphs() {
        let out = normalize_root(vec![
            text(" Hello "),
            text(" world "),
            ImageNode::new("/a.png").into(),
            text("  "),
        ]);
        assert_eq!(types(&out), vec!["paragraph", "image"]);
        assert_eq!(out[0].text_content(), "Hello world");
        assert_eq!(out[0].children().len(), 1);
    }

    #[test]
    fn test_block_splits_paragraph() {
        let paragraph = ParagraphNode::new(vec![
            text("before"),
            ImageNode::new("/a.png").into(),
            text("after"),
        ]);
        let out = normalize_root(vec![paragraph.into()]);
        assert_eq!(types(&out), vec!["paragraph", "image", "paragraph"]);
        assert_eq!(out[2].text_content(), "after");
    }

    #[test]
    fn test_split_empty_paragraph_dropped() {
        let paragraph = ParagraphNode::new(vec![ImageNode::new("/a.png").into()]);
        let out = normalize_root(vec![paragraph.into(), ParagraphNode::default().into()]);
        // The explicit empty paragraph survives, the one emptied by the split does not
        assert_eq!(types(&out), vec!["image", "paragraph"]);
        assert!(out[1].children().is_empty());
    }

    #[test]
    fn test_nested_text_blocks_flatten_with_breaks() {
        let quote = QuoteNode::new(vec![
            text(" "),
            ParagraphNode::new(vec![text("one")]).into(),
            text(" "),
            HeadingNode::new(HeadingTag::H2, vec![text("two")]).into(),
            text(" "),
        ]);
        let out = normalize_root(vec![quote.into()]);
        assert_eq!(types(&out), vec!["quote"]);
        assert_eq!(types(out[0].children()), vec!["text", "linebreak", "text"]);
    }

    #[test]
    fn test_link_split_and_image_href() {
        let link = LinkNode::new(
            "https://example.com/",
            vec![text("a"), ImageNode::new("/a.png").into(), text("b")],
        );
        let out = normalize_root(vec![ParagraphNode::new(vec![link.into()]).into()]);
        assert_eq!(types(&out), vec!["paragraph", "image", "paragraph"]);
        assert!(out[0].children()[0].is_link());
        assert_eq!(out[1].as_image().unwrap().href(), "https://example.com/");
        assert_eq!(out[2].children()[0].as_link().unwrap().url(), "https://example.com/");
    }

    #[test]
    fn test_text_merge_and_empty_links() {
        let out = normalize_root(vec![
            ParagraphNode::new(vec![
                text("a"),
                text("b"),
                TextNode::new("c").with_format(TextFormat::BOLD).into(),
                LinkNode::new("/x", vec![text(" ")]).into(),
            ])
            .into(),
        ]);
        let children = out[0].children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].as_text().unwrap().text, "ab");
    }

    #[test]
    fn test_spaces_around_line_breaks() {
        let out = normalize_root(vec![
            ParagraphNode::new(vec![text("a "), LineBreakNode.into(), text(" b")]).into(),
        ]);
        assert_eq!(out[0].text_content(), "a\nb");
    }

    #[test]
    fn test_stray_list_items_wrapped() {
        let out = normalize_root(vec![
            ListItemNode::new(vec![text("one")]).into(),
            text(" "),
            ListItemNode::new(vec![text("two")]).into(),
        ]);
        assert_eq!(types(&out), vec!["list"]);
        let list = out[0].as_list().unwrap();
        assert_eq!(list.list_type, ListType::Bullet);
        assert_eq!(list.base.children.len(), 2);
        assert_eq!(list.base.children[1].as_list_item().unwrap().value, 2);
    }

    #[test]
    fn test_list_normalization() {
        let nested = ListNode::new(ListType::Bullet, vec![ListItemNode::new(vec![text("inner")]).into()]);
        let list = ListNode::new(
            ListType::Number,
            vec![
                text(" "),
                ListItemNode::new(vec![text("first"), nested.into()]).into(),
                text("loose"),
                ListItemNode::new(vec![text("x"), ImageNode::new("/a.png").into(), text("y")]).into(),
            ],
        );
        let out = normalize_root(vec![list.into()]);
        assert_eq!(types(&out), vec!["list", "image", "list"]);

        let items = &out[0].as_list().unwrap().base.children;
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].text_content(), "first");
        assert!(items[1].children()[0].is_list());
        assert_eq!(items[2].text_content(), "loose");
        assert_eq!(items[3].text_content(), "x");

        let rest = out[2].as_list().unwrap();
        assert_eq!(rest.list_type, ListType::Number);
        assert_eq!(rest.base.children[0].text_content(), "y");
    }
}
